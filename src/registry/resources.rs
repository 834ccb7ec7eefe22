// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bundled resources (schemas and reference material) looked up by name.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};

/// Schema describing the persisted process-state document.
pub const PROCESS_STATE_SCHEMA: &str = "schemas/process-state.xsd";

/// The resources shipped inside this crate.
pub static CORE_RESOURCES: StaticResources = StaticResources::new(
    "flowwood",
    &[(
        PROCESS_STATE_SCHEMA,
        include_bytes!("../../resources/schemas/process-state.xsd"),
    )],
);

/// A named source of resources.
pub trait ResourceBundle: Send + Sync {
    fn name(&self) -> &str;

    /// Open `resource` as a byte stream, or `None` when this bundle lacks it.
    fn open(&self, resource: &str) -> Option<Box<dyn Read + Send>>;
}

/// Resources compiled into the binary.
#[derive(Debug)]
pub struct StaticResources {
    name: &'static str,
    entries: &'static [(&'static str, &'static [u8])],
}

impl StaticResources {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { name, entries }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl ResourceBundle for StaticResources {
    fn name(&self) -> &str {
        self.name
    }

    fn open(&self, resource: &str) -> Option<Box<dyn Read + Send>> {
        self.entries
            .iter()
            .find(|(name, _)| *name == resource)
            .map(|(_, bytes)| Box::new(Cursor::new(*bytes)) as Box<dyn Read + Send>)
    }
}

/// Resources read from a directory on disk. Names are relative paths; names
/// that would escape the directory are never resolved.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    name: String,
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: root.display().to_string(),
            root,
        }
    }
}

impl ResourceBundle for DirectoryResources {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, resource: &str) -> Option<Box<dyn Read + Send>> {
        let relative = Path::new(resource);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        let path = self.root.join(relative);
        if !path.is_file() {
            return None;
        }
        File::open(path)
            .ok()
            .map(|file| Box::new(file) as Box<dyn Read + Send>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(mut stream: Box<dyn Read + Send>) -> String {
        let mut text = String::new();
        stream.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_core_bundle_ships_state_schema() {
        let schema = CORE_RESOURCES.open(PROCESS_STATE_SCHEMA).unwrap();
        assert!(read_all(schema).contains("ProcessState"));
        assert!(CORE_RESOURCES.open("schemas/missing.xsd").is_none());
    }

    #[test]
    fn test_directory_bundle_refuses_to_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "inside").unwrap();
        let bundle = DirectoryResources::new(dir.path());

        assert_eq!(read_all(bundle.open("notes.txt").unwrap()), "inside");
        assert!(bundle.open("../notes.txt").is_none());
        assert!(bundle.open("/etc/hostname").is_none());
    }

    #[test]
    fn test_directory_bundle_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("schemas")).unwrap();
        let bundle = DirectoryResources::new(dir.path());

        assert!(bundle.open("schemas").is_none());
        assert!(bundle.open("missing.txt").is_none());
    }
}
