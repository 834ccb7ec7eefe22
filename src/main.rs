// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flowwood::codec::literal;
use flowwood::config::{load_and_validate_config, EngineConfig};
use flowwood::markup::Document;
use flowwood::observability::init_tracing;
use flowwood::registry::{ElementKey, ElementRegistry, ElementTree};
use flowwood::state::{ProcessState, VariableScope};

struct CliArgs {
    definition: PathBuf,
    state: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config needs a file path")?;
            config = Some(PathBuf::from(path));
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    let mut positional = positional.into_iter();
    let definition = match positional.next() {
        Some(path) => path,
        None => bail!("missing process definition"),
    };
    let state = positional.next();
    if positional.next().is_some() {
        bail!("too many arguments");
    }

    Ok(CliArgs {
        definition,
        state,
        config,
    })
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Usage: {} <definition.bpmn> [state.xml|state.json] [--config engine.yaml]",
                args.first().map(String::as_str).unwrap_or("flowwood")
            );
            eprintln!("Example: flowwood demos/order-process.bpmn --config demos/engine.yaml");
            std::process::exit(1);
        }
    };

    let config = match &cli.config {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    init_tracing(&config.log_filter);

    let registry = ElementRegistry::from_config(&config);
    let text = fs::read_to_string(&cli.definition)
        .with_context(|| format!("reading {}", cli.definition.display()))?;
    let document = Arc::new(
        Document::parse(&text).with_context(|| format!("parsing {}", cli.definition.display()))?,
    );
    let tree = registry
        .load(document)
        .with_context(|| format!("loading {}", cli.definition.display()))?;

    println!("Process definition: {}", cli.definition.display());
    println!("Elements: {}", tree.len());
    for root in tree.roots() {
        print_element(&tree, *root, 1);
    }

    if let Some(state_path) = &cli.state {
        let state = load_state(state_path)?;
        print_state(&state)?;
    }

    Ok(())
}

fn print_element(tree: &ElementTree, key: ElementKey, depth: usize) {
    let element = tree.get(key);
    println!(
        "{}{} id={} {}",
        "  ".repeat(depth),
        element.type_name(),
        element.id().unwrap_or("-"),
        element.base().path()
    );
    for child in tree.children(key) {
        print_element(tree, *child, depth + 1);
    }
}

fn load_state(path: &Path) -> Result<ProcessState> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let state = if is_json {
        ProcessState::from_json(&text)
    } else {
        ProcessState::from_markup_str(&text)
    };
    state.with_context(|| format!("restoring {}", path.display()))
}

fn print_state(state: &ProcessState) -> Result<()> {
    println!();
    println!("Process path:");
    for entry in state.path().entries() {
        println!(
            "  #{} {} step {} [{}]",
            entry.sequence, entry.element_id, entry.step_index, entry.status
        );

        let scope = VariableScope::at_step(&entry.element_id, entry.step_index, state, None)?;
        for name in scope.keys() {
            let rendered = match scope.get(&name) {
                Some(value) => format!(
                    "{} = {}",
                    value.kind(),
                    literal::render(&value).unwrap_or_else(|| "<file>".to_string())
                ),
                None => "Null".to_string(),
            };
            println!("      {}: {}", name, rendered);
        }
    }
    Ok(())
}
