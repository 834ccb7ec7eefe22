// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod codec;
mod config;
mod locator;
mod markup;
mod registry;
mod state;

pub use codec::CodecError;
pub use config::ConfigError;
pub use locator::LocatorError;
pub use markup::MarkupError;
pub use registry::RegistryError;
pub use state::StateError;
