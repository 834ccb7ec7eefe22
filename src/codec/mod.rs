// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed-value codec: conversion between variable values and their persisted text.

mod file;
mod kind;
pub mod literal;
mod record;
mod value;

pub use file::FileAttachment;
pub use kind::VariableKind;
pub use literal::{decode, render};
pub use record::{decode_record, encode, ElementSink, ValueSink};
pub(crate) use value::deserialize_optional;
pub use value::TypedValue;
