#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros used across the settings workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! obs-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for declaring a crate's error enum.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to any `Result` whose error is this enum or one of its wrapped sources.
/// * **Conversions**: Implements `From<T>` for every variant holding a `source` field,
///   so upstream errors propagate with `?`.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
/// * **Accessor**: `fn context_note(&self) -> Option<&str>` returns the attached context.
///
/// # Requirements
///
/// 1. Applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants wrapping a `source` must carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use obs_derive::obs_error;
/// use std::borrow::Cow;
///
/// #[obs_error]
/// pub enum LoadError {
///     #[error("Config error{}: {source}", format_context(.context))]
///     Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn build() -> Result<config::Config, LoadError> {
///     config::Config::builder().build().context("Building sources")
/// }
/// ```
#[proc_macro_attribute]
pub fn obs_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
