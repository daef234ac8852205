#![forbid(unsafe_code)]

//! Message catalog for the storefront page controllers.
//!
//! Provides externalized string storage with key-based lookup, locale
//! fallback chains, and `{name}` interpolation. The page ships Turkish
//! messages; [`builtin::builtin_catalog`] loads them together with an
//! English fallback set.

pub mod builtin;
pub mod catalog;

pub use builtin::{MessageKey, builtin_catalog};
pub use catalog::{I18nError, Locale, LocaleStrings, StringCatalog};
