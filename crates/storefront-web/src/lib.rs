#![forbid(unsafe_code)]

//! Browser bindings for the storefront page controllers.
//!
//! [`render`] diffs successive [`storefront_core::PageView`]s into DOM
//! operations and [`logging`] routes `tracing` output to the console. Both
//! are plain Rust and tested natively. The `wasm32` build adds the DOM
//! applier and the exported `start` / `switchTab` entry points.

pub mod logging;
pub mod render;

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{start, switch_tab};
