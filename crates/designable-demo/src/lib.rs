#![forbid(unsafe_code)]

//! Reference application for `designable`.
//!
//! A terminal rendition of the classic two-view example: a view controller
//! with a background color and a custom view with an accent color, styled
//! by a shared designer with light, dark and graphite appearances.

pub mod appearance;
pub mod cli;
pub mod error;
pub mod transition;
pub mod views;

pub use cli::{Cli, Commands, run, run_from_env, run_with_output};
pub use error::{DemoError, Result};
