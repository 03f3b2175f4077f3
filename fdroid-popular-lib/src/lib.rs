#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for fdroid-popular
//!
//! This library holds all functionality for the fdroid-popular tool, which builds a
//! database of star counts for the applications listed in an F-Droid catalog.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`popular`]: Catalog conversion, hosting service queries, and the output document

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod popular;
#[cfg(not(any(debug_assertions, test)))]
mod popular;

pub use crate::commands::{Host, run};
