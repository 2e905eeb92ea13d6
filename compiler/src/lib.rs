//! Compile filter-builder rule trees into parameterized query fragments
//!
//! A [`filters::FilterGroup`] tree goes in; a [`filters::CompiledFilter`]
//! holding dialect-specific text and ordered parameter values comes out.

pub mod app;
pub mod convert;
pub mod core;
pub mod dialect;
pub mod error;
pub mod filters;
pub mod transform;
pub mod value;

pub use dialect::Dialect;
pub use error::{FilterError, Result};
pub use filters::{CompiledFilter, FilterCompiler, FilterGroup, FilterParser, FilterRule};
pub use value::Value;
