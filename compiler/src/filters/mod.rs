//! Filter trees and their compilation
//!
//! ## Usage
//!
//! ```no_run
//! use filterql::dialect::Dialect;
//! use filterql::filters::{FilterCompiler, FilterParser};
//!
//! let json_str = r#"{"condition": "AND", "rules": [
//!     {"field": "Name", "operator": "equal", "value": "John"}
//! ]}"#;
//! let tree = FilterParser::new().parse_str(json_str).unwrap();
//! let compiled = FilterCompiler::new(Dialect::SqlServer).build(&tree).unwrap();
//! assert_eq!(compiled.sql, "[Name] = @p0");
//! ```

mod builder;
mod parser;
mod types;

pub use builder::{CompiledFilter, FilterCompiler};
pub use parser::{
    FilterParser, MAX_FILTER_DEPTH, MAX_FILTER_JSON_SIZE, MAX_FILTER_RULES, ParserLimits,
    PropertyNames,
};
pub use types::{FilterGroup, FilterRule, Metadata};
