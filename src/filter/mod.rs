//! # Filter Translation Module
//!
//! Translates loosely-typed client filters (field → operator → value) into
//! validated document-database query documents. Flat filters only: no
//! nesting, no boolean combinators.

pub mod builder;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod operator;

pub use builder::{create_filter, FilterBuilder};
pub use compiler::{apply_operation, prefix_pattern, ClauseCompiler, QueryDocument};
pub use config::{ClauseMerge, FilterConfig};
pub use errors::{FilterError, FilterResult, ValidationError};
pub use operator::{permitted_operators, Operator};
