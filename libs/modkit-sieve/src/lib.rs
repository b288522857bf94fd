#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! # `modkit-sieve` - typed builder for Sieve filter/sort/pagination queries
//!
//! Sieve APIs take `filters`, `sorts`, `page` and `pageSize` parameters, where filters are
//! comma-separated `field<op>value` clauses and sorts are comma-separated `[-]field` tokens.
//! This crate builds those parameters from declared field names and reads them back:
//!
//! - **Clause grammar** (`grammar` module) - operator set and clause decomposition
//! - **Value formatting** (`value` module) - canonical text for filter values, UTC instants
//! - **Schemas** (`schema` module) - declared fields and typed `FieldRef`s
//! - **Builder** (`builder` module) - `SieveQuery`, the chainable accumulator
//! - **Parsing** (`parse` module) - query strings and `SieveModel` records back into a builder
//!
//! ## Example
//!
//! ```rust,ignore
//! use modkit_sieve::{SieveQuery, SieveSchema};
//!
//! #[derive(SieveSchema)]
//! struct Post {
//!     title: String,
//!     likes: i32,
//! }
//!
//! let query = SieveQuery::<PostSchema>::new()
//!     .filter_contains(post::title(), "rust")
//!     .sort_by_descending(post::likes())
//!     .page_size(20);
//!
//! assert_eq!(query.to_query_string(), "filters=Title%40%3Drust&sorts=-Likes&pageSize=20");
//!
//! let again = SieveQuery::<PostSchema>::parse(&query.to_query_string());
//! assert_eq!(again, query);
//! ```

pub mod builder;
pub mod errors;
pub mod grammar;
pub mod model;
pub mod options;
pub mod parse;
pub mod schema;
pub mod value;

pub use builder::{DynamicSieveQuery, SieveQuery};
pub use errors::Error;
pub use grammar::{FilterTerm, SieveOperator, SortTerm};
pub use model::{QueryParam, SieveModel};
pub use options::{FieldCase, PaginationDefaults, SieveOptions};
pub use schema::{FieldRef, FilterClause, Schema, Untyped};
pub use value::{IntoSieveValue, SieveValue};

// Re-export proc-macros (feature-gated)
#[cfg(feature = "derive")]
pub use modkit_sieve_macros::SieveSchema;
