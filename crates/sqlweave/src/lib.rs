//! # sqlweave
//!
//! A fluent, dialect-aware SQL query builder that compiles to SQL text
//! plus an ordered bound-parameter list. No connection handling, no
//! execution: the contract ends at [`QueryBuilder::compile`].
//!
//! ## Features
//!
//! - **Fluent accumulation**: every method returns the builder, so query
//!   construction chains naturally
//! - **Dialect-correct output**: quoting, placeholder syntax, pagination
//!   and random ordering selected once at construction
//! - **Ordered parameters**: placeholder indices are assigned during the
//!   render walk, never by string replacement, so parameter order always
//!   matches placeholder order, including spliced sub-queries
//! - **Safe defaults**: DELETE and UPDATE without WHERE refuse to
//!   compile unless explicitly allowed
//!
//! ## Example
//!
//! ```
//! use sqlweave::{Dialect, QueryBuilder};
//!
//! let compiled = QueryBuilder::new(Dialect::Postgres)
//!     .select("id, username")
//!     .from("users")
//!     .and_where("status", "active")
//!     .or_where_in("role", ["admin", "owner"])
//!     .limit(10)
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(
//!     compiled.sql,
//!     "SELECT \"id\", \"username\" FROM \"users\" \
//!      WHERE \"status\" = $1 OR \"role\" IN ($2, $3) LIMIT 10"
//! );
//! assert_eq!(compiled.params.len(), 3);
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod value;

mod ident;
mod render;

pub use builder::{Compiled, QueryBuilder};
pub use dialect::Dialect;
pub use error::{BuildError, BuildResult};
pub use expr::{MatchSide, Predicate};
pub use value::Value;
