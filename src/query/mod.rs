//! Declarative query filtering: parse, validate, build
//!
//! The pipeline is one-directional: a raw query string flows through the
//! [`parser`] into [`RawFilter`]s, the [`validator`] resolves them against an
//! optional allow-list into [`Filter`]s inside a [`QueryParams`] bundle, and
//! the [`builder`] turns the bundle into an executable
//! [`SelectStatement`](statement::SelectStatement) for a concrete entity
//! type.

pub mod allowed;
pub mod builder;
pub mod config;
pub mod extract;
pub mod operator;
pub mod params;
pub mod parser;
pub mod statement;
pub mod validator;

pub use allowed::{AllowedFilter, FilterCallback};
pub use builder::QueryBuilder;
pub use config::QueryBuilderConfig;
pub use operator::FilterOperator;
pub use params::{Filter, FilterValue, QueryParams, RawFilter};
pub use statement::{Comparison, MatchAnchor, OrderClause, Predicate, SelectStatement, SortOrder};
