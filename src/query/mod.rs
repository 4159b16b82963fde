//! # Product Query Engine
//!
//! Multi-dimensional filtering over the in-memory catalog.
//!
//! - `ProductQuery` describes a request; every dimension is optional
//! - `QueryPlan` compiles it into AND-composed predicate stages
//! - `QueryEvaluator` runs the stages as a stable filter
//! - `parse_query_params` maps raw request parameters to a query

mod description;
mod evaluator;
mod params;
mod plan;

pub use description::ProductQuery;
pub use evaluator::QueryEvaluator;
pub use params::{keys, parse_number, parse_query_params};
pub use plan::{Predicate, QueryPlan, TextField};
