//! Query evaluation over the catalog
//!
//! Execution flow:
//! 1. Compile the query into a plan
//! 2. Start from every record, in catalog order
//! 3. Run each stage as a pass over the survivors of the previous stage
//! 4. Return the survivors, still in catalog order
//!
//! Evaluation is pure: the catalog is only borrowed, and identical inputs
//! always give identical output.

use crate::catalog::Product;

use super::description::ProductQuery;
use super::plan::QueryPlan;

/// Evaluates product queries against an in-memory record sequence
pub struct QueryEvaluator;

impl QueryEvaluator {
    /// Filters `products` by `query`, preserving relative order
    pub fn evaluate<'a>(products: &'a [Product], query: &ProductQuery) -> Vec<&'a Product> {
        Self::execute(&QueryPlan::compile(query), products)
    }

    /// Runs an already compiled plan
    pub fn execute<'a>(plan: &QueryPlan, products: &'a [Product]) -> Vec<&'a Product> {
        let mut survivors: Vec<&Product> = products.iter().collect();

        for stage in plan.stages() {
            if survivors.is_empty() {
                break;
            }
            survivors.retain(|product| stage.matches(product));
        }

        survivors
    }
}
