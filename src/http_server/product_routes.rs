//! Product HTTP Routes
//!
//! `GET /products` maps the query string onto a `ProductQuery` and returns
//! every matching product, in catalog order, as a JSON array.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::observability::{log_event_with_fields, Event};
use crate::query::{parse_query_params, QueryEvaluator, QueryPlan};

use super::state::AppState;

/// Product routes with shared state
pub fn product_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/products", get(list_products_handler))
        .with_state(state)
}

/// Product search handler
///
/// Pairs keep their order and repeats, so `sizes=S&sizes=M` yields both.
async fn list_products_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = parse_query_params(pairs);
    let plan = QueryPlan::compile(&query);
    let products = QueryEvaluator::execute(&plan, state.catalog.products());

    let plan_str = plan.to_string();
    let matched = products.len().to_string();
    let total = state.catalog.len().to_string();
    log_event_with_fields(
        Event::ProductsQueried,
        &[("plan", &plan_str), ("matched", &matched), ("total", &total)],
    );

    Json(products).into_response()
}
