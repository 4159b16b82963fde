//! Compiled query plans
//!
//! A `ProductQuery` compiles into an ordered list of predicate stages, one
//! per present dimension. Text operands are lowercased here, once, so stage
//! evaluation only lowercases the record side.
//!
//! Stage order is fixed but carries no meaning: every stage is a pure
//! predicate and the stages are AND-composed.

use std::fmt;

use crate::catalog::Product;

use super::description::ProductQuery;

/// Scalar text attributes compared by exact, case-insensitive equality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Category,
    Gender,
    Brand,
}

impl TextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Category => "category",
            TextField::Gender => "gender",
            TextField::Brand => "brand",
        }
    }

    fn read<'a>(&self, product: &'a Product) -> &'a str {
        match self {
            TextField::Category => product.category_or_empty(),
            TextField::Gender => product.gender_or_empty(),
            TextField::Brand => product.brand_or_empty(),
        }
    }
}

/// A single filter stage
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Lowercased needle appears in name, description, brand or category
    Text(String),
    /// Lowercased attribute equals the lowercased operand
    Equals(TextField, String),
    /// price >= bound, absent price reads as 0
    MinPrice(f64),
    /// price <= bound, an unpriced product passes
    MaxPrice(f64),
    /// rating >= bound, absent rating reads as 0
    MinRating(f64),
    /// Record sizes intersect the requested (lowercased) sizes
    AnySize(Vec<String>),
    /// Record colors intersect the requested (lowercased) colors
    AnyColor(Vec<String>),
}

impl Predicate {
    /// Checks if a product satisfies this stage
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Predicate::Text(needle) => [
                product.name_or_empty(),
                product.description_or_empty(),
                product.brand_or_empty(),
                product.category_or_empty(),
            ]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(needle.as_str())),
            Predicate::Equals(field, expected) => field.read(product).to_lowercase() == *expected,
            Predicate::MinPrice(bound) => product.price_floor() >= *bound,
            Predicate::MaxPrice(bound) => product.priced_at_most(*bound),
            Predicate::MinRating(bound) => product.rating_or_zero() >= *bound,
            Predicate::AnySize(wanted) => intersects(product.sizes(), wanted),
            Predicate::AnyColor(wanted) => intersects(product.colors(), wanted),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Text(needle) => write!(f, "text~{:?}", needle),
            Predicate::Equals(field, value) => write!(f, "{}={:?}", field.as_str(), value),
            Predicate::MinPrice(bound) => write!(f, "price>={}", bound),
            Predicate::MaxPrice(bound) => write!(f, "price<={}", bound),
            Predicate::MinRating(bound) => write!(f, "rating>={}", bound),
            Predicate::AnySize(values) => write!(f, "sizes ANY {:?}", values),
            Predicate::AnyColor(values) => write!(f, "colors ANY {:?}", values),
        }
    }
}

/// Case-insensitive non-empty intersection. `wanted` is already lowercased.
fn intersects(have: &[String], wanted: &[String]) -> bool {
    let have: Vec<String> = have.iter().map(|v| v.to_lowercase()).collect();
    wanted.iter().any(|w| have.contains(w))
}

/// Ordered predicate stages for one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    stages: Vec<Predicate>,
}

impl QueryPlan {
    /// Compile a query description into stages.
    ///
    /// Empty strings, empty set members and NaN bounds are treated as absent.
    pub fn compile(query: &ProductQuery) -> Self {
        let mut stages = Vec::new();

        if let Some(text) = non_empty(&query.text) {
            stages.push(Predicate::Text(text));
        }
        if let Some(category) = non_empty(&query.category) {
            stages.push(Predicate::Equals(TextField::Category, category));
        }
        if let Some(bound) = bound(query.min_price) {
            stages.push(Predicate::MinPrice(bound));
        }
        if let Some(bound) = bound(query.max_price) {
            stages.push(Predicate::MaxPrice(bound));
        }
        if let Some(gender) = non_empty(&query.gender) {
            stages.push(Predicate::Equals(TextField::Gender, gender));
        }
        if let Some(brand) = non_empty(&query.brand) {
            stages.push(Predicate::Equals(TextField::Brand, brand));
        }
        if let Some(sizes) = value_set(&query.sizes) {
            stages.push(Predicate::AnySize(sizes));
        }
        if let Some(colors) = value_set(&query.colors) {
            stages.push(Predicate::AnyColor(colors));
        }
        if let Some(bound) = bound(query.min_rating) {
            stages.push(Predicate::MinRating(bound));
        }

        Self { stages }
    }

    /// Stages in evaluation order
    pub fn stages(&self) -> &[Predicate] {
        &self.stages
    }

    /// True when the plan restricts nothing
    pub fn is_unrestricted(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stages.is_empty() {
            return write!(f, "ALL");
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn bound(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

fn value_set(values: &[String]) -> Option<Vec<String>> {
    let set: Vec<String> = values
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_lowercase())
        .collect();

    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}
