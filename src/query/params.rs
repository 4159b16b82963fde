//! # Query Parameter Parser
//!
//! Maps raw request parameters to a `ProductQuery`.
//!
//! Parsing is lenient and never fails:
//! - unknown keys are ignored
//! - the first value of a repeated scalar key wins
//! - `sizes` and `colors` accumulate every occurrence
//! - numbers that do not parse, or parse to a non-finite value, are absent
//!
//! Case is left untouched here; the plan compiler lowercases operands.

use super::description::ProductQuery;

/// Parameter names understood by the parser
pub mod keys {
    pub const TEXT: &str = "q";
    pub const CATEGORY: &str = "category";
    pub const GENDER: &str = "gender";
    pub const BRAND: &str = "brand";
    pub const MIN_PRICE: &str = "min_price";
    pub const MAX_PRICE: &str = "max_price";
    pub const MIN_RATING: &str = "min_rating";
    pub const SIZES: &str = "sizes";
    pub const COLORS: &str = "colors";
}

/// Build a query from ordered `(key, value)` pairs
pub fn parse_query_params<I, K, V>(pairs: I) -> ProductQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut query = ProductQuery::default();

    for (key, value) in pairs {
        let value = value.as_ref();
        match key.as_ref() {
            keys::TEXT => set_text(&mut query.text, value),
            keys::CATEGORY => set_text(&mut query.category, value),
            keys::GENDER => set_text(&mut query.gender, value),
            keys::BRAND => set_text(&mut query.brand, value),
            keys::MIN_PRICE => set_number(&mut query.min_price, value),
            keys::MAX_PRICE => set_number(&mut query.max_price, value),
            keys::MIN_RATING => set_number(&mut query.min_rating, value),
            keys::SIZES => push_token(&mut query.sizes, value),
            keys::COLORS => push_token(&mut query.colors, value),
            _ => {}
        }
    }

    query
}

fn set_text(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

fn set_number(slot: &mut Option<f64>, value: &str) {
    if slot.is_none() {
        *slot = parse_number(value);
    }
}

fn push_token(set: &mut Vec<String>, value: &str) {
    if !value.is_empty() {
        set.push(value.to_string());
    }
}

/// Parse a finite number, tolerating surrounding whitespace
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params() {
        let query = parse_query_params(Vec::<(String, String)>::new());
        assert_eq!(query, ProductQuery::default());
    }

    #[test]
    fn test_scalar_params() {
        let query = parse_query_params([
            ("q", "Runner"),
            ("category", "Shoes"),
            ("gender", "women"),
            ("brand", "Acme"),
            ("min_price", "10"),
            ("max_price", "99.5"),
            ("min_rating", "4"),
        ]);

        assert_eq!(query.text.as_deref(), Some("Runner"));
        assert_eq!(query.category.as_deref(), Some("Shoes"));
        assert_eq!(query.gender.as_deref(), Some("women"));
        assert_eq!(query.brand.as_deref(), Some("Acme"));
        assert_eq!(query.min_price, Some(10.0));
        assert_eq!(query.max_price, Some(99.5));
        assert_eq!(query.min_rating, Some(4.0));
    }

    #[test]
    fn test_repeated_set_params_accumulate() {
        let query = parse_query_params([
            ("sizes", "S"),
            ("colors", "red"),
            ("sizes", "M"),
            ("colors", "green"),
        ]);

        assert_eq!(query.sizes, vec!["S", "M"]);
        assert_eq!(query.colors, vec!["red", "green"]);
    }

    #[test]
    fn test_first_scalar_value_wins() {
        let query = parse_query_params([("category", "shoes"), ("category", "hats")]);
        assert_eq!(query.category.as_deref(), Some("shoes"));
    }

    #[test]
    fn test_bad_numbers_are_absent() {
        let query = parse_query_params([
            ("min_price", "cheap"),
            ("max_price", ""),
            ("min_rating", "NaN"),
        ]);

        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, None);
        assert_eq!(query.min_rating, None);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn test_blank_values_and_unknown_keys_ignored() {
        let query = parse_query_params([
            ("q", ""),
            ("sizes", ""),
            ("page", "2"),
            ("q", "hat"),
        ]);

        assert_eq!(query.text.as_deref(), Some("hat"));
        assert!(query.sizes.is_empty());
    }
}
