use serde::Deserialize;

use crate::data::model::Listing;
use crate::data::normalize::normalize_key;
use crate::error::QueryError;

/// Budget applied when a request carries no `budget` parameter.
pub const DEFAULT_MAX_PRICE: f64 = 5000.0;

// ---------------------------------------------------------------------------
// FilterSpec – a validated query
// ---------------------------------------------------------------------------

/// Structured query input. String filters are stored normalized; `None`
/// means "no constraint", never "match nothing".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    max_price: f64,
    fuel_type: Option<String>,
    make_query: Option<String>,
}

impl FilterSpec {
    /// A spec with only a budget. Rejects negative and non-finite values.
    pub fn new(max_price: f64) -> Result<Self, QueryError> {
        if !max_price.is_finite() {
            return Err(invalid_budget(max_price.to_string(), "not a finite number"));
        }
        if max_price < 0.0 {
            return Err(invalid_budget(max_price.to_string(), "must not be negative"));
        }
        Ok(Self {
            max_price,
            fuel_type: None,
            make_query: None,
        })
    }

    /// Exact, case-insensitive fuel type filter. Blank input clears it.
    pub fn with_fuel_type(mut self, fuel_type: Option<&str>) -> Self {
        self.fuel_type = non_blank(fuel_type);
        self
    }

    /// Case-insensitive substring filter on make. Blank input clears it.
    pub fn with_make(mut self, make_query: Option<&str>) -> Self {
        self.make_query = non_blank(make_query);
        self
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    pub fn fuel_type(&self) -> Option<&str> {
        self.fuel_type.as_deref()
    }

    pub fn make_query(&self) -> Option<&str> {
        self.make_query.as_deref()
    }

    /// Whether a listing passes every active predicate.
    ///
    /// * price: `price_converted <= max_price`
    /// * fuel type: absent → passes; otherwise normalized equality
    /// * make: absent → passes; otherwise normalized substring
    pub fn matches(&self, listing: &Listing) -> bool {
        if listing.price_converted > self.max_price {
            return false;
        }
        self.matches_text(listing)
    }

    /// The string predicates alone, for callers that already bounded price.
    pub fn matches_text(&self, listing: &Listing) -> bool {
        if let Some(fuel) = &self.fuel_type {
            if listing.fuel_key() != fuel.as_str() {
                return false;
            }
        }
        if let Some(make) = &self.make_query {
            if !listing.make_key().contains(make.as_str()) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(normalize_key).filter(|v| !v.is_empty())
}

fn invalid_budget(value: String, reason: &'static str) -> QueryError {
    QueryError::InvalidParameter {
        parameter: "budget",
        value,
        reason,
    }
}

// ---------------------------------------------------------------------------
// RecommendParams – raw request parameters at the service boundary
// ---------------------------------------------------------------------------

/// Query-string parameters as received. The budget stays text so that a
/// malformed value can be reported instead of silently defaulted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendParams {
    pub budget: Option<String>,
    pub fuel_type: Option<String>,
    pub make: Option<String>,
}

impl RecommendParams {
    /// Build a [`FilterSpec`]. An absent budget becomes `default_max_price`;
    /// a present one must parse, even if it is empty.
    pub fn into_filter(self, default_max_price: f64) -> Result<FilterSpec, QueryError> {
        let max_price = match self.budget {
            None => default_max_price,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(value) => value,
                Err(_) => return Err(invalid_budget(raw, "not a number")),
            },
        };
        Ok(FilterSpec::new(max_price)?
            .with_fuel_type(self.fuel_type.as_deref())
            .with_make(self.make.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ListingParts;

    fn listing(make: &str, fuel: &str, price: f64) -> Listing {
        Listing::new(ListingParts {
            make: make.into(),
            model: "Any".into(),
            manufacture_year: 2018,
            fuel_type: fuel.into(),
            source_price: price / 0.012,
            source_distance: 100.0,
            price_converted: price,
            distance_converted: 62.1,
        })
    }

    #[test]
    fn price_bound_is_inclusive() {
        let spec = FilterSpec::new(4000.0).unwrap();
        assert!(spec.matches(&listing("Honda", "Petrol", 4000.0)));
        assert!(!spec.matches(&listing("Honda", "Petrol", 4000.01)));
    }

    #[test]
    fn zero_budget_is_valid() {
        let spec = FilterSpec::new(0.0).unwrap();
        assert!(spec.matches(&listing("Honda", "Petrol", 0.0)));
        assert!(!spec.matches(&listing("Honda", "Petrol", 0.01)));
    }

    #[test]
    fn rejects_negative_and_non_finite_budgets() {
        for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                FilterSpec::new(bad),
                Err(QueryError::InvalidParameter { parameter: "budget", .. })
            ));
        }
    }

    #[test]
    fn fuel_filter_is_exact_and_case_insensitive() {
        let spec = FilterSpec::new(1e9).unwrap().with_fuel_type(Some("  DIESEL "));
        assert_eq!(spec.fuel_type(), Some("diesel"));
        assert!(spec.matches(&listing("Tata", "Diesel", 10.0)));
        assert!(!spec.matches(&listing("Tata", "Diesel Hybrid", 10.0)));
        assert!(!spec.matches(&listing("Tata", "Petrol", 10.0)));
    }

    #[test]
    fn make_filter_is_substring_and_case_insensitive() {
        let spec = FilterSpec::new(1e9).unwrap().with_make(Some("TOY"));
        assert!(spec.matches(&listing("Toyota", "Petrol", 10.0)));
        assert!(spec.matches(&listing("  toyota ", "Petrol", 10.0)));
        assert!(!spec.matches(&listing("Honda", "Petrol", 10.0)));
    }

    #[test]
    fn blank_filters_mean_no_filter() {
        let spec = FilterSpec::new(1e9)
            .unwrap()
            .with_fuel_type(Some(""))
            .with_make(Some("   "));
        assert_eq!(spec.fuel_type(), None);
        assert_eq!(spec.make_query(), None);
        assert!(spec.matches(&listing("Honda", "CNG", 10.0)));
    }

    #[test]
    fn absent_budget_uses_default() {
        let spec = RecommendParams::default()
            .into_filter(DEFAULT_MAX_PRICE)
            .unwrap();
        assert_eq!(spec.max_price(), 5000.0);
    }

    #[test]
    fn present_budget_overrides_default() {
        let params = RecommendParams {
            budget: Some(" 3000.5 ".into()),
            fuel_type: Some("Petrol".into()),
            make: None,
        };
        let spec = params.into_filter(DEFAULT_MAX_PRICE).unwrap();
        assert_eq!(spec.max_price(), 3000.5);
        assert_eq!(spec.fuel_type(), Some("petrol"));
    }

    #[test]
    fn unparsable_budget_is_an_error_not_a_default() {
        for raw in ["abc", "", "5,000"] {
            let params = RecommendParams {
                budget: Some(raw.into()),
                ..RecommendParams::default()
            };
            let err = params.into_filter(DEFAULT_MAX_PRICE).unwrap_err();
            assert_eq!(
                err,
                QueryError::InvalidParameter {
                    parameter: "budget",
                    value: raw.into(),
                    reason: "not a number",
                }
            );
        }
    }

    #[test]
    fn negative_budget_from_params_is_rejected() {
        let params = RecommendParams {
            budget: Some("-10".into()),
            ..RecommendParams::default()
        };
        assert!(params.into_filter(DEFAULT_MAX_PRICE).is_err());
    }
}
