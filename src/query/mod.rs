//! Query layer: turn a [`filter::FilterSpec`] into a ranked, bounded list of
//! listings.
//!
//! - **`filter`**: the spec itself, its predicates, and the conversion from raw
//!   request parameters (where the default budget is applied).
//! - **`engine`**: filter → rank (year desc, distance asc, catalog order) → truncate.

pub mod engine;
pub mod filter;
