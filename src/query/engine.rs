use std::cmp::Ordering;
use std::sync::Arc;

use super::filter::FilterSpec;
use crate::data::catalog::Catalog;
use crate::data::model::Listing;

/// Maximum number of listings a single recommendation returns.
pub const DEFAULT_LIMIT: usize = 10;

/// Read-only recommender over a shared catalog. Cheap to clone; holds no
/// per-query state, so any number of queries may run concurrently.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    catalog: Arc<Catalog>,
    limit: usize,
}

impl QueryEngine {
    pub fn new(catalog: Arc<Catalog>, limit: usize) -> Self {
        Self { catalog, limit }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Filter, rank newest-first then least-driven, and keep the top `limit`.
    ///
    /// Listings tied on both year and distance keep their catalog order.
    pub fn recommend(&self, spec: &FilterSpec) -> Vec<Listing> {
        let mut ranked = self.matching_positions(spec);
        ranked.sort_unstable_by(|&a, &b| self.rank(a, b));
        ranked
            .into_iter()
            .take(self.limit)
            .map(|i| self.catalog.listings()[i].clone())
            .collect()
    }

    fn matching_positions(&self, spec: &FilterSpec) -> Vec<usize> {
        let listings = self.catalog.listings();
        self.catalog
            .candidates_within(spec.max_price())
            .iter()
            .copied()
            .filter(|&i| spec.matches_text(&listings[i]))
            .collect()
    }

    /// Year descending, distance ascending, then catalog position.
    fn rank(&self, a: usize, b: usize) -> Ordering {
        let listings = self.catalog.listings();
        let (la, lb) = (&listings[a], &listings[b]);
        lb.manufacture_year
            .cmp(&la.manufacture_year)
            .then_with(|| la.distance_converted.total_cmp(&lb.distance_converted))
            .then_with(|| a.cmp(&b))
    }
}
