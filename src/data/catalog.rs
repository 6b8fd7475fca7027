use std::collections::BTreeMap;
use std::path::Path;

use super::convert::{coerce_number, coerce_year, Conversion, FieldError};
use super::loader::{load_file, LoadOptions};
use super::model::{CellValue, Field, Listing, ListingParts, RawTable};
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// LoadReport – what happened to every source row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub admitted: usize,
    /// Drop count keyed by the first required field that failed.
    pub dropped_by_field: BTreeMap<&'static str, usize>,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.total_rows - self.admitted
    }
}

// ---------------------------------------------------------------------------
// Catalog – the immutable, admitted listings
// ---------------------------------------------------------------------------

/// Every admitted listing in source order, plus a price index.
///
/// There is no mutating method; share it as `Arc<Catalog>`.
#[derive(Debug, Clone)]
pub struct Catalog {
    listings: Vec<Listing>,
    /// Positions into `listings`, stably sorted by converted price.
    by_price: Vec<usize>,
    report: LoadReport,
}

/// Column positions of the six logical fields within a [`RawTable`].
struct Columns {
    make: usize,
    model: usize,
    year: usize,
    fuel_type: usize,
    price: usize,
    distance: usize,
}

impl Columns {
    fn resolve(table: &RawTable) -> Result<Self, DataLoadError> {
        let find = |field: Field| {
            table
                .column_of(field)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    field,
                    aliases: field.aliases(),
                    available: table.headers.clone(),
                })
        };
        Ok(Columns {
            make: find(Field::Make)?,
            model: find(Field::Model)?,
            year: find(Field::Year)?,
            fuel_type: find(Field::FuelType)?,
            price: find(Field::Price)?,
            distance: find(Field::Distance)?,
        })
    }
}

impl Catalog {
    /// Read `path` and build the catalog from it.
    pub fn load(
        path: &Path,
        options: &LoadOptions,
        conversion: &Conversion,
    ) -> Result<Self, DataLoadError> {
        let table = load_file(path, options)?;
        let catalog = Self::build(table, conversion)?;
        log::info!(
            "Loaded {}: {} of {} rows admitted ({} dropped: {:?})",
            path.display(),
            catalog.report.admitted,
            catalog.report.total_rows,
            catalog.report.dropped(),
            catalog.report.dropped_by_field,
        );
        Ok(catalog)
    }

    /// Validate, convert and index a raw table.
    ///
    /// Fails only when a required column is absent. Rows whose year, price or
    /// distance does not parse are dropped and counted in the report.
    pub fn build(table: RawTable, conversion: &Conversion) -> Result<Self, DataLoadError> {
        let cols = Columns::resolve(&table)?;
        let mut report = LoadReport {
            total_rows: table.rows.len(),
            ..LoadReport::default()
        };

        let mut listings = Vec::with_capacity(table.rows.len());
        for (row_no, row) in table.rows.iter().enumerate() {
            match admit(row, &cols, conversion) {
                Ok(listing) => listings.push(listing),
                Err((field, err)) => {
                    log::debug!("Dropping row {}: {field} {err:?}", row_no + 1);
                    *report.dropped_by_field.entry(field_label(field)).or_default() += 1;
                }
            }
        }
        report.admitted = listings.len();

        let mut by_price: Vec<usize> = (0..listings.len()).collect();
        by_price.sort_by(|&a, &b| {
            listings[a]
                .price_converted
                .total_cmp(&listings[b].price_converted)
        });

        Ok(Catalog {
            listings,
            by_price,
            report,
        })
    }

    /// All listings in admission order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Positions of every listing with `price_converted <= max_price`,
    /// in ascending price order.
    pub fn candidates_within(&self, max_price: f64) -> &[usize] {
        let end = self
            .by_price
            .partition_point(|&i| self.listings[i].price_converted <= max_price);
        &self.by_price[..end]
    }
}

fn field_label(field: Field) -> &'static str {
    match field {
        Field::Make => "make",
        Field::Model => "model",
        Field::Year => "year",
        Field::FuelType => "fuel_type",
        Field::Price => "price",
        Field::Distance => "distance",
    }
}

static MISSING: CellValue = CellValue::Null;

/// Parse one row into a listing, or name the first required field that failed.
fn admit(
    row: &[CellValue],
    cols: &Columns,
    conversion: &Conversion,
) -> Result<Listing, (Field, FieldError)> {
    let cell = |idx: usize| row.get(idx).unwrap_or(&MISSING);

    let source_price = coerce_number(cell(cols.price)).map_err(|e| (Field::Price, e))?;
    let source_distance = coerce_number(cell(cols.distance)).map_err(|e| (Field::Distance, e))?;
    let manufacture_year = coerce_year(cell(cols.year)).map_err(|e| (Field::Year, e))?;

    Ok(Listing::new(ListingParts {
        make: cell(cols.make).to_text(),
        model: cell(cols.model).to_text(),
        manufacture_year,
        fuel_type: cell(cols.fuel_type).to_text(),
        source_price,
        source_distance,
        price_converted: conversion.price(source_price),
        distance_converted: conversion.distance(source_distance),
    }))
}
