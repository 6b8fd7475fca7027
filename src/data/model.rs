use std::fmt;

use serde::Serialize;

use super::normalize::normalize_key;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a source row
// ---------------------------------------------------------------------------

/// A loosely-typed source value mirroring what CSV/JSON/Parquet can hold.
/// Numeric fields are coerced out of this explicitly; nothing is implicit.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Text cells keep their content; everything else is rendered.
    /// `Null` becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Field – the logical columns the catalog needs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Make,
    Model,
    Year,
    FuelType,
    Price,
    Distance,
}

impl Field {
    /// Normalized header names accepted for this field, in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Make => &["make"],
            Field::Model => &["model"],
            Field::Year => &["yr_mfr", "year", "manufacture_year"],
            Field::FuelType => &["fuel_type", "fuel"],
            Field::Price => &["sale_price", "price"],
            Field::Distance => &["kms_run", "km_driven", "distance"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Make => "make",
            Field::Model => "model",
            Field::Year => "manufacture year",
            Field::FuelType => "fuel type",
            Field::Price => "price",
            Field::Distance => "distance",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// RawTable – what every format reader produces
// ---------------------------------------------------------------------------

/// Headers (already normalized) plus one `Vec<CellValue>` per source row.
/// Rows may be shorter than `headers`; missing cells read as `Null`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Position of the first alias of `field` present in the headers.
    pub fn column_of(&self, field: Field) -> Option<usize> {
        field
            .aliases()
            .iter()
            .find_map(|alias| self.headers.iter().position(|h| h == alias))
    }
}

// ---------------------------------------------------------------------------
// Listing – one admitted, converted record
// ---------------------------------------------------------------------------

/// A validated vehicle listing as stored in the catalog.
///
/// Serializes to exactly the six fields the service exposes, under the
/// dataset's original column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub make: String,
    pub model: String,
    #[serde(rename = "yr_mfr")]
    pub manufacture_year: i32,
    pub fuel_type: String,
    /// Distance in the secondary unit, one fractional digit.
    #[serde(rename = "miles_run")]
    pub distance_converted: f64,
    /// Price in the secondary currency, two fractional digits.
    #[serde(rename = "sale_price_usd")]
    pub price_converted: f64,

    #[serde(skip)]
    pub source_price: f64,
    #[serde(skip)]
    pub source_distance: f64,
    #[serde(skip)]
    make_key: String,
    #[serde(skip)]
    fuel_key: String,
}

/// Fields of a listing before the catalog derives its keys.
#[derive(Debug, Clone)]
pub struct ListingParts {
    pub make: String,
    pub model: String,
    pub manufacture_year: i32,
    pub fuel_type: String,
    pub source_price: f64,
    pub source_distance: f64,
    pub price_converted: f64,
    pub distance_converted: f64,
}

impl Listing {
    pub fn new(parts: ListingParts) -> Self {
        Listing {
            make_key: normalize_key(&parts.make),
            fuel_key: normalize_key(&parts.fuel_type),
            make: parts.make,
            model: parts.model,
            manufacture_year: parts.manufacture_year,
            fuel_type: parts.fuel_type,
            distance_converted: parts.distance_converted,
            price_converted: parts.price_converted,
            source_price: parts.source_price,
            source_distance: parts.source_distance,
        }
    }

    /// Normalized make, for substring matching.
    pub fn make_key(&self) -> &str {
        &self.make_key
    }

    /// Normalized fuel type, for exact matching.
    pub fn fuel_key(&self) -> &str {
        &self.fuel_key
    }
}
