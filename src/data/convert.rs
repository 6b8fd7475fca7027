use super::model::CellValue;

/// Source currency (INR) to secondary currency (USD).
pub const DEFAULT_PRICE_FACTOR: f64 = 0.012;
/// Kilometres to miles.
pub const DEFAULT_DISTANCE_FACTOR: f64 = 0.621371;

pub const PRICE_DIGITS: i32 = 2;
pub const DISTANCE_DIGITS: i32 = 1;

// ---------------------------------------------------------------------------
// Unit conversion
// ---------------------------------------------------------------------------

/// Process-wide conversion factors, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub price_factor: f64,
    pub distance_factor: f64,
}

impl Default for Conversion {
    fn default() -> Self {
        Self {
            price_factor: DEFAULT_PRICE_FACTOR,
            distance_factor: DEFAULT_DISTANCE_FACTOR,
        }
    }
}

impl Conversion {
    pub fn price(&self, source: f64) -> f64 {
        round_to(source * self.price_factor, PRICE_DIGITS)
    }

    pub fn distance(&self, source: f64) -> f64 {
        round_to(source * self.distance_factor, DISTANCE_DIGITS)
    }
}

/// Round to `digits` fractional digits, ties to even. Never returns `-0.0`,
/// so rounded values that compare equal also rank equal under `total_cmp`.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round_ties_even() / scale + 0.0
}

// ---------------------------------------------------------------------------
// Per-field coercion: parse or reject, never guess
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Missing,
    NotNumeric,
    NotFinite,
}

/// Coerce a cell into a finite `f64`.
pub fn coerce_number(cell: &CellValue) -> Result<f64, FieldError> {
    let value = match cell {
        CellValue::Null => return Err(FieldError::Missing),
        CellValue::Integer(i) => *i as f64,
        CellValue::Float(f) => *f,
        CellValue::Bool(_) => return Err(FieldError::NotNumeric),
        CellValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(FieldError::Missing);
            }
            s.parse::<f64>().map_err(|_| FieldError::NotNumeric)?
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FieldError::NotFinite)
    }
}

/// Coerce a cell into a whole-number year. `2018.0` is accepted since
/// dataframe exports write integer columns with missing values as floats.
pub fn coerce_year(cell: &CellValue) -> Result<i32, FieldError> {
    if let CellValue::Integer(i) = cell {
        return i32::try_from(*i).map_err(|_| FieldError::NotNumeric);
    }
    let value = coerce_number(cell)?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(FieldError::NotNumeric);
    }
    Ok(value as i32)
}
