use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::data::convert::{Conversion, DEFAULT_DISTANCE_FACTOR, DEFAULT_PRICE_FACTOR};
use crate::data::loader::LoadOptions;
use crate::query::engine::DEFAULT_LIMIT;
use crate::query::filter::DEFAULT_MAX_PRICE;

/// Startup settings. Every flag falls back to an environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "car-recommender", version, about = "Used-car recommendations within a budget")]
pub struct Settings {
    /// Listings file (.csv, .tsv, .json or .parquet)
    #[arg(long, env = "CARS_DATA", default_value = "cars.csv")]
    pub data: PathBuf,

    /// Delimiter for text files: `tab` or a single ASCII character. Sniffed if unset.
    #[arg(long, env = "CARS_DELIMITER", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:10000")]
    pub bind: SocketAddr,

    /// Multiplier from source currency to the reported currency
    #[arg(long, env = "PRICE_FACTOR", default_value_t = DEFAULT_PRICE_FACTOR)]
    pub price_factor: f64,

    /// Multiplier from source distance unit to the reported unit
    #[arg(long, env = "DISTANCE_FACTOR", default_value_t = DEFAULT_DISTANCE_FACTOR)]
    pub distance_factor: f64,

    /// Budget used when a request does not pass one
    #[arg(long, env = "DEFAULT_BUDGET", default_value_t = DEFAULT_MAX_PRICE)]
    pub default_budget: f64,

    /// Maximum listings per recommendation
    #[arg(long, env = "RESULT_LIMIT", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        for (name, factor) in [
            ("price factor", self.price_factor),
            ("distance factor", self.distance_factor),
        ] {
            if !factor.is_finite() || factor <= 0.0 {
                bail!("{name} must be a positive number, got {factor}");
            }
        }
        if !self.default_budget.is_finite() || self.default_budget < 0.0 {
            bail!("default budget must be a non-negative number, got {}", self.default_budget);
        }
        if self.limit == 0 {
            bail!("result limit must be at least 1");
        }
        Ok(())
    }

    pub fn conversion(&self) -> Conversion {
        Conversion {
            price_factor: self.price_factor,
            distance_factor: self.distance_factor,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter,
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("expected `tab` or one ASCII character, got {s:?}")),
        },
    }
}
