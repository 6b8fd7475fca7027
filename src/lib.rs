//! Used-car recommendations within a budget.
//!
//! A static listings file is loaded once into an immutable [`data::catalog::Catalog`];
//! each request is a pure query over it through [`query::engine::QueryEngine`].
//!
//! - **`data`**: file readers, field coercion, unit conversion, the catalog.
//! - **`query`**: filter specs and the filter → rank → truncate engine.
//! - **`service`**: the thin axum boundary.
//! - **`config`**: startup settings.

pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod service;
