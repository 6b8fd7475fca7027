//! End-to-end: real files on disk → Catalog → QueryEngine.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use car_recommender::data::catalog::Catalog;
use car_recommender::data::convert::{round_to, Conversion};
use car_recommender::data::loader::LoadOptions;
use car_recommender::error::{DataLoadError, QueryError};
use car_recommender::query::engine::{QueryEngine, DEFAULT_LIMIT};
use car_recommender::query::filter::{FilterSpec, RecommendParams, DEFAULT_MAX_PRICE};
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

/// Source rows in INR / km. With the default factors:
/// Honda → 4000.00 USD, 20000.1 mi; Toyota → 4500.00 USD, 29999.8 mi.
const CARS_TSV: &str = "\
Make\t Model \tYR_MFR\tFuel_Type\tSale_Price\tKms_Run\tCity
Honda\tCity\t2018\tPetrol\t333333\t32187\tPune
Toyota\tEtios\t2020\tPetrol\t375000\t48280\tDelhi
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn load(path: &Path) -> Result<Catalog, DataLoadError> {
    Catalog::load(path, &LoadOptions::default(), &Conversion::default())
}

fn engine(path: &Path) -> QueryEngine {
    QueryEngine::new(Arc::new(load(path).unwrap()), DEFAULT_LIMIT)
}

fn makes(engine: &QueryEngine, spec: &FilterSpec) -> Vec<String> {
    engine.recommend(spec).into_iter().map(|l| l.make).collect()
}

#[test]
fn tab_separated_csv_ranks_newest_first() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&write_file(&dir, "cars.csv", CARS_TSV));

    let result = engine.recommend(&FilterSpec::new(5000.0).unwrap());
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].make, "Toyota");
    assert_eq!(result[0].manufacture_year, 2020);
    assert_eq!(result[0].price_converted, 4500.0);
    assert_eq!(result[1].make, "Honda");
    assert_eq!(result[1].price_converted, 4000.0);
    assert_eq!(result[1].distance_converted, 20000.1);
}

#[test]
fn budget_below_every_listing_is_empty() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&write_file(&dir, "cars.csv", CARS_TSV));
    assert!(engine.recommend(&FilterSpec::new(3000.0).unwrap()).is_empty());
}

#[test]
fn fuel_filter_scenarios() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&write_file(&dir, "cars.tsv", CARS_TSV));

    let diesel = FilterSpec::new(5000.0).unwrap().with_fuel_type(Some("Diesel"));
    assert!(engine.recommend(&diesel).is_empty());

    let blank = FilterSpec::new(5000.0).unwrap().with_fuel_type(Some(""));
    assert_eq!(makes(&engine, &blank), ["Toyota", "Honda"]);

    let petrol = FilterSpec::new(5000.0).unwrap().with_fuel_type(Some("PETROL"));
    assert_eq!(makes(&engine, &petrol), ["Toyota", "Honda"]);
}

#[test]
fn make_substring_scenario() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&write_file(&dir, "cars.csv", CARS_TSV));
    let spec = FilterSpec::new(5000.0).unwrap().with_make(Some("toy"));
    assert_eq!(makes(&engine, &spec), ["Toyota"]);
}

#[test]
fn non_numeric_price_row_is_dropped() {
    let dir = TempDir::new().unwrap();
    let contents = format!("{CARS_TSV}Kia\tSeltos\t2023\tPetrol\tabc\t100\tMumbai\n");
    let catalog = load(&write_file(&dir, "cars.csv", &contents)).unwrap();

    assert_eq!(catalog.report().total_rows, 3);
    assert_eq!(catalog.report().admitted, 2);
    assert_eq!(catalog.len(), catalog.report().total_rows - 1);

    let engine = QueryEngine::new(Arc::new(catalog), DEFAULT_LIMIT);
    let everything = FilterSpec::new(f64::MAX).unwrap();
    assert!(makes(&engine, &everything).iter().all(|m| m != "Kia"));
}

#[test]
fn unparsable_budget_is_rejected() {
    let params = RecommendParams {
        budget: Some("abc".into()),
        ..RecommendParams::default()
    };
    assert!(matches!(
        params.into_filter(DEFAULT_MAX_PRICE),
        Err(QueryError::InvalidParameter { parameter: "budget", .. })
    ));
}

#[test]
fn catalog_holds_conversion_invariant() {
    let dir = TempDir::new().unwrap();
    let contents = format!(
        "{CARS_TSV}Tata\tNexon\t2021.0\tDiesel\t812345.67\t15555.55\tPune\n"
    );
    let catalog = load(&write_file(&dir, "cars.csv", &contents)).unwrap();
    let conv = Conversion::default();
    assert_eq!(catalog.len(), 3);
    for listing in catalog.listings() {
        assert_eq!(
            listing.price_converted,
            round_to(listing.source_price * conv.price_factor, 2)
        );
        assert_eq!(
            listing.distance_converted,
            round_to(listing.source_distance * conv.distance_factor, 1)
        );
    }
}

#[test]
fn missing_required_column_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cars.csv",
        "make,model,yr_mfr,fuel_type,kms_run\nHonda,City,2018,Petrol,100\n",
    );
    assert!(matches!(
        load(&path),
        Err(DataLoadError::MissingColumn { .. })
    ));
}

#[test]
fn json_records_load_like_text() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cars.json",
        r#"[
            {"make": "Honda", "model": "City", "yr_mfr": 2018, "fuel_type": "Petrol",
             "sale_price": 333333, "kms_run": 32187},
            {"make": "Toyota", "model": "Etios", "yr_mfr": 2020, "fuel_type": "Petrol",
             "sale_price": "375000", "kms_run": 48280},
            {"make": "Kia", "model": "Seltos", "yr_mfr": 2023, "fuel_type": "Petrol",
             "sale_price": null, "kms_run": 100}
        ]"#,
    );
    let engine = engine(&path);
    assert_eq!(engine.catalog().report().dropped(), 1);
    assert_eq!(
        makes(&engine, &FilterSpec::new(5000.0).unwrap()),
        ["Toyota", "Honda"]
    );
}

#[test]
fn parquet_listings_load_with_nulls_dropped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cars.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Make", DataType::Utf8, false),
        Field::new("Model", DataType::Utf8, false),
        Field::new("yr_mfr", DataType::Int64, true),
        Field::new("fuel_type", DataType::Utf8, false),
        Field::new("sale_price", DataType::Float64, true),
        Field::new("kms_run", DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["Honda", "Toyota", "Kia"])),
            Arc::new(StringArray::from(vec!["City", "Etios", "Seltos"])),
            Arc::new(Int64Array::from(vec![Some(2018), Some(2020), None])),
            Arc::new(StringArray::from(vec!["Petrol", "Petrol", "Petrol"])),
            Arc::new(Float64Array::from(vec![Some(333333.0), Some(375000.0), Some(1.0)])),
            Arc::new(Float64Array::from(vec![Some(32187.0), Some(48280.0), Some(1.0)])),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let engine = engine(&path);
    assert_eq!(engine.catalog().report().admitted, 2);
    let result = engine.recommend(&FilterSpec::new(5000.0).unwrap());
    assert_eq!(result[0].model, "Etios");
    assert_eq!(result[1].price_converted, 4000.0);
}

#[test]
fn ties_keep_file_order_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cars.csv",
        "make,model,yr_mfr,fuel_type,sale_price,kms_run\n\
         Alpha,a,2019,Petrol,300000,1000\n\
         Beta,b,2019,Petrol,200000,1000\n\
         Gamma,c,2019,Petrol,100000,1000\n",
    );
    let engine = engine(&path);
    let spec = FilterSpec::new(5000.0).unwrap();
    assert_eq!(makes(&engine, &spec), ["Alpha", "Beta", "Gamma"]);
    assert_eq!(makes(&engine, &spec), makes(&engine, &spec));
}
