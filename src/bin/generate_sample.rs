use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated row. `None` marks a deliberately broken cell.
struct Row {
    make: &'static str,
    model: &'static str,
    year: Option<i64>,
    fuel: &'static str,
    price: Option<f64>,
    kms: Option<f64>,
    city: &'static str,
}

const MODELS: [(&str, &[&str]); 5] = [
    ("Maruti", &["Swift", "Baleno", "Alto 800"]),
    ("Hyundai", &["i20", "Creta", "Grand i10"]),
    ("Honda", &["City", "Amaze", "Jazz"]),
    ("Toyota", &["Innova", "Etios", "Corolla Altis"]),
    ("Tata", &["Nexon", "Tiago", "Harrier"]),
];
const FUELS: [&str; 4] = ["Petrol", "Diesel", "CNG", "Electric"];
const CITIES: [&str; 4] = ["Mumbai", "Delhi", "Pune", "Bengaluru"];

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let (make, models) = MODELS[i % MODELS.len()];
            let year = 2008 + (rng.next_u64() % 16) as i64;
            let age = (2024 - year) as f64;
            // Every 17th row is noise in one of the required fields.
            let broken = if i % 17 == 16 { i % 3 } else { usize::MAX };
            Row {
                make,
                model: rng.pick(models),
                year: (broken != 0).then_some(year),
                fuel: rng.pick(&FUELS),
                price: (broken != 1)
                    .then(|| (rng.range(900_000.0, 1_400_000.0) * (1.0 - age * 0.05)).round()),
                kms: (broken != 2).then(|| (age * rng.range(6_000.0, 14_000.0)).round()),
                city: rng.pick(&CITIES),
            }
        })
        .collect()
}

fn write_tsv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {path}"))?;
    writer.write_record(["make", "model", "yr_mfr", "fuel_type", "sale_price", "kms_run", "city"])?;
    for row in rows {
        writer.write_record([
            row.make.to_string(),
            row.model.to_string(),
            row.year.map_or_else(|| "n/a".to_string(), |y| y.to_string()),
            row.fuel.to_string(),
            row.price.map_or_else(|| "call for price".to_string(), |p| p.to_string()),
            row.kms.map_or_else(String::new, |k| k.to_string()),
            row.city.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let strings = |f: fn(&Row) -> &str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("make", DataType::Utf8, false),
        Field::new("model", DataType::Utf8, false),
        Field::new("yr_mfr", DataType::Int64, true),
        Field::new("fuel_type", DataType::Utf8, false),
        Field::new("sale_price", DataType::Float64, true),
        Field::new("kms_run", DataType::Float64, true),
        Field::new("city", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(strings(|r| r.make)),
            Arc::new(strings(|r| r.model)),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(strings(|r| r.fuel)),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.price).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.kms).collect::<Vec<_>>())),
            Arc::new(strings(|r| r.city)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 200);
    let broken = rows
        .iter()
        .filter(|r| r.year.is_none() || r.price.is_none() || r.kms.is_none())
        .count();

    write_tsv(&rows, "sample_cars.tsv")?;
    write_parquet(&rows, "sample_cars.parquet")?;

    println!(
        "Wrote {} listings ({broken} with unusable year/price/distance) to sample_cars.tsv and sample_cars.parquet",
        rows.len()
    );
    Ok(())
}
