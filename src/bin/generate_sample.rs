use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const STATIONS: [&str; 3] = ["Alpha", "Bravo", "Charlie"];

/// Daily sales over 60 days: `date,region,sales`.
fn write_sales(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["date", "region", "sales"])?;

    // January and February 2024.
    let days = 60;
    for day in 0..days {
        let (month, dom) = if day < 31 { (1, day + 1) } else { (2, day - 30) };
        let date = format!("2024-{month:02}-{dom:02}");
        let region = rng.pick(&REGIONS);
        let trend = 100.0 + day as f64 * 1.5;
        let sales = (trend + rng.gauss(0.0, 12.0)).max(0.0);
        writer.write_record([date, region.to_string(), format!("{sales:.2}")])?;
    }
    writer.flush()?;
    Ok(days as usize)
}

/// A 12 x 10 surface sampled on a regular grid: `x,y,z`.
fn write_grid(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["x", "y", "z"])?;

    let mut rows = 0;
    for ix in 0..12 {
        for iy in 0..10 {
            let (x, y) = (ix as f64 * 0.5, iy as f64 * 0.5);
            let z = (x - 3.0).cos() * (y - 2.5).sin() + 0.3 * (-(x * x + y * y) / 20.0).exp()
                + rng.gauss(0.0, 0.02);
            writer.write_record([format!("{x}"), format!("{y}"), format!("{z:.4}")])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

/// Sensor readings with one column per scalar type.
fn write_measurements(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let n = 90;
    let mut ids = Vec::with_capacity(n);
    let mut stations = Vec::with_capacity(n);
    let mut temperature = Vec::with_capacity(n);
    let mut humidity = Vec::with_capacity(n);
    let mut valid = Vec::with_capacity(n);

    for i in 0..n {
        let station = rng.pick(&STATIONS);
        let offset = match station {
            "Alpha" => 0.0,
            "Bravo" => 3.5,
            _ => -2.0,
        };
        let t = 18.0 + offset + rng.gauss(0.0, 1.8);
        ids.push(i as i64);
        stations.push(station);
        temperature.push(t);
        humidity.push((65.0 - 1.2 * (t - 18.0) + rng.gauss(0.0, 4.0)).clamp(0.0, 100.0));
        valid.push(rng.next_f64() > 0.05);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("reading_id", DataType::Int64, false),
        Field::new("station", DataType::Utf8, false),
        Field::new("temperature", DataType::Float64, false),
        Field::new("humidity", DataType::Float64, false),
        Field::new("valid", DataType::Boolean, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(stations)),
            Arc::new(Float64Array::from(temperature)),
            Arc::new(Float64Array::from(humidity)),
            Arc::new(BooleanArray::from(valid)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(n)
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let path = out_dir.join("sample.csv");
    let rows = write_sales(&path, &mut rng)?;
    println!("Wrote {rows} rows to {}", path.display());

    let path = out_dir.join("grid.csv");
    let rows = write_grid(&path, &mut rng)?;
    println!("Wrote {rows} rows to {}", path.display());

    let path = out_dir.join("measurements.parquet");
    let rows = write_measurements(&path, &mut rng)?;
    println!("Wrote {rows} rows to {}", path.display());

    Ok(())
}
