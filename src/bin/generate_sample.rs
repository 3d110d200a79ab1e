use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// (city, country, base wifi Mbps, base monthly rent, base sunshine hours)
const CITIES: [(&str, &str, f64, f64, f64); 24] = [
    ("Lisbon", "Portugal", 40.0, 1300.0, 2800.0),
    ("Porto", "Portugal", 35.0, 950.0, 2500.0),
    ("Madrid", "Spain", 55.0, 1400.0, 2750.0),
    ("Valencia", "Spain", 50.0, 900.0, 2700.0),
    ("Berlin", "Germany", 60.0, 1500.0, 1600.0),
    ("Paris", "France", 65.0, 2000.0, 1650.0),
    ("Bangkok", "Thailand", 30.0, 600.0, 2600.0),
    ("Chiang Mai", "Thailand", 25.0, 400.0, 2500.0),
    ("Goa", "India", 15.0, 300.0, 2900.0),
    ("Bangalore", "India", 20.0, 450.0, 2450.0),
    ("Hanoi", "Vietnam", 30.0, 500.0, 1600.0),
    ("Da Nang", "Vietnam", 28.0, 420.0, 2200.0),
    ("Bali", "Indonesia", 18.0, 700.0, 2650.0),
    ("Buenos Aires", "Argentina", 22.0, 550.0, 2500.0),
    ("Medellin", "Colombia", 25.0, 600.0, 2000.0),
    ("Florianopolis", "Brazil", 30.0, 650.0, 2200.0),
    ("Sao Paulo", "Brazil", 35.0, 900.0, 1900.0),
    ("Austin", "USA", 90.0, 1900.0, 2650.0),
    ("San Diego", "USA", 85.0, 2400.0, 3050.0),
    ("Mexico City", "Mexico", 30.0, 800.0, 2550.0),
    ("Oaxaca", "Mexico", 15.0, 450.0, 2700.0),
    ("Cape Town", "South Africa", 25.0, 800.0, 3100.0),
    ("Tbilisi", "Georgia", 25.0, 500.0, 2200.0),
    ("Tallinn", "Estonia", 70.0, 900.0, 1800.0),
];

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

    /// Uniform jitter of `value` by up to ±`fraction`.
    fn jitter(&mut self, value: f64, fraction: f64) -> f64 {
        value * (1.0 + fraction * (2.0 * self.next_f64() - 1.0))
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (value * p).round() / p
}

struct Columns {
    ranking: Vec<i64>,
    city: Vec<String>,
    country: Vec<String>,
    numeric: Vec<(&'static str, Vec<f64>)>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let names = [
        "WiFi Speed",
        "Rent",
        "Sunshine Hours",
        "Coworking Spaces",
        "Instagram Photos",
        "Things To Do",
        "Meal Price",
        "Coffee Price",
        "Beer Price",
        "Taxi Price",
    ];
    let mut numeric: Vec<(&'static str, Vec<f64>)> =
        names.iter().map(|n| (*n, Vec::new())).collect();

    for &(_, _, wifi, rent, sunshine) in &CITIES {
        let price_level = rent / 1000.0;
        let values = [
            rng.jitter(wifi, 0.15).round(),
            rng.jitter(rent, 0.1).round(),
            rng.jitter(sunshine, 0.05).round(),
            (rng.next_f64() * 80.0).round() + 1.0,
            (rng.jitter(price_level, 0.8) * 2_000_000.0).round(),
            (rng.next_f64() * 1500.0).round() + 10.0,
            round_to(rng.jitter(8.0 * price_level + 2.0, 0.2), 2),
            round_to(rng.jitter(2.0 * price_level + 0.8, 0.2), 2),
            round_to(rng.jitter(3.0 * price_level + 1.0, 0.2), 2),
            round_to(rng.jitter(6.0 * price_level + 1.5, 0.2), 2),
        ];
        for ((_, col), v) in numeric.iter_mut().zip(values) {
            col.push(v);
        }
    }

    Columns {
        ranking: (1..=CITIES.len() as i64).collect(),
        city: CITIES.iter().map(|c| c.0.to_string()).collect(),
        country: CITIES.iter().map(|c| c.1.to_string()).collect(),
        numeric,
    }
}

fn write_csv(columns: &Columns, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    let mut header = vec!["Ranking", "City", "Country"];
    header.extend(columns.numeric.iter().map(|(n, _)| *n));
    writer.write_record(&header)?;

    for row in 0..columns.city.len() {
        let mut record = vec![
            columns.ranking[row].to_string(),
            columns.city[row].clone(),
            columns.country[row].clone(),
        ];
        record.extend(columns.numeric.iter().map(|(_, col)| col[row].to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(columns: &Columns, path: &Path) -> Result<()> {
    let mut fields = vec![
        Field::new("Ranking", DataType::Int64, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
    ];
    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(columns.ranking.clone())),
        Arc::new(StringArray::from(columns.city.clone())),
        Arc::new(StringArray::from(columns.country.clone())),
    ];
    for (name, values) in &columns.numeric {
        fields.push(Field::new(*name, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let columns = generate(&mut rng);

    let dir = Path::new("Dataset");
    std::fs::create_dir_all(dir).context("creating Dataset/")?;

    let csv_path = dir.join("workation_cleaned.csv");
    write_csv(&columns, &csv_path)?;
    let parquet_path = dir.join("workation_cleaned.parquet");
    write_parquet(&columns, &parquet_path)?;

    println!(
        "Wrote {} cities to {} and {}",
        columns.city.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
