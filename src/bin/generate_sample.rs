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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One flat measurement table: a numeric day index, two noisy readings
/// (humidity has occasional gaps), and a text station column.
struct SampleTable {
    days: Vec<i64>,
    temperatures: Vec<f64>,
    humidity: Vec<Option<f64>>,
    stations: Vec<&'static str>,
}

fn generate_table(n_days: i64, rng: &mut SimpleRng) -> SampleTable {
    let station_names = ["north", "south", "east"];

    let mut table = SampleTable {
        days: Vec::new(),
        temperatures: Vec::new(),
        humidity: Vec::new(),
        stations: Vec::new(),
    };

    for day in 1..=n_days {
        for (i, station) in station_names.iter().enumerate() {
            let season = (day as f64 / 365.0 * std::f64::consts::TAU).sin();
            let temperature = 12.0 + 9.0 * season + i as f64 * 0.7 + rng.gauss(0.0, 1.2);
            // ~4% of humidity readings are missing.
            let humidity = if rng.next_f64() < 0.04 {
                None
            } else {
                Some((60.0 - 20.0 * season + rng.gauss(0.0, 6.0)).clamp(5.0, 100.0))
            };

            table.days.push(day);
            table.temperatures.push(temperature);
            table.humidity.push(humidity);
            table.stations.push(station);
        }
    }

    table
}

fn write_csv(path: &str, table: &SampleTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["day", "temperature", "humidity", "station"])?;
    for i in 0..table.days.len() {
        writer.write_record([
            table.days[i].to_string(),
            format!("{:.2}", table.temperatures[i]),
            table.humidity[i]
                .map(|h| format!("{h:.1}"))
                .unwrap_or_default(),
            table.stations[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &str, table: &SampleTable) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("day", DataType::Int64, false),
        Field::new("temperature", DataType::Float64, false),
        Field::new("humidity", DataType::Float64, true),
        Field::new("station", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(table.days.clone())),
            Arc::new(Float64Array::from(table.temperatures.clone())),
            Arc::new(Float64Array::from(table.humidity.clone())),
            Arc::new(StringArray::from(table.stations.clone())),
        ],
    )
    .context("creating record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet file")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(7);
    let table = generate_table(120, &mut rng);

    write_csv("sample_data.csv", &table)?;
    write_parquet("sample_data.parquet", &table)?;

    println!(
        "Wrote {} rows to sample_data.csv and sample_data.parquet",
        table.days.len()
    );
    Ok(())
}
