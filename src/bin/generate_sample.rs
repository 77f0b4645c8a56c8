use std::path::PathBuf;

use anyhow::Result;
use soil_breakdown::data::model::{CellValue, Dataset, Sample};
use soil_breakdown::data::writer::write_file;
use soil_breakdown::pipeline::columns::{
    CONCENTRATION_FINAL, CONCENTRATION_INITIAL, SOIL_MOISTURE,
};

/// First-order decay over the incubation, faster near the optimal moisture.
fn final_concentration(initial: f64, moisture: f64, days: f64, noise: &mut FieldNoise) -> f64 {
    let optimum = 30.0;
    let k = 0.02 * (-(moisture - optimum).powi(2) / (2.0 * 15.0_f64.powi(2))).exp();
    let noisy = initial * (-k * days).exp() + noise.normal(0.0, 0.02 * initial);
    noisy.max(0.0)
}

/// SplitMix64; enough for reproducible field noise.
struct FieldNoise(u64);

impl FieldNoise {
    fn seeded(seed: u64) -> Self {
        FieldNoise(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }

    /// Normal deviate from the sum of twelve uniforms (Irwin-Hall).
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform(0.0, 1.0)).sum();
        mean + std_dev * (sum - 6.0)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/experiment.csv"));

    let mut noise = FieldNoise::seeded(42);

    let plots = ["P1", "P2", "P3", "P4"];
    let pahs = ["naphthalene", "phenanthrene", "pyrene"];
    let moisture_levels = [10.0, 20.0, 30.0, 40.0, 50.0];
    let incubation_days = 28.0;

    let columns = vec![
        "sample_id".to_string(),
        "plot".to_string(),
        "pah".to_string(),
        CONCENTRATION_INITIAL.to_string(),
        CONCENTRATION_FINAL.to_string(),
        SOIL_MOISTURE.to_string(),
    ];

    let mut samples = Vec::new();
    let mut sample_id: i64 = 0;
    for plot in &plots {
        for pah in &pahs {
            for &moisture in &moisture_levels {
                let initial = round2(noise.uniform(80.0, 120.0));
                let measured_moisture = round2(noise.normal(moisture, 1.0));
                let final_ = round2(final_concentration(
                    initial,
                    measured_moisture,
                    incubation_days,
                    &mut noise,
                ));

                samples.push(Sample::new(vec![
                    CellValue::Integer(sample_id),
                    CellValue::String(plot.to_string()),
                    CellValue::String(pah.to_string()),
                    CellValue::Float(initial),
                    CellValue::Float(final_),
                    CellValue::Float(measured_moisture),
                ]));
                sample_id += 1;
            }
        }
    }

    let dataset = Dataset::new(columns, samples);
    write_file(&dataset, &output_path)?;

    println!(
        "Wrote {} samples ({} plots x {} PAHs x {} moisture levels) to {}",
        dataset.len(),
        plots.len(),
        pahs.len(),
        moisture_levels.len(),
        output_path.display()
    );
    Ok(())
}
