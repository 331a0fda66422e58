//! Writes a synthetic TB burden CSV with the same columns as the WHO export,
//! so the dashboard can run without the real dataset.
//!
//! Usage: `generate_sample [OUTPUT]` (default `data/TB_Burden_Country.csv`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Row<'a> {
    #[serde(rename = "Country or territory name")]
    country: &'a str,
    #[serde(rename = "ISO 3-character country/territory code")]
    iso3: &'a str,
    #[serde(rename = "Region")]
    region: &'a str,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Estimated prevalence of TB (all forms) per 100 000 population")]
    prevalence: Option<f64>,
    #[serde(
        rename = "Estimated mortality of TB cases (all forms, excluding HIV) per 100 000 population"
    )]
    mortality: Option<f64>,
    #[serde(rename = "Estimated incidence (all forms) per 100 000 population")]
    incidence: Option<f64>,
}

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

/// (country, ISO3, region, prevalence in 1990, yearly decline)
const COUNTRIES: &[(&str, &str, &str, f64, f64)] = &[
    ("Afghanistan", "AFG", "EMR", 327.0, 0.010),
    ("India", "IND", "SEA", 465.0, 0.025),
    ("China", "CHN", "WPR", 215.0, 0.040),
    ("South Africa", "ZAF", "AFR", 301.0, -0.030),
    ("Cambodia", "KHM", "WPR", 1670.0, 0.035),
    ("Brazil", "BRA", "AMR", 127.0, 0.045),
    ("France", "FRA", "EUR", 24.0, 0.035),
    ("Germany", "DEU", "EUR", 20.0, 0.045),
    ("Romania", "ROU", "EUR", 147.0, 0.010),
    ("Russian Federation", "RUS", "EUR", 97.0, -0.005),
    ("Albania", "ALB", "EUR", 42.0, 0.030),
    ("Pakistan", "PAK", "EMR", 432.0, 0.005),
    ("Nigeria", "NGA", "AFR", 290.0, -0.010),
    ("Philippines", "PHL", "WPR", 1000.0, 0.030),
    ("Indonesia", "IDN", "SEA", 443.0, 0.040),
    ("Peru", "PER", "AMR", 394.0, 0.055),
];

const FIRST_YEAR: i32 = 1990;
const LAST_YEAR: i32 = 2013;

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/TB_Burden_Country.csv"));
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;

    let mut rows = 0;
    for year in FIRST_YEAR..=LAST_YEAR {
        for &(country, iso3, region, base, decline) in COUNTRIES {
            let t = (year - FIRST_YEAR) as f64;
            let trend = base * (1.0 - decline).powf(t);
            let prevalence = (trend * (1.0 + rng.gauss(0.0, 0.03))).max(0.0);
            let incidence = prevalence * rng.gauss(0.6, 0.05).clamp(0.3, 0.9);
            let mortality = prevalence * rng.gauss(0.1, 0.02).clamp(0.02, 0.3);

            // Roughly 2% of mortality estimates are left blank.
            let mortality = (rng.next_f64() > 0.02).then_some(round1(mortality));

            writer
                .serialize(Row {
                    country,
                    iso3,
                    region,
                    year,
                    prevalence: Some(round1(prevalence)),
                    mortality,
                    incidence: Some(round1(incidence)),
                })
                .context("writing CSV row")?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} rows ({} countries, {FIRST_YEAR}-{LAST_YEAR}) to {}",
        COUNTRIES.len(),
        output.display()
    );
    Ok(())
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
