//! Write a synthetic training metrics log for trying out `loss-plot`.
//!
//! Usage: `generate_sample [OUT] [EPOCHS]`

use anyhow::{bail, Context, Result};
use serde::Serialize;

/// One CSV row. `None` serializes as an empty field.
#[derive(Serialize)]
struct MetricsRecord {
    epoch: u32,
    fitting_loss: Option<f64>,
    val_loss: Option<f64>,
    lr: f64,
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

/// Loss decaying from `start` towards `floor`, with multiplicative noise.
fn decayed(start: f64, floor: f64, rate: f64, epoch: u32, noise: f64, rng: &mut SimpleRng) -> f64 {
    let clean = floor + (start - floor) * (-rate * epoch as f64).exp();
    (clean * (1.0 + rng.gauss(0.0, noise))).max(floor * 0.5)
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_metrics.csv".to_string());
    let epochs: u32 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("EPOCHS must be a number, got '{n}'"))?,
        None => 50,
    };
    if epochs == 0 {
        bail!("EPOCHS must be at least 1");
    }

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    for epoch in 0..epochs {
        // Epoch 0 only has the baseline validation pass, before any fitting.
        let fitting_loss = if epoch == 0 || rng.next_f64() < 0.05 {
            None
        } else {
            Some(decayed(2.3, 0.15, 0.08, epoch, 0.03, &mut rng))
        };
        // Validation runs on even epochs.
        let val_loss = if epoch % 2 == 0 {
            Some(decayed(2.4, 0.25, 0.06, epoch, 0.02, &mut rng))
        } else {
            None
        };
        let lr = 3e-4 * 0.5 * (1.0 + (std::f64::consts::PI * epoch as f64 / epochs as f64).cos());

        writer
            .serialize(MetricsRecord {
                epoch,
                fitting_loss,
                val_loss,
                lr,
            })
            .with_context(|| format!("writing epoch {epoch}"))?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {epochs} epochs of metrics to {output_path}");
    Ok(())
}
