//! Synthetic dynamometer cards.
//!
//! Each template is a four-sided figure in unit card space, traced clockwise
//! from its lower-left vertex. The generator walks it `cycles` times with an
//! angle column that restarts at 0 every stroke, then scales to a stroke
//! length and load range and optionally adds Gaussian noise.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CardHeader, CardTemplate, DemoConfig, RawSample};
use crate::error::AppError;

/// Most samples per side that still leave one whole degree per sample.
pub const MAX_SAMPLES_PER_SIDE: usize = 90;

/// Flowing-well cards are drawn at this fraction of the normal load range.
const FLOWING_LOAD_SCALE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct SampleCard {
    pub header: CardHeader,
    pub samples: Vec<RawSample>,
}

/// Vertices of a template, lower-left first, clockwise.
pub fn template_vertices(template: CardTemplate) -> [(f64, f64); 4] {
    match template {
        CardTemplate::FullPump | CardTemplate::FlowingWell => [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
        // Both sides lean: the tubing stretches before the plunger moves.
        CardTemplate::TubingMovement => [(0.0, 0.0), (0.3, 1.0), (1.0, 1.0), (0.7, 0.0)],
        CardTemplate::WornPlunger => [(0.0, 0.0), (0.2, 1.0), (0.8, 1.0), (1.0, 0.0)],
        CardTemplate::WornOrSplitBarrel => [(0.0, 0.0), (0.0, 1.0), (1.0, 0.6), (0.8, 0.0)],
    }
}

pub fn generate_card(config: &DemoConfig) -> Result<SampleCard, AppError> {
    let k = config.samples_per_side;
    if !(2..=MAX_SAMPLES_PER_SIDE).contains(&k) {
        return Err(AppError::new(
            2,
            format!("Samples per side must be between 2 and {MAX_SAMPLES_PER_SIDE}."),
        ));
    }
    if config.cycles == 0 {
        return Err(AppError::new(2, "Cycle count must be > 0."));
    }
    if !(config.stroke_length.is_finite() && config.stroke_length > 0.0) {
        return Err(AppError::new(2, "Stroke length must be finite and > 0."));
    }
    if !(config.min_load.is_finite() && config.max_load.is_finite() && config.max_load > config.min_load) {
        return Err(AppError::new(2, "Invalid load range for sample generation."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let load_scale = match config.template {
        CardTemplate::FlowingWell => FLOWING_LOAD_SCALE,
        _ => 1.0,
    };
    let load_range = config.max_load - config.min_load;
    let vertices = template_vertices(config.template);
    let n = 4 * k;

    let mut to_sample = |angle: i32, (x, y): (f64, f64)| {
        let mut displacement = x * config.stroke_length;
        let mut load = config.min_load + y * load_range;
        if config.noise > 0.0 {
            displacement += config.noise * config.stroke_length * normal.sample(&mut rng);
            load += config.noise * load_range * normal.sample(&mut rng);
        }
        RawSample::new(angle, displacement, load * load_scale)
    };

    let mut samples = Vec::with_capacity(config.cycles * n + 1);
    for _ in 0..config.cycles {
        for i in 0..n {
            let angle = (i as f64 * 360.0 / n as f64).round() as i32;
            samples.push(to_sample(angle, point_on_loop(&vertices, k, i)));
        }
    }
    // Close the last stroke.
    samples.push(to_sample(0, vertices[0]));

    Ok(SampleCard {
        header: CardHeader {
            well_id: Some(format!("demo-{}", template_slug(config.template))),
            timestamp: None,
            device_serial: None,
            sensor_serial: Some(format!("seed-{}", config.seed)),
        },
        samples,
    })
}

/// `i`-th of `4k` evenly spaced points along the loop, `k` per side.
fn point_on_loop(vertices: &[(f64, f64); 4], k: usize, i: usize) -> (f64, f64) {
    let (side, j) = (i / k, i % k);
    let (x0, y0) = vertices[side];
    let (x1, y1) = vertices[(side + 1) % 4];
    let t = j as f64 / k as f64;
    (x0 + t * (x1 - x0), y0 + t * (y1 - y0))
}

fn template_slug(template: CardTemplate) -> &'static str {
    match template {
        CardTemplate::FullPump => "full-pump",
        CardTemplate::TubingMovement => "tubing-movement",
        CardTemplate::WornPlunger => "worn-plunger",
        CardTemplate::WornOrSplitBarrel => "worn-or-split-barrel",
        CardTemplate::FlowingWell => "flowing-well",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{extract_cycle, select_shape};

    fn config(template: CardTemplate) -> DemoConfig {
        DemoConfig {
            template,
            ..DemoConfig::default()
        }
    }

    #[test]
    fn every_template_classifies_as_drawn() {
        let templates = [
            CardTemplate::FullPump,
            CardTemplate::TubingMovement,
            CardTemplate::WornPlunger,
            CardTemplate::WornOrSplitBarrel,
            CardTemplate::FlowingWell,
        ];
        for template in templates {
            for k in [3, 6, 12, 20] {
                let cfg = DemoConfig {
                    samples_per_side: k,
                    ..config(template)
                };
                let card = generate_card(&cfg).unwrap();
                let shape = select_shape(&card.samples, cfg.min_load).unwrap();
                assert_eq!(shape, template.expected_shape(), "{template:?} with k={k}");
            }
        }
    }

    #[test]
    fn angles_restart_every_stroke() {
        let cfg = DemoConfig {
            samples_per_side: 6,
            cycles: 3,
            ..config(CardTemplate::WornPlunger)
        };
        let card = generate_card(&cfg).unwrap();
        assert_eq!(card.samples.len(), 3 * 24 + 1);

        let zeros = card.samples.iter().filter(|s| s.angle == 0).count();
        assert_eq!(zeros, 4);
        assert_eq!(card.samples[1].angle, 15);
        assert_eq!(extract_cycle(&card.samples).len(), 25);
    }

    #[test]
    fn scales_to_stroke_and_load_range() {
        let card = generate_card(&config(CardTemplate::FullPump)).unwrap();
        let max_x = card.samples.iter().map(|s| s.displacement).fold(f64::MIN, f64::max);
        let loads: Vec<f64> = card.samples.iter().map(|s| s.load).collect();
        assert_eq!(max_x, 100.0);
        assert_eq!(loads.iter().copied().fold(f64::MAX, f64::min), 4_000.0);
        assert_eq!(loads.iter().copied().fold(f64::MIN, f64::max), 12_000.0);

        let flowing = generate_card(&config(CardTemplate::FlowingWell)).unwrap();
        assert!(flowing.samples.iter().all(|s| s.load <= 1_200.0 + 1e-9));
    }

    #[test]
    fn noise_is_reproducible_per_seed() {
        let noisy = DemoConfig {
            noise: 0.01,
            ..config(CardTemplate::FullPump)
        };
        let a = generate_card(&noisy).unwrap();
        let b = generate_card(&noisy).unwrap();
        assert_eq!(a.samples, b.samples);

        let c = generate_card(&DemoConfig { seed: 7, ..noisy.clone() }).unwrap();
        assert_ne!(a.samples, c.samples);
        // Angles are never perturbed.
        assert!(a.samples.iter().zip(&c.samples).all(|(x, y)| x.angle == y.angle));
    }

    #[test]
    fn rejects_bad_settings() {
        let too_dense = DemoConfig {
            samples_per_side: MAX_SAMPLES_PER_SIDE + 1,
            ..DemoConfig::default()
        };
        assert_eq!(generate_card(&too_dense).unwrap_err().exit_code(), 2);

        let inverted = DemoConfig {
            min_load: 10.0,
            max_load: 5.0,
            ..DemoConfig::default()
        };
        assert_eq!(generate_card(&inverted).unwrap_err().exit_code(), 2);
    }
}
