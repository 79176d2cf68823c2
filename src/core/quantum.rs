//! A tiny phase simulator that stands in for a qubit.
//!
//! The state is a single phase angle on `[0, 2π)`. Gates rotate it and a
//! measurement maps it to a probability. Everything is a pure function of the
//! tile coordinates, so the "quantum" forest needs no seed at all.

use crate::domain::model::TerrainElement;
use std::f64::consts::{FRAC_PI_4, TAU};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantumState {
    phase: f64,
}

impl QuantumState {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            phase: (x * 0.1234 + y * 0.4321 + (x * 0.1).sin() * (y * 0.1).cos()).rem_euclid(TAU),
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Puts the state into "superposition": a fixed π/4 phase kick.
    pub fn hadamard(&mut self) {
        self.phase = (self.phase + FRAC_PI_4).rem_euclid(TAU);
    }

    pub fn rotate(&mut self, angle: f64) {
        self.phase = (self.phase + angle).rem_euclid(TAU);
    }

    /// Probability in `[0, 1]`.
    pub fn measure(&self) -> f64 {
        (self.phase.cos() + 1.0) / 2.0
    }
}

/// Combined density/variation signal for a tile, in `[0, 1]`.
#[allow(clippy::approx_constant)]
pub fn quantum_signal(tile_x: i64, tile_y: i64) -> f64 {
    let (x, y) = (tile_x as f64, tile_y as f64);

    let mut q = QuantumState::new(x, y);
    q.hadamard();
    q.rotate((x * 0.314 + y * 0.271 + (x * 0.05).sin() * 3.14).rem_euclid(TAU));
    q.hadamard();
    q.rotate((x * y * 0.001).rem_euclid(TAU));
    let density = q.measure();

    let mut q2 = QuantumState::new(y, x);
    q2.hadamard();
    q2.rotate(x * 0.1);
    let variation = q2.measure();

    (density + variation * 0.5) / 1.5
}

pub fn quantum_terrain(tile_x: i64, tile_y: i64) -> Option<TerrainElement> {
    classify(quantum_signal(tile_x, tile_y), tile_x, tile_y)
}

fn classify(combined: f64, tile_x: i64, tile_y: i64) -> Option<TerrainElement> {
    if combined < 0.65 {
        None
    } else if combined < 0.68 {
        Some(TerrainElement::TreeThinFall)
    } else if combined < 0.70 {
        Some(TerrainElement::TreeDefaultFall)
    } else if combined < 0.72 {
        Some(TerrainElement::TreeOakFall)
    } else if combined < 0.75 {
        Some(TerrainElement::StoneLarge)
    } else if combined < 0.77 {
        Some(TerrainElement::Log)
    } else if (tile_x.rem_euclid(3) + tile_y.rem_euclid(3)) % 3 == 0 {
        Some(TerrainElement::StoneTall)
    } else {
        Some(TerrainElement::BushSmall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_initial_phase_at_origin_is_zero() {
        let q = QuantumState::new(0.0, 0.0);
        assert!(q.phase().abs() < EPS);
        assert!((q.measure() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_phase_stays_in_range_for_negative_coordinates() {
        let q = QuantumState::new(-37.0, -4.0);
        assert!(q.phase() >= 0.0 && q.phase() < TAU);

        let mut q = QuantumState::new(0.0, 0.0);
        q.rotate(-1.0);
        assert!((q.phase() - (TAU - 1.0)).abs() < EPS);
    }

    #[test]
    fn test_eight_hadamards_return_to_start() {
        let mut q = QuantumState::new(3.0, 7.0);
        let start = q.phase();
        for _ in 0..8 {
            q.hadamard();
        }
        assert!((q.phase() - start).abs() < 1e-9);
    }

    #[test]
    fn test_measure_of_opposite_phase_is_zero() {
        let mut q = QuantumState::new(0.0, 0.0);
        q.rotate(std::f64::consts::PI);
        assert!(q.measure().abs() < EPS);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(0.64, 0, 0), None);
        assert_eq!(classify(0.65, 0, 0), Some(TerrainElement::TreeThinFall));
        assert_eq!(classify(0.69, 0, 0), Some(TerrainElement::TreeDefaultFall));
        assert_eq!(classify(0.71, 0, 0), Some(TerrainElement::TreeOakFall));
        assert_eq!(classify(0.74, 0, 0), Some(TerrainElement::StoneLarge));
        assert_eq!(classify(0.76, 0, 0), Some(TerrainElement::Log));
        assert_eq!(classify(0.9, 1, 2), Some(TerrainElement::StoneTall));
        assert_eq!(classify(0.9, 1, 1), Some(TerrainElement::BushSmall));
        assert_eq!(classify(0.9, -1, -2), Some(TerrainElement::StoneTall));
        assert_eq!(classify(0.9, -1, -1), Some(TerrainElement::BushSmall));
    }

    #[test]
    fn test_classify_extreme_tiles() {
        // i64::MAX ≡ 1 and i64::MIN ≡ 1 (mod 3)
        assert_eq!(classify(0.9, i64::MAX, 2), Some(TerrainElement::StoneTall));
        assert_eq!(classify(0.9, i64::MAX, i64::MIN), Some(TerrainElement::BushSmall));
    }

    #[test]
    fn test_signal_is_a_probability_and_deterministic() {
        for x in -30..30 {
            for y in -30..30 {
                let s = quantum_signal(x, y);
                assert!((0.0..=1.0).contains(&s));
                assert_eq!(s, quantum_signal(x, y));
                assert_eq!(quantum_terrain(x, y), quantum_terrain(x, y));
            }
        }
    }

    #[test]
    fn test_forest_has_both_clearings_and_obstacles() {
        let mut empty = 0;
        let mut filled = 0;
        for x in 0..64 {
            for y in 0..64 {
                match quantum_terrain(x, y) {
                    None => empty += 1,
                    Some(_) => filled += 1,
                }
            }
        }
        assert!(empty > 0);
        assert!(filled > 0);
    }
}
