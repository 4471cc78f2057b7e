//! # Vibration Response Synthesizer
//!
//! Produces an amplitude / phase curve across a vibration table's frequency
//! band. The package is treated as a set of single-degree-of-freedom modes at
//! fixed natural frequencies; every mode inside the band amplifies the input
//! RMS level and adds its phase lag.
//!
//! For a frequency ratio `r = f / fn` and damping ratio `ζ`:
//!
//! ```text
//! M(r) = 1 / sqrt((1 - r²)² + (2ζr)²)
//! φ(r) = atan2(2ζr, 1 - r²)
//! ```
//!
//! Above 100 Hz the amplitude rolls off by `sqrt(100 / f)`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{SimError, SimResult};
use crate::scenarios::FrequencyBand;

/// Samples across the band
pub const SAMPLE_COUNT: usize = 200;

/// Package resonances (Hz), independent of the band under test
pub const NATURAL_FREQUENCIES_HZ: [f64; 5] = [15.0, 35.0, 85.0, 150.0, 220.0];

/// Modal damping ratio
pub const DAMPING_RATIO: f64 = 0.05;

/// Amplitude gain per unit of magnification
const MODAL_GAIN: f64 = 0.3;
const ROLL_OFF_CORNER_HZ: f64 = 100.0;
const AMPLITUDE_NOISE: f64 = 0.05;
const PHASE_NOISE_DEG: f64 = 5.0;
const AMPLITUDE_FLOOR: f64 = 0.1;

/// Frequency response of the package on the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibrationResponse {
    /// Band the table swept
    pub band: FrequencyBand,
    /// Sample frequencies (Hz)
    pub frequencies: Vec<f64>,
    /// Response amplitude (g), never below 0.1
    pub amplitude: Vec<f64>,
    /// Accumulated phase lag (degrees)
    pub phase_degrees: Vec<f64>,
    /// Natural frequencies the model uses (Hz)
    pub natural_frequencies: Vec<f64>,
}

impl VibrationResponse {
    /// Natural frequencies inside the swept band
    pub fn active_modes(&self) -> Vec<f64> {
        self.natural_frequencies
            .iter()
            .copied()
            .filter(|&fn_hz| self.band.contains(fn_hz))
            .collect()
    }

    /// `(frequency, amplitude)` of the strongest response sample
    pub fn peak(&self) -> (f64, f64) {
        self.frequencies
            .iter()
            .zip(&self.amplitude)
            .fold((0.0, f64::MIN), |best, (&f, &a)| if a > best.1 { (f, a) } else { best })
    }
}

/// Dynamic magnification of a damped single-degree-of-freedom oscillator.
pub fn magnification_factor(frequency_ratio: f64, damping_ratio: f64) -> f64 {
    let r2 = frequency_ratio * frequency_ratio;
    1.0 / ((1.0 - r2).powi(2) + (2.0 * damping_ratio * frequency_ratio).powi(2)).sqrt()
}

/// Phase lag (degrees) of a damped single-degree-of-freedom oscillator.
pub fn phase_lag_degrees(frequency_ratio: f64, damping_ratio: f64) -> f64 {
    (2.0 * damping_ratio * frequency_ratio)
        .atan2(1.0 - frequency_ratio * frequency_ratio)
        .to_degrees()
}

/// Synthesize the response to `g_force_rms` across `band`.
///
/// # Errors
///
/// `InvalidParameter` when `g_force_rms` is not a positive number.
pub fn synthesize_vibration<R: Rng + ?Sized>(
    g_force_rms: f64,
    band: FrequencyBand,
    rng: &mut R,
) -> SimResult<VibrationResponse> {
    if !(g_force_rms.is_finite() && g_force_rms > 0.0) {
        return Err(SimError::invalid_parameter(
            "g_force_rms",
            g_force_rms.to_string(),
            "RMS g-force must be positive",
        ));
    }

    let (f_min, f_max) = band.bounds_hz();
    let step = (f_max - f_min) / (SAMPLE_COUNT - 1) as f64;
    let frequencies: Vec<f64> = (0..SAMPLE_COUNT)
        .map(|i| if i == SAMPLE_COUNT - 1 { f_max } else { f_min + i as f64 * step })
        .collect();

    let active: Vec<f64> = NATURAL_FREQUENCIES_HZ
        .iter()
        .copied()
        .filter(|&fn_hz| band.contains(fn_hz))
        .collect();

    let mut amplitude = Vec::with_capacity(SAMPLE_COUNT);
    let mut phase_degrees = Vec::with_capacity(SAMPLE_COUNT);

    for &f in &frequencies {
        let mut amp = g_force_rms;
        let mut phase = 0.0;

        for &fn_hz in &active {
            let r = f / fn_hz;
            amp *= 1.0 + MODAL_GAIN * magnification_factor(r, DAMPING_RATIO);
            phase += phase_lag_degrees(r, DAMPING_RATIO);
        }

        if f > ROLL_OFF_CORNER_HZ {
            amp *= (ROLL_OFF_CORNER_HZ / f).sqrt();
        }

        amp += rng.gen_range(-AMPLITUDE_NOISE..=AMPLITUDE_NOISE);
        phase += rng.gen_range(-PHASE_NOISE_DEG..=PHASE_NOISE_DEG);

        amplitude.push(amp.max(AMPLITUDE_FLOOR));
        phase_degrees.push(phase);
    }

    log::debug!(
        "vibration {:.2} g over {}: {} active modes",
        g_force_rms,
        band.label(),
        active.len()
    );

    Ok(VibrationResponse {
        band,
        frequencies,
        amplitude,
        phase_degrees,
        natural_frequencies: NATURAL_FREQUENCIES_HZ.to_vec(),
    })
}
