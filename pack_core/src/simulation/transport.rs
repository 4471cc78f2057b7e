//! # Transport Dynamics Simulator
//!
//! Generates a distance-indexed trace of truck speed, package g-force, force
//! and road elevation for a trip of a given length and road mix.
//!
//! ## Model
//!
//! The trip is split into a city phase followed by a highway phase at the
//! route's city ratio. Each sample draws a speed from the phase's base speed,
//! scaled by discrete events, plus uniform noise:
//!
//! | Phase   | Event                 | Probability          | Speed factor |
//! |---------|-----------------------|----------------------|--------------|
//! | City    | Traffic light         | 0.15, then stop 0.6  | 0.2          |
//! | City    | Rush hour             | 0.3 (trip ends only) | 0.7          |
//! | Highway | Congestion            | 0.10                 | 0.6          |
//! | Highway | Weather/construction  | 0.05                 | 0.8          |
//!
//! Speeds are clamped to [5, 120] km/h. The g-force adds the longitudinal
//! acceleration between samples, road-surface noise, occasional turning load
//! and an elevation-change term, then clamps to [0.5, 4.5] g. Force is
//! reported for a 1 kg reference mass.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::scenarios::RouteType;
//! use pack_core::simulation::{rng, simulate_transport};
//!
//! let mut rng = rng::seeded(7);
//! let trace = simulate_transport(500, RouteType::PrimarilyHighway, &mut rng).unwrap();
//! assert_eq!(trace.len(), 1000);
//! assert!(trace.max_g_force <= 4.5);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{SimError, SimResult};
use crate::scenarios::RouteType;
use crate::units::{GForce, STANDARD_GRAVITY};

/// Upper bound on trace length
pub const MAX_SAMPLES: usize = 2000;

/// Speed clamp (km/h)
pub const MIN_SPEED_KMH: f64 = 5.0;
pub const MAX_SPEED_KMH: f64 = 120.0;

/// G-force clamp
pub const MIN_G_FORCE: f64 = 0.5;
pub const MAX_G_FORCE: f64 = 4.5;

const TRAFFIC_LIGHT_PROBABILITY: f64 = 0.15;
const TRAFFIC_LIGHT_STOP_PROBABILITY: f64 = 0.6;
const TRAFFIC_LIGHT_FACTOR: f64 = 0.2;
const RUSH_HOUR_PROBABILITY: f64 = 0.3;
const RUSH_HOUR_FACTOR: f64 = 0.7;
const CONGESTION_PROBABILITY: f64 = 0.10;
const CONGESTION_FACTOR: f64 = 0.6;
const WEATHER_PROBABILITY: f64 = 0.05;
const WEATHER_FACTOR: f64 = 0.8;

const ROAD_SURFACE_G: f64 = 0.3;
const TURNING_PROBABILITY: f64 = 0.3;
const TURNING_G: f64 = 0.2;
const ELEVATION_AMPLITUDE_M: f64 = 50.0;
const ELEVATION_NOISE_M: f64 = 20.0;
const ELEVATION_G_PER_M: f64 = 0.001;

/// Reference package mass for the force trace (kg)
const REFERENCE_MASS_KG: f64 = 1.0;

/// Speed envelope of one route type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteProfile {
    /// Share of the trip driven in the city (leading part of the trip)
    pub city_ratio: f64,
    /// Share of the trip driven on highways
    pub highway_ratio: f64,
    /// Base city speed (km/h)
    pub city_speed_kmh: f64,
    /// Base highway speed (km/h)
    pub highway_speed_kmh: f64,
    /// City speed noise half-width (km/h)
    pub city_variation_kmh: f64,
    /// Highway speed noise half-width (km/h)
    pub highway_variation_kmh: f64,
}

impl RouteType {
    /// Speed envelope for this route
    pub fn profile(&self) -> RouteProfile {
        match self {
            RouteType::Mixed => RouteProfile {
                city_ratio: 0.35,
                highway_ratio: 0.65,
                city_speed_kmh: 45.0,
                highway_speed_kmh: 85.0,
                city_variation_kmh: 25.0,
                highway_variation_kmh: 15.0,
            },
            RouteType::PrimarilyCity => RouteProfile {
                city_ratio: 0.80,
                highway_ratio: 0.20,
                city_speed_kmh: 35.0,
                highway_speed_kmh: 65.0,
                city_variation_kmh: 30.0,
                highway_variation_kmh: 10.0,
            },
            RouteType::PrimarilyHighway => RouteProfile {
                city_ratio: 0.15,
                highway_ratio: 0.85,
                city_speed_kmh: 50.0,
                highway_speed_kmh: 90.0,
                city_variation_kmh: 20.0,
                highway_variation_kmh: 20.0,
            },
            RouteType::OffRoadRural => RouteProfile {
                city_ratio: 0.60,
                highway_ratio: 0.40,
                city_speed_kmh: 25.0,
                highway_speed_kmh: 55.0,
                city_variation_kmh: 35.0,
                highway_variation_kmh: 25.0,
            },
        }
    }
}

/// Simulated trip. All sequences are parallel and share one length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportTrace {
    /// Distance travelled at each sample (km)
    pub distance_points: Vec<f64>,
    /// Vehicle speed (km/h)
    pub speeds: Vec<f64>,
    /// Package g-force, clamped to [0.5, 4.5]
    pub g_forces: Vec<f64>,
    /// Force on a 1 kg package (N)
    pub forces: Vec<f64>,
    /// Road elevation offset (m)
    pub elevations: Vec<f64>,
    /// Highest speed reached (km/h)
    pub max_speed: f64,
    /// Highest g-force sample
    pub max_g_force: f64,
    /// Mean speed (km/h)
    pub avg_speed: f64,
    /// Trip duration at mean speed (h)
    pub total_time_hours: f64,
}

impl TransportTrace {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.distance_points.len()
    }

    /// Whether the trace holds no samples (never true for a simulated trip)
    pub fn is_empty(&self) -> bool {
        self.distance_points.is_empty()
    }
}

/// Number of trace samples for a trip: `min(2000, 2 * distance_km)`
pub fn sample_count(distance_km: u32) -> usize {
    (2 * distance_km as usize).clamp(1, MAX_SAMPLES)
}

/// `n` evenly spaced points from 0 to `end` inclusive
fn linspace(end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = end / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
            points[n - 1] = end;
            points
        }
    }
}

/// Simulate a trip of `distance_km` over `route`.
///
/// # Errors
///
/// `InvalidParameter` when `distance_km` is zero.
pub fn simulate_transport<R: Rng + ?Sized>(
    distance_km: u32,
    route: RouteType,
    rng: &mut R,
) -> SimResult<TransportTrace> {
    if distance_km == 0 {
        return Err(SimError::invalid_parameter(
            "distance_km",
            "0",
            "Transport distance must be positive",
        ));
    }

    let total_km = f64::from(distance_km);
    let profile = route.profile();
    let n = sample_count(distance_km);
    let distance_points = linspace(total_km, n);

    let mut speeds: Vec<f64> = Vec::with_capacity(n);
    let mut g_forces = Vec::with_capacity(n);
    let mut forces = Vec::with_capacity(n);
    let mut elevations: Vec<f64> = Vec::with_capacity(n);

    for (i, &distance) in distance_points.iter().enumerate() {
        let progress = distance / total_km;

        let raw_speed = if progress < profile.city_ratio {
            let traffic_light = if i > 0 && rng.gen::<f64>() < TRAFFIC_LIGHT_PROBABILITY {
                if rng.gen::<f64>() < TRAFFIC_LIGHT_STOP_PROBABILITY {
                    TRAFFIC_LIGHT_FACTOR
                } else {
                    1.0
                }
            } else {
                1.0
            };
            let rush_hour = if (progress < 0.1 || progress > 0.8)
                && rng.gen::<f64>() < RUSH_HOUR_PROBABILITY
            {
                RUSH_HOUR_FACTOR
            } else {
                1.0
            };
            profile.city_speed_kmh * traffic_light * rush_hour
                + rng.gen_range(-profile.city_variation_kmh..=profile.city_variation_kmh)
        } else {
            let congestion = if rng.gen::<f64>() < CONGESTION_PROBABILITY {
                CONGESTION_FACTOR
            } else {
                1.0
            };
            let weather = if rng.gen::<f64>() < WEATHER_PROBABILITY {
                WEATHER_FACTOR
            } else {
                1.0
            };
            profile.highway_speed_kmh * congestion * weather
                + rng.gen_range(-profile.highway_variation_kmh..=profile.highway_variation_kmh)
        };
        let speed = raw_speed.clamp(MIN_SPEED_KMH, MAX_SPEED_KMH);

        if i == 0 {
            g_forces.push(1.0);
            forces.push(GForce(1.0).force_on(REFERENCE_MASS_KG).0);
            elevations.push(0.0);
        } else {
            let prev_speed = speeds[i - 1];
            let time_diff = (distance - distance_points[i - 1]) / prev_speed.max(1.0) * 3.6;
            let acceleration = (speed - prev_speed) / time_diff.max(0.1) / 3.6;

            let road_surface_g = rng.gen_range(-ROAD_SURFACE_G..=ROAD_SURFACE_G);
            let turning_g = if rng.gen::<f64>() < TURNING_PROBABILITY {
                rng.gen_range(-TURNING_G..=TURNING_G)
            } else {
                0.0
            };
            let mut total_g =
                (acceleration / STANDARD_GRAVITY).abs() + road_surface_g.abs() + turning_g.abs();

            let elevation = ELEVATION_AMPLITUDE_M * (distance * 0.01).sin()
                + rng.gen_range(-ELEVATION_NOISE_M..=ELEVATION_NOISE_M);
            elevations.push(elevation);

            // Lags one sample: uses the change between the two previous elevations
            if i > 1 {
                total_g += (elevations[i - 1] - elevations[i - 2]).abs() * ELEVATION_G_PER_M;
            }

            g_forces.push(total_g.clamp(MIN_G_FORCE, MAX_G_FORCE));
            forces.push(GForce(total_g).force_on(REFERENCE_MASS_KG).0);
        }

        speeds.push(speed);
    }

    let max_speed = speeds.iter().copied().fold(f64::MIN, f64::max);
    let max_g_force = g_forces.iter().copied().fold(f64::MIN, f64::max);
    let avg_speed = speeds.iter().sum::<f64>() / n as f64;
    let total_time_hours = total_km / avg_speed;

    log::debug!(
        "transport {} km ({}): {} samples, max {:.1} km/h, peak {:.2} g",
        distance_km,
        route.label(),
        n,
        max_speed,
        max_g_force
    );

    Ok(TransportTrace {
        distance_points,
        speeds,
        g_forces,
        forces,
        elevations,
        max_speed,
        max_g_force,
        avg_speed,
        total_time_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(1), 2);
        assert_eq!(sample_count(100), 200);
        assert_eq!(sample_count(1000), 2000);
        assert_eq!(sample_count(100_000), 2000);
    }

    #[test]
    fn test_linspace_endpoints() {
        let points = linspace(250.0, 500);
        assert_eq!(points.len(), 500);
        assert_eq!(points[0], 0.0);
        assert_eq!(points[499], 250.0);
        assert_eq!(linspace(10.0, 1), vec![0.0]);
    }

    #[test]
    fn test_bounds_hold_for_every_route() {
        let mut rng = rng::seeded(2024);
        for route in RouteType::ALL {
            let trace = simulate_transport(3000, route, &mut rng).unwrap();
            assert_eq!(trace.len(), 2000);
            assert_eq!(trace.speeds.len(), trace.len());
            assert_eq!(trace.g_forces.len(), trace.len());
            assert_eq!(trace.forces.len(), trace.len());
            assert_eq!(trace.elevations.len(), trace.len());
            for &speed in &trace.speeds {
                assert!((MIN_SPEED_KMH..=MAX_SPEED_KMH).contains(&speed));
            }
            for &g in &trace.g_forces {
                assert!((MIN_G_FORCE..=MAX_G_FORCE).contains(&g));
            }
        }
    }

    #[test]
    fn test_first_sample_seeded() {
        let mut rng = rng::seeded(1);
        let trace = simulate_transport(200, RouteType::Mixed, &mut rng).unwrap();
        assert_eq!(trace.g_forces[0], 1.0);
        assert_relative_eq!(trace.forces[0], STANDARD_GRAVITY);
        assert_eq!(trace.elevations[0], 0.0);
        assert_eq!(trace.distance_points[0], 0.0);
        assert_eq!(*trace.distance_points.last().unwrap(), 200.0);
    }

    #[test]
    fn test_summary_statistics() {
        let mut rng = rng::seeded(99);
        let trace = simulate_transport(750, RouteType::OffRoadRural, &mut rng).unwrap();
        let mean = trace.speeds.iter().sum::<f64>() / trace.len() as f64;
        assert_relative_eq!(trace.avg_speed, mean);
        assert_relative_eq!(trace.total_time_hours, 750.0 / mean);
        assert!(trace.speeds.iter().all(|&s| s <= trace.max_speed));
        assert!(trace.g_forces.contains(&trace.max_g_force));
    }

    #[test]
    fn test_same_seed_same_trace() {
        let a = simulate_transport(400, RouteType::PrimarilyCity, &mut rng::seeded(5)).unwrap();
        let b = simulate_transport(400, RouteType::PrimarilyCity, &mut rng::seeded(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_force_tracks_unclamped_g() {
        let mut rng = rng::seeded(3);
        let trace = simulate_transport(1000, RouteType::PrimarilyCity, &mut rng).unwrap();
        for (g, force) in trace.g_forces.iter().zip(&trace.forces).skip(1) {
            let raw_g = force / STANDARD_GRAVITY;
            if raw_g > MIN_G_FORCE && raw_g < MAX_G_FORCE {
                assert_relative_eq!(*g, raw_g, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_distance_rejected() {
        let mut rng = rng::seeded(0);
        assert!(simulate_transport(0, RouteType::Mixed, &mut rng).is_err());
    }

    #[test]
    fn test_route_profiles_split_the_trip() {
        for route in RouteType::ALL {
            let profile = route.profile();
            assert_relative_eq!(profile.city_ratio + profile.highway_ratio, 1.0);
        }
    }
}
