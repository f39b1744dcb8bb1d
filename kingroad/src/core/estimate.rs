//! Distance and ETA estimates attached to a route at creation time.
//!
//! The estimate is a placeholder; any [`DistanceEstimator`] backed by a real
//! routing service can be swapped in without touching the store.

use rand::Rng;

/// Estimate attached to a new route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEstimate {
    pub distance_km: u32,
    pub eta_minutes: u32,
}

pub trait DistanceEstimator {
    fn estimate(&self, origin: &str, destination: &str) -> RouteEstimate;
}

/// Whole minutes to cover `distance_km` at `speed_kmh` (floored).
pub fn eta_minutes(distance_km: u32, speed_kmh: u32) -> u32 {
    if speed_kmh == 0 {
        return 0;
    }
    let minutes = u64::from(distance_km) * 60 / u64::from(speed_kmh);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Uniform random distance in `[min_km, max_km]`, ETA at a fixed average speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomEstimator {
    pub min_km: u32,
    pub max_km: u32,
    pub average_speed_kmh: u32,
}

impl Default for RandomEstimator {
    fn default() -> Self {
        Self {
            min_km: 10,
            max_km: 510,
            average_speed_kmh: 80,
        }
    }
}

impl DistanceEstimator for RandomEstimator {
    fn estimate(&self, _origin: &str, _destination: &str) -> RouteEstimate {
        let (low, high) = if self.min_km <= self.max_km {
            (self.min_km, self.max_km)
        } else {
            (self.max_km, self.min_km)
        };
        let distance_km = rand::thread_rng().gen_range(low..=high);
        RouteEstimate {
            distance_km,
            eta_minutes: eta_minutes(distance_km, self.average_speed_kmh),
        }
    }
}

/// Same distance for every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEstimator {
    pub distance_km: u32,
    pub average_speed_kmh: u32,
}

impl DistanceEstimator for FixedEstimator {
    fn estimate(&self, _origin: &str, _destination: &str) -> RouteEstimate {
        RouteEstimate {
            distance_km: self.distance_km,
            eta_minutes: eta_minutes(self.distance_km, self.average_speed_kmh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_floors_to_whole_minutes() {
        assert_eq!(eta_minutes(80, 80), 60);
        assert_eq!(eta_minutes(10, 80), 7);
        assert_eq!(eta_minutes(510, 80), 382);
        assert_eq!(eta_minutes(100, 0), 0);
    }

    #[test]
    fn random_estimate_stays_in_range_and_matches_its_distance() {
        let estimator = RandomEstimator::default();
        for _ in 0..200 {
            let estimate = estimator.estimate("a", "b");
            assert!((10..=510).contains(&estimate.distance_km));
            assert_eq!(estimate.eta_minutes, eta_minutes(estimate.distance_km, 80));
        }
    }

    #[test]
    fn random_estimate_tolerates_swapped_bounds() {
        let estimator = RandomEstimator {
            min_km: 20,
            max_km: 10,
            average_speed_kmh: 60,
        };
        let estimate = estimator.estimate("a", "b");
        assert!((10..=20).contains(&estimate.distance_km));
    }
}
