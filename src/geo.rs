use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Great-circle distance between two positions in meters (haversine formula)
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Finds the candidate nearest to `origin`.
///
/// Returns the index into `candidates` together with the distance in meters.
/// Ties keep the earlier candidate, so selection is deterministic for a given
/// input order. An empty candidate list yields `None`.
pub fn find_nearest(origin: Coordinates, candidates: &[Coordinates]) -> Option<(usize, f64)> {
    let mut nearest: Option<(usize, f64)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let distance = distance_meters(origin, *candidate);
        if nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((index, distance));
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Coordinates {
        Coordinates {
            latitude: 45.478,
            longitude: 9.227,
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_meters(origin(), origin()), 0.0);
    }

    #[test]
    fn test_distance_one_degree_of_latitude() {
        let north = Coordinates {
            latitude: origin().latitude + 1.0,
            longitude: origin().longitude,
        };
        let distance = distance_meters(origin(), north);
        // One degree of latitude is roughly 111.2 km on a 6371 km sphere
        assert!((distance - 111_194.9).abs() < 100.0, "got {distance}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let other = Coordinates {
            latitude: 45.5,
            longitude: 9.3,
        };
        let there = distance_meters(origin(), other);
        let back = distance_meters(other, origin());
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_find_nearest_empty_input() {
        assert_eq!(find_nearest(origin(), &[]), None);
    }

    #[test]
    fn test_find_nearest_picks_closest() {
        let candidates = vec![
            Coordinates {
                latitude: origin().latitude + 0.02,
                longitude: origin().longitude,
            },
            Coordinates {
                latitude: origin().latitude + 0.001,
                longitude: origin().longitude,
            },
            Coordinates {
                latitude: origin().latitude - 0.05,
                longitude: origin().longitude,
            },
        ];

        let (index, distance) = find_nearest(origin(), &candidates).unwrap();
        assert_eq!(index, 1);
        assert!(distance < 200.0);
    }

    #[test]
    fn test_find_nearest_tie_keeps_first() {
        let candidate = Coordinates {
            latitude: origin().latitude + 0.01,
            longitude: origin().longitude,
        };
        let candidates = vec![candidate, candidate];

        let (index, _) = find_nearest(origin(), &candidates).unwrap();
        assert_eq!(index, 0);
    }
}
