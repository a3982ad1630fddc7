use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::country::CountryRecord;

/// Kilometers per degree of arc under the law-of-cosines conversion chain
/// (arc degrees -> nautical-mile minutes -> statute miles -> kilometers).
const KM_PER_ARC_DEGREE: f64 = 60.0 * 1.1515 * 1.609344;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

/// A validated point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    #[must_use]
    pub fn distance_km(self, other: Self) -> f64 {
        great_circle_km(self, other)
    }
}

impl TryFrom<(f64, f64)> for GeoPoint {
    type Error = CoordinateError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lng)
    }
}

/// Great-circle distance in kilometers via the spherical law of cosines.
///
/// The cosine sum is clamped to [-1, 1] before `acos`: floating point error
/// can push it just past 1 for identical or antipodal points, which would
/// otherwise yield NaN.
#[must_use]
pub fn great_circle_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lng = (a.lng - b.lng).to_radians();

    let cos_sum = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lng.cos();
    let arc_degrees = cos_sum.clamp(-1.0, 1.0).acos().to_degrees();

    arc_degrees * KM_PER_ARC_DEGREE
}

/// Linear-scan nearest-country lookup.
///
/// Records without a representative coordinate are skipped. Ties on distance
/// keep the earliest record, so the result is stable in input order. Returns
/// `None` when no record is eligible.
#[must_use]
pub fn nearest_country(point: GeoPoint, countries: &[CountryRecord]) -> Option<&CountryRecord> {
    let mut nearest = None;
    let mut min_distance = f64::INFINITY;

    for country in countries {
        let Some(latlng) = country.latlng else {
            continue;
        };
        let distance = great_circle_km(point, latlng);
        if distance < min_distance {
            min_distance = distance;
            nearest = Some(country);
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::CountryRecord;
    use proptest::prelude::*;

    fn record(code: &str, name: &str, latlng: Option<(f64, f64)>) -> CountryRecord {
        CountryRecord::for_tests(code, name, latlng)
    }

    mod coordinate_tests {
        use super::*;

        #[test]
        fn accepts_valid_coordinates() {
            assert!(GeoPoint::new(0.0, 0.0).is_ok());
            assert!(GeoPoint::new(90.0, 180.0).is_ok());
            assert!(GeoPoint::new(-90.0, -180.0).is_ok());
            assert!(GeoPoint::new(46.1, 2.1).is_ok());
        }

        #[test]
        fn rejects_out_of_range_latitude() {
            assert!(matches!(
                GeoPoint::new(90.5, 0.0),
                Err(CoordinateError::LatitudeOutOfRange(_))
            ));
            assert!(matches!(
                GeoPoint::new(-91.0, 0.0),
                Err(CoordinateError::LatitudeOutOfRange(_))
            ));
        }

        #[test]
        fn rejects_out_of_range_longitude() {
            assert!(matches!(
                GeoPoint::new(0.0, 180.5),
                Err(CoordinateError::LongitudeOutOfRange(_))
            ));
            assert!(matches!(
                GeoPoint::new(0.0, -181.0),
                Err(CoordinateError::LongitudeOutOfRange(_))
            ));
        }

        #[test]
        fn rejects_non_finite_values() {
            assert!(matches!(
                GeoPoint::new(f64::NAN, 0.0),
                Err(CoordinateError::NonFinite)
            ));
            assert!(matches!(
                GeoPoint::new(0.0, f64::INFINITY),
                Err(CoordinateError::NonFinite)
            ));
            assert!(matches!(
                GeoPoint::new(f64::NEG_INFINITY, 0.0),
                Err(CoordinateError::NonFinite)
            ));
        }
    }

    mod distance_tests {
        use super::*;

        #[test]
        fn identical_points_are_zero() {
            let p = GeoPoint::new(51.5074, -0.1278).unwrap();
            assert_eq!(great_circle_km(p, p), 0.0);
        }

        #[test]
        fn identical_pole_points_do_not_produce_nan() {
            // At the pole the cosine sum lands right at 1.0 plus float noise;
            // without the clamp this is acos(>1) = NaN.
            let pole = GeoPoint::new(90.0, 0.0).unwrap();
            let d = great_circle_km(pole, pole);
            assert!(d.is_finite());
            assert_eq!(d, 0.0);
        }

        #[test]
        fn london_to_paris_is_about_343_km() {
            let london = GeoPoint::new(51.5074, -0.1278).unwrap();
            let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
            let d = great_circle_km(london, paris);
            assert!((d - 343.5).abs() < 5.0, "got {d}");
        }

        #[test]
        fn antipodal_points_are_half_the_circumference() {
            let a = GeoPoint::new(0.0, 0.0).unwrap();
            let b = GeoPoint::new(0.0, 180.0).unwrap();
            let d = great_circle_km(a, b);
            assert!(d.is_finite());
            // 180 arc degrees under this conversion chain.
            assert!((d - 180.0 * KM_PER_ARC_DEGREE).abs() < 1e-6, "got {d}");
        }
    }

    mod nearest_tests {
        use super::*;

        #[test]
        fn empty_list_returns_none() {
            let point = GeoPoint::new(10.0, 10.0).unwrap();
            assert!(nearest_country(point, &[]).is_none());
        }

        #[test]
        fn all_ineligible_returns_none() {
            let point = GeoPoint::new(10.0, 10.0).unwrap();
            let countries = vec![
                record("AA", "Alpha", None),
                record("BB", "Beta", None),
            ];
            assert!(nearest_country(point, &countries).is_none());
        }

        #[test]
        fn single_eligible_record_always_wins() {
            let point = GeoPoint::new(-45.0, 170.0).unwrap();
            let countries = vec![record("NZ", "New Zealand", Some((-41.0, 174.0)))];
            let found = nearest_country(point, &countries).unwrap();
            assert_eq!(found.code, "NZ");
        }

        #[test]
        fn ineligible_records_are_skipped_not_fatal() {
            let point = GeoPoint::new(46.1, 2.1).unwrap();
            let countries = vec![
                record("AA", "Alpha", None),
                record("FR", "France", Some((46.0, 2.0))),
                record("BB", "Beta", None),
            ];
            let found = nearest_country(point, &countries).unwrap();
            assert_eq!(found.code, "FR");
        }

        #[test]
        fn exact_coordinate_match_wins_with_zero_distance() {
            let point = GeoPoint::new(51.0, 9.0).unwrap();
            let countries = vec![
                record("FR", "France", Some((46.0, 2.0))),
                record("DE", "Germany", Some((51.0, 9.0))),
            ];
            let found = nearest_country(point, &countries).unwrap();
            assert_eq!(found.code, "DE");
            assert_eq!(great_circle_km(point, found.latlng.unwrap()), 0.0);
        }

        #[test]
        fn equal_distance_tie_keeps_the_earlier_record() {
            let point = GeoPoint::new(20.0, 20.0).unwrap();
            let countries = vec![
                record("AA", "Alpha", Some((20.0, 21.0))),
                record("BB", "Beta", Some((20.0, 21.0))),
            ];
            let found = nearest_country(point, &countries).unwrap();
            assert_eq!(found.code, "AA");
        }
    }

    fn any_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_map(|(lat, lng)| GeoPoint::new(lat, lng).unwrap())
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in any_point(), b in any_point()) {
            let ab = great_circle_km(a, b);
            let ba = great_circle_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        #[test]
        fn distance_is_finite_and_non_negative(a in any_point(), b in any_point()) {
            let d = great_circle_km(a, b);
            prop_assert!(d.is_finite());
            prop_assert!(d >= 0.0);
        }

        #[test]
        fn nearest_is_minimal(
            point in any_point(),
            coords in proptest::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 1..16),
        ) {
            let countries: Vec<CountryRecord> = coords
                .iter()
                .enumerate()
                .map(|(i, &(lat, lng))| {
                    CountryRecord::for_tests(&format!("C{i}"), &format!("Country {i}"), Some((lat, lng)))
                })
                .collect();

            let found = nearest_country(point, &countries).unwrap();
            let found_distance = great_circle_km(point, found.latlng.unwrap());

            for country in &countries {
                let d = great_circle_km(point, country.latlng.unwrap());
                prop_assert!(found_distance <= d + 1e-9);
            }
        }
    }
}
