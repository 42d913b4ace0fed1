use crate::coordinate::Coordinate;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Central angle between two points, in radians.
fn central_angle(lat1_rad: f64, lat2_rad: f64, delta_lat: f64, delta_lon: f64) -> f64 {
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance over the surface, ignoring altitude.
pub fn surface_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1_rad = from.lat().to_radians();
    let lat2_rad = to.lat().to_radians();
    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = (to.lon() - from.lon()).to_radians();

    EARTH_RADIUS_METERS * central_angle(lat1_rad, lat2_rad, delta_lat, delta_lon)
}

/// Haversine distance in meters.
///
/// When both points carry an altitude, the altitude difference is combined with the
/// surface distance as `sqrt(surface² + Δalt²)`. Otherwise altitude is ignored.
pub fn distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let surface = surface_distance(from, to);

    match (from.alt(), to.alt()) {
        (Some(alt1), Some(alt2)) => (surface.powi(2) + (alt2 - alt1).powi(2)).sqrt(),
        _ => surface,
    }
}

/// Brings a longitude in [-360, 360] back into [-180, 180].
fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Position reached after travelling `velocity * elapsed` meters along the great
/// circle from `from` towards `to`.
///
/// `elapsed` is not clamped to the segment. Altitude, when both ends have one, moves
/// linearly with the fraction of the leg distance already travelled; this does not
/// follow the sphere and is kept that way on purpose.
pub fn interpolate(from: &Coordinate, to: &Coordinate, velocity: f64, elapsed: f64) -> Coordinate {
    if from == to {
        return *from;
    }

    let travelled = velocity * elapsed;

    let lat1_rad = from.lat().to_radians();
    let lon1_rad = from.lon().to_radians();
    let lat2_rad = to.lat().to_radians();
    let lon2_rad = to.lon().to_radians();
    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    // Same surface point, different altitude: only the altitude moves.
    let (lat, lon) = if central_angle(lat1_rad, lat2_rad, delta_lat, delta_lon) == 0.0 {
        (from.lat(), from.lon())
    } else {
        let bearing = (delta_lon.sin() * lat2_rad.cos()).atan2(
            lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos(),
        );
        let angular = travelled / EARTH_RADIUS_METERS;

        let lat_rad = (lat1_rad.sin() * angular.cos()
            + lat1_rad.cos() * angular.sin() * bearing.cos())
        .asin();
        let lon_rad = lon1_rad
            + (bearing.sin() * angular.sin() * lat1_rad.cos())
                .atan2(angular.cos() - lat1_rad.sin() * lat_rad.sin());

        (lat_rad.to_degrees(), wrap_longitude(lon_rad.to_degrees()))
    };

    let alt = match (from.alt(), to.alt()) {
        (Some(alt1), Some(alt2)) => {
            let fraction = travelled / distance(from, to);
            Some(alt1 + (alt2 - alt1) * fraction)
        }
        _ => None,
    };

    Coordinate::from_parts(lat, lon, alt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let d = distance(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() / 111_195.0 < 0.01, "got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (Coordinate::new(40.4168, -3.7038), Coordinate::new(41.3874, 2.1686)),
            (Coordinate::new(-33.86, 151.2), Coordinate::new(51.5, -0.12)),
            (
                Coordinate::with_altitude(10.0, 10.0, 100.0),
                Coordinate::with_altitude(10.1, 10.2, 350.0),
            ),
        ];

        for (a, b) in pairs {
            assert_eq!(distance(&a, &b), distance(&b, &a));
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Coordinate::with_altitude(12.0, 34.0, 56.0);
        assert_eq!(distance(&c, &c), 0.0);
    }

    #[test]
    fn altitude_combines_with_surface_distance() {
        let a = Coordinate::with_altitude(0.0, 0.0, 0.0);
        let b = Coordinate::with_altitude(0.0, 1.0, 1_000.0);
        let surface = surface_distance(&a, &b);

        assert!((distance(&a, &b) - (surface.powi(2) + 1_000_000.0).sqrt()).abs() < EPSILON);
    }

    #[test]
    fn altitude_ignored_when_only_one_side_has_it() {
        let a = Coordinate::with_altitude(0.0, 0.0, 500.0);
        let b = Coordinate::new(0.0, 1.0);
        assert_eq!(distance(&a, &b), surface_distance(&a, &b));
    }

    #[test]
    fn interpolate_across_the_antimeridian_stays_in_range() {
        let from = Coordinate::new(0.0, 179.5);
        let to = Coordinate::new(0.0, -179.5);
        let leg = distance(&from, &to);

        let result = interpolate(&from, &to, 1.0, leg * 0.75);
        assert!((result.lon() - -179.75).abs() < 1e-6, "got {}", result.lon());
        assert!(result.lat().abs() < 1e-9);

        let json = serde_json::to_string(&result).unwrap();
        let parsed: Coordinate = serde_json::from_str(&json).unwrap();
        assert!((parsed.lon() - result.lon()).abs() < 1e-12);

        let westward = interpolate(&to, &from, 1.0, leg * 0.75);
        assert!((westward.lon() - 179.75).abs() < 1e-6, "got {}", westward.lon());
    }

    #[test]
    fn interpolate_same_point_returns_it_unchanged() {
        let c = Coordinate::with_altitude(45.0, 7.0, 120.0);
        for (velocity, elapsed) in [(0.0, 0.0), (10.0, 5.0), (1e6, 1e6), (-3.0, 2.0)] {
            let result = interpolate(&c, &c, velocity, elapsed);
            assert_eq!(result, c);
            assert!(!result.lat().is_nan() && !result.lon().is_nan());
        }
    }

    #[test]
    fn interpolate_at_zero_elapsed_is_start() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(11.0, 21.0);
        let result = interpolate(&a, &b, 15.0, 0.0);

        assert!((result.lat() - 10.0).abs() < EPSILON);
        assert!((result.lon() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn interpolate_halfway_along_the_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let half = distance(&a, &b) / 2.0;

        let result = interpolate(&a, &b, 1.0, half);
        assert!(result.lat().abs() < EPSILON);
        assert!((result.lon() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn interpolate_full_leg_reaches_the_end() {
        let a = Coordinate::new(40.4168, -3.7038);
        let b = Coordinate::new(41.3874, 2.1686);
        let velocity = 25.0;
        let duration = distance(&a, &b) / velocity;

        let result = interpolate(&a, &b, velocity, duration);
        assert!((result.lat() - b.lat()).abs() < 1e-6);
        assert!((result.lon() - b.lon()).abs() < 1e-6);
    }

    // Altitude follows the travelled fraction linearly, not the spherical path.
    #[test]
    fn interpolate_altitude_is_linear_in_travelled_fraction() {
        let a = Coordinate::with_altitude(0.0, 0.0, 100.0);
        let b = Coordinate::with_altitude(0.0, 0.01, 300.0);
        let quarter = distance(&a, &b) / 4.0;

        let result = interpolate(&a, &b, 2.0, quarter / 2.0);
        let alt = result.alt().unwrap();
        assert!((alt - 150.0).abs() < 1e-6, "got {}", alt);
    }

    #[test]
    fn interpolate_vertical_leg_only_moves_altitude() {
        let a = Coordinate::with_altitude(5.0, 5.0, 0.0);
        let b = Coordinate::with_altitude(5.0, 5.0, 100.0);

        let result = interpolate(&a, &b, 5.0, 4.0);
        assert_eq!(result.lat(), 5.0);
        assert_eq!(result.lon(), 5.0);
        assert!((result.alt().unwrap() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn interpolate_drops_altitude_unless_both_ends_have_it() {
        let a = Coordinate::with_altitude(0.0, 0.0, 100.0);
        let b = Coordinate::new(0.0, 1.0);
        assert_eq!(interpolate(&a, &b, 10.0, 10.0).alt(), None);
    }
}
