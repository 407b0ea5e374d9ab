//! Great-circle distance and shape containment predicates
//!
//! Points are `geo::Point<f64>` in unprojected WGS84 degrees, with x = longitude and
//! y = latitude, matching what `gpx::Waypoint::point()` returns.

use geo::{Point, Rect};

/// Earth's radius in meters
pub const EARTH_RADIUS_M: f64 = 6371000.0;

/// Approximate length of one degree of latitude in meters, used for vicinity buffers
pub const METERS_PER_DEGREE: f64 = 111111.0;

/// Calculate the Haversine distance between two points in meters
///
/// Identical points yield exactly 0.
#[inline]
pub fn distance(p1: Point<f64>, p2: Point<f64>) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let delta_lat = (p2.y() - p1.y()).to_radians();
    let delta_lon = (p2.x() - p1.x()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Sum of consecutive distances along a sequence of points (0 for fewer than two)
pub fn path_length<I>(points: I) -> f64
where
    I: IntoIterator<Item = Point<f64>>,
{
    let mut total = 0.0;
    let mut prev: Option<Point<f64>> = None;
    for point in points {
        if let Some(prev) = prev {
            total += distance(prev, point);
        }
        prev = Some(point);
    }
    total
}

/// Check if a point lies within a lat/lon rectangle, boundaries included
#[inline]
pub fn in_rectangle(point: Point<f64>, rect: &Rect<f64>) -> bool {
    let (min, max) = (rect.min(), rect.max());
    point.y() >= min.y && point.y() <= max.y && point.x() >= min.x && point.x() <= max.x
}

/// Check if a point is at most `radius` meters from `center`
#[inline]
pub fn in_circle(point: Point<f64>, center: Point<f64>, radius: f64) -> bool {
    distance(point, center) <= radius
}

/// Check if a point is at most `radius + vicinity` meters from `center`
#[inline]
pub fn in_expanded_circle(
    point: Point<f64>,
    center: Point<f64>,
    radius: f64,
    vicinity: f64,
) -> bool {
    distance(point, center) <= radius + vicinity
}

/// Check if a point lies within a rectangle grown outward by `vicinity` meters
///
/// Meters are converted to degrees with a flat-earth approximation at the rectangle's
/// center latitude. The longitude buffer is unbounded at the poles.
pub fn in_expanded_rectangle(point: Point<f64>, rect: &Rect<f64>, vicinity: f64) -> bool {
    let (min, max) = (rect.min(), rect.max());
    let center_lat = (min.y + max.y) / 2.0;

    let d_lat = vicinity / METERS_PER_DEGREE;
    let d_lon = vicinity / (METERS_PER_DEGREE * center_lat.to_radians().cos());

    point.y() >= min.y - d_lat
        && point.y() <= max.y + d_lat
        && point.x() >= min.x - d_lon
        && point.x() <= max.x + d_lon
}

/// Default vicinity of a rectangle: half of its smaller side in meters
///
/// Sides are measured as great-circle distances between opposite edge midpoints.
pub fn rectangle_default_vicinity(rect: &Rect<f64>) -> f64 {
    let (min, max) = (rect.min(), rect.max());
    let center_lat = (min.y + max.y) / 2.0;
    let center_lon = (min.x + max.x) / 2.0;

    let width = distance(Point::new(min.x, center_lat), Point::new(max.x, center_lat));
    let height = distance(Point::new(center_lon, min.y), Point::new(center_lon, max.y));

    width.min(height) / 2.0
}

/// Check that a latitude/longitude pair is finite and within WGS84 ranges
#[inline]
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    fn rect(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Rect<f64> {
        Rect::new(Coord { x: lon1, y: lat1 }, Coord { x: lon2, y: lat2 })
    }

    #[test]
    fn test_distance_same_point() {
        let p = Point::new(-0.1278, 51.5074);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_known_value() {
        // London to Paris is approximately 344 km
        let london = Point::new(-0.1278, 51.5074);
        let paris = Point::new(2.3522, 48.8566);
        let dist = distance(london, paris);
        assert!((dist - 343_560.0).abs() < 5000.0);
    }

    #[test]
    fn test_distance_antipodal() {
        let dist = distance(Point::new(0.0, 0.0), Point::new(180.0, 0.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((dist - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_distance_along_meridian() {
        let degrees = 200.0 / EARTH_RADIUS_M * 180.0 / std::f64::consts::PI;
        let dist = distance(Point::new(10.0, 10.0), Point::new(10.0, 10.0 + degrees));
        assert!((dist - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_path_length() {
        assert_eq!(path_length(Vec::<Point<f64>>::new()), 0.0);
        assert_eq!(path_length(vec![Point::new(1.0, 1.0)]), 0.0);

        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.001, 0.0);
        let c = Point::new(0.001, 0.001);
        let expected = distance(a, b) + distance(b, c);
        assert!((path_length(vec![a, b, c]) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_in_rectangle_is_inclusive() {
        // Corners given in any order are normalized
        let r = rect(1.0, 1.0, 0.0, 0.0);
        assert!(in_rectangle(Point::new(0.5, 0.5), &r));
        assert!(in_rectangle(Point::new(0.0, 0.0), &r));
        assert!(in_rectangle(Point::new(1.0, 0.3), &r));
        assert!(!in_rectangle(Point::new(1.000001, 0.3), &r));
    }

    #[test]
    fn test_degenerate_rectangle_contains_its_point() {
        let r = rect(5.0, 5.0, 5.0, 5.0);
        assert!(in_rectangle(Point::new(5.0, 5.0), &r));
        assert!(!in_rectangle(Point::new(5.0, 5.0001), &r));
    }

    #[test]
    fn test_in_circle_boundary() {
        let center = Point::new(10.0, 10.0);
        let on_edge = Point::new(10.0, 10.001);
        let radius = distance(on_edge, center);
        assert!(in_circle(on_edge, center, radius));
        assert!(!in_circle(on_edge, center, radius - 1e-6));
    }

    #[test]
    fn test_zero_radius_circle_matches_center() {
        let center = Point::new(3.0, 4.0);
        assert!(in_circle(center, center, 0.0));
        assert!(!in_circle(Point::new(3.0, 4.00001), center, 0.0));
    }

    #[test]
    fn test_in_expanded_circle() {
        let center = Point::new(10.0, 10.0);
        let degrees = 140.0 / EARTH_RADIUS_M * 180.0 / std::f64::consts::PI;
        let point = Point::new(10.0, 10.0 + degrees);
        assert!(!in_circle(point, center, 100.0));
        assert!(in_expanded_circle(point, center, 100.0, 50.0));
        assert!(!in_expanded_circle(point, center, 100.0, 39.0));
    }

    #[test]
    fn test_in_expanded_rectangle_degree_conversion() {
        let r = rect(0.0, 0.0, 0.0, 0.001);
        // 111.1111 m of buffer is 0.001 degrees at the equator
        let vicinity = 111.1111;
        assert!(in_expanded_rectangle(Point::new(-0.0009, 0.0), &r, vicinity));
        assert!(in_expanded_rectangle(Point::new(0.0, 0.0009), &r, vicinity));
        assert!(!in_expanded_rectangle(Point::new(-0.0011, 0.0), &r, vicinity));
        assert!(!in_expanded_rectangle(Point::new(0.0005, -0.0011), &r, vicinity));
    }

    #[test]
    fn test_expanded_rectangle_longitude_widens_with_latitude() {
        let r = rect(60.0, 10.0, 60.0, 10.0);
        // cos(60°) = 0.5, so 111.111 m covers twice as many degrees of longitude
        let vicinity = 111.111;
        assert!(in_expanded_rectangle(Point::new(10.0019, 60.0), &r, vicinity));
        assert!(!in_expanded_rectangle(Point::new(10.0, 60.0019), &r, vicinity));
    }

    #[test]
    fn test_rectangle_default_vicinity() {
        // Zero height rectangle has no default buffer
        assert_eq!(rectangle_default_vicinity(&rect(0.0, 0.0, 0.0, 0.001)), 0.0);

        let r = rect(0.0, 0.0, 0.002, 0.001);
        let width = distance(Point::new(0.0, 0.001), Point::new(0.001, 0.001));
        assert!((rectangle_default_vicinity(&r) - width / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid_coordinate() {
        assert!(is_valid_coordinate(90.0, -180.0));
        assert!(!is_valid_coordinate(90.5, 0.0));
        assert!(!is_valid_coordinate(0.0, 181.0));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
    }
}
