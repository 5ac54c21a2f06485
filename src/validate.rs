//! Validation for geographic coordinates and measurements.

use geo::Point;

/// Checks that a point has a finite, in-range longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use trackmap::validate::is_valid_position;
/// use geo::Point;
///
/// // Cape York, far north Queensland
/// assert!(is_valid_position(&Point::new(142.0, -12.0)));
///
/// // Invalid longitude
/// assert!(!is_valid_position(&Point::new(200.0, -12.0)));
///
/// // NaN latitude
/// assert!(!is_valid_position(&Point::new(142.0, f64::NAN)));
/// ```
pub fn is_valid_position(point: &Point) -> bool {
    let (x, y) = (point.x(), point.y());

    x.is_finite() && y.is_finite() && (-180.0..=180.0).contains(&x) && (-90.0..=90.0).contains(&y)
}

/// Builds a position from raw coordinates, rejecting invalid ones.
pub fn position_from_coords(lon: f64, lat: f64) -> Option<Point> {
    let point = Point::new(lon, lat);
    is_valid_position(&point).then_some(point)
}

/// A usable measurement is any finite number.
pub fn is_valid_measurement(value: f64) -> bool {
    value.is_finite()
}
