//! Conversion from airprox coordinates to `geo` points.
//!
//! `geo` uses (x, y) = (longitude, latitude).

use airprox_core::models::Coordinate;

pub fn to_geo_point(coordinate: Coordinate) -> geo::Point<f64> {
    geo::Point::new(coordinate.longitude, coordinate.latitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order() {
        let p = to_geo_point(Coordinate::new(40.6413, -73.7781));
        assert_eq!(p.x(), -73.7781);
        assert_eq!(p.y(), 40.6413);
    }
}
