use std::fmt::Debug;

/// Feature geometry in the multi-geometry model of vector tiles.
///
/// Coordinates are `[x, y]` pairs in whatever space the caller works in
/// (tile-local for encoding). `Unknown` stands for any geometry kind the
/// model cannot express; it encodes as an empty geometry of type 0.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	MultiPoint(Vec<[f64; 2]>),
	MultiLineString(Vec<Vec<[f64; 2]>>),
	MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
	Unknown,
}

impl Geometry {
	pub fn new_multi_point(points: Vec<[f64; 2]>) -> Self {
		Geometry::MultiPoint(points)
	}

	pub fn new_multi_line_string(lines: Vec<Vec<[f64; 2]>>) -> Self {
		Geometry::MultiLineString(lines)
	}

	pub fn new_multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
		Geometry::MultiPolygon(polygons)
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Geometry::MultiPoint(g) => f.debug_tuple("MultiPoint").field(g).finish(),
			Geometry::MultiLineString(g) => f.debug_tuple("MultiLineString").field(g).finish(),
			Geometry::MultiPolygon(g) => f.debug_tuple("MultiPolygon").field(g).finish(),
			Geometry::Unknown => f.debug_tuple("Unknown").finish(),
		}
	}
}

/// Signed ring area, doubled, via the shoelace formula.
///
/// Positive for rings wound counterclockwise in a y-up axis convention,
/// which is the exterior-ring winding of the tile format. The ring is
/// treated as cyclic, so it works with or without a closing duplicate
/// point.
pub fn ring_area(ring: &[[f64; 2]]) -> f64 {
	let mut sum = 0f64;
	if let Some(mut previous) = ring.last() {
		for point in ring {
			sum += (previous[0] - point[0]) * (point[1] + previous[1]);
			previous = point;
		}
	}
	sum
}

/// Even-odd ray cast: is `(x, y)` inside the ring?
pub fn ring_contains(ring: &[[f64; 2]], x: f64, y: f64) -> bool {
	if ring.len() < 3 {
		return false;
	}

	let mut inside = false;
	let mut j = ring.len() - 1;

	for i in 0..ring.len() {
		let [xi, yi] = ring[i];
		let [xj, yj] = ring[j];
		if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
			inside = !inside;
		}
		j = i;
	}

	inside
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;

	fn square() -> Vec<[f64; 2]> {
		vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]
	}

	#[test]
	fn area_ccw_positive() {
		assert_eq!(ring_area(&square()), 200.0);
	}

	#[test]
	fn area_cw_negative() {
		let ring = vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]];
		assert_eq!(ring_area(&ring), -200.0);
	}

	#[test]
	fn area_ignores_the_closing_duplicate() {
		let open = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
		assert_eq!(ring_area(&open), 200.0);
	}

	#[test]
	fn area_empty() {
		assert_eq!(ring_area(&[]), 0.0);
	}

	#[test]
	fn contains_inside_and_outside() {
		let ring = square();
		assert!(ring_contains(&ring, 5.0, 5.0));
		assert!(ring_contains(&ring, 1.0, 9.0));
		assert!(!ring_contains(&ring, -1.0, 5.0));
		assert!(!ring_contains(&ring, 5.0, 11.0));
	}

	#[test]
	fn contains_on_degenerate_ring() {
		assert!(!ring_contains(&[], 0.0, 0.0));
		assert!(!ring_contains(&[[1.0, 1.0], [2.0, 2.0]], 1.5, 1.5));
	}

	#[test]
	fn debug_names_the_variant() {
		let geometry = Geometry::new_multi_point(vec![[1.0, 2.0]]);
		assert!(format!("{geometry:?}").starts_with("MultiPoint"));
		assert_eq!(format!("{:?}", Geometry::Unknown), "Unknown");
	}
}
