//! Marching-squares contour extraction over a scalar grid.
//!
//! Follows the d3-contour formulation: every 2x2 sample window emits
//! oriented segments from a 16-case table, segments are stitched into closed
//! rings, integer-coordinate ring points are moved to the linear crossing
//! between their bracketing samples, and rings are grouped into polygons by
//! winding and containment. The grid is walked with a one-cell frame of
//! implicit below-threshold samples around it, so every ring closes.
//!
//! Sample `(i, j)` sits at point `(i + 0.5, j + 0.5)` with y growing
//! downward; ring coordinates cover `[0, width] x [0, height]`. NaN samples
//! compare below every threshold.

use std::collections::HashMap;

/// One oriented segment of a cell case, offsets relative to the cell.
type Segment = [[f64; 2]; 2];

/// Segments per case. The case index sets one bit per sample of the window
/// that is at or above the threshold: 1 = bottom-left, 2 = bottom-right,
/// 4 = top-right, 8 = top-left. Segments keep the above-threshold region on
/// their left.
static CASES: [&[Segment]; 16] = [
	&[],
	&[[[1.0, 1.5], [0.5, 1.0]]],
	&[[[1.5, 1.0], [1.0, 1.5]]],
	&[[[1.5, 1.0], [0.5, 1.0]]],
	&[[[1.0, 0.5], [1.5, 1.0]]],
	&[[[1.0, 0.5], [0.5, 1.0]], [[1.0, 1.5], [1.5, 1.0]]],
	&[[[1.0, 0.5], [1.0, 1.5]]],
	&[[[1.0, 0.5], [0.5, 1.0]]],
	&[[[0.5, 1.0], [1.0, 0.5]]],
	&[[[1.0, 1.5], [1.0, 0.5]]],
	&[[[0.5, 1.0], [1.0, 0.5]], [[1.5, 1.0], [1.0, 1.5]]],
	&[[[1.5, 1.0], [1.0, 0.5]]],
	&[[[0.5, 1.0], [1.5, 1.0]]],
	&[[[1.0, 1.5], [1.5, 1.0]]],
	&[[[0.5, 1.0], [1.0, 1.5]]],
	&[],
];

/// Contours `values` (row major, `width * height` samples) at `threshold`
/// and groups the closed rings into polygons.
///
/// Rings wind the d3 way for y-down coordinates: exterior rings carry
/// positive cross area, holes negative. Each hole attaches to the first
/// polygon whose exterior ring contains one of its points; a hole contained
/// by nothing is dropped.
pub(crate) fn contour_polygons(
	values: &[f64],
	width: usize,
	height: usize,
	threshold: f64,
) -> Vec<Vec<Vec<[f64; 2]>>> {
	let mut polygons: Vec<Vec<Vec<[f64; 2]>>> = Vec::new();
	let mut holes: Vec<Vec<[f64; 2]>> = Vec::new();

	for mut ring in isorings(values, width, height, threshold) {
		smooth_ring(&mut ring, values, width, height, threshold);
		if cross_area(&ring) > 0.0 {
			polygons.push(vec![ring]);
		} else {
			holes.push(ring);
		}
	}

	for hole in holes {
		if let Some(polygon) = polygons.iter_mut().find(|p| ring_encloses(&p[0], &hole)) {
			polygon.push(hole);
		}
	}
	polygons
}

/// Walks the framed grid cell by cell and stitches case segments into
/// closed rings.
fn isorings(values: &[f64], width: usize, height: usize, threshold: f64) -> Vec<Vec<[f64; 2]>> {
	let mut stitcher = Stitcher::new(width);
	let above = |i: usize| usize::from(values[i] >= threshold);

	// top frame row, the samples above it count as below
	let mut y: i64 = -1;
	let mut t1 = above(0);
	stitcher.emit(CASES[t1 << 1], -1, y);
	for x in 0..width as i64 - 1 {
		let t0 = t1;
		t1 = above(x as usize + 1);
		stitcher.emit(CASES[t0 | t1 << 1], x, y);
	}
	stitcher.emit(CASES[t1], width as i64 - 1, y);

	// interior rows
	while y < height as i64 - 2 {
		y += 1;
		let row = y as usize * width;
		let mut t1 = above(row + width);
		let mut t2 = above(row);
		stitcher.emit(CASES[t1 << 1 | t2 << 2], -1, y);
		for x in 0..width as i64 - 1 {
			let t0 = t1;
			t1 = above(row + width + x as usize + 1);
			let t3 = t2;
			t2 = above(row + x as usize + 1);
			stitcher.emit(CASES[t0 | t1 << 1 | t2 << 2 | t3 << 3], x, y);
		}
		stitcher.emit(CASES[t1 | t2 << 3], width as i64 - 1, y);
	}

	// bottom frame row
	y = height as i64 - 1;
	let row = y as usize * width;
	let mut t2 = above(row);
	stitcher.emit(CASES[t2 << 2], -1, y);
	for x in 0..width as i64 - 1 {
		let t3 = t2;
		t2 = above(row + x as usize + 1);
		stitcher.emit(CASES[t2 << 2 | t3 << 3], x, y);
	}
	stitcher.emit(CASES[t2 << 3], width as i64 - 1, y);

	stitcher.rings
}

struct Fragment {
	start: i64,
	end: i64,
	ring: Vec<[f64; 2]>,
}

/// Joins cell segments into rings by matching segment endpoints against the
/// open ends of partial rings.
struct Stitcher {
	width: usize,
	by_start: HashMap<i64, usize>,
	by_end: HashMap<i64, usize>,
	fragments: Vec<Option<Fragment>>,
	rings: Vec<Vec<[f64; 2]>>,
}

impl Stitcher {
	fn new(width: usize) -> Stitcher {
		Stitcher {
			width,
			by_start: HashMap::new(),
			by_end: HashMap::new(),
			fragments: Vec::new(),
			rings: Vec::new(),
		}
	}

	/// Endpoint key. Coordinates are half-integers here, doubling makes
	/// them exact integers.
	fn index(&self, point: [f64; 2]) -> i64 {
		(point[0] * 2.0 + point[1] * (self.width as f64 + 1.0) * 4.0) as i64
	}

	fn emit(&mut self, case: &[Segment], x: i64, y: i64) {
		for segment in case {
			self.stitch(segment, x, y);
		}
	}

	fn stitch(&mut self, segment: &Segment, x: i64, y: i64) {
		let start = [segment[0][0] + x as f64, segment[0][1] + y as f64];
		let end = [segment[1][0] + x as f64, segment[1][1] + y as f64];
		let start_index = self.index(start);
		let end_index = self.index(end);

		if let Some(f) = self.by_end.remove(&start_index) {
			match self.by_start.remove(&end_index) {
				Some(g) if f == g => {
					// the fragment bites its own tail, the ring is done
					if let Some(mut fragment) = self.fragments[f].take() {
						fragment.ring.push(end);
						self.rings.push(fragment.ring);
					}
				}
				Some(g) => {
					// two fragments meet at this segment, splice them
					if let Some(tail) = self.fragments[g].take() {
						let tail_end = tail.end;
						if let Some(head) = self.fragments[f].as_mut() {
							head.ring.extend(tail.ring);
							head.end = tail_end;
							self.by_end.insert(tail_end, f);
						}
					}
				}
				None => {
					if let Some(fragment) = self.fragments[f].as_mut() {
						fragment.ring.push(end);
						fragment.end = end_index;
						self.by_end.insert(end_index, f);
					}
				}
			}
		} else if let Some(f) = self.by_start.remove(&end_index) {
			if let Some(fragment) = self.fragments[f].as_mut() {
				fragment.ring.insert(0, start);
				fragment.start = start_index;
				self.by_start.insert(start_index, f);
			}
		} else {
			let id = self.fragments.len();
			self.fragments.push(Some(Fragment {
				start: start_index,
				end: end_index,
				ring: vec![start, end],
			}));
			self.by_start.insert(start_index, id);
			self.by_end.insert(end_index, id);
		}
	}
}

/// Moves every integer-coordinate ring point to the linear threshold
/// crossing between the two samples it separates. Frame points and
/// half-integer points stay put.
fn smooth_ring(ring: &mut [[f64; 2]], values: &[f64], width: usize, height: usize, threshold: f64) {
	for point in ring {
		let [x, y] = *point;
		let xi = x as usize;
		let yi = y as usize;
		if x > 0.0 && x < width as f64 && xi as f64 == x {
			let v0 = valid(values[yi * width + xi - 1]);
			let v1 = valid(values[yi * width + xi]);
			point[0] = smooth1(x, v0, v1, threshold);
		}
		if y > 0.0 && y < height as f64 && yi as f64 == y {
			let v0 = valid(values[(yi - 1) * width + xi]);
			let v1 = valid(values[yi * width + xi]);
			point[1] = smooth1(y, v0, v1, threshold);
		}
	}
}

/// NaN samples interpolate like negative infinity, pulling the crossing
/// onto the valid side.
fn valid(v: f64) -> f64 {
	if v.is_nan() { f64::NEG_INFINITY } else { v }
}

fn smooth1(x: f64, v0: f64, v1: f64, value: f64) -> f64 {
	let a = value - v0;
	let b = v1 - v0;
	let d = if a.is_finite() || b.is_finite() {
		a / b
	} else {
		a.signum() / b.signum()
	};
	if d.is_nan() { x } else { x + d - 0.5 }
}

/// Twice the signed ring area, positive for exterior winding in y-down
/// coordinates.
fn cross_area(ring: &[[f64; 2]]) -> f64 {
	let n = ring.len();
	let mut area = ring[n - 1][1] * ring[0][0] - ring[n - 1][0] * ring[0][1];
	for i in 1..n {
		area += ring[i - 1][1] * ring[i][0] - ring[i - 1][0] * ring[i][1];
	}
	area
}

/// Whether `hole` belongs inside `ring`: decided by the first hole point
/// that is strictly inside or outside; points on the boundary are skipped.
fn ring_encloses(ring: &[[f64; 2]], hole: &[[f64; 2]]) -> bool {
	for point in hole {
		let position = ring_position(ring, *point);
		if position != 0 {
			return position == 1;
		}
	}
	true
}

/// Ray-cast position of `point` relative to `ring`: 1 inside, -1 outside,
/// 0 on the boundary.
fn ring_position(ring: &[[f64; 2]], point: [f64; 2]) -> i32 {
	let [x, y] = point;
	let mut contains = -1;
	let mut j = ring.len() - 1;
	for i in 0..ring.len() {
		let [xi, yi] = ring[i];
		let [xj, yj] = ring[j];
		if segment_contains(ring[i], ring[j], point) {
			return 0;
		}
		if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
			contains = -contains;
		}
		j = i;
	}
	contains
}

fn segment_contains(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
	if !collinear(a, b, c) {
		return false;
	}
	let i = usize::from(a[0] == b[0]);
	within(a[i], c[i], b[i])
}

fn collinear(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
	(b[0] - a[0]) * (c[1] - a[1]) == (c[0] - a[0]) * (b[1] - a[1])
}

fn within(p: f64, q: f64, r: f64) -> bool {
	(p <= q && q <= r) || (r <= q && q <= p)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn a_single_peak_contours_to_a_diamond() {
		#[rustfmt::skip]
		let values = vec![
			0.0, 0.0, 0.0,
			0.0, 1.0, 0.0,
			0.0, 0.0, 0.0,
		];
		let polygons = contour_polygons(&values, 3, 3, 0.5);

		// midway crossings around sample (1, 1), closed, wound positive
		assert_eq!(
			polygons,
			vec![vec![vec![
				[2.0, 1.5],
				[1.5, 1.0],
				[1.0, 1.5],
				[1.5, 2.0],
				[2.0, 1.5],
			]]]
		);
		assert!(cross_area(&polygons[0][0]) > 0.0);
	}

	#[test]
	fn a_single_sample_grid_contours_to_a_diamond() {
		let polygons = contour_polygons(&[1.0], 1, 1, 0.5);
		assert_eq!(
			polygons,
			vec![vec![vec![
				[1.0, 0.5],
				[0.5, 0.0],
				[0.0, 0.5],
				[0.5, 1.0],
				[1.0, 0.5],
			]]]
		);
	}

	#[test]
	fn a_full_plateau_contours_to_the_frame() {
		let polygons = contour_polygons(&[1.0; 4], 2, 2, 0.5);

		// the ring hugs the frame, nothing to smooth
		assert_eq!(
			polygons,
			vec![vec![vec![
				[2.0, 1.5],
				[2.0, 0.5],
				[1.5, 0.0],
				[0.5, 0.0],
				[0.0, 0.5],
				[0.0, 1.5],
				[0.5, 2.0],
				[1.5, 2.0],
				[2.0, 1.5],
			]]]
		);
	}

	#[test]
	fn a_donut_attaches_its_hole() {
		#[rustfmt::skip]
		let values = vec![
			0.0, 0.0, 0.0, 0.0, 0.0,
			0.0, 1.0, 1.0, 1.0, 0.0,
			0.0, 1.0, 0.0, 1.0, 0.0,
			0.0, 1.0, 1.0, 1.0, 0.0,
			0.0, 0.0, 0.0, 0.0, 0.0,
		];
		let polygons = contour_polygons(&values, 5, 5, 0.5);

		assert_eq!(polygons.len(), 1);
		assert_eq!(polygons[0].len(), 2);
		assert!(cross_area(&polygons[0][0]) > 0.0);
		assert!(cross_area(&polygons[0][1]) < 0.0);
		// the hole surrounds the below-threshold center sample
		assert_eq!(ring_position(&polygons[0][0], [2.5, 2.5]), 1);
		assert_eq!(ring_position(&polygons[0][1], [2.5, 2.5]), 1);
	}

	#[test]
	fn separate_peaks_become_separate_polygons() {
		#[rustfmt::skip]
		let values = vec![
			0.0, 0.0, 0.0, 0.0, 0.0,
			0.0, 1.0, 0.0, 1.0, 0.0,
			0.0, 0.0, 0.0, 0.0, 0.0,
		];
		let polygons = contour_polygons(&values, 5, 3, 0.5);
		assert_eq!(polygons.len(), 2);
	}

	#[test]
	fn smoothing_interpolates_the_crossing() {
		// threshold 2.5 between samples 10 and 0 crosses 0.75 of the way
		// toward the low sample, the diamond widens accordingly
		#[rustfmt::skip]
		let values = vec![
			0.0, 0.0, 0.0,
			0.0, 10.0, 0.0,
			0.0, 0.0, 0.0,
		];
		let polygons = contour_polygons(&values, 3, 3, 2.5);

		assert_eq!(
			polygons,
			vec![vec![vec![
				[2.25, 1.5],
				[1.5, 0.75],
				[0.75, 1.5],
				[1.5, 2.25],
				[2.25, 1.5],
			]]]
		);
	}

	#[test]
	fn nan_compares_below_every_threshold() {
		// the NaN corner stays outside the plateau ring
		#[rustfmt::skip]
		let values = vec![
			1.0, 1.0, 1.0,
			1.0, 1.0, 1.0,
			1.0, 1.0, f64::NAN,
		];
		let polygons = contour_polygons(&values, 3, 3, 0.5);

		assert_eq!(polygons.len(), 1);
		assert_eq!(polygons[0].len(), 1);
		let ring = &polygons[0][0];
		assert_eq!(ring_position(ring, [2.5, 2.5]), -1);
		assert_eq!(ring_position(ring, [1.0, 1.0]), 1);
	}

	#[test]
	fn sample_equal_to_the_threshold_counts_as_above() {
		let polygons = contour_polygons(&[5.0], 1, 1, 5.0);
		assert_eq!(polygons.len(), 1);
	}
}
