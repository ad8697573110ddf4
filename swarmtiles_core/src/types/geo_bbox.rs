use std::fmt::Debug;

/// A geographical bounding box in degrees, ordered `west, south, east, north`.
///
/// # Example
/// ```
/// use swarmtiles_core::GeoBBox;
///
/// let bbox = GeoBBox::new(-10.0, -5.0, 10.0, 5.0);
/// assert_eq!(bbox.as_array(), [-10.0, -5.0, 10.0, 5.0]);
/// assert_eq!(bbox.midpoint(), [0.0, 0.0]);
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl GeoBBox {
	/// The full Web Mercator extent, used as the fallback when an archive
	/// header carries no usable bounds. The literals are kept exactly as
	/// published by existing archives, including the asymmetric rounding of
	/// the northern latitude.
	pub const WEB_MERCATOR: GeoBBox = GeoBBox {
		x_min: -180.0,
		y_min: -85.05112877980659,
		x_max: 180.0,
		y_max: 85.0511287798066,
	};

	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> GeoBBox {
		GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
	}

	/// Returns `[west, south, east, north]`.
	pub fn as_array(&self) -> [f64; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}

	/// Returns the center of the box as `[lon, lat]`.
	pub fn midpoint(&self) -> [f64; 2] {
		[(self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0]
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"GeoBBox({}, {}, {}, {})",
			self.x_min, self.y_min, self.x_max, self.y_max
		)
	}
}
