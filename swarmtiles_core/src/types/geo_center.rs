use crate::types::GeoBBox;
use std::fmt::Debug;

/// A map center: longitude, latitude and a suggested zoom level.
#[derive(Clone, Copy, PartialEq)]
pub struct GeoCenter {
	pub lon: f64,
	pub lat: f64,
	pub zoom: u8,
}

impl GeoCenter {
	pub fn new(lon: f64, lat: f64, zoom: u8) -> GeoCenter {
		GeoCenter { lon, lat, zoom }
	}

	/// Center of `bbox` at half the maximum zoom, the fallback when an
	/// archive header carries no center zoom.
	pub fn from_bbox(bbox: &GeoBBox, max_zoom: u8) -> GeoCenter {
		let [lon, lat] = bbox.midpoint();
		GeoCenter {
			lon,
			lat,
			zoom: max_zoom / 2,
		}
	}

	/// Returns `[lon, lat, zoom]`.
	pub fn as_array(&self) -> [f64; 3] {
		[self.lon, self.lat, f64::from(self.zoom)]
	}
}

impl Debug for GeoCenter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "GeoCenter({}, {}, z{})", self.lon, self.lat, self.zoom)
	}
}
