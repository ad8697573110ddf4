use crate::TerrainError;
use std::str::FromStr;

/// RGB packing scheme of a raster elevation tile.
///
/// Both schemes store one height sample per pixel across the red, green and
/// blue channels; the alpha channel is ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElevationEncoding {
	/// `height = -10000 + (R * 65536 + G * 256 + B) * 0.1`
	Mapbox,
	/// `height = R * 256 + G + B - 32768`
	Terrarium,
}

impl ElevationEncoding {
	/// Decodes one pixel into a height in meters.
	pub fn decode(self, r: u8, g: u8, b: u8) -> f64 {
		let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
		match self {
			ElevationEncoding::Mapbox => -10000.0 + (r * 65536.0 + g * 256.0 + b) * 0.1,
			ElevationEncoding::Terrarium => r * 256.0 + g + b - 32768.0,
		}
	}
}

impl FromStr for ElevationEncoding {
	type Err = TerrainError;

	fn from_str(value: &str) -> Result<ElevationEncoding, TerrainError> {
		match value {
			"mapbox" => Ok(ElevationEncoding::Mapbox),
			"terrarium" => Ok(ElevationEncoding::Terrarium),
			_ => Err(TerrainError::EncodingNotAllowed {
				name: value.to_string(),
			}),
		}
	}
}
