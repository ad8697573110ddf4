use crate::geo::Geometry;

/// Wire geometry type of a feature (field 3).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GeomType {
	#[default]
	Unknown = 0,
	MultiPoint = 1,
	MultiLineString = 2,
	MultiPolygon = 3,
}

impl GeomType {
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}
}

impl From<u64> for GeomType {
	fn from(value: u64) -> Self {
		match value {
			1 => GeomType::MultiPoint,
			2 => GeomType::MultiLineString,
			3 => GeomType::MultiPolygon,
			_ => GeomType::Unknown,
		}
	}
}

impl From<&Geometry> for GeomType {
	fn from(geometry: &Geometry) -> Self {
		match geometry {
			Geometry::MultiPoint(_) => GeomType::MultiPoint,
			Geometry::MultiLineString(_) => GeomType::MultiLineString,
			Geometry::MultiPolygon(_) => GeomType::MultiPolygon,
			Geometry::Unknown => GeomType::Unknown,
		}
	}
}
