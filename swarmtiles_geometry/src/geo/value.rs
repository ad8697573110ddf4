use std::fmt::{Debug, Display};

/// Typed property value as it appears in a vector tile.
///
/// Two values of different variants are never equal, so `Int(1)` and
/// `String("1")` intern to separate table entries. [`GeoValue::Null`]
/// exists only in the model; the encoder drops null-valued properties.
#[derive(Clone, Debug, PartialEq)]
pub enum GeoValue {
	String(String),
	F32(f32),
	F64(f64),
	Int(i64),
	UInt(u64),
	Bool(bool),
	Null,
}

impl Eq for GeoValue {}

impl std::hash::Hash for GeoValue {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		core::mem::discriminant(self).hash(state);
		match self {
			GeoValue::String(v) => v.hash(state),
			GeoValue::F32(v) => v.to_bits().hash(state),
			GeoValue::F64(v) => v.to_bits().hash(state),
			GeoValue::Int(v) => v.hash(state),
			GeoValue::UInt(v) => v.hash(state),
			GeoValue::Bool(v) => v.hash(state),
			GeoValue::Null => (),
		}
	}
}

impl From<&str> for GeoValue {
	fn from(value: &str) -> Self {
		GeoValue::String(value.to_string())
	}
}

impl From<String> for GeoValue {
	fn from(value: String) -> Self {
		GeoValue::String(value)
	}
}

impl From<f32> for GeoValue {
	fn from(value: f32) -> Self {
		GeoValue::F32(value)
	}
}

impl From<f64> for GeoValue {
	fn from(value: f64) -> Self {
		GeoValue::F64(value)
	}
}

impl From<i32> for GeoValue {
	fn from(value: i32) -> Self {
		if value < 0 {
			GeoValue::Int(value as i64)
		} else {
			GeoValue::UInt(value as u64)
		}
	}
}

impl From<i64> for GeoValue {
	fn from(value: i64) -> Self {
		GeoValue::Int(value)
	}
}

impl From<u32> for GeoValue {
	fn from(value: u32) -> Self {
		GeoValue::UInt(value as u64)
	}
}

impl From<u64> for GeoValue {
	fn from(value: u64) -> Self {
		GeoValue::UInt(value)
	}
}

impl From<bool> for GeoValue {
	fn from(value: bool) -> Self {
		GeoValue::Bool(value)
	}
}

impl Display for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GeoValue::String(v) => write!(f, "{v}"),
			GeoValue::F32(v) => write!(f, "{v}"),
			GeoValue::F64(v) => write!(f, "{v}"),
			GeoValue::Int(v) => write!(f, "{v}"),
			GeoValue::UInt(v) => write!(f, "{v}"),
			GeoValue::Bool(v) => write!(f, "{v}"),
			GeoValue::Null => write!(f, "null"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::{
		collections::hash_map::DefaultHasher,
		hash::{Hash, Hasher},
	};

	fn hash_of(value: &GeoValue) -> u64 {
		let mut hasher = DefaultHasher::new();
		value.hash(&mut hasher);
		hasher.finish()
	}

	#[test]
	fn variants_never_compare_equal_across_types() {
		assert_ne!(GeoValue::Int(1), GeoValue::UInt(1));
		assert_ne!(GeoValue::Int(1), GeoValue::from("1"));
		assert_ne!(GeoValue::F32(1.0), GeoValue::F64(1.0));
		assert_ne!(GeoValue::Bool(true), GeoValue::UInt(1));
	}

	#[test]
	fn from_conversions_pick_the_matching_variant() {
		assert_eq!(GeoValue::from("a"), GeoValue::String("a".to_string()));
		assert_eq!(GeoValue::from(1.5f32), GeoValue::F32(1.5));
		assert_eq!(GeoValue::from(1.5f64), GeoValue::F64(1.5));
		assert_eq!(GeoValue::from(-7i32), GeoValue::Int(-7));
		assert_eq!(GeoValue::from(7i32), GeoValue::UInt(7));
		assert_eq!(GeoValue::from(-7i64), GeoValue::Int(-7));
		assert_eq!(GeoValue::from(7u64), GeoValue::UInt(7));
		assert_eq!(GeoValue::from(true), GeoValue::Bool(true));
	}

	#[test]
	fn hash_distinguishes_variants_with_the_same_bits() {
		assert_ne!(hash_of(&GeoValue::Int(1)), hash_of(&GeoValue::UInt(1)));
		assert_eq!(hash_of(&GeoValue::F64(2.5)), hash_of(&GeoValue::F64(2.5)));
	}

	#[test]
	fn display() {
		assert_eq!(GeoValue::from("x").to_string(), "x");
		assert_eq!(GeoValue::Null.to_string(), "null");
		assert_eq!(GeoValue::Int(-3).to_string(), "-3");
	}
}
