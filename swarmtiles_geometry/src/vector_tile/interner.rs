use crate::geo::{GeoProperties, GeoValue};
use anyhow::{Context, Result, anyhow, ensure};
use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// Append-only lookup table mapping entries to their wire index.
#[derive(Clone, PartialEq)]
pub struct InternTable<T>
where
	T: Clone + Eq + Hash,
{
	list: Vec<T>,
	map: HashMap<T, u32>,
}

impl<T> InternTable<T>
where
	T: Clone + Debug + Eq + Hash,
{
	pub fn new() -> InternTable<T> {
		InternTable {
			list: Vec::new(),
			map: HashMap::new(),
		}
	}

	/// Returns the index of `entry`, appending it on first use.
	pub fn add(&mut self, entry: T) -> u32 {
		if let Some(index) = self.map.get(&entry) {
			return *index;
		}
		let index = self.list.len() as u32;
		self.map.insert(entry.clone(), index);
		self.list.push(entry);
		index
	}

	/// Appends unconditionally, preserving wire position.
	///
	/// Used when rebuilding a table from a decoded layer: indices are
	/// positional there, so a duplicate entry must keep its own slot.
	pub fn push(&mut self, entry: T) {
		if !self.map.contains_key(&entry) {
			self.map.insert(entry.clone(), self.list.len() as u32);
		}
		self.list.push(entry);
	}

	pub fn get(&self, index: u32) -> Result<&T> {
		self
			.list
			.get(index as usize)
			.ok_or_else(|| anyhow!("index {index} is outside the table (length {})", self.list.len()))
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
		self.list.iter()
	}

	pub fn len(&self) -> usize {
		self.list.len()
	}

	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}
}

impl<T: Clone + Debug + Eq + Hash> Default for InternTable<T> {
	fn default() -> InternTable<T> {
		InternTable::new()
	}
}

impl<T> Debug for InternTable<T>
where
	T: Clone + Debug + Eq + Hash,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.list).finish()
	}
}

/// Per-layer key and value tables.
///
/// Keys intern by exact string equality; values by typed equality, so
/// `Int(1)` and `String("1")` occupy separate slots. Tables grow in
/// first-use order and live only as long as the layer they belong to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyInterner {
	pub keys: InternTable<String>,
	pub values: InternTable<GeoValue>,
}

impl PropertyInterner {
	pub fn new() -> Self {
		Self {
			keys: InternTable::new(),
			values: InternTable::new(),
		}
	}

	/// Interns the properties of one feature into alternating
	/// key-index/value-index pairs. Null-valued properties are dropped,
	/// neither encoded nor interned.
	pub fn encode_tags(&mut self, properties: &GeoProperties) -> Vec<u32> {
		let mut tag_ids = Vec::new();

		for (key, value) in properties.iter() {
			if *value == GeoValue::Null {
				continue;
			}
			tag_ids.push(self.keys.add(key.clone()));
			tag_ids.push(self.values.add(value.clone()));
		}

		tag_ids
	}

	/// Resolves alternating index pairs back into properties.
	pub fn decode_tags(&self, tag_ids: &[u32]) -> Result<GeoProperties> {
		ensure!(tag_ids.len().is_multiple_of(2), "Tag IDs must come in pairs");
		let mut properties = GeoProperties::new();

		for pair in tag_ids.chunks_exact(2) {
			properties.insert(
				self.keys.get(pair[0]).context("Failed to resolve property key")?.clone(),
				self.values.get(pair[1]).context("Failed to resolve property value")?.clone(),
			);
		}

		Ok(properties)
	}
}
