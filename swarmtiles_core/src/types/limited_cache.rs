use std::{collections::HashMap, fmt::Debug, hash::Hash, mem::swap};

/// A map with an optional entry cap and access-ordered cleanup.
///
/// Used as the torrent piece cache: unbounded by default (pieces live for the
/// life of the source), with an opt-in cap for very large archives. When the
/// cap is reached, the least recently used half of the entries is dropped.
pub struct LimitedCache<K, V> {
	cache: HashMap<K, (V, u64)>,
	max_length: Option<usize>,
	last_index: u64,
}

impl<K, V> LimitedCache<K, V>
where
	K: Clone + Eq + Hash,
	V: Clone,
{
	/// An unbounded cache.
	pub fn new() -> Self {
		Self {
			cache: HashMap::new(),
			max_length: None,
			last_index: 0,
		}
	}

	/// A cache holding at most `max_length` entries.
	pub fn with_maximum_length(max_length: usize) -> Self {
		assert!(max_length >= 1, "cache must hold at least one entry");
		Self {
			cache: HashMap::new(),
			max_length: Some(max_length),
			last_index: 0,
		}
	}

	pub fn get(&mut self, key: &K) -> Option<V> {
		self.last_index += 1;
		let last_index = self.last_index;
		self.cache.get_mut(key).map(|entry| {
			entry.1 = last_index;
			entry.0.clone()
		})
	}

	/// Inserts `value` under `key` and returns the cached value. If the key
	/// is already present the existing value is kept and returned.
	pub fn add(&mut self, key: K, value: V) -> V {
		if let Some(max_length) = self.max_length {
			if self.cache.len() >= max_length {
				self.cleanup();
			}
		}
		self.last_index += 1;
		self.cache.entry(key).or_insert((value, self.last_index)).0.clone()
	}

	pub fn len(&self) -> usize {
		self.cache.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.is_empty()
	}

	// Drops the least recently used half of the entries.
	fn cleanup(&mut self) {
		let mut indexes: Vec<u64> = self.cache.values().map(|entry| entry.1).collect();
		indexes.sort_unstable();
		let median = indexes[indexes.len() / 2];

		let mut cache = HashMap::with_capacity(self.cache.len());
		swap(&mut cache, &mut self.cache);
		self.cache = cache.into_iter().filter(|(_, entry)| entry.1 > median).collect();

		self.last_index += 1;
		let last_index = self.last_index;
		self.cache.values_mut().for_each(|entry| entry.1 = last_index);
	}
}

impl<K, V> Default for LimitedCache<K, V>
where
	K: Clone + Eq + Hash,
	V: Clone,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Debug, V> Debug for LimitedCache<K, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LimitedCache")
			.field("length", &self.cache.len())
			.field("max_length", &self.max_length)
			.finish()
	}
}
