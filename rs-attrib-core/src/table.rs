use serde::{Deserialize, Serialize};

/// Load factor above which an insert triggers a rehash.
const TOO_FULL: f64 = 0.5;

/// Capacity multiplier applied on each rehash.
const GROWTH_RATIO: usize = 2;

/// Multiplier of the polynomial string hash. Retained as a placement-policy
/// invariant so probe behavior is reproducible across implementations;
/// callers must not depend on exact slot order.
const HASH_MULTIPLIER: usize = 37;

/// A key usable by [`AssociativeTable`].
///
/// The table supports fixed-length text windows and single characters,
/// not arbitrary key types; both map to a starting bucket through the
/// same seeded polynomial rule.
pub trait TableKey: Clone + PartialEq {
	/// Starting bucket of the probe sequence for a table of `cells` slots.
	fn bucket(&self, cells: usize) -> usize;
}

impl TableKey for String {
	/// Seeds with the first character's code point, then folds each
	/// subsequent character as `r = (37 * r + codepoint) mod cells`.
	fn bucket(&self, cells: usize) -> usize {
		let mut chars = self.chars();
		let mut r = match chars.next() {
			Some(first) => first as usize % cells,
			// Empty keys are degenerate input; park them in the first cell
			None => 0,
		};
		for c in chars {
			r = (HASH_MULTIPLIER * r + c as usize) % cells;
		}
		r
	}
}

impl TableKey for char {
	fn bucket(&self, cells: usize) -> usize {
		*self as usize % cells
	}
}

/// A single cell of the table.
///
/// Tombstones retain their stale key and value until the next rehash;
/// physically removing them would break probe sequences for keys
/// inserted past the deleted one.
#[derive(Serialize, Deserialize, Clone, Debug)]
enum Slot<K, V> {
	/// Never used since the last (re)allocation.
	Empty,
	/// Holds a live key-value pair.
	Occupied { key: K, value: V },
	/// Previously occupied, logically deleted.
	Tombstone { key: K, value: V },
}

/// Fixed-capacity open-addressing associative table with a default-value
/// policy, lazy tombstone deletion, and automatic growth.
///
/// ## Responsibilities
/// - Map keys to values through linear probing over a flat slot array
/// - Yield a fresh clone of the default value for never-inserted keys
/// - Mark removals as tombstones and drop them on the next rehash
/// - Double its capacity whenever the load factor exceeds 0.5 after an insert
///
/// ## Invariants
/// - `0 <= len() <= cells()`
/// - Every logical key lives in exactly one occupied slot
/// - `2 * len() <= cells()` immediately after any insert (rehash enforces this)
///
/// The table is exclusively owned by its creator and is not thread-safe.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AssociativeTable<K, V> {
	/// Prototype cloned whenever a lookup or insert falls back to the default.
	default: V,
	/// Flat slot array, probed linearly with wrap-around.
	slots: Vec<Slot<K, V>>,
	/// Number of occupied slots.
	count: usize,
}

impl<K: TableKey, V: Clone> AssociativeTable<K, V> {
	/// Creates a table with a fixed number of `cells`, yielding `default`
	/// upon a lookup of a key that has not previously been inserted.
	pub fn new(cells: usize, default: V) -> Self {
		// A zero-cell table has nothing to probe
		let cells = cells.max(1);
		Self {
			default,
			slots: vec![Slot::Empty; cells],
			count: 0,
		}
	}

	/// Index of the occupied slot holding `key`, if any.
	///
	/// Probing starts at the key's bucket and advances linearly with
	/// wrap-around. Tombstones are skipped; an empty slot ends the probe,
	/// since no key is ever placed past one.
	fn position(&self, key: &K) -> Option<usize> {
		let cells = self.slots.len();
		let start = key.bucket(cells);
		for step in 0..cells {
			let index = (start + step) % cells;
			match &self.slots[index] {
				Slot::Empty => return None,
				Slot::Occupied { key: held, .. } if held == key => return Some(index),
				_ => (),
			}
		}
		None
	}

	/// Returns the value associated with `key`, or a fresh clone of the
	/// default value if the key has not previously been inserted.
	pub fn get(&self, key: &K) -> V {
		match self.find(key) {
			Some(value) => value.clone(),
			None => self.default.clone(),
		}
	}

	/// Borrowing lookup: the value associated with `key`, or `None`.
	///
	/// Unlike [`get`](Self::get), a miss does not materialize a default.
	pub fn find(&self, key: &K) -> Option<&V> {
		match self.position(key) {
			Some(index) => match &self.slots[index] {
				Slot::Occupied { value, .. } => Some(value),
				_ => None,
			},
			None => None,
		}
	}

	/// Mutable defaulting access to the value associated with `key`.
	///
	/// If the key is absent, a fresh clone of the default value is inserted
	/// first (possibly triggering a rehash). Each fallback constructs an
	/// independent copy of the prototype, never a shared reference, so
	/// mutable defaults cannot alias across keys.
	pub fn entry(&mut self, key: &K) -> &mut V {
		if self.position(key).is_none() {
			let value = self.default.clone();
			self.set(key.clone(), value);
		}
		let index = match self.position(key) {
			Some(index) => index,
			// The insert above cannot be dropped while the load-factor
			// invariant keeps free slots available
			None => unreachable!("entry lost a freshly inserted key"),
		};
		match &mut self.slots[index] {
			Slot::Occupied { value, .. } => value,
			// position only ever points at occupied slots
			_ => unreachable!("entry resolved to a non-occupied slot"),
		}
	}

	/// Inserts `value` under `key`, or overwrites the existing value.
	///
	/// The probe writes into the first empty slot or the slot already
	/// holding `key`; tombstones are skipped and never resurrected. If the
	/// write occupied an empty slot and pushed the load factor past 0.5,
	/// the table rehashes. A probe that exhausts every slot drops the
	/// write silently; the load-factor trigger keeps that unreachable.
	pub fn set(&mut self, key: K, value: V) {
		let cells = self.slots.len();
		let start = key.bucket(cells);
		let mut target = None;
		for step in 0..cells {
			let index = (start + step) % cells;
			match &self.slots[index] {
				Slot::Empty => {
					target = Some((index, true));
					break;
				}
				Slot::Occupied { key: held, .. } if held == &key => {
					target = Some((index, false));
					break;
				}
				_ => (),
			}
		}
		if let Some((index, fresh)) = target {
			self.slots[index] = Slot::Occupied { key, value };
			if fresh {
				self.count += 1;
			}
		}
		if self.count as f64 / self.slots.len() as f64 > TOO_FULL {
			self.rehash();
		}
	}

	/// Removes the pairing for `key` by tombstoning its slot.
	///
	/// The entry is not physically removed until the next rehash; marking
	/// it keeps probe sequences intact for keys inserted past it.
	///
	/// # Errors
	/// Returns an error if the key is absent or already removed.
	pub fn remove(&mut self, key: &K) -> Result<(), String> {
		let index = match self.position(key) {
			Some(index) => index,
			None => return Err("Key was not found in table".to_owned()),
		};
		let slot = std::mem::replace(&mut self.slots[index], Slot::Empty);
		if let Slot::Occupied { key, value } = slot {
			self.slots[index] = Slot::Tombstone { key, value };
			self.count -= 1;
		}
		Ok(())
	}

	/// True if `key` currently maps to a live value.
	pub fn contains(&self, key: &K) -> bool {
		self.position(key).is_some()
	}

	/// All live keys, in table storage order (not insertion order).
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.slots.iter().filter_map(|slot| match slot {
			Slot::Occupied { key, .. } => Some(key),
			_ => None,
		})
	}

	/// All live values, in table storage order.
	pub fn values(&self) -> impl Iterator<Item = &V> {
		self.slots.iter().filter_map(|slot| match slot {
			Slot::Occupied { value, .. } => Some(value),
			_ => None,
		})
	}

	/// Number of live key-value pairings.
	pub fn len(&self) -> usize {
		self.count
	}

	/// True if the table holds no live pairing.
	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	/// Current slot capacity.
	pub fn cells(&self) -> usize {
		self.slots.len()
	}

	/// Grows the table and migrates the existing key-value pairs.
	///
	/// Allocates a fresh all-empty slot array at double the capacity and
	/// reinserts every occupied entry; tombstones are dropped here.
	fn rehash(&mut self) {
		let grown = self.slots.len() * GROWTH_RATIO;
		log::trace!("rehashing table: {} -> {} cells, {} live entries", self.slots.len(), grown, self.count);
		let old = std::mem::replace(&mut self.slots, vec![Slot::Empty; grown]);
		self.count = 0;
		for slot in old {
			if let Slot::Occupied { key, value } = slot {
				self.set(key, value);
			}
		}
		debug_assert!(self.count * 2 <= self.slots.len());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(s: &str) -> String {
		s.to_owned()
	}

	#[test]
	fn get_after_set_returns_value() {
		let mut table = AssociativeTable::new(8, 0);
		table.set(key("alpha"), 7);
		assert_eq!(table.get(&key("alpha")), 7);
		table.set(key("alpha"), 9);
		assert_eq!(table.get(&key("alpha")), 9);
		assert_eq!(table.len(), 1);
	}

	#[test]
	fn missing_key_yields_default() {
		let table: AssociativeTable<String, i32> = AssociativeTable::new(8, 42);
		assert!(table.is_empty());
		assert_eq!(table.get(&key("absent")), 42);
		assert!(table.find(&key("absent")).is_none());
		assert!(!table.contains(&key("absent")));
	}

	#[test]
	fn two_inserts_fixed_capacity() {
		let mut table = AssociativeTable::new(4, 0);
		table.set(key("a"), 1);
		table.set(key("b"), 2);
		assert_eq!(table.get(&key("a")), 1);
		assert_eq!(table.len(), 2);
		assert_eq!(table.cells(), 4);
	}

	#[test]
	fn remove_tombstones_the_entry() {
		let mut table = AssociativeTable::new(8, 0);
		table.set(key("a"), 1);
		table.set(key("b"), 2);
		table.remove(&key("a")).unwrap();
		assert!(!table.contains(&key("a")));
		assert_eq!(table.get(&key("a")), 0);
		assert_eq!(table.len(), 1);
		assert!(table.contains(&key("b")));
	}

	#[test]
	fn remove_missing_key_errors() {
		let mut table = AssociativeTable::new(8, 0);
		assert!(table.remove(&key("a")).is_err());
		table.set(key("a"), 1);
		table.remove(&key("a")).unwrap();
		let err = table.remove(&key("a")).unwrap_err();
		assert_eq!(err, "Key was not found in table");
	}

	#[test]
	fn tombstone_keeps_probe_chain_intact() {
		// "a" (97), "i" (105) and "q" (113) all start probing at bucket 1
		// of an 8-cell table, forming a single collision chain
		let mut table = AssociativeTable::new(8, 0);
		table.set(key("a"), 1);
		table.set(key("i"), 2);
		table.set(key("q"), 3);
		table.remove(&key("i")).unwrap();
		assert_eq!(table.get(&key("q")), 3);
		assert!(table.contains(&key("a")));
		assert_eq!(table.len(), 2);
		// A later colliding insert skips the tombstone instead of reviving it
		table.set(key("y"), 4);
		assert_eq!(table.get(&key("y")), 4);
		assert!(!table.contains(&key("i")));
	}

	#[test]
	fn load_factor_bounded_after_every_insert() {
		let mut table = AssociativeTable::new(4, 0);
		for (i, word) in ["one", "two", "three", "four", "five", "six", "seven"].into_iter().enumerate() {
			table.set(key(word), i);
			assert!(2 * table.len() <= table.cells());
		}
		assert_eq!(table.len(), 7);
	}

	#[test]
	fn rehash_preserves_live_entries_and_drops_tombstones() {
		let mut table = AssociativeTable::new(4, 0);
		table.set(key("a"), 1);
		table.set(key("b"), 2);
		table.remove(&key("a")).unwrap();
		// Third net insert pushes the load factor past 0.5 and doubles capacity
		table.set(key("c"), 3);
		table.set(key("d"), 4);
		table.set(key("e"), 5);
		assert!(table.cells() >= 8);
		let mut keys: Vec<String> = table.keys().cloned().collect();
		keys.sort();
		assert_eq!(keys, vec![key("b"), key("c"), key("d"), key("e")]);
		assert_eq!(table.get(&key("b")), 2);
		assert!(!table.contains(&key("a")));
	}

	#[test]
	fn entry_materializes_independent_defaults() {
		let mut outer: AssociativeTable<String, AssociativeTable<char, usize>> =
			AssociativeTable::new(8, AssociativeTable::new(4, 0));
		*outer.entry(&key("left")).entry(&'x') += 1;
		*outer.entry(&key("left")).entry(&'x') += 1;
		*outer.entry(&key("right")).entry(&'x') += 1;
		assert_eq!(outer.entry(&key("left")).get(&'x'), 2);
		assert_eq!(outer.entry(&key("right")).get(&'x'), 1);
		assert_eq!(outer.len(), 2);
	}

	#[test]
	fn char_keys_probe_by_code_point() {
		let mut table = AssociativeTable::new(4, 0usize);
		table.set('a', 3);
		table.set('b', 5);
		assert_eq!(table.get(&'a'), 3);
		assert_eq!(table.get(&'b'), 5);
		assert_eq!(table.get(&'z'), 0);
	}
}
