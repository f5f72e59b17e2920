pub mod error;
pub mod key;
pub mod stats;
pub use crate::table::error::*;
pub use crate::table::key::*;
pub use crate::table::stats::*;

use std::{array, cell::Cell, fmt, io, iter::Enumerate, mem, slice};
use tracing::Level;

pub const TABLE_SIZE: usize = 100;

const DJB2_SEED: u64 = 5381;

// djb2: acc = acc * 33 + c, starting from 5381, wrapping on overflow.
// Bytes are added as signed chars, so 0x80.. lowers the accumulator.
pub fn djb2(bytes: &[u8]) -> u64 {
    let mut hash = DJB2_SEED;
    for &c in bytes {
        hash = (hash << 5)
            .wrapping_add(hash)
            .wrapping_add(c as i8 as i64 as u64);
    }
    hash
}

/// Home slot of `key` in a table of `TABLE_SIZE` slots.
pub fn hash(key: &str) -> usize {
    home_slot(key.as_bytes(), TABLE_SIZE)
}

fn home_slot(bytes: &[u8], slots: usize) -> usize {
    (djb2(bytes) % slots as u64) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<V> {
    pub key: Key,
    pub value: V,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted<V> {
    // An empty slot was claimed
    New { index: usize },
    // The key was already present, its value was overwritten
    Updated { index: usize, previous: V },
}

impl<V> Inserted<V> {
    pub fn index(&self) -> usize {
        match self {
            Inserted::New { index } => *index,
            Inserted::Updated { index, .. } => *index,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Inserted::Updated { .. })
    }
}

/// A table of `N` slots using open addressing with linear probing.
///
/// Slots are never freed, so a probe can stop at the first empty slot: any
/// key stored further along the chain would have been placed there instead.
#[derive(Debug, Clone)]
pub struct FixedHashTable<V = i32, const N: usize = TABLE_SIZE> {
    slots: Box<[Option<Record<V>>; N]>,
    len: usize,
    stats: Cell<TableStats>,
}

impl<V, const N: usize> Default for FixedHashTable<V, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, const N: usize> FixedHashTable<V, N> {
    const HAS_SLOTS: () = assert!(N > 0, "a table needs at least one slot");

    pub fn new() -> FixedHashTable<V, N> {
        let () = Self::HAS_SLOTS;
        FixedHashTable {
            slots: Box::new(array::from_fn(|_| None)),
            len: 0,
            stats: Cell::new(TableStats::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / N as f64
    }

    /// Home slot of `key` in this table.
    pub fn slot_of(&self, key: &str) -> usize {
        home_slot(key.as_bytes(), N)
    }

    fn probe_sequence(start: usize) -> impl Iterator<Item = usize> {
        (0..N).map(move |i| (start + i) % N)
    }

    /// Inserts `name` with `value`, or overwrites the value if `name` is
    /// already present. On failure the table is unchanged.
    #[tracing::instrument(level = "trace", skip(self, value))]
    pub fn insert(&mut self, name: &str, value: V) -> Result<Inserted<V>, TableError> {
        let key = Key::new(name).map_err(|e| {
            tracing::event!(Level::WARN, name = "Key too long", len = name.len());
            self.record_write(|s| s.rejected += 1, 0);
            e
        })?;
        self.insert_key(key, value)
    }

    pub fn insert_key(&mut self, key: Key, value: V) -> Result<Inserted<V>, TableError> {
        let start = home_slot(key.as_bytes(), N);
        let mut steps = 0;
        for index in Self::probe_sequence(start) {
            steps += 1;
            match self.slots[index].as_mut() {
                None => {
                    self.slots[index] = Some(Record { key, value });
                    self.len += 1;
                    self.record_write(|s| s.inserted += 1, steps);
                    return Ok(Inserted::New { index });
                }
                Some(record) if record.key == key => {
                    let previous = mem::replace(&mut record.value, value);
                    tracing::event!(Level::DEBUG, name = "Updated in place", key = %key, index);
                    self.record_write(|s| s.updated += 1, steps);
                    return Ok(Inserted::Updated { index, previous });
                }
                Some(_) => {}
            }
        }
        tracing::event!(Level::WARN, name = "Table full", key = %key, capacity = N);
        self.record_write(|s| s.rejected += 1, steps);
        Err(TableError::TableFull { capacity: N })
    }

    pub fn get(&self, name: &str) -> Option<&Record<V>> {
        if name.len() > MAX_KEY_LEN {
            self.record_lookup(false, 0);
            return None;
        }
        let mut steps = 0;
        let mut found = None;
        for index in Self::probe_sequence(home_slot(name.as_bytes(), N)) {
            steps += 1;
            match &self.slots[index] {
                None => break,
                Some(record) if record.key.as_str() == name => {
                    found = Some(record);
                    break;
                }
                Some(_) => {}
            }
        }
        self.record_lookup(found.is_some(), steps);
        found
    }

    pub fn get_value(&self, name: &str) -> Option<&V> {
        self.get(name).map(|record| &record.value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The record stored at `index`, if that slot is occupied.
    pub fn slot(&self, index: usize) -> Option<&Record<V>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter().enumerate(),
        }
    }

    pub fn stats(&self) -> TableStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(TableStats::default());
    }

    fn record_write(&self, count: impl FnOnce(&mut TableStats), steps: usize) {
        let mut stats = self.stats.get();
        count(&mut stats);
        stats.probes += steps;
        self.stats.set(stats);
    }

    fn record_lookup(&self, hit: bool, steps: usize) {
        let mut stats = self.stats.get();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        stats.probes += steps;
        self.stats.set(stats);
    }
}

impl<V: fmt::Display, const N: usize> FixedHashTable<V, N> {
    /// Writes one `[index] key : value` line per occupied slot.
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.dump(&mut lock)
    }
}

impl<V: fmt::Display, const N: usize> fmt::Display for FixedHashTable<V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, record) in self.iter() {
            writeln!(f, "[{}] {} : {}", index, record.key, record.value)?;
        }
        Ok(())
    }
}

pub struct Iter<'a, V> {
    slots: Enumerate<slice::Iter<'a, Option<Record<V>>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, &'a Record<V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .find_map(|(index, slot)| slot.as_ref().map(|record| (index, record)))
    }
}

impl<'a, V, const N: usize> IntoIterator for &'a FixedHashTable<V, N> {
    type Item = (usize, &'a Record<V>);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
