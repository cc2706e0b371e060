use std::fmt::{self, Debug};
use std::hash::Hash;
use std::mem;

use tracing::debug;

use crate::config::MapConfig;
use crate::hashmap::error::MapError;
use crate::hashmap::hash::sys_hash;
use crate::hashmap::lib::*;

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
}

impl<K, V> MapEntry<K, V> {
    pub fn new(key: K, val: V) -> Self {
        Self { key, val }
    }

    #[inline]
    pub fn get_key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn get_val(&self) -> &V {
        &self.val
    }

    #[inline]
    pub fn get_val_mut(&mut self) -> &mut V {
        &mut self.val
    }

    #[inline]
    pub fn set_val(&mut self, val: V) -> V {
        mem::replace(&mut self.val, val)
    }

    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.val)
    }
}

/// A separate-chaining hash map.
///
/// Keys are spread over `capacity` buckets (always a power of two) by
/// `hash(key) & (capacity - 1)`, each bucket keeping its pairs in insertion
/// order. The map doubles its bucket array when `len / capacity` exceeds the
/// high bound after an insert and halves it, never below the configured floor,
/// when the factor drops under the low bound after an erase.
///
/// Iterators and cursors borrow the map, so they can't outlive it or observe a
/// structural mutation.
pub struct HashMap<K, V> {
    /// buckets, `1 << size_exp` of them
    pub(crate) buckets: Vec<Vec<MapEntry<K, V>>>,
    /// number of live pairs
    used: usize,
    /// exponent of size. (capacity = 1<<exp)
    pub(crate) size_exp: u32,
    /// the bucket array never shrinks below 1<<min_exp
    min_exp: u32,
    low_bound: f64,
    high_bound: f64,
}

fn empty_buckets<K, V>(n: usize) -> Vec<Vec<MapEntry<K, V>>> {
    let mut buckets = Vec::with_capacity(n);
    buckets.resize_with(n, Vec::new);
    buckets
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map with 16 buckets.
    pub fn new() -> Self {
        Self {
            buckets: empty_buckets(MAP_INITIAL_SIZE),
            used: 0,
            size_exp: MAP_INITIAL_EXP,
            min_exp: MAP_INITIAL_EXP,
            low_bound: MAP_LOW_BOUND,
            high_bound: MAP_HIGH_BOUND,
        }
    }

    /// Creates an empty map tuned by `config`, starting at `config.min_capacity` buckets.
    pub fn with_config(config: MapConfig) -> Result<Self, MapError> {
        config.validate()?;
        let exp = next_exp(config.min_capacity);
        Ok(Self {
            buckets: empty_buckets(map_size(exp)),
            used: 0,
            size_exp: exp,
            min_exp: exp,
            low_bound: config.low_bound,
            high_bound: config.high_bound,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        map_size(self.size_exp)
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.used as f64 / self.capacity() as f64
    }

    /// Drops every pair and returns the bucket array to its floor size.
    pub fn clear(&mut self) {
        self.buckets = empty_buckets(map_size(self.min_exp));
        self.size_exp = self.min_exp;
        self.used = 0;
    }

    #[inline]
    fn exceeds_high_bound(&self, used: usize) -> bool {
        used as f64 / self.capacity() as f64 > self.high_bound
    }

    #[inline]
    fn below_low_bound(&self) -> bool {
        self.load_factor() < self.low_bound && self.size_exp > self.min_exp
    }
}

impl<K, V> HashMap<K, V>
where
    K: Eq + Hash,
{
    /// Builds a map from positional keys and values. A key seen twice keeps
    /// the value paired with its last occurrence.
    pub fn from_vecs(keys: Vec<K>, values: Vec<V>) -> Result<Self, MapError> {
        if keys.len() != values.len() {
            return Err(MapError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut map = Self::new();
        for (key, val) in keys.into_iter().zip(values) {
            map.upsert(key, val);
        }
        Ok(map)
    }

    #[inline]
    fn key_index(&self, key: &K) -> usize {
        (sys_hash(key) & map_size_mask(self.size_exp)) as usize
    }

    /// Locates `key` as (bucket index, position in bucket).
    fn find(&self, key: &K) -> Option<(usize, usize)> {
        let idx = self.key_index(key);
        self.buckets[idx]
            .iter()
            .position(|entry| entry.key == *key)
            .map(|pos| (idx, pos))
    }

    /// Appends a key known to be absent, growing first if the pair would push
    /// the load factor over the high bound.
    fn insert_new(&mut self, key: K, val: V) -> &mut V {
        if self.exceeds_high_bound(self.used + 1) {
            self.resize(ResizeDirection::Grow);
        }
        let idx = self.key_index(&key);
        let bucket = &mut self.buckets[idx];
        bucket.push(MapEntry::new(key, val));
        self.used += 1;
        let pos = bucket.len() - 1;
        &mut bucket[pos].val
    }

    fn upsert(&mut self, key: K, val: V) {
        match self.find(&key) {
            Some((idx, pos)) => {
                self.buckets[idx][pos].set_val(val);
            }
            None => {
                self.insert_new(key, val);
            }
        }
    }

    /// Inserts a new pair. Returns `false`, leaving the map untouched, when
    /// the key is already present.
    pub fn insert(&mut self, key: K, val: V) -> bool {
        if self.find(&key).is_some() {
            return false;
        }
        self.insert_new(key, val);
        true
    }

    /// Returns the value slot for `key`, inserting `V::default()` first when
    /// the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        match self.find(&key) {
            Some((idx, pos)) => self.buckets[idx][pos].get_val_mut(),
            None => self.insert_new(key, V::default()),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|(idx, pos)| &self.buckets[idx][pos].val)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (idx, pos) = self.find(key)?;
        Some(self.buckets[idx][pos].get_val_mut())
    }

    pub fn at(&self, key: &K) -> Result<&V, MapError> {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Index of the bucket currently holding `key`.
    pub fn bucket_index(&self, key: &K) -> Result<usize, MapError> {
        self.find(key).map(|(idx, _)| idx).ok_or(MapError::KeyNotFound)
    }

    /// Length of the chain holding `key`, the key itself included. An absent
    /// key is an error even if its would-be bucket is occupied.
    pub fn bucket_size(&self, key: &K) -> Result<usize, MapError> {
        let idx = self.bucket_index(key)?;
        Ok(self.buckets[idx].len())
    }

    /// Removes `key` and returns its value, shrinking the bucket array when
    /// the load factor falls under the low bound.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (idx, pos) = self.find(key)?;
        let entry = self.buckets[idx].remove(pos);
        self.used -= 1;
        if self.below_low_bound() {
            self.resize(ResizeDirection::Shrink);
        }
        Some(entry.val)
    }

    pub fn erase(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Rehashes every pair into a fresh bucket array, old buckets in index
    /// order and each chain front to back.
    fn resize(&mut self, direction: ResizeDirection) {
        let new_exp = match direction {
            ResizeDirection::Grow => self.size_exp + 1,
            ResizeDirection::Shrink => self.size_exp.saturating_sub(1).max(self.min_exp),
        };
        if new_exp == self.size_exp {
            return;
        }
        // every key is hashed before any pair moves, a panicking hash leaves the map intact
        let mask = map_size_mask(new_exp);
        let new_idx: Vec<usize> = self
            .buckets
            .iter()
            .flatten()
            .map(|entry| (sys_hash(&entry.key) & mask) as usize)
            .collect();
        let mut new_buckets = empty_buckets(map_size(new_exp));
        for (entry, idx) in mem::take(&mut self.buckets).into_iter().flatten().zip(new_idx) {
            new_buckets[idx].push(entry);
        }
        debug!(
            "{:?} map capacity {} -> {}, size {}",
            direction,
            map_size(self.size_exp),
            map_size(new_exp),
            self.used
        );
        self.buckets = new_buckets;
        self.size_exp = new_exp;
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for HashMap<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            used: self.used,
            size_exp: self.size_exp,
            min_exp: self.min_exp,
            low_bound: self.low_bound,
            high_bound: self.high_bound,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.buckets.clone_from(&source.buckets);
        self.used = source.used;
        self.size_exp = source.size_exp;
        self.min_exp = source.min_exp;
        self.low_bound = source.low_bound;
        self.high_bound = source.high_bound;
    }
}

impl<K, V> PartialEq for HashMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        other
            .iter()
            .all(|(key, val)| self.get(key).is_some_and(|own| own == val))
    }
}

impl<K, V> Eq for HashMap<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

impl<K, V> Debug for HashMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for HashMap<K, V>
where
    K: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(key, val)| self.upsert(key, val));
    }
}
