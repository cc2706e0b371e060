use std::iter::FusedIterator;

use crate::hashmap::hashmap::{HashMap, MapEntry};
use crate::hashmap::iter_mut::IterMut;

/// A position in a map: bucket index plus position inside that bucket's chain.
///
/// `begin()` sits on the first pair of the first non-empty bucket and `end()`
/// one past the last pair of the last bucket. Two cursors compare equal when
/// they point at the same position; comparing cursors of different maps is
/// meaningless.
#[derive(Debug)]
pub struct Cursor<'a, K, V> {
    map: &'a HashMap<K, V>,
    bucket: usize,
    pos: usize,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    #[inline]
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The pair under the cursor, `None` at the end.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.map
            .buckets
            .get(self.bucket)?
            .get(self.pos)
            .map(|entry| (&entry.key, &entry.val))
    }

    pub fn entry(&self) -> Option<&'a MapEntry<K, V>> {
        self.map.buckets.get(self.bucket)?.get(self.pos)
    }

    pub fn is_end(&self) -> bool {
        *self == self.map.end()
    }

    /// Steps to the next pair, skipping empty buckets. Stays put at the end.
    pub fn move_next(&mut self) {
        let last = self.map.buckets.len() - 1;
        if self.pos < self.map.buckets[self.bucket].len() {
            self.pos += 1;
        }
        while self.pos == self.map.buckets[self.bucket].len() && self.bucket < last {
            self.bucket += 1;
            self.pos = 0;
        }
    }
}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.bucket == other.bucket && self.pos == other.pos
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

/// Borrowing iterator over the pairs of a map, bucket by bucket.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub fn new(map: &'a HashMap<K, V>) -> Self {
        Iter {
            cursor: map.begin(),
            remaining: map.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.cursor.get()?;
        self.cursor.move_next();
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[derive(Debug, Clone)]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

#[derive(Debug, Clone)]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, val)| val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Owning iterator, yields pairs in bucket order.
#[derive(Debug)]
pub struct IntoIter<K, V> {
    buckets: std::vec::IntoIter<Vec<MapEntry<K, V>>>,
    chain: std::vec::IntoIter<MapEntry<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                self.remaining -= 1;
                return Some(entry.into_pair());
            }
            self.chain = self.buckets.next()?.into_iter();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> HashMap<K, V> {
    pub fn begin(&self) -> Cursor<'_, K, V> {
        match self.buckets.iter().position(|bucket| !bucket.is_empty()) {
            Some(bucket) => Cursor { map: self, bucket, pos: 0 },
            None => self.end(),
        }
    }

    pub fn end(&self) -> Cursor<'_, K, V> {
        let bucket = self.buckets.len() - 1;
        Cursor {
            map: self,
            bucket,
            pos: self.buckets[bucket].len(),
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut HashMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for HashMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.len();
        IntoIter {
            buckets: self.buckets.into_iter(),
            chain: Vec::new().into_iter(),
            remaining,
        }
    }
}
