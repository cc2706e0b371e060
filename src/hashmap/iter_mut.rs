use std::iter::FusedIterator;
use std::slice;

use crate::hashmap::hashmap::{HashMap, MapEntry};

/// Iterator handing out mutable values in bucket order. Keys stay shared.
pub struct IterMut<'a, K, V> {
    buckets: slice::IterMut<'a, Vec<MapEntry<K, V>>>,
    chain: slice::IterMut<'a, MapEntry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub fn new(map: &'a mut HashMap<K, V>) -> Self {
        let remaining = map.len();
        IterMut {
            buckets: map.buckets.iter_mut(),
            chain: Default::default(),
            remaining,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                self.remaining -= 1;
                return Some((&entry.key, &mut entry.val));
            }
            self.chain = self.buckets.next()?.iter_mut();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}
