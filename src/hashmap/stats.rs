use std::fmt::{self, Display};

use crate::hashmap::hashmap::HashMap;
use crate::hashmap::lib::MAP_STATS_VECTLEN;

/// Chain length statistics of a map's bucket array.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStats {
    /// number of buckets
    pub size: usize,
    /// number of pairs
    pub used: usize,
    /// buckets holding at least one pair
    pub buckets: usize,
    pub max_chain_len: usize,
    pub total_chain_len: usize,
    /// `cl_vector[n]` counts chains of length `n`; the last slot collects longer ones
    pub cl_vector: Vec<usize>,
}

impl<K, V> HashMap<K, V> {
    pub fn stats(&self) -> MapStats {
        let mut stats = MapStats {
            size: self.capacity(),
            used: self.len(),
            buckets: 0,
            max_chain_len: 0,
            total_chain_len: 0,
            cl_vector: vec![0; MAP_STATS_VECTLEN],
        };
        for bucket in &self.buckets {
            let chain_len = bucket.len();
            stats.cl_vector[chain_len.min(MAP_STATS_VECTLEN - 1)] += 1;
            if chain_len == 0 {
                continue;
            }
            stats.buckets += 1;
            stats.max_chain_len = stats.max_chain_len.max(chain_len);
            stats.total_chain_len += chain_len;
        }
        stats
    }
}

impl Display for MapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.used == 0 {
            return writeln!(f, "Hash table stats: No stats available for empty maps");
        }
        writeln!(f, "Hash table stats:")?;
        writeln!(f, " table size: {}", self.size)?;
        writeln!(f, " number of elements: {}", self.used)?;
        writeln!(
            f,
            " different slots: {}, max chain length: {}",
            self.buckets, self.max_chain_len
        )?;
        writeln!(
            f,
            " avg chain length (counted): {:.2}, avg chain length (computed): {:.2}",
            self.total_chain_len as f64 / self.buckets as f64,
            self.used as f64 / self.buckets as f64
        )?;
        writeln!(f, " Chain length distribution:")?;
        for (len, &count) in self.cl_vector.iter().enumerate() {
            if count == 0 {
                continue;
            }
            writeln!(
                f,
                "   {}: {} ({:.2}%)",
                len,
                count,
                count as f64 * 100.0 / self.size as f64
            )?;
        }
        Ok(())
    }
}
