pub mod error;
pub mod hash;
pub mod hashmap;
pub mod iter;
pub mod iter_mut;
pub mod lib;
pub mod stats;
