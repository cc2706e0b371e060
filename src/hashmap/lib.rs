pub(crate) const MAP_INITIAL_EXP: u32 = 4;
pub const MAP_INITIAL_SIZE: usize = 1 << MAP_INITIAL_EXP;
pub const MAP_LOW_BOUND: f64 = 0.25;
pub const MAP_HIGH_BOUND: f64 = 0.75;
pub(crate) const MAP_STATS_VECTLEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    Grow,
    Shrink,
}

#[inline]
pub fn map_size(exp: u32) -> usize {
    1 << exp
}

#[inline]
pub fn map_size_mask(exp: u32) -> u64 {
    (map_size(exp) - 1) as u64
}

/// Exponent of the smallest power of two that is `>= size`.
pub fn next_exp(size: usize) -> u32 {
    if size <= 1 {
        return 0;
    }
    usize::BITS - (size - 1).leading_zeros()
}
