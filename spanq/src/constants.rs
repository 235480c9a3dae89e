//! Core constants for queue sizing and cache-line layout.

/// Destructive-interference granularity: two atomics this far apart never
/// invalidate each other's cache line. 128 bytes on Apple Silicon and
/// server ARM/POWER, 64 bytes on most x86-64.
#[cfg(any(target_arch = "aarch64", target_arch = "powerpc64"))]
pub const CACHE_LINE_SIZE: usize = 128;

/// Destructive-interference granularity: two atomics this far apart never
/// invalidate each other's cache line. 128 bytes on Apple Silicon and
/// server ARM/POWER, 64 bytes on most x86-64.
#[cfg(not(any(target_arch = "aarch64", target_arch = "powerpc64")))]
pub const CACHE_LINE_SIZE: usize = 64;

/// Default ring capacity for throughput drivers (must be a power of two)
pub const DEFAULT_RING_CAPACITY: usize = 64 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_line_size_is_power_of_two() {
        assert!(CACHE_LINE_SIZE.is_power_of_two());
        assert!(CACHE_LINE_SIZE >= 64);
    }

    #[test]
    fn default_ring_capacity_is_power_of_two() {
        assert!(DEFAULT_RING_CAPACITY.is_power_of_two());
    }
}
