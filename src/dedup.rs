//! Host-side duplicate suppression for advertisement reports.

use heapless::Deque;

/// Remembers the last `N` advertiser addresses seen.
///
/// When full, the oldest address is forgotten to make room, so a device that
/// falls out of the window is reported again.
pub struct DuplicateFilter<const N: usize> {
    seen: Deque<[u8; 6], N>,
}

impl<const N: usize> DuplicateFilter<N> {
    pub const fn new() -> Self {
        Self { seen: Deque::new() }
    }

    /// Record `addr`. Returns `true` the first time an address is seen.
    pub fn observe(&mut self, addr: &[u8; 6]) -> bool {
        if N == 0 {
            return true;
        }
        if self.seen.iter().any(|seen| seen == addr) {
            return false;
        }
        if self.seen.is_full() {
            self.seen.pop_front();
        }
        let _ = self.seen.push_back(*addr);
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

impl<const N: usize> Default for DuplicateFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [u8; 6] = [0xAA, 0, 0, 0, 0, 1];
    const B: [u8; 6] = [0xBB, 0, 0, 0, 0, 2];
    const C: [u8; 6] = [0xCC, 0, 0, 0, 0, 3];

    #[test]
    fn first_sighting_passes_repeats_do_not() {
        let mut filter: DuplicateFilter<4> = DuplicateFilter::new();
        assert!(filter.observe(&A));
        assert!(!filter.observe(&A));
        assert!(filter.observe(&B));
        assert!(!filter.observe(&A));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn oldest_address_is_evicted_when_full() {
        let mut filter: DuplicateFilter<2> = DuplicateFilter::new();
        assert!(filter.observe(&A));
        assert!(filter.observe(&B));
        assert!(filter.observe(&C)); // evicts A
        assert!(!filter.observe(&B));
        assert!(filter.observe(&A));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut filter: DuplicateFilter<2> = DuplicateFilter::new();
        filter.observe(&A);
        filter.clear();
        assert!(filter.is_empty());
        assert!(filter.observe(&A));
    }
}
