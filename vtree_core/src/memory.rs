//! Heap accounting for values held in long-lived caches.

/// Bytes a value owns on the heap, not counting the value itself.
pub trait IndirectMemoryUsage {
    fn indirect_memory_usage(&self) -> usize;
}

impl<T> IndirectMemoryUsage for Vec<T> {
    fn indirect_memory_usage(&self) -> usize {
        self.capacity() * std::mem::size_of::<T>()
    }
}

/// Default estimator used by [`TreeEntry::indirect_size_bytes`](crate::TreeEntry::indirect_size_bytes).
pub fn estimate_indirect_memory_usage<T: IndirectMemoryUsage + ?Sized>(value: &T) -> usize {
    value.indirect_memory_usage()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_reports_capacity() {
        let mut v: Vec<u8> = Vec::with_capacity(64);
        v.extend_from_slice(b"abc");
        assert_eq!(estimate_indirect_memory_usage(&v), 64);
        assert_eq!(estimate_indirect_memory_usage(&Vec::<u8>::new()), 0);
    }
}
