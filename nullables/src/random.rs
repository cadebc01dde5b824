//! Nullable random: deterministic index source for access codes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use village_verification::RandomSource;

/// A deterministic random source for testing.
///
/// Returns pre-configured indices in order, cycling, and counts calls.
pub struct NullRandom {
    outputs: Mutex<Vec<usize>>,
    index: AtomicUsize,
}

impl NullRandom {
    /// Create with a sequence of deterministic indices.
    pub fn new(outputs: Vec<usize>) -> Self {
        Self {
            outputs: Mutex::new(outputs),
            index: AtomicUsize::new(0),
        }
    }

    /// Create with a single index that will be returned for every call.
    pub fn constant(value: usize) -> Self {
        Self::new(vec![value])
    }

    /// How many indices have been drawn so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

impl RandomSource for NullRandom {
    fn index(&self, bound: usize) -> usize {
        let outputs = self.outputs.lock().unwrap();
        let call = self.index.fetch_add(1, Ordering::SeqCst);
        if outputs.is_empty() {
            return 0;
        }
        outputs[call % outputs.len()] % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_outputs() {
        let random = NullRandom::new(vec![1, 40]);
        assert_eq!(random.index(32), 1);
        assert_eq!(random.index(32), 8);
        assert_eq!(random.index(32), 1);
        assert_eq!(random.calls(), 3);
    }
}
