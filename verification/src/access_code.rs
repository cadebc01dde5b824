//! Access code minting.
//!
//! Codes look like `YC25-K7PQ2M`: a fixed prefix and six symbols from an
//! alphabet without look-alike glyphs (no `0`/`O`, `1`/`I`). Codes are not
//! unique by construction; the account store's unique index on the code is
//! what rejects a collision.

use std::sync::Arc;

use rand::Rng;
use village_types::AccessCode;

pub const CODE_PREFIX: &str = "YC25-";

/// 24 letters and 8 digits.
pub const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const CODE_BODY_LEN: usize = 6;

/// Uniform index source for code generation.
pub trait RandomSource: Send + Sync {
    /// A uniformly distributed value in `0..bound`.
    fn index(&self, bound: usize) -> usize;
}

/// Thread-local OS-seeded RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}

pub struct AccessCodeGenerator {
    random: Arc<dyn RandomSource>,
}

impl AccessCodeGenerator {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    pub fn generate(&self) -> AccessCode {
        let mut code = String::with_capacity(CODE_PREFIX.len() + CODE_BODY_LEN);
        code.push_str(CODE_PREFIX);
        for _ in 0..CODE_BODY_LEN {
            let idx = self.random.index(CODE_ALPHABET.len()) % CODE_ALPHABET.len();
            code.push(CODE_ALPHABET[idx] as char);
        }
        AccessCode::new(code)
    }

    /// Whether `code` has the shape this generator produces.
    pub fn is_well_formed(code: &str) -> bool {
        match code.strip_prefix(CODE_PREFIX) {
            Some(body) => {
                body.len() == CODE_BODY_LEN && body.bytes().all(|b| CODE_ALPHABET.contains(&b))
            }
            None => false,
        }
    }
}

impl Default for AccessCodeGenerator {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    impl RandomSource for Counting {
        fn index(&self, _bound: usize) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[test]
    fn alphabet_excludes_ambiguous_glyphs() {
        for c in [b'0', b'O', b'1', b'I'] {
            assert!(!CODE_ALPHABET.contains(&c));
        }
        let mut sorted = CODE_ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 32);
    }

    #[test]
    fn generated_code_uses_random_indices_in_order() {
        let gen = AccessCodeGenerator::new(Arc::new(Counting(AtomicUsize::new(0))));
        assert_eq!(gen.generate().as_str(), "YC25-ABCDEF");
        assert_eq!(gen.generate().as_str(), "YC25-GHJKLM");
    }

    #[test]
    fn out_of_range_index_wraps() {
        let gen = AccessCodeGenerator::new(Arc::new(Counting(AtomicUsize::new(31))));
        assert_eq!(gen.generate().as_str(), "YC25-9ABCDE");
    }

    #[test]
    fn thread_random_codes_are_well_formed() {
        let gen = AccessCodeGenerator::default();
        for _ in 0..200 {
            let code = gen.generate();
            assert!(AccessCodeGenerator::is_well_formed(code.as_str()), "{code}");
        }
    }

    #[test]
    fn malformed_codes_detected() {
        assert!(AccessCodeGenerator::is_well_formed("YC25-K7PQ2M"));
        assert!(!AccessCodeGenerator::is_well_formed("YC25-K7PQ2"));
        assert!(!AccessCodeGenerator::is_well_formed("YC25-K7PQ0M"));
        assert!(!AccessCodeGenerator::is_well_formed("yc25-K7PQ2M"));
        assert!(!AccessCodeGenerator::is_well_formed("K7PQ2M"));
    }
}
