//! Secret-Derived Chip Sequence Generator
//!
//! ## Example
//!
//! ```rust
//! use dsss_core::spreading::{chips_per_symbol, ChipSequenceGenerator};
//!
//! let cps = chips_per_symbol("TEST"); // 16 chips per symbol
//! let seq = ChipSequenceGenerator::generate("TEST", cps, 3);
//! assert_eq!(seq.len(), 48);
//! assert_eq!(seq.symbol_chips(1).len(), 16);
//!
//! // Same secret, same chips
//! assert_eq!(seq, ChipSequenceGenerator::generate("TEST", cps, 3));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use sha2::{Digest, Sha256};

use super::{CHIPS_PER_SECRET_CHAR, MIN_CHIPS_PER_SYMBOL};

/// Spreading factor policy: `max(8, 4 × characters in secret)`
pub fn chips_per_symbol(secret: &str) -> usize {
    MIN_CHIPS_PER_SYMBOL.max(CHIPS_PER_SECRET_CHAR * secret.chars().count())
}

/// 256-bit seed folded from a secret phrase
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChipSeed([u8; 32]);

impl ChipSeed {
    /// Derive the seed of a secret (SHA-256 of its UTF-8 bytes)
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        Self(seed)
    }

    /// Raw seed bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for ChipSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are enough to tell seeds apart in logs
        write!(
            f,
            "ChipSeed({:02x}{:02x}{:02x}{:02x}..)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// A ±1 chip stream covering a whole message, one run of
/// `chips_per_symbol` chips per symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipSequence {
    chips: Vec<i8>,
    chips_per_symbol: usize,
}

impl ChipSequence {
    /// All chips, symbol after symbol
    pub fn chips(&self) -> &[i8] {
        &self.chips
    }

    /// Chips spread over one symbol
    pub fn chips_per_symbol(&self) -> usize {
        self.chips_per_symbol
    }

    /// Number of symbols covered
    pub fn num_symbols(&self) -> usize {
        if self.chips_per_symbol == 0 {
            0
        } else {
            self.chips.len() / self.chips_per_symbol
        }
    }

    /// Total number of chips
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// True when the sequence covers no symbols
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// The chip run assigned to symbol `index`
    ///
    /// Panics if `index >= num_symbols()`.
    pub fn symbol_chips(&self, index: usize) -> &[i8] {
        let start = index * self.chips_per_symbol;
        &self.chips[start..start + self.chips_per_symbol]
    }

    /// Iterate over the per-symbol chip runs
    pub fn symbol_runs(&self) -> std::slice::ChunksExact<'_, i8> {
        self.chips.chunks_exact(self.chips_per_symbol.max(1))
    }
}

/// Deterministic chip generator seeded from a secret phrase
pub struct ChipSequenceGenerator {
    rng: ChaCha12Rng,
    seed: ChipSeed,
}

impl ChipSequenceGenerator {
    /// Create a generator for a secret
    pub fn new(secret: &str) -> Self {
        Self::from_seed(ChipSeed::from_secret(secret))
    }

    /// Create a generator from an already derived seed
    pub fn from_seed(seed: ChipSeed) -> Self {
        Self {
            rng: ChaCha12Rng::from_seed(*seed.as_bytes()),
            seed,
        }
    }

    /// Seed this generator was built from
    pub fn seed(&self) -> ChipSeed {
        self.seed
    }

    /// Generate the next chip (+1 or -1)
    pub fn next_chip(&mut self) -> i8 {
        if self.rng.gen_bool(0.5) {
            1
        } else {
            -1
        }
    }

    /// Restart the stream from the beginning
    pub fn reset(&mut self) {
        self.rng = ChaCha12Rng::from_seed(*self.seed.as_bytes());
    }

    /// Draw the chips for `symbols` symbols from the current position
    pub fn take_sequence(&mut self, chips_per_symbol: usize, symbols: usize) -> ChipSequence {
        let chips = (0..chips_per_symbol * symbols)
            .map(|_| self.next_chip())
            .collect();
        ChipSequence {
            chips,
            chips_per_symbol,
        }
    }

    /// Generate the chip sequence of a secret from the start of its stream
    pub fn generate(secret: &str, chips_per_symbol: usize, symbols: usize) -> ChipSequence {
        Self::new(secret).take_sequence(chips_per_symbol, symbols)
    }
}

impl std::fmt::Debug for ChipSequenceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChipSequenceGenerator")
            .field("seed", &self.seed)
            .finish()
    }
}
