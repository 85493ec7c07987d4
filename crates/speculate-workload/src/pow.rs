//! Proof-of-work search (candidate branch A)
//!
//! Hashes `block_data || decimal(nonce)` with SHA-256 for increasing
//! nonces until the digest starts with `difficulty` zero hex digits.
//! The search has no upper bound; only a match or cancellation ends it.

use crate::cancel::CancelSignal;
use crate::error::WorkloadError;
use crate::workload::Workload;
use sha2::{Digest, Sha256};

/// Block data hashed in front of the nonce unless configured otherwise
pub const DEFAULT_BLOCK_DATA: &str = "datos_del_bloque";

/// Hex digits in a SHA-256 digest; no larger difficulty is satisfiable
pub const MAX_DIFFICULTY: usize = 64;

/// A nonce satisfying the difficulty, with its digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowSolution {
    /// Counter appended to the block data
    pub nonce: u64,
    /// Lowercase hex SHA-256 digest of the message
    pub hash: String,
}

/// Cancellable proof-of-work search
#[derive(Debug, Clone)]
pub struct ProofOfWork {
    block_data: String,
    difficulty: usize,
}

impl ProofOfWork {
    /// Create a search over `block_data` requiring `difficulty` leading zero hex digits
    #[must_use]
    pub fn new(block_data: impl Into<String>, difficulty: usize) -> Self {
        Self {
            block_data: block_data.into(),
            difficulty,
        }
    }

    /// Required number of leading zero hex digits
    #[inline]
    #[must_use]
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Fixed block data
    #[inline]
    #[must_use]
    pub fn block_data(&self) -> &str {
        &self.block_data
    }

    /// SHA-256 of the block data followed by the decimal nonce
    #[must_use]
    pub fn digest(&self, nonce: u64) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.block_data.as_bytes());
        hasher.update(nonce.to_string().as_bytes());
        hasher.finalize().into()
    }

    /// Check that `solution` reproduces its hash and meets the difficulty
    #[must_use]
    pub fn verify(&self, solution: &PowSolution) -> bool {
        let digest = self.digest(solution.nonce);
        hex::encode(digest) == solution.hash && leading_zero_hex_digits(&digest) >= self.difficulty
    }
}

impl Workload for ProofOfWork {
    type Output = PowSolution;

    fn name(&self) -> &'static str {
        "proof-of-work"
    }

    fn run(&self, signal: &CancelSignal) -> Result<PowSolution, WorkloadError> {
        let mut nonce: u64 = 0;
        loop {
            signal.check()?;

            let digest = self.digest(nonce);
            if leading_zero_hex_digits(&digest) >= self.difficulty {
                tracing::debug!(nonce, difficulty = self.difficulty, "proof-of-work found");
                return Ok(PowSolution {
                    nonce,
                    hash: hex::encode(digest),
                });
            }
            nonce += 1;
        }
    }
}

/// Number of leading `0` digits in the lowercase hex rendering of `bytes`
#[must_use]
pub fn leading_zero_hex_digits(bytes: &[u8]) -> usize {
    let mut count = 0;
    for byte in bytes {
        if *byte == 0 {
            count += 2;
            continue;
        }
        if byte >> 4 == 0 {
            count += 1;
        }
        break;
    }
    count
}
