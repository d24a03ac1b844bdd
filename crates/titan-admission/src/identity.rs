//! Job name generation.

use titan_types::IdentityGenerator;
use uuid::Uuid;

pub const JOB_NAME_PREFIX: &str = "training-job-";
pub const MIN_SUFFIX_LEN: usize = 6;
pub const MAX_SUFFIX_LEN: usize = 32;
pub const DEFAULT_SUFFIX_LEN: usize = 8;

/// `training-job-<hex>` names with the suffix cut from a fresh v4 UUID.
///
/// The first 12 hex digits of a v4 UUID are fully random, so suffixes up to that length carry
/// 4 bits per character. Uniqueness is enforced by the store, not here.
#[derive(Debug, Clone)]
pub struct RandomSuffixGenerator {
    suffix_len: usize,
}

impl RandomSuffixGenerator {
    /// `suffix_len` is clamped to `MIN_SUFFIX_LEN..=MAX_SUFFIX_LEN`.
    pub fn new(suffix_len: usize) -> Self {
        Self {
            suffix_len: suffix_len.clamp(MIN_SUFFIX_LEN, MAX_SUFFIX_LEN),
        }
    }

    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }
}

impl Default for RandomSuffixGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX_LEN)
    }
}

impl IdentityGenerator for RandomSuffixGenerator {
    fn generate(&self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("{}{}", JOB_NAME_PREFIX, &hex[..self.suffix_len])
    }
}
