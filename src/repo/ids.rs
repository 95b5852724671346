//! Commit id computation.
//!
//! Ids only need to look like Git hashes and stay unique within a
//! session; they are sha1 over the commit metadata plus a per-repo
//! sequence number, not a hash of any object encoding.

use sha1::{Digest, Sha1};

/// Compute a 40-char hex commit id.
pub fn commit_id(message: &str, parents: &[String], timestamp: u64, seq: u64) -> String {
    let mut hasher = Sha1::new();
    hasher.update(message.as_bytes());
    for parent in parents {
        hasher.update(parent.as_bytes());
    }
    hasher.update(timestamp.to_be_bytes());
    hasher.update(seq.to_be_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_forty_hex_chars() {
        let id = commit_id("Initial commit", &[], 1_700_000_000, 0);
        assert_eq!(id.len(), 40);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn sequence_number_disambiguates_identical_metadata() {
        let a = commit_id("same", &[], 1_700_000_000, 0);
        let b = commit_id("same", &[], 1_700_000_000, 1);
        assert_ne!(a, b);
    }
}
