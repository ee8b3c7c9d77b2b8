//! Canonical index digests (versioned).
//!
//! A fitted classifier is only meaningful against the exact symptom columns and
//! class labels it was trained with. Artifacts record the digest of both
//! indices so a skewed deployment is refused at startup instead of serving
//! wrong labels.
//!
//! - algorithm: **FNV-1a 64-bit**
//! - input: a domain tag followed by `<position>=<name>;` for every entry in
//!   position (or class id) order
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! This digest is **not** a security primitive. Artifact integrity is covered
//! separately by the SHA-256 checksums of the model container.

use crate::ClassId;

/// Prefix used in serialized digests.
pub const INDEX_DIGEST_V1_PREFIX: &str = "fnv1a64:";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

fn add(hash: &mut u64, s: &str) {
    for b in s.as_bytes() {
        *hash ^= (*b) as u64;
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

/// Compute a v1 digest (FNV-1a 64-bit) over arbitrary bytes.
pub fn fnv1a64_digest_bytes(bytes: &[u8]) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    format!("{INDEX_DIGEST_V1_PREFIX}{hash:016x}")
}

/// Digest of a symptom index given its names in position order.
pub fn symptom_index_digest_v1<'a>(names_in_position_order: impl IntoIterator<Item = &'a str>) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    add(&mut hash, "symptom_index|");
    for (position, name) in names_in_position_order.into_iter().enumerate() {
        add(&mut hash, &position.to_string());
        add(&mut hash, "=");
        add(&mut hash, name);
        add(&mut hash, ";");
    }

    format!("{INDEX_DIGEST_V1_PREFIX}{hash:016x}")
}

/// Digest of a disease label index given `(class id, name)` pairs in class-id order.
pub fn label_index_digest_v1<'a>(entries: impl IntoIterator<Item = (ClassId, &'a str)>) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    add(&mut hash, "label_index|");
    for (class_id, name) in entries {
        add(&mut hash, &class_id.to_string());
        add(&mut hash, "=");
        add(&mut hash, name);
        add(&mut hash, ";");
    }

    format!("{INDEX_DIGEST_V1_PREFIX}{hash:016x}")
}
