//! Deterministic content-hash identity for extracted evidence items.
//!
//! Two independently extracted items with the same category and key fields
//! resolve to the same token, which is what the assembler deduplicates on.
//! Key fields are trimmed and lower-cased before hashing so that incidental
//! whitespace or casing differences between completions do not split items.

use sha2::{Digest, Sha256};

use crate::enums::EvidenceCategory;

/// Number of hex characters of the SHA-256 digest kept in a token.
pub const IDENTITY_HASH_LEN: usize = 12;

/// Field separator inside the hashed payload (ASCII unit separator).
const FIELD_SEPARATOR: char = '\u{1f}';

/// Compute the identity token for an evidence item, e.g. `"pub-3f9a0c1b77de"`.
#[must_use]
pub fn item_identity<S: AsRef<str>>(category: EvidenceCategory, key_fields: &[S]) -> String {
    let mut payload = String::from(category.as_str());
    for field in key_fields {
        payload.push(FIELD_SEPARATOR);
        payload.push_str(&field.as_ref().trim().to_lowercase());
    }

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", category.prefix(), &digest[..IDENTITY_HASH_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_stable() {
        let a = item_identity(
            EvidenceCategory::Publication,
            &["Deep Nets", "NeurIPS", "2021"],
        );
        let b = item_identity(
            EvidenceCategory::Publication,
            &["Deep Nets", "NeurIPS", "2021"],
        );
        assert_eq!(a, b);
        assert!(a.starts_with("pub-"));
        assert_eq!(a.len(), 4 + IDENTITY_HASH_LEN);
    }

    #[test]
    fn identity_ignores_case_and_padding() {
        let a = item_identity(EvidenceCategory::Award, &["Turing Award", "ACM", "2019"]);
        let b = item_identity(EvidenceCategory::Award, &["  turing award ", "acm", "2019"]);
        assert_eq!(a, b);
    }

    #[test]
    fn changing_any_key_field_changes_identity() {
        let base = item_identity(
            EvidenceCategory::Publication,
            &["Deep Nets", "NeurIPS", "2021"],
        );
        for variant in [
            ["Deep Nets II", "NeurIPS", "2021"],
            ["Deep Nets", "ICML", "2021"],
            ["Deep Nets", "NeurIPS", "2022"],
        ] {
            assert_ne!(base, item_identity(EvidenceCategory::Publication, &variant));
        }
    }

    #[test]
    fn category_is_part_of_identity() {
        let award = item_identity(EvidenceCategory::Award, &["Best Paper", "ACL", "2020"]);
        let grant = item_identity(EvidenceCategory::Grant, &["Best Paper", "ACL", "2020"]);
        assert_ne!(award[4..], grant[4..]);
    }

    #[test]
    fn field_boundaries_are_significant() {
        let a = item_identity(EvidenceCategory::Membership, &["ab", "c"]);
        let b = item_identity(EvidenceCategory::Membership, &["a", "bc"]);
        assert_ne!(a, b);
    }
}
