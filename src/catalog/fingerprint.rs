use std::fmt::Write as _;

use sha2::Digest as _;

use crate::catalog::model::{Entry, Section};

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        let _ = write!(out, "{b:02x}");
    }
    out
}

impl Entry {
    /// Cache identity of the rendered tile.
    ///
    /// Covers tile size, id, final price, bundle presence and the banner. Name, description and
    /// image URL are not part of it: entries differing only in those share one cached artifact.
    pub fn fingerprint(&self) -> String {
        let banner = match self.banner() {
            Some(b) => format!("{}.{}", b.backend_value, b.intensity),
            None => "false".to_string(),
        };
        let material = format!(
            "{}.{}.{}.{}.{}",
            self.tile_size(),
            self.id(),
            self.final_price(),
            self.is_bundle(),
            banner
        );
        sha256_hex(material.as_bytes())
    }
}

impl Section {
    /// Cache identity of the rendered section: its id plus the ordered entry fingerprints.
    pub fn fingerprint(&self) -> String {
        let entries: Vec<String> = self.entries().iter().map(Entry::fingerprint).collect();
        let material = format!("{};{}", self.id(), entries.join(";"));
        sha256_hex(material.as_bytes())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/fingerprint.rs"]
mod tests;
