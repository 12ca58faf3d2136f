use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::catalog::model::Shop;
use crate::foundation::error::{ShopframeError, ShopframeResult};

/// External provider of the current catalog snapshot.
pub trait CatalogSource: Send + Sync {
    /// Return the current shop.
    fn current_shop(&self) -> ShopframeResult<Shop>;
}

/// Reads a normalized shop document from a JSON file on every call.
#[derive(Clone, Debug)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    /// Source that re-reads `path` on every call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Catalog file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalogFile {
    fn current_shop(&self) -> ShopframeResult<Shop> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read catalog '{}'", self.path.display()))
            .map_err(|e| ShopframeError::retrieval(format!("{e:#}")))?;
        shop_from_json_str(&text)
    }
}

/// Parse a shop document and re-establish its ordering and validation invariants.
pub fn shop_from_json_str(text: &str) -> ShopframeResult<Shop> {
    let mut shop: Shop = serde_json::from_str(text)
        .map_err(|e| ShopframeError::validation(format!("parse catalog JSON: {e}")))?;
    shop.normalize()?;
    Ok(shop)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/source.rs"]
mod tests;
