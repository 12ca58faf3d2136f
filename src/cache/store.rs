use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::assets::decode::{decode_image, encode_png};
use crate::assets::source::AssetSource;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::render::surface::Surface;

const TEMP_SUFFIX: &str = ".tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Byte encoding used for text entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// UTF-8 (default).
    #[default]
    Utf8,
    /// UTF-16, little endian, no BOM.
    Utf16Le,
    /// One byte per char; only code points up to U+00FF can be written.
    Latin1,
    /// The stored bytes are the hex-decoded text; reading yields lowercase hex.
    Hex,
}

/// Filesystem-backed store of named blobs in one flat directory.
///
/// Every write replaces the whole entry. Writes land in a unique temp file first and are renamed
/// into place, so concurrent writers of identical content never expose a truncated file.
#[derive(Clone, Debug)]
pub struct ContentCache {
    root: PathBuf,
}

impl ContentCache {
    /// Open (and create if needed) the cache directory.
    pub fn open(root: impl Into<PathBuf>) -> ShopframeResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create cache directory '{}'", root.display()))
            .map_err(storage)?;
        Ok(Self { root })
    }

    /// Cache directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `true` when an entry named `name` exists. Invalid names never exist.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|p| p.is_file())
    }

    /// Read an entry; a missing entry is [`ShopframeError::NotFound`].
    pub fn read_bytes(&self, name: &str) -> ShopframeResult<Vec<u8>> {
        let path = self.path_for(name)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ShopframeError::not_found(name))
            }
            Err(e) => Err(ShopframeError::storage(format!(
                "read '{}': {e}",
                path.display()
            ))),
        }
    }

    /// Replace the entry `name` with `bytes`.
    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> ShopframeResult<()> {
        let path = self.path_for(name)?;
        let tmp = self.root.join(format!(
            ".{name}.{}.{}{TEMP_SUFFIX}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let result = std::fs::write(&tmp, bytes)
            .with_context(|| format!("write '{}'", tmp.display()))
            .and_then(|()| {
                std::fs::rename(&tmp, &path)
                    .with_context(|| format!("rename into '{}'", path.display()))
            });
        if let Err(e) = result {
            let _ = std::fs::remove_file(&tmp);
            return Err(storage(e));
        }
        Ok(())
    }

    /// Read a text entry stored with `encoding`.
    pub fn read_text(&self, name: &str, encoding: TextEncoding) -> ShopframeResult<String> {
        let bytes = self.read_bytes(name)?;
        decode_text(&bytes, encoding)
            .map_err(|msg| ShopframeError::storage(format!("entry '{name}': {msg}")))
    }

    /// Replace the entry `name` with `data` encoded as `encoding`.
    pub fn write_text(&self, name: &str, data: &str, encoding: TextEncoding) -> ShopframeResult<()> {
        let bytes = encode_text(data, encoding).map_err(ShopframeError::validation)?;
        self.write_bytes(name, &bytes)
    }

    /// Names starting with `prefix`, sorted lexicographically. In-flight temp files are skipped.
    pub fn list_by_prefix(&self, prefix: &str) -> ShopframeResult<Vec<String>> {
        let dir = std::fs::read_dir(&self.root)
            .with_context(|| format!("list '{}'", self.root.display()))
            .map_err(storage)?;

        let mut names = Vec::new();
        for entry in dir {
            let entry = entry
                .with_context(|| format!("list '{}'", self.root.display()))
                .map_err(storage)?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') && name.ends_with(TEMP_SUFFIX) {
                continue;
            }
            if name.starts_with(prefix) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete every named entry; names that are already gone count as deleted.
    pub fn delete_all<I, S>(&self, names: I) -> ShopframeResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let path = self.path_for(name.as_ref())?;
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ShopframeError::storage(format!(
                        "delete '{}': {e}",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Decode a cached image entry.
    pub fn read_image(&self, name: &str) -> ShopframeResult<Surface> {
        let bytes = self.read_bytes(name)?;
        decode_image(&bytes).map_err(|e| {
            ShopframeError::render(format!("decode cached image '{name}': {e}"))
        })
    }

    /// Persist a surface as PNG and return the encoded bytes.
    pub fn write_image(&self, name: &str, surface: &Surface) -> ShopframeResult<Vec<u8>> {
        let png = encode_png(surface)?;
        self.write_bytes(name, &png)?;
        Ok(png)
    }

    /// Return the image cached under `name` (default: the URL's basename), fetching it first
    /// on a miss.
    ///
    /// Retrieved bytes are decoded before anything is written, so a failed fetch or an undecodable
    /// payload leaves no entry behind.
    #[tracing::instrument(skip(self, source))]
    pub fn fetch_image_cached(
        &self,
        url: &str,
        name: Option<&str>,
        source: &dyn AssetSource,
    ) -> ShopframeResult<Surface> {
        let name = match name {
            Some(n) => n.to_string(),
            None => url_basename(url)?,
        };

        match self.read_image(&name) {
            Ok(img) => {
                tracing::debug!(name = %name, "image served from cache");
                return Ok(img);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let bytes = source.fetch(url)?;
        let img = decode_image(&bytes)
            .map_err(|e| ShopframeError::retrieval(format!("decode '{url}': {e}")))?;
        let png = self.write_image(&name, &img)?;
        tracing::debug!(name = %name, bytes = png.len(), "image fetched and cached");
        decode_image(&png)
    }

    fn path_for(&self, name: &str) -> ShopframeResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

/// Last path segment of a URL with query and fragment removed.
pub fn url_basename(url: &str) -> ShopframeResult<String> {
    let trimmed = url.split(['?', '#']).next().unwrap_or_default();
    let base = trimmed.rsplit('/').next().unwrap_or_default();
    validate_name(base)?;
    Ok(base.to_string())
}

fn validate_name(name: &str) -> ShopframeResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(ShopframeError::validation(format!(
            "invalid cache entry name '{name}'"
        )));
    }
    if name.contains(['/', '\\']) || name.contains('\0') {
        return Err(ShopframeError::validation(format!(
            "cache entry name '{name}' must not contain path separators"
        )));
    }
    Ok(())
}

fn storage(e: anyhow::Error) -> ShopframeError {
    ShopframeError::storage(format!("{e:#}"))
}

fn encode_text(data: &str, encoding: TextEncoding) -> Result<Vec<u8>, String> {
    match encoding {
        TextEncoding::Utf8 => Ok(data.as_bytes().to_vec()),
        TextEncoding::Utf16Le => Ok(data.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        TextEncoding::Latin1 => data
            .chars()
            .map(|c| u8::try_from(u32::from(c)).map_err(|_| format!("'{c}' is not latin-1")))
            .collect(),
        TextEncoding::Hex => {
            let s = data.trim();
            if !s.len().is_multiple_of(2) || !s.is_ascii() {
                return Err("hex text must be an even number of ASCII digits".to_string());
            }
            (0..s.len())
                .step_by(2)
                .map(|i| {
                    u8::from_str_radix(&s[i..i + 2], 16)
                        .map_err(|_| format!("invalid hex byte \"{}\"", &s[i..i + 2]))
                })
                .collect()
        }
    }
}

fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Result<String, String> {
    match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
        TextEncoding::Utf16Le => {
            if !bytes.len().is_multiple_of(2) {
                return Err("utf-16 entry has an odd byte length".to_string());
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect();
            String::from_utf16(&units).map_err(|e| e.to_string())
        }
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        TextEncoding::Hex => {
            let mut out = String::with_capacity(bytes.len() * 2);
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
