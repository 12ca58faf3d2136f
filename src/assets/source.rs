use std::io::Read as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{ShopframeError, ShopframeResult};

/// External provider of item imagery and static resources.
///
/// Implementations perform no retries; a failure is reported once as
/// [`ShopframeError::Retrieval`].
pub trait AssetSource: Send + Sync {
    /// Fetch the encoded bytes behind an image URL.
    fn fetch(&self, url: &str) -> ShopframeResult<Vec<u8>>;

    /// Load a named static resource (for example the currency icon).
    fn resource(&self, name: &str) -> ShopframeResult<Vec<u8>>;
}

/// Blocking HTTP fetches plus a local resources directory.
#[derive(Clone, Debug)]
pub struct HttpAssetSource {
    resources: PathBuf,
    timeout: Duration,
}

impl HttpAssetSource {
    /// Create a source reading static resources from `resources`.
    pub fn new(resources: impl Into<PathBuf>) -> Self {
        Self {
            resources: resources.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Per-request timeout (default 30 s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AssetSource for HttpAssetSource {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, url: &str) -> ShopframeResult<Vec<u8>> {
        let response = match ureq::get(url).timeout(self.timeout).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => {
                return Err(ShopframeError::retrieval(format!(
                    "GET '{url}' returned status {code}"
                )));
            }
            Err(e) => {
                return Err(ShopframeError::retrieval(format!("GET '{url}': {e}")));
            }
        };

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| ShopframeError::retrieval(format!("read body of '{url}': {e}")))?;
        if bytes.is_empty() {
            return Err(ShopframeError::retrieval(format!(
                "GET '{url}' returned an empty body"
            )));
        }
        tracing::debug!(url, bytes = bytes.len(), "fetched asset");
        Ok(bytes)
    }

    fn resource(&self, name: &str) -> ShopframeResult<Vec<u8>> {
        let path = self.resources.join(name);
        std::fs::read(&path)
            .with_context(|| format!("read resource '{}'", path.display()))
            .map_err(|e| ShopframeError::retrieval(format!("{e:#}")))
    }
}
