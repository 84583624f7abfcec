//! Provider traits: per-provider font loaders and the opaque asset-loading
//! capability they delegate to.
//!
//! A provider is a named source of fonts. The catalog holds one
//! [`FontLoader`] per registered provider and invokes it the first time a
//! font is loaded. The bundled web-safe provider needs no loading; remote
//! providers forward to an [`AssetLoader`] implemented by the host.

use crate::error::LoadError;
use crate::font::FontEntry;
use std::fmt::Debug;

/// Name of the bundled web-safe provider.
pub const PROVIDER_WEBSAFE: &str = "websafe-fonts";

/// Name of the Google Fonts provider.
pub const PROVIDER_GOOGLE: &str = "google-fonts";

/// Initiates loading of a font's assets for one provider.
pub trait FontLoader: Send + Sync + Debug {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Kicks off asset loading for the given entry.
    fn load(&self, font: &FontEntry) -> Result<(), LoadError>;
}

/// Request handed to the external asset-loading capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// `"Family:variant"` tokens to load.
    pub families: Vec<String>,
    /// Sample text the host may use to subset the download.
    pub text: String,
    /// All subsets the family covers.
    pub subsets: Vec<String>,
    /// The preferred subset.
    pub subset: String,
}

/// The opaque "load font by family/variant/subset" capability.
///
/// Implemented by the host application; a failure causes the catalog to
/// evict the corresponding entry.
pub trait AssetLoader: Send + Sync + Debug {
    fn load(&self, request: &AssetRequest) -> Result<(), LoadError>;
}

/// Asset loader that accepts everything without doing anything. Used when a
/// host only needs catalog state, and in tests.
#[derive(Debug, Default)]
pub struct NoopAssetLoader;

impl AssetLoader for NoopAssetLoader {
    fn load(&self, _request: &AssetRequest) -> Result<(), LoadError> {
        Ok(())
    }
}

/// Loader for the bundled web-safe fonts. Nothing to fetch.
#[derive(Debug, Default)]
pub struct WebsafeLoader;

impl FontLoader for WebsafeLoader {
    fn name(&self) -> &'static str {
        "WebsafeLoader"
    }

    fn load(&self, _font: &FontEntry) -> Result<(), LoadError> {
        Ok(())
    }
}
