//! Web font catalog and selection state manager.
//!
//! Merges multiple font *providers* (a bundled web-safe set, the remotely
//! fetched Google Fonts catalog, and anything registered at runtime) behind
//! one interface, deduplicated by the CSS font-stack with the provider name
//! appended as a unique key. Tracks per-font usage counts and selection
//! facets (subsets, providers, imports, usage) and derives the aggregate
//! stylesheet URL for all currently-used remote fonts. Font assets are
//! loaded lazily, only when an entry is selected.
//!
//! ## Quick start
//!
//! ```no_run
//! use fontselect::{FontCatalog, FontRef, FontselectConfig};
//!
//! # async fn run() -> Result<(), fontselect::CatalogError> {
//! let catalog = FontCatalog::new(FontselectConfig::with_api_key("..."));
//!
//! // Wait for the remote catalog; bundled fonts are available immediately.
//! catalog.ready().await?;
//!
//! let font = catalog.font_by_key("lobster", fontselect::PROVIDER_GOOGLE)?;
//! catalog.update_usage(FontRef::Stack(&font.stack), true)?;
//! catalog.load(FontRef::Stack(&font.stack))?;
//!
//! if let Some(url) = catalog.google_url() {
//!     println!("stylesheet: {url}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod facets;
pub mod font;
pub mod google;
pub mod listing;
pub mod provider;
pub mod websafe;

pub use catalog::{CatalogBuilder, FontCatalog};
pub use config::{FontselectConfig, WEBFONTS_API_URL, WEBFONTS_CSS_URL};
pub use error::{CatalogError, FetchError, LoadError};
pub use facets::{FacetSet, FacetSource, SelectOptions};
pub use font::{DEFAULT_CATEGORIES, FontCategory, FontEntry, FontRef, font_key};
pub use google::{CatalogFetcher, GoogleLoader, HttpCatalogFetcher, WebFontsResponse};
pub use listing::{EntryView, ListEntry};
pub use provider::{
    AssetLoader, AssetRequest, FontLoader, NoopAssetLoader, PROVIDER_GOOGLE, PROVIDER_WEBSAFE,
    WebsafeLoader,
};
pub use websafe::default_websafe_fonts;
