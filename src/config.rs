//! Catalog configuration.

/// Endpoint for the remote webfonts catalog API.
pub const WEBFONTS_API_URL: &str = "https://www.googleapis.com/webfonts/v1/webfonts";

/// Endpoint for the derived stylesheet covering used remote fonts.
pub const WEBFONTS_CSS_URL: &str = "https://fonts.googleapis.com/css";

/// Configuration for a [`FontCatalog`](crate::FontCatalog) instance.
///
/// Without a `google_api_key` the remote catalog is never fetched and the
/// catalog serves bundled fonts only.
#[derive(Debug, Clone)]
pub struct FontselectConfig {
    /// API key for the webfonts catalog endpoint.
    pub google_api_key: Option<String>,
    /// Include fonts that only cover the khmer subset.
    pub support_khmer: bool,
    /// Catalog API endpoint. Overridable for tests against a stub server.
    pub api_url: String,
    /// Stylesheet endpoint used when deriving import URLs.
    pub css_url: String,
}

impl Default for FontselectConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            support_khmer: false,
            api_url: WEBFONTS_API_URL.to_string(),
            css_url: WEBFONTS_CSS_URL.to_string(),
        }
    }
}

impl FontselectConfig {
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            google_api_key: Some(key.into()),
            ..Self::default()
        }
    }
}
