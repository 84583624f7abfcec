//! Google Fonts integration: remote catalog schema and fetcher, family
//! classification, variant/subset priority selection, the provider loader
//! and derived stylesheet URLs.

use crate::config::FontselectConfig;
use crate::error::{FetchError, LoadError};
use crate::font::{DEFAULT_CATEGORIES, FontCategory, FontEntry};
use crate::provider::{AssetLoader, AssetRequest, FontLoader};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Preference order when picking the variant to load first.
pub const VARIANT_PRIORITY: [&str; 5] = ["regular", "400", "300", "500", "700"];

/// Preference order when picking the subset to load first.
pub const SUBSET_PRIORITY: [&str; 4] = ["latin", "latin-ext", "cyrillic", "greek"];

/// Families covering only this subset are skipped unless configured in.
pub const SUBSET_KHMER: &str = "khmer";

/// One family in the webfonts API response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebFontItem {
    pub family: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub subsets: Vec<String>,
    #[serde(default)]
    pub last_modified: String,
}

/// Body of the webfonts API response, sorted by popularity.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct WebFontsResponse {
    #[serde(default)]
    pub items: Vec<WebFontItem>,
}

/// Fetches the remote font catalog.
///
/// A trait seam so tests can stub the network; the catalog guarantees at
/// most one fetch per instance.
pub trait CatalogFetcher: Send + Sync + Debug {
    fn fetch<'a>(
        &'a self,
        api_key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<WebFontsResponse, FetchError>> + Send + 'a>>;
}

/// HTTP fetcher against the webfonts API.
#[derive(Debug)]
pub struct HttpCatalogFetcher {
    client: reqwest::Client,
    api_url: String,
}

impl HttpCatalogFetcher {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    pub fn from_config(config: &FontselectConfig) -> Self {
        Self::new(config.api_url.clone())
    }
}

impl CatalogFetcher for HttpCatalogFetcher {
    fn fetch<'a>(
        &'a self,
        api_key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<WebFontsResponse, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let request_failed = |e: reqwest::Error| FetchError::Request {
                url: self.api_url.clone(),
                message: e.to_string(),
            };
            let response = self
                .client
                .get(&self.api_url)
                .query(&[("sort", "popularity"), ("key", api_key)])
                .send()
                .await
                .map_err(request_failed)?
                .error_for_status()
                .map_err(request_failed)?;
            response
                .json::<WebFontsResponse>()
                .await
                .map_err(|e| FetchError::Malformed(e.to_string()))
        })
    }
}

/// First of `priorities` present in `available`, else the first available.
fn best_of<'a>(available: &'a [String], priorities: &[&str]) -> Option<&'a str> {
    priorities
        .iter()
        .find_map(|p| available.iter().find(|a| a.as_str() == *p))
        .or_else(|| available.first())
        .map(String::as_str)
}

pub fn best_variant_of(variants: &[String]) -> Option<&str> {
    best_of(variants, &VARIANT_PRIORITY)
}

pub fn best_subset_of(subsets: &[String]) -> Option<&str> {
    best_of(subsets, &SUBSET_PRIORITY)
}

/// Well-known families per category. The remote catalog carries no category
/// information, so classification is a fixed-table lookup.
fn category_families(key: &str) -> &'static [&'static str] {
    match key {
        "serif" => &[
            "Roboto Slab",
            "Playfair Display",
            "Merriweather",
            "Lora",
            "PT Serif",
            "Noto Serif",
            "Crimson Text",
            "Libre Baskerville",
            "Bitter",
            "Arvo",
            "Zilla Slab",
            "Cormorant Garamond",
        ],
        "sansserif" => &[
            "Roboto",
            "Open Sans",
            "Lato",
            "Montserrat",
            "Oswald",
            "Raleway",
            "Poppins",
            "Source Sans Pro",
            "Nunito",
            "PT Sans",
            "Ubuntu",
            "Noto Sans",
            "Work Sans",
            "Rubik",
            "Karla",
        ],
        "handwriting" => &[
            "Dancing Script",
            "Pacifico",
            "Caveat",
            "Shadows Into Light",
            "Indie Flower",
            "Satisfy",
            "Great Vibes",
            "Sacramento",
        ],
        "display" => &[
            "Lobster",
            "Bebas Neue",
            "Abril Fatface",
            "Alfa Slab One",
            "Righteous",
            "Fredoka One",
            "Passion One",
        ],
        "monospace" => &[
            "Roboto Mono",
            "Source Code Pro",
            "Inconsolata",
            "Ubuntu Mono",
            "Space Mono",
            "IBM Plex Mono",
            "Fira Mono",
            "Cousine",
        ],
        _ => &[],
    }
}

/// First category whose family list contains the name; `other` otherwise.
pub fn classify_family(family: &str) -> &'static FontCategory {
    DEFAULT_CATEGORIES
        .iter()
        .find(|category| category_families(category.key).contains(&family))
        .unwrap_or(&DEFAULT_CATEGORIES[5])
}

/// Loader for the Google provider: resolves the best variant and subset and
/// forwards to the host's asset-loading capability.
#[derive(Debug)]
pub struct GoogleLoader {
    assets: Arc<dyn AssetLoader>,
}

impl GoogleLoader {
    pub fn new(assets: Arc<dyn AssetLoader>) -> Self {
        Self { assets }
    }
}

impl FontLoader for GoogleLoader {
    fn name(&self) -> &'static str {
        "GoogleLoader"
    }

    fn load(&self, font: &FontEntry) -> Result<(), LoadError> {
        let variant = best_variant_of(&font.variants)
            .ok_or_else(|| LoadError::NoVariants(font.name.clone()))?;
        let request = AssetRequest {
            families: vec![format!("{}:{}", font.name, variant)],
            text: font.name.clone(),
            subsets: font.subsets.clone(),
            subset: best_subset_of(&font.subsets).unwrap_or_default().to_string(),
        };
        self.assets.load(&request)
    }
}

/// Characters escaped inside family names in the stylesheet URL. The pipe
/// separator between families stays literal.
const FAMILY_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'|');

/// Builds the stylesheet URL for a set of used families and active subsets.
pub fn css_url(base: &str, families: &[&str], subsets: &[&str]) -> String {
    let escaped: Vec<String> = families
        .iter()
        .map(|family| utf8_percent_encode(family, FAMILY_ESCAPE).to_string())
        .collect();
    let mut url = format!("{}?family={}", base, escaped.join("|"));
    if !subsets.is_empty() {
        url.push_str("&subset=");
        url.push_str(&subsets.join(","));
    }
    url
}
