// src/catalog.rs
//! The font catalog: single source of truth for all known fonts, selection
//! facets, usage counters and derived import URLs.
//!
//! Fonts arrive from registered providers: the bundled web-safe set is
//! seeded synchronously at construction, the Google catalog is fetched once
//! per instance the first time [`FontCatalog::ready`] (or
//! [`FontCatalog::init_remote`]) is awaited. Consumers that reference a font
//! before the catalog finishes populating can suspend on
//! [`FontCatalog::font_by_stack_async`].

use crate::config::FontselectConfig;
use crate::error::{CatalogError, FetchError};
use crate::facets::{FacetSet, FacetSource, SelectOptions};
use crate::font::{DEFAULT_CATEGORIES, FontCategory, FontEntry, FontRef, font_key};
use crate::google::{
    CatalogFetcher, GoogleLoader, HttpCatalogFetcher, SUBSET_KHMER, WebFontsResponse,
    classify_family, css_url,
};
use crate::provider::{
    AssetLoader, FontLoader, NoopAssetLoader, PROVIDER_GOOGLE, PROVIDER_WEBSAFE, WebsafeLoader,
};
use crate::websafe::default_websafe_fonts;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::pin::pin;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Notify, OnceCell, oneshot};

/// Builder for [`FontCatalog`], mainly to inject a stub catalog fetcher or a
/// real asset loader.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    config: FontselectConfig,
    fetcher: Option<Arc<dyn CatalogFetcher>>,
    assets: Option<Arc<dyn AssetLoader>>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: FontselectConfig) -> Self {
        self.config = config;
        self
    }

    pub fn google_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.google_api_key = Some(key.into());
        self
    }

    /// Replaces the HTTP fetcher, e.g. with a canned response in tests.
    pub fn fetcher(mut self, fetcher: Arc<dyn CatalogFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Supplies the host's asset-loading capability.
    pub fn asset_loader(mut self, assets: Arc<dyn AssetLoader>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn build(self) -> FontCatalog {
        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Arc::new(HttpCatalogFetcher::new(self.config.api_url.clone())));
        let assets = self.assets.unwrap_or_else(|| Arc::new(NoopAssetLoader));

        let mut state = CatalogState::default();
        state.register(PROVIDER_GOOGLE, Arc::new(GoogleLoader::new(assets)));
        state.register(PROVIDER_WEBSAFE, Arc::new(WebsafeLoader));
        for font in default_websafe_fonts() {
            if let Err(e) = state.add(font, None) {
                warn!("Skipping bundled font: {e}");
            }
        }

        FontCatalog {
            config: self.config,
            fetcher,
            state: RwLock::new(state),
            remote_init: OnceCell::new(),
            lookups_settled: Notify::new(),
        }
    }
}

/// The catalog/state manager.
///
/// All methods take `&self`; state sits behind an `RwLock`, so the catalog
/// can be shared via `Arc` across tasks. Returned collections are snapshots:
/// later catalog mutation does not alter them.
#[derive(Debug)]
pub struct FontCatalog {
    config: FontselectConfig,
    fetcher: Arc<dyn CatalogFetcher>,
    state: RwLock<CatalogState>,
    // One-shot guard for the remote fetch. Instance-owned (not process-wide)
    // and caches failure as well as success.
    remote_init: OnceCell<Result<(), FetchError>>,
    lookups_settled: Notify,
}

#[derive(Default)]
struct CatalogState {
    fonts: Vec<FontEntry>,
    subsets: FacetSet<bool>,
    providers: FacetSet<bool>,
    imports: FacetSet<String>,
    usage: FacetSet<bool>,
    loaders: HashMap<String, Arc<dyn FontLoader>>,
    pending: HashMap<String, Vec<oneshot::Sender<FontEntry>>>,
}

impl std::fmt::Debug for CatalogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogState")
            .field("fonts", &self.fonts.len())
            .field("providers", &self.providers)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl CatalogState {
    fn register(&mut self, name: &str, loader: Arc<dyn FontLoader>) {
        // Insert-only: re-registering must not clobber an active flag.
        self.providers.merge([name], SelectOptions::default());
        self.usage.insert(name, false);
        self.loaders.insert(name.to_string(), loader);
    }

    fn position(&self, font: FontRef<'_>) -> Option<usize> {
        match font {
            FontRef::Stack(stack) => self.fonts.iter().position(|f| f.stack == stack),
            FontRef::Key { key, provider } => self
                .fonts
                .iter()
                .position(|f| f.key == key && f.provider == provider),
        }
    }

    /// Validates and stores an entry. Returns how many pending lookups the
    /// insertion satisfied.
    fn add(&mut self, mut font: FontEntry, provider: Option<&str>) -> Result<usize, CatalogError> {
        let provider = provider
            .map(str::to_string)
            .or_else(|| (!font.provider.is_empty()).then(|| font.provider.clone()))
            .unwrap_or_else(|| PROVIDER_WEBSAFE.to_string());

        font.provider = provider;
        font.validate()?;

        // Provider as fall-back token in the stack, making it a unique key.
        font.stack = format!("{}, \"{}\"", font.stack, font.provider);

        if !font.subsets.is_empty() {
            self.subsets
                .merge(font.subsets.as_slice(), SelectOptions::default());
        }

        let mut resolved = 0;
        if let Some(waiters) = self.pending.remove(&font.stack) {
            for waiter in waiters {
                // The receiver may have been dropped; that still settles it.
                let _ = waiter.send(font.clone());
                resolved += 1;
            }
        }

        debug!("Added font '{}' from provider '{}'", font.name, font.provider);
        self.fonts.push(font);
        Ok(resolved)
    }

    fn remove(&mut self, font: FontRef<'_>) -> usize {
        match self.position(font) {
            Some(index) => {
                let removed = self.fonts.remove(index);
                debug!(
                    "Removed font '{}' from provider '{}'",
                    removed.name, removed.provider
                );
                1
            }
            None => 0,
        }
    }

    fn refresh_provider_usage(&mut self) {
        let providers: Vec<String> = self.providers.names().map(str::to_string).collect();
        for provider in providers {
            let used = self
                .fonts
                .iter()
                .any(|f| f.provider == provider && f.used > 0);
            self.usage.insert(&provider, used);
        }
    }

    fn pending_lookups(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }
}

fn not_found(font: FontRef<'_>) -> CatalogError {
    match font {
        FontRef::Stack(stack) => CatalogError::StackNotFound(stack.to_string()),
        FontRef::Key { key, provider } => CatalogError::NotFound {
            key: key.to_string(),
            provider: provider.to_string(),
        },
    }
}

impl Default for FontCatalog {
    fn default() -> Self {
        CatalogBuilder::new().build()
    }
}

impl FontCatalog {
    /// A catalog with the given configuration, the HTTP fetcher and no
    /// asset-loading capability. Use [`CatalogBuilder`] to inject either.
    pub fn new(config: FontselectConfig) -> Self {
        CatalogBuilder::new().config(config).build()
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>, CatalogError> {
        self.state.read().map_err(|_| CatalogError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, CatalogError> {
        self.state.write().map_err(|_| CatalogError::Poisoned)
    }

    /// Stores a font entry, defaulting the provider from the entry itself or
    /// to the web-safe provider. Satisfies any pending lookups waiting for
    /// the entry's stack.
    pub fn add(&self, font: FontEntry, provider: Option<&str>) -> Result<(), CatalogError> {
        let resolved = self.write()?.add(font, provider)?;
        if resolved > 0 {
            self.lookups_settled.notify_waiters();
        }
        Ok(())
    }

    /// Removes a font, returning how many entries were removed. Not finding
    /// the font is a recoverable outcome (0), never an error.
    pub fn remove_font(&self, font: FontRef<'_>) -> usize {
        match self.state.write() {
            Ok(mut state) => state.remove(font),
            Err(_) => 0,
        }
    }

    /// Snapshot of all entries matching a predicate.
    pub fn search_fonts<P>(&self, predicate: P) -> Vec<FontEntry>
    where
        P: Fn(&FontEntry) -> bool,
    {
        match self.state.read() {
            Ok(state) => state.fonts.iter().filter(|f| predicate(f)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// First entry matching a predicate.
    pub fn search_font<P>(&self, predicate: P) -> Option<FontEntry>
    where
        P: Fn(&FontEntry) -> bool,
    {
        self.state
            .read()
            .ok()?
            .fonts
            .iter()
            .find(|f| predicate(f))
            .cloned()
    }

    pub fn font_by_key(&self, key: &str, provider: &str) -> Result<FontEntry, CatalogError> {
        self.read()?
            .fonts
            .iter()
            .find(|f| f.key == key && f.provider == provider)
            .cloned()
            .ok_or_else(|| not_found(FontRef::Key { key, provider }))
    }

    pub fn font_by_stack(&self, stack: &str) -> Result<FontEntry, CatalogError> {
        self.read()?
            .fonts
            .iter()
            .find(|f| f.stack == stack)
            .cloned()
            .ok_or_else(|| CatalogError::StackNotFound(stack.to_string()))
    }

    /// Resolves a font by stack, suspending until a matching [`add`] if the
    /// stack is unknown right now.
    ///
    /// There is no built-in timeout: if no matching font is ever added the
    /// future never resolves, and `ready()` waits for it too. Callers that
    /// cannot tolerate that should wrap this in their own timeout.
    ///
    /// [`add`]: FontCatalog::add
    pub async fn font_by_stack_async(&self, stack: &str) -> Result<FontEntry, CatalogError> {
        let receiver = {
            let mut state = self.write()?;
            if let Some(font) = state.fonts.iter().find(|f| f.stack == stack) {
                return Ok(font.clone());
            }
            let (sender, receiver) = oneshot::channel();
            state.pending.entry(stack.to_string()).or_default().push(sender);
            receiver
        };
        receiver
            .await
            .map_err(|_| CatalogError::StackNotFound(stack.to_string()))
    }

    /// Resolves once the remote catalog has been fetched (triggering the
    /// fetch if nobody did yet) and every pending stack lookup has settled.
    ///
    /// A remote fetch failure propagates to every waiter, on this call and
    /// all later ones.
    pub async fn ready(&self) -> Result<(), CatalogError> {
        self.init_remote().await?;
        loop {
            let mut settled = pin!(self.lookups_settled.notified());
            settled.as_mut().enable();
            if self.read()?.pending_lookups() == 0 {
                return Ok(());
            }
            settled.await;
        }
    }

    /// Drives the one-shot remote catalog fetch. Does nothing without an API
    /// key. The result, success or failure, is cached for the lifetime of
    /// this catalog instance.
    pub async fn init_remote(&self) -> Result<(), CatalogError> {
        let Some(api_key) = self.config.google_api_key.clone() else {
            return Ok(());
        };
        let result = self
            .remote_init
            .get_or_init(|| async move {
                info!("Fetching remote font catalog from '{}'", self.config.api_url);
                let response = self.fetcher.fetch(&api_key).await?;
                self.ingest_remote(response);
                Ok(())
            })
            .await;
        result.clone().map_err(CatalogError::from)
    }

    fn ingest_remote(&self, response: WebFontsResponse) {
        let total = response.items.len();
        debug!("Remote catalog returned {total} families");
        for (index, item) in response.items.into_iter().enumerate() {
            if !self.config.support_khmer
                && item.subsets.len() == 1
                && item.subsets[0] == SUBSET_KHMER
            {
                continue;
            }
            let category = classify_family(&item.family);
            let font = FontEntry {
                key: font_key(&item.family),
                name: item.family.clone(),
                provider: String::new(),
                stack: format!("\"{}\", {}", item.family, category.fallback),
                subsets: item.subsets,
                variants: item.variants,
                category: category.key.to_string(),
                popularity: (total - index) as u32,
                last_modified: item.last_modified,
                used: 0,
                loaded: false,
            };
            let name = font.name.clone();
            if let Err(e) = self.add(font, Some(PROVIDER_GOOGLE)) {
                warn!("Skipping remote font '{name}': {e}");
            }
        }
    }

    /// Snapshot of every known font.
    pub fn all_fonts(&self) -> Vec<FontEntry> {
        self.search_fonts(|_| true)
    }

    pub fn categories(&self) -> &'static [FontCategory] {
        &DEFAULT_CATEGORIES
    }

    pub fn subsets(&self) -> FacetSet<bool> {
        self.state.read().map(|s| s.subsets.clone()).unwrap_or_default()
    }

    pub fn providers(&self) -> FacetSet<bool> {
        self.state.read().map(|s| s.providers.clone()).unwrap_or_default()
    }

    pub fn imports(&self) -> FacetSet<String> {
        self.state.read().map(|s| s.imports.clone()).unwrap_or_default()
    }

    /// Per-provider aggregate usage flags.
    pub fn usage(&self) -> FacetSet<bool> {
        self.state.read().map(|s| s.usage.clone()).unwrap_or_default()
    }

    pub fn set_subsets(
        &self,
        source: impl Into<FacetSource<bool>>,
        options: SelectOptions,
    ) -> Result<FacetSet<bool>, CatalogError> {
        let mut state = self.write()?;
        state.subsets.merge(source, options);
        Ok(state.subsets.clone())
    }

    pub fn set_providers(
        &self,
        source: impl Into<FacetSource<bool>>,
        options: SelectOptions,
    ) -> Result<FacetSet<bool>, CatalogError> {
        let mut state = self.write()?;
        state.providers.merge(source, options);
        Ok(state.providers.clone())
    }

    /// Imports always update existing keys: a re-derived URL must replace a
    /// stale one.
    pub fn set_imports(
        &self,
        source: impl Into<FacetSource<String>>,
        options: SelectOptions,
    ) -> Result<FacetSet<String>, CatalogError> {
        let mut state = self.write()?;
        state
            .imports
            .merge(source, SelectOptions { update: true, ..options });
        Ok(state.imports.clone())
    }

    /// Usage flags always update existing keys.
    pub fn set_usage(
        &self,
        source: impl Into<FacetSource<bool>>,
        options: SelectOptions,
    ) -> Result<FacetSet<bool>, CatalogError> {
        let mut state = self.write()?;
        state
            .usage
            .merge(source, SelectOptions { update: true, ..options });
        Ok(state.usage.clone())
    }

    /// Registers an additional provider: an inactive provider flag, an
    /// inactive usage flag and its loader.
    pub fn register_provider(
        &self,
        name: &str,
        loader: Arc<dyn FontLoader>,
    ) -> Result<(), CatalogError> {
        self.write()?.register(name, loader);
        Ok(())
    }

    /// Increments (or decrements, flooring at zero) a font's usage counter
    /// and refreshes every provider's aggregate usage flag. Returns the new
    /// counter value.
    pub fn update_usage(&self, font: FontRef<'_>, activated: bool) -> Result<u32, CatalogError> {
        let mut state = self.write()?;
        let index = state.position(font).ok_or_else(|| not_found(font))?;
        let entry = &mut state.fonts[index];
        entry.used = if activated {
            entry.used.saturating_add(1)
        } else {
            entry.used.saturating_sub(1)
        };
        let counter = entry.used;
        state.refresh_provider_usage();
        Ok(counter)
    }

    /// Snapshot of all entries with a nonzero usage counter.
    pub fn used_fonts(&self) -> Vec<FontEntry> {
        self.search_fonts(|f| f.used > 0)
    }

    /// The stylesheet URL covering all used Google fonts and active subsets,
    /// or `None` when no Google font is in use.
    pub fn google_url(&self) -> Option<String> {
        let state = self.state.read().ok()?;
        let families: Vec<&str> = state
            .fonts
            .iter()
            .filter(|f| f.provider == PROVIDER_GOOGLE && f.used > 0)
            .map(|f| f.name.as_str())
            .collect();
        if families.is_empty() {
            return None;
        }
        let subsets: Vec<&str> = state.subsets.active_names().collect();
        Some(css_url(&self.config.css_url, &families, &subsets))
    }

    /// Provider name → stylesheet URL pairs for all providers with used
    /// fonts. Currently only the Google provider derives a URL.
    pub fn urls(&self) -> Vec<(String, String)> {
        match self.google_url() {
            Some(url) => vec![(PROVIDER_GOOGLE.to_string(), url)],
            None => Vec::new(),
        }
    }

    /// Re-derives import URLs and merges them into the imports facet.
    pub fn update_imports(&self) -> Result<FacetSet<String>, CatalogError> {
        self.set_imports(self.urls(), SelectOptions::default())
    }

    /// Marks a font loaded and invokes its provider's loader. Already-loaded
    /// fonts are a no-op. A loader failure evicts the entry, keeping the
    /// catalog consistent with actually-loadable fonts; it is not surfaced.
    pub fn load(&self, font: FontRef<'_>) -> Result<(), CatalogError> {
        let (entry, loader) = {
            let mut state = self.write()?;
            let index = state.position(font).ok_or_else(|| not_found(font))?;
            if state.fonts[index].loaded {
                return Ok(());
            }
            state.fonts[index].loaded = true;
            let entry = state.fonts[index].clone();
            let loader = state
                .loaders
                .get(&entry.provider)
                .cloned()
                .ok_or_else(|| CatalogError::UnknownProvider(entry.provider.clone()))?;
            (entry, loader)
        };
        if let Err(e) = loader.load(&entry) {
            warn!(
                "Loader '{}' failed for font '{}': {e}; evicting the entry",
                loader.name(),
                entry.name
            );
            self.remove_font(FontRef::Stack(&entry.stack));
        }
        Ok(())
    }
}
