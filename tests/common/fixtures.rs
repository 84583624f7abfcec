//! Shared fixtures: canned catalog fetchers and asset loaders.

use fontselect::google::{CatalogFetcher, WebFontItem, WebFontsResponse};
use fontselect::{AssetLoader, AssetRequest, FetchError, LoadError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Routes `log` output through the test harness capture.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds one family of a stubbed webfonts response.
pub fn remote_font(family: &str, variants: &[&str], subsets: &[&str]) -> WebFontItem {
    WebFontItem {
        family: family.to_string(),
        variants: variants.iter().map(|v| v.to_string()).collect(),
        subsets: subsets.iter().map(|s| s.to_string()).collect(),
        last_modified: "2024-01-01".to_string(),
    }
}

pub fn remote_catalog(items: Vec<WebFontItem>) -> WebFontsResponse {
    WebFontsResponse { items }
}

/// Catalog fetcher returning a canned result and counting invocations.
#[derive(Debug)]
pub struct StubFetcher {
    response: Result<WebFontsResponse, FetchError>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new(response: WebFontsResponse) -> Self {
        Self { response: Ok(response), calls: AtomicUsize::new(0) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(FetchError::Request {
                url: "stub://webfonts".to_string(),
                message: message.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CatalogFetcher for StubFetcher {
    fn fetch<'a>(
        &'a self,
        _api_key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<WebFontsResponse, FetchError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

/// Asset loader that records every request it accepts.
#[derive(Debug, Default)]
pub struct RecordingAssets {
    requests: Mutex<Vec<AssetRequest>>,
}

impl RecordingAssets {
    pub fn requests(&self) -> Vec<AssetRequest> {
        self.requests.lock().expect("fixture lock").clone()
    }
}

impl AssetLoader for RecordingAssets {
    fn load(&self, request: &AssetRequest) -> Result<(), LoadError> {
        self.requests.lock().expect("fixture lock").push(request.clone());
        Ok(())
    }
}
