//! Integration tests for the catalog's async surface and remote ingestion.

mod common;

use common::fixtures::{RecordingAssets, StubFetcher, init_logging, remote_catalog, remote_font};
use fontselect::{
    CatalogError, FontCatalog, FontRef, FontselectConfig, PROVIDER_GOOGLE, PROVIDER_WEBSAFE,
    SelectOptions,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn remote_catalog_with(items: Vec<fontselect::google::WebFontItem>) -> (FontCatalog, Arc<StubFetcher>) {
    init_logging();
    let fetcher = Arc::new(StubFetcher::new(remote_catalog(items)));
    let catalog = FontCatalog::builder()
        .google_api_key("test-key")
        .fetcher(fetcher.clone())
        .build();
    (catalog, fetcher)
}

#[tokio::test]
async fn ready_is_immediate_without_an_api_key() {
    init_logging();
    let catalog = FontCatalog::new(FontselectConfig::default());
    timeout(Duration::from_millis(100), catalog.ready())
        .await
        .expect("ready should not wait")
        .unwrap();
    // Only the bundled fonts are present.
    assert!(catalog.all_fonts().iter().all(|f| f.provider == PROVIDER_WEBSAFE));
}

#[tokio::test]
async fn ready_ingests_the_remote_catalog_exactly_once() {
    let (catalog, fetcher) = remote_catalog_with(vec![
        remote_font("Roboto", &["regular", "700"], &["latin"]),
        remote_font("Merriweather", &["regular"], &["latin", "latin-ext"]),
    ]);

    catalog.ready().await.unwrap();
    catalog.ready().await.unwrap();
    assert_eq!(fetcher.calls(), 1);

    let roboto = catalog.font_by_key("roboto", PROVIDER_GOOGLE).unwrap();
    assert_eq!(roboto.category, "sansserif");
    assert_eq!(roboto.stack, "\"Roboto\", sans-serif, \"google-fonts\"");
    assert_eq!(roboto.popularity, 2);

    let merriweather = catalog.font_by_key("merriweather", PROVIDER_GOOGLE).unwrap();
    assert_eq!(merriweather.category, "serif");
    assert_eq!(merriweather.popularity, 1);
    assert_eq!(merriweather.last_modified, "2024-01-01");
}

#[tokio::test]
async fn unknown_families_fall_back_to_the_other_category() {
    let (catalog, _) = remote_catalog_with(vec![remote_font(
        "Some Obscure Family",
        &["regular"],
        &["latin"],
    )]);
    catalog.ready().await.unwrap();

    let font = catalog
        .font_by_key("some-obscure-family", PROVIDER_GOOGLE)
        .unwrap();
    assert_eq!(font.category, "other");
    assert_eq!(font.stack, "\"Some Obscure Family\", sans-serif, \"google-fonts\"");
}

#[tokio::test]
async fn khmer_only_families_are_skipped_by_default() {
    let (catalog, _) = remote_catalog_with(vec![
        remote_font("Khmer Only", &["regular"], &["khmer"]),
        remote_font("Roboto", &["regular"], &["latin", "khmer"]),
    ]);
    catalog.ready().await.unwrap();

    assert!(catalog.font_by_key("khmer-only", PROVIDER_GOOGLE).is_err());
    // Families that cover khmer among others stay.
    assert!(catalog.font_by_key("roboto", PROVIDER_GOOGLE).is_ok());
}

#[tokio::test]
async fn khmer_only_families_stay_when_configured_in() {
    init_logging();
    let fetcher = Arc::new(StubFetcher::new(remote_catalog(vec![remote_font(
        "Khmer Only",
        &["regular"],
        &["khmer"],
    )])));
    let config = FontselectConfig {
        support_khmer: true,
        ..FontselectConfig::with_api_key("test-key")
    };
    let catalog = FontCatalog::builder().config(config).fetcher(fetcher).build();

    catalog.ready().await.unwrap();
    assert!(catalog.font_by_key("khmer-only", PROVIDER_GOOGLE).is_ok());
}

#[tokio::test]
async fn fetch_failure_propagates_and_is_cached() {
    init_logging();
    let fetcher = Arc::new(StubFetcher::failing("boom"));
    let catalog = FontCatalog::builder()
        .google_api_key("test-key")
        .fetcher(fetcher.clone())
        .build();

    let first = catalog.ready().await;
    assert!(matches!(first, Err(CatalogError::Fetch(_))));

    // The failure is cached; no second request goes out.
    let second = catalog.ready().await;
    assert!(matches!(second, Err(CatalogError::Fetch(_))));
    assert_eq!(fetcher.calls(), 1);

    // A fresh catalog starts with a clean one-shot guard.
    let retry = Arc::new(StubFetcher::new(remote_catalog(Vec::new())));
    let fresh = FontCatalog::builder()
        .google_api_key("test-key")
        .fetcher(retry.clone())
        .build();
    fresh.ready().await.unwrap();
    assert_eq!(retry.calls(), 1);
}

#[tokio::test]
async fn stack_lookup_resolves_immediately_when_present() {
    init_logging();
    let catalog = FontCatalog::new(FontselectConfig::default());
    let arial = catalog.font_by_key("arial", PROVIDER_WEBSAFE).unwrap();

    let resolved = timeout(
        Duration::from_millis(100),
        catalog.font_by_stack_async(&arial.stack),
    )
    .await
    .expect("should resolve immediately")
    .unwrap();
    assert_eq!(resolved.key, "arial");
}

#[tokio::test]
async fn stack_lookup_suspends_until_the_matching_add() {
    init_logging();
    let catalog = FontCatalog::new(FontselectConfig::default());
    // Stack as it will read after the provider fallback is appended.
    let stack = "\"Lobster\", fantasy, \"google-fonts\"";

    // Polling registers the pending lookup; it must stay unresolved.
    let mut lookup = Box::pin(catalog.font_by_stack_async(stack));
    let unresolved = timeout(Duration::from_millis(10), &mut lookup).await;
    assert!(unresolved.is_err(), "lookup resolved before the add");

    // The lookup is pending, so ready() must not complete yet.
    let pending_ready = timeout(Duration::from_millis(50), catalog.ready()).await;
    assert!(pending_ready.is_err(), "ready() resolved despite a pending lookup");

    let mut font = fontselect::FontEntry::new("Lobster", "lobster", "\"Lobster\", fantasy", "display");
    font.variants = vec!["regular".to_string()];
    catalog.add(font, Some(PROVIDER_GOOGLE)).unwrap();

    let resolved = timeout(Duration::from_secs(1), &mut lookup)
        .await
        .expect("lookup should settle after add")
        .unwrap();
    assert_eq!(resolved.name, "Lobster");
    assert_eq!(resolved.stack, stack);

    // With the lookup settled, ready() completes.
    timeout(Duration::from_secs(1), catalog.ready())
        .await
        .expect("ready should settle")
        .unwrap();
}

#[tokio::test]
async fn load_forwards_the_best_variant_and_subset_to_the_asset_loader() {
    init_logging();
    let assets = Arc::new(RecordingAssets::default());
    let fetcher = Arc::new(StubFetcher::new(remote_catalog(vec![remote_font(
        "Lobster",
        &["700", "regular"],
        &["cyrillic", "latin"],
    )])));
    let catalog = FontCatalog::builder()
        .google_api_key("test-key")
        .fetcher(fetcher)
        .asset_loader(assets.clone())
        .build();
    catalog.ready().await.unwrap();

    catalog
        .load(FontRef::Key { key: "lobster", provider: PROVIDER_GOOGLE })
        .unwrap();

    let requests = assets.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].families, vec!["Lobster:regular".to_string()]);
    assert_eq!(requests[0].subset, "latin");

    // Already loaded: no second asset request.
    catalog
        .load(FontRef::Key { key: "lobster", provider: PROVIDER_GOOGLE })
        .unwrap();
    assert_eq!(assets.requests().len(), 1);
}

#[tokio::test]
async fn used_fonts_and_google_url_end_to_end() {
    let (catalog, _) = remote_catalog_with(vec![remote_font(
        "Lobster",
        &["regular"],
        &["latin", "cyrillic"],
    )]);
    catalog.ready().await.unwrap();

    catalog
        .update_usage(FontRef::Key { key: "lobster", provider: PROVIDER_GOOGLE }, true)
        .unwrap();
    catalog
        .set_subsets(
            vec![("latin".to_string(), true), ("cyrillic".to_string(), true)],
            SelectOptions::updating(),
        )
        .unwrap();

    let used = catalog.used_fonts();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].name, "Lobster");

    let url = catalog.google_url().expect("a used Google font derives a URL");
    assert!(url.contains("family=Lobster"));
    assert!(url.contains("subset=latin,cyrillic"));

    let imports = catalog.update_imports().unwrap();
    assert_eq!(imports.get(PROVIDER_GOOGLE), Some(&url));

    // Releasing the font clears the derived URL again.
    catalog
        .update_usage(FontRef::Key { key: "lobster", provider: PROVIDER_GOOGLE }, false)
        .unwrap();
    assert!(catalog.google_url().is_none());
}
