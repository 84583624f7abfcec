// src/error.rs
use thiserror::Error;

/// Errors surfaced by the font catalog.
///
/// Absence and malformed input are distinct variants so callers can
/// disambiguate without string-matching messages.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid font entry: required field '{0}' is empty")]
    InvalidEntry(&'static str),

    #[error("Font '{key}' not found in provider '{provider}'")]
    NotFound { key: String, provider: String },

    #[error("Font with stack '{0}' not found")]
    StackNotFound(String),

    #[error("No provider registered under '{0}'")]
    UnknownProvider(String),

    #[error("Remote catalog fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Catalog state lock poisoned")]
    Poisoned,
}

/// Error type for the remote catalog fetch.
///
/// Cloneable (String payloads) because the one-shot init result is cached
/// and handed to every `ready()` waiter.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("Malformed catalog response: {0}")]
    Malformed(String),
}

/// Error type for per-font asset loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Asset loading for '{family}' failed: {message}")]
    Asset { family: String, message: String },

    #[error("Font '{0}' declares no variants")]
    NoVariants(String),
}
