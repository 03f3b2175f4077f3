//! The F-Droid catalog (`index-v2.json`) and its conversion into application records.

use super::AppRecord;
use crate::Result;
use ohno::IntoAppError;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use url::Url;

const LOG_TARGET: &str = "   catalog";

/// The default catalog location.
pub const DEFAULT_CATALOG_URL: &str = "https://f-droid.org/repo/index-v2.json";

/// The parts of the catalog document that matter here. Everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// Packages keyed by namespace, in document order.
    pub packages: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogEntry {
    pub metadata: PackageMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    #[serde(default)]
    pub source_code: Option<String>,

    /// Localized application names keyed by locale
    #[serde(default)]
    pub name: BTreeMap<String, String>,

    /// Localized application descriptions keyed by locale
    #[serde(default)]
    pub description: Option<BTreeMap<String, String>>,
}

impl Catalog {
    /// Parse a catalog document.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).into_app_err("parsing the catalog document")
    }

    /// Load a catalog from an `http(s)` URL or from a local file.
    pub async fn load(client: &reqwest::Client, location: &str) -> Result<Self> {
        let text = read_catalog_text(client, location).await?;
        Self::parse(&text)
    }

    /// Convert every package into an application record, in document order.
    pub fn into_records(self) -> Result<Vec<AppRecord>> {
        let records = self
            .packages
            .into_iter()
            .map(|(namespace, value)| {
                let entry: CatalogEntry =
                    serde_json::from_value(value).into_app_err_with(|| format!("reading catalog entry '{namespace}'"))?;
                Ok(AppRecord::new(namespace, &entry.metadata))
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!(target: LOG_TARGET, "Converted {} packages", records.len());
        Ok(records)
    }
}

/// Create the HTTP client used to download catalogs.
///
/// No overall timeout is set since the catalog is a large document.
pub fn catalog_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("fdroid-popular")
        .build()
        .into_app_err("creating the catalog HTTP client")
}

/// Fetch the raw catalog text from an `http(s)` URL or read it from a local file.
pub async fn read_catalog_text(client: &reqwest::Client, location: &str) -> Result<String> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => fetch_catalog_text(client, url).await,
        _ => {
            log::info!(target: LOG_TARGET, "Reading catalog from '{location}'");
            fs::read_to_string(location).into_app_err_with(|| format!("reading catalog file '{location}'"))
        }
    }
}

async fn fetch_catalog_text(client: &reqwest::Client, url: Url) -> Result<String> {
    log::info!(target: LOG_TARGET, "Downloading catalog from '{url}'");

    let resp = client
        .get(url.clone())
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .send()
        .await
        .into_app_err_with(|| format!("downloading catalog from '{url}'"))?
        .error_for_status()
        .into_app_err_with(|| format!("downloading catalog from '{url}'"))?;

    resp.text().await.into_app_err_with(|| format!("reading catalog body from '{url}'"))
}
