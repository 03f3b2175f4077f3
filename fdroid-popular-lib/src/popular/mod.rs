//! Star count collection for the applications of an F-Droid catalog
//!
//! # Implementation Model
//!
//! The catalog is converted into [`AppRecord`] values, one per package. Each record derives
//! its hosting [`Service`] and the repository API endpoint from the package's source code
//! URL when it is created.
//!
//! The [`Enricher`] then queries the hosting services through a [`StarFetcher`] (normally
//! the HTTP [`Client`]) in fixed-size batches. Records of one batch are queried
//! concurrently, batches run one after the other with a pause in between. Every query
//! yields a [`FetchOutcome`]:
//! - **Found**: the star count is stored in the record
//! - **Skipped**: the record keeps a star count of zero and the run continues
//! - **`RateLimited`** / **Failed**: the run is aborted
//!
//! Finally the records are merged into a [`Document`] keyed by namespace and written out.

mod app_record;
pub mod catalog;
mod client;
mod document;
mod enricher;
mod progress;
mod service;

pub use app_record::AppRecord;
pub use catalog::{Catalog, CatalogEntry, PackageMetadata};
pub use client::{Client, Credentials, FetchOutcome, StarFetcher};
pub use document::Document;
pub use enricher::{BatchPolicy, Enricher};
pub use progress::{NoProgress, Progress};
pub use service::{SUPPORTED_SERVICES, Service, ServiceSpec};
