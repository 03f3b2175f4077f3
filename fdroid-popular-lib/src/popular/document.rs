use super::AppRecord;
use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::Serialize;
use std::fs;

const LOG_TARGET: &str = "  document";

/// The output document, mapping each application namespace to `{ "stars": n }`.
///
/// Entries keep the order in which namespaces were first merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    entries: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Merge every record into one document.
    ///
    /// A namespace that appears more than once takes the value of its last record.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AppRecord>) -> Self {
        let mut doc = Self::default();
        for record in records {
            doc.merge(record);
        }
        doc
    }

    pub fn merge(&mut self, record: &AppRecord) {
        let _ = self
            .entries
            .insert(record.namespace().to_string(), serde_json::json!({ "stars": record.stars }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Star count recorded for a namespace.
    #[must_use]
    pub fn stars(&self, namespace: &str) -> Option<u64> {
        self.entries.get(namespace)?.get("stars")?.as_u64()
    }

    /// Render the document as JSON text, indented when `pretty` is set.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        text.into_app_err("serializing the popularity document")
    }

    /// Write the document to `path`.
    pub fn save(&self, path: &Utf8Path, pretty: bool) -> Result<()> {
        let text = self.to_json(pretty)?;
        fs::write(path, text).into_app_err_with(|| format!("writing popularity document to '{path}'"))?;
        log::info!(target: LOG_TARGET, "Wrote {} entries to '{path}'", self.len());
        Ok(())
    }
}
