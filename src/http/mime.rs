//! MIME type detection based on file extensions.
//!
//! The table uses the `/etc/mime.types` layout:
//!
//! ```text
//! # comment
//! text/html       html htm
//! image/png       png
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct MimeTypes {
    by_extension: HashMap<String, String>,
    default_type: String,
}

impl MimeTypes {
    /// A table with no entries; every lookup yields `default_type`.
    pub fn empty(default_type: &str) -> Self {
        Self {
            by_extension: HashMap::new(),
            default_type: default_type.to_string(),
        }
    }

    /// Parses a table. When an extension is listed more than once, the first
    /// line that lists it wins.
    pub fn parse(table: &str, default_type: &str) -> Self {
        let mut types = Self::empty(default_type);

        for line in table.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(mime) = tokens.next() else {
                continue;
            };
            for ext in tokens {
                types
                    .by_extension
                    .entry(ext.to_string())
                    .or_insert_with(|| mime.to_string());
            }
        }

        types
    }

    pub async fn load(path: &Path, default_type: &str) -> anyhow::Result<Self> {
        let table = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read MIME table {}", path.display()))?;
        Ok(Self::parse(&table, default_type))
    }

    /// Content type for `path`, judged by the extension of its file name.
    pub fn lookup(&self, path: &Path) -> &str {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension.get(ext))
            .map(String::as_str)
            .unwrap_or(&self.default_type)
    }

    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}
