//! # Env-File Settings Store
//!
//! File-backed [`ConfigStore`] over a flat `key="value"` file, the same
//! shape dotenv tooling reads. Values may be double-quoted or bare; blank
//! lines and `#` comments are ignored. When the same key appears twice the
//! last occurrence wins on load, and writes rewrite every occurrence.
//!
//! ## File format
//!
//! ```text
//! # ncddns settings
//! cached_ip="203.0.113.7"
//! example.com="hunter2"
//! example.org="swordfish"
//! ```
//!
//! ## Durability
//!
//! Writes go to a temporary sibling file which is then renamed over the
//! original, so a crash mid-write never leaves a half-written settings
//! file behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{ConfigStore, Settings};

/// File-backed settings store
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    /// Create a store over the file at `path`.
    ///
    /// The file is not touched until [`ConfigStore::load`] or
    /// [`ConfigStore::set`] is called; a missing file fails at that point.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary sibling used for atomic writes.
    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone();
        path.set_extension("tmp");
        path
    }

    /// Read the backing file into lines, byte-for-byte.
    async fn read_lines(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::config(format!(
                "failed to read settings file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(content.lines().map(str::to_owned).collect())
    }

    /// Write `lines` back atomically (temp file, then rename).
    async fn write_lines(&self, lines: &[String]) -> Result<()> {
        let temp_path = self.temp_path();
        let mut body = lines.join("\n");
        body.push('\n');

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            Error::config(format!(
                "failed to create temp settings file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.write_all(body.as_bytes()).await.map_err(|e| {
            Error::config(format!(
                "failed to write temp settings file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.flush().await.map_err(|e| {
            Error::config(format!(
                "failed to flush temp settings file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::config(format!(
                "failed to replace settings file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Parse key/value pairs out of the stored lines.
    fn parse_pairs(lines: &[String], path: &Path) -> Result<BTreeMap<String, String>> {
        let mut pairs = BTreeMap::new();
        for (idx, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(Error::config(format!(
                    "malformed settings line {} in {}: expected key=\"value\"",
                    idx + 1,
                    path.display()
                )));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::config(format!(
                    "malformed settings line {} in {}: empty key",
                    idx + 1,
                    path.display()
                )));
            }
            pairs.insert(key.to_string(), unquote(value.trim()).to_string());
        }
        Ok(pairs)
    }
}

#[async_trait]
impl ConfigStore for EnvFileStore {
    async fn load(&self) -> Result<Settings> {
        let lines = self.read_lines().await?;
        let pairs = Self::parse_pairs(&lines, &self.path)?;
        debug!(
            path = %self.path.display(),
            entries = pairs.len(),
            "settings loaded"
        );
        Ok(Settings::from_pairs(pairs))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut lines = self.read_lines().await?;
        let rendered = format!("{key}=\"{value}\"");
        let mut replaced = false;

        // Rewrite every occurrence so a duplicated key cannot shadow the
        // new value under last-occurrence-wins loading.
        for line in lines.iter_mut() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Some((k, _)) = trimmed.split_once('=')
                && k.trim() == key
            {
                *line = rendered.clone();
                replaced = true;
            }
        }

        if !replaced {
            lines.push(rendered);
        }

        self.write_lines(&lines).await?;
        debug!(path = %self.path.display(), key, "settings key written");
        Ok(())
    }
}

/// Strip one pair of surrounding double quotes, if both are present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
