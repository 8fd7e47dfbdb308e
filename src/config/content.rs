// src/config/content.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

use crate::content::paginate::DEFAULT_PAGE_SIZE;

pub const ENV_CONFIG_PATH: &str = "CONTENT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/content.toml";
pub const ENV_FIRESTORE_API_KEY: &str = "FIRESTORE_API_KEY";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

fn default_database() -> String {
    "(default)".to_string()
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_articles() -> String {
    "articles".to_string()
}
fn default_news() -> String {
    "news".to_string()
}
fn default_gallery() -> String {
    "gallery".to_string()
}
fn default_resources() -> String {
    "resources".to_string()
}
fn default_table_order() -> Option<String> {
    Some("published_date".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    /// Empty disables the document store.
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    /// "ENV" means: read from FIRESTORE_API_KEY
    #[serde(default)]
    pub api_key: String,
    /// Emulator/proxy override for the REST endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: default_database(),
            api_key: String::new(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationalStoreConfig {
    /// Empty disables the relational store.
    #[serde(default)]
    pub url: String,
    /// "ENV" means: read from SUPABASE_ANON_KEY
    #[serde(default)]
    pub anon_key: String,
    /// Column the articles table is ordered by (descending) server-side.
    #[serde(default = "default_table_order")]
    pub order_by: Option<String>,
}

impl Default for RelationalStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            order_by: default_table_order(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_articles")]
    pub articles: String,
    #[serde(default = "default_news")]
    pub news: String,
    #[serde(default = "default_gallery")]
    pub gallery: String,
    #[serde(default = "default_resources")]
    pub resources: String,
    #[serde(default = "default_articles")]
    pub articles_table: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            articles: default_articles(),
            news: default_news(),
            gallery: default_gallery(),
            resources: default_resources(),
            articles_table: default_articles(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub document_store: DocumentStoreConfig,
    #[serde(default)]
    pub relational_store: RelationalStoreConfig,
    #[serde(default)]
    pub collections: CollectionsConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl ContentConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading content config from {}", path.display()))?;
        let mut cfg: ContentConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        cfg.sanitize();
        cfg.resolve_secrets()?;
        Ok(cfg)
    }

    /// Load config using env var + fallbacks:
    /// 1) $CONTENT_CONFIG_PATH
    /// 2) config/content.toml
    /// 3) built-in defaults (both remote stores disabled)
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    /// Secrets of disabled stores are left alone.
    fn resolve_secrets(&mut self) -> Result<()> {
        if self.document_store_enabled() && self.document_store.api_key.trim().eq_ignore_ascii_case("env") {
            self.document_store.api_key = env::var(ENV_FIRESTORE_API_KEY)
                .map_err(|_| anyhow!("Missing {ENV_FIRESTORE_API_KEY} env var"))?;
        }
        if self.relational_store_enabled() && self.relational_store.anon_key.trim().eq_ignore_ascii_case("env") {
            self.relational_store.anon_key = env::var(ENV_SUPABASE_ANON_KEY)
                .map_err(|_| anyhow!("Missing {ENV_SUPABASE_ANON_KEY} env var"))?;
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        if self.pagination.page_size == 0 {
            self.pagination.page_size = DEFAULT_PAGE_SIZE;
        }
        self.document_store.project_id = self.document_store.project_id.trim().to_string();
        self.relational_store.url = self.relational_store.url.trim().to_string();
        if self
            .relational_store
            .order_by
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            self.relational_store.order_by = None;
        }
    }

    pub fn document_store_enabled(&self) -> bool {
        !self.document_store.project_id.is_empty()
    }

    pub fn relational_store_enabled(&self) -> bool {
        !self.relational_store.url.is_empty()
    }
}
