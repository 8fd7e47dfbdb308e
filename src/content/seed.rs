// src/content/seed.rs
//! Seed records bundled into the binary, one list per content kind.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::content::types::{ContentKind, RawRecord};

const BUNDLED_SEED: &str = include_str!("../../config/seed_content.json");

/// Records shipped with the site itself, merged ahead of both remote stores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub articles: Vec<RawRecord>,
    #[serde(default)]
    pub news: Vec<RawRecord>,
    #[serde(default)]
    pub gallery: Vec<RawRecord>,
    #[serde(default)]
    pub resources: Vec<RawRecord>,
}

impl SeedData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SEED).context("parsing bundled seed content")
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn records(&self, kind: ContentKind) -> &[RawRecord] {
        match kind {
            ContentKind::Article => &self.articles,
            ContentKind::NewsEvent => &self.news,
            ContentKind::GalleryItem => &self.gallery,
            ContentKind::Resource => &self.resources,
        }
    }
}
