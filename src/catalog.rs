use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const BUNDLED_CATALOG: &str = include_str!("../data/artworks.json");

/// One exhibited piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub year: String,
    pub description: String,
    #[serde(default)]
    pub story: String,
    /// Image path relative to the host's asset root
    pub image: String,
}

impl Artwork {
    /// "artist • year" caption shown under the title
    pub fn caption(&self) -> String {
        format!("{} • {}", self.artist, self.year)
    }
}

/// The catalog shipped with the crate
pub fn bundled() -> Result<Vec<Artwork>> {
    parse(BUNDLED_CATALOG).context("Bundled artwork catalog is malformed")
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<Artwork>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artwork catalog: {:?}", path))?;
    parse(&text).with_context(|| format!("Failed to parse artwork catalog: {:?}", path))
}

fn parse(text: &str) -> Result<Vec<Artwork>> {
    let artworks: Vec<Artwork> = serde_json::from_str(text)?;
    Ok(artworks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_fills_four_walls() {
        let artworks = bundled().unwrap();
        assert_eq!(artworks.len(), 16);
        assert_eq!(artworks[0].title, "Bronze Head from Ife");
        assert!(artworks.iter().all(|a| !a.image.is_empty()));
    }

    #[test]
    fn bundled_ids_are_unique() {
        let artworks = bundled().unwrap();
        let mut ids: Vec<u32> = artworks.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), artworks.len());
    }

    #[test]
    fn story_is_optional() {
        let artworks = parse(
            r#"[{ "id": 7, "title": "T", "artist": "A", "year": "1900", "description": "D", "image": "/t.jpg" }]"#,
        )
        .unwrap();
        assert_eq!(artworks[0].story, "");
        assert_eq!(artworks[0].caption(), "A • 1900");
    }

    #[test]
    fn missing_title_is_rejected() {
        assert!(parse(r#"[{ "id": 7 }]"#).is_err());
    }
}
