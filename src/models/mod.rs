use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod catalog_item;
mod recommendation;

pub use catalog_item::{
    CatalogItem, ExternalUrls, LookupHit, MovieItem, SongAlbum, SongArtist, SongImage, SongItem,
};
pub use recommendation::{MovieRecommendation, SongRecommendation};

/// The external content catalogs recommendations are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Movie,
    Song,
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Movie => write!(f, "movie"),
            CatalogKind::Song => write!(f, "song"),
        }
    }
}

/// A ranked mood keyword supplied by the text-analysis step
///
/// Accepts either a bare string or `{ "text": ..., "relevance": ... }` on the wire.
/// Position in the input list is what drives query ordering; relevance is only
/// logged when the search terms are collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "KeywordRepr")]
pub struct Keyword {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordRepr {
    Text(String),
    Ranked {
        text: String,
        #[serde(default)]
        relevance: Option<f64>,
    },
}

impl From<KeywordRepr> for Keyword {
    fn from(repr: KeywordRepr) -> Self {
        match repr {
            KeywordRepr::Text(text) => Keyword {
                text,
                relevance: None,
            },
            KeywordRepr::Ranked { text, relevance } => Keyword { text, relevance },
        }
    }
}

impl Keyword {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            relevance: None,
        }
    }
}

impl From<&str> for Keyword {
    fn from(text: &str) -> Self {
        Keyword::new(text)
    }
}

/// Catalog-specific token a keyword resolved to (e.g. a TMDB keyword id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// API Types
// ============================================================================

/// Request for both song and movie recommendations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub exclude_song_ids: Vec<String>,
    #[serde(default)]
    pub exclude_movie_ids: Vec<String>,
}

/// Request to refresh a single catalog's recommendations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRefreshRequest {
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
}

/// Combined recommendations for one diary entry
///
/// Each catalog is fetched independently, so one list can be filled while the
/// other carries an error message instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub keywords: Vec<String>,
    pub songs: Vec<SongRecommendation>,
    pub movies: Vec<MovieRecommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Recommendations from a single catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRefreshResponse<T> {
    pub keywords: Vec<String>,
    pub items: Vec<T>,
}
