//! Raw records returned by the catalogs' discovery endpoints.
//!
//! Every field is optional on the wire: a record that is missing its id or title
//! is not an error, it is simply never accepted by the deduplication filter.

use serde::{Deserialize, Deserializer};

use super::Identifier;

/// Capabilities shared by raw items from every catalog
pub trait CatalogItem {
    /// Catalog id, or `None` when missing, empty or the `0` placeholder.
    fn id(&self) -> Option<&str>;

    /// Trimmed title, or `None` when missing or blank.
    fn title(&self) -> Option<&str>;

    /// Score the catalog sorted the page by.
    fn score(&self) -> Option<f64>;
}

/// A movie from the discovery endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl CatalogItem for MovieItem {
    fn id(&self) -> Option<&str> {
        usable_id(self.id.as_deref())
    }

    fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    fn score(&self) -> Option<f64> {
        self.vote_average
    }
}

/// A track from the discovery endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SongArtist>,
    #[serde(default)]
    pub album: Option<SongAlbum>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongArtist {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongAlbum {
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<SongImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

impl SongItem {
    pub fn release_date(&self) -> Option<&str> {
        self.album.as_ref().and_then(|a| a.release_date.as_deref())
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.album
            .as_ref()
            .and_then(|a| a.images.first())
            .and_then(|image| image.url.as_deref())
    }

    pub fn external_url(&self) -> Option<&str> {
        self.external_urls
            .as_ref()
            .and_then(|urls| urls.spotify.as_deref())
    }

    /// Comma-joined names of the credited artists
    pub fn artist_names(&self) -> Option<String> {
        let names: Vec<&str> = self
            .artists
            .iter()
            .filter_map(|artist| non_blank(artist.name.as_deref()))
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

impl CatalogItem for SongItem {
    fn id(&self) -> Option<&str> {
        usable_id(self.id.as_deref())
    }

    fn title(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    fn score(&self) -> Option<f64> {
        self.popularity
    }
}

/// A keyword/tag lookup hit; only its id is used
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LookupHit {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
}

impl LookupHit {
    pub fn identifier(&self) -> Option<Identifier> {
        usable_id(self.id.as_deref()).map(Identifier::new)
    }
}

fn usable_id(id: Option<&str>) -> Option<&str> {
    non_blank(id).filter(|id| *id != "0")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Catalogs disagree on whether ids are numbers or strings; keep them as text.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Text(s) => s,
    }))
}

/// Scores arrive as numbers or numeric strings; anything else is treated as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Scalar>::deserialize(deserializer)?.and_then(|value| match value {
            Scalar::Int(n) => Some(n as f64),
            Scalar::Float(n) => Some(n),
            Scalar::Text(s) => s.trim().parse().ok(),
        }),
    )
}
