//! Raw catalog item → display-ready recommendation.
//!
//! Mapping never fails: missing optional fields degrade to placeholders.

use crate::models::{CatalogItem, MovieItem, MovieRecommendation, SongItem, SongRecommendation};

pub const MOVIE_PLACEHOLDER: &str = "-";
pub const SONG_PLACEHOLDER: &str = "Unknown";
pub const MOVIE_RATING_SCALE: u32 = 10;
pub const SONG_POPULARITY_SCALE: u32 = 100;

pub fn movie_recommendation(item: &MovieItem, image_base_url: &str) -> MovieRecommendation {
    MovieRecommendation {
        movie_id: item.id().unwrap_or_default().to_string(),
        release_year: release_year(item.release_date.as_deref(), MOVIE_PLACEHOLDER),
        image_url: image_url(item.poster_path.as_deref(), image_base_url, MOVIE_PLACEHOLDER),
        movie_title: item.title().unwrap_or(MOVIE_PLACEHOLDER).to_string(),
        movie_rating: format_score(item.score(), MOVIE_RATING_SCALE, MOVIE_PLACEHOLDER),
        overview: item.overview.clone().unwrap_or_default(),
    }
}

pub fn song_recommendation(item: &SongItem, image_base_url: &str) -> SongRecommendation {
    SongRecommendation {
        song_id: item.id().unwrap_or_default().to_string(),
        release_year: release_year(item.release_date(), SONG_PLACEHOLDER),
        image_url: image_url(item.image_ref(), image_base_url, ""),
        song_name: item.title().unwrap_or(SONG_PLACEHOLDER).to_string(),
        artist_name: item
            .artist_names()
            .unwrap_or_else(|| SONG_PLACEHOLDER.to_string()),
        popularity_score: format_score(item.score(), SONG_POPULARITY_SCALE, ""),
        external_url: item.external_url().unwrap_or_default().to_string(),
    }
}

/// First four characters of a date, e.g. `2010-07-15` → `2010`
pub fn release_year(date: Option<&str>, placeholder: &str) -> String {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => date.chars().take(4).collect(),
        None => placeholder.to_string(),
    }
}

/// `<value>/<scale>`; whole numbers drop the fraction (`8/10`, `7.5/10`)
pub fn format_score(score: Option<f64>, scale: u32, placeholder: &str) -> String {
    match score.filter(|s| s.is_finite()) {
        Some(score) if score.fract() == 0.0 => format!("{:.0}/{}", score, scale),
        Some(score) => format!("{}/{}", score, scale),
        None => format!("{}/{}", placeholder, scale),
    }
}

pub fn image_url(reference: Option<&str>, base_url: &str, placeholder: &str) -> String {
    match reference.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reference) => format!("{}{}", base_url, reference),
        None => placeholder.to_string(),
    }
}
