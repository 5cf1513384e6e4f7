use serde::{Deserialize, Serialize};

/// A display-ready movie recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecommendation {
    pub movie_id: String,
    pub release_year: String,
    pub image_url: String,
    pub movie_title: String,
    pub movie_rating: String,
    pub overview: String,
}

/// A display-ready song recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRecommendation {
    pub song_id: String,
    pub release_year: String,
    pub image_url: String,
    pub song_name: String,
    pub artist_name: String,
    pub popularity_score: String,
    pub external_url: String,
}
