use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// TMDB API key; movie recommendations are unavailable without it
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix for poster paths returned by TMDB
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Minimum vote count for a movie to be discoverable
    #[serde(default = "default_tmdb_min_vote_count")]
    pub tmdb_min_vote_count: u32,

    /// Song catalog base URL; song recommendations are unavailable without it
    #[serde(default)]
    pub song_api_url: Option<String>,

    /// OAuth2 client-credentials token endpoint for the song catalog
    #[serde(default = "default_song_token_url")]
    pub song_token_url: String,

    #[serde(default)]
    pub song_client_id: Option<String>,

    #[serde(default)]
    pub song_client_secret: Option<String>,

    /// Prefix for track image references; empty when the catalog returns absolute URLs
    #[serde(default)]
    pub song_image_base_url: String,

    #[serde(default = "default_song_market")]
    pub song_market: String,

    #[serde(default = "default_song_min_popularity")]
    pub song_min_popularity: u32,

    /// Maximum recommendations returned per catalog per call
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Result pages scanned per query key
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Upper bound on keywords per request; the query plan grows quadratically
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Catalog request timeout; unset leaves the HTTP client default in place
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_tmdb_min_vote_count() -> u32 {
    350
}

fn default_song_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_song_market() -> String {
    "US".to_string()
}

fn default_song_min_popularity() -> u32 {
    30
}

fn default_recommendation_limit() -> usize {
    4
}

fn default_max_pages() -> u32 {
    3
}

fn default_max_keywords() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load configuration from explicit key/value pairs (same names as the environment)
    pub fn from_pairs<I, K, V>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        envy::from_iter::<_, Config>(pairs.into_iter().map(|(k, v)| (k.into(), v.into())))
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
