/// TMDB movie catalog
///
/// API Flow:
/// 1. Keyword lookup: /search/keyword → first result's keyword id
/// 2. Discovery: /discover/movie?with_keywords=... → paged movies, best rated first
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{CatalogKind, MovieItem, MovieRecommendation},
    services::{
        mapper,
        planner::QueryKey,
        providers::Catalog,
        transport::{CatalogRequest, HttpTransport, RequestAuth},
    },
};

#[derive(Debug, Clone)]
pub struct MovieCatalog {
    api_key: Option<String>,
    api_url: String,
    image_base_url: String,
    language: String,
    min_vote_count: u32,
}

impl MovieCatalog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            image_base_url: config.tmdb_image_base_url.clone(),
            language: config.tmdb_language.clone(),
            min_vote_count: config.tmdb_min_vote_count,
        }
    }
}

#[async_trait::async_trait]
impl Catalog for MovieCatalog {
    type Item = MovieItem;
    type Recommendation = MovieRecommendation;

    fn kind(&self) -> CatalogKind {
        CatalogKind::Movie
    }

    async fn authorize(&self, _transport: &dyn HttpTransport) -> AppResult<RequestAuth> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(RequestAuth::QueryKey {
                param: "api_key",
                value: key.to_string(),
            }),
            _ => Err(AppError::NotConfigured(
                "TMDb API key is not configured".to_string(),
            )),
        }
    }

    fn lookup_request(&self, keyword: &str) -> CatalogRequest {
        CatalogRequest::get(format!("{}/search/keyword", self.api_url))
            .query("query", keyword)
            .query("page", 1)
    }

    fn discover_request(&self, key: &QueryKey, page: u32) -> CatalogRequest {
        CatalogRequest::get(format!("{}/discover/movie", self.api_url))
            .query("with_keywords", key)
            .query("include_adult", "false")
            .query("sort_by", "vote_average.desc")
            .query("vote_count.gte", self.min_vote_count)
            .query("language", &self.language)
            .query("page", page)
    }

    fn to_recommendation(&self, item: &MovieItem) -> MovieRecommendation {
        mapper::movie_recommendation(item, &self.image_base_url)
    }
}
