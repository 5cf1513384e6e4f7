use std::sync::Arc;

use chrono::Utc;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Keyword, MovieRecommendation, RecommendationResponse, SongRecommendation},
    services::{
        dedup::DedupFilter,
        planner::plan_queries,
        providers::{Catalog, MovieCatalog, SongCatalog},
        resolver::resolve_identifiers,
        scanner::PagedScanner,
        transport::HttpTransport,
    },
};

/// Turns ranked mood keywords into song and movie recommendations
///
/// Every fetch is a single linear pass: authorize, resolve keywords to
/// identifiers, plan query keys, scan discovery pages through the dedup filter,
/// map, cap. Nothing is kept between calls; exclusions are supplied by the caller.
#[derive(Clone)]
pub struct RecommendationEngine {
    transport: Arc<dyn HttpTransport>,
    movies: MovieCatalog,
    songs: SongCatalog,
    scanner: PagedScanner,
    max_keywords: usize,
}

impl RecommendationEngine {
    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            movies: MovieCatalog::from_config(config),
            songs: SongCatalog::from_config(config),
            scanner: PagedScanner::new(config.max_pages, config.recommendation_limit),
            max_keywords: config.max_keywords,
        }
    }

    /// Fetches songs, then movies, each independently
    ///
    /// A failed catalog leaves its list empty and its message in the matching
    /// error field. Only when both fail is the song failure returned as an error.
    pub async fn recommend(
        &self,
        keywords: &[Keyword],
        exclude_song_ids: &[String],
        exclude_movie_ids: &[String],
    ) -> AppResult<RecommendationResponse> {
        let terms = self.search_terms(keywords)?;

        let songs = self.fetch(&self.songs, &terms, exclude_song_ids).await;
        let movies = self.fetch(&self.movies, &terms, exclude_movie_ids).await;

        let (songs, song_error, movies, movie_error) = match (songs, movies) {
            (Err(song_error), Err(movie_error)) => {
                tracing::error!(
                    song_error = %song_error,
                    movie_error = %movie_error,
                    "Both catalogs failed"
                );
                return Err(song_error);
            }
            (songs, movies) => {
                let (songs, song_error) = split_outcome(songs);
                let (movies, movie_error) = split_outcome(movies);
                (songs, song_error, movies, movie_error)
            }
        };

        Ok(RecommendationResponse {
            keywords: terms.iter().map(|term| term.to_string()).collect(),
            songs,
            movies,
            song_error,
            movie_error,
            generated_at: Utc::now(),
        })
    }

    pub async fn fetch_movies(
        &self,
        keywords: &[Keyword],
        exclude_ids: &[String],
    ) -> AppResult<Vec<MovieRecommendation>> {
        let terms = self.search_terms(keywords)?;
        self.fetch(&self.movies, &terms, exclude_ids).await
    }

    pub async fn fetch_songs(
        &self,
        keywords: &[Keyword],
        exclude_ids: &[String],
    ) -> AppResult<Vec<SongRecommendation>> {
        let terms = self.search_terms(keywords)?;
        self.fetch(&self.songs, &terms, exclude_ids).await
    }

    /// Trimmed, non-blank keyword texts in input order
    pub fn search_terms<'a>(&self, keywords: &'a [Keyword]) -> AppResult<Vec<&'a str>> {
        let terms: Vec<&str> = keywords
            .iter()
            .filter_map(|keyword| {
                let text = keyword.text.trim();
                if text.is_empty() {
                    return None;
                }
                tracing::debug!(keyword = %text, relevance = ?keyword.relevance, "Search term");
                Some(text)
            })
            .collect();

        if terms.len() > self.max_keywords {
            return Err(AppError::InvalidInput(format!(
                "At most {} keywords are allowed, got {}",
                self.max_keywords,
                terms.len()
            )));
        }

        Ok(terms)
    }

    async fn fetch<C: Catalog>(
        &self,
        catalog: &C,
        terms: &[&str],
        exclude_ids: &[String],
    ) -> AppResult<Vec<C::Recommendation>> {
        match self.run_pipeline(catalog, terms, exclude_ids).await {
            Ok(recommendations) => {
                tracing::info!(
                    catalog = %catalog.kind(),
                    keywords = terms.len(),
                    excluded = exclude_ids.len(),
                    returned = recommendations.len(),
                    "Recommendations fetched"
                );
                Ok(recommendations)
            }
            Err(e) => {
                tracing::warn!(catalog = %catalog.kind(), error = %e, "Recommendation fetch failed");
                Err(AppError::fetch_failed(catalog.kind(), e))
            }
        }
    }

    async fn run_pipeline<C: Catalog>(
        &self,
        catalog: &C,
        terms: &[&str],
        exclude_ids: &[String],
    ) -> AppResult<Vec<C::Recommendation>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let transport = self.transport.as_ref();
        let auth = catalog.authorize(transport).await?;

        let identifiers = resolve_identifiers(transport, catalog, &auth, terms).await?;
        let keys = plan_queries(&identifiers);
        if keys.is_empty() {
            tracing::debug!(catalog = %catalog.kind(), "No keywords resolved");
            return Ok(Vec::new());
        }

        let mut filter = DedupFilter::new(exclude_ids);
        let items = self
            .scanner
            .scan(transport, catalog, &auth, &keys, &mut filter)
            .await?;

        Ok(items
            .iter()
            .take(self.scanner.quota())
            .map(|item| catalog.to_recommendation(item))
            .collect())
    }
}

fn split_outcome<T>(outcome: AppResult<Vec<T>>) -> (Vec<T>, Option<String>) {
    match outcome {
        Ok(items) => (items, None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    }
}
