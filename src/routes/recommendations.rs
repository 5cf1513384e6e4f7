use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{
        CatalogRefreshRequest, CatalogRefreshResponse, Keyword, MovieRecommendation,
        RecommendationRequest, RecommendationResponse, SongRecommendation,
    },
};

use super::AppState;

/// Songs and movies for one set of keywords
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        keywords = request.keywords.len(),
        "Recommendations requested"
    );

    let response = state
        .engine
        .recommend(
            &request.keywords,
            &request.exclude_song_ids,
            &request.exclude_movie_ids,
        )
        .await?;

    Ok(Json(response))
}

/// More movies for the same keywords, skipping ids the caller already has
pub async fn refresh_movies(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CatalogRefreshRequest>,
) -> AppResult<Json<CatalogRefreshResponse<MovieRecommendation>>> {
    tracing::info!(
        request_id = %request_id,
        excluded = request.exclude_ids.len(),
        "Movie refresh requested"
    );

    let items = state
        .engine
        .fetch_movies(&request.keywords, &request.exclude_ids)
        .await?;

    Ok(Json(CatalogRefreshResponse {
        keywords: keyword_texts(&request.keywords),
        items,
    }))
}

/// More songs for the same keywords, skipping ids the caller already has
pub async fn refresh_songs(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CatalogRefreshRequest>,
) -> AppResult<Json<CatalogRefreshResponse<SongRecommendation>>> {
    tracing::info!(
        request_id = %request_id,
        excluded = request.exclude_ids.len(),
        "Song refresh requested"
    );

    let items = state
        .engine
        .fetch_songs(&request.keywords, &request.exclude_ids)
        .await?;

    Ok(Json(CatalogRefreshResponse {
        keywords: keyword_texts(&request.keywords),
        items,
    }))
}

fn keyword_texts(keywords: &[Keyword]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| keyword.text.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}
