/// Song catalog (tag taxonomy over Spotify-style track payloads)
///
/// API Flow:
/// 1. Token: client-credentials exchange at the token endpoint → bearer token
/// 2. Tag lookup: /search/tag → first result's tag id
/// 3. Discovery: /discover/track?with_tags=... → paged tracks, most popular first
use serde::Deserialize;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{CatalogKind, SongItem, SongRecommendation},
    services::{
        mapper,
        planner::QueryKey,
        providers::Catalog,
        transport::{fetch_json, CatalogRequest, HttpTransport, RequestAuth},
    },
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SongCatalog {
    api_url: Option<String>,
    token_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    image_base_url: String,
    market: String,
    min_popularity: u32,
}

impl SongCatalog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_url: config
                .song_api_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            token_url: config.song_token_url.clone(),
            client_id: config.song_client_id.clone(),
            client_secret: config.song_client_secret.clone(),
            image_base_url: config.song_image_base_url.clone(),
            market: config.song_market.clone(),
            min_popularity: config.song_min_popularity,
        }
    }

    fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or_default()
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let id = self.client_id.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        let secret = self
            .client_secret
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())?;
        Some((id, secret))
    }
}

#[async_trait::async_trait]
impl Catalog for SongCatalog {
    type Item = SongItem;
    type Recommendation = SongRecommendation;

    fn kind(&self) -> CatalogKind {
        CatalogKind::Song
    }

    async fn authorize(&self, transport: &dyn HttpTransport) -> AppResult<RequestAuth> {
        if self.api_url.is_none() {
            return Err(AppError::NotConfigured(
                "Song catalog URL is not configured".to_string(),
            ));
        }
        let (client_id, client_secret) = self.credentials().ok_or_else(|| {
            AppError::NotConfigured("Song catalog credentials are not configured".to_string())
        })?;

        let request = CatalogRequest::post_form(
            self.token_url.clone(),
            vec![("grant_type".to_string(), "client_credentials".to_string())],
        )
        .with_auth(RequestAuth::Basic {
            username: client_id.to_string(),
            password: client_secret.to_string(),
        });

        let token: TokenResponse =
            fetch_json(transport, CatalogKind::Song, "token request", request).await?;

        match token.access_token.filter(|t| !t.trim().is_empty()) {
            Some(access_token) => {
                tracing::debug!(catalog = "song", "Song catalog token acquired");
                Ok(RequestAuth::Bearer(access_token))
            }
            None => Err(AppError::MalformedResponse {
                catalog: CatalogKind::Song,
                operation: "token request",
                reason: "missing access_token".to_string(),
            }),
        }
    }

    fn lookup_request(&self, keyword: &str) -> CatalogRequest {
        CatalogRequest::get(format!("{}/search/tag", self.api_url()))
            .query("query", keyword)
            .query("page", 1)
    }

    fn discover_request(&self, key: &QueryKey, page: u32) -> CatalogRequest {
        CatalogRequest::get(format!("{}/discover/track", self.api_url()))
            .query("with_tags", key)
            .query("min_popularity", self.min_popularity)
            .query("sort_by", "popularity.desc")
            .query("market", &self.market)
            .query("page", page)
    }

    fn to_recommendation(&self, item: &SongItem) -> SongRecommendation {
        mapper::song_recommendation(item, &self.image_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identifier;
    use crate::services::transport::{MockHttpTransport, RawResponse, RequestMethod};

    fn create_test_catalog() -> SongCatalog {
        SongCatalog::from_config(
            &Config::from_pairs([
                ("SONG_API_URL", "http://songs.local/v1/"),
                ("SONG_TOKEN_URL", "http://auth.local/token"),
                ("SONG_CLIENT_ID", "client"),
                ("SONG_CLIENT_SECRET", "secret"),
            ])
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_authorize_exchanges_client_credentials() {
        let catalog = create_test_catalog();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.url == "http://auth.local/token"
                    && request.method
                        == RequestMethod::PostForm(vec![(
                            "grant_type".to_string(),
                            "client_credentials".to_string(),
                        )])
                    && request.auth
                        == RequestAuth::Basic {
                            username: "client".to_string(),
                            password: "secret".to_string(),
                        }
            })
            .times(1)
            .returning(|_| {
                Ok(RawResponse::ok(
                    r#"{"access_token": "tok", "token_type": "Bearer", "expires_in": 3600}"#,
                ))
            });

        let auth = catalog.authorize(&transport).await.unwrap();
        assert_eq!(auth, RequestAuth::Bearer("tok".to_string()));
    }

    #[tokio::test]
    async fn test_authorize_token_failure_is_catalog_unavailable() {
        let catalog = create_test_catalog();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(RawResponse::new(401, r#"{"error": "invalid_client"}"#)));

        let result = catalog.authorize(&transport).await;
        assert!(matches!(
            result,
            Err(AppError::CatalogUnavailable {
                operation: "token request",
                status: 401,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_authorize_empty_token_is_malformed() {
        let catalog = create_test_catalog();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(RawResponse::ok(r#"{"access_token": ""}"#)));

        let result = catalog.authorize(&transport).await;
        assert!(matches!(result, Err(AppError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_authorize_without_credentials_makes_no_call() {
        let catalog = SongCatalog::from_config(
            &Config::from_pairs([("SONG_API_URL", "http://songs.local")]).unwrap(),
        );
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(0);

        let result = catalog.authorize(&transport).await;
        assert!(matches!(result, Err(AppError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_authorize_without_api_url() {
        let catalog = SongCatalog::from_config(
            &Config::from_pairs([("SONG_CLIENT_ID", "c"), ("SONG_CLIENT_SECRET", "s")]).unwrap(),
        );
        let transport = MockHttpTransport::new();

        let result = catalog.authorize(&transport).await;
        assert!(matches!(result, Err(AppError::NotConfigured(_))));
    }

    #[test]
    fn test_lookup_and_discover_requests() {
        let catalog = create_test_catalog();

        let lookup = catalog.lookup_request("melancholy");
        assert_eq!(lookup.url, "http://songs.local/v1/search/tag");
        assert_eq!(lookup.param("query"), Some("melancholy"));

        let key = QueryKey::any(vec![Identifier::new("sad"), Identifier::new("rain")]);
        let discover = catalog.discover_request(&key, 3);
        assert_eq!(discover.url, "http://songs.local/v1/discover/track");
        assert_eq!(discover.param("with_tags"), Some("sad|rain"));
        assert_eq!(discover.param("sort_by"), Some("popularity.desc"));
        assert_eq!(discover.param("min_popularity"), Some("30"));
        assert_eq!(discover.param("market"), Some("US"));
        assert_eq!(discover.param("page"), Some("3"));
    }
}
