/// Content catalog abstraction
///
/// Each catalog describes how to authorize, how to look a keyword up, how to ask
/// its discovery endpoint for a page, and how to turn a raw item into a
/// recommendation. The recommendation pipeline drives all of them the same way.
use serde::de::DeserializeOwned;

use crate::{
    error::AppResult,
    models::{CatalogKind, CatalogItem},
    services::{
        planner::QueryKey,
        transport::{CatalogRequest, HttpTransport, RequestAuth},
    },
};

pub mod songs;
pub mod tmdb;

pub use songs::SongCatalog;
pub use tmdb::MovieCatalog;

#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Raw record from the discovery endpoint
    type Item: CatalogItem + DeserializeOwned + Send;

    /// Display-ready output record
    type Recommendation: Send;

    fn kind(&self) -> CatalogKind;

    /// Credentials for the requests of one fetch
    ///
    /// Called once per fetch, before the first lookup. May hit the network
    /// (e.g. a token exchange); failures abort the fetch.
    async fn authorize(&self, transport: &dyn HttpTransport) -> AppResult<RequestAuth>;

    /// Request resolving one keyword to a catalog identifier
    fn lookup_request(&self, keyword: &str) -> CatalogRequest;

    /// Request for one page of discovery results
    fn discover_request(&self, key: &QueryKey, page: u32) -> CatalogRequest;

    fn to_recommendation(&self, item: &Self::Item) -> Self::Recommendation;
}
