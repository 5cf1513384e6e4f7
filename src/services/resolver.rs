use crate::{
    error::AppResult,
    models::{Identifier, LookupHit},
    services::{
        providers::Catalog,
        transport::{fetch_json, HttpTransport, RequestAuth, ResultsEnvelope},
    },
};

/// Resolves keywords to catalog identifiers, one lookup per keyword, in order
///
/// Keywords without a match are dropped. The first non-success lookup aborts the
/// whole resolution; later keywords are never looked up.
pub async fn resolve_identifiers<C: Catalog>(
    transport: &dyn HttpTransport,
    catalog: &C,
    auth: &RequestAuth,
    keywords: &[&str],
) -> AppResult<Vec<Identifier>> {
    let mut identifiers = Vec::with_capacity(keywords.len());

    for keyword in keywords {
        let request = catalog.lookup_request(keyword).with_auth(auth.clone());
        let envelope: ResultsEnvelope<LookupHit> =
            fetch_json(transport, catalog.kind(), "keyword search", request).await?;

        match envelope.into_results().first().and_then(LookupHit::identifier) {
            Some(identifier) => {
                tracing::debug!(
                    catalog = %catalog.kind(),
                    keyword = %keyword,
                    identifier = %identifier,
                    "Keyword resolved"
                );
                identifiers.push(identifier);
            }
            None => {
                tracing::debug!(
                    catalog = %catalog.kind(),
                    keyword = %keyword,
                    "No catalog match for keyword"
                );
            }
        }
    }

    Ok(identifiers)
}
