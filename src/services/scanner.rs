use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    services::{
        dedup::DedupFilter,
        planner::QueryKey,
        providers::Catalog,
        transport::{fetch_json, HttpTransport, RequestAuth, ResultsEnvelope},
    },
};

/// Walks discovery pages for each query key until the quota is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagedScanner {
    max_pages: u32,
    quota: usize,
}

impl PagedScanner {
    pub fn new(max_pages: u32, quota: usize) -> Self {
        Self { max_pages, quota }
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Scans query keys in plan order, pages `1..=max_pages` per key
    ///
    /// Items pass through `filter` one at a time in page order and count toward
    /// the quota as soon as they are accepted. No call is issued once the quota is
    /// reached. An empty page ends the current key only. A non-success page or an
    /// item that is not a catalog record aborts the scan and discards everything
    /// collected so far.
    pub async fn scan<C: Catalog>(
        &self,
        transport: &dyn HttpTransport,
        catalog: &C,
        auth: &RequestAuth,
        keys: &[QueryKey],
        filter: &mut DedupFilter,
    ) -> AppResult<Vec<C::Item>> {
        let mut accepted: Vec<C::Item> = Vec::with_capacity(self.quota);

        'keys: for key in keys {
            for page in 1..=self.max_pages {
                if accepted.len() >= self.quota {
                    break 'keys;
                }

                let request = catalog.discover_request(key, page).with_auth(auth.clone());
                let envelope: ResultsEnvelope<Value> =
                    fetch_json(transport, catalog.kind(), "discover", request).await?;
                let results = envelope.into_results();

                if results.is_empty() {
                    tracing::debug!(
                        catalog = %catalog.kind(),
                        query_key = %key,
                        page,
                        "Query key exhausted"
                    );
                    continue 'keys;
                }

                for raw in results {
                    if accepted.len() >= self.quota {
                        break;
                    }

                    let item: C::Item = serde_json::from_value(raw).map_err(|e| {
                        tracing::error!(
                            catalog = %catalog.kind(),
                            query_key = %key,
                            page,
                            error = %e,
                            "Undecodable discovery item"
                        );
                        AppError::MalformedResponse {
                            catalog: catalog.kind(),
                            operation: "discover",
                            reason: e.to_string(),
                        }
                    })?;

                    if let Err(reason) = filter.accept(&item) {
                        tracing::trace!(catalog = %catalog.kind(), ?reason, "Item rejected");
                        continue;
                    }

                    accepted.push(item);
                }

                tracing::debug!(
                    catalog = %catalog.kind(),
                    query_key = %key,
                    page,
                    accepted = accepted.len(),
                    "Discovery page scanned"
                );
            }
        }

        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{CatalogItem, Identifier};
    use crate::services::planner::plan_queries;
    use crate::services::providers::MovieCatalog;
    use crate::services::transport::{CatalogRequest, MockHttpTransport, RawResponse};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn catalog() -> MovieCatalog {
        MovieCatalog::from_config(
            &Config::from_pairs([("TMDB_API_URL", "http://tmdb.local"), ("TMDB_API_KEY", "k")])
                .unwrap(),
        )
    }

    fn page(items: &[(u64, &str)]) -> RawResponse {
        let results: Vec<Value> = items
            .iter()
            .map(|(id, title)| json!({ "id": id, "title": title }))
            .collect();
        RawResponse::ok(json!({ "results": results }).to_string())
    }

    /// Records every request and answers from `respond`
    fn recording_transport<F>(
        respond: F,
    ) -> (MockHttpTransport, Arc<Mutex<Vec<(String, String)>>>)
    where
        F: Fn(&str, &str) -> RawResponse + Send + 'static,
    {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();
        let mut transport = MockHttpTransport::new();
        transport.expect_send().returning(move |request: CatalogRequest| {
            let key = request.param("with_keywords").unwrap_or_default().to_string();
            let page = request.param("page").unwrap_or_default().to_string();
            let response = respond(&key, &page);
            recorded.lock().unwrap().push((key, page));
            Ok(response)
        });
        (transport, calls)
    }

    fn ids<T: CatalogItem>(items: &[T]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| item.id().map(str::to_string))
            .collect()
    }

    fn single_key(id: &str) -> Vec<QueryKey> {
        plan_queries(&[Identifier::new(id)])
    }

    #[tokio::test]
    async fn test_stops_at_quota_without_second_page() {
        let (transport, calls) = recording_transport(|_, _| {
            page(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")])
        });
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await
            .unwrap();

        assert_eq!(ids(&items), vec!["1", "2", "3", "4"]);
        assert_eq!(*calls.lock().unwrap(), vec![("X".to_string(), "1".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_page_moves_to_next_key() {
        let (transport, calls) = recording_transport(|key, page_number| match (key, page_number) {
            ("a,b", "1") => page(&[(10, "Ten")]),
            ("a,b", "2") => page(&[]),
            ("a|b", "1") => page(&[(11, "Eleven")]),
            ("a|b", "2") => page(&[]),
            _ => RawResponse::new(500, "unexpected"),
        });
        let keys = plan_queries(&[Identifier::new("a"), Identifier::new("b")]);
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &keys, &mut filter)
            .await
            .unwrap();

        assert_eq!(ids(&items), vec!["10", "11"]);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                ("a,b".to_string(), "1".to_string()),
                ("a,b".to_string(), "2".to_string()),
                ("a|b".to_string(), "1".to_string()),
                ("a|b".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_respects_max_pages() {
        let (transport, calls) = recording_transport(|_, page_number| {
            let id: u64 = page_number.parse::<u64>().unwrap_or(0) * 100;
            let title = format!("Movie {}", id);
            page(&[(id, title.as_str())])
        });
        let scanner = PagedScanner::new(2, 10);
        let mut filter = DedupFilter::default();

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await
            .unwrap();

        assert_eq!(ids(&items), vec!["100", "200"]);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_dedup_spans_query_keys() {
        let (transport, _calls) = recording_transport(|key, page_number| match (key, page_number) {
            ("a,b", "1") => page(&[(1, "Solaris"), (2, "Stalker")]),
            ("a|b", "1") => page(&[(2, "Stalker"), (3, "Solaris"), (4, "Mirror")]),
            _ => page(&[]),
        });
        let keys = plan_queries(&[Identifier::new("a"), Identifier::new("b")]);
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &keys, &mut filter)
            .await
            .unwrap();

        assert_eq!(ids(&items), vec!["1", "2", "4"]);
    }

    #[tokio::test]
    async fn test_exclusions_skip_items() {
        let (transport, _calls) = recording_transport(|_, page_number| match page_number {
            "1" => page(&[(42, "Answer"), (43, "Question")]),
            _ => page(&[]),
        });
        let exclusions = vec!["42".to_string()];
        let mut filter = DedupFilter::new(&exclusions);
        let scanner = PagedScanner::new(3, 4);

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await
            .unwrap();

        assert_eq!(ids(&items), vec!["43"]);
    }

    #[tokio::test]
    async fn test_failure_discards_collected_items() {
        let (transport, calls) = recording_transport(|_, page_number| match page_number {
            "1" => page(&[(1, "One")]),
            _ => RawResponse::new(429, "slow down"),
        });
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let result = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await;

        assert!(matches!(
            result,
            Err(AppError::CatalogUnavailable {
                operation: "discover",
                status: 429,
                ..
            })
        ));
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_item_aborts_scan() {
        let (transport, calls) = recording_transport(|_, _| {
            RawResponse::ok(r#"{"results": [42, "junk", {"id": 1, "title": "A"}]}"#)
        });
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let result = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await;

        assert!(matches!(
            result,
            Err(AppError::MalformedResponse {
                operation: "discover",
                ..
            })
        ));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrongly_typed_field_aborts_scan() {
        let (transport, _calls) = recording_transport(|_, _| {
            RawResponse::ok(
                json!({ "results": [{ "id": 1, "title": "Kept" }, { "id": 2, "title": ["x"] }] })
                    .to_string(),
            )
        });
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let result = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await;

        assert!(matches!(result, Err(AppError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_invalid_records_are_rejected() {
        let (transport, _calls) = recording_transport(|_, page_number| match page_number {
            "1" => RawResponse::ok(
                json!({
                    "results": [
                        { "id": 0, "title": "Sentinel" },
                        { "id": 2, "title": "" },
                        { "id": 3, "title": "Kept" }
                    ]
                })
                .to_string(),
            ),
            _ => page(&[]),
        });
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await
            .unwrap();

        assert_eq!(ids(&items), vec!["3"]);
    }

    #[tokio::test]
    async fn test_no_keys_no_calls() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(0);
        let scanner = PagedScanner::new(3, 4);
        let mut filter = DedupFilter::default();

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &[], &mut filter)
            .await
            .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_zero_quota_issues_no_calls() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(0);
        let scanner = PagedScanner::new(3, 0);
        let mut filter = DedupFilter::default();

        let items = scanner
            .scan(&transport, &catalog(), &RequestAuth::None, &single_key("X"), &mut filter)
            .await
            .unwrap();

        assert!(items.is_empty());
    }
}
