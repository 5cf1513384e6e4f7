use std::collections::HashSet;

use crate::models::CatalogItem;

/// Why an item was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingId,
    SeenId,
    MissingTitle,
    SeenTitle,
}

/// Per-call identity and title deduplication
///
/// Ids are seeded from the caller's exclusion set so repeat requests never
/// surface an item twice; titles always start empty.
#[derive(Debug, Clone, Default)]
pub struct DedupFilter {
    seen_ids: HashSet<String>,
    seen_titles: HashSet<String>,
}

impl DedupFilter {
    pub fn new<'a, I>(exclusions: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let seen_ids = exclusions
            .into_iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            seen_ids,
            seen_titles: HashSet::new(),
        }
    }

    /// Checks an item without recording it
    pub fn check<T: CatalogItem>(&self, item: &T) -> Result<(), Rejection> {
        let id = item.id().ok_or(Rejection::MissingId)?;
        if self.seen_ids.contains(id) {
            return Err(Rejection::SeenId);
        }

        let title = item.title().ok_or(Rejection::MissingTitle)?;
        if self.seen_titles.contains(title) {
            return Err(Rejection::SeenTitle);
        }

        Ok(())
    }

    /// Accepts the item if it passes every rule, recording its id and title
    pub fn accept<T: CatalogItem>(&mut self, item: &T) -> Result<(), Rejection> {
        self.check(item)?;

        if let (Some(id), Some(title)) = (item.id(), item.title()) {
            self.seen_ids.insert(id.to_string());
            self.seen_titles.insert(title.to_string());
        }

        Ok(())
    }
}
