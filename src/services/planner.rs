use std::fmt::Display;

use crate::models::Identifier;

/// How the identifiers inside a query key are combined by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combination {
    /// Every identifier must match (serialized with `,`)
    All,
    /// Any identifier may match (serialized with `|`)
    Any,
}

impl Combination {
    pub fn separator(&self) -> &'static str {
        match self {
            Combination::All => ",",
            Combination::Any => "|",
        }
    }
}

/// One discovery query: identifiers plus the mode they are combined under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    mode: Combination,
    identifiers: Vec<Identifier>,
}

impl QueryKey {
    pub fn all(identifiers: Vec<Identifier>) -> Self {
        Self {
            mode: Combination::All,
            identifiers,
        }
    }

    pub fn any(identifiers: Vec<Identifier>) -> Self {
        Self {
            mode: Combination::Any,
            identifiers,
        }
    }
}

/// Wire form sent to the discovery endpoint, e.g. `12,34` or `12|34|56`
impl Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .identifiers
            .iter()
            .map(Identifier::as_str)
            .collect::<Vec<_>>()
            .join(self.mode.separator());
        write!(f, "{}", joined)
    }
}

/// Builds the ordered discovery plan for resolved identifiers
///
/// Every pair `(i, j)` with `i < j` becomes an AND key, outer index ascending,
/// then one final OR key holds all identifiers. No identifiers, no keys.
pub fn plan_queries(identifiers: &[Identifier]) -> Vec<QueryKey> {
    if identifiers.is_empty() {
        return Vec::new();
    }

    let n = identifiers.len();
    let mut keys = Vec::with_capacity(n * (n - 1) / 2 + 1);

    for i in 0..n {
        for j in (i + 1)..n {
            keys.push(QueryKey::all(vec![
                identifiers[i].clone(),
                identifiers[j].clone(),
            ]));
        }
    }

    keys.push(QueryKey::any(identifiers.to_vec()));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<Identifier> {
        values.iter().map(|v| Identifier::new(*v)).collect()
    }

    fn wire(keys: &[QueryKey]) -> Vec<String> {
        keys.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_identifiers_no_keys() {
        assert!(plan_queries(&[]).is_empty());
    }

    #[test]
    fn test_single_identifier_only_or_key() {
        let keys = plan_queries(&ids(&["X"]));

        assert_eq!(keys, vec![QueryKey::any(ids(&["X"]))]);
        assert_eq!(keys[0].to_string(), "X");
    }

    #[test]
    fn test_three_identifiers_pairs_then_or() {
        let keys = plan_queries(&ids(&["a", "b", "c"]));

        assert_eq!(wire(&keys), vec!["a,b", "a,c", "b,c", "a|b|c"]);
        assert_eq!(keys[0], QueryKey::all(ids(&["a", "b"])));
        assert_eq!(keys[3], QueryKey::any(ids(&["a", "b", "c"])));
    }

    #[test]
    fn test_four_identifiers_key_count_and_order() {
        let keys = plan_queries(&ids(&["1", "2", "3", "4"]));

        assert_eq!(
            wire(&keys),
            vec!["1,2", "1,3", "1,4", "2,3", "2,4", "3,4", "1|2|3|4"]
        );
    }

    #[test]
    fn test_mode_is_part_of_identity() {
        let pair = ids(&["a", "b"]);
        assert_ne!(QueryKey::all(pair.clone()), QueryKey::any(pair));
    }

    #[test]
    fn test_duplicate_identifiers_are_kept() {
        // Two keywords can resolve to the same catalog entity
        let keys = plan_queries(&ids(&["7", "7"]));
        assert_eq!(wire(&keys), vec!["7,7", "7|7"]);
    }
}
