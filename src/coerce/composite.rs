//! Textual forms of list and map slots.
//!
//! A list is `a,b,c`; a map is `k1=v1,k2=v2`. Splitting happens on every
//! `,` and each pair splits on its first `=`, so values may contain `=`
//! but neither keys nor values may contain `,`.

use std::collections::HashMap;

use crate::constants::{ITEM_SEPARATOR, PAIR_SEPARATOR};

use super::CoerceError;

/// Split a comma-joined list. The empty string is the empty list.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(ITEM_SEPARATOR).map(str::to_string).collect()
}

/// Join a list back into its textual form.
pub fn join_list(items: &[String]) -> String {
    items.join(ITEM_SEPARATOR)
}

/// Parse `key=value` pairs. Every item must contain `=`; nothing is
/// returned unless all of them do.
pub fn parse_pairs(raw: &str) -> Result<HashMap<String, String>, CoerceError> {
    if raw.is_empty() {
        return Ok(HashMap::new());
    }
    raw.split(ITEM_SEPARATOR)
        .map(|item| {
            item.split_once(PAIR_SEPARATOR)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| CoerceError::MapItem(item.to_string()))
        })
        .collect()
}

/// Render a map as `key=value` pairs, keys sorted for stable output.
pub fn join_pairs(map: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = map.iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}{PAIR_SEPARATOR}{v}"))
        .collect::<Vec<_>>()
        .join(ITEM_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_on_commas() {
        assert_eq!(split_list("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_list("single"), vec!["single"]);
    }

    #[test]
    fn split_list_keeps_empty_items_between_commas() {
        assert_eq!(split_list("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_string_is_empty_list() {
        assert!(split_list("").is_empty());
    }

    #[test]
    fn join_list_round_trips() {
        let items = vec!["x".to_string(), "y".to_string()];
        assert_eq!(join_list(&items), "x,y");
        assert_eq!(join_list(&[]), "");
    }

    #[test]
    fn parse_pairs_splits_on_first_equals() {
        let map = parse_pairs("k1=v1,k2=a=b").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["k1"], "v1");
        assert_eq!(map["k2"], "a=b");
    }

    #[test]
    fn parse_pairs_rejects_item_without_equals() {
        let err = parse_pairs("k1=v1,bad").unwrap_err();
        assert!(matches!(err, CoerceError::MapItem(ref item) if item == "bad"));
    }

    #[test]
    fn parse_pairs_empty_string() {
        assert!(parse_pairs("").unwrap().is_empty());
    }

    #[test]
    fn join_pairs_sorted() {
        let map = parse_pairs("b=2,a=1").unwrap();
        assert_eq!(join_pairs(&map), "a=1,b=2");
    }
}
