//! Query-string handling for gateway events.
//!
//! Inbound query strings are parsed into a nested structure (`a[b]=1` becomes
//! `{"a": {"b": "1"}}`) and later flattened back into the bracket-notation keys
//! that API Gateway uses for structured query parameters.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Bracket segments parsed below the root key. Deeper segments are kept as
/// one literal key.
pub const MAX_DEPTH: usize = 5;

/// Pairs read from one query string. The rest are ignored.
pub const MAX_PARAMETERS: usize = 1000;

/// Parses a raw query string (without the leading `?`) into a nested JSON object.
///
/// - `+` decodes to a space, `%XX` sequences are percent-decoded
/// - `a[b][c]=1` builds nested objects
/// - `a[]=x` appends to an array, and a repeated plain key becomes an array
/// - a key without `=` maps to an empty string
/// - nesting stops after [`MAX_DEPTH`] segments and only the first
///   [`MAX_PARAMETERS`] pairs are read
///
/// Keys keep their first-seen order. When a scalar and a nested form collide on
/// the same key, the later nested form replaces the scalar.
#[must_use]
pub fn parse_query(raw: &str) -> Value {
    let mut root = Value::Object(Map::new());

    for pair in raw
        .split('&')
        .take(MAX_PARAMETERS)
        .filter(|pair| !pair.is_empty())
    {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        assign(&mut root, &key_path(&key), decode_component(value));
    }

    root
}

/// Flattens a possibly nested query structure into bracket-notation keys.
///
/// Nesting is first collapsed into dot-joined keys (`a.b.c`), then every key
/// containing a dot is rewritten as `a[b][c]`. A key that already carried a
/// literal dot is rewritten the same way. Later duplicates overwrite earlier
/// values while keeping the first position.
#[must_use]
pub fn flatten_query(query: Option<&Value>) -> IndexMap<String, String> {
    let mut dotted = Vec::new();
    if let Some(query) = query {
        flatten_dotted(query, None, &mut dotted);
    }

    dotted
        .into_iter()
        .map(|(key, value)| (bracket_key(&key), value))
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), Cow::into_owned)
}

// Splits `a[b][]` into `["a", "b", ""]`. Anything not shaped like
// `root[seg]...` is kept as a single literal key. Past `MAX_DEPTH` segments
// the unparsed remainder becomes the last segment: `a[b][c][d][e][f][g]`
// gives `["a", "b", "c", "d", "e", "f", "[g]"]`.
fn key_path(key: &str) -> Vec<String> {
    let literal = || vec![key.to_string()];

    let Some(open) = key.find('[') else {
        return literal();
    };
    if open == 0 {
        return literal();
    }

    let (root, mut rest) = key.split_at(open);
    let mut path = vec![root.to_string()];

    while let Some(inner) = rest.strip_prefix('[') {
        if path.len() > MAX_DEPTH {
            path.push(rest.to_string());
            return path;
        }
        let Some((segment, tail)) = inner.split_once(']') else {
            return literal();
        };
        path.push(segment.to_string());
        rest = tail;
    }

    if rest.is_empty() { path } else { literal() }
}

fn assign(slot: &mut Value, path: &[String], leaf: String) {
    let Some((segment, rest)) = path.split_first() else {
        append(slot, Value::String(leaf), false);
        return;
    };

    if segment.is_empty() {
        let mut element = Value::Null;
        assign(&mut element, rest, leaf);
        append(slot, element, true);
        return;
    }

    if let Value::Array(items) = slot {
        let indexed = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect();
        *slot = Value::Object(indexed);
    }
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        let child = map.entry(segment.clone()).or_insert(Value::Null);
        assign(child, rest, leaf);
    }
}

// `[]` segments always produce an array, even for a single element.
fn append(slot: &mut Value, element: Value, as_array: bool) {
    match slot {
        Value::Null if as_array => *slot = Value::Array(vec![element]),
        Value::Null => *slot = element,
        Value::Array(items) => items.push(element),
        other => {
            let previous = other.take();
            *other = Value::Array(vec![previous, element]);
        }
    }
}

fn flatten_dotted(value: &Value, prefix: Option<&str>, out: &mut Vec<(String, String)>) {
    let join = |key: &str| prefix.map_or_else(|| key.to_string(), |p| format!("{p}.{key}"));

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_dotted(child, Some(join(key).as_str()), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_dotted(child, Some(join(&index.to_string()).as_str()), out);
            }
        }
        leaf => {
            if let Some(key) = prefix {
                out.push((key.to_string(), leaf_text(leaf)));
            }
        }
    }
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn bracket_key(key: &str) -> String {
    let mut segments = key.split('.');
    let parent = segments.next().unwrap_or_default();
    let children: Vec<&str> = segments.collect();

    if children.is_empty() {
        key.to_string()
    } else {
        format!("{parent}[{}]", children.join("]["))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_path_nested() {
        assert_eq!(key_path("a[b][c]"), vec!["a", "b", "c"]);
        assert_eq!(key_path("list[]"), vec!["list", ""]);
        assert_eq!(key_path("plain"), vec!["plain"]);
    }

    #[test]
    fn test_key_path_malformed_is_literal() {
        assert_eq!(key_path("a[b"), vec!["a[b"]);
        assert_eq!(key_path("[b]"), vec!["[b]"]);
        assert_eq!(key_path("a[b]c"), vec!["a[b]c"]);
    }

    #[test]
    fn test_key_path_stops_at_max_depth() {
        assert_eq!(
            key_path("a[b][c][d][e][f][g]"),
            vec!["a", "b", "c", "d", "e", "f", "[g]"]
        );
        assert_eq!(
            key_path("a[1][2][3][4][5][6][7]"),
            vec!["a", "1", "2", "3", "4", "5", "[6][7]"]
        );
        assert_eq!(key_path("a[1][2][3][4][5]").len(), MAX_DEPTH + 1);
    }

    #[test]
    fn test_parse_query_deep_key_is_bounded() {
        let key = format!("a{}", "[b]".repeat(200_000));
        let parsed = parse_query(&format!("{key}=1"));

        let mut node = &parsed["a"];
        for _ in 1..MAX_DEPTH {
            node = &node["b"];
        }
        let remainder = node["b"].as_object().unwrap();
        assert_eq!(remainder.len(), 1);
        let (literal, leaf) = remainder.iter().next().unwrap();
        assert_eq!(literal.len(), 3 * (200_000 - MAX_DEPTH));
        assert_eq!(leaf, "1");
    }

    #[test]
    fn test_parse_query_parameter_limit() {
        let raw = (0..1500)
            .map(|i| format!("k{i}=v"))
            .collect::<Vec<_>>()
            .join("&");
        let parsed = parse_query(&raw);
        let map = parsed.as_object().unwrap();
        assert_eq!(map.len(), MAX_PARAMETERS);
        assert!(map.contains_key("k999"));
        assert!(!map.contains_key("k1000"));
    }

    #[test]
    fn test_bracket_key() {
        assert_eq!(bracket_key("a"), "a");
        assert_eq!(bracket_key("a.b"), "a[b]");
        assert_eq!(bracket_key("a.b.c"), "a[b][c]");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("hello+world"), "hello world");
        assert_eq!(decode_component("a%26b"), "a&b");
        // invalid UTF-8 after decoding falls back to the raw text
        assert_eq!(decode_component("%FF"), "%FF");
    }

    #[test]
    fn test_parse_query_nested_and_arrays() {
        let parsed = parse_query("x=1&a[b]=2&a[c][d]=3&tag[]=one&tag[]=two&dup=1&dup=2&flag");
        assert_eq!(
            parsed,
            json!({
                "x": "1",
                "a": {"b": "2", "c": {"d": "3"}},
                "tag": ["one", "two"],
                "dup": ["1", "2"],
                "flag": ""
            })
        );
    }

    #[test]
    fn test_parse_query_single_bracket_append_is_array() {
        assert_eq!(parse_query("tag[]=only"), json!({"tag": ["only"]}));
    }

    #[test]
    fn test_parse_query_nested_overrides_scalar() {
        let parsed = parse_query("a=1&a[b]=2");
        assert_eq!(parsed, json!({"a": {"b": "2"}}));
    }
}
