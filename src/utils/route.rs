//! Route template translation and matching.
//!
//! Route templates are declared with curly-brace placeholders (`/users/{id}`)
//! and translated into colon placeholders (`/users/:id`), which is the syntax
//! [`RoutePattern`] matches against.

use indexmap::IndexMap;

/// Translates a curly-brace route template into colon placeholder syntax.
///
/// Every `{` becomes `:` and every `}` is dropped. Braces are not checked for
/// balance, so `/a/{id` still yields `/a/:id`.
#[must_use]
pub fn to_route_pattern(template: &str) -> String {
    template.replace('{', ":").replace('}', "")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled colon-syntax route pattern such as `/ping/:id`.
///
/// Literal segments compare ASCII case-insensitively, a `:name` segment
/// captures exactly one non-empty path segment, and a single trailing slash
/// on the request path is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| {
                segment.strip_prefix(':').map_or_else(
                    || Segment::Literal(segment.to_string()),
                    |name| Segment::Param(name.to_string()),
                )
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    /// Builds a pattern straight from a curly-brace template.
    #[must_use]
    pub fn from_template(template: &str) -> Self {
        Self::new(&to_route_pattern(template))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches a request path (without query string) and returns the captured
    /// parameters, or `None` when the path does not match.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<IndexMap<String, String>> {
        let trimmed = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
        let parts: Vec<&str> = split_path(trimmed).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = IndexMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal.eq_ignore_ascii_case(part) => {}
                Segment::Param(name) if !part.is_empty() => {
                    let value = urlencoding::decode(part)
                        .map_or_else(|_| part.to_string(), std::borrow::Cow::into_owned);
                    params.insert(name.clone(), value);
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

// `/a/b` -> ["a", "b"]; the root path yields a single empty segment.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_route_pattern_replaces_all_placeholders() {
        assert_eq!(
            to_route_pattern("/users/{id}/posts/{postId}"),
            "/users/:id/posts/:postId"
        );
    }

    #[test]
    fn test_to_route_pattern_without_braces_is_unchanged() {
        assert_eq!(to_route_pattern("/health/check"), "/health/check");
    }

    #[test]
    fn test_to_route_pattern_is_idempotent() {
        let once = to_route_pattern("/ping/{id}");
        assert_eq!(to_route_pattern(&once), once);
    }

    #[test]
    fn test_to_route_pattern_unbalanced_braces() {
        assert_eq!(to_route_pattern("/a/{id"), "/a/:id");
        assert_eq!(to_route_pattern("/a/id}"), "/a/id");
    }

    #[test]
    fn test_pattern_captures_params() {
        let pattern = RoutePattern::from_template("/ping/{id}");
        let params = pattern.matches("/ping/5").unwrap_or_default();
        assert_eq!(params.get("id").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_pattern_rejects_other_paths() {
        let pattern = RoutePattern::new("/ping/:id");
        assert!(pattern.matches("/ping").is_none());
        assert!(pattern.matches("/ping/5/extra").is_none());
        assert!(pattern.matches("/pong/5").is_none());
        assert!(pattern.matches("/ping/").is_none());
    }

    #[test]
    fn test_pattern_case_insensitive_and_trailing_slash() {
        let pattern = RoutePattern::new("/Users/:id");
        assert!(pattern.matches("/users/7/").is_some());
    }

    #[test]
    fn test_root_pattern() {
        let pattern = RoutePattern::new("/");
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/x").is_none());
    }

    #[test]
    fn test_param_is_percent_decoded() {
        let pattern = RoutePattern::new("/files/:name");
        let params = pattern.matches("/files/a%20b").unwrap_or_default();
        assert_eq!(params.get("name").map(String::as_str), Some("a b"));
    }
}
