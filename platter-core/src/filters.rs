//! Query parameters for recipe listings.
//!
//! Supports:
//! - `region=Indian`: exact region name
//! - `session=Lunch&session=Dinner`: recipe must carry every listed session
//!   (same for `category` and `type`)
//! - `ingredients=chick`: case-insensitive substring of any ingredient name
//! - `search=green "coconut milk"`: every term must appear in the title or
//!   description; quoted phrases stay together
//! - `ordering=-created_at | created_at | -likes | likes`
//! - `limit` / `offset`

use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListParams {
    /// Region name
    pub region: Option<String>,
    /// Session names (repeatable, all must match)
    #[serde(default)]
    pub session: Vec<String>,
    /// Category names (repeatable, all must match)
    #[serde(default)]
    pub category: Vec<String>,
    /// Type names (repeatable, all must match)
    #[serde(default, rename = "type")]
    pub kind: Vec<String>,
    /// Case-insensitive ingredient substring
    pub ingredients: Option<String>,
    /// Free text matched against title and description
    pub search: Option<String>,
    /// created_at, -created_at, likes, -likes (default: -created_at)
    pub ordering: Option<String>,
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    CreatedAsc,
    #[default]
    CreatedDesc,
    LikesAsc,
    LikesDesc,
}

impl Ordering {
    /// Unknown values fall back to the default, like an ordering filter
    /// that ignores fields it does not know.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "created_at" => Ordering::CreatedAsc,
            "-created_at" => Ordering::CreatedDesc,
            "likes" | "total_likes" | "likes__count" => Ordering::LikesAsc,
            "-likes" | "-total_likes" | "-likes__count" => Ordering::LikesDesc,
            _ => Ordering::default(),
        }
    }
}

/// Normalized listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub region: Option<String>,
    pub sessions: Vec<String>,
    pub categories: Vec<String>,
    pub types: Vec<String>,
    pub ingredient: Option<String>,
    pub search_terms: Vec<String>,
    pub ordering: Ordering,
    pub limit: i64,
    pub offset: i64,
}

impl From<ListParams> for RecipeFilter {
    fn from(params: ListParams) -> Self {
        Self {
            region: non_blank(params.region),
            sessions: clean_names(params.session),
            categories: clean_names(params.category),
            types: clean_names(params.kind),
            ingredient: non_blank(params.ingredients),
            search_terms: params.search.as_deref().map(tokenize).unwrap_or_default(),
            ordering: params
                .ordering
                .as_deref()
                .map(Ordering::parse)
                .unwrap_or_default(),
            limit: params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: params.offset.unwrap_or(0).max(0),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_names(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Split on whitespace, keeping double-quoted phrases together.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        tokens.push(last.to_string());
    }

    tokens
}

/// Escape LIKE metacharacters so `needle` matches literally (backslash is
/// Postgres' default escape character). On its own this gives a
/// case-insensitive equality test under `ILIKE`.
pub fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build an `ILIKE` pattern matching `needle` anywhere.
pub fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let filter = RecipeFilter::from(ListParams::default());
        assert_eq!(filter.ordering, Ordering::CreatedDesc);
        assert_eq!(filter.limit, DEFAULT_LIMIT);
        assert_eq!(filter.offset, 0);
        assert!(filter.search_terms.is_empty());
        assert!(filter.region.is_none());
    }

    #[test]
    fn test_ordering_values() {
        assert_eq!(Ordering::parse("created_at"), Ordering::CreatedAsc);
        assert_eq!(Ordering::parse("-likes"), Ordering::LikesDesc);
        assert_eq!(Ordering::parse("likes__count"), Ordering::LikesAsc);
        assert_eq!(Ordering::parse("title; drop table"), Ordering::CreatedDesc);
    }

    #[test]
    fn test_limit_clamped() {
        let filter = RecipeFilter::from(ListParams {
            limit: Some(5000),
            offset: Some(-3),
            ..Default::default()
        });
        assert_eq!(filter.limit, MAX_LIMIT);
        assert_eq!(filter.offset, 0);

        let filter = RecipeFilter::from(ListParams {
            limit: Some(0),
            ..Default::default()
        });
        assert_eq!(filter.limit, 1);
    }

    #[test]
    fn test_names_cleaned() {
        let filter = RecipeFilter::from(ListParams {
            region: Some("  ".into()),
            session: vec!["Lunch".into(), " Lunch".into(), "".into(), "Dinner".into()],
            ..Default::default()
        });
        assert!(filter.region.is_none());
        assert_eq!(filter.sessions, vec!["Lunch", "Dinner"]);
    }

    #[test]
    fn test_search_tokenized() {
        let filter = RecipeFilter::from(ListParams {
            search: Some("spicy  \"coconut milk\" curry".into()),
            ..Default::default()
        });
        assert_eq!(filter.search_terms, vec!["spicy", "coconut milk", "curry"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(tokenize("\"green beans "), vec!["green beans"]);
    }

    #[test]
    fn test_contains_pattern_escapes() {
        assert_eq!(contains_pattern("chick"), "%chick%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_escape_like_is_exact() {
        assert_eq!(escape_like("chef_anna"), "chef\\_anna");
        assert_eq!(escape_like("plain"), "plain");
    }
}
