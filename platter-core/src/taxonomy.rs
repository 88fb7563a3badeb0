//! Taxonomy term kinds and name normalization.
//!
//! Terms are looked up by exact name after trimming, so "Dinner" and
//! " Dinner " resolve to the same row while "dinner" does not.

use serde::{Deserialize, Serialize};

use crate::error::TermNameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    Region,
    Session,
    Category,
    Type,
}

impl TermKind {
    /// Field name in recipe payloads and error maps.
    pub fn field(self) -> &'static str {
        match self {
            TermKind::Region => "region",
            TermKind::Session => "session",
            TermKind::Category => "category",
            TermKind::Type => "type",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TermKind::Region => "Region",
            TermKind::Session => "Session",
            TermKind::Category => "Category",
            TermKind::Type => "Type",
        }
    }

    /// Column width of the name in the lookup table.
    pub fn max_name_len(self) -> usize {
        match self {
            TermKind::Region | TermKind::Category => 100,
            TermKind::Session | TermKind::Type => 50,
        }
    }
}

pub fn normalize_name(kind: TermKind, raw: &str) -> Result<String, TermNameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TermNameError::Empty(kind.label()));
    }
    if name.chars().count() > kind.max_name_len() {
        return Err(TermNameError::TooLong {
            kind: kind.label(),
            max: kind.max_name_len(),
        });
    }
    Ok(name.to_string())
}

/// Trim every name and drop repeats, keeping first-seen order.
pub fn normalize_names<S: AsRef<str>>(
    kind: TermKind,
    raw: &[S],
) -> Result<Vec<String>, TermNameError> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = normalize_name(kind, name.as_ref())?;
        if !out.contains(&name) {
            out.push(name);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_dedupes_in_order() {
        let names = normalize_names(TermKind::Session, &["Lunch", " Dinner", "Lunch ", "Dinner"])
            .unwrap();
        assert_eq!(names, vec!["Lunch", "Dinner"]);
    }

    #[test]
    fn test_case_is_significant() {
        let names = normalize_names(TermKind::Type, &["Vegan", "vegan"]).unwrap();
        assert_eq!(names, vec!["Vegan", "vegan"]);
    }

    #[test]
    fn test_blank_rejected() {
        assert_eq!(
            normalize_names(TermKind::Category, &["Salad", "   "]),
            Err(TermNameError::Empty("Category"))
        );
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "x".repeat(51);
        assert_eq!(
            normalize_name(TermKind::Session, &long),
            Err(TermNameError::TooLong {
                kind: "Session",
                max: 50
            })
        );
        assert!(normalize_name(TermKind::Region, &long).is_ok());
    }

    #[test]
    fn test_empty_list_is_empty() {
        let none: [&str; 0] = [];
        assert!(normalize_names(TermKind::Region, &none).unwrap().is_empty());
    }
}
