//! Column-name normalization and identifier validation.
//!
//! Every name that ends up in generated SQL passes through this module:
//!
//! - column labels from the input file are rewritten by [`normalize_column_names`] into
//!   lowercase snake_case names matching `[a-z0-9]+(_[a-z0-9]+)*` (or the fallback `col`);
//! - user-supplied schema and table names are checked by [`validate_identifier`] against
//!   `^[A-Za-z_][A-Za-z0-9_]*$` before anything touches the disk or the database;
//! - [`quote_identifier`] double-quotes identifiers when they are interpolated into DDL.

use std::collections::HashSet;
use std::fmt;

use crate::error::{IngestError, IngestResult};

/// Name used when a label contains no ASCII letters or digits at all.
pub const FALLBACK_COLUMN_NAME: &str = "col";

/// What a validated identifier is used for. Appears in validation error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRole {
    /// Destination schema.
    Schema,
    /// Destination table.
    Table,
}

impl fmt::Display for IdentifierRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => f.write_str("schema"),
            Self::Table => f.write_str("table"),
        }
    }
}

/// How to handle distinct labels that normalize to the same column name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateColumns {
    /// Keep duplicates as-is and let the database decide.
    #[default]
    Allow,
    /// Rename later occurrences to `name_2`, `name_3`, ...
    Suffix,
    /// Fail with [`IngestError::DuplicateColumn`].
    Error,
}

/// Normalize a single column label.
///
/// ```
/// use tabular_ingest::naming::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Revenue (USD)!! "), "revenue_usd");
/// assert_eq!(normalize_column_name("###"), "col");
/// ```
pub fn normalize_column_name(label: &str) -> String {
    let lowered = label.trim().to_lowercase();

    // Every maximal run of characters outside [a-z0-9] becomes one underscore.
    let mut replaced = String::with_capacity(lowered.len());
    let mut in_run = false;
    for ch in lowered.chars() {
        if is_canonical_char(ch) {
            replaced.push(ch);
            in_run = false;
        } else if !in_run {
            replaced.push('_');
            in_run = true;
        }
    }

    let collapsed = collapse_underscores(&replaced);
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_COLUMN_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Normalize an ordered sequence of column labels.
///
/// The output has the same length and order as the input. Distinct labels may produce the same
/// name; see [`resolve_duplicates`] for policies that deal with that.
pub fn normalize_column_names<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| normalize_column_name(label.as_ref()))
        .collect()
}

/// Check that `name` is a bareword identifier (`^[A-Za-z_][A-Za-z0-9_]*$`).
pub fn validate_identifier(name: &str, role: IdentifierRole) -> IngestResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => is_ident_start(first) && chars.all(is_ident_continue),
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(IngestError::Validation {
            role,
            value: name.to_owned(),
        })
    }
}

/// Wrap an identifier in double quotes for use in SQL, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Apply a [`DuplicateColumns`] policy to a list of normalized names.
pub fn resolve_duplicates(names: Vec<String>, policy: DuplicateColumns) -> IngestResult<Vec<String>> {
    match policy {
        DuplicateColumns::Allow => Ok(names),
        DuplicateColumns::Error => {
            let mut seen = HashSet::with_capacity(names.len());
            for name in &names {
                if !seen.insert(name.as_str()) {
                    return Err(IngestError::DuplicateColumn { name: name.clone() });
                }
            }
            Ok(names)
        }
        DuplicateColumns::Suffix => {
            // Suffixed names must not steal a name that appears later in the input.
            let reserved: HashSet<&str> = names.iter().map(String::as_str).collect();
            let mut used: HashSet<String> = HashSet::with_capacity(names.len());
            let mut out = Vec::with_capacity(names.len());

            for name in &names {
                let chosen = if used.contains(name) {
                    (2..)
                        .map(|n| format!("{name}_{n}"))
                        .find(|candidate| {
                            !used.contains(candidate) && !reserved.contains(candidate.as_str())
                        })
                        .unwrap_or_else(|| name.clone())
                } else {
                    name.clone()
                };
                used.insert(chosen.clone());
                out.push(chosen);
            }
            Ok(out)
        }
    }
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_underscore = false;
    for ch in s.chars() {
        if ch == '_' {
            if !prev_underscore {
                out.push(ch);
            }
            prev_underscore = true;
        } else {
            out.push(ch);
            prev_underscore = false;
        }
    }
    out
}

fn is_canonical_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit()
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_and_whitespace() {
        assert_eq!(normalize_column_name("  Revenue (USD)!! "), "revenue_usd");
        assert_eq!(normalize_column_name("Customer ID"), "customer_id");
        assert_eq!(normalize_column_name("Total $"), "total");
        assert_eq!(normalize_column_name("a__b---c"), "a_b_c");
    }

    #[test]
    fn keeps_canonical_names_unchanged() {
        assert_eq!(normalize_column_name("already_ok"), "already_ok");
        assert_eq!(normalize_column_name("col2"), "col2");
    }

    #[test]
    fn falls_back_when_nothing_alphanumeric_remains() {
        assert_eq!(normalize_column_name("###"), "col");
        assert_eq!(normalize_column_name(""), "col");
        assert_eq!(normalize_column_name("   "), "col");
        assert_eq!(normalize_column_name("___"), "col");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(normalize_column_name("Préférence Client"), "pr_f_rence_client");
        assert_eq!(normalize_column_name("日付"), "col");
    }

    #[test]
    fn leading_digits_are_kept() {
        assert_eq!(normalize_column_name("2024 Sales"), "2024_sales");
    }

    #[test]
    fn normalizes_sequences_in_order_with_duplicates() {
        let out = normalize_column_names(["Customer ID", "Total $", "Total $"]);
        assert_eq!(out, vec!["customer_id", "total", "total"]);
    }

    #[test]
    fn validate_identifier_accepts_barewords() {
        validate_identifier("valid_name1", IdentifierRole::Table).unwrap();
        validate_identifier("_private", IdentifierRole::Schema).unwrap();
        validate_identifier("RAW", IdentifierRole::Schema).unwrap();
    }

    #[test]
    fn validate_identifier_rejects_leading_digit() {
        let err = validate_identifier("1table", IdentifierRole::Table).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Validation {
                role: IdentifierRole::Table,
                ..
            }
        ));
        let msg = err.to_string();
        assert!(msg.contains("invalid table name"));
        assert!(msg.contains("\"1table\""));
        assert!(msg.contains("not starting with a digit"));
    }

    #[test]
    fn validate_identifier_rejects_punctuation_and_empty() {
        let err = validate_identifier("bad-name", IdentifierRole::Schema).unwrap_err();
        assert!(err.to_string().contains("invalid schema name"));

        assert!(validate_identifier("", IdentifierRole::Schema).is_err());
        assert!(validate_identifier("a b", IdentifierRole::Table).is_err());
        assert!(validate_identifier("x;drop", IdentifierRole::Table).is_err());
        assert!(validate_identifier("tábla", IdentifierRole::Table).is_err());
    }

    #[test]
    fn quote_identifier_doubles_quotes() {
        assert_eq!(quote_identifier("raw"), "\"raw\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn duplicates_allowed_by_default() {
        let names = vec!["total".to_string(), "total".to_string()];
        let out = resolve_duplicates(names.clone(), DuplicateColumns::default()).unwrap();
        assert_eq!(out, names);
    }

    #[test]
    fn duplicates_rejected_under_error_policy() {
        let names = vec!["id".to_string(), "total".to_string(), "total".to_string()];
        let err = resolve_duplicates(names, DuplicateColumns::Error).unwrap_err();
        assert!(matches!(err, IngestError::DuplicateColumn { ref name } if name == "total"));
    }

    #[test]
    fn duplicates_suffixed_without_clobbering_existing_names() {
        let names: Vec<String> = ["total", "total", "total_2", "total"]
            .into_iter()
            .map(String::from)
            .collect();
        let out = resolve_duplicates(names, DuplicateColumns::Suffix).unwrap();
        assert_eq!(out, vec!["total", "total_3", "total_2", "total_4"]);
    }
}
