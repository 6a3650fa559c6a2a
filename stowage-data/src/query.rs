//! SQL fragment helpers: dialects, identifier checks, caller predicates and
//! named-parameter compilation.
//!
//! Statements are assembled with `format!`. Structure (table and column
//! lists) only ever comes from validated identifiers; caller-supplied
//! predicates are checked by [`split_predicate`], their condition wrapped in
//! parentheses; values only travel through named parameters.
//!
//! # Example
//!
//! ```ignore
//! let params = params! { "name" => "GuardiaN" };
//! let (sql, values) = compile_named(
//!     r#"SELECT "id" FROM "rosters" WHERE "name" = :name"#,
//!     &params,
//!     Dialect::Postgres,
//! )?;
//! assert_eq!(sql, r#"SELECT "id" FROM "rosters" WHERE "name" = $1"#);
//! ```

use crate::value::{Params, SqlValue};

/// SQL dialect of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// SQLite-style `?` placeholders. No row-level locking clause.
    Sqlite,
    /// Postgres-style `$1, $2, ...` placeholders and `FOR UPDATE` locking.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => "?".to_string(),
        }
    }

    /// Suffix appended to row-returning selects executed inside a transaction.
    pub fn row_lock_clause(self) -> &'static str {
        match self {
            Dialect::Postgres => " FOR UPDATE",
            Dialect::Sqlite => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
    InvalidPredicate { predicate: String, reason: &'static str },
    MissingParameter(String),
    PageOutOfRange { page: i64, limit: i64 },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
            QueryError::InvalidPredicate { predicate, reason } => {
                write!(f, "Invalid predicate `{predicate}`: {reason}")
            }
            QueryError::MissingParameter(name) => {
                write!(f, "No value bound for named parameter :{name}")
            }
            QueryError::PageOutOfRange { page, limit } => {
                write!(f, "Offset of page {page} with limit {limit} is out of range")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Quote a single identifier after checking it is a plain SQL name.
pub fn quote_identifier(ident: &str, kind: &'static str) -> Result<String, QueryError> {
    if !is_valid_identifier(ident) {
        return Err(QueryError::InvalidIdentifier {
            kind,
            ident: ident.to_string(),
        });
    }
    Ok(format!("\"{ident}\""))
}

/// Letters, digits and underscores, not starting with a digit.
pub fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check that a caller-supplied WHERE predicate is a self-contained
/// expression.
///
/// Once wrapped in parentheses, an accepted predicate cannot close the
/// surrounding statement, start a new one, or comment out the rest of it.
/// Quoted text (`'...'` literals and `"..."` identifiers) is skipped.
pub fn validate_predicate(predicate: &str) -> Result<(), QueryError> {
    let reject = |reason| {
        Err(QueryError::InvalidPredicate {
            predicate: predicate.to_string(),
            reason,
        })
    };

    if predicate.trim().is_empty() {
        return reject("predicate is empty");
    }

    let bytes = predicate.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b';' => return reject("statement separators are not allowed"),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                return reject("comments are not allowed")
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                return reject("comments are not allowed")
            }
            b'(' => depth += 1,
            b')' => {
                if depth == 0 {
                    return reject("unbalanced parentheses");
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }

    if quote.is_some() {
        return reject("unterminated quote");
    }
    if depth != 0 {
        return reject("unbalanced parentheses");
    }
    Ok(())
}

// Top-level words that start the ordering/paging tail of a predicate.
const TAIL_KEYWORDS: [&str; 3] = ["ORDER", "LIMIT", "OFFSET"];

// Top-level words that may not appear in the tail.
const TAIL_FORBIDDEN: [&str; 6] = ["UNION", "INTERSECT", "EXCEPT", "FOR", "RETURNING", "WHERE"];

/// Split a predicate into its condition and its `ORDER BY` / `LIMIT` /
/// `OFFSET` tail.
///
/// The tail starts at the first of those keywords found outside quotes and
/// parentheses. The condition is wrapped in parentheses by the caller; the
/// tail is appended after it. The tail is empty when there is none.
///
/// ```ignore
/// let (condition, tail) = split_predicate(r#""role" = :role ORDER BY "name" LIMIT 5"#)?;
/// assert_eq!(condition, r#""role" = :role"#);
/// assert_eq!(tail, r#"ORDER BY "name" LIMIT 5"#);
/// ```
pub fn split_predicate(predicate: &str) -> Result<(&str, &str), QueryError> {
    validate_predicate(predicate)?;
    let reject = |reason| QueryError::InvalidPredicate {
        predicate: predicate.to_string(),
        reason,
    };

    let words = top_level_words(predicate);
    let Some(split) = words
        .iter()
        .position(|(_, word)| TAIL_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k)))
    else {
        return Ok((predicate.trim(), ""));
    };

    if words[split..]
        .iter()
        .any(|(_, word)| TAIL_FORBIDDEN.iter().any(|k| word.eq_ignore_ascii_case(k)))
    {
        return Err(reject("only ordering and paging are allowed after ORDER BY, LIMIT or OFFSET"));
    }

    let at = words[split].0;
    let condition = predicate[..at].trim();
    if condition.is_empty() {
        return Err(reject("predicate has no condition"));
    }
    Ok((condition, predicate[at..].trim()))
}

/// Bare words outside quotes and parentheses, with their byte offsets.
/// `:name` parameters and numbers are skipped.
fn top_level_words(sql: &str) -> Vec<(usize, &str)> {
    let bytes = sql.as_bytes();
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ if is_name_char(b) => {
                let start = i;
                while i < bytes.len() && is_name_char(bytes[i]) {
                    i += 1;
                }
                let is_param = start > 0 && bytes[start - 1] == b':';
                if depth == 0 && !is_param && is_name_start(b) {
                    words.push((start, &sql[start..i]));
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    words
}

/// Rewrite `:name` placeholders into the dialect's positional syntax.
///
/// Returns the rewritten SQL and the values in binding order. A name used
/// twice is bound twice. `::` casts and quoted text are left untouched.
/// Parameters that the statement does not reference are ignored.
pub fn compile_named(
    sql: &str,
    params: &Params,
    dialect: Dialect,
) -> Result<(String, Vec<SqlValue>), QueryError> {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => {
                quote = Some(b);
                i += 1;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' if bytes.get(i + 1).is_some_and(|c| is_name_start(*c)) => {
                let name_start = i + 1;
                let mut end = name_start + 1;
                while end < bytes.len() && is_name_char(bytes[end]) {
                    end += 1;
                }
                let name = &sql[name_start..end];
                let value = params
                    .get(name)
                    .ok_or_else(|| QueryError::MissingParameter(name.to_string()))?;
                values.push(value.clone());
                out.push_str(&sql[start..i]);
                out.push_str(&dialect.placeholder(values.len()));
                start = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    out.push_str(&sql[start..]);
    Ok((out, values))
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
