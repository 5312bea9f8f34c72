//! Dialect-aware identifier escaping.
//!
//! Table and column references are quoted per dialect, with support for
//! dotted paths (`schema.table.column`), `*` projections, and alias
//! forms (`users u`, `users AS u`). Anything that does not look like a
//! plain identifier path (function calls, arithmetic, pre-quoted names)
//! is passed through verbatim; the caller keeps control of such fragments.

use crate::dialect::Dialect;

/// Quote an identifier reference for the given dialect.
pub(crate) fn quote_identifier(dialect: Dialect, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return trimmed.to_string();
    }
    if dialect.quote_pair().is_none() {
        return trimmed.to_string();
    }

    // Alias forms: "path alias" or "path AS alias".
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    match tokens.as_slice() {
        [path] => quote_path(dialect, path),
        [path, alias] => format!(
            "{} {}",
            quote_path(dialect, path),
            quote_segment(dialect, alias)
        ),
        [path, kw, alias] if kw.eq_ignore_ascii_case("as") => format!(
            "{} AS {}",
            quote_path(dialect, path),
            quote_segment(dialect, alias)
        ),
        // More than an identifier: leave the expression alone.
        _ => trimmed.to_string(),
    }
}

/// Quote a dotted path, one segment at a time.
fn quote_path(dialect: Dialect, path: &str) -> String {
    if !is_plain_path(path) {
        return path.to_string();
    }
    let mut out = String::with_capacity(path.len() + 4);
    for (i, segment) in path.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if segment == "*" {
            out.push('*');
        } else {
            out.push_str(&quote_segment(dialect, segment));
        }
    }
    out
}

fn quote_segment(dialect: Dialect, segment: &str) -> String {
    match dialect.quote_pair() {
        Some((open, close)) if is_plain_segment(segment) => {
            let mut out = String::with_capacity(segment.len() + 2);
            out.push(open);
            out.push_str(segment);
            out.push(close);
            out
        }
        _ => segment.to_string(),
    }
}

/// A path is quotable when every segment is a plain identifier
/// (a trailing `.*` is allowed).
fn is_plain_path(path: &str) -> bool {
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        if segment == "*" && last {
            continue;
        }
        if !is_plain_segment(segment) {
            return false;
        }
    }
    true
}

fn is_plain_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_leaves_identifiers_bare() {
        assert_eq!(quote_identifier(Dialect::Generic, "users"), "users");
        assert_eq!(quote_identifier(Dialect::Generic, "u.id"), "u.id");
    }

    #[test]
    fn mysql_backticks() {
        assert_eq!(quote_identifier(Dialect::MySql, "users"), "`users`");
        assert_eq!(quote_identifier(Dialect::MySql, "db.users"), "`db`.`users`");
    }

    #[test]
    fn postgres_double_quotes() {
        assert_eq!(quote_identifier(Dialect::Postgres, "users"), "\"users\"");
        assert_eq!(
            quote_identifier(Dialect::Postgres, "public.users"),
            "\"public\".\"users\""
        );
    }

    #[test]
    fn sqlserver_brackets() {
        assert_eq!(quote_identifier(Dialect::SqlServer, "users"), "[users]");
    }

    #[test]
    fn star_passthrough() {
        assert_eq!(quote_identifier(Dialect::Postgres, "*"), "*");
        assert_eq!(quote_identifier(Dialect::Postgres, "u.*"), "\"u\".*");
    }

    #[test]
    fn alias_forms() {
        assert_eq!(
            quote_identifier(Dialect::MySql, "users u"),
            "`users` `u`"
        );
        assert_eq!(
            quote_identifier(Dialect::MySql, "users AS u"),
            "`users` AS `u`"
        );
    }

    #[test]
    fn expressions_pass_through() {
        assert_eq!(
            quote_identifier(Dialect::Postgres, "COUNT(id)"),
            "COUNT(id)"
        );
        assert_eq!(
            quote_identifier(Dialect::MySql, "price * qty"),
            "price * qty"
        );
        assert_eq!(
            quote_identifier(Dialect::Postgres, "\"Prequoted\""),
            "\"Prequoted\""
        );
    }
}
