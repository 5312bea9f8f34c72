//! Predicate trees for WHERE and HAVING clauses.
//!
//! Conditions accumulate as an ordered list of `(connector, condition)`
//! entries on a [`Predicate`]; the connector of the first entry is
//! ignored on render, so `a.or(..)` chains read left to right exactly as
//! written. Nested groups are themselves predicates and render inside
//! parentheses, which is what gives `A AND (B OR C)` its binding.

use crate::builder::QueryBuilder;
use crate::error::BuildResult;
use crate::ident::quote_identifier;
use crate::render::RenderCtx;
use crate::value::Value;

/// How consecutive conditions are chained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Connector {
    And,
    Or,
}

impl Connector {
    fn as_sql(self) -> &'static str {
        match self {
            Connector::And => " AND ",
            Connector::Or => " OR ",
        }
    }
}

/// Wildcard placement for LIKE patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchSide {
    /// `%pattern`
    Before,
    /// `pattern%`
    After,
    /// `%pattern%`
    #[default]
    Both,
    /// `pattern` with no wildcards added.
    Exact,
}

impl MatchSide {
    pub(crate) fn apply(self, pattern: &str) -> String {
        match self {
            MatchSide::Before => format!("%{pattern}"),
            MatchSide::After => format!("{pattern}%"),
            MatchSide::Both => format!("%{pattern}%"),
            MatchSide::Exact => pattern.to_string(),
        }
    }
}

/// One leaf or nested group in a predicate tree.
#[derive(Clone, Debug)]
pub(crate) enum Cond {
    /// `column <op> ?`; NULL values render as `IS [NOT] NULL`.
    Cmp {
        column: String,
        op: String,
        value: Value,
        escape: bool,
    },
    /// `column [NOT] IN (?, ...)`
    InList {
        column: String,
        values: Vec<Value>,
        negated: bool,
        escape: bool,
    },
    /// `column [NOT] IN (<subquery>)`, parameters spliced in place.
    InQuery {
        column: String,
        query: Box<QueryBuilder>,
        negated: bool,
        escape: bool,
    },
    /// `column [NOT] LIKE ?`; pattern stored with wildcards applied.
    Like {
        column: String,
        pattern: String,
        negated: bool,
        insensitive: bool,
        escape: bool,
    },
    /// Verbatim SQL fragment.
    Raw(String),
    /// Nested group, parenthesized when it holds more than one entry.
    Group(Predicate),
}

/// An ordered, AND/OR-chained condition list.
///
/// Used standalone to build nested groups for
/// [`where_group`](crate::QueryBuilder::where_group) and friends; the
/// first entry's connector is ignored, so `and`/`or` are interchangeable
/// for the opening condition.
#[derive(Clone, Debug, Default)]
pub struct Predicate {
    entries: Vec<(Connector, Cond)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, connector: Connector, cond: Cond) {
        self.entries.push((connector, cond));
    }

    /// Add `key = value` (or the operator embedded in `key`), AND-chained.
    pub fn and(mut self, key: &str, value: impl Into<Value>) -> Self {
        let (column, op) = split_key(key);
        self.push(
            Connector::And,
            Cond::Cmp {
                column,
                op,
                value: value.into(),
                escape: true,
            },
        );
        self
    }

    /// Add `key = value` (or the operator embedded in `key`), OR-chained.
    pub fn or(mut self, key: &str, value: impl Into<Value>) -> Self {
        let (column, op) = split_key(key);
        self.push(
            Connector::Or,
            Cond::Cmp {
                column,
                op,
                value: value.into(),
                escape: true,
            },
        );
        self
    }

    /// Add a verbatim SQL fragment, AND-chained.
    pub fn and_raw(mut self, sql: impl Into<String>) -> Self {
        self.push(Connector::And, Cond::Raw(sql.into()));
        self
    }

    /// Add a verbatim SQL fragment, OR-chained.
    pub fn or_raw(mut self, sql: impl Into<String>) -> Self {
        self.push(Connector::Or, Cond::Raw(sql.into()));
        self
    }

    /// Add `column IN (values...)`, AND-chained.
    pub fn and_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connector::And, in_list(column, values, false));
        self
    }

    /// Add `column IN (values...)`, OR-chained.
    pub fn or_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connector::Or, in_list(column, values, false));
        self
    }

    /// Add `column NOT IN (values...)`, AND-chained.
    pub fn and_not_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connector::And, in_list(column, values, true));
        self
    }

    /// Add `column NOT IN (values...)`, OR-chained.
    pub fn or_not_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connector::Or, in_list(column, values, true));
        self
    }

    /// Add `column LIKE pattern`, AND-chained.
    pub fn and_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.push(Connector::And, like(column, pattern, side, false, insensitive));
        self
    }

    /// Add `column LIKE pattern`, OR-chained.
    pub fn or_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.push(Connector::Or, like(column, pattern, side, false, insensitive));
        self
    }

    /// Add `column NOT LIKE pattern`, AND-chained.
    pub fn and_not_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.push(Connector::And, like(column, pattern, side, true, insensitive));
        self
    }

    /// Add `column NOT LIKE pattern`, OR-chained.
    pub fn or_not_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.push(Connector::Or, like(column, pattern, side, true, insensitive));
        self
    }

    /// Nest another predicate, AND-chained.
    pub fn and_group(mut self, group: Predicate) -> Self {
        self.push(Connector::And, Cond::Group(group));
        self
    }

    /// Nest another predicate, OR-chained.
    pub fn or_group(mut self, group: Predicate) -> Self {
        self.push(Connector::Or, Cond::Group(group));
        self
    }

    /// Render the predicate in insertion order, depth-first.
    ///
    /// Parameters land in `ctx` in exactly the order their placeholders
    /// appear in the returned SQL.
    pub(crate) fn render(&self, ctx: &mut RenderCtx) -> BuildResult<String> {
        let mut out = String::new();
        for (connector, cond) in &self.entries {
            let frag = cond.render(ctx)?;
            if frag.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push_str(connector.as_sql());
            }
            out.push_str(&frag);
        }
        Ok(out)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Cond {
    fn render(&self, ctx: &mut RenderCtx) -> BuildResult<String> {
        match self {
            Cond::Cmp {
                column,
                op,
                value,
                escape,
            } => {
                let lhs = column_sql(ctx, column, *escape);
                if value.is_null() && matches!(op.as_str(), "=" | "!=" | "<>") {
                    let check = if op == "=" { "IS NULL" } else { "IS NOT NULL" };
                    return Ok(format!("{lhs} {check}"));
                }
                let mut out = format!("{lhs} {op} ");
                ctx.bind(value.clone(), &mut out);
                Ok(out)
            }
            Cond::InList {
                column,
                values,
                negated,
                escape,
            } => {
                // Empty lists degenerate to a constant truth value.
                if values.is_empty() {
                    return Ok(if *negated { "1=1" } else { "1=0" }.to_string());
                }
                let lhs = column_sql(ctx, column, *escape);
                let op = if *negated { "NOT IN" } else { "IN" };
                let mut out = format!("{lhs} {op} (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    ctx.bind(value.clone(), &mut out);
                }
                out.push(')');
                Ok(out)
            }
            Cond::InQuery {
                column,
                query,
                negated,
                escape,
            } => {
                let lhs = column_sql(ctx, column, *escape);
                let op = if *negated { "NOT IN" } else { "IN" };
                let sub = crate::render::render_subquery(query, ctx)?;
                Ok(format!("{lhs} {op} ({sub})"))
            }
            Cond::Like {
                column,
                pattern,
                negated,
                insensitive,
                escape,
            } => {
                let col = column_sql(ctx, column, *escape);
                let native = ctx.dialect.native_ilike();
                let lhs = if *insensitive && !native {
                    format!("LOWER({col})")
                } else {
                    col
                };
                let op = match (*negated, *insensitive && native) {
                    (false, false) => "LIKE",
                    (true, false) => "NOT LIKE",
                    (false, true) => "ILIKE",
                    (true, true) => "NOT ILIKE",
                };
                // Native ILIKE compares case-insensitively on its own, so
                // the caller's pattern is bound untouched there.
                let bound = if *insensitive && !native {
                    pattern.to_lowercase()
                } else {
                    pattern.clone()
                };
                let mut out = format!("{lhs} {op} ");
                ctx.bind(Value::Text(bound), &mut out);
                Ok(out)
            }
            Cond::Raw(sql) => Ok(sql.clone()),
            Cond::Group(group) => {
                let inner = group.render(ctx)?;
                if inner.is_empty() {
                    Ok(String::new())
                } else if group.len() > 1 {
                    Ok(format!("({inner})"))
                } else {
                    Ok(inner)
                }
            }
        }
    }
}

fn column_sql(ctx: &RenderCtx, column: &str, escape: bool) -> String {
    if escape {
        quote_identifier(ctx.dialect, column)
    } else {
        column.trim().to_string()
    }
}

pub(crate) fn in_list<V: Into<Value>>(
    column: &str,
    values: impl IntoIterator<Item = V>,
    negated: bool,
) -> Cond {
    Cond::InList {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated,
        escape: true,
    }
}

pub(crate) fn like(
    column: &str,
    pattern: &str,
    side: MatchSide,
    negated: bool,
    insensitive: bool,
) -> Cond {
    Cond::Like {
        column: column.to_string(),
        pattern: side.apply(pattern),
        negated,
        insensitive,
        escape: true,
    }
}

/// Split a condition key into `(column, operator)`.
///
/// The operator is an optional trailing token of comparison symbols:
/// `"age >="` yields `("age", ">=")`, a bare `"age"` defaults to `"="`.
pub(crate) fn split_key(key: &str) -> (String, String) {
    let trimmed = key.trim();
    let column_end = trimmed
        .trim_end_matches(|c| matches!(c, '<' | '>' | '=' | '!'))
        .len();
    let suffix = &trimmed[column_end..];
    const OPS: [&str; 7] = ["=", "!=", "<>", "<", ">", "<=", ">="];
    if !suffix.is_empty() && OPS.contains(&suffix) {
        (
            trimmed[..column_end].trim_end().to_string(),
            suffix.to_string(),
        )
    } else {
        (trimmed.to_string(), "=".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_key_defaults_to_equals() {
        assert_eq!(split_key("age"), ("age".to_string(), "=".to_string()));
    }

    #[test]
    fn split_key_with_spaced_operator() {
        assert_eq!(split_key("age >="), ("age".to_string(), ">=".to_string()));
        assert_eq!(split_key("name !="), ("name".to_string(), "!=".to_string()));
    }

    #[test]
    fn split_key_without_space() {
        assert_eq!(split_key("age>"), ("age".to_string(), ">".to_string()));
        assert_eq!(split_key("id<>"), ("id".to_string(), "<>".to_string()));
    }

    #[test]
    fn match_side_wildcards() {
        assert_eq!(MatchSide::Before.apply("x"), "%x");
        assert_eq!(MatchSide::After.apply("x"), "x%");
        assert_eq!(MatchSide::Both.apply("x"), "%x%");
        assert_eq!(MatchSide::Exact.apply("x"), "x");
    }
}
