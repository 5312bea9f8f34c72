//! The fluent query-builder facade.
//!
//! One [`QueryBuilder`] owns the full clause state for a query under
//! construction. Every mutating method takes `self` and returns it, so
//! calls chain; nothing escapes the builder until
//! [`compile()`](QueryBuilder::compile) renders the accumulated state.
//!
//! The active query kind is set only by `select*()` / `insert()` /
//! `update()` / `delete()` and read only at compile time. Switching kind
//! keeps shared state (FROM, WHERE) in place; only the active kind's
//! renderer runs.

use crate::dialect::Dialect;
use crate::error::{BuildError, BuildResult};
use crate::expr::{self, Cond, Connector, MatchSide, Predicate};
use crate::render;
use crate::value::Value;

/// The four statement kinds a builder can compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// Aggregate functions for the `select_*` helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Aggregate {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl Aggregate {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
            Aggregate::Avg => "AVG",
            Aggregate::Sum => "SUM",
            Aggregate::Count => "COUNT",
        }
    }

    fn alias_prefix(self) -> &'static str {
        match self {
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Avg => "avg",
            Aggregate::Sum => "sum",
            Aggregate::Count => "count",
        }
    }
}

/// One SELECT-list entry.
#[derive(Clone, Debug)]
pub(crate) struct SelectExpr {
    pub(crate) expr: String,
    pub(crate) alias: Option<String>,
    pub(crate) aggregate: Option<Aggregate>,
    pub(crate) escape: bool,
}

/// A FROM source or GROUP BY term.
#[derive(Clone, Debug)]
pub(crate) struct Source {
    pub(crate) expr: String,
    pub(crate) escape: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct JoinClause {
    pub(crate) table: String,
    pub(crate) condition: String,
    pub(crate) kind: String,
    pub(crate) escape: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Asc,
    Desc,
    Random,
}

#[derive(Clone, Debug)]
pub(crate) struct OrderTerm {
    pub(crate) expr: String,
    pub(crate) direction: Direction,
    pub(crate) escape: bool,
}

/// A column assignment for INSERT VALUES / UPDATE SET.
#[derive(Clone, Debug)]
pub(crate) enum Assignment {
    Value(Value),
    Raw(String),
}

/// The result of compiling a builder: final SQL text plus the bound
/// parameters in placeholder order.
#[derive(Clone, Debug, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Fluent SQL builder for SELECT / INSERT / UPDATE / DELETE statements.
///
/// ```
/// use sqlweave::{Dialect, QueryBuilder};
///
/// let compiled = QueryBuilder::new(Dialect::Generic)
///     .from("users")
///     .and_where("status", "active")
///     .and_where("age >", 18)
///     .order_by("created_at", "DESC")
///     .limit(20)
///     .compile()
///     .unwrap();
///
/// assert_eq!(
///     compiled.sql,
///     "SELECT * FROM users WHERE status = ? AND age > ? ORDER BY created_at DESC LIMIT 20"
/// );
/// assert_eq!(compiled.params.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    pub(crate) dialect: Dialect,
    pub(crate) kind: QueryKind,
    pub(crate) distinct: bool,
    pub(crate) select_exprs: Vec<SelectExpr>,
    pub(crate) from_sources: Vec<Source>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) where_clause: Predicate,
    pub(crate) group_by: Vec<Source>,
    pub(crate) having_clause: Predicate,
    pub(crate) order_by: Vec<OrderTerm>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) assignments: Vec<(String, Assignment)>,
    pub(crate) allow_unsafe: bool,
    pub(crate) deferred: Option<BuildError>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(Dialect::Generic)
    }
}

impl QueryBuilder {
    /// Create a builder targeting the given dialect. The kind starts as
    /// Select; an empty SELECT list compiles as `SELECT *`.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            kind: QueryKind::Select,
            distinct: false,
            select_exprs: Vec::new(),
            from_sources: Vec::new(),
            joins: Vec::new(),
            where_clause: Predicate::new(),
            group_by: Vec::new(),
            having_clause: Predicate::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            assignments: Vec::new(),
            allow_unsafe: false,
            deferred: None,
        }
    }

    /// The dialect this builder compiles for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    // ==================== SELECT list ====================

    /// Append SELECT expressions and make this a SELECT query.
    ///
    /// The argument is split on top-level commas, so `select("id, name")`
    /// appends two entries. Parenthesized expressions are kept whole.
    pub fn select(mut self, exprs: &str) -> Self {
        self.kind = QueryKind::Select;
        for piece in split_list(exprs) {
            self.select_exprs.push(SelectExpr {
                expr: piece,
                alias: None,
                aggregate: None,
                escape: true,
            });
        }
        self
    }

    /// Append a verbatim SELECT fragment with no splitting or quoting.
    pub fn select_unescaped(mut self, expr: &str) -> Self {
        self.kind = QueryKind::Select;
        self.select_exprs.push(SelectExpr {
            expr: expr.trim().to_string(),
            alias: None,
            aggregate: None,
            escape: false,
        });
        self
    }

    /// Append `MAX(expr) AS alias`; an empty alias defaults to `max_<expr>`.
    pub fn select_max(self, expr: &str, alias: &str) -> Self {
        self.select_aggregate(Aggregate::Max, expr, alias)
    }

    /// Append `MIN(expr) AS alias`; an empty alias defaults to `min_<expr>`.
    pub fn select_min(self, expr: &str, alias: &str) -> Self {
        self.select_aggregate(Aggregate::Min, expr, alias)
    }

    /// Append `AVG(expr) AS alias`; an empty alias defaults to `avg_<expr>`.
    pub fn select_avg(self, expr: &str, alias: &str) -> Self {
        self.select_aggregate(Aggregate::Avg, expr, alias)
    }

    /// Append `SUM(expr) AS alias`; an empty alias defaults to `sum_<expr>`.
    pub fn select_sum(self, expr: &str, alias: &str) -> Self {
        self.select_aggregate(Aggregate::Sum, expr, alias)
    }

    /// Append `COUNT(expr) AS alias`; an empty alias defaults to `count_<expr>`.
    pub fn select_count(self, expr: &str, alias: &str) -> Self {
        self.select_aggregate(Aggregate::Count, expr, alias)
    }

    fn select_aggregate(mut self, aggregate: Aggregate, expr: &str, alias: &str) -> Self {
        let expr = expr.trim();
        if expr.is_empty() {
            tracing::warn!(aggregate = aggregate.keyword(), "ignoring aggregate select with empty expression");
            return self;
        }
        self.kind = QueryKind::Select;
        let alias = if alias.trim().is_empty() {
            format!("{}_{}", aggregate.alias_prefix(), expr)
        } else {
            alias.trim().to_string()
        };
        self.select_exprs.push(SelectExpr {
            expr: expr.to_string(),
            alias: Some(alias),
            aggregate: Some(aggregate),
            escape: true,
        });
        self
    }

    /// Toggle `SELECT DISTINCT`.
    pub fn distinct(mut self, on: bool) -> Self {
        self.distinct = on;
        self
    }

    // ==================== FROM / JOIN ====================

    /// Replace the FROM sources. Splits on top-level commas.
    pub fn from(mut self, source: &str) -> Self {
        self.from_sources.clear();
        self.add_from_inner(source);
        self
    }

    /// Append to the FROM sources instead of replacing them.
    pub fn add_from(mut self, source: &str) -> Self {
        self.add_from_inner(source);
        self
    }

    fn add_from_inner(&mut self, source: &str) {
        for piece in split_list(source) {
            self.from_sources.push(Source {
                expr: piece,
                escape: true,
            });
        }
    }

    /// Add a JOIN clause. `kind` is matched case-insensitively against
    /// the standard join types; anything else is emitted verbatim with a
    /// warning so dialect extensions still work.
    ///
    /// The ON `condition` is always emitted verbatim; quoting applies to
    /// the table reference only, so the caller is responsible for the
    /// condition's contents.
    pub fn join(self, table: &str, condition: &str, kind: &str) -> Self {
        self.join_inner(table, condition, kind, true)
    }

    /// Like [`join`](Self::join) but leaves the table reference unquoted.
    pub fn join_unescaped(self, table: &str, condition: &str, kind: &str) -> Self {
        self.join_inner(table, condition, kind, false)
    }

    fn join_inner(mut self, table: &str, condition: &str, kind: &str, escape: bool) -> Self {
        const KNOWN: [&str; 8] = [
            "",
            "INNER",
            "LEFT",
            "RIGHT",
            "LEFT OUTER",
            "RIGHT OUTER",
            "FULL",
            "FULL OUTER",
        ];
        let normalized = kind.trim().to_uppercase();
        let kind = if KNOWN.contains(&normalized.as_str()) {
            normalized
        } else {
            tracing::warn!(join_type = kind, "unrecognized join type emitted verbatim");
            kind.trim().to_string()
        };
        self.joins.push(JoinClause {
            table: table.to_string(),
            condition: condition.trim().to_string(),
            kind,
            escape,
        });
        self
    }

    // ==================== WHERE ====================

    /// Add a WHERE condition, AND-chained. The key may carry a trailing
    /// operator (`"age >="`); a bare key compares with `=`. A NULL value
    /// renders as `IS NULL` / `IS NOT NULL`.
    pub fn and_where(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.where_clause.push(Connector::And, cmp(key, value));
        self
    }

    /// Add a WHERE condition, OR-chained.
    pub fn or_where(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.where_clause.push(Connector::Or, cmp(key, value));
        self
    }

    /// Add several column/value pairs, each AND-joined; the first pair
    /// attaches to the outer tree with AND.
    pub fn and_where_map<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.push_pairs(Connector::And, pairs);
        self
    }

    /// Add several column/value pairs, each AND-joined; the first pair
    /// attaches to the outer tree with OR.
    pub fn or_where_map<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.push_pairs(Connector::Or, pairs);
        self
    }

    fn push_pairs<K, V>(&mut self, connector: Connector, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        push_pairs_into(&mut self.where_clause, connector, pairs);
    }

    /// Add a verbatim WHERE fragment, AND-chained. The caller is
    /// responsible for the fragment's injection safety.
    pub fn where_raw(mut self, sql: &str) -> Self {
        self.where_clause.push(Connector::And, Cond::Raw(sql.to_string()));
        self
    }

    /// Add a verbatim WHERE fragment, OR-chained.
    pub fn or_where_raw(mut self, sql: &str) -> Self {
        self.where_clause.push(Connector::Or, Cond::Raw(sql.to_string()));
        self
    }

    /// `column IN (values...)`, AND-chained. An empty list renders `1=0`.
    pub fn where_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_clause
            .push(Connector::And, expr::in_list(column, values, false));
        self
    }

    /// `column IN (values...)`, OR-chained.
    pub fn or_where_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_clause
            .push(Connector::Or, expr::in_list(column, values, false));
        self
    }

    /// `column NOT IN (values...)`, AND-chained. An empty list renders `1=1`.
    pub fn where_not_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_clause
            .push(Connector::And, expr::in_list(column, values, true));
        self
    }

    /// `column NOT IN (values...)`, OR-chained.
    pub fn or_where_not_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_clause
            .push(Connector::Or, expr::in_list(column, values, true));
        self
    }

    /// `column IN (<subquery>)`, AND-chained. The sub-query renders in
    /// place with the outer dialect; its parameters splice into the
    /// outer list at this insertion point, preserving their order.
    pub fn where_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.where_clause
            .push(Connector::And, in_query(column, sub, false));
        self
    }

    /// `column IN (<subquery>)`, OR-chained.
    pub fn or_where_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.where_clause
            .push(Connector::Or, in_query(column, sub, false));
        self
    }

    /// `column NOT IN (<subquery>)`, AND-chained.
    pub fn where_not_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.where_clause
            .push(Connector::And, in_query(column, sub, true));
        self
    }

    /// `column NOT IN (<subquery>)`, OR-chained.
    pub fn or_where_not_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.where_clause
            .push(Connector::Or, in_query(column, sub, true));
        self
    }

    /// Nest a pre-built predicate group, AND-chained.
    pub fn where_group(mut self, group: Predicate) -> Self {
        self.where_clause.push(Connector::And, Cond::Group(group));
        self
    }

    /// Nest a pre-built predicate group, OR-chained.
    pub fn or_where_group(mut self, group: Predicate) -> Self {
        self.where_clause.push(Connector::Or, Cond::Group(group));
        self
    }

    // ==================== LIKE ====================

    /// `column LIKE pattern`, AND-chained. `side` controls wildcard
    /// placement; `insensitive` lower-cases both sides on dialects
    /// without a native ILIKE.
    pub fn like(mut self, column: &str, pattern: &str, side: MatchSide, insensitive: bool) -> Self {
        self.where_clause
            .push(Connector::And, expr::like(column, pattern, side, false, insensitive));
        self
    }

    /// `column LIKE pattern`, OR-chained.
    pub fn or_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.where_clause
            .push(Connector::Or, expr::like(column, pattern, side, false, insensitive));
        self
    }

    /// `column NOT LIKE pattern`, AND-chained.
    pub fn not_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.where_clause
            .push(Connector::And, expr::like(column, pattern, side, true, insensitive));
        self
    }

    /// `column NOT LIKE pattern`, OR-chained.
    pub fn or_not_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.where_clause
            .push(Connector::Or, expr::like(column, pattern, side, true, insensitive));
        self
    }

    // ==================== HAVING ====================

    /// Add a HAVING condition, AND-chained. Key handling matches
    /// [`and_where`](Self::and_where).
    pub fn having(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.having_clause.push(Connector::And, cmp(key, value));
        self
    }

    /// Add a HAVING condition, OR-chained.
    pub fn or_having(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.having_clause.push(Connector::Or, cmp(key, value));
        self
    }

    /// Add several column/value pairs to HAVING, each AND-joined; the
    /// first pair attaches to the outer tree with AND.
    pub fn having_map<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        push_pairs_into(&mut self.having_clause, Connector::And, pairs);
        self
    }

    /// Add several column/value pairs to HAVING, each AND-joined; the
    /// first pair attaches to the outer tree with OR.
    pub fn or_having_map<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        push_pairs_into(&mut self.having_clause, Connector::Or, pairs);
        self
    }

    /// Add a verbatim HAVING fragment, AND-chained.
    pub fn having_raw(mut self, sql: &str) -> Self {
        self.having_clause.push(Connector::And, Cond::Raw(sql.to_string()));
        self
    }

    /// Add a verbatim HAVING fragment, OR-chained.
    pub fn or_having_raw(mut self, sql: &str) -> Self {
        self.having_clause.push(Connector::Or, Cond::Raw(sql.to_string()));
        self
    }

    /// `HAVING column IN (values...)`, AND-chained.
    pub fn having_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.having_clause
            .push(Connector::And, expr::in_list(column, values, false));
        self
    }

    /// `HAVING column IN (values...)`, OR-chained.
    pub fn or_having_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.having_clause
            .push(Connector::Or, expr::in_list(column, values, false));
        self
    }

    /// `HAVING column NOT IN (values...)`, AND-chained.
    pub fn having_not_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.having_clause
            .push(Connector::And, expr::in_list(column, values, true));
        self
    }

    /// `HAVING column NOT IN (values...)`, OR-chained.
    pub fn or_having_not_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.having_clause
            .push(Connector::Or, expr::in_list(column, values, true));
        self
    }

    /// `HAVING column IN (<subquery>)`, AND-chained. Splicing rules match
    /// [`where_in_query`](Self::where_in_query).
    pub fn having_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.having_clause
            .push(Connector::And, in_query(column, sub, false));
        self
    }

    /// `HAVING column IN (<subquery>)`, OR-chained.
    pub fn or_having_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.having_clause
            .push(Connector::Or, in_query(column, sub, false));
        self
    }

    /// `HAVING column NOT IN (<subquery>)`, AND-chained.
    pub fn having_not_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.having_clause
            .push(Connector::And, in_query(column, sub, true));
        self
    }

    /// `HAVING column NOT IN (<subquery>)`, OR-chained.
    pub fn or_having_not_in_query(mut self, column: &str, sub: QueryBuilder) -> Self {
        self.having_clause
            .push(Connector::Or, in_query(column, sub, true));
        self
    }

    /// `HAVING column LIKE pattern`, AND-chained.
    pub fn having_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.having_clause
            .push(Connector::And, expr::like(column, pattern, side, false, insensitive));
        self
    }

    /// `HAVING column LIKE pattern`, OR-chained.
    pub fn or_having_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.having_clause
            .push(Connector::Or, expr::like(column, pattern, side, false, insensitive));
        self
    }

    /// `HAVING column NOT LIKE pattern`, AND-chained.
    pub fn not_having_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.having_clause
            .push(Connector::And, expr::like(column, pattern, side, true, insensitive));
        self
    }

    /// `HAVING column NOT LIKE pattern`, OR-chained.
    pub fn or_not_having_like(
        mut self,
        column: &str,
        pattern: &str,
        side: MatchSide,
        insensitive: bool,
    ) -> Self {
        self.having_clause
            .push(Connector::Or, expr::like(column, pattern, side, true, insensitive));
        self
    }

    /// Nest a pre-built predicate group in HAVING, AND-chained.
    pub fn having_group(mut self, group: Predicate) -> Self {
        self.having_clause.push(Connector::And, Cond::Group(group));
        self
    }

    /// Nest a pre-built predicate group in HAVING, OR-chained.
    pub fn or_having_group(mut self, group: Predicate) -> Self {
        self.having_clause.push(Connector::Or, Cond::Group(group));
        self
    }

    // ==================== GROUP BY / ORDER BY / pagination ====================

    /// Append GROUP BY columns. Splits on top-level commas.
    pub fn group_by(mut self, columns: &str) -> Self {
        for piece in split_list(columns) {
            self.group_by.push(Source {
                expr: piece,
                escape: true,
            });
        }
        self
    }

    /// Append an ORDER BY term. `direction` is one of `""`, `ASC`,
    /// `DESC` or `RANDOM` (case-insensitive, empty defaults to ASC);
    /// anything else defers an [`InvalidDirection`](BuildError::InvalidDirection)
    /// error to compile time.
    pub fn order_by(mut self, expr: &str, direction: &str) -> Self {
        let direction = match direction.trim().to_uppercase().as_str() {
            "" | "ASC" => Direction::Asc,
            "DESC" => Direction::Desc,
            "RANDOM" => Direction::Random,
            other => {
                if self.deferred.is_none() {
                    self.deferred = Some(BuildError::InvalidDirection(other.to_string()));
                }
                return self;
            }
        };
        self.order_by.push(OrderTerm {
            expr: expr.trim().to_string(),
            direction,
            escape: true,
        });
        self
    }

    /// Set the LIMIT row count.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set the OFFSET row count.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Set LIMIT and OFFSET in one call.
    pub fn limit_offset(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    // ==================== Statement kind ====================

    /// Declare this an INSERT into `table`. Pure intention: nothing
    /// executes, the kind flips and `table` becomes the sole target.
    pub fn insert(mut self, table: &str) -> Self {
        self.kind = QueryKind::Insert;
        self.set_sole_source(table);
        self
    }

    /// Declare this an UPDATE of `table`.
    pub fn update(mut self, table: &str) -> Self {
        self.kind = QueryKind::Update;
        self.set_sole_source(table);
        self
    }

    /// Declare this a DELETE from `table`.
    pub fn delete(mut self, table: &str) -> Self {
        self.kind = QueryKind::Delete;
        self.set_sole_source(table);
        self
    }

    fn set_sole_source(&mut self, table: &str) {
        self.from_sources = vec![Source {
            expr: table.trim().to_string(),
            escape: true,
        }];
    }

    /// Assign a column value for INSERT VALUES or UPDATE SET.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.assignments
            .push((column.to_string(), Assignment::Value(value.into())));
        self
    }

    /// Assign a raw SQL expression (e.g. `NOW()`) to a column.
    pub fn set_raw(mut self, column: &str, sql_expr: &str) -> Self {
        self.assignments
            .push((column.to_string(), Assignment::Raw(sql_expr.to_string())));
        self
    }

    /// Permit compiling an UPDATE or DELETE that has no WHERE clause.
    /// Without this, such statements fail with
    /// [`UnguardedMutation`](BuildError::UnguardedMutation).
    pub fn allow_unsafe(mut self) -> Self {
        self.allow_unsafe = true;
        self
    }

    // ==================== Compilation ====================

    /// Render the accumulated state for the active query kind.
    ///
    /// Compilation is a pure read: repeated calls on an unchanged
    /// builder return identical results.
    pub fn compile(&self) -> BuildResult<Compiled> {
        render::render(self)
    }

    /// The compiled SQL text alone.
    pub fn to_sql(&self) -> BuildResult<String> {
        self.compile().map(|c| c.sql)
    }

    /// Debug rendering with literals inlined instead of placeholders.
    ///
    /// The output is for logs and inspection only; it is not guaranteed
    /// injection-safe for execution. Use [`compile`](Self::compile) for
    /// anything sent to a database.
    pub fn compile_debug(&self) -> BuildResult<String> {
        render::render_debug(self)
    }
}

fn push_pairs_into<K, V>(
    clause: &mut Predicate,
    connector: Connector,
    pairs: impl IntoIterator<Item = (K, V)>,
) where
    K: AsRef<str>,
    V: Into<Value>,
{
    let mut connector = connector;
    for (key, value) in pairs {
        clause.push(connector, cmp(key.as_ref(), value));
        connector = Connector::And;
    }
}

fn cmp(key: &str, value: impl Into<Value>) -> Cond {
    let (column, op) = expr::split_key(key);
    Cond::Cmp {
        column,
        op,
        value: value.into(),
        escape: true,
    }
}

fn in_query(column: &str, sub: QueryBuilder, negated: bool) -> Cond {
    Cond::InQuery {
        column: column.to_string(),
        query: Box::new(sub),
        negated,
        escape: true,
    }
}

/// Split a clause list on top-level commas, leaving parenthesized
/// expressions intact.
pub(crate) fn split_list(input: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in input.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                let piece = current.trim();
                if !piece.is_empty() {
                    pieces.push(piece.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let piece = current.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_top_level_commas() {
        assert_eq!(split_list("id, name"), vec!["id", "name"]);
        assert_eq!(
            split_list("COALESCE(a, b), c"),
            vec!["COALESCE(a, b)", "c"]
        );
        assert_eq!(split_list("  single  "), vec!["single"]);
    }

    #[test]
    fn kind_switch_keeps_shared_state() {
        let qb = QueryBuilder::default()
            .from("t")
            .and_where("id", 1)
            .update("t")
            .set("x", 2);
        assert_eq!(qb.kind, QueryKind::Update);
        assert!(!qb.where_clause.is_empty());
    }

    #[test]
    fn invalid_direction_defers_error() {
        let qb = QueryBuilder::default().from("t").order_by("id", "SIDEWAYS");
        assert_eq!(
            qb.compile().unwrap_err(),
            BuildError::InvalidDirection("SIDEWAYS".to_string())
        );
    }
}
