//! Statement rendering.
//!
//! One render path per query kind walks the accumulated clause state and
//! produces final SQL text. A [`RenderCtx`] threads through the whole
//! render, so placeholder numbering stays continuous across clauses and
//! across spliced sub-queries, and the parameter list comes out in
//! placeholder order by construction. The placeholder/parameter count
//! check at the end guards that invariant.

use crate::builder::{Assignment, Compiled, Direction, QueryBuilder, QueryKind, Source};
use crate::dialect::Dialect;
use crate::error::{BuildError, BuildResult};
use crate::ident::quote_identifier;
use crate::value::Value;

/// Shared rendering state: dialect, collected parameters, and the count
/// of placeholders written so far.
pub(crate) struct RenderCtx {
    pub(crate) dialect: Dialect,
    pub(crate) params: Vec<Value>,
    pub(crate) placeholders: usize,
    inline: bool,
}

impl RenderCtx {
    fn new(dialect: Dialect, inline: bool) -> Self {
        Self {
            dialect,
            params: Vec::new(),
            placeholders: 0,
            inline,
        }
    }

    /// Emit a placeholder for `value` and record it, or inline the
    /// literal in debug mode.
    pub(crate) fn bind(&mut self, value: Value, out: &mut String) {
        if self.inline {
            out.push_str(&value.inline());
        } else {
            self.params.push(value);
            self.placeholders += 1;
            self.dialect.write_placeholder(self.params.len(), out);
        }
    }
}

/// Compile the builder for its active kind.
pub(crate) fn render(qb: &QueryBuilder) -> BuildResult<Compiled> {
    let (sql, ctx) = render_with(qb, false)?;
    if ctx.placeholders != ctx.params.len() {
        return Err(BuildError::MismatchedParameterCount {
            placeholders: ctx.placeholders,
            params: ctx.params.len(),
        });
    }
    tracing::debug!(sql = %sql, params = ctx.params.len(), "compiled query");
    Ok(Compiled {
        sql,
        params: ctx.params,
    })
}

/// Compile with literals inlined; no parameter list is produced.
pub(crate) fn render_debug(qb: &QueryBuilder) -> BuildResult<String> {
    let (sql, _) = render_with(qb, true)?;
    Ok(sql)
}

fn render_with(qb: &QueryBuilder, inline: bool) -> BuildResult<(String, RenderCtx)> {
    if let Some(err) = &qb.deferred {
        return Err(err.clone());
    }
    if qb.from_sources.is_empty() {
        return Err(BuildError::EmptyFromSource);
    }
    let mut ctx = RenderCtx::new(qb.dialect, inline);
    let sql = match qb.kind {
        QueryKind::Select => render_select(qb, &mut ctx)?,
        QueryKind::Insert => render_insert(qb, &mut ctx)?,
        QueryKind::Update => render_update(qb, &mut ctx)?,
        QueryKind::Delete => render_delete(qb, &mut ctx)?,
    };
    Ok((sql, ctx))
}

/// Render a sub-query in place, sharing the outer context so the outer
/// dialect and placeholder numbering apply throughout.
pub(crate) fn render_subquery(qb: &QueryBuilder, ctx: &mut RenderCtx) -> BuildResult<String> {
    if let Some(err) = &qb.deferred {
        return Err(err.clone());
    }
    if qb.from_sources.is_empty() {
        return Err(BuildError::EmptyFromSource);
    }
    render_select(qb, ctx)
}

fn render_select(qb: &QueryBuilder, ctx: &mut RenderCtx) -> BuildResult<String> {
    let d = ctx.dialect;
    let mut sql = String::from("SELECT ");

    if qb.distinct {
        if qb.select_exprs.iter().any(|e| e.aggregate.is_some()) {
            tracing::warn!("DISTINCT combined with aggregate select expressions");
        }
        sql.push_str("DISTINCT ");
    }

    if qb.select_exprs.is_empty() {
        sql.push('*');
    } else {
        for (i, entry) in qb.select_exprs.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            match entry.aggregate {
                Some(agg) => {
                    let inner = if entry.expr == "*" {
                        "*".to_string()
                    } else {
                        quote_identifier(d, &entry.expr)
                    };
                    sql.push_str(agg.keyword());
                    sql.push('(');
                    sql.push_str(&inner);
                    sql.push(')');
                    if let Some(alias) = &entry.alias {
                        sql.push_str(" AS ");
                        sql.push_str(&quote_identifier(d, alias));
                    }
                }
                None => {
                    if entry.escape {
                        sql.push_str(&quote_identifier(d, &entry.expr));
                    } else {
                        sql.push_str(&entry.expr);
                    }
                }
            }
        }
    }

    sql.push_str(" FROM ");
    for (i, source) in qb.from_sources.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&source_sql(d, source));
    }

    for join in &qb.joins {
        sql.push(' ');
        if !join.kind.is_empty() {
            sql.push_str(&join.kind);
            sql.push(' ');
        }
        sql.push_str("JOIN ");
        if join.escape {
            sql.push_str(&quote_identifier(d, &join.table));
        } else {
            sql.push_str(&join.table);
        }
        sql.push_str(" ON ");
        sql.push_str(&join.condition);
    }

    let where_sql = qb.where_clause.render(ctx)?;
    if !where_sql.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_sql);
    }

    if !qb.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        for (i, term) in qb.group_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&source_sql(d, term));
        }
    }

    let having_sql = qb.having_clause.render(ctx)?;
    if !having_sql.is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&having_sql);
    }

    if !qb.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        for (i, term) in qb.order_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            match term.direction {
                Direction::Random => sql.push_str(d.random_function()),
                Direction::Asc => {
                    sql.push_str(&order_expr(d, term.escape, &term.expr));
                    sql.push_str(" ASC");
                }
                Direction::Desc => {
                    sql.push_str(&order_expr(d, term.escape, &term.expr));
                    sql.push_str(" DESC");
                }
            }
        }
    }

    render_pagination(qb, d, &mut sql);
    Ok(sql)
}

fn render_insert(qb: &QueryBuilder, ctx: &mut RenderCtx) -> BuildResult<String> {
    if qb.assignments.is_empty() {
        return Err(BuildError::EmptyInsertPayload);
    }
    let d = ctx.dialect;
    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&source_sql(d, &qb.from_sources[0]));
    sql.push_str(" (");
    for (i, (column, _)) in qb.assignments.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_identifier(d, column));
    }
    sql.push_str(") VALUES (");
    for (i, (_, assignment)) in qb.assignments.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        match assignment {
            Assignment::Value(value) => ctx.bind(value.clone(), &mut sql),
            Assignment::Raw(raw) => sql.push_str(raw),
        }
    }
    sql.push(')');
    Ok(sql)
}

fn render_update(qb: &QueryBuilder, ctx: &mut RenderCtx) -> BuildResult<String> {
    if qb.assignments.is_empty() {
        return Err(BuildError::EmptySetClause);
    }
    if qb.where_clause.is_empty() && !qb.allow_unsafe {
        return Err(BuildError::UnguardedMutation("UPDATE"));
    }
    let d = ctx.dialect;
    let mut sql = String::from("UPDATE ");
    sql.push_str(&source_sql(d, &qb.from_sources[0]));
    sql.push_str(" SET ");
    for (i, (column, assignment)) in qb.assignments.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_identifier(d, column));
        sql.push_str(" = ");
        match assignment {
            Assignment::Value(value) => ctx.bind(value.clone(), &mut sql),
            Assignment::Raw(raw) => sql.push_str(raw),
        }
    }
    let where_sql = qb.where_clause.render(ctx)?;
    if !where_sql.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_sql);
    }
    Ok(sql)
}

fn render_delete(qb: &QueryBuilder, ctx: &mut RenderCtx) -> BuildResult<String> {
    if qb.where_clause.is_empty() && !qb.allow_unsafe {
        return Err(BuildError::UnguardedMutation("DELETE"));
    }
    let d = ctx.dialect;
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&source_sql(d, &qb.from_sources[0]));
    let where_sql = qb.where_clause.render(ctx)?;
    if !where_sql.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_sql);
    }
    Ok(sql)
}

fn render_pagination(qb: &QueryBuilder, d: Dialect, sql: &mut String) {
    if d.offset_fetch_pagination() {
        if qb.limit.is_some() || qb.offset.is_some() {
            sql.push_str(" OFFSET ");
            sql.push_str(&qb.offset.unwrap_or(0).to_string());
            sql.push_str(" ROWS");
            if let Some(n) = qb.limit {
                sql.push_str(" FETCH NEXT ");
                sql.push_str(&n.to_string());
                sql.push_str(" ROWS ONLY");
            }
        }
    } else {
        if let Some(n) = qb.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&n.to_string());
        }
        if let Some(n) = qb.offset {
            sql.push_str(" OFFSET ");
            sql.push_str(&n.to_string());
        }
    }
}

fn source_sql(d: Dialect, source: &Source) -> String {
    if source.escape {
        quote_identifier(d, &source.expr)
    } else {
        source.expr.clone()
    }
}

fn order_expr(d: Dialect, escape: bool, expr: &str) -> String {
    if escape {
        quote_identifier(d, expr)
    } else {
        expr.to_string()
    }
}
