//! SQL dialect selection.
//!
//! A [`Dialect`] is chosen once at builder construction and drives
//! identifier quoting, placeholder syntax, the random-order function,
//! and the pagination tail. It is never re-checked per fluent call.

/// Target SQL dialect.
///
/// `Generic` emits bare identifiers and `?` placeholders; it is the
/// default and the least opinionated choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    Generic,
    MySql,
    Postgres,
    Sqlite,
    SqlServer,
    Oracle,
}

impl Dialect {
    /// Opening/closing identifier quote characters, if the dialect
    /// quotes identifiers at all.
    pub(crate) fn quote_pair(self) -> Option<(char, char)> {
        match self {
            Dialect::Generic => None,
            Dialect::MySql => Some(('`', '`')),
            Dialect::Postgres | Dialect::Sqlite | Dialect::Oracle => Some(('"', '"')),
            Dialect::SqlServer => Some(('[', ']')),
        }
    }

    /// Append the placeholder for the 1-based parameter index `idx`.
    pub(crate) fn write_placeholder(self, idx: usize, out: &mut String) {
        match self {
            Dialect::Generic | Dialect::MySql | Dialect::Sqlite => out.push('?'),
            Dialect::Postgres => {
                out.push('$');
                out.push_str(&idx.to_string());
            }
            Dialect::SqlServer => {
                out.push_str("@p");
                out.push_str(&idx.to_string());
            }
            Dialect::Oracle => {
                out.push(':');
                out.push_str(&idx.to_string());
            }
        }
    }

    /// Expression used for `ORDER BY ... RANDOM`.
    pub(crate) fn random_function(self) -> &'static str {
        match self {
            Dialect::MySql => "RAND()",
            Dialect::SqlServer => "NEWID()",
            Dialect::Oracle => "DBMS_RANDOM.VALUE",
            Dialect::Generic | Dialect::Postgres | Dialect::Sqlite => "RANDOM()",
        }
    }

    /// Whether the dialect has a native case-insensitive LIKE operator.
    pub(crate) fn native_ilike(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Whether pagination uses `OFFSET n ROWS FETCH NEXT m ROWS ONLY`
    /// instead of `LIMIT`/`OFFSET`.
    pub(crate) fn offset_fetch_pagination(self) -> bool {
        matches!(self, Dialect::SqlServer | Dialect::Oracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_per_dialect() {
        let mut s = String::new();
        Dialect::Generic.write_placeholder(3, &mut s);
        assert_eq!(s, "?");

        let mut s = String::new();
        Dialect::Postgres.write_placeholder(3, &mut s);
        assert_eq!(s, "$3");

        let mut s = String::new();
        Dialect::SqlServer.write_placeholder(3, &mut s);
        assert_eq!(s, "@p3");

        let mut s = String::new();
        Dialect::Oracle.write_placeholder(3, &mut s);
        assert_eq!(s, ":3");
    }

    #[test]
    fn default_is_generic() {
        assert_eq!(Dialect::default(), Dialect::Generic);
    }
}
