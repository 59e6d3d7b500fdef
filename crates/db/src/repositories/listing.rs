//! Shared pieces of the dynamic listing queries.
//!
//! A listing runs twice over the same predicates: once as `COUNT(*)` for the
//! total and once with ORDER BY / LIMIT / OFFSET for the page. Callers push
//! predicates through [`Conditions`] so both queries get identical WHERE
//! clauses.

use deepdrama_core::pagination::Page;
use deepdrama_core::sorting::{Sort, SortKey};
use sqlx::{Postgres, QueryBuilder};

/// Tracks whether a WHERE clause has been opened yet.
#[derive(Debug, Default)]
pub(crate) struct Conditions {
    opened: bool,
}

impl Conditions {
    /// Push `WHERE` before the first predicate and `AND` before the rest.
    pub(crate) fn next(&mut self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(if self.opened { " AND " } else { " WHERE " });
        self.opened = true;
    }
}

/// Append `ORDER BY <key> <dir>, <tie-break> ASC`.
pub(crate) fn push_order<K: SortKey>(qb: &mut QueryBuilder<'_, Postgres>, sort: Sort<K>) {
    let column = sort.key.column();
    qb.push(" ORDER BY ");
    qb.push(column);
    qb.push(" ");
    qb.push(sort.direction.as_sql());
    if column != K::tie_break() {
        qb.push(", ");
        qb.push(K::tie_break());
        qb.push(" ASC");
    }
}

/// Append bound `LIMIT` / `OFFSET` for a page.
pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: Page) {
    qb.push(" LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
}

/// Build a case-insensitive substring pattern with LIKE wildcards escaped.
pub(crate) fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
