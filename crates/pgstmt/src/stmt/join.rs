//! Join clauses: a table join with an optional ON predicate.

use crate::error::StmtResult;
use crate::stmt::predicate::Predicate;
use crate::value::Values;
use crate::writer::QueryWriter;

/// Kind of join; serialized as its uppercase SQL keyword.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JoinKind {
    /// Bare `JOIN`
    #[default]
    Plain,
    /// `INNER JOIN`
    Inner,
    /// `OUTER JOIN`
    Outer,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
}

impl JoinKind {
    /// SQL keyword form, including the trailing `JOIN`.
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Plain => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Outer => "OUTER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// A table join attached to a select statement.
///
/// Cloning a join clones its predicate; joins are positionally significant
/// and a statement never reorders its join list.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinClause {
    table: String,
    kind: JoinKind,
    on: Option<Predicate>,
}

impl JoinClause {
    /// A bare join on the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: JoinKind::Plain,
            on: None,
        }
    }

    /// An `INNER JOIN` on the given table.
    pub fn inner(table: impl Into<String>) -> Self {
        Self::new(table).kind(JoinKind::Inner)
    }

    /// An `OUTER JOIN` on the given table.
    pub fn outer(table: impl Into<String>) -> Self {
        Self::new(table).kind(JoinKind::Outer)
    }

    /// A `LEFT JOIN` on the given table.
    pub fn left(table: impl Into<String>) -> Self {
        Self::new(table).kind(JoinKind::Left)
    }

    /// Set the join kind.
    pub fn kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attach an ON predicate.
    pub fn on(mut self, predicate: Predicate) -> Self {
        self.on = Some(predicate);
        self
    }

    /// Serialize as `" <KIND> JOIN <table>"` plus `" ON <predicate>"` when
    /// a predicate is attached.
    pub fn write_to(&self, w: &mut QueryWriter, values: &Values) -> StmtResult<()> {
        w.push(" ");
        w.push(self.kind.keyword());
        w.push(" ");
        w.push(&self.table);

        let Some(on) = &self.on else {
            return Ok(());
        };
        w.push(" ON ");
        on.write_to(w, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(jc: &JoinClause, values: &Values) -> StmtResult<String> {
        let mut w = QueryWriter::new();
        jc.write_to(&mut w, values)?;
        Ok(w.finish().0)
    }

    #[test]
    fn test_outer_join_without_predicate() {
        let sql = render(&JoinClause::outer("orders"), &Values::new()).unwrap();
        assert_eq!(sql, " OUTER JOIN orders");
    }

    #[test]
    fn test_plain_join() {
        let sql = render(&JoinClause::new("orders"), &Values::new()).unwrap();
        assert_eq!(sql, " JOIN orders");
    }

    #[test]
    fn test_join_with_on_predicate() {
        let values = Values::new().set("kind", "paid");
        let jc = JoinClause::inner("orders").on(Predicate::and(vec![
            Predicate::raw("orders.user_id = users.id"),
            Predicate::eq("orders.kind", "kind"),
        ]));
        let sql = render(&jc, &values).unwrap();
        assert_eq!(
            sql,
            " INNER JOIN orders ON orders.user_id = users.id AND orders.kind = $1"
        );
    }
}
