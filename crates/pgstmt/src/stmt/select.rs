//! SELECT statement assembly.

use crate::client::GenericClient;
use crate::error::{StmtError, StmtResult};
use crate::stmt::join::JoinClause;
use crate::stmt::marker::Marker;
use crate::stmt::predicate::Predicate;
use crate::value::{Value, Values};
use crate::writer::{PlaceholderStyle, QueryWriter};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// Output of a successful select build: driver-ready SQL, the ordered
/// argument list, and the marker binding names aligned 1:1 with the result
/// row's column positions.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltSelect {
    /// SQL text with positional placeholders.
    pub sql: String,
    /// Bound values in placeholder order.
    pub args: Vec<Value>,
    /// Logical output-column names, one per select marker.
    pub bindings: Vec<String>,
}

impl BuiltSelect {
    /// Argument references in the form the driver expects.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// A composable SELECT statement: table, joins, markers, predicates,
/// grouping and pagination.
///
/// A statement is a value: `Clone` deep-copies every owned clause, so a built
/// statement serves as an immutable template — each user clones, adapts its
/// copy and builds against its own value map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectStatement {
    table: String,
    joins: Vec<JoinClause>,
    markers: Vec<Marker>,
    where_clause: Option<Predicate>,
    group_by: Vec<Marker>,
    having: Option<Predicate>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectStatement {
    /// Create a select statement over the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Append a select marker.
    pub fn marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Append a plain column marker.
    pub fn column(self, name: &str) -> Self {
        self.marker(Marker::column(name))
    }

    /// Append several plain column markers.
    pub fn columns(mut self, names: &[&str]) -> Self {
        self.markers.extend(names.iter().map(|n| Marker::column(*n)));
        self
    }

    /// Append a join clause. Joins are emitted in insertion order.
    pub fn join(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }

    /// Append an `INNER JOIN` with an ON predicate.
    pub fn inner_join(self, table: &str, on: Predicate) -> Self {
        self.join(JoinClause::inner(table).on(on))
    }

    /// Append an `OUTER JOIN` with an ON predicate.
    pub fn outer_join(self, table: &str, on: Predicate) -> Self {
        self.join(JoinClause::outer(table).on(on))
    }

    /// Append a `LEFT JOIN` with an ON predicate.
    pub fn left_join(self, table: &str, on: Predicate) -> Self {
        self.join(JoinClause::left(table).on(on))
    }

    /// Set the WHERE predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    /// Append a GROUP BY marker. Grouping markers are structural only and
    /// contribute no binding names.
    pub fn group_by(mut self, marker: impl Into<Marker>) -> Self {
        self.group_by.push(marker.into());
        self
    }

    /// Set the HAVING predicate.
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having = Some(predicate);
        self
    }

    /// Set LIMIT. `None` and `Some(0)` are distinct.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Build with the default `$n` placeholder style.
    pub fn build(&self, values: &Values) -> StmtResult<BuiltSelect> {
        self.build_with(values, PlaceholderStyle::default())
    }

    /// Build the statement against a value map.
    ///
    /// Bound-value order is exactly the left-to-right serialization order:
    /// join ON predicates, then WHERE, then HAVING. Markers bind nothing.
    /// Any resolution failure aborts the build; no partial SQL is returned.
    pub fn build_with(
        &self,
        values: &Values,
        style: PlaceholderStyle,
    ) -> StmtResult<BuiltSelect> {
        if self.markers.is_empty() {
            return Err(StmtError::NoSelectMarkers);
        }

        let mut w = QueryWriter::with_style(style);
        let mut bindings = Vec::with_capacity(self.markers.len());

        w.push("SELECT ");
        for (i, marker) in self.markers.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(marker.to_sql());
            bindings.push(marker.binding().to_string());
        }

        w.push(" FROM ");
        w.push(&self.table);

        for join in &self.joins {
            join.write_to(&mut w, values)?;
        }

        if let Some(wc) = &self.where_clause {
            w.push(" WHERE ");
            wc.write_to(&mut w, values)?;
        }

        if !self.group_by.is_empty() {
            w.push(" GROUP BY ");
            for (i, marker) in self.group_by.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.push(marker.to_sql());
            }
        }

        if let Some(hc) = &self.having {
            w.push(" HAVING ");
            hc.write_to(&mut w, values)?;
        }

        if let Some(limit) = self.limit {
            w.push(" LIMIT ");
            w.push_int(limit);
        }

        if let Some(offset) = self.offset {
            w.push(" OFFSET ");
            w.push_int(offset);
        }

        let (sql, args) = w.finish();
        Ok(BuiltSelect {
            sql,
            args,
            bindings,
        })
    }

    /// Build and execute, returning all rows.
    pub async fn query(
        &self,
        conn: &impl GenericClient,
        values: &Values,
    ) -> StmtResult<Vec<Row>> {
        let built = self.build(values)?;
        conn.query(&built.sql, &built.params_ref()).await
    }

    /// Build and execute, returning the first row if any.
    pub async fn query_opt(
        &self,
        conn: &impl GenericClient,
        values: &Values,
    ) -> StmtResult<Option<Row>> {
        let built = self.build(values)?;
        conn.query_opt(&built.sql, &built.params_ref()).await
    }

    /// Build and execute, returning exactly one row.
    pub async fn query_one(
        &self,
        conn: &impl GenericClient,
        values: &Values,
    ) -> StmtResult<Row> {
        let built = self.build(values)?;
        conn.query_one(&built.sql, &built.params_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        // SELECT id FROM users WHERE age > $1 with {minAge: 18}
        let stmt = SelectStatement::new("users")
            .column("id")
            .filter(Predicate::gt("age", "minAge"));
        let built = stmt.build(&Values::new().set("minAge", 18)).unwrap();
        assert_eq!(built.sql, "SELECT id FROM users WHERE age > $1");
        assert_eq!(built.args, vec![Value::Int(18)]);
        assert_eq!(built.bindings, vec!["id"]);
    }

    #[test]
    fn test_no_markers_fails() {
        let stmt = SelectStatement::new("users").filter(Predicate::eq("a", "a"));
        let err = stmt.build(&Values::new().set("a", 1)).unwrap_err();
        assert!(matches!(err, StmtError::NoSelectMarkers));
    }

    #[test]
    fn test_bindings_match_marker_order() {
        let stmt = SelectStatement::new("users")
            .column("id")
            .marker(Marker::expr("COUNT(*)", "total"))
            .column("name");
        let built = stmt.build(&Values::new()).unwrap();
        assert_eq!(built.sql, "SELECT id, COUNT(*), name FROM users");
        assert_eq!(built.bindings, vec!["id", "total", "name"]);
    }

    #[test]
    fn test_group_by_and_having() {
        let stmt = SelectStatement::new("orders")
            .marker(Marker::expr("user_id", "user_id"))
            .marker(Marker::expr("COUNT(*)", "total"))
            .group_by(Marker::column("user_id"))
            .having(Predicate::gt("COUNT(*)", "min"));
        let built = stmt.build(&Values::new().set("min", 5)).unwrap();
        assert_eq!(
            built.sql,
            "SELECT user_id, COUNT(*) FROM orders GROUP BY user_id HAVING COUNT(*) > $1"
        );
        // Group-by markers are structural; only select markers yield bindings.
        assert_eq!(built.bindings, vec!["user_id", "total"]);
    }

    #[test]
    fn test_limit_without_offset() {
        let stmt = SelectStatement::new("users").column("id").limit(10);
        let built = stmt.build(&Values::new()).unwrap();
        assert_eq!(built.sql, "SELECT id FROM users LIMIT 10");
    }

    #[test]
    fn test_limit_zero_is_emitted() {
        let stmt = SelectStatement::new("users").column("id").limit(0);
        let built = stmt.build(&Values::new()).unwrap();
        assert_eq!(built.sql, "SELECT id FROM users LIMIT 0");
    }

    #[test]
    fn test_limit_and_offset() {
        let stmt = SelectStatement::new("users").column("id").limit(10).offset(20);
        let built = stmt.build(&Values::new()).unwrap();
        assert_eq!(built.sql, "SELECT id FROM users LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_question_placeholder_style() {
        let stmt = SelectStatement::new("users")
            .column("id")
            .filter(Predicate::eq("name", "name"));
        let built = stmt
            .build_with(&Values::new().set("name", "bob"), PlaceholderStyle::Question)
            .unwrap();
        assert_eq!(built.sql, "SELECT id FROM users WHERE name = ?");
    }

    #[test]
    fn test_missing_parameter_returns_nothing_partial() {
        let stmt = SelectStatement::new("users")
            .column("id")
            .filter(Predicate::eq("age", "age"));
        let err = stmt.build(&Values::new()).unwrap_err();
        assert!(err.is_missing_parameter());
    }
}
