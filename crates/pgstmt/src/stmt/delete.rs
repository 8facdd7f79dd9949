//! DELETE statement assembly.

use crate::client::GenericClient;
use crate::error::{StmtError, StmtResult};
use crate::stmt::predicate::Predicate;
use crate::value::{Value, Values};
use crate::writer::{PlaceholderStyle, QueryWriter};
use tokio_postgres::types::ToSql;

/// Output of a successful delete build.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltDelete {
    /// SQL text with positional placeholders.
    pub sql: String,
    /// Bound values in placeholder order.
    pub args: Vec<Value>,
}

impl BuiltDelete {
    /// Argument references in the form the driver expects.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// A composable DELETE statement: table plus WHERE predicate.
///
/// A where clause is required to build. Deleting every row must be stated
/// explicitly by attaching [`Predicate::MatchAll`]; an absent predicate is a
/// precondition violation, never a silent unscoped delete.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteStatement {
    table: String,
    where_clause: Option<Predicate>,
}

impl DeleteStatement {
    /// Create a delete statement for the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
        }
    }

    /// Set the WHERE predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    /// Build with the default `$n` placeholder style.
    pub fn build(&self, values: &Values) -> StmtResult<BuiltDelete> {
        self.build_with(values, PlaceholderStyle::default())
    }

    /// Build the statement against a value map.
    pub fn build_with(
        &self,
        values: &Values,
        style: PlaceholderStyle,
    ) -> StmtResult<BuiltDelete> {
        let Some(wc) = &self.where_clause else {
            return Err(StmtError::UnscopedDelete(self.table.clone()));
        };

        let mut w = QueryWriter::with_style(style);
        w.push("DELETE FROM ");
        w.push(&self.table);
        w.push(" WHERE ");
        wc.write_to(&mut w, values)?;

        let (sql, args) = w.finish();
        Ok(BuiltDelete { sql, args })
    }

    /// Build and execute, returning the affected row count.
    pub async fn execute(
        &self,
        conn: &impl GenericClient,
        values: &Values,
    ) -> StmtResult<u64> {
        let built = self.build(values)?;
        conn.execute(&built.sql, &built.params_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        // DELETE FROM sessions WHERE expired = $1 with {flag: true}
        let stmt = DeleteStatement::new("sessions").filter(Predicate::eq("expired", "flag"));
        let built = stmt.build(&Values::new().set("flag", true)).unwrap();
        assert_eq!(built.sql, "DELETE FROM sessions WHERE expired = $1");
        assert_eq!(built.args, vec![Value::Bool(true)]);
    }

    #[test]
    fn test_delete_without_where_is_rejected() {
        let stmt = DeleteStatement::new("sessions");
        let err = stmt.build(&Values::new()).unwrap_err();
        assert!(matches!(err, StmtError::UnscopedDelete(t) if t == "sessions"));
    }

    #[test]
    fn test_delete_all_requires_explicit_sentinel() {
        let stmt = DeleteStatement::new("sessions").filter(Predicate::MatchAll);
        let built = stmt.build(&Values::new()).unwrap();
        assert_eq!(built.sql, "DELETE FROM sessions WHERE 1=1");
        assert!(built.args.is_empty());
    }

    #[test]
    fn test_delete_missing_parameter() {
        let stmt = DeleteStatement::new("sessions").filter(Predicate::eq("expired", "flag"));
        let err = stmt.build(&Values::new()).unwrap_err();
        assert!(err.is_missing_parameter());
    }
}
