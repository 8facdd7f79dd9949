//! Statement builders for pgstmt.
//!
//! Statements are assembled from composable clause values and built against a
//! named value map:
//!
//! ```ignore
//! use pgstmt::stmt;
//! use pgstmt::{Predicate, Values};
//!
//! let users = stmt::select("users")
//!     .column("id")
//!     .column("name")
//!     .filter(Predicate::gt("age", "minAge"))
//!     .limit(20);
//!
//! let built = users.build(&Values::new().set("minAge", 18))?;
//! // built.sql      == "SELECT id, name FROM users WHERE age > $1 LIMIT 20"
//! // built.args     == [Value::Int(18)]
//! // built.bindings == ["id", "name"]
//! ```

mod delete;
mod join;
mod marker;
mod predicate;
mod select;

pub use delete::{BuiltDelete, DeleteStatement};
pub use join::{JoinClause, JoinKind};
pub use marker::Marker;
pub use predicate::{CompareOp, Predicate};
pub use select::{BuiltSelect, SelectStatement};

/// Create a SELECT statement for the given table.
///
/// # Example
/// ```ignore
/// let stmt = pgstmt::stmt::select("users").column("id");
/// ```
pub fn select(table: &str) -> SelectStatement {
    SelectStatement::new(table)
}

/// Create a DELETE statement for the given table.
///
/// Building fails until a WHERE predicate is attached; use
/// [`Predicate::MatchAll`] to delete all rows on purpose.
pub fn delete(table: &str) -> DeleteStatement {
    DeleteStatement::new(table)
}
