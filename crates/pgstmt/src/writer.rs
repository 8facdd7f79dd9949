//! The query writer: shared text-and-values accumulator for one build call.

use crate::error::{StmtError, StmtResult};
use crate::value::{Value, Values};
use std::fmt::Write as _;

/// Positional placeholder convention of the target backend.
///
/// This is a configuration point of the writer, not of statements: the same
/// statement template builds against any style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Numbered `$1`, `$2`, ... (PostgreSQL)
    #[default]
    Dollar,
    /// Bare `?` per bound value (MySQL/SQLite style drivers)
    Question,
}

/// Append-only SQL accumulator paired with the ordered bound-value list.
///
/// Each `bind` resolves a name against the value map, appends the value and
/// writes the placeholder for its new position. Text and values are never
/// reordered once written; a failed bind aborts the whole build and the
/// writer is discarded, so callers never observe partial output.
#[derive(Debug, Default)]
pub struct QueryWriter {
    sql: String,
    args: Vec<Value>,
    style: PlaceholderStyle,
}

impl QueryWriter {
    /// Create a writer with the default `$n` placeholder style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer for an explicit placeholder style.
    pub fn with_style(style: PlaceholderStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Append a literal SQL fragment.
    pub fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Append a literal integer (limit/offset; never parameter-bound).
    pub fn push_int(&mut self, n: i64) {
        // write! to String is infallible
        let _ = write!(self.sql, "{}", n);
    }

    /// Resolve `name` in the value map, record the value and write the
    /// positional placeholder for it.
    pub fn bind(&mut self, name: &str, values: &Values) -> StmtResult<()> {
        let value = values
            .get(name)
            .ok_or_else(|| StmtError::missing_parameter(name))?;
        self.args.push(value.clone());
        match self.style {
            PlaceholderStyle::Dollar => {
                let _ = write!(self.sql, "${}", self.args.len());
            }
            PlaceholderStyle::Question => self.sql.push('?'),
        }
        Ok(())
    }

    /// Number of values bound so far.
    pub fn bound(&self) -> usize {
        self.args.len()
    }

    /// Consume the writer, yielding SQL text and the ordered argument list.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_appends_placeholder_and_value() {
        let values = Values::new().set("a", 1).set("b", "x");
        let mut w = QueryWriter::new();
        w.push("a = ");
        w.bind("a", &values).unwrap();
        w.push(" AND b = ");
        w.bind("b", &values).unwrap();

        let (sql, args) = w.finish();
        assert_eq!(sql, "a = $1 AND b = $2");
        assert_eq!(args, vec![Value::Int(1), Value::Text("x".to_string())]);
    }

    #[test]
    fn test_question_style() {
        let values = Values::new().set("a", 1);
        let mut w = QueryWriter::with_style(PlaceholderStyle::Question);
        w.push("a = ");
        w.bind("a", &values).unwrap();
        assert_eq!(w.finish().0, "a = ?");
    }

    #[test]
    fn test_missing_parameter() {
        let mut w = QueryWriter::new();
        let err = w.bind("nope", &Values::new()).unwrap_err();
        assert!(err.is_missing_parameter());
    }

    #[test]
    fn test_push_int() {
        let mut w = QueryWriter::new();
        w.push("LIMIT ");
        w.push_int(10);
        assert_eq!(w.finish().0, "LIMIT 10");
    }
}
