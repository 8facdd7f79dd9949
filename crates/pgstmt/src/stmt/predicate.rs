//! Boolean predicate trees for WHERE/HAVING/ON clauses.
//!
//! A predicate is a closed set of variants dispatched by exhaustive `match`.
//! Comparison leaves reference a column and the *name* of a bind variable,
//! never the value itself: the same tree builds repeatedly against different
//! value maps. `derive(Clone)` gives a structural deep copy, so a cloned tree
//! shares no node with its source.

use crate::error::StmtResult;
use crate::value::Values;
use crate::writer::QueryWriter;

/// Comparison operator of a predicate leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `LIKE`
    Like,
    /// `ILIKE`
    ILike,
}

impl CompareOp {
    /// SQL keyword form.
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Like => "LIKE",
            CompareOp::ILike => "ILIKE",
        }
    }
}

/// A boolean expression tree serializing itself against the query writer.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// `column <op> $n`, with the value looked up by bind name at build time.
    Compare {
        /// Column or expression on the left-hand side.
        column: String,
        /// Comparison operator.
        op: CompareOp,
        /// Bind name resolved in the value map.
        param: String,
    },

    /// All children must hold. Empty serializes as `1=1`.
    And(Vec<Predicate>),

    /// At least one child must hold. Empty serializes as `1=0`.
    Or(Vec<Predicate>),

    /// Negation; always parenthesizes its operand.
    Not(Box<Predicate>),

    /// `column IS NULL` / `column IS NOT NULL`.
    IsNull {
        /// Column to test.
        column: String,
        /// Emit `IS NOT NULL` instead.
        negated: bool,
    },

    /// `column IN ($a, $b, ...)` over named bind variables.
    InList {
        /// Column to test.
        column: String,
        /// Bind names, one placeholder each.
        params: Vec<String>,
        /// Emit `NOT IN` instead.
        negated: bool,
    },

    /// Static SQL fragment; binds nothing.
    Raw(String),

    /// The explicit "match all rows" sentinel (`1=1`). Required to build an
    /// unscoped DELETE.
    MatchAll,
}

impl Predicate {
    /// `column = :param`
    pub fn eq(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Eq, param)
    }

    /// `column != :param`
    pub fn ne(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Ne, param)
    }

    /// `column > :param`
    pub fn gt(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Gt, param)
    }

    /// `column >= :param`
    pub fn gte(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Gte, param)
    }

    /// `column < :param`
    pub fn lt(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Lt, param)
    }

    /// `column <= :param`
    pub fn lte(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Lte, param)
    }

    /// `column LIKE :param`
    pub fn like(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Like, param)
    }

    /// `column ILIKE :param`
    pub fn ilike(column: impl Into<String>, param: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::ILike, param)
    }

    /// Comparison leaf with an explicit operator.
    pub fn compare(column: impl Into<String>, op: CompareOp, param: impl Into<String>) -> Self {
        Predicate::Compare {
            column: column.into(),
            op,
            param: param.into(),
        }
    }

    /// AND combinator over the given children.
    pub fn and(children: Vec<Predicate>) -> Self {
        Predicate::And(children)
    }

    /// OR combinator over the given children.
    pub fn or(children: Vec<Predicate>) -> Self {
        Predicate::Or(children)
    }

    /// Negate a predicate.
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// `column IS NULL`
    pub fn is_null(column: impl Into<String>) -> Self {
        Predicate::IsNull {
            column: column.into(),
            negated: false,
        }
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Predicate::IsNull {
            column: column.into(),
            negated: true,
        }
    }

    /// `column IN (...)` over named bind variables.
    pub fn in_list<S: Into<String>>(column: impl Into<String>, params: Vec<S>) -> Self {
        Predicate::InList {
            column: column.into(),
            params: params.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `column NOT IN (...)` over named bind variables.
    pub fn not_in<S: Into<String>>(column: impl Into<String>, params: Vec<S>) -> Self {
        Predicate::InList {
            column: column.into(),
            params: params.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// Static SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw(sql.into())
    }

    /// Whether this node is a boolean combinator whose serialization must be
    /// parenthesized when nested; flattening is never assumed safe across
    /// dialect precedence rules.
    fn needs_parens(&self) -> bool {
        matches!(self, Predicate::And(_) | Predicate::Or(_))
    }

    /// Serialize this tree as a boolean SQL expression.
    ///
    /// Any nested missing-parameter error aborts serialization immediately;
    /// the caller discards the writer.
    pub fn write_to(&self, w: &mut QueryWriter, values: &Values) -> StmtResult<()> {
        match self {
            Predicate::Compare { column, op, param } => {
                w.push(column);
                w.push(" ");
                w.push(op.as_sql());
                w.push(" ");
                w.bind(param, values)
            }
            Predicate::And(children) => Self::write_joined(children, " AND ", "1=1", w, values),
            Predicate::Or(children) => Self::write_joined(children, " OR ", "1=0", w, values),
            Predicate::Not(inner) => {
                w.push("NOT (");
                inner.write_to(w, values)?;
                w.push(")");
                Ok(())
            }
            Predicate::IsNull { column, negated } => {
                w.push(column);
                w.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
                Ok(())
            }
            Predicate::InList {
                column,
                params,
                negated,
            } => {
                if params.is_empty() {
                    // IN () is not valid SQL; degenerate lists collapse to a
                    // constant truth value.
                    w.push(if *negated { "1=1" } else { "1=0" });
                    return Ok(());
                }
                w.push(column);
                w.push(if *negated { " NOT IN (" } else { " IN (" });
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        w.push(", ");
                    }
                    w.bind(param, values)?;
                }
                w.push(")");
                Ok(())
            }
            Predicate::Raw(sql) => {
                w.push(sql);
                Ok(())
            }
            Predicate::MatchAll => {
                w.push("1=1");
                Ok(())
            }
        }
    }

    fn write_joined(
        children: &[Predicate],
        sep: &str,
        empty: &str,
        w: &mut QueryWriter,
        values: &Values,
    ) -> StmtResult<()> {
        if children.is_empty() {
            w.push(empty);
            return Ok(());
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                w.push(sep);
            }
            if child.needs_parens() {
                w.push("(");
                child.write_to(w, values)?;
                w.push(")");
            } else {
                child.write_to(w, values)?;
            }
        }
        Ok(())
    }
}
