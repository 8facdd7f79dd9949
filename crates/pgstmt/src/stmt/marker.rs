//! Select/group-by markers: named, selectable SQL expressions.

/// A single selectable or groupable expression plus the name under which its
/// result is returned to the caller.
///
/// Markers are structural: they bind no values. The binding name lets callers
/// align result-row positions with logical field names independent of any
/// SQL-level column aliasing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    expr: String,
    binding: String,
}

impl Marker {
    /// A plain column marker; the binding name is the column name itself.
    pub fn column(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            binding: name.clone(),
            expr: name,
        }
    }

    /// A computed expression returned under an explicit binding name.
    ///
    /// The binding name must be non-empty: result mapping keys off it.
    ///
    /// # Example
    /// ```ignore
    /// Marker::expr("COUNT(*)", "total")
    /// ```
    pub fn expr(sql: impl Into<String>, binding: impl Into<String>) -> Self {
        let binding = binding.into();
        debug_assert!(!binding.is_empty(), "marker binding name must be non-empty");
        Self {
            expr: sql.into(),
            binding,
        }
    }

    /// The literal SQL fragment placed in a SELECT or GROUP BY list.
    pub fn to_sql(&self) -> &str {
        &self.expr
    }

    /// The logical output-column name for result mapping.
    pub fn binding(&self) -> &str {
        &self.binding
    }
}

impl From<&str> for Marker {
    fn from(name: &str) -> Self {
        Marker::column(name)
    }
}
