//! Convenient imports for typical `pgstmt` usage.
//!
//! This module is intentionally small and focused on the most common APIs so
//! callers can start with:
//!
//! ```ignore
//! use pgstmt::prelude::*;
//! ```

pub use crate::{
    DeleteStatement, GenericClient, JoinClause, JoinKind, Marker, Predicate, SelectStatement,
    StmtError, StmtResult, Value, Values,
};

#[cfg(feature = "pool")]
pub use crate::pool::{create_pool, create_pool_for, create_pool_with_config};

pub use crate::stmt::{delete, select};
