//! # pgstmt
//!
//! A parameterized SQL statement builder for PostgreSQL-convention backends.
//!
//! ## Features
//!
//! - **Named bind variables**: predicates reference values by name; the
//!   concrete values arrive in a [`Values`] map at build time, so a statement
//!   is a reusable template
//! - **Deterministic, injection-safe text**: placeholder indices are computed
//!   while writing, never by string replacement, and every caller-supplied
//!   value travels as a bound argument
//! - **Value semantics**: statements and clauses are plain cloneable data;
//!   clone a shared template, adapt the copy, build against your own map
//! - **Safe defaults**: DELETE requires a WHERE predicate; deleting all rows
//!   takes an explicit `Predicate::MatchAll`
//! - **Executor seam**: built statements run through [`GenericClient`]
//!   (clients, transactions, pooled connections), with monitoring attached as
//!   a decorator rather than baked into the core
//!
//! ## Building statements
//!
//! ```ignore
//! use pgstmt::prelude::*;
//!
//! let stmt = select("users")
//!     .column("id")
//!     .filter(Predicate::gt("age", "minAge"));
//!
//! let built = stmt.build(&Values::new().set("minAge", 18))?;
//! assert_eq!(built.sql, "SELECT id FROM users WHERE age > $1");
//!
//! // Execute through any GenericClient:
//! let rows = stmt.query(&client, &Values::new().set("minAge", 21)).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod stmt;
pub mod value;
pub mod writer;

pub use client::GenericClient;
pub use config::{Config, Role, SslMode};
pub use error::{StmtError, StmtResult};
pub use monitor::{
    InstrumentedClient, LoggingMonitor, NoopMonitor, QueryContext, QueryMonitor, QueryResult,
    QueryStats, QueryType, StatsMonitor,
};
pub use stmt::{
    BuiltDelete, BuiltSelect, CompareOp, DeleteStatement, JoinClause, JoinKind, Marker, Predicate,
    SelectStatement, delete, select,
};
pub use value::{Value, Values};
pub use writer::{PlaceholderStyle, QueryWriter};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_for, create_pool_with_config};

pub mod prelude;
