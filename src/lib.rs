//! Conditional SQL templating for PostgreSQL clients.
//!
//! Templates are plain SQL with `#if` / `#elif` / `#else` / `#endif`
//! directive lines. Conditions come from a whitelist grammar (parsed in the
//! `condexpr` crate) and are evaluated against named parameters, so only
//! registered template text can ever reach the driver. Select-list columns
//! may carry bilingual `"En|Ko"` aliases which are extracted per render and
//! applied to fetched rows.

pub mod alias;
pub mod client;
pub mod condition;
pub mod error;
pub mod params;
pub mod settings;
pub mod template;

pub use alias::{AliasEntry, Language};
pub use client::{
    Connection, ConnectionSource, ExecOutcome, Executor, QueryClient, ReadOptions, Row,
    TransactionScope, UpdateOutcome,
};
pub use error::{ClientError, EvalError, ExecutionError, ParseError, RegistryError, RenderError};
pub use params::{Params, Value};
pub use settings::ClientSettings;
pub use template::{Rendered, TemplateRegistry};
