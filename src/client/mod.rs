//! Client facade over the rendering engine and the driver seam.
//!
//! The engine renders SQL and alias maps; everything that touches the wire
//! lives behind the [`Executor`] / [`Connection`] / [`ConnectionSource`]
//! traits, so the facade itself never opens a socket.

pub mod row;

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::alias::{self, Language};
use crate::error::{ClientError, ExecutionError, RenderError};
use crate::params::Params;
use crate::settings::ClientSettings;
use crate::template::{Rendered, TemplateRegistry};

pub use row::Row;

/// Parameterized execution. Implementations must bind `params` through the
/// driver's own API; the SQL text they receive never contains values.
pub trait Executor {
    fn query(&mut self, sql: &str, params: &Params) -> Result<Vec<Row>, ExecutionError>;
    fn execute(&mut self, sql: &str, params: &Params) -> Result<ExecOutcome, ExecutionError>;
}

/// Result of a single non-query statement.
#[derive(Debug, Clone, Default)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// The `RETURNING` row, when the statement produced one.
    pub returning: Option<Row>,
}

/// A connection that can scope work in a transaction.
pub trait Connection: Executor {
    fn begin(&mut self) -> Result<(), ExecutionError>;
    fn commit(&mut self) -> Result<(), ExecutionError>;
    fn rollback(&mut self) -> Result<(), ExecutionError>;
}

/// Hands out connections; pooling and release-on-drop are the
/// implementation's concern.
pub trait ConnectionSource {
    type Conn: Connection;
    fn acquire(&self) -> Result<Self::Conn, ExecutionError>;
}

/// Scoped transaction: `begin` on entry, explicit [`commit`] on the happy
/// path, rollback on drop for every other exit.
///
/// [`commit`]: TransactionScope::commit
pub struct TransactionScope<C: Connection> {
    conn: C,
    finished: bool,
}

impl<C: Connection> TransactionScope<C> {
    pub fn begin(mut conn: C) -> Result<Self, ExecutionError> {
        conn.begin()?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    pub fn commit(mut self) -> Result<(), ExecutionError> {
        let result = self.conn.commit();
        // a failed commit still rolls back on drop
        self.finished = result.is_ok();
        result
    }
}

impl<C: Connection> Deref for TransactionScope<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.conn
    }
}

impl<C: Connection> DerefMut for TransactionScope<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.conn
    }
}

impl<C: Connection> Drop for TransactionScope<C> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!("transaction scope exited without commit, rolling back");
            if let Err(e) = self.conn.rollback() {
                log::warn!("rollback failed: {e}");
            }
        }
    }
}

/// Per-read options, mirroring the read API of the original client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Relabel aliased columns into this language.
    pub language: Option<Language>,
    /// Convert column names to camelCase after relabeling.
    pub camelize: bool,
}

/// Outcome of one statement in an update batch.
#[derive(Debug, Clone, Default)]
pub struct UpdateOutcome {
    pub rows_affected: u64,
    /// Values captured from the statement's `RETURNING` row, if any.
    pub returned: HashMap<String, crate::params::Value>,
}

pub struct QueryClient<S: ConnectionSource> {
    source: S,
    registry: TemplateRegistry,
    settings: ClientSettings,
}

impl<S: ConnectionSource> QueryClient<S> {
    pub fn new(source: S, registry: TemplateRegistry, settings: ClientSettings) -> Self {
        Self {
            source,
            registry,
            settings,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Execute a read template and return all rows, relabeled and key-cased
    /// per `opts`.
    pub fn read_rows(
        &self,
        name: &str,
        params: &Params,
        opts: ReadOptions,
    ) -> Result<Vec<Row>, ClientError> {
        let rendered = self.render(name, params)?;
        let mut conn = self.source.acquire()?;
        let mut rows = conn.query(&rendered.sql, params)?;

        if self.settings.use_en_ko_column_alias {
            if let Some(language) = opts.language {
                for row in &mut rows {
                    row::relabel(row, &rendered.aliases, language);
                }
            }
        }
        if opts.camelize {
            for row in &mut rows {
                row::camelize_columns(row);
            }
        }
        Ok(rows)
    }

    /// First row of a read template, or `None`.
    pub fn read_row(
        &self,
        name: &str,
        params: &Params,
        opts: ReadOptions,
    ) -> Result<Option<Row>, ClientError> {
        let mut rows = self.read_rows(name, params, opts)?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Execute a batch of update templates inside one transaction. The
    /// first driver error aborts the batch: remaining statements are not
    /// executed and the scope rolls back on drop.
    pub fn updates(&self, batch: &[(&str, Params)]) -> Result<Vec<UpdateOutcome>, ClientError> {
        let conn = self.source.acquire()?;
        let mut scope = TransactionScope::begin(conn)?;

        let mut outcomes = Vec::with_capacity(batch.len());
        for (name, params) in batch {
            let rendered = self.render(name, params)?;
            let outcome = scope.execute(&rendered.sql, params)?;
            outcomes.push(UpdateOutcome {
                rows_affected: outcome.rows_affected,
                returned: outcome.returning.map(Row::into_map).unwrap_or_default(),
            });
        }

        scope.commit()?;
        Ok(outcomes)
    }

    /// Single-statement form of [`updates`](QueryClient::updates).
    pub fn update(&self, name: &str, params: &Params) -> Result<u64, ClientError> {
        let outcomes = self.updates(&[(name, params.clone())])?;
        Ok(outcomes.first().map(|o| o.rows_affected).unwrap_or(0))
    }

    fn render(&self, name: &str, params: &Params) -> Result<Rendered, RenderError> {
        if self.settings.use_conditional {
            self.registry.render_with_aliases(name, params)
        } else {
            // preprocessing disabled: the registered text goes out as-is
            let raw = self
                .registry
                .raw(name)
                .ok_or_else(|| RenderError::UnknownTemplate(name.to_owned()))?;
            Ok(Rendered {
                sql: raw.to_owned(),
                aliases: alias::extract(raw),
            })
        }
    }
}
