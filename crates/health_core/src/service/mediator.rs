//! Request dispatch through the behavior pipeline.
//!
//! # Responsibility
//! - Bind each request type to its handler and validator at compile time.
//! - Serialize access to the shared connection and hand handlers a fresh
//!   unit of work.
//!
//! # Invariants
//! - Pipeline order: logging -> validation -> handler -> failure notification.
//! - The connection lock is held only while the handler runs.
//! - A lock poisoned by a panicking handler is recovered; the panic already
//!   dropped that handler's unit of work, rolling back its transaction.

use crate::repo::interceptors::Interceptors;
use crate::repo::unit_of_work::{SqliteUnitOfWork, UnitOfWork};
use crate::service::behaviors::{log_request, notify_failure, validate_request};
use crate::service::validation::ValidationErrors;
use crate::service::ServiceResult;
use log::warn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// A command or query with a statically bound handler and validator.
pub trait Request: Sized + Send + 'static {
    type Response: Send + 'static;
    type Handler: RequestHandler<Self> + Default;
    type Validator: Validator<Self> + Default;
    /// Stable request name used in log lines.
    const NAME: &'static str;
}

/// Executes one request against a unit of work.
pub trait RequestHandler<R: Request> {
    fn handle(&self, uow: &mut dyn UnitOfWork, request: R) -> ServiceResult<R::Response>;
}

/// Produces field errors for a request; empty means valid.
pub trait Validator<R> {
    fn validate(&self, request: &R) -> ValidationErrors;
}

/// Validator for requests without input rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoValidation;

impl<R> Validator<R> for NoValidation {
    fn validate(&self, _request: &R) -> ValidationErrors {
        ValidationErrors::new()
    }
}

/// Synchronous request dispatcher over one shared SQLite connection.
#[derive(Clone)]
pub struct Mediator {
    conn: Arc<Mutex<Connection>>,
    interceptors: Arc<Interceptors>,
}

impl Mediator {
    /// Uses the default audit and case-insensitive search interceptors.
    pub fn new(conn: Connection) -> Self {
        Self::with_interceptors(conn, Interceptors::default())
    }

    pub fn with_interceptors(conn: Connection, interceptors: Interceptors) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            interceptors: Arc::new(interceptors),
        }
    }

    /// Runs `request` through the pipeline and returns the handler outcome.
    pub fn send<R: Request>(&self, request: R) -> ServiceResult<R::Response> {
        let result = log_request(R::NAME, || {
            validate_request(&request)?;
            self.dispatch(request)
        });

        if let Err(err) = &result {
            notify_failure(R::NAME, err);
        }
        result
    }

    fn dispatch<R: Request>(&self, request: R) -> ServiceResult<R::Response> {
        let conn = self.conn.lock().unwrap_or_else(|poisoned| {
            warn!(
                "event=connection_lock_recovered module=service status=warn request={}",
                R::NAME
            );
            self.conn.clear_poison();
            poisoned.into_inner()
        });
        let mut uow = SqliteUnitOfWork::new(&conn, Arc::clone(&self.interceptors));
        R::Handler::default().handle(&mut uow, request)
    }
}
