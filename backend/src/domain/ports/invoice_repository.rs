//! Port for invoice persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Invoice, NewInvoice, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by invoice repository adapters.
    pub enum InvoicePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "invoice repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "invoice repository query failed: {message}",
        /// The appointment already has an invoice.
        Duplicate { message: String } => "invoice already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, InvoicePersistenceError>;

    async fn find(&self, id: Uuid) -> Result<Option<Invoice>, InvoicePersistenceError>;

    /// Newest first. `None` filters match every invoice.
    async fn list(
        &self,
        client_id: Option<UserId>,
        barber_id: Option<UserId>,
    ) -> Result<Vec<Invoice>, InvoicePersistenceError>;

    /// Mark an ISSUED invoice as PAID; `None` when nothing changed.
    async fn mark_paid(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Invoice>, InvoicePersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvoiceRepository;

#[async_trait]
impl InvoiceRepository for FixtureInvoiceRepository {
    async fn create(&self, _invoice: &NewInvoice) -> Result<Invoice, InvoicePersistenceError> {
        Err(InvoicePersistenceError::connection("no database configured"))
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Invoice>, InvoicePersistenceError> {
        Ok(None)
    }

    async fn list(
        &self,
        _client_id: Option<UserId>,
        _barber_id: Option<UserId>,
    ) -> Result<Vec<Invoice>, InvoicePersistenceError> {
        Ok(Vec::new())
    }

    async fn mark_paid(
        &self,
        _id: Uuid,
        _at: DateTime<Utc>,
    ) -> Result<Option<Invoice>, InvoicePersistenceError> {
        Ok(None)
    }
}
