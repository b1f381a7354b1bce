//! Driving port for invoices.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Invoice, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Invoicing: Send + Sync {
    /// Raise the invoice for a COMPLETED appointment.
    async fn create_for_appointment(&self, caller: &Principal, appointment_id: Uuid) -> Result<Invoice, Error>;

    async fn mark_paid(&self, caller: &Principal, id: Uuid) -> Result<Invoice, Error>;

    async fn list_mine(&self, caller: &Principal) -> Result<Vec<Invoice>, Error>;

    async fn get(&self, caller: &Principal, id: Uuid) -> Result<Invoice, Error>;
}
