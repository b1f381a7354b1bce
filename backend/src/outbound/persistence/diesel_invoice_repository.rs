//! PostgreSQL-backed `InvoiceRepository`. Line items are stored as JSONB.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{InvoicePersistenceError, InvoiceRepository};
use crate::domain::{Invoice, InvoiceStatus, NewInvoice, UserId};

use super::error_mapping::{Violation, impl_persistence_error_from, violation};
use super::models::InvoiceRow;
use super::pool::DbPool;
use super::schema::invoices;

impl_persistence_error_from!(InvoicePersistenceError);

/// Diesel implementation of [`InvoiceRepository`].
#[derive(Clone)]
pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn new_row(invoice: &NewInvoice) -> Result<InvoiceRow, InvoicePersistenceError> {
    let line_items = serde_json::to_value(&invoice.line_items)
        .map_err(|err| InvoicePersistenceError::query(format!("line items: {err}")))?;
    Ok(InvoiceRow {
        id: Uuid::new_v4(),
        appointment_id: invoice.appointment_id,
        client_id: *invoice.client_id.as_uuid(),
        barber_id: *invoice.barber_id.as_uuid(),
        status: InvoiceStatus::Issued.as_str().to_owned(),
        line_items,
        subtotal_cents: invoice.totals.subtotal_cents,
        discount_cents: invoice.totals.discount_cents,
        total_cents: invoice.totals.total_cents,
        issued_at: invoice.issued_at,
        paid_at: None,
    })
}

#[async_trait]
impl InvoiceRepository for DieselInvoiceRepository {
    async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, InvoicePersistenceError> {
        let row = new_row(invoice)?;
        let mut conn = self.pool.get().await?;
        let stored: InvoiceRow = diesel::insert_into(invoices::table)
            .values(&row)
            .returning(InvoiceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match violation(&err) {
                Some(Violation::Unique) => {
                    InvoicePersistenceError::duplicate("appointment is already invoiced")
                }
                _ => err.into(),
            })?;
        Ok(stored.into_domain()?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Invoice>, InvoicePersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<InvoiceRow> = invoices::table
            .find(id)
            .select(InvoiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(InvoiceRow::into_domain).transpose()?)
    }

    async fn list(
        &self,
        client_id: Option<UserId>,
        barber_id: Option<UserId>,
    ) -> Result<Vec<Invoice>, InvoicePersistenceError> {
        let mut conn = self.pool.get().await?;
        let mut query = invoices::table
            .select(InvoiceRow::as_select())
            .order((invoices::issued_at.desc(), invoices::id.desc()))
            .into_boxed();
        if let Some(client_id) = client_id {
            query = query.filter(invoices::client_id.eq(*client_id.as_uuid()));
        }
        if let Some(barber_id) = barber_id {
            query = query.filter(invoices::barber_id.eq(*barber_id.as_uuid()));
        }
        let rows: Vec<InvoiceRow> = query.load(&mut conn).await?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(Into::into))
            .collect()
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Invoice>, InvoicePersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<InvoiceRow> = diesel::update(
            invoices::table
                .filter(invoices::id.eq(id))
                .filter(invoices::status.eq(InvoiceStatus::Issued.as_str())),
        )
        .set((
            invoices::status.eq(InvoiceStatus::Paid.as_str()),
            invoices::paid_at.eq(at),
        ))
        .returning(InvoiceRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        Ok(row.map(InvoiceRow::into_domain).transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::{InvoiceTotals, LineItem};

    #[rstest]
    fn new_invoices_start_issued_with_json_line_items() {
        let invoice = NewInvoice {
            appointment_id: None,
            client_id: UserId::random(),
            barber_id: UserId::random(),
            line_items: vec![LineItem {
                description: "Beard trim".into(),
                quantity: 2,
                unit_price_cents: 1500,
            }],
            totals: InvoiceTotals {
                subtotal_cents: 3000,
                discount_cents: 300,
                total_cents: 2700,
            },
            issued_at: DateTime::<Utc>::UNIX_EPOCH,
        };

        let row = new_row(&invoice).expect("serialisable");

        assert_eq!(row.status, "ISSUED");
        assert_eq!(row.total_cents, 2700);
        assert_eq!(row.line_items[0]["quantity"], 2);
        assert_eq!(row.paid_at, None);
    }
}
