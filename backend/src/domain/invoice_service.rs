//! Invoices raised from completed appointments.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{AppointmentRepository, InvoiceRepository, Invoicing, PromotionRepository};
use crate::domain::promotion::best_discount;
use crate::domain::repository_errors::{
    map_appointment_error, map_invoice_error, map_promotion_error,
};
use crate::domain::{
    AppointmentStatus, Error, Invoice, InvoiceTotals, LineItem, NewInvoice, Principal, Role,
};

/// Invoice service implementing the [`Invoicing`] driving port.
#[derive(Clone)]
pub struct InvoiceService<I, A, P> {
    invoices: Arc<I>,
    appointments: Arc<A>,
    promotions: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<I, A, P> InvoiceService<I, A, P> {
    pub fn new(
        invoices: Arc<I>,
        appointments: Arc<A>,
        promotions: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invoices,
            appointments,
            promotions,
            clock,
        }
    }
}

impl<I, A, P> InvoiceService<I, A, P>
where
    I: InvoiceRepository,
{
    async fn load(&self, id: Uuid) -> Result<Invoice, Error> {
        self.invoices
            .find(id)
            .await
            .map_err(map_invoice_error)?
            .ok_or_else(|| Error::not_found(format!("invoice {id} not found")))
    }
}

#[async_trait]
impl<I, A, P> Invoicing for InvoiceService<I, A, P>
where
    I: InvoiceRepository,
    A: AppointmentRepository,
    P: PromotionRepository,
{
    async fn create_for_appointment(
        &self,
        caller: &Principal,
        appointment_id: Uuid,
    ) -> Result<Invoice, Error> {
        let details = self
            .appointments
            .find_details(appointment_id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::not_found(format!("appointment {appointment_id} not found")))?;
        let appointment = &details.appointment;
        caller.require_owner_or_admin(&appointment.barber_id)?;
        if appointment.status != AppointmentStatus::Completed {
            return Err(Error::invalid_request(format!(
                "appointment is {}; only completed appointments can be invoiced",
                appointment.status
            )));
        }

        // Promotions are matched against the time the service was given.
        let live = self
            .promotions
            .list_live(Some(appointment.barber_id), appointment.starts_at)
            .await
            .map_err(map_promotion_error)?;
        let discount = best_discount(&live, &appointment.barber_id, appointment.starts_at);

        let line_items = vec![LineItem {
            description: details.service_name.clone(),
            quantity: 1,
            unit_price_cents: details.price_cents,
        }];
        let totals = InvoiceTotals::compute(&line_items, discount);
        let invoice = self
            .invoices
            .create(&NewInvoice {
                appointment_id: Some(appointment.id),
                client_id: appointment.client_id,
                barber_id: appointment.barber_id,
                line_items,
                totals,
                issued_at: self.clock.utc(),
            })
            .await
            .map_err(map_invoice_error)?;
        info!(
            invoice_id = %invoice.id,
            %appointment_id,
            total_cents = invoice.totals.total_cents,
            "invoice issued"
        );
        Ok(invoice)
    }

    async fn mark_paid(&self, caller: &Principal, id: Uuid) -> Result<Invoice, Error> {
        let invoice = self.load(id).await?;
        caller.require_owner_or_admin(&invoice.barber_id)?;
        invoice
            .ensure_payable()
            .map_err(|err| Error::conflict(err.to_string()))?;
        let paid = self
            .invoices
            .mark_paid(id, self.clock.utc())
            .await
            .map_err(map_invoice_error)?
            .ok_or_else(|| Error::conflict("invoice was modified concurrently"))?;
        info!(invoice_id = %id, "invoice paid");
        Ok(paid)
    }

    async fn list_mine(&self, caller: &Principal) -> Result<Vec<Invoice>, Error> {
        let (client, barber) = match caller.role {
            Role::Admin => (None, None),
            Role::Barber | Role::Stylist => (None, Some(caller.user_id)),
            Role::Client => (Some(caller.user_id), None),
        };
        self.invoices
            .list(client, barber)
            .await
            .map_err(map_invoice_error)
    }

    async fn get(&self, caller: &Principal, id: Uuid) -> Result<Invoice, Error> {
        let invoice = self.load(id).await?;
        caller.require_participant_or_admin(&invoice.participants())?;
        Ok(invoice)
    }
}

#[cfg(test)]
#[path = "invoice_service_tests.rs"]
mod tests;
