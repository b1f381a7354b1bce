//! Invoices raised for completed appointments.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::promotion::discount_amount;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceError {
    #[error("unknown invoice status '{value}'")]
    UnknownStatus { value: String },
    #[error("invoice is already paid")]
    AlreadyPaid,
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Issued,
    Paid,
}

impl InvoiceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "ISSUED",
            Self::Paid => "PAID",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ISSUED" => Ok(Self::Issued),
            "PAID" => Ok(Self::Paid),
            _ => Err(InvoiceError::UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// One billed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl LineItem {
    pub fn amount_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(i64::from(self.quantity))
    }
}

/// Computed invoice totals. `total = subtotal - discount`, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl InvoiceTotals {
    /// Sum the line items and apply an optional percentage discount.
    ///
    /// # Examples
    /// ```
    /// use barberbook::domain::{InvoiceTotals, LineItem};
    ///
    /// let items = [LineItem { description: "Cut".into(), quantity: 1, unit_price_cents: 2500 }];
    /// let totals = InvoiceTotals::compute(&items, Some(20));
    /// assert_eq!((totals.subtotal_cents, totals.discount_cents, totals.total_cents), (2500, 500, 2000));
    /// ```
    pub fn compute(items: &[LineItem], discount_percent: Option<u8>) -> Self {
        let subtotal_cents = items
            .iter()
            .map(LineItem::amount_cents)
            .fold(0_i64, i64::saturating_add);
        let discount_cents = discount_percent
            .map(|percent| discount_amount(subtotal_cents, percent))
            .unwrap_or(0);
        Self {
            subtotal_cents,
            discount_cents,
            total_cents: (subtotal_cents - discount_cents).max(0),
        }
    }
}

/// A stored invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub client_id: UserId,
    pub barber_id: UserId,
    pub status: InvoiceStatus,
    pub line_items: Vec<LineItem>,
    #[serde(flatten)]
    pub totals: InvoiceTotals,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Invoice {
    pub fn participants(&self) -> [UserId; 2] {
        [self.client_id, self.barber_id]
    }

    /// Only issued invoices can be paid.
    pub fn ensure_payable(&self) -> Result<(), InvoiceError> {
        match self.status {
            InvoiceStatus::Issued => Ok(()),
            InvoiceStatus::Paid => Err(InvoiceError::AlreadyPaid),
        }
    }
}

/// An invoice ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub appointment_id: Option<Uuid>,
    pub client_id: UserId,
    pub barber_id: UserId,
    pub line_items: Vec<LineItem>,
    pub totals: InvoiceTotals,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item(quantity: u32, unit: i64) -> LineItem {
        LineItem {
            description: "Cut".into(),
            quantity,
            unit_price_cents: unit,
        }
    }

    #[rstest]
    #[case(vec![item(1, 2500)], None, (2500, 0, 2500))]
    #[case(vec![item(2, 1000), item(1, 500)], Some(10), (2500, 250, 2250))]
    #[case(vec![item(1, 999)], Some(100), (999, 999, 0))]
    #[case(vec![], Some(50), (0, 0, 0))]
    fn computes_totals(
        #[case] items: Vec<LineItem>,
        #[case] discount: Option<u8>,
        #[case] expected: (i64, i64, i64),
    ) {
        let totals = InvoiceTotals::compute(&items, discount);
        assert_eq!(
            (totals.subtotal_cents, totals.discount_cents, totals.total_cents),
            expected
        );
    }

    #[rstest]
    fn paid_invoices_cannot_be_paid_again() {
        let invoice = Invoice {
            id: Uuid::nil(),
            appointment_id: None,
            client_id: UserId::random(),
            barber_id: UserId::random(),
            status: InvoiceStatus::Paid,
            line_items: vec![item(1, 100)],
            totals: InvoiceTotals::compute(&[item(1, 100)], None),
            issued_at: DateTime::<Utc>::UNIX_EPOCH,
            paid_at: Some(DateTime::<Utc>::UNIX_EPOCH),
        };
        assert_eq!(invoice.ensure_payable(), Err(InvoiceError::AlreadyPaid));
    }

    #[rstest]
    fn serialises_totals_inline() {
        let invoice = Invoice {
            id: Uuid::nil(),
            appointment_id: None,
            client_id: UserId::from_uuid(Uuid::nil()),
            barber_id: UserId::from_uuid(Uuid::nil()),
            status: InvoiceStatus::Issued,
            line_items: vec![],
            totals: InvoiceTotals::compute(&[], None),
            issued_at: DateTime::<Utc>::UNIX_EPOCH,
            paid_at: None,
        };
        let value = serde_json::to_value(&invoice).expect("serialise");
        assert_eq!(value["status"], "ISSUED");
        assert_eq!(value["totalCents"], 0);
        assert!(value.get("totals").is_none());
    }
}
