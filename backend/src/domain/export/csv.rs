//! RFC 4180 appointment export.

use std::fmt::Write as _;

use crate::domain::AppointmentDetails;
use crate::domain::formatting::format_price;

/// Header row of the appointments export.
pub const CSV_HEADER: &str = "id,date,start,end,client,barber,service,status,price";

/// Render appointments as CSV with CRLF record separators.
pub fn appointments_csv(rows: &[AppointmentDetails]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");
    for row in rows {
        let appointment = &row.appointment;
        let fields = [
            appointment.id.to_string(),
            appointment.starts_at.format("%Y-%m-%d").to_string(),
            appointment.starts_at.format("%H:%M").to_string(),
            appointment.ends_at.format("%H:%M").to_string(),
            row.client_name.clone(),
            row.barber_name.clone(),
            row.service_name.clone(),
            appointment.status.as_str().to_owned(),
            format_price(row.price_cents),
        ];
        for (idx, field) in fields.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            push_field(&mut out, field);
        }
        out.push_str("\r\n");
    }
    out
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    } else {
        out.push_str(field);
    }
}
