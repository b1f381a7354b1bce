//! File renderings of appointments: CSV for spreadsheets, iCalendar for
//! calendar apps.

mod csv;
mod ics;

pub use csv::{CSV_HEADER, appointments_csv};
pub use ics::{ICS_PRODUCT_ID, appointments_ics};
