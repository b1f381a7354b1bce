//! iCalendar (RFC 5545) appointment export.

use chrono::{DateTime, Utc};

use crate::domain::AppointmentDetails;

/// `PRODID` of generated calendars.
pub const ICS_PRODUCT_ID: &str = "-//barberbook//appointments//EN";

/// Render one VCALENDAR holding a VEVENT per appointment.
///
/// Lines end in CRLF and fold at 75 octets. Text values escape backslash,
/// semicolon, comma and newlines.
pub fn appointments_ics(rows: &[AppointmentDetails], stamp: DateTime<Utc>) -> String {
    let mut out = String::new();
    line(&mut out, "BEGIN:VCALENDAR");
    line(&mut out, "VERSION:2.0");
    line(&mut out, &format!("PRODID:{ICS_PRODUCT_ID}"));
    line(&mut out, "CALSCALE:GREGORIAN");
    line(&mut out, "METHOD:PUBLISH");
    for row in rows {
        let appointment = &row.appointment;
        line(&mut out, "BEGIN:VEVENT");
        line(&mut out, &format!("UID:{}@barberbook", appointment.id));
        line(&mut out, &format!("DTSTAMP:{}", utc_basic(stamp)));
        line(&mut out, &format!("DTSTART:{}", utc_basic(appointment.starts_at)));
        line(&mut out, &format!("DTEND:{}", utc_basic(appointment.ends_at)));
        line(
            &mut out,
            &format!(
                "SUMMARY:{}",
                escape_text(&format!("{} with {}", row.service_name, row.barber_name))
            ),
        );
        if let Some(notes) = &appointment.notes {
            line(&mut out, &format!("DESCRIPTION:{}", escape_text(notes)));
        }
        line(&mut out, &format!("STATUS:{}", ics_status(row)));
        line(&mut out, "END:VEVENT");
    }
    line(&mut out, "END:VCALENDAR");
    out
}

/// Longest content line, in octets, before folding.
const FOLD_OCTETS: usize = 75;

/// Append `content` as one logical line, folding it with CRLF and a space
/// so no physical line passes [`FOLD_OCTETS`]. Folds never split a UTF-8
/// sequence.
fn line(out: &mut String, content: &str) {
    let mut budget = FOLD_OCTETS;
    let mut used = 0;
    for ch in content.chars() {
        if used + ch.len_utf8() > budget {
            out.push_str("\r\n ");
            // The leading space counts against the continuation line.
            budget = FOLD_OCTETS - 1;
            used = 0;
        }
        out.push(ch);
        used += ch.len_utf8();
    }
    out.push_str("\r\n");
}

fn utc_basic(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

fn ics_status(row: &AppointmentDetails) -> &'static str {
    use crate::domain::AppointmentStatus::{Cancelled, Completed, Confirmed, NoShow, Pending};
    match row.appointment.status {
        Pending => "TENTATIVE",
        Confirmed | Completed => "CONFIRMED",
        Cancelled | NoShow => "CANCELLED",
    }
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Appointment, AppointmentStatus, UserId};
    use chrono::{Duration, TimeZone};
    use insta::assert_snapshot;
    use rstest::rstest;
    use uuid::Uuid;

    fn details(notes: Option<&str>) -> AppointmentDetails {
        let starts_at = Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
            .single()
            .expect("valid instant");
        AppointmentDetails {
            appointment: Appointment {
                id: Uuid::nil(),
                client_id: UserId::from_uuid(Uuid::nil()),
                barber_id: UserId::from_uuid(Uuid::nil()),
                service_id: Uuid::nil(),
                starts_at,
                ends_at: starts_at + Duration::minutes(45),
                status: AppointmentStatus::Confirmed,
                notes: notes.map(str::to_owned),
                created_at: starts_at,
                updated_at: starts_at,
            },
            client_name: "Ada".into(),
            barber_name: "Jo".into(),
            service_name: "Skin fade".into(),
            price_cents: 3000,
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[rstest]
    fn renders_single_event() {
        let ics = appointments_ics(&[details(Some("Low fade; keep length, please\nThanks"))], stamp());
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_snapshot!(ics.replace("\r\n", "\n").trim_end(), @r"
        BEGIN:VCALENDAR
        VERSION:2.0
        PRODID:-//barberbook//appointments//EN
        CALSCALE:GREGORIAN
        METHOD:PUBLISH
        BEGIN:VEVENT
        UID:00000000-0000-0000-0000-000000000000@barberbook
        DTSTAMP:20260301T120000Z
        DTSTART:20260302T093000Z
        DTEND:20260302T101500Z
        SUMMARY:Skin fade with Jo
        DESCRIPTION:Low fade\; keep length\, please\nThanks
        STATUS:CONFIRMED
        END:VEVENT
        END:VCALENDAR
        ");
    }

    #[rstest]
    fn omits_description_without_notes() {
        let ics = appointments_ics(&[details(None)], stamp());
        assert!(!ics.contains("DESCRIPTION"));
    }

    #[rstest]
    fn empty_calendar_has_no_events() {
        let ics = appointments_ics(&[], stamp());
        assert!(!ics.contains("VEVENT"));
    }

    #[rstest]
    #[case("a\\b", "a\\\\b")]
    #[case("x,y;z", "x\\,y\\;z")]
    fn escapes_text(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_text(raw), expected);
    }

    #[rstest]
    fn long_lines_fold_at_75_octets() {
        let notes = "é".repeat(120);
        let ics = appointments_ics(&[details(Some(&notes))], stamp());

        assert!(ics.split("\r\n").all(|physical| physical.len() <= 75));
        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("DESCRIPTION:{notes}\r\n")));
    }

    #[rstest]
    fn short_lines_are_not_folded() {
        let mut out = String::new();
        line(&mut out, &"x".repeat(75));
        assert_eq!(out, format!("{}\r\n", "x".repeat(75)));

        let mut out = String::new();
        line(&mut out, &"x".repeat(76));
        assert_eq!(out, format!("{}\r\n x\r\n", "x".repeat(75)));
    }
}
