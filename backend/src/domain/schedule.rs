//! Weekly availability templates and bookable slot computation.
//!
//! Providers publish at most one working window per weekday. Windows are
//! interpreted in UTC; a booking must start and end on the same UTC date as
//! the window it falls into.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::formatting::parse_time_of_day;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Errors raised while validating availability windows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleValidationError {
    #[error("day of week must be between 0 (Sunday) and 6 (Saturday), got {value}")]
    InvalidDay { value: i64 },
    #[error("window on {day} must start before it ends ({start} >= {end})")]
    EmptyWindow {
        day: DayOfWeek,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    #[error("more than one window supplied for {day}")]
    DuplicateDay { day: DayOfWeek },
}

/// Day of the week, numbered from Sunday = 0 in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// All days in storage order.
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Storage index, Sunday = 0.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Look up a day from its storage index.
    pub fn from_index(value: i64) -> Result<Self, ScheduleValidationError> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(ScheduleValidationError::InvalidDay { value })
    }

    /// The weekday of a calendar date.
    pub fn of_date(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Sun => Self::Sunday,
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        };
        f.write_str(name)
    }
}

/// Wall-clock time within a day, stored as minutes since midnight.
///
/// Serialises as `HH:MM` and deserialises through
/// [`parse_time_of_day`](crate::domain::formatting::parse_time_of_day), so
/// JSON payloads may use either 24-hour or 12-hour notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self(0);

    /// Build from minutes since midnight; `None` when outside the day.
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Build from an hour (0-23) and minute (0-59).
    pub const fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    pub const fn minutes(self) -> u16 {
        self.0
    }

    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Render in 12-hour notation, e.g. `9:05 AM`.
    ///
    /// # Examples
    /// ```
    /// use barberbook::domain::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::from_hm(0, 30).unwrap().to_12h(), "12:30 AM");
    /// assert_eq!(TimeOfDay::from_hm(17, 5).unwrap().to_12h(), "5:05 PM");
    /// ```
    pub fn to_12h(self) -> String {
        let suffix = if self.hour() < 12 { "AM" } else { "PM" };
        let hour = match self.hour() % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour}:{:02} {suffix}", self.minute())
    }

    /// Combine with a calendar date as a UTC instant.
    pub fn on(self, date: NaiveDate) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or(NaiveTime::MIN);
        date.and_time(time).and_utc()
    }

    /// Time of day of a UTC instant, truncated to the minute.
    pub fn of_instant(instant: DateTime<Utc>) -> Self {
        let time = instant.time();
        // hour() < 24 and minute() < 60, so the total always fits.
        Self(u16::try_from(time.hour() * 60 + time.minute()).unwrap_or(0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

/// One working window in a provider's weekly template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    day_of_week: DayOfWeek,
    start: TimeOfDay,
    end: TimeOfDay,
}

impl AvailabilityWindow {
    /// Validate that the window is non-empty.
    pub fn new(
        day_of_week: DayOfWeek,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, ScheduleValidationError> {
        if start >= end {
            return Err(ScheduleValidationError::EmptyWindow {
                day: day_of_week,
                start,
                end,
            });
        }
        Ok(Self {
            day_of_week,
            start,
            end,
        })
    }

    pub const fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    pub const fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Whether `[starts_at, ends_at)` lies inside this window.
    ///
    /// Both instants must fall on the same UTC date, and that date must be
    /// this window's weekday.
    pub fn contains(&self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> bool {
        let date = starts_at.date_naive();
        if DayOfWeek::of_date(date) != self.day_of_week || ends_at <= starts_at {
            return false;
        }
        starts_at >= self.start.on(date) && ends_at <= self.end.on(date)
    }
}

/// Validate a full weekly template: at most one window per day.
///
/// The returned template is sorted by day.
pub fn validate_weekly_template(
    mut windows: Vec<AvailabilityWindow>,
) -> Result<Vec<AvailabilityWindow>, ScheduleValidationError> {
    windows.sort_by_key(AvailabilityWindow::day_of_week);
    if let Some(pair) = windows
        .windows(2)
        .find(|pair| pair[0].day_of_week == pair[1].day_of_week)
    {
        return Err(ScheduleValidationError::DuplicateDay {
            day: pair[0].day_of_week,
        });
    }
    Ok(windows)
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// A bookable time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Compute open slots for `date`.
///
/// Slots start at the window's opening time and step by `duration_minutes`
/// while they still fit inside the window. Slots overlapping any `busy`
/// interval, or starting at or before `now`, are dropped.
pub fn open_slots(
    template: &[AvailabilityWindow],
    date: NaiveDate,
    duration_minutes: u32,
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
    now: DateTime<Utc>,
) -> Vec<Slot> {
    let day = DayOfWeek::of_date(date);
    let Some(window) = template.iter().find(|w| w.day_of_week == day) else {
        return Vec::new();
    };
    if duration_minutes == 0 {
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(duration_minutes));
    let close = window.end.on(date);
    let mut cursor = window.start.on(date);
    let mut slots = Vec::new();
    while cursor + step <= close {
        let slot = Slot {
            starts_at: cursor,
            ends_at: cursor + step,
        };
        let taken = busy
            .iter()
            .any(|(start, end)| overlaps(slot.starts_at, slot.ends_at, *start, *end));
        if !taken && slot.starts_at > now {
            slots.push(slot);
        }
        cursor += step;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn tod(h: u16, m: u16) -> TimeOfDay {
        TimeOfDay::from_hm(h, m).expect("valid time")
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        // 2026-03-02 is a Monday.
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0)
            .single()
            .expect("valid instant")
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    #[fixture]
    fn template() -> Vec<AvailabilityWindow> {
        vec![
            AvailabilityWindow::new(DayOfWeek::Monday, tod(9, 0), tod(11, 0)).expect("window"),
            AvailabilityWindow::new(DayOfWeek::Wednesday, tod(12, 0), tod(18, 0)).expect("window"),
        ]
    }

    #[rstest]
    #[case(0, DayOfWeek::Sunday)]
    #[case(6, DayOfWeek::Saturday)]
    fn day_index_round_trips(#[case] idx: i64, #[case] day: DayOfWeek) {
        assert_eq!(DayOfWeek::from_index(idx).expect("valid day"), day);
        assert_eq!(i64::from(day.index()), idx);
    }

    #[rstest]
    #[case(-1)]
    #[case(7)]
    fn rejects_out_of_range_day(#[case] idx: i64) {
        assert_eq!(
            DayOfWeek::from_index(idx),
            Err(ScheduleValidationError::InvalidDay { value: idx })
        );
    }

    #[rstest]
    fn window_must_not_be_empty() {
        let err = AvailabilityWindow::new(DayOfWeek::Friday, tod(10, 0), tod(10, 0))
            .expect_err("empty window");
        assert!(matches!(err, ScheduleValidationError::EmptyWindow { .. }));
    }

    #[rstest]
    fn weekly_template_rejects_duplicate_days() {
        let windows = vec![
            AvailabilityWindow::new(DayOfWeek::Monday, tod(9, 0), tod(12, 0)).expect("window"),
            AvailabilityWindow::new(DayOfWeek::Monday, tod(13, 0), tod(17, 0)).expect("window"),
        ];
        assert_eq!(
            validate_weekly_template(windows),
            Err(ScheduleValidationError::DuplicateDay {
                day: DayOfWeek::Monday
            })
        );
    }

    #[rstest]
    fn weekly_template_is_sorted_by_day(template: Vec<AvailabilityWindow>) {
        let reversed: Vec<_> = template.iter().rev().copied().collect();
        let sorted = validate_weekly_template(reversed).expect("valid template");
        assert_eq!(sorted, template);
    }

    #[rstest]
    #[case(at(9, 0), at(9, 30), true)]
    #[case(at(10, 30), at(11, 0), true)]
    #[case(at(8, 30), at(9, 30), false)]
    #[case(at(10, 45), at(11, 15), false)]
    fn window_containment(
        template: Vec<AvailabilityWindow>,
        #[case] start: DateTime<Utc>,
        #[case] end: DateTime<Utc>,
        #[case] expected: bool,
    ) {
        assert_eq!(template[0].contains(start, end), expected);
    }

    #[rstest]
    fn window_rejects_other_weekday(template: Vec<AvailabilityWindow>) {
        // Wednesday window, Monday booking.
        assert!(!template[1].contains(at(13, 0), at(13, 30)));
    }

    #[rstest]
    fn overlap_is_half_open() {
        assert!(overlaps(at(9, 0), at(9, 30), at(9, 15), at(9, 45)));
        assert!(!overlaps(at(9, 0), at(9, 30), at(9, 30), at(10, 0)));
    }

    #[rstest]
    fn open_slots_step_by_duration(template: Vec<AvailabilityWindow>) {
        let slots = open_slots(&template, monday(), 30, &[], at(0, 0));
        let starts: Vec<_> = slots.iter().map(|s| TimeOfDay::of_instant(s.starts_at)).collect();
        assert_eq!(starts, vec![tod(9, 0), tod(9, 30), tod(10, 0), tod(10, 30)]);
    }

    #[rstest]
    fn open_slots_skip_busy_and_past(template: Vec<AvailabilityWindow>) {
        let busy = [(at(10, 0), at(10, 45))];
        let slots = open_slots(&template, monday(), 30, &busy, at(9, 0));
        let starts: Vec<_> = slots.iter().map(|s| TimeOfDay::of_instant(s.starts_at)).collect();
        assert_eq!(starts, vec![tod(9, 30)]);
    }

    #[rstest]
    fn open_slots_drop_partial_tail(template: Vec<AvailabilityWindow>) {
        let slots = open_slots(&template, monday(), 45, &[], at(0, 0));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].ends_at, at(10, 30));
    }

    #[rstest]
    fn no_window_means_no_slots(template: Vec<AvailabilityWindow>) {
        let tuesday = NaiveDate::from_ymd_opt(2026, 3, 3).expect("valid date");
        assert!(open_slots(&template, tuesday, 30, &[], at(0, 0)).is_empty());
    }

    #[rstest]
    fn time_of_day_serialises_as_hh_mm() {
        let json = serde_json::to_string(&tod(7, 5)).expect("serialise");
        assert_eq!(json, "\"07:05\"");
        let parsed: TimeOfDay = serde_json::from_str("\"7:05 pm\"").expect("deserialise");
        assert_eq!(parsed, tod(19, 5));
    }
}
