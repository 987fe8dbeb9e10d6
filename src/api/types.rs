use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::time::{format_hhmm, parse_hhmm};

/// The five schedulable weekdays, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A wall-clock time block within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// Wire form of a time block: "HH:MM" strings, as the backend stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start_time: String,
    pub end_time: String,
}

impl TimeBlock {
    /// Parse the stored strings back into a range.
    /// Returns None if either endpoint is not a valid "HH:MM" value.
    pub fn to_range(&self) -> Option<TimeRange> {
        let start = parse_hhmm(&self.start_time)?;
        let end = parse_hhmm(&self.end_time)?;
        Some(TimeRange { start, end })
    }
}

impl From<TimeRange> for TimeBlock {
    fn from(range: TimeRange) -> Self {
        Self {
            start_time: format_hhmm(range.start),
            end_time: format_hhmm(range.end),
        }
    }
}

/// Persisted weekly times for one program, keyed by weekday name.
/// A weekday missing from the map has no block set.
pub type WeekTimes = BTreeMap<Weekday, TimeBlock>;

/// Value slot of a program-time update: an object when a block is set,
/// an empty array when the day was cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeBlockValue {
    Set(TimeBlock),
    Cleared([TimeBlock; 0]),
}

impl TimeBlockValue {
    pub fn cleared() -> Self {
        TimeBlockValue::Cleared([])
    }
}

/// Per-day schedule change pushed to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramTimeUpdate {
    #[serde(rename = "type")]
    pub program_id: i64,
    pub name: Weekday,
    pub value: TimeBlockValue,
}

/// Account type chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Instructor,
}

impl UserType {
    /// Path segment for role-scoped endpoints.
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Student => "student",
            UserType::Instructor => "instructor",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "verifyPassword")]
    pub verify_password: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The signed-in account as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub account_type: UserType,
    /// "active", "pending" or "inactive"
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "appointment_id")]
    pub id: i64,
    /// Program name the slot belongs to
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    #[serde(default)]
    pub meeting_url: Option<String>,
}

/// The backend keys the appointment list by role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentsResponse {
    #[serde(default)]
    pub instructor_appointments: Vec<Appointment>,
    #[serde(default)]
    pub student_appointments: Vec<Appointment>,
}

impl AppointmentsResponse {
    pub fn into_list(self) -> Vec<Appointment> {
        let mut list = self.instructor_appointments;
        list.extend(self.student_appointments);
        list
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub appointment_comment: String,
    pub created_at: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest {
    pub appointment_comment: String,
}

/// An instructor program (the context weekly times belong to).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn range(sh: u32, sm: u32, eh: u32, em: u32) -> TimeRange {
        TimeRange::new(
            NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
            NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
        )
    }

    #[test]
    fn cleared_update_serializes_as_empty_array() {
        let update = ProgramTimeUpdate {
            program_id: 7,
            name: Weekday::Tuesday,
            value: TimeBlockValue::cleared(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": 7, "name": "Tuesday", "value": [] })
        );
    }

    #[test]
    fn set_update_serializes_as_object() {
        let update = ProgramTimeUpdate {
            program_id: 7,
            name: Weekday::Monday,
            value: TimeBlockValue::Set(TimeBlock::from(range(9, 0, 10, 30))),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": 7,
                "name": "Monday",
                "value": { "start_time": "09:00", "end_time": "10:30" }
            })
        );
    }

    #[test]
    fn week_times_roundtrip_keyed_by_day_name() {
        let json = serde_json::json!({
            "Monday": { "start_time": "09:00", "end_time": "10:00" },
            "Friday": { "start_time": "13:15", "end_time": "15:45" }
        });
        let times: WeekTimes = serde_json::from_value(json).unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(
            times[&Weekday::Monday].to_range(),
            Some(range(9, 0, 10, 0))
        );
        assert_eq!(
            times[&Weekday::Friday].to_range(),
            Some(range(13, 15, 15, 45))
        );
        assert!(!times.contains_key(&Weekday::Wednesday));
    }

    #[test]
    fn bad_wire_block_yields_no_range() {
        let block = TimeBlock {
            start_time: "9am".into(),
            end_time: "10:00".into(),
        };
        assert_eq!(block.to_range(), None);
    }

    #[test]
    fn weekdays_are_ordered_monday_first() {
        let names: Vec<&str> = Weekday::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        );
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Friday.index(), 4);
    }
}
