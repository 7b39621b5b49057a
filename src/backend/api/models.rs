//! Records exchanged with the MindCare API.

use crate::invalid;
use crate::utils::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Required-field checks performed before a form is submitted.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid!("{} is required", field));
    }
    Ok(())
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub psychiatric_history: Option<String>,
}

impl Identity {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Overwrites every field that is set in `fields`.
    pub fn merge(&mut self, fields: &ProfileFields) {
        let ProfileFields {
            full_name,
            date_of_birth,
            gender,
            phone,
            emergency_contact,
            medical_history,
            psychiatric_history,
        } = fields;

        if let Some(value) = full_name {
            self.full_name = Some(value.clone());
        }
        if let Some(value) = date_of_birth {
            self.date_of_birth = Some(*value);
        }
        if let Some(value) = gender {
            self.gender = Some(value.clone());
        }
        if let Some(value) = phone {
            self.phone = Some(value.clone());
        }
        if let Some(value) = emergency_contact {
            self.emergency_contact = Some(value.clone());
        }
        if let Some(value) = medical_history {
            self.medical_history = Some(value.clone());
        }
        if let Some(value) = psychiatric_history {
            self.psychiatric_history = Some(value.clone());
        }
    }
}

/// Editable profile fields. Unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psychiatric_history: Option<String>,
}

impl From<&Identity> for ProfileFields {
    fn from(identity: &Identity) -> Self {
        Self {
            full_name: identity.full_name.clone(),
            date_of_birth: identity.date_of_birth,
            gender: identity.gender.clone(),
            phone: identity.phone.clone(),
            emergency_contact: identity.emergency_contact.clone(),
            medical_history: identity.medical_history.clone(),
            psychiatric_history: identity.psychiatric_history.clone(),
        }
    }
}

impl Validate for ProfileFields {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        require("Email", &self.email)?;
        require("Password", &self.password)
    }
}

/// Minimum password length accepted by the sign-up form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up form, including the confirmation entry that never leaves the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
}

impl Validate for Registration {
    fn validate(&self) -> Result<()> {
        require("Username", &self.username)?;
        require("Email", &self.email)?;
        if self.password != self.confirm_password {
            return Err(invalid!("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        Ok(())
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl From<&Registration> for RegisterRequest {
    fn from(form: &Registration) -> Self {
        Self {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            full_name: form.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: Identity,
}

/// Acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

// Medications

/// Days ahead of the refill date at which a medication is flagged.
pub const REFILL_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub time_to_take: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub refill_date: Option<NaiveDate>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub doctor_contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub reminder_enabled: bool,
}

const fn default_true() -> bool {
    true
}

impl Medication {
    /// True when the refill date falls within the refill window (or has passed).
    pub fn needs_refill(&self, today: NaiveDate) -> bool {
        self.refill_date
            .is_some_and(|date| date <= today + Duration::days(REFILL_WINDOW_DAYS))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationDraft {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub time_to_take: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub refill_date: Option<NaiveDate>,
    pub doctor_name: Option<String>,
    pub doctor_contact: Option<String>,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
}

impl Default for MedicationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            dosage: None,
            frequency: None,
            time_to_take: None,
            start_date: None,
            end_date: None,
            refill_date: None,
            doctor_name: None,
            doctor_contact: None,
            notes: None,
            reminder_enabled: true,
        }
    }
}

impl From<&Medication> for MedicationDraft {
    fn from(med: &Medication) -> Self {
        Self {
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            frequency: med.frequency.clone(),
            time_to_take: med.time_to_take.clone(),
            start_date: med.start_date,
            end_date: med.end_date,
            refill_date: med.refill_date,
            doctor_name: med.doctor_name.clone(),
            doctor_contact: med.doctor_contact.clone(),
            notes: med.notes.clone(),
            reminder_enabled: med.reminder_enabled,
        }
    }
}

impl Validate for MedicationDraft {
    fn validate(&self) -> Result<()> {
        require("Medication name", &self.name)
    }
}

// Appointments

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minutes before an appointment at which the reminder fires by default.
pub const DEFAULT_REMINDER_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub appointment_date: NaiveDateTime,
    #[serde(default = "default_reminder")]
    pub reminder_time: u32,
    #[serde(default)]
    pub status: AppointmentStatus,
}

const fn default_reminder() -> u32 {
    DEFAULT_REMINDER_MINUTES
}

impl Appointment {
    /// Past means the time has gone by or the appointment is no longer scheduled.
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.appointment_date < now || self.status != AppointmentStatus::Scheduled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub title: String,
    pub description: Option<String>,
    pub doctor_name: Option<String>,
    pub location: Option<String>,
    pub appointment_date: Option<NaiveDateTime>,
    pub reminder_time: u32,
    pub status: AppointmentStatus,
}

impl Default for AppointmentDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            doctor_name: None,
            location: None,
            appointment_date: None,
            reminder_time: DEFAULT_REMINDER_MINUTES,
            status: AppointmentStatus::Scheduled,
        }
    }
}

impl From<&Appointment> for AppointmentDraft {
    fn from(apt: &Appointment) -> Self {
        Self {
            title: apt.title.clone(),
            description: apt.description.clone(),
            doctor_name: apt.doctor_name.clone(),
            location: apt.location.clone(),
            appointment_date: Some(apt.appointment_date),
            reminder_time: apt.reminder_time,
            status: apt.status,
        }
    }
}

impl Validate for AppointmentDraft {
    fn validate(&self) -> Result<()> {
        require("Title", &self.title)?;
        if self.appointment_date.is_none() {
            return Err(invalid!("Date & Time is required"));
        }
        Ok(())
    }
}

// Forum

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Anxiety,
    Depression,
    Support,
    Success,
    Resources,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::General,
        Self::Anxiety,
        Self::Depression,
        Self::Support,
        Self::Success,
        Self::Resources,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Anxiety => "anxiety",
            Self::Depression => "depression",
            Self::Support => "support",
            Self::Success => "success",
            Self::Resources => "resources",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Anxiety => "Anxiety",
            Self::Depression => "Depression",
            Self::Support => "Support",
            Self::Success => "Success Stories",
            Self::Resources => "Resources",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::utils::ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| invalid!("Unknown category: {}", s))
    }
}

/// Parses a category filter where `all` (or nothing) means no filter.
pub fn parse_category_filter(value: &str) -> Result<Option<Category>> {
    match value.trim() {
        "" | "all" => Ok(None),
        other => other.parse().map(Some),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Category,
    pub author: Author,
    #[serde(default)]
    pub reply_count: u32,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// A post together with its visible replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumThread {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Category,
    pub author: Author,
    #[serde(default)]
    pub replies: Vec<ForumReply>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumReply {
    pub id: i64,
    pub content: String,
    pub author: Author,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
}

impl Validate for PostDraft {
    fn validate(&self) -> Result<()> {
        require("Title", &self.title)?;
        require("Content", &self.content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyDraft {
    pub content: String,
}

impl Validate for ReplyDraft {
    fn validate(&self) -> Result<()> {
        require("Reply", &self.content)
    }
}

// Dashboard

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_medications: u32,
    #[serde(default)]
    pub upcoming_appointments: Vec<UpcomingAppointment>,
    #[serde(default)]
    pub medications_needing_refill: Vec<RefillReminder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingAppointment {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub appointment_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefillReminder {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub refill_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn appointment(date: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: 1,
            title: "Check-in".to_string(),
            description: None,
            doctor_name: None,
            location: None,
            appointment_date: at(date),
            reminder_time: DEFAULT_REMINDER_MINUTES,
            status,
        }
    }

    #[test]
    fn appointment_past_classification() {
        let now = at("2025-06-01T12:00:00");

        assert!(appointment("2025-05-01T09:00:00", AppointmentStatus::Scheduled).is_past(now));
        assert!(!appointment("2025-07-01T09:00:00", AppointmentStatus::Scheduled).is_past(now));
        assert!(appointment("2025-05-01T09:00:00", AppointmentStatus::Completed).is_past(now));
        assert!(appointment("2025-07-01T09:00:00", AppointmentStatus::Cancelled).is_past(now));
    }

    #[test]
    fn password_mismatch_is_rejected_before_length() {
        let form = Registration {
            username: "sam".to_string(),
            email: "sam@example.org".to_string(),
            password: "abc123".to_string(),
            confirm_password: "abc124".to_string(),
            full_name: String::new(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.message(), "Passwords do not match");

        let short = Registration {
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
            ..form
        };
        assert_eq!(
            short.validate().unwrap_err().message(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn refill_window_is_seven_days() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut med: Medication = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Sertraline",
            "refill_date": "2025-06-08"
        }))
        .unwrap();
        assert!(med.reminder_enabled);
        assert!(med.needs_refill(today));

        med.refill_date = NaiveDate::from_ymd_opt(2025, 6, 9);
        assert!(!med.needs_refill(today));

        med.refill_date = None;
        assert!(!med.needs_refill(today));
    }

    #[test]
    fn merge_only_overwrites_set_fields() {
        let mut identity = Identity {
            id: 1,
            username: "sam".to_string(),
            email: "sam@example.org".to_string(),
            full_name: Some("Sam".to_string()),
            date_of_birth: None,
            gender: None,
            phone: Some("555-0100".to_string()),
            emergency_contact: None,
            medical_history: None,
            psychiatric_history: None,
        };
        identity.merge(&ProfileFields {
            full_name: Some("Sam Doe".to_string()),
            ..ProfileFields::default()
        });
        assert_eq!(identity.full_name.as_deref(), Some("Sam Doe"));
        assert_eq!(identity.phone.as_deref(), Some("555-0100"));
        assert_eq!(identity.display_name(), "Sam Doe");
    }

    #[test]
    fn category_filter_parsing() {
        assert_eq!(parse_category_filter("all").unwrap(), None);
        assert_eq!(parse_category_filter("").unwrap(), None);
        assert_eq!(
            parse_category_filter("anxiety").unwrap(),
            Some(Category::Anxiety)
        );
        assert!(parse_category_filter("gossip").is_err());
        assert_eq!(Category::Success.label(), "Success Stories");
    }

    #[test]
    fn server_timestamps_with_fractions_decode() {
        let post: ForumPost = serde_json::from_value(serde_json::json!({
            "id": 9,
            "title": "Hello",
            "content": "First post",
            "category": "support",
            "author": {"id": 2, "username": "kai"},
            "reply_count": 3,
            "created_at": "2025-05-30T08:15:42.123456",
            "updated_at": "2025-05-30T08:15:42.123456"
        }))
        .unwrap();
        assert_eq!(post.category, Category::Support);
        assert_eq!(post.reply_count, 3);
    }
}
