//! Appointment scheduling.

use super::resource::{Collection, Editable, ResourceScreen};
use crate::backend::api::client::Api;
use crate::backend::api::models::{Appointment, AppointmentDraft, AppointmentStatus};
use crate::utils::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, Default)]
pub struct Appointments;

pub type AppointmentsScreen = ResourceScreen<Appointments>;

#[async_trait]
impl Collection for Appointments {
    type Scope = ();
    type Items = Vec<Appointment>;
    type Draft = AppointmentDraft;

    fn label(&self) -> &'static str {
        "appointments"
    }

    async fn fetch(&self, api: &Api, _scope: &()) -> Result<Vec<Appointment>> {
        api.appointments().await
    }

    async fn create(&self, api: &Api, _scope: &(), draft: &AppointmentDraft) -> Result<()> {
        api.create_appointment(draft).await.map(drop)
    }
}

#[async_trait]
impl Editable for Appointments {
    async fn update(&self, api: &Api, id: i64, draft: &AppointmentDraft) -> Result<()> {
        api.update_appointment(id, draft).await.map(drop)
    }

    async fn delete(&self, api: &Api, id: i64) -> Result<()> {
        api.delete_appointment(id).await.map(drop)
    }
}

/// Appointments split for display, each half in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentGroups {
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}

/// Splits on [`Appointment::is_past`] relative to `now`.
pub fn group_appointments(appointments: &[Appointment], now: NaiveDateTime) -> AppointmentGroups {
    let (past, upcoming): (Vec<_>, Vec<_>) = appointments
        .iter()
        .cloned()
        .partition(|apt| apt.is_past(now));
    AppointmentGroups { upcoming, past }
}

impl ResourceScreen<Appointments> {
    pub fn grouped(&self, now: NaiveDateTime) -> AppointmentGroups {
        group_appointments(&self.items(), now)
    }

    /// Marks an appointment completed, cancelled or scheduled, then refetches.
    pub async fn set_status(&self, id: i64, status: AppointmentStatus) -> Result<()> {
        let result = self
            .api()
            .set_appointment_status(id, status)
            .await
            .map(drop);
        self.run_mutation("change status of", result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apt(id: i64, date: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id,
            title: format!("Visit {id}"),
            description: None,
            doctor_name: Some("Dr. Reyes".to_string()),
            location: None,
            appointment_date: NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S").unwrap(),
            reminder_time: 60,
            status,
        }
    }

    #[test]
    fn groups_by_time_and_status() {
        let now = NaiveDateTime::parse_from_str("2025-06-01T12:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let list = vec![
            apt(1, "2025-05-01T10:00:00", AppointmentStatus::Scheduled),
            apt(2, "2025-07-01T10:00:00", AppointmentStatus::Scheduled),
            apt(3, "2025-05-01T10:00:00", AppointmentStatus::Completed),
        ];

        let groups = group_appointments(&list, now);
        let upcoming: Vec<i64> = groups.upcoming.iter().map(|a| a.id).collect();
        let past: Vec<i64> = groups.past.iter().map(|a| a.id).collect();
        assert_eq!(upcoming, vec![2]);
        assert_eq!(past, vec![1, 3]);
    }

    #[test]
    fn exact_now_is_upcoming() {
        let now = NaiveDateTime::parse_from_str("2025-06-01T12:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let groups = group_appointments(
            &[apt(5, "2025-06-01T12:00:00", AppointmentStatus::Scheduled)],
            now,
        );
        assert_eq!(groups.upcoming.len(), 1);
        assert!(groups.past.is_empty());
    }
}
