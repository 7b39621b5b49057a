//! Medication tracking.

use super::resource::{Collection, Editable, ResourceScreen};
use crate::backend::api::client::Api;
use crate::backend::api::models::{Medication, MedicationDraft};
use crate::utils::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, Default)]
pub struct Medications;

pub type MedicationsScreen = ResourceScreen<Medications>;

#[async_trait]
impl Collection for Medications {
    type Scope = ();
    type Items = Vec<Medication>;
    type Draft = MedicationDraft;

    fn label(&self) -> &'static str {
        "medications"
    }

    async fn fetch(&self, api: &Api, _scope: &()) -> Result<Vec<Medication>> {
        api.medications().await
    }

    async fn create(&self, api: &Api, _scope: &(), draft: &MedicationDraft) -> Result<()> {
        api.create_medication(draft).await.map(drop)
    }
}

#[async_trait]
impl Editable for Medications {
    async fn update(&self, api: &Api, id: i64, draft: &MedicationDraft) -> Result<()> {
        api.update_medication(id, draft).await.map(drop)
    }

    async fn delete(&self, api: &Api, id: i64) -> Result<()> {
        api.delete_medication(id).await.map(drop)
    }
}

impl ResourceScreen<Medications> {
    /// Medications whose refill is due within the refill window.
    pub fn needing_refill(&self, today: NaiveDate) -> Vec<Medication> {
        self.items()
            .into_iter()
            .filter(|med| med.needs_refill(today))
            .collect()
    }
}
