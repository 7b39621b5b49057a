//! Dashboard aggregate.

use crate::backend::api::client::Api;
use crate::backend::api::models::DashboardStats;
use crate::utils::Result;
use chrono::{NaiveTime, Timelike};
use log::{debug, error};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Read-only snapshot of `/dashboard/stats`, fetched on mount only.
#[derive(Clone)]
pub struct DashboardScreen {
    api: Arc<Api>,
    snapshot: Arc<Mutex<Option<DashboardStats>>>,
    generation: Arc<AtomicU64>,
}

impl DashboardScreen {
    pub fn new(api: Arc<Api>) -> Self {
        Self {
            api,
            snapshot: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<DashboardStats>> {
        self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetches the snapshot. A response from an older mount is dropped.
    pub async fn mount(&self) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.dashboard_stats().await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale dashboard response");
            return Ok(());
        }

        match result {
            Ok(stats) => {
                *self.lock() = Some(stats);
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch stats: {e}");
                Err(e)
            }
        }
    }

    pub fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// `None` until the first successful fetch.
    pub fn stats(&self) -> Option<DashboardStats> {
        self.lock().clone()
    }
}

/// Greeting for the local time of day.
pub fn greeting(time: NaiveTime) -> &'static str {
    match time.hour() {
        0..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        _ => "Good Evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::api::transport::{ApiRequest, Transport};
    use crate::backend::services::credentials::MemoryCredentialStore;
    use crate::utils::ApiError;
    use async_trait::async_trait;
    use serde_json::Value;

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn send(&self, _request: ApiRequest) -> Result<Value> {
            Err(ApiError::Network("offline".to_string()))
        }
    }

    #[test]
    fn snapshot_survives_poisoned_lock() {
        let api = Api::new(Arc::new(Offline), Arc::new(MemoryCredentialStore::new()));
        let screen = DashboardScreen::new(Arc::new(api));
        *screen.lock() = Some(DashboardStats {
            total_medications: 3,
            ..DashboardStats::default()
        });

        let shared = Arc::clone(&screen.snapshot);
        let _ = std::thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("writer died");
        })
        .join();

        assert!(screen.snapshot.is_poisoned());
        assert_eq!(screen.stats().map(|stats| stats.total_medications), Some(3));
    }

    #[test]
    fn greeting_by_hour() {
        let at = |h| NaiveTime::from_hms_opt(h, 30, 0).unwrap();
        assert_eq!(greeting(at(6)), "Good Morning");
        assert_eq!(greeting(at(11)), "Good Morning");
        assert_eq!(greeting(at(12)), "Good Afternoon");
        assert_eq!(greeting(at(17)), "Good Afternoon");
        assert_eq!(greeting(at(18)), "Good Evening");
    }
}
