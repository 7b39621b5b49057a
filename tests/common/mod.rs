// Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mindcare::backend::api::{Api, ApiRequest, Method, Transport};
use mindcare::backend::services::MemoryCredentialStore;
use mindcare::{ApiError, App, Result};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted transport: answers are queued per `(method, path)` and the last one
/// repeats once the queue is down to it. Every request is recorded.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Result<Value>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.push(method, path, Ok(body));
    }

    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: Method, path: &str, answer: Result<Value>) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(answer);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `"METHOD /path"` for each request, in order.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(ApiError::Rejected {
                status: 404,
                message: format!("No mock for {} {}", key.0, key.1),
            }),
        }
    }
}

/// Delays the answer to one chosen request until [`GatedTransport::open`] is called.
///
/// The answer is taken from the inner mock when the request is sent, so it models a
/// response that is already in flight. Other requests pass straight through.
pub struct GatedTransport {
    inner: Arc<MockTransport>,
    held: Mutex<Option<(Method, String)>>,
    gate: Notify,
}

impl GatedTransport {
    pub fn new(inner: Arc<MockTransport>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            held: Mutex::new(None),
            gate: Notify::new(),
        })
    }

    /// Holds the next request to `method path`.
    pub fn hold_next(&self, method: Method, path: &str) {
        *self.held.lock().unwrap() = Some((method, path.to_string()));
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let held = {
            let mut slot = self.held.lock().unwrap();
            let matches = slot
                .as_ref()
                .is_some_and(|(method, path)| *method == request.method && *path == request.path);
            if matches {
                slot.take();
            }
            matches
        };

        let answer = self.inner.send(request).await;
        if held {
            self.gate.notified().await;
        }
        answer
    }
}

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub credentials: Arc<MemoryCredentialStore>,
    pub api: Arc<Api>,
}

pub fn harness_with(credentials: MemoryCredentialStore) -> Harness {
    let transport = MockTransport::new();
    let credentials = Arc::new(credentials);
    let api = Arc::new(Api::new(transport.clone(), credentials.clone()));
    Harness {
        transport,
        credentials,
        api,
    }
}

pub fn harness() -> Harness {
    harness_with(MemoryCredentialStore::new())
}

pub fn signed_in_harness() -> Harness {
    harness_with(MemoryCredentialStore::with_token("valid-token"))
}

pub fn app_with(harness: &Harness) -> App {
    App::new(harness.transport.clone(), harness.credentials.clone())
}

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "username": "sam",
        "email": "sam@example.org",
        "full_name": "Sam Rivera",
        "date_of_birth": null,
        "gender": null,
        "phone": null,
        "emergency_contact": null,
        "medical_history": null,
        "psychiatric_history": null
    })
}

pub fn medication_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "dosage": "50mg",
        "frequency": "Once daily",
        "time_to_take": "08:00",
        "start_date": "2025-01-01",
        "end_date": null,
        "refill_date": "2025-06-05",
        "doctor_name": "Dr. Reyes",
        "doctor_contact": null,
        "notes": null,
        "reminder_enabled": true
    })
}

pub fn appointment_json(id: i64, date: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Appointment {id}"),
        "description": null,
        "doctor_name": "Dr. Okafor",
        "location": "Clinic",
        "appointment_date": date,
        "reminder_time": 60,
        "status": status
    })
}

pub fn post_json(id: i64, category: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "content": "Sharing how my week went.",
        "category": category,
        "author": {"id": 2, "username": "kai"},
        "reply_count": 0,
        "created_at": "2025-05-30T08:00:00",
        "updated_at": "2025-05-30T08:00:00"
    })
}
