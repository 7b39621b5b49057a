use mindcare::backend::api::{Api, Method};
use mindcare::backend::services::{CredentialStore, FileCredentialStore};
use mindcare::{Admission, App, Route, SessionState};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

mod common;

#[tokio::test]
async fn navigation_waits_for_resolution() {
    let h = common::signed_in_harness();
    h.transport.respond(Method::Get, "/auth/me", common::user_json());
    let mut app = common::app_with(&h);

    assert_eq!(app.navigate("/app/medications"), Ok(Admission::Placeholder));

    app.session_mut().resolve().await;
    assert_eq!(
        app.navigate("/app/medications"),
        Ok(Admission::Render(Route::Medications))
    );
    assert_eq!(app.navigate("/"), Ok(Admission::Redirect(Route::Dashboard)));
    assert_eq!(
        app.navigate("/app/forum/12?from=list"),
        Ok(Admission::Render(Route::ForumPost { id: 12 }))
    );
}

#[tokio::test]
async fn anonymous_navigation_redirects_private_routes() {
    let h = common::harness();
    let mut app = common::app_with(&h);
    app.session_mut().resolve().await;

    assert_eq!(app.navigate("/dashboard"), Ok(Admission::Redirect(Route::Login)));
    assert_eq!(app.navigate("/app"), Ok(Admission::Redirect(Route::Login)));
    assert_eq!(app.navigate("/signup"), Ok(Admission::Render(Route::Signup)));
    assert!(app.navigate("/app/forum/not-a-number").is_err());
    assert!(app.navigate("/settings").is_err());
}

#[tokio::test]
async fn file_credential_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MindCare").join("credential.json");
    let transport = common::MockTransport::new();
    transport.respond(
        Method::Post,
        "/auth/login",
        json!({"access_token": "persisted", "user": common::user_json()}),
    );
    transport.respond(Method::Get, "/auth/me", common::user_json());

    let mut first = App::new(transport.clone(), Arc::new(FileCredentialStore::new(&path)));
    first.session_mut().resolve().await;
    first
        .session_mut()
        .login("sam@example.org", "secret1")
        .await
        .unwrap();

    let mut second = App::new(transport.clone(), Arc::new(FileCredentialStore::new(&path)));
    second.session_mut().resolve().await;
    assert!(second.session().state().is_authenticated());
    let me = transport.requests().pop().unwrap();
    assert_eq!(me.bearer.as_deref(), Some("persisted"));

    second.session_mut().logout().await;
    assert!(!path.exists());
    assert_eq!(FileCredentialStore::new(&path).load().await, None);
}

#[tokio::test]
async fn bearer_is_attached_once_signed_in() {
    let h = common::harness();
    h.transport.respond(
        Method::Post,
        "/auth/login",
        json!({"access_token": "abc", "user": common::user_json()}),
    );
    h.transport.respond(Method::Get, "/medications", json!([]));
    let mut app = common::app_with(&h);
    app.session_mut().resolve().await;

    let api: &Arc<Api> = app.api();
    assert!(api.medications().await.unwrap().is_empty());
    app.session_mut()
        .login("sam@example.org", "secret1")
        .await
        .unwrap();
    app.medications().mount().await.unwrap();

    let bearers: Vec<Option<String>> = h
        .transport
        .requests()
        .into_iter()
        .map(|request| request.bearer)
        .collect();
    assert_eq!(bearers, vec![None, None, Some("abc".to_string())]);
    assert!(matches!(app.session().state(), SessionState::Authenticated(_)));
}
