//! HTTP surface tests driven through the assembled router

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use campaign_central::core::build_router;
use campaign_central::db::DbService;
use campaign_central::db::models::CampaignStatus;
use campaign_central::db::repository::record_id;
use campaign_central::services::{EmailSender, SendError, WhatsAppSender};
use campaign_central::{Config, ServerState};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct NullEmail;

#[async_trait]
impl EmailSender for NullEmail {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), SendError> {
        Ok(())
    }
}

struct NullWhatsApp;

#[async_trait]
impl WhatsAppSender for NullWhatsApp {
    async fn send(&self, _phone: &str, _body: &str) -> Result<(), SendError> {
        Ok(())
    }
}

async fn test_app(tmp: &tempfile::TempDir) -> (Router, ServerState) {
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let db = DbService::connect(&tmp.path().join("campaign.db"))
        .await
        .unwrap();
    let state = ServerState::with_senders(config, db, Arc::new(NullEmail), Arc::new(NullWhatsApp));
    (build_router(state.clone()), state)
}

async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn json_req(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Register a user with the given role and return a bearer token
async fn login_as(app: &Router, role: &str) -> String {
    let email = format!("{role}@example.com");
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": email,
                "password": "s3cret-pass",
                "full_name": "Test Staff",
                "role": role,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "s3cret-pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(&tmp).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_401_bad_token_is_403() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(&tmp).await;

    let response = app.clone().oneshot(get("/api/vendors")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get_auth("/api/vendors", "garbage.token.here"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_vendor_crud_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(&tmp).await;
    let token = login_as(&app, "admin").await;

    // Create
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/vendors",
            Some(&token),
            json!({ "vendor_code": "V1", "vendor_name": "Acme", "email": "a@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let vendor = body_json(response.into_body()).await;
    let id = vendor["id"].as_str().unwrap().to_string();

    // Duplicate code -> 409
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/vendors",
            Some(&token),
            json!({ "vendor_code": "V1", "vendor_name": "Clone" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Missing required field -> 400
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/vendors",
            Some(&token),
            json!({ "vendor_code": " ", "vendor_name": "Blank" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Partial update keeps unspecified fields
    let response = app
        .clone()
        .oneshot(json_req(
            "PUT",
            &format!("/api/vendors/{id}"),
            Some(&token),
            json!({ "location": "Chennai" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response.into_body()).await;
    assert_eq!(updated["vendor_name"], "Acme");
    assert_eq!(updated["email"], "a@x.com");
    assert_eq!(updated["location"], "Chennai");

    // Unknown id -> 404
    let response = app
        .clone()
        .oneshot(get_auth("/api/vendors/vendor:nope", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete (admin) then gone
    let response = app
        .clone()
        .oneshot(json_req(
            "DELETE",
            &format!("/api/vendors/{id}"),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_auth(&format!("/api/vendors/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plain_user_cannot_write_vendors() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(&tmp).await;
    let token = login_as(&app, "user").await;

    // Reads are allowed
    let response = app
        .clone()
        .oneshot(get_auth("/api/vendors", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Writes require admin / campaign_manager
    let response = app
        .oneshot(json_req(
            "POST",
            "/api/vendors",
            Some(&token),
            json!({ "vendor_code": "V1", "vendor_name": "Acme" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_template_delete_guard() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(&tmp).await;
    let token = login_as(&app, "admin").await;

    // Create a template and a campaign referencing it
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/templates/email",
            Some(&token),
            json!({
                "name": "Reminder",
                "subject": "Hi {vendor_name}",
                "body": "Please respond, {vendor_name}.",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let template = body_json(response.into_body()).await;
    let template_id = template["id"].as_str().unwrap().to_string();
    // Variable list auto-extracted from subject + body
    assert_eq!(template["variables"], json!(["vendor_name"]));

    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/campaigns",
            Some(&token),
            json!({
                "name": "Guarded",
                "email_template_id": template_id,
                "target_vendors": [],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let campaign = body_json(response.into_body()).await;
    let campaign_id = campaign["id"].as_str().unwrap().to_string();

    // Activate, then deletion is blocked with 400
    state
        .campaigns()
        .set_status(&record_id("campaign", &campaign_id), CampaignStatus::Active)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_req(
            "DELETE",
            &format!("/api/templates/email/{template_id}"),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Back to Draft: deletion succeeds and the reference is nulled
    state
        .campaigns()
        .set_status(&record_id("campaign", &campaign_id), CampaignStatus::Draft)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_req(
            "DELETE",
            &format!("/api/templates/email/{template_id}"),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_auth(&format!("/api/campaigns/{campaign_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let campaign = body_json(response.into_body()).await;
    assert!(campaign.get("email_template_id").is_none() || campaign["email_template_id"].is_null());
}

#[tokio::test]
async fn test_public_form_flow() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(&tmp).await;
    let token = login_as(&app, "campaign_manager").await;

    // Build a form with a conditional required field
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/forms",
            Some(&token),
            json!({
                "name": "msme-survey",
                "title": "MSME Survey",
                "slug": "msme-survey",
                "fields": [
                    {
                        "name": "registered",
                        "label": "Registered?",
                        "field_type": "radio",
                        "required": true,
                        "options": ["yes", "no"],
                    },
                    {
                        "name": "udyam",
                        "label": "Udyam number",
                        "field_type": "text",
                        "required": true,
                        "visible_when": { "field": "registered", "equals": "yes" },
                    },
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Public definition, no auth required
    let response = app
        .clone()
        .oneshot(get("/api/forms/public/msme-survey"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let form = body_json(response.into_body()).await;
    assert_eq!(form["fields"].as_array().unwrap().len(), 2);
    assert_eq!(form["fields"][0]["control"], "radio-group");

    // Unknown slug -> 404
    let response = app
        .clone()
        .oneshot(get("/api/forms/public/who-dis"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Missing required visible field -> 400
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/forms/public/msme-survey",
            None,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Hidden required field does not block ("registered" != "yes")
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/forms/public/msme-survey",
            None,
            json!({ "registered": "no" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Visible required field enforced
    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/forms/public/msme-survey",
            None,
            json!({ "registered": "yes" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_req(
            "POST",
            "/api/forms/public/msme-survey",
            None,
            json!({ "registered": "yes", "udyam": "UDYAM-MH-00-0000001" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_campaign_execute_via_api() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(&tmp).await;
    let token = login_as(&app, "admin").await;

    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/vendors",
            Some(&token),
            json!({ "vendor_code": "V1", "vendor_name": "Acme", "email": "a@x.com" }),
        ))
        .await
        .unwrap();
    let vendor = body_json(response.into_body()).await;

    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/templates/email",
            Some(&token),
            json!({ "name": "T", "subject": "S {vendor_code}", "body": "B {vendor_name}" }),
        ))
        .await
        .unwrap();
    let template = body_json(response.into_body()).await;

    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/campaigns",
            Some(&token),
            json!({
                "name": "Launch",
                "email_template_id": template["id"],
                "target_vendors": [vendor["id"]],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let campaign = body_json(response.into_body()).await;
    let campaign_id = campaign["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_req(
            "POST",
            &format!("/api/campaigns/{campaign_id}/execute"),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response.into_body()).await;
    assert_eq!(report["emails_sent"], json!(["a@x.com"]));
    assert_eq!(report["errors"], json!([]));

    // Status endpoint reflects the run
    let response = app
        .clone()
        .oneshot(get_auth(
            &format!("/api/campaigns/{campaign_id}/status"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response.into_body()).await;
    assert_eq!(status["status"], "Active");
    assert_eq!(status["responses"]["total"], 1);
    assert_eq!(status["sends"]["email"], 1);

    // Dashboard picks the campaign up
    let response = app
        .oneshot(get_auth("/api/analytics/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = body_json(response.into_body()).await;
    assert_eq!(metrics["total_campaigns"], 1);
    assert_eq!(metrics["active_campaigns"], 1);
    assert_eq!(metrics["total_vendors"], 1);
}
