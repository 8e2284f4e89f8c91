//! Campaign execution flow against a real embedded database
//!
//! Adapters run as test doubles: the recording pair reports success
//! (dev-mode behavior), the failing pair simulates provider outages.

use std::sync::Arc;

use async_trait::async_trait;
use campaign_central::campaigns::CampaignExecutor;
use campaign_central::db::DbService;
use campaign_central::db::models::{
    CampaignCreate, CampaignStatus, EmailTemplateCreate, ResponseStatus, VendorCreate,
    WhatsAppTemplateCreate,
};
use campaign_central::services::{EmailSender, SendError, WhatsAppSender};
use campaign_central::{Config, ServerState};
use surrealdb::RecordId;

struct OkEmail;

#[async_trait]
impl EmailSender for OkEmail {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), SendError> {
        Ok(())
    }
}

struct OkWhatsApp;

#[async_trait]
impl WhatsAppSender for OkWhatsApp {
    async fn send(&self, _phone: &str, _body: &str) -> Result<(), SendError> {
        Ok(())
    }
}

struct FailingWhatsApp;

#[async_trait]
impl WhatsAppSender for FailingWhatsApp {
    async fn send(&self, _phone: &str, _body: &str) -> Result<(), SendError> {
        Err(SendError::Provider("503: service unavailable".into()))
    }
}

async fn state_with(
    tmp: &tempfile::TempDir,
    whatsapp: Arc<dyn WhatsAppSender>,
) -> ServerState {
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let db = DbService::connect(&tmp.path().join("campaign.db"))
        .await
        .unwrap();
    ServerState::with_senders(config, db, Arc::new(OkEmail), whatsapp)
}

fn vendor(code: &str, email: Option<&str>, phone: Option<&str>) -> VendorCreate {
    VendorCreate {
        vendor_code: code.to_string(),
        vendor_name: format!("Vendor {code}"),
        email: email.map(str::to_string),
        phone: phone.map(str::to_string),
        msme_status: None,
        msme_category: None,
        business_category: None,
        group_category: None,
        location: Some("Pune".to_string()),
        udyam_number: None,
        registration_date: None,
        opening_balance: None,
        credit_amount: None,
        debit_amount: None,
        closing_balance: None,
    }
}

/// Seed two templates and three vendors, return the campaign id
async fn seed_campaign(state: &ServerState) -> RecordId {
    let email_template = state
        .email_templates()
        .create(
            EmailTemplateCreate {
                name: "Compliance reminder".into(),
                subject: "Action needed, {vendor_name}".into(),
                body: "Dear {vendor_name} ({vendor_code}), please respond.".into(),
                variables: None,
            },
            vec!["vendor_name".into(), "vendor_code".into()],
            None,
        )
        .await
        .unwrap();

    let whatsapp_template = state
        .whatsapp_templates()
        .create(
            WhatsAppTemplateCreate {
                name: "Compliance ping".into(),
                content: "Hi {vendor_name}, check your email.".into(),
                variables: None,
            },
            vec!["vendor_name".into()],
            None,
        )
        .await
        .unwrap();

    let vendors = state.vendors();
    let v1 = vendors
        .create(vendor("V1", Some("v1@example.com"), Some("9876543210")))
        .await
        .unwrap();
    let v2 = vendors
        .create(vendor("V2", Some("v2@example.com"), None))
        .await
        .unwrap();
    let v3 = vendors.create(vendor("V3", None, None)).await.unwrap();

    let campaign = state
        .campaigns()
        .create(
            CampaignCreate {
                name: "Q3 compliance".into(),
                description: None,
                email_template_id: email_template.id,
                whatsapp_template_id: whatsapp_template.id,
                form_id: None,
                target_vendors: vec![
                    v1.id.unwrap(),
                    v2.id.unwrap(),
                    v3.id.unwrap(),
                ],
                deadline: None,
            },
            None,
        )
        .await
        .unwrap();

    campaign.id.unwrap()
}

#[tokio::test]
async fn test_execution_creates_response_rows_once() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(&tmp, Arc::new(OkWhatsApp)).await;
    let campaign_id = seed_campaign(&state).await;

    let executor = CampaignExecutor::new(state.clone());
    let report = executor.execute(&campaign_id).await.unwrap();
    assert_eq!(report.total_vendors, 3);

    let responses = state
        .responses()
        .find_by_campaign(&campaign_id)
        .await
        .unwrap();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r.status == ResponseStatus::Pending));

    // Second execution must not duplicate the (campaign, vendor) rows
    executor.execute(&campaign_id).await.unwrap();
    let responses = state
        .responses()
        .find_by_campaign(&campaign_id)
        .await
        .unwrap();
    assert_eq!(responses.len(), 3);
}

#[tokio::test]
async fn test_execution_dispatches_and_logs_both_channels() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(&tmp, Arc::new(OkWhatsApp)).await;
    let campaign_id = seed_campaign(&state).await;

    let report = CampaignExecutor::new(state.clone())
        .execute(&campaign_id)
        .await
        .unwrap();

    // V1 + V2 have email, only V1 has a phone
    assert_eq!(report.emails_sent.len(), 2);
    assert!(report.emails_sent.contains(&"v1@example.com".to_string()));
    assert_eq!(report.whatsapp_sent, vec!["919876543210".to_string()]);
    assert!(report.errors.is_empty());

    let counts = state
        .send_logs()
        .counts_for_campaign(&campaign_id)
        .await
        .unwrap();
    assert_eq!(counts.email, 2);
    assert_eq!(counts.whatsapp, 1);

    // Launched after the loop
    let campaign = state
        .campaigns()
        .find_by_id(&campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Active);
}

#[tokio::test]
async fn test_per_vendor_failure_recorded_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(&tmp, Arc::new(FailingWhatsApp)).await;
    let campaign_id = seed_campaign(&state).await;

    let report = CampaignExecutor::new(state.clone())
        .execute(&campaign_id)
        .await
        .unwrap();

    // Emails still go out while WhatsApp fails per vendor
    assert_eq!(report.emails_sent.len(), 2);
    assert!(report.whatsapp_sent.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].vendor_name, "Vendor V1");
    assert!(report.errors[0].message.contains("503"));

    // No send log for the failed channel
    let counts = state
        .send_logs()
        .counts_for_campaign(&campaign_id)
        .await
        .unwrap();
    assert_eq!(counts.whatsapp, 0);

    // Campaign is launched regardless of delivery outcome
    let campaign = state
        .campaigns()
        .find_by_id(&campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Active);
}

#[tokio::test]
async fn test_completed_campaign_cannot_execute() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(&tmp, Arc::new(OkWhatsApp)).await;
    let campaign_id = seed_campaign(&state).await;

    state
        .campaigns()
        .set_status(&campaign_id, CampaignStatus::Completed)
        .await
        .unwrap();

    let result = CampaignExecutor::new(state).execute(&campaign_id).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_missing_vendor_ids_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(&tmp, Arc::new(OkWhatsApp)).await;

    let v1 = state
        .vendors()
        .create(vendor("V9", Some("v9@example.com"), None))
        .await
        .unwrap();
    let ghost = RecordId::from_table_key("vendor", "does-not-exist");

    let template = state
        .email_templates()
        .create(
            EmailTemplateCreate {
                name: "T".into(),
                subject: "S".into(),
                body: "B {vendor_code}".into(),
                variables: None,
            },
            vec![],
            None,
        )
        .await
        .unwrap();

    let campaign = state
        .campaigns()
        .create(
            CampaignCreate {
                name: "Sparse".into(),
                description: None,
                email_template_id: template.id,
                whatsapp_template_id: None,
                form_id: None,
                target_vendors: vec![v1.id.unwrap(), ghost],
                deadline: None,
            },
            None,
        )
        .await
        .unwrap();

    let report = CampaignExecutor::new(state.clone())
        .execute(&campaign.id.unwrap())
        .await
        .unwrap();
    assert_eq!(report.total_vendors, 1);
    assert_eq!(report.emails_sent, vec!["v9@example.com".to_string()]);
}
