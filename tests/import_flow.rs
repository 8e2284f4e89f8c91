//! Vendor bulk import against a real embedded database

use std::sync::Arc;

use async_trait::async_trait;
use campaign_central::db::DbService;
use campaign_central::db::models::{UploadErrorType, VendorCreate};
use campaign_central::services::{EmailSender, SendError, WhatsAppSender};
use campaign_central::{Config, ServerState, VendorImporter};

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

async fn test_state(tmp: &tempfile::TempDir) -> ServerState {
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let db = DbService::connect(&tmp.path().join("campaign.db"))
        .await
        .unwrap();
    ServerState::with_senders(config, db, Arc::new(NullEmail), Arc::new(NullWhatsApp))
}

#[tokio::test]
async fn test_import_inserts_and_logs_anomalies() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp).await;

    let csv = "\
vendor_code,vendor_name,email,phone,location
V1,Acme,a@x.com,9876543210,Pune
V2,Beta,\"b@y.com, not-an-email\",022-12345678,Mumbai
V3,Gamma,,09876543211,
";
    let summary = VendorImporter::new(state.clone())
        .run("vendors.csv", csv.as_bytes())
        .await
        .unwrap();

    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.total_rows, 3);
    assert!(
        summary
            .anomalies
            .iter()
            .any(|line| line.contains("landline"))
    );

    // Primary contact heuristics applied on the stored rows
    let v2 = state.vendors().find_by_code("V2").await.unwrap().unwrap();
    assert_eq!(v2.email.as_deref(), Some("b@y.com"));
    assert_eq!(v2.phone, None);

    let v3 = state.vendors().find_by_code("V3").await.unwrap().unwrap();
    // trunk zero stripped during classification
    assert_eq!(v3.phone.as_deref(), Some("9876543211"));

    // One upload-log row per anomaly, raw row attached
    let logs = state.upload_logs().find_recent(50).await.unwrap();
    assert!(
        logs.iter()
            .any(|l| l.error_type == UploadErrorType::InvalidEmail)
    );
    assert!(
        logs.iter()
            .any(|l| l.error_type == UploadErrorType::LandlineNumber)
    );
    assert!(
        logs.iter()
            .any(|l| l.error_type == UploadErrorType::MissingEmail)
    );
    assert!(logs.iter().all(|l| l.file_name == "vendors.csv"));
}

#[tokio::test]
async fn test_duplicate_code_in_file_rejects_everything() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp).await;

    let csv = "\
vendor_code,vendor_name
A1,First
A1,Second
";
    let result = VendorImporter::new(state.clone())
        .run("dup.csv", csv.as_bytes())
        .await;
    assert!(result.is_err());

    // Zero inserts
    assert_eq!(state.vendors().count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_existing_store_code_rejects_everything() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp).await;

    state
        .vendors()
        .create(VendorCreate {
            vendor_code: "V1".into(),
            vendor_name: "Already here".into(),
            email: None,
            phone: None,
            msme_status: None,
            msme_category: None,
            business_category: None,
            group_category: None,
            location: None,
            udyam_number: None,
            registration_date: None,
            opening_balance: None,
            credit_amount: None,
            debit_amount: None,
            closing_balance: None,
        })
        .await
        .unwrap();

    let csv = "\
vendor_code,vendor_name
V1,Clone
V2,Fresh
";
    let result = VendorImporter::new(state.clone())
        .run("collide.csv", csv.as_bytes())
        .await;
    assert!(result.is_err());

    // The non-colliding row is rejected too
    assert!(state.vendors().find_by_code("V2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_no_valid_rows_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp).await;

    // Rows missing a code or a name never survive
    let csv = "\
vendor_code,vendor_name
,NoCode
V5,
";
    let result = VendorImporter::new(state.clone())
        .run("empty.csv", csv.as_bytes())
        .await;
    assert!(result.is_err());
    assert_eq!(state.vendors().count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_default_msme_status_applied() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp).await;

    let csv = "\
vendor_code,vendor_name,msme_status
V1,Acme,MSME Certified
V2,Beta,
";
    VendorImporter::new(state.clone())
        .run("status.csv", csv.as_bytes())
        .await
        .unwrap();

    let v1 = state.vendors().find_by_code("V1").await.unwrap().unwrap();
    let v2 = state.vendors().find_by_code("V2").await.unwrap().unwrap();
    assert_eq!(
        v1.msme_status.map(|s| s.as_str().to_string()),
        Some("MSME Certified".to_string())
    );
    // DEFAULT_MSME_STATUS fallback
    assert_eq!(
        v2.msme_status.map(|s| s.as_str().to_string()),
        Some("Others".to_string())
    );
}

#[tokio::test]
async fn test_xlsx_export_reimports() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp).await;

    let csv = "\
vendor_code,vendor_name,email,phone
V1,Acme,a@x.com,9876543210
";
    VendorImporter::new(state.clone())
        .run("seed.csv", csv.as_bytes())
        .await
        .unwrap();

    let vendors = state.vendors().find_all(None, None, 0, 100).await.unwrap();
    let bytes = campaign_central::import::export::vendors_to_xlsx(&vendors).unwrap();

    // Re-import into a fresh store
    let tmp2 = tempfile::tempdir().unwrap();
    let state2 = test_state(&tmp2).await;
    let summary = VendorImporter::new(state2.clone())
        .run("vendors.xlsx", &bytes)
        .await
        .unwrap();
    assert_eq!(summary.inserted, 1);

    let v1 = state2.vendors().find_by_code("V1").await.unwrap().unwrap();
    assert_eq!(v1.email.as_deref(), Some("a@x.com"));
    assert_eq!(v1.phone.as_deref(), Some("9876543210"));
}
