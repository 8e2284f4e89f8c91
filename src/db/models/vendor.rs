//! Vendor Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Vendor ID type
pub type VendorId = RecordId;

/// MSME registration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsmeStatus {
    #[serde(rename = "MSME Certified")]
    Certified,
    #[serde(rename = "Non MSME")]
    NonMsme,
    #[serde(rename = "MSME Application Pending")]
    Pending,
    #[serde(rename = "MSME")]
    Msme,
    Others,
}

impl MsmeStatus {
    /// Parse a loosely-typed spreadsheet cell; unknown values map to None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "MSME Certified" => Some(Self::Certified),
            "Non MSME" => Some(Self::NonMsme),
            "MSME Application Pending" => Some(Self::Pending),
            "MSME" => Some(Self::Msme),
            "Others" => Some(Self::Others),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Certified => "MSME Certified",
            Self::NonMsme => "Non MSME",
            Self::Pending => "MSME Application Pending",
            Self::Msme => "MSME",
            Self::Others => "Others",
        }
    }
}

/// MSME size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsmeCategory {
    Micro,
    Small,
    Medium,
    Others,
}

impl MsmeCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Micro" => Some(Self::Micro),
            "Small" => Some(Self::Small),
            "Medium" => Some(Self::Medium),
            "Others" => Some(Self::Others),
            _ => None,
        }
    }
}

/// Vendor model matching the `vendor` table
///
/// `vendor_code` is unique across the store. Ledger amounts use
/// `rust_decimal::Decimal` so balances survive serialization exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<VendorId>,
    pub vendor_code: String,
    pub vendor_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub msme_status: Option<MsmeStatus>,
    #[serde(default)]
    pub msme_category: Option<MsmeCategory>,
    #[serde(default)]
    pub business_category: Option<String>,
    #[serde(default)]
    pub group_category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub udyam_number: Option<String>,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    #[serde(default)]
    pub opening_balance: Option<Decimal>,
    #[serde(default)]
    pub credit_amount: Option<Decimal>,
    #[serde(default)]
    pub debit_amount: Option<Decimal>,
    #[serde(default)]
    pub closing_balance: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create vendor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCreate {
    pub vendor_code: String,
    pub vendor_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub msme_status: Option<MsmeStatus>,
    #[serde(default)]
    pub msme_category: Option<MsmeCategory>,
    #[serde(default)]
    pub business_category: Option<String>,
    #[serde(default)]
    pub group_category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub udyam_number: Option<String>,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    #[serde(default)]
    pub opening_balance: Option<Decimal>,
    #[serde(default)]
    pub credit_amount: Option<Decimal>,
    #[serde(default)]
    pub debit_amount: Option<Decimal>,
    #[serde(default)]
    pub closing_balance: Option<Decimal>,
}

/// Update vendor payload (all optional, unset fields keep their value)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msme_status: Option<MsmeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msme_category: Option<MsmeCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udyam_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_balance: Option<Decimal>,
}

impl From<VendorCreate> for Vendor {
    fn from(data: VendorCreate) -> Self {
        Self {
            id: None,
            vendor_code: data.vendor_code,
            vendor_name: data.vendor_name,
            email: data.email,
            phone: data.phone,
            msme_status: data.msme_status,
            msme_category: data.msme_category,
            business_category: data.business_category,
            group_category: data.group_category,
            location: data.location,
            udyam_number: data.udyam_number,
            registration_date: data.registration_date,
            opening_balance: data.opening_balance,
            credit_amount: data.credit_amount,
            debit_amount: data.debit_amount,
            closing_balance: data.closing_balance,
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }
}
