//! Vendor bulk import & validator
//!
//! Parses an uploaded spreadsheet, applies the email/phone heuristics to
//! every row, and either inserts the whole batch or rejects the whole
//! file. Anomalies that do not reject the file (landlines, invalid
//! tokens, missing contacts) are written to the upload log with the raw
//! row for later inspection.
//!
//! Whole-file rejection rules:
//! - a vendor code repeats within the file (exact, case-sensitive)
//! - a vendor code already exists in the store
//! - no surviving row has both a code and a name

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Cursor;
use std::str::FromStr;

use calamine::{Data, Reader};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::core::ServerState;
use crate::db::models::{MsmeCategory, MsmeStatus, UploadErrorType, UploadLog, VendorCreate};
use crate::import::emails::extract_emails;
use crate::import::phones::extract_phones;
use crate::utils::{AppError, AppResult};

/// One parsed spreadsheet row: normalized header -> trimmed cell
pub type RawRow = BTreeMap<String, String>;

/// Import result returned to the API caller
#[derive(Debug, serde::Serialize)]
pub struct ImportSummary {
    /// Groups this run's upload-log rows
    pub import_id: String,
    pub inserted: usize,
    pub total_rows: usize,
    /// Human-readable digest of anomaly categories, e.g.
    /// "3 landline numbers filtered out"
    pub anomalies: Vec<String>,
}

/// One detected anomaly, pending upload-log write
struct RowAnomaly {
    row_number: usize,
    error_type: UploadErrorType,
    detail: String,
    raw: serde_json::Value,
}

pub struct VendorImporter {
    state: ServerState,
}

impl VendorImporter {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// Parse, validate and insert a vendor spreadsheet.
    pub async fn run(&self, file_name: &str, bytes: &[u8]) -> AppResult<ImportSummary> {
        let import_id = uuid::Uuid::new_v4().to_string();
        let rows = parse_spreadsheet(file_name, bytes)?;
        let total_rows = rows.len();

        let mut creates: Vec<VendorCreate> = Vec::new();
        let mut anomalies: Vec<RowAnomaly> = Vec::new();
        let default_status = MsmeStatus::parse(&self.state.config.default_msme_status)
            .unwrap_or(MsmeStatus::Others);

        // Header row is line 1; data rows start at 2
        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 2;
            if let Some(create) = process_row(row, row_number, default_status, &mut anomalies) {
                creates.push(create);
            }
        }

        // Reject: duplicate code within the file
        let mut seen: HashSet<&str> = HashSet::new();
        for create in &creates {
            if !seen.insert(create.vendor_code.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate vendor code '{}' in file",
                    create.vendor_code
                )));
            }
        }

        // Reject: code already in the store
        let codes: Vec<String> = creates.iter().map(|c| c.vendor_code.clone()).collect();
        let existing = self.state.vendors().existing_codes(&codes).await?;
        if !existing.is_empty() {
            return Err(AppError::conflict(format!(
                "Vendor codes already exist: {}",
                existing.join(", ")
            )));
        }

        // Reject: nothing left to insert
        if creates.is_empty() {
            return Err(AppError::validation(
                "No valid rows found: every row needs a vendor code and a vendor name",
            ));
        }

        let inserted = self.state.vendors().create_batch(creates).await?;

        let logs: Vec<UploadLog> = anomalies
            .iter()
            .map(|a| UploadLog {
                id: None,
                import_id: import_id.clone(),
                file_name: file_name.to_string(),
                row_number: a.row_number,
                error_type: a.error_type,
                detail: a.detail.clone(),
                raw_data: a.raw.clone(),
                created_at: Utc::now(),
            })
            .collect();
        self.state.upload_logs().create_batch(logs).await?;

        tracing::info!(
            file = %file_name,
            import = %import_id,
            inserted,
            total_rows,
            anomalies = anomalies.len(),
            "Vendor import finished"
        );

        Ok(ImportSummary {
            import_id,
            inserted,
            total_rows,
            anomalies: digest(&anomalies),
        })
    }
}

/// Map one raw row to a create payload, pushing anomalies as they are
/// found. Returns None when the row lacks a code or a name.
fn process_row(
    row: &RawRow,
    row_number: usize,
    default_status: MsmeStatus,
    anomalies: &mut Vec<RowAnomaly>,
) -> Option<VendorCreate> {
    let code = lookup(row, &["vendor_code", "code"])?;
    let name = lookup(row, &["vendor_name", "name", "company_name"])?;

    let raw = serde_json::to_value(row).unwrap_or_default();
    let mut push = |error_type: UploadErrorType, detail: String| {
        anomalies.push(RowAnomaly {
            row_number,
            error_type,
            detail,
            raw: raw.clone(),
        });
    };

    let email_cell = lookup(row, &["email", "email_id"]).unwrap_or_default();
    let emails = extract_emails(&email_cell);
    for token in &emails.invalid {
        push(
            UploadErrorType::InvalidEmail,
            format!("'{token}' is not a valid email address"),
        );
    }
    if emails.primary.is_none() {
        push(
            UploadErrorType::MissingEmail,
            "No usable email address".to_string(),
        );
    }

    let phone_cell = lookup(row, &["phone", "phone_number", "mobile"]).unwrap_or_default();
    let phones = extract_phones(&phone_cell);
    for digits in &phones.landlines {
        push(
            UploadErrorType::LandlineNumber,
            format!("'{digits}' looks like a landline"),
        );
    }
    for token in &phones.invalid {
        push(
            UploadErrorType::InvalidPhone,
            format!("'{token}' is not a valid phone number"),
        );
    }
    if phones.primary.is_none() {
        push(
            UploadErrorType::MissingPhone,
            "No usable mobile number".to_string(),
        );
    }

    Some(VendorCreate {
        vendor_code: code,
        vendor_name: name,
        email: emails.primary,
        phone: phones.primary,
        msme_status: Some(
            lookup(row, &["msme_status"])
                .and_then(|v| MsmeStatus::parse(&v))
                .unwrap_or(default_status),
        ),
        msme_category: lookup(row, &["msme_category"]).and_then(|v| MsmeCategory::parse(&v)),
        business_category: lookup(row, &["business_category"]),
        group_category: lookup(row, &["group_category"]),
        location: lookup(row, &["location", "city"]),
        udyam_number: lookup(row, &["udyam_number"]),
        registration_date: lookup(row, &["registration_date"]).and_then(|v| parse_date(&v)),
        opening_balance: lookup(row, &["opening_balance"]).and_then(|v| parse_decimal(&v)),
        credit_amount: lookup(row, &["credit_amount"]).and_then(|v| parse_decimal(&v)),
        debit_amount: lookup(row, &["debit_amount"]).and_then(|v| parse_decimal(&v)),
        closing_balance: lookup(row, &["closing_balance"]).and_then(|v| parse_decimal(&v)),
    })
}

/// First non-empty cell among the header aliases
fn lookup(row: &RawRow, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(value) = row.get(*alias) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn parse_decimal(cell: &str) -> Option<Decimal> {
    let cleaned: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&cleaned).ok()
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    for format in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Some(date);
        }
    }
    None
}

/// Lowercased, underscored header key
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Dispatch on the file extension: CSV or Excel
pub fn parse_spreadsheet(file_name: &str, bytes: &[u8]) -> AppResult<Vec<RawRow>> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".csv") {
        parse_csv(bytes)
    } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        parse_excel(bytes)
    } else {
        Err(AppError::validation(
            "Unsupported file type: expected .csv, .xlsx or .xls",
        ))
    }
}

fn parse_csv(bytes: &[u8]) -> AppResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::validation(format!("Invalid CSV header: {e}")))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::validation(format!("Invalid CSV row: {e}")))?;
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), cell.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn parse_excel(bytes: &[u8]) -> AppResult<Vec<RawRow>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| AppError::validation(format!("Invalid Excel file: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::validation("Excel file has no worksheets"))?
        .map_err(|e| AppError::validation(format!("Invalid worksheet: {e}")))?;

    let mut iter = range.rows();
    let headers: Vec<String> = iter
        .next()
        .ok_or_else(|| AppError::validation("Excel worksheet is empty"))?
        .iter()
        .map(|cell| normalize_header(&cell_to_string(cell)))
        .collect();

    let mut rows = Vec::new();
    for record in iter {
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), cell_to_string(cell));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Codes and phone numbers come through as floats; keep them integral
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Fold anomalies into the human-readable summary lines
fn digest(anomalies: &[RowAnomaly]) -> Vec<String> {
    let mut counts: HashMap<UploadErrorType, usize> = HashMap::new();
    for anomaly in anomalies {
        *counts.entry(anomaly.error_type).or_insert(0) += 1;
    }

    let phrase = |count: usize, singular: &str, plural: &str| {
        if count == 1 {
            format!("1 {singular}")
        } else {
            format!("{count} {plural}")
        }
    };

    let mut lines = Vec::new();
    if let Some(&n) = counts.get(&UploadErrorType::InvalidEmail) {
        lines.push(phrase(n, "invalid email address logged", "invalid email addresses logged"));
    }
    if let Some(&n) = counts.get(&UploadErrorType::LandlineNumber) {
        lines.push(phrase(n, "landline number filtered out", "landline numbers filtered out"));
    }
    if let Some(&n) = counts.get(&UploadErrorType::InvalidPhone) {
        lines.push(phrase(n, "invalid phone number logged", "invalid phone numbers logged"));
    }
    if let Some(&n) = counts.get(&UploadErrorType::MissingEmail) {
        lines.push(phrase(n, "row without a usable email", "rows without a usable email"));
    }
    if let Some(&n) = counts.get(&UploadErrorType::MissingPhone) {
        lines.push(phrase(n, "row without a usable mobile number", "rows without a usable mobile number"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Vendor Code,Vendor Name,Email,Phone
V1,Acme,a@x.com,9876543210
V2,Beta,\"b@y.com, junk\",022-12345678
";

    #[test]
    fn test_parse_csv_normalizes_headers() {
        let rows = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["vendor_code"], "V1");
        assert_eq!(rows[1]["email"], "b@y.com, junk");
    }

    #[test]
    fn test_process_row_full() {
        let rows = parse_csv(CSV.as_bytes()).unwrap();
        let mut anomalies = Vec::new();
        let create = process_row(&rows[0], 2, MsmeStatus::Others, &mut anomalies).unwrap();
        assert_eq!(create.vendor_code, "V1");
        assert_eq!(create.email.as_deref(), Some("a@x.com"));
        assert_eq!(create.phone.as_deref(), Some("9876543210"));
        assert!(anomalies.is_empty());
        assert_eq!(create.msme_status, Some(MsmeStatus::Others));
    }

    #[test]
    fn test_process_row_anomalies() {
        let rows = parse_csv(CSV.as_bytes()).unwrap();
        let mut anomalies = Vec::new();
        let create = process_row(&rows[1], 3, MsmeStatus::Others, &mut anomalies).unwrap();
        assert_eq!(create.email.as_deref(), Some("b@y.com"));
        // landline excluded from the primary phone
        assert_eq!(create.phone, None);

        let kinds: Vec<UploadErrorType> = anomalies.iter().map(|a| a.error_type).collect();
        assert!(kinds.contains(&UploadErrorType::InvalidEmail));
        assert!(kinds.contains(&UploadErrorType::LandlineNumber));
        assert!(kinds.contains(&UploadErrorType::MissingPhone));
    }

    #[test]
    fn test_row_without_code_dropped() {
        let csv = "vendor_code,vendor_name\n,NoCode\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        let mut anomalies = Vec::new();
        assert!(process_row(&rows[0], 2, MsmeStatus::Others, &mut anomalies).is_none());
    }

    #[test]
    fn test_decimal_and_date_parsing() {
        assert_eq!(parse_decimal("1,23,456.78"), Decimal::from_str("123456.78").ok());
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(
            parse_date("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_date("15/03/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_digest_phrasing() {
        let raw = serde_json::Value::Null;
        let anomalies = vec![
            RowAnomaly {
                row_number: 2,
                error_type: UploadErrorType::LandlineNumber,
                detail: String::new(),
                raw: raw.clone(),
            },
            RowAnomaly {
                row_number: 3,
                error_type: UploadErrorType::LandlineNumber,
                detail: String::new(),
                raw: raw.clone(),
            },
            RowAnomaly {
                row_number: 3,
                error_type: UploadErrorType::LandlineNumber,
                detail: String::new(),
                raw,
            },
        ];
        assert_eq!(digest(&anomalies), vec!["3 landline numbers filtered out"]);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        assert!(parse_spreadsheet("vendors.pdf", b"x").is_err());
    }
}
