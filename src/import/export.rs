//! Vendor export and blank import template
//!
//! Produces `.xlsx` workbooks in memory for download endpoints.

use rust_xlsxwriter::{Format, Workbook};

use crate::db::models::Vendor;
use crate::utils::{AppError, AppResult};

/// Column order shared by the export and the blank template, so an
/// exported file can be re-imported unchanged.
pub const EXPORT_HEADERS: &[&str] = &[
    "vendor_code",
    "vendor_name",
    "email",
    "phone",
    "msme_status",
    "msme_category",
    "business_category",
    "group_category",
    "location",
    "udyam_number",
    "registration_date",
    "opening_balance",
    "credit_amount",
    "debit_amount",
    "closing_balance",
];

fn write_headers(workbook: &mut Workbook) -> AppResult<()> {
    let bold = Format::new().set_bold();
    let worksheet = workbook
        .worksheet_from_index(0)
        .map_err(|e| AppError::internal(format!("Workbook error: {e}")))?;
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &bold)
            .map_err(|e| AppError::internal(format!("Workbook error: {e}")))?;
    }
    Ok(())
}

/// Export every vendor into one worksheet
pub fn vendors_to_xlsx(vendors: &[Vendor]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    write_headers(&mut workbook)?;

    let worksheet = workbook
        .worksheet_from_index(0)
        .map_err(|e| AppError::internal(format!("Workbook error: {e}")))?;

    for (index, vendor) in vendors.iter().enumerate() {
        let row = (index + 1) as u32;
        let cells: [String; 15] = [
            vendor.vendor_code.clone(),
            vendor.vendor_name.clone(),
            vendor.email.clone().unwrap_or_default(),
            vendor.phone.clone().unwrap_or_default(),
            vendor
                .msme_status
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            vendor
                .msme_category
                .map(|c| format!("{c:?}"))
                .unwrap_or_default(),
            vendor.business_category.clone().unwrap_or_default(),
            vendor.group_category.clone().unwrap_or_default(),
            vendor.location.clone().unwrap_or_default(),
            vendor.udyam_number.clone().unwrap_or_default(),
            vendor
                .registration_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            vendor
                .opening_balance
                .map(|d| d.to_string())
                .unwrap_or_default(),
            vendor
                .credit_amount
                .map(|d| d.to_string())
                .unwrap_or_default(),
            vendor
                .debit_amount
                .map(|d| d.to_string())
                .unwrap_or_default(),
            vendor
                .closing_balance
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ];
        for (col, cell) in cells.iter().enumerate() {
            worksheet
                .write(row, col as u16, cell.as_str())
                .map_err(|e| AppError::internal(format!("Workbook error: {e}")))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::internal(format!("Workbook error: {e}")))
}

/// Header-only workbook offered as the import starting point
pub fn blank_template_xlsx() -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    write_headers(&mut workbook)?;
    workbook
        .save_to_buffer()
        .map_err(|e| AppError::internal(format!("Workbook error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_template_is_valid_xlsx() {
        let bytes = blank_template_xlsx().unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_export_roundtrips_through_importer() {
        let vendor = Vendor {
            id: None,
            vendor_code: "V1".to_string(),
            vendor_name: "Acme".to_string(),
            email: Some("a@x.com".to_string()),
            phone: Some("9876543210".to_string()),
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
            created_at: None,
            updated_at: None,
        };
        let bytes = vendors_to_xlsx(&[vendor]).unwrap();
        let rows = crate::import::importer::parse_spreadsheet("vendors.xlsx", &bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["vendor_code"], "V1");
        assert_eq!(rows[0]["location"], "Pune");
    }
}
