//! Template rendering
//!
//! Literal `{key}` substitution against a vendor-derived variable map.
//! Rendering is a pure function: unknown placeholders stay verbatim in
//! the output and missing variables never raise an error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::db::models::Vendor;

/// `{simple_identifier}` placeholders
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").expect("placeholder regex"));

/// Substitute every known `{key}` in the template.
pub fn render(template: &str, vars: &BTreeMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in vars {
        rendered = rendered.replace(&format!("{{{key}}}"), value);
    }
    rendered
}

/// Build the substitution map for a vendor.
pub fn vendor_variables(vendor: &Vendor) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("vendor_name".to_string(), vendor.vendor_name.clone());
    vars.insert("vendor_code".to_string(), vendor.vendor_code.clone());
    vars.insert(
        "email".to_string(),
        vendor.email.clone().unwrap_or_default(),
    );
    vars.insert(
        "phone".to_string(),
        vendor.phone.clone().unwrap_or_default(),
    );
    vars.insert(
        "location".to_string(),
        vendor.location.clone().unwrap_or_default(),
    );
    vars.insert(
        "msme_status".to_string(),
        vendor
            .msme_status
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
    );
    vars.insert(
        "business_category".to_string(),
        vendor.business_category.clone().unwrap_or_default(),
    );
    vars.insert(
        "udyam_number".to_string(),
        vendor.udyam_number.clone().unwrap_or_default(),
    );
    vars
}

/// Extract the sorted set of placeholder names from template content.
///
/// Used by template CRUD to auto-fill the declared variable list and by
/// the preview endpoint.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut vars: Vec<String> = PLACEHOLDER_RE
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect();
    vars.sort();
    vars.dedup();
    vars
}

/// Sample variables for previewing a template without a real vendor.
pub fn sample_variables() -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("vendor_name".to_string(), "Sample Industries Pvt Ltd".to_string());
    vars.insert("vendor_code".to_string(), "V-1001".to_string());
    vars.insert("email".to_string(), "contact@sample.example".to_string());
    vars.insert("phone".to_string(), "9876543210".to_string());
    vars.insert("location".to_string(), "Mumbai".to_string());
    vars.insert("msme_status".to_string(), "MSME Certified".to_string());
    vars.insert("business_category".to_string(), "Manufacturing".to_string());
    vars.insert("udyam_number".to_string(), "UDYAM-MH-00-0000001".to_string());
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor() -> Vendor {
        Vendor {
            id: None,
            vendor_code: "V1".to_string(),
            vendor_name: "Acme".to_string(),
            email: Some("acme@example.com".to_string()),
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
        }
    }

    #[test]
    fn test_known_placeholders_substituted() {
        let vars = vendor_variables(&vendor());
        let out = render("Hi {vendor_name}, code {vendor_code}", &vars);
        assert_eq!(out, "Hi Acme, code V1");
    }

    #[test]
    fn test_unknown_placeholders_left_verbatim() {
        let vars = vendor_variables(&vendor());
        let out = render("Hi {vendor_name}, code {vendor_code}, loc {unknown}", &vars);
        assert_eq!(out, "Hi Acme, code V1, loc {unknown}");
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let vars = vendor_variables(&vendor());
        let template = "Dear {vendor_name} ({vendor_code}) from {location}";
        assert_eq!(render(template, &vars), render(template, &vars));
    }

    #[test]
    fn test_missing_value_renders_empty() {
        let vars = vendor_variables(&vendor());
        // udyam_number unset on the vendor → empty string, not an error
        assert_eq!(render("No: {udyam_number}.", &vars), "No: .");
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("Hi {vendor_name}, {vendor_code} and {vendor_name} again");
        assert_eq!(vars, vec!["vendor_code", "vendor_name"]);
    }

    #[test]
    fn test_extract_ignores_malformed() {
        let vars = extract_variables("{not closed {123bad} {ok_one}");
        assert_eq!(vars, vec!["ok_one"]);
    }
}
