//! Form field visibility and submission validation
//!
//! Visibility is evaluated purely from the current answer set: a field
//! with a `visible_when` rule is shown iff the controlling field's answer
//! stringifies to the expected value. Required-ness only applies to
//! fields that are visible under the submitted answers.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::models::{FieldType, FormField};

/// Stringify an answer for rule comparison: strings compare as-is,
/// numbers and booleans through their display form.
fn answer_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Is this field visible under the given answers?
pub fn is_visible(field: &FormField, answers: &Map<String, Value>) -> bool {
    match &field.visible_when {
        None => true,
        Some(rule) => answers
            .get(&rule.field)
            .and_then(answer_as_string)
            .is_some_and(|answer| answer == rule.equals),
    }
}

/// The fields visible under the given answers, in form order.
pub fn visible_fields<'a>(
    fields: &'a [FormField],
    answers: &Map<String, Value>,
) -> Vec<&'a FormField> {
    fields.iter().filter(|f| is_visible(f, answers)).collect()
}

/// An answer counts as present when it is non-null, non-empty-string and
/// non-empty-array (checkbox groups submit arrays).
fn is_answered(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Validate a submission: every required *visible* field must be
/// answered. Hidden fields never block, whatever their required flag.
pub fn validate_submission(
    fields: &[FormField],
    answers: &Map<String, Value>,
) -> Result<(), Vec<String>> {
    let missing: Vec<String> = visible_fields(fields, answers)
        .into_iter()
        .filter(|f| f.required && !is_answered(answers.get(&f.name)))
        .map(|f| f.label.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Public field definition served to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    /// Widget family the client should render
    pub control: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<crate::db::models::VisibilityRule>,
}

/// Describe every field for the public form endpoint.
///
/// The match is exhaustive over [`FieldType`] on purpose: a new field
/// type must pick a control here before it can ship.
pub fn describe_fields(fields: &[FormField]) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .map(|field| {
            let (control, wants_options) = match field.field_type {
                FieldType::Text => ("input", false),
                FieldType::Email => ("input", false),
                FieldType::Phone => ("input", false),
                FieldType::Number => ("input", false),
                FieldType::Date => ("input", false),
                FieldType::Textarea => ("textarea", false),
                FieldType::Select => ("select", true),
                FieldType::Radio => ("radio-group", true),
                FieldType::Checkbox => ("checkbox-group", true),
                FieldType::File => ("file", false),
            };
            FieldDescriptor {
                name: field.name.clone(),
                label: field.label.clone(),
                field_type: field.field_type,
                control,
                required: field.required,
                options: wants_options.then(|| field.options.clone()),
                visible_when: field.visible_when.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::VisibilityRule;
    use serde_json::json;

    fn field(name: &str, field_type: FieldType, required: bool) -> FormField {
        FormField {
            name: name.to_string(),
            label: name.to_uppercase(),
            field_type,
            required,
            options: Vec::new(),
            visible_when: None,
        }
    }

    fn conditional(name: &str, on: &str, equals: &str, required: bool) -> FormField {
        FormField {
            visible_when: Some(VisibilityRule {
                field: on.to_string(),
                equals: equals.to_string(),
            }),
            ..field(name, FieldType::Text, required)
        }
    }

    fn answers(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_unconditional_fields_always_visible() {
        let fields = vec![field("a", FieldType::Text, false)];
        assert_eq!(visible_fields(&fields, &Map::new()).len(), 1);
    }

    #[test]
    fn test_conditional_field_hidden_until_match() {
        let fields = vec![
            field("x", FieldType::Radio, true),
            conditional("details", "x", "yes", false),
        ];

        let hidden = visible_fields(&fields, &answers(json!({ "x": "no" })));
        assert_eq!(hidden.len(), 1);

        let empty = visible_fields(&fields, &Map::new());
        assert_eq!(empty.len(), 1);

        let shown = visible_fields(&fields, &answers(json!({ "x": "yes" })));
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].name, "details");
    }

    #[test]
    fn test_rule_compares_non_string_answers() {
        let fields = vec![conditional("extra", "count", "3", false)];
        assert_eq!(visible_fields(&fields, &answers(json!({ "count": 3 }))).len(), 1);
        assert_eq!(visible_fields(&fields, &answers(json!({ "count": 4 }))).len(), 0);
    }

    #[test]
    fn test_required_visible_field_blocks_submission() {
        let fields = vec![field("name", FieldType::Text, true)];
        let err = validate_submission(&fields, &Map::new()).unwrap_err();
        assert_eq!(err, vec!["NAME"]);
    }

    #[test]
    fn test_required_hidden_field_does_not_block() {
        let fields = vec![
            field("x", FieldType::Radio, false),
            conditional("details", "x", "yes", true),
        ];
        // details is required but hidden: submission passes
        assert!(validate_submission(&fields, &answers(json!({ "x": "no" }))).is_ok());
        // once visible, it blocks
        assert!(validate_submission(&fields, &answers(json!({ "x": "yes" }))).is_err());
    }

    #[test]
    fn test_empty_answers_count_as_missing() {
        let fields = vec![field("name", FieldType::Text, true)];
        assert!(validate_submission(&fields, &answers(json!({ "name": "  " }))).is_err());
        assert!(validate_submission(&fields, &answers(json!({ "name": [] }))).is_err());
        assert!(validate_submission(&fields, &answers(json!({ "name": "ok" }))).is_ok());
    }

    #[test]
    fn test_describe_fields_controls() {
        let fields = vec![
            field("a", FieldType::Select, false),
            field("b", FieldType::Textarea, false),
            field("c", FieldType::File, false),
        ];
        let descriptors = describe_fields(&fields);
        assert_eq!(descriptors[0].control, "select");
        assert!(descriptors[0].options.is_some());
        assert_eq!(descriptors[1].control, "textarea");
        assert!(descriptors[1].options.is_none());
        assert_eq!(descriptors[2].control, "file");
    }
}
