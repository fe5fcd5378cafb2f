//! Plausible looking sample values for every field of a definition, for test fills of
//! a template before real data exists.
//!
//! Field names are matched first (lower-cased, by substring) so that, say, a field
//! called `Worker email` gets an email address. Fields no name rule matches get a value
//! by type: `number` → `123`, `boolean` / `checkbox` → `true`, `date` → an ISO date,
//! anything else → `"test"`.

use crate::definition::{FieldDefinition, FieldsDefinition};
use crate::value::{Value, ValueMap};

pub const MOCK_STRING: &str = "test";
pub const MOCK_NUMBER: f64 = 123.0;
pub const MOCK_DATE: &str = "2025-01-01";

/// (all of these substrings, value) checked in order, before the field type is looked at
const NAME_RULES: &[(&[&str], &str)] = &[
    (&["first name"], "John"),
    (&["family name"], "Smith"),
    (&["surname"], "Smith"),
    (&["worker", "name"], "Alex Railworker"),
    (&["doctor", "appointment"], "Dr Taylor"),
    (&["doctor"], "Dr Smith"),
    (&["operator", "rail"], "ACME Rail Pty Ltd"),
    (&["email"], "worker@example.com"),
    (&["phone"], "+61 400 123 456"),
    (&["facsimile"], "+61 400 123 456"),
    (&["fax"], "+61 400 123 456"),
    (&["address"], "123 Sample Street, Sydney NSW 2000"),
];

/// (substring, date) for `date` fields, checked in order
const DATE_RULES: &[(&str, &str)] = &[
    ("dob", "1990-01-01"),
    ("date of birth", "1990-01-01"),
    ("next review", "2025-06-01"),
    ("appointment", "2025-03-15"),
    ("drug test", "2025-02-01"),
    ("test date", "2025-02-01"),
];

/// A sample value for every named field, keyed by field name. Fields without a name are
/// skipped.
pub fn prepare_mock_data(definition: &FieldsDefinition) -> ValueMap {
    definition
        .fields
        .iter()
        .filter_map(|field| {
            let name = field.name.as_ref()?;
            Some((name.clone(), mock_value_for(field)))
        })
        .collect()
}

fn mock_value_for(field: &FieldDefinition) -> Value {
    let name = field.name.as_deref().unwrap_or_default().to_lowercase();
    let kind = field.kind.as_deref().map(str::to_lowercase);

    if let Some((_, value)) = NAME_RULES
        .iter()
        .find(|(needles, _)| needles.iter().all(|n| name.contains(n)))
    {
        return Value::from(*value);
    }

    match kind.as_deref() {
        Some("date") => {
            let date = DATE_RULES
                .iter()
                .find(|(needle, _)| name.contains(needle))
                .map(|(_, date)| *date)
                .unwrap_or(MOCK_DATE);
            Value::from(date)
        }
        Some("number") => Value::Number(MOCK_NUMBER),
        Some("boolean") | Some("checkbox") => Value::Boolean(true),
        _ => Value::from(MOCK_STRING),
    }
}
