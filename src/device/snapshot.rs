//! Data structures for device snapshots.

use crate::error::{ExporterError, Result};
use chrono::NaiveDateTime;
use serde_json::Value;

/// Field names whose device value is a `yymmddhhmmss` timestamp.
const TIMESTAMP_FIELDS: &[&str] = &["gas_timestamp"];

/// Format of the device's compact timestamps.
const DEVICE_TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Device API v1 field names that differ from the exported names.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("unique_id", "unique_meter_id"),
    ("total_power_import_kwh", "total_energy_import_kwh"),
    ("total_power_import_t1_kwh", "total_energy_import_t1_kwh"),
    ("total_power_import_t2_kwh", "total_energy_import_t2_kwh"),
    ("total_power_import_t3_kwh", "total_energy_import_t3_kwh"),
    ("total_power_import_t4_kwh", "total_energy_import_t4_kwh"),
    ("total_power_export_kwh", "total_energy_export_kwh"),
    ("total_power_export_t1_kwh", "total_energy_export_t1_kwh"),
    ("total_power_export_t2_kwh", "total_energy_export_t2_kwh"),
    ("total_power_export_t3_kwh", "total_energy_export_t3_kwh"),
    ("total_power_export_t4_kwh", "total_energy_export_t4_kwh"),
];

/// A single value reported by the device.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The device reported the field without a value
    Null,
    /// Integer or floating point reading
    Numeric(f64),
    /// Free-form text, such as the WiFi SSID or meter model
    Text(String),
    /// A point in time in the device's local time
    Timestamp(NaiveDateTime),
    /// Booleans, arrays, nested objects and anything else we do not export
    Unsupported,
}

impl FieldValue {
    /// Classify a raw JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Number(n) => n.as_f64().map_or(Self::Unsupported, Self::Numeric),
            Value::String(s) => Self::Text(s.clone()),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => Self::Unsupported,
        }
    }

    /// Classify a raw JSON value holding a compact `yymmddhhmmss` timestamp.
    ///
    /// The device sends these as integers, some firmware versions as strings.
    pub fn timestamp_from_json(value: &Value) -> Self {
        let raw = match value {
            Value::Null => return Self::Null,
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => return Self::Unsupported,
        };

        match NaiveDateTime::parse_from_str(&raw, DEVICE_TIMESTAMP_FORMAT) {
            Ok(ts) => Self::Timestamp(ts),
            Err(e) => {
                tracing::debug!("Ignoring unparseable device timestamp {:?}: {}", raw, e);
                Self::Unsupported
            }
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Numeric(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// One polled reading from the device, valid for a single cycle.
///
/// Fields keep the order in which the device reported them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    fields: Vec<(String, FieldValue)>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for tests and fakes.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, replacing an earlier value for the same name in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Iterate over fields in device order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields in the snapshot.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the device reported no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse the body of `GET /api/v1/data`.
    ///
    /// The body must be a JSON object. Field names are normalized to the
    /// exported names and timestamp fields are decoded; every other value is
    /// classified by its JSON type.
    pub fn from_json(body: Value) -> Result<Self> {
        let map = match body {
            Value::Object(map) => map,
            other => {
                return Err(ExporterError::malformed_snapshot(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut snapshot = Self::new();
        for (key, value) in &map {
            let field = normalize_field_name(key);
            let value = if TIMESTAMP_FIELDS.contains(&field) {
                FieldValue::timestamp_from_json(value)
            } else {
                FieldValue::from_json(value)
            };
            snapshot.insert(field, value);
        }

        Ok(snapshot)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (field, value) in iter {
            snapshot.insert(field, value);
        }
        snapshot
    }
}

/// Map a device API field name to the exported field name.
pub fn normalize_field_name(key: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(device, _)| *device == key)
        .map_or(key, |(_, exported)| *exported)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_classify_json_values() {
        assert_eq!(FieldValue::from_json(&json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from_json(&json!(450)), FieldValue::Numeric(450.0));
        assert_eq!(FieldValue::from_json(&json!(-12.5)), FieldValue::Numeric(-12.5));
        assert_eq!(
            FieldValue::from_json(&json!("HomeNet")),
            FieldValue::Text("HomeNet".to_string())
        );
        assert_eq!(FieldValue::from_json(&json!(true)), FieldValue::Unsupported);
        assert_eq!(FieldValue::from_json(&json!([1, 2])), FieldValue::Unsupported);
        assert_eq!(FieldValue::from_json(&json!({"a": 1})), FieldValue::Unsupported);
    }

    #[test]
    fn test_parse_gas_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 14)
            .unwrap()
            .and_hms_opt(11, 22, 33)
            .unwrap();

        assert_eq!(
            FieldValue::timestamp_from_json(&json!(210314112233u64)),
            FieldValue::Timestamp(expected)
        );
        assert_eq!(
            FieldValue::timestamp_from_json(&json!("210314112233")),
            FieldValue::Timestamp(expected)
        );
        assert_eq!(FieldValue::timestamp_from_json(&json!(null)), FieldValue::Null);
        assert_eq!(
            FieldValue::timestamp_from_json(&json!(12)),
            FieldValue::Unsupported
        );
    }

    #[test]
    fn test_from_json_renames_device_fields() {
        let snapshot = Snapshot::from_json(json!({
            "unique_id": "00112233445566778899AABBCCDDEEFF",
            "total_power_import_t1_kwh": 10830.511,
            "active_power_w": 450,
        }))
        .unwrap();

        assert_eq!(
            snapshot.get("unique_meter_id"),
            Some(&FieldValue::Text("00112233445566778899AABBCCDDEEFF".to_string()))
        );
        assert_eq!(
            snapshot.get("total_energy_import_t1_kwh"),
            Some(&FieldValue::Numeric(10830.511))
        );
        assert!(snapshot.get("unique_id").is_none());
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        let err = Snapshot::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ExporterError::MalformedSnapshot(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let snapshot = Snapshot::new()
            .with("a", 1.0)
            .with("b", "x")
            .with("a", 2.0);

        let fields: Vec<_> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, vec!["a", "b"]);
        assert_eq!(snapshot.get("a"), Some(&FieldValue::Numeric(2.0)));
    }

    #[test]
    fn test_from_json_keeps_device_order() {
        let snapshot = Snapshot::from_json(json!({
            "wifi_ssid": "HomeNet",
            "active_power_w": 450,
            "total_power_import_kwh": 10.5,
            "total_gas_m3": 1234.5,
        }))
        .unwrap();

        let fields: Vec<_> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(
            fields,
            vec!["wifi_ssid", "active_power_w", "total_energy_import_kwh", "total_gas_m3"]
        );
    }

    #[test]
    fn test_normalize_field_name() {
        assert_eq!(normalize_field_name("total_power_export_kwh"), "total_energy_export_kwh");
        assert_eq!(normalize_field_name("wifi_ssid"), "wifi_ssid");
    }
}
