//! Projection of device snapshots onto metric instruments.

use crate::device::{FieldValue, Snapshot};
use crate::metrics::registry::{Instrument, MetricRegistry};
use chrono::NaiveDateTime;
use tracing::trace;

/// ISO-8601 rendering used for timestamp fields.
const ISO_8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Write every usable snapshot field into its instrument.
///
/// Null values, unsupported value types, fields without an instrument and
/// values that do not fit the instrument's kind are skipped. Instruments for
/// fields missing from the snapshot keep their previous value.
///
/// Returns the number of instruments written.
pub fn project(registry: &MetricRegistry, snapshot: &Snapshot) -> usize {
    let mut written = 0;

    for (field, value) in snapshot.iter() {
        let Some(instrument) = registry.instrument(field) else {
            trace!("No instrument for field {}", field);
            continue;
        };

        match (instrument, value) {
            (_, FieldValue::Null | FieldValue::Unsupported) => continue,
            (Instrument::Gauge(gauge), FieldValue::Numeric(n)) => gauge.set(*n),
            (Instrument::Info(info), FieldValue::Text(text)) => info.set(text),
            (Instrument::Info(info), FieldValue::Timestamp(ts)) => info.set(&iso_8601(ts)),
            (Instrument::Gauge(_), FieldValue::Text(_) | FieldValue::Timestamp(_))
            | (Instrument::Info(_), FieldValue::Numeric(_)) => {
                trace!("Value of {} does not match its instrument kind", field);
                continue;
            }
        }
        written += 1;
    }

    written
}

/// Render a device timestamp as ISO-8601, with fractional seconds only when present.
pub fn iso_8601(ts: &NaiveDateTime) -> String {
    ts.format(ISO_8601_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn registry() -> MetricRegistry {
        MetricRegistry::new().unwrap()
    }

    #[test]
    fn test_numeric_and_text_fields() {
        let registry = registry();
        let snapshot = Snapshot::new()
            .with("active_power_w", 450.0)
            .with("wifi_ssid", "HomeNet")
            .with("gas_timestamp", FieldValue::Null);

        let written = project(&registry, &snapshot);

        assert_eq!(written, 2);
        assert_eq!(registry.gauge("active_power_w").unwrap().get(), 450.0);
        assert_eq!(
            registry.info("wifi_ssid").unwrap().value().as_deref(),
            Some("HomeNet")
        );
        assert_eq!(registry.info("gas_timestamp").unwrap().value(), None);
    }

    #[test]
    fn test_timestamp_is_rendered_as_iso_8601() {
        let registry = registry();
        let ts = NaiveDate::from_ymd_opt(2021, 3, 14)
            .unwrap()
            .and_hms_opt(11, 22, 33)
            .unwrap();

        project(&registry, &Snapshot::new().with("gas_timestamp", ts));

        assert_eq!(
            registry.info("gas_timestamp").unwrap().value().as_deref(),
            Some("2021-03-14T11:22:33")
        );
    }

    #[test]
    fn test_iso_8601_fractional_seconds() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 250)
            .unwrap();
        assert_eq!(iso_8601(&ts), "2024-01-02T03:04:05.250");
    }

    #[test]
    fn test_absent_and_null_fields_keep_previous_value() {
        let registry = registry();
        project(
            &registry,
            &Snapshot::new()
                .with("total_gas_m3", 1200.0)
                .with("meter_model", "ISKRA 2M550T-101"),
        );

        let written = project(
            &registry,
            &Snapshot::new()
                .with("total_gas_m3", FieldValue::Null)
                .with("active_power_w", 12.0),
        );

        assert_eq!(written, 1);
        assert_eq!(registry.gauge("total_gas_m3").unwrap().get(), 1200.0);
        assert_eq!(
            registry.info("meter_model").unwrap().value().as_deref(),
            Some("ISKRA 2M550T-101")
        );
    }

    #[test]
    fn test_unknown_fields_and_types_are_ignored() {
        let registry = registry();
        let before = registry.len();

        let written = project(
            &registry,
            &Snapshot::new()
                .with("active_frequency_hz", 50.0)
                .with("external", FieldValue::Unsupported)
                .with("wifi_strength", FieldValue::Unsupported),
        );

        assert_eq!(written, 0);
        assert_eq!(registry.len(), before);
        assert!(registry.instrument("active_frequency_hz").is_none());
        assert_eq!(registry.gauge("wifi_strength").unwrap().get(), 0.0);
    }

    #[test]
    fn test_kind_mismatch_is_skipped() {
        let registry = registry();
        let written = project(
            &registry,
            &Snapshot::new()
                .with("active_power_w", "lots")
                .with("wifi_ssid", 3.0),
        );

        assert_eq!(written, 0);
        assert_eq!(registry.gauge("active_power_w").unwrap().get(), 0.0);
        assert_eq!(registry.info("wifi_ssid").unwrap().value(), None);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let registry = registry();
        let snapshot = Snapshot::new()
            .with("active_power_w", -231.0)
            .with("wifi_ssid", "HomeNet");

        project(&registry, &snapshot);
        let once = registry.render().unwrap();
        project(&registry, &snapshot);
        let twice = registry.render().unwrap();

        let strip_process = |s: &str| {
            s.lines()
                .filter(|line| line.contains("homewizard_"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip_process(&once), strip_process(&twice));
    }
}
