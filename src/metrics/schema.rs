//! Static description of every exported field.

use crate::METRIC_NAMESPACE;

/// How a field is exposed to Prometheus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A gauge holding the last numeric reading
    Numeric,
    /// An info metric carrying the last text as its `value` label
    Descriptive,
}

/// Declaration of one observable device field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEntry {
    /// Field name as it appears in a snapshot
    pub field: &'static str,
    /// Which instrument type the field is exported as
    pub kind: MetricKind,
    /// Help text shown on the scrape endpoint
    pub help: &'static str,
}

impl SchemaEntry {
    /// Declare a field exported as a gauge.
    pub const fn numeric(field: &'static str, help: &'static str) -> Self {
        Self {
            field,
            kind: MetricKind::Numeric,
            help,
        }
    }

    /// Declare a field exported as an info metric.
    pub const fn descriptive(field: &'static str, help: &'static str) -> Self {
        Self {
            field,
            kind: MetricKind::Descriptive,
            help,
        }
    }

    /// Name of the exported instrument, e.g. `homewizard_active_power_w`.
    pub fn metric_name(&self) -> String {
        format!("{}_{}", METRIC_NAMESPACE, self.field)
    }
}

/// All fields the exporter knows about.
pub const SCHEMA: &[SchemaEntry] = &[
    SchemaEntry::descriptive("wifi_ssid", "WiFi SSID"),
    SchemaEntry::numeric("wifi_strength", "WiFi Strength"),
    SchemaEntry::numeric("smr_version", "SMR Version"),
    SchemaEntry::descriptive("meter_model", "Meter Model"),
    SchemaEntry::descriptive("unique_meter_id", "Unique Meter ID"),
    SchemaEntry::numeric("active_tariff", "Active Tariff"),
    SchemaEntry::numeric("total_energy_import_kwh", "Total Energy Import in kWh"),
    SchemaEntry::numeric("total_energy_import_t1_kwh", "Total Energy Import T1 in kWh"),
    SchemaEntry::numeric("total_energy_import_t2_kwh", "Total Energy Import T2 in kWh"),
    SchemaEntry::numeric("total_energy_import_t3_kwh", "Total Energy Import T3 in kWh"),
    SchemaEntry::numeric("total_energy_import_t4_kwh", "Total Energy Import T4 in kWh"),
    SchemaEntry::numeric("total_energy_export_kwh", "Total Energy Export in kWh"),
    SchemaEntry::numeric("total_energy_export_t1_kwh", "Total Energy Export T1 in kWh"),
    SchemaEntry::numeric("total_energy_export_t2_kwh", "Total Energy Export T2 in kWh"),
    SchemaEntry::numeric("total_energy_export_t3_kwh", "Total Energy Export T3 in kWh"),
    SchemaEntry::numeric("total_energy_export_t4_kwh", "Total Energy Export T4 in kWh"),
    SchemaEntry::numeric("active_power_w", "Active Power in W"),
    SchemaEntry::numeric("active_power_l1_w", "Active Power L1 in W"),
    SchemaEntry::numeric("active_power_l2_w", "Active Power L2 in W"),
    SchemaEntry::numeric("active_power_l3_w", "Active Power L3 in W"),
    SchemaEntry::numeric("active_voltage_v", "Active Voltage in V"),
    SchemaEntry::numeric("active_voltage_l1_v", "Active Voltage L1 in V"),
    SchemaEntry::numeric("active_voltage_l2_v", "Active Voltage L2 in V"),
    SchemaEntry::numeric("active_voltage_l3_v", "Active Voltage L3 in V"),
    SchemaEntry::numeric("active_current_a", "Active Current in A"),
    SchemaEntry::numeric("active_current_l1_a", "Active Current L1 in A"),
    SchemaEntry::numeric("active_current_l2_a", "Active Current L2 in A"),
    SchemaEntry::numeric("active_current_l3_a", "Active Current L3 in A"),
    SchemaEntry::numeric("voltage_sag_l1_count", "Voltage Sag L1 Count"),
    SchemaEntry::numeric("voltage_swell_l1_count", "Voltage Swell L1 Count"),
    SchemaEntry::numeric("any_power_fail_count", "Any Power Fail Count"),
    SchemaEntry::numeric("long_power_fail_count", "Long Power Fail Count"),
    SchemaEntry::numeric("total_gas_m3", "Total Gas in m3"),
    SchemaEntry::descriptive("gas_timestamp", "Gas Timestamp"),
    SchemaEntry::descriptive("gas_unique_id", "Gas Unique ID"),
    SchemaEntry::numeric("active_liter_lpm", "Active Liter LPM"),
    SchemaEntry::numeric("total_liter_m3", "Total Liter in m3"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn lookup(field: &str) -> Option<&'static SchemaEntry> {
        SCHEMA.iter().find(|entry| entry.field == field)
    }

    #[test]
    fn test_field_names_are_unique() {
        let names: HashSet<_> = SCHEMA.iter().map(|entry| entry.field).collect();
        assert_eq!(names.len(), SCHEMA.len());
    }

    #[test]
    fn test_field_names_are_snake_case() {
        for entry in SCHEMA {
            assert!(
                entry
                    .field
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "{} is not snake_case",
                entry.field
            );
        }
    }

    #[test]
    fn test_metric_name_is_namespaced() {
        let entry = lookup("active_power_w").unwrap();
        assert_eq!(entry.metric_name(), "homewizard_active_power_w");
        assert_eq!(entry.kind, MetricKind::Numeric);

        let entry = lookup("gas_timestamp").unwrap();
        assert_eq!(entry.kind, MetricKind::Descriptive);

        assert!(lookup("active_frequency_hz").is_none());
    }
}
