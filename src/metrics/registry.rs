//! Metric instruments backing the scrape endpoint.

use crate::error::{ExporterError, Result};
use crate::metrics::schema::{MetricKind, SchemaEntry, SCHEMA};
use parking_lot::Mutex;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::Arc;

/// Label carrying the text of a descriptive instrument.
pub const INFO_LABEL: &str = "value";

/// An info-style instrument: one label set, always reported as `1`.
///
/// Exposed as `<name>_info{value="..."} 1`. Writing a new value replaces the
/// previous label set; the lock is held across the swap and across collection
/// so a scrape never sees zero or two label sets once a value was written.
#[derive(Clone)]
pub struct InfoMetric {
    vec: GaugeVec,
    current: Arc<Mutex<Option<String>>>,
}

impl InfoMetric {
    pub fn new(name: &str, help: &str) -> Result<Self> {
        let vec = GaugeVec::new(Opts::new(format!("{}_info", name), help), &[INFO_LABEL])?;
        Ok(Self {
            vec,
            current: Arc::new(Mutex::new(None)),
        })
    }

    /// Replace the labelled value.
    pub fn set(&self, value: &str) {
        let mut current = self.current.lock();
        if current.as_deref() == Some(value) {
            return;
        }

        self.vec.reset();
        self.vec.with_label_values(&[value]).set(1.0);
        *current = Some(value.to_string());
    }

    /// The last written value, if any.
    pub fn value(&self) -> Option<String> {
        self.current.lock().clone()
    }
}

impl Collector for InfoMetric {
    fn desc(&self) -> Vec<&Desc> {
        self.vec.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let _current = self.current.lock();
        self.vec.collect()
    }
}

/// The instrument behind one schema entry.
#[derive(Clone)]
pub enum Instrument {
    /// Numeric reading
    Gauge(Gauge),
    /// Text or timestamp reading
    Info(InfoMetric),
}

impl Instrument {
    /// The schema kind this instrument was built for.
    pub fn kind(&self) -> MetricKind {
        match self {
            Self::Gauge(_) => MetricKind::Numeric,
            Self::Info(_) => MetricKind::Descriptive,
        }
    }
}

/// One instrument per schema entry, fixed in shape after construction.
///
/// Shared between the poll loop, which writes instrument values, and the
/// scrape server, which renders them.
pub struct MetricRegistry {
    registry: Registry,
    instruments: HashMap<&'static str, Instrument>,
}

impl MetricRegistry {
    /// Build the registry for the exporter's schema.
    pub fn new() -> Result<Self> {
        Self::with_schema(SCHEMA)
    }

    /// Build a registry for an arbitrary schema.
    ///
    /// Fails only for invalid or duplicated metric names.
    pub fn with_schema(schema: &'static [SchemaEntry]) -> Result<Self> {
        let registry = Registry::new();
        let mut instruments = HashMap::with_capacity(schema.len());

        for entry in schema {
            let instrument = match entry.kind {
                MetricKind::Numeric => {
                    let gauge = Gauge::new(entry.metric_name(), entry.help)?;
                    registry.register(Box::new(gauge.clone()))?;
                    Instrument::Gauge(gauge)
                }
                MetricKind::Descriptive => {
                    let info = InfoMetric::new(&entry.metric_name(), entry.help)?;
                    registry.register(Box::new(info.clone()))?;
                    Instrument::Info(info)
                }
            };
            instruments.insert(entry.field, instrument);
        }

        #[cfg(all(feature = "process", target_os = "linux"))]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            instruments,
        })
    }

    /// Look up the instrument for a snapshot field.
    pub fn instrument(&self, field: &str) -> Option<&Instrument> {
        self.instruments.get(field)
    }

    /// The numeric instrument for a field, if the field is numeric.
    pub fn gauge(&self, field: &str) -> Option<&Gauge> {
        match self.instrument(field)? {
            Instrument::Gauge(gauge) => Some(gauge),
            Instrument::Info(_) => None,
        }
    }

    /// The descriptive instrument for a field, if the field is descriptive.
    pub fn info(&self, field: &str) -> Option<&InfoMetric> {
        match self.instrument(field)? {
            Instrument::Info(info) => Some(info),
            Instrument::Gauge(_) => None,
        }
    }

    /// Number of schema instruments, excluding the process collector.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether the registry was built from an empty schema.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Render every instrument in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;

        String::from_utf8(buffer)
            .map_err(|e| ExporterError::Metrics(prometheus::Error::Msg(e.to_string())))
    }
}
