//! Core data models for the router ETL
//!
//! Snapshot documents keep their key order (`IndexMap`) because the first
//! timestamp of a device decides matching.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Interface-qualified name to free-text description
pub type InterfaceMap = IndexMap<String, String>;

/// Metric name to raw value (number, numeric string, or the `Time` marker)
pub type StatMap = IndexMap<String, Value>;

/// Key skipped in both interface and statistic maps
pub const TIME_KEY: &str = "Time";

/// Interface name and description used for device-wide rows
pub const GENERAL_LABEL: &str = "General";

/// Device configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(rename = "_id", default, deserialize_with = "deserialize_id")]
    pub id: String,
    pub routers: IndexMap<String, ConfigDevice>,
}

/// Per-device configuration entry.
///
/// Both the bare `{timestamp: interfaces}` shape and the ingested
/// `{"Measure_Time": {timestamp: interfaces}}` shape are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigDevice {
    Wrapped {
        #[serde(rename = "Measure_Time")]
        measure_time: IndexMap<String, InterfaceMap>,
    },
    Bare(IndexMap<String, InterfaceMap>),
}

impl ConfigDevice {
    pub fn timestamps(&self) -> &IndexMap<String, InterfaceMap> {
        match self {
            ConfigDevice::Wrapped { measure_time } => measure_time,
            ConfigDevice::Bare(timestamps) => timestamps,
        }
    }

    fn timestamps_mut(&mut self) -> &mut IndexMap<String, InterfaceMap> {
        match self {
            ConfigDevice::Wrapped { measure_time } => measure_time,
            ConfigDevice::Bare(timestamps) => timestamps,
        }
    }
}

impl Default for ConfigDevice {
    fn default() -> Self {
        ConfigDevice::Bare(IndexMap::new())
    }
}

impl ConfigSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            routers: IndexMap::new(),
        }
    }

    /// Add a device with no timestamps
    pub fn with_device(mut self, device: &str) -> Self {
        self.routers.entry(device.to_string()).or_default();
        self
    }

    /// Add one interface description under a device and timestamp
    pub fn with_interface(
        mut self,
        device: &str,
        timestamp: &str,
        interface: &str,
        description: &str,
    ) -> Self {
        self.routers
            .entry(device.to_string())
            .or_default()
            .timestamps_mut()
            .entry(timestamp.to_string())
            .or_default()
            .insert(interface.to_string(), description.to_string());
        self
    }
}

/// Device traffic snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    #[serde(rename = "_id", default, deserialize_with = "deserialize_id")]
    pub id: String,
    pub routers: IndexMap<String, TrafficDevice>,
}

/// Per-device traffic entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficDevice {
    #[serde(rename = "Measure_Time")]
    pub measure_time: IndexMap<String, StatMap>,
}

impl TrafficSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            routers: IndexMap::new(),
        }
    }

    /// Add a device with no timestamps
    pub fn with_device(mut self, device: &str) -> Self {
        self.routers.entry(device.to_string()).or_default();
        self
    }

    /// Add one statistic under a device and timestamp
    pub fn with_stat(
        mut self,
        device: &str,
        timestamp: &str,
        name: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.routers
            .entry(device.to_string())
            .or_default()
            .measure_time
            .entry(timestamp.to_string())
            .or_default()
            .insert(name.to_string(), value.into());
        self
    }
}

/// Accepts `"id"`, `{"$oid": "id"}` or a number as snapshot identity.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Object(ref map) => match map.get("$oid") {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(serde::de::Error::custom("unsupported _id object")),
        },
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported _id value: {}",
            other
        ))),
    }
}

/// Numeric statistic value
///
/// Integers stay exact; sums that overflow `i64` fall back to floating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    /// Parse a raw JSON value: numbers and numeric strings are accepted
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(MetricValue::Int(i))
                } else {
                    n.as_f64().map(MetricValue::Float)
                }
            }
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Parse a numeric string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Some(MetricValue::Int(i));
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(MetricValue::Float(f)),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            MetricValue::Int(i) => i == 0,
            MetricValue::Float(f) => f == 0.0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Int(i) => i as f64,
            MetricValue::Float(f) => f,
        }
    }
}

impl Add for MetricValue {
    type Output = MetricValue;

    fn add(self, rhs: MetricValue) -> MetricValue {
        match (self, rhs) {
            (MetricValue::Int(a), MetricValue::Int(b)) => match a.checked_add(b) {
                Some(sum) => MetricValue::Int(sum),
                None => MetricValue::Float(a as f64 + b as f64),
            },
            (a, b) => MetricValue::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl AddAssign for MetricValue {
    fn add_assign(&mut self, rhs: MetricValue) {
        *self = *self + rhs;
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Int(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(i) => write!(f, "{}", i),
            MetricValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One decoded traffic counter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatStatRow {
    pub device: String,
    pub measure_date: String,
    pub measure_time: String,
    pub protocol_version: String,
    pub stat_description: String,
    pub label: String,
    pub interface_id: u64,
    pub value: MetricValue,
}

/// One configured interface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatConfigRow {
    pub device: String,
    pub interface_id: u64,
    pub interface_name: String,
    pub interface_description: String,
    pub measure_date: String,
}

/// Final per-interface record handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedMetricRecord {
    #[serde(rename = "IP_Address")]
    pub device: String,
    #[serde(rename = "Measure_Date")]
    pub measure_date: String,
    #[serde(rename = "Measure_Time")]
    pub measure_time: String,
    #[serde(rename = "Interface_ID")]
    pub interface_id: u64,
    #[serde(rename = "Interface_Name")]
    pub interface_name: Option<String>,
    #[serde(rename = "Interface_Description")]
    pub interface_description: Option<String>,
    #[serde(rename = "Protocol_Version")]
    pub protocol_version: String,
    #[serde(rename = "New_Stat_Description")]
    pub label: String,
    #[serde(rename = "Stat_Value")]
    pub value: MetricValue,
}
