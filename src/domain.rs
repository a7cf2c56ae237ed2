//! ==============================================================================
//! domain.rs - sensor reading model shared by the backend and the simulator
//! ==============================================================================
//!
//! readings are stored the way devices send them: every caller field
//! (`deviceId`, `soilMoisture`, `humidity`, `temperature`, anything else)
//! is kept as raw json and round-trips unchanged. the only check is that
//! `deviceId` is truthy (not missing, null, false, 0 or "").
//!
//! typed access goes through `SensorFields`, which reads numbers leniently
//! (json numbers and numeric strings) and never rejects a stored reading.
//!
//! ==============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// how many readings `GET /api/devices` returns when no usable limit is given
pub const DEFAULT_RECENT_LIMIT: usize = 50;

pub const DEVICE_ID: &str = "deviceId";
pub const SOIL_MOISTURE: &str = "soilMoisture";
pub const HUMIDITY: &str = "humidity";
pub const TEMPERATURE: &str = "temperature";

/// one stored sensor observation
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Reading {
    /// store-assigned unique id
    #[serde(default)]
    pub id: String,
    /// store-assigned insertion time, rfc 3339 utc
    #[serde(default)]
    pub timestamp: String,
    /// every field the device sent, verbatim
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// a reading as submitted by a device, before the store stamps it
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct NewReading {
    pub fields: Map<String, Value>,
}

/// lenient typed view over the raw fields of a reading
pub trait SensorFields {
    fn field(&self, key: &str) -> Option<&Value>;

    fn device_id(&self) -> Option<&Value> {
        self.field(DEVICE_ID)
    }

    /// true when `deviceId` is present and truthy
    fn has_device_id(&self) -> bool {
        self.device_id().is_some_and(is_truthy)
    }

    /// `deviceId` for display: strings as-is, other values as json
    fn device_name(&self) -> String {
        match self.device_id() {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn soil_moisture(&self) -> Option<f64> {
        self.field(SOIL_MOISTURE).and_then(as_number)
    }

    fn humidity(&self) -> Option<f64> {
        self.field(HUMIDITY).and_then(as_number)
    }

    fn temperature(&self) -> Option<f64> {
        self.field(TEMPERATURE).and_then(as_number)
    }
}

impl SensorFields for Reading {
    fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl SensorFields for NewReading {
    fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl NewReading {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self::default().with(DEVICE_ID, device_id.into())
    }

    /// set one field
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// a request body; anything other than a json object carries no fields
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// stamp the payload with a store-assigned id and timestamp.
    ///
    /// returns `None` when `deviceId` is not truthy. caller-supplied
    /// `id` / `timestamp` keys are dropped so the assigned values win.
    pub fn into_reading(self, id: String, timestamp: String) -> Option<Reading> {
        if !self.has_device_id() {
            return None;
        }
        let mut fields = self.fields;
        fields.remove("id");
        fields.remove("timestamp");

        Some(Reading {
            id,
            timestamp,
            fields,
        })
    }
}

/// javascript truthiness for a json value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// json number, or a string that parses as one
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        _ => None,
    }
}

/// the persisted document: `{ "devices": [Reading...] }`
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ReadingsDocument {
    #[serde(default)]
    pub devices: Vec<Reading>,
}
