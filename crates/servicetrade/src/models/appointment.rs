use serde::Deserialize;
use serde_json::Value;

use super::{Attributes, Resource};

/// A scheduled visit for a job.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Appointment {
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub id: Option<i64>,
    pub uri: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub window_start: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub window_end: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub released: Option<bool>,
    pub job: Option<Value>,
    pub location: Option<Value>,
    pub vendor: Option<Value>,
    pub techs: Option<Value>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub created: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub updated: Option<i64>,

    #[serde(skip)]
    attributes: Attributes,
}

impl Resource for Appointment {
    const OBJECT_NAME: &'static str = "appointment";
    const LIST_KEY: &'static str = "appointments";

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

impl Appointment {
    /// Scheduled duration in seconds, when both window bounds are known.
    pub fn duration_secs(&self) -> Option<i64> {
        match (self.window_start, self.window_end) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}
