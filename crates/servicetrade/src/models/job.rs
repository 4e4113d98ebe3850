use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Attributes, Resource};

/// A job (work order).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Job {
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub id: Option<i64>,
    pub uri: Option<String>,
    pub name: Option<String>,
    pub custom_name: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub job_type_weight: Option<i64>,
    pub status: Option<String>,
    pub display_status: Option<String>,
    pub substatus: Option<String>,
    pub display_substatus: Option<String>,
    #[serde(deserialize_with = "super::de::string_or_number")]
    pub number: Option<String>,
    #[serde(deserialize_with = "super::de::string_or_number")]
    pub ref_number: Option<String>,
    #[serde(deserialize_with = "super::de::string_or_number")]
    pub customer_po: Option<String>,
    pub visibility: Option<Value>,
    pub section_visibilities: Option<Value>,
    pub description: Option<String>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub scheduled_date: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_f64")]
    pub estimated_price: Option<f64>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub latest_clock_in: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub ivr_open: Option<bool>,
    pub ivr_activity: Option<Value>,
    pub service_line: Option<Value>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub due_by: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub due_after: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub completed_on: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_f64")]
    pub percent_complete: Option<f64>,
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub is_project: Option<bool>,
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub budgeted: Option<bool>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub created: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub updated: Option<i64>,

    // Related objects, kept as returned
    pub vendor: Option<Value>,
    pub customer: Option<Value>,
    pub location: Option<Value>,
    pub owner: Option<Value>,
    pub sales: Option<Value>,
    pub primary_contact: Option<Value>,
    pub current_appointment: Option<Value>,
    pub assigned_office: Option<Value>,
    pub offices: Option<Value>,
    pub tags: Option<Value>,
    pub external_ids: Option<Value>,
    pub terms: Option<Value>,
    pub contract: Option<Value>,
    pub project: Option<Value>,
    pub notes: Option<Value>,
    pub service_requests: Option<Value>,
    pub scheduling_comments: Option<Value>,

    pub service_link_attachment_visibility: Option<Value>,
    pub service_link_comment_visibility: Option<Value>,
    pub service_link_attachment_category_visibility: Option<Value>,

    // Deprecated by the API but still returned
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub deficiencies_found: Option<bool>,
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub other_trade_deficiencies_found: Option<bool>,
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub red_tags_found: Option<bool>,

    #[serde(skip)]
    attributes: Attributes,
}

impl Resource for Job {
    const OBJECT_NAME: &'static str = "job";
    const LIST_KEY: &'static str = "jobs";

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    /// The API lists only scheduled jobs unless told otherwise; make that explicit.
    fn apply_list_defaults(filters: &mut Map<String, Value>) {
        if !filters.contains_key("status") && !filters.contains_key("number") {
            filters.insert("status".to_string(), Value::String("scheduled".to_string()));
        }
    }
}

impl Job {
    fn status_is(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }

    pub fn is_completed(&self) -> bool {
        self.status_is("completed")
    }

    pub fn is_canceled(&self) -> bool {
        self.status_is("canceled")
    }

    pub fn is_scheduled(&self) -> bool {
        self.status_is("scheduled")
    }

    pub fn is_invoiced(&self) -> bool {
        self.status_is("invoiced")
    }

    pub fn is_ivr_open(&self) -> bool {
        self.ivr_open == Some(true)
    }
}
