use serde::Deserialize;
use serde_json::Value;

use super::{join_present, Attributes, Resource};

/// A customer site or vendor office.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub id: Option<i64>,
    pub uri: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "super::de::string_or_number")]
    pub ref_number: Option<String>,
    #[serde(deserialize_with = "super::de::lenient_f64")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "super::de::lenient_f64")]
    pub lon: Option<f64>,
    pub status: Option<String>,
    #[serde(deserialize_with = "super::de::lenient_bool")]
    pub taxable: Option<bool>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub general_manager: Option<String>,
    /// Structured address (`street`, `city`, `state`, `postalCode`)
    pub address: Option<Value>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    #[serde(deserialize_with = "super::de::string_or_number")]
    pub address_postal_code: Option<String>,
    pub company: Option<Value>,
    pub primary_contact: Option<Value>,
    pub offices: Option<Value>,
    pub tags: Option<Value>,
    pub external_ids: Option<Value>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub created: Option<i64>,
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub updated: Option<i64>,

    #[serde(skip)]
    attributes: Attributes,
}

impl Resource for Location {
    const OBJECT_NAME: &'static str = "location";
    const LIST_KEY: &'static str = "locations";

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

impl Location {
    fn status_is(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }

    pub fn is_active(&self) -> bool {
        self.status_is("active")
    }

    pub fn is_inactive(&self) -> bool {
        self.status_is("inactive")
    }

    pub fn is_pending(&self) -> bool {
        self.status_is("pending")
    }

    pub fn is_on_hold(&self) -> bool {
        self.status_is("on_hold")
    }

    pub fn is_taxable(&self) -> bool {
        self.taxable == Some(true)
    }

    /// Format the address as a single line.
    ///
    /// Uses the structured `address` object when present, otherwise the flat
    /// `address*` fields.
    pub fn full_address(&self) -> Option<String> {
        if let Some(Value::Object(address)) = &self.address {
            let part = |key: &str| address.get(key).and_then(Value::as_str);
            let formatted = join_present([
                part("street"),
                part("city"),
                part("state"),
                part("postalCode"),
            ]);
            if formatted.is_some() {
                return formatted;
            }
        }

        join_present([
            self.address_street.as_deref(),
            self.address_city.as_deref(),
            self.address_state.as_deref(),
            self.address_postal_code.as_deref(),
        ])
    }
}
