use serde::Deserialize;

use super::{Attributes, Resource};

/// A person at a company or location.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub id: Option<i64>,
    pub uri: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub types: Option<Vec<String>>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub alternate_phone: Option<String>,
    pub email: Option<String>,

    #[serde(skip)]
    attributes: Attributes,
}

impl Resource for Contact {
    const OBJECT_NAME: &'static str = "contact";
    const LIST_KEY: &'static str = "contacts";

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Contact {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_phone(&self) -> bool {
        non_empty(&self.phone).is_some()
    }

    pub fn has_mobile(&self) -> bool {
        non_empty(&self.mobile).is_some()
    }

    pub fn has_email(&self) -> bool {
        non_empty(&self.email).is_some()
    }

    /// Mobile first, then phone
    pub fn primary_phone(&self) -> Option<&str> {
        non_empty(&self.mobile).or(self.phone.as_deref())
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types
            .as_ref()
            .map(|types| types.iter().any(|t| t == type_name))
            .unwrap_or(false)
    }
}
