use serde::Deserialize;

use super::{Attributes, Resource};

/// A customer or vendor company.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Company {
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub id: Option<i64>,
    pub uri: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,

    #[serde(skip)]
    attributes: Attributes,
}

impl Resource for Company {
    const OBJECT_NAME: &'static str = "company";
    const LIST_KEY: &'static str = "companies";

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

impl Company {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }

    pub fn is_inactive(&self) -> bool {
        self.status.as_deref() == Some("inactive")
    }

    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some("pending")
    }

    pub fn is_on_hold(&self) -> bool {
        self.status.as_deref() == Some("on_hold")
    }
}
