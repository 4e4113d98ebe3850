//! Typed ServiceTrade resources.
//!
//! Each resource is a struct of optional, snake_case fields built from the
//! API's camelCase record, plus the untouched raw record in [`Attributes`]:
//!
//! - `Job`, `Appointment`: work orders and their scheduled visits
//! - `Location`, `Region`: service sites and the geographic areas grouping them
//! - `Company`, `Contact`: customers/vendors and the people at them
//!
//! [`mapper`] turns response bodies into these types and into [`Page`]s.

mod de;

pub mod appointment;
pub mod company;
pub mod contact;
pub mod job;
pub mod location;
pub mod mapper;
pub mod page;
pub mod region;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use appointment::Appointment;
pub use company::Company;
pub use contact::Contact;
pub use job::Job;
pub use location::Location;
pub use page::Page;
pub use region::{BoundingBox, Region};

/// The raw record exactly as the API returned it, camelCase keys included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A remote entity type exposed through CRUD endpoints.
pub trait Resource: DeserializeOwned {
    /// Path segment under the API root, e.g. `job`
    const OBJECT_NAME: &'static str;

    /// Key holding the item list inside `data` in list responses, e.g. `jobs`
    const LIST_KEY: &'static str;

    fn attributes(&self) -> &Attributes;

    fn set_attributes(&mut self, attributes: Attributes);

    /// Adjust list filters before a list request is sent.
    fn apply_list_defaults(_filters: &mut Map<String, Value>) {}
}

/// Join the non-empty parts with `", "`, or `None` if nothing is left.
pub(crate) fn join_present<'a, I>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let present: Vec<&str> = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(", "))
    }
}
