//! CRUD operations shared by every resource, plus resource-specific sub-paths.

use std::marker::PhantomData;

use futures::stream::{self, Stream, TryStreamExt};
use serde_json::{json, Value};
use tracing::debug;

use crate::models::mapper::{into_page, into_resource, take_items};
use crate::models::{Job, Location, Page, Region, Resource};

use super::{ApiClient, Error, Result};

/// First page requested when none is given
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used by `list` callers that do not care
pub const DEFAULT_PER_PAGE: u64 = 100;

/// Operations on one resource type, e.g. `client.jobs()`.
pub struct Resources<'a, T> {
    client: &'a ApiClient,
    _resource: PhantomData<fn() -> T>,
}

impl<'a, T: Resource> Resources<'a, T> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn resource_url(&self) -> &'static str {
        T::OBJECT_NAME
    }

    fn member_url(&self, id: i64) -> String {
        format!("{}/{}", T::OBJECT_NAME, id)
    }

    /// Fetch one page. `filters` should be a JSON object; anything else is
    /// treated as no filters.
    pub async fn list(&self, filters: Value, page: u64, per_page: u64) -> Result<Page<T>> {
        let mut params = match filters {
            Value::Object(map) => map,
            _ => Default::default(),
        };
        T::apply_list_defaults(&mut params);
        params.insert("page".to_string(), json!(page));
        params.insert("per_page".to_string(), json!(per_page));

        let body = self.client.get(T::OBJECT_NAME, &Value::Object(params)).await?;
        let page = into_page(body)?;
        debug!(
            resource = T::OBJECT_NAME,
            count = page.len(),
            total = page.total_count,
            "Listed resources"
        );
        Ok(page)
    }

    /// Every record matching `filters`, fetching further pages on demand.
    pub fn all(&self, filters: Value, per_page: u64) -> impl Stream<Item = Result<T>> + 'a
    where
        T: 'a,
    {
        let resources = Resources::<T>::new(self.client);
        stream::try_unfold(Some(DEFAULT_PAGE), move |next| {
            let filters = filters.clone();
            let resources = Resources::<T>::new(resources.client);
            async move {
                let Some(page_number) = next else {
                    return Ok::<_, Error>(None);
                };
                let page = resources.list(filters, page_number, per_page).await?;
                // An empty page ends the walk even if the totals disagree
                let next = if page.has_more() && !page.is_empty() {
                    Some(page_number + 1)
                } else {
                    None
                };
                let items = stream::iter(page.items.into_iter().map(Ok::<T, Error>));
                Ok(Some((items, next)))
            }
        })
        .try_flatten()
    }

    pub async fn find(&self, id: i64) -> Result<T> {
        let body = self.client.get(&self.member_url(id), &Value::Null).await?;
        into_resource(body)
    }

    pub async fn create(&self, params: Value) -> Result<T> {
        let body = self.client.post(T::OBJECT_NAME, &params).await?;
        into_resource(body)
    }

    pub async fn update(&self, id: i64, params: Value) -> Result<T> {
        let body = self.client.put(&self.member_url(id), &params).await?;
        into_resource(body)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&self.member_url(id)).await?;
        Ok(())
    }
}

fn data_of(mut body: Value) -> Value {
    body.get_mut("data").map(Value::take).unwrap_or(Value::Null)
}

impl<'a> Resources<'a, Job> {
    pub async fn add_task_responses(&self, id: i64, task_responses: Value) -> Result<Value> {
        let path = format!("{}/taskresponses", self.member_url(id));
        let body = self
            .client
            .post(&path, &json!({ "task_responses": task_responses }))
            .await?;
        Ok(data_of(body))
    }
}

impl<'a> Resources<'a, Location> {
    /// Merge location `id` into `replacement_id`, returning the surviving location.
    pub async fn merge(&self, id: i64, replacement_id: i64) -> Result<Location> {
        let path = format!("{}/merge", self.member_url(id));
        let body = self
            .client
            .post(&path, &json!({ "replacement_id": replacement_id }))
            .await?;
        into_resource(body)
    }

    pub async fn assets(&self, id: i64) -> Result<Vec<Value>> {
        let path = format!("{}/asset", self.member_url(id));
        let mut body = self.client.get(&path, &Value::Null).await?;
        Ok(take_items(&mut body, "assets"))
    }

    pub async fn comments(&self, id: i64) -> Result<Vec<Value>> {
        let path = format!("{}/comment", self.member_url(id));
        let mut body = self.client.get(&path, &Value::Null).await?;
        Ok(take_items(&mut body, "comments"))
    }

    pub async fn create_comment(&self, id: i64, params: Value) -> Result<Value> {
        let path = format!("{}/comment", self.member_url(id));
        let body = self.client.post(&path, &params).await?;
        Ok(data_of(body))
    }
}

impl<'a> Resources<'a, Region> {
    /// Recalculate which locations fall inside the region.
    pub async fn clear_cache(&self, id: i64) -> Result<()> {
        let path = format!("{}/cache", self.member_url(id));
        self.client.delete(&path).await?;
        Ok(())
    }
}
