//! # Remote data client
//!
//! [`RemoteClient`] issues typed CRUD against the hosted table store's
//! REST dialect: `/rest/v1/<table>` with `column=op.value` query pairs,
//! `apikey`/bearer headers, and `Prefer: return=representation` on writes
//! so created and updated rows come back decoded.
//!
//! [`Query`] collects conjunctive filter predicates. Unset filters are
//! omitted, never defaulted; ordering defaults to most-recently-created
//! first unless an operation specifies otherwise (dealerships order by
//! rating). [`Query::signature`] renders a canonical string for the
//! filter set — the cache key under which list results are stored.
//!
//! All failures surface the backend's error `{code, message}` as
//! [`Error::Remote`]; this layer performs no retries.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use store::models::{
    Booking, BookingStatus, Car, CarStatus, Dealership, NewBooking, NewCar, NewReview,
    NotificationRow, Review, Table, UserProfile,
};

use crate::config::AppConfig;
use crate::error::{ApiResult, Error, RemoteErrorBody};

/// A filtered, ordered selection over one table.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    table: Table,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    limit: Option<u32>,
}

impl Query {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn gte(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("gte.{value}")));
        self
    }

    pub fn lte(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("lte.{value}")));
        self
    }

    /// Case-insensitive contains on one column.
    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.*{needle}*")));
        self
    }

    /// Case-insensitive contains across several columns (disjunctive).
    pub fn or_ilike(mut self, columns: &[&str], needle: &str) -> Self {
        let clauses: Vec<String> = columns
            .iter()
            .map(|c| format!("{c}.ilike.*{needle}*"))
            .collect();
        self.filters
            .push(("or".to_string(), format!("({})", clauses.join(","))));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), true));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), false));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Query-string pairs in wire order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(self.filters.iter().cloned());
        if let Some((column, desc)) = &self.order {
            let direction = if *desc { "desc" } else { "asc" };
            pairs.push(("order".to_string(), format!("{column}.{direction}")));
        }
        if let Some(n) = self.limit {
            pairs.push(("limit".to_string(), n.to_string()));
        }
        pairs
    }

    /// Canonical signature of this query: filters sorted, then order and
    /// limit. Equal filter sets render equal signatures regardless of the
    /// order predicates were added in.
    pub fn signature(&self) -> String {
        let mut filters: Vec<String> = self
            .filters
            .iter()
            .map(|(column, predicate)| format!("{column}={predicate}"))
            .collect();
        filters.sort();
        let mut parts = filters;
        if let Some((column, desc)) = &self.order {
            let direction = if *desc { "desc" } else { "asc" };
            parts.push(format!("order={column}.{direction}"));
        }
        if let Some(n) = self.limit {
            parts.push(format!("limit={n}"));
        }
        parts.join("&")
    }
}

/// Car list filters; unset fields are omitted from the query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarFilter {
    pub category: Option<String>,
    pub city: Option<String>,
    pub status: Option<CarStatus>,
    pub available: Option<bool>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub dealership_id: Option<String>,
    /// Free-text search over brand and model.
    pub search: Option<String>,
}

impl CarFilter {
    /// Approved, available cars — the default customer browse view.
    pub fn browsable() -> Self {
        Self {
            status: Some(CarStatus::Approved),
            available: Some(true),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Query {
        let mut query = Query::new(Table::Cars).order_desc("created_at");
        if let Some(category) = &self.category {
            query = query.eq("category", category);
        }
        if let Some(city) = &self.city {
            query = query.eq("city", city);
        }
        if let Some(status) = self.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(available) = self.available {
            query = query.eq("available", available);
        }
        if let Some(min) = self.min_rate {
            query = query.gte("daily_rate", min);
        }
        if let Some(max) = self.max_rate {
            query = query.lte("daily_rate", max);
        }
        if let Some(dealership_id) = &self.dealership_id {
            query = query.eq("dealership_id", dealership_id);
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.or_ilike(&["brand", "model"], search.trim());
        }
        query
    }

    pub fn signature(&self) -> String {
        self.to_query().signature()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingFilter {
    pub customer_id: Option<String>,
    pub dealership_id: Option<String>,
    pub car_id: Option<String>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn to_query(&self) -> Query {
        let mut query = Query::new(Table::Bookings).order_desc("created_at");
        if let Some(customer_id) = &self.customer_id {
            query = query.eq("customer_id", customer_id);
        }
        if let Some(dealership_id) = &self.dealership_id {
            query = query.eq("dealership_id", dealership_id);
        }
        if let Some(car_id) = &self.car_id {
            query = query.eq("car_id", car_id);
        }
        if let Some(status) = self.status {
            query = query.eq("status", status.as_str());
        }
        query
    }

    pub fn signature(&self) -> String {
        self.to_query().signature()
    }
}

/// Partial update of a car listing.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CarPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

/// Partial update of a dealership (admin edit flow).
#[derive(Clone, Debug, Default, Serialize)]
pub struct DealershipPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Partial update of the signed-in user's profile.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Thin typed wrapper over the hosted table store.
#[derive(Clone, Debug)]
pub struct RemoteClient {
    http: reqwest::Client,
    config: AppConfig,
}

impl RemoteClient {
    pub fn new(config: AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    /// Run a query and decode the row set.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> ApiResult<Vec<T>> {
        let response = self
            .request(
                reqwest::Method::GET,
                self.config.rest_url(query.table().as_str()),
            )
            .query(&query.query_pairs())
            .send()
            .await?;
        Ok(ok_or_remote(response).await?.json().await?)
    }

    /// Insert one row and decode the created representation.
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: Table,
        row: &T,
    ) -> ApiResult<R> {
        let response = self
            .request(reqwest::Method::POST, self.config.rest_url(table.as_str()))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        first_row(ok_or_remote(response).await?.json().await?, table)
    }

    /// Patch rows matching `filters` and decode the updated rows.
    pub async fn update<T: Serialize, R: DeserializeOwned>(
        &self,
        table: Table,
        filters: &[(&str, String)],
        patch: &T,
    ) -> ApiResult<Vec<R>> {
        let response = self
            .request(
                reqwest::Method::PATCH,
                self.config.rest_url(table.as_str()),
            )
            .query(filters)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        Ok(ok_or_remote(response).await?.json().await?)
    }

    pub async fn delete(&self, table: Table, id: &str) -> ApiResult<()> {
        let response = self
            .request(
                reqwest::Method::DELETE,
                self.config.rest_url(table.as_str()),
            )
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        ok_or_remote(response).await?;
        Ok(())
    }

    async fn get_by_id<T: DeserializeOwned>(&self, table: Table, id: &str) -> ApiResult<Option<T>> {
        let query = Query::new(table).eq("id", id).limit(1);
        let mut rows: Vec<T> = self.select(&query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    // --- cars ---

    pub async fn list_cars(&self, filter: &CarFilter) -> ApiResult<Vec<Car>> {
        self.select(&filter.to_query()).await
    }

    pub async fn get_car(&self, id: &str) -> ApiResult<Option<Car>> {
        self.get_by_id(Table::Cars, id).await
    }

    pub async fn create_car(&self, car: &NewCar) -> ApiResult<Car> {
        self.insert(Table::Cars, car).await
    }

    pub async fn update_car(&self, id: &str, patch: &CarPatch) -> ApiResult<Car> {
        let rows = self
            .update(Table::Cars, &[("id", format!("eq.{id}"))], patch)
            .await?;
        first_row(rows, Table::Cars)
    }

    /// Moderation: flip a listing's status (admin flow).
    pub async fn set_car_status(&self, id: &str, status: CarStatus) -> ApiResult<Car> {
        let rows = self
            .update(
                Table::Cars,
                &[("id", format!("eq.{id}"))],
                &json!({ "status": status.as_str() }),
            )
            .await?;
        first_row(rows, Table::Cars)
    }

    pub async fn delete_car(&self, id: &str) -> ApiResult<()> {
        self.delete(Table::Cars, id).await
    }

    // --- bookings ---

    pub async fn list_bookings(&self, filter: &BookingFilter) -> ApiResult<Vec<Booking>> {
        self.select(&filter.to_query()).await
    }

    pub async fn create_booking(&self, booking: &NewBooking) -> ApiResult<Booking> {
        self.insert(Table::Bookings, booking).await
    }

    pub async fn set_booking_status(&self, id: &str, status: BookingStatus) -> ApiResult<Booking> {
        let rows = self
            .update(
                Table::Bookings,
                &[("id", format!("eq.{id}"))],
                &json!({ "status": status.as_str() }),
            )
            .await?;
        first_row(rows, Table::Bookings)
    }

    // --- dealerships ---

    /// Active dealerships, best-rated first.
    pub async fn list_dealerships(&self) -> ApiResult<Vec<Dealership>> {
        let query = Query::new(Table::Dealerships)
            .eq("active", true)
            .order_desc("rating");
        self.select(&query).await
    }

    pub async fn get_dealership(&self, id: &str) -> ApiResult<Option<Dealership>> {
        self.get_by_id(Table::Dealerships, id).await
    }

    /// Admin flow: edit a dealership in place.
    pub async fn update_dealership(
        &self,
        id: &str,
        patch: &DealershipPatch,
    ) -> ApiResult<Dealership> {
        let rows = self
            .update(Table::Dealerships, &[("id", format!("eq.{id}"))], patch)
            .await?;
        first_row(rows, Table::Dealerships)
    }

    /// Admin flow: toggle a dealership's active flag.
    pub async fn set_dealership_active(&self, id: &str, active: bool) -> ApiResult<Dealership> {
        self.update_dealership(
            id,
            &DealershipPatch {
                active: Some(active),
                ..DealershipPatch::default()
            },
        )
        .await
    }

    // --- reviews ---

    /// Visible reviews for a car, newest first.
    pub async fn list_reviews(&self, car_id: &str) -> ApiResult<Vec<Review>> {
        let query = Query::new(Table::Reviews)
            .eq("car_id", car_id)
            .eq("visible", true)
            .order_desc("created_at");
        self.select(&query).await
    }

    pub async fn create_review(&self, review: &NewReview) -> ApiResult<Review> {
        self.insert(Table::Reviews, review).await
    }

    // --- notifications ---

    pub async fn list_notifications(&self, recipient_id: &str) -> ApiResult<Vec<NotificationRow>> {
        let query = Query::new(Table::Notifications)
            .eq("recipient_id", recipient_id)
            .order_desc("created_at");
        self.select(&query).await
    }

    /// Mark a notification read. The read flag only moves false→true, so
    /// the update is scoped to unread rows and marking an already-read
    /// row is a no-op.
    pub async fn mark_notification_read(&self, id: &str) -> ApiResult<()> {
        let _rows: Vec<NotificationRow> = self
            .update(
                Table::Notifications,
                &[
                    ("id", format!("eq.{id}")),
                    ("read", "eq.false".to_string()),
                ],
                &json!({ "read": true }),
            )
            .await?;
        Ok(())
    }

    // --- profiles ---

    pub async fn get_profile(&self, id: &str) -> ApiResult<Option<UserProfile>> {
        self.get_by_id(Table::Profiles, id).await
    }

    pub async fn get_profile_by_email(&self, email: &str) -> ApiResult<Option<UserProfile>> {
        let query = Query::new(Table::Profiles).eq("email", email).limit(1);
        let mut rows: Vec<UserProfile> = self.select(&query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    pub async fn update_profile(&self, id: &str, patch: &ProfilePatch) -> ApiResult<UserProfile> {
        let rows = self
            .update(Table::Profiles, &[("id", format!("eq.{id}"))], patch)
            .await?;
        first_row(rows, Table::Profiles)
    }
}

fn first_row<R>(mut rows: Vec<R>, table: Table) -> ApiResult<R> {
    if rows.is_empty() {
        return Err(Error::remote(
            None,
            format!("{table} write returned no representation"),
        ));
    }
    Ok(rows.swap_remove(0))
}

pub(crate) async fn ok_or_remote(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: Option<RemoteErrorBody> = response.json().await.ok();
    let (code, message) = match body {
        Some(body) => (
            body.code,
            body.message.unwrap_or_else(|| status.to_string()),
        ),
        None => (None, status.to_string()),
    };
    tracing::debug!(%status, code = code.as_deref(), "remote call failed: {message}");
    Err(Error::Remote { code, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_filters_are_omitted() {
        let query = CarFilter::default().to_query();
        let pairs = query.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn filters_combine_conjunctively() {
        let filter = CarFilter {
            category: Some("suv".into()),
            min_rate: Some(30.0),
            max_rate: Some(90.0),
            available: Some(true),
            ..CarFilter::default()
        };
        let pairs = filter.to_query().query_pairs();
        assert!(pairs.contains(&("category".to_string(), "eq.suv".to_string())));
        assert!(pairs.contains(&("daily_rate".to_string(), "gte.30".to_string())));
        assert!(pairs.contains(&("daily_rate".to_string(), "lte.90".to_string())));
        assert!(pairs.contains(&("available".to_string(), "eq.true".to_string())));
    }

    #[test]
    fn search_spans_brand_and_model() {
        let filter = CarFilter {
            search: Some("  corolla ".into()),
            ..CarFilter::default()
        };
        let pairs = filter.to_query().query_pairs();
        assert!(pairs.contains(&(
            "or".to_string(),
            "(brand.ilike.*corolla*,model.ilike.*corolla*)".to_string()
        )));
    }

    #[test]
    fn blank_search_is_omitted() {
        let filter = CarFilter {
            search: Some("   ".into()),
            ..CarFilter::default()
        };
        let pairs = filter.to_query().query_pairs();
        assert!(!pairs.iter().any(|(column, _)| column == "or"));
    }

    #[test]
    fn signatures_are_canonical_across_construction_order() {
        let a = Query::new(Table::Cars)
            .eq("category", "suv")
            .lte("daily_rate", 90)
            .order_desc("created_at");
        let b = Query::new(Table::Cars)
            .lte("daily_rate", 90)
            .eq("category", "suv")
            .order_desc("created_at");
        assert_eq!(a.signature(), b.signature());
        assert_eq!(
            a.signature(),
            "category=eq.suv&daily_rate=lte.90&order=created_at.desc"
        );
    }

    #[test]
    fn different_filters_have_different_signatures() {
        let porto = CarFilter {
            city: Some("porto".into()),
            ..CarFilter::default()
        };
        let lisbon = CarFilter {
            city: Some("lisbon".into()),
            ..CarFilter::default()
        };
        assert_ne!(porto.signature(), lisbon.signature());
    }

    #[test]
    fn dealership_listing_orders_by_rating() {
        let query = Query::new(Table::Dealerships)
            .eq("active", true)
            .order_desc("rating");
        assert_eq!(query.signature(), "active=eq.true&order=rating.desc");
    }

    #[test]
    fn booking_filter_scopes_to_customer() {
        let filter = BookingFilter {
            customer_id: Some("u1".into()),
            status: Some(BookingStatus::Requested),
            ..BookingFilter::default()
        };
        let pairs = filter.to_query().query_pairs();
        assert!(pairs.contains(&("customer_id".to_string(), "eq.u1".to_string())));
        assert!(pairs.contains(&("status".to_string(), "eq.requested".to_string())));
    }

    #[test]
    fn car_patch_serializes_only_set_fields() {
        let patch = CarPatch {
            daily_rate: Some(45.0),
            ..CarPatch::default()
        };
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, serde_json::json!({ "daily_rate": 45.0 }));
    }

    #[test]
    fn an_empty_write_representation_is_a_remote_error() {
        let rows: Vec<Car> = Vec::new();
        let err = first_row(rows, Table::Cars).unwrap_err();
        assert!(matches!(err, Error::Remote { code: None, .. }));
    }
}
