// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for read-only data fetching.
//!
//! Handles:
//! - Athlete profile and stats
//! - Paginated activity listing (100 per page, sequential)
//! - Activity detail
//!
//! Payloads are returned raw (`serde_json::Value`); the writer derives the
//! stored columns. Any non-2xx or transport failure aborts the call.

use crate::config::Config;
use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

/// Page size used for activity listing.
pub const ACTIVITIES_PER_PAGE: u32 = 100;

/// How many activity pages a listing may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    /// Stop after this many requests even if more data exists
    Limited(u32),
    /// Stop only at the first empty page
    Unlimited,
}

impl PageLimit {
    fn allows(&self, page: u32) -> bool {
        match self {
            PageLimit::Limited(max) => page <= *max,
            PageLimit::Unlimited => true,
        }
    }
}

/// Authenticated read access to the Strava API.
pub trait StravaApi {
    /// One page of `/athlete/activities` (summary payloads).
    fn list_activities_page(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;

    /// The authenticated athlete's profile, including `bikes` and `shoes`.
    fn get_athlete(&self, access_token: &str) -> impl Future<Output = Result<Value>> + Send;

    /// Aggregate stats for an athlete.
    fn get_athlete_stats(
        &self,
        access_token: &str,
        athlete_id: i64,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Detailed activity payload.
    fn get_activity(
        &self,
        access_token: &str,
        activity_id: i64,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// Walk activity pages 1, 2, 3, ... handing each non-empty page to
/// `on_page`, until a page comes back empty or `limit` pages have been
/// requested. Returns the number of records seen.
pub async fn for_each_activity_page<A, F>(
    api: &A,
    access_token: &str,
    limit: PageLimit,
    mut on_page: F,
) -> Result<usize>
where
    A: StravaApi,
    F: FnMut(u32, Vec<Value>) -> Result<()>,
{
    let mut page = 1;
    let mut total = 0;

    loop {
        if !limit.allows(page) {
            tracing::info!(page_limit = ?limit, "Reached page limit");
            break;
        }

        let batch = api
            .list_activities_page(access_token, page, ACTIVITIES_PER_PAGE)
            .await?;
        if batch.is_empty() {
            break;
        }

        total += batch.len();
        tracing::info!(page, batch_size = batch.len(), total, "Fetched activity page");
        on_page(page, batch)?;
        page += 1;
    }

    Ok(total)
}

/// Fetch every activity up to `limit` pages into one vector.
pub async fn list_activities<A: StravaApi>(
    api: &A,
    access_token: &str,
    limit: PageLimit,
) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    for_each_activity_page(api, access_token, limit, |_, batch| {
        records.extend(batch);
        Ok(())
    })
    .await?;
    Ok(records)
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl StravaClient {
    /// Create a client bounded by the configured request timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::ApiRequestFailed {
                status: None,
                body: e.to_string(),
            })?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
            } else {
                tracing::error!(status = %status, body = %body, "Strava API request failed");
            }

            return Err(AppError::ApiRequestFailed {
                status: Some(status.as_u16()),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ApiRequestFailed {
                status: Some(status.as_u16()),
                body: format!("JSON parse error: {}", e),
            })
    }
}

impl StravaApi for StravaClient {
    async fn list_activities_page(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        self.get_json(
            "athlete/activities",
            access_token,
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        )
        .await
    }

    async fn get_athlete(&self, access_token: &str) -> Result<Value> {
        self.get_json("athlete", access_token, &[]).await
    }

    async fn get_athlete_stats(&self, access_token: &str, athlete_id: i64) -> Result<Value> {
        self.get_json(&format!("athletes/{}/stats", athlete_id), access_token, &[])
            .await
    }

    async fn get_activity(&self, access_token: &str, activity_id: i64) -> Result<Value> {
        self.get_json(&format!("activities/{}", activity_id), access_token, &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Serves pages of the given sizes, then empty pages.
    struct ScriptedPages {
        sizes: Vec<usize>,
        requests: AtomicU32,
    }

    impl ScriptedPages {
        fn new(sizes: Vec<usize>) -> Self {
            Self {
                sizes,
                requests: AtomicU32::new(0),
            }
        }
    }

    impl StravaApi for ScriptedPages {
        async fn list_activities_page(
            &self,
            _access_token: &str,
            page: u32,
            per_page: u32,
        ) -> Result<Vec<Value>> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let size = self.sizes.get(page as usize - 1).copied().unwrap_or(0);
            let base = (page - 1) * per_page;
            Ok((0..size as u32)
                .map(|i| json!({ "id": base + i + 1 }))
                .collect())
        }

        async fn get_athlete(&self, _access_token: &str) -> Result<Value> {
            unreachable!()
        }

        async fn get_athlete_stats(&self, _access_token: &str, _athlete_id: i64) -> Result<Value> {
            unreachable!()
        }

        async fn get_activity(&self, _access_token: &str, _activity_id: i64) -> Result<Value> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_empty_page() {
        let api = ScriptedPages::new(vec![100, 100, 100, 0]);

        let records = list_activities(&api, "token", PageLimit::Unlimited)
            .await
            .unwrap();

        assert_eq!(records.len(), 300);
        assert_eq!(api.requests.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_stops_at_page_limit() {
        let api = ScriptedPages::new(vec![100; 50]);

        let records = list_activities(&api, "token", PageLimit::Limited(2))
            .await
            .unwrap();

        assert_eq!(records.len(), 200);
        assert_eq!(api.requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_short_page_does_not_stop_listing() {
        // Only an empty page terminates; a short page is just data.
        let api = ScriptedPages::new(vec![100, 37, 5]);

        let records = list_activities(&api, "token", PageLimit::Unlimited)
            .await
            .unwrap();

        assert_eq!(records.len(), 142);
        assert_eq!(api.requests.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_page_limit_makes_no_request() {
        let api = ScriptedPages::new(vec![100]);

        let records = list_activities(&api, "token", PageLimit::Limited(0))
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(api.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_callback_error_aborts_listing() {
        let api = ScriptedPages::new(vec![100, 100, 100]);

        let result = for_each_activity_page(&api, "token", PageLimit::Unlimited, |page, _| {
            if page == 2 {
                Err(AppError::Database("disk full".to_string()))
            } else {
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(api.requests.load(Ordering::SeqCst), 2);
    }
}
