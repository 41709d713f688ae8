// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity pagination over HTTP against a fake Strava API.

mod common;

use common::{spawn_strava, FakeStrava};
use strava_sync::config::Config;
use strava_sync::error::AppError;
use strava_sync::services::{list_activities, PageLimit, StravaApi, StravaClient};

fn client(api_url: &str) -> StravaClient {
    StravaClient::new(&Config::test_default("http://unused", api_url)).unwrap()
}

#[tokio::test]
async fn test_unlimited_stops_at_empty_page() {
    let (url, strava) = spawn_strava(FakeStrava::with_pages(vec![100, 100, 100])).await;

    let records = list_activities(&client(&url), "tok", PageLimit::Unlimited)
        .await
        .unwrap();

    assert_eq!(records.len(), 300);
    assert_eq!(strava.list_requests(), 4);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[299]["id"], 300);
}

#[tokio::test]
async fn test_page_limit_caps_requests() {
    let (url, strava) = spawn_strava(FakeStrava::with_pages(vec![100; 10])).await;

    let records = list_activities(&client(&url), "tok", PageLimit::Limited(2))
        .await
        .unwrap();

    assert_eq!(records.len(), 200);
    assert_eq!(strava.list_requests(), 2);
}

#[tokio::test]
async fn test_bearer_token_sent() {
    let (url, strava) = spawn_strava(FakeStrava::with_pages(vec![3])).await;

    list_activities(&client(&url), "the_access_token", PageLimit::Unlimited)
        .await
        .unwrap();

    assert_eq!(strava.tokens_seen(), vec!["the_access_token"; 2]);
}

#[tokio::test]
async fn test_failing_page_aborts_with_status_and_body() {
    let (url, strava) = spawn_strava(FakeStrava {
        page_sizes: vec![100, 100, 100],
        failing_page: Some(2),
        ..Default::default()
    })
    .await;

    let err = list_activities(&client(&url), "tok", PageLimit::Unlimited)
        .await
        .unwrap_err();

    match err {
        AppError::ApiRequestFailed { status, body } => {
            assert_eq!(status, Some(500));
            assert!(body.contains("upstream exploded"), "{}", body);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(strava.list_requests(), 2);
}

#[tokio::test]
async fn test_unreachable_api_has_no_status() {
    let url = common::dead_url().await;

    let err = client(&url).get_athlete("tok").await.unwrap_err();

    assert!(
        matches!(err, AppError::ApiRequestFailed { status: None, .. }),
        "{:?}",
        err
    );
    assert!(err.is_retryable());
}
