//! `HttpSyncBackend` against an in-process key/value server.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use church_budget::{
    config::settings::SyncConfig,
    entities::{BudgetItem, Event, EventStatus, ItemCategory, ItemStatus},
    errors::Result,
    services::{HttpSyncBackend, SyncBackend},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

type Blobs = Arc<Mutex<HashMap<String, Bytes>>>;

async fn get_blob(State(blobs): State<Blobs>, Path(code): Path<String>) -> (StatusCode, Bytes) {
    match blobs.lock().unwrap().get(&code) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, Bytes::new()),
    }
}

async fn put_blob(State(blobs): State<Blobs>, Path(code): Path<String>, body: Bytes) -> StatusCode {
    blobs.lock().unwrap().insert(code, body);
    StatusCode::OK
}

/// Starts the server on an ephemeral port and returns a backend pointed at it.
async fn start_server() -> (HttpSyncBackend, Blobs) {
    let blobs: Blobs = Arc::default();
    let app = Router::new()
        .route("/:code", get(get_blob).post(put_blob))
        .with_state(Arc::clone(&blobs));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = SyncConfig {
        base_url: format!("http://{addr}"),
        ..SyncConfig::default()
    };
    (HttpSyncBackend::new(&config).unwrap(), blobs)
}

fn event(name: &str, items: Vec<BudgetItem>) -> Event {
    Event {
        id: format!("event-{name}"),
        name: name.to_string(),
        date: "2025-12-20".to_string(),
        description: String::new(),
        items,
        is_archived: false,
        status: EventStatus::Active,
    }
}

fn item(name: &str, estimated: f64) -> BudgetItem {
    BudgetItem {
        id: format!("item-{name}"),
        name: name.to_string(),
        category: ItemCategory::Food,
        supplier: "Bakery".to_string(),
        estimated_price: estimated,
        actual_price: 0.0,
        status: ItemStatus::Pending,
        discrepancy_notes: None,
        notes: None,
        payment_method: None,
        payment_plan: None,
        installments_count: None,
        reimbursement_recipient: None,
        reimbursement_details: None,
    }
}

#[tokio::test]
async fn test_push_then_pull_round_trip() -> Result<()> {
    let (backend, blobs) = start_server().await;
    let events = vec![event("Christmas", vec![item("Cake", 120.5)])];

    backend.push("ICPBB-AAAA-BBBB", &events).await?;
    assert_eq!(backend.pull("ICPBB-AAAA-BBBB").await?, Some(events));

    let stored = blobs.lock().unwrap().get("ICPBB-AAAA-BBBB").cloned().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&stored)?;
    assert_eq!(json[0]["items"][0]["estimatedPrice"], 120.5);
    Ok(())
}

#[tokio::test]
async fn test_pull_unknown_code_is_none() -> Result<()> {
    let (backend, _blobs) = start_server().await;
    assert!(backend.pull("ICPBB-ZZZZ-9999").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_last_push_wins() -> Result<()> {
    let (backend, _blobs) = start_server().await;
    let from_phone = vec![event("Phone", Vec::new())];
    let from_laptop = vec![event("Laptop", Vec::new()), event("Retreat", Vec::new())];

    backend.push("ICPBB-CCCC-DDDD", &from_phone).await?;
    backend.push("ICPBB-CCCC-DDDD", &from_laptop).await?;
    assert_eq!(backend.pull("ICPBB-CCCC-DDDD").await?, Some(from_laptop));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_an_error() {
    let config = SyncConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..SyncConfig::default()
    };
    let backend = HttpSyncBackend::new(&config).unwrap();
    assert!(backend.pull("ICPBB-AAAA-BBBB").await.is_err());
    assert!(backend.push("ICPBB-AAAA-BBBB", &[]).await.is_err());
}
