#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use pms_api_rust::database::MemoryBuildingRepository;
use pms_api_rust::services::BuildingService;

pub const FORM: &str = "application/x-www-form-urlencoded";

/// Application over a fresh in-memory store; every test gets its own.
pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body)
            .with_context(|| format!("response is not JSON: {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let service = BuildingService::new(Arc::new(MemoryBuildingRepository::new()));
        Self { router: pms_api_rust::app(Arc::new(service)) }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(TestResponse { status, content_type, body: body.to_vec() })
    }

    /// GET as a script-driven client (JSON listing)
    pub async fn get_json(&self, uri: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .uri(uri)
            .header("X-Requested-With", "XMLHttpRequest")
            .body(Body::empty())?;
        self.send(request).await
    }

    /// GET as a browser (HTML listing)
    pub async fn get_html(&self, uri: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .uri(uri)
            .header(header::ACCEPT, "text/html,application/xhtml+xml")
            .body(Body::empty())?;
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, FORM)
            .body(Body::from(form.to_string()))?;
        self.send(request).await
    }

    /// Create a building with sensible defaults and return its identifier
    pub async fn add_building(&self, name: &str, floors: i32, height: i32, area: i32) -> Result<i64> {
        let form = format!(
            "Name={}&Floors={}&Height={}&Area={}&BuildDate=2020-01-01",
            name.replace(' ', "+"),
            floors,
            height,
            area
        );
        let res = self.post_form("/buildings", &form).await?;
        anyhow::ensure!(res.status == StatusCode::OK, "create failed: {} {}", res.status, res.text());

        let listing = self.get_json(&format!("/buildings?name={}", name.replace(' ', "+"))).await?.json()?;
        listing["rows"]
            .as_array()
            .and_then(|rows| rows.iter().find(|row| row["Name"] == name))
            .and_then(|row| row["Id"].as_i64())
            .context("created building not found in listing")
    }
}
