//! Paging with a deliberately small `API_MAX_PAGE_SIZE`. Lives in its own
//! test binary because the config singleton is read once per process.
mod common;

use anyhow::Result;
use common::TestApp;

const MAX_PAGE_SIZE: &str = "2";

fn small_page_app() -> TestApp {
    // Every test in this binary sets the same value before the config is first read
    std::env::set_var("API_MAX_PAGE_SIZE", MAX_PAGE_SIZE);
    TestApp::new()
}

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body["rows"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["Id"].as_i64()).collect())
        .unwrap_or_default()
}

async fn seed(app: &TestApp, count: i32) -> Result<Vec<i64>> {
    let mut created = Vec::new();
    for n in 1..=count {
        created.push(app.add_building(&format!("Block {}", n), n, n * 3, 100).await?);
    }
    Ok(created)
}

#[tokio::test]
async fn oversized_pages_still_cover_every_row() -> Result<()> {
    let app = small_page_app();
    let expected = seed(&app, 6).await?;

    let mut served = Vec::new();
    for page in 1..=4 {
        let body = app.get_json(&format!("/buildings?page={}&rows=3", page)).await?.json()?;
        assert_eq!(body["total"], 6);
        let rows = ids(&body);
        assert!(rows.len() <= 2, "page {} exceeded the max page size: {:?}", page, rows);
        served.extend(rows);
    }

    assert_eq!(served, expected);
    Ok(())
}

#[tokio::test]
async fn omitted_rows_pages_by_max_size() -> Result<()> {
    let app = small_page_app();
    let expected = seed(&app, 5).await?;

    let first = ids(&app.get_json("/buildings?page=1").await?.json()?);
    let second = ids(&app.get_json("/buildings?page=2").await?.json()?);
    let third = ids(&app.get_json("/buildings?page=3&rows=0").await?.json()?);

    assert_eq!([first, second, third].concat(), expected);
    Ok(())
}
