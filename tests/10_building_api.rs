mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn root_and_health_respond() -> Result<()> {
    let app = TestApp::new();

    let res = app.get_json("/").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()?["data"]["version"], env!("CARGO_PKG_VERSION"));

    let res = app.get_json("/health").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()?["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn building_lifecycle() -> Result<()> {
    let app = TestApp::new();

    // Create
    let res = app
        .post_form(
            "/buildings",
            "Name=Tower+A&Floors=10&Height=30&Area=500&BuildDate=2020-01-01&Remark=",
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()?, serde_json::json!({"success": true, "message": "Success"}));

    // List
    let body = app.get_json("/buildings?page=1&rows=10").await?.json()?;
    assert_eq!(body["total"], 1);
    let row = &body["rows"][0];
    assert_eq!(row["Name"], "Tower A");
    assert_eq!(row["Floors"], 10);
    assert_eq!(row["BuildDate"], "2020-01-01");
    let id = row["Id"].as_i64().expect("Id is numeric");
    assert!(id > 0);
    let created = row["Created"].clone();

    // Name filter finds exactly the new row
    app.add_building("Annex", 2, 8, 120).await?;
    let body = app.get_json("/buildings?name=Tower").await?.json()?;
    assert_eq!(body["total"], 1);
    assert_eq!(body["rows"][0]["Id"], id);

    // Partial update
    let res = app.post_form("/buildings/update", &format!("Id={}&Floors=12", id)).await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());

    let body = app.get_json("/buildings?name=Tower").await?.json()?;
    let row = &body["rows"][0];
    assert_eq!(row["Floors"], 12);
    assert_eq!(row["Height"], 30);
    assert_eq!(row["Name"], "Tower A");
    assert_eq!(row["Created"], created);

    // Delete
    let res = app.post_form(&format!("/buildings/delete?Id={}", id), "").await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());

    let body = app.get_json("/buildings?name=Tower").await?.json()?;
    assert_eq!(body["total"], 0);
    assert_eq!(body["rows"], serde_json::json!([]));
    assert_eq!(app.get_json("/buildings").await?.json()?["total"], 1);
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_fields() -> Result<()> {
    let app = TestApp::new();

    let res = app.post_form("/buildings", "Name=Tower+A&Floors=10&Height=30&BuildDate=2020-01-01").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json()?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Area can not be empty");
    assert_eq!(body["field_errors"][0]["field"], "Area");

    assert_eq!(app.get_json("/buildings").await?.json()?["total"], 0);
    Ok(())
}

#[tokio::test]
async fn create_rejects_long_name_and_malformed_numbers() -> Result<()> {
    let app = TestApp::new();

    let long = "x".repeat(21);
    let res = app
        .post_form("/buildings", &format!("Name={}&Floors=1&Height=3&Area=50&BuildDate=2020-01-01", long))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["message"], "Name maximum size is 20");

    let res = app
        .post_form("/buildings", "Name=Tower+B&Floors=many&Height=3&Area=50&BuildDate=2020-01-01")
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["success"], false);
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() -> Result<()> {
    let app = TestApp::new();
    app.add_building("Tower A", 10, 30, 500).await?;

    let res = app
        .post_form("/buildings", "Name=Tower+A&Floors=5&Height=15&Area=200&BuildDate=2021-06-01")
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    let body = res.json()?;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap_or_default().contains("duplicate key"));

    assert_eq!(app.get_json("/buildings").await?.json()?["total"], 1);
    Ok(())
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let id = app.add_building("Tower A", 10, 30, 500).await?;

    let res = app.post_form("/buildings/update", &format!("Id={}", id)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["message"], "update field is empty");
    Ok(())
}

#[tokio::test]
async fn update_rejects_supplied_zero() -> Result<()> {
    let app = TestApp::new();
    let id = app.add_building("Tower A", 10, 30, 500).await?;

    let res = app.post_form("/buildings/update", &format!("Id={}&Floors=0", id)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["message"], "Floors must be greater than zero");

    let body = app.get_json("/buildings").await?.json()?;
    assert_eq!(body["rows"][0]["Floors"], 10);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_require_an_existing_id() -> Result<()> {
    let app = TestApp::new();

    let res = app.post_form("/buildings/update", "Floors=3").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["message"], "Id is required");

    let res = app.post_form("/buildings/update", "Id=999&Floors=3").await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()?["success"], false);

    let res = app.post_form("/buildings/delete", "").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.post_form("/buildings/delete?Id=999", "").await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_accepts_id_in_form_body() -> Result<()> {
    let app = TestApp::new();
    let id = app.add_building("Tower A", 10, 30, 500).await?;

    let res = app.post_form("/buildings/delete", &format!("Id={}", id)).await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(app.get_json("/buildings").await?.json()?["total"], 0);
    Ok(())
}

#[tokio::test]
async fn malformed_delete_query_gets_failure_envelope() -> Result<()> {
    let app = TestApp::new();
    let id = app.add_building("Tower A", 10, 30, 500).await?;

    let res = app.post_form(&format!("/buildings/delete?Id={}&id={}", id, id), "").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.content_type.starts_with("application/json"), "{}", res.content_type);
    let body = res.json()?;
    assert_eq!(body["success"], false);
    assert!(!body["message"].as_str().unwrap_or_default().is_empty());

    assert_eq!(app.get_json("/buildings").await?.json()?["total"], 1);
    Ok(())
}
