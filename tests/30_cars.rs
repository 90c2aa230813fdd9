mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{created_id, TestServer};

#[tokio::test]
async fn create_list_and_fetch_car() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("X").await?;

    let res = server
        .post(
            &format!("/dealerships/{}/cars", dealership),
            json!({ "make": "Toyota", "model": "Corolla" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let car = created_id(res).await?;

    let expected = json!({
        "id": car,
        "make": "Toyota",
        "model": "Corolla",
        "dealershipId": dealership
    });

    let res = server.get(&format!("/dealerships/{}/cars", dealership)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([expected.clone()]));

    let res = server.get(&format!("/dealerships/{}/cars/{}", dealership, car)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, expected);
    Ok(())
}

#[tokio::test]
async fn car_is_invisible_under_another_dealership() -> Result<()> {
    let server = TestServer::start().await?;
    let a = server.create_dealership("A").await?;
    let b = server.create_dealership("B").await?;
    let car = server.create_car(a, "Honda", "Civic").await?;

    let res = server.get(&format!("/dealerships/{}/cars/{}", b, car)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await?, "Car not found.");

    let res = server.get(&format!("/dealerships/{}/cars", b)).await?;
    assert_eq!(res.json::<Value>().await?, json!([]));

    // Update and delete under the wrong scope report success but change nothing
    let res = server
        .put(
            &format!("/dealerships/{}/cars/{}", b, car),
            json!({ "make": "Hijacked", "model": "Car" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.delete(&format!("/dealerships/{}/cars/{}", b, car)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.delete(&format!("/dealerships/{}/cars", b)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.get(&format!("/dealerships/{}/cars/{}", a, car)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["make"], "Honda");
    assert_eq!(body["model"], "Civic");
    Ok(())
}

#[tokio::test]
async fn update_car_changes_make_and_model() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("Elite Motors").await?;
    let car = server.create_car(dealership, "Chevrolet", "Malibu").await?;
    let path = format!("/dealerships/{}/cars/{}", dealership, car);

    let res = server.put(&path, json!({ "make": "Chevrolet", "model": "Camaro" })).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.get(&path).await?;
    assert_eq!(res.json::<Value>().await?["model"], "Camaro");
    Ok(())
}

#[tokio::test]
async fn update_unknown_car_is_ok() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("Prime Cars").await?;

    let res = server
        .put(
            &format!("/dealerships/{}/cars/12345", dealership),
            json!({ "make": "Ford", "model": "Focus" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn delete_single_car() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("Drive Time").await?;
    let gone = server.create_car(dealership, "Ford", "Mustang").await?;
    let kept = server.create_car(dealership, "Tesla", "Model 3").await?;

    let res = server.delete(&format!("/dealerships/{}/cars/{}", dealership, gone)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.get(&format!("/dealerships/{}/cars", dealership)).await?;
    let cars = res.json::<Value>().await?;
    assert_eq!(cars.as_array().map(Vec::len), Some(1));
    assert_eq!(cars[0]["id"], kept);
    Ok(())
}

#[tokio::test]
async fn delete_all_cars_keeps_dealership() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("Car Nation").await?;
    server.create_car(dealership, "Toyota", "Corolla").await?;
    server.create_car(dealership, "Honda", "Civic").await?;

    let res = server.delete(&format!("/dealerships/{}/cars", dealership)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.get(&format!("/dealerships/{}/cars", dealership)).await?;
    assert_eq!(res.json::<Value>().await?, json!([]));

    let res = server.get(&format!("/dealerships/{}", dealership)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn create_car_under_missing_dealership_is_404() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .post("/dealerships/404/cars", json!({ "make": "Toyota", "model": "Corolla" }))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .post("/dealerships/nope/cars", json!({ "make": "Toyota", "model": "Corolla" }))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_car_requires_make_and_model() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("Auto World").await?;

    let res = server
        .post(&format!("/dealerships/{}/cars", dealership), json!({ "make": "Toyota" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["model"].is_string());
    assert!(body["field_errors"].get("make").is_none());

    let res = server.get(&format!("/dealerships/{}/cars", dealership)).await?;
    assert_eq!(res.json::<Value>().await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn malformed_car_ids() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("Auto World").await?;

    let res = server.get(&format!("/dealerships/{}/cars/abc", dealership)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.get("/dealerships/abc/cars").await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let res = server.delete(&format!("/dealerships/{}/cars/abc", dealership)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Percent-encoded bytes that are not UTF-8
    let car = server.create_car(dealership, "Honda", "Civic").await?;

    let res = server.get(&format!("/dealerships/{}/cars/%FF", dealership)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await?, "Car not found.");

    let res = server.get("/dealerships/%FF/cars").await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let res = server
        .post("/dealerships/%FF/cars", json!({ "make": "Ford", "model": "Ka" }))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await?, "Dealership not found.");

    let res = server
        .put(
            &format!("/dealerships/%FF/cars/{}", car),
            json!({ "make": "Ford", "model": "Ka" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.delete(&format!("/dealerships/{}/cars/%FF", dealership)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.delete("/dealerships/%FF/cars").await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.get(&format!("/dealerships/{}/cars/{}", dealership, car)).await?;
    assert_eq!(res.json::<Value>().await?["model"], "Civic");
    Ok(())
}

#[tokio::test]
async fn update_car_with_missing_fields_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let dealership = server.create_dealership("Elite Motors").await?;
    let car = server.create_car(dealership, "Tesla", "Model 3").await?;
    let path = format!("/dealerships/{}/cars/{}", dealership, car);

    let res = server.put(&path, json!({ "make": "x" })).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["model"].is_string());

    let res = server.put(&path, json!({})).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["make"].is_string());
    assert!(body["field_errors"]["model"].is_string());

    let res = server.get(&path).await?;
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "id": car, "make": "Tesla", "model": "Model 3", "dealershipId": dealership })
    );

    let lines = server.audit_lines().await?;
    assert!(lines.iter().all(|l| !l.contains("updated")));
    Ok(())
}
