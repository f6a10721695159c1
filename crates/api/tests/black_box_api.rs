use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use stocksense_api::app::{build_app, services::AppServices};
use stocksense_infra::InsightSettings;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory storage, ephemeral port.
        let app = build_app(AppServices::in_memory(InsightSettings::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn add_product(&self, name: &str, stock: u32, min: u32) -> Value {
        let res = self
            .client
            .post(self.url("/api/inventory"))
            .json(&json!({
                "name": name,
                "sku": format!("SKU-{name}"),
                "category": "Building",
                "stockQuantity": stock,
                "costPrice": 10.0,
                "sellingPrice": 15.0,
                "minStockLevel": min,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn id_of(product: &Value) -> String {
    product["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn banner_and_health() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.text().await.unwrap(),
        "Inventory Intelligence API is running"
    );

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_lifecycle() {
    let srv = TestServer::spawn().await;
    let created = srv.add_product("Cement", 40, 10).await;
    let id = id_of(&created);
    assert_eq!(created["stockQuantity"], 40);
    assert_eq!(created["damagedQuantity"], 0);

    let res = srv
        .client
        .put(srv.url(&format!("/api/inventory/{id}")))
        .json(&json!({ "sellingPrice": 18.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["sellingPrice"], 18.5);
    assert_eq!(updated["name"], "Cement");

    let res = srv
        .client
        .patch(srv.url(&format!("/api/inventory/{id}/stock")))
        .json(&json!({ "stockQuantity": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let restocked: Value = res.json().await.unwrap();
    assert_eq!(restocked["stockQuantity"], 7);

    let listed: Value = srv
        .client
        .get(srv.url("/api/inventory?category=Building"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let res = srv
        .client
        .delete(srv.url(&format!("/api/inventory/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product deleted");
    assert_eq!(body["product"]["id"], created["id"]);

    let res = srv
        .client
        .get(srv.url(&format!("/api/inventory/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn malformed_ids_and_bodies_are_bad_requests() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(srv.url("/api/inventory/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
    assert!(body["message"].is_string());

    let res = srv
        .client
        .post(srv.url("/api/inventory"))
        .json(&json!({ "name": "No price" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "malformed_request");

    let res = srv
        .client
        .post(srv.url("/api/inventory"))
        .json(&json!({
            "name": "  ",
            "sku": "X",
            "category": "Y",
            "costPrice": 1.0,
            "sellingPrice": 2.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn stock_update_requires_a_non_negative_quantity() {
    let srv = TestServer::spawn().await;
    let id = id_of(&srv.add_product("Sand", 5, 0).await);

    for body in [json!({}), json!({ "stockQuantity": -3 })] {
        let res = srv
            .client
            .patch(srv.url(&format!("/api/inventory/{id}/stock")))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Value = res.json().await.unwrap();
        assert_eq!(err["error"], "validation_error");
        assert_eq!(err["message"], "valid stockQuantity is required");
    }

    let product: Value = srv
        .client
        .get(srv.url(&format!("/api/inventory/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(product["stockQuantity"], 5);
}

#[tokio::test]
async fn sales_drive_stockout_refill_and_trends() {
    let srv = TestServer::spawn().await;
    let fast = id_of(&srv.add_product("Fast", 10, 2).await);
    let idle = id_of(&srv.add_product("Idle", 30, 2).await);
    let low = id_of(&srv.add_product("Low", 1, 5).await);

    let sold_at = (Utc::now() - ChronoDuration::days(1)).to_rfc3339();
    let res = srv
        .client
        .post(srv.url("/api/sales"))
        .json(&json!({
            "sales": [
                { "productId": fast, "quantity": 20, "soldAt": sold_at },
                { "productId": fast, "quantity": 8 },
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let recorded: Value = res.json().await.unwrap();
    assert_eq!(recorded.as_array().unwrap().len(), 2);

    // 28 units over 14 days => 2/day => 5 days of cover.
    let report: Value = srv
        .client
        .get(srv.url("/api/analytics/stockout"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let predictions = report["predictions"].as_array().unwrap();
    let fast_row = predictions.iter().find(|p| p["id"] == fast.as_str()).unwrap();
    assert_eq!(fast_row["avgDailySales"], 2.0);
    assert_eq!(fast_row["daysUntilStockout"], 5);
    assert_eq!(fast_row["status"], "warning");
    assert_eq!(report["summary"]["warning"], 1);
    assert_eq!(predictions.last().unwrap()["status"], "no-sales");

    let refill: Value = srv
        .client
        .get(srv.url("/api/refill"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let decision = |id: &str| {
        refill
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["productId"] == id)
            .map(|r| r["decision"]["decision"].clone())
            .unwrap()
    };
    assert_eq!(decision(&fast), "HOLD");
    assert_eq!(decision(&idle), "STOP_REORDER");
    assert_eq!(decision(&low), "REFILL_NOW");

    let trends: Value = srv
        .client
        .get(srv.url("/api/analytics/trends"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trends[0]["productId"], fast.as_str());
    assert_eq!(trends[0]["productName"], "Fast");
    assert_eq!(trends[0]["totalSold"], 28);

    let totals: Value = srv
        .client
        .get(srv.url("/api/analytics/daily-totals"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let units: u64 = totals
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["totalSold"].as_u64().unwrap())
        .sum();
    assert_eq!(units, 28);
}

#[tokio::test]
async fn sales_for_unknown_products_are_rejected() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .post(srv.url("/api/sales"))
        .json(&json!({
            "sales": [{ "productId": "0190c7a0-0000-7000-8000-000000000000", "quantity": 1 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn damage_then_write_off() {
    let srv = TestServer::spawn().await;
    let id = id_of(&srv.add_product("Tile", 20, 0).await);

    let res = srv
        .client
        .post(srv.url("/api/analytics/mark-damaged"))
        .json(&json!({ "productId": id, "quantity": 25 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "insufficient_stock");

    let res = srv
        .client
        .post(srv.url("/api/analytics/mark-damaged"))
        .json(&json!({ "productId": id, "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let product: Value = res.json().await.unwrap();
    assert_eq!(product["stockQuantity"], 16);
    assert_eq!(product["damagedQuantity"], 4);
    assert_eq!(product["damageHistory"][0]["reason"], "other");

    let report: Value = srv
        .client
        .get(srv.url("/api/analytics/damaged"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["totalDamagedUnits"], 4);
    assert_eq!(report["totalDamagedValue"], 40.0);
    assert_eq!(report["reasonBreakdown"]["other"]["count"], 4);

    let res = srv
        .client
        .delete(srv.url(&format!("/api/analytics/write-off-damaged/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["writtenOff"], 4);

    let report: Value = srv
        .client
        .get(srv.url("/api/analytics/damaged"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["totalDamagedProducts"], 0);
}

#[tokio::test]
async fn dead_stock_honours_the_days_query() {
    let srv = TestServer::spawn().await;
    let id = id_of(&srv.add_product("Sealant", 10, 0).await);

    let sold_at = (Utc::now() - ChronoDuration::days(10)).to_rfc3339();
    srv.client
        .post(srv.url("/api/sales"))
        .json(&json!({ "sales": [{ "productId": id, "quantity": 1, "soldAt": sold_at }] }))
        .send()
        .await
        .unwrap();

    let default_window: Value = srv
        .client
        .get(srv.url("/api/analytics/dead-stock"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(default_window["daysThreshold"], 30);
    assert_eq!(default_window["totalProducts"], 0);

    let short_window: Value = srv
        .client
        .get(srv.url("/api/analytics/dead-stock?days=7"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(short_window["daysThreshold"], 7);
    assert_eq!(short_window["totalProducts"], 1);
    assert_eq!(short_window["products"][0]["stockValue"], 100.0);

    for days in ["soon", "100000000", "4294967295"] {
        let res = srv
            .client
            .get(srv.url(&format!("/api/analytics/dead-stock?days={days}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "days={days}");
    }

    let res = srv
        .client
        .get(srv.url("/api/analytics/dead-stock?days=4294967295"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn seed_and_clear_sales() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/api/admin/seed-sales"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    srv.add_product("Brick", 100, 10).await;
    srv.add_product("Gravel", 100, 10).await;

    let res = srv
        .client
        .post(srv.url("/api/admin/seed-sales"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let summary: Value = res.json().await.unwrap();
    assert_eq!(summary["products"], 2);
    let inserted = summary["salesInserted"].as_u64().unwrap();
    assert!((10..=30).contains(&inserted));
    assert!(!summary["dailyTotals"].as_array().unwrap().is_empty());

    let res = srv
        .client
        .delete(srv.url("/api/admin/clear-sales"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["deleted"], inserted);
    assert_eq!(
        body["message"],
        format!("Deleted {inserted} sales records")
    );
}

#[tokio::test]
async fn financial_report_covers_catalog() {
    let srv = TestServer::spawn().await;
    srv.add_product("Pipe", 4, 0).await;

    let report: Value = srv
        .client
        .get(srv.url("/api/analytics/financial"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["totals"]["totalProducts"], 1);
    assert_eq!(report["totals"]["averageMargin"], 33.3);
    assert_eq!(report["totals"]["totalStockValue"], 40.0);
    assert_eq!(report["byCategory"][0]["name"], "Building");
}
