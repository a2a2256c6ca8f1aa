//! End-to-end tests over HTTP: the same fetch / join / re-fetch flow the
//! browser storefront runs.

use groupdrop_common::api::{JoinReceipt, JoinRequest, JoinTicket};
use groupdrop_common::catalog::Catalog;
use groupdrop_common::drop::Drop;
use groupdrop_store_integration::spawn_store;

#[tokio::test]
async fn fetch_join_refetch_flow() {
    let (base, _table) = spawn_store().await;
    let client = reqwest::Client::new();

    // Catalog view: list all drops.
    let drops: Vec<Drop> = client
        .get(format!("{base}/drops"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(drops.len(), 2);

    // Detail view: one row plus its SKU list, by slug.
    let row: Drop = client
        .get(format!("{base}/drops/aesop"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let catalog: Catalog = client
        .get(format!("{base}/drops/aesop/catalog"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(catalog.skus.len(), 3);

    // Join with a one-item cart, then re-read the authoritative row.
    let amount = catalog.skus[0].price;
    let receipt: JoinReceipt = client
        .post(format!("{base}/join/{}", row.id.0))
        .json(&JoinRequest {
            ticket: JoinTicket("browser-1".into()),
            amount,
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(receipt.accepted, amount);
    assert_eq!(receipt.drop.raised, row.raised + amount);

    let status: serde_json::Value = client
        .get(format!("{base}/drop-status/{}", row.id.0))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["raised"], serde_json::json!(row.raised + amount));
    assert_eq!(status["target"], serde_json::json!(row.target));
}

#[tokio::test]
async fn replayed_ticket_is_idempotent_over_http() {
    let (base, table) = spawn_store().await;
    let client = reqwest::Client::new();
    let row = table.fetch_by_slug("lelabo").await.unwrap();

    let request = JoinRequest {
        ticket: JoinTicket("retry-me".into()),
        amount: 5_000,
    };
    for _ in 0..3 {
        let receipt: JoinReceipt = client
            .post(format!("{base}/join/{}", row.id.0))
            .json(&request)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(receipt.drop.raised, row.raised + 5_000);
    }

    assert_eq!(
        table.fetch_by_slug("lelabo").await.unwrap().raised,
        row.raised + 5_000
    );
}

#[tokio::test]
async fn unknown_rows_are_404_with_an_error_body() {
    let (base, _table) = spawn_store().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/drops/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("nope"));

    let resp = client
        .post(format!("{base}/join/drop-nope"))
        .json(&JoinRequest {
            ticket: JoinTicket("t".into()),
            amount: 100,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_row_count() {
    let (base, _table) = spawn_store().await;
    let body: serde_json::Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], serde_json::json!(true));
    assert_eq!(body["drops"], serde_json::json!(2));
}
