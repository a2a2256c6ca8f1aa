//! Concurrency tests for the join path: many clients committing against one
//! drop must never overshoot the target and must never lose an update. This
//! is exactly the multi-client race a read-modify-write browser flow cannot
//! close on its own.

use std::sync::Arc;

use groupdrop_common::api::{JoinRequest, JoinTicket};
use groupdrop_server::store::DropTable;

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_joins_never_overshoot_or_lose_updates() {
    let table = Arc::new(DropTable::load(None));
    let row = table.fetch_by_slug("aesop").await.unwrap();
    let id = row.id.clone();
    let start = row.raised;
    let target = row.target;

    // 40 joiners x 10_000 = 400_000 requested against 190_000 of headroom.
    let mut handles = Vec::new();
    for i in 0..40 {
        let table = table.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            table
                .join(
                    &id,
                    JoinRequest {
                        ticket: JoinTicket(format!("joiner-{i}")),
                        amount: 10_000,
                    },
                )
                .await
                .unwrap()
        }));
    }

    let mut accepted_total = 0;
    for handle in handles {
        accepted_total += handle.await.unwrap().accepted;
    }

    let final_row = table.fetch_by_slug("aesop").await.unwrap();
    assert_eq!(
        final_row.raised, target,
        "an oversubscribed drop must land exactly on its target"
    );
    assert_eq!(
        accepted_total,
        target - start,
        "accepted amounts must account for every committed update"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_replays_of_one_ticket_count_once() {
    let table = Arc::new(DropTable::load(None));
    let row = table.fetch_by_slug("lelabo").await.unwrap();
    let id = row.id.clone();
    let start = row.raised;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let table = table.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            table
                .join(
                    &id,
                    JoinRequest {
                        ticket: JoinTicket("shared-ticket".into()),
                        amount: 10_000,
                    },
                )
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let receipt = handle.await.unwrap();
        assert_eq!(receipt.drop.raised, start + 10_000);
    }

    let final_row = table.fetch_by_slug("lelabo").await.unwrap();
    assert_eq!(
        final_row.raised,
        start + 10_000,
        "a retried ticket must be committed exactly once"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn joins_against_different_drops_do_not_interfere() {
    let table = Arc::new(DropTable::load(None));
    let aesop = table.fetch_by_slug("aesop").await.unwrap();
    let lelabo = table.fetch_by_slug("lelabo").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..10 {
        let table_aesop = table.clone();
        let id = aesop.id.clone();
        handles.push(tokio::spawn(async move {
            table_aesop
                .join(
                    &id,
                    JoinRequest {
                        ticket: JoinTicket(format!("aesop-{i}")),
                        amount: 1_000,
                    },
                )
                .await
                .unwrap();
        }));
        let table_lelabo = table.clone();
        let id = lelabo.id.clone();
        handles.push(tokio::spawn(async move {
            table_lelabo
                .join(
                    &id,
                    JoinRequest {
                        ticket: JoinTicket(format!("lelabo-{i}")),
                        amount: 2_000,
                    },
                )
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(
        table.fetch_by_slug("aesop").await.unwrap().raised,
        aesop.raised + 10_000
    );
    assert_eq!(
        table.fetch_by_slug("lelabo").await.unwrap().raised,
        lelabo.raised + 20_000
    );
}
