//! In-memory drop table with an on-disk JSON snapshot.
//!
//! The table is the single source of truth for raised totals. A join is
//! evaluated entirely under the write lock, so two concurrent joiners can
//! never both compute from the same pre-update value the way a
//! read-modify-write client can.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use groupdrop_common::api::{DropSummary, JoinReceipt, JoinRequest, StoreError};
use groupdrop_common::catalog::Catalog;
use groupdrop_common::deadline::next_drop_close;
use groupdrop_common::drop::{Drop, DropId};
use groupdrop_common::seed::{seed_catalogs, seed_drops};

/// TTL for join tickets (seconds). Expired tickets are swept on each join.
const TICKET_TTL_SECS: u64 = 600;

pub struct DropTable {
    drops: RwLock<BTreeMap<DropId, Drop>>,
    /// Catalogs are fixed at load time; only `raised` ever changes.
    catalogs: BTreeMap<String, Catalog>,
    tickets: Mutex<BTreeMap<String, (JoinReceipt, Instant)>>,
    snapshot: Option<PathBuf>,
}

impl DropTable {
    /// Load the snapshot if one exists, otherwise start from the seed rows.
    /// A missing or malformed snapshot silently falls back to the seeds.
    pub fn load(snapshot: Option<PathBuf>) -> Self {
        let rows = snapshot
            .as_deref()
            .and_then(read_snapshot)
            .unwrap_or_else(seed_rows);
        let catalogs = seed_catalogs()
            .into_iter()
            .map(|c| (c.drop_slug.clone(), c))
            .collect();
        Self {
            drops: RwLock::new(rows.into_iter().map(|d| (d.id.clone(), d)).collect()),
            catalogs,
            tickets: Mutex::new(BTreeMap::new()),
            snapshot,
        }
    }

    pub async fn list(&self) -> Vec<Drop> {
        self.drops.read().await.values().cloned().collect()
    }

    pub async fn fetch_by_slug(&self, slug: &str) -> Result<Drop, StoreError> {
        self.drops
            .read()
            .await
            .values()
            .find(|d| d.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    pub async fn fetch_summary(&self, id: &DropId) -> Result<DropSummary, StoreError> {
        self.drops
            .read()
            .await
            .get(id)
            .map(|d| DropSummary {
                id: d.id.clone(),
                raised: d.raised,
                target: d.target,
            })
            .ok_or_else(|| StoreError::NotFound(id.0.clone()))
    }

    pub fn catalog_for(&self, slug: &str) -> Result<Catalog, StoreError> {
        self.catalogs
            .get(slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    /// Commit a join atomically.
    ///
    /// A replayed ticket returns the recorded receipt unchanged; everything
    /// else runs `Drop::apply_join` under the write lock and snapshots the
    /// table before the lock is released. A zero amount or an already-funded
    /// drop yields a receipt with `accepted == 0` and no state change.
    pub async fn join(&self, id: &DropId, req: JoinRequest) -> Result<JoinReceipt, StoreError> {
        let mut drops = self.drops.write().await;
        let mut tickets = self.tickets.lock().await;

        tickets.retain(|_, (_, created)| created.elapsed().as_secs() < TICKET_TTL_SECS);
        if let Some((receipt, _)) = tickets.get(&req.ticket.0) {
            return Ok(receipt.clone());
        }

        let row = drops
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.0.clone()))?;
        let outcome = row.apply_join(req.amount);
        let receipt = JoinReceipt {
            drop: row.clone(),
            accepted: outcome.accepted,
            funded: outcome.funded,
            ticket: req.ticket.clone(),
        };
        tickets.insert(req.ticket.0.clone(), (receipt.clone(), Instant::now()));

        if outcome.accepted > 0 {
            let rows: Vec<Drop> = drops.values().cloned().collect();
            self.persist(&rows);
        }
        Ok(receipt)
    }

    /// Write the snapshot. Failure is logged, not fatal: the in-memory table
    /// stays authoritative for this process.
    fn persist(&self, rows: &[Drop]) {
        let Some(path) = &self.snapshot else { return };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("failed to create snapshot dir: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(rows) {
            Ok(data) => {
                if let Err(e) = std::fs::write(path, data) {
                    warn!("failed to write snapshot {}: {e}", path.display());
                }
            }
            Err(e) => warn!("failed to serialize snapshot: {e}"),
        }
    }
}

fn read_snapshot(path: &Path) -> Option<Vec<Drop>> {
    let data = std::fs::read_to_string(path).ok()?;
    let rows: Vec<Drop> = serde_json::from_str(&data).ok()?;
    info!("loaded {} drops from {}", rows.len(), path.display());
    Some(rows)
}

/// Seed rows with the weekly close stamped at load time.
fn seed_rows() -> Vec<Drop> {
    info!("seeding drop table");
    let closes_at = next_drop_close(Local::now()).with_timezone(&Utc);
    seed_drops()
        .into_iter()
        .map(|mut d| {
            d.closes_at = Some(closes_at);
            d
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupdrop_common::api::JoinTicket;

    fn ticket(s: &str) -> JoinTicket {
        JoinTicket(s.into())
    }

    fn request(t: &str, amount: u64) -> JoinRequest {
        JoinRequest {
            ticket: ticket(t),
            amount,
        }
    }

    async fn aesop_id(table: &DropTable) -> DropId {
        table.fetch_by_slug("aesop").await.unwrap().id
    }

    #[tokio::test]
    async fn join_accumulates_and_clamps_at_target() {
        let table = DropTable::load(None);
        let id = aesop_id(&table).await;

        // Seed: target 500_000, raised 310_000.
        let receipt = table.join(&id, request("t-1", 190_000)).await.unwrap();
        assert_eq!(receipt.accepted, 190_000);
        assert!(receipt.funded);
        assert_eq!(receipt.drop.raised, 500_000);

        // Funded drop: further joins are no-ops, never overshoot.
        let receipt = table.join(&id, request("t-2", 50_000)).await.unwrap();
        assert_eq!(receipt.accepted, 0);
        assert_eq!(receipt.drop.raised, 500_000);
    }

    #[tokio::test]
    async fn oversized_join_is_clamped_not_rejected() {
        let table = DropTable::load(None);
        let id = aesop_id(&table).await;

        let receipt = table.join(&id, request("t-1", 999_999)).await.unwrap();
        assert_eq!(receipt.accepted, 190_000);
        assert_eq!(receipt.drop.raised, 500_000);
        assert!(receipt.funded);
    }

    #[tokio::test]
    async fn replayed_ticket_returns_the_original_receipt() {
        let table = DropTable::load(None);
        let id = aesop_id(&table).await;

        let first = table.join(&id, request("t-1", 10_000)).await.unwrap();
        let replay = table.join(&id, request("t-1", 10_000)).await.unwrap();
        assert_eq!(replay.drop.raised, first.drop.raised);
        assert_eq!(replay.accepted, first.accepted);

        // Counted once, not twice.
        assert_eq!(table.fetch_by_slug("aesop").await.unwrap().raised, 320_000);
    }

    #[tokio::test]
    async fn zero_amount_join_changes_nothing() {
        let table = DropTable::load(None);
        let id = aesop_id(&table).await;

        let receipt = table.join(&id, request("t-1", 0)).await.unwrap();
        assert_eq!(receipt.accepted, 0);
        assert!(!receipt.funded);
        assert_eq!(table.fetch_by_slug("aesop").await.unwrap().raised, 310_000);
    }

    #[tokio::test]
    async fn unknown_drop_is_not_found() {
        let table = DropTable::load(None);
        let err = table
            .join(&DropId("drop-unknown".into()), request("t-1", 100))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("drop-unknown".into()));

        let err = table.fetch_by_slug("nothing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn summary_is_the_id_raised_target_subset() {
        let table = DropTable::load(None);
        let id = aesop_id(&table).await;
        let summary = table.fetch_summary(&id).await.unwrap();
        assert_eq!(summary.raised, 310_000);
        assert_eq!(summary.target, 500_000);
    }

    #[tokio::test]
    async fn snapshot_roundtrips_across_restarts() {
        let path = std::env::temp_dir().join(format!(
            "groupdrop-snapshot-roundtrip-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let table = DropTable::load(Some(path.clone()));
        let id = aesop_id(&table).await;
        table.join(&id, request("t-1", 5_000)).await.unwrap();

        let reloaded = DropTable::load(Some(path.clone()));
        assert_eq!(
            reloaded.fetch_by_slug("aesop").await.unwrap().raised,
            315_000
        );

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn malformed_snapshot_falls_back_to_seeds() {
        let path = std::env::temp_dir().join(format!(
            "groupdrop-snapshot-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json at all").unwrap();

        let table = DropTable::load(Some(path.clone()));
        assert_eq!(table.fetch_by_slug("aesop").await.unwrap().raised, 310_000);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn catalogs_are_served_by_slug() {
        let table = DropTable::load(None);
        let catalog = table.catalog_for("lelabo").unwrap();
        assert_eq!(catalog.skus.len(), 6);
        assert!(table.catalog_for("nothing").is_err());
    }
}
