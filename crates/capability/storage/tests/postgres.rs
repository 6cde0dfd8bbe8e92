//! 需要真实 Postgres：设置 `TRACKER_TEST_DATABASE_URL` 后运行，否则直接跳过。
//!
//! 所有场景放在同一个测试中顺序执行，避免并行测试互相清表。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracker_storage::{ObjectLedger, PgLedger, StorageError, ensure_schema};

async fn connect(lease_window: Duration) -> Option<PgLedger> {
    let url = std::env::var("TRACKER_TEST_DATABASE_URL").ok()?;
    let ledger = PgLedger::connect(&url, 4, lease_window)
        .await
        .expect("connect");
    ensure_schema(&ledger.pool).await.expect("schema");
    sqlx::query("delete from tracked_objects")
        .execute(&ledger.pool)
        .await
        .expect("truncate");
    Some(ledger)
}

#[tokio::test]
async fn pg_ledger_lifecycle() {
    let Some(ledger) = connect(Duration::from_secs(1)).await else {
        return;
    };
    let ledger = Arc::new(ledger);

    // 去重接入
    assert_eq!(ledger.upsert_ingested(&[5, 5, 7]).await.expect("upsert"), 2);
    assert!(ledger.find(5).await.expect("find").is_some());
    assert!(ledger.find(7).await.expect("find").is_some());
    ensure_schema(&ledger.pool).await.expect("schema is idempotent");

    // 并发认领不重叠
    ledger.upsert_ingested(&[8]).await.expect("upsert");
    let a = {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.claim_batch(100).await })
    };
    let b = {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.claim_batch(100).await })
    };
    let a = a.await.expect("join").expect("claim");
    let b = b.await.expect("join").expect("claim");
    let all: Vec<_> = a.iter().chain(b.iter()).copied().collect();
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(all.len(), 3);
    assert_eq!(unique, HashSet::from([5, 7, 8]));
    assert!(ledger.claim_batch(100).await.expect("claim").is_empty());

    // 租约过期后可再次认领
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let mut reclaimed = ledger.claim_batch(100).await.expect("reclaim");
    reclaimed.sort_unstable();
    assert_eq!(reclaimed, vec![5, 7, 8]);

    // 在线写回与重新接入
    ledger.resolve_online(5).await.expect("resolve");
    let object = ledger.find(5).await.expect("find").expect("object");
    assert!(object.resolved);
    assert_eq!(object.online, Some(true));
    assert!(object.updated_at_ms.is_some());
    ledger.upsert_ingested(&[5]).await.expect("reingest");
    let object = ledger.find(5).await.expect("find").expect("object");
    assert!(!object.resolved);
    assert!(object.updated_at_ms.is_none());
    assert_eq!(ledger.claim_batch(100).await.expect("claim"), vec![5]);

    // 删除幂等，写回不存在的行返回 NotFound
    assert!(ledger.remove(7).await.expect("remove"));
    assert!(!ledger.remove(7).await.expect("remove again"));
    let err = ledger.resolve_online(7).await.expect_err("gone");
    assert!(matches!(err, StorageError::NotFound));

    // 过期回收
    assert_eq!(
        ledger.purge_expired(Duration::from_secs(30)).await.expect("purge"),
        0
    );
    tokio::time::sleep(Duration::from_millis(1200)).await;
    let purged = ledger
        .purge_expired(Duration::from_secs(1))
        .await
        .expect("purge");
    assert_eq!(purged, 2);
    assert!(ledger.find(5).await.expect("find").is_none());
    assert!(ledger.find(8).await.expect("find").is_none());
}
