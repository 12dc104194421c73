mod common;

use common::{build_context, setup};
use lariat::application::ports::{CacheStore, OperationQueue};
use lariat::application::services::offline_service::{OfflineServiceTrait, WriteOutcome};
use lariat::application::services::sync_service::{SyncEvent, SyncPhase};
use lariat::domain::value_objects::{Collection, OperationPayload, RecordId};
use lariat::shared::error::AppError;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

fn payload(value: serde_json::Value) -> OperationPayload {
    OperationPayload::new(value).expect("payload")
}

#[tokio::test]
async fn enqueued_operations_stay_fifo_across_collection_interleaving() {
    let ctx = setup().await;
    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;

    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 1, "value": 100.0})))
        .await
        .unwrap();
    ctx.offline
        .submit_update(
            Collection::customers(),
            payload(json!({"id": 5, "name": "Jane"})),
        )
        .await
        .unwrap();
    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 1, "status": "won"})))
        .await
        .unwrap();

    let leads = ctx.queue.list_pending(&Collection::leads()).await.unwrap();
    assert_eq!(leads.len(), 2);
    assert!(leads[0].sequence_id < leads[1].sequence_id);
    assert_eq!(leads[0].payload.as_json()["value"], json!(100.0));
    assert_eq!(leads[1].payload.as_json()["status"], json!("won"));

    let customers = ctx
        .queue
        .list_pending(&Collection::customers())
        .await
        .unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(ctx.queue.pending_count().await.unwrap(), 3);
}

#[tokio::test]
async fn lead_created_offline_gets_the_server_id_after_one_cycle() {
    let ctx = setup().await;
    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;

    let lead = lariat::domain::entities::Lead::new("Acme Corp".into(), None, 5000.0, None);
    let document = lead.to_document().unwrap();
    let outcome = ctx
        .offline
        .submit_insert(Collection::leads(), payload(document))
        .await
        .unwrap();

    let placeholder = match outcome {
        WriteOutcome::SavedOnDevice { record_id, .. } => {
            assert!(record_id.is_phantom());
            record_id
        }
        other => panic!("expected a deferred save, got {other:?}"),
    };

    // The optimistic view shows the draft under its placeholder id.
    let view = ctx.offline.merged_view(Collection::leads()).await.unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0]["id"], placeholder.to_json());

    ctx.gateway.set_online(true).await;
    ctx.connectivity.set_online(true);
    let report = ctx.sync.run_cycle().await.unwrap();

    assert_eq!(report.replayed_count, 1);
    assert_eq!(report.pending_count, 0);
    assert_eq!(
        report.remapped_ids.get(&placeholder.to_string()),
        Some(&42)
    );
    assert!(ctx
        .queue
        .list_pending(&Collection::leads())
        .await
        .unwrap()
        .is_empty());

    // Retrievable under the real id, gone under the placeholder.
    let view = ctx.offline.merged_view(Collection::leads()).await.unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0]["id"], json!(42));
    assert_eq!(view[0]["name"], json!("Acme Corp"));
    assert_eq!(view[0]["value"], json!(5000.0));
}

#[tokio::test]
async fn offline_edits_replay_in_the_order_they_were_made() {
    let ctx = setup().await;
    ctx.gateway
        .seed(
            &Collection::leads(),
            vec![json!({"id": 42, "name": "Acme Corp", "value": 5000.0, "status": "new"})],
        )
        .await;

    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;

    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 42, "value": 6000.0})))
        .await
        .unwrap();
    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 42, "status": "won"})))
        .await
        .unwrap();

    ctx.gateway.set_online(true).await;
    ctx.connectivity.set_online(true);
    let report = ctx.sync.run_cycle().await.unwrap();
    assert_eq!(report.replayed_count, 2);

    let rows = ctx.gateway.server_rows(&Collection::leads()).await;
    assert_eq!(rows[0]["value"], json!(6000.0));
    assert_eq!(rows[0]["status"], json!("won"));

    let log = ctx.gateway.call_log().await;
    let value_update = log
        .iter()
        .position(|call| call.contains("6000"))
        .expect("value update call");
    let status_update = log
        .iter()
        .position(|call| call.contains("won"))
        .expect("status update call");
    assert!(value_update < status_update);
}

#[tokio::test]
async fn queued_update_takes_precedence_over_the_remote_snapshot() {
    let ctx = setup().await;
    ctx.gateway
        .seed(
            &Collection::leads(),
            vec![json!({"id": 42, "name": "Acme Corp", "value": 5000.0})],
        )
        .await;

    // Populate the cache while connected.
    ctx.offline.merged_view(Collection::leads()).await.unwrap();

    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;
    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 42, "value": 6000.0})))
        .await
        .unwrap();

    let view = ctx.offline.merged_view(Collection::leads()).await.unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0]["value"], json!(6000.0));
    assert_eq!(view[0]["name"], json!("Acme Corp"));

    // The server has not been touched.
    let rows = ctx.gateway.server_rows(&Collection::leads()).await;
    assert_eq!(rows[0]["value"], json!(5000.0));
}

#[tokio::test]
async fn deletes_are_blocked_while_offline_and_nothing_is_queued() {
    let ctx = setup().await;
    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;

    let result = ctx
        .offline
        .submit_delete(Collection::leads(), RecordId::remote(42).unwrap())
        .await;

    assert!(matches!(result, Err(AppError::RequiresConnection(_))));
    assert_eq!(ctx.queue.pending_count().await.unwrap(), 0);
    assert!(ctx.gateway.call_log().await.is_empty());
}

#[tokio::test]
async fn mid_drain_network_failure_leaves_the_remainder_queued() {
    let ctx = setup().await;
    ctx.gateway
        .seed(
            &Collection::leads(),
            vec![
                json!({"id": 1, "name": "A", "value": 1.0}),
                json!({"id": 2, "name": "B", "value": 2.0}),
                json!({"id": 3, "name": "C", "value": 3.0}),
            ],
        )
        .await;

    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;
    for (id, value) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
        ctx.offline
            .submit_update(Collection::leads(), payload(json!({"id": id, "value": value})))
            .await
            .unwrap();
    }

    ctx.gateway.set_online(true).await;
    ctx.gateway.fail_after(1).await;
    ctx.connectivity.set_online(true);

    let mut events = ctx.sync.subscribe();
    let report = ctx.sync.run_cycle().await.unwrap();

    assert_eq!(report.replayed_count, 1);
    assert_eq!(report.pending_count, 2);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    let remaining = ctx.queue.list_pending(&Collection::leads()).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].payload.as_json()["id"], json!(2));
    assert_eq!(remaining[1].payload.as_json()["id"], json!(3));

    // The next reconnect pass finishes the job.
    ctx.gateway.fail_after(u32::MAX).await;
    let report = ctx.sync.run_cycle().await.unwrap();
    assert_eq!(report.replayed_count, 2);
    assert_eq!(report.pending_count, 0);
    assert!(matches!(events.try_recv(), Ok(SyncEvent::Completed(_))));
}

#[tokio::test]
async fn rejected_operations_are_dropped_and_the_drain_continues() {
    let ctx = setup().await;
    ctx.gateway
        .seed(
            &Collection::leads(),
            vec![json!({"id": 42, "name": "Acme Corp", "value": 5000.0})],
        )
        .await;

    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;
    // id 99 does not exist server-side; the remote rejects its update.
    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 99, "value": 1.0})))
        .await
        .unwrap();
    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 42, "value": 6000.0})))
        .await
        .unwrap();

    ctx.gateway.set_online(true).await;
    ctx.connectivity.set_online(true);
    let report = ctx.sync.run_cycle().await.unwrap();

    assert_eq!(report.conflict_count, 1);
    assert_eq!(report.replayed_count, 1);
    assert_eq!(report.pending_count, 0);
    assert!(!report.is_clean());
    assert!(ctx
        .queue
        .list_pending(&Collection::leads())
        .await
        .unwrap()
        .is_empty());

    let rows = ctx.gateway.server_rows(&Collection::leads()).await;
    assert_eq!(rows[0]["value"], json!(6000.0));
}

#[tokio::test]
async fn offline_boot_serves_the_cached_snapshot() {
    let ctx = setup().await;
    ctx.gateway
        .seed(
            &Collection::leads(),
            vec![json!({"id": 42, "name": "Acme Corp", "value": 5000.0})],
        )
        .await;

    // One connected read fills the cache.
    ctx.offline.merged_view(Collection::leads()).await.unwrap();

    ctx.gateway.set_online(false).await;
    ctx.connectivity.set_online(false);

    let view = ctx.offline.merged_view(Collection::leads()).await.unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0]["name"], json!("Acme Corp"));

    let status = ctx.offline.cache_status().await.unwrap();
    assert_eq!(status.total_records(), 1);
}

#[tokio::test]
async fn an_empty_queue_cycle_still_refreshes_and_notifies() {
    let ctx = setup().await;
    ctx.gateway
        .seed(
            &Collection::customers(),
            vec![json!({"id": 7, "name": "Jane Doe"})],
        )
        .await;

    let mut events = ctx.sync.subscribe();
    let report = ctx.sync.run_cycle().await.unwrap();

    assert_eq!(report.replayed_count, 0);
    assert!(report.is_clean());
    assert!(matches!(events.try_recv(), Ok(SyncEvent::Completed(_))));

    let cached = ctx.cache.read_all(&Collection::customers()).await.unwrap();
    assert_eq!(cached.len(), 1);
}

#[tokio::test]
async fn a_single_queued_entry_drains_in_one_cycle() {
    let ctx = setup().await;
    ctx.gateway
        .seed(&Collection::leads(), vec![json!({"id": 1, "value": 1.0})])
        .await;

    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;
    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 1, "value": 9.0})))
        .await
        .unwrap();

    ctx.gateway.set_online(true).await;
    ctx.connectivity.set_online(true);

    let mut events = ctx.sync.subscribe();
    let report = ctx.sync.run_cycle().await.unwrap();

    assert_eq!(report.replayed_count, 1);
    assert_eq!(report.pending_count, 0);
    assert!(matches!(events.try_recv(), Ok(SyncEvent::Completed(_))));

    let status = ctx.sync.get_status().await;
    assert_eq!(status.phase, SyncPhase::Idle);
    assert_eq!(status.pending_operations, 0);
    assert!(status.last_sync.is_some());
}

#[tokio::test]
async fn the_reconnect_listener_runs_a_cycle_on_transition_to_online() {
    let ctx = setup().await;
    ctx.gateway
        .seed(&Collection::leads(), vec![json!({"id": 1, "value": 1.0})])
        .await;

    ctx.connectivity.set_online(false);
    ctx.gateway.set_online(false).await;
    ctx.offline
        .submit_update(Collection::leads(), payload(json!({"id": 1, "value": 9.0})))
        .await
        .unwrap();

    let mut events = ctx.sync.subscribe();
    let listener = ctx.sync.spawn_reconnect_listener();

    ctx.gateway.set_online(true).await;
    ctx.connectivity.set_online(true);

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("sync completed within the timeout")
        .expect("event channel open");
    let SyncEvent::Completed(report) = event;
    assert_eq!(report.replayed_count, 1);

    listener.abort();
}

#[tokio::test]
async fn the_queue_outlives_the_session_that_filled_it() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("lariat.db").display());

    {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("file-backed sqlite");
        sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
        let ctx = build_context(pool.clone());

        ctx.connectivity.set_online(false);
        ctx.gateway.set_online(false).await;
        ctx.offline
            .submit_update(Collection::leads(), payload(json!({"id": 1, "value": 9.0})))
            .await
            .unwrap();
        ctx.offline
            .submit_update(Collection::leads(), payload(json!({"id": 1, "status": "won"})))
            .await
            .unwrap();

        pool.close().await;
    }

    // A later session sees the same entries in the same order.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("reopened sqlite");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    let ctx = build_context(pool);

    let pending = ctx.queue.list_pending(&Collection::leads()).await.unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending[0].sequence_id < pending[1].sequence_id);
    assert_eq!(pending[0].payload.as_json()["value"], json!(9.0));
    assert_eq!(pending[1].payload.as_json()["status"], json!("won"));
}
