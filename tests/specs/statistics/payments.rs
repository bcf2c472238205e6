//! Statistics specs
//!
//! Verify slices, credits, and compute time accumulate from worker events.

use crate::prelude::*;

#[tokio::test]
async fn payments_accumulate_exact_credits() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let worker = h.worker();

    for amount in ["1.5", "2.25", "0.1"] {
        worker.emit(WorkerEvent::payment(dec(amount)));
    }
    session.process_pending().await;

    let stats = session.statistics();
    assert_eq!(stats.slices, 3);
    assert_eq!(stats.credits, dec("3.85"));
}

#[tokio::test]
async fn sandbox_metrics_add_compute_time() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let worker = h.worker();

    worker.emit(WorkerEvent::sandbox("sb-1", SandboxEvent::Created));
    worker.emit(WorkerEvent::sandbox(
        "sb-1",
        SandboxEvent::Metrics {
            elapsed: Duration::from_millis(1500),
        },
    ));
    worker.emit(WorkerEvent::sandbox(
        "sb-1",
        SandboxEvent::Metrics {
            elapsed: Duration::from_millis(500),
        },
    ));
    session.process_pending().await;

    assert_eq!(session.statistics().compute_time, Duration::from_secs(2));
}

#[tokio::test]
async fn working_sandbox_count_tracks_the_worker() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let worker = h.worker();

    worker.emit(WorkerEvent::sandbox("sb-1", SandboxEvent::Created));
    worker.set_working_sandboxes(["sb-1"]);
    worker.emit(WorkerEvent::sandbox("sb-1", SandboxEvent::Slice));
    session.process_pending().await;
    assert_eq!(session.state().working_sandboxes, 1);

    worker.set_working_sandboxes(std::iter::empty::<&str>());
    worker.emit(WorkerEvent::payment(dec("0.5")));
    session.process_pending().await;
    assert_eq!(session.state().working_sandboxes, 0);
    assert_eq!(session.statistics().slices, 1);
}

#[tokio::test]
async fn statistics_survive_worker_replacement() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;

    h.worker().emit(WorkerEvent::payment(dec("1")));
    session.start_worker().await;
    session.process_pending().await;
    session.stop_worker().await;
    session.process_pending().await;

    h.worker().emit(WorkerEvent::payment(dec("2")));
    session.process_pending().await;

    assert_eq!(h.host.constructed(), 2);
    assert_eq!(session.statistics().credits, dec("3"));
    assert_eq!(session.statistics().slices, 2);
}
