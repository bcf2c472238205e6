//! Worker event specs
//!
//! Verify how fetch, submit, and error events surface on the state.

use crate::prelude::*;

#[tokio::test]
async fn fetching_clears_after_the_settle_delay() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let worker = h.worker();

    worker.emit(WorkerEvent::BeforeFetch);
    worker.emit(WorkerEvent::fetch_ok());
    session.process_pending().await;
    assert!(session.state().fetching);

    h.clock
        .advance(GlobalConfig::default().session.fetch_settle_delay);
    session.process_pending().await;
    assert!(!session.state().fetching);
}

#[tokio::test]
async fn new_fetch_cancels_the_pending_settle() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let worker = h.worker();
    let delay = GlobalConfig::default().session.fetch_settle_delay;

    worker.emit(WorkerEvent::BeforeFetch);
    worker.emit(WorkerEvent::fetch_ok());
    session.process_pending().await;
    worker.emit(WorkerEvent::BeforeFetch);
    session.process_pending().await;

    h.clock.advance(delay);
    session.process_pending().await;
    assert!(session.state().fetching);
}

#[tokio::test]
async fn failed_fetch_records_a_runtime_error() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;

    h.worker().emit(WorkerEvent::BeforeFetch);
    h.worker().emit(WorkerEvent::fetch_failed("scheduler unreachable"));
    session.process_pending().await;

    let state = session.state();
    assert!(state.fetching);
    assert_eq!(state.error.map(|e| e.kind), Some(ErrorKind::Runtime));
}

#[tokio::test]
async fn submitting_follows_result_delivery() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;

    h.worker().emit(WorkerEvent::BeforeReturn);
    session.process_pending().await;
    assert!(session.state().submitting);

    h.worker().emit(WorkerEvent::result_ok());
    session.process_pending().await;
    assert!(!session.state().submitting);
}

#[tokio::test]
async fn rejected_start_is_recorded_not_returned() {
    let h = Harness::new();
    h.host.fail_start("wallet locked");
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;

    session.start_worker().await;

    let state = session.state();
    assert!(!state.working);
    assert_eq!(state.error.map(|e| e.kind), Some(ErrorKind::Operation));
}
