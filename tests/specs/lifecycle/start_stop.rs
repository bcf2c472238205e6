//! Start and stop specs
//!
//! Verify the working flags across a start/stop cycle and that a stopped
//! worker is replaced.

use crate::prelude::*;

#[tokio::test]
async fn start_then_stop_walks_the_working_flags() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let flags = |s: &TestSession| {
        let state = s.state();
        (state.working, state.will_work)
    };

    assert_eq!(flags(&session), (false, None));

    session.start_worker().await;
    assert_eq!(flags(&session), (false, Some(true)));

    session.process_pending().await;
    assert_eq!(flags(&session), (true, None));

    session.stop_worker().await;
    assert_eq!(flags(&session), (true, Some(false)));

    session.process_pending().await;
    assert_eq!(flags(&session), (false, None));
}

#[tokio::test]
async fn stopped_worker_is_replaced_with_a_fresh_one() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let first = h.worker();

    session.start_worker().await;
    session.process_pending().await;
    session.stop_worker().await;
    session.process_pending().await;

    assert_eq!(h.host.constructed(), 2);
    let replacement = session.worker().unwrap();
    assert_ne!(replacement.id(), first.id());
    assert_eq!(first.calls(), vec![WorkerCall::Start, WorkerCall::Stop { immediate: false }]);
    assert!(session.state().is_loaded);
}

#[tokio::test]
async fn stop_immediately_flag_is_forwarded() {
    let h = Harness::new();
    let session = h
        .attach(json!({ "paymentAddress": "0xabc", "shouldStopWorkingImmediately": true }))
        .await;

    assert!(h
        .worker()
        .options()
        .read(|o| !o.extra.contains_key("shouldStopWorkingImmediately")));

    session.start_worker().await;
    session.process_pending().await;
    session.stop_worker().await;

    assert_eq!(
        h.worker().calls(),
        vec![WorkerCall::Start, WorkerCall::Stop { immediate: true }]
    );
}

#[tokio::test]
async fn toggle_alternates_between_start_and_stop() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;

    session.toggle_worker().await;
    session.process_pending().await;
    assert!(session.state().working);

    session.toggle_worker().await;
    session.process_pending().await;
    assert!(!session.state().working);
}

#[tokio::test]
async fn second_attach_reuses_the_session() {
    let h = Harness::new();
    let first = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let second = h.attach(json!({ "paymentAddress": "0xdef" })).await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(h.host.constructed(), 1);
    assert_eq!(second.options().snapshot().payment_address.as_str(), "0xabc");
}
