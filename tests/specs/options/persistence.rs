//! Options persistence specs
//!
//! Verify watched writes reach storage and notify observers once.

use crate::prelude::*;

#[tokio::test]
async fn cpu_change_is_persisted_and_refreshes_once() {
    let h = Harness::new();
    let session = h
        .attach(json!({ "paymentAddress": "0xabc", "cores": { "cpu": 2 } }))
        .await;
    let revision = session.state().revision;
    let writes = h.storage.writes();

    session.options().set("cores.cpu", json!(4)).unwrap();

    similar_asserts::assert_eq!(
        h.persisted(),
        Some(json!({ "default": { "cores": { "cpu": 4 } } }))
    );
    assert_eq!(h.storage.writes(), writes + 1);
    assert_eq!(session.state().revision, revision + 1);
    assert_eq!(h.worker().options().read(|o| o.cores), Some(Cores::cpu(4)));
}

#[tokio::test]
async fn unwatched_change_neither_persists_nor_refreshes() {
    let h = Harness::new();
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;

    session
        .options()
        .set("minimumWage.CPU", json!(2.5))
        .unwrap();
    session
        .options()
        .modify(|o| o.job_addresses.push("0xjob".to_string()));

    assert_eq!(h.persisted(), None);
    assert_eq!(session.state().revision, 0);
    assert_eq!(
        h.worker().options().read(|o| o.job_addresses.clone()),
        vec!["0xjob".to_string()]
    );
}

#[tokio::test]
async fn persisted_cores_are_restored_next_session() {
    let storage = MemoryStore::new();
    {
        let h = Harness::with_storage(storage.clone());
        let session = h
            .attach(json!({ "paymentAddress": "0xabc", "cores": { "cpu": 2 } }))
            .await;
        session.options().set_cpu_cores(7);
    }

    let h = Harness::with_storage(storage);
    let session = h
        .attach(json!({ "paymentAddress": "0xabc", "cores": { "cpu": 2 } }))
        .await;

    assert_eq!(session.options().snapshot().cores, Some(Cores::cpu(7)));
}

#[tokio::test]
async fn disabled_local_storage_never_writes() {
    let config = GlobalConfig::from_toml_str("[session]\nuse_local_storage = false\n").unwrap();
    let h = Harness::build(config, MemoryStore::new());
    let session = h.attach(json!({ "paymentAddress": "0xabc" })).await;
    let revision = session.state().revision;

    session.options().set_cores(Cores::cpu(3));

    assert_eq!(h.storage.writes(), 0);
    assert_eq!(session.state().revision, revision + 1);
}
