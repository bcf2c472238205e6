//! Options resolution specs
//!
//! Verify how caller options, global config, and storage combine.

use crate::prelude::*;
use cws_core::ConfigurationError;

#[tokio::test]
async fn missing_payment_address_fails_without_constructing_a_worker() {
    let h = Harness::new();

    let err = h
        .provider
        .attach(SessionParams::new(json!({ "paymentAddress": null })).use_local_storage(false))
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        SessionError::Configuration(ConfigurationError::MissingPaymentAddress)
    ));
    assert_eq!(h.host.constructed(), 0);
    assert_eq!(
        h.provider.store().state().error.map(|e| e.kind),
        Some(ErrorKind::Configuration)
    );
}

#[tokio::test]
async fn caller_options_are_canonicalized() {
    let h = Harness::new();

    let session = h
        .provider
        .attach(
            SessionParams::new(json!({ "paymentAddress": "0xabc", "cores": { "cpu": 2 } }))
                .use_local_storage(false),
        )
        .await
        .unwrap();

    let options = session.options().snapshot();
    assert_eq!(options.payment_address.as_str(), "0xabc");
    assert_eq!(options.cores, Some(Cores::cpu(2)));
    assert!(options.compute_groups.is_empty());
    assert!(h.storage.get(OPTIONS_STORAGE_KEY).unwrap().is_none());
}

#[tokio::test]
async fn cores_supersede_max_working_sandboxes() {
    let h = Harness::new();

    let session = h
        .attach(json!({
            "paymentAddress": "0xabc",
            "cores": { "cpu": 2 },
            "maxWorkingSandboxes": 8,
        }))
        .await;

    assert_eq!(session.options().snapshot().max_working_sandboxes, None);
}

#[tokio::test]
async fn unknown_option_keys_pass_through_to_the_worker() {
    let h = Harness::new();

    h.attach(json!({ "paymentAddress": "0xabc", "leavePublicGroup": true }))
        .await;

    let extra = h.worker().options().read(|o| o.extra.clone());
    assert_eq!(extra.get("leavePublicGroup"), Some(&json!(true)));
}

#[tokio::test]
async fn malformed_options_are_a_configuration_error() {
    let h = Harness::new();

    let err = h
        .provider
        .attach(SessionParams::new(json!(["not", "a", "mapping"])))
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        SessionError::Configuration(ConfigurationError::MalformedOptions(_))
    ));
}
