//! End-to-end decision vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use cyconetics_core::protocol::Request;
use cyconetics_router::config::EngineConfig;
use cyconetics_router::Engine;

use vector_loader::{assert_subset, load};

#[test]
fn decision_vectors() {
    let files = [
        "decision_demo.json",
        "decision_unknown_object.json",
        "decision_closed_loop_hci.json",
        "decision_gating_learning.json",
        "decision_unknown_incentive.json",
        "decision_numeric_object_kind.json",
        "decision_numeric_incentive_kind.json",
        "decision_unknown_intent.json",
        "decision_empty_topic.json",
    ];

    let engine = Engine::new(EngineConfig::default()).expect("engine");
    for f in files {
        let v = load(f);
        let req: Request = serde_json::from_value(v.request)
            .unwrap_or_else(|e| panic!("vector={} request: {e}", v.description));
        let decision = serde_json::to_value(engine.decide(&req)).unwrap();
        assert_subset(&v.expect, &decision, &v.description);
    }
}

#[test]
fn demo_ignores_undeclared_manifest_keys() {
    let v = load("decision_demo.json");
    let req: Request = serde_json::from_value(v.request).unwrap();
    let d = Engine::new(EngineConfig::default()).unwrap().decide(&req);
    let obj = serde_json::to_value(d.generated_object.unwrap()).unwrap();
    assert!(obj.get("allowedDeviceClasses").is_none());
    assert_eq!(obj["jurisdiction"], "Phoenix-XR-Grid");
}
