//! Parameter gateway tests

mod common;

use serde_json::{json, Value};

use common::{client, healthy_controller, ScriptedTransport};
use econet_connectors::http::HttpResponse;
use econet_connectors::{EconetApi, EconetError};
use econet_core::cache::MemCache;
use econet_core::{Limits, MockTimeSource};

fn api(transport: &std::sync::Arc<ScriptedTransport>) -> EconetApi {
    EconetApi::new(client(transport), MemCache::new())
}

#[tokio::test]
async fn test_initialize_reads_identity() {
    let transport = healthy_controller();
    let api = EconetApi::create(client(&transport), MemCache::new()).await.unwrap();

    assert!(api.is_ready());
    assert_eq!(api.uid(), "UID-0001");
    assert_eq!(api.sw_revision(), "1.0.0");
    assert_eq!(api.hw_version(), "ecoNET300");
}

#[tokio::test]
async fn test_identity_placeholders_before_initialize() {
    let transport = ScriptedTransport::new();
    let api = api(&transport);

    assert!(!api.is_ready());
    assert_eq!(api.uid(), "default-uid");
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn test_missing_identity_fields_keep_placeholders() {
    let transport = ScriptedTransport::new();
    transport.respond_json("sysParams", json!({ "uid": "ABC", "softVer": null }));

    let api = api(&transport);
    api.initialize().await.unwrap();

    assert!(api.is_ready());
    assert_eq!(api.uid(), "ABC");
    assert_eq!(api.sw_revision(), "default-sw-revision");
    assert_eq!(api.hw_version(), "default-hw-version");
}

#[tokio::test]
async fn test_initialize_without_sys_params_fails() {
    let transport = ScriptedTransport::new();
    transport.respond("sysParams", Ok(HttpResponse::new(503, "")));

    let api = api(&transport);
    let err = api.initialize().await.unwrap_err();

    assert!(matches!(err, EconetError::Data(_)));
    assert!(!api.is_ready());
}

#[tokio::test]
async fn test_initialize_propagates_auth_failure() {
    let transport = ScriptedTransport::new();
    transport.respond("sysParams", Ok(HttpResponse::new(401, "")));

    let err = EconetApi::create(client(&transport), MemCache::new())
        .await
        .unwrap_err();
    assert_eq!(err, EconetError::Auth);
}

#[tokio::test]
async fn test_fetch_data_merges_snapshots() {
    let transport = ScriptedTransport::new();
    transport.respond_json("regParams", json!({ "curr": { "tempCO": 45 } }));
    transport.respond_json("sysParams", json!({ "uid": "X" }));

    let data = api(&transport).fetch_data().await.unwrap();

    assert_eq!(data.len(), 2);
    assert_eq!(data.get("tempCO"), Some(&Value::from(45)));
    assert_eq!(data.get("uid"), Some(&Value::from("X")));
}

#[tokio::test]
async fn test_fetch_data_sys_params_win_collisions() {
    let transport = ScriptedTransport::new();
    transport.respond_json("regParams", json!({ "curr": { "mode": 3 } }));
    transport.respond_json("sysParams", json!({ "mode": "sys" }));

    let data = api(&transport).fetch_data().await.unwrap();
    assert_eq!(data.get("mode"), Some(&Value::from("sys")));
}

#[tokio::test]
async fn test_fetch_data_without_curr_fails() {
    let transport = ScriptedTransport::new();
    transport.respond_json("regParams", json!({ "other": {} }));
    transport.respond_json("sysParams", json!({ "uid": "X" }));

    let err = api(&transport).fetch_data().await.unwrap_err();
    assert_eq!(
        err,
        EconetError::Data("Data for key: curr does not exist".into())
    );
}

#[tokio::test]
async fn test_fetch_data_without_sys_params_fails() {
    let transport = ScriptedTransport::new();
    transport.respond_json("regParams", json!({ "curr": { "tempCO": 45 } }));

    let err = api(&transport).fetch_data().await.unwrap_err();
    assert!(matches!(err, EconetError::Data(_)));
}

#[tokio::test]
async fn test_limits_are_fetched_once() {
    let transport = healthy_controller();
    let api = api(&transport);

    let first = api.get_param_limits("tempCOSet").await.unwrap();
    let second = api.get_param_limits("tempCWUSet").await.unwrap();

    assert_eq!(first, Some(Limits::new(27.0, 68.0)));
    assert_eq!(second, Some(Limits::new(20.0, 55.0)));
    assert_eq!(transport.calls_to("rmCurrentDataParamsEdits"), 1);
}

#[tokio::test]
async fn test_limits_survive_clock_advance() {
    let transport = healthy_controller();
    let clock = MockTimeSource::new(0);
    let api = EconetApi::new(
        client(&transport),
        MemCache::with_clock(std::sync::Arc::new(clock.clone())),
    );

    api.get_param_limits("tempCOSet").await.unwrap();
    clock.advance_secs(365 * 24 * 3600);
    api.get_param_limits("tempCOSet").await.unwrap();

    assert_eq!(transport.calls_to("rmCurrentDataParamsEdits"), 1);
}

#[tokio::test]
async fn test_limits_for_unmapped_param_skip_network() {
    let transport = healthy_controller();

    let limits = api(&transport).get_param_limits("fanPower").await.unwrap();

    assert_eq!(limits, None);
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn test_limits_missing_index_is_none() {
    let transport = ScriptedTransport::new();
    transport.respond_json("rmCurrentDataParamsEdits", json!({ "data": { "1280": { "min": 27, "max": 68 } } }));

    let limits = api(&transport).get_param_limits("tempCWUSet").await.unwrap();
    assert_eq!(limits, None);
}

#[tokio::test]
async fn test_limits_without_data_key_fails() {
    let transport = ScriptedTransport::new();
    transport.respond_json("rmCurrentDataParamsEdits", json!({}));

    let err = api(&transport).get_param_limits("tempCOSet").await.unwrap_err();
    assert!(matches!(err, EconetError::Data(_)));
}

#[tokio::test]
async fn test_set_param_ok_updates_cache() {
    let transport = healthy_controller();
    let api = api(&transport);

    assert!(api.set_param("tempCOSet", 60).await.unwrap());
    assert_eq!(api.cached_value("tempCOSet"), Some(Value::from(60)));

    let request = &transport.requests()[0];
    assert!(request
        .query
        .contains(&("newParamKey".to_string(), "1280".to_string())));
    assert!(request
        .query
        .contains(&("newParamValue".to_string(), "60".to_string())));
}

#[tokio::test]
async fn test_set_param_rejected_leaves_cache_untouched() {
    let transport = ScriptedTransport::new();
    transport.respond_json("rmCurrNewParam", json!({ "result": "FAIL" }));
    let api = api(&transport);

    assert!(!api.set_param("tempCOSet", 60).await.unwrap());
    assert_eq!(api.cached_value("tempCOSet"), None);
}

#[tokio::test]
async fn test_set_param_without_result_field() {
    let transport = ScriptedTransport::new();
    transport.respond_json("rmCurrNewParam", json!({ "status": "OK" }));
    let api = api(&transport);

    assert!(!api.set_param("tempCWUSet", 50).await.unwrap());
    assert_eq!(api.cached_value("tempCWUSet"), None);
}

#[tokio::test]
async fn test_set_param_without_response() {
    let transport = ScriptedTransport::new();
    transport.respond("rmCurrNewParam", Ok(HttpResponse::new(500, "")));
    let api = api(&transport);

    assert!(!api.set_param("tempCOSet", 60).await.unwrap());
    assert_eq!(api.cached_value("tempCOSet"), None);
}

#[tokio::test]
async fn test_set_param_unmapped_skips_network() {
    let transport = healthy_controller();

    assert!(!api(&transport).set_param("fanPower", 10).await.unwrap());
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn test_set_param_auth_failure() {
    let transport = ScriptedTransport::new();
    transport.respond("rmCurrNewParam", Ok(HttpResponse::new(401, "")));

    let err = api(&transport).set_param("tempCOSet", 60).await.unwrap_err();
    assert_eq!(err, EconetError::Auth);
}

#[tokio::test]
async fn test_written_value_expires_with_cache_ttl() {
    let transport = healthy_controller();
    let clock = MockTimeSource::new(1_000);
    let api = EconetApi::new(
        client(&transport),
        MemCache::with_clock(std::sync::Arc::new(clock.clone())),
    );

    assert!(api.set_param("tempCWUSet", 48).await.unwrap());
    clock.advance_secs(59);
    assert_eq!(api.cached_value("tempCWUSet"), Some(Value::from(48)));
    clock.advance_secs(1);
    assert_eq!(api.cached_value("tempCWUSet"), None);
}
