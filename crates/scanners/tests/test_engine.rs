mod common;

use common::{ok_response, serve, test_transport, CannedPlugin};
use harpoon_scanners::{PluginConfig, PluginRegistry, ScanEngine, ScanError};
use std::collections::HashSet;
use std::sync::Arc;

fn engine_with(plugins: Vec<CannedPlugin>) -> ScanEngine {
    let mut registry = PluginRegistry::new(PluginConfig::default());
    for plugin in plugins {
        registry.register(Arc::new(plugin));
    }
    ScanEngine::from_parts(registry, test_transport())
}

#[tokio::test]
async fn test_empty_active_set_returns_empty_result() {
    let engine = engine_with(Vec::new());
    let result = engine.scan("http://example.com", None).await.unwrap();
    assert!(result.findings.is_empty());
    assert!(result.scan_info.plugins_used.is_empty());
    assert_eq!(result.target, "http://example.com");
}

#[tokio::test]
async fn test_invalid_target_rejected_before_any_plugin_runs() {
    // A panicking plugin proves no plugin task was launched.
    let engine = engine_with(vec![CannedPlugin::panicking("boomer")]);
    for target in ["not-a-url", ""] {
        let err = engine.scan(target, None).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidTarget(_)), "{target:?}");
    }
}

#[tokio::test]
async fn test_failing_plugin_does_not_affect_siblings() {
    let engine = engine_with(vec![
        CannedPlugin::new("alpha", vec!["a1", "a2"]),
        CannedPlugin::failing("broken"),
        CannedPlugin::new("gamma", vec!["g1"]),
    ]);
    let result = engine.scan("http://example.com", None).await.unwrap();

    let titles: HashSet<&str> = result.findings.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, HashSet::from(["a1", "a2", "g1"]));

    // Failed plugins were still invoked and stay listed.
    let used: HashSet<&str> = result
        .scan_info
        .plugins_used
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(used, HashSet::from(["alpha", "broken", "gamma"]));
}

#[tokio::test]
async fn test_panicking_plugin_is_contained() {
    let engine = engine_with(vec![
        CannedPlugin::panicking("boomer"),
        CannedPlugin::new("steady", vec!["s1"]),
    ]);
    let result = engine.scan("http://example.com", None).await.unwrap();
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].plugin_name, "steady");
    assert_eq!(result.scan_info.plugins_used.len(), 2);
}

#[tokio::test]
async fn test_requested_plugins_preserve_order_and_skip_unknown() {
    let engine = engine_with(vec![
        CannedPlugin::new("alpha", vec![]),
        CannedPlugin::new("beta", vec![]),
    ]);
    let requested = vec![
        "beta".to_string(),
        "missing".to_string(),
        "alpha".to_string(),
    ];
    let result = engine
        .scan("http://example.com", Some(&requested))
        .await
        .unwrap();
    assert_eq!(result.scan_info.plugins_used, vec!["beta", "alpha"]);
}

#[tokio::test]
async fn test_builtin_plugins_against_stub_server() {
    let base = serve(|_index, _head| ok_response("<html>hello</html>")).await;

    let mut registry = PluginRegistry::new(PluginConfig::default());
    registry.load();
    let engine = ScanEngine::from_parts(registry, test_transport());

    let result = engine.scan(&base, None).await.unwrap();
    assert_eq!(result.scan_info.plugins_used.len(), 3);
    // A bare response is missing every hardening header.
    assert!(!result.findings_by_plugin("security_headers").is_empty());
}
