mod common;

use common::{metadata, CannedPlugin};
use harpoon_scanners::{PluginConfig, PluginRegistry, RiskLevel};
use std::sync::Arc;

fn names(plugins: &[Arc<dyn harpoon_scanners::Plugin>]) -> Vec<&str> {
    plugins.iter().map(|p| p.metadata().name.as_str()).collect()
}

#[test]
fn test_list_all_preserves_registration_order() {
    let mut registry = PluginRegistry::new(PluginConfig::default());
    for name in ["zeta", "alpha", "mid"] {
        registry.register(Arc::new(CannedPlugin::new(name, vec![])));
    }
    assert_eq!(names(&registry.list_all()), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_duplicate_registration_last_wins() {
    let mut registry = PluginRegistry::new(PluginConfig::default());
    let mut first = metadata("dup", "old", RiskLevel::Low);
    first.description = "first".to_string();
    let mut second = metadata("dup", "new", RiskLevel::High);
    second.description = "second".to_string();

    registry.register(Arc::new(CannedPlugin::with_metadata(first, vec![])));
    registry.register(Arc::new(CannedPlugin::with_metadata(second, vec![])));

    assert_eq!(registry.len(), 1);
    let plugin = registry.get("dup").unwrap();
    assert_eq!(plugin.metadata().description, "second");
    assert_eq!(plugin.metadata().category, "new");
}

#[test]
fn test_requested_names_resolve_in_caller_order() {
    let mut registry = PluginRegistry::new(PluginConfig::default());
    registry.register(Arc::new(CannedPlugin::new("a", vec![])));
    registry.register(Arc::new(CannedPlugin::new("b", vec![])));

    let requested = vec!["a".to_string(), "missing".to_string(), "b".to_string()];
    let active = registry.active_plugins(Some(&requested));
    assert_eq!(names(&active), vec!["a", "b"]);
}

#[test]
fn test_disabled_overrides_enabled() {
    let config = PluginConfig {
        enabled_plugins: vec!["a".to_string()],
        disabled_plugins: vec!["a".to_string()],
        ..Default::default()
    };
    let mut registry = PluginRegistry::new(config);
    registry.register(Arc::new(CannedPlugin::new("a", vec![])));
    assert!(registry.active_plugins(None).is_empty());
}

#[test]
fn test_enabled_allow_list_restricts_active_set() {
    let config = PluginConfig {
        enabled_plugins: vec!["b".to_string()],
        ..Default::default()
    };
    let mut registry = PluginRegistry::new(config);
    registry.register(Arc::new(CannedPlugin::new("a", vec![])));
    registry.register(Arc::new(CannedPlugin::new("b", vec![])));
    assert_eq!(names(&registry.active_plugins(None)), vec!["b"]);
}

#[test]
fn test_without_allow_list_only_disabled_are_excluded() {
    let config = PluginConfig {
        disabled_plugins: vec!["b".to_string()],
        ..Default::default()
    };
    let mut registry = PluginRegistry::new(config);
    for name in ["a", "b", "c"] {
        registry.register(Arc::new(CannedPlugin::new(name, vec![])));
    }
    assert_eq!(names(&registry.active_plugins(None)), vec!["a", "c"]);
}

#[test]
fn test_requested_disabled_plugin_is_skipped() {
    let config = PluginConfig {
        disabled_plugins: vec!["a".to_string()],
        ..Default::default()
    };
    let mut registry = PluginRegistry::new(config);
    registry.register(Arc::new(CannedPlugin::new("a", vec![])));
    registry.register(Arc::new(CannedPlugin::new("b", vec![])));

    let requested = vec!["a".to_string(), "b".to_string()];
    assert_eq!(names(&registry.active_plugins(Some(&requested))), vec!["b"]);
}

#[test]
fn test_category_and_risk_filters_ignore_case() {
    let mut registry = PluginRegistry::new(PluginConfig::default());
    registry.register(Arc::new(CannedPlugin::with_metadata(
        metadata("headers", "Configuration", RiskLevel::Low),
        vec![],
    )));
    registry.register(Arc::new(CannedPlugin::with_metadata(
        metadata("probe", "discovery", RiskLevel::High),
        vec![],
    )));

    assert_eq!(names(&registry.filter_by_category("configuration")), vec!["headers"]);
    assert_eq!(names(&registry.filter_by_category("DISCOVERY")), vec!["probe"]);
    assert_eq!(names(&registry.filter_by_risk_level("high")), vec!["probe"]);
    assert!(registry.filter_by_risk_level("medium").is_empty());
}

#[test]
fn test_reload_restores_builtin_set() {
    let mut registry = PluginRegistry::new(PluginConfig::default());
    registry.load();
    let loaded = registry.len();
    assert!(loaded > 0);

    registry.register(Arc::new(CannedPlugin::new("transient", vec![])));
    assert_eq!(registry.len(), loaded + 1);

    registry.reload();
    assert_eq!(registry.len(), loaded);
    assert!(registry.get("transient").is_none());
}
