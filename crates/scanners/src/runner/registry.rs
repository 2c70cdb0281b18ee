use crate::config::PluginConfig;
use crate::core::Plugin;
use crate::runner::discovery;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Owns the name -> plugin mapping and exposes filtered views of it.
///
/// Read-heavy during scans. `reload` must not run concurrently with an
/// in-flight scan; callers are expected to serialize that themselves.
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
    /// First-registration order, preserved across replacements.
    order: Vec<String>,
    config: PluginConfig,
}

impl PluginRegistry {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            plugins: HashMap::new(),
            order: Vec::new(),
            config,
        }
    }

    /// Register the built-in set plus every external plugin discovered in
    /// the configured directories.
    pub fn load(&mut self) {
        for plugin in crate::plugins::builtins() {
            self.register(plugin);
        }
        let directories = self.config.plugin_directories.clone();
        for directory in &directories {
            self.discover_directory(directory);
        }
        info!(count = self.plugins.len(), "plugins loaded");
    }

    /// Clear all registrations and re-run loading.
    pub fn reload(&mut self) {
        self.plugins.clear();
        self.order.clear();
        self.load();
    }

    /// Insert by name. A later registration under an existing name replaces
    /// the earlier one and keeps its original position in listing order.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        let name = plugin.metadata().name.clone();
        if self.plugins.insert(name.clone(), plugin).is_some() {
            debug!(plugin = %name, "replacing existing plugin registration");
        } else {
            self.order.push(name);
        }
    }

    fn discover_directory(&mut self, directory: &Path) {
        let entries = match std::fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    directory = %directory.display(),
                    "skipping plugin directory: {err}"
                );
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "toml") {
                continue;
            }
            match discovery::load_manifest(&path) {
                Ok(manifest) => {
                    debug!(
                        plugin = %manifest.name,
                        manifest = %path.display(),
                        "discovered external plugin"
                    );
                    self.register(Arc::new(discovery::ExternalPlugin::from_manifest(manifest)));
                }
                Err(err) => {
                    error!(manifest = %path.display(), "failed to load plugin manifest: {err}");
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(name).cloned()
    }

    /// Every registered plugin, in registration order.
    pub fn list_all(&self) -> Vec<Arc<dyn Plugin>> {
        self.order
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    /// Resolve the set of plugins one scan should run.
    ///
    /// With an explicit request list the caller's order is preserved and
    /// unknown or disabled names are skipped with a warning. Without one,
    /// a non-empty allow-list restricts the set; the deny-list always wins.
    pub fn active_plugins(&self, requested: Option<&[String]>) -> Vec<Arc<dyn Plugin>> {
        match requested {
            Some(names) => names
                .iter()
                .filter_map(|name| match self.get(name) {
                    Some(plugin) => {
                        if self.is_disabled(name) {
                            warn!(plugin = %name, "requested plugin is disabled in configuration");
                            None
                        } else {
                            Some(plugin)
                        }
                    }
                    None => {
                        warn!(plugin = %name, "requested plugin not found");
                        None
                    }
                })
                .collect(),
            None => self
                .order
                .iter()
                .filter(|name| self.is_enabled(name) && !self.is_disabled(name))
                .filter_map(|name| self.get(name))
                .collect(),
        }
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<Arc<dyn Plugin>> {
        self.list_all()
            .into_iter()
            .filter(|p| p.metadata().category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn filter_by_risk_level(&self, risk_level: &str) -> Vec<Arc<dyn Plugin>> {
        self.list_all()
            .into_iter()
            .filter(|p| p.metadata().risk_level.as_str().eq_ignore_ascii_case(risk_level))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.config.enabled_plugins.is_empty()
            || self.config.enabled_plugins.iter().any(|e| e == name)
    }

    fn is_disabled(&self, name: &str) -> bool {
        self.config.disabled_plugins.iter().any(|d| d == name)
    }
}
