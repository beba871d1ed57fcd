//! Sandbox configuration. Loaded from sandbox.ron at startup.

use debugger::{ModelClass, ModelRegistry};
use input::ControlBindings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for a sandbox session. Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Overlay width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Overlay height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Debugger is switched on before the first frame.
    #[serde(default)]
    pub start_enabled: bool,
    #[serde(default)]
    pub controls: ControlBindings,
    /// Pause after a failed debugger frame.
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,
    /// Start with the noclip camera active.
    #[serde(default)]
    pub free_camera: bool,
    /// Extra model names on top of the built-in tables.
    #[serde(default)]
    pub models: ModelNames,
}

/// Model names by table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelNames {
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub props: Vec<String>,
    #[serde(default)]
    pub peds: Vec<String>,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_error_backoff_ms() -> u64 {
    100
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            start_enabled: false,
            controls: ControlBindings::default(),
            error_backoff_ms: default_error_backoff_ms(),
            free_camera: false,
            models: ModelNames::default(),
        }
    }
}

impl SandboxConfig {
    /// Load `sandbox.ron` from the current directory. A missing or invalid file gives the defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        };
        Self::parse(&data).unwrap_or_else(|e| {
            log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
            Self::default()
        })
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    /// Built-in model tables plus the configured names.
    pub fn model_registry(&self) -> ModelRegistry {
        let mut registry = ModelRegistry::builtin();
        registry.extend(ModelClass::Vehicle, self.models.vehicles.iter().map(String::as_str));
        registry.extend(ModelClass::Prop, self.models.props.iter().map(String::as_str));
        registry.extend(ModelClass::Ped, self.models.peds.iter().map(String::as_str));
        registry
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("sandbox.ron")
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::ModelHash;
    use input::{Binding, KeyCode, MouseButton};

    #[test]
    fn empty_file_gives_defaults() {
        let config = SandboxConfig::parse("()").unwrap();
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 720);
        assert!(!config.start_enabled);
        assert_eq!(config.error_backoff(), Duration::from_millis(100));
        assert_eq!(config.controls.toggle, Binding::Key(KeyCode::F2));
        assert_eq!(config.controls.aim, Binding::Mouse(MouseButton::Right));
    }

    #[test]
    fn overrides_are_read() {
        let config = SandboxConfig::parse(
            r#"(
                start_enabled: true,
                error_backoff_ms: 250,
                controls: (toggle: Key(F9)),
                models: (props: ["prop_custom_crate"]),
            )"#,
        )
        .unwrap();
        assert!(config.start_enabled);
        assert_eq!(config.error_backoff(), Duration::from_millis(250));
        assert_eq!(config.controls.toggle, Binding::Key(KeyCode::F9));
        assert_eq!(config.controls.aim, Binding::Mouse(MouseButton::Right));

        let registry = config.model_registry();
        assert_eq!(
            registry.resolve(ModelHash::from_name("prop_custom_crate")),
            "prop_custom_crate"
        );
        assert_eq!(registry.resolve(ModelHash::from_name("adder")), "adder");
    }

    #[test]
    fn invalid_file_falls_back() {
        assert!(SandboxConfig::parse("(window_width: \"wide\")").is_err());
        let missing = SandboxConfig::load_from(Path::new("/nonexistent/sandbox.ron"));
        assert_eq!(missing.window_width, 1280);
    }
}
