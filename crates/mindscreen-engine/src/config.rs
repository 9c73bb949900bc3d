use std::path::{Path, PathBuf};
use std::time::Duration;

use mindscreen_inference::Credential;
use mindscreen_inference::chat::ModelProfile;
use mindscreen_inference::geolocation::DEFAULT_GEOLOCATION_URL;
use mindscreen_inference::transport::Endpoint;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Current settings version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const CONFIG_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Schema version. Missing or 0 = pre-versioned settings.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_true")]
    pub ai_enabled: bool,
    /// Skip the AI path even when credentials are present.
    #[serde(default)]
    pub force_fallback: bool,
    #[serde(default)]
    pub endpoint: Endpoint,
    /// Ordered API keys. Blanks and the sample placeholder are ignored.
    #[serde(default)]
    pub credentials: Vec<String>,
    /// Candidate analysis models in priority order.
    #[serde(default = "ModelProfile::analysis_defaults")]
    pub models: Vec<ModelProfile>,
    #[serde(default = "ModelProfile::location_default")]
    pub location_model: ModelProfile,
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_geolocation_url() -> Option<String> {
    Some(DEFAULT_GEOLOCATION_URL.to_string())
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            ai_enabled: true,
            force_fallback: false,
            endpoint: Endpoint::default(),
            credentials: Vec::new(),
            models: ModelProfile::analysis_defaults(),
            location_model: ModelProfile::location_default(),
            geolocation_url: default_geolocation_url(),
            request_timeout_secs: None,
        }
    }
}

/// Redacted settings summary, safe to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsInfo {
    pub ai_enabled: bool,
    pub ai_active: bool,
    pub endpoint: String,
    pub credential_hints: Vec<String>,
    pub models: Vec<String>,
    pub location_model: String,
    pub geolocation_url: Option<String>,
}

impl EngineSettings {
    /// Defaults overlaid with `MINDSCREEN_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    pub fn overlay_env(self) -> Self {
        self.overlay_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`. Unset or blank variables leave the
    /// current value in place.
    pub fn overlay_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("MINDSCREEN_AI_ENABLED") {
            self.ai_enabled = parse_flag(&v);
        }
        if let Some(v) = get("MINDSCREEN_FORCE_FALLBACK") {
            self.force_fallback = parse_flag(&v);
        }
        if let Some(v) = get("MINDSCREEN_API_KEYS") {
            self.credentials = split_list(&v);
        }
        if let Some(v) = get("MINDSCREEN_MODELS") {
            self.models = split_list(&v).iter().map(|id| profile_for(id)).collect();
        }
        if let Some(v) = get("MINDSCREEN_ENDPOINT") {
            self.endpoint.base_url = v;
        }
        self
    }

    pub fn usable_credentials(&self) -> Vec<Credential> {
        Credential::parse_all(&self.credentials)
    }

    /// Whether the engine will attempt live completions at all.
    pub fn ai_active(&self) -> bool {
        self.ai_enabled
            && !self.force_fallback
            && !self.models.is_empty()
            && !self.usable_credentials().is_empty()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn info(&self) -> SettingsInfo {
        SettingsInfo {
            ai_enabled: self.ai_enabled,
            ai_active: self.ai_active(),
            endpoint: self.endpoint.url(),
            credential_hints: self.usable_credentials().iter().map(Credential::redacted).collect(),
            models: self.models.iter().map(|m| m.id.clone()).collect(),
            location_model: self.location_model.id.clone(),
            geolocation_url: self.geolocation_url.clone(),
        }
    }
}

fn parse_flag(v: &str) -> bool {
    matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Known models keep their tuned sampling parameters.
fn profile_for(id: &str) -> ModelProfile {
    ModelProfile::analysis_defaults()
        .into_iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| ModelProfile::new(id, 0.7, 0.9, 2048))
}

fn config_dir() -> Result<PathBuf, EngineError> {
    let base = dirs::config_dir()
        .ok_or_else(|| EngineError::Config("no config directory found".to_string()))?;
    Ok(base.join("mindscreen"))
}

/// Default settings file under the platform config directory.
pub fn default_path() -> Result<PathBuf, EngineError> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

pub fn load_settings(path: &Path) -> Result<EngineSettings, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        EngineError::Config(format!("failed to read settings at {}: {e}", path.display()))
    })?;

    // Parse as raw JSON so migrations run before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let raw_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let on_disk_version = u32::try_from(raw_version).map_err(|_| {
        EngineError::Config(format!(
            "config_version {raw_version} is newer than this build supports ({CURRENT_VERSION})"
        ))
    })?;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Load from `path` when it exists, otherwise start from defaults.
pub fn load_or_default(path: &Path) -> Result<EngineSettings, EngineError> {
    if path.exists() {
        load_settings(path)
    } else {
        Ok(EngineSettings::default())
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(
    mut json: serde_json::Value,
    from_version: u32,
) -> Result<serde_json::Value, EngineError> {
    if from_version > CURRENT_VERSION {
        return Err(EngineError::Config(format!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    // v0 → v1: single `api_key` becomes the ordered `credentials` list.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| EngineError::Config("settings are not a JSON object".to_string()))?;
        let legacy = obj.remove("api_key");
        if !obj.contains_key("credentials") {
            let keys: Vec<serde_json::Value> =
                legacy.into_iter().filter(|k| k.is_string()).collect();
            obj.insert("credentials".to_string(), serde_json::Value::Array(keys));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated settings v0 → v1 (api_key moved to credentials)");
    }

    Ok(json)
}

pub fn save_settings(path: &Path, settings: &EngineSettings) -> Result<(), EngineError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = settings.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "settings saved");
    Ok(())
}

pub fn delete_settings(path: &Path) -> Result<(), EngineError> {
    if path.exists() {
        std::fs::remove_file(path)?;
        tracing::info!(path = %path.display(), "settings deleted");
    }
    Ok(())
}
