//! Generator settings.
//!
//! Settings come from three layers, later layers winning:
//! 1. `appsettings.json` embedded in the binary
//! 2. the user file (`~/.config/claritygen/appsettings.json`, or `--config <path>`)
//! 3. explicit overrides from the command line
//!
//! Keys are matched case-insensitively and ignore underscores, so
//! `GitRepoUrl`, `gitRepoUrl` and `git_repo_url` are the same key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;
use crate::utils::{io, validation};

const EMBEDDED_SETTINGS: &str = include_str!("appsettings.json");

/// Root of `appsettings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    #[serde(default)]
    pub template: TemplateSettings,

    #[serde(default)]
    pub rename: RenameSettings,
}

/// Where the template lives and what it is currently called.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateSettings {
    #[serde(default)]
    pub git_repo_url: String,

    #[serde(default)]
    pub template_name: String,
}

/// Rules for the renaming engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenameSettings {
    #[serde(default = "default_protected_suffix")]
    pub protected_suffix: String,

    #[serde(default = "default_skip_markers")]
    pub skip_markers: Vec<String>,

    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    #[serde(default = "default_manifest_extensions")]
    pub manifest_extensions: Vec<String>,

    #[serde(default = "default_deleted_extensions")]
    pub deleted_extensions: Vec<String>,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            protected_suffix: default_protected_suffix(),
            skip_markers: default_skip_markers(),
            source_extensions: default_source_extensions(),
            manifest_extensions: default_manifest_extensions(),
            deleted_extensions: default_deleted_extensions(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_protected_suffix() -> String {
    ".Core".to_string()
}

fn default_skip_markers() -> Vec<String> {
    [".git", "Migrations", "tests", "bin", "obj"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_source_extensions() -> Vec<String> {
    vec![".cs".to_string(), ".cshtml".to_string()]
}

fn default_manifest_extensions() -> Vec<String> {
    vec![".csproj".to_string()]
}

fn default_deleted_extensions() -> Vec<String> {
    vec![".sln.DotSettings".to_string()]
}

/// Values supplied on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub git_repo_url: Option<String>,
    pub template_name: Option<String>,
}

/// Settings plus the user file they were read from, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedSettings {
    pub settings: AppSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load settings, layering the user file over the embedded defaults.
///
/// When `explicit` is given the file must exist. Otherwise the default user
/// file is used if present.
pub fn load(explicit: Option<&Path>) -> Result<LoadedSettings> {
    let mut merged = parse_settings_json(EMBEDDED_SETTINGS, "embedded appsettings.json")?;

    let source = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(Error::config_invalid_value(
                    "config",
                    Some(path.display().to_string()),
                    "settings file not found",
                ));
            }
            Some(path.to_path_buf())
        }
        None => paths::appsettings_json().ok().filter(|p| p.is_file()),
    };

    if let Some(path) = &source {
        let raw = io::read_file(path, &format!("read {}", path.display()))?;
        let overlay = parse_settings_json(&raw, &path.display().to_string())?;
        merge_values(&mut merged, overlay);
    }

    let settings: AppSettings = serde_json::from_value(merged).map_err(|e| {
        let origin = source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded appsettings.json".to_string());
        Error::config_invalid_json(origin, e)
    })?;

    Ok(LoadedSettings { settings, source })
}

fn parse_settings_json(raw: &str, origin: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).map_err(|e| Error::config_invalid_json(origin, e))?;
    if !value.is_object() {
        return Err(Error::config_invalid_value(
            "settings",
            Some(origin.to_string()),
            "settings root must be a JSON object",
        ));
    }
    Ok(canonicalize_keys(value))
}

/// Rewrite known keys to their PascalCase form so differently-cased files merge.
fn canonicalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, val) in map {
                out.insert(canonical_key(&key), canonicalize_keys(val));
            }
            Value::Object(out)
        }
        other => other,
    }
}

fn canonical_key(key: &str) -> String {
    let folded: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();

    let known = match folded.as_str() {
        "template" => "Template",
        "gitrepourl" => "GitRepoUrl",
        "templatename" => "TemplateName",
        "rename" => "Rename",
        "protectedsuffix" => "ProtectedSuffix",
        "skipmarkers" => "SkipMarkers",
        "sourceextensions" => "SourceExtensions",
        "manifestextensions" => "ManifestExtensions",
        "deletedextensions" => "DeletedExtensions",
        _ => return key.to_string(),
    };
    known.to_string()
}

/// Deep-merge `overlay` into `base`. Objects merge per key; everything else replaces.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_obj), Value::Object(overlay_obj)) => {
            for (key, value) in overlay_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl AppSettings {
    /// Parse settings from a JSON string on top of the built-in defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut merged = parse_settings_json(EMBEDDED_SETTINGS, "embedded appsettings.json")?;
        merge_values(&mut merged, parse_settings_json(raw, "settings")?);
        serde_json::from_value(merged).map_err(|e| Error::config_invalid_json("settings", e))
    }

    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(url) = &overrides.git_repo_url {
            self.template.git_repo_url = url.trim().to_string();
        }
        if let Some(name) = &overrides.template_name {
            self.template.template_name = name.trim().to_string();
        }
    }

    /// Check everything a generation run needs before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.template.git_repo_url.trim().is_empty() {
            return Err(Error::config_missing_key("Template.GitRepoUrl", None)
                .with_hint("Set Template.GitRepoUrl in appsettings.json or pass --template-url"));
        }

        validation::require_identifier(&self.template.template_name, "TemplateName").map_err(
            |_| {
                Error::config_invalid_value(
                    "Template.TemplateName",
                    Some(self.template.template_name.clone()),
                    "template name must be a non-empty identifier",
                )
            },
        )?;

        self.rename.validate()
    }
}

impl RenameSettings {
    /// Check the rules the renaming engine runs with.
    pub fn validate(&self) -> Result<()> {
        if self.protected_suffix.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "Rename.ProtectedSuffix",
                None,
                "protected suffix cannot be empty",
            ));
        }

        let lists = [
            ("Rename.SourceExtensions", &self.source_extensions),
            ("Rename.ManifestExtensions", &self.manifest_extensions),
            ("Rename.DeletedExtensions", &self.deleted_extensions),
            ("Rename.SkipMarkers", &self.skip_markers),
        ];
        for (key, list) in lists {
            if list.iter().any(|entry| entry.is_empty()) {
                return Err(Error::config_invalid_value(
                    key,
                    None,
                    "entries cannot be empty strings",
                ));
            }
        }

        Ok(())
    }
}
