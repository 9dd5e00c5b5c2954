pub mod errors;

use serde::Deserialize;
use std::path::Path;

pub use errors::SettingsError;

/// Site settings, loaded from an optional toml/yaml/json file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub scheduler: SchedulerSettings,
    pub merge: MergeSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSettings {
    /// Directory holding the environment loaders, one per config name.
    pub config_root: String,
    /// Node-local directory under which each job creates its scratch space.
    pub scratch_root: String,
    pub submit_command: String,
    /// Program run by the final summarization job.
    pub summarize_program: String,
    pub log_root: String,
    pub kill_root: String,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            config_root: "/usr/local/radeffects/config".to_string(),
            scratch_root: "/tmp".to_string(),
            submit_command: "sbatch".to_string(),
            summarize_program: "splitrun".to_string(),
            log_root: "logFiles".to_string(),
            kill_root: "killFiles".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSettings {
    pub consistency_attribute: String,
    pub count_attribute: String,
    pub output_dir: String,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            consistency_attribute: "gunFluenceUnit".to_string(),
            count_attribute: "nIons".to_string(),
            output_dir: "combinedHDF5output".to_string(),
        }
    }
}

/// Deserializes any serde type from a toml, yaml or json file, chosen by extension.
pub fn load_structured<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, SettingsError> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| SettingsError::FileError(format!("failed to open file: {}", path)))?;

    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let parse_err = |reason: String| SettingsError::ParseError {
        file: path.to_string(),
        reason,
    };

    match ext.as_str() {
        "toml" => toml::from_str(&text).map_err(|e| parse_err(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(&text).map_err(|e| parse_err(e.to_string())),
        "json" => serde_json::from_str(&text).map_err(|e| parse_err(e.to_string())),
        _ => Err(SettingsError::UnsupportedFormat(path.to_string())),
    }
}

pub fn load_settings(path: Option<&str>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => load_structured(path),
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(
            &path,
            "[scheduler]\nscratch_root = \"/scratch\"\n\n[merge]\ncount_attribute = \"nEvents\"\n",
        )
        .unwrap();

        let settings = load_settings(path.to_str()).unwrap();
        assert_eq!(settings.scheduler.scratch_root, "/scratch");
        assert_eq!(settings.scheduler.submit_command, "sbatch");
        assert_eq!(settings.merge.count_attribute, "nEvents");
        assert_eq!(settings.merge.consistency_attribute, "gunFluenceUnit");
    }

    #[test]
    fn yaml_and_json_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("site.yaml");
        std::fs::write(&yaml, "scheduler:\n  submit_command: qsub\n").unwrap();
        let json = dir.path().join("site.json");
        std::fs::write(&json, r#"{"merge": {"output_dir": "totals"}}"#).unwrap();

        assert_eq!(
            load_settings(yaml.to_str()).unwrap().scheduler.submit_command,
            "qsub"
        );
        assert_eq!(load_settings(json.to_str()).unwrap().merge.output_dir, "totals");
    }

    #[test]
    fn unknown_extension_and_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ini = dir.path().join("site.ini");
        std::fs::write(&ini, "").unwrap();
        assert!(matches!(
            load_settings(ini.to_str()),
            Err(SettingsError::UnsupportedFormat(_))
        ));

        let toml = dir.path().join("typo.toml");
        std::fs::write(&toml, "[scheduler]\nscrach_root = \"/x\"\n").unwrap();
        assert!(matches!(
            load_settings(toml.to_str()),
            Err(SettingsError::ParseError { .. })
        ));
    }
}
