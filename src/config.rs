use crate::level::LintLevel;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Marker attribute name recognized when no config overrides it.
pub const DEFAULT_MARKER_NAME: &str = "NoCapture";

#[derive(Debug, Default, Deserialize)]
pub struct NoCaptureConfig {
    #[serde(default)]
    pub lints: LintsConfig,

    #[serde(default)]
    pub markers: MarkersConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct LintsConfig {
    #[serde(default)]
    pub disabled: Vec<String>,

    #[serde(flatten)]
    pub levels: HashMap<String, LintLevel>,
}

#[derive(Debug, Deserialize)]
pub struct MarkersConfig {
    #[serde(default = "default_marker_names")]
    pub names: Vec<String>,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            names: default_marker_names(),
        }
    }
}

fn default_marker_names() -> Vec<String> {
    vec![DEFAULT_MARKER_NAME.to_string()]
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Analyze files that look machine-generated.
    #[serde(default)]
    pub include_generated: bool,
}

pub const DEFAULT_CONFIG_FILE_NAME: &str = "no-capture.toml";

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut cur = Some(start_dir);
    while let Some(dir) = cur {
        let candidate = dir.join(DEFAULT_CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        cur = dir.parent();
    }
    None
}

pub fn parse_config(raw: &str) -> Result<NoCaptureConfig> {
    let cfg: NoCaptureConfig = toml::from_str(raw).context("invalid no-capture config")?;
    Ok(cfg)
}

pub fn load_config_file(path: &Path) -> Result<NoCaptureConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let cfg: NoCaptureConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(cfg)
}

pub fn load_config(
    explicit_path: Option<&Path>,
    start_dir: &Path,
) -> Result<Option<(PathBuf, NoCaptureConfig)>> {
    if let Some(p) = explicit_path {
        let cfg = load_config_file(p)?;
        return Ok(Some((p.to_path_buf(), cfg)));
    }

    let Some(p) = find_config_file(start_dir) else {
        return Ok(None);
    };
    let cfg = load_config_file(&p)?;
    Ok(Some((p, cfg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse_config("").expect("empty config is valid");
        assert!(cfg.lints.disabled.is_empty());
        assert!(cfg.lints.levels.is_empty());
        assert_eq!(cfg.markers.names, vec!["NoCapture".to_string()]);
        assert!(!cfg.analysis.include_generated);
    }

    #[test]
    fn levels_and_markers_are_read() {
        let cfg = parse_config(
            r#"
[lints]
no_capture = "warn"

[markers]
names = ["NoCapture", "HotPath"]

[analysis]
include_generated = true
"#,
        )
        .expect("config should parse");

        assert_eq!(cfg.lints.levels.get("no_capture"), Some(&LintLevel::Warn));
        assert_eq!(cfg.markers.names, vec!["NoCapture", "HotPath"]);
        assert!(cfg.analysis.include_generated);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(parse_config("[lints]\nno_capture = \"loud\"\n").is_err());
    }
}
