use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::args::Args;
use pocmap_types::{DEFAULT_CONCURRENCY, DEFAULT_SEARCH_RESULTS};

/// Configuration file picked up from the working directory when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pocmap.toml";

/// Run settings loaded from TOML. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanSettings,
    pub search: SearchSettings,
    pub definitions: DefinitionSettings,
    pub tools: ToolSettings,
    pub io: IoSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanSettings {
    pub concurrency: usize,
    pub results_dir: PathBuf,
    /// Per-check time limit in seconds; 0 disables it.
    pub task_timeout_secs: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            results_dir: PathBuf::from("nuclei_results"),
            task_timeout_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub max_results: usize,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: pocmap_vuln::DEFAULT_SEARCH_ENDPOINT.to_string(),
            max_results: DEFAULT_SEARCH_RESULTS,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefinitionSettings {
    pub root: PathBuf,
    pub advisory_dir: PathBuf,
    pub advisory_prefix: String,
    pub extension: String,
}

impl Default for DefinitionSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("poc"),
            advisory_dir: PathBuf::from("poc/cve"),
            advisory_prefix: "CNVD".to_string(),
            extension: "yaml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolSettings {
    pub nuclei: PathBuf,
    pub nuclei_json_flag: String,
    pub ehole: PathBuf,
    /// Directory the fingerprint tool reads its target list from.
    pub ehole_dir: PathBuf,
}

impl Default for ToolSettings {
    fn default() -> Self {
        let nuclei = if cfg!(windows) {
            "nuclei/nuclei.exe"
        } else {
            "nuclei/nuclei"
        };
        Self {
            nuclei: PathBuf::from(nuclei),
            nuclei_json_flag: pocmap_runner::nuclei::DEFAULT_JSON_FLAG.to_string(),
            ehole: PathBuf::from("ehole_windows/ehole_windows.exe"),
            ehole_dir: PathBuf::from("ehole_windows"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IoSettings {
    pub input_sheet: String,
    pub report: PathBuf,
}

impl Default for IoSettings {
    fn default() -> Self {
        Self {
            input_sheet: pocmap_output::DEFAULT_INPUT_SHEET.to_string(),
            report: PathBuf::from("scan_result.xlsx"),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] when it
    /// exists. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse config '{}'", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Command-line flags win over the file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(n) = args.concurrency {
            self.scan.concurrency = n;
        }
        if let Some(ref output) = args.output {
            self.io.report = output.clone();
        }
        if args.offline {
            self.search.enabled = false;
        }
    }
}
