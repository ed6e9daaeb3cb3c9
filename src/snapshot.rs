use crate::analysis::profile::PlayerProfile;
use crate::error::AppError;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct ProfileSnapshot<'a> {
    generated_at: DateTime<Utc>,
    region: &'a str,
    profile: &'a PlayerProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub prompt_path: PathBuf,
    pub data_path: PathBuf,
    pub analysis_path: Option<PathBuf>,
}

pub struct ReportWriter {
    dir: PathBuf,
    stem: String,
}

impl ReportWriter {
    /// Files are named `<kind>_<player>_<timestamp>` inside `dir`.
    pub fn new(dir: &Path, player_name: &str, timestamp: &str) -> Self {
        ReportWriter {
            dir: dir.to_path_buf(),
            stem: format!("{}_{}", sanitize_file_name(player_name), timestamp),
        }
    }

    pub fn with_local_timestamp(dir: &Path, player_name: &str) -> Self {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::new(dir, player_name, &timestamp)
    }

    fn path(&self, kind: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.{}", kind, self.stem, extension))
    }

    pub fn save(
        &self,
        region: &str,
        profile: &PlayerProfile,
        prompt: &str,
        analysis: Option<&str>,
    ) -> Result<SavedReport, AppError> {
        fs::create_dir_all(&self.dir)?;

        let prompt_path = self.path("player_report", "txt");
        fs::write(&prompt_path, prompt)?;

        let snapshot = ProfileSnapshot {
            generated_at: Utc::now(),
            region,
            profile,
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize profile: {}", e)))?;
        let data_path = self.path("player_data", "json");
        fs::write(&data_path, json)?;

        let analysis_path = match analysis {
            Some(text) => {
                let path = self.path("player_analysis", "txt");
                fs::write(&path, text)?;
                Some(path)
            }
            None => None,
        };

        info!(dir = %self.dir.display(), "report saved");
        Ok(SavedReport {
            prompt_path,
            data_path,
            analysis_path,
        })
    }
}

/// Keep names readable while dropping path separators and other characters
/// that are awkward in file names. Non-ASCII letters (e.g. Hangul) survive.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
