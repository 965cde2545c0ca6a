use serde::Deserialize;
use shared::LabelSpace;
use std::env;
use std::path::{Path, PathBuf};

pub const TARGET_SIZE: (u32, u32) = (224, 224);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Model file not found at {}. Ensure the path is correct.", .0.display())]
    ModelNotFound(PathBuf),
    #[error("Invalid PORT value {0:?}")]
    InvalidPort(String),
    #[error("Failed to read labels file {}: {source}", path.display())]
    LabelsRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse labels file {}: {source}", path.display())]
    LabelsParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Labels file {} contains no labels", .0.display())]
    LabelsEmpty(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub labels: LabelSpace,
    pub target_size: (u32, u32),
}

#[derive(Debug, Deserialize)]
struct LabelsFile {
    labels: Vec<String>,
}

impl AppConfig {
    /// Gathers configuration from the environment. The model file must
    /// already exist; a missing file aborts start-up.
    pub fn from_env() -> Result<Self, ConfigError> {
        let model_path =
            PathBuf::from(env::var("MODEL_PATH").unwrap_or_else(|_| "../best.pt".to_string()));
        if !model_path.exists() {
            return Err(ConfigError::ModelNotFound(model_path));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 5000,
        };

        let uploads_dir =
            PathBuf::from(env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()));

        let labels = match env::var("LABELS_PATH") {
            Ok(path) => load_labels(Path::new(&path))?,
            Err(_) => LabelSpace::default(),
        };

        Ok(Self {
            model_path,
            port,
            uploads_dir,
            labels,
            target_size: TARGET_SIZE,
        })
    }
}

pub fn load_labels(path: &Path) -> Result<LabelSpace, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::LabelsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: LabelsFile =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::LabelsParse {
            path: path.to_path_buf(),
            source,
        })?;
    if parsed.labels.is_empty() {
        return Err(ConfigError::LabelsEmpty(path.to_path_buf()));
    }
    Ok(LabelSpace::new(parsed.labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_labels_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "labels:\n  - Calm\n  - Stressed").unwrap();

        let labels = load_labels(file.path()).unwrap();
        assert_eq!(labels.label_for(0), "Calm");
        assert_eq!(labels.label_for(1), "Stressed");
        assert_eq!(labels.label_for(2), "Class 2");
    }

    #[test]
    fn missing_labels_file_is_an_error() {
        let err = load_labels(Path::new("/nonexistent/labels.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::LabelsRead { .. }));
    }

    #[test]
    fn empty_label_list_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "labels: []").unwrap();

        let err = load_labels(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::LabelsEmpty(_)));
    }
}
