//! Configuration structures for document profiles and batch runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigurationError, Result, ScavengerError};
use crate::extract::{normalize_label, FieldExtractor, LabelCatalog, SplitRule};

/// Main configuration for scavenger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScavengerConfig {
    /// Root directory holding the source documents.
    pub source_root: PathBuf,

    /// Directory that batch output files are written to.
    pub output_dir: PathBuf,

    /// Known document types.
    pub profiles: Vec<DocumentProfile>,
}

impl Default for ScavengerConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("database/source"),
            output_dir: PathBuf::from("database/output"),
            profiles: vec![DocumentProfile::client()],
        }
    }
}

/// Which files a batch run picks up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Substrings that must all occur in the file name.
    pub includes: Vec<String>,

    /// Substrings that exclude a file when any occurs in its name.
    pub excludes: Vec<String>,

    /// Skip files last modified before this year.
    pub oldest_year: Option<i32>,

    /// Accepted file extensions, without the dot.
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            oldest_year: None,
            extensions: vec!["xlsx".to_string()],
        }
    }
}

/// Everything needed to extract one document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentProfile {
    /// Profile name, used on the command line.
    pub name: String,

    /// Directory below `source_root` holding this document type.
    pub source_subdir: PathBuf,

    /// Groups of interchangeable labels; the first entry names the field.
    pub label_groups: Vec<Vec<String>>,

    /// Preferred sheet names, checked in workbook order.
    pub sheet_candidates: Vec<String>,

    /// Column-1 marker that introduces the relevant rows.
    pub boundary_condition: Option<String>,

    /// File selection for batch runs.
    pub scan: ScanConfig,

    /// Post-processing of combined fields.
    pub split_fields: Vec<SplitRule>,

    /// Output file name for batch runs.
    pub output_file: String,
}

impl Default for DocumentProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            source_subdir: PathBuf::new(),
            label_groups: Vec::new(),
            sheet_candidates: Vec::new(),
            boundary_condition: None,
            scan: ScanConfig::default(),
            split_fields: Vec::new(),
            output_file: "output.csv".to_string(),
        }
    }
}

impl DocumentProfile {
    /// Client records: business registration details from contract forms.
    pub fn client() -> Self {
        let labels = [
            "사업체명",
            "대표자",
            "사업자번호",
            "업태/종목",
            "세금계산서이메일",
            "주소",
            "전화번호",
            "담당자/연락처",
        ];

        Self {
            name: "client".to_string(),
            source_subdir: PathBuf::from("CLIENT"),
            label_groups: labels.iter().map(|label| vec![label.to_string()]).collect(),
            sheet_candidates: vec!["새 계약서 폼".to_string()],
            boundary_condition: Some("\"갑\"".to_string()),
            scan: ScanConfig {
                excludes: ["견적서", "급여", "Fin 합", "Payment Summary"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                oldest_year: Some(2020),
                ..ScanConfig::default()
            },
            split_fields: vec![SplitRule::new("담당자/연락처", "/", &["담당자", "연락처"])],
            output_file: "client.csv".to_string(),
        }
    }

    /// Validated label catalog for this profile.
    pub fn catalog(&self) -> std::result::Result<LabelCatalog, ConfigurationError> {
        LabelCatalog::new(&self.label_groups)
    }

    /// Extractor configured with this profile's catalog and boundary.
    pub fn extractor(&self) -> std::result::Result<FieldExtractor, ConfigurationError> {
        Ok(FieldExtractor::new(self.catalog()?).with_boundary(self.boundary_condition.clone()))
    }

    /// Fixed output column order: every canonical label, then split targets.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .label_groups
            .iter()
            .filter_map(|group| group.first())
            .map(|label| normalize_label(label))
            .collect();
        for rule in &self.split_fields {
            for column in &rule.into {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        columns
    }

    /// Directory holding this profile's documents under `root`.
    pub fn source_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.source_subdir)
    }
}

impl ScavengerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ScavengerError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ScavengerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Option<&DocumentProfile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_profile_is_valid() {
        let profile = DocumentProfile::client();
        let catalog = profile.catalog().unwrap();

        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.classify("사업자 번호"), Some("사업자번호"));
        assert_eq!(profile.boundary_condition.as_deref(), Some("\"갑\""));
        assert_eq!(profile.scan.oldest_year, Some(2020));
    }

    #[test]
    fn test_client_output_columns() {
        let columns = DocumentProfile::client().output_columns();

        assert_eq!(columns.len(), 10);
        assert_eq!(columns.first().map(String::as_str), Some("사업체명"));
        assert_eq!(&columns[8..], &["담당자".to_string(), "연락처".to_string()]);
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ScavengerConfig::default();
        config.source_root = PathBuf::from("/srv/documents");
        config.save(&path).unwrap();

        let loaded = ScavengerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.source_root, PathBuf::from("/srv/documents"));
        assert_eq!(loaded.profile("client"), Some(&DocumentProfile::client()));
        assert!(loaded.profile("quote").is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{
            "profiles": [
                { "name": "vendor", "label_groups": [["Vendor", "Supplier"], ["Tax ID"]] }
            ]
        }"#;

        let config: ScavengerConfig = serde_json::from_str(json).unwrap();
        let profile = config.profile("vendor").unwrap();

        assert_eq!(config.output_dir, PathBuf::from("database/output"));
        assert_eq!(profile.scan.extensions, vec!["xlsx".to_string()]);
        assert_eq!(profile.output_columns(), vec!["Vendor".to_string(), "TaxID".to_string()]);
        assert!(profile.extractor().is_ok());
    }

    #[test]
    fn test_malformed_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ScavengerConfig::from_file(&path),
            Err(ScavengerError::Config(_))
        ));
    }
}
