//! Intake configuration passed explicitly through the pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use audit_model::SectionName;
use serde::Deserialize;

use crate::catalog::ProgramCatalog;
use crate::error::StandardsError;
use crate::templates::SectionTemplate;
use crate::thresholds::Thresholds;

pub const DEFAULT_HELP_BASE_URL: &str = "https://www.fac.gov/documentation/validation/";

/// Workbook template version, `major.minor.patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl TemplateVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for TemplateVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for TemplateVersion {
    type Err = StandardsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StandardsError::InvalidConfig {
            message: format!("invalid template version '{s}'"),
        };
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u32, StandardsError> {
            match parts.next() {
                Some(part) => part.trim().parse::<u32>().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };
        let version = Self::new(next(true)?, next(true)?, next(false)?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

/// Everything the intake, cross-validation and agency stages consult.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub thresholds: Thresholds,
    /// Base URL for help links attached to cell errors.
    pub help_base_url: String,
    pub minimum_template_version: TemplateVersion,
    pub templates: BTreeMap<SectionName, SectionTemplate>,
    /// When present, ALNs are checked for membership.
    pub program_catalog: Option<ProgramCatalog>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            help_base_url: DEFAULT_HELP_BASE_URL.to_string(),
            minimum_template_version: TemplateVersion::new(1, 1, 0),
            templates: SectionName::ALL
                .into_iter()
                .map(|section| (section, SectionTemplate::builtin(section)))
                .collect(),
            program_catalog: None,
        }
    }
}

/// On-disk overrides. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    thresholds: Option<Thresholds>,
    #[serde(default)]
    help_base_url: Option<String>,
    #[serde(default)]
    minimum_template_version: Option<String>,
    /// Program catalog CSV, relative to the config file.
    #[serde(default)]
    program_catalog: Option<PathBuf>,
}

impl IntakeConfig {
    /// Defaults overlaid with a TOML file.
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&contents, base).map_err(|error| match error {
            StandardsError::Toml { source, .. } => StandardsError::Toml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse overrides; relative paths resolve against `base`.
    pub fn from_toml_str(contents: &str, base: &Path) -> Result<Self, StandardsError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| StandardsError::Toml {
            path: PathBuf::new(),
            source: e,
        })?;

        let mut config = Self::default();
        if let Some(thresholds) = file.thresholds {
            if !(0.0..=1.0).contains(&thresholds.direct_concentration) {
                return Err(StandardsError::InvalidConfig {
                    message: format!(
                        "direct_concentration must be within 0..=1, got {}",
                        thresholds.direct_concentration
                    ),
                });
            }
            config.thresholds = thresholds;
        }
        if let Some(url) = file.help_base_url {
            config.help_base_url = url;
        }
        if let Some(version) = file.minimum_template_version {
            config.minimum_template_version = version.parse()?;
        }
        if let Some(catalog) = file.program_catalog {
            config.program_catalog = Some(ProgramCatalog::load(&base.join(catalog))?);
        }
        Ok(config)
    }

    pub fn with_program_catalog(mut self, catalog: ProgramCatalog) -> Self {
        self.program_catalog = Some(catalog);
        self
    }

    /// Template for a section. Built-in templates cover every section.
    pub fn template(&self, section: SectionName) -> SectionTemplate {
        self.templates
            .get(&section)
            .cloned()
            .unwrap_or_else(|| SectionTemplate::builtin(section))
    }

    /// Help link for a rule anchor.
    pub fn help_link(&self, anchor: &str) -> String {
        format!("{}#{anchor}", self.help_base_url)
    }
}
