//! Import configuration (`.scmport/config.yaml`)
//!
//! Controls how discovered projects are scanned, named and imported.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::load_config_file;
use crate::config::manifest::DEFAULT_MANIFEST;
use crate::domain::ProjectModel;
use crate::error::{Result, ScmError};

/// Import configuration file name inside the workspace directory
pub const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_NAME_TEMPLATE: &str = "[name]";
const DEFAULT_ALTERNATE_MARKER: &str = "**/.project";

/// Settings shared by the checkout, scan and import steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfiguration {
    /// Template used to derive workspace project names from models
    pub name_template: String,

    /// Import modules as part of their parent project instead of separately
    pub include_modules: bool,

    /// Walk whole checkouts instead of following declared modules only
    pub recursive: bool,

    /// Manifest file name to look for
    pub manifest: String,

    /// Glob patterns identifying project configuration of another kind
    pub alternate_markers: Vec<String>,
}

impl Default for ImportConfiguration {
    fn default() -> Self {
        Self {
            name_template: DEFAULT_NAME_TEMPLATE.to_string(),
            include_modules: false,
            recursive: true,
            manifest: DEFAULT_MANIFEST.to_string(),
            alternate_markers: vec![DEFAULT_ALTERNATE_MARKER.to_string()],
        }
    }
}

impl ImportConfiguration {
    /// Load configuration from a workspace directory, falling back to defaults
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config: Self = load_config_file(config_dir, CONFIG_FILE, Self::default(), |content| {
            serde_yaml::from_str(content)
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that the name template only uses known tokens
    pub fn validate(&self) -> Result<()> {
        render_template(&self.name_template, &ProjectModel::new("x")).map(|_| ())
    }

    /// Derive the workspace project name for a model
    pub fn project_name(&self, model: &ProjectModel) -> Result<String> {
        let name = render_template(&self.name_template, model)?;
        if name.trim().is_empty() {
            return Err(ScmError::NameTemplateInvalid {
                template: self.name_template.clone(),
                reason: format!("template yields an empty name for '{}'", model.name),
            });
        }
        Ok(name)
    }
}

fn render_template(template: &str, model: &ProjectModel) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('[') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find(']') else {
            return Err(ScmError::NameTemplateInvalid {
                template: template.to_string(),
                reason: "unterminated '[' token".to_string(),
            });
        };

        let value = match &after[..end] {
            "group" => model.group.as_deref().unwrap_or_default(),
            "name" => model.name.as_str(),
            "version" => model.version.as_deref().unwrap_or_default(),
            token => {
                return Err(ScmError::NameTemplateInvalid {
                    template: template.to_string(),
                    reason: format!("unknown token '[{token}]'"),
                });
            }
        };
        rendered.push_str(value);
        rest = &after[end + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}
