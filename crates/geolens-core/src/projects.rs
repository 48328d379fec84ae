use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::brand_key;
use crate::ConfigError;

/// A monitored brand together with the competitors and queries it is tracked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub competitors: Vec<String>,
    /// Seed keywords for query suggestions when a project has no history yet.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tracked_queries: Vec<String>,
}

impl ProjectConfig {
    /// Generate a URL-safe slug from the project name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// The brand followed by every competitor, in configured order.
    #[must_use]
    pub fn known_brands(&self) -> Vec<&str> {
        std::iter::once(self.brand.as_str())
            .chain(self.competitors.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsFile {
    pub projects: Vec<ProjectConfig>,
}

impl ProjectsFile {
    /// Look a project up by slug or by id.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&ProjectConfig> {
        let key = key.trim();
        self.projects
            .iter()
            .find(|p| p.slug() == key || p.id.to_string() == key)
    }
}

/// Load and validate the projects configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_projects(path: &Path) -> Result<ProjectsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProjectsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_projects(&content)
}

/// Parse and validate projects YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_projects(content: &str) -> Result<ProjectsFile, ConfigError> {
    let projects_file: ProjectsFile = serde_yaml::from_str(content)?;
    validate_projects(&projects_file)?;
    Ok(projects_file)
}

fn validate_projects(projects_file: &ProjectsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for project in &projects_file.projects {
        if project.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "project name must be non-empty".to_string(),
            ));
        }

        if project.brand.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "project '{}' has an empty brand",
                project.name
            )));
        }

        if !seen_ids.insert(project.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate project id: '{}'",
                project.id
            )));
        }

        let slug = project.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate project slug: '{}' (from project '{}')",
                slug, project.name
            )));
        }

        let mut seen_brands = HashSet::new();
        for name in project.known_brands() {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "project '{}' has an empty competitor name",
                    project.name
                )));
            }
            if !seen_brands.insert(brand_key(name)) {
                return Err(ConfigError::Validation(format!(
                    "project '{}' lists '{}' more than once across brand and competitors",
                    project.name, name
                )));
            }
        }

        if project.tracked_queries.iter().any(|q| q.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "project '{}' has a blank tracked query",
                project.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
