//! Config, projects and history loaded once per invocation.

use anyhow::Context;
use geolens_core::{load_projects, AppConfig, ProjectConfig, ProjectsFile};
use geolens_store::HistoryFile;
use serde::Serialize;
use uuid::Uuid;

pub(crate) struct Workspace {
    projects: ProjectsFile,
    history: HistoryFile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectSummary {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub brand: String,
    pub competitors: Vec<String>,
    pub tracked_queries: Vec<String>,
}

impl Workspace {
    pub(crate) fn load(config: &AppConfig) -> anyhow::Result<Self> {
        let projects = load_projects(&config.projects_path).with_context(|| {
            format!(
                "failed to load projects from {}",
                config.projects_path.display()
            )
        })?;
        let history = HistoryFile::open(&config.history_path).with_context(|| {
            format!(
                "failed to open history at {}",
                config.history_path.display()
            )
        })?;
        tracing::debug!(
            projects = projects.projects.len(),
            history = %history.path().display(),
            "workspace loaded"
        );
        Ok(Self { projects, history })
    }

    /// Resolve a project by slug or id and sync its tracked queries into the
    /// history.
    pub(crate) fn project(&mut self, key: &str) -> anyhow::Result<ProjectConfig> {
        let project = self
            .projects
            .find(key)
            .cloned()
            .with_context(|| format!("unknown project '{key}'"))?;
        self.history
            .register_project(project.id, project.tracked_queries.clone());
        Ok(project)
    }

    pub(crate) fn history(&self) -> &HistoryFile {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryFile {
        &mut self.history
    }

    pub(crate) fn save(&self) -> anyhow::Result<()> {
        self.history.save().context("failed to save history")
    }

    pub(crate) fn project_list(&self) -> Vec<ProjectSummary> {
        self.projects
            .projects
            .iter()
            .map(|p| ProjectSummary {
                id: p.id,
                slug: p.slug(),
                name: p.name.clone(),
                brand: p.brand.clone(),
                competitors: p.competitors.clone(),
                tracked_queries: p.tracked_queries.clone(),
            })
            .collect()
    }
}
