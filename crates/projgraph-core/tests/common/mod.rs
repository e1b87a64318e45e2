//! Common test utilities for integration tests.
//!
//! [`FixtureLoader`] serves in-memory projects and counts how often each
//! path is loaded, so tests can assert on cache behavior.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use projgraph_core::{ManifestError, ModelLoader, Product, Project, Target, TargetReference};

/// In-memory [`ModelLoader`] with per-path load counters.
#[derive(Debug, Default)]
pub struct FixtureLoader {
    projects: HashMap<PathBuf, Project>,
    loads: RefCell<HashMap<PathBuf, usize>>,
}

impl FixtureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.path.clone(), project);
        self
    }

    /// How often `path` was requested
    pub fn load_count(&self, path: impl AsRef<Path>) -> usize {
        self.loads
            .borrow()
            .get(path.as_ref())
            .copied()
            .unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.borrow().values().sum()
    }
}

impl ModelLoader for FixtureLoader {
    fn load_project(&self, path: &Path) -> Result<Project, ManifestError> {
        *self
            .loads
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;

        self.projects
            .get(path)
            .cloned()
            .ok_or_else(|| ManifestError::NotFound(path.join("Project.toml")))
    }
}

/// Target with local dependencies
pub fn target(name: &str, product: Product, deps: &[&str]) -> Target {
    Target::new(name, product).with_dependencies(
        deps.iter()
            .map(|d| TargetReference::local(*d))
            .collect(),
    )
}

pub fn app(name: &str, deps: &[&str]) -> Target {
    target(name, Product::App, deps)
}

pub fn framework(name: &str, deps: &[&str]) -> Target {
    target(name, Product::Framework, deps)
}

pub fn unit_tests(name: &str, deps: &[&str]) -> Target {
    target(name, Product::UnitTests, deps)
}

pub fn project(path: &str, name: &str, targets: Vec<Target>) -> Project {
    Project::new(path, name).with_targets(targets)
}

/// Write `content` as the `Project.toml` of `dir`, creating it
pub fn write_manifest(dir: &Path, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("Project.toml"), content).unwrap();
}
