//! Project snapshot and collaborator contracts.
//!
//! The engine does not own a project model of its own; it works against a
//! snapshot a host front end exports: modules with their direct
//! dependencies and bundled SQL resources, plus source files with their
//! syntax trees. [`ProjectIndex`] implements the two capabilities the
//! engine injects at its seams:
//!
//! - [`SqlResolver`] - locate the text of a `.sql` resource referenced by
//!   a call site, searching `src/<source_set>/resources/<path>` in the
//!   owning module first, then in its direct dependencies;
//! - [`CallGraphIndex`] - find the call expressions across the project
//!   that invoke a given method, used by tenancy classification.

use std::collections::HashMap;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppResult, snapshot_parse_error},
    syntax::{NodeId, SyntaxTree}
};

/// Index of a file inside [`Project::files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A call expression in a specific file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiteRef {
    pub file: FileId,
    pub call: NodeId
}

/// One module of the analyzed project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name:      CompactString,
    /// Direct dependencies only; resolution does not chase transitive
    /// dependencies
    #[serde(default)]
    pub deps:      Vec<CompactString>,
    /// SQL resources keyed by source set (`main`, `test`), then by path
    /// relative to `src/<set>/resources/`
    #[serde(default)]
    pub resources: HashMap<CompactString, HashMap<String, String>>
}

/// One source file of the analyzed project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub module: CompactString,
    pub path:   String,
    pub tree:   SyntaxTree
}

impl SourceFile {
    /// A file counts as a test file when its path mentions `test`.
    pub fn is_test(&self) -> bool {
        self.path.contains("test")
    }
}

/// Serializable project snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub modules: Vec<ModuleDef>,
    #[serde(default)]
    pub files:   Vec<SourceFile>
}

impl Project {
    pub fn from_json(json: &str) -> AppResult<Self> {
        let project: Self =
            serde_json::from_str(json).map_err(|e| snapshot_parse_error(e.to_string()))?;
        project.validate()?;
        Ok(project)
    }

    fn validate(&self) -> AppResult<()> {
        for module in &self.modules {
            for dep in &module.deps {
                if !self.modules.iter().any(|m| &m.name == dep) {
                    return Err(snapshot_parse_error(format!(
                        "module '{}' depends on unknown module '{}'",
                        module.name, dep
                    )));
                }
            }
        }
        for file in &self.files {
            if !self.modules.iter().any(|m| m.name == file.module) {
                return Err(snapshot_parse_error(format!(
                    "file '{}' belongs to unknown module '{}'",
                    file.path, file.module
                )));
            }
            file.tree
                .validate()
                .map_err(|e| snapshot_parse_error(format!("file '{}': {}", file.path, e)))?;
        }
        Ok(())
    }
}

/// Resolves SQL resource text for a call site.
pub trait SqlResolver {
    /// Look up `src/<source_set>/resources/<path>` in the given module,
    /// then in each of its direct dependencies; `None` when the resource
    /// does not exist anywhere.
    fn resolve_sql(&self, module: &str, path: &str, source_set: &str) -> Option<&str>;
}

/// Project-wide caller lookup.
pub trait CallGraphIndex {
    /// Call expressions anywhere in the project that invoke a method of
    /// the given name.
    ///
    /// The snapshot carries no type resolution, so matching is by name
    /// only; this over-approximates the caller set the same way a textual
    /// reference search does.
    fn callers_of(&self, method_name: &str) -> Vec<SiteRef>;

    /// Syntax tree of a file returned by [`Self::callers_of`].
    fn tree_of(&self, file: FileId) -> &SyntaxTree;
}

/// Default in-memory implementation of both collaborator contracts.
#[derive(Debug)]
pub struct ProjectIndex {
    project:         Project,
    modules_by_name: HashMap<CompactString, usize>
}

impl ProjectIndex {
    pub fn new(project: Project) -> Self {
        let modules_by_name = project
            .modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        Self {
            project,
            modules_by_name
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.project.files
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.project.files[id.index()]
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.project.files.len() as u32).map(FileId)
    }

    fn module(&self, name: &str) -> Option<&ModuleDef> {
        self.modules_by_name
            .get(name)
            .map(|&i| &self.project.modules[i])
    }

    fn resource_in<'a>(
        &self,
        module: &'a ModuleDef,
        path: &str,
        source_set: &str
    ) -> Option<&'a str> {
        module
            .resources
            .get(source_set)
            .and_then(|set| set.get(path))
            .map(String::as_str)
    }
}

impl SqlResolver for ProjectIndex {
    fn resolve_sql(&self, module: &str, path: &str, source_set: &str) -> Option<&str> {
        let owner = self.module(module)?;
        if let Some(text) = self.resource_in(owner, path, source_set) {
            return Some(text);
        }
        owner
            .deps
            .iter()
            .filter_map(|dep| self.module(dep))
            .find_map(|dep| self.resource_in(dep, path, source_set))
    }
}

impl CallGraphIndex for ProjectIndex {
    fn callers_of(&self, method_name: &str) -> Vec<SiteRef> {
        let mut sites = Vec::new();
        for (i, file) in self.project.files.iter().enumerate() {
            for call in file.tree.calls() {
                if file.tree.method_name(call) == Some(method_name) {
                    sites.push(SiteRef {
                        file: FileId(i as u32),
                        call
                    });
                }
            }
        }
        sites
    }

    fn tree_of(&self, file: FileId) -> &SyntaxTree {
        &self.project.files[file.index()].tree
    }
}
