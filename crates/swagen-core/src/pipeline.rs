use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::GeneratedFile;
use crate::assemble::{HeaderInfo, assemble, assemble_interfaces, assemble_typedefs};
use crate::compile::{Fragment, compile_operation};
use crate::config::{Config, INTERFACE_PATH, Lang, TYPEDEF_PATH};
use crate::error::GenerateError;
use crate::parse::spec::SwaggerSpec;
use crate::transform::{GroupedOperations, group_by_tag, normalize};

/// Where a [`Pipeline`] run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Normalizing,
    Grouping,
    Selecting,
    Compiling,
    Assembling,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Normalizing => "normalizing",
            PipelineState::Grouping => "grouping",
            PipelineState::Selecting => "selecting",
            PipelineState::Compiling => "compiling",
            PipelineState::Assembling => "assembling",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Hook that narrows or reorders the grouped operations before compiling.
/// The returned map replaces the input as-is.
pub trait OperationSelector {
    fn select(&self, groups: GroupedOperations) -> GroupedOperations;
}

impl<F> OperationSelector for F
where
    F: Fn(GroupedOperations) -> GroupedOperations,
{
    fn select(&self, groups: GroupedOperations) -> GroupedOperations {
        self(groups)
    }
}

/// Drives one document through normalize, group, select, compile and assemble.
pub struct Pipeline<'a> {
    config: &'a Config,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("pipeline: {} -> {next}", self.state);
        self.state = next;
    }

    /// Produce every output file in memory. Nothing touches the disk, so a
    /// failure leaves no partial output behind.
    pub fn run(
        &mut self,
        spec: &SwaggerSpec,
        selector: Option<&dyn OperationSelector>,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        let result = self.run_stages(spec, selector);
        match &result {
            Ok(_) => self.transition(PipelineState::Done),
            Err(_) => self.transition(PipelineState::Failed),
        }
        result
    }

    fn run_stages(
        &mut self,
        spec: &SwaggerSpec,
        selector: Option<&dyn OperationSelector>,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        self.transition(PipelineState::Normalizing);
        let spec = normalize(spec)?;
        let date = self
            .config
            .timestamp
            .then(|| chrono::Local::now().format("%Y-%m-%d %H:%M").to_string());

        let mut files = Vec::new();

        if !self.config.type_only {
            self.transition(PipelineState::Grouping);
            let mut groups = group_by_tag(&spec);

            if let Some(selector) = selector {
                self.transition(PipelineState::Selecting);
                groups = selector.select(groups);
            }

            // Shared declarations live in their own file, never inline.
            let compile_config = Config {
                interface: false,
                typedef: false,
                recursive: false,
                ..self.config.clone()
            };

            self.transition(PipelineState::Compiling);
            let mut compiled = Vec::with_capacity(groups.len());
            for (tag, ops) in &groups {
                let fragments = ops
                    .iter()
                    .map(|op| compile_operation(&compile_config, &spec, &op.url, op.method))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| GenerateError::Compile {
                        tag: tag.clone(),
                        source,
                    })?;
                debug!("compiled {} operations for `{tag}`", fragments.len());
                compiled.push((tag, unique_names(tag, fragments)));
            }

            self.transition(PipelineState::Assembling);
            for (tag, fragments) in compiled {
                let header = HeaderInfo::from_spec(&spec, Some(tag), date.clone());
                files.push(GeneratedFile {
                    path: self.config.module_path(tag),
                    content: assemble(tag, &fragments, self.config, &header)?,
                });
            }
        } else {
            self.transition(PipelineState::Assembling);
        }

        let header = HeaderInfo::from_spec(&spec, None, date);
        files.push(match self.config.lang {
            Lang::Ts => GeneratedFile {
                path: INTERFACE_PATH.to_string(),
                content: assemble_interfaces(&spec, &header)?,
            },
            Lang::Js => GeneratedFile {
                path: TYPEDEF_PATH.to_string(),
                content: assemble_typedefs(&spec, &header)?,
            },
        });

        Ok(files)
    }
}

/// Keep export names distinct within one module. Urls such as `/pets` and
/// `/pets/` map to the same function name; the later one gets the first free
/// numeric suffix.
fn unique_names(tag: &str, fragments: Vec<Fragment>) -> Vec<Fragment> {
    let taken: HashSet<String> = fragments.iter().map(|f| f.name.clone()).collect();
    let mut used = HashSet::new();
    fragments
        .into_iter()
        .map(|fragment| {
            if used.insert(fragment.name.clone()) {
                return fragment;
            }
            let name = (2..)
                .map(|n| format!("{}{n}", fragment.name))
                .find(|candidate| !taken.contains(candidate) && !used.contains(candidate))
                .unwrap_or_default();
            warn!("`{tag}`: {} is already exported, renaming to {name}", fragment.name);
            used.insert(name.clone());
            fragment.renamed(&name)
        })
        .collect()
}

/// Write files under `root`, creating directories as needed.
pub fn write_files(root: &Path, files: &[GeneratedFile]) -> Result<(), GenerateError> {
    for file in files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &file.content).map_err(|source| GenerateError::Io {
            path: path.clone(),
            source,
        })?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

/// Run the pipeline and write its output under `config.root`.
pub fn generate(
    config: &Config,
    spec: &SwaggerSpec,
    selector: Option<&dyn OperationSelector>,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    let files = Pipeline::new(config).run(spec, selector)?;
    write_files(Path::new(&config.root), &files)?;
    Ok(files)
}
