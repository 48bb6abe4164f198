//! End-to-end generation run.
//!
//! [`Pipeline::sync`] runs extract → parse → union with protocol commands →
//! render bash, zsh, fish → synchronize README sections. Completion scripts
//! are always rewritten; the README only when its content changes. The first
//! error aborts the run and earlier writes are kept.
//!
//! [`Pipeline::check`] computes the same outputs without writing and reports
//! which files are stale.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use helpsync_core::{Bindings, Flag, Template};
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::emit::{
    Dialect, FlagGroup, RenderContext, completion_commands, render_completion, render_order,
};
use crate::error::{Result, SyncError};
use crate::extract::extract_help_text;
use crate::parser::{CommandTableParser, ParseOutcome};
use crate::readme::replace_section;

/// Progress notification emitted by [`Pipeline::sync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    DetectedCommands(Vec<String>),
    /// Sent before the script is written, so a failing write names its target.
    UpdatingCompletion { dialect: Dialect, path: PathBuf },
    /// Sent before the README is rewritten.
    UpdatingReadme(PathBuf),
    ReadmeUpToDate(PathBuf),
    ReadmeMissing(PathBuf),
    Finished,
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::DetectedCommands(commands) => {
                write!(f, "Detected commands: {}", commands.join(" "))
            }
            SyncEvent::UpdatingCompletion { dialect, path } => write!(
                f,
                "Updating {} completions at: {}",
                dialect.label(),
                path.display()
            ),
            SyncEvent::UpdatingReadme(path) => {
                write!(f, "Updating README sections at: {}", path.display())
            }
            SyncEvent::ReadmeUpToDate(path) => {
                write!(f, "README at {} is up to date.", path.display())
            }
            SyncEvent::ReadmeMissing(path) => {
                write!(f, "README at {} not found, skipping.", path.display())
            }
            SyncEvent::Finished => f.write_str("Completions and Documentation updated."),
        }
    }
}

/// Parsed help text plus the final completion command list.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub outcome: ParseOutcome,
    pub commands: Vec<String>,
}

/// Content computed for one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

impl RenderedFile {
    /// Returns `true` when the file on disk already holds `content`.
    pub fn is_current(&self) -> bool {
        fs::read_to_string(&self.path).is_ok_and(|existing| existing == self.content)
    }
}

/// Summary of a completed [`Pipeline::sync`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub commands: Vec<String>,
    pub completions: Vec<PathBuf>,
    /// `Some(true)` when the README was rewritten, `Some(false)` when it was
    /// already current, `None` when it does not exist.
    pub readme_updated: Option<bool>,
}

/// Generation run rooted at a repository directory.
pub struct Pipeline {
    root: PathBuf,
    config: SyncConfig,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, config: SyncConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Reads the tool source and returns its embedded help text.
    ///
    /// # Errors
    ///
    /// [`SyncError::HelpTextNotFound`] when the assignment is missing.
    pub fn read_help_text(&self) -> Result<String> {
        let path = self.resolve(&self.config.source.path);
        let source = fs::read_to_string(&path)
            .map_err(|err| SyncError::io("failed to read source", &path, err))?;
        extract_help_text(&source, &self.config.source.variable)
            .map(String::from)
            .ok_or_else(|| SyncError::HelpTextNotFound {
                variable: self.config.source.variable.clone(),
                path,
            })
    }

    /// Extracts and parses the help text, then builds the command list.
    pub fn analyze(&self) -> Result<Analysis> {
        let help_text = self.read_help_text()?;
        let outcome = CommandTableParser::new(&self.config.parse).parse(&help_text);
        debug!(
            commands = outcome.table.len(),
            unresolved = outcome.diagnostics.unresolved_lines.len(),
            coverage = outcome.diagnostics.coverage(),
            "parsed help text"
        );
        let commands = completion_commands(
            &outcome.table,
            &self.config.protocol_commands,
            &self.config.parse,
        );
        Ok(Analysis { outcome, commands })
    }

    fn load_template(&self, template: &Path) -> Result<Template> {
        let path = self.config.template_path(&self.root, template);
        if !path.is_file() {
            return Err(SyncError::TemplateNotFound(path));
        }
        let text = fs::read_to_string(&path)
            .map_err(|err| SyncError::io("failed to read template", &path, err))?;
        Ok(Template::parse(&text))
    }

    fn render_context<'a>(&'a self, analysis: &'a Analysis) -> RenderContext<'a> {
        RenderContext {
            commands: &analysis.commands,
            table: &analysis.outcome.table,
            group: FlagGroup {
                command: &self.config.flag_group.command,
                description: &self.config.flag_group.description,
                program: &self.config.program,
            },
        }
    }

    /// Renders the completion script for `dialect`.
    ///
    /// # Errors
    ///
    /// [`SyncError::TemplateNotFound`] when the dialect's template is missing.
    pub fn render_completion(&self, analysis: &Analysis, dialect: Dialect) -> Result<RenderedFile> {
        let target = self.config.completions.target(dialect);
        let template = self.load_template(&target.template)?;
        let content = render_completion(
            dialect,
            &template,
            &self.render_context(analysis),
            &self.config.keys_for(dialect),
        );
        Ok(RenderedFile {
            path: self.resolve(&target.output),
            content,
        })
    }

    /// Values available to README section templates.
    fn readme_bindings(&self, analysis: &Analysis) -> Bindings {
        let flags = analysis
            .outcome
            .table
            .flags(&self.config.flag_group.command)
            .map(|set| {
                render_order(set)
                    .into_iter()
                    .map(Flag::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let mut bindings = Bindings::new();
        bindings
            .bind("commands", analysis.commands.join(" "))
            .bind("clean_flags", flags)
            .bind("program", self.config.program.as_str());
        bindings
    }

    /// Renders the README with every configured section replaced.
    ///
    /// Returns `None` when the README does not exist.
    pub fn render_readme(&self, analysis: &Analysis) -> Result<Option<RenderedFile>> {
        let path = self.resolve(&self.config.readme.path);
        if !path.exists() {
            return Ok(None);
        }
        let mut content = fs::read_to_string(&path)
            .map_err(|err| SyncError::io("failed to read README", &path, err))?;

        let bindings = self.readme_bindings(analysis);
        for section in &self.config.readme.sections {
            let replacement = self.load_template(&section.template)?.render(&bindings);
            content = replace_section(&content, &section.markers(), &replacement).into_owned();
        }

        Ok(Some(RenderedFile { path, content }))
    }

    /// Runs the full generation, reporting each step to `on_event`.
    pub fn sync(&self, mut on_event: impl FnMut(&SyncEvent)) -> Result<SyncReport> {
        let analysis = self.analyze()?;
        on_event(&SyncEvent::DetectedCommands(analysis.commands.clone()));

        let mut completions = Vec::new();
        for dialect in Dialect::ALL {
            let rendered = self.render_completion(&analysis, dialect)?;
            on_event(&SyncEvent::UpdatingCompletion {
                dialect,
                path: rendered.path.clone(),
            });
            write_file(&rendered)?;
            info!(%dialect, path = %rendered.path.display(), "wrote completions");
            completions.push(rendered.path);
        }

        let readme_updated = match self.render_readme(&analysis)? {
            Some(rendered) if rendered.is_current() => {
                on_event(&SyncEvent::ReadmeUpToDate(rendered.path));
                Some(false)
            }
            Some(rendered) => {
                on_event(&SyncEvent::UpdatingReadme(rendered.path.clone()));
                write_file(&rendered)?;
                info!(path = %rendered.path.display(), "updated README sections");
                Some(true)
            }
            None => {
                on_event(&SyncEvent::ReadmeMissing(self.resolve(&self.config.readme.path)));
                None
            }
        };

        on_event(&SyncEvent::Finished);
        Ok(SyncReport {
            commands: analysis.commands,
            completions,
            readme_updated,
        })
    }

    /// Returns the paths whose on-disk content differs from what
    /// [`sync`](Self::sync) would write. Nothing is written.
    pub fn check(&self) -> Result<Vec<PathBuf>> {
        let analysis = self.analyze()?;
        let mut stale = Vec::new();

        for dialect in Dialect::ALL {
            let rendered = self.render_completion(&analysis, dialect)?;
            if !rendered.is_current() {
                stale.push(rendered.path);
            }
        }
        if let Some(rendered) = self.render_readme(&analysis)? {
            if !rendered.is_current() {
                stale.push(rendered.path);
            }
        }

        Ok(stale)
    }
}

fn write_file(rendered: &RenderedFile) -> Result<()> {
    if let Some(parent) = rendered.path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| SyncError::io("failed to create directory", parent, err))?;
    }
    fs::write(&rendered.path, &rendered.content)
        .map_err(|err| SyncError::io("failed to write", &rendered.path, err))
}
