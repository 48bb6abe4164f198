//! Bundled default templates.
//!
//! These reproduce the `git-remote-gcrypt` completion scripts and README
//! sections and are written out by `helpsync init-templates`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::SyncConfig;
use crate::emit::Dialect;
use crate::error::{Result, SyncError};

pub const BASH_TEMPLATE: &str = include_str!("../templates/bash.in");
pub const ZSH_TEMPLATE: &str = include_str!("../templates/zsh.in");
pub const FISH_TEMPLATE: &str = include_str!("../templates/fish.in");
pub const README_DETECT_TEMPLATE: &str = include_str!("../templates/readme-detect.rst.in");
pub const README_CLEAN_TEMPLATE: &str = include_str!("../templates/readme-clean.rst.in");

/// Bundled template text for `dialect`.
pub fn completion_template(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Bash => BASH_TEMPLATE,
        Dialect::Zsh => ZSH_TEMPLATE,
        Dialect::Fish => FISH_TEMPLATE,
    }
}

/// Outcome of writing one bundled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInstall {
    pub path: PathBuf,
    /// `false` when an existing file was kept.
    pub written: bool,
}

/// Writes the bundled templates to the paths named by `config`.
///
/// Existing files are kept unless `force` is set. README section templates
/// are only written for the two bundled sections, matched by position.
pub fn install_default_templates(
    root: &Path,
    config: &SyncConfig,
    force: bool,
) -> Result<Vec<TemplateInstall>> {
    let mut entries: Vec<(PathBuf, &str)> = Dialect::ALL
        .iter()
        .map(|&dialect| {
            let target = config.completions.target(dialect);
            (
                config.template_path(root, &target.template),
                completion_template(dialect),
            )
        })
        .collect();

    let section_texts = [README_DETECT_TEMPLATE, README_CLEAN_TEMPLATE];
    for (section, text) in config.readme.sections.iter().zip(section_texts) {
        entries.push((config.template_path(root, &section.template), text));
    }

    let mut installs = Vec::new();
    for (path, text) in entries {
        if path.exists() && !force {
            installs.push(TemplateInstall {
                path,
                written: false,
            });
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| SyncError::io("failed to create directory", parent, err))?;
        }
        fs::write(&path, text).map_err(|err| SyncError::io("failed to write", &path, err))?;
        info!(path = %path.display(), "installed default template");
        installs.push(TemplateInstall {
            path,
            written: true,
        });
    }

    Ok(installs)
}
