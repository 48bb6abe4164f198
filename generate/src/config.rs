//! Generation configuration.
//!
//! Every field has a default reproducing the `git-remote-gcrypt` layout, so
//! a config file only needs the values it overrides. Relative paths are
//! resolved against the repository root passed to the pipeline.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! source:
//!   path: git-remote-gcrypt
//!   variable: HELP_TEXT
//! parse:
//!   start_headers: ["Options:"]
//!   end_headers: ["Environment Variables:", "Git Protocol Commands"]
//!   excluded_commands: [help, version]
//! protocol_commands: [capabilities, fetch, list, push]
//! program: git-remote-gcrypt
//! flag_group:
//!   command: clean
//!   description: actually delete files
//! templates_dir: completions/templates
//! readme:
//!   path: README.rst
//!   sections:
//!     - heading: Detecting gcrypt repos
//!       end: { through: "Exit status is 0" }
//!       template: readme-detect.rst.in
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use helpsync_core::{PROTOCOL_COMMANDS, ParsePolicy};
use serde::{Deserialize, Serialize};

use crate::emit::{Dialect, PlaceholderKeys};
use crate::error::{Result, SyncError};
use crate::extract::DEFAULT_HELP_VARIABLE;
use crate::readme::{SectionEnd, SectionMarkers};

/// Where the help text lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Tool source file containing the help text assignment.
    pub path: PathBuf,
    /// Name of the variable assigned the help text.
    pub variable: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("git-remote-gcrypt"),
            variable: DEFAULT_HELP_VARIABLE.to_string(),
        }
    }
}

/// The command whose flags get a dialect-specific block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagGroupConfig {
    pub command: String,
    pub description: String,
}

impl Default for FlagGroupConfig {
    fn default() -> Self {
        Self {
            command: "clean".to_string(),
            description: "actually delete files".to_string(),
        }
    }
}

/// One completion target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTarget {
    /// Template file name, relative to `templates_dir`.
    pub template: PathBuf,
    /// Output script path.
    pub output: PathBuf,
    /// Placeholder keys used by the template.
    #[serde(default)]
    pub keys: Option<PlaceholderKeys>,
}

impl CompletionTarget {
    fn default_for(dialect: Dialect) -> Self {
        let (template, output) = match dialect {
            Dialect::Bash => ("bash.in", "completions/bash/git-remote-gcrypt"),
            Dialect::Zsh => ("zsh.in", "completions/zsh/_git-remote-gcrypt"),
            Dialect::Fish => ("fish.in", "completions/fish/git-remote-gcrypt.fish"),
        };
        Self {
            template: PathBuf::from(template),
            output: PathBuf::from(output),
            keys: None,
        }
    }
}

/// Completion targets for all three dialects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionsConfig {
    pub bash: CompletionTarget,
    pub zsh: CompletionTarget,
    pub fish: CompletionTarget,
}

impl Default for CompletionsConfig {
    fn default() -> Self {
        Self {
            bash: CompletionTarget::default_for(Dialect::Bash),
            zsh: CompletionTarget::default_for(Dialect::Zsh),
            fish: CompletionTarget::default_for(Dialect::Fish),
        }
    }
}

impl CompletionsConfig {
    pub fn target(&self, dialect: Dialect) -> &CompletionTarget {
        match dialect {
            Dialect::Bash => &self.bash,
            Dialect::Zsh => &self.zsh,
            Dialect::Fish => &self.fish,
        }
    }
}

/// One generated README section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub heading: String,
    #[serde(default = "default_underline")]
    pub underline: Option<char>,
    pub end: SectionEnd,
    /// Template file name, relative to `templates_dir`.
    pub template: PathBuf,
}

fn default_underline() -> Option<char> {
    Some('=')
}

impl SectionConfig {
    pub fn markers(&self) -> SectionMarkers {
        SectionMarkers {
            heading: self.heading.clone(),
            underline: self.underline,
            end: self.end.clone(),
        }
    }
}

/// README synchronization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadmeConfig {
    pub path: PathBuf,
    pub sections: Vec<SectionConfig>,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("README.rst"),
            sections: vec![
                SectionConfig {
                    heading: "Detecting gcrypt repos".to_string(),
                    underline: Some('='),
                    end: SectionEnd::Through("Exit status is 0".to_string()),
                    template: PathBuf::from("readme-detect.rst.in"),
                },
                SectionConfig {
                    heading: "Cleaning gcrypt repos".to_string(),
                    underline: Some('='),
                    end: SectionEnd::Before("\nKnown issues".to_string()),
                    template: PathBuf::from("readme-clean.rst.in"),
                },
            ],
        }
    }
}

/// Top-level generation configuration.
///
/// # Examples
///
/// ```
/// use helpsync_generate::config::SyncConfig;
///
/// let config: SyncConfig = serde_yaml::from_str("program: my-tool\n").unwrap();
/// assert_eq!(config.program, "my-tool");
/// assert_eq!(config.protocol_commands.len(), 4);
/// assert!(config.parse.is_excluded("help"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    pub source: SourceConfig,
    pub parse: ParsePolicy,
    /// Commands always offered regardless of what the parser finds.
    pub protocol_commands: Vec<String>,
    /// Program name completions are registered for.
    pub program: String,
    pub flag_group: FlagGroupConfig,
    /// Directory holding every template file.
    pub templates_dir: PathBuf,
    pub completions: CompletionsConfig,
    pub readme: ReadmeConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            source: SourceConfig::default(),
            parse: ParsePolicy::default(),
            protocol_commands: PROTOCOL_COMMANDS.iter().map(|c| c.to_string()).collect(),
            program: "git-remote-gcrypt".to_string(),
            flag_group: FlagGroupConfig::default(),
            templates_dir: PathBuf::from("completions/templates"),
            completions: CompletionsConfig::default(),
            readme: ReadmeConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the file cannot be read, or
    /// [`SyncError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|err| SyncError::io("failed to open config", path, err))?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|err| SyncError::io("failed to create config", path, err))?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Placeholder keys for `dialect`, falling back to the bundled
    /// template's keys.
    pub fn keys_for(&self, dialect: Dialect) -> PlaceholderKeys {
        self.completions
            .target(dialect)
            .keys
            .clone()
            .unwrap_or_else(|| PlaceholderKeys::defaults_for(dialect))
    }

    pub fn template_path(&self, root: &Path, template: &Path) -> PathBuf {
        root.join(&self.templates_dir).join(template)
    }
}
