//! Serializable description of a command tree.
//!
//! Mirrors the declared tree (not the parse state) so it can be exported as
//! JSON, e.g. for documentation generators.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::help::HELP_OPTION;
use crate::opt::{Opt, OptionKind, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub env: String,
    pub kind: OptionKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CommandMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandMetadata>,
}

impl From<&Opt> for OptionMetadata {
    fn from(opt: &Opt) -> Self {
        Self {
            name: opt.name().to_string(),
            short: opt.short().to_string(),
            env: opt.environment().to_string(),
            kind: opt.kind(),
            description: opt.description().to_string(),
            default: opt.try_default(),
            required: !opt.has_default() && opt.environment().is_empty(),
        }
    }
}

impl From<&Command> for CommandMetadata {
    fn from(cmd: &Command) -> Self {
        Self {
            name: cmd.get_name().to_string(),
            description: cmd.get_description().to_string(),
            options: cmd
                .get_options()
                .iter()
                .filter(|o| o.name() != HELP_OPTION)
                .map(OptionMetadata::from)
                .collect(),
            subcommands: cmd
                .get_subcommands()
                .iter()
                .map(CommandMetadata::from)
                .collect(),
        }
    }
}

impl CommandMetadata {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Command {
    pub fn metadata(&self) -> CommandMetadata {
        CommandMetadata::from(self)
    }
}
