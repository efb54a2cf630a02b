use std::fmt;

use thiserror::Error;

use crate::opt::OptionKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Where a rejected option value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A command-line token, e.g. `--port` or `-p`.
    Flag(String),
    /// An environment variable key.
    Env(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "option {flag}"),
            Self::Env(key) => write!(f, "environment variable {key}"),
        }
    }
}

/// Conversion failure of a raw option value.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error(transparent)]
    Int(#[from] std::num::ParseIntError),
    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),
    #[error(transparent)]
    Bool(#[from] std::str::ParseBoolError),
}

/// Errors raised while validating, resolving, parsing or dispatching a command tree.
#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate option name {name:?} in command {command:?}")]
    DuplicateOptionName { command: String, name: String },

    #[error("duplicate sub command {name:?} in command {command:?}")]
    DuplicateSubCommand { command: String, name: String },

    #[error("missing value for option {flag}")]
    MissingOptionValue { flag: String },

    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("option {name:?} is a {actual} option, not {expected}")]
    InvalidOptionType {
        name: String,
        expected: OptionKind,
        actual: OptionKind,
    },

    #[error("option {flag} is required")]
    OptionRequired { flag: String },

    #[error("command {0:?} has no function set")]
    CommandFuncNotSet(String),

    /// Help was requested; carries the rendered text.
    ///
    /// This is a control-flow signal rather than a failure.
    #[error("{0}")]
    Help(String),

    #[error("invalid value {value:?} for {origin}: {source}")]
    InvalidValue {
        origin: Origin,
        value: String,
        #[source]
        source: ValueError,
    },

    #[error("{command}: {source}")]
    Command {
        command: String,
        #[source]
        source: Box<Error>,
    },

    #[error("command {command:?} failed: {source}")]
    Execution {
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Discriminant of [`Error`] with command context stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateOptionName,
    DuplicateSubCommand,
    MissingOptionValue,
    UnknownOption,
    InvalidOptionType,
    OptionRequired,
    CommandFuncNotSet,
    Help,
    InvalidValue,
    Execution,
}

impl Error {
    pub(crate) fn in_command(command: &str, source: Error) -> Self {
        Self::Command {
            command: command.to_string(),
            source: Box::new(source),
        }
    }

    /// The innermost error beneath any command context.
    pub fn root_cause(&self) -> &Error {
        let mut err = self;
        while let Self::Command { source, .. } = err {
            err = source;
        }
        err
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            Self::DuplicateOptionName { .. } => ErrorKind::DuplicateOptionName,
            Self::DuplicateSubCommand { .. } => ErrorKind::DuplicateSubCommand,
            Self::MissingOptionValue { .. } => ErrorKind::MissingOptionValue,
            Self::UnknownOption(_) => ErrorKind::UnknownOption,
            Self::InvalidOptionType { .. } => ErrorKind::InvalidOptionType,
            Self::OptionRequired { .. } => ErrorKind::OptionRequired,
            Self::CommandFuncNotSet(_) => ErrorKind::CommandFuncNotSet,
            Self::Help(_) => ErrorKind::Help,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
            Self::Execution { .. } => ErrorKind::Execution,
            Self::Command { .. } => unreachable!("root_cause strips command context"),
        }
    }

    /// Whether this is the help signal, which callers treat as a clean exit.
    pub fn is_help(&self) -> bool {
        matches!(self.root_cause(), Self::Help(_))
    }

    /// Rendered help text when this is the help signal.
    pub fn help_text(&self) -> Option<&str> {
        match self.root_cause() {
            Self::Help(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_sees_through_command_context() {
        let err = Error::in_command(
            "main-cli",
            Error::in_command("sub", Error::UnknownOption("--nope".to_string())),
        );
        assert_eq!(err.kind(), ErrorKind::UnknownOption);
        assert_eq!(err.to_string(), "main-cli: sub: unknown option --nope");
    }

    #[test]
    fn invalid_value_names_origin() {
        let source: ValueError = "abc".parse::<i64>().unwrap_err().into();
        let err = Error::InvalidValue {
            origin: Origin::Env("PORT".to_string()),
            value: "abc".to_string(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("environment variable PORT"), "{msg}");
        assert!(msg.contains("\"abc\""), "{msg}");
    }

    #[test]
    fn help_is_not_a_failure_kind() {
        let err = Error::Help("Usage: x\n".to_string());
        assert!(err.is_help());
        assert_eq!(err.help_text(), Some("Usage: x\n"));
        assert!(!Error::UnknownOption("-x".to_string()).is_help());
    }
}
