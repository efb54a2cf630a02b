use std::collections::HashSet;

use crate::command::Command;
use crate::error::{Error, Result};

impl Command {
    /// Structural checks run before any value is resolved.
    pub(crate) fn validate_structure(&self) -> Result<()> {
        self.check_subcommands(&self.name)?;
        self.check_options(&self.name, &HashSet::new())
    }

    fn check_subcommands(&self, path: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for sub in &self.subcommands {
            if !sub.name.is_empty() && !seen.insert(sub.name.as_str()) {
                return Err(Error::DuplicateSubCommand {
                    command: path.to_string(),
                    name: sub.name.clone(),
                });
            }
        }
        for sub in &self.subcommands {
            sub.check_subcommands(&format!("{path} {}", sub.name))?;
        }
        Ok(())
    }

    /// Names and shorts are unique per command; environment keys are unique
    /// along the whole path from the root.
    fn check_options<'a>(&'a self, path: &str, inherited_env: &HashSet<&'a str>) -> Result<()> {
        let mut names = HashSet::new();
        let mut shorts = HashSet::new();
        let mut envs = inherited_env.clone();

        for opt in &self.options {
            for (key, seen) in [
                (opt.name(), &mut names),
                (opt.short(), &mut shorts),
                (opt.environment(), &mut envs),
            ] {
                if !key.is_empty() && !seen.insert(key) {
                    return Err(Error::DuplicateOptionName {
                        command: path.to_string(),
                        name: key.to_string(),
                    });
                }
            }
        }

        for sub in &self.subcommands {
            sub.check_options(&format!("{path} {}", sub.name), &envs)?;
        }
        Ok(())
    }

    /// Every option of an invoked command must have resolved a value.
    pub(crate) fn check_required(&self) -> Result<()> {
        if !self.is_invoked() {
            return Ok(());
        }
        if let Some(opt) = self.options.iter().find(|o| !o.has_value()) {
            return Err(Error::in_command(
                &self.name,
                Error::OptionRequired { flag: opt.flag() },
            ));
        }
        for sub in &self.subcommands {
            sub.check_required()
                .map_err(|e| Error::in_command(&self.name, e))?;
        }
        Ok(())
    }
}
