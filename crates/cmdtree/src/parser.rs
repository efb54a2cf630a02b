use std::path::Path;

use crate::command::Command;
use crate::error::{Error, Origin, Result};
use crate::resolve::EnvSource;

/// Token that ends option and subcommand matching.
pub const BREAK_MARKER: &str = "--";

impl Command {
    /// Resolve `args` against the tree using the process environment.
    ///
    /// A leading token equal to the root name or the program name is skipped.
    /// Returns the residual arguments of the deepest invoked command. When a
    /// `--help` flag resolved to true the result is [`Error::Help`] carrying
    /// the rendered text.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve(args, EnvSource::Process)
    }

    /// Like [`Command::parse`], reading environment bindings from `env` only.
    ///
    /// Program-name stripping still compares the first token with the running
    /// process's `argv[0]`, so that part is not isolated from process state.
    pub fn parse_with_env<I, S>(&mut self, args: I, env: &[(String, String)]) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve(args, EnvSource::Fixed(env))
    }

    fn resolve<I, S>(&mut self, args: I, env: EnvSource<'_>) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = strip_program_name(&self.name, args.into_iter().map(Into::into).collect());
        tracing::debug!(command = %self.name, ?tokens, "parsing");

        self.reset();
        self.install_help();
        self.validate_structure()?;
        self.load_defaults();
        self.load_env(env)?;

        self.called = vec![self.name.clone()];
        self.parse_tokens(&tokens)
            .map_err(|e| Error::in_command(&self.name, e))?;

        if let Some(text) = self.requested_help() {
            tracing::debug!("help requested");
            return Err(Error::Help(text));
        }
        self.check_required()?;

        tracing::debug!(remaining = ?self.remaining, "parsed");
        Ok(self.remaining.clone())
    }

    fn parse_tokens(&mut self, tokens: &[String]) -> Result<()> {
        let mut i = 0usize;
        while i < tokens.len() {
            let token = tokens[i].as_str();

            if token == BREAK_MARKER {
                self.remaining.extend(tokens[i + 1..].iter().cloned());
                return Ok(());
            }

            if token.starts_with('-') {
                i += self.apply_option_token(token, tokens.get(i + 1))?;
                continue;
            }

            if let Some(idx) = self
                .subcommands
                .iter()
                .position(|c| !c.name.is_empty() && c.name == token)
            {
                let mut path = self.called.clone();
                let child = &mut self.subcommands[idx];
                path.push(child.name.clone());
                child.called = path;
                tracing::trace!(command = %child.name, "entering sub command");
                child
                    .parse_tokens(&tokens[i + 1..])
                    .map_err(|e| Error::in_command(&child.name, e))?;
                self.remaining = child.remaining.clone();
                return Ok(());
            }

            self.remaining.push(token.to_string());
            i += 1;
        }
        Ok(())
    }

    /// Match `token` against this command's options and store its value.
    ///
    /// Returns how many tokens were consumed.
    fn apply_option_token(&mut self, token: &str, next: Option<&String>) -> Result<usize> {
        for opt in &mut self.options {
            let forms = [(opt.name(), "--"), (opt.short(), "-")];
            let matched = forms.iter().find_map(|&(ident, prefix)| {
                if ident.is_empty() {
                    return None;
                }
                let flag = format!("{prefix}{ident}");
                if token == flag {
                    return Some((flag, None));
                }
                token
                    .strip_prefix(flag.as_str())
                    .and_then(|rest| rest.strip_prefix('='))
                    .map(|value| (flag.clone(), Some(value.to_string())))
            });
            let Some((flag, embedded)) = matched else {
                continue;
            };

            tracing::trace!(%flag, "option matched");
            return match embedded {
                Some(value) => {
                    opt.set_raw(&value, Origin::Flag(flag))?;
                    Ok(1)
                }
                None if !opt.takes_value() => {
                    opt.set_raw("true", Origin::Flag(flag))?;
                    Ok(1)
                }
                None => {
                    let Some(value) = next else {
                        return Err(Error::MissingOptionValue { flag });
                    };
                    opt.set_raw(value, Origin::Flag(flag))?;
                    Ok(2)
                }
            };
        }
        Err(Error::UnknownOption(token.to_string()))
    }
}

fn strip_program_name(root: &str, mut args: Vec<String>) -> Vec<String> {
    let Some(first) = args.first() else {
        return args;
    };
    if first == root || is_program_name(first) {
        args.remove(0);
    }
    args
}

fn is_program_name(token: &str) -> bool {
    let Some(argv0) = std::env::args_os().next() else {
        return false;
    };
    let program = Path::new(&argv0).file_name();
    program.is_some() && Path::new(token).file_name() == program
}
