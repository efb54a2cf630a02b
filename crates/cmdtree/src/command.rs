use std::fmt;

use crate::error::{Error, Result};
use crate::opt::{Opt, OptionValue};

/// Custom help renderer for a command.
pub type UsageFn = Box<dyn Fn(&Command) -> String>;

/// Function bound to a command and run by [`Command::run`].
pub type ActionFn = Box<dyn Fn(&Invocation<'_>) -> anyhow::Result<()>>;

/// A node in the command tree.
///
/// Options and subcommands are declared once; each call to [`Command::parse`]
/// resets the transient state (invocation path, residual arguments and option
/// values) before resolving the new arguments.
pub struct Command {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) options: Vec<Opt>,
    pub(crate) subcommands: Vec<Command>,
    pub(crate) usage: Option<UsageFn>,
    pub(crate) action: Option<ActionFn>,
    pub(crate) called: Vec<String>,
    pub(crate) remaining: Vec<String>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("subcommands", &self.subcommands)
            .field("usage", &self.usage.is_some())
            .field("action", &self.action.is_some())
            .field("called", &self.called)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            options: Vec::new(),
            subcommands: Vec::new(),
            usage: None,
            action: None,
            called: Vec::new(),
            remaining: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn option(mut self, opt: impl Into<Opt>) -> Self {
        self.options.push(opt.into());
        self
    }

    pub fn subcommand(mut self, cmd: Command) -> Self {
        self.subcommands.push(cmd);
        self
    }

    /// Replace the default help text of this command.
    pub fn usage<F>(mut self, render: F) -> Self
    where
        F: Fn(&Command) -> String + 'static,
    {
        self.usage = Some(Box::new(render));
        self
    }

    /// Bind the function [`Command::run`] calls when this is the deepest invoked command.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<()> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_options(&self) -> &[Opt] {
        &self.options
    }

    pub fn get_subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands
            .iter()
            .find(|c| !c.name.is_empty() && c.name == name)
    }

    /// Own option whose long name is `name`.
    pub fn find_option(&self, name: &str) -> Option<&Opt> {
        self.options.iter().find(|o| o.name() == name)
    }

    /// Command names invoked down to this one; empty when not reached by the last parse.
    pub fn called(&self) -> &[String] {
        &self.called
    }

    pub fn is_invoked(&self) -> bool {
        !self.called.is_empty()
    }

    /// Residual arguments collected by the last parse.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    /// The most deeply invoked command, or `self` when no child was invoked.
    pub fn deepest_invoked(&self) -> &Command {
        let mut current = self;
        while let Some(child) = current.subcommands.iter().find(|c| c.is_invoked()) {
            current = child;
        }
        current
    }

    pub(crate) fn reset(&mut self) {
        self.called.clear();
        self.remaining.clear();
        for opt in &mut self.options {
            opt.clear_value();
        }
        for sub in &mut self.subcommands {
            sub.reset();
        }
    }

    /// Option with a value matching `key` by name, short or environment key.
    ///
    /// Invoked subcommands are searched before the command's own options, so
    /// the deepest invoked command wins.
    pub fn lookup(&self, key: &str) -> Option<&Opt> {
        for child in self.subcommands.iter().rev().filter(|c| c.is_invoked()) {
            if let Some(opt) = child.lookup(key) {
                return Some(opt);
            }
        }
        self.options
            .iter()
            .find(|o| o.has_value() && o.matches_key(key))
    }

    fn get_typed<T: OptionValue>(&self, key: &str) -> Result<T> {
        let opt = self
            .lookup(key)
            .ok_or_else(|| Error::UnknownOption(key.to_string()))?;
        opt.typed::<T>()?
            .get()
            .cloned()
            .ok_or_else(|| Error::UnknownOption(key.to_string()))
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_typed(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get_typed(key)
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.get_typed(key)
    }

    pub fn get_float(&self, key: &str) -> Result<f64> {
        self.get_typed(key)
    }

    /// Parse `args` against the process environment and run the deepest invoked command.
    pub fn run<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let remaining = self.parse(args)?;
        self.dispatch(&remaining)
    }

    /// Like [`Command::run`], reading environment bindings from `env`.
    pub fn run_with_env<I, S>(&mut self, args: I, env: &[(String, String)]) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let remaining = self.parse_with_env(args, env)?;
        self.dispatch(&remaining)
    }

    /// Call the action of the deepest command invoked by the last parse with `args`.
    ///
    /// [`Command::run`] is `parse` followed by this; calling the two separately
    /// lets a caller inspect the parsed tree before anything runs.
    pub fn dispatch(&self, args: &[String]) -> Result<()> {
        let target = self.deepest_invoked();
        let Some(action) = &target.action else {
            return Err(Error::CommandFuncNotSet(target.name.clone()));
        };
        tracing::debug!(command = %target.called.join(" "), "dispatching");
        let invocation = Invocation {
            root: self,
            command: target,
            args,
        };
        action(&invocation).map_err(|source| Error::Execution {
            command: target.called.join(" "),
            source: source.into(),
        })
    }
}

/// What an action sees: the parsed tree, the invoked command and residual arguments.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    root: &'a Command,
    command: &'a Command,
    args: &'a [String],
}

impl<'a> Invocation<'a> {
    pub fn root(&self) -> &'a Command {
        self.root
    }

    pub fn command(&self) -> &'a Command {
        self.command
    }

    pub fn args(&self) -> &'a [String] {
        self.args
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.root.get_string(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.root.get_bool(key)
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.root.get_int(key)
    }

    pub fn get_float(&self, key: &str) -> Result<f64> {
        self.root.get_float(key)
    }
}
