use crate::command::Command;
use crate::opt::{Opt, Value};

/// Long name of the option added to every command to request help.
pub const HELP_OPTION: &str = "help";

impl Command {
    /// Append the reserved help flag to every command that does not declare one.
    pub(crate) fn install_help(&mut self) {
        if self.find_option(HELP_OPTION).is_none() {
            let mut help = Opt::bool(HELP_OPTION)
                .description("Show help information")
                .default(false);
            if !self.options.iter().any(|o| o.short() == "h") {
                help = help.short("h");
            }
            self.options.push(help.into());
        }
        for sub in &mut self.subcommands {
            sub.install_help();
        }
    }

    /// Help text for the first invoked command whose help flag is set.
    pub(crate) fn requested_help(&self) -> Option<String> {
        if !self.is_invoked() {
            return None;
        }
        let wants_help = self
            .find_option(HELP_OPTION)
            .and_then(Opt::value)
            .is_some_and(|v| v == Value::Bool(true));
        if wants_help {
            return Some(self.render_help());
        }
        self.subcommands.iter().find_map(Command::requested_help)
    }

    /// Help text from the custom usage hook, or the default layout.
    pub fn render_help(&self) -> String {
        match &self.usage {
            Some(render) => render(self),
            None => default_help(self),
        }
    }
}

fn default_help(cmd: &Command) -> String {
    let path = if cmd.called.is_empty() {
        cmd.name.clone()
    } else {
        cmd.called.join(" ")
    };

    let mut out = format!("Usage: {path}");
    if !cmd.options.is_empty() {
        out.push_str(" [options]");
    }
    if !cmd.subcommands.is_empty() {
        out.push_str(" <command>");
    }
    out.push_str(" [args...]\n");

    if !cmd.description.trim().is_empty() {
        out.push('\n');
        out.push_str(cmd.description.trim_end());
        out.push('\n');
    }

    if !cmd.subcommands.is_empty() {
        out.push_str("\nSub commands:\n");
        let rows: Vec<(String, String)> = cmd
            .subcommands
            .iter()
            .map(|c| (c.name.clone(), c.description.trim().to_string()))
            .collect();
        push_rows(&mut out, rows);
    }

    if !cmd.options.is_empty() {
        out.push_str("\nOptions:\n");
        let rows: Vec<(String, String)> = cmd
            .options
            .iter()
            .map(|o| (format_option_left(o), format_option_help(o)))
            .collect();
        push_rows(&mut out, rows);
    }

    out
}

fn push_rows(out: &mut String, rows: Vec<(String, String)>) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

fn format_option_left(opt: &Opt) -> String {
    let mut names = Vec::new();
    if !opt.name().is_empty() {
        names.push(format!("--{}", opt.name()));
    }
    if !opt.short().is_empty() {
        names.push(format!("-{}", opt.short()));
    }
    let mut out = names.join(", ");
    if opt.takes_value() {
        out.push_str(&format!(" <{}>", opt.kind()));
    }
    out
}

fn format_option_help(opt: &Opt) -> String {
    let mut parts = Vec::new();
    if !opt.environment().is_empty() {
        parts.push(format!("[env: {}]", opt.environment()));
    }
    if opt.has_default() {
        parts.push(format!("[default: {}]", opt.default_value()));
    }
    if !opt.has_default() && opt.environment().is_empty() {
        parts.push("(required)".to_string());
    }
    parts.push(opt.description().trim().to_string());
    parts.join(" ")
}
