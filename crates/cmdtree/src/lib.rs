//! Hierarchical command tree parsing with typed options.
//!
//! A program declares a tree of [`Command`]s, each carrying typed [`Opt`]s, and
//! resolves its arguments in one call. Option values follow a fixed precedence:
//! command-line token, then environment variable, then declared default.
//!
//! # Example
//!
//! ```rust,ignore
//! use cmdtree::{Command, Opt};
//!
//! let mut cli = Command::new("main-cli")
//!     .option(Opt::bool("verbose").short("v").env("VERBOSE").default(false))
//!     .subcommand(
//!         Command::new("sub")
//!             .option(Opt::int("port").env("PORT").default(8080))
//!             .action(|inv| {
//!                 println!("port {}", inv.get_int("port")?);
//!                 Ok(())
//!             }),
//!     );
//!
//! match cli.run(std::env::args()) {
//!     Ok(()) => {}
//!     Err(e) if e.is_help() => print!("{e}"),
//!     Err(e) => eprintln!("error: {e}"),
//! }
//! ```
//!
//! Token grammar: `--name`, `--name=value`, `-short`, `-short=value`, and a bare
//! `--` after which every token is passed through untouched. Bool options take
//! no separate value token; `--flag` alone means `true`.

mod command;
pub mod diagnostics;
mod error;
mod help;
pub mod metadata;
mod opt;
mod parser;
mod resolve;
mod validate;

pub use command::{ActionFn, Command, Invocation, UsageFn};
pub use error::{Error, ErrorKind, Origin, Result, ValueError};
pub use help::HELP_OPTION;
pub use metadata::{CommandMetadata, OptionMetadata};
pub use opt::{Opt, OptionKind, OptionValue, TypedOpt, Value};
pub use parser::BREAK_MARKER;
