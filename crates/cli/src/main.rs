mod commands;

use std::process::ExitCode;

use cmdtree::{Command, ErrorKind, Opt};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    // Loaded first so .env can also set RUST_LOG and the CMDTREE_* levels.
    // Values from .env never override variables already set in the process.
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(err) = dotenv {
        if !err.not_found() {
            tracing::warn!("failed to load .env: {err}");
        }
    }

    let mut cli = build_cli();
    let remaining = match cli.parse(std::env::args()) {
        Ok(remaining) => remaining,
        Err(err) => return report(&err),
    };

    // The root only prints an overview; a stray word there is a mistyped command.
    if cli.deepest_invoked().get_name() == cli.get_name() {
        if let Some(first) = remaining.first() {
            eprintln!("error: unknown command: {first}");
            eprintln!("\nRun with --help for usage.");
            return ExitCode::from(2);
        }
    }

    match cli.dispatch(&remaining) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &cmdtree::Error) -> ExitCode {
    if err.is_help() {
        print!("{err}");
        return ExitCode::SUCCESS;
    }
    eprintln!("error: {err}");
    if err.kind() == ErrorKind::Execution {
        return ExitCode::FAILURE;
    }
    eprintln!("\nRun with --help for usage.");
    ExitCode::from(2)
}

fn build_cli() -> Command {
    Command::new("cmdtree-demo")
        .description("Example command tree with env and default aware options")
        .option(
            Opt::bool("verbose")
                .short("v")
                .env("VERBOSE")
                .default(false)
                .description("Print resolved options to stderr"),
        )
        .action(commands::overview)
        .subcommand(
            Command::new("greet")
                .description("Greet someone")
                .option(Opt::string("name").short("n").description("Who to greet"))
                .option(Opt::int("times").short("t").default(1).description("How often"))
                .option(Opt::bool("shout").default(false).description("Use upper case"))
                .action(commands::greet),
        )
        .subcommand(
            Command::new("sum")
                .description("Add up the numbers given as arguments")
                .option(
                    Opt::int("precision")
                        .env("SUM_PRECISION")
                        .default(2)
                        .description("Digits after the decimal point"),
                )
                .option(
                    Opt::float("scale")
                        .default(1.0)
                        .description("Factor applied to the total"),
                )
                .action(commands::sum),
        )
        .subcommand(
            Command::new("addr")
                .description("Print the address a server would bind to")
                .option(
                    Opt::string("host")
                        .env("HOST")
                        .default("127.0.0.1")
                        .description("Interface to bind"),
                )
                .option(
                    Opt::int("port")
                        .short("p")
                        .env("PORT")
                        .default(8080)
                        .description("Port to bind"),
                )
                .action(commands::addr),
        )
        .subcommand(
            Command::new("schema")
                .description("Print the command tree as JSON")
                .action(commands::schema),
        )
}

fn init_tracing() {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Some(level) = cmdtree::diagnostics::level_from_env() {
        let directive = format!("cmdtree={}", level.as_str().to_ascii_lowercase());
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
