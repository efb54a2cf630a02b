use cmdtree::{Command, Error, ErrorKind, Opt, Value};
use rstest::rstest;

fn main_cli() -> Command {
    Command::new("main-cli")
        .description("Example tool")
        .option(Opt::bool("verbose").env("VERBOSE").default(false))
        .subcommand(Command::new("sub").option(Opt::int("port").env("PORT").default(8080)))
}

fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn flags_on_root_and_subcommand() {
    let mut cli = main_cli();
    let rest = cli
        .parse_with_env(["main-cli", "--verbose", "sub", "--port=9090"], &[])
        .unwrap();

    assert!(rest.is_empty());
    assert!(cli.get_bool("verbose").unwrap());
    assert_eq!(cli.get_int("port").unwrap(), 9090);
    assert_eq!(cli.deepest_invoked().called(), ["main-cli", "sub"]);
    assert_eq!(cli.called(), ["main-cli"]);
}

#[test]
fn environment_and_residual_arguments() {
    let mut cli = main_cli();
    let rest = cli
        .parse_with_env(["main-cli", "sub", "extra1", "extra2"], &env(&[("PORT", "7000")]))
        .unwrap();

    assert_eq!(cli.get_int("port").unwrap(), 7000);
    assert_eq!(rest, ["extra1", "extra2"]);
}

#[test]
fn break_marker_disables_option_parsing() {
    let mut cli = main_cli();
    let rest = cli
        .parse_with_env(["main-cli", "sub", "--", "--port=1"], &[])
        .unwrap();

    assert_eq!(cli.get_int("port").unwrap(), 8080);
    assert_eq!(rest, ["--port=1"]);
}

#[test]
fn break_marker_also_hides_subcommand_names() {
    let mut cli = main_cli();
    let rest = cli.parse_with_env(["main-cli", "--", "sub"], &[]).unwrap();
    assert_eq!(rest, ["sub"]);
    assert!(!cli.find_subcommand("sub").unwrap().is_invoked());
}

#[test]
fn required_option_without_any_source() {
    let mut cli = Command::new("deploy").subcommand(
        Command::new("push")
            .option(Opt::string("target").env("DEPLOY_TARGET"))
            .option(Opt::int("retries").default(3)),
    );

    let err = cli.parse_with_env(["deploy", "push"], &[]).unwrap_err();
    match err.root_cause() {
        Error::OptionRequired { flag } => assert_eq!(flag, "--target"),
        other => panic!("expected OptionRequired, got: {other:?}"),
    }
    assert_eq!(err.to_string(), "deploy: push: option --target is required");

    // Satisfied by the environment binding.
    cli.parse_with_env(["deploy", "push"], &env(&[("DEPLOY_TARGET", "prod")]))
        .unwrap();
    assert_eq!(cli.get_string("target").unwrap(), "prod");

    // Not checked when the command is not invoked.
    cli.parse_with_env(["deploy"], &[]).unwrap();
}

#[test]
fn duplicate_option_aborts_before_tokens_are_consumed() {
    let mut cli = Command::new("app")
        .option(Opt::string("sentinel").default("unset"))
        .subcommand(
            Command::new("bad")
                .option(Opt::int("count"))
                .option(Opt::float("count")),
        );

    let err = cli
        .parse_with_env(["app", "--sentinel=touched"], &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateOptionName);
    let sentinel = cli.find_option("sentinel").unwrap();
    assert!(!sentinel.has_value());
}

#[test]
fn duplicate_subcommand_aborts_before_tokens_are_consumed() {
    let mut cli = Command::new("app")
        .option(Opt::string("sentinel").default("unset"))
        .subcommand(Command::new("db").subcommand(Command::new("migrate")))
        .subcommand(Command::new("db"));

    let err = cli
        .parse_with_env(["app", "--sentinel=touched", "db"], &[])
        .unwrap_err();
    match &err {
        Error::DuplicateSubCommand { command, name } => {
            assert_eq!(command, "app");
            assert_eq!(name, "db");
        }
        other => panic!("expected DuplicateSubCommand, got: {other:?}"),
    }
    assert!(!cli.find_option("sentinel").unwrap().has_value());
    assert!(cli.called().is_empty());
}

#[test]
fn float_environment_value() {
    let mut cli = Command::new("render").option(Opt::float("scale").env("SCALE").default(1.0));

    cli.parse_with_env(["render"], &env(&[("SCALE", "2.5")]))
        .unwrap();
    assert_eq!(cli.get_float("scale").unwrap(), 2.5);

    let err = cli
        .parse_with_env(["render"], &env(&[("SCALE", "big")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert!(err.to_string().contains("environment variable SCALE"), "{err}");
}

#[rstest]
#[case::default_only(&[], &[], 8080)]
#[case::env_beats_default(&[], &[("PORT", "7000")], 7000)]
#[case::cli_beats_env(&["--port", "9090"], &[("PORT", "7000")], 9090)]
#[case::cli_equals_form(&["--port=1"], &[], 1)]
#[case::empty_env_is_unset(&[], &[("PORT", "")], 8080)]
fn precedence(#[case] flags: &[&str], #[case] vars: &[(&str, &str)], #[case] expected: i64) {
    let mut cli = main_cli();
    let mut args = vec!["main-cli", "sub"];
    args.extend_from_slice(flags);

    cli.parse_with_env(args, &env(vars)).unwrap();
    assert_eq!(cli.get_int("port").unwrap(), expected);
}

#[test]
fn help_round_trip() {
    let mut cli = main_cli();
    let rendered = cli.render_help();
    assert!(rendered.contains("Usage: main-cli"));

    for _ in 0..2 {
        let err = cli.parse_with_env(["main-cli", "--help"], &[]).unwrap_err();
        assert!(err.is_help());
        assert!(cli.remaining().is_empty());
    }
}

#[test]
fn repeated_parses_are_independent() {
    let mut cli = main_cli();
    let args = ["main-cli", "--verbose", "sub", "--port=9090", "x"];

    let first = cli.parse_with_env(args, &[]).unwrap();
    let port = cli.get_int("port").unwrap();
    let second = cli.parse_with_env(args, &[]).unwrap();

    assert_eq!(first, second);
    assert_eq!(cli.get_int("port").unwrap(), port);

    // State from the previous parse does not leak into a shallower one.
    let third = cli.parse_with_env(["main-cli"], &[]).unwrap();
    assert!(third.is_empty());
    assert!(!cli.get_bool("verbose").unwrap());
    assert!(cli.get_int("port").is_err());
    let sub = cli.find_subcommand("sub").unwrap();
    assert!(sub.called().is_empty());
    assert_eq!(sub.find_option("port").unwrap().value(), Some(Value::Int(8080)));
}

#[test]
fn bool_environment_parsing_is_strict() {
    let mut cli = main_cli();
    cli.parse_with_env(["main-cli"], &env(&[("VERBOSE", "true")]))
        .unwrap();
    assert!(cli.get_bool("verbose").unwrap());

    let err = cli
        .parse_with_env(["main-cli"], &env(&[("VERBOSE", "yes")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert!(err.to_string().contains("VERBOSE"), "{err}");
}
