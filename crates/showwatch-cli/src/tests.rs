use super::*;

#[test]
fn parses_run_command() {
    let cli = Cli::try_parse_from(["showwatch-cli", "run"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Run));
}

#[test]
fn parses_check_config_command() {
    let cli =
        Cli::try_parse_from(["showwatch-cli", "check-config"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::CheckConfig));
}

#[test]
fn parses_match_command_with_overrides() {
    let cli = Cli::try_parse_from([
        "showwatch-cli",
        "match",
        "--shows",
        "listing.json",
        "--artists",
        "other.yaml",
        "--subject",
        "hi",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Match {
            shows,
            artists,
            subject,
            ..
        } => {
            assert_eq!(shows, PathBuf::from("listing.json"));
            assert_eq!(artists, PathBuf::from("other.yaml"));
            assert_eq!(subject, "hi");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn match_requires_shows() {
    assert!(Cli::try_parse_from(["showwatch-cli", "match"]).is_err());
}

#[test]
fn missing_subcommand_is_error() {
    assert!(Cli::try_parse_from(["showwatch-cli"]).is_err());
}
