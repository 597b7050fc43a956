use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["medcat-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["medcat-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["medcat-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn import_defaults_to_lenient_wet_run() {
    let cli = Cli::try_parse_from(["medcat-cli", "import", "products.txt"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Import {
            ref file,
            strict: false,
            dry_run: false
        }) if file == "products.txt"
    ));
}

#[test]
fn import_accepts_strict_and_dry_run_flags() {
    let cli =
        Cli::try_parse_from(["medcat-cli", "import", "-", "--strict", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Import {
            ref file,
            strict: true,
            dry_run: true
        }) if file == "-"
    ));
}

#[test]
fn export_without_output_writes_stdout() {
    let cli = Cli::try_parse_from(["medcat-cli", "export"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export { output: None })
    ));
}

#[test]
fn export_accepts_output_path() {
    let cli = Cli::try_parse_from(["medcat-cli", "export", "--output", "catalogue.csv"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export { output: Some(ref p) }) if p.to_str() == Some("catalogue.csv")
    ));
}

#[test]
fn import_requires_a_file_argument() {
    let result = Cli::try_parse_from(["medcat-cli", "import"]);
    assert!(result.is_err());
}
