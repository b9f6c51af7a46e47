//! Integration tests for argument parsing and report rendering.

use std::path::PathBuf;

use clap::Parser;

use decomp_cli::cli::{Cli, Command, SectionArg};
use decomp_cli::commands::ProjectReport;
use decomp_cli::summary::database_table;
use decomp_project::DatabaseSummary;

#[test]
fn test_summary_root_is_optional() {
    let cli = Cli::try_parse_from(["decomp", "summary"]).unwrap();
    let Command::Summary(args) = cli.command else {
        panic!("expected summary command");
    };
    assert_eq!(args.root, None);
}

#[test]
fn test_rename_object_arguments() {
    let cli = Cli::try_parse_from([
        "decomp",
        "rename-object",
        "/tmp/emerald",
        "--from",
        "Boy1",
        "--to",
        "Youngster",
    ])
    .unwrap();
    let Command::RenameObject(args) = cli.command else {
        panic!("expected rename-object command");
    };
    assert_eq!(args.project.root, Some(PathBuf::from("/tmp/emerald")));
    assert_eq!(args.from, "Boy1");
    assert_eq!(args.to, "Youngster");
}

#[test]
fn test_level_trainer_defaults_to_middle_section() {
    let cli = Cli::try_parse_from([
        "decomp",
        "level-trainer",
        "--trainer",
        "TRAINER_ROXANNE_1",
        "--segment",
        "2",
    ])
    .unwrap();
    let Command::LevelTrainer(args) = cli.command else {
        panic!("expected level-trainer command");
    };
    assert_eq!(args.section, SectionArg::Middle);
    assert_eq!(args.segment, 2);
    assert_eq!(args.seed, None);
}

#[test]
fn test_rename_object_requires_target() {
    assert!(Cli::try_parse_from(["decomp", "rename-object", "--from", "Boy1"]).is_err());
}

#[test]
fn test_global_log_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["decomp", "resave", "--log-level", "debug", "--log-format", "json"]);
    assert!(cli.is_ok());
}

#[test]
fn test_database_table_totals() {
    let report = ProjectReport {
        root: PathBuf::from("/tmp/emerald"),
        databases: vec![
            DatabaseSummary {
                name: "Item Database",
                entities: 3,
            },
            DatabaseSummary {
                name: "Trainer Database",
                entities: 0,
            },
        ],
        saved: false,
    };
    let mut table = database_table(&report);
    table.force_no_tty();
    let rendered = table.to_string();

    assert!(rendered.contains("Item Database"));
    assert!(rendered.contains("Trainer Database"));
    let total = rendered
        .lines()
        .find(|line| line.contains("TOTAL"))
        .expect("total row");
    assert!(total.contains('3'));
}
