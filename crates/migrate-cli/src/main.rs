//! `libmigrate` command line
//!
//! Inspects the method policy that drives instrumentation and lints policy
//! files before they are deployed.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use migrate_policy::{MethodDescriptor, MigrateConfig, PolicyIssue};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("libmigrate")
        .version(migrate_policy::VERSION)
        .about("Inspect and lint library migration policy")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Policy configuration file (TOML); built-in tables if omitted"),
        )
        .subcommand(
            Command::new("show")
                .about("Print resolved method descriptors")
                .arg(
                    Arg::new("names")
                        .num_args(0..)
                        .help("Method names; every known name if omitted"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("check").about("Lint the policy tables"))
        .subcommand(Command::new("defaults").about("Print the built-in configuration as TOML"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(&cli().get_matches()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let config = load_config(matches.get_one::<PathBuf>("config"))?;

    match matches.subcommand() {
        Some(("show", args)) => {
            let names: Vec<String> = match args.get_many::<String>("names") {
                Some(names) => names.cloned().collect(),
                None => config.policy.known_names().into_iter().collect(),
            };
            let descriptors: Vec<MethodDescriptor> =
                names.iter().map(|name| config.policy.describe(name)).collect();

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&descriptors)?);
            } else {
                for descriptor in &descriptors {
                    println!("{}", describe_line(descriptor));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("check", _)) => {
            let issues = config.policy.validate();
            print!("{}", lint_report(&issues));
            if issues.iter().any(PolicyIssue::is_error) {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Some(("defaults", _)) => {
            print!("{}", MigrateConfig::default().to_toml_string()?);
            Ok(ExitCode::SUCCESS)
        }
        _ => unreachable!("subcommand_required"),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MigrateConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading policy");
            MigrateConfig::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))
        }
        None => Ok(MigrateConfig::default()),
    }
}

/// One-line summary of a descriptor
fn describe_line(descriptor: &MethodDescriptor) -> String {
    let mut line = descriptor.name.clone();
    if descriptor.is_renamed() {
        let _ = write!(line, " -> {}", descriptor.new_name);
    }

    let mut flags = Vec::new();
    if descriptor.is_renamed() && descriptor.ignore_rename {
        flags.push("quiet-rename".to_string());
    }
    if descriptor.ignore_result {
        flags.push("ignore-result".to_string());
    }
    if descriptor.is_sequence {
        flags.push("sequence".to_string());
    }
    if let Some(index) = descriptor.iteration {
        flags.push(format!("callback@{index}"));
    }
    if descriptor.return_sensitive {
        flags.push("return-sensitive".to_string());
    }
    if !flags.is_empty() {
        let _ = write!(line, " [{}]", flags.join(", "));
    }
    line
}

fn lint_report(issues: &[PolicyIssue]) -> String {
    if issues.is_empty() {
        return "policy ok\n".to_string();
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    let mut out = String::new();
    for issue in issues {
        let _ = writeln!(out, "{issue}");
    }
    let _ = writeln!(
        out,
        "{} issue(s), {errors} error(s)",
        issues.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrate_policy::PolicyTables;
    use std::io::Write;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn show_accepts_names_and_global_config() {
        let matches = cli()
            .try_get_matches_from(["libmigrate", "show", "contains", "times", "--config", "p.toml"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "show");
        let names: Vec<_> = args.get_many::<String>("names").unwrap().collect();
        assert_eq!(names, ["contains", "times"]);
        assert_eq!(
            args.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("p.toml"))
        );
    }

    #[test]
    fn describe_line_lists_flags() {
        let tables = PolicyTables::default();
        assert_eq!(describe_line(&tables.describe("contains")), "contains -> includes");
        assert_eq!(
            describe_line(&tables.describe("times")),
            "times [callback@1, return-sensitive]"
        );
        assert_eq!(
            describe_line(&tables.describe("callback")),
            "callback -> iteratee [quiet-rename]"
        );
        assert_eq!(describe_line(&tables.describe("map")), "map");
    }

    #[test]
    fn lint_report_counts_errors() {
        let issues = PolicyTables::empty().with_return_sensitive("times").validate();
        let report = lint_report(&issues);
        assert!(report.starts_with("error: times: "));
        assert!(report.ends_with("1 issue(s), 1 error(s)\n"));
        assert_eq!(lint_report(&[]), "policy ok\n");
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[messages]\ntag = \"probe\"").unwrap();
        let config = load_config(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.messages.tag, "probe");
    }

    #[test]
    fn load_config_reports_path() {
        let err = load_config(Some(&PathBuf::from("/missing/policy.toml"))).unwrap_err();
        assert!(err.to_string().contains("/missing/policy.toml"));
    }
}
