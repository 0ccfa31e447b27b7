//! RackForge CLI - Command-line interface for Eurorack module design
//!
//! This binary validates modules, projects, and generation requests, revises
//! saved projects, and projects panel layouts into 3D.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use rackforge_cli::{commands, logging};

/// RackForge - Eurorack Module Design Tool
#[derive(Parser)]
#[command(name = "rackforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and normalize a module, project, or generation request
    Validate {
        /// Record kind
        #[arg(short, long, value_parser = ["module", "project", "generation"])]
        kind: String,

        /// Path to the JSON record
        #[arg(short, long)]
        input: String,

        /// Built-in limits profile (default, strict, skiff)
        #[arg(long, value_parser = ["default", "strict", "skiff"], conflicts_with = "limits_file")]
        limits: Option<String>,

        /// Path to a limits profile JSON file
        #[arg(long)]
        limits_file: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Create and revise projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Project a module's panel layout into 3D
    Layout {
        /// Path to the module JSON
        #[arg(short, long)]
        input: String,

        /// Pretty-print the output JSON
        #[arg(short, long)]
        pretty: bool,

        /// Include the BLAKE3 geometry hash
        #[arg(long)]
        hash: bool,

        /// Fail if a control footprint comes within this many mm of an edge
        #[arg(long)]
        clearance: Option<f64>,

        /// Built-in limits profile (default, strict, skiff)
        #[arg(long, value_parser = ["default", "strict", "skiff"])]
        limits: Option<String>,
    },

    /// Run a generation request through the mock backend
    Generate {
        /// Path to the generation request JSON
        #[arg(short, long)]
        input: String,

        /// Skip the simulated stage delays
        #[arg(long)]
        instant: bool,

        /// Abandon generation after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show limits profiles
    Limits {
        /// Print this profile as JSON
        #[arg(short, long, value_parser = ["default", "strict", "skiff"])]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a project from a raw project document
    Create {
        /// Path to the project document
        #[arg(short, long)]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<String>,

        /// Built-in limits profile (default, strict, skiff)
        #[arg(long, value_parser = ["default", "strict", "skiff"])]
        limits: Option<String>,
    },

    /// Replace a saved project's content
    Update {
        /// Path to the saved project
        #[arg(short, long)]
        project: String,

        /// Path to the new project document
        #[arg(short, long)]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<String>,

        /// Built-in limits profile (default, strict, skiff)
        #[arg(long, value_parser = ["default", "strict", "skiff"])]
        limits: Option<String>,
    },

    /// Add a module to a saved project
    AddModule {
        /// Path to the saved project
        #[arg(short, long)]
        project: String,

        /// Path to the module document
        #[arg(short, long)]
        module: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<String>,

        /// Built-in limits profile (default, strict, skiff)
        #[arg(long, value_parser = ["default", "strict", "skiff"])]
        limits: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            kind,
            input,
            limits,
            limits_file,
            json,
        } => commands::validate::run(
            &kind,
            &input,
            limits.as_deref(),
            limits_file.as_deref(),
            json,
        ),
        Commands::Project { command } => match command {
            ProjectCommands::Create { input, out, limits } => {
                commands::project::create(&input, out.as_deref(), limits.as_deref())
            }
            ProjectCommands::Update {
                project,
                input,
                out,
                limits,
            } => commands::project::update(&project, &input, out.as_deref(), limits.as_deref()),
            ProjectCommands::AddModule {
                project,
                module,
                out,
                limits,
            } => {
                commands::project::add_module(&project, &module, out.as_deref(), limits.as_deref())
            }
        },
        Commands::Layout {
            input,
            pretty,
            hash,
            clearance,
            limits,
        } => commands::layout::run(&input, pretty, hash, clearance, limits.as_deref()),
        Commands::Generate {
            input,
            instant,
            timeout_ms,
            json,
        } => commands::generate::run(&input, instant, timeout_ms, json),
        Commands::Limits { name } => commands::limits::run(name.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_validate() {
        let cli = Cli::try_parse_from([
            "rackforge",
            "validate",
            "--kind",
            "module",
            "--input",
            "vco.json",
            "--limits",
            "strict",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate {
                kind,
                input,
                limits,
                limits_file,
                json,
            } => {
                assert_eq!(kind, "module");
                assert_eq!(input, "vco.json");
                assert_eq!(limits.as_deref(), Some("strict"));
                assert!(limits_file.is_none());
                assert!(!json);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_kind() {
        let err = Cli::try_parse_from([
            "rackforge", "validate", "--kind", "rack", "--input", "x.json",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_cli_limits_conflict() {
        let err = Cli::try_parse_from([
            "rackforge",
            "validate",
            "--kind",
            "project",
            "--input",
            "p.json",
            "--limits",
            "skiff",
            "--limits-file",
            "custom.json",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_cli_parses_project_add_module() {
        let cli = Cli::try_parse_from([
            "rackforge",
            "project",
            "add-module",
            "--project",
            "rack.json",
            "--module",
            "vca.json",
            "--out",
            "rack2.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Project {
                command:
                    ProjectCommands::AddModule {
                        project,
                        module,
                        out,
                        limits,
                    },
            } => {
                assert_eq!(project, "rack.json");
                assert_eq!(module, "vca.json");
                assert_eq!(out.as_deref(), Some("rack2.json"));
                assert!(limits.is_none());
            }
            _ => panic!("expected project add-module command"),
        }
    }

    #[test]
    fn test_cli_parses_layout_flags() {
        let cli = Cli::try_parse_from([
            "rackforge",
            "layout",
            "--input",
            "vco.json",
            "--pretty",
            "--hash",
            "--clearance",
            "2.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Layout {
                pretty,
                hash,
                clearance,
                ..
            } => {
                assert!(pretty);
                assert!(hash);
                assert_eq!(clearance, Some(2.5));
            }
            _ => panic!("expected layout command"),
        }
    }

    #[test]
    fn test_cli_global_verbose() {
        let cli = Cli::try_parse_from(["rackforge", "limits", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Limits { name: None }));
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "rackforge",
            "generate",
            "--input",
            "req.json",
            "--instant",
            "--timeout-ms",
            "100",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                input,
                instant,
                timeout_ms,
                json,
            } => {
                assert_eq!(input, "req.json");
                assert!(instant);
                assert_eq!(timeout_ms, Some(100));
                assert!(json);
            }
            _ => panic!("expected generate command"),
        }
    }
}
