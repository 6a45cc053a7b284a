//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Post-build SEO pipeline for single-page apps
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "prerender.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// SPA build output directory (overrides `site.dist`)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a metadata-complete document for every route
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Replace selected documents with hydrated browser snapshots
    #[command(visible_alias = "s")]
    Snapshot {
        #[command(flatten)]
        args: SnapshotArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Check snapshot targets for missing or unhydrated documents
    #[command(visible_alias = "v")]
    Verify {
        #[command(flatten)]
        args: SnapshotArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run generate, then snapshot
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        generate: GenerateArgs,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Arguments for route document generation.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Skip the catalog fetch (static and category routes only)
    #[arg(long)]
    pub no_catalog: bool,

    /// Override the public origin (e.g. for a staging deploy)
    #[arg(long, value_hint = clap::ValueHint::Url)]
    pub origin: Option<String>,
}

/// Arguments shared by snapshot and verify.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// Route to snapshot (repeatable, overrides `snapshot.targets`)
    #[arg(short, long = "target", value_name = "PATH")]
    pub targets: Vec<String>,
}

/// Flags every subcommand accepts.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn common(&self) -> &CommonArgs {
        match &self.command {
            Commands::Generate { common, .. }
            | Commands::Snapshot { common, .. }
            | Commands::Verify { common, .. }
            | Commands::Build { common, .. } => common,
        }
    }

    pub const fn generate_args(&self) -> Option<&GenerateArgs> {
        match &self.command {
            Commands::Generate { args, .. } => Some(args),
            Commands::Build { generate, .. } => Some(generate),
            _ => None,
        }
    }

    pub const fn snapshot_args(&self) -> Option<&SnapshotArgs> {
        match &self.command {
            Commands::Snapshot { args, .. } | Commands::Verify { args, .. } => Some(args),
            Commands::Build { snapshot, .. } => Some(snapshot),
            Commands::Generate { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "prerender",
            "generate",
            "--no-catalog",
            "--origin",
            "https://staging.example.com",
            "-V",
        ])
        .unwrap();
        let args = cli.generate_args().unwrap();
        assert!(args.no_catalog);
        assert_eq!(args.origin.as_deref(), Some("https://staging.example.com"));
        assert!(cli.common().verbose);
        assert!(cli.snapshot_args().is_none());
        assert_eq!(cli.config, PathBuf::from("prerender.toml"));
    }

    #[test]
    fn test_parse_snapshot_alias_with_targets() {
        let cli = Cli::try_parse_from(["prerender", "s", "-t", "/", "--target", "/about/"]).unwrap();
        assert!(matches!(cli.command, Commands::Snapshot { .. }));
        assert_eq!(cli.snapshot_args().unwrap().targets, ["/", "/about/"]);
        assert!(!cli.common().verbose);
    }

    #[test]
    fn test_parse_build_has_both() {
        let cli = Cli::try_parse_from(["prerender", "-C", "site.toml", "b", "--no-catalog", "-o", "out"]).unwrap();
        assert!(cli.generate_args().unwrap().no_catalog);
        assert!(cli.snapshot_args().is_some());
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
