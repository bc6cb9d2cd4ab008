use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use extconf_types::ConfigPath;

#[derive(Parser)]
#[command(
    name = "extconf",
    about = "Merge extension configuration and report structural conflicts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Show {
    Config,
    Meta,
    Settings,
    All,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fold extensions in order and print the merged state
    Merge(MergeArgs),
    /// Fold extensions and report the first conflict, if any
    Check(CheckArgs),
    /// List the paths an extension file declares
    Paths(PathsArgs),
    /// Show which extensions contributed to a path
    Blame(BlameArgs),
}

/// Where extensions come from: files on the command line, or a manifest.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Extension files, merged in the order given
    #[arg(required_unless_present = "manifest")]
    pub files: Vec<PathBuf>,
    /// TOML manifest listing extensions and the application config
    #[arg(long, conflicts_with = "files")]
    pub manifest: Option<PathBuf>,
}

#[derive(Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    #[arg(long, value_enum, default_value = "all")]
    pub show: Show,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Args)]
pub struct PathsArgs {
    pub file: PathBuf,
    /// Index the meta tree instead of the configuration
    #[arg(long)]
    pub meta: bool,
}

#[derive(Args)]
pub struct BlameArgs {
    /// Dotted path, e.g. `settings.build.output`
    pub path: ConfigPath,
    #[command(flatten)]
    pub sources: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_merge_files() {
        let cli = Cli::try_parse_from(["extconf", "merge", "base.json", "web.toml"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.sources.files, vec![PathBuf::from("base.json"), PathBuf::from("web.toml")]);
            assert!(args.sources.manifest.is_none());
            assert_eq!(args.show, Show::All);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_manifest_and_show() {
        let cli = Cli::try_parse_from(["extconf", "merge", "--manifest", "extconf.toml", "--show", "settings"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.sources.manifest, Some(PathBuf::from("extconf.toml")));
            assert_eq!(args.show, Show::Settings);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn sources_are_required() {
        assert!(Cli::try_parse_from(["extconf", "check"]).is_err());
    }

    #[test]
    fn files_and_manifest_conflict() {
        assert!(Cli::try_parse_from(["extconf", "check", "a.json", "--manifest", "m.toml"]).is_err());
    }

    #[test]
    fn parse_paths_meta() {
        let cli = Cli::try_parse_from(["extconf", "paths", "web.json", "--meta"]).unwrap();
        if let Command::Paths(args) = cli.command {
            assert!(args.meta);
            assert_eq!(args.file, PathBuf::from("web.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_blame() {
        let cli = Cli::try_parse_from(["extconf", "blame", "settings.build", "a.json"]).unwrap();
        if let Command::Blame(args) = cli.command {
            assert_eq!(args.path.as_str(), "settings.build");
            assert_eq!(args.sources.files, vec![PathBuf::from("a.json")]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn blame_rejects_malformed_path() {
        assert!(Cli::try_parse_from(["extconf", "blame", "settings..x", "a.json"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["extconf", "--verbose", "check", "a.json"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["extconf", "--format", "json", "paths", "a.json"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
