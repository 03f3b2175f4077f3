//! Command dispatch logic for fdroid-popular

use super::{DownloadArgs, GenerateArgs, InitArgs, download, generate, init_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "fdroid-popular", author, version, long_about = None)]
#[command(about = "Build a star-count popularity database for the F-Droid catalog")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: PopularSubcommand,
}

#[derive(Subcommand, Debug)]
enum PopularSubcommand {
    /// Query the star count of every catalog application and write the popularity document
    Generate(Box<GenerateArgs>),
    /// Download the F-Droid catalog to a local file
    Download(DownloadArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if the executed command fails in debug mode, or if it fails in a
/// way that cannot be reported through the host
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        PopularSubcommand::Generate(generate_args) => generate(host, generate_args).await,
        PopularSubcommand::Download(download_args) => download(host, download_args).await,
        PopularSubcommand::Init(init_args) => init_config(host, init_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::LogLevel;
    use camino::Utf8PathBuf;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> PopularSubcommand {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let PopularSubcommand::Generate(args) = parse(&["fdroid-popular", "generate", "-u", "repository.json"]) else {
            panic!("expected the generate command");
        };

        assert_eq!(args.database_url, "repository.json");
        assert_eq!(args.export_file, Utf8PathBuf::from("export.json"));
        assert_eq!(args.common.log_level, LogLevel::Info);
        assert!(!args.common.debug);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_generate_accepts_camel_case_url_flag() {
        let PopularSubcommand::Generate(args) = parse(&[
            "fdroid-popular",
            "generate",
            "--databaseUrl",
            "https://example.com/index-v2.json",
            "-f",
            "out.json",
            "-d",
            "--log-level",
            "none",
        ]) else {
            panic!("expected the generate command");
        };

        assert_eq!(args.database_url, "https://example.com/index-v2.json");
        assert_eq!(args.export_file, Utf8PathBuf::from("out.json"));
        assert!(args.common.debug);
        assert_eq!(args.common.log_level, LogLevel::None);
    }

    #[test]
    fn test_generate_accepts_camel_case_flags() {
        let PopularSubcommand::Generate(args) = parse(&[
            "fdroid-popular",
            "generate",
            "--databaseUrl",
            "repository.json",
            "--exportFile",
            "popular.json",
            "--githubApiKey",
            "gh-key",
            "--gitlabApiKey",
            "gl-key",
        ]) else {
            panic!("expected the generate command");
        };

        assert_eq!(args.export_file, Utf8PathBuf::from("popular.json"));
        assert_eq!(args.github_api_key.as_deref(), Some("gh-key"));
        assert_eq!(args.gitlab_api_key.as_deref(), Some("gl-key"));
    }

    #[test]
    fn test_generate_requires_database_url() {
        let _ = Cli::try_parse_from(["fdroid-popular", "generate"]).unwrap_err();
    }

    #[test]
    fn test_download_defaults() {
        let PopularSubcommand::Download(args) = parse(&["fdroid-popular", "download"]) else {
            panic!("expected the download command");
        };

        assert_eq!(args.database_url, "https://f-droid.org/repo/index-v2.json");
        assert_eq!(args.output, Utf8PathBuf::from("repository.json"));
    }

    #[test]
    fn test_init_default_output() {
        let PopularSubcommand::Init(args) = parse(&["fdroid-popular", "init"]) else {
            panic!("expected the init command");
        };

        assert_eq!(args.output, Utf8PathBuf::from("popular.toml"));
    }
}
