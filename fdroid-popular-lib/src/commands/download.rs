use super::Host;
use super::common::{CommonArgs, init_logging, report_outcome};
use crate::Result;
use crate::popular::Catalog;
use crate::popular::catalog::{DEFAULT_CATALOG_URL, catalog_client, read_catalog_text};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "  download";

#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Location of the F-Droid catalog to download
    #[arg(long = "database-url", short = 'u', alias = "databaseUrl", default_value = DEFAULT_CATALOG_URL, value_name = "URL")]
    pub database_url: String,

    /// Path where the catalog is saved
    #[arg(long, short = 'o', default_value = "repository.json", value_name = "PATH")]
    pub output: Utf8PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn download<H: Host>(host: &mut H, args: &DownloadArgs) -> Result<()> {
    init_logging(args.common.log_level);
    let result = download_catalog(host, args).await;
    report_outcome(host, args.common.debug, result)
}

async fn download_catalog<H: Host>(host: &mut H, args: &DownloadArgs) -> Result<()> {
    let text = read_catalog_text(&catalog_client()?, &args.database_url).await?;

    // refuse to save something that later runs could not read
    let catalog = Catalog::parse(&text)?;
    log::info!(target: LOG_TARGET, "Catalog lists {} packages", catalog.packages.len());

    fs::write(&args.output, &text).into_app_err_with(|| format!("writing catalog to '{}'", args.output))?;

    let _ = writeln!(host.output(), "Downloaded and saved JSON to {}", args.output);
    Ok(())
}
