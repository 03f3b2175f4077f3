use super::Host;
use super::ProgressReporter;
use super::common::{CommonArgs, LogLevel, init_logging, report_outcome};
use super::config::Config;
use crate::Result;
use crate::popular::catalog::catalog_client;
use crate::popular::{Catalog, Client, Credentials, Document, Enricher, NoProgress, Progress};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use core::time::Duration;
use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Location of the F-Droid catalog (`index-v2.json`), as an http(s) URL or a local file path
    #[arg(long = "database-url", short = 'u', alias = "databaseUrl", value_name = "URL")]
    pub database_url: String,

    /// Path of the popularity document to write
    #[arg(long, short = 'f', alias = "exportFile", default_value = "export.json", value_name = "PATH")]
    pub export_file: Utf8PathBuf,

    /// GitHub personal access token
    #[arg(long, alias = "githubApiKey", value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_api_key: Option<String>,

    /// GitLab personal access token
    #[arg(long, alias = "gitlabApiKey", value_name = "TOKEN", env = "GITLAB_TOKEN")]
    pub gitlab_api_key: Option<String>,

    /// Path to configuration file (default is `popular.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn generate<H: Host>(host: &mut H, args: &GenerateArgs) -> Result<()> {
    init_logging(args.common.log_level);
    let result = generate_document(host, args).await;
    report_outcome(host, args.common.debug, result)
}

async fn generate_document<H: Host>(host: &mut H, args: &GenerateArgs) -> Result<()> {
    let _ = writeln!(host.output(), "Generating repository database....");
    let start = Instant::now();

    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;

    let catalog = Catalog::load(&catalog_client()?, &args.database_url).await?;
    let records = catalog.into_records()?;

    let credentials = Credentials {
        github: args.github_api_key.clone(),
        gitlab: args.gitlab_api_key.clone(),
    };
    let client = Client::new(&credentials, config.request_timeout)?;

    let progress: Arc<dyn Progress> = if args.common.log_level == LogLevel::None {
        Arc::new(ProgressReporter::new(Duration::from_millis(300), stderr().is_terminal()))
    } else {
        Arc::new(NoProgress)
    };

    let result = Enricher::new(&client, config.batch_policy(), Arc::clone(&progress))
        .enrich(records)
        .await;
    progress.done();
    let records = result?;

    Document::from_records(&records).save(&args.export_file, args.common.debug)?;

    let _ = writeln!(
        host.output(),
        "Success, processed {} applications, took {:.3}s.",
        records.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
