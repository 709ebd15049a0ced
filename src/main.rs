// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use prismic_blog::{
    AppError, BlogPipeline, BlogSite, Command, CommandLineInput, CommentWidget,
    ContentNormalizer, DeliveryTarget, DocumentSource, FixtureSource, OutputPlan, PageComposer,
    PageDelivery, PrismicHttpClient, SiteConfig, SiteContent, Slug, SourceConfig,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("prismic_blog.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // Page output goes to stdout, so console logging uses stderr.
    let stderr_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Connects the configured document source.
fn open_source(config: &SiteConfig) -> Result<Arc<dyn DocumentSource>, AppError> {
    match &config.source {
        SourceConfig::Prismic {
            endpoint,
            access_token,
        } => {
            log::info!("Reading documents from {}", endpoint);
            Ok(Arc::new(PrismicHttpClient::new(
                endpoint.clone(),
                access_token.clone(),
            )?))
        }
        SourceConfig::Fixture(path) => {
            log::info!("Reading documents from fixture {}", path.display());
            Ok(Arc::new(FixtureSource::from_path(path)?))
        }
    }
}

/// Builds the pipeline for a resolved configuration.
fn assemble(config: &SiteConfig) -> Result<BlogPipeline, AppError> {
    let site = BlogSite::new(
        open_source(config)?,
        ContentNormalizer::default(),
        config.site.clone(),
    );
    let comments = config
        .comments
        .clone()
        .map(|widget| Arc::new(widget) as Arc<dyn CommentWidget>);
    BlogPipeline::new(site, config.dates, comments)
}

/// Runs the selected command: fetch → render → deliver.
async fn execute(config: &SiteConfig) -> Result<(), AppError> {
    let pipeline = assemble(config)?;

    let plan = match &config.command {
        Command::Index { pages } => {
            let listing = pipeline.listing(*pages).await?;
            OutputPlan::new().print(pipeline.compose_index(&listing)?.into_string())
        }
        Command::Post { slug } => {
            let slug = Slug::parse(slug)?;
            OutputPlan::new().print(pipeline.render_post(&slug).await?.into_string())
        }
        Command::Paths => {
            let paths = pipeline.paths().await?;
            OutputPlan::new().print(serde_json::to_string_pretty(&paths)?)
        }
        Command::Build { out_dir } => pipeline.plan_site(out_dir).await?,
    };

    let report = pipeline.deliver(plan)?;

    if matches!(config.command, Command::Build { .. }) {
        let written = report
            .completed
            .iter()
            .filter(|op| matches!(op.operation, DeliveryTarget::WriteFile { .. }))
            .count();
        println!(
            "✓ Wrote {} page(s), {} bytes in {}ms",
            written, report.stats.bytes_written, report.stats.total_duration_ms
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SiteConfig::resolve(cli)?;

    execute(&config).await?;

    Ok(())
}
