// src/config.rs
use crate::constants::{
    DEFAULT_LISTING_PAGE_SIZE, DEFAULT_REVALIDATE_SECS, POST_DOCUMENT_TYPE, PRISMIC_MAX_PAGE_SIZE,
    STATIC_PATHS_MAX_PAGES, WORDS_PER_MINUTE,
};
use crate::error::AppError;
use crate::formatting::{DateFormatter, DisplayLocale, ReadingTimeEstimator};
use crate::render::UtterancesWidget;
use crate::site::{FallbackPolicy, SiteOptions, StaticGenerationPolicy};
use crate::types::{AccessToken, DocumentType, ValidatedUrl, ValidationError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the repository API endpoint.
pub const ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";
/// Environment variable holding the optional access token.
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Display locale for dates and labels ("pt-BR" or "en-US")
    #[arg(long, global = true, default_value = "pt-BR")]
    pub locale: String,

    /// Offset from UTC, in minutes, used when displaying dates
    #[arg(long, global = true, default_value_t = 0, allow_negative_numbers = true)]
    pub utc_offset_minutes: i32,

    /// Posts per listing page (1-100)
    #[arg(long, global = true, default_value_t = DEFAULT_LISTING_PAGE_SIZE)]
    pub page_size: u32,

    /// Custom type holding the posts
    #[arg(long, global = true, default_value = POST_DOCUMENT_TYPE)]
    pub document_type: String,

    /// Reading speed used for reading-time estimates
    #[arg(long, global = true, default_value_t = WORDS_PER_MINUTE)]
    pub words_per_minute: u32,

    /// What unknown post paths do: blocking, placeholder or disabled
    #[arg(long, global = true, default_value = "blocking")]
    pub fallback: String,

    /// Seconds a pre-rendered page is served before regeneration
    #[arg(long, global = true, default_value_t = DEFAULT_REVALIDATE_SECS)]
    pub revalidate_secs: u64,

    /// Read documents from a local JSON file instead of the Prismic API
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// GitHub repository ("owner/name") backing utterances comments
    #[arg(long, global = true)]
    pub comments_repo: Option<String>,

    /// Utterances theme
    #[arg(long, global = true, default_value = "github-dark")]
    pub comments_theme: String,

    /// How utterances maps pages to issues
    #[arg(long, global = true, default_value = "pathname")]
    pub comments_issue_term: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Render the blog index to stdout
    Index {
        /// Number of listing pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Render one post page to stdout
    Post { slug: String },
    /// Print the pre-renderable paths as JSON
    Paths,
    /// Write the index and every post page to a directory
    Build {
        #[arg(short, long, default_value = "public")]
        out_dir: PathBuf,
    },
}

/// Where documents come from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    Prismic {
        endpoint: ValidatedUrl,
        access_token: Option<AccessToken>,
    },
    Fixture(PathBuf),
}

/// Resolved configuration, validated and ready to build the site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub command: Command,
    pub source: SourceConfig,
    pub site: SiteOptions,
    pub dates: DateFormatter,
    pub comments: Option<UtterancesWidget>,
    pub verbose: bool,
}

impl SiteConfig {
    /// Resolves configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves configuration, reading environment variables through `env`.
    pub fn resolve_with(
        cli: CommandLineInput,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let source = match cli.fixture {
            Some(path) => SourceConfig::Fixture(path),
            None => {
                let endpoint = env(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                    AppError::MissingConfiguration(format!(
                        "{} environment variable not set",
                        ENDPOINT_ENV
                    ))
                })?;
                let access_token = env(ACCESS_TOKEN_ENV)
                    .filter(|v| !v.trim().is_empty())
                    .map(AccessToken::new)
                    .transpose()?;
                SourceConfig::Prismic {
                    endpoint: ValidatedUrl::parse(endpoint.trim())?,
                    access_token,
                }
            }
        };

        if cli.page_size == 0 || cli.page_size > PRISMIC_MAX_PAGE_SIZE {
            return Err(ValidationError::OutOfBounds {
                value: cli.page_size,
                min: 1,
                max: PRISMIC_MAX_PAGE_SIZE,
            }
            .into());
        }

        let locale: DisplayLocale = cli.locale.parse()?;
        let dates = DateFormatter::new(locale).with_utc_offset_minutes(cli.utc_offset_minutes)?;

        let site = SiteOptions {
            document_type: DocumentType::new(cli.document_type)?,
            page_size: cli.page_size,
            reading_time: ReadingTimeEstimator::new(cli.words_per_minute)?,
            static_generation: StaticGenerationPolicy {
                revalidate_interval_secs: cli.revalidate_secs,
                fallback: cli.fallback.parse::<FallbackPolicy>()?,
            },
            max_static_pages: STATIC_PATHS_MAX_PAGES,
        };

        let comments = cli
            .comments_repo
            .filter(|repo| !repo.trim().is_empty())
            .map(|repo| UtterancesWidget {
                repo,
                issue_term: cli.comments_issue_term,
                theme: cli.comments_theme,
            });

        Ok(SiteConfig {
            command: cli.command,
            source,
            site,
            dates,
            comments,
            verbose: cli.verbose,
        })
    }
}
