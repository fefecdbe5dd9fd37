//! profilecard - GitHub profile readme card generator

mod cli;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use profilecard_core::config::DEFAULT_CONFIG_FILE;
use profilecard_core::models::RepositoryAffiliation;
use profilecard_core::{
    image_to_ascii, CardConfig, CommitCache, Credentials, StatsTracker, SvgBuilder,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "profilecard",
    version,
    about = "GitHub profile readme card generator",
    long_about = "Keeps a GitHub profile readme card up to date.\n\
                  \n\
                  Queries the GitHub GraphQL API for account statistics, scrapes the\n\
                  github-profile-summary-cards badge, caches commit counts per year, and\n\
                  stamps the results into an SVG template.\n\
                  \n\
                  Examples:\n\
                    profilecard update                       # Refresh the card template\n\
                    profilecard update --birth-date 2004-01-12\n\
                    profilecard ascii --image me.png         # Image to ASCII art\n\
                    profilecard build                        # Render profile.svg\n\
                    profilecard cache show                   # Inspect the commit cache\n\
                    profilecard cache prune --max-age 5\n\
                  \n\
                  Environment Variables:\n\
                    USER_NAME                   # GitHub login (also read from .env)\n\
                    ACCESS_TOKEN                # GitHub token (also read from .env)\n\
                    PROFILECARD_CONFIG          # Settings file (default: profilecard.toml)\n\
                    PROFILECARD_LOG             # Log filter, e.g. debug or profilecard_core=trace\n\
                    PROFILECARD_NO_COLOR        # Disable ANSI colors"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// GitHub login
    #[arg(long, global = true, env = "USER_NAME")]
    user: Option<String>,

    /// GitHub access token
    #[arg(long, global = true, env = "ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Settings file (default: profilecard.toml, optional)
    #[arg(long, global = true, env = "PROFILECARD_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "PROFILECARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh stats and patch the card template in place
    Update {
        /// Template to patch (default from config)
        #[arg(long)]
        template: Option<PathBuf>,
        /// Start of the age counter, YYYY-MM-DD (default: config, then account creation)
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        /// Repository affiliation filter, repeatable: owner, collaborator, organization_member
        #[arg(long = "affiliation")]
        affiliations: Vec<RepositoryAffiliation>,
        /// Prune cached years older than `prune_years` first
        #[arg(long)]
        prune: bool,
    },
    /// Render the profile SVG from ASCII art and the configured info entries
    Build {
        /// ASCII art file (default from config)
        #[arg(long)]
        ascii: Option<PathBuf>,
        /// Output SVG (default from config)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Convert an image to ASCII art
    Ascii {
        /// Source image (default from config)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Output text file (default from config)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Width in characters
        #[arg(long)]
        width: Option<u32>,
        /// Height in lines
        #[arg(long)]
        height: Option<u32>,
        /// Brightness multiplier
        #[arg(long)]
        brightness: Option<f32>,
        /// Also print the art to stdout
        #[arg(long)]
        print: bool,
    },
    /// Inspect and maintain the commit cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached commit counts
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the total over all users and years
    Total,
    /// Drop years older than the horizon
    Prune {
        /// Horizon in years (default: prune_years from config)
        #[arg(long)]
        max_age: Option<i32>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Before parsing, so clap's env fallbacks see .env values
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    let no_color = cli.no_color;

    match cli.command {
        Command::Update {
            template,
            birth_date,
            affiliations,
            prune,
        } => {
            let credentials = Credentials::new(cli.user, cli.token)
                .context("GitHub credentials are required (set USER_NAME and ACCESS_TOKEN)")?;
            run_update(
                credentials,
                config,
                template,
                birth_date,
                affiliations,
                prune,
            )
            .await?;
        }
        Command::Build { ascii, output } => {
            run_build(&config, ascii, output)?;
        }
        Command::Ascii {
            image,
            output,
            width,
            height,
            brightness,
            print,
        } => {
            run_ascii(&config, image, output, width, height, brightness, print)?;
        }
        Command::Cache { action } => {
            run_cache(&config, action, no_color)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("PROFILECARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(explicit: Option<&PathBuf>) -> Result<CardConfig> {
    let (path, is_explicit) = match explicit {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    tracing::debug!(path = %path.display(), explicit = is_explicit, "Loading settings");
    CardConfig::load(&path, is_explicit)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

async fn run_update(
    credentials: Credentials,
    mut config: CardConfig,
    template: Option<PathBuf>,
    birth_date: Option<NaiveDate>,
    affiliations: Vec<RepositoryAffiliation>,
    prune: bool,
) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    if !affiliations.is_empty() {
        config.affiliations = affiliations;
    }
    let template = template.unwrap_or_else(|| config.template.clone());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    spinner.set_message(format!("Resolving GitHub user {}...", credentials.username));
    let mut tracker = match StatsTracker::connect(credentials, &config).await {
        Ok(tracker) => tracker,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).context("Failed to connect to GitHub");
        }
    };

    if let Some(reason) = cli::recovery_reason(tracker.cache()) {
        spinner.suspend(|| {
            eprintln!("Warning: commit cache was reset ({})", reason);
        });
    }

    if prune {
        spinner.set_message("Pruning commit cache...");
        let removed = tracker
            .cache_mut()
            .prune(config.prune_years)
            .context("Failed to prune commit cache")?;
        spinner.suspend(|| println!("Pruned {} cached year(s)", removed));
    }

    let birth = birth_date
        .or(config.birth_date)
        .unwrap_or_else(|| tracker.account_created());
    let today = chrono::Local::now().date_naive();

    spinner.set_message("Refreshing card...");
    let report = tracker.refresh_card(&template, birth, today).await;
    spinner.finish_and_clear();
    let report =
        report.with_context(|| format!("Failed to refresh card {}", template.display()))?;

    println!(
        "{}",
        cli::format_update_report(&report, tracker.card_stats(), &template)
    );
    print!("{}", report.summary());

    Ok(())
}

fn run_build(config: &CardConfig, ascii: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let ascii = ascii.unwrap_or_else(|| config.profile.ascii.clone());
    let output = output.unwrap_or_else(|| config.profile.output.clone());

    let builder = SvgBuilder::from_ascii_file(&ascii, config.profile.info.clone())
        .with_context(|| format!("Failed to read ASCII art from {}", ascii.display()))?;
    builder
        .write_to(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({} art lines, {} info entries)",
        output.display(),
        builder.ascii_lines().len(),
        builder.info().len()
    );
    Ok(())
}

fn run_ascii(
    config: &CardConfig,
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    brightness: Option<f32>,
    print: bool,
) -> Result<()> {
    let image = image.unwrap_or_else(|| config.ascii.image.clone());
    let output = output.unwrap_or_else(|| config.ascii.output.clone());

    let mut options = config.ascii.options();
    if let Some(width) = width {
        options.width = width;
    }
    if let Some(height) = height {
        options.height = height;
    }
    if let Some(brightness) = brightness {
        options.brightness = brightness;
    }

    let art = image_to_ascii(&image, &options)
        .with_context(|| format!("Failed to convert {}", image.display()))?;
    std::fs::write(&output, &art)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if print {
        println!("{}", art);
    }
    println!(
        "Wrote {} ({}x{})",
        output.display(),
        options.width,
        options.height
    );
    Ok(())
}

fn run_cache(config: &CardConfig, action: CacheAction, no_color: bool) -> Result<()> {
    let mut cache = CommitCache::load(&config.cache_file);
    if let Some(reason) = cli::recovery_reason(&cache) {
        eprintln!("Warning: commit cache could not be read ({})", reason);
    }

    match action {
        CacheAction::Show { json } => {
            println!("{}", cli::format_cache_table(&cache, json, no_color));
        }
        CacheAction::Total => {
            println!("{}", cache.total_commits());
        }
        CacheAction::Prune { max_age } => {
            let max_age = max_age.unwrap_or(config.prune_years);
            let removed = cache
                .prune(max_age)
                .context("Failed to prune commit cache")?;
            println!(
                "Pruned {} cached year(s) older than {} years from {}",
                removed,
                max_age,
                cache.path().display()
            );
        }
    }

    Ok(())
}
