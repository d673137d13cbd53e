//! Index Alias - Directory-style aliases for static sites on S3
//!
//! Copies every nested `index.html` of an uploaded site to its
//! directory key so `foo/index.html` is also served at `foo/`.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use index_alias::config::{IndexAliasConfig, LoggingConfig};
use index_alias::error::Result;
use index_alias::event::S3ObjectCreatedEvent;
use index_alias::key::ObjectKey;
use index_alias::replicator::Replicator;
use index_alias::store::{DryRunStore, ObjectStore, S3Store};

/// Index Alias - Directory-style aliases for static sites on S3
#[derive(Parser)]
#[command(name = "index-alias")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "index-alias.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Alias every index document under the publish root
    Deploy {
        /// Publish root (overrides site.root)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Target bucket (overrides bucket.name)
        #[arg(short, long)]
        bucket: Option<String>,

        /// Log the copies without calling the backend
        #[arg(long)]
        dry_run: bool,
    },

    /// Alias a single uploaded key
    Key {
        /// Bucket key of the index document, e.g. blog/2024/index.html
        key: String,

        /// Target bucket (overrides bucket.name)
        #[arg(short, long)]
        bucket: Option<String>,

        /// Log the copy without calling the backend
        #[arg(long)]
        dry_run: bool,
    },

    /// Alias the object named by an S3 "Object Created" EventBridge notification
    Event {
        /// Notification JSON file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Log the copy without calling the backend
        #[arg(long)]
        dry_run: bool,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "index-alias.toml")]
        output: PathBuf,

        /// Bucket name
        #[arg(long)]
        bucket: Option<String>,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { output, bucket } = &cli.command {
        return run_init(output, bucket.clone());
    }
    if let Commands::Validate = cli.command {
        return run_validate(&cli.config);
    }

    let config = IndexAliasConfig::load_or_default(&cli.config)?;

    // Initialize logging
    init_logging(&config.logging, cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Deploy { root, bucket, dry_run } => run_deploy(config, root, bucket, dry_run).await,
        Commands::Key { key, bucket, dry_run } => match ObjectKey::parse(&key) {
            Ok(key) => run_key(config, key, bucket, dry_run).await,
            Err(e) => Err(e),
        },
        Commands::Event { file, dry_run } => run_event(config, file, dry_run).await,
        Commands::Init { .. } | Commands::Validate => Ok(()),
    };

    if let Err(e) = &result {
        tracing::error!("Run aborted: {}", e);
    }
    result
}

/// Initialize logging
fn init_logging(config: &LoggingConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(config.level.as_str());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Open the backend for `bucket`
fn open_store(config: &IndexAliasConfig, bucket: Option<String>, dry_run: bool) -> Result<Box<dyn ObjectStore>> {
    let mut bucket_config = config.bucket.clone();
    if let Some(name) = bucket {
        bucket_config.name = name;
    }

    if dry_run {
        tracing::info!("Dry run: no objects will be written to {}", bucket_config.name);
        return Ok(Box::new(DryRunStore::new(bucket_config.name)));
    }
    Ok(Box::new(S3Store::from_config(&bucket_config)?))
}

/// Alias every index document under the publish root
async fn run_deploy(
    config: IndexAliasConfig,
    root: Option<PathBuf>,
    bucket: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let root = root.unwrap_or_else(|| config.root().to_path_buf());
    let store = open_store(&config, bucket, dry_run)?;

    tracing::info!("Deploying aliases from {} to bucket {}", root.display(), store.bucket());

    let summary = Replicator::new(config.index_document())
        .replicate_aliases(&root, store.as_ref())
        .await?;

    for (source, alias) in &summary.copied {
        println!("{} {}", source, alias);
    }
    Ok(())
}

/// Alias a single uploaded key
async fn run_key(config: IndexAliasConfig, key: ObjectKey, bucket: Option<String>, dry_run: bool) -> Result<()> {
    let store = open_store(&config, bucket, dry_run)?;

    match Replicator::new(config.index_document())
        .replicate_key(store.as_ref(), &key)
        .await?
    {
        Some(alias) => println!("{} {}", key, alias),
        None => tracing::info!("{} has no directory alias, nothing to do", key),
    }
    Ok(())
}

/// Alias the object named by an Object Created notification
async fn run_event(config: IndexAliasConfig, file: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let json = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let event = S3ObjectCreatedEvent::from_json(&json)?;
    tracing::debug!("Received {:?}", event);

    // The notification names its own bucket
    run_key(
        config,
        event.key()?,
        Some(event.bucket().to_string()),
        dry_run,
    )
    .await
}

/// Initialize a new configuration file
fn run_init(output: &Path, bucket: Option<String>) -> Result<()> {
    let bucket = bucket.unwrap_or_else(|| index_alias::config::DEFAULT_BUCKET.to_string());
    let config_content = format!(r#"# Index Alias Configuration
# Generated configuration file

[bucket]
name = "{bucket}"
region = "us-east-1"
# endpoint = "http://localhost:9000"
path_style = false
# access_key = "AKIA..."
# secret_key = "..."

[site]
root = "public"
index_document = "index.html"

[logging]
level = "info"
format = "pretty"
"#);

    // Refuse to write a file that would not load back
    IndexAliasConfig::from_str(&config_content)?;

    std::fs::write(output, config_content)?;
    println!("Configuration file created: {}", output.display());
    println!("\nEdit the file to configure your bucket and publish root.");
    println!("Then run: index-alias --config {} deploy", output.display());

    Ok(())
}

/// Validate configuration
fn run_validate(config_path: &Path) -> Result<()> {
    match IndexAliasConfig::from_file(config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!("  Bucket: {}", config.bucket.name);
            println!("  Region: {}", config.bucket.region);
            println!("  Endpoint: {}", config.bucket.endpoint.as_deref().unwrap_or("(aws)"));
            println!(
                "  Credentials: {}",
                if config.bucket.access_key.is_some() { "static" } else { "environment" }
            );
            println!("  Publish Root: {}", config.root().display());
            println!("  Index Document: {}", config.index_document());
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            Err(e)
        }
    }
}
