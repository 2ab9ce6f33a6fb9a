use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use keyword_pipeline::catalog::{self, CountrySelector};
use keyword_pipeline::config::{self, Config, Keys};
use keyword_pipeline::error::MissingKeys;
use keyword_pipeline::keywordtool::client::{KeywordToolClient, MetricsNetwork};
use keyword_pipeline::output::terminal;
use keyword_pipeline::pipeline::audit::{AuditOptions, DEFAULT_AUDIT_FILE};
use keyword_pipeline::pipeline::fetch::{self, FetchOptions};
use keyword_pipeline::pipeline::rank::{self, RankOptions, SortBy, SortOrder};
use keyword_pipeline::pipeline::run::{self, AuditSettings, RunOptions};
use keyword_pipeline::rate_limit::{parse_pause, RetryPolicy};

/// keyword-pipeline: brand keyword volumes, Play competitor audit and capped
/// rankings per country.
///
/// Fetches search volumes for every brand in the catalog, finds the
/// strongest Play competitor for each brand, and writes ranked CSVs
/// filtered to brands your portfolio doesn't use yet.
#[derive(Parser)]
#[command(name = "keyword-pipeline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: fetch, audit, then rank once per cap
    Run(RunArgs),

    /// Fetch KeywordTool volumes into <cc>_results.csv
    Fetch {
        /// Country code or "all"
        #[arg(long, default_value = "all")]
        country: CountrySelector,

        #[arg(long, value_enum, default_value_t = MetricsNetwork::GoogleSearchNetwork)]
        metrics_network: MetricsNetwork,

        #[command(flatten)]
        fetch: FetchArgs,

        #[command(flatten)]
        keys: KeyArgs,

        /// Directory for the CSV files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Audit every brand: Play competitor, installs/day, banned, used
    Audit {
        /// Country code or "all"
        #[arg(long, default_value = "all")]
        country: CountrySelector,

        #[command(flatten)]
        audit: AuditArgs,

        #[command(flatten)]
        keys: KeyArgs,

        /// Audit CSV to write
        #[arg(long, default_value = DEFAULT_AUDIT_FILE)]
        out: PathBuf,
    },

    /// Merge an audit CSV with volume CSVs, then cap, filter and sort
    Rank {
        /// Audit CSV to read
        #[arg(long, default_value = DEFAULT_AUDIT_FILE)]
        audit: PathBuf,

        /// Country code or "all"
        #[arg(long, default_value = "all")]
        country: CountrySelector,

        /// Upper volume cap
        #[arg(long)]
        cap: Option<u64>,

        /// Keep only brands not already used in your portfolio
        #[arg(long)]
        only_nonused: bool,

        #[command(flatten)]
        rank: RankArgs,

        /// Directory holding <cc>_results.csv
        #[arg(long, default_value = ".")]
        volume_dir: PathBuf,

        /// Ranked CSV to write
        #[arg(long, default_value = "niche_competitors_keyapp_sorted.csv")]
        out: PathBuf,
    },

    /// Save API keys to the key file and exit
    SaveKeys {
        #[command(flatten)]
        keys: KeyArgs,
    },

    /// List supported countries
    Countries,

    /// Show configured keys (masked), key file and cache statistics
    Status {
        /// Empty the response cache first
        #[arg(long)]
        clear_cache: bool,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// KeywordTool API key (else KEYWORDTOOL_KEY, else key file)
    #[arg(long)]
    keywordtool_key: Option<String>,

    /// Keyapp API token (else KEYAPP_KEY, else key file)
    #[arg(long)]
    keyapp_key: Option<String>,

    /// AppstoreSpy API key, optional (else APPSTORESPY_KEY, else key file)
    #[arg(long)]
    appstorespy_key: Option<String>,
}

impl KeyArgs {
    fn into_keys(self) -> Keys {
        Keys {
            keywordtool_key: self.keywordtool_key,
            keyapp_key: self.keyapp_key,
            appstorespy_key: self.appstorespy_key,
        }
    }
}

#[derive(Args)]
struct FetchArgs {
    /// Keywords per KeywordTool request (1-1000)
    #[arg(long, default_value = "700")]
    batch_size: usize,

    /// Query canonical brand names only, not spelling variants
    #[arg(long)]
    no_variants: bool,

    /// Skip the KeywordTool health check
    #[arg(long)]
    skip_health: bool,

    /// Pause between batches, seconds
    #[arg(long, default_value = "0.7", value_parser = parse_pause)]
    fetch_sleep: Duration,

    /// KeywordTool attempts per batch
    #[arg(long, default_value = "5")]
    fetch_retries: u32,

    /// Exponential backoff base, seconds
    #[arg(long, default_value = "1.5")]
    fetch_backoff: f64,

    /// HTTP timeout, seconds
    #[arg(long, default_value = "60")]
    fetch_timeout: u64,
}

impl FetchArgs {
    fn options(&self, network: MetricsNetwork, out_dir: PathBuf) -> FetchOptions {
        FetchOptions {
            batch_size: self.batch_size,
            network,
            variants: !self.no_variants,
            pause: self.fetch_sleep,
            retry: RetryPolicy::new(self.fetch_retries, self.fetch_backoff),
            timeout: Duration::from_secs(self.fetch_timeout),
            skip_health: self.skip_health,
            out_dir,
        }
    }
}

#[derive(Args)]
struct AuditArgs {
    /// Play results to consider per brand
    #[arg(long, default_value = "10")]
    audit_topn: usize,

    /// Keyapp API base URL
    #[arg(long, default_value = keyword_pipeline::keyapp::client::DEFAULT_BASE_URL)]
    keyapp_base_url: String,

    /// Pause between Play searches, seconds
    #[arg(long, default_value = "0.2", value_parser = parse_pause)]
    audit_play_sleep: Duration,

    /// Pause between AppstoreSpy lookups, seconds
    #[arg(long, default_value = "0.15", value_parser = parse_pause)]
    audit_aspy_sleep: Duration,

    /// Days before cached Play / AppstoreSpy responses are refetched
    #[arg(long, default_value = "3")]
    cache_ttl_days: i64,

    /// Candidates enriched in parallel per brand
    #[arg(long, default_value = "1")]
    concurrency: usize,
}

impl AuditArgs {
    fn settings(&self) -> AuditSettings {
        AuditSettings {
            keyapp_base_url: self.keyapp_base_url.clone(),
            play_pause: self.audit_play_sleep,
            aspy_pause: self.audit_aspy_sleep,
            cache_ttl_days: self.cache_ttl_days,
            options: AuditOptions {
                top_n: self.audit_topn,
                concurrency: self.concurrency.max(1),
            },
        }
    }
}

#[derive(Args)]
struct RankArgs {
    /// Lower volume cap
    #[arg(long)]
    cap_lower: Option<u64>,

    /// Rows with a competitor bypass the caps
    #[arg(long)]
    cap_exempt_competitors: bool,

    /// Keep only rows with a competitor
    #[arg(long)]
    only_with_competitor: bool,

    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    sort: SortOrder,

    #[arg(long, value_enum, default_value_t = SortBy::Volume)]
    sort_by: SortBy,

    /// Keep the first N rows per country after sorting
    #[arg(long)]
    top_per_country: Option<usize>,
}

impl RankArgs {
    fn options(&self, cap: Option<u64>, only_nonused: bool) -> RankOptions {
        RankOptions {
            cap,
            cap_lower: self.cap_lower,
            cap_exempt_competitors: self.cap_exempt_competitors,
            only_nonused,
            only_with_competitor: self.only_with_competitor,
            sort: self.sort,
            sort_by: self.sort_by,
            top_per_country: self.top_per_country,
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// Country code or "all"
    #[arg(long, default_value = "br")]
    country: CountrySelector,

    /// Comma separated upper caps; one ranked file per cap
    #[arg(long, default_value = "")]
    caps: String,

    #[arg(long, value_enum, default_value_t = MetricsNetwork::GoogleSearch)]
    metrics_network: MetricsNetwork,

    /// Force non-used filtering (wins over --include-used)
    #[arg(long)]
    only_nonused: bool,

    /// Keep brands already used in your portfolio
    #[arg(long)]
    include_used: bool,

    #[command(flatten)]
    rank: RankArgs,

    /// Ranked CSV name, overriding <cc>_competitors_*.csv
    #[arg(long)]
    rank_out: Option<PathBuf>,

    #[command(flatten)]
    fetch: FetchArgs,

    #[command(flatten)]
    audit: AuditArgs,

    #[command(flatten)]
    keys: KeyArgs,

    /// Directory for every file the pipeline writes
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

/// Seconds from the command line; negative or non-finite means no pause.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keyword_pipeline=info")),
        )
        .init();

    let cli = Cli::parse();

    match dispatch(cli.command).await {
        Err(e) if e.is::<MissingKeys>() => {
            eprintln!("{} {e}", "error:".red().bold());
            std::process::exit(2);
        }
        other => other,
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => {
            let config = Config::load().with_overrides(args.keys.into_keys());
            let only_nonused = run::filter_nonused(args.include_used, args.only_nonused);

            let opts = RunOptions {
                selector: args.country,
                caps: run::parse_caps(&args.caps),
                rank: args.rank.options(None, only_nonused),
                rank_out: args.rank_out,
                fetch: args.fetch.options(args.metrics_network, args.out_dir.clone()),
                audit: args.audit.settings(),
                out_dir: args.out_dir,
            };
            info!(country = %opts.selector, caps = ?opts.caps, "Starting pipeline");
            run::run(&config, &opts).await?;
        }

        Commands::Fetch {
            country,
            metrics_network,
            fetch,
            keys,
            out_dir,
        } => {
            let config = Config::load().with_overrides(keys.into_keys());
            let opts = fetch.options(metrics_network, out_dir);
            let client = KeywordToolClient::new(config.require_keywordtool()?, opts.timeout)?;
            fetch::run(&client, &country.countries(), &opts).await?;
            println!("\n{}", "Done.".green());
        }

        Commands::Audit {
            country,
            audit,
            keys,
            out,
        } => {
            let config = Config::load().with_overrides(keys.into_keys());
            println!("Keys: {}", config.masked_summary());
            run::run_audit(&config, &audit.settings(), &country.countries(), &out).await?;
        }

        Commands::Rank {
            audit,
            country,
            cap,
            only_nonused,
            rank,
            volume_dir,
            out,
        } => {
            let opts = rank.options(cap, only_nonused);
            let rows = rank::run(&audit, &volume_dir, &country.countries(), &opts, &out)?;
            terminal::display_ranked(&out.display().to_string(), &rows, 20);
        }

        Commands::SaveKeys { keys } => {
            let config = Config::load();
            config::save_keys(&config.key_file, &keys.into_keys())?;
            println!("Keys saved to {}", config.key_file.display());
        }

        Commands::Countries => {
            println!("{}", "=== Supported countries ===".bold());
            for code in catalog::supported_countries() {
                let country = catalog::country(code)?;
                let brands = catalog::canonical_list(code)?.len();
                println!(
                    "  {}  {:<10} lang={} location={} brands={}",
                    country.code.bold(),
                    country.title,
                    country.language,
                    country.location_id,
                    brands,
                );
            }
        }

        Commands::Status { clear_cache } => {
            let config = Config::load();
            keyword_pipeline::status::show(&config, clear_cache).await?;
        }
    }

    Ok(())
}
