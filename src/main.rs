use anyhow::Context as _;
use clap::Parser;
use indicatif::ProgressBar;
use league_report::analysis::aggregator::StatAggregator;
use league_report::api::client::RiotApiClient;
use league_report::api::fetcher::MatchFetcher;
use league_report::api::generation::AnalysisClient;
use league_report::config::Config;
use league_report::display::output::{
    display_analysis, display_error, display_fetch_failures, display_info,
    display_profile_summary, display_prompt_preview, display_saved, display_success,
    display_warning,
};
use league_report::display::prompt::{PromptFormatter, PromptOptions};
use league_report::error::AppError;
use league_report::snapshot::ReportWriter;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "League Report")]
#[command(about = "Turn a player's recent ranked games into an AI analysis prompt", long_about = None)]
struct Args {
    /// Riot Game Name, or the whole Riot ID as Name#TAG
    game_name: String,

    /// Riot Tag (tag line)
    tag_line: Option<String>,

    /// Region code or platform id (default: RIOT_REGION or na)
    #[arg(short, long)]
    region: Option<String>,

    /// Number of ranked matches to analyze (upstream caps this at 100)
    #[arg(short, long, default_value = "100")]
    matches: usize,

    /// Number of champions listed in the prompt
    #[arg(short, long, default_value = "5")]
    top_champions: usize,

    /// Only overall, role and champion sections plus a short game log
    #[arg(long)]
    compact: bool,

    /// Ask for the analysis in this language, e.g. "Korean (한국어)"
    #[arg(long)]
    language: Option<String>,

    /// Send the prompt to the generation endpoint (needs ANTHROPIC_API_KEY)
    #[arg(long)]
    analyze: bool,

    /// Do not write report files
    #[arg(long)]
    no_save: bool,

    /// Give up when fetching match data takes longer than this many seconds
    #[arg(long, value_name = "SECS")]
    fetch_timeout: Option<u64>,

    /// Directory for report files (default: REPORT_DIR or ~/.league_report)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() {
    setup_tracing_subscriber();
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(region) = &args.region {
        config.region = region.parse()?;
    }
    if let Some(secs) = args.fetch_timeout {
        config.fetch.deadline = Some(Duration::from_secs(secs));
    }
    if let Some(dir) = args.output_dir.clone() {
        config.report_dir = dir;
    }

    let (game_name, tag_line) = parse_riot_id(&args.game_name, args.tag_line.as_deref())?;

    // Fail before spending API calls when analysis is requested without a key.
    let analysis_client = if args.analyze {
        Some(AnalysisClient::from_config(&config)?)
    } else {
        None
    };

    display_info(&format!(
        "Fetching data for {}#{} in {} [{}]",
        game_name,
        tag_line,
        config.region.display_name(),
        config.region.platform()
    ));

    let client = RiotApiClient::new(&config);

    // Step 1: Get account info (PUUID)
    display_info("Step 1: Getting account info...");
    let account = client.get_account(&game_name, &tag_line)?;
    let short_puuid: String = account.puuid.chars().take(8).collect();
    display_success(&format!(
        "Found {}#{} (PUUID: {}...)",
        account.game_name.as_deref().unwrap_or(&game_name),
        account.tag_line.as_deref().unwrap_or(&tag_line),
        short_puuid
    ));

    // Step 2: Fetch ranked matches
    display_info("Step 2: Downloading recent ranked games...");
    let pb = ProgressBar::new(0);
    let fetched = MatchFetcher::new(&client, config.fetch.clone())
        .with_progress(pb)
        .fetch(&account.puuid, args.matches)?;
    display_success(&format!(
        "Downloaded {} of {} games",
        fetched.matches.len(),
        fetched.attempted()
    ));
    display_fetch_failures(&fetched.failures);

    // Step 3: Aggregate
    display_info("Step 3: Building player profile...");
    let mut aggregator = StatAggregator::new(&account.puuid);
    for match_data in &fetched.matches {
        aggregator.add_match(match_data);
    }
    if aggregator.skipped() > 0 {
        display_warning(&format!(
            "{} games did not include this player and were ignored",
            aggregator.skipped()
        ));
    }
    let profile = aggregator.finish()?;

    let mut options = if args.compact {
        PromptOptions::compact()
    } else {
        PromptOptions::default()
    }
    .with_top_champions(args.top_champions);
    if let Some(language) = args.language {
        options = options.with_language(language);
    }
    let prompt = PromptFormatter::new(options).render(&profile);

    display_profile_summary(&profile);

    // Step 4: Optional analysis
    let analysis = match &analysis_client {
        Some(analysis_client) => {
            display_info("Step 4: Requesting AI analysis...");
            match analysis_client.analyze(&prompt) {
                Ok(analysis) => {
                    display_analysis(&analysis);
                    Some(analysis)
                }
                Err(e) => {
                    display_warning(&format!("Analysis failed: {}", e));
                    None
                }
            }
        }
        None => None,
    };

    if !args.no_save {
        let writer = ReportWriter::with_local_timestamp(&config.report_dir, &profile.player_name);
        let saved = writer
            .save(
                config.region.code(),
                &profile,
                &prompt,
                analysis.as_ref().map(|a| a.full_text.as_str()),
            )
            .with_context(|| format!("Failed to save report to {}", config.report_dir.display()))?;
        display_saved(&saved);
    }

    if analysis.is_none() {
        display_prompt_preview(&prompt);
    }

    Ok(())
}

/// Accepts `Name TAG` as two arguments or `Name#TAG` as one.
fn parse_riot_id(game_name: &str, tag_line: Option<&str>) -> Result<(String, String), AppError> {
    let (name, tag) = match tag_line {
        Some(tag) => (game_name, tag),
        None => game_name.split_once('#').ok_or(AppError::InvalidRiotId)?,
    };
    let (name, tag) = (name.trim(), tag.trim().trim_start_matches('#'));
    if name.is_empty() || tag.is_empty() {
        return Err(AppError::InvalidRiotId);
    }
    Ok((name.to_string(), tag.to_string()))
}

fn setup_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_level(true)
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}
