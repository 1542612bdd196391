/// X Auto Poster
///
/// Generates one AI-written tweet per scheduled run and posts it to X.
///
/// Each invocation:
/// - resolves which content type (info/question/poll/cricket) this run gets,
///   deterministically from the date and the run index
/// - may skip on purpose (~5% of runs) to vary posting cadence
/// - builds the prompt, calls Gemini once, parses a poll if applicable
/// - posts via the X API v2, unless --dry-run
///
/// Exit status: 0 on success or deterministic skip, 2 for input/config
/// errors, 1 for upstream service failures.

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use x_auto_poster::config::Config;
use x_auto_poster::generate::{GeminiClient, TweetDraft};
use x_auto_poster::poster::TwitterClient;
use x_auto_poster::prompts;
use x_auto_poster::rotation::{RunContext, Slot};

#[derive(Debug, Parser)]
#[command(name = "x_auto_poster", about = "Generate a tweet with Gemini and post it to X")]
struct Args {
    /// Which of the day's scheduled slots is executing (1-based).
    /// Omit for a manual run, which infers a slot from time of day.
    #[arg(long, env = "RUN_INDEX")]
    run_index: Option<u8>,

    /// Force a slot on the manual path: morning, afternoon, or evening
    #[arg(long, conflicts_with = "run_index")]
    slot: Option<String>,

    /// Select and generate but do not post
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    if let Some(run) = args.run_index {
        if run < 1 || run > config.daily_run_slots {
            log::error!(
                "Run index {} out of range (configured slots: 1..={})",
                run,
                config.daily_run_slots
            );
            return ExitCode::from(2);
        }
    }

    let forced_slot = match args.slot.as_deref().map(str::parse::<Slot>).transpose() {
        Ok(slot) => slot,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(2);
        }
    };

    if !args.dry_run && config.twitter_bearer_token.is_none() {
        log::error!("TWITTER_BEARER_TOKEN must be set (or use --dry-run)");
        return ExitCode::from(2);
    }

    let ctx = RunContext::resolve(Utc::now(), args.run_index, forced_slot, &config.slot_boundaries);
    log::info!(
        "Content type: {} (day {}, run {})",
        ctx.content_type,
        ctx.day_of_year,
        ctx.run_index.map_or("manual".to_string(), |r| r.to_string())
    );

    // By design, not a failure: some runs deliberately post nothing.
    if ctx.skip {
        log::info!(
            "Deterministic skip for day {} run {}; exiting without posting",
            ctx.day_of_year,
            ctx.run_index.unwrap_or(0)
        );
        return ExitCode::SUCCESS;
    }

    match run(&config, &args, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Run failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(config: &Config, args: &Args, ctx: &RunContext) -> anyhow::Result<()> {
    let run_index = ctx.run_index.unwrap_or(1);
    let prompt = prompts::build_prompt(ctx.content_type, ctx.day_of_year, run_index);

    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let draft = gemini.generate(ctx.content_type, &prompt).await?;

    match &draft {
        TweetDraft::Text(text) => println!("{}", text),
        TweetDraft::Poll(poll) => {
            println!("{}", poll.question);
            for (i, opt) in poll.options.iter().enumerate() {
                println!("  Poll option {}: {}", i + 1, opt);
            }
        }
    }

    if args.dry_run {
        log::info!("[dry-run] Would post the above.");
        return Ok(());
    }

    let bearer = config
        .twitter_bearer_token
        .clone()
        .context("TWITTER_BEARER_TOKEN must be set")?;
    let twitter = TwitterClient::new(bearer);
    twitter.post(&draft).await?;

    Ok(())
}
