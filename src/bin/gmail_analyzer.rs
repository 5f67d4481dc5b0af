use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;

use gmail_analyzer::auth::{TokenManager, token_store};
use gmail_analyzer::config::{Config, config_dir, load_config};
use gmail_analyzer::domain::{RunTally, UnsubscribeOutcome};
use gmail_analyzer::gmail::GmailClient;
use gmail_analyzer::mail::{SubscriptionOrchestrator, scan};
use gmail_analyzer::report::Report;
use gmail_analyzer::terminal::run_subscriptions;

#[derive(Parser)]
#[command(name = "gmail_analyzer", version)]
#[command(about = "Find the newsletters filling a Gmail category", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Number of senders to show
    #[arg(long, global = true, default_value_t = 10)]
    top: usize,

    /// Gmail user id to fetch data for
    #[arg(long, global = true, default_value = "me")]
    user: String,

    /// Debug logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a summary of the category's senders
    Analyze,

    /// Browse newsletters and look up their unsubscribe links
    Subscriptions {
        /// Resolve every listed sender and print the results instead of opening the UI
        #[arg(long)]
        all: bool,
    },

    /// Store the OAuth client secret in keyring
    SetClientSecret {
        #[arg(long)]
        client_id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // the interactive UI owns the terminal, so its logs go to a file
    let interactive = matches!(cli.cmd, Command::Subscriptions { all: false });
    init_logging(cli.verbose, interactive)?;

    match cli.cmd {
        Command::SetClientSecret { client_id } => {
            eprintln!("Paste client secret (end with Ctrl-D):");
            let mut secret = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut secret)?;
            token_store::save_client_secret(&client_id, secret.trim())?;
            println!("Saved client secret for client_id {}", client_id);
            Ok(())
        }

        Command::Analyze => {
            let (cfg, client) = connect(&cli.user)?;
            let scan = scan(&client, &cli.user, cfg.category_label())?;
            print!("{}", Report::build(&scan, cli.top));
            Ok(())
        }

        Command::Subscriptions { all } => {
            let (cfg, client) = connect(&cli.user)?;
            let scan = scan(&client, &cli.user, cfg.category_label())?;
            let newsletters: Vec<_> = scan.newsletters.into_iter().take(cli.top).collect();
            let orchestrator = SubscriptionOrchestrator::new(&client, &cli.user);

            if all {
                print_tally(&orchestrator.run_all(&newsletters));
                Ok(())
            } else {
                run_subscriptions(&orchestrator, newsletters)
            }
        }
    }
}

fn init_logging(verbose: bool, to_file: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    if to_file {
        let path = config_dir()?.join("gmail_analyzer.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| anyhow!("cannot open log file {}: {e}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn connect(user: &str) -> Result<(Config, GmailClient)> {
    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let token = TokenManager::from_config(&cfg, user)?.access_token()?;
    let client = GmailClient::new(cfg.api_base_url(), token)?;
    Ok((cfg, client))
}

fn print_tally(tally: &RunTally) {
    for (newsletter, outcome) in &tally.results {
        println!("\n{newsletter} ({} messages)", newsletter.count);
        match outcome {
            UnsubscribeOutcome::Resolved(urls) => {
                for (i, url) in urls.iter().enumerate() {
                    println!("  {}. {url}", i + 1);
                }
            }
            other => println!("  {other}"),
        }
    }

    println!("\n=== Summary ===");
    println!("Unsubscribe links found: {}", tally.success);
    println!("No usable unsubscribe link: {}", tally.failed);
}
