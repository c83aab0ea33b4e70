use clap::{Parser, Subcommand};
use log::{error, info};
use twohosun_core::config::Config;
use twohosun_core::db::{KeyValueStore, SqliteStore};
use twohosun_core::search::SearchHistory;
use twohosun_core::validation::validate_nickname;
use twohosun_core::voting::{DominantSide, VoteTally};

#[derive(Parser)]
#[command(name = "twohosun", about = "Vote tallies and recent searches for TwoHoSun")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the vote bar for a post
    Tally {
        total: u64,
        agree: u64,
        disagree: u64,
    },
    /// Inspect or edit the persisted recent searches
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Check a nickname against the local rules
    Nickname { nickname: String },
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Add { term: String },
    Remove { index: usize },
    Clear,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if let Err(e) = run(cli.command, &config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match command {
        Commands::Tally { total, agree, disagree } => {
            let summary = VoteTally::new(total, agree, disagree).summary();
            let winner = match summary.dominant {
                DominantSide::Agree => "buy",
                DominantSide::Disagree => "don't buy",
                DominantSide::Tie => "tie",
            };
            println!("buy: {}%", summary.agree_label);
            println!("don't buy: {}%", summary.disagree_label);
            println!("leading: {}", winner);
        }
        Commands::History { action } => {
            let store = SqliteStore::connect(&config.database_url).await?;
            let key = &config.search.history_key;
            let entries = store.get(key).await?.unwrap_or_default();
            let mut history = SearchHistory::from_entries(entries, config.search.history_limit);

            let changed = match action {
                HistoryAction::List => false,
                HistoryAction::Add { term } => {
                    history.push(&term);
                    true
                }
                HistoryAction::Remove { index } => {
                    let removed = history.remove(index)?;
                    info!("Removed {:?}", removed);
                    true
                }
                HistoryAction::Clear => {
                    history.clear();
                    true
                }
            };

            if changed {
                store.set(key, history.entries()).await?;
            }
            for (i, term) in history.entries().iter().enumerate() {
                println!("{:>2}. {}", i, term);
            }
        }
        Commands::Nickname { nickname } => {
            let result = validate_nickname(&nickname);
            println!("{}", result.message());
            result.into_result()?;
        }
    }

    Ok(())
}
