//! Play a round in the terminal and submit it to an in-memory ledger.
//!
//! Commands: `<id>` or `flip <id>`, `reset`, `show`, `submit`, `scores`, `quit`.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use card_match::ledger::winners;
use card_match::{
    Address, GameParams, InMemoryLedger, MatchConfig, Round, ScoreLedger, Session, SymbolSet,
};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const PLAYER: &str = "0x00000000000000000000000000000000000000a1";
const COLUMNS: usize = 4;

#[derive(Parser, Debug)]
#[command(author, version, about = "Memory-matching card game")]
struct Args {
    /// Shuffle seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Delay before a mismatched pair is hidden, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Number of pairs on the board (1-6)
    #[arg(long)]
    pairs: Option<usize>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

fn load_config(args: &Args) -> anyhow::Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MatchConfig::from_json(&json)?
        }
        None => MatchConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(delay_ms) = args.delay_ms {
        config = config.with_unflip_delay_ms(delay_ms);
    }
    if let Some(pairs) = args.pairs {
        config = config.with_symbols(SymbolSet::classic().truncated(pairs)?);
    }
    Ok(config)
}

fn render(round: &Round, symbols: &SymbolSet) -> String {
    let mut out = String::new();
    for (i, card) in round.deck().enumerate() {
        let face = if card.is_flipped {
            symbols
                .get(card.symbol_id)
                .map_or_else(|| "?".to_string(), |symbol| symbol.name.clone())
        } else {
            format!("#{}", card.id.raw())
        };
        out.push_str(&format!("[{face:^8}]"));
        if (i + 1) % COLUMNS == 0 {
            out.push('\n');
        }
    }
    out.push_str(&format!("flips: {}", round.move_count()));
    if round.is_complete() {
        out.push_str("  (complete, type `submit`)");
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let ledger = InMemoryLedger::new();
    let now = now_millis();
    let game_id = ledger.create_game(GameParams {
        title: "Terminal match".to_string(),
        description: "Clear the board in as few flips as possible".to_string(),
        owner: Address::new(PLAYER),
        participants: 1,
        number_of_winners: 1,
        start_date: now,
        end_date: now + 24 * 60 * 60 * 1000,
    });
    let player = Address::new(PLAYER);
    ledger.join(game_id, player.clone())?;

    let mut session = Session::new(config)?;
    println!("{}", render(&session.round(), session.symbols()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let command = line.strip_prefix("flip ").unwrap_or(line);

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "show" => {}
            "reset" => {
                session.reset();
            }
            "submit" => match session.submit_to(&ledger, game_id, Some(&player), now_millis()).await {
                Ok(receipt) => println!("score {} saved in tx {}", receipt.submission.move_count, receipt.tx),
                Err(err) => println!("{err}"),
            },
            "scores" => {
                let ranked = ledger.scores(game_id).await?;
                let top: Vec<u32> = match ledger.game(game_id).await? {
                    Some(game) => winners(&game, &ranked).iter().map(|record| record.id).collect(),
                    None => Vec::new(),
                };
                for record in &ranked {
                    let score = if record.played { record.score.to_string() } else { "-".to_string() };
                    let mark = if top.contains(&record.id) { " (winner)" } else { "" };
                    println!("#{} {} {}{}", record.id, record.player, score, mark);
                }
                continue;
            }
            id => match id.parse::<u32>() {
                Ok(id) => {
                    if let Err(err) = session.flip(id.into()) {
                        println!("{err}");
                    }
                }
                Err(_) => {
                    warn!(input = id, "unknown command");
                    println!("commands: <id>, flip <id>, reset, show, submit, scores, quit");
                    continue;
                }
            },
        }

        println!("{}", render(&session.round(), session.symbols()));
    }

    Ok(())
}
