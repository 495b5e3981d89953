use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use klondike_engine::{
    RuleConfig, Solitaire,
    action::{Feedback, apply_intent, format_intents, parse_intents},
    rules::{StackingRule, VacancyRule},
};
use std::io::{IsTerminal, Read, stdin};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deal a new game and print the table
    Deal {
        /// Seed for a reproducible deal
        #[arg(long, value_name = "NUM")]
        seed: Option<u64>,
        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Deal a game and play a script of intents against it
    Play {
        /// Seed for a reproducible deal
        #[arg(long, value_name = "NUM")]
        seed: Option<u64>,
        #[command(flatten)]
        rules: RuleArgs,
        /// Optional file to read the script from, otherwise stdin
        file: Option<String>,
    },
}

#[derive(Args)]
struct RuleArgs {
    /// Cards turned per draw (1-3)
    #[arg(short, long, default_value_t = 3, value_name = "NUM")]
    draw: usize,
    /// Allow any card, not just Kings, onto a vacant depot
    #[arg(long)]
    any_card_in_vacancy: bool,
    /// Forbid moving cards back off the foundations
    #[arg(long)]
    no_take_back: bool,
    /// Deal every depot card face-up
    #[arg(long)]
    tableau_visible: bool,
    /// Stack depot cards regardless of color
    #[arg(long)]
    any_color: bool,
}

impl RuleArgs {
    fn to_rules(&self) -> Result<RuleConfig> {
        if !(1..=3).contains(&self.draw) {
            bail!("Invalid draw count {}, expected 1-3", self.draw);
        }
        let vacancy = if self.any_card_in_vacancy {
            VacancyRule::AnyCard
        } else {
            VacancyRule::KingsOnly
        };
        let stacking = if self.any_color {
            StackingRule::AnyColor
        } else {
            StackingRule::AlternatingColors
        };
        Ok(RuleConfig::default()
            .with_draw_count(self.draw as isize)
            .with_vacancy(vacancy)
            .with_stacking(stacking)
            .with_foundation_take_back(!self.no_take_back)
            .with_tableau_visible(self.tableau_visible))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Deal { seed, rules } => {
            let seed = seed.unwrap_or_else(rand::random);
            let game = Solitaire::with_seed(seed, rules.to_rules()?);
            println!("GameId: {seed}\n{}", game.to_pretty_string());
        }
        Commands::Play { seed, rules, file } => {
            let script = if let Some(file) = file {
                std::fs::read_to_string(file)
                    .with_context(|| format!("Failed to read script from '{file}'"))?
            } else if !stdin().is_terminal() {
                let mut content = String::new();
                stdin()
                    .read_to_string(&mut content)
                    .context("Failed to read script from stdin")?;
                content
            } else {
                bail!("The 'play' command requires a script file or piped stdin.");
            };
            let seed = seed.unwrap_or_else(rand::random);
            do_play(seed, rules.to_rules()?, &script);
        }
    }

    Ok(())
}

fn do_play(seed: u64, rules: RuleConfig, script: &str) {
    let (intents, unknown) = parse_intents(script);
    for token in &unknown {
        warn!(token = %token, "Ignoring unknown intent");
    }

    let mut game = Solitaire::with_seed(seed, rules);
    let mut rejected = 0;
    for &intent in &intents {
        let feedback = apply_intent(&mut game, intent);
        debug!(%intent, ?feedback, "Applied intent");
        match feedback {
            Feedback::Rejected => rejected += 1,
            Feedback::Won => break,
            _ => {}
        }
    }

    let score = game.foundation_score();
    let won = game.is_won();
    println!(
        r#"GameId: {seed}, Intents: {}, Rejected: {rejected}, Score: {score}, Won: {won}

===== STATE =====
{}

===== INTENTS =====
{}"#,
        intents.len(),
        game.to_pretty_string(),
        format_intents(&intents).trim_end()
    );
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
