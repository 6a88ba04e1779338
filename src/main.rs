//! # 程序说明
//!
//! 24 点命令行工具：
//! - `solve`：给定 4 张牌，列出所有得到 24 的表达式；
//! - `challenge`：随机抽一手有解的牌，在终端里逐题作答；给出 `--answer` 时只校验这一个答案；
//! - `check`：校验某个表达式是否是给定牌的正确答案；
//! - `sample`：随机抽若干手互不相同点数的牌，求解并把结果追加到日志文件。

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};

use card_twenty_four::card::{Card, Rank};
use card_twenty_four::draw::{self, DEFAULT_MAX_ATTEMPTS};
use card_twenty_four::errors::{CardError, SessionError, ValidationError};
use card_twenty_four::report::{self, SolutionPreview, CALCULATION_PREVIEW};
use card_twenty_four::session::{GameSession, Mode};
use card_twenty_four::{find_solutions, play, validator};

/// 24-point card game solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (also enabled by TWENTY_FOUR_DEBUG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every expression that makes 24 from four cards
    Solve {
        /// Four cards: A, 2-10, J, Q, K or 1-13
        #[arg(num_args = 4, required = true)]
        cards: Vec<String>,

        /// Print all solutions instead of a preview
        #[arg(long)]
        all: bool,
    },
    /// Play challenge rounds on random solvable hands
    Challenge {
        /// Maximum number of draws while looking for a solvable hand
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,

        /// Seed for the card draws; the same seed deals the same hands
        #[arg(long)]
        seed: Option<u64>,

        /// Check this single answer against the first hand instead of playing interactively
        #[arg(long)]
        answer: Option<String>,
    },
    /// Check an expression against four cards
    Check {
        /// Four cards: A, 2-10, J, Q, K or 1-13
        #[arg(long, num_args = 4, required = true)]
        cards: Vec<String>,

        /// The expression to check, e.g. "6 / (1 - 3 / 4)"
        expression: String,
    },
    /// Solve random hands of four distinct ranks and append them to a log file
    Sample {
        /// Number of hands to draw
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Log file that receives one block per hand
        #[arg(long, default_value = "log/24_game_log.txt")]
        log: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug_enabled = cli.debug || std::env::var("TWENTY_FOUR_DEBUG").is_ok();
    card_twenty_four::log::init_logger(debug_enabled);

    if let Err(e) = try_main(cli.cmd) {
        if let Some(card_err) = e.downcast_ref::<CardError>() {
            eprintln!("Error: {}", card_err.display_detailed());
        } else if let Some(validation_err) = e.downcast_ref::<ValidationError>() {
            eprintln!("Error: {}", validation_err.display_detailed());
        } else if let Some(session_err) = e.downcast_ref::<SessionError>() {
            eprintln!("Error: {}", session_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main(cmd: Command) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::Solve { cards, all } => run_solve(&cards, all),
        Command::Challenge {
            max_attempts,
            seed,
            answer,
        } => run_challenge(max_attempts, seed, answer.as_deref()),
        Command::Check { cards, expression } => run_check(&cards, &expression),
        Command::Sample { count, log } => run_sample(count, &log),
    }
}

fn parse_ranks(labels: &[String]) -> Result<Vec<i32>, CardError> {
    labels
        .iter()
        .map(|s| s.parse::<Rank>().map(Rank::value))
        .collect()
}

fn run_solve(labels: &[String], all: bool) -> Result<(), Box<dyn std::error::Error>> {
    let hand = parse_ranks(labels)?;
    let solutions = find_solutions(&hand);
    let limit = if all { solutions.len() } else { CALCULATION_PREVIEW };
    println!("Cards: {}", labels.join(" "));
    print!("{}", SolutionPreview::new(&solutions, limit));
    Ok(())
}

fn run_challenge(
    max_attempts: usize,
    seed: Option<u64>,
    answer: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = GameSession::new().with_max_attempts(max_attempts);
    session.set_mode(Mode::Challenge, &mut rng);

    let Some(expr) = answer else {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        play::run_challenge_loop(&mut session, &mut rng, stdin.lock(), &mut stdout)?;
        return Ok(());
    };

    let shown: Vec<String> = session.challenge_cards().iter().map(Card::to_string).collect();
    println!("Cards: {}", shown.join(" "));
    let value = session.submit_answer(expr)?;
    println!("Correct! {} = {} (score {})", expr.trim(), value, session.score());
    Ok(())
}

fn run_check(labels: &[String], expression: &str) -> Result<(), Box<dyn std::error::Error>> {
    let hand = parse_ranks(labels)?;
    let value = validator::validate(&hand, expression)?;
    println!("Correct! {} = {}", expression.trim(), value);
    Ok(())
}

/// 抽牌、求解，并把每手牌的结果写入日志。
fn run_sample(count: usize, log_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    log::info!("appending {count} hand(s) to {}", log_path.display());

    let mut rng = thread_rng();
    for _ in 0..count {
        let hand = draw::draw_distinct_ranks(&mut rng);
        let solutions = find_solutions(&hand);
        report::write_hand_report(&mut log_file, &Local::now(), &hand, &solutions)?;
        println!(
            "Processed hand: {:3?}.\t Solution count {:12}.",
            hand,
            solutions.len()
        );
    }
    Ok(())
}
