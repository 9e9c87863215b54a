//! qiduel CLI
//!
//! Usage:
//!   qiduel --interactive                      # Type gestures, simulated camera
//!   qiduel --script "fist fist;gun;open"      # Batch rounds
//!   qiduel --serve                            # HTTP/WS presentation feed
//!   qiduel --script "..." --json              # JSON snapshots

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use qiduel::core::{run_server, Duel, Pose, Simulator};
use qiduel::types::{MatchSnapshot, RoundOutcome, Winner};
use qiduel::{ClassifierPolicy, MatchConfig, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "qiduel",
    version = VERSION,
    about = "Clap-timed hand-gesture duel against a computer opponent",
    long_about = "qiduel plays a rhythm duel: clap twice to set the tempo, then show\n\
                  a gesture on the third beat. Both sides spend qi on shots and heavy\n\
                  guards and earn it back by charging. First side hit loses.\n\n\
                  Gestures (per hand):\n  \
                  gun   - index finger only\n  \
                  open  - all four fingers\n  \
                  fist  - none\n\n\
                  Moves:\n  \
                  fist fist  LUCK       +1 qi\n  \
                  gun        ATTACK_1   0.5 qi\n  \
                  gun gun    ATTACK_2   1 qi\n  \
                  open       DEFENSE_1  free\n  \
                  open open  DEFENSE_2  0.5 qi"
)]
struct Args {
    /// Interactive mode - type a gesture per round
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP/WebSocket server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Rounds separated by ';', e.g. "fist fist;gun;open open"
    #[arg(long)]
    script: Option<String>,

    /// Match config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the opponent for a reproducible match
    #[arg(long)]
    seed: Option<u64>,

    /// Fixed tempo at this beat interval (300-1200 ms) instead of clap-learned
    #[arg(long)]
    beat_interval: Option<u64>,

    /// With a fixed tempo, start the next round without a clap
    #[arg(long)]
    auto_continue: bool,

    /// Single-tier rules: no double shot or iron guard
    #[arg(long)]
    classic: bool,

    /// Exact finger patterns only
    #[arg(long)]
    strict: bool,

    /// Gap between the simulated lead-in claps (ms)
    #[arg(long, default_value_t = 600)]
    clap_gap: u64,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show per-side breakdown and debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(2);
        }
    };

    if args.serve {
        run_serve(&args, config).await;
    } else if let Some(ref script) = args.script {
        run_script(script, config, &args);
    } else {
        // Default to interactive if no mode specified
        run_interactive(config, &args);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "qiduel=debug" } else { "qiduel=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

/// File config, then CLI overrides
fn build_config(args: &Args) -> qiduel::Result<MatchConfig> {
    let mut config = match args.config {
        Some(ref path) => MatchConfig::from_file(path)?,
        None => MatchConfig::default(),
    };
    if let Some(interval) = args.beat_interval {
        config = config.with_beat_interval(interval);
    }
    if args.auto_continue {
        if let qiduel::TempoMode::Fixed { ref mut auto_continue, .. } = config.tempo {
            *auto_continue = true;
        } else {
            warn!("--auto-continue has no effect with a clap-learned tempo");
        }
    }
    if args.classic {
        config.tiered = false;
    }
    if args.strict {
        config.classifier = ClassifierPolicy::Strict;
    }
    if args.seed.is_some() {
        config.ai_seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

/// Play scripted rounds until the script runs out or someone is hit
fn run_script(script: &str, config: MatchConfig, args: &Args) {
    let poses: Vec<Pose> = match script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<qiduel::Result<_>>()
    {
        Ok(poses) => poses,
        Err(e) => {
            eprintln!("Script error: {}", e);
            std::process::exit(2);
        }
    };

    let mut duel = Duel::new(config);
    let mut sim = Simulator::new(0, args.clap_gap);
    duel.start_match(sim.now());

    for pose in &poses {
        match sim.play_round(&mut duel, pose) {
            Some(outcome) => print_round(&outcome, &duel.snapshot(), args),
            None => break,
        }
        if duel.is_terminal() {
            break;
        }
    }

    if !args.json {
        print_summary(&duel.snapshot());
    }
}

/// Interactive mode: one gesture per line
fn run_interactive(config: MatchConfig, args: &Args) {
    let mut duel = Duel::new(config);
    let mut sim = Simulator::new(0, args.clap_gap);
    duel.start_match(sim.now());

    print_header(args.no_color);
    println!("Each line is one round: the lead-in claps are simulated, then your");
    println!("gesture is held on the action beat. Examples: 'fist fist', 'gun', 'open open'.");
    println!("Type 'clap' to restart a finished match, 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(&duel.snapshot(), args.no_color));
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nMatch ended after {} rounds.", duel.state().round);
            break;
        }
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("clap") {
            if duel.is_terminal() {
                sim.clap(&mut duel);
                println!("{}", "New match. Clap to start the round.".bold());
            } else {
                println!("{}", "Match in progress: show a gesture instead.".yellow());
            }
            continue;
        }

        if duel.is_terminal() {
            println!("{}", "Match over. Type 'clap' to play again.".yellow());
            continue;
        }

        let pose: Pose = match line.parse() {
            Ok(pose) => pose,
            Err(e) => {
                println!("{}", format!("⚠ {}", e).yellow());
                continue;
            }
        };

        if let Some(outcome) = sim.play_round(&mut duel, &pose) {
            print_round(&outcome, &duel.snapshot(), args);
            if duel.is_terminal() && !args.json {
                print_summary(&duel.snapshot());
            }
        }
    }
}

/// Print header
fn print_header(no_color: bool) {
    let title = format!("qiduel v{} - Qi Duel", VERSION);
    if no_color {
        println!("========================================");
        println!("  {}", title);
        println!("========================================");
    } else {
        println!("{}", "╔══════════════════════════════════════╗".bold());
        println!("{}", format!("║  {:<36}║", title).bold());
        println!("{}", "╚══════════════════════════════════════╝".bold());
    }
    println!();
}

/// Format the prompt from the current snapshot
fn format_prompt(snapshot: &MatchSnapshot, no_color: bool) -> String {
    let prompt = format!(
        "[round {} | qi {:.1} vs {:.1}] > ",
        snapshot.round + 1,
        snapshot.player_qi,
        snapshot.ai_qi
    );
    if no_color {
        prompt
    } else {
        format!("{} {}", snapshot.rhythm_state.emoji(), prompt.cyan())
    }
}

fn print_round(outcome: &RoundOutcome, snapshot: &MatchSnapshot, args: &Args) {
    if args.json {
        match serde_json::to_string(snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("JSON error: {}", e),
        }
        return;
    }

    if args.verbose {
        print_verbose(outcome, args.no_color);
    }

    if args.no_color {
        println!("{}", snapshot.to_parseable_string());
        println!("  {}", outcome.message);
    } else {
        let line = format!("{} vs {}", outcome.player.played.label(), outcome.ai.played.label());
        println!("{}  {}", "⚔".bold(), line.bold());
        let message = match outcome.winner {
            Winner::Player => outcome.message.green().bold(),
            Winner::Ai | Winner::Both => outcome.message.red().bold(),
            Winner::None => outcome.message.normal(),
        };
        println!("   {}", message);
    }
}

/// Print per-side breakdown
fn print_verbose(outcome: &RoundOutcome, no_color: bool) {
    let border = |s: &str| if no_color { s.normal() } else { s.bright_black() };
    println!("{}", border("┌───────────────────────────────────────┐"));
    for (who, side) in [("You", &outcome.player), ("AI ", &outcome.ai)] {
        println!(
            "{} {} requested={} played={} qi {:.1} → {:.1}{}",
            border("│"),
            who,
            side.requested,
            side.played,
            side.qi_before,
            side.qi_after,
            if side.hit { "  HIT" } else { "" }
        );
    }
    if !outcome.notes.is_empty() {
        println!("{}", border("├───────────────────────────────────────┤"));
        for note in &outcome.notes {
            println!("{} [{}] {}", border("│"), note.code(), note.description());
        }
    }
    println!("{}", border("└───────────────────────────────────────┘"));
}

fn print_summary(snapshot: &MatchSnapshot) {
    if snapshot.terminal {
        let headline = snapshot.winner.headline();
        let headline = match snapshot.winner {
            Winner::Player => headline.green().bold(),
            _ => headline.red().bold(),
        };
        println!("\n{} after {} rounds", headline, snapshot.round);
    } else {
        println!("\nNo winner after {} rounds.", snapshot.round);
    }
}

/// Run HTTP/WS server
async fn run_serve(args: &Args, config: MatchConfig) {
    println!();
    println!("╔══════════════════════════════════════╗");
    println!("║  ✊ qiduel presentation feed          ║");
    println!("║  Version: {:<27}║", VERSION);
    println!("╚══════════════════════════════════════╝");
    println!();

    if let Err(e) = run_server(&args.addr, config).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
