//! Match-day CLI: load an attendance roster, form the teams, print the sheet.
//! Run with: cargo run --bin form-teams -- <roster.csv> [--seed N] [--trials N] [--json]
//! `--seed` makes the sheet reproducible; `--trials` overrides the search budget.
//! Logging via env_logger: RUST_LOG=debug shows the engine's diagnostics.

use futsal_teams::{
    form_teams_with, load_roster, FormationConfig, FormationStats, PositionTable, TeamPlayer,
    TeamStats,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

struct CliArgs {
    roster_path: String,
    seed: Option<u64>,
    trials: Option<usize>,
    json: bool,
}

fn usage() -> ! {
    eprintln!("Usage: form-teams <roster.csv> [--seed N] [--trials N] [--json]");
    std::process::exit(2);
}

fn parse_args() -> CliArgs {
    let mut roster_path = None;
    let mut seed = None;
    let mut trials = None;
    let mut json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().and_then(|v| v.parse().ok()) {
                Some(v) => seed = Some(v),
                None => usage(),
            },
            "--trials" => match args.next().and_then(|v| v.parse().ok()) {
                Some(v) => trials = Some(v),
                None => usage(),
            },
            "--json" => json = true,
            _ if arg.starts_with("--") => usage(),
            _ if roster_path.is_none() => roster_path = Some(arg),
            _ => usage(),
        }
    }

    match roster_path {
        Some(roster_path) => CliArgs {
            roster_path,
            seed,
            trials,
            json,
        },
        None => usage(),
    }
}

/// Serialized shape of the printed sheet (for --json).
#[derive(serde::Serialize)]
struct MatchSheet<'a> {
    date: String,
    yellow: &'a [TeamPlayer],
    blue: &'a [TeamPlayer],
    stats: &'a FormationStats,
}

fn print_team(label: &str, roster: &[TeamPlayer], stats: &TeamStats) {
    println!(
        "{} ({} players, avg skill {:.1})",
        label, stats.count, stats.average_skill
    );
    for team_player in roster {
        let position = team_player.effective_position.as_deref().unwrap_or("-");
        let subs = if team_player.effective_sub_positions.is_empty() {
            String::new()
        } else {
            format!(" ({})", team_player.effective_sub_positions.join(", "))
        };
        let mut markers = String::new();
        if team_player.player.is_guest {
            markers.push_str(" [guest]");
        }
        if team_player.is_backfilled() {
            markers.push_str(" [covers goal]");
        }
        println!(
            "  {:<5} {}{}{}",
            position, team_player.player.display_name, subs, markers
        );
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = parse_args();
    let players = match load_roster(&args.roster_path) {
        Ok(players) => players,
        Err(e) => {
            eprintln!("Failed to load roster {}: {}", args.roster_path, e);
            std::process::exit(1);
        }
    };
    log::info!("Loaded {} attendees from {}", players.len(), args.roster_path);

    let mut config = FormationConfig::default();
    if let Some(trials) = args.trials {
        config.trials = trials;
    }

    let table = PositionTable::standard();
    let result = match args.seed {
        Some(seed) => {
            log::info!("Forming teams with fixed seed {}", seed);
            let mut rng = StdRng::seed_from_u64(seed);
            form_teams_with(&players, &table, &config, &mut rng)
        }
        None => form_teams_with(&players, &table, &config, &mut rand::thread_rng()),
    };

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    if args.json {
        let sheet = MatchSheet {
            date,
            yellow: &result.yellow,
            blue: &result.blue,
            stats: &result.stats,
        };
        match serde_json::to_string_pretty(&sheet) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize match sheet: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("Match sheet for {}", date);
        println!();
        print_team("Yellow", &result.yellow, &result.stats.yellow);
        println!();
        print_team("Blue", &result.blue, &result.stats.blue);
    }
}
