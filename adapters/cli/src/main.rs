#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Ember Keepers waves headless.

use std::{f32::consts::TAU, fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use ember_keepers_core::{Event, Phase, Position, TemplateId};
use ember_keepers_session::{Session, SessionConfig, GOLD_EARNED, MONSTERS_SLAIN, WAVES_CLEARED};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const FORMATION_RADIUS: f32 = 6.0;

/// Headless wave simulator.
#[derive(Debug, Parser)]
#[command(name = "ember-keepers", version, about)]
struct Args {
    /// Number of waves to play.
    #[arg(long, default_value_t = 3)]
    waves: u32,

    /// Simulated milliseconds per tick.
    #[arg(long = "tick-ms", default_value_t = 100)]
    tick_ms: u64,

    /// Seed for spawn placement, loot and skill rolls.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with session tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Hero templates to recruit and deploy around the base.
    #[arg(long, value_delimiter = ',', default_value = "ignis,boreas,volta,terra")]
    heroes: Vec<String>,

    /// Writes the progress counters to this file as TOML.
    #[arg(long = "progress-out", value_name = "PATH")]
    progress_out: Option<PathBuf>,

    /// Simulated seconds after which a wave is abandoned.
    #[arg(long = "wave-limit-secs", default_value_t = 600)]
    wave_limit_secs: u64,
}

/// Entry point for the Ember Keepers command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.tick_ms == 0 {
        bail!("--tick-ms must be positive");
    }

    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut session = Session::new(config).context("invalid session configuration")?;
    session.start_new_game();
    deploy_heroes(&mut session, &args.heroes)?;

    let dt = Duration::from_millis(args.tick_ms);
    let limit = args.wave_limit_secs.saturating_mul(1_000) / args.tick_ms;
    for _ in 0..args.waves {
        if !session.start_current_wave() {
            warn!(phase = ?session.phase(), "could not start another wave");
            break;
        }
        report(&session.drain_events());
        play_wave(&mut session, dt, limit);
        if session.phase() == Phase::GameOver {
            break;
        }
    }

    let progress = session.progress();
    println!(
        "summary: reached wave {}, cleared {}, slain {}, gold earned {}, balance {}, base {}",
        session.current_wave(),
        progress.get(WAVES_CLEARED),
        progress.get(MONSTERS_SLAIN),
        progress.get(GOLD_EARNED),
        session.gold(),
        if session.is_base_destroyed() {
            "destroyed"
        } else {
            "standing"
        },
    );

    if let Some(path) = &args.progress_out {
        let text = progress.to_toml()?;
        fs::write(path, text)
            .with_context(|| format!("failed to write progress record to {}", path.display()))?;
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn deploy_heroes(session: &mut Session, ids: &[String]) -> Result<()> {
    let count = ids.len().max(1) as f32;
    for (index, id) in ids.iter().enumerate() {
        let Some(hero) = session.recruit_hero(&TemplateId::new(id.trim())) else {
            bail!("unknown hero `{id}`");
        };
        let angle = TAU * index as f32 / count;
        let position = Position::new(
            FORMATION_RADIUS * angle.cos(),
            FORMATION_RADIUS * angle.sin(),
        );
        if !session.deploy_hero(hero, position) {
            bail!("hero `{id}` could not be deployed");
        }
        println!("deployed {id} as hero {}", hero.get());
    }
    Ok(())
}

fn play_wave(session: &mut Session, dt: Duration, limit: u64) {
    for _ in 0..limit {
        session.tick(dt);
        report(&session.drain_events());
        if !session.is_wave_in_progress() || session.phase() == Phase::GameOver {
            return;
        }
    }
    warn!(
        wave = session.current_wave().get(),
        remaining = session.active_monster_count(),
        "wave limit reached; abandoning the wave"
    );
    let _ = session.on_wave_completed();
    report(&session.drain_events());
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::WaveStarted { wave, mode } => println!("wave {wave} started ({mode:?})"),
            Event::WaveCleared { wave } => println!("wave {wave} cleared"),
            Event::HeroDied { hero } => println!("hero {} fell", hero.get()),
            Event::HeroRevived { hero, paid } => {
                let how = if *paid { "paid" } else { "free" };
                println!("hero {} revived ({how})", hero.get());
            }
            Event::PhaseChanged {
                phase: Phase::GameOver,
            } => println!("the base has fallen"),
            Event::SkillUsed { hero, skill, .. } => {
                debug!(hero = hero.get(), skill = ?skill, "skill used");
            }
            _ => {}
        }
    }
}
