use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use cleansheet::domain::{ClubId, Formation, PlayerId};
use cleansheet::file;
use cleansheet::print::tabulate_variation;
use cleansheet::session::{Mode, Session};

#[derive(Debug, Clone)]
struct Defense {
    club: ClubId,
    formation: Formation,
}

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the market snapshot from
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// defense to anchor on, as club_id[:formation]; may be repeated
    #[clap(short = 'd', long = "defense", value_parser = parse_defense)]
    defenses: Vec<Defense>,

    /// offensive player to lock into every variation; may be repeated
    #[clap(short = 'l', long)]
    lock: Vec<u32>,

    /// restrict auto-selection to these players (advanced mode); may be repeated
    #[clap(short = 'p', long)]
    pool: Vec<u32>,

    /// number of additional non-repeating passes
    #[clap(short = 'm', long, default_value = "0")]
    more: usize,

    /// write the generated variations as JSON to this file
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.file
            .as_ref()
            .ok_or(anyhow!("snapshot file must be specified"))?;
        if self.defenses.is_empty() {
            bail!("at least one defense must be specified");
        }
        if !self.pool.is_empty() {
            if let Some(id) = self.lock.iter().find(|id| !self.pool.contains(id)) {
                bail!("locked player {id} must also be in the pool");
            }
        }
        Ok(())
    }

    fn mode(&self) -> Mode {
        if self.pool.is_empty() {
            Mode::Quick
        } else {
            Mode::Advanced
        }
    }
}

fn parse_defense(s: &str) -> anyhow::Result<Defense> {
    let (club, formation) = match s.split_once(':') {
        Some((club, formation)) => (club, Formation::from_str(formation)?),
        None => (s, Formation::default()),
    };
    let club = club
        .trim()
        .parse::<u32>()
        .map_err(|err| anyhow!("invalid club id '{club}': {err}"))?;
    Ok(Defense {
        club: ClubId(club),
        formation,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let start_time = Instant::now();
    let round = file::read_round(args.file.as_ref().unwrap())?;
    info!(
        "round {}: {} players, {} clubs, {} matches",
        round.number,
        round.players.len(),
        round.clubs.len(),
        round.matches.len()
    );

    let mut session = Session::new(&round, args.mode());
    for defense in &args.defenses {
        session.selection_mut().select(defense.club, defense.formation);
    }
    for &id in &args.pool {
        if !session.pool().contains(&PlayerId(id)) {
            session.toggle_pool(PlayerId(id));
        }
    }
    for &id in &args.lock {
        if !session.locked().contains(&PlayerId(id)) {
            session.toggle_lock(PlayerId(id));
        }
    }

    session.generate()?;
    for pass in 0..args.more {
        if session.is_exhausted() {
            info!("offensive pool exhausted after {pass} additional passes");
            break;
        }
        let added = session.generate_more()?.len();
        info!("pass {}: {added} more variations", pass + 1);
    }

    for variation in session.variations() {
        println!(
            "{} {} anchored on {}:\n{}\n{}",
            variation.id,
            variation.title,
            variation.defense.name,
            variation.rationale,
            Console::default().render(&tabulate_variation(variation, &round))
        );
    }
    if session.is_exhausted() {
        info!("no further variations can be generated for this selection");
    }
    if let Some(out) = &args.out {
        file::write_json(out, &session.variations())?;
        info!("wrote {} variations to {}", session.variations().len(), out.display());
    }

    let elapsed = start_time.elapsed();
    info!("took {elapsed:?}");
    Ok(())
}
