use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use cleansheet::domain::{ClubId, Position, Round};
use cleansheet::file;
use cleansheet::print::{tabulate_composition, tabulate_lineup, tabulate_players};
use cleansheet::probable::{alternatives, probable_lineup};
use cleansheet::scouting::{composition, scout, Filter, SortKey, COMPOSITION_TOP};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the market snapshot from
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// only players in this position (GK, FB, CB, MID, ATK, COA)
    #[clap(short = 'p', long, value_parser = parse_position)]
    position: Option<Position>,

    /// only players of this club
    #[clap(short = 'c', long)]
    club: Option<u32>,

    /// sort by potential, average, basic, goals, assists, tackles or name
    #[clap(short = 's', long, value_parser = parse_sort_key, default_value = "potential")]
    sort: SortKey,

    /// print at most this many players
    #[clap(short = 'n', long)]
    top: Option<usize>,

    /// print the probable lineups of both clubs in every match
    #[clap(short = 'm', long = "matches")]
    print_matches: bool,

    /// print the alternatives for the given position and club
    #[clap(short = 'a', long = "alternatives")]
    print_alternatives: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.file
            .as_ref()
            .ok_or(anyhow!("snapshot file must be specified"))?;
        if self.print_alternatives && (self.club.is_none() || self.position.is_none()) {
            bail!("alternatives require both the -c and the -p flags");
        }
        Ok(())
    }
}

fn parse_position(s: &str) -> anyhow::Result<Position> {
    Ok(Position::from_str(s)?)
}

fn parse_sort_key(s: &str) -> anyhow::Result<SortKey> {
    Ok(SortKey::from_str(s)?)
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

    let round = file::read_round(args.file.as_ref().unwrap())?;
    info!("round {}: {} players", round.number, round.players.len());

    if args.print_matches {
        print_matches(&round);
    } else if let (true, Some(club), Some(position)) =
        (args.print_alternatives, args.club, args.position)
    {
        let players = alternatives(&round, ClubId(club), position);
        println!(
            "{position} options for {}:\n{}",
            round.club_name(ClubId(club)),
            Console::default().render(&tabulate_players(&players, &round))
        );
    } else {
        let filter = Filter {
            position: args.position,
            club: args.club.map(ClubId),
        };
        let mut players = scout(&round, &filter, args.sort);
        info!("{} players match", players.len());
        let summary = composition(&players, COMPOSITION_TOP);
        if let Some(top) = args.top {
            players.truncate(top);
        }
        println!("{}", Console::default().render(&tabulate_players(&players, &round)));
        println!(
            "Score composition of the leading {}:\n{}",
            summary.breakdowns.len(),
            Console::default().render(&tabulate_composition(&summary))
        );
    }
    Ok(())
}

fn print_matches(round: &Round) {
    for fixture in &round.matches {
        println!(
            "{} v {} at {}, {}",
            round.club_name(fixture.home),
            round.club_name(fixture.away),
            fixture.venue,
            fixture.kickoff
        );
        for club in [fixture.home, fixture.away] {
            match probable_lineup(round, club) {
                Some(lineup) => println!(
                    "{}:\n{}",
                    lineup.name,
                    Console::default().render(&tabulate_lineup(&lineup, round))
                ),
                None => warn!("club {club} is not part of the round"),
            }
        }
    }
}
