use chrono::NaiveDateTime;
use cleansheet::domain::{Badges, Club, ClubId, Formation, Match, Player, PlayerId, Position, Round, Stats, Status};
use cleansheet::generator::{generate, Ledger, Request, Selection};
use criterion::{criterion_group, criterion_main, Criterion};
use rustc_hash::FxHashSet;
use tinyrand::{Rand, StdRand};

const CLUBS: u32 = 20;

const SQUAD: [(Position, usize); 6] = [
    (Position::Goalkeeper, 2),
    (Position::Fullback, 4),
    (Position::Centerback, 4),
    (Position::Midfielder, 10),
    (Position::Attacker, 6),
    (Position::Coach, 1),
];

fn synthetic_round(rand: &mut impl Rand) -> Round {
    let mut players = vec![];
    for club in 1..=CLUBS {
        let mut next_id = club * 100;
        for (position, count) in SQUAD {
            for _ in 0..count {
                next_id += 1;
                let status = match rand.next_lim_u32(10) {
                    0 => Status::Doubtful,
                    1 => Status::Injured,
                    _ => Status::Confirmed,
                };
                let games = rand.next_lim_u32(20);
                players.push(Player::new(
                    PlayerId(next_id),
                    format!("P{next_id}"),
                    position,
                    ClubId(club),
                    status,
                    rand.next_lim_u32(1000) as f64 / 100.0,
                    games,
                    Stats {
                        goals: rand.next_lim_u32(games + 1) / 2,
                        assists: rand.next_lim_u32(games + 1) / 2,
                        tackles: rand.next_lim_u32(3 * games + 1),
                        ..Stats::default()
                    },
                ));
            }
        }
    }
    let clubs = (1..=CLUBS)
        .map(|id| {
            (
                ClubId(id),
                Club {
                    id: ClubId(id),
                    name: format!("Club {id}"),
                    abbreviation: format!("C{id:02}"),
                    badges: Badges::default(),
                },
            )
        })
        .collect();
    let matches = (1..=CLUBS)
        .step_by(2)
        .map(|home| Match {
            home: ClubId(home),
            away: ClubId(home + 1),
            kickoff: NaiveDateTime::default(),
            venue: "Stadium".into(),
        })
        .collect();
    Round {
        number: 1,
        players,
        clubs,
        matches,
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let round = synthetic_round(&mut StdRand::default());
    let selection = [
        (1, Formation::F433),
        (4, Formation::F352),
        (7, Formation::F442),
        (10, Formation::F451),
        (13, Formation::F532),
    ]
    .into_iter()
    .map(|(club, formation)| (ClubId(club), formation))
    .collect::<Selection>();
    let none = FxHashSet::default();
    let request = Request {
        selection: &selection,
        locked: &none,
        pool: &none,
    };

    // sanity check
    let first = generate(&round, &request, Ledger::default()).unwrap();
    assert!(!first.variations.is_empty());

    c.bench_function("cri_generate_5_defenses", |b| {
        b.iter(|| generate(&round, &request, Ledger::default()).unwrap());
    });

    c.bench_function("cri_generate_more_5_defenses", |b| {
        let ledger = Ledger::resume(&first.variations);
        b.iter(|| generate(&round, &request, ledger.clone()));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
