use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::availability::Pick;
use crate::domain::{Player, Round};
use crate::generator::Variation;
use crate::probable::ProbableLineup;
use crate::scouting::Composition;

const DOUBT_MARKER: &str = "?";

fn pick_cells(pick: &Pick, round: &Round) -> Vec<stanza::table::Cell> {
    vec![
        pick.player.position.abbreviation().into(),
        pick.player.name.clone().into(),
        round.club_name(pick.player.club).into(),
        format!("{:.2}", pick.player.average).into(),
        format!("{:.2}", pick.player.potential()).into(),
        if pick.from_doubt { DOUBT_MARKER } else { "" }.into(),
    ]
}

fn pick_table() -> Table {
    Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(15)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Centred)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Pos".into(),
                "Player".into(),
                "Club".into(),
                "Average".into(),
                "Potential".into(),
                "Doubt".into(),
            ],
        ))
}

/// One row per pick of the variation, in team-sheet order.
pub fn tabulate_variation(variation: &Variation, round: &Round) -> Table {
    let mut table = pick_table();
    for pick in variation.picks() {
        table.push_row(Row::new(Styles::default(), pick_cells(pick, round)));
    }
    table
}

pub fn tabulate_lineup(lineup: &ProbableLineup, round: &Round) -> Table {
    let mut table = pick_table();
    for pick in &lineup.picks {
        table.push_row(Row::new(Styles::default(), pick_cells(pick, round)));
    }
    table
}

pub fn tabulate_players(players: &[&Player], round: &Round) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![
                Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
                Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Left)),
                Col::new(Styles::default().with(MinWidth(15)).with(HAlign::Left)),
                Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Left)),
            ];
            for _ in 0..6 {
                cols.push(Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Player".into(),
                "Pos".into(),
                "Club".into(),
                "Status".into(),
                "Average".into(),
                "Basic".into(),
                "Potential".into(),
                "Goals".into(),
                "Assists".into(),
                "Tackles".into(),
            ],
        ));
    for player in players {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                player.name.clone().into(),
                player.position.abbreviation().into(),
                round.club_name(player.club).into(),
                player.status.to_string().into(),
                format!("{:.2}", player.average).into(),
                format!("{:.2}", player.basic()).into(),
                format!("{:.2}", player.potential()).into(),
                player.stats.goals.to_string().into(),
                player.stats.assists.to_string().into(),
                player.stats.tackles.to_string().into(),
            ],
        ));
    }
    table
}

pub fn tabulate_composition(composition: &Composition) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Player".into(), "Basic".into(), "Extra".into(), "Potential".into()],
        ));
    for breakdown in &composition.breakdowns {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                breakdown.name.clone().into(),
                format!("{:.2}", breakdown.basic).into(),
                format!("{:.2}", breakdown.extra).into(),
                format!("{:.2}", breakdown.potential).into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Header(true)),
        vec![
            "Mean potential".into(),
            "".into(),
            "".into(),
            format!("{:.2}", composition.mean_potential).into(),
        ],
    ));
    table
}

#[cfg(test)]
mod tests {
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    use super::*;
    use crate::domain::{ClubId, Formation, Position};
    use crate::generator::{self, Ledger, Request, Selection};
    use crate::testing::RosterBuilder;
    use rustc_hash::FxHashSet;

    #[test]
    fn renders_variation() {
        let round = RosterBuilder::default()
            .fixture(1, 2)
            .defense(1, 4)
            .offense(3, Position::Midfielder, 3)
            .offense(3, Position::Attacker, 3)
            .build();
        let selection = Selection::from_iter([(ClubId(1), Formation::F433)]);
        let none = FxHashSet::default();
        let generation = generator::generate(
            &round,
            &Request {
                selection: &selection,
                locked: &none,
                pool: &none,
            },
            Ledger::default(),
        )
        .unwrap();
        let rendered = Console::default()
            .render(&tabulate_variation(&generation.variations[0], &round))
            .to_string();
        assert!(rendered.contains("Potential"));
        assert!(rendered.contains("P1001"));
        assert!(rendered.contains("Club 1"));
        assert!(rendered.contains("club 3"));
    }
}
