//! The three days of the Gettysburg campaign.

use gettysburg_core::{Cell, Scenario, Side, TerrainMap, Unit, UnitId, UnitKind, WinCondition};

/// Number of battles fought in a campaign.
pub const CAMPAIGN_LENGTH: usize = 3;

/// Turns the Union must hold Little Round Top.
const ROUND_TOP_HOLD_TURNS: u32 = 3;

type Placement = (Side, u16, UnitKind, u8, u8);

/// Builds the scenario fought at `index`, counting from zero.
#[must_use]
pub fn campaign_scenario(index: usize) -> Option<Scenario> {
    match index {
        0 => Some(meeting_engagement()),
        1 => Some(little_round_top()),
        2 => Some(picketts_charge()),
        _ => None,
    }
}

fn meeting_engagement() -> Scenario {
    Scenario::new(
        "Day 1: Meeting Engagement",
        TerrainMap::new([
            Cell::new(6, 6),
            Cell::new(7, 6),
            Cell::new(6, 7),
            Cell::new(7, 7),
        ]),
        place(&[
            (Side::Union, 1, UnitKind::Infantry, 7, 1),
            (Side::Union, 2, UnitKind::Infantry, 7, 3),
            (Side::Union, 3, UnitKind::Artillery, 6, 2),
            (Side::Union, 4, UnitKind::Cavalry, 7, 5),
            (Side::Confederacy, 1, UnitKind::Infantry, 0, 4),
            (Side::Confederacy, 2, UnitKind::Infantry, 0, 6),
            (Side::Confederacy, 3, UnitKind::Artillery, 1, 5),
            (Side::Confederacy, 4, UnitKind::Cavalry, 0, 2),
        ]),
        WinCondition::Elimination,
    )
}

/// The Union fields only its carried-over roster here.
fn little_round_top() -> Scenario {
    Scenario::new(
        "Day 2: Little Round Top",
        TerrainMap::new([
            Cell::new(5, 6),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(6, 7),
            Cell::new(7, 6),
            Cell::new(7, 7),
        ]),
        place(&[
            (Side::Confederacy, 5, UnitKind::Infantry, 0, 3),
            (Side::Confederacy, 6, UnitKind::Infantry, 0, 5),
            (Side::Confederacy, 7, UnitKind::Artillery, 1, 4),
            (Side::Confederacy, 8, UnitKind::Cavalry, 0, 1),
        ]),
        WinCondition::HoldTerrain {
            side: Side::Union,
            turns: ROUND_TOP_HOLD_TURNS,
        },
    )
}

fn picketts_charge() -> Scenario {
    Scenario::new(
        "Day 3: Pickett's Charge",
        TerrainMap::new([
            Cell::new(6, 3),
            Cell::new(6, 4),
            Cell::new(7, 3),
            Cell::new(7, 4),
        ]),
        place(&[
            (Side::Confederacy, 9, UnitKind::Infantry, 0, 2),
            (Side::Confederacy, 10, UnitKind::Infantry, 0, 4),
            (Side::Confederacy, 11, UnitKind::Infantry, 0, 6),
            (Side::Confederacy, 12, UnitKind::Artillery, 1, 5),
        ]),
        WinCondition::Elimination,
    )
}

fn place(placements: &[Placement]) -> Vec<Unit> {
    placements
        .iter()
        .map(|&(side, serial, kind, row, column)| {
            Unit::new(UnitId::regular(side, serial), kind, Cell::new(row, column))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_ends_after_the_third_day() {
        let names: Vec<String> = (0..CAMPAIGN_LENGTH)
            .filter_map(campaign_scenario)
            .map(|scenario| scenario.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Day 1: Meeting Engagement",
                "Day 2: Little Round Top",
                "Day 3: Pickett's Charge",
            ]
        );
        assert!(campaign_scenario(CAMPAIGN_LENGTH).is_none());
    }

    #[test]
    fn later_days_field_only_confederates() {
        for index in 1..CAMPAIGN_LENGTH {
            let scenario = campaign_scenario(index).expect("scenario exists");
            assert!(scenario
                .units
                .iter()
                .all(|unit| unit.side() == Side::Confederacy));
        }
    }

    #[test]
    fn little_round_top_must_be_held_for_three_turns() {
        let scenario = campaign_scenario(1).expect("scenario exists");
        assert_eq!(
            scenario.win_condition,
            WinCondition::HoldTerrain {
                side: Side::Union,
                turns: 3
            }
        );
    }
}
