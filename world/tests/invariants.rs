use std::collections::BTreeSet;

use gettysburg_core::{seeded_rng, Cell, Command, Event, Side, UnitId, BOARD_SIZE};
use gettysburg_world::{self as world, query, World};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Action {
    Select { side: Side, serial: u16 },
    Move { row: u8, column: u8 },
    Attack { row: u8, column: u8 },
    EndTurn,
    Draw,
    PlayFirst,
}

fn action() -> impl Strategy<Value = Action> {
    let side = prop_oneof![Just(Side::Union), Just(Side::Confederacy)];
    prop_oneof![
        (side, 1u16..=4).prop_map(|(side, serial)| Action::Select { side, serial }),
        (0..BOARD_SIZE, 0..BOARD_SIZE).prop_map(|(row, column)| Action::Move { row, column }),
        (0..BOARD_SIZE, 0..BOARD_SIZE).prop_map(|(row, column)| Action::Attack { row, column }),
        Just(Action::EndTurn),
        Just(Action::Draw),
        Just(Action::PlayFirst),
    ]
}

fn command_for(world: &World, action: &Action) -> Command {
    match *action {
        Action::Select { side, serial } => Command::SelectUnit {
            unit: UnitId::regular(side, serial),
        },
        Action::Move { row, column } => Command::MoveUnit {
            destination: Cell::new(row, column),
        },
        Action::Attack { row, column } => Command::AttackUnit {
            target: Cell::new(row, column),
        },
        Action::EndTurn => Command::EndTurn,
        Action::Draw => Command::DrawCard,
        Action::PlayFirst => {
            let side = query::turn_side(world);
            let card = query::hand(world, side)
                .first()
                .map(|card| card.id)
                .unwrap_or(gettysburg_core::CardInstanceId::new(u32::MAX));
            Command::PlayCard { card }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_preserves_battle_invariants(
        seed in any::<u64>(),
        actions in proptest::collection::vec(action(), 1..200),
    ) {
        let mut world = World::new();
        let mut rng = seeded_rng(seed);
        let mut moved_this_turn = BTreeSet::new();
        let mut attacked_this_turn = BTreeSet::new();
        let mut eliminated = BTreeSet::new();

        for action in &actions {
            let command = command_for(&world, action);
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut rng, &mut events);

            for event in &events {
                match event {
                    Event::UnitMoved { unit, .. } => {
                        prop_assert!(moved_this_turn.insert(*unit), "{unit} moved twice");
                    }
                    Event::UnitAttacked { attacker, damage, .. } => {
                        prop_assert!(*damage >= 1);
                        prop_assert!(
                            attacked_this_turn.insert(*attacker),
                            "{attacker} attacked twice"
                        );
                    }
                    Event::UnitEliminated { unit } => {
                        prop_assert!(eliminated.insert(*unit), "{unit} eliminated twice");
                    }
                    Event::TurnStarted { .. } => {
                        moved_this_turn.clear();
                        attacked_this_turn.clear();
                    }
                    _ => {}
                }
            }

            let units = query::units(&world);
            let cells: BTreeSet<Cell> = units.iter().map(|unit| unit.cell).collect();
            prop_assert_eq!(cells.len(), units.len(), "two units share a cell");
            prop_assert!(units.iter().all(|unit| unit.cell.is_on_board()));
            prop_assert!(units.iter().all(|unit| unit.is_alive()));
            prop_assert!(units.iter().all(|unit| !eliminated.contains(&unit.id)));
            prop_assert!(units.iter().all(|unit| unit.hp <= unit.max_hp()));
        }
    }

    #[test]
    fn end_turn_always_resets_the_incoming_side(
        seed in any::<u64>(),
        actions in proptest::collection::vec(action(), 0..60),
    ) {
        let mut world = World::new();
        let mut rng = seeded_rng(seed);
        for action in &actions {
            let command = command_for(&world, action);
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut rng, &mut events);
        }
        prop_assume!(query::winner(&world).is_none());

        let mut events = Vec::new();
        world::apply(&mut world, Command::EndTurn, &mut rng, &mut events);
        let side = query::turn_side(&world);

        prop_assert_eq!(query::attack_modifier(&world, side), 0);
        prop_assert!(!query::has_drawn_card(&world));
        prop_assert_eq!(query::selected_unit(&world), None);
        for unit in query::units_of(&world, side) {
            prop_assert_eq!(query::action_state(&world, unit.id), Some(Default::default()));
        }
    }
}
