use gettysburg_core::{seeded_rng, BattleRng, Command, Difficulty, Event, Side, UpgradeKind};
use gettysburg_system_ai::{Commander, Config};
use gettysburg_system_campaign::{
    Campaign, CampaignError, CampaignStatus, CAMPAIGN_LENGTH, VICTORY_REWARD,
};
use gettysburg_world::{self as world, query, World};

const TURN_LIMIT: usize = 400;

/// Plays the loaded battle to the end. `None` leaves a side idle.
fn fight(
    world: &mut World,
    rng: &mut BattleRng,
    union: Option<Commander>,
    confederacy: Option<Commander>,
) -> Side {
    for _ in 0..TURN_LIMIT {
        if let Some(winner) = query::winner(world) {
            return winner;
        }
        let controller = match query::turn_side(world) {
            Side::Union => union,
            Side::Confederacy => confederacy,
        };
        let mut events = Vec::new();
        match controller {
            Some(commander) => commander.run_turn(world, rng, &mut events),
            None => world::apply(world, Command::EndTurn, rng, &mut events),
        }
    }
    query::winner(world).expect("battle should finish within the turn limit")
}

fn lee() -> Option<Commander> {
    Some(Commander::new(Config::new(Difficulty::Lee)))
}

#[test]
fn campaign_opens_on_the_first_day() {
    let mut campaign = Campaign::new();
    let mut world = World::new();
    let mut events = Vec::new();
    assert_eq!(campaign.state().status(), CampaignStatus::Inactive);

    campaign
        .start(&mut world, &mut seeded_rng(0), &mut events)
        .expect("first battle loads");

    assert_eq!(campaign.state().status(), CampaignStatus::InBattle);
    assert!(campaign.state().is_active());
    assert_eq!(query::scenario_name(&world), "Day 1: Meeting Engagement");
    assert_eq!(query::units_of(&world, Side::Union).count(), 4);
    assert!(matches!(events.as_slice(), [Event::BattleStarted { .. }]));
    assert_eq!(
        campaign.record_battle_end(&world),
        Err(CampaignError::BattleUndecided)
    );
}

#[test]
fn losing_a_battle_ends_the_campaign() {
    let mut campaign = Campaign::new();
    let mut world = World::new();
    let mut rng = seeded_rng(11);
    let mut events = Vec::new();
    campaign
        .start(&mut world, &mut rng, &mut events)
        .expect("first battle loads");

    assert_eq!(fight(&mut world, &mut rng, None, lee()), Side::Confederacy);
    let report = campaign.record_battle_end(&world).expect("battle decided");

    assert_eq!(report.status, CampaignStatus::Defeat);
    assert_eq!(report.points_gained, 0);
    assert!(!campaign.state().is_active());
    assert_eq!(
        campaign.advance_to_next_scenario(&mut world, &mut rng, &mut events),
        Err(CampaignError::NotAwaitingCommand)
    );
    assert_eq!(
        campaign.record_battle_end(&world),
        Err(CampaignError::NoBattleInProgress)
    );
}

#[test]
fn survivors_carry_over_and_the_campaign_can_be_won() {
    let mut campaign = Campaign::new();
    let mut world = World::new();
    let mut rng = seeded_rng(1863);
    let mut events = Vec::new();
    campaign
        .start(&mut world, &mut rng, &mut events)
        .expect("first battle loads");

    let mut expected_points = 0;
    for battle in 0..CAMPAIGN_LENGTH {
        assert_eq!(campaign.state().scenario_index(), battle);
        assert_eq!(fight(&mut world, &mut rng, lee(), None), Side::Union);

        let survivors: Vec<_> = query::units_of(&world, Side::Union).cloned().collect();
        let report = campaign.record_battle_end(&world).expect("battle decided");
        assert_eq!(report.winner, Side::Union);
        assert_eq!(report.survivors, survivors.len());
        assert_eq!(report.points_gained, VICTORY_REWARD + survivors.len() as u32);
        expected_points += report.points_gained;
        assert_eq!(campaign.state().roster(), Some(survivors.as_slice()));

        if battle + 1 == CAMPAIGN_LENGTH {
            assert_eq!(report.status, CampaignStatus::Victory);
            break;
        }
        assert_eq!(report.status, CampaignStatus::AwaitingCommand);

        let cost = campaign.upgrade_cost(UpgradeKind::Morale);
        let receipt = campaign
            .spend_upgrade(UpgradeKind::Morale)
            .expect("a victory pays for morale");
        assert_eq!(receipt.cost, cost);
        expected_points -= cost;

        let roster = campaign.state().roster().map(<[_]>::to_vec).unwrap_or_default();
        campaign
            .advance_to_next_scenario(&mut world, &mut rng, &mut events)
            .expect("next battle loads");

        assert_eq!(query::units_of(&world, Side::Union).count(), roster.len());
        for carried in &roster {
            let unit = query::unit(&world, carried.id).expect("carried unit deployed");
            assert_eq!(unit.kind, carried.kind);
            assert_eq!(unit.attack, carried.attack);
            assert_eq!(unit.hp, (carried.hp + 1).min(carried.max_hp()));
        }
        assert_eq!(query::hold_count(&world), 0);
        assert_eq!(query::turn_side(&world), Side::Union);
    }

    assert_eq!(campaign.state().status(), CampaignStatus::Victory);
    assert!(!campaign.state().is_active());
    assert_eq!(campaign.state().resource_points(), expected_points);
    assert_eq!(
        campaign.spend_upgrade(UpgradeKind::Heal),
        Err(CampaignError::NotAwaitingCommand)
    );
}
