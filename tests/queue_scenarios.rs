//! Action queue scenarios
//!
//! Drives a full session through the queue: ordering, supersession, the depth
//! guard, death handling, retaliation and the weather modifiers.

use creature_duel::core::{
    Card, CardEffect, CardId, EffectAction, PlayerId, TargetType, Trigger,
};
use creature_duel::game::{
    GameAction, GameEvent, GameSession, QueueOutcome, SessionConfig, Weather,
};
use std::cell::RefCell;
use std::rc::Rc;

fn session() -> (GameSession, PlayerId, PlayerId) {
    let mut game = GameSession::new_two_player("Alice", "Bob", SessionConfig::default());
    game.logger.enable_capture();
    let (p1, p2) = (game.players[0].id, game.players[1].id);
    (game, p1, p2)
}

fn record_events(game: &mut GameSession) -> Rc<RefCell<Vec<GameEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    game.subscribe(move |e| sink.borrow_mut().push(e.clone()));
    events
}

fn creature(game: &mut GameSession, name: &str, attack: i32, health: i32) -> CardId {
    game.create_card(|id| Card::new_creature(id, name, attack, health))
}

fn thorny(game: &mut GameSession, name: &str, health: i32, retaliation: i32) -> CardId {
    game.create_card(|id| {
        Card::new_creature(id, name, 1, health).with_effect(CardEffect::triggered(
            Trigger::OnDamage,
            [EffectAction::damage(retaliation, TargetType::Enemy)],
        ))
    })
}

fn herald(game: &mut GameSession, name: &str) -> CardId {
    game.create_card(|id| {
        Card::new_creature(id, name, 2, 3).with_effect(CardEffect::triggered(
            Trigger::OnPlay,
            [EffectAction::damage(1, TargetType::Enemy)],
        ))
    })
}

fn health(game: &GameSession, card: CardId) -> i32 {
    game.cards.get(card).unwrap().health
}

#[test]
fn test_summon_resolves_before_earlier_damage() {
    let (mut game, p1, p2) = session();
    let wolf = creature(&mut game, "Wolf", 2, 2);
    game.cards.get_mut(wolf).unwrap().owner = Some(p1);

    game.add_action(GameAction::DamagePlayer {
        target: p2,
        amount: 1,
    });
    game.add_action(GameAction::MarkCombatTarget {
        attacker: wolf,
        defender: p2,
        target_slot: 0,
    });
    game.add_action(GameAction::Summon {
        creature: wolf,
        owner: p1,
        slot: Some(3),
    });

    let kinds: Vec<_> = game.pending_actions().map(|a| a.kind()).collect();
    assert_eq!(kinds, vec!["Summon", "MarkCombatTarget", "DamagePlayer"]);

    // The attack only works because the summon landed first
    game.resolve_actions();
    assert_eq!(game.find_battlefield_slot(wolf), Some((p1, 3)));
    assert_eq!(game.get_player(p2).unwrap().health, 17);
}

#[test]
fn test_second_action_for_creature_replaces_first() {
    let (mut game, p1, p2) = session();
    let wolf = creature(&mut game, "Wolf", 2, 2);
    let bear = creature(&mut game, "Bear", 1, 5);
    game.put_onto_battlefield(wolf, p1, 0).unwrap();
    game.put_onto_battlefield(bear, p2, 4).unwrap();

    let first = GameAction::MarkCombatTarget {
        attacker: wolf,
        defender: p2,
        target_slot: 0,
    };
    let second = GameAction::MarkCombatTarget {
        attacker: wolf,
        defender: p2,
        target_slot: 4,
    };
    assert_eq!(game.add_action(first.clone()), QueueOutcome::Queued);
    assert_eq!(game.add_action(second.clone()), QueueOutcome::Replaced(first));
    assert_eq!(game.pending_actions_count(), 1);
    assert_eq!(game.get_active_action(wolf), Some(&second));

    game.resolve_actions();
    assert_eq!(game.get_player(p2).unwrap().health, 20);
    assert_eq!(health(&game, bear), 3);
    assert!(!game.has_active_action(wolf));
}

#[test]
fn test_depth_guard_stops_death_chain() {
    let (mut game, p1, p2) = session();
    let on_death = |game: &mut GameSession, name: &str, amount: i32, target: TargetType| {
        game.create_card(|id| {
            Card::new_creature(id, name, 0, 1).with_effect(CardEffect::triggered(
                Trigger::OnDeath,
                [EffectAction::damage(amount, target)],
            ))
        })
    };
    // X0 kills Y0, Y0 kills X1, X1's parting shot would be the fourth link
    let x0 = on_death(&mut game, "X0", 1, TargetType::EnemyCreatures);
    let y0 = on_death(&mut game, "Y0", 1, TargetType::EnemyCreatures);
    let x1 = on_death(&mut game, "X1", 2, TargetType::Enemy);
    game.put_onto_battlefield(x0, p1, 0).unwrap();
    game.put_onto_battlefield(y0, p2, 0).unwrap();
    game.put_onto_battlefield(x1, p1, 1).unwrap();

    game.add_action(GameAction::DirectDamage {
        target: x0,
        amount: 1,
        source: None,
    });
    game.resolve_actions();

    assert!(game.players.iter().all(|p| p.battlefield.is_empty()));
    assert_eq!(game.get_player(p2).unwrap().health, 20);
    assert_eq!(game.queue.dropped_count(), 1);
    assert_eq!(
        game.logger.logs().count_matching(
            creature_duel::game::LogCategory::Queue,
            "depth limit"
        ),
        1
    );
    assert_eq!(game.pending_actions_count(), 0);
    assert_eq!(game.queue.iteration_depth(), 0);
}

#[test]
fn test_retaliation_loop_terminates() {
    let (mut game, p1, p2) = session();
    let a = thorny(&mut game, "Toad A", 20, 1);
    let b = thorny(&mut game, "Toad B", 20, 1);
    game.put_onto_battlefield(a, p1, 0).unwrap();
    game.put_onto_battlefield(b, p2, 0).unwrap();

    game.add_action(GameAction::DamageCreature {
        target: a,
        amount: 1,
        attacker: Some(b),
        is_direct_damage: false,
    });
    game.resolve_actions();

    // A hit, B answers, A's second hit is not answered in the same chain
    assert_eq!(health(&game, a), 18);
    assert_eq!(health(&game, b), 19);
    assert_eq!(game.pending_actions_count(), 0);
    assert!(!game.queue.is_resolving());
}

#[test]
fn test_creature_dies_once() {
    let (mut game, _, p2) = session();
    let events = record_events(&mut game);
    let whelp = creature(&mut game, "Whelp", 1, 2);
    game.put_onto_battlefield(whelp, p2, 1).unwrap();

    for _ in 0..2 {
        game.add_action(GameAction::DirectDamage {
            target: whelp,
            amount: 5,
            source: None,
        });
    }
    game.resolve_actions();

    let deaths = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, GameEvent::CreatureDied { .. }))
        .count();
    assert_eq!(deaths, 1);
    assert!(game.cards.get(whelp).unwrap().is_dead);
    assert_eq!(health(&game, whelp), 0);
    assert!(game.get_player(p2).unwrap().zones.graveyard.contains(whelp));
    assert_eq!(game.logger.logs().count_matching(
        creature_duel::game::LogCategory::Action,
        "skipped"
    ), 1);
}

#[test]
fn test_retaliation_fires_once_per_chain() {
    let (mut game, p1, p2) = session();
    let toad = thorny(&mut game, "Thornback Toad", 10, 2);
    let w1 = creature(&mut game, "Wolf 1", 1, 5);
    let w2 = creature(&mut game, "Wolf 2", 1, 5);
    game.put_onto_battlefield(toad, p2, 0).unwrap();
    game.put_onto_battlefield(w1, p1, 0).unwrap();
    game.put_onto_battlefield(w2, p1, 1).unwrap();

    for attacker in [w1, w2] {
        game.add_action(GameAction::DamageCreature {
            target: toad,
            amount: 1,
            attacker: Some(attacker),
            is_direct_damage: false,
        });
    }
    game.resolve_actions();

    assert_eq!(health(&game, toad), 8);
    assert_eq!(health(&game, w1), 3);
    assert_eq!(health(&game, w2), 5);

    // A fresh top-level pass starts a fresh ledger
    game.add_action(GameAction::DamageCreature {
        target: toad,
        amount: 1,
        attacker: Some(w2),
        is_direct_damage: false,
    });
    game.resolve_actions();
    assert_eq!(health(&game, w2), 3);
}

#[test]
fn test_empty_resolve_is_silent() {
    let (mut game, _, _) = session();
    let events = record_events(&mut game);

    game.resolve_actions();
    assert!(events.borrow().is_empty());
    assert_eq!(game.pending_actions_count(), 0);
    assert_eq!(game.queue.iteration_depth(), 0);
}

#[test]
fn test_player_damage_accumulates() {
    let (mut game, _, p2) = session();
    let events = record_events(&mut game);
    game.add_action(GameAction::DamagePlayer {
        target: p2,
        amount: 5,
    });
    game.add_action(GameAction::DamagePlayer {
        target: p2,
        amount: 3,
    });
    assert_eq!(game.pending_actions_count(), 2);

    game.resolve_actions();
    assert_eq!(game.get_player(p2).unwrap().health, 12);

    let damaged: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            GameEvent::PlayerDamaged { amount, .. } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(damaged, vec![5, 3]);
    assert_eq!(
        events.borrow().last(),
        Some(&GameEvent::GameStateChanged)
    );
    assert!(events.borrow().contains(&GameEvent::ActionsResolved));
}

#[test]
fn test_player_health_floors_at_zero() {
    let (mut game, _, p2) = session();
    game.add_action(GameAction::DamagePlayer {
        target: p2,
        amount: 50,
    });
    game.resolve_actions();
    assert_eq!(game.get_player(p2).unwrap().health, 0);
    assert_eq!(game.winner(), Some(game.players[0].id));
}

#[test]
fn test_attack_on_empty_slot_hits_player() {
    let (mut game, p1, p2) = session();
    let brute = creature(&mut game, "Brute", 4, 4);
    game.put_onto_battlefield(brute, p1, 2).unwrap();

    assert!(game.handle_creature_combat(brute, p2, 3));
    assert!(!game.handle_creature_combat(brute, p2, 1));
    assert_eq!(game.pending_actions_count(), 1);

    game.resolve_actions();
    assert_eq!(game.get_player(p2).unwrap().health, 16);
    assert_eq!(game.pending_actions_count(), 0);

    // Round tracking resets after resolution
    assert!(!game.combat.has_attacked(brute));
}

#[test]
fn test_attack_on_occupied_slot_hits_creature() {
    let (mut game, p1, p2) = session();
    let brute = creature(&mut game, "Brute", 4, 4);
    let toad = thorny(&mut game, "Thornback Toad", 6, 2);
    game.put_onto_battlefield(brute, p1, 0).unwrap();
    game.put_onto_battlefield(toad, p2, 1).unwrap();

    assert!(game.handle_creature_combat(brute, p2, 1));
    game.resolve_actions();

    assert_eq!(health(&game, toad), 2);
    assert_eq!(health(&game, brute), 2);
    assert_eq!(game.get_player(p2).unwrap().health, 20);
}

#[test]
fn test_invalid_attacks_are_rejected() {
    let (mut game, p1, p2) = session();
    let brute = creature(&mut game, "Brute", 4, 4);
    let benched = creature(&mut game, "Benched", 1, 1);
    game.put_onto_battlefield(brute, p1, 0).unwrap();

    assert!(!game.handle_creature_combat(benched, p2, 0));
    assert!(!game.handle_creature_combat(brute, p1, 0));
    assert!(!game.handle_creature_combat(brute, p2, 9));
    assert!(!game.handle_creature_combat(CardId::new(999), p2, 0));
    assert_eq!(game.pending_actions_count(), 0);
    assert_eq!(
        game.logger
            .logs()
            .count_matching(creature_duel::game::LogCategory::Combat, "rejected"),
        4
    );
}

#[test]
fn test_swap_exchanges_slots() {
    let (mut game, p1, _) = session();
    let a = creature(&mut game, "A", 1, 1);
    let b = creature(&mut game, "B", 1, 1);
    game.put_onto_battlefield(a, p1, 0).unwrap();
    game.put_onto_battlefield(b, p1, 1).unwrap();

    game.add_action(GameAction::Swap {
        creature_a: a,
        creature_b: b,
        slot_a: 0,
        slot_b: 1,
        owner: p1,
    });
    game.resolve_actions();

    let field = &game.get_player(p1).unwrap().battlefield;
    assert_eq!(field.occupant(0), Some(b));
    assert_eq!(field.occupant(1), Some(a));
    assert_eq!(field.len(), 2);
}

#[test]
fn test_move_into_occupied_slot_swaps() {
    let (mut game, p1, _) = session();
    let a = creature(&mut game, "A", 1, 1);
    let b = creature(&mut game, "B", 1, 1);
    game.put_onto_battlefield(a, p1, 0).unwrap();
    game.put_onto_battlefield(b, p1, 3).unwrap();

    game.add_action(GameAction::Move {
        creature: a,
        from_slot: 0,
        to_slot: 4,
        player: p1,
    });
    game.add_action(GameAction::Move {
        creature: b,
        from_slot: 3,
        to_slot: 4,
        player: p1,
    });
    game.resolve_actions();

    let field = &game.get_player(p1).unwrap().battlefield;
    assert_eq!(field.occupant(4), Some(b));
    assert_eq!(field.occupant(3), Some(a));
    assert_eq!(field.occupant(0), None);
}

#[test]
fn test_weather_adjusts_damage() {
    let (mut game, p1, p2) = session();
    let brute = creature(&mut game, "Brute", 3, 4);
    let target = creature(&mut game, "Target", 1, 20);
    game.put_onto_battlefield(brute, p1, 0).unwrap();
    game.put_onto_battlefield(target, p2, 0).unwrap();

    game.set_weather(Weather::Rainy);
    game.handle_creature_combat(brute, p2, 0);
    game.resolve_actions();
    assert_eq!(health(&game, target), 18);

    game.set_weather(Weather::Sunny);
    game.add_action(GameAction::DirectDamage {
        target,
        amount: 2,
        source: None,
    });
    game.resolve_actions();
    assert_eq!(health(&game, target), 15);

    // Rain never turns damage into healing
    game.set_weather(Weather::Rainy);
    game.add_action(GameAction::DamageCreature {
        target,
        amount: 0,
        attacker: None,
        is_direct_damage: false,
    });
    game.resolve_actions();
    assert_eq!(health(&game, target), 15);
}

#[test]
fn test_summon_fires_on_play() {
    let (mut game, p1, p2) = session();
    let herald = herald(&mut game, "Herald of Sparks");
    game.add_to_hand(p1, herald).unwrap();

    game.add_action(GameAction::PlayCard {
        card: herald,
        owner: p1,
        target: None,
    });
    game.resolve_actions();

    assert_eq!(game.find_battlefield_slot(herald), Some((p1, 0)));
    assert!(!game.get_player(p1).unwrap().zones.hand.contains(herald));
    assert_eq!(game.get_player(p2).unwrap().health, 19);
}

#[test]
fn test_summon_into_full_battlefield_fails_cleanly() {
    let (mut game, p1, p2) = session();
    for slot in 0..5 {
        let filler = creature(&mut game, "Filler", 1, 1);
        game.put_onto_battlefield(filler, p1, slot).unwrap();
    }
    let herald = herald(&mut game, "Herald of Sparks");

    game.add_action(GameAction::Summon {
        creature: herald,
        owner: p1,
        slot: None,
    });
    game.resolve_actions();

    assert!(!game.is_on_battlefield(herald));
    assert_eq!(game.get_player(p2).unwrap().health, 20);
    assert_eq!(game.pending_actions_count(), 0);
}

#[test]
fn test_spell_resolves_and_goes_to_graveyard() {
    let (mut game, p1, p2) = session();
    let bystander = creature(&mut game, "Bystander", 1, 2);
    game.put_onto_battlefield(bystander, p2, 2).unwrap();
    let rain = game.create_card(|id| {
        Card::new(id, "Cinder Rain", creature_duel::core::CardType::Spell).with_effect(
            CardEffect::triggered(
                Trigger::OnPlay,
                [
                    EffectAction::damage(1, TargetType::EnemyCreatures),
                    EffectAction::damage(1, TargetType::Enemy),
                ],
            ),
        )
    });
    game.add_to_hand(p1, rain).unwrap();

    game.add_action(GameAction::PlayCard {
        card: rain,
        owner: p1,
        target: None,
    });
    game.resolve_actions();

    assert_eq!(health(&game, bystander), 1);
    assert_eq!(game.get_player(p2).unwrap().health, 19);
    assert!(game.get_player(p1).unwrap().zones.graveyard.contains(rain));
}

#[test]
fn test_cleanup_drops_everything() {
    let (mut game, p1, p2) = session();
    let events = record_events(&mut game);
    let brute = creature(&mut game, "Brute", 4, 4);
    game.put_onto_battlefield(brute, p1, 0).unwrap();
    game.handle_creature_combat(brute, p2, 0);

    game.cleanup();
    events.borrow_mut().clear();
    game.resolve_actions();

    assert_eq!(game.pending_actions_count(), 0);
    assert!(!game.has_active_action(brute));
    assert!(events.borrow().is_empty());
    assert_eq!(game.get_player(p2).unwrap().health, 20);
}

#[test]
fn test_summons_keep_queue_order_in_one_pass() {
    let (mut game, p1, p2) = session();
    let first = herald(&mut game, "Herald of Sparks");
    let second = creature(&mut game, "Wolf", 2, 2);

    for card in [first, second] {
        game.add_action(GameAction::Summon {
            creature: card,
            owner: p1,
            slot: None,
        });
    }
    game.resolve_actions();

    assert_eq!(game.find_battlefield_slot(first), Some((p1, 0)));
    assert_eq!(game.find_battlefield_slot(second), Some((p1, 1)));
    assert_eq!(game.get_player(p2).unwrap().health, 19);
}

#[test]
fn test_independent_attacks_each_draw_retaliation() {
    let (mut game, p1, p2) = session();
    let toad = thorny(&mut game, "Toad", 10, 1);
    let wolf = creature(&mut game, "Wolf", 1, 10);
    let x = thorny(&mut game, "X", 20, 1);
    let y = thorny(&mut game, "Y", 20, 1);
    game.put_onto_battlefield(toad, p1, 0).unwrap();
    game.put_onto_battlefield(wolf, p1, 1).unwrap();
    game.put_onto_battlefield(x, p2, 0).unwrap();
    game.put_onto_battlefield(y, p2, 1).unwrap();

    assert!(game.handle_creature_combat(toad, p2, 0));
    assert!(game.handle_creature_combat(wolf, p2, 1));
    game.resolve_actions();

    // Toad and X trade one round of thorns; the wolf's fight is separate
    assert_eq!(health(&game, x), 18);
    assert_eq!(health(&game, toad), 9);
    assert_eq!(health(&game, y), 19);
    assert_eq!(health(&game, wolf), 9);
    assert_eq!(game.queue.dropped_count(), 0);
}

#[test]
fn test_summon_into_last_free_slot_lands_before_on_play_resolves() {
    let (mut game, p1, p2) = session();
    for slot in 0..4 {
        let filler = creature(&mut game, "Filler", 1, 1);
        game.put_onto_battlefield(filler, p1, slot).unwrap();
    }
    let first = herald(&mut game, "Herald of Sparks");
    let second = creature(&mut game, "Wolf", 2, 2);

    for card in [first, second] {
        game.add_action(GameAction::Summon {
            creature: card,
            owner: p1,
            slot: None,
        });
    }
    game.resolve_actions();

    assert_eq!(game.find_battlefield_slot(first), Some((p1, 4)));
    assert!(!game.is_on_battlefield(second));
    assert_eq!(game.get_player(p2).unwrap().health, 19);
    assert_eq!(
        game.logger
            .logs()
            .count_matching(creature_duel::game::LogCategory::Action, "Summon skipped"),
        1
    );
}
