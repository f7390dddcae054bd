//! Whole-game scenarios driven through the public `Room` API.

use rand::SeedableRng;
use rand::rngs::StdRng;
use uno_engine::deck::{self, DECK_SIZE};
use uno_engine::rules::{self, Direction};
use uno_engine::{
    Action, Applied, Card, CardKind, Color, GameConfig, Phase, PlayerId, Profile, Rejection, Room,
    RoomCode, view,
};

// =========================================================================
// Helpers
// =========================================================================

fn room(players: u64, config: GameConfig) -> Room {
    let code = RoomCode::parse("FLOW01").unwrap();
    let mut room = Room::new(code, PlayerId(1), Profile::new("p1"), config);
    for id in 2..=players {
        room.join(PlayerId(id), Profile::new(format!("p{id}"))).unwrap();
    }
    room
}

fn remove_one(cards: &mut Vec<Card>, card: Card) {
    let pos = cards
        .iter()
        .position(|c| *c == card)
        .unwrap_or_else(|| panic!("{card} not left in deck"));
    cards.remove(pos);
}

/// Orders a full deck so that seat `i` is dealt `hands[i]`, `top` opens the
/// discard pile and `draws` come off the draw pile first.
fn rigged(hands: &[Vec<Card>], top: Card, draws: &[Card]) -> Vec<Card> {
    let mut rest = deck::build();
    for card in hands.iter().flatten().chain(draws).chain([&top]) {
        remove_one(&mut rest, *card);
    }
    let mut deck = rest;
    deck.extend(draws.iter().rev());
    deck.push(top);
    for hand in hands.iter().rev() {
        deck.extend(hand.iter().rev());
    }
    deck
}

fn rigged_room(hands: Vec<Vec<Card>>, top: Card, draws: &[Card]) -> Room {
    let config = GameConfig {
        hand_size: hands[0].len(),
        ..GameConfig::default()
    };
    let mut room = room(hands.len() as u64, config);
    let deck = rigged(&hands, top, draws);
    assert_eq!(room.start_with_deck(PlayerId(1), deck), Ok(Applied::Game));
    room
}

fn n(color: Color, value: u8) -> Card {
    Card::number(color, value)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(0xC0FFEE)
}

// =========================================================================
// Start
// =========================================================================

#[test]
fn test_three_player_start_deals_21_seeds_1_leaves_86() {
    let mut room = room(3, GameConfig::default());
    room.apply(PlayerId(1), Action::StartGame, &mut rng()).unwrap();

    let game = room.game().unwrap();
    let in_hands: usize = room.players().iter().map(|p| game.card_count(p.id)).sum();
    assert_eq!(in_hands, 21);
    assert_eq!(game.discard_count(), 1);
    assert!(game.top_card().is_colored_number());
    assert_eq!(game.draw_count(), 86);
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.direction(), Direction::Clockwise);
}

#[test]
fn test_rigged_deal_lands_where_expected() {
    let room = rigged_room(
        vec![vec![n(Color::Red, 1), n(Color::Red, 2)], vec![n(Color::Blue, 1), n(Color::Blue, 2)]],
        n(Color::Green, 3),
        &[n(Color::Yellow, 9)],
    );
    let game = room.game().unwrap();
    assert_eq!(game.hand(PlayerId(1)), &[n(Color::Red, 1), n(Color::Red, 2)]);
    assert_eq!(game.hand(PlayerId(2)), &[n(Color::Blue, 1), n(Color::Blue, 2)]);
    assert_eq!(*game.top_card(), n(Color::Green, 3));
    assert_eq!(game.total_cards(), DECK_SIZE);
}

// =========================================================================
// Special cards
// =========================================================================

#[test]
fn test_two_player_reverse_keeps_turn() {
    let mut room = rigged_room(
        vec![
            vec![Card::action(Color::Red, CardKind::Reverse), n(Color::Red, 5)],
            vec![n(Color::Blue, 1), n(Color::Blue, 2)],
        ],
        n(Color::Red, 3),
        &[],
    );
    let play = Action::PlayCard { hand_index: 0, chosen_color: None };
    assert_eq!(room.apply(PlayerId(1), play, &mut rng()), Ok(Applied::Game));

    let game = room.game().unwrap();
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.direction(), Direction::CounterClockwise);
    assert_eq!(game.card_count(PlayerId(2)), 2);
}

#[test]
fn test_wild4_green_forces_four_and_sets_color() {
    let mut room = rigged_room(
        vec![
            vec![Card::wild(CardKind::Wild4), n(Color::Red, 1)],
            vec![n(Color::Blue, 1), n(Color::Blue, 2)],
            vec![n(Color::Green, 5), n(Color::Red, 7)],
        ],
        n(Color::Red, 3),
        &[],
    );
    let play = Action::PlayCard { hand_index: 0, chosen_color: Some(Color::Green) };
    room.apply(PlayerId(1), play, &mut rng()).unwrap();

    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(2)), 6);
    assert_eq!(game.top_card().kind, CardKind::Wild4);
    assert_eq!(game.top_card().chosen_color, Some(Color::Green));
    assert_eq!(game.current_player(), 2, "victim is skipped");
    assert_eq!(game.total_cards(), DECK_SIZE);

    // Matching now goes by green.
    let red = Action::PlayCard { hand_index: 1, chosen_color: None };
    assert_eq!(room.apply(PlayerId(3), red, &mut rng()), Err(Rejection::IllegalCard));
    let green = Action::PlayCard { hand_index: 0, chosen_color: None };
    assert_eq!(room.apply(PlayerId(3), green, &mut rng()), Ok(Applied::Game));
}

#[test]
fn test_wild4_on_short_pile_draws_what_is_left() {
    let hands = vec![
        vec![Card::wild(CardKind::Wild4), n(Color::Red, 1)],
        vec![n(Color::Blue, 1), n(Color::Blue, 2)],
    ];
    let mut deck = vec![n(Color::Yellow, 4)];
    deck.push(n(Color::Red, 3));
    for hand in hands.iter().rev() {
        deck.extend(hand.iter().rev());
    }
    let config = GameConfig { hand_size: 2, ..GameConfig::default() };
    let mut room = room(2, config);
    room.start_with_deck(PlayerId(1), deck).unwrap();
    assert_eq!(room.game().unwrap().draw_count(), 1);

    let play = Action::PlayCard { hand_index: 0, chosen_color: Some(Color::Blue) };
    room.apply(PlayerId(1), play, &mut rng()).unwrap();

    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(2)), 3);
    assert_eq!(game.draw_count(), 0);
}

#[test]
fn test_wild_without_color_rejected_without_mutation() {
    let mut room = rigged_room(
        vec![
            vec![Card::wild(CardKind::Wild), n(Color::Red, 1)],
            vec![n(Color::Blue, 1), n(Color::Blue, 2)],
        ],
        n(Color::Red, 3),
        &[],
    );
    for chosen_color in [None, Some(Color::Black)] {
        let play = Action::PlayCard { hand_index: 0, chosen_color };
        assert_eq!(room.apply(PlayerId(1), play, &mut rng()), Err(Rejection::MissingColor));
    }
    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(1)), 2);
    assert_eq!(*game.top_card(), n(Color::Red, 3));
    assert_eq!(game.current_player(), 0);
}

#[test]
fn test_draw2_in_three_player_game() {
    let mut room = rigged_room(
        vec![
            vec![Card::action(Color::Red, CardKind::Draw2), n(Color::Red, 1)],
            vec![n(Color::Blue, 1), n(Color::Blue, 2)],
            vec![n(Color::Green, 1), n(Color::Green, 2)],
        ],
        n(Color::Red, 3),
        &[],
    );
    let play = Action::PlayCard { hand_index: 0, chosen_color: None };
    room.apply(PlayerId(1), play, &mut rng()).unwrap();

    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(2)), 4);
    assert_eq!(game.current_player(), 2);
}

// =========================================================================
// Turns and drawing
// =========================================================================

#[test]
fn test_out_of_turn_and_bad_index_rejected() {
    let mut room = rigged_room(
        vec![vec![n(Color::Red, 1), n(Color::Red, 2)], vec![n(Color::Red, 4), n(Color::Blue, 2)]],
        n(Color::Red, 3),
        &[],
    );
    let play = Action::PlayCard { hand_index: 0, chosen_color: None };
    assert_eq!(room.apply(PlayerId(2), play, &mut rng()), Err(Rejection::NotYourTurn));
    let play = Action::PlayCard { hand_index: 5, chosen_color: None };
    assert_eq!(room.apply(PlayerId(1), play, &mut rng()), Err(Rejection::NoSuchCard(5)));
}

#[test]
fn test_draw_playable_card_keeps_turn() {
    let mut room = rigged_room(
        vec![vec![n(Color::Blue, 1), n(Color::Blue, 2)], vec![n(Color::Green, 1), n(Color::Green, 2)]],
        n(Color::Red, 3),
        &[n(Color::Red, 9)],
    );
    assert_eq!(room.apply(PlayerId(1), Action::DrawCard, &mut rng()), Ok(Applied::Game));

    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(1)), 3);
    assert_eq!(game.current_player(), 0);

    // Holding a playable card now, so another draw is refused.
    assert_eq!(
        room.apply(PlayerId(1), Action::DrawCard, &mut rng()),
        Err(Rejection::MustPlay)
    );
}

#[test]
fn test_draw_unplayable_card_passes_turn() {
    let mut room = rigged_room(
        vec![vec![n(Color::Blue, 1), n(Color::Blue, 2)], vec![n(Color::Green, 1), n(Color::Green, 2)]],
        n(Color::Red, 3),
        &[n(Color::Yellow, 8)],
    );
    room.apply(PlayerId(1), Action::DrawCard, &mut rng()).unwrap();

    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(1)), 3);
    assert_eq!(game.current_player(), 1);
}

#[test]
fn test_draw_from_empty_pile_is_noop() {
    let hands = vec![vec![n(Color::Blue, 1)], vec![n(Color::Green, 1)]];
    let deck = vec![n(Color::Red, 3), n(Color::Green, 1), n(Color::Blue, 1)];
    let config = GameConfig { hand_size: 1, ..GameConfig::default() };
    let mut room = room(2, config);
    room.start_with_deck(PlayerId(1), deck).unwrap();
    assert_eq!(room.game().unwrap().hand(PlayerId(1)), hands[0].as_slice());

    assert_eq!(room.apply(PlayerId(1), Action::DrawCard, &mut rng()), Ok(Applied::Unchanged));
    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(1)), 1);
    assert_eq!(game.current_player(), 0);
}

#[test]
fn test_draw_from_empty_pile_recycles_when_enabled() {
    // Seat 0 gets red 5 and blue 9, seat 1 red 6 and green 9, red 3 opens
    // and yellow 7 is the only card left to draw.
    let deck = vec![
        n(Color::Yellow, 7),
        n(Color::Red, 3),
        n(Color::Green, 9),
        n(Color::Red, 6),
        n(Color::Blue, 9),
        n(Color::Red, 5),
    ];
    let config = GameConfig { hand_size: 2, recycle_discard: true, ..GameConfig::default() };
    let mut room = room(2, config);
    room.start_with_deck(PlayerId(1), deck).unwrap();

    let first = Action::PlayCard { hand_index: 0, chosen_color: None };
    room.apply(PlayerId(1), first.clone(), &mut rng()).unwrap();
    room.apply(PlayerId(2), first, &mut rng()).unwrap();
    room.apply(PlayerId(1), Action::DrawCard, &mut rng()).unwrap();
    assert_eq!(room.game().unwrap().draw_count(), 0);
    assert_eq!(room.game().unwrap().discard_count(), 3);

    // Red 3 and red 5 go back into the pile; either one plays on red 6.
    assert_eq!(room.apply(PlayerId(2), Action::DrawCard, &mut rng()), Ok(Applied::Game));
    let game = room.game().unwrap();
    assert_eq!(*game.top_card(), n(Color::Red, 6));
    assert_eq!(game.discard_count(), 1);
    assert_eq!(game.draw_count(), 1);
    assert_eq!(game.card_count(PlayerId(2)), 2);
    assert_eq!(game.current_player(), 1, "drawn red card is playable");
    assert_eq!(game.total_cards(), 6);
}

#[test]
fn test_recycle_with_only_top_card_is_noop() {
    let deck = vec![
        n(Color::Yellow, 5),
        n(Color::Red, 3),
        n(Color::Green, 1),
        n(Color::Blue, 1),
    ];
    let config = GameConfig { hand_size: 1, recycle_discard: true, ..GameConfig::default() };
    let mut room = room(2, config);
    room.start_with_deck(PlayerId(1), deck).unwrap();

    room.apply(PlayerId(1), Action::DrawCard, &mut rng()).unwrap();
    assert_eq!(room.game().unwrap().current_player(), 1);
    assert_eq!(
        room.apply(PlayerId(2), Action::DrawCard, &mut rng()),
        Ok(Applied::Unchanged)
    );
    let game = room.game().unwrap();
    assert_eq!(game.card_count(PlayerId(2)), 1);
    assert_eq!(game.discard_count(), 1);
}

// =========================================================================
// Winning
// =========================================================================

#[test]
fn test_emptying_hand_with_action_card_wins() {
    let mut room = rigged_room(
        vec![vec![Card::action(Color::Red, CardKind::Draw2)], vec![n(Color::Blue, 1)]],
        n(Color::Red, 3),
        &[],
    );
    let play = Action::PlayCard { hand_index: 0, chosen_color: None };
    let applied = room.apply(PlayerId(1), play, &mut rng()).unwrap();

    assert_eq!(applied, Applied::Won { winner: PlayerId(1), name: "p1".into() });
    assert_eq!(room.phase(), Phase::Lobby);
    assert!(room.game().is_none());
    assert!(!view::lobby(&room).started);
}

#[test]
fn test_final_wild_still_needs_color() {
    let mut room = rigged_room(
        vec![vec![Card::wild(CardKind::Wild)], vec![n(Color::Blue, 1)]],
        n(Color::Red, 3),
        &[],
    );
    let play = Action::PlayCard { hand_index: 0, chosen_color: None };
    assert_eq!(room.apply(PlayerId(1), play, &mut rng()), Err(Rejection::MissingColor));
    assert_eq!(room.phase(), Phase::Playing);

    let play = Action::PlayCard { hand_index: 0, chosen_color: Some(Color::Yellow) };
    assert!(matches!(
        room.apply(PlayerId(1), play, &mut rng()),
        Ok(Applied::Won { winner: PlayerId(1), .. })
    ));
}

#[test]
fn test_restart_after_win_deals_fresh_game() {
    let mut room = rigged_room(
        vec![vec![n(Color::Red, 1)], vec![n(Color::Blue, 1)]],
        n(Color::Red, 3),
        &[],
    );
    let play = Action::PlayCard { hand_index: 0, chosen_color: None };
    room.apply(PlayerId(1), play, &mut rng()).unwrap();

    assert_eq!(room.apply(PlayerId(1), Action::RestartGame, &mut rng()), Ok(Applied::Game));
    let game = room.game().unwrap();
    assert_eq!(game.total_cards(), DECK_SIZE);
    assert_eq!(game.card_count(PlayerId(2)), 1);
}

// =========================================================================
// Whole-game properties
// =========================================================================

/// Plays seeded games with a greedy strategy, checking card conservation,
/// turn validity and hidden information after every accepted action.
fn simulate(players: u64, seed: u64, recycle_discard: bool) {
    let config = GameConfig { recycle_discard, ..GameConfig::default() };
    let mut room = room(players, config);
    let mut rng = StdRng::seed_from_u64(seed);
    room.apply(PlayerId(1), Action::StartGame, &mut rng).unwrap();

    for _ in 0..5_000 {
        let Some(game) = room.game() else {
            return;
        };
        assert_eq!(game.total_cards(), DECK_SIZE);
        assert!(game.current_player() < room.players().len());

        for viewer in room.players() {
            let projected = view::project(game, &room, viewer.id);
            assert_eq!(projected.hand, game.hand(viewer.id));
            let json = serde_json::to_value(&projected).unwrap();
            assert!(json["players"].as_array().unwrap().iter().all(|p| p.get("hand").is_none()));
        }

        let current = room.players()[game.current_player()].id;
        let top = *game.top_card();
        let legal = game.hand(current).iter().position(|c| rules::is_legal_play(c, &top));
        let action = match legal {
            Some(hand_index) => Action::PlayCard { hand_index, chosen_color: Some(Color::Blue) },
            None => Action::DrawCard,
        };

        match room.apply(current, action, &mut rng) {
            Ok(Applied::Won { winner, .. }) => {
                assert_eq!(winner, current);
                assert_eq!(room.phase(), Phase::Lobby);
                return;
            }
            Ok(Applied::Unchanged) => return,
            Ok(_) => {}
            Err(rejection) => panic!("greedy move rejected: {rejection}"),
        }
    }
}

#[test]
fn test_simulated_games_conserve_cards() {
    for seed in 0..20 {
        simulate(2 + seed % 5, seed, false);
    }
}

#[test]
fn test_simulated_games_with_recycling_conserve_cards() {
    for seed in 100..120 {
        simulate(2 + seed % 5, seed, true);
    }
}

#[test]
fn test_leaving_mid_game_conserves_cards() {
    let mut room = room(4, GameConfig::default());
    let mut rng = rng();
    room.apply(PlayerId(1), Action::StartGame, &mut rng).unwrap();

    room.leave(PlayerId(3)).unwrap();
    let game = room.game().unwrap();
    assert_eq!(game.total_cards(), DECK_SIZE);
    assert_eq!(game.card_count(PlayerId(3)), 0);
    assert_eq!(game.draw_count(), DECK_SIZE - 21 - 1);
    assert!(game.current_player() < 3);
}
