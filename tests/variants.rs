use oche::darts;
use oche::match_management::{
    Dart, GameType, Leg, LegParameters, LifeRule, Match, MatchMode, ScoringError, TurnPolicy,
    Visit,
};
use oche::test_support::common::{init_tracing_for_tests, leg_players, player_ids, throw_current};

fn match_throw(m: &mut Match, darts: &[Dart]) -> Result<(), ScoringError> {
    let leg = m.current_leg();
    let player = leg.current_player().ok_or(ScoringError::LegClosed(leg.id()))?;
    let visit = Visit::new(leg.id(), player, darts)?;
    m.apply_visit(visit, TurnPolicy::Enforce)?;
    Ok(())
}

#[test]
fn test_cricket_leg_needs_closed_numbers_and_lowest_score() {
    init_tracing_for_tests();
    let p = player_ids(2);
    let mut leg = Leg::new(GameType::Cricket, LegParameters::default(), leg_players(&p)).unwrap();

    throw_current(&mut leg, &darts!["T15", "T16", "T17"]).unwrap();
    // p[1] closes 20 and scores on it before p[0] gets there
    throw_current(&mut leg, &darts!["T20", "T20", "0"]).unwrap();
    assert_eq!(leg.points(p[0]), Some(60));

    throw_current(&mut leg, &darts!["T18", "T19", "T20"]).unwrap();
    throw_current(&mut leg, &darts!["0"]).unwrap();

    // p[0] closes the bull: all seven closed, but 60 against 0
    let outcome = throw_current(&mut leg, &darts!["D25", "25"]).unwrap();
    assert_eq!(leg.cricket_marks(p[0]), Some([3; 7]));
    assert!(!outcome.finished);

    throw_current(&mut leg, &darts!["0"]).unwrap();

    // 19 is still open for p[1]: 57 against 60 is not enough
    let outcome = throw_current(&mut leg, &darts!["T19"]).unwrap();
    assert_eq!(leg.points(p[1]), Some(57));
    assert!(!outcome.finished);
    throw_current(&mut leg, &darts!["0"]).unwrap();

    let outcome = throw_current(&mut leg, &darts!["T19"]).unwrap();
    assert_eq!(leg.points(p[1]), Some(114));
    assert!(outcome.finished);
    assert_eq!(outcome.winner, Some(p[0]));
}

#[test]
fn test_knockout_last_player_standing() {
    let p = player_ids(3);
    let params = LegParameters::knockout(2, LifeRule::BeatPrevious);
    let mut leg = Leg::new(GameType::Knockout, params, leg_players(&p)).unwrap();

    throw_current(&mut leg, &darts!["T20"]).unwrap(); // p0 60
    throw_current(&mut leg, &darts!["20"]).unwrap(); // p1 20 < 60
    throw_current(&mut leg, &darts!["5"]).unwrap(); // p2 5 < 20
    throw_current(&mut leg, &darts!["1"]).unwrap(); // p0 1 < 5
    throw_current(&mut leg, &darts!["0"]).unwrap(); // p1 0 < 1, out
    assert_eq!(leg.lives(p[1]), Some(0));
    assert_eq!(leg.current_player(), Some(p[2]));

    throw_current(&mut leg, &darts!["T20"]).unwrap(); // p2 60
    let outcome = throw_current(&mut leg, &darts!["D20"]).unwrap(); // p0 40 < 60, out
    assert!(outcome.finished);
    assert_eq!(outcome.winner, Some(p[2]));
}

#[test]
fn test_shootout_tie_waits_for_declared_winner() {
    let p = player_ids(2);
    let mut m = Match::new(
        GameType::Shootout,
        MatchMode::first_to(1),
        leg_players(&p),
        LegParameters::default(),
    )
    .unwrap();

    for _ in 0..6 {
        match_throw(&mut m, &darts!["20", "20", "20"]).unwrap();
    }
    let leg = m.current_leg();
    assert!(leg.is_finished());
    assert_eq!(leg.winner(), None);
    assert_eq!(leg.points(p[0]), leg.points(p[1]));
    assert!(!m.is_finished());

    let leg_id = leg.id();
    let visit = Visit::new(leg_id, p[0], &darts!["20"]).unwrap();
    assert_eq!(
        m.apply_visit(visit, TurnPolicy::Override),
        Err(ScoringError::LegClosed(leg_id))
    );

    m.declare_leg_winner(p[1]).unwrap();
    assert!(m.is_finished());
    assert_eq!(m.winner(), Some(p[1]));
}

#[test]
fn test_level_match_goes_to_tie_break() {
    let p = player_ids(2);
    let mode = MatchMode {
        wins_required: 2,
        legs_required: Some(2),
        tie_break: None,
    }
    .with_tie_break(GameType::Shootout, LegParameters::default());
    let mut m = Match::new(GameType::X01, mode, leg_players(&p), LegParameters::x01(40)).unwrap();

    // Each player checks out the leg they start
    match_throw(&mut m, &darts!["D20"]).unwrap();
    match_throw(&mut m, &darts!["D20"]).unwrap();
    assert_eq!(m.wins_per_player(), vec![(p[0], 1), (p[1], 1)]);

    let tie_break = m.current_leg();
    assert_eq!(tie_break.game_type(), GameType::Shootout);
    assert_eq!(tie_break.current_player(), Some(p[0]));

    for visit in 0..6 {
        let darts = if visit % 2 == 0 {
            darts!["T20"]
        } else {
            darts!["T19"]
        };
        match_throw(&mut m, &darts).unwrap();
    }
    assert!(m.is_finished());
    assert_eq!(m.winner(), Some(p[0]));
    assert_eq!(m.legs().len(), 3);
}

#[test]
fn test_level_match_without_tie_break_is_a_draw() {
    let p = player_ids(2);
    let mode = MatchMode {
        wins_required: 2,
        legs_required: Some(2),
        tie_break: None,
    };
    let mut m = Match::new(GameType::X01, mode, leg_players(&p), LegParameters::x01(40)).unwrap();

    match_throw(&mut m, &darts!["D20"]).unwrap();
    match_throw(&mut m, &darts!["D20"]).unwrap();
    assert!(m.is_finished());
    assert_eq!(m.winner(), None);
}

#[test]
fn test_tic_tac_toe_board_and_declaration() {
    let p = player_ids(2);
    let mut m = Match::new(
        GameType::TicTacToe,
        MatchMode::first_to(1),
        leg_players(&p),
        LegParameters::tic_tac_toe(60),
    )
    .unwrap();

    let numbers = m.current_leg().tic_tac_toe_numbers().unwrap();
    assert!(numbers.iter().all(|n| (2..=60).contains(n)));

    for _ in 0..10 {
        match_throw(&mut m, &darts!["T20", "T20", "T20"]).unwrap();
    }
    assert!(!m.current_leg().is_finished());

    m.declare_leg_winner(p[0]).unwrap();
    assert_eq!(m.winner(), Some(p[0]));
}

#[test]
fn test_substitution_in_match_carries_wins() {
    let p = player_ids(2);
    let mut m = Match::new(
        GameType::X01,
        MatchMode::first_to(2),
        leg_players(&p),
        LegParameters::x01(40),
    )
    .unwrap();
    match_throw(&mut m, &darts!["D20"]).unwrap();

    let sub = player_ids(1)[0];
    m.substitute_player(p[0], sub).unwrap();
    assert_eq!(m.wins_per_player(), vec![(sub, 1), (p[1], 0)]);
    assert_eq!(m.legs()[0].winner(), Some(sub));

    // Leg two: p[1] is up, then the substitute in p[0]'s seat
    match_throw(&mut m, &darts!["20"]).unwrap();
    assert_eq!(m.current_leg().current_player(), Some(sub));
    match_throw(&mut m, &darts!["D20"]).unwrap();
    assert_eq!(m.winner(), Some(sub));

    assert!(matches!(
        m.substitute_player(sub, p[0]),
        Err(ScoringError::MatchClosed(_))
    ));
}

#[test]
fn test_darts_at_x_quota_and_target_scoring() {
    let p = player_ids(2);
    let params = LegParameters::darts_at_x(20);
    let mut leg = Leg::new(GameType::DartsAtX, params, leg_players(&p)).unwrap();

    // 99 darts each is 33 visits each
    for visit in 0..66 {
        let darts = if visit % 2 == 0 {
            darts!["T20", "D20", "T1"]
        } else {
            darts!["20", "T5", "D25"]
        };
        let outcome = throw_current(&mut leg, &darts).unwrap();
        assert_eq!(outcome.finished, visit == 65);
    }

    // Only darts on 20 count, by their multiplier
    assert_eq!(leg.points(p[0]), Some(33 * 5));
    assert_eq!(leg.points(p[1]), Some(33));
    assert_eq!(leg.winner(), Some(p[0]));
    assert_eq!(leg.current_player(), None);
}
