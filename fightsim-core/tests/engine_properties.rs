//! Integration tests for the fight engine
//!
//! Determinism, bounds, knockdown soundness, judging and scenario checks
//! through the public `simulate` entry point.

use fightsim_core::judges::aggregate;
use fightsim_core::{
    simulate, simulate_with_rng, Attributes, Corner, CutSeverity, FightConfig, FightError,
    FighterState, JudgeId, JudgeSelection, KnockdownState, Method, MomentumMode, Style, Trait,
    TraitSet,
};
use proptest::prelude::*;
use rand::rngs::mock::StepRng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn fighter(id: u64, attrs: Attributes, style: Style) -> FighterState {
    FighterState::new(id, format!("Fighter {id}"), attrs, style)
}

fn even_pair() -> (FighterState, FighterState) {
    (
        fighter(1, Attributes::uniform(70), Style::WellRounded),
        fighter(2, Attributes::uniform(70), Style::WellRounded),
    )
}

fn rejected_corner<T>(result: Result<T, FightError>) -> Option<Corner> {
    match result {
        Err(FightError::InvalidFighterState { corner, .. }) => Some(corner),
        _ => None,
    }
}

fn style_strategy() -> impl Strategy<Value = Style> {
    prop_oneof![
        Just(Style::Striker),
        Just(Style::Wrestler),
        Just(Style::Grappler),
        Just(Style::WellRounded),
    ]
}

fn cut_strategy() -> impl Strategy<Value = CutSeverity> {
    prop_oneof![
        Just(CutSeverity::None),
        Just(CutSeverity::Easy),
        Just(CutSeverity::Moderate),
        Just(CutSeverity::Severe),
        Just(CutSeverity::Extreme),
    ]
}

fn traits_strategy() -> impl Strategy<Value = TraitSet> {
    proptest::collection::vec(0usize..12, 0..4).prop_map(|picks| {
        let mut set = TraitSet::empty();
        for i in picks {
            let t = fightsim_core::modifiers::ALL_TRAITS[i];
            if !set.contradicts(t) {
                set.insert(t);
            }
        }
        set
    })
}

prop_compose! {
    fn fighter_strategy(id: u64)(
        attrs in proptest::array::uniform6(1u8..=100),
        style in style_strategy(),
        traits in traits_strategy(),
        cut in cut_strategy(),
        confidence in 0.0f64..=100.0,
    ) -> FighterState {
        let attributes = Attributes {
            striking: attrs[0],
            grappling: attrs[1],
            wrestling: attrs[2],
            cardio: attrs[3],
            chin: attrs[4],
            speed: attrs[5],
        };
        fighter(id, attributes, style)
            .with_traits(traits)
            .with_cut(cut)
            .with_confidence(confidence)
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_identical_inputs_identical_result(
        red in fighter_strategy(1),
        blue in fighter_strategy(2),
        seed in any::<u64>(),
        title in any::<bool>(),
    ) {
        let mut config = FightConfig::new(seed);
        if title {
            config = config.title_fight();
        }
        let first = simulate(&red, &blue, &config).unwrap();
        let second = simulate(&red, &blue, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_stamina_and_momentum_bounded(
        red in fighter_strategy(1),
        blue in fighter_strategy(2),
        seed in any::<u64>(),
        saturating in any::<bool>(),
    ) {
        let mut config = FightConfig::new(seed).title_fight();
        if saturating {
            config.tuning.momentum_mode = MomentumMode::Saturating;
        }
        let result = simulate(&red, &blue, &config).unwrap();
        for event in &result.events {
            for side in [&event.red, &event.blue] {
                prop_assert!((0.0..=100.0).contains(&side.stamina));
                prop_assert!((-1.0..=1.0).contains(&side.momentum));
            }
        }
        for delta in [&result.red, &result.blue] {
            prop_assert!((0.0..=100.0).contains(&delta.final_stamina));
            prop_assert!((-1.0..=1.0).contains(&delta.final_momentum));
        }
    }

    #[test]
    fn prop_knockdown_traces_sound(
        red in fighter_strategy(1),
        blue in fighter_strategy(2),
        seed in any::<u64>(),
    ) {
        let result = simulate(&red, &blue, &FightConfig::new(seed)).unwrap();
        let mut state = [KnockdownState::Standing; 2];
        for event in &result.events {
            for ct in &event.transitions {
                let t = ct.transition;
                let i = ct.corner.index();
                prop_assert_eq!(t.from, state[i], "transition chain broken");
                if t.to == KnockdownState::Finished {
                    prop_assert_eq!(t.from, KnockdownState::Down);
                }
                state[i] = t.to;
            }
        }
        if result.method.is_strike_finish() && result.method != Method::DoubleKnockdownTko {
            let loser = result.winner_corner.unwrap().opponent();
            prop_assert_eq!(state[loser.index()], KnockdownState::Finished);
        }
    }
}

#[test]
fn test_seed_changes_fight() {
    let (red, blue) = even_pair();
    let results: Vec<_> = (0..20)
        .map(FightConfig::new)
        .map(|config| simulate(&red, &blue, &config).unwrap())
        .collect();
    assert!(results.windows(2).any(|w| w[0].events != w[1].events));
}

// ============================================================================
// DOUBLE KNOCKDOWN
// ============================================================================

#[test]
fn test_simultaneous_knockdowns_are_double_kd_tko() {
    // Glass chins and full power: with every roll at 0.0 both opening strikes
    // land as one-punch knockdowns in the same exchange.
    let attrs = Attributes {
        striking: 100,
        grappling: 50,
        wrestling: 50,
        cardio: 50,
        chin: 1,
        speed: 50,
    };
    let red = fighter(1, attrs, Style::WellRounded);
    let blue = fighter(2, attrs, Style::WellRounded);
    let config = FightConfig::new(0).with_judges(JudgeSelection::Panel(vec![
        JudgeId::Okafor,
        JudgeId::Ashby,
        JudgeId::Moreau,
    ]));

    let mut rng = StepRng::new(0, 0);
    let result = simulate_with_rng(&red, &blue, &config, &mut rng).unwrap();

    assert_eq!(result.method, Method::DoubleKnockdownTko);
    assert_eq!(result.winner, None);
    assert_eq!(result.winner_corner, None);
    assert!(result.is_draw());
    assert_eq!((result.round, result.time_display().as_str()), (1, "0:30"));
    assert_eq!(result.knockdowns(), (1, 1));
    assert!(result.scorecards.is_empty());

    let last = result.events.last().unwrap();
    let downs: Vec<Corner> = last
        .transitions
        .iter()
        .filter(|ct| ct.transition.to == KnockdownState::Down)
        .map(|ct| ct.corner)
        .collect();
    assert_eq!(downs.len(), 2);
}

// ============================================================================
// JUDGING
// ============================================================================

#[test]
fn test_judge_panel_complete_on_decisions() {
    let (red, blue) = even_pair();
    let mut decisions = 0;
    for seed in 0..120 {
        let judges = 1 + (seed as usize % 5);
        let rounds = if seed % 3 == 0 { 5 } else { 3 };
        let config = FightConfig::new(seed)
            .with_rounds(rounds)
            .with_judges(JudgeSelection::Random { count: judges });
        let result = simulate(&red, &blue, &config).unwrap();
        if !result.method.is_decision() {
            continue;
        }
        decisions += 1;

        assert_eq!(result.scorecards.len(), judges);
        for card in &result.scorecards {
            assert_eq!(card.rounds.len(), rounds as usize);
            for (i, score) in card.rounds.iter().enumerate() {
                assert_eq!(score.round as usize, i + 1);
                assert!(score.red.max(score.blue) == 10);
                assert!(score.red.min(score.blue) >= 7);
            }
            let red_total: u32 = card.rounds.iter().map(|r| r.red as u32).sum();
            assert_eq!(red_total, card.red_total);
        }

        let decision = aggregate(&result.scorecards);
        assert_eq!(result.method, Method::from(decision.kind));
        assert_eq!(result.winner_corner, decision.winner);
    }
    assert!(decisions > 20);
}

#[test]
fn test_explicit_panel_order_kept() {
    let (red, blue) = even_pair();
    let panel = vec![JudgeId::Venkataraman, JudgeId::Okafor];
    let config = FightConfig::new(11).with_judges(JudgeSelection::Panel(panel.clone()));
    let result = simulate(&red, &blue, &config).unwrap();
    assert_eq!(result.judges, panel);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_invalid_inputs_rejected() {
    let (red, mut blue) = even_pair();
    blue.attributes.striking = 0;
    let result = simulate(&red, &blue, &FightConfig::new(1));
    assert_eq!(rejected_corner(result), Some(Corner::Blue));

    let (red, blue) = even_pair();
    let red = red
        .with_trait(Trait::SlowStarter)
        .with_trait(Trait::FastHands);
    let result = simulate(&red, &blue, &FightConfig::new(1));
    assert_eq!(rejected_corner(result), Some(Corner::Red));

    let (red, blue) = even_pair();
    let config = FightConfig::new(1).with_judges(JudgeSelection::Random { count: 0 });
    assert!(matches!(
        simulate(&red, &blue, &config),
        Err(FightError::Configuration(_))
    ));
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_low_cardio_output_fades() {
    let mut tired = Attributes::uniform(70);
    tired.striking = 80;
    tired.cardio = 20;
    let mut fresh = tired;
    fresh.cardio = 90;
    let red = fighter(1, tired, Style::WellRounded);
    let blue = fighter(2, fresh, Style::WellRounded);

    let (mut r1, mut n1, mut r3, mut n3) = (0.0, 0, 0.0, 0);
    for seed in 0..400 {
        let result = simulate(&red, &blue, &FightConfig::new(seed)).unwrap();
        for event in &result.events {
            match event.round {
                1 => {
                    r1 += event.red.damage_dealt();
                    n1 += 1;
                }
                3 => {
                    r3 += event.red.damage_dealt();
                    n3 += 1;
                }
                _ => {}
            }
        }
    }
    let round_one = r1 / n1 as f64;
    let round_three = r3 / n3 as f64;
    assert!(
        round_three < 0.9 * round_one,
        "round 3 output {round_three:.2} not below 90% of round 1 output {round_one:.2}"
    );
}

#[test]
fn test_iron_chin_lowers_ko_losses() {
    let mut power = Attributes::uniform(70);
    power.striking = 90;
    let opponent = fighter(2, power, Style::WellRounded);
    let plain = fighter(1, Attributes::uniform(70), Style::WellRounded);
    let iron = plain.clone().with_trait(Trait::IronChin);

    let ko_losses = |subject: &FighterState| {
        (0..500u64)
            .filter(|&seed| {
                let r = simulate(subject, &opponent, &FightConfig::new(seed)).unwrap();
                matches!(r.method, Method::Ko | Method::Tko) && r.winner == Some(opponent.id)
            })
            .count()
    };
    let without = ko_losses(&plain);
    let with = ko_losses(&iron);
    assert!(with < without, "iron chin {with} vs plain {without}");
}
