//! Fight orchestrator - the single public entry point
//!
//! Level 1 - Orchestration

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::FightConfig;
use crate::error::{FightError, Result};
use crate::fighter::{Corner, FighterState};
use crate::judges::{score_fight, select_panel};
use crate::result::{tick_end_seconds, FightResult, FighterDelta, Method};
use crate::tick::{TickSimulator, TICKS_PER_ROUND};

/// Resolve a fight between `red` and `blue`.
///
/// All randomness comes from one ChaCha8 generator seeded with `config.seed`,
/// so identical inputs always produce an identical result. The inputs are
/// never mutated; the engine works on its own copies.
pub fn simulate(
    red: &FighterState,
    blue: &FighterState,
    config: &FightConfig,
) -> Result<FightResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    simulate_with_rng(red, blue, config, &mut rng)
}

/// Same as [`simulate`] but drawing from a caller-supplied generator.
///
/// `config.seed` is ignored; the caller owns determinism.
pub fn simulate_with_rng<R: Rng>(
    red: &FighterState,
    blue: &FighterState,
    config: &FightConfig,
    rng: &mut R,
) -> Result<FightResult> {
    validate_inputs(red, blue, config)?;
    tracing::debug!(
        red = red.id,
        blue = blue.id,
        rounds = config.rounds,
        seed = config.seed,
        "fight start"
    );

    let judges = select_panel(&config.judges, rng);
    let outcome = TickSimulator::new(red, blue, config.rounds, &config.tuning, rng).run()?;

    let (winner_corner, method, round, time_seconds, scorecards) = match outcome.finish {
        Some(finish) => (
            finish.winner,
            Method::from(finish.kind),
            finish.round,
            tick_end_seconds(finish.tick),
            Vec::new(),
        ),
        None => {
            let (cards, decision) = score_fight(&judges, &outcome.events, config.rounds, rng)?;
            tracing::debug!(winner = ?decision.winner, kind = ?decision.kind, "decision");
            (
                decision.winner,
                Method::from(decision.kind),
                config.rounds,
                tick_end_seconds(TICKS_PER_ROUND),
                cards,
            )
        }
    };

    let winner = winner_corner.map(|c| match c {
        Corner::Red => red.id,
        Corner::Blue => blue.id,
    });
    tracing::debug!(?winner, %method, round, "fight finished");

    Ok(FightResult {
        red_id: red.id,
        blue_id: blue.id,
        winner,
        winner_corner,
        method,
        round,
        time_seconds,
        scheduled_rounds: config.rounds,
        judges,
        scorecards,
        events: outcome.events,
        red: FighterDelta::new(red, &outcome.red),
        blue: FighterDelta::new(blue, &outcome.blue),
    })
}

fn validate_inputs(red: &FighterState, blue: &FighterState, config: &FightConfig) -> Result<()> {
    config.validate()?;
    red.validate(Corner::Red)?;
    blue.validate(Corner::Blue)?;
    if red.id == blue.id {
        return Err(FightError::invalid(
            Corner::Blue,
            format!("fighter {} cannot fight itself", blue.id),
        ));
    }
    Ok(())
}
