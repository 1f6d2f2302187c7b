//! Tick simulator - drives rounds and ticks for one bout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - round loop, decision vs finish
//! - Level 2: step() - one 30-second tick
//! - Level 3: select_zone(), exchange(), clinch(), ground(), adjudicate_downs(),
//!   check_accumulated(), drain_stamina(), update_momentum()
//! - Level 4: effective attributes, damage and hit formulas on [`Combatant`]

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineTuning;
use crate::error::{FightError, Result};
use crate::fighter::{Corner, FighterState};
use crate::finish::{EscapeContext, FinishEvaluator};
use crate::knockdown::{
    IllegalTransition, KnockdownState, KnockdownStateMachine, Thresholds, Transition,
};
use crate::modifiers::style::{CLINCH_DRAG_ATTEMPT, CLINCH_DRAG_BONUS, WELL_ROUNDED_CATCH_UP};
use crate::modifiers::{confidence, CutPenalty, Style, StyleMatchup, TraitProfile};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Simulated seconds per tick
pub const TICK_SECONDS: u16 = 30;
/// Ticks in a full round
pub const TICKS_PER_ROUND: u8 = 10;

const HIT_FLOOR: f64 = 0.15;
const HIT_CEILING: f64 = 0.85;
const INITIATIVE_BONUS: f64 = 0.05;
const TAKEDOWN_FLOOR: f64 = 0.02;
const TAKEDOWN_CEILING: f64 = 0.35;
/// Strike damage absorbed before comeback_king kicks in
const COMEBACK_DAMAGE: f64 = 25.0;
/// Share of ground-and-pound damage that counts toward submission pressure
const GNP_GRAPPLING_SHARE: f64 = 0.5;
/// Share of ground-and-pound damage that counts toward strike finishes
const GNP_STRIKE_SHARE: f64 = 0.35;
/// Share of submission damage credited to the attacker's activity
const SUBMISSION_CREDIT: f64 = 0.3;

// ============================================================================
// TICK LOG
// ============================================================================

/// Tactical phase of a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Striking,
    Clinch,
    Ground,
}

/// One corner's activity in a tick and its state at the end of it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SideReport {
    /// Strike damage dealt, ground-and-pound included
    pub strike_damage: f64,
    /// Submission pressure credited to this side
    pub grappling_damage: f64,
    pub strikes_landed: u32,
    pub takedowns: u32,
    pub submission_attempts: u32,
    /// Knockdowns scored against the opponent
    pub knockdowns: u32,
    /// Held top position on the ground
    pub control: bool,
    pub stamina: f64,
    pub momentum: f64,
    pub state: Option<KnockdownState>,
}

impl SideReport {
    pub fn damage_dealt(&self) -> f64 {
        self.strike_damage + self.grappling_damage
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerTransition {
    pub corner: Corner,
    pub transition: Transition,
}

/// How a bout ended early
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishKind {
    Knockout,
    TechnicalKnockout,
    Submission,
    DoubleKnockdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    pub kind: FinishKind,
    /// None only for a double knockdown
    pub winner: Option<Corner>,
    pub round: u8,
    pub tick: u8,
}

/// Append-only record of one tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    pub round: u8,
    /// 1-based tick within the round
    pub tick: u8,
    pub zone: Zone,
    pub red: SideReport,
    pub blue: SideReport,
    pub transitions: Vec<CornerTransition>,
    pub finish: Option<FinishKind>,
}

impl TickEvent {
    pub fn side(&self, corner: Corner) -> &SideReport {
        match corner {
            Corner::Red => &self.red,
            Corner::Blue => &self.blue,
        }
    }
}

/// End-of-bout state of one fighter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinalState {
    pub stamina: f64,
    pub momentum: f64,
    pub knockdowns: u32,
    pub state: KnockdownState,
}

/// Everything the tick loop produced
#[derive(Clone, Debug, PartialEq)]
pub struct BoutOutcome {
    pub finish: Option<Finish>,
    pub rounds_completed: u8,
    pub events: Vec<TickEvent>,
    pub red: FinalState,
    pub blue: FinalState,
}

// ============================================================================
// COMBATANT (Level 4)
// ============================================================================

/// Fight-local mutable copy of one fighter
#[derive(Clone, Debug)]
struct Combatant {
    base: FighterState,
    profile: TraitProfile,
    cut: CutPenalty,
    chin: f64,
    /// Thresholds as a defender, against the opponent's power
    thresholds: Thresholds,
    stamina: f64,
    momentum: f64,
    kd: KnockdownStateMachine,
    /// Strike damage absorbed
    strike_damage: f64,
    /// Submission pressure absorbed
    grappling_damage: f64,
    round: u8,
}

impl Combatant {
    fn new(base: &FighterState, opponent: &FighterState, tuning: &EngineTuning) -> Self {
        let profile = TraitProfile::from_set(&base.traits);
        let opponent_profile = TraitProfile::from_set(&opponent.traits);
        let cut = base.cut.penalty();
        let chin = base.cut.effective_chin(base.attributes.chin);
        let thresholds = Thresholds::new(chin, &profile, tuning)
            .against(opponent_profile.coefficients.one_punch_bonus);
        Self {
            base: base.clone(),
            profile,
            cut,
            chin,
            thresholds,
            stamina: (base.stamina + cut.stamina).max(0.0),
            momentum: base.momentum,
            kd: KnockdownStateMachine::new(tuning.hurt_duration),
            strike_damage: 0.0,
            grappling_damage: 0.0,
            round: 1,
        }
    }

    fn hurt_factor(&self) -> f64 {
        if self.kd.is_hurt() {
            0.75
        } else {
            1.0
        }
    }

    fn freshness(&self, floor: f64) -> f64 {
        floor + (1.0 - floor) * self.stamina / 100.0
    }

    fn effective_striking(&self) -> f64 {
        let raw = self.base.attributes.striking as f64
            * self.freshness(0.45)
            * self.profile.round_output(self.round);
        (raw + self.profile.flat_bonus(self.round)) * self.hurt_factor()
    }

    fn effective_grappling(&self) -> f64 {
        let raw = self.base.attributes.grappling as f64 * self.freshness(0.55);
        (raw + self.profile.flat_bonus(self.round)) * self.hurt_factor()
    }

    fn effective_wrestling(&self) -> f64 {
        let raw = self.base.attributes.wrestling as f64
            * self.freshness(0.55)
            * self.profile.round_output(self.round);
        (raw + self.profile.flat_bonus(self.round)) * self.hurt_factor()
    }

    fn effective_speed(&self) -> f64 {
        self.base.attributes.speed as f64 + self.profile.coefficients.speed_bonus
    }

    /// Damage output multiplier against `defender`
    fn output(&self, defender: &Combatant) -> f64 {
        let c = &self.profile.coefficients;
        let mut m = (1.0 + 0.2 * self.momentum)
            * confidence::output_factor(self.base.confidence)
            * self.cut.output;
        if self.round >= 3 {
            m *= c.late_damage_mult;
        }
        if c.pressure {
            m *= if defender.stamina < 30.0 {
                1.25
            } else if defender.stamina < 50.0 {
                1.15
            } else if defender.stamina < 70.0 {
                1.05
            } else {
                1.0
            };
        }
        if self.strike_damage > COMEBACK_DAMAGE {
            m *= c.comeback_mult;
        }
        m
    }

    fn hit_chance(&self, defender: &Combatant, initiator: bool) -> f64 {
        let mut p = 0.40 + (self.effective_striking() - defender.effective_speed()) / 200.0;
        p += self.profile.coefficients.hit_bonus;
        if initiator {
            p += INITIATIVE_BONUS;
        }
        p.clamp(HIT_FLOOR, HIT_CEILING)
    }

    /// Damage of one landed strike given its base roll
    fn strike_damage(&self, defender: &Combatant, base: f64, scale: f64) -> f64 {
        base
            * (self.effective_striking() / 100.0)
            * (1.2 - defender.chin / 100.0 * 0.4)
            * self.output(defender)
            * scale
    }

    fn takedown_chance(&self, defender: &Combatant) -> f64 {
        let shoot = self.effective_wrestling() / 100.0 * 0.20;
        let sprawl = defender.effective_wrestling() / 100.0 * 0.12;
        (shoot - sprawl + 0.04).clamp(TAKEDOWN_FLOOR, TAKEDOWN_CEILING)
    }

    fn final_state(&self) -> FinalState {
        FinalState {
            stamina: self.stamina,
            momentum: self.momentum,
            knockdowns: self.kd.knockdowns(),
            state: self.kd.state(),
        }
    }
}

// ============================================================================
// TICK SIMULATOR
// ============================================================================

/// Drives one bout tick by tick using a caller-supplied RNG
pub struct TickSimulator<'a, R: Rng> {
    rng: &'a mut R,
    tuning: EngineTuning,
    evaluator: FinishEvaluator,
    fighters: [Combatant; 2],
    /// Matchup with each corner as the attacker
    matchups: [StyleMatchup; 2],
    rounds: u8,
    round: u8,
    tick: u8,
    prev_ground: bool,
    top: Corner,
    pending: Vec<CornerTransition>,
    events: Vec<TickEvent>,
}

/// Finish kind and winning corner of a tick that ended the bout
type Ending = (FinishKind, Option<Corner>);

/// Per-tick scratch state
struct TickScratch {
    sides: [SideReport; 2],
    transitions: Vec<CornerTransition>,
    downs: Vec<Corner>,
}

impl<'a, R: Rng> TickSimulator<'a, R> {
    pub fn new(
        red: &FighterState,
        blue: &FighterState,
        rounds: u8,
        tuning: &EngineTuning,
        rng: &'a mut R,
    ) -> Self {
        Self {
            rng,
            tuning: tuning.clone(),
            evaluator: FinishEvaluator::new(tuning),
            fighters: [
                Combatant::new(red, blue, tuning),
                Combatant::new(blue, red, tuning),
            ],
            matchups: [red.style.matchup(blue.style), blue.style.matchup(red.style)],
            rounds,
            round: 0,
            tick: 0,
            prev_ground: false,
            top: Corner::Red,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Level 1
    // ------------------------------------------------------------------------

    /// Run until a finish or the scheduled rounds are exhausted
    pub fn run(mut self) -> Result<BoutOutcome> {
        for round in 1..=self.rounds {
            self.start_round(round)?;
            for tick in 1..=TICKS_PER_ROUND {
                self.tick = tick;
                if let Some(finish) = self.step()? {
                    return Ok(self.into_outcome(Some(finish), round));
                }
            }
            if round < self.rounds {
                self.recover_between_rounds(round)?;
                self.check_bounds()?;
            }
        }
        let rounds = self.rounds;
        Ok(self.into_outcome(None, rounds))
    }

    fn start_round(&mut self, round: u8) -> Result<()> {
        self.round = round;
        self.tick = 0;
        self.prev_ground = false;
        for corner in Corner::BOTH {
            let f = &mut self.fighters[corner.index()];
            f.round = round;
            let reset = f.kd.start_round();
            if let Some(transition) = self.legal(reset)? {
                self.pending.push(CornerTransition { corner, transition });
            }
        }
        Ok(())
    }

    fn into_outcome(self, finish: Option<Finish>, rounds_completed: u8) -> BoutOutcome {
        BoutOutcome {
            finish,
            rounds_completed,
            events: self.events,
            red: self.fighters[0].final_state(),
            blue: self.fighters[1].final_state(),
        }
    }

    // ------------------------------------------------------------------------
    // Level 2
    // ------------------------------------------------------------------------

    /// Simulate one tick. Returns the finish if the bout ended.
    fn step(&mut self) -> Result<Option<Finish>> {
        let mut scratch = TickScratch {
            sides: [SideReport::default(), SideReport::default()],
            transitions: std::mem::take(&mut self.pending),
            downs: Vec::new(),
        };
        for corner in Corner::BOTH {
            let t = self.fighters[corner.index()].kd.start_tick();
            if let Some(transition) = self.legal(t)? {
                let entry = CornerTransition { corner, transition };
                scratch.transitions.push(entry);
            }
        }

        let mut zone = self.select_zone(&mut scratch);
        let mut finish = None;
        match zone {
            Zone::Striking => self.exchange(&mut scratch)?,
            Zone::Clinch => {
                if self.clinch(&mut scratch)? {
                    zone = Zone::Ground;
                }
            }
            Zone::Ground => {}
        }
        if zone == Zone::Ground && scratch.downs.is_empty() {
            finish = self.ground(&mut scratch)?;
        }
        self.prev_ground = zone == Zone::Ground;

        if finish.is_none() {
            self.check_accumulated(&mut scratch)?;
            finish = self.adjudicate_downs(&mut scratch)?;
        }

        if finish.is_none() {
            self.drain_stamina(zone)?;
            self.update_momentum(&scratch);
        }

        self.record(zone, scratch, finish);
        self.check_bounds()?;
        Ok(finish.map(|(kind, winner)| Finish {
            kind,
            winner,
            round: self.round,
            tick: self.tick,
        }))
    }

    fn record(&mut self, zone: Zone, scratch: TickScratch, finish: Option<Ending>) {
        let TickScratch {
            mut sides,
            transitions,
            ..
        } = scratch;
        for corner in Corner::BOTH {
            let f = &self.fighters[corner.index()];
            let side = &mut sides[corner.index()];
            side.stamina = f.stamina;
            side.momentum = f.momentum;
            side.state = Some(f.kd.state());
        }
        let [red, blue] = sides;
        tracing::trace!(
            round = self.round,
            tick = self.tick,
            ?zone,
            red_dealt = red.damage_dealt(),
            blue_dealt = blue.damage_dealt(),
            red_stamina = red.stamina,
            blue_stamina = blue.stamina,
            "tick"
        );
        self.events.push(TickEvent {
            round: self.round,
            tick: self.tick,
            zone,
            red,
            blue,
            transitions,
            finish: finish.map(|(kind, _)| kind),
        });
    }

    // ------------------------------------------------------------------------
    // Level 3 - zone selection
    // ------------------------------------------------------------------------

    fn select_zone(&mut self, scratch: &mut TickScratch) -> Zone {
        let stickiness = self.matchups[0].stickiness;
        if self.prev_ground {
            let stay = self.tuning.ground_stay * (2.0 - stickiness);
            if self.rng.gen::<f64>() <= stay {
                return Zone::Ground;
            }
            self.prev_ground = false;
        }

        let [red, blue] = &self.fighters;
        let mut td_red = red.takedown_chance(blue) + self.matchups[0].takedown;
        let mut td_blue = blue.takedown_chance(red) + self.matchups[1].takedown;
        if red.base.style == Style::WellRounded && red.strike_damage > blue.strike_damage {
            td_red += WELL_ROUNDED_CATCH_UP;
        }
        if blue.base.style == Style::WellRounded && blue.strike_damage > red.strike_damage {
            td_blue += WELL_ROUNDED_CATCH_UP;
        }

        let ground = td_red.max(td_blue).max(0.0);
        let clinch = self.matchups[0].clinch;
        let striking = (1.0 - ground - clinch).max(0.0);
        let roll = self.rng.gen::<f64>() * (striking + clinch + ground);
        if roll < striking {
            Zone::Striking
        } else if roll < striking + clinch {
            Zone::Clinch
        } else {
            let top = if td_red >= td_blue {
                Corner::Red
            } else {
                Corner::Blue
            };
            self.take_top(top, scratch);
            Zone::Ground
        }
    }

    fn take_top(&mut self, top: Corner, scratch: &mut TickScratch) {
        self.top = top;
        scratch.sides[top.index()].takedowns += 1;
        self.shift_momentum(top, self.tuning.top_position_gain);
        self.shift_momentum(top.opponent(), -self.tuning.bottom_position_loss);
    }

    // ------------------------------------------------------------------------
    // Level 3 - standing zones
    // ------------------------------------------------------------------------

    fn exchange(&mut self, scratch: &mut TickScratch) -> Result<()> {
        let [red, blue] = &self.fighters;
        let first = if red.effective_speed() >= blue.effective_speed() {
            Corner::Red
        } else {
            Corner::Blue
        };

        let mut landed = Vec::with_capacity(2);
        for (attacker, initiator) in [(first, true), (first.opponent(), false)] {
            let att = &self.fighters[attacker.index()];
            let def = &self.fighters[attacker.opponent().index()];
            if self.rng.gen::<f64>() < att.hit_chance(def, initiator) {
                let base = self
                    .rng
                    .gen_range(self.tuning.strike_damage_min..self.tuning.strike_damage_max);
                let mut damage = att.strike_damage(def, base, 1.0);
                let flash = att.profile.coefficients.flash_chance;
                if flash > 0.0 && self.rng.gen::<f64>() < flash {
                    damage += self.tuning.flash_damage;
                }
                landed.push((attacker, damage));
            }
        }
        // Both strikes are rolled before either lands
        for (attacker, damage) in landed {
            self.land_strike(attacker, damage, scratch)?;
        }
        Ok(())
    }

    /// Returns true when a Wrestler drags the clinch to the ground
    fn clinch(&mut self, scratch: &mut TickScratch) -> Result<bool> {
        let mut landed = Vec::with_capacity(2);
        for attacker in Corner::BOTH {
            if self.rng.gen::<f64>() < self.tuning.clinch_land_chance {
                let att = &self.fighters[attacker.index()];
                let def = &self.fighters[attacker.opponent().index()];
                let base = self
                    .rng
                    .gen_range(self.tuning.strike_damage_min..self.tuning.strike_damage_max);
                let scale = self.tuning.clinch_damage_scale;
                landed.push((attacker, att.strike_damage(def, base, scale)));
            }
        }
        for (attacker, damage) in landed {
            self.land_strike(attacker, damage, scratch)?;
        }

        let wrestler = Corner::BOTH
            .into_iter()
            .find(|c| self.fighters[c.index()].base.style == Style::Wrestler);
        let Some(wrestler) = wrestler else {
            return Ok(false);
        };
        if !scratch.downs.is_empty() || self.rng.gen::<f64>() >= CLINCH_DRAG_ATTEMPT {
            return Ok(false);
        }
        let att = &self.fighters[wrestler.index()];
        let def = &self.fighters[wrestler.opponent().index()];
        let chance = att.takedown_chance(def) + CLINCH_DRAG_BONUS;
        if self.rng.gen::<f64>() < chance {
            self.top = wrestler;
            scratch.sides[wrestler.index()].takedowns += 1;
            self.shift_momentum(wrestler, self.tuning.top_position_gain);
            return Ok(true);
        }
        Ok(false)
    }

    fn land_strike(
        &mut self,
        attacker: Corner,
        damage: f64,
        scratch: &mut TickScratch,
    ) -> Result<()> {
        let defender = attacker.opponent();
        let side = &mut scratch.sides[attacker.index()];
        side.strike_damage += damage;
        side.strikes_landed += 1;

        let def = &mut self.fighters[defender.index()];
        def.strike_damage += damage;
        let thresholds = def.thresholds;
        let result = def.kd.absorb_strike(damage, &thresholds, &mut *self.rng);
        if let Some(transition) = self.legal(result)? {
            if transition.to == KnockdownState::Down {
                scratch.downs.push(defender);
                scratch.sides[attacker.index()].knockdowns += 1;
            }
            scratch.transitions.push(CornerTransition {
                corner: defender,
                transition,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Level 3 - ground
    // ------------------------------------------------------------------------

    fn ground(&mut self, scratch: &mut TickScratch) -> Result<Option<Ending>> {
        let top = self.top;
        let bottom = top.opponent();
        scratch.sides[top.index()].control = true;

        let magnet = self.fighters[bottom.index()]
            .profile
            .coefficients
            .ground_damage_taken_mult;

        if self.rng.gen::<f64>() < self.tuning.ground_and_pound_chance {
            let base = self
                .rng
                .gen_range(self.tuning.ground_damage_min..self.tuning.ground_damage_max);
            let att = &self.fighters[top.index()];
            let def = &self.fighters[bottom.index()];
            let damage = base
                * (att.effective_striking() / 100.0)
                * att.profile.coefficients.ground_and_pound_mult
                * att.output(def)
                * magnet;
            let def = &mut self.fighters[bottom.index()];
            def.grappling_damage += damage * GNP_GRAPPLING_SHARE;
            def.strike_damage += damage * GNP_STRIKE_SHARE;
            let side = &mut scratch.sides[top.index()];
            side.strike_damage += damage;
            side.strikes_landed += 1;
        }

        let rate = self
            .evaluator
            .submission_attempt_rate(self.fighters[top.index()].effective_grappling());
        if self.rng.gen::<f64>() >= rate {
            return Ok(None);
        }
        scratch.sides[top.index()].submission_attempts += 1;

        let def = &self.fighters[bottom.index()];
        let escape = self.evaluator.escape_chance(
            def.effective_grappling(),
            def.effective_wrestling(),
            &EscapeContext {
                hurt: def.kd.is_hurt(),
                style: def.base.style,
                confidence: def.base.confidence,
                profile: &def.profile,
            },
        );
        let roll = self.rng.gen::<f64>();
        if roll < escape * 0.5 {
            self.shift_momentum(bottom, self.tuning.escape_momentum);
            self.shift_momentum(top, -self.tuning.escape_momentum);
            return Ok(None);
        }

        let lo = self.tuning.submission_damage_min;
        let hi = self.tuning.submission_damage_max;
        let base = self.rng.gen_range(lo..hi);
        let att = &self.fighters[top.index()];
        let def = &self.fighters[bottom.index()];
        let mut damage = base * att.output(def) * magnet;
        if roll < escape {
            damage *= 0.5;
        }
        self.fighters[bottom.index()].grappling_damage += damage;
        scratch.sides[top.index()].grappling_damage += damage * SUBMISSION_CREDIT;

        let att = &self.fighters[top.index()];
        let def = &self.fighters[bottom.index()];
        let threshold = self
            .evaluator
            .submission_threshold(&def.profile, att.momentum);
        let p = self
            .evaluator
            .submission_probability(def.grappling_damage, threshold, def.kd.is_hurt());
        if self.rng.gen::<f64>() < p {
            return Ok(Some((FinishKind::Submission, Some(top))));
        }
        Ok(None)
    }

    // ------------------------------------------------------------------------
    // Level 3 - finishes
    // ------------------------------------------------------------------------

    fn adjudicate_downs(&mut self, scratch: &mut TickScratch) -> Result<Option<Ending>> {
        match scratch.downs.as_slice() {
            [] => Ok(None),
            [defender] => {
                let defender = *defender;
                let one_punch = self.fighters[defender.index()].kd.down_from_one_punch();
                if self.stoppage(defender, one_punch, scratch)? {
                    let kind = if one_punch {
                        FinishKind::Knockout
                    } else {
                        FinishKind::TechnicalKnockout
                    };
                    Ok(Some((kind, Some(defender.opponent()))))
                } else {
                    Ok(None)
                }
            }
            _ => {
                tracing::debug!(round = self.round, tick = self.tick, "double knockdown");
                Ok(Some((FinishKind::DoubleKnockdown, None)))
            }
        }
    }

    /// Referee check on a downed fighter. Returns true if stopped.
    fn stoppage(
        &mut self,
        defender: Corner,
        one_punch: bool,
        scratch: &mut TickScratch,
    ) -> Result<bool> {
        let attacker = defender.opponent();
        let att = &self.fighters[attacker.index()];
        let def = &self.fighters[defender.index()];
        let threshold = self
            .evaluator
            .strike_threshold(def.chin, &def.profile, att.momentum);
        let p = self.evaluator.stoppage_probability(
            def.strike_damage,
            threshold,
            def.kd.round_knockdowns(),
            one_punch,
        );

        self.shift_momentum(attacker, self.tuning.knockdown_momentum);
        self.shift_momentum(defender, -self.tuning.knockdown_momentum);

        let stopped = self.rng.gen::<f64>() < p;
        let result = self.fighters[defender.index()].kd.resolve_down(stopped);
        let transition = self.legal(result)?;
        scratch.transitions.push(CornerTransition {
            corner: defender,
            transition,
        });
        Ok(stopped)
    }

    /// Accumulated strike damage can drop a fighter without a single big shot.
    /// Both corners roll before any Down is adjudicated.
    fn check_accumulated(&mut self, scratch: &mut TickScratch) -> Result<()> {
        let mut dropped = Vec::new();
        for defender in Corner::BOTH {
            let attacker = defender.opponent();
            let att = &self.fighters[attacker.index()];
            let def = &self.fighters[defender.index()];
            let state = def.kd.state();
            let can_drop = state.can_transition_to(KnockdownState::Down);
            if state == KnockdownState::Recovering || !can_drop {
                continue;
            }
            let threshold = self
                .evaluator
                .strike_threshold(def.chin, &def.profile, att.momentum);
            let p = self.evaluator.accumulated_finish_probability(
                def.strike_damage,
                threshold,
                def.kd.is_hurt(),
            );
            if p > 0.0 && self.rng.gen::<f64>() < p {
                dropped.push(defender);
            }
        }

        for defender in dropped {
            let result = self.fighters[defender.index()].kd.force_down();
            let transition = self.legal(result)?;
            scratch.transitions.push(CornerTransition {
                corner: defender,
                transition,
            });
            scratch.sides[defender.opponent().index()].knockdowns += 1;
            scratch.downs.push(defender);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Level 3 - stamina and momentum
    // ------------------------------------------------------------------------

    /// Drain can empty the tank but never refill it. A negative or non-finite
    /// drain is a tuning fault and fails the fight.
    fn drain_stamina(&mut self, zone: Zone) -> Result<()> {
        let extra = match zone {
            Zone::Striking => 0.0,
            Zone::Clinch => self.tuning.clinch_drain,
            Zone::Ground => self.tuning.ground_drain,
        };
        for corner in Corner::BOTH {
            let base = self
                .rng
                .gen_range(self.tuning.stamina_drain_min..self.tuning.stamina_drain_max);
            let f = &self.fighters[corner.index()];
            let cardio = f.base.attributes.cardio as f64;
            let factor = (1.1 - cardio / 110.0) * f.profile.drain_mult(f.round);
            let drain = (base + extra) * factor;
            let raw = f.stamina - drain;
            if drain < 0.0 || !drain.is_finite() || !raw.is_finite() {
                return Err(self.violation(format!(
                    "{corner} stamina drain {drain} from {} is invalid",
                    f.stamina
                )));
            }
            // An empty tank stays empty
            self.fighters[corner.index()].stamina = raw.max(0.0);
        }
        Ok(())
    }

    fn update_momentum(&mut self, scratch: &TickScratch) {
        let decay = 1.0 - self.tuning.momentum_decay;
        for corner in Corner::BOTH {
            let f = &mut self.fighters[corner.index()];
            f.momentum *= decay;
            if f.kd.penalty_active() {
                self.shift_momentum(corner, -self.tuning.knockdown_penalty);
            }
        }

        let red = scratch.sides[0].damage_dealt();
        let blue = scratch.sides[1].damage_dealt();
        if (red - blue).abs() >= self.tuning.momentum_swing_margin {
            let leader = if red > blue {
                Corner::Red
            } else {
                Corner::Blue
            };
            self.shift_momentum(leader, self.tuning.momentum_swing_gain);
            self.shift_momentum(leader.opponent(), -self.tuning.momentum_swing_loss);
        }
    }

    /// Recovery fills toward a full tank and never drains it
    fn recover_between_rounds(&mut self, round: u8) -> Result<()> {
        for corner in Corner::BOTH {
            let f = &self.fighters[corner.index()];
            let c = &f.profile.coefficients;
            let recovery = (15.0 - 2.0 * round as f64).max(3.0) + c.recovery_bonus;
            let raw = f.stamina + recovery;
            if recovery < 0.0 || !recovery.is_finite() || !raw.is_finite() {
                return Err(self.violation(format!(
                    "{corner} recovery {recovery} from {} is invalid",
                    f.stamina
                )));
            }
            let mut stamina = raw.min(100.0);
            let cardio = f.base.attributes.cardio as f64;
            if cardio < 60.0 && !c.ignores_cardio_ceiling {
                let ceiling = 100.0 - round as f64 * (60.0 - cardio) * 0.3;
                stamina = stamina.min(ceiling);
            }
            self.fighters[corner.index()].stamina = stamina;
        }
        Ok(())
    }

    fn shift_momentum(&mut self, corner: Corner, delta: f64) {
        let f = &mut self.fighters[corner.index()];
        f.momentum = self.tuning.momentum_mode.shift(f.momentum, delta);
    }

    // ------------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------------

    fn legal<T>(&self, result: std::result::Result<T, IllegalTransition>) -> Result<T> {
        result.map_err(|e| self.violation(e.to_string()))
    }

    fn violation(&self, detail: String) -> FightError {
        FightError::InvariantViolation {
            round: self.round,
            tick: self.tick,
            detail,
        }
    }

    /// Stamina and momentum must stay inside their bounds; never clamped here
    fn check_bounds(&self) -> Result<()> {
        for corner in Corner::BOTH {
            let f = &self.fighters[corner.index()];
            if !f.stamina.is_finite() || !(0.0..=100.0).contains(&f.stamina) {
                let detail = format!("{corner} stamina {} out of bounds", f.stamina);
                return Err(self.violation(detail));
            }
            if !f.momentum.is_finite() || !(-1.0..=1.0).contains(&f.momentum) {
                let detail = format!("{corner} momentum {} out of bounds", f.momentum);
                return Err(self.violation(detail));
            }
        }
        Ok(())
    }
}
