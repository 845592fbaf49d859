//! Temporal properties judged over recorded games.
//!
//! A `TemporalSpec` is checked against a `Replay` by stepping through every
//! recorded turn and looking at the states (or pairs of consecutive states)
//! the replay passes through. Verdicts are three-valued: a play can break a
//! property, support it, or only satisfy it vacuously.

use std::fmt;
use std::ops::Not;
use std::rc::Rc;

use crate::game::Game;
use crate::replay::{Replay, ReplayError};

pub mod predicates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Judgement {
    Valid,
    /// Not violated, but only because an assumption never held or the play
    /// never reached a state the property talks about.
    Inconclusive,
    Invalid,
}

pub type StatePredicate = Rc<dyn Fn(&Game) -> bool>;
pub type TransitionPredicate = Rc<dyn Fn(&Game, &Game) -> bool>;

#[derive(Clone)]
pub enum TemporalSpec {
    /// Holds on every state, including the one before the first turn.
    Always(StatePredicate),
    Eventually(StatePredicate),
    /// Holds on every `(previous, next)` pair of consecutive states.
    AlwaysChange(TransitionPredicate),
    EventuallyChange(TransitionPredicate),
    /// Once `p && !q` holds, the next state keeps `p` or reaches `q`.
    Unless { p: StatePredicate, q: StatePredicate },
    Not(Box<TemporalSpec>),
    And(Box<TemporalSpec>, Box<TemporalSpec>),
    Assuming { assumption: Box<TemporalSpec>, conclusion: Box<TemporalSpec> },
}

impl fmt::Debug for TemporalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always(_) => f.write_str("Always(..)"),
            Self::Eventually(_) => f.write_str("Eventually(..)"),
            Self::AlwaysChange(_) => f.write_str("AlwaysChange(..)"),
            Self::EventuallyChange(_) => f.write_str("EventuallyChange(..)"),
            Self::Unless { .. } => f.write_str("Unless(..)"),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Self::And(a, b) => f.debug_tuple("And").field(a).field(b).finish(),
            Self::Assuming { assumption, conclusion } => f
                .debug_struct("Assuming")
                .field("assumption", assumption)
                .field("conclusion", conclusion)
                .finish(),
        }
    }
}

impl TemporalSpec {
    pub fn always(p: impl Fn(&Game) -> bool + 'static) -> Self {
        Self::Always(Rc::new(p))
    }

    pub fn eventually(p: impl Fn(&Game) -> bool + 'static) -> Self {
        Self::Eventually(Rc::new(p))
    }

    pub fn always_change(p: impl Fn(&Game, &Game) -> bool + 'static) -> Self {
        Self::AlwaysChange(Rc::new(p))
    }

    pub fn eventually_change(p: impl Fn(&Game, &Game) -> bool + 'static) -> Self {
        Self::EventuallyChange(Rc::new(p))
    }

    pub fn unless(
        p: impl Fn(&Game) -> bool + 'static,
        q: impl Fn(&Game) -> bool + 'static,
    ) -> Self {
        Self::Unless { p: Rc::new(p), q: Rc::new(q) }
    }

    pub fn and(self, other: TemporalSpec) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// `self` is only judged on plays where `assumption` is valid.
    pub fn assuming(self, assumption: TemporalSpec) -> Self {
        Self::Assuming { assumption: Box::new(assumption), conclusion: Box::new(self) }
    }

    /// Judge one recorded play. The replay is rewound first and left at its
    /// end afterwards.
    pub fn evaluate(&self, replay: &mut Replay) -> Result<Judgement, ReplayError> {
        match self {
            Self::Always(p) => always(replay, p.as_ref()),
            Self::Eventually(p) => {
                let never = |game: &Game| !p(game);
                Ok(negate(always(replay, &never)?))
            }
            Self::AlwaysChange(p) => always_change(replay, p.as_ref()),
            Self::EventuallyChange(p) => {
                let never = |prev: &Game, next: &Game| !p(prev, next);
                Ok(negate(always_change(replay, &never)?))
            }
            Self::Unless { p, q } => unless(replay, p.as_ref(), q.as_ref()),
            Self::Not(inner) => Ok(negate(inner.evaluate(replay)?)),
            Self::And(a, b) => {
                let a = a.evaluate(replay)?;
                let b = b.evaluate(replay)?;
                Ok(match (a, b) {
                    (Judgement::Valid, Judgement::Valid) => Judgement::Valid,
                    (Judgement::Invalid, _) | (_, Judgement::Invalid) => Judgement::Invalid,
                    _ => Judgement::Inconclusive,
                })
            }
            Self::Assuming { assumption, conclusion } => {
                let assumed = assumption.evaluate(replay)?;
                let concluded = conclusion.evaluate(replay)?;
                Ok(match (assumed, concluded) {
                    (Judgement::Valid, verdict @ (Judgement::Valid | Judgement::Invalid)) => {
                        verdict
                    }
                    _ => Judgement::Inconclusive,
                })
            }
        }
    }

    /// Judge a set of plays: `Invalid` as soon as one play breaks the
    /// property, `Valid` when at least `threshold` plays support it, and
    /// `Inconclusive` otherwise.
    pub fn evaluate_all(
        &self,
        replays: &mut [Replay],
        threshold: usize,
    ) -> Result<Judgement, ReplayError> {
        let mut supporting = 0;
        for replay in replays.iter_mut() {
            match self.evaluate(replay)? {
                Judgement::Invalid => return Ok(Judgement::Invalid),
                Judgement::Valid => supporting += 1,
                Judgement::Inconclusive => {}
            }
        }
        Ok(if supporting >= threshold { Judgement::Valid } else { Judgement::Inconclusive })
    }
}

impl Not for TemporalSpec {
    type Output = TemporalSpec;

    fn not(self) -> Self::Output {
        TemporalSpec::Not(Box::new(self))
    }
}

fn negate(judgement: Judgement) -> Judgement {
    match judgement {
        Judgement::Valid => Judgement::Invalid,
        Judgement::Invalid => Judgement::Valid,
        Judgement::Inconclusive => Judgement::Inconclusive,
    }
}

fn always(replay: &mut Replay, p: &dyn Fn(&Game) -> bool) -> Result<Judgement, ReplayError> {
    replay.reset();
    loop {
        if !p(replay.state()) {
            log::debug!("Always violated at turn {}", replay.turn());
            return Ok(Judgement::Invalid);
        }
        if replay.at_the_end() {
            return Ok(Judgement::Valid);
        }
        replay.replay_current_turn()?;
    }
}

/// A play without a single replayed turn has no transition to judge.
fn always_change(
    replay: &mut Replay,
    p: &dyn Fn(&Game, &Game) -> bool,
) -> Result<Judgement, ReplayError> {
    replay.reset();
    if replay.at_the_end() {
        return Ok(Judgement::Inconclusive);
    }
    while !replay.at_the_end() {
        let previous = replay.state().clone();
        replay.replay_current_turn()?;
        if !p(&previous, replay.state()) {
            log::debug!("AlwaysChange violated at turn {}", replay.turn());
            return Ok(Judgement::Invalid);
        }
    }
    Ok(Judgement::Valid)
}

fn unless(
    replay: &mut Replay,
    p: &dyn Fn(&Game) -> bool,
    q: &dyn Fn(&Game) -> bool,
) -> Result<Judgement, ReplayError> {
    replay.reset();
    let pending = |game: &Game| p(game) && !q(game);
    let mut armed = pending(replay.state());
    let mut relevant = armed;
    while !replay.at_the_end() {
        replay.replay_current_turn()?;
        let state = replay.state();
        if armed && !(p(state) || q(state)) {
            log::debug!("Unless violated at turn {}", replay.turn());
            return Ok(Judgement::Invalid);
        }
        armed = pending(state);
        relevant |= armed;
    }
    Ok(if relevant { Judgement::Valid } else { Judgement::Inconclusive })
}
