//! Simulation tick
//!
//! Core loop that advances a match by one step. Order within a tick:
//! controllers, forces, integration, contacts, cleanup, void check, damage.

use serde::{Deserialize, Serialize};

use super::collision::{ContactOutcome, resolve_contact};
use super::combatant::{self, CombatantId, ControlInput};
use super::contact::{Bodies, PhysicsWorld, sort_contacts};
use super::state::{GameEvent, MatchState, RetireReason, RoundPhase};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input snapshot for one tick, taken once before the tick runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Indexed by `CombatantId::index`
    pub players: [ControlInput; 2],
}

impl TickInput {
    pub fn new(one: ControlInput, two: ControlInput) -> Self {
        Self { players: [one, two] }
    }

    pub fn get(&self, id: CombatantId) -> &ControlInput {
        &self.players[id.index()]
    }
}

/// Advance the match by `dt` seconds.
///
/// Does nothing unless the round is Active: Idle waits for `start_match`,
/// Resolved waits for `apply_upgrade`.
pub fn tick<P: PhysicsWorld + ?Sized>(state: &mut MatchState, input: &TickInput, physics: &mut P, dt: f32) {
    if state.round.phase != RoundPhase::Active {
        return;
    }

    state.time_ticks += 1;
    state.time += f64::from(dt);
    let now = state.time;

    // Controllers, fixed order
    let mut shots = Vec::new();
    for id in CombatantId::ALL {
        let c = &mut state.combatants[id.index()];
        if let Some(shot) = combatant::drive(c, input.get(id), &state.tuning, state.arena.floor_y, now) {
            shots.push(shot);
        }
    }
    for shot in shots {
        state.fire(shot);
    }

    physics.apply_forces(
        Bodies {
            combatants: &mut state.combatants,
            projectiles: state.projectiles.as_mut_slice(),
        },
        dt,
    );

    for c in &mut state.combatants {
        c.integrate(dt);
    }
    state.projectiles.advance(dt);

    let mut contacts = Vec::new();
    physics.resolve_contacts(
        &state.arena,
        Bodies {
            combatants: &mut state.combatants,
            projectiles: state.projectiles.as_mut_slice(),
        },
        &mut contacts,
    );
    sort_contacts(&mut contacts);

    let mut damage = Vec::new();
    for contact in &contacts {
        let outcome = resolve_contact(
            contact,
            &state.combatants,
            &mut state.projectiles,
            state.tuning.bounce_threshold,
        );
        match outcome {
            ContactOutcome::Hit { .. } => {
                damage.extend(outcome.damage(contact.projectile));
                state.emit(GameEvent::ProjectileRetired {
                    id: contact.projectile,
                    reason: RetireReason::Hit,
                });
            }
            ContactOutcome::Exhausted => {
                state.emit(GameEvent::ProjectileRetired {
                    id: contact.projectile,
                    reason: RetireReason::Exhausted,
                });
            }
            ContactOutcome::Bounced { remaining } => {
                log::trace!("Projectile {:?} bounced, {} left", contact.projectile, remaining);
            }
            ContactOutcome::SelfContact | ContactOutcome::Settled | ContactOutcome::Stale => {}
        }
    }

    for id in state
        .projectiles
        .retire_out_of_bounds(&state.arena, state.tuning.void_y)
    {
        state.emit(GameEvent::ProjectileRetired {
            id,
            reason: RetireReason::OutOfBounds,
        });
    }

    for c in &state.combatants {
        damage.extend(combatant::void_check(c, &state.tuning));
    }

    state.apply_damages(damage);
}

/// Drives `tick` at `SIM_DT` from a variable-rate outer loop
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `frame_dt` and run as many fixed ticks as fit, up to the
    /// substep cap. Returns the number of ticks run.
    pub fn advance<P: PhysicsWorld + ?Sized>(
        &mut self,
        state: &mut MatchState,
        input: &TickInput,
        physics: &mut P,
        frame_dt: f32,
    ) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, physics, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
