//! Neon Rivals headless runner
//!
//! Plays scripted bots against each other through the real simulation and
//! logs round results. Rendering and input binding live elsewhere.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use neon_rivals::consts::SIM_DT;
    use neon_rivals::sim::{
        ArenaPhysics, CombatantId, ControlInput, FixedStepper, GameEvent, MatchState, RoundPhase, Snapshot, TickInput,
    };
    use neon_rivals::Tuning;

    /// Headless two-bot arena match
    #[derive(Parser, Debug)]
    #[command(name = "neon-rivals")]
    #[command(about = "Run a headless Neon Rivals match between two bots")]
    #[command(version)]
    pub struct Args {
        /// Seed for upgrade offers
        #[arg(long, default_value_t = 1)]
        pub seed: u64,

        /// Tuning overrides (JSON)
        #[arg(long, value_name = "TUNING_FILE")]
        pub tuning: Option<PathBuf>,

        /// Number of rounds to play
        #[arg(long, default_value_t = 3)]
        pub rounds: u32,

        /// Give up on a round after this many simulated seconds
        #[arg(long, default_value_t = 120.0)]
        pub max_round_secs: f32,

        /// Print the final snapshot as JSON
        #[arg(long)]
        pub json: bool,
    }

    /// Line up on Z with the opponent, then close in on X while firing
    fn bot_input(snap: &Snapshot, me: CombatantId) -> ControlInput {
        let mine = &snap.combatants[me.index()];
        let theirs = &snap.combatants[me.other().index()];
        let delta = theirs.pos - mine.pos;

        let mut input = ControlInput::default();
        if delta.z.abs() > 0.3 {
            input.down = delta.z > 0.0;
            input.up = delta.z < 0.0;
        } else if delta.x.abs() > 6.0 || mine.facing.x * delta.x <= 0.0 {
            input.right = delta.x > 0.0;
            input.left = delta.x < 0.0;
        }
        input.fire = delta.z.abs() <= 0.3;
        // Hop back onto the floor if knocked above the opponent
        input.jump = delta.y > 1.0;
        input
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::PlayerHit { target, damage } => {
                log::debug!("Player {} hit for {}", target.number(), damage)
            }
            GameEvent::FellIntoVoid { target } => {
                log::info!("Player {} fell into the void", target.number())
            }
            GameEvent::RoundResolved { loser } => log::info!("Player {} eliminated", loser.number()),
            other => log::trace!("{:?}", other),
        }
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let mut physics = ArenaPhysics::from_tuning(&tuning);
        let mut state = MatchState::with_tuning(args.seed, tuning);
        let mut stepper = FixedStepper::new();
        state.start_match()?;

        let max_ticks = (args.max_round_secs / SIM_DT).ceil() as u64;
        let mut played = 0;
        for _ in 0..args.rounds {
            let round_start = state.time_ticks;
            while state.phase() == RoundPhase::Active {
                if state.time_ticks - round_start >= max_ticks {
                    log::warn!("Round {} timed out", state.round.round);
                    break;
                }
                let snap = state.snapshot();
                let input = TickInput::new(bot_input(&snap, CombatantId::One), bot_input(&snap, CombatantId::Two));
                stepper.advance(&mut state, &input, &mut physics, SIM_DT);
                for event in state.drain_events() {
                    log_event(&event);
                }
            }

            if state.phase() != RoundPhase::Resolved {
                break;
            }
            played += 1;
            // Loser takes the first option on offer
            if let Some(&pick) = state.upgrade_offer().first() {
                state.apply_upgrade(pick)?;
            }
            for event in state.drain_events() {
                log_event(&event);
            }
        }

        let snap = state.snapshot();
        log::info!(
            "Final score after {} round(s): {} - {}",
            played,
            snap.combatants[0].wins,
            snap.combatants[1].wins,
        );
        if args.json {
            println!("{}", serde_json::to_string_pretty(&snap)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Rivals (headless) starting...");

    if let Err(e) = headless::run(headless::Args::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; the simulation is driven by the host page
}
