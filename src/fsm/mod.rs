//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                       │
//! │  ┌──────────────────────┬──────────┬──────────┬────────────────┐  │
//! │  │ OperatingState       │ on_enter │ on_exit  │ on_update      │  │
//! │  ├──────────────────────┼──────────┼──────────┼────────────────┤  │
//! │  │ Normal               │ fn(ctx)  │    -     │ fn(ctx)->Opt<> │  │
//! │  │ Monitor              │ fn(ctx)  │    -     │ fn(ctx)->Opt<> │  │
//! │  │ Warning              │ fn(ctx)  │    -     │ fn(ctx)->Opt<> │  │
//! │  │ PredictiveActuation  │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Opt<> │  │
//! │  │ Mitigation           │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Opt<> │  │
//! │  │ Error                │ fn(ctx)  │    -     │ fn(ctx)->Opt<> │  │
//! │  └──────────────────────┴──────────┴──────────┴────────────────┘  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each accepted simulation tick the engine calls `on_update` for the
//! **current** state.  If it returns `Some(next)` and `next` differs from
//! the current state, the engine runs `on_exit` for the current state,
//! then `on_enter` for the next, and updates the current pointer.  All
//! functions receive `&mut FsmContext`, which holds the latest dust
//! reading, the actuation counters, the spray command and the config.

pub mod context;
pub mod states;

use core::fmt;

use context::FsmContext;
use log::info;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of every site operating state.
///
/// `Warning` and `Error` are part of the design but no current rule
/// transitions into them.  Must stay in sync with the state table built
/// in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum OperatingState {
    Normal = 0,
    Monitor = 1,
    Warning = 2,
    PredictiveActuation = 3,
    Mitigation = 4,
    Error = 5,
}

impl OperatingState {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 6;

    /// Every state, in table order.
    pub const ALL: [OperatingState; Self::COUNT] = [
        Self::Normal,
        Self::Monitor,
        Self::Warning,
        Self::PredictiveActuation,
        Self::Mitigation,
        Self::Error,
    ];

    /// Convert a table index back to a state.  Panics on out-of-range in
    /// debug builds; returns `Error` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Normal,
            1 => Self::Monitor,
            2 => Self::Warning,
            3 => Self::PredictiveActuation,
            4 => Self::Mitigation,
            5 => Self::Error,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Error
            }
        }
    }

    /// True while sprinklers are running (reactive or predictive).
    pub fn is_actuating(self) -> bool {
        matches!(self, Self::Mitigation | Self::PredictiveActuation)
    }

    /// Dashboard label, e.g. `PREDICTIVE_ACTUATION`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Monitor => "MONITOR",
            Self::Warning => "WARNING",
            Self::PredictiveActuation => "PREDICTIVE_ACTUATION",
            Self::Mitigation => "MITIGATION",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to request a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<OperatingState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single operating state.
pub struct StateDescriptor {
    pub id: OperatingState,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the index of the active state.  Exactly one
/// state is active at any time.
pub struct Fsm {
    /// Fixed-size table indexed by `OperatingState as usize`.
    table: [StateDescriptor; OperatingState::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; OperatingState::COUNT], initial: OperatingState) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.current_state());
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)` with `next != current`, execute the
    ///    transition: `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            if next_id as usize != self.current {
                self.transition(next_id, ctx);
            }
        }
    }

    /// Force an immediate transition, running exit and enter actions.
    pub fn force_transition(&mut self, next: OperatingState, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> OperatingState {
        OperatingState::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: OperatingState, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {} (pm25={:.1}, forecast={:.1})",
            self.current_state(),
            next_id,
            ctx.reading.pm25,
            ctx.reading.predicted_pm25
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
