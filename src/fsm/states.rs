//! Concrete state handler functions and table builder.
//!
//! ```text
//!           ┌──────────[pm25 > 90]───────────────────────┐
//!           │                                            ▼
//!  NORMAL ◀─┴─▶ MONITOR ──[forecast > 75, no hold]──▶ PREDICTIVE
//!    │  [pm25 > 40]   ▲                                ACTUATION
//!    │                │                                   │
//!    │                └──[dwell ≥ 80 && pm25 ≤ 45]────────┤
//!    │                     (arms 30-tick hold)            │
//!    └──────────[pm25 > 90]──────────▶ MITIGATION ────────┘
//!
//!  WARNING / ERROR: reserved, fall back to the escalation rules.
//! ```
//!
//! Rule priority outside an actuation episode is strict:
//! reactive (measured) > predictive (forecast) > monitor > normal.

use super::context::FsmContext;
use super::{OperatingState, StateDescriptor};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table.  Called once per session.
pub fn build_state_table() -> [StateDescriptor; OperatingState::COUNT] {
    [
        StateDescriptor {
            id: OperatingState::Normal,
            on_enter: Some(quiet_enter),
            on_exit: None,
            on_update: normal_update,
        },
        StateDescriptor {
            id: OperatingState::Monitor,
            on_enter: Some(quiet_enter),
            on_exit: None,
            on_update: monitor_update,
        },
        StateDescriptor {
            id: OperatingState::Warning,
            on_enter: Some(quiet_enter),
            on_exit: None,
            on_update: warning_update,
        },
        StateDescriptor {
            id: OperatingState::PredictiveActuation,
            on_enter: Some(predictive_enter),
            on_exit: Some(actuation_exit),
            on_update: actuation_update,
        },
        StateDescriptor {
            id: OperatingState::Mitigation,
            on_enter: Some(mitigation_enter),
            on_exit: Some(actuation_exit),
            on_update: actuation_update,
        },
        StateDescriptor {
            id: OperatingState::Error,
            on_enter: Some(quiet_enter),
            on_exit: None,
            on_update: error_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Escalation rules (shared by every non-actuating state)
// ═══════════════════════════════════════════════════════════════════════════

/// Pick the next state from the current reading.  Pure and total.
///
/// Callers must already have handled the actuation dwell and the
/// recovery hold; this covers the remaining priority ladder.
pub fn escalate(current: OperatingState, ctx: &FsmContext) -> OperatingState {
    let cfg = &ctx.config;
    let reading = &ctx.reading;

    if reading.pm25 > cfg.mitigation_threshold_pm25 {
        return OperatingState::Mitigation;
    }
    if reading.predicted_pm25 > cfg.predictive_threshold_pm25
        && !current.is_actuating()
        && !ctx.recovery_pending()
    {
        return OperatingState::PredictiveActuation;
    }
    if reading.pm25 > cfg.monitor_threshold_pm25 {
        return OperatingState::Monitor;
    }
    OperatingState::Normal
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL / MONITOR / reserved states: sprinklers off
// ═══════════════════════════════════════════════════════════════════════════

fn quiet_enter(ctx: &mut FsmContext) {
    ctx.commands.spray_intensity = 0.0;
}

fn normal_update(ctx: &mut FsmContext) -> Option<OperatingState> {
    Some(escalate(OperatingState::Normal, ctx))
}

fn monitor_update(ctx: &mut FsmContext) -> Option<OperatingState> {
    // Recovery grace period: no re-escalation of any kind.
    if ctx.recovery_pending() {
        ctx.recovery_hold -= 1;
        return None;
    }
    Some(escalate(OperatingState::Monitor, ctx))
}

fn warning_update(ctx: &mut FsmContext) -> Option<OperatingState> {
    Some(escalate(OperatingState::Warning, ctx))
}

fn error_update(ctx: &mut FsmContext) -> Option<OperatingState> {
    Some(escalate(OperatingState::Error, ctx))
}

// ═══════════════════════════════════════════════════════════════════════════
//  PREDICTIVE_ACTUATION / MITIGATION: sprinklers running
// ═══════════════════════════════════════════════════════════════════════════

fn predictive_enter(ctx: &mut FsmContext) {
    ctx.mitigation_ticks = 0;
    ctx.commands.spray_intensity = ctx.config.predictive_spray;
    info!(
        "PREDICTIVE: forecast {:.1} > {:.1}, sprinklers at {:.0}%",
        ctx.reading.predicted_pm25,
        ctx.config.predictive_threshold_pm25,
        ctx.config.predictive_spray * 100.0
    );
}

fn mitigation_enter(ctx: &mut FsmContext) {
    ctx.mitigation_ticks = 0;
    ctx.commands.spray_intensity = ctx.config.mitigation_spray;
    info!(
        "MITIGATION: PM2.5 {:.1} > {:.1}, sprinklers at {:.0}%",
        ctx.reading.pm25,
        ctx.config.mitigation_threshold_pm25,
        ctx.config.mitigation_spray * 100.0
    );
}

fn actuation_exit(ctx: &mut FsmContext) {
    ctx.recovery_hold = ctx.config.recovery_hold_ticks;
    info!(
        "ACTUATION: episode ended after {} ticks, {}-tick recovery hold armed",
        ctx.mitigation_ticks, ctx.recovery_hold
    );
}

fn actuation_update(ctx: &mut FsmContext) -> Option<OperatingState> {
    ctx.mitigation_ticks = ctx.mitigation_ticks.saturating_add(1);

    // Minimum dwell: no chattering once sprinklers start.
    if ctx.mitigation_ticks < ctx.config.min_mitigation_ticks {
        return None;
    }
    if ctx.reading.pm25 > ctx.config.release_threshold_pm25 {
        debug!(
            "ACTUATION: dwell met, PM2.5 {:.1} still above release {:.1}",
            ctx.reading.pm25, ctx.config.release_threshold_pm25
        );
        return None;
    }
    Some(OperatingState::Monitor)
}
