//! Integration tests for the frame → ESM → TFP → sink pipeline.
//!
//! These drive [`AppService`] with a manual clock and midpoint noise, so
//! every reading is deterministic: a fresh session reads PM2.5 38.0 on its
//! first tick and the dust intensity climbs 0.002 per tick.

use super::mock_ports::{ManualClock, MidpointNoise, RecordingSink};

use dustvision::Error;
use dustvision::app::commands::AppCommand;
use dustvision::app::events::AppEvent;
use dustvision::app::service::{AppService, FrameOutcome};
use dustvision::config::SimConfig;
use dustvision::fsm::OperatingState;
use dustvision::telemetry::SyncOutcome;
use dustvision::telemetry::alerts::LogKind;
use dustvision::telemetry::forecast::TRAJECTORY_LEN;
use dustvision::telemetry::nodes::NodeError;

fn make_app() -> (AppService<MidpointNoise>, ManualClock, RecordingSink) {
    let clock = ManualClock::new();
    let mut app = AppService::new(SimConfig::default(), MidpointNoise, &clock);
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, clock, sink)
}

/// Advance `step_ms` and offer one frame, `n` times.
fn run_frames(
    app: &mut AppService<MidpointNoise>,
    clock: &ManualClock,
    sink: &mut RecordingSink,
    step_ms: u64,
    n: usize,
) {
    for _ in 0..n {
        clock.advance(step_ms);
        app.frame(clock, sink);
    }
}

// ── Throttling ────────────────────────────────────────────────

#[test]
fn frames_faster_than_tick_interval_are_dropped() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 50, 20);

    let stats = app.stats();
    assert_eq!(stats.frames, 20);
    assert_eq!(stats.ticks, 10);
    assert_eq!(stats.dropped_frames, 10);
}

#[test]
fn sixty_hz_frames_tick_at_most_ten_times_per_second() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 16, 63);
    let stats = app.stats();
    assert!(stats.ticks <= 10, "ticks = {}", stats.ticks);
    assert!(stats.ticks >= 8, "ticks = {}", stats.ticks);
    assert_eq!(stats.ticks + stats.dropped_frames, stats.frames);
}

#[test]
fn sync_runs_strictly_after_one_second() {
    let (mut app, clock, mut sink) = make_app();

    run_frames(&mut app, &clock, &mut sink, 100, 10);
    assert_eq!(app.stats().syncs, 0, "exactly 1000 ms must not sync");
    assert!(app.pipeline().trajectory().is_empty());

    clock.advance(100);
    assert_eq!(
        app.frame(&clock, &mut sink),
        FrameOutcome::Ticked { synced: true }
    );
    assert_eq!(app.stats().syncs, 1);
}

#[test]
fn windows_after_ten_seconds() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 100, 100);

    // Syncs land at 1100, 2200, ... 9900.
    let snap = app.snapshot();
    assert_eq!(snap.stats.ticks, 100);
    assert_eq!(snap.stats.syncs, 9);
    assert_eq!(snap.history.len(), 9);
    assert_eq!(snap.trajectory.len(), TRAJECTORY_LEN);
    assert_eq!(sink.telemetry_count(), 9);
}

// ── State machine through the service ─────────────────────────

#[test]
fn rising_dust_moves_normal_to_monitor() {
    let (mut app, clock, mut sink) = make_app();
    sink.clear();

    run_frames(&mut app, &clock, &mut sink, 100, 9);
    assert_eq!(app.status().state, OperatingState::Normal);

    run_frames(&mut app, &clock, &mut sink, 100, 1);
    assert_eq!(app.status().state, OperatingState::Monitor);
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: OperatingState::Normal,
        to: OperatingState::Monitor,
    }));
    assert_eq!(app.status().spray_intensity, 0.0);
}

#[test]
fn telemetry_event_mirrors_latest_sample() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 100, 11);

    let sample = app.latest_sample().expect("ticked");
    let update = sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::Telemetry(t) => Some(*t),
            _ => None,
        })
        .expect("one telemetry event");
    assert_eq!(update.epoch, 1);
    assert_eq!(update.state, sample.state);
    assert!((update.pm10 - sample.pm10).abs() < f32::EPSILON);
    assert!((update.predicted_pm25 - sample.predicted_pm25).abs() < f32::EPSILON);
}

// ── Alerts ────────────────────────────────────────────────────

#[test]
fn alerts_respect_cooldown_while_forecast_stays_high() {
    let (mut app, clock, mut sink) = make_app();
    sink.clear();

    // Syncs at 1100, 2200, 3300, 4400, 5500; alerts only at 1100 and 5500.
    run_frames(&mut app, &clock, &mut sink, 100, 55);

    let stats = app.stats();
    assert_eq!(stats.syncs, 5);
    assert_eq!(stats.alerts_raised, 2);
    assert_eq!(sink.log_kinds(), vec![LogKind::Alert, LogKind::Alert]);
    assert!(app.snapshot().hazardous);

    let first_alert = app
        .snapshot()
        .log
        .into_iter()
        .find(|e| e.kind == LogKind::Alert)
        .unwrap();
    assert_eq!(first_alert.message, "PREDICTION: High Dust Inbound (68 µg/m³)");
    assert_eq!(first_alert.time, "12:00:01");
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn deploy_sensor_adds_node_and_action_entry() {
    let (mut app, clock, mut sink) = make_app();
    sink.clear();

    app.handle_command(
        AppCommand::DeploySensor {
            id: "DV-NODE-03".into(),
            location: "South Haul Road".into(),
        },
        &clock,
        &mut sink,
    )
    .unwrap();

    let snap = app.snapshot();
    assert_eq!(snap.nodes.len(), 3);
    let node = snap.nodes.iter().find(|n| n.id == "DV-NODE-03").unwrap();
    assert_eq!((node.position.x, node.position.z), (0.0, 0.0));
    assert_eq!(sink.log_kinds(), vec![LogKind::Action]);
}

#[test]
fn duplicate_deploy_is_rejected() {
    let (mut app, clock, mut sink) = make_app();
    let err = app
        .handle_command(
            AppCommand::DeploySensor {
                id: "DV-NODE-02".into(),
                location: "Elsewhere".into(),
            },
            &clock,
            &mut sink,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Node(NodeError::DuplicateId(_))));
    assert_eq!(app.snapshot().nodes.len(), 2);
}

#[test]
fn pause_stops_work_and_resume_does_not_burst() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 100, 5);
    let before = app.stats();

    app.handle_command(AppCommand::Pause, &clock, &mut sink).unwrap();
    for _ in 0..100 {
        clock.advance(600);
        assert_eq!(app.frame(&clock, &mut sink), FrameOutcome::Paused);
    }
    assert_eq!(app.stats(), before);

    app.handle_command(AppCommand::Resume, &clock, &mut sink).unwrap();
    clock.advance(50);
    assert_eq!(app.frame(&clock, &mut sink), FrameOutcome::Dropped);
    clock.advance(50);
    assert_eq!(
        app.frame(&clock, &mut sink),
        FrameOutcome::Ticked { synced: false }
    );

    let kinds: Vec<_> = app.snapshot().log.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![LogKind::Success, LogKind::Info, LogKind::Info],
        "boot entry, paused, resumed"
    );
    assert!(sink.events.contains(&AppEvent::Paused));
    assert!(sink.events.contains(&AppEvent::Resumed));
}

#[test]
fn repeated_pause_is_idempotent() {
    let (mut app, clock, mut sink) = make_app();
    app.handle_command(AppCommand::Pause, &clock, &mut sink).unwrap();
    app.handle_command(AppCommand::Pause, &clock, &mut sink).unwrap();
    assert_eq!(app.snapshot().log.len(), 2);
    app.handle_command(AppCommand::Resume, &clock, &mut sink).unwrap();
    app.handle_command(AppCommand::Resume, &clock, &mut sink).unwrap();
    assert_eq!(app.snapshot().log.len(), 3);
}

// ── Restart ───────────────────────────────────────────────────

#[test]
fn restart_discards_the_whole_session() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 100, 30);
    assert!(app.snapshot().history.len() > 0);

    app.handle_command(AppCommand::Restart, &clock, &mut sink).unwrap();
    assert!(sink.events.contains(&AppEvent::Restarted { epoch: 2 }));

    let snap = app.snapshot();
    assert_eq!(snap.status.epoch, 2);
    assert_eq!(snap.status.state, OperatingState::Normal);
    assert!((snap.status.intensity - 0.15).abs() < f32::EPSILON);
    assert_eq!(snap.status.wind.name, "N");
    assert!(snap.latest.is_none());
    assert!(snap.history.is_empty());
    assert!(snap.trajectory.is_empty());
    assert_eq!(snap.log.len(), 1);
    assert_eq!(snap.log[0].kind, LogKind::Success);
    assert_eq!(snap.nodes.len(), 2);
    assert!(!snap.hazardous);
    assert_eq!(snap.stats.frames, 0);
}

#[test]
fn stale_sample_after_restart_is_ignored() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 100, 5);
    let old = app.latest_sample().unwrap();
    assert_eq!(old.epoch, 1);

    app.handle_command(AppCommand::Restart, &clock, &mut sink).unwrap();
    sink.clear();

    let outcome = app.deliver_sample(&old, &clock, &mut sink);
    assert_eq!(
        outcome,
        SyncOutcome::Stale {
            sample_epoch: 1,
            pipeline_epoch: 2
        }
    );
    assert!(sink.events.is_empty());
    assert_eq!(app.stats().stale_samples, 1);
    assert!(app.snapshot().history.is_empty());
}

#[test]
fn delivered_samples_share_the_sync_schedule() {
    let (mut app, clock, mut sink) = make_app();
    // First sync lands on the frame at 1100 ms.
    run_frames(&mut app, &clock, &mut sink, 100, 11);
    assert_eq!(app.stats().syncs, 1);
    let latest = app.latest_sample().unwrap();
    sink.clear();

    for _ in 0..5 {
        assert_eq!(
            app.deliver_sample(&latest, &clock, &mut sink),
            SyncOutcome::Throttled
        );
    }
    assert_eq!(app.stats().syncs, 1);
    assert_eq!(app.pipeline().history_len(), 1);
    assert_eq!(sink.telemetry_count(), 0);

    clock.set(2_101);
    assert!(matches!(
        app.deliver_sample(&latest, &clock, &mut sink),
        SyncOutcome::Applied(_)
    ));
    assert_eq!(
        app.deliver_sample(&latest, &clock, &mut sink),
        SyncOutcome::Throttled
    );
    assert_eq!(app.stats().syncs, 2);
    assert_eq!(app.pipeline().history_len(), 2);
    assert_eq!(sink.telemetry_count(), 1);

    // The frame loop sees the gate fired by the delivery.
    clock.advance(100);
    assert_eq!(
        app.frame(&clock, &mut sink),
        FrameOutcome::Ticked { synced: false }
    );
    assert_eq!(app.stats().syncs, 2);
}

#[test]
fn restart_gates_start_from_restart_instant() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 100, 3);
    clock.advance(30);
    app.handle_command(AppCommand::Restart, &clock, &mut sink).unwrap();

    clock.advance(99);
    assert_eq!(app.frame(&clock, &mut sink), FrameOutcome::Dropped);
    clock.advance(1);
    assert!(matches!(
        app.frame(&clock, &mut sink),
        FrameOutcome::Ticked { .. }
    ));
    assert_eq!(app.latest_sample().unwrap().epoch, 2);
}

// ── Snapshot ──────────────────────────────────────────────────

#[test]
fn snapshot_serializes_for_display() {
    let (mut app, clock, mut sink) = make_app();
    run_frames(&mut app, &clock, &mut sink, 100, 12);

    let json = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(json["status"]["state"], "MONITOR");
    assert_eq!(json["status"]["epoch"], 1);
    assert_eq!(json["trajectory"][0]["time"], "Now");
    assert_eq!(json["trajectory"][1]["time"], "12:01:01");
    assert_eq!(json["log"][0]["kind"], "SUCCESS");
    assert_eq!(json["nodes"][1]["id"], "DV-NODE-02");
    assert_eq!(json["stats"]["syncs"], 1);
}
