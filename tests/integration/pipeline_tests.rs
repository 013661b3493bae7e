//! Scenario tests for the environment machine and the telemetry pipeline
//! driven directly, without the service's throttling in between.

use chrono::{Duration, TimeZone, Utc};

use super::mock_ports::{MidpointNoise, ScriptedNoise};

use dustvision::config::SimConfig;
use dustvision::environment::{EnvironmentMachine, SimulationSample};
use dustvision::fsm::OperatingState;
use dustvision::fsm::context::DustReading;
use dustvision::sensors::wind::WindVector;
use dustvision::telemetry::alerts::{LOG_CAPACITY, LogKind};
use dustvision::telemetry::nodes::SeverityTier;
use dustvision::telemetry::{HISTORY_CAPACITY, SyncOutcome, TelemetryPipeline, Timestamp};

fn at(ms: u64) -> Timestamp {
    let base = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
    Timestamp::new(ms, base + Duration::milliseconds(ms as i64))
}

fn sample_with_pm10(pm10: f32) -> SimulationSample {
    SimulationSample {
        epoch: 1,
        pm25: pm10 / 1.6,
        pm10,
        predicted_pm25: pm10 / 1.6,
        state: OperatingState::Normal,
        wind: WindVector::calm_north(),
        spray_intensity: 0.0,
        intensity: 0.2,
    }
}

fn reading(pm25: f32, predicted_pm25: f32) -> DustReading {
    DustReading {
        pm25,
        pm10: pm25 * 1.6,
        predicted_pm25,
    }
}

// ── ESM scenarios ─────────────────────────────────────────────

#[test]
fn eighty_ticks_of_heavy_dust_end_in_mitigation_with_falling_intensity() {
    let mut esm = EnvironmentMachine::new(1, SimConfig::default());
    let mut last = None;
    for _ in 0..80 {
        last = Some(esm.tick_with_reading(reading(95.0, 110.0)));
    }
    let last = last.unwrap();
    assert_eq!(last.state, OperatingState::Mitigation);
    assert_eq!(last.spray_intensity, 1.0);
    // 0.15 + 0.002 - 79 × 0.02 clamps at zero.
    assert_eq!(last.intensity, 0.0);
}

#[test]
fn actuation_holds_for_minimum_dwell_then_recovers() {
    let mut esm = EnvironmentMachine::new(1, SimConfig::default());
    esm.tick_with_reading(reading(95.0, 95.0));
    assert_eq!(esm.state(), OperatingState::Mitigation);

    // Clean air immediately, but the dwell keeps sprinklers on.
    for _ in 1..80 {
        let s = esm.tick_with_reading(reading(30.0, 30.0));
        assert_eq!(s.state, OperatingState::Mitigation);
    }
    let s = esm.tick_with_reading(reading(30.0, 30.0));
    assert_eq!(s.state, OperatingState::Monitor);
    assert_eq!(s.spray_intensity, 0.0);
    assert_eq!(esm.recovery_hold(), 30);
}

#[test]
fn recovery_hold_blocks_predictive_for_thirty_ticks() {
    let mut esm = EnvironmentMachine::new(1, SimConfig::default());
    esm.tick_with_reading(reading(95.0, 95.0));
    for _ in 0..80 {
        esm.tick_with_reading(reading(95.0, 95.0));
    }
    // Dwell met, now release with a high forecast.
    let s = esm.tick_with_reading(reading(30.0, 100.0));
    assert_eq!(s.state, OperatingState::Monitor);

    for i in 0..30 {
        let s = esm.tick_with_reading(reading(30.0, 100.0));
        assert_eq!(s.state, OperatingState::Monitor, "hold tick {i}");
    }
    assert_eq!(esm.recovery_hold(), 0);
    let s = esm.tick_with_reading(reading(30.0, 100.0));
    assert_eq!(s.state, OperatingState::PredictiveActuation);
    assert!((s.spray_intensity - 0.6).abs() < f32::EPSILON);
}

#[test]
fn reactive_wins_over_predictive_from_normal() {
    let mut esm = EnvironmentMachine::new(1, SimConfig::default());
    let s = esm.tick_with_reading(reading(91.0, 200.0));
    assert_eq!(s.state, OperatingState::Mitigation);
}

#[test]
fn wind_rotates_every_forty_ticks() {
    let mut esm = EnvironmentMachine::new(1, SimConfig::default());
    for _ in 0..39 {
        esm.tick_with_reading(reading(20.0, 20.0));
    }
    assert_eq!(esm.wind(), WindVector::calm_north());
    let s = esm.tick_with_reading(reading(20.0, 20.0));
    assert_eq!(s.wind.angle_deg, 45.0);
    assert_eq!(s.wind.name, "VAR");

    for _ in 0..(40 * 7) {
        esm.tick_with_reading(reading(20.0, 20.0));
    }
    assert_eq!(esm.wind().angle_deg, 0.0, "eight steps wrap to north");
}

#[test]
fn seeded_noise_drives_a_full_tick() {
    // pm25 noise, pm10 ratio, forecast noise.
    let mut noise = ScriptedNoise::new([1.0, 1.5, 2.0]);
    let mut esm = EnvironmentMachine::new(1, SimConfig::default());
    let s = esm.tick(&mut noise);
    assert_eq!(noise.draws, 3);
    assert!((s.pm25 - 39.0).abs() < 1e-4);
    assert!((s.pm10 - 58.5).abs() < 1e-4);
    assert!((s.predicted_pm25 - 44.9).abs() < 1e-4);
}

// ── Pipeline scenarios ────────────────────────────────────────

#[test]
fn alert_and_success_entries_alternate() {
    let mut pipeline = TelemetryPipeline::new(1, &SimConfig::default(), &at(0));
    let pm10_series = [100.0, 20.0, 100.0, 100.0, 20.0, 20.0, 100.0, 20.0];

    for (i, pm10) in pm10_series.iter().enumerate() {
        let t = 5_000 * (i as u64 + 1);
        pipeline.sync(&sample_with_pm10(*pm10), &at(t), &mut MidpointNoise);
    }

    let kinds: Vec<_> = pipeline
        .log()
        .iter()
        .skip(1)
        .map(|e| e.kind)
        .filter(|k| matches!(k, LogKind::Alert | LogKind::Success))
        .collect();
    assert_eq!(
        kinds,
        vec![
            LogKind::Alert,
            LogKind::Success,
            LogKind::Alert,
            LogKind::Alert,
            LogKind::Success,
            LogKind::Alert,
            LogKind::Success,
        ]
    );
}

#[test]
fn forecast_never_reads_below_measurement() {
    let mut pipeline = TelemetryPipeline::new(1, &SimConfig::default(), &at(0));
    // Lowest forecast noise on a low reading forces the floor branch.
    let mut noise = ScriptedNoise::new([-1.5]);
    let SyncOutcome::Applied(report) =
        pipeline.sync(&sample_with_pm10(20.0), &at(1_001), &mut noise)
    else {
        panic!("expected applied");
    };
    assert!((report.forecast - 20.5).abs() < 1e-5);
    assert!(report.log_entry.is_none());
}

#[test]
fn node_tiers_follow_jittered_readings() {
    let mut pipeline = TelemetryPipeline::new(1, &SimConfig::default(), &at(0));
    pipeline.sync(&sample_with_pm10(160.0), &at(1_001), &mut MidpointNoise);
    assert!(
        pipeline
            .nodes()
            .iter()
            .all(|n| n.status == SeverityTier::Unhealthy)
    );

    pipeline.sync(&sample_with_pm10(260.0), &at(2_002), &mut MidpointNoise);
    assert!(
        pipeline
            .nodes()
            .iter()
            .all(|n| n.status == SeverityTier::Hazardous && n.pm10 == 260.0)
    );
}

#[test]
fn windows_stay_bounded_over_a_long_run() {
    let mut pipeline = TelemetryPipeline::new(1, &SimConfig::default(), &at(0));
    for i in 0..200u64 {
        let pm10 = if i % 2 == 0 { 120.0 } else { 10.0 };
        pipeline.sync(&sample_with_pm10(pm10), &at(5_000 * (i + 1)), &mut MidpointNoise);
        assert!(pipeline.history_len() <= HISTORY_CAPACITY);
        assert!(pipeline.log().len() <= LOG_CAPACITY);
        assert_eq!(pipeline.trajectory().len(), 16);
    }
    assert_eq!(pipeline.history_len(), HISTORY_CAPACITY);
    assert_eq!(pipeline.log().len(), LOG_CAPACITY);

    let ids: Vec<u64> = pipeline.log().iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
}
