use std::time::Duration;

use archery_mind_trainer::announcer::{Cue, RecordingAnnouncer};
use archery_mind_trainer::drill::ANNOUNCEMENT_HOLD;
use archery_mind_trainer::{Decision, DrillConfig, DrillError, DrillSession, Phase, TickOutcome};
use assert_matches::assert_matches;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn config(prep_secs: u32, hold_secs: f64, shoot_percent: u32, arrows: u32) -> DrillConfig {
    DrillConfig {
        prep_secs,
        hold_secs,
        shoot_percent,
        arrows,
    }
}

/// Tick with irregular step sizes until the session finishes; returns the
/// simulated time that passed.
fn run_with_jitter(session: &mut DrillSession<RecordingAnnouncer, StdRng>, seed: u64) -> Duration {
    let mut jitter = StdRng::seed_from_u64(seed);
    let mut clock = Duration::ZERO;
    for _ in 0..1_000_000 {
        let step = Duration::from_millis(jitter.gen_range(1..=700));
        clock += step;
        if let TickOutcome::Completed(_) = session.tick(step) {
            return clock;
        }
    }
    panic!("session did not finish");
}

#[test]
fn every_arrow_is_logged_once_and_in_order() {
    for seed in 0..20u64 {
        let cfg = config(2, 1.5, 50, 7);
        let mut session = DrillSession::start(
            cfg,
            RecordingAnnouncer::default(),
            StdRng::seed_from_u64(seed),
        )
        .unwrap();
        run_with_jitter(&mut session, seed + 100);

        assert_eq!(session.phase(), Phase::Complete);
        let arrows: Vec<u32> = session.results().iter().map(|r| r.arrow).collect();
        assert_eq!(arrows, (1..=7).collect::<Vec<_>>(), "seed {seed}");

        let stamps: Vec<_> = session.results().iter().map(|r| r.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn cues_follow_the_phase_order_and_match_the_log() {
    let mut session = DrillSession::start(
        config(1, 0.5, 50, 4),
        RecordingAnnouncer::default(),
        StdRng::seed_from_u64(11),
    )
    .unwrap();
    run_with_jitter(&mut session, 5);

    let expected: Vec<Cue> = session
        .results()
        .iter()
        .flat_map(|r| [Cue::Preparation(r.arrow), Cue::Hold, Cue::Decision(r.decision)])
        .collect();
    assert_eq!(session.announcer().cues, expected);
}

#[test]
fn simulated_time_covers_every_phase() {
    let cfg = config(3, 2.0, 70, 3);
    let mut session =
        DrillSession::start(cfg, RecordingAnnouncer::default(), StdRng::seed_from_u64(1)).unwrap();
    let clock = run_with_jitter(&mut session, 9);

    let per_arrow = cfg.prep_duration() + cfg.hold_duration() + ANNOUNCEMENT_HOLD;
    // the hold may end up to a few milliseconds early
    let floor = per_arrow * cfg.arrows - Duration::from_millis(5) * cfg.arrows;
    assert!(clock >= floor, "{clock:?} < {floor:?}");
}

#[test]
fn extreme_percentages_are_deterministic() {
    for seed in 0..10u64 {
        let mut always = DrillSession::start(
            config(1, 0.0, 100, 10),
            RecordingAnnouncer::default(),
            StdRng::seed_from_u64(seed),
        )
        .unwrap();
        run_with_jitter(&mut always, seed);
        assert!(always.results().iter().all(|r| r.decision == Decision::Shoot));

        let mut never = DrillSession::start(
            config(1, 0.0, 0, 10),
            RecordingAnnouncer::default(),
            StdRng::seed_from_u64(seed),
        )
        .unwrap();
        run_with_jitter(&mut never, seed);
        assert!(never.results().iter().all(|r| r.decision == Decision::LetDown));
    }
}

#[test]
fn same_seed_gives_the_same_commands() {
    let decisions = |seed| {
        let mut session = DrillSession::start(
            config(1, 1.0, 50, 12),
            RecordingAnnouncer::default(),
            StdRng::seed_from_u64(seed),
        )
        .unwrap();
        run_with_jitter(&mut session, 0);
        session
            .results()
            .iter()
            .map(|r| r.decision)
            .collect::<Vec<_>>()
    };
    assert_eq!(decisions(42), decisions(42));
}

#[test]
fn abort_at_any_point_keeps_only_committed_decisions() {
    for stop_after in [0usize, 1, 5, 9, 13, 20, 27] {
        let mut session = DrillSession::start(
            config(1, 1.0, 100, 3),
            RecordingAnnouncer::default(),
            StdRng::seed_from_u64(0),
        )
        .unwrap();
        for _ in 0..stop_after {
            session.tick(Duration::from_millis(500));
        }
        let phase_before = session.phase();
        let arrow_before = session.arrow();
        let log = session.abort();

        if phase_before.is_terminal() {
            assert_eq!(log.len(), 3);
            continue;
        }
        assert_eq!(session.phase(), Phase::Aborted);
        let committed = match phase_before {
            Phase::Decision => arrow_before,
            _ => arrow_before - 1,
        };
        assert_eq!(log.len() as u32, committed, "stopped after {stop_after} ticks");

        // nothing moves once aborted
        let cues = session.announcer().cues.len();
        assert_matches!(session.tick(Duration::from_secs(60)), TickOutcome::Ignored);
        assert_eq!(session.announcer().cues.len(), cues);
        assert_eq!(session.abort(), log);
    }
}

#[test]
fn invalid_configurations_never_start() {
    let bad = [
        config(0, 4.0, 70, 6),
        config(10, -1.0, 70, 6),
        config(10, f64::NAN, 70, 6),
        config(10, 1e20, 70, 6),
        config(10, 4.0, 101, 6),
        config(10, 4.0, 70, 0),
    ];
    for cfg in bad {
        let started =
            DrillSession::start(cfg, RecordingAnnouncer::default(), StdRng::seed_from_u64(0));
        assert_matches!(started.err(), Some(DrillError::InvalidConfiguration { .. }));
    }
}
