//! Integration tests for the timer engine wired to settings and alerts.
//!
//! These tests drive the engine deterministically (calling `tick()`
//! directly instead of spawning the driver) and verify the pieces working
//! together:
//! - Phase cadence across full work/break rounds, including long breaks
//! - Cycle counter persistence across an engine restart
//! - Pause and resume through the settings-backed engine
//! - Audio cue routing on phase completions

use std::sync::Arc;

use tokio::sync::mpsc;

use pomoflow::alert::AlertRouter;
use pomoflow::engine::{TimerEngine, TimerEvent};
use pomoflow::settings::{keys, MemorySettingsStore, SettingsStore};
use pomoflow::sound::MockAudioPlayer;
use pomoflow::types::TimerPhase;

// ============================================================================
// Test Helpers
// ============================================================================

/// Seeds a store with short phase durations (in seconds).
fn seed_store(work: u32, brk: u32, long_brk: u32, interval: u32) -> Arc<MemorySettingsStore> {
    let store = Arc::new(MemorySettingsStore::new());
    store.set(keys::WORK_DURATION, &work.to_string()).unwrap();
    store.set(keys::BREAK_DURATION, &brk.to_string()).unwrap();
    store
        .set(keys::LONG_BREAK_DURATION, &long_brk.to_string())
        .unwrap();
    store
        .set(keys::LONG_BREAK_INTERVAL, &interval.to_string())
        .unwrap();
    store
}

/// Creates an engine over the store plus its event receiver.
fn create_engine(
    store: Arc<MemorySettingsStore>,
) -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TimerEngine::new(store, tx), rx)
}

/// Collects the phases of every `PhaseCompleted` event queued so far.
fn drain_completions(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerPhase> {
    let mut completed = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let TimerEvent::PhaseCompleted { previous } = event {
            completed.push(previous);
        }
    }
    completed
}

// ============================================================================
// Phase cadence
// ============================================================================

/// 前提条件: 作業3秒・休憩2秒・長い休憩5秒・間隔2で設定済み
/// テスト手順: 2回の作業サイクルを完走させる
/// 期待結果: 1回目の作業後は短い休憩、2回目の作業後は長い休憩に入り、
/// サイクルカウンタは1に戻る
#[test]
fn test_two_rounds_reach_long_break() {
    let store = seed_store(3, 2, 5, 2);
    let (mut engine, mut rx) = create_engine(store);
    engine.start();

    // First work phase: 3 ticks
    for _ in 0..3 {
        engine.tick();
    }
    assert_eq!(engine.snapshot().phase, TimerPhase::Break);
    assert_eq!(engine.snapshot().seconds_remaining, 2);
    assert_eq!(engine.snapshot().completed_cycles, 1);

    // Break: 2 ticks, back to work
    for _ in 0..2 {
        engine.tick();
    }
    assert_eq!(engine.snapshot().phase, TimerPhase::Work);

    // Second work phase reaches the interval: long break
    for _ in 0..3 {
        engine.tick();
    }
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, TimerPhase::LongBreak);
    assert_eq!(snapshot.seconds_remaining, 5);
    assert_eq!(snapshot.completed_cycles, 1);

    let completions = drain_completions(&mut rx);
    assert_eq!(
        completions,
        vec![TimerPhase::Work, TimerPhase::Break, TimerPhase::Work]
    );
}

/// 長い休憩が終わると作業フェーズへ戻る
#[test]
fn test_long_break_returns_to_work() {
    let store = seed_store(2, 2, 3, 1);
    let (mut engine, _rx) = create_engine(store);
    engine.start();

    // Interval 1: the first completed work phase goes straight to LongBreak
    engine.tick();
    engine.tick();
    assert_eq!(engine.snapshot().phase, TimerPhase::LongBreak);

    for _ in 0..3 {
        engine.tick();
    }
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, TimerPhase::Work);
    assert_eq!(snapshot.seconds_remaining, 2);
}

// ============================================================================
// Persistence across restarts
// ============================================================================

/// 前提条件: エンジンが作業サイクルを1回完了して破棄された
/// テスト手順: 同じストアから新しいエンジンを作成する
/// 期待結果: サイクルカウンタと設定値が引き継がれる
#[test]
fn test_restart_resumes_cycle_count() {
    let store = seed_store(2, 2, 5, 4);

    {
        let (mut engine, _rx) = create_engine(store.clone());
        engine.start();
        engine.tick();
        engine.tick();
        assert_eq!(engine.snapshot().completed_cycles, 1);
    }

    // A fresh engine over the same store picks up where the last left off
    let (engine, _rx) = create_engine(store.clone());
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.completed_cycles, 1);
    assert_eq!(snapshot.config.work_secs, 2);
    assert!(!snapshot.running);
    assert_eq!(snapshot.phase, TimerPhase::Work);
    assert_eq!(
        store.get(keys::COMPLETED_CYCLES).unwrap(),
        Some("1".to_string())
    );
}

/// 設定変更はストアへ即座に反映され、再起動後も有効
#[test]
fn test_duration_changes_survive_restart() {
    let store = Arc::new(MemorySettingsStore::new());

    {
        let (mut engine, _rx) = create_engine(store.clone());
        engine.set_work_duration(10).unwrap();
        engine.set_break_duration(2).unwrap();
        engine.set_long_break_interval(3).unwrap();
    }

    let (engine, _rx) = create_engine(store);
    let config = engine.snapshot().config;
    assert_eq!(config.work_secs, 600);
    assert_eq!(config.break_secs, 120);
    assert_eq!(config.long_break_interval, 3);
}

/// ストアが壊れていても既定値で起動する
#[test]
fn test_corrupt_store_falls_back_to_defaults() {
    let store = Arc::new(MemorySettingsStore::new());
    store.set(keys::WORK_DURATION, "garbage").unwrap();
    store.set(keys::COMPLETED_CYCLES, "-1").unwrap();

    let (engine, _rx) = create_engine(store);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.config.work_secs, 1500);
    assert_eq!(snapshot.completed_cycles, 0);
}

// ============================================================================
// Pause and resume
// ============================================================================

/// 前提条件: 休憩フェーズの途中で停止した
/// テスト手順: 停止・再開してから経過を進める
/// 期待結果: 残り秒数もフェーズも失われない
#[test]
fn test_pause_mid_break_then_resume() {
    let store = seed_store(2, 5, 9, 4);
    let (mut engine, _rx) = create_engine(store);
    engine.start();

    engine.tick();
    engine.tick();
    assert_eq!(engine.snapshot().phase, TimerPhase::Break);

    engine.tick();
    engine.stop();
    let paused = engine.snapshot();
    assert_eq!(paused.phase, TimerPhase::Paused);
    assert_eq!(paused.seconds_remaining, 4);

    // Ticks while paused are ignored
    engine.tick();
    assert_eq!(engine.snapshot().seconds_remaining, 4);

    engine.start();
    assert_eq!(engine.snapshot().phase, TimerPhase::Break);
    engine.tick();
    assert_eq!(engine.snapshot().seconds_remaining, 3);
}

// ============================================================================
// Alert routing
// ============================================================================

/// 前提条件: 音量0.5と選択音がストアに保存済み
/// テスト手順: エンジンのイベントをルーターに流し込み、作業を完了させる
/// 期待結果: フェーズ完了ごとに保存済み音量で通知音が1回鳴る
#[test]
fn test_phase_completions_play_cues() {
    let store = seed_store(2, 1, 3, 4);
    store.set(keys::VOLUME, "0.5").unwrap();
    store.set(keys::AUDIO, "default2").unwrap();

    let player = Arc::new(MockAudioPlayer::new());
    let router = AlertRouter::new(player.clone(), store.clone());
    let (mut engine, mut rx) = create_engine(store);
    engine.start();

    // Work completes, then break completes
    for _ in 0..3 {
        engine.tick();
    }

    while let Ok(event) = rx.try_recv() {
        router.handle(&event);
    }

    let calls = player.get_play_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0.name(), "default2");
    assert_eq!(calls[0].1, 0.5);
    assert_eq!(calls[1].1, 0.5);
}

/// 通知音の再生失敗があってもカウントダウンは継続する
#[test]
fn test_playback_failure_does_not_stop_timer() {
    let store = seed_store(2, 2, 3, 4);
    let player = Arc::new(MockAudioPlayer::new());
    player.set_should_fail(true);

    let router = AlertRouter::new(player, store.clone());
    let (mut engine, mut rx) = create_engine(store);
    engine.start();

    for _ in 0..3 {
        engine.tick();
        while let Ok(event) = rx.try_recv() {
            router.handle(&event);
        }
    }

    // Work completed despite the failing player and the break is ticking
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, TimerPhase::Break);
    assert_eq!(snapshot.seconds_remaining, 1);
}
