//! Routes phase-completion events to audio cue playback.
//!
//! The router owns the notification preferences (selected cue and volume),
//! keeps them mirrored in the settings store, and plays the right cue when
//! a phase boundary is crossed. Playback failures are logged and swallowed;
//! a broken audio device never stalls the countdown.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::TimerEvent;
use crate::settings::{
    keys, read_or_default, write_logged, SettingsStore, DEFAULT_AUDIO, DEFAULT_VOLUME,
};
use crate::sound::{resolve_cue, AudioPlayer, SoundCue};
use crate::types::TimerPhase;

/// Notification preferences: the selected cue, per-phase overrides, and
/// the playback volume.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Cue played when no per-phase override is set.
    pub cue: SoundCue,
    /// Override for the end of a work phase.
    pub work_cue: Option<SoundCue>,
    /// Override for the end of a short break.
    pub break_cue: Option<SoundCue>,
    /// Override for the end of a long break.
    pub long_break_cue: Option<SoundCue>,
    /// Playback volume in 0.0-1.0.
    pub volume: f32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cue: resolve_cue(DEFAULT_AUDIO),
            work_cue: None,
            break_cue: None,
            long_break_cue: None,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl AlertConfig {
    /// Returns the cue for the completion of `phase`.
    ///
    /// Falls back to the selected cue when no override is set. A completed
    /// long break without its own override uses the break override when
    /// one exists.
    #[must_use]
    pub fn cue_for(&self, phase: TimerPhase) -> &SoundCue {
        let override_cue = match phase {
            TimerPhase::Work => self.work_cue.as_ref(),
            TimerPhase::Break => self.break_cue.as_ref(),
            TimerPhase::LongBreak => self.long_break_cue.as_ref().or(self.break_cue.as_ref()),
            TimerPhase::Paused => None,
        };
        override_cue.unwrap_or(&self.cue)
    }
}

/// Plays the configured cue on every phase completion and mirrors the
/// notification preferences into the settings store.
pub struct AlertRouter {
    player: Arc<dyn AudioPlayer>,
    settings: Arc<dyn SettingsStore>,
    config: Mutex<AlertConfig>,
}

impl AlertRouter {
    /// Creates a router seeded from the persisted `audio` and `volume`
    /// settings, with defaults for anything absent or unparseable.
    pub fn new(player: Arc<dyn AudioPlayer>, settings: Arc<dyn SettingsStore>) -> Self {
        let volume: f32 = read_or_default(settings.as_ref(), keys::VOLUME, DEFAULT_VOLUME);
        let cue_id = match settings.get(keys::AUDIO) {
            Ok(Some(id)) if !id.trim().is_empty() => id,
            Ok(_) => DEFAULT_AUDIO.to_string(),
            Err(e) => {
                warn!("設定 '{}' の読み込みに失敗しました: {}", keys::AUDIO, e);
                DEFAULT_AUDIO.to_string()
            }
        };

        let config = AlertConfig {
            cue: resolve_cue(&cue_id),
            volume: volume.clamp(0.0, 1.0),
            ..AlertConfig::default()
        };

        Self {
            player,
            settings,
            config: Mutex::new(config),
        }
    }

    /// Handles a single timer event.
    ///
    /// `Tick` events are ignored; `PhaseCompleted` plays the cue for the
    /// phase that ended. Playback failures are logged, never propagated.
    pub fn handle(&self, event: &TimerEvent) {
        let TimerEvent::PhaseCompleted { previous } = event else {
            return;
        };

        let (cue, volume) = {
            let config = self.config.lock().unwrap();
            (config.cue_for(*previous).clone(), config.volume)
        };

        debug!("Phase {} completed, playing cue '{}'", previous, cue.name());
        if let Err(e) = self.player.play(&cue, volume) {
            warn!("通知音の再生に失敗しました: {}", e);
        }
    }

    /// Consumes timer events until the sender side is dropped. Should be
    /// spawned as a tokio task alongside the timer driver.
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<TimerEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(&event);
        }
        debug!("Alert router loop stopped");
    }

    /// Sets the playback volume, clamped to 0.0-1.0, and mirrors it to
    /// the settings store.
    pub fn set_volume(&self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.config.lock().unwrap().volume = volume;
        write_logged(self.settings.as_ref(), keys::VOLUME, &volume.to_string());
    }

    /// Returns the current playback volume.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.config.lock().unwrap().volume
    }

    /// Selects the cue used when no per-phase override is set and mirrors
    /// its identifier to the settings store.
    pub fn select_cue(&self, cue: SoundCue) {
        write_logged(self.settings.as_ref(), keys::AUDIO, &cue.settings_id());
        self.config.lock().unwrap().cue = cue;
    }

    /// Returns the currently selected cue.
    #[must_use]
    pub fn selected_cue(&self) -> SoundCue {
        self.config.lock().unwrap().cue.clone()
    }

    /// Sets or clears the cue override for the completion of `phase`.
    ///
    /// Overrides are session-local; only the selected cue is persisted.
    pub fn set_phase_cue(&self, phase: TimerPhase, cue: Option<SoundCue>) {
        let mut config = self.config.lock().unwrap();
        match phase {
            TimerPhase::Work => config.work_cue = cue,
            TimerPhase::Break => config.break_cue = cue,
            TimerPhase::LongBreak => config.long_break_cue = cue,
            TimerPhase::Paused => {}
        }
    }

    /// Previews the currently selected cue at the current volume.
    ///
    /// # Errors
    ///
    /// Returns the playback error, unlike the event path, so a settings
    /// surface can show the user why nothing was heard.
    pub fn preview(&self) -> Result<(), crate::sound::AudioError> {
        let (cue, volume) = {
            let config = self.config.lock().unwrap();
            (config.cue.clone(), config.volume)
        };
        self.player.play(&cue, volume)
    }
}

impl std::fmt::Debug for AlertRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertRouter")
            .field("config", &self.config.lock().unwrap())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;
    use crate::sound::MockAudioPlayer;
    use crate::types::{TimerConfig, TimerState};

    fn make_router() -> (Arc<MockAudioPlayer>, Arc<MemorySettingsStore>, AlertRouter) {
        let player = Arc::new(MockAudioPlayer::new());
        let store = Arc::new(MemorySettingsStore::new());
        let router = AlertRouter::new(player.clone(), store.clone());
        (player, store, router)
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = AlertConfig::default();
            assert_eq!(config.cue.name(), "default1");
            assert_eq!(config.volume, 1.0);
            assert!(config.work_cue.is_none());
        }

        #[test]
        fn test_cue_for_falls_back_to_selected() {
            let config = AlertConfig::default();
            assert_eq!(config.cue_for(TimerPhase::Work), &config.cue);
            assert_eq!(config.cue_for(TimerPhase::Break), &config.cue);
            assert_eq!(config.cue_for(TimerPhase::LongBreak), &config.cue);
        }

        #[test]
        fn test_cue_for_uses_override() {
            let work = SoundCue::builtin("default2");
            let config = AlertConfig {
                work_cue: Some(work.clone()),
                ..AlertConfig::default()
            };

            assert_eq!(config.cue_for(TimerPhase::Work), &work);
            assert_eq!(config.cue_for(TimerPhase::Break), &config.cue);
        }

        #[test]
        fn test_long_break_borrows_break_override() {
            let break_cue = SoundCue::builtin("default2");
            let config = AlertConfig {
                break_cue: Some(break_cue.clone()),
                ..AlertConfig::default()
            };

            assert_eq!(config.cue_for(TimerPhase::LongBreak), &break_cue);
        }
    }

    mod router_tests {
        use super::*;

        #[test]
        fn test_seeds_from_store() {
            let player = Arc::new(MockAudioPlayer::new());
            let store = Arc::new(MemorySettingsStore::new());
            store.set(keys::VOLUME, "0.4").unwrap();
            store.set(keys::AUDIO, "default2").unwrap();

            let router = AlertRouter::new(player, store);

            assert_eq!(router.volume(), 0.4);
            assert_eq!(router.selected_cue().name(), "default2");
        }

        #[test]
        fn test_seeds_defaults_from_empty_store() {
            let (_, _, router) = make_router();
            assert_eq!(router.volume(), 1.0);
            assert_eq!(router.selected_cue().name(), "default1");
        }

        #[test]
        fn test_phase_completed_plays_cue() {
            let (player, _, router) = make_router();

            router.handle(&TimerEvent::PhaseCompleted {
                previous: TimerPhase::Work,
            });

            let calls = player.get_play_calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].0.name(), "default1");
            assert_eq!(calls[0].1, 1.0);
        }

        #[test]
        fn test_tick_is_ignored() {
            let (player, _, router) = make_router();

            router.handle(&TimerEvent::Tick {
                snapshot: TimerState::new(TimerConfig::default()).snapshot(),
            });

            assert_eq!(player.play_count(), 0);
        }

        #[test]
        fn test_playback_failure_is_swallowed() {
            let (player, _, router) = make_router();
            player.set_should_fail(true);

            // Must not panic
            router.handle(&TimerEvent::PhaseCompleted {
                previous: TimerPhase::Break,
            });
        }

        #[test]
        fn test_set_volume_clamps_and_persists() {
            let (player, store, router) = make_router();

            router.set_volume(2.5);

            assert_eq!(router.volume(), 1.0);
            assert_eq!(store.get(keys::VOLUME).unwrap(), Some("1".to_string()));

            router.set_volume(0.3);
            router.handle(&TimerEvent::PhaseCompleted {
                previous: TimerPhase::Work,
            });
            assert_eq!(player.get_play_calls()[0].1, 0.3);
        }

        #[test]
        fn test_select_cue_persists_identifier() {
            let (player, store, router) = make_router();

            router.select_cue(SoundCue::builtin("default2"));

            assert_eq!(
                store.get(keys::AUDIO).unwrap(),
                Some("default2".to_string())
            );

            router.handle(&TimerEvent::PhaseCompleted {
                previous: TimerPhase::Work,
            });
            assert_eq!(player.get_play_calls()[0].0.name(), "default2");
        }

        #[test]
        fn test_select_file_cue_persists_path() {
            let (_, store, router) = make_router();

            router.select_cue(SoundCue::file("chime", "/tmp/chime.wav"));

            assert_eq!(
                store.get(keys::AUDIO).unwrap(),
                Some("/tmp/chime.wav".to_string())
            );
        }

        #[test]
        fn test_set_volume_failure_keeps_in_memory_value() {
            let (_, store, router) = make_router();
            store.set_should_fail(true);

            router.set_volume(0.6);
            assert_eq!(router.volume(), 0.6);
        }

        #[test]
        fn test_phase_override_routing() {
            let (player, _, router) = make_router();
            router.set_phase_cue(TimerPhase::Break, Some(SoundCue::builtin("default2")));

            router.handle(&TimerEvent::PhaseCompleted {
                previous: TimerPhase::Break,
            });
            router.handle(&TimerEvent::PhaseCompleted {
                previous: TimerPhase::Work,
            });

            let calls = player.get_play_calls();
            assert_eq!(calls[0].0.name(), "default2");
            assert_eq!(calls[1].0.name(), "default1");
        }

        #[test]
        fn test_preview_returns_playback_error() {
            let (player, _, router) = make_router();
            player.set_should_fail(true);

            assert!(router.preview().is_err());
        }

        #[tokio::test]
        async fn test_run_consumes_until_sender_dropped() {
            let (player, _, router) = make_router();
            let router = Arc::new(router);
            let (tx, rx) = mpsc::unbounded_channel();

            let task = tokio::spawn(router.clone().run(rx));

            tx.send(TimerEvent::PhaseCompleted {
                previous: TimerPhase::Work,
            })
            .unwrap();
            drop(tx);

            task.await.unwrap();
            assert_eq!(player.play_count(), 1);
        }
    }
}
