//! Playback state for a lesson video.
//!
//! The player only reports progress and the natural end of the clip. Whether
//! a given percentage is enough to complete a lesson is the caller's call,
//! made through a [`CompletionPolicy`].

use thiserror::Error;

/// Default watched percentage that makes a lesson completion-eligible.
pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 99.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Media metadata is available.
    Loaded { duration: f64 },
    Play,
    Pause,
    TimeUpdate { current_time: f64 },
    Ended,
    Failed(String),
}

/// Notifications for the lesson view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerSignal {
    Progress(f64),
    /// Natural end of the clip; emitted once per player.
    Completed,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlayerError {
    #[error("cannot handle {event} while {phase:?}")]
    InvalidTransition {
        phase: PlaybackPhase,
        event: &'static str,
    },
}

/// Percentage watched that counts towards completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionPolicy {
    threshold_percent: f64,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_COMPLETION_THRESHOLD,
        }
    }
}

impl CompletionPolicy {
    /// Values outside `(0, 100]` fall back to the default threshold.
    #[must_use]
    pub fn new(threshold_percent: f64) -> Self {
        if threshold_percent.is_finite() && threshold_percent > 0.0 && threshold_percent <= 100.0 {
            Self { threshold_percent }
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    #[must_use]
    pub fn is_eligible(&self, percent: f64) -> bool {
        percent >= self.threshold_percent
    }
}

/// Playback state machine plus the independent volume/mute/fullscreen toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonPlayer {
    phase: PlaybackPhase,
    duration: f64,
    current_time: f64,
    volume: f32,
    muted: bool,
    fullscreen: bool,
    completion_sent: bool,
    error: Option<String>,
}

impl Default for LessonPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl LessonPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: PlaybackPhase::Loading,
            duration: 0.0,
            current_time: 0.0,
            volume: 1.0,
            muted: false,
            fullscreen: false,
            completion_sent: false,
            error: None,
        }
    }

    /// Apply a media event.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::InvalidTransition` for events that make no sense
    /// in the current phase (e.g. `Play` before the media loaded).
    pub fn handle(&mut self, event: PlayerEvent) -> Result<Option<PlayerSignal>, PlayerError> {
        use PlaybackPhase as P;

        match event {
            PlayerEvent::Failed(reason) => {
                self.phase = P::Error;
                self.error = Some(reason);
                Ok(None)
            }
            _ if self.phase == P::Error => Err(self.invalid(&event)),
            PlayerEvent::Loaded { duration } => {
                if self.phase != P::Loading {
                    return Err(self.invalid(&event));
                }
                self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
                self.phase = P::Ready;
                Ok(None)
            }
            PlayerEvent::Play => match self.phase {
                P::Ready | P::Paused | P::Ended => {
                    if self.phase == P::Ended {
                        self.current_time = 0.0;
                    }
                    self.phase = P::Playing;
                    Ok(None)
                }
                P::Playing => Ok(None),
                P::Loading | P::Error => Err(self.invalid(&event)),
            },
            PlayerEvent::Pause => match self.phase {
                P::Playing => {
                    self.phase = P::Paused;
                    Ok(None)
                }
                P::Paused => Ok(None),
                _ => Err(self.invalid(&event)),
            },
            PlayerEvent::TimeUpdate { current_time } => {
                if current_time.is_finite() {
                    self.current_time = current_time.max(0.0);
                }
                Ok(Some(PlayerSignal::Progress(self.percent())))
            }
            PlayerEvent::Ended => match self.phase {
                P::Playing | P::Paused => {
                    self.phase = P::Ended;
                    self.current_time = self.duration;
                    if self.completion_sent {
                        return Ok(None);
                    }
                    self.completion_sent = true;
                    Ok(Some(PlayerSignal::Completed))
                }
                P::Ended => Ok(None),
                _ => Err(self.invalid(&event)),
            },
        }
    }

    fn invalid(&self, event: &PlayerEvent) -> PlayerError {
        let event = match event {
            PlayerEvent::Loaded { .. } => "loaded",
            PlayerEvent::Play => "play",
            PlayerEvent::Pause => "pause",
            PlayerEvent::TimeUpdate { .. } => "time update",
            PlayerEvent::Ended => "ended",
            PlayerEvent::Failed(_) => "failure",
        };
        PlayerError::InvalidTransition {
            phase: self.phase,
            event,
        }
    }

    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// `current_time / duration * 100`, clamped to `0..=100`; 0 while the
    /// duration is unknown.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Sets the volume in `0..=1`; a non-zero volume unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };
        self.volume = volume;
        if volume > 0.0 {
            self.muted = false;
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }
}
