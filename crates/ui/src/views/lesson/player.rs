use dioxus::document::eval;
use dioxus::prelude::*;
use serde::Deserialize;
use skill_core::player::{LessonPlayer, PlaybackPhase, PlayerEvent, PlayerSignal};

use super::scripts::{self, VIDEO_ID, video_bridge_script};
use crate::vm::playback_label;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum MediaFrame {
    Loaded { duration: f64 },
    Play,
    Pause,
    Time { current_time: f64 },
    Ended,
    Error { message: String },
}

impl From<MediaFrame> for PlayerEvent {
    fn from(frame: MediaFrame) -> Self {
        match frame {
            MediaFrame::Loaded { duration } => Self::Loaded { duration },
            MediaFrame::Play => Self::Play,
            MediaFrame::Pause => Self::Pause,
            MediaFrame::Time { current_time } => Self::TimeUpdate { current_time },
            MediaFrame::Ended => Self::Ended,
            MediaFrame::Error { message } => Self::Failed(message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum WatchKind {
    Progress,
    Paused,
    Ended,
}

/// Playback report handed to the lesson page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct WatchTick {
    pub kind: WatchKind,
    pub position: f64,
    pub percent: f64,
}

/// Feed one media event through the state machine and translate the result
/// into a tick for the page. Rejected transitions are dropped.
fn apply_event(player: &mut LessonPlayer, event: PlayerEvent) -> Option<WatchTick> {
    let paused = matches!(event, PlayerEvent::Pause);
    let signal = match player.handle(event) {
        Ok(signal) => signal,
        Err(err) => {
            tracing::debug!(%err, "ignored media event");
            return None;
        }
    };
    let kind = match signal {
        Some(PlayerSignal::Completed) => WatchKind::Ended,
        Some(PlayerSignal::Progress(_)) => WatchKind::Progress,
        None if paused => WatchKind::Paused,
        None => return None,
    };
    Some(WatchTick {
        kind,
        position: player.current_time(),
        percent: player.percent(),
    })
}

#[component]
pub(super) fn PlayerPanel(
    video_url: Option<String>,
    resume_at: f64,
    on_watch: EventHandler<WatchTick>,
) -> Element {
    let mut player = use_signal(LessonPlayer::new);

    use_future(move || async move {
        let mut bridge = eval(&video_bridge_script(VIDEO_ID, resume_at));
        loop {
            match bridge.recv::<MediaFrame>().await {
                Ok(frame) => {
                    let tick = apply_event(&mut player.write(), frame.into());
                    if let Some(tick) = tick {
                        on_watch.call(tick);
                    }
                }
                Err(err) => {
                    tracing::debug!(?err, "video bridge stopped");
                    break;
                }
            }
        }
    });

    let Some(url) = video_url else {
        return rsx! {
            div { class: "player player--empty", p { "This lesson has no video yet." } }
        };
    };

    let snapshot = player.read().clone();
    let phase = snapshot.phase();
    let playing = phase == PlaybackPhase::Playing;
    let controls_ready = !matches!(phase, PlaybackPhase::Loading | PlaybackPhase::Error);
    let class = if snapshot.is_fullscreen() {
        "player player--fullscreen"
    } else {
        "player"
    };
    let volume_value = format!("{:.2}", snapshot.volume());
    let percent_value = format!("{:.0}", snapshot.percent());
    let time_label = playback_label(snapshot.current_time(), snapshot.duration());

    let toggle_play = move |_| {
        spawn(async move {
            if playing {
                scripts::pause(VIDEO_ID).await;
            } else {
                scripts::play(VIDEO_ID).await;
            }
        });
    };
    let toggle_mute = move |_| {
        let (volume, muted) = {
            let mut player = player.write();
            player.toggle_mute();
            (player.volume(), player.is_muted())
        };
        spawn(async move { scripts::apply_audio(VIDEO_ID, volume, muted).await });
    };
    let on_volume = move |evt: FormEvent| {
        let Ok(value) = evt.value().parse::<f32>() else {
            return;
        };
        let (volume, muted) = {
            let mut player = player.write();
            player.set_volume(value);
            (player.volume(), player.is_muted())
        };
        spawn(async move { scripts::apply_audio(VIDEO_ID, volume, muted).await });
    };

    rsx! {
        div { class: class,
            video {
                id: VIDEO_ID,
                src: "{url}",
                preload: "metadata",
            }
            if let Some(message) = snapshot.error() {
                div { class: "player-error", role: "alert", "{message}" }
            }
            div { class: "player-controls",
                button {
                    class: "btn btn-icon",
                    disabled: !controls_ready,
                    onclick: toggle_play,
                    if playing { "Pause" } else { "Play" }
                }
                span { class: "player-time", "{time_label}" }
                progress {
                    class: "player-progress",
                    max: "100",
                    value: "{percent_value}",
                }
                button {
                    class: "btn btn-icon",
                    onclick: toggle_mute,
                    if snapshot.is_muted() { "Unmute" } else { "Mute" }
                }
                input {
                    r#type: "range",
                    min: "0",
                    max: "1",
                    step: "0.05",
                    value: "{volume_value}",
                    oninput: on_volume,
                }
                button {
                    class: "btn btn-icon",
                    onclick: move |_| player.write().toggle_fullscreen(),
                    if snapshot.is_fullscreen() { "Exit full screen" } else { "Full screen" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(duration: f64) -> LessonPlayer {
        let mut player = LessonPlayer::new();
        player.handle(PlayerEvent::Loaded { duration }).unwrap();
        player.handle(PlayerEvent::Play).unwrap();
        player
    }

    #[test]
    fn frames_deserialize_from_bridge_payloads() {
        let frame: MediaFrame =
            serde_json::from_str(r#"{"kind":"time","current_time":12.5}"#).unwrap();
        assert_eq!(
            PlayerEvent::from(frame),
            PlayerEvent::TimeUpdate { current_time: 12.5 }
        );
        let frame: MediaFrame = serde_json::from_str(r#"{"kind":"loaded","duration":90}"#).unwrap();
        assert_eq!(PlayerEvent::from(frame), PlayerEvent::Loaded { duration: 90.0 });
    }

    #[test]
    fn time_updates_report_progress() {
        let mut player = loaded(200.0);
        let tick = apply_event(&mut player, PlayerEvent::TimeUpdate { current_time: 50.0 }).unwrap();
        assert_eq!(tick.kind, WatchKind::Progress);
        assert!((tick.percent - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pause_reports_position_and_ended_reports_once() {
        let mut player = loaded(100.0);
        apply_event(&mut player, PlayerEvent::TimeUpdate { current_time: 40.0 });
        let tick = apply_event(&mut player, PlayerEvent::Pause).unwrap();
        assert_eq!(tick.kind, WatchKind::Paused);
        assert!((tick.position - 40.0).abs() < f64::EPSILON);

        apply_event(&mut player, PlayerEvent::Play);
        let ended = apply_event(&mut player, PlayerEvent::Ended).unwrap();
        assert_eq!(ended.kind, WatchKind::Ended);
        assert!(apply_event(&mut player, PlayerEvent::Ended).is_none());
    }

    #[test]
    fn invalid_transitions_are_dropped() {
        let mut player = LessonPlayer::new();
        assert!(apply_event(&mut player, PlayerEvent::Play).is_none());
        assert_eq!(player.phase(), PlaybackPhase::Loading);
    }
}
