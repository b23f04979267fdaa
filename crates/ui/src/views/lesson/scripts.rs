use dioxus::document::eval;

pub(super) const VIDEO_ID: &str = "lesson-video";

/// Forwards media events of the lesson `<video>` to the player. Runs until
/// the element is gone.
pub(super) fn video_bridge_script(video_id: &str, resume_at: f64) -> String {
    format!(
        r#"(async function() {{
            const find = () => document.getElementById({video_id:?});
            let video = find();
            for (let tries = 0; !video && tries < 50; tries++) {{
                await new Promise((resolve) => setTimeout(resolve, 20));
                video = find();
            }}
            if (!video) return;
            const resumeAt = {resume_at};
            const send = (frame) => dioxus.send(frame);
            const onLoaded = () => {{
                const duration = Number.isFinite(video.duration) ? video.duration : 0;
                send({{ kind: "loaded", duration }});
                if (resumeAt > 0 && resumeAt < duration) video.currentTime = resumeAt;
            }};
            if (video.readyState >= 1) onLoaded();
            else video.addEventListener("loadedmetadata", onLoaded, {{ once: true }});
            video.addEventListener("play", () => send({{ kind: "play" }}));
            video.addEventListener("pause", () => {{
                if (!video.ended) send({{ kind: "pause" }});
            }});
            video.addEventListener("timeupdate", () =>
                send({{ kind: "time", current_time: video.currentTime }}));
            video.addEventListener("ended", () => send({{ kind: "ended" }}));
            video.addEventListener("error", () => {{
                const code = video.error ? video.error.code : 0;
                send({{ kind: "error", message: "The video could not be played (code " + code + ")." }});
            }});
        }})();"#
    )
}

fn command_script(video_id: &str, body: &str) -> String {
    format!(
        r"(function() {{
            const video = document.getElementById({video_id:?});
            if (!video) return;
            {body}
        }})();"
    )
}

pub(super) async fn play(video_id: &str) {
    let _ = eval(&command_script(video_id, "video.play().catch(() => {});")).await;
}

pub(super) async fn pause(video_id: &str) {
    let _ = eval(&command_script(video_id, "video.pause();")).await;
}

pub(super) async fn apply_audio(video_id: &str, volume: f32, muted: bool) {
    let body = format!("video.volume = {volume}; video.muted = {muted};");
    let _ = eval(&command_script(video_id, &body)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_script_embeds_resume_position() {
        let script = video_bridge_script(VIDEO_ID, 42.5);
        assert!(script.contains(r#"document.getElementById("lesson-video")"#));
        assert!(script.contains("const resumeAt = 42.5;"));
    }

    #[test]
    fn command_script_wraps_body() {
        let script = command_script(VIDEO_ID, "video.pause();");
        assert!(script.contains("if (!video) return;"));
        assert!(script.contains("video.pause();"));
    }
}
