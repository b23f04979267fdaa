use async_trait::async_trait;
use dioxus::document::eval;
use dioxus::prelude::spawn;
use serde::Deserialize;
use services::{PopupError, PopupEvent, PopupHandle, PopupLauncher, PopupMessage};
use tokio::sync::{mpsc, oneshot};
use url::Url;

/// Frames posted by [`popup_bridge_script`].
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum BridgeFrame {
    Opened,
    Blocked,
    Message {
        origin: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        error: Option<String>,
    },
    Closed,
}

/// Opens the provider page with `window.open` inside the webview and
/// forwards `postMessage` payloads back to Rust.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebviewPopupLauncher;

#[async_trait(?Send)]
impl PopupLauncher for WebviewPopupLauncher {
    async fn open(&self, url: &Url) -> Result<PopupHandle, PopupError> {
        let mut bridge = eval(&popup_bridge_script(url.as_str()));
        match bridge.recv::<BridgeFrame>().await {
            Ok(BridgeFrame::Opened) => {}
            Ok(BridgeFrame::Blocked) => return Err(PopupError::Blocked),
            Ok(other) => {
                return Err(PopupError::Failed(format!("unexpected frame {other:?}")));
            }
            Err(err) => return Err(PopupError::Failed(err.to_string())),
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (close_tx, mut close_rx) = oneshot::channel::<()>();
        spawn(async move {
            loop {
                tokio::select! {
                    frame = bridge.recv::<BridgeFrame>() => match frame {
                        Ok(BridgeFrame::Message { origin, token, error }) => {
                            let message = PopupMessage { origin, token, error };
                            if events_tx.send(PopupEvent::Message(message)).is_err() {
                                break;
                            }
                        }
                        Ok(BridgeFrame::Closed) | Err(_) => {
                            let _ = events_tx.send(PopupEvent::Closed);
                            break;
                        }
                        Ok(BridgeFrame::Opened | BridgeFrame::Blocked) => {}
                    },
                    _ = &mut close_rx => break,
                }
            }
            if let Err(err) = bridge.send("close") {
                tracing::debug!(?err, "popup bridge already gone");
            }
        });

        Ok(PopupHandle::new(events_rx).with_closer(move || {
            let _ = close_tx.send(());
        }))
    }
}

fn popup_bridge_script(url: &str) -> String {
    format!(
        r#"(async function() {{
            const width = 520;
            const height = 640;
            const left = Math.max(0, (window.screen.width - width) / 2);
            const top = Math.max(0, (window.screen.height - height) / 2);
            const popup = window.open(
                {url:?},
                "skills-oauth",
                `width=${{width}},height=${{height}},left=${{left}},top=${{top}}`
            );
            if (!popup) {{
                dioxus.send({{ kind: "blocked" }});
                return;
            }}
            dioxus.send({{ kind: "opened" }});
            const onMessage = (event) => {{
                const data = event.data || {{}};
                if (typeof data !== "object") return;
                dioxus.send({{
                    kind: "message",
                    origin: event.origin,
                    token: data.token ?? null,
                    error: data.error ?? null,
                }});
            }};
            window.addEventListener("message", onMessage);
            const poll = setInterval(() => {{
                if (popup.closed) {{
                    clearInterval(poll);
                    dioxus.send({{ kind: "closed" }});
                }}
            }}, 500);
            await dioxus.recv();
            clearInterval(poll);
            window.removeEventListener("message", onMessage);
            if (!popup.closed) popup.close();
        }})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_frames_parse_from_script_payloads() {
        let frame: BridgeFrame = serde_json::from_str(
            r#"{"kind":"message","origin":"http://localhost:8080","token":"abc","error":null}"#,
        )
        .unwrap();
        let BridgeFrame::Message { origin, token, error } = frame else {
            panic!("expected a message frame");
        };
        assert_eq!(origin, "http://localhost:8080");
        assert_eq!(token.as_deref(), Some("abc"));
        assert!(error.is_none());

        let closed: BridgeFrame = serde_json::from_str(r#"{"kind":"closed"}"#).unwrap();
        assert!(matches!(closed, BridgeFrame::Closed));
    }

    #[test]
    fn script_embeds_escaped_url() {
        let script = popup_bridge_script("http://localhost:8080/oauth2/authorization/google");
        assert!(script.contains(r#""http://localhost:8080/oauth2/authorization/google""#));
        assert!(script.contains("window.open("));
    }
}
