pub(super) const THUMBNAIL_INPUT_ID: &str = "class-thumbnail-input";

/// Reads the picked thumbnail with `FileReader` and posts
/// `{ name, type, bytes }` back on every change.
pub(super) fn thumbnail_bridge_script(input_id: &str) -> String {
    format!(
        r#"(async function() {{
            let input = document.getElementById({input_id:?});
            for (let tries = 0; !input && tries < 50; tries++) {{
                await new Promise((resolve) => setTimeout(resolve, 20));
                input = document.getElementById({input_id:?});
            }}
            if (!input) return;
            input.addEventListener("change", async () => {{
                const file = input.files && input.files[0];
                if (!file) return;
                const buffer = await file.arrayBuffer();
                dioxus.send({{
                    name: file.name,
                    type: file.type || "application/octet-stream",
                    bytes: Array.from(new Uint8Array(buffer)),
                }});
            }});
        }})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_targets_the_file_input() {
        let script = thumbnail_bridge_script(THUMBNAIL_INPUT_ID);
        assert!(script.contains(r#"document.getElementById("class-thumbnail-input")"#));
        assert!(script.contains("arrayBuffer"));
    }
}
