/// Copy `text` to the clipboard, falling back to a hidden textarea when the
/// async clipboard API is unavailable.
pub(super) fn copy_to_clipboard_script(text: &str) -> String {
    format!(
        r#"(function() {{
            const text = {text:?};
            const fallback = () => {{
                const area = document.createElement("textarea");
                area.value = text;
                document.body.appendChild(area);
                area.focus();
                area.select();
                try {{ document.execCommand("copy"); }} finally {{ document.body.removeChild(area); }}
            }};
            if (navigator.clipboard && navigator.clipboard.writeText) {{
                navigator.clipboard.writeText(text).catch(fallback);
            }} else {{
                fallback();
            }}
        }})();"#
    )
}

/// Keep the newest message in view.
pub(super) fn scroll_to_bottom_script(element_id: &str) -> String {
    format!(
        r"(function() {{
            const el = document.getElementById({element_id:?});
            if (el) el.scrollTop = el.scrollHeight;
        }})();"
    )
}
