//! Speech Synthesis Markup Language envelope for the synthesis stage.

use crate::config::VoiceSettings;

/// Escape XML-reserved characters for a text node or attribute value
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap answer text in a `<speak>` document with a single `<voice>` child.
///
/// Output depends only on `text` and `voice`.
pub fn build_ssml(text: &str, voice: &VoiceSettings) -> String {
    format!(
        "<speak version=\"{version}\" xml:lang=\"{lang}\">\n    <voice xml:lang=\"{lang}\" name=\"{name}\">{text}</voice>\n</speak>",
        version = escape_xml(&voice.version),
        lang = escape_xml(&voice.language),
        name = escape_xml(&voice.name),
        text = escape_xml(text),
    )
}
