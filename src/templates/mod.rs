use crate::model::Candidate;

/// Returns the `<li>` markup for one suggestion.
///
/// The label and coordinates are exposed as `data-*` attributes so a click
/// handler can copy them back into the form without another lookup.
pub fn location_entry(index: usize, candidate: &Candidate) -> String {
    let text = escape(&candidate.label);
    let coordinates = match candidate.coordinates() {
        Some((lat, lon)) => format!(r#" data-lat="{lat}" data-lon="{lon}""#),
        None => String::new(),
    };
    format!(
        r#"<li class="location" data-index="{index}" data-text="{text}"{coordinates}>{text}</li>
"#
    )
}

/// Returns the markup for a whole result list. Empty input yields an empty string.
pub fn result_list(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| location_entry(i, c))
        .collect()
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
