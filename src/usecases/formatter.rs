//! Response formatter. Turns an outcome map into one Telegram HTML message.
//!
//! Pure: no I/O, same input and limits always give the same output. Lengths are
//! counted in chars.

use crate::domain::{OutcomeMap, ServiceDescriptor, ServiceOutcome};

pub const DEFAULT_PER_SERVICE_CAP: usize = 800;
pub const DEFAULT_OVERALL_CAP: usize = 4000;
/// Room kept below the overall cap for the truncation marker.
pub const TRUNCATION_HEADROOM: usize = 50;

pub const SECTION_TRUNCATION_MARKER: &str = "... (truncated)";
pub const MESSAGE_TRUNCATION_MARKER: &str = "... (message truncated)";

const HEADER: &str = "🤖 <b>AI Services Responses</b>\n\n";
const FOOTER: &str = "✨ <i>Powered by Multi-AI Assistant</i>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatLimits {
    /// Max body chars per service before the section is cut.
    pub per_service_cap: usize,
    /// Max chars of the whole message before it is cut.
    pub overall_cap: usize,
    /// Length the whole message is cut to (marker appended after).
    pub safe_len: usize,
}

impl FormatLimits {
    /// Derive limits from the platform message cap (e.g. MAX_MESSAGE_LENGTH).
    pub fn for_max_length(max_message_length: usize) -> Self {
        Self {
            per_service_cap: DEFAULT_PER_SERVICE_CAP,
            overall_cap: max_message_length,
            safe_len: max_message_length.saturating_sub(TRUNCATION_HEADROOM),
        }
    }
}

impl Default for FormatLimits {
    fn default() -> Self {
        Self::for_max_length(DEFAULT_OVERALL_CAP)
    }
}

/// Renders sections in the order of `services`, regardless of completion order.
/// Outcomes for ids not in `services` are appended after, labelled by id.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    services: Vec<ServiceDescriptor>,
    limits: FormatLimits,
}

impl ResponseFormatter {
    pub fn new(services: Vec<ServiceDescriptor>, limits: FormatLimits) -> Self {
        Self { services, limits }
    }

    pub fn format(&self, outcomes: &OutcomeMap) -> String {
        let mut out = String::from(HEADER);

        for service in &self.services {
            if let Some(outcome) = outcomes.get(&service.id) {
                self.push_section(&mut out, &service.icon, &service.label, outcome);
            }
        }
        for (id, outcome) in outcomes {
            if !self.services.iter().any(|s| &s.id == id) {
                self.push_section(&mut out, "•", id, outcome);
            }
        }

        out.push_str(FOOTER);

        if out.chars().count() > self.limits.overall_cap {
            let mut cut = cut_html(&out, self.limits.safe_len);
            cut.push_str(MESSAGE_TRUNCATION_MARKER);
            return cut;
        }
        out
    }

    fn push_section(&self, out: &mut String, icon: &str, label: &str, outcome: &ServiceOutcome) {
        match outcome {
            ServiceOutcome::Success { text } => {
                let body = if text.chars().count() > self.limits.per_service_cap {
                    let mut body = take_chars(text, self.limits.per_service_cap);
                    body.push_str(SECTION_TRUNCATION_MARKER);
                    body
                } else {
                    text.clone()
                };
                out.push_str(&format!(
                    "{} <b>{}:</b>\n{}\n\n",
                    icon,
                    escape_html(label),
                    escape_html(&body)
                ));
            }
            ServiceOutcome::Failure { reason } => {
                out.push_str(&format!(
                    "{} <b>{}:</b> ❌ Error - {}\n\n",
                    icon,
                    escape_html(label),
                    escape_html(reason)
                ));
            }
        }
    }
}

/// Strip the markup `format` adds and decode entities, for plain-text delivery.
pub fn to_plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Escape the three characters Telegram's HTML parser treats specially.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Cut `html` to at most `max` chars so Telegram still parses it: no half tag,
/// no half entity, no heading left open. Only the markup `format` emits is expected.
fn cut_html(html: &str, max: usize) -> String {
    let mut cut = take_chars(html, max);
    if let Some(lt) = cut.rfind('<') {
        if !cut[lt..].contains('>') {
            cut.truncate(lt);
        }
    }
    if let Some(amp) = cut.rfind('&') {
        if !cut[amp..].contains(';') {
            cut.truncate(amp);
        }
    }
    for (open, close) in [("<b>", "</b>"), ("<i>", "</i>")] {
        if let Some(at) = cut.rfind(open) {
            if !cut[at..].contains(close) {
                cut.truncate(at);
            }
        }
    }
    cut
}
