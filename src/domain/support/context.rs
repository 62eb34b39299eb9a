//! Keyword-scan extraction of patient context from chat history.
//!
//! This is a best-effort heuristic, not NLP: plain substring matching over
//! lowercased user messages, with a fixed window of surrounding text kept
//! around each hit. False positives are expected ("company" contains
//! "pan"); nothing here is authoritative and the extracted snippets are
//! only ever used as soft context for the completion provider.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::consultation::MessageRole;

/// Characters of context kept before a keyword hit.
const WINDOW_BEFORE: usize = 20;

/// Characters of context kept after the start of a keyword hit.
const WINDOW_AFTER: usize = 30;

/// Number of Indonesian keyword hits after which the patient is assumed to
/// prefer Indonesian.
const INDONESIAN_THRESHOLD: usize = 3;

static SYMPTOM_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "sakit", "nyeri", "pain", "hurt", "ache", "flu", "fever", "demam", "batuk", "cough",
        "pusing", "headache", "mual", "nausea",
    ]
});

static MEDICATION_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "obat", "medicine", "pill", "tablet", "syrup", "sirup", "antibiotics", "antibiotik",
        "paracetamol", "ibuprofen",
    ]
});

static DURATION_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "hari", "day", "week", "minggu", "bulan", "month", "hour", "jam", "sejak", "since",
    ]
});

static SEVERITY_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "parah", "severe", "mild", "ringan", "sedang", "moderate", "berat", "heavy",
    ]
});

static INDONESIAN_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "saya", "aku", "sakit", "obat", "demam", "batuk", "pusing", "mual", "hari", "minggu",
        "bulan", "jam", "sejak", "parah", "ringan", "sedang", "berat",
    ]
});

/// One turn of stateless chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Best-effort patient context extracted from chat history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientContext {
    pub symptoms: Vec<String>,
    pub medications: Vec<String>,
    pub durations: Vec<String>,
    pub severities: Vec<String>,
    pub prefers_indonesian: bool,
}

impl PatientContext {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
            && self.medications.is_empty()
            && self.durations.is_empty()
            && self.severities.is_empty()
            && !self.prefers_indonesian
    }

    /// Renders the context as a single summary line for the provider, or
    /// `None` when nothing was extracted.
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();

        if !self.symptoms.is_empty() {
            parts.push(format!("Reported symptoms: {}", self.symptoms.join("; ")));
        }
        if !self.medications.is_empty() {
            parts.push(format!("Mentioned medications: {}", self.medications.join("; ")));
        }
        if !self.durations.is_empty() {
            parts.push(format!("Duration information: {}", self.durations.join("; ")));
        }
        if !self.severities.is_empty() {
            parts.push(format!("Severity indicators: {}", self.severities.join("; ")));
        }
        if self.prefers_indonesian {
            parts.push("Language preference: Indonesian".to_string());
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(". "))
        }
    }
}

/// Scans user turns for keyword hits and collects windowed snippets.
pub fn analyze_history(history: &[ChatTurn]) -> PatientContext {
    let user_messages: Vec<String> = history
        .iter()
        .filter(|t| t.role == MessageRole::User)
        .map(|t| t.content.to_lowercase())
        .collect();

    let mut context = PatientContext::default();
    if user_messages.is_empty() {
        return context;
    }

    let mut indonesian_hits = 0;

    for message in &user_messages {
        collect_windows(message, &SYMPTOM_KEYWORDS, &mut context.symptoms);
        collect_windows(message, &MEDICATION_KEYWORDS, &mut context.medications);
        collect_windows(message, &DURATION_KEYWORDS, &mut context.durations);
        collect_windows(message, &SEVERITY_KEYWORDS, &mut context.severities);

        indonesian_hits += INDONESIAN_KEYWORDS
            .iter()
            .filter(|kw| message.contains(*kw))
            .count();
    }

    context.prefers_indonesian = indonesian_hits > INDONESIAN_THRESHOLD;
    context
}

/// For each keyword found in `message`, pushes the surrounding window of
/// text. Window bounds are clamped to char boundaries so multi-byte input
/// cannot split a code point.
fn collect_windows(message: &str, keywords: &[&str], out: &mut Vec<String>) {
    for keyword in keywords {
        if let Some(index) = message.find(keyword) {
            let mut start = index.saturating_sub(WINDOW_BEFORE);
            let mut end = (index + WINDOW_AFTER).min(message.len());
            while !message.is_char_boundary(start) {
                start -= 1;
            }
            while !message.is_char_boundary(end) {
                end += 1;
            }
            out.push(message[start..end].to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_extracts_nothing() {
        let context = analyze_history(&[]);
        assert!(context.is_empty());
        assert!(context.summary().is_none());
    }

    #[test]
    fn assistant_turns_are_ignored() {
        let history = vec![ChatTurn::assistant("You may have a fever or severe flu")];
        let context = analyze_history(&history);
        assert!(context.is_empty());
    }

    #[test]
    fn symptom_hit_keeps_surrounding_window() {
        let history = vec![ChatTurn::user(
            "I have had a pounding headache behind my eyes since Tuesday",
        )];
        let context = analyze_history(&history);

        assert_eq!(context.symptoms.len(), 1);
        assert!(context.symptoms[0].contains("headache"));
        // Window keeps nearby words, not the whole message.
        assert!(context.symptoms[0].len() <= WINDOW_BEFORE + WINDOW_AFTER);
    }

    #[test]
    fn categories_are_extracted_independently() {
        let history = vec![ChatTurn::user(
            "demam sejak tiga hari, sudah minum paracetamol tapi masih parah",
        )];
        let context = analyze_history(&history);

        assert!(!context.symptoms.is_empty());
        assert!(!context.medications.is_empty());
        assert!(!context.durations.is_empty());
        assert!(!context.severities.is_empty());
    }

    #[test]
    fn language_preference_needs_more_than_three_hits() {
        let history = vec![ChatTurn::user("saya sakit")];
        assert!(!analyze_history(&history).prefers_indonesian);

        let history = vec![ChatTurn::user("saya sakit demam, sudah minum obat sejak kemarin")];
        assert!(analyze_history(&history).prefers_indonesian);
    }

    #[test]
    fn summary_joins_categories_with_periods() {
        let history = vec![ChatTurn::user("severe fever since monday")];
        let summary = analyze_history(&history).summary().unwrap();

        assert!(summary.contains("Reported symptoms:"));
        assert!(summary.contains("Severity indicators:"));
    }

    #[test]
    fn multibyte_input_does_not_split_code_points() {
        // Keyword near multi-byte characters; must not panic.
        let history = vec![ChatTurn::user("kepala «pusing» — demam 39° sejak kemarin")];
        let context = analyze_history(&history);
        assert!(!context.symptoms.is_empty());
    }
}
