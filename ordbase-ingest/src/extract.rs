//! Label and form extraction
//!
//! Pure functions that read raw source-entry fragments and pull out
//! flat signals: subject-domain labels, register/usage labels,
//! grammatical notes, synonym/antonym/see-also references embedded in
//! definition labels, inflectional endings and audio word tags. No I/O
//! here; unknown labels are collected for a single warn diagnostic per
//! entry instead of failing ingestion.

use crate::types::AudioRef;

/// Subject-domain labels recognized in DDO definition label maps
const SUBJECT_LABELS: &[&str] = &[
    "ANATOMI",
    "ASTROLOGI",
    "ASTRONOMI",
    "BIOLOGI",
    "BOTANIK",
    "FILOSOFI",
    "FYSIK",
    "GASTRONOMI",
    "GEOLOGI",
    "GRAMMATIK",
    "HISTORIE",
    "JURA",
    "KEMI",
    "LITTERATUR",
    "MATEMATIK",
    "MEDICIN",
    "MILITÆR",
    "MUSIK",
    "MYTOLOGI",
    "PSYKOLOGI",
    "RELIGION",
    "SPORT",
    "SPROGVIDENSKAB",
    "SØFART",
    "TEKNIK",
    "ZOOLOGI",
    "ØKONOMI",
];

/// Register/usage labels recognized in DDO definition label maps
const USAGE_LABELS: &[&str] = &[
    "slang",
    "uformelt",
    "formelt",
    "gammeldags",
    "forældet",
    "nedsættende",
    "spøgende",
    "sjældent",
    "dialekt",
    "talesprog",
    "skriftsprog",
    "litterært",
    "fagsprog",
    "overført",
];

/// Label keys whose values reference other words
const SYNONYM_KEYS: &[&str] = &["synonym", "synonymer"];
const ANTONYM_KEYS: &[&str] = &["antonym", "antonymer", "modsat"];
const SEE_ALSO_KEYS: &[&str] = &["se også", "se ogsaa", "jf.", "jf"];
const GRAMMAR_KEYS: &[&str] = &["grammatik", "grammatisk"];

/// Flat signals extracted from one definition's label map
#[derive(Debug, Clone, Default)]
pub struct DefinitionSignals {
    pub subject_labels: Vec<String>,
    pub usage_labels: Vec<String>,
    pub grammar_note: Option<String>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub see_also: Vec<String>,
    /// Labels not in any recognized table, surfaced as a diagnostic
    pub unknown: Vec<String>,
}

/// Classify one definition's (key, value) label pairs
///
/// Subject labels arrive uppercase with an empty value; usage labels
/// lowercase with an empty value; reference labels ("Synonym",
/// "Se også") carry comma-separated word lists in the value.
pub fn classify_labels(pairs: &[(String, String)]) -> DefinitionSignals {
    let mut signals = DefinitionSignals::default();

    for (key, value) in pairs {
        let key_trimmed = key.trim();
        let key_lower = key_trimmed.to_lowercase();

        if SUBJECT_LABELS.contains(&key_trimmed) {
            signals.subject_labels.push(key_trimmed.to_string());
        } else if USAGE_LABELS.contains(&key_lower.as_str()) {
            signals.usage_labels.push(key_lower.clone());
        } else if GRAMMAR_KEYS.contains(&key_lower.as_str()) {
            if !value.trim().is_empty() {
                signals.grammar_note = Some(value.trim().to_string());
            }
        } else if SYNONYM_KEYS.contains(&key_lower.as_str()) {
            signals.synonyms.extend(split_word_list(value));
        } else if ANTONYM_KEYS.contains(&key_lower.as_str()) {
            signals.antonyms.extend(split_word_list(value));
        } else if SEE_ALSO_KEYS.contains(&key_lower.as_str()) {
            signals.see_also.extend(split_word_list(value));
        } else {
            signals.unknown.push(key_trimmed.to_string());
        }
    }

    signals
}

/// Split a comma/semicolon separated reference list into words
fn split_word_list(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Normalize a raw inflectional ending list
///
/// Trims whitespace and drops empty entries. A literal "-" is kept: it
/// means "identical to the headword".
pub fn inflection_endings(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_string())
        .collect()
}

/// Normalize raw (url, word tag) audio pairs into `AudioRef`s,
/// dropping entries without a URL
pub fn audio_refs(raw: &[(String, Option<String>)]) -> Vec<AudioRef> {
    raw.iter()
        .filter(|(url, _)| !url.trim().is_empty())
        .map(|(url, tag)| AudioRef {
            url: url.trim().to_string(),
            word_tag: tag.as_ref().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        })
        .collect()
}

/// Log one warn diagnostic per entry listing all unrecognized labels.
/// These widen the recognized-label tables iteratively; they never
/// block ingestion.
pub fn report_unknown_labels(word: &str, unknown: &[String]) {
    if !unknown.is_empty() {
        tracing::warn!(
            word = %word,
            labels = %unknown.join(", "),
            "Unrecognized definition labels (not classified)"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classify_subject_and_usage_labels() {
        let signals = classify_labels(&pairs(&[
            ("MEDICIN", ""),
            ("slang", ""),
            ("gammeldags", ""),
        ]));
        assert_eq!(signals.subject_labels, vec!["MEDICIN"]);
        assert_eq!(signals.usage_labels, vec!["slang", "gammeldags"]);
        assert!(signals.unknown.is_empty());
    }

    #[test]
    fn test_classify_reference_labels() {
        let signals = classify_labels(&pairs(&[
            ("Synonym", "bolig, hjem"),
            ("Se også", "hytte"),
            ("Antonym", "udestue"),
        ]));
        assert_eq!(signals.synonyms, vec!["bolig", "hjem"]);
        assert_eq!(signals.see_also, vec!["hytte"]);
        assert_eq!(signals.antonyms, vec!["udestue"]);
    }

    #[test]
    fn test_classify_grammar_note() {
        let signals = classify_labels(&pairs(&[("grammatik", "som adjektiv")]));
        assert_eq!(signals.grammar_note.as_deref(), Some("som adjektiv"));
    }

    #[test]
    fn test_unknown_labels_collected_not_dropped() {
        let signals = classify_labels(&pairs(&[("NYOMRÅDE", ""), ("MEDICIN", "")]));
        assert_eq!(signals.unknown, vec!["NYOMRÅDE"]);
        assert_eq!(signals.subject_labels, vec!["MEDICIN"]);
    }

    #[test]
    fn test_inflection_endings_keep_bare_dash() {
        let raw = vec![
            "-et".to_string(),
            "  ".to_string(),
            "-".to_string(),
            "".to_string(),
            "huse".to_string(),
        ];
        assert_eq!(inflection_endings(&raw), vec!["-et", "-", "huse"]);
    }

    #[test]
    fn test_audio_refs_drop_empty_urls() {
        let raw = vec![
            ("https://a/hus.mp3".to_string(), Some("hus".to_string())),
            ("".to_string(), Some("x".to_string())),
            ("https://a/hus2.mp3".to_string(), Some("  ".to_string())),
        ];
        let refs = audio_refs(&raw);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].word_tag.as_deref(), Some("hus"));
        assert_eq!(refs[1].word_tag, None);
    }
}
