//! DDO-style entry adapter
//!
//! Maps a Danish dictionary entry (headword, pos/gender word list,
//! inflectional endings, labeled definitions with examples, fixed
//! expressions, stems, compositions and variant spellings) onto the
//! canonical `ProcessedWordData`. The heavy lifting — ending
//! transformation and sub-word assembly — happens in `transform` and
//! `graph`; this adapter only reshapes the raw payload.

use crate::extract::{
    audio_refs, classify_labels, inflection_endings, report_unknown_labels, DefinitionSignals,
};
use crate::graph::{build_graph, ExpressionInput, GraphInput};
use crate::types::{MainWordData, ProcessedWordData, RawDefinition, RawExample};
use ordbase_common::{Gender, Language, PartOfSpeech};
use serde::Deserialize;

pub const SOURCE_NAME: &str = "ddo";

/// One label on a definition: key plus optional word-list value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DdoLabel {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// An example sentence under a definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DdoExample {
    pub text: String,
    #[serde(default)]
    pub grammar_note: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// One definition with its label map and examples
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DdoDefinition {
    pub text: String,
    #[serde(default)]
    pub labels: Vec<DdoLabel>,
    #[serde(default)]
    pub is_short: bool,
    #[serde(default)]
    pub examples: Vec<DdoExample>,
}

/// A contextual inflected form ("i flertal" -> "børn")
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DdoContextualForm {
    pub context: String,
    pub form: String,
}

/// A fixed expression nested under the entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DdoExpression {
    pub text: String,
    #[serde(default)]
    pub definitions: Vec<DdoDefinition>,
    #[serde(default)]
    pub variant_forms: Vec<String>,
}

/// One pronunciation audio reference
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DdoAudio {
    pub url: String,
    /// The word or marker the recording belongs to ("hus", "i sms.")
    #[serde(default)]
    pub word: Option<String>,
}

/// Raw DDO-style entry as received on the ingest endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DdoEntry {
    pub headword: String,
    /// Word-class phrase, e.g. ["substantiv", "intetkøn"]
    #[serde(default)]
    pub part_of_speech: Vec<String>,
    /// Homograph variant label ("1", "2")
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub etymology: Option<String>,
    /// Opaque source entity id
    #[serde(default)]
    pub entry_id: Option<String>,
    /// Positional inflectional endings ("-et", "-e", "-ene")
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default)]
    pub contextual_forms: Vec<DdoContextualForm>,
    #[serde(default)]
    pub audio: Vec<DdoAudio>,
    #[serde(default)]
    pub definitions: Vec<DdoDefinition>,
    #[serde(default)]
    pub expressions: Vec<DdoExpression>,
    /// Stem references, optionally pos-prefixed ("sb. hus")
    #[serde(default)]
    pub stems: Vec<String>,
    /// Composition patterns, possibly with "(s)" interpolation
    #[serde(default)]
    pub compositions: Vec<String>,
    /// Alternative spellings of the headword
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

/// Decompose one DDO entry
pub fn process(entry: &DdoEntry) -> ProcessedWordData {
    let headword = entry.headword.trim().to_string();
    let (part_of_speech, gender) = parse_word_class(&entry.part_of_speech);

    let mut synonyms = entry.synonyms.clone();
    let mut antonyms = entry.antonyms.clone();
    let mut see_also = Vec::new();
    let mut unknown_labels = Vec::new();

    let definitions = entry
        .definitions
        .iter()
        .map(|def| {
            let signals = classify_definition(def, &mut unknown_labels);
            synonyms.extend(signals.synonyms.clone());
            antonyms.extend(signals.antonyms.clone());
            see_also.extend(signals.see_also.clone());
            to_raw_definition(def, signals)
        })
        .collect();

    let expressions = entry
        .expressions
        .iter()
        .map(|expr| ExpressionInput {
            text: expr.text.trim().to_string(),
            definitions: expr
                .definitions
                .iter()
                .map(|def| {
                    let signals = classify_definition(def, &mut unknown_labels);
                    to_raw_definition(def, signals)
                })
                .collect(),
            variant_forms: expr.variant_forms.clone(),
        })
        .collect();

    report_unknown_labels(&headword, &unknown_labels);

    let graph_input = GraphInput {
        headword: headword.clone(),
        language: Language::Danish,
        part_of_speech,
        gender,
        endings: inflection_endings(&entry.forms),
        contextual_forms: entry
            .contextual_forms
            .iter()
            .map(|cf| (cf.context.clone(), cf.form.clone()))
            .collect(),
        stems: entry.stems.clone(),
        synonyms,
        antonyms,
        see_also,
        compositions: entry.compositions.clone(),
        variants: entry.variants.clone(),
        expressions,
    };
    let sub_words = build_graph(&graph_input);

    let raw_audio: Vec<(String, Option<String>)> = entry
        .audio
        .iter()
        .map(|a| (a.url.clone(), a.word.clone()))
        .collect();

    let word = MainWordData {
        word: headword,
        language: Language::Danish,
        part_of_speech,
        variant: entry.variant.clone().unwrap_or_default(),
        gender,
        phonetic: non_empty(entry.phonetic.as_deref()),
        etymology: non_empty(entry.etymology.as_deref()),
        forms: forms_summary(&entry.forms),
        source_id: non_empty(entry.entry_id.as_deref()),
        source: SOURCE_NAME.to_string(),
        audio: audio_refs(&raw_audio),
        first_audio_is_primary: true,
    };

    ProcessedWordData {
        word,
        definitions,
        sub_words,
    }
}

/// Split the word-class phrase into a pos and optional gender marker
fn parse_word_class(words: &[String]) -> (PartOfSpeech, Option<Gender>) {
    let mut pos = None;
    let mut gender = None;
    for word in words {
        let word = word.trim().trim_end_matches(',');
        if pos.is_none() {
            pos = PartOfSpeech::from_str_loose(word);
        }
        if gender.is_none() {
            gender = Gender::from_marker(word);
        }
    }
    (pos.unwrap_or(PartOfSpeech::Unknown), gender)
}

fn classify_definition(def: &DdoDefinition, unknown: &mut Vec<String>) -> DefinitionSignals {
    let pairs: Vec<(String, String)> = def
        .labels
        .iter()
        .map(|l| (l.key.clone(), l.value.clone()))
        .collect();
    let signals = classify_labels(&pairs);
    unknown.extend(signals.unknown.clone());
    signals
}

fn to_raw_definition(def: &DdoDefinition, signals: DefinitionSignals) -> RawDefinition {
    RawDefinition {
        text: def.text.trim().to_string(),
        subject_labels: signals.subject_labels,
        usage_labels: signals.usage_labels,
        grammar_note: signals.grammar_note,
        is_short: def.is_short,
        examples: def
            .examples
            .iter()
            .map(|ex| RawExample {
                text: ex.text.trim().to_string(),
                grammar_note: non_empty(ex.grammar_note.as_deref()),
                source_text: non_empty(ex.source.as_deref()),
            })
            .collect(),
    }
}

/// Human-readable forms summary stored on the WordDetails row
fn forms_summary(forms: &[String]) -> Option<String> {
    let joined = forms
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordbase_common::RelationType;

    fn entry(headword: &str) -> DdoEntry {
        DdoEntry {
            headword: headword.to_string(),
            part_of_speech: vec!["substantiv".into(), "intetkøn".into()],
            variant: None,
            phonetic: None,
            etymology: None,
            entry_id: None,
            forms: Vec::new(),
            contextual_forms: Vec::new(),
            audio: Vec::new(),
            definitions: Vec::new(),
            expressions: Vec::new(),
            stems: Vec::new(),
            compositions: Vec::new(),
            variants: Vec::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
        }
    }

    #[test]
    fn test_word_class_parsing() {
        let (pos, gender) = parse_word_class(&["substantiv".into(), "intetkøn".into()]);
        assert_eq!(pos, PartOfSpeech::Noun);
        assert_eq!(gender, Some(Gender::Neuter));

        let (pos, gender) = parse_word_class(&["verbum".into()]);
        assert_eq!(pos, PartOfSpeech::Verb);
        assert_eq!(gender, None);
    }

    #[test]
    fn test_full_noun_decomposition() {
        let mut raw = entry("hus");
        raw.forms = vec!["-et".into(), "-e".into(), "-ene".into()];
        raw.phonetic = Some("[ˈhuːˀs]".into());
        raw.etymology = Some("norrønt hús".into());
        raw.entry_id = Some("11009843".into());
        raw.definitions = vec![DdoDefinition {
            text: "bygning som mennesker bor i".into(),
            labels: vec![DdoLabel {
                key: "Synonym".into(),
                value: "bolig".into(),
            }],
            is_short: true,
            examples: vec![DdoExample {
                text: "vi købte et gammelt hus".into(),
                ..Default::default()
            }],
        }];

        let processed = process(&raw);
        assert_eq!(processed.word.word, "hus");
        assert_eq!(processed.word.part_of_speech, PartOfSpeech::Noun);
        assert_eq!(processed.word.gender, Some(Gender::Neuter));
        assert_eq!(processed.word.forms.as_deref(), Some("-et, -e, -ene"));
        assert_eq!(processed.word.source, "ddo");
        assert_eq!(processed.definitions.len(), 1);
        assert!(processed.definitions[0].is_short);
        assert_eq!(processed.definitions[0].examples.len(), 1);

        // Three inflected forms plus the label synonym
        let words: Vec<&str> = processed.sub_words.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["huset", "huse", "husene", "bolig"]);
        assert!(processed.sub_words[3]
            .relations
            .iter()
            .any(|r| r.relation_type == RelationType::Synonym));
    }

    #[test]
    fn test_unknown_pos_degrades_not_fails() {
        let mut raw = entry("øh");
        raw.part_of_speech = vec!["lydord".into()];
        let processed = process(&raw);
        assert_eq!(processed.word.part_of_speech, PartOfSpeech::Unknown);
    }

    #[test]
    fn test_expression_definitions_carried() {
        let mut raw = entry("hus");
        raw.expressions = vec![DdoExpression {
            text: "holde hus".into(),
            definitions: vec![DdoDefinition {
                text: "styre en husholdning".into(),
                ..Default::default()
            }],
            variant_forms: Vec::new(),
        }];

        let processed = process(&raw);
        let phrase = processed
            .sub_words
            .iter()
            .find(|s| s.word == "holde hus")
            .expect("phrase sub-word");
        assert_eq!(phrase.part_of_speech, Some(PartOfSpeech::Phrase));
        assert_eq!(phrase.definitions.len(), 1);
    }

    #[test]
    fn test_entry_deserializes_from_minimal_json() {
        let raw: DdoEntry = serde_json::from_str(
            r#"{"headword": "hus", "part_of_speech": ["substantiv", "intetkøn"]}"#,
        )
        .unwrap();
        assert_eq!(raw.headword, "hus");
        assert!(raw.definitions.is_empty());
    }
}
