//! Merriam-Webster collegiate API adapter
//!
//! Maps one MW JSON entry onto `ProcessedWordData`: syllable asterisks
//! stripped from headwords and inflections, `{...}` formatting tokens
//! removed from text, pronunciation audio resolved to full media URLs
//! via the subdirectory rule, and `ins`/`vrs`/`cxs`/`uros` mapped to
//! typed sub-word relationships. `def[].sseq` is walked structurally
//! for sense texts and verbal illustrations.

use crate::graph::{build_graph, GraphInput};
use crate::types::{
    AudioRef, Endpoint, MainWordData, ProcessedWordData, RawDefinition, RawExample, SubWordData,
    SymbolicRelation,
};
use ordbase_common::{Language, PartOfSpeech, RelationType};
use serde::Deserialize;
use serde_json::Value;

pub const SOURCE_NAME: &str = "merriam-webster";

const AUDIO_BASE_URL: &str = "https://media.merriam-webster.com/audio/prons/en/us/mp3";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwMeta {
    /// "hello:1" — headword plus homograph number
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub stems: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwSound {
    pub audio: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwPronunciation {
    #[serde(default)]
    pub mw: Option<String>,
    #[serde(default)]
    pub sound: Option<MwSound>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwHeadwordInfo {
    /// Headword with "*" syllable separators ("hel*lo")
    pub hw: String,
    #[serde(default)]
    pub prs: Vec<MwPronunciation>,
}

/// An inflected form ("if") with its optional label ("il")
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwInflection {
    #[serde(rename = "if", default)]
    pub form: Option<String>,
    #[serde(rename = "il", default)]
    pub label: Option<String>,
}

/// A spelling variant ("va") with its optional label ("vl")
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwVariant {
    #[serde(rename = "va")]
    pub form: String,
    #[serde(rename = "vl", default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwCrossRefTarget {
    #[serde(rename = "cxt")]
    pub target: String,
}

/// A cognate cross-reference ("chiefly British spelling of ...")
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwCrossRef {
    #[serde(rename = "cxl", default)]
    pub label: Option<String>,
    #[serde(rename = "cxtis", default)]
    pub targets: Vec<MwCrossRefTarget>,
}

/// An undefined run-on entry ("ure" headword, own "fl")
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwRunOn {
    #[serde(rename = "ure")]
    pub form: String,
    #[serde(default)]
    pub fl: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MwDef {
    /// Sense sequence: deeply nested arrays walked structurally
    #[serde(default)]
    pub sseq: Value,
}

/// Raw MW collegiate entry as received on the ingest endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct MwEntry {
    pub meta: MwMeta,
    pub hwi: MwHeadwordInfo,
    /// Functional label, e.g. "noun"
    #[serde(default)]
    pub fl: Option<String>,
    #[serde(default)]
    pub ins: Vec<MwInflection>,
    #[serde(default)]
    pub vrs: Vec<MwVariant>,
    #[serde(default)]
    pub cxs: Vec<MwCrossRef>,
    #[serde(default)]
    pub uros: Vec<MwRunOn>,
    /// Etymology: [["text", "Middle English ..."], ...]
    #[serde(default)]
    pub et: Vec<Vec<String>>,
    #[serde(default)]
    pub shortdef: Vec<String>,
    #[serde(default)]
    pub def: Vec<MwDef>,
}

/// Decompose one MW entry
pub fn process(entry: &MwEntry) -> ProcessedWordData {
    let headword = strip_syllable_marks(&entry.hwi.hw);
    let part_of_speech = entry
        .fl
        .as_deref()
        .and_then(PartOfSpeech::from_str_loose)
        .unwrap_or(PartOfSpeech::Unknown);

    let mut definitions: Vec<RawDefinition> = entry
        .shortdef
        .iter()
        .map(|text| RawDefinition {
            text: clean_format_tokens(text),
            is_short: true,
            ..Default::default()
        })
        .collect();
    for def in &entry.def {
        definitions.extend(sense_definitions(&def.sseq));
    }

    let mut sub_words = build_graph(&GraphInput {
        headword: headword.clone(),
        language: Language::English,
        part_of_speech,
        gender: None,
        endings: Vec::new(),
        contextual_forms: Vec::new(),
        stems: Vec::new(),
        synonyms: Vec::new(),
        antonyms: Vec::new(),
        see_also: entry
            .cxs
            .iter()
            .flat_map(|cx| cx.targets.iter())
            .map(|t| cross_ref_word(&t.target))
            .collect(),
        compositions: Vec::new(),
        variants: entry
            .vrs
            .iter()
            .map(|v| strip_syllable_marks(&v.form))
            .collect(),
        expressions: Vec::new(),
    });

    add_inflections(&mut sub_words, &headword, part_of_speech, &entry.ins);
    add_run_ons(&mut sub_words, &headword, &entry.uros);

    let word = MainWordData {
        word: headword,
        language: Language::English,
        part_of_speech,
        variant: homograph_label(&entry.meta.id),
        gender: None,
        phonetic: entry
            .hwi
            .prs
            .iter()
            .find_map(|p| p.mw.clone())
            .filter(|p| !p.trim().is_empty()),
        etymology: etymology_text(&entry.et),
        forms: None,
        source_id: entry.meta.uuid.clone().or_else(|| {
            if entry.meta.id.is_empty() {
                None
            } else {
                Some(entry.meta.id.clone())
            }
        }),
        source: SOURCE_NAME.to_string(),
        audio: pronunciation_audio(&entry.hwi.prs),
        first_audio_is_primary: true,
    };

    ProcessedWordData {
        word,
        definitions,
        sub_words,
    }
}

/// Remove the "*" syllable separators MW embeds in headwords
pub fn strip_syllable_marks(word: &str) -> String {
    word.replace('*', "").trim().to_string()
}

/// The homograph number after the colon in meta.id ("hello:1" -> "1")
fn homograph_label(meta_id: &str) -> String {
    meta_id
        .split_once(':')
        .map(|(_, n)| n.to_string())
        .unwrap_or_default()
}

/// Strip MW inline formatting tokens like {bc}, {it}...{/it}, {sx|...}
fn clean_format_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Cross-reference targets may carry a sense suffix ("color:1")
fn cross_ref_word(target: &str) -> String {
    target
        .split_once(':')
        .map(|(w, _)| w)
        .unwrap_or(target)
        .trim()
        .to_string()
}

/// Join the textual etymology fragments
fn etymology_text(et: &[Vec<String>]) -> Option<String> {
    let joined = et
        .iter()
        .filter(|fragment| fragment.len() == 2 && fragment[0] == "text")
        .map(|fragment| clean_format_tokens(&fragment[1]))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Full media URL for one MW audio basename. The subdirectory rule:
/// "bix"/"gg" prefixes get their own directories, names starting with a
/// digit or punctuation go under "number", everything else under the
/// first letter.
pub fn audio_url(basename: &str) -> String {
    let subdir = if basename.starts_with("bix") {
        "bix".to_string()
    } else if basename.starts_with("gg") {
        "gg".to_string()
    } else {
        match basename.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => c.to_lowercase().to_string(),
            _ => "number".to_string(),
        }
    };
    format!("{}/{}/{}.mp3", AUDIO_BASE_URL, subdir, basename)
}

fn pronunciation_audio(prs: &[MwPronunciation]) -> Vec<AudioRef> {
    prs.iter()
        .filter_map(|p| p.sound.as_ref())
        .filter(|s| !s.audio.trim().is_empty())
        .map(|s| AudioRef {
            url: audio_url(s.audio.trim()),
            word_tag: None,
        })
        .collect()
}

/// Map `ins` inflections to typed form edges: "plural" labels become
/// plural edges, "or"-chained spellings become alternative spellings,
/// unlabeled forms (verb tenses etc.) degrade to `Related`.
fn add_inflections(
    sub_words: &mut Vec<SubWordData>,
    headword: &str,
    part_of_speech: PartOfSpeech,
    ins: &[MwInflection],
) {
    for inflection in ins {
        let Some(raw) = inflection.form.as_deref() else {
            continue;
        };
        let form = strip_syllable_marks(raw);
        if form.is_empty() || form == headword {
            continue;
        }
        let relation_type = match inflection.label.as_deref() {
            Some("plural") => RelationType::Plural,
            Some("or") | Some("also") => RelationType::AlternativeSpelling,
            _ => RelationType::Related,
        };
        let relation = SymbolicRelation::new(
            Endpoint::MainWordDetails,
            Endpoint::SubWordDetails,
            relation_type,
        );
        push_sub_word(sub_words, &form, Some(part_of_speech), relation);
    }
}

/// Undefined run-on entries become related sub-words with their own pos
fn add_run_ons(sub_words: &mut Vec<SubWordData>, headword: &str, uros: &[MwRunOn]) {
    for run_on in uros {
        let form = strip_syllable_marks(&run_on.form);
        if form.is_empty() || form == headword {
            continue;
        }
        let pos = run_on.fl.as_deref().and_then(PartOfSpeech::from_str_loose);
        let relation =
            SymbolicRelation::new(Endpoint::MainWord, Endpoint::SubWord, RelationType::Related);
        push_sub_word(sub_words, &form, pos, relation);
    }
}

/// Merge into an existing sub-word of the same text or append a new one
fn push_sub_word(
    sub_words: &mut Vec<SubWordData>,
    word: &str,
    part_of_speech: Option<PartOfSpeech>,
    relation: SymbolicRelation,
) {
    let idx = match sub_words.iter().position(|s| s.word == word) {
        Some(i) => i,
        None => {
            sub_words.push(SubWordData::new(word, Language::English));
            sub_words.len() - 1
        }
    };
    let sub = &mut sub_words[idx];
    if sub.part_of_speech.is_none() {
        sub.part_of_speech = part_of_speech;
    }
    sub.inherits_etymology = true;
    if !sub.relations.contains(&relation) {
        sub.relations.push(relation);
    }
}

/// Walk one `sseq` value collecting defining texts ("dt" "text" nodes)
/// and their verbal illustrations ("vis" nodes)
fn sense_definitions(sseq: &Value) -> Vec<RawDefinition> {
    let mut definitions = Vec::new();
    walk_senses(sseq, &mut definitions);
    definitions
}

fn walk_senses(value: &Value, out: &mut Vec<RawDefinition>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk_senses(item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                // The defining text lives under the "dt" key of a sense
                // object: [["text", "..."], ["vis", [...]], ...]
                if key == "dt" {
                    if let Some(def) = defining_text(item) {
                        out.push(def);
                    }
                } else {
                    walk_senses(item, out);
                }
            }
        }
        _ => {}
    }
}

fn defining_text(dt_body: &Value) -> Option<RawDefinition> {
    let items = dt_body.as_array()?;
    let mut text = None;
    let mut examples = Vec::new();

    for item in items {
        let Some(pair) = item.as_array() else {
            continue;
        };
        let Some(kind) = pair.first().and_then(Value::as_str) else {
            continue;
        };
        match (kind, pair.get(1)) {
            ("text", Some(Value::String(raw))) => {
                let cleaned = clean_format_tokens(raw);
                if !cleaned.is_empty() {
                    text = Some(cleaned);
                }
            }
            ("vis", Some(Value::Array(vis_items))) => {
                for vis in vis_items {
                    if let Some(t) = vis.get("t").and_then(Value::as_str) {
                        examples.push(RawExample {
                            text: clean_format_tokens(t),
                            ..Default::default()
                        });
                    }
                }
            }
            _ => {}
        }
    }

    Some(RawDefinition {
        text: text?,
        examples,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_json(json: &str) -> MwEntry {
        serde_json::from_str(json).expect("valid entry json")
    }

    #[test]
    fn test_strip_syllable_marks() {
        assert_eq!(strip_syllable_marks("hel*lo"), "hello");
        assert_eq!(strip_syllable_marks("chil*dren"), "children");
    }

    #[test]
    fn test_clean_format_tokens() {
        assert_eq!(
            clean_format_tokens("{bc}a greeting {it}hello{/it} there"),
            "a greeting  there"
        );
        assert_eq!(clean_format_tokens("plain"), "plain");
    }

    #[test]
    fn test_audio_url_subdirectory_rule() {
        assert_eq!(
            audio_url("hello001"),
            "https://media.merriam-webster.com/audio/prons/en/us/mp3/h/hello001.mp3"
        );
        assert_eq!(
            audio_url("bix0001"),
            "https://media.merriam-webster.com/audio/prons/en/us/mp3/bix/bix0001.mp3"
        );
        assert_eq!(
            audio_url("gg032"),
            "https://media.merriam-webster.com/audio/prons/en/us/mp3/gg/gg032.mp3"
        );
        assert_eq!(
            audio_url("3d000a"),
            "https://media.merriam-webster.com/audio/prons/en/us/mp3/number/3d000a.mp3"
        );
        assert_eq!(
            audio_url("_under"),
            "https://media.merriam-webster.com/audio/prons/en/us/mp3/number/_under.mp3"
        );
    }

    #[test]
    fn test_full_entry_decomposition() {
        let entry = entry_json(
            r#"{
                "meta": {"id": "hello:1", "uuid": "abc-123", "stems": ["hello", "hellos"]},
                "hwi": {
                    "hw": "hel*lo",
                    "prs": [{"mw": "hə-ˈlō", "sound": {"audio": "hello001"}}]
                },
                "fl": "noun",
                "ins": [{"if": "hel*los", "il": "plural"}],
                "et": [["text", "alteration of {it}hollo{/it}"]],
                "shortdef": ["an expression of greeting"]
            }"#,
        );

        let processed = process(&entry);
        assert_eq!(processed.word.word, "hello");
        assert_eq!(processed.word.language, Language::English);
        assert_eq!(processed.word.part_of_speech, PartOfSpeech::Noun);
        assert_eq!(processed.word.variant, "1");
        assert_eq!(processed.word.phonetic.as_deref(), Some("hə-ˈlō"));
        assert_eq!(
            processed.word.etymology.as_deref(),
            Some("alteration of")
        );
        assert_eq!(processed.word.source_id.as_deref(), Some("abc-123"));
        assert_eq!(processed.word.audio.len(), 1);
        assert!(processed.word.audio[0].url.ends_with("/h/hello001.mp3"));

        assert_eq!(processed.definitions.len(), 1);
        assert!(processed.definitions[0].is_short);

        assert_eq!(processed.sub_words.len(), 1);
        assert_eq!(processed.sub_words[0].word, "hellos");
        assert_eq!(
            processed.sub_words[0].relations[0].relation_type,
            RelationType::Plural
        );
    }

    #[test]
    fn test_variants_and_cross_references() {
        let entry = entry_json(
            r#"{
                "meta": {"id": "colour"},
                "hwi": {"hw": "co*lour"},
                "fl": "noun",
                "vrs": [{"va": "co*lour*ize"}],
                "cxs": [{"cxl": "chiefly British spelling of", "cxtis": [{"cxt": "color:1"}]}]
            }"#,
        );

        let processed = process(&entry);
        let words: Vec<&str> = processed.sub_words.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["color", "colourize"]);

        let color = &processed.sub_words[0];
        assert_eq!(color.relations[0].relation_type, RelationType::SeeAlso);
        let colourize = &processed.sub_words[1];
        assert_eq!(colourize.relations[0].relation_type, RelationType::Variant);
    }

    #[test]
    fn test_unlabeled_inflections_degrade_to_related() {
        let entry = entry_json(
            r#"{
                "meta": {"id": "run"},
                "hwi": {"hw": "run"},
                "fl": "verb",
                "ins": [{"if": "ran"}, {"if": "run*ning"}]
            }"#,
        );

        let processed = process(&entry);
        assert_eq!(processed.sub_words.len(), 2);
        for sub in &processed.sub_words {
            assert_eq!(sub.relations[0].relation_type, RelationType::Related);
            assert_eq!(sub.part_of_speech, Some(PartOfSpeech::Verb));
        }
    }

    #[test]
    fn test_sseq_walk_collects_definitions_and_examples() {
        let entry = entry_json(
            r#"{
                "meta": {"id": "hello"},
                "hwi": {"hw": "hel*lo"},
                "fl": "noun",
                "def": [{"sseq": [[["sense", {
                    "sn": "1",
                    "dt": [
                        ["text", "{bc}an expression of greeting"],
                        ["vis", [{"t": "gave him a warm {it}hello{/it}"}]]
                    ]
                }]]]}]
            }"#,
        );

        let processed = process(&entry);
        assert_eq!(processed.definitions.len(), 1);
        let def = &processed.definitions[0];
        assert_eq!(def.text, "an expression of greeting");
        assert!(!def.is_short);
        assert_eq!(def.examples.len(), 1);
        assert_eq!(def.examples[0].text, "gave him a warm");
    }

    #[test]
    fn test_run_ons_keep_own_part_of_speech() {
        let entry = entry_json(
            r#"{
                "meta": {"id": "happy"},
                "hwi": {"hw": "hap*py"},
                "fl": "adjective",
                "uros": [{"ure": "hap*pi*ly", "fl": "adverb"}]
            }"#,
        );

        let processed = process(&entry);
        assert_eq!(processed.sub_words.len(), 1);
        assert_eq!(processed.sub_words[0].word, "happily");
        assert_eq!(processed.sub_words[0].part_of_speech, Some(PartOfSpeech::Adverb));
        assert_eq!(
            processed.sub_words[0].relations[0].relation_type,
            RelationType::Related
        );
    }
}
