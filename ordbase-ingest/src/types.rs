//! Canonical internal shapes produced by the source adapters
//!
//! Every inbound raw entry format is mapped into `ProcessedWordData`
//! before persistence, so the persistence engine is source-agnostic.
//! Relationships inside a `ProcessedWordData` are symbolic: they name
//! endpoints (`MainWord`, `SubWordDetails`, a literal sibling word)
//! rather than row identifiers. Resolution to concrete ids happens
//! entirely inside the persistence engine.

use ordbase_common::{Gender, Language, PartOfSpeech, RelationType};
use serde::Serialize;
use uuid::Uuid;

/// One externally referenced audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRef {
    /// Remote URL of the audio file
    pub url: String,
    /// Word tag attached by the source (e.g. the pronounced form, or
    /// "i sms." for in-compound variants)
    pub word_tag: Option<String>,
}

/// Symbolic relationship endpoint, resolved during persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// The entry's main word
    MainWord,
    /// The canonical WordDetails row of the entry's headword sense
    MainWordDetails,
    /// The sub-word carrying this relation
    SubWord,
    /// The sub-word's own WordDetails row
    SubWordDetails,
    /// A sibling sub-word of the same entry, by literal text
    Sibling(String),
}

/// A typed, directed edge between two symbolic endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicRelation {
    pub from: Endpoint,
    pub to: Endpoint,
    pub relation_type: RelationType,
    /// Free-text usage note from contextual forms (e.g. "i flertal")
    pub usage_note: Option<String>,
    /// Definition numbers the relation applies to, when the source says
    pub definition_numbers: Vec<u8>,
}

impl SymbolicRelation {
    pub fn new(from: Endpoint, to: Endpoint, relation_type: RelationType) -> Self {
        Self {
            from,
            to,
            relation_type,
            usage_note: None,
            definition_numbers: Vec::new(),
        }
    }
}

/// An example sentence attached to a definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExample {
    pub text: String,
    pub grammar_note: Option<String>,
    /// Citation / source attribution text
    pub source_text: Option<String>,
}

/// A definition with its labels and examples
#[derive(Debug, Clone, Default)]
pub struct RawDefinition {
    pub text: String,
    pub subject_labels: Vec<String>,
    pub usage_labels: Vec<String>,
    pub grammar_note: Option<String>,
    /// Marks a primary sense (short definition)
    pub is_short: bool,
    pub examples: Vec<RawExample>,
}

/// The entry's headword with its sense-scoping attributes
#[derive(Debug, Clone)]
pub struct MainWordData {
    pub word: String,
    pub language: Language,
    pub part_of_speech: PartOfSpeech,
    /// Variant label distinguishing homographs of the same pos
    pub variant: String,
    pub gender: Option<Gender>,
    pub phonetic: Option<String>,
    pub etymology: Option<String>,
    /// Free-text grammatical forms summary
    pub forms: Option<String>,
    /// Opaque source-entity identifier used for dedup
    pub source_id: Option<String>,
    /// Source provenance ("ddo", "merriam-webster")
    pub source: String,
    pub audio: Vec<AudioRef>,
    /// Whether the first eligible audio entry is the primary one
    pub first_audio_is_primary: bool,
}

/// A word derived from or related to the headword during one ingestion
#[derive(Debug, Clone)]
pub struct SubWordData {
    pub word: String,
    pub language: Language,
    pub part_of_speech: Option<PartOfSpeech>,
    pub gender: Option<Gender>,
    pub phonetic: Option<String>,
    pub audio: Vec<AudioRef>,
    /// Etymology pointer back at the main word: the sub-word shares the
    /// headword's etymology instead of carrying its own
    pub inherits_etymology: bool,
    pub definitions: Vec<RawDefinition>,
    pub relations: Vec<SymbolicRelation>,
}

impl SubWordData {
    pub fn new(word: impl Into<String>, language: Language) -> Self {
        Self {
            word: word.into(),
            language,
            part_of_speech: None,
            gender: None,
            phonetic: None,
            audio: Vec::new(),
            inherits_etymology: false,
            definitions: Vec::new(),
            relations: Vec::new(),
        }
    }
}

/// Source-agnostic decomposition of one raw entry
#[derive(Debug, Clone)]
pub struct ProcessedWordData {
    pub word: MainWordData,
    pub definitions: Vec<RawDefinition>,
    pub sub_words: Vec<SubWordData>,
}

/// Row counts and ids reported after a successful ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub word_id: Uuid,
    pub word_details_id: Uuid,
    pub definitions: usize,
    pub examples: usize,
    pub sub_words: usize,
    pub relationships: usize,
    pub audio_links: usize,
    pub translated: bool,
}
