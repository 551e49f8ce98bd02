//! Shared domain enums
//!
//! Languages, parts of speech, grammatical gender and the closed set of
//! relationship types stored in the `word_relationships` /
//! `word_details_relationships` tables. Every enum has a stable
//! snake_case wire name used both in the database and in API payloads.

use serde::{Deserialize, Serialize};

/// Source language of a dictionary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Danish,
    English,
}

impl Language {
    /// ISO 639-1 code stored in the database
    pub fn code(&self) -> &'static str {
        match self {
            Language::Danish => "da",
            Language::English => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "da" => Some(Language::Danish),
            "en" => Some(Language::English),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Part of speech scoping a word sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Numeral,
    Article,
    Phrase,
    Unknown,
}

impl PartOfSpeech {
    /// Stable name stored in `word_details.part_of_speech`
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Numeral => "numeral",
            PartOfSpeech::Article => "article",
            PartOfSpeech::Phrase => "phrase",
            PartOfSpeech::Unknown => "unknown",
        }
    }

    pub fn from_str_loose(value: &str) -> Option<PartOfSpeech> {
        let v = value.trim().to_lowercase();
        let pos = match v.as_str() {
            "noun" | "substantiv" => PartOfSpeech::Noun,
            "verb" | "verbum" => PartOfSpeech::Verb,
            "adjective" | "adjektiv" => PartOfSpeech::Adjective,
            "adverb" | "adverbium" => PartOfSpeech::Adverb,
            "pronoun" | "pronomen" => PartOfSpeech::Pronoun,
            "preposition" | "præposition" => PartOfSpeech::Preposition,
            "conjunction" | "konjunktion" => PartOfSpeech::Conjunction,
            "interjection" | "udråbsord" | "interjektion" => PartOfSpeech::Interjection,
            "numeral" | "talord" => PartOfSpeech::Numeral,
            "article" | "artikel" => PartOfSpeech::Article,
            "phrase" | "udtryk" => PartOfSpeech::Phrase,
            _ => return None,
        };
        Some(pos)
    }

    /// Map a Danish dictionary abbreviation (as used in stem references,
    /// e.g. "sb.", "vb.") to a part of speech.
    pub fn from_abbreviation(abbrev: &str) -> Option<PartOfSpeech> {
        let a = abbrev.trim().trim_end_matches('.').to_lowercase();
        let pos = match a.as_str() {
            "sb" | "subst" => PartOfSpeech::Noun,
            "vb" => PartOfSpeech::Verb,
            "adj" => PartOfSpeech::Adjective,
            "adv" => PartOfSpeech::Adverb,
            "pron" => PartOfSpeech::Pronoun,
            "præp" | "prep" => PartOfSpeech::Preposition,
            "konj" | "conj" => PartOfSpeech::Conjunction,
            "interj" | "udråbsord" => PartOfSpeech::Interjection,
            "num" | "talord" => PartOfSpeech::Numeral,
            _ => return None,
        };
        Some(pos)
    }
}

impl std::fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Danish grammatical gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// fælleskøn (n-words)
    Common,
    /// intetkøn (t-words)
    Neuter,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Common => "common",
            Gender::Neuter => "neuter",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Gender> {
        match marker.trim().to_lowercase().as_str() {
            "fælleskøn" | "common" => Some(Gender::Common),
            "intetkøn" | "neuter" => Some(Gender::Neuter),
            _ => None,
        }
    }
}

/// Granularity of a relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationLevel {
    /// Coarse Word-to-Word edge (word_relationships)
    Word,
    /// Sense-specific WordDetails-to-WordDetails edge
    /// (word_details_relationships)
    Details,
}

/// Typed, directed relationship between two words or two senses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    // Word-to-Word
    Related,
    Stem,
    Composition,
    Phrase,
    // WordDetails-to-WordDetails: grammatical forms
    DefiniteForm,
    CommonGender,
    NeuterGender,
    Plural,
    PluralDefinite,
    NeuterForm,
    PluralForm,
    Comparative,
    Superlative,
    Adverbial,
    PresentTense,
    PastTense,
    PastParticiple,
    Imperative,
    Genitive,
    AlternativeSpelling,
    Variant,
    // WordDetails-to-WordDetails: semantic
    Synonym,
    Antonym,
    SeeAlso,
}

impl RelationType {
    /// Stable name stored in the relationship tables
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Related => "related",
            RelationType::Stem => "stem",
            RelationType::Composition => "composition",
            RelationType::Phrase => "phrase",
            RelationType::DefiniteForm => "definite_form",
            RelationType::CommonGender => "common_gender",
            RelationType::NeuterGender => "neuter_gender",
            RelationType::Plural => "plural",
            RelationType::PluralDefinite => "plural_definite",
            RelationType::NeuterForm => "neuter_form",
            RelationType::PluralForm => "plural_form",
            RelationType::Comparative => "comparative",
            RelationType::Superlative => "superlative",
            RelationType::Adverbial => "adverbial",
            RelationType::PresentTense => "present_tense",
            RelationType::PastTense => "past_tense",
            RelationType::PastParticiple => "past_participle",
            RelationType::Imperative => "imperative",
            RelationType::Genitive => "genitive",
            RelationType::AlternativeSpelling => "alternative_spelling",
            RelationType::Variant => "variant",
            RelationType::Synonym => "synonym",
            RelationType::Antonym => "antonym",
            RelationType::SeeAlso => "see_also",
        }
    }

    /// Fixed human-readable description stored on each edge
    pub fn description(&self) -> &'static str {
        match self {
            RelationType::Related => "related word",
            RelationType::Stem => "stem",
            RelationType::Composition => "composition",
            RelationType::Phrase => "fixed expression",
            RelationType::DefiniteForm => "definite form",
            RelationType::CommonGender => "common gender form",
            RelationType::NeuterGender => "neuter gender form",
            RelationType::Plural => "plural form",
            RelationType::PluralDefinite => "plural definite form",
            RelationType::NeuterForm => "neuter form",
            RelationType::PluralForm => "plural/definite form",
            RelationType::Comparative => "comparative",
            RelationType::Superlative => "superlative",
            RelationType::Adverbial => "adverbial form",
            RelationType::PresentTense => "present tense",
            RelationType::PastTense => "past tense",
            RelationType::PastParticiple => "past participle",
            RelationType::Imperative => "imperative",
            RelationType::Genitive => "genitive form",
            RelationType::AlternativeSpelling => "alternative spelling",
            RelationType::Variant => "variant spelling",
            RelationType::Synonym => "synonym",
            RelationType::Antonym => "antonym",
            RelationType::SeeAlso => "see also",
        }
    }

    /// Edge granularity: coarse word level or sense-specific details level
    pub fn level(&self) -> RelationLevel {
        match self {
            RelationType::Related
            | RelationType::Stem
            | RelationType::Composition
            | RelationType::Phrase => RelationLevel::Word,
            _ => RelationLevel::Details,
        }
    }

    /// Resolution priority class. Lower classes are resolved first so
    /// that grammatical-form edges establish a sub-word's sense context
    /// before looser semantic edges attach to the same WordDetails row.
    ///
    /// 1. grammatical forms and spelling variants
    /// 2. stem
    /// 3. semantic (related/synonym/antonym/see also)
    /// 4. everything else (phrase, composition)
    pub fn priority(&self) -> u8 {
        match self {
            RelationType::DefiniteForm
            | RelationType::CommonGender
            | RelationType::NeuterGender
            | RelationType::Plural
            | RelationType::PluralDefinite
            | RelationType::NeuterForm
            | RelationType::PluralForm
            | RelationType::Comparative
            | RelationType::Superlative
            | RelationType::Adverbial
            | RelationType::PresentTense
            | RelationType::PastTense
            | RelationType::PastParticiple
            | RelationType::Imperative
            | RelationType::Genitive
            | RelationType::AlternativeSpelling
            | RelationType::Variant => 1,
            RelationType::Stem => 2,
            RelationType::Related | RelationType::Synonym | RelationType::Antonym
            | RelationType::SeeAlso => 3,
            RelationType::Phrase | RelationType::Composition => 4,
        }
    }

    pub fn from_str_loose(value: &str) -> Option<RelationType> {
        serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_priority_ordering() {
        assert!(RelationType::Plural.priority() < RelationType::Stem.priority());
        assert!(RelationType::Stem.priority() < RelationType::Synonym.priority());
        assert!(RelationType::Synonym.priority() < RelationType::Composition.priority());
        assert_eq!(RelationType::AlternativeSpelling.priority(), 1);
    }

    #[test]
    fn test_relation_type_level() {
        assert_eq!(RelationType::Stem.level(), RelationLevel::Word);
        assert_eq!(RelationType::Composition.level(), RelationLevel::Word);
        assert_eq!(RelationType::Plural.level(), RelationLevel::Details);
        assert_eq!(RelationType::Synonym.level(), RelationLevel::Details);
    }

    #[test]
    fn test_pos_from_abbreviation() {
        assert_eq!(PartOfSpeech::from_abbreviation("sb."), Some(PartOfSpeech::Noun));
        assert_eq!(PartOfSpeech::from_abbreviation("vb."), Some(PartOfSpeech::Verb));
        assert_eq!(PartOfSpeech::from_abbreviation("adj."), Some(PartOfSpeech::Adjective));
        assert_eq!(PartOfSpeech::from_abbreviation("xyz."), None);
    }

    #[test]
    fn test_pos_danish_names() {
        assert_eq!(PartOfSpeech::from_str_loose("substantiv"), Some(PartOfSpeech::Noun));
        assert_eq!(PartOfSpeech::from_str_loose("Adjektiv"), Some(PartOfSpeech::Adjective));
        assert_eq!(PartOfSpeech::from_str_loose("noun"), Some(PartOfSpeech::Noun));
    }

    #[test]
    fn test_relation_type_wire_name_round_trip() {
        assert_eq!(
            RelationType::from_str_loose(RelationType::PluralDefinite.as_str()),
            Some(RelationType::PluralDefinite)
        );
        assert_eq!(RelationType::from_str_loose("alternative_spelling"),
            Some(RelationType::AlternativeSpelling));
    }

    #[test]
    fn test_gender_markers() {
        assert_eq!(Gender::from_marker("fælleskøn"), Some(Gender::Common));
        assert_eq!(Gender::from_marker("intetkøn"), Some(Gender::Neuter));
        assert_eq!(Gender::from_marker("substantiv"), None);
    }
}
