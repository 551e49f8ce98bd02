//! Relationship Graph Builder
//!
//! Assembles the full sub-word list for one entry: transformed
//! inflectional forms, stems, synonyms/antonyms/see-also references,
//! compositions (with the `(s)` interpolation rule), variant spellings
//! and fixed expressions. Every relationship uses symbolic endpoints;
//! the builder never invents identifiers — resolution happens in the
//! persistence engine once all candidate sub-words are known.

use crate::transform::{derive_forms, DerivedForm};
use crate::types::{Endpoint, RawDefinition, SubWordData, SymbolicRelation};
use ordbase_common::{Gender, Language, PartOfSpeech, RelationType};
use std::collections::HashMap;

/// A fixed expression / phrasal verb nested in the entry
#[derive(Debug, Clone, Default)]
pub struct ExpressionInput {
    pub text: String,
    pub definitions: Vec<RawDefinition>,
    /// Variant wordings of the same expression
    pub variant_forms: Vec<String>,
}

/// Everything the builder needs about one entry
#[derive(Debug, Clone)]
pub struct GraphInput {
    pub headword: String,
    pub language: Language,
    pub part_of_speech: PartOfSpeech,
    pub gender: Option<Gender>,
    pub endings: Vec<String>,
    pub contextual_forms: Vec<(String, String)>,
    /// Stem references, optionally pos-abbreviation-prefixed ("sb. seng")
    pub stems: Vec<String>,
    /// Synonyms from flat lists and definition labels combined
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub see_also: Vec<String>,
    pub compositions: Vec<String>,
    /// Variant spellings of the headword itself
    pub variants: Vec<String>,
    pub expressions: Vec<ExpressionInput>,
}

/// Assemble all sub-word records for one entry
pub fn build_graph(input: &GraphInput) -> Vec<SubWordData> {
    let mut builder = GraphBuilder::new(input.language);

    add_inflected_forms(&mut builder, input);
    add_stems(&mut builder, input);
    add_semantic_references(&mut builder, input);
    add_compositions(&mut builder, input);
    add_variants(&mut builder, input);
    add_expressions(&mut builder, input);

    builder.finish()
}

/// Accumulates sub-words in insertion order, merging records that
/// reference the same word text so one word carries all its relations
struct GraphBuilder {
    language: Language,
    sub_words: Vec<SubWordData>,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    fn new(language: Language) -> Self {
        Self {
            language,
            sub_words: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn entry(&mut self, word: &str) -> &mut SubWordData {
        let idx = match self.index.get(word).copied() {
            Some(i) => i,
            None => {
                self.sub_words.push(SubWordData::new(word, self.language));
                self.index.insert(word.to_string(), self.sub_words.len() - 1);
                self.sub_words.len() - 1
            }
        };
        &mut self.sub_words[idx]
    }

    fn push_relation(&mut self, word: &str, relation: SymbolicRelation) {
        let sub = self.entry(word);
        if !sub.relations.contains(&relation) {
            sub.relations.push(relation);
        }
    }

    fn finish(self) -> Vec<SubWordData> {
        self.sub_words
    }
}

fn add_inflected_forms(builder: &mut GraphBuilder, input: &GraphInput) {
    let forms = derive_forms(
        &input.headword,
        &input.endings,
        &input.contextual_forms,
        input.part_of_speech,
        input.gender,
    );

    for form in &forms {
        let sub = builder.entry(&form.word);
        sub.part_of_speech = Some(input.part_of_speech);
        sub.gender = form_gender(form).or(input.gender);
        sub.inherits_etymology = true;
        for relation_type in &form.relation_types {
            let mut relation = SymbolicRelation::new(
                Endpoint::MainWordDetails,
                Endpoint::SubWordDetails,
                *relation_type,
            );
            relation.usage_note = form.usage_note.clone();
            relation.definition_numbers = form.definition_numbers.clone();
            if !sub.relations.contains(&relation) {
                sub.relations.push(relation);
            }
        }
    }
}

/// Gender implied by the form's own tags (definite "-et" marks a
/// neuter word, "-en" a common one)
fn form_gender(form: &DerivedForm) -> Option<Gender> {
    if form.relation_types.contains(&RelationType::NeuterGender) {
        Some(Gender::Neuter)
    } else if form.relation_types.contains(&RelationType::CommonGender) {
        Some(Gender::Common)
    } else {
        None
    }
}

fn add_stems(builder: &mut GraphBuilder, input: &GraphInput) {
    for raw in &input.stems {
        let (pos, word) = parse_stem(raw);
        let word = word.trim();
        if word.is_empty() || word == input.headword {
            continue;
        }
        let sub = builder.entry(word);
        if sub.part_of_speech.is_none() {
            sub.part_of_speech = pos;
        }
        builder.push_relation(
            word,
            SymbolicRelation::new(Endpoint::MainWord, Endpoint::SubWord, RelationType::Stem),
        );
    }
}

/// Split an optional leading pos abbreviation off a stem reference
fn parse_stem(raw: &str) -> (Option<PartOfSpeech>, &str) {
    let trimmed = raw.trim();
    if let Some((first, rest)) = trimmed.split_once(' ') {
        if let Some(pos) = PartOfSpeech::from_abbreviation(first) {
            return (Some(pos), rest);
        }
    }
    (None, trimmed)
}

fn add_semantic_references(builder: &mut GraphBuilder, input: &GraphInput) {
    let groups = [
        (&input.synonyms, RelationType::Synonym),
        (&input.antonyms, RelationType::Antonym),
        (&input.see_also, RelationType::SeeAlso),
    ];
    for (words, relation_type) in groups {
        for word in words {
            let word = word.trim();
            // References back at the headword itself are noise
            if word.is_empty() || word == input.headword {
                continue;
            }
            builder.push_relation(
                word,
                SymbolicRelation::new(
                    Endpoint::MainWordDetails,
                    Endpoint::SubWordDetails,
                    relation_type,
                ),
            );
        }
    }
}

fn add_compositions(builder: &mut GraphBuilder, input: &GraphInput) {
    for raw in &input.compositions {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match expand_composition(raw) {
            Some((plain, with_s)) => {
                for word in [plain.as_str(), with_s.as_str()] {
                    let sub = builder.entry(word);
                    sub.inherits_etymology = true;
                    builder.push_relation(
                        word,
                        SymbolicRelation::new(
                            Endpoint::MainWord,
                            Endpoint::SubWord,
                            RelationType::Composition,
                        ),
                    );
                }
                // The two expansions are alternative spellings of each
                // other, linked via literal sibling endpoints
                builder.push_relation(
                    &plain,
                    SymbolicRelation::new(
                        Endpoint::SubWordDetails,
                        Endpoint::Sibling(with_s.clone()),
                        RelationType::AlternativeSpelling,
                    ),
                );
                builder.push_relation(
                    &with_s,
                    SymbolicRelation::new(
                        Endpoint::SubWordDetails,
                        Endpoint::Sibling(plain.clone()),
                        RelationType::AlternativeSpelling,
                    ),
                );
            }
            None => {
                let sub = builder.entry(raw);
                sub.inherits_etymology = true;
                builder.push_relation(
                    raw,
                    SymbolicRelation::new(
                        Endpoint::MainWord,
                        Endpoint::SubWord,
                        RelationType::Composition,
                    ),
                );
            }
        }
    }
}

/// Expand the `(s)` interpolation in a composition pattern:
/// "barn(s)seng" yields ("barnseng", "barnsseng")
fn expand_composition(pattern: &str) -> Option<(String, String)> {
    let idx = pattern.find("(s)")?;
    let (prefix, rest) = pattern.split_at(idx);
    let suffix = &rest[3..];
    Some((
        format!("{}{}", prefix, suffix),
        format!("{}s{}", prefix, suffix),
    ))
}

fn add_variants(builder: &mut GraphBuilder, input: &GraphInput) {
    for variant in &input.variants {
        let variant = variant.trim();
        if variant.is_empty() || variant == input.headword {
            continue;
        }
        let sub = builder.entry(variant);
        sub.part_of_speech = Some(input.part_of_speech);
        sub.inherits_etymology = true;
        builder.push_relation(
            variant,
            SymbolicRelation::new(
                Endpoint::MainWordDetails,
                Endpoint::SubWordDetails,
                RelationType::Variant,
            ),
        );
    }
}

fn add_expressions(builder: &mut GraphBuilder, input: &GraphInput) {
    for expression in &input.expressions {
        let text = expression.text.trim();
        if text.is_empty() {
            continue;
        }
        {
            let sub = builder.entry(text);
            sub.part_of_speech = Some(PartOfSpeech::Phrase);
            sub.definitions = expression.definitions.clone();
        }
        builder.push_relation(
            text,
            SymbolicRelation::new(Endpoint::MainWord, Endpoint::SubWord, RelationType::Phrase),
        );

        for variant in &expression.variant_forms {
            let variant = variant.trim();
            if variant.is_empty() || variant == text {
                continue;
            }
            let sub = builder.entry(variant);
            sub.part_of_speech = Some(PartOfSpeech::Phrase);
            builder.push_relation(
                variant,
                SymbolicRelation::new(
                    Endpoint::SubWordDetails,
                    Endpoint::Sibling(text.to_string()),
                    RelationType::Variant,
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(headword: &str, pos: PartOfSpeech) -> GraphInput {
        GraphInput {
            headword: headword.to_string(),
            language: Language::Danish,
            part_of_speech: pos,
            gender: None,
            endings: Vec::new(),
            contextual_forms: Vec::new(),
            stems: Vec::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            see_also: Vec::new(),
            compositions: Vec::new(),
            variants: Vec::new(),
            expressions: Vec::new(),
        }
    }

    #[test]
    fn test_inflected_forms_become_sub_words() {
        let mut graph_input = input("hus", PartOfSpeech::Noun);
        graph_input.endings = vec!["-et".into(), "-e".into(), "-ene".into()];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 3);

        let huset = &sub_words[0];
        assert_eq!(huset.word, "huset");
        assert_eq!(huset.part_of_speech, Some(PartOfSpeech::Noun));
        assert_eq!(huset.gender, Some(Gender::Neuter));
        assert!(huset.inherits_etymology);
        let types: Vec<RelationType> =
            huset.relations.iter().map(|r| r.relation_type).collect();
        assert_eq!(
            types,
            vec![RelationType::DefiniteForm, RelationType::NeuterGender]
        );
        assert!(huset
            .relations
            .iter()
            .all(|r| r.from == Endpoint::MainWordDetails && r.to == Endpoint::SubWordDetails));
    }

    #[test]
    fn test_stem_abbreviation_table() {
        let mut graph_input = input("hushold", PartOfSpeech::Noun);
        graph_input.stems = vec!["sb. hus".into(), "vb. holde".into()];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 2);
        assert_eq!(sub_words[0].word, "hus");
        assert_eq!(sub_words[0].part_of_speech, Some(PartOfSpeech::Noun));
        assert_eq!(sub_words[1].word, "holde");
        assert_eq!(sub_words[1].part_of_speech, Some(PartOfSpeech::Verb));
        assert_eq!(sub_words[0].relations[0].relation_type, RelationType::Stem);
        assert_eq!(sub_words[0].relations[0].from, Endpoint::MainWord);
    }

    #[test]
    fn test_semantic_references_skip_headword_and_dedup() {
        let mut graph_input = input("hus", PartOfSpeech::Noun);
        // "bolig" arrives from both the flat list and a definition
        // label; "hus" references the headword itself
        graph_input.synonyms = vec!["bolig".into(), "bolig".into(), "hus".into()];
        graph_input.antonyms = vec!["".into()];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 1);
        assert_eq!(sub_words[0].word, "bolig");
        assert_eq!(sub_words[0].relations.len(), 1);
        assert_eq!(sub_words[0].relations[0].relation_type, RelationType::Synonym);
    }

    #[test]
    fn test_composition_s_expansion() {
        let mut graph_input = input("barn", PartOfSpeech::Noun);
        graph_input.compositions = vec!["barn(s)seng".into()];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 2);

        let plain = &sub_words[0];
        let with_s = &sub_words[1];
        assert_eq!(plain.word, "barnseng");
        assert_eq!(with_s.word, "barnsseng");

        for sub in [plain, with_s] {
            assert!(sub
                .relations
                .iter()
                .any(|r| r.relation_type == RelationType::Composition
                    && r.from == Endpoint::MainWord));
        }
        assert!(plain.relations.iter().any(|r| r.relation_type
            == RelationType::AlternativeSpelling
            && r.to == Endpoint::Sibling("barnsseng".to_string())));
        assert!(with_s.relations.iter().any(|r| r.relation_type
            == RelationType::AlternativeSpelling
            && r.to == Endpoint::Sibling("barnseng".to_string())));
    }

    #[test]
    fn test_plain_composition_without_interpolation() {
        let mut graph_input = input("hus", PartOfSpeech::Noun);
        graph_input.compositions = vec!["husbåd".into()];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 1);
        assert_eq!(sub_words[0].word, "husbåd");
        assert_eq!(
            sub_words[0].relations[0].relation_type,
            RelationType::Composition
        );
    }

    #[test]
    fn test_expression_with_variant_form() {
        let mut graph_input = input("holde", PartOfSpeech::Verb);
        graph_input.expressions = vec![ExpressionInput {
            text: "holde hus".into(),
            definitions: vec![RawDefinition {
                text: "styre en husholdning".into(),
                ..Default::default()
            }],
            variant_forms: vec!["holde hus med".into()],
        }];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 2);

        let phrase = &sub_words[0];
        assert_eq!(phrase.word, "holde hus");
        assert_eq!(phrase.part_of_speech, Some(PartOfSpeech::Phrase));
        assert_eq!(phrase.definitions.len(), 1);
        assert_eq!(phrase.relations[0].relation_type, RelationType::Phrase);

        let variant = &sub_words[1];
        assert_eq!(variant.word, "holde hus med");
        assert_eq!(
            variant.relations[0].to,
            Endpoint::Sibling("holde hus".to_string())
        );
    }

    #[test]
    fn test_word_merged_across_sources() {
        // The same word arriving as a synonym and a see-also reference
        // becomes one sub-word carrying both relations
        let mut graph_input = input("hus", PartOfSpeech::Noun);
        graph_input.synonyms = vec!["bolig".into()];
        graph_input.see_also = vec!["bolig".into()];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 1);
        let types: Vec<RelationType> = sub_words[0]
            .relations
            .iter()
            .map(|r| r.relation_type)
            .collect();
        assert_eq!(types, vec![RelationType::Synonym, RelationType::SeeAlso]);
    }

    #[test]
    fn test_variant_spelling_of_headword() {
        let mut graph_input = input("jogurt", PartOfSpeech::Noun);
        graph_input.variants = vec!["yoghurt".into()];

        let sub_words = build_graph(&graph_input);
        assert_eq!(sub_words.len(), 1);
        assert_eq!(sub_words[0].word, "yoghurt");
        assert!(sub_words[0].inherits_etymology);
        assert_eq!(sub_words[0].relations[0].relation_type, RelationType::Variant);
    }
}
