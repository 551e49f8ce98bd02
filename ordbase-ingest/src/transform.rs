//! Form Transformer
//!
//! Turns a headword plus its raw inflectional endings and contextual
//! forms into derived word-forms tagged with relationship types.
//!
//! Ending conventions (DDO): a leading `-` means "append to the
//! headword", a bare value is a full-word override (irregular form),
//! and `-` alone means "identical to the headword". Malformed or empty
//! ending lists yield no forms, never an error.

use ordbase_common::{Gender, PartOfSpeech, RelationType};
use std::collections::HashSet;

/// One derived word-form and the relationship types that tag it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedForm {
    pub word: String,
    pub relation_types: Vec<RelationType>,
    pub usage_note: Option<String>,
    pub definition_numbers: Vec<u8>,
}

impl DerivedForm {
    fn new(word: String, relation_types: Vec<RelationType>) -> Self {
        Self {
            word,
            relation_types,
            usage_note: None,
            definition_numbers: Vec::new(),
        }
    }

    /// Composite dedup key: the same edge emitted from two overlapping
    /// context buckets must collapse to one
    fn dedup_key(&self) -> String {
        let types: Vec<&str> = self.relation_types.iter().map(|t| t.as_str()).collect();
        let numbers: Vec<String> = self.definition_numbers.iter().map(|n| n.to_string()).collect();
        format!(
            "{}|{}|{}|{}",
            self.word,
            types.join("+"),
            self.usage_note.as_deref().unwrap_or(""),
            numbers.join(",")
        )
    }
}

/// Irregular pronoun forms recognized as literal full words
const IRREGULAR_PRONOUN_FORMS: &[(&str, RelationType)] = &[
    ("andet", RelationType::NeuterForm),
    ("andre", RelationType::PluralForm),
    ("alt", RelationType::NeuterForm),
    ("alle", RelationType::PluralForm),
    ("noget", RelationType::NeuterForm),
    ("nogle", RelationType::PluralForm),
];

/// Derive all word-forms for one headword
///
/// `contextual_forms` are (context text, form) pairs keyed by a
/// free-text usage context such as "i flertal betydning 2".
pub fn derive_forms(
    headword: &str,
    endings: &[String],
    contextual_forms: &[(String, String)],
    pos: PartOfSpeech,
    gender: Option<Gender>,
) -> Vec<DerivedForm> {
    let mut forms = match pos {
        PartOfSpeech::Noun => noun_forms(headword, endings, gender),
        PartOfSpeech::Adjective => adjective_forms(headword, endings),
        PartOfSpeech::Verb => verb_forms(headword, endings),
        PartOfSpeech::Pronoun => pronoun_forms(headword, endings),
        // Other parts of speech carry no positional ending semantics;
        // anything present degrades to a generic related form.
        _ => generic_forms(headword, endings),
    };

    forms.extend(contextual_form_entries(headword, contextual_forms));

    dedup_and_filter(headword, forms)
}

/// Apply one raw ending to a base word
///
/// Returns None for empty input. Suffix application to a multi-word
/// base applies the suffix only to the last token.
pub fn apply_ending(base: &str, ending: &str) -> Option<String> {
    let ending = ending.trim().trim_matches(|c| c == '(' || c == ')');
    if ending.is_empty() {
        return None;
    }
    if ending == "-" {
        return Some(base.to_string());
    }
    if let Some(suffix) = ending.strip_prefix('-') {
        if let Some((head, last)) = base.rsplit_once(' ') {
            return Some(format!("{} {}{}", head, last, suffix));
        }
        return Some(format!("{}{}", base, suffix));
    }
    // Bare value: full-word override (irregular form)
    Some(ending.to_string())
}

fn noun_forms(headword: &str, endings: &[String], gender: Option<Gender>) -> Vec<DerivedForm> {
    let mut forms = Vec::new();

    if let Some(ending) = endings.first() {
        if let Some(word) = apply_ending(headword, ending) {
            let mut types = vec![RelationType::DefiniteForm];
            match gender.or_else(|| infer_gender(ending)) {
                Some(Gender::Common) => types.push(RelationType::CommonGender),
                Some(Gender::Neuter) => types.push(RelationType::NeuterGender),
                None => {}
            }
            forms.push(DerivedForm::new(word, types));
        }
    }
    if let Some(ending) = endings.get(1) {
        if let Some(word) = apply_ending(headword, ending) {
            forms.push(DerivedForm::new(word, vec![RelationType::Plural]));
        }
    }
    if let Some(ending) = endings.get(2) {
        if let Some(word) = apply_ending(headword, ending) {
            forms.push(DerivedForm::new(word, vec![RelationType::PluralDefinite]));
        }
    }

    forms
}

/// Infer grammatical gender from the shape of a definite-form ending
fn infer_gender(ending: &str) -> Option<Gender> {
    let suffix = ending.trim_start_matches('-');
    if suffix.ends_with("en") {
        Some(Gender::Common)
    } else if suffix.ends_with("et") {
        Some(Gender::Neuter)
    } else {
        None
    }
}

fn adjective_forms(headword: &str, endings: &[String]) -> Vec<DerivedForm> {
    // Invariable adjective ("-", "-"): no inflected forms exist, the
    // comparative and superlative are analytic ("mere X" / "mest X")
    if endings.len() == 2 && endings.iter().all(|e| e == "-") {
        return vec![
            DerivedForm::new(format!("mere {}", headword), vec![RelationType::Comparative]),
            DerivedForm::new(format!("mest {}", headword), vec![RelationType::Superlative]),
        ];
    }

    let mut forms = Vec::new();
    let mut neuter: Option<String> = None;
    let mut comparative: Option<String> = None;

    if let Some(ending) = endings.first() {
        if let Some(word) = apply_ending(headword, ending) {
            neuter = Some(word.clone());
            forms.push(DerivedForm::new(word, vec![RelationType::NeuterForm]));
        }
    }
    if let Some(ending) = endings.get(1) {
        if let Some(word) = apply_ending(headword, ending) {
            forms.push(DerivedForm::new(word, vec![RelationType::PluralForm]));
        }
    }
    if let Some(ending) = endings.get(2) {
        if let Some(word) = apply_ending(headword, ending) {
            // A bare-word override here is an irregular comparative
            // (e.g. "god" → "bedre"); both shapes contain "ere"
            if ending.contains("ere") || !ending.starts_with('-') {
                comparative = Some(word.clone());
                forms.push(DerivedForm::new(word, vec![RelationType::Comparative]));
            } else {
                forms.push(DerivedForm::new(word, vec![RelationType::Related]));
            }
        }
    }
    if let Some(ending) = endings.get(3) {
        if let Some(word) = apply_ending(headword, ending) {
            // "(-est)" arrives parenthesized; apply_ending strips it
            if ending.contains("est") || !ending.starts_with('-') {
                forms.push(DerivedForm::new(word, vec![RelationType::Superlative]));
            } else {
                forms.push(DerivedForm::new(word, vec![RelationType::Related]));
            }
        }
    }

    // Adverbial form: reuse the comparative when it ends in "ere",
    // else fall back to the neuter form, else the base word
    let adverbial = match (&comparative, &neuter) {
        (Some(c), _) if c.ends_with("ere") => c.clone(),
        (_, Some(n)) => n.clone(),
        _ => headword.to_string(),
    };
    forms.push(DerivedForm::new(adverbial, vec![RelationType::Adverbial]));

    forms
}

fn verb_forms(headword: &str, endings: &[String]) -> Vec<DerivedForm> {
    const POSITIONAL: &[RelationType] = &[
        RelationType::PresentTense,
        RelationType::PastTense,
        RelationType::PastParticiple,
        RelationType::Imperative,
    ];

    endings
        .iter()
        .enumerate()
        .filter_map(|(i, ending)| {
            let word = apply_ending(headword, ending)?;
            // Positions beyond the known list degrade to a generic
            // related tag rather than failing
            let relation = POSITIONAL.get(i).copied().unwrap_or(RelationType::Related);
            Some(DerivedForm::new(word, vec![relation]))
        })
        .collect()
}

fn pronoun_forms(headword: &str, endings: &[String]) -> Vec<DerivedForm> {
    endings
        .iter()
        .filter_map(|ending| {
            let word = apply_ending(headword, ending)?;
            let relation = classify_pronoun_form(ending, &word);
            Some(DerivedForm::new(word, vec![relation]))
        })
        .collect()
}

fn classify_pronoun_form(ending: &str, word: &str) -> RelationType {
    if let Some((_, relation)) = IRREGULAR_PRONOUN_FORMS.iter().find(|(w, _)| *w == word) {
        return *relation;
    }
    let suffix = ending.trim_start_matches('-');
    if suffix == "t" || (ending.starts_with('-') && suffix.ends_with('t')) {
        RelationType::NeuterForm
    } else if suffix.ends_with("le") {
        RelationType::PluralForm
    } else {
        RelationType::Related
    }
}

fn generic_forms(headword: &str, endings: &[String]) -> Vec<DerivedForm> {
    endings
        .iter()
        .filter_map(|ending| apply_ending(headword, ending))
        .map(|word| DerivedForm::new(word, vec![RelationType::Related]))
        .collect()
}

/// Process contextual forms keyed by a free-text usage context
///
/// The context key text is inspected for grammatical keywords before
/// falling back to suffix-shape heuristics; the key becomes a usage
/// note on the relationship, and embedded definition numbers
/// ("betydning 2 og 3") are parsed out.
fn contextual_form_entries(
    headword: &str,
    contextual_forms: &[(String, String)],
) -> Vec<DerivedForm> {
    contextual_forms
        .iter()
        .filter_map(|(context, raw_form)| {
            let word = apply_ending(headword, raw_form)?;
            let relation = classify_context(context, raw_form, &word);
            let note = context.trim();
            Some(DerivedForm {
                word,
                relation_types: vec![relation],
                usage_note: (!note.is_empty()).then(|| note.to_string()),
                definition_numbers: parse_definition_numbers(context),
            })
        })
        .collect()
}

fn classify_context(context: &str, raw_form: &str, word: &str) -> RelationType {
    let lower = context.to_lowercase();
    if lower.contains("flertal") || lower.contains("plural") {
        RelationType::Plural
    } else if lower.contains("genitiv") {
        RelationType::Genitive
    } else if lower.contains("bestemt") {
        RelationType::DefiniteForm
    } else if lower.contains("intetkøn") {
        RelationType::NeuterForm
    } else {
        classify_pronoun_form(raw_form, word)
    }
}

/// Pull definition numbers out of a context key ("i betydning 2 og 3")
fn parse_definition_numbers(context: &str) -> Vec<u8> {
    context
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Deduplicate by composite key and drop self-referential noise: an
/// identical-to-base form is only kept when a non-empty usage note
/// makes it distinct
fn dedup_and_filter(headword: &str, forms: Vec<DerivedForm>) -> Vec<DerivedForm> {
    let mut seen = HashSet::new();
    forms
        .into_iter()
        .filter(|f| !f.word.is_empty())
        .filter(|f| f.word != headword || f.usage_note.is_some())
        .filter(|f| seen.insert(f.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apply_ending_variants() {
        assert_eq!(apply_ending("hus", "-et"), Some("huset".to_string()));
        assert_eq!(apply_ending("hus", "-"), Some("hus".to_string()));
        assert_eq!(apply_ending("god", "bedre"), Some("bedre".to_string()));
        assert_eq!(apply_ending("hus", ""), None);
    }

    #[test]
    fn test_apply_ending_multi_word_base() {
        // Suffix applies to the last token only
        assert_eq!(
            apply_ending("rød grød", "-en"),
            Some("rød grøden".to_string())
        );
    }

    #[test]
    fn test_noun_forms_hus() {
        let forms = derive_forms(
            "hus",
            &endings(&["-et", "-e", "-ene"]),
            &[],
            PartOfSpeech::Noun,
            None,
        );
        assert_eq!(forms.len(), 3);
        assert_eq!(forms[0].word, "huset");
        assert_eq!(
            forms[0].relation_types,
            vec![RelationType::DefiniteForm, RelationType::NeuterGender]
        );
        assert_eq!(forms[1].word, "huse");
        assert_eq!(forms[1].relation_types, vec![RelationType::Plural]);
        assert_eq!(forms[2].word, "husene");
        assert_eq!(forms[2].relation_types, vec![RelationType::PluralDefinite]);
    }

    #[test]
    fn test_noun_common_gender_inferred_from_ending() {
        let forms = derive_forms(
            "bil",
            &endings(&["-en", "-er", "-erne"]),
            &[],
            PartOfSpeech::Noun,
            None,
        );
        assert_eq!(
            forms[0].relation_types,
            vec![RelationType::DefiniteForm, RelationType::CommonGender]
        );
    }

    #[test]
    fn test_noun_explicit_gender_wins_over_shape() {
        let forms = derive_forms(
            "øje",
            &endings(&["-t"]),
            &[],
            PartOfSpeech::Noun,
            Some(Gender::Neuter),
        );
        assert_eq!(
            forms[0].relation_types,
            vec![RelationType::DefiniteForm, RelationType::NeuterGender]
        );
    }

    #[test]
    fn test_adjective_forms_smuk() {
        let forms = derive_forms(
            "smuk",
            &endings(&["-t", "-ke", "-kere", "-kest"]),
            &[],
            PartOfSpeech::Adjective,
            None,
        );
        let words: Vec<&str> = forms.iter().map(|f| f.word.as_str()).collect();
        assert!(words.contains(&"smukt"));
        assert!(words.contains(&"smukke"));
        assert!(words.contains(&"smukkere"));
        assert!(words.contains(&"smukkest"));
        let comparative = forms
            .iter()
            .find(|f| f.relation_types == vec![RelationType::Comparative])
            .expect("comparative");
        assert_eq!(comparative.word, "smukkere");
        // Adverbial reuses the comparative because it ends in "ere"
        let adverbial = forms
            .iter()
            .find(|f| f.relation_types == vec![RelationType::Adverbial])
            .expect("adverbial");
        assert_eq!(adverbial.word, "smukkere");
    }

    #[test]
    fn test_adjective_irregular_comparative_override() {
        let forms = derive_forms(
            "god",
            &endings(&["-t", "-e", "bedre", "bedst"]),
            &[],
            PartOfSpeech::Adjective,
            None,
        );
        let comparative = forms
            .iter()
            .find(|f| f.relation_types == vec![RelationType::Comparative])
            .expect("comparative");
        assert_eq!(comparative.word, "bedre");
        let superlative = forms
            .iter()
            .find(|f| f.relation_types == vec![RelationType::Superlative])
            .expect("superlative");
        assert_eq!(superlative.word, "bedst");
    }

    #[test]
    fn test_adjective_parenthesized_superlative() {
        let forms = derive_forms(
            "fin",
            &endings(&["-t", "-e", "-ere", "(-est)"]),
            &[],
            PartOfSpeech::Adjective,
            None,
        );
        let superlative = forms
            .iter()
            .find(|f| f.relation_types == vec![RelationType::Superlative])
            .expect("superlative");
        assert_eq!(superlative.word, "finest");
    }

    #[test]
    fn test_invariable_adjective_analytic_forms() {
        let forms = derive_forms(
            "moderne",
            &endings(&["-", "-"]),
            &[],
            PartOfSpeech::Adjective,
            None,
        );
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].word, "mere moderne");
        assert_eq!(forms[0].relation_types, vec![RelationType::Comparative]);
        assert_eq!(forms[1].word, "mest moderne");
        assert_eq!(forms[1].relation_types, vec![RelationType::Superlative]);
    }

    #[test]
    fn test_verb_positional_mapping() {
        let forms = derive_forms(
            "spise",
            &endings(&["-r", "spiste", "spist", "spis"]),
            &[],
            PartOfSpeech::Verb,
            None,
        );
        assert_eq!(forms.len(), 4);
        assert_eq!(forms[0].word, "spiser");
        assert_eq!(forms[0].relation_types, vec![RelationType::PresentTense]);
        assert_eq!(forms[1].relation_types, vec![RelationType::PastTense]);
        assert_eq!(forms[2].relation_types, vec![RelationType::PastParticiple]);
        assert_eq!(forms[3].relation_types, vec![RelationType::Imperative]);
    }

    #[test]
    fn test_verb_truncated_and_overflow_endings() {
        let forms = derive_forms("gå", &endings(&["-r"]), &[], PartOfSpeech::Verb, None);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].relation_types, vec![RelationType::PresentTense]);

        let forms = derive_forms(
            "gå",
            &endings(&["-r", "gik", "gået", "gå2", "gående"]),
            &[],
            PartOfSpeech::Verb,
            None,
        );
        assert_eq!(forms[4].relation_types, vec![RelationType::Related]);
    }

    #[test]
    fn test_empty_endings_yield_nothing() {
        let forms = derive_forms("hus", &[], &[], PartOfSpeech::Noun, None);
        assert!(forms.is_empty());
    }

    #[test]
    fn test_pronoun_suffix_and_irregular_forms() {
        let forms = derive_forms(
            "anden",
            &endings(&["andet", "andre"]),
            &[],
            PartOfSpeech::Pronoun,
            None,
        );
        assert_eq!(forms[0].word, "andet");
        assert_eq!(forms[0].relation_types, vec![RelationType::NeuterForm]);
        assert_eq!(forms[1].word, "andre");
        assert_eq!(forms[1].relation_types, vec![RelationType::PluralForm]);
    }

    #[test]
    fn test_pronoun_identical_to_base_needs_usage_note() {
        // "-" without a context yields the base word: dropped as noise
        let forms = derive_forms("man", &endings(&["-"]), &[], PartOfSpeech::Pronoun, None);
        assert!(forms.is_empty());

        // The same word with a contextual usage note is kept
        let contextual = vec![("i genitiv betydning 2".to_string(), "-s".to_string())];
        let forms = derive_forms("man", &[], &contextual, PartOfSpeech::Pronoun, None);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].word, "mans");
        assert_eq!(forms[0].relation_types, vec![RelationType::Genitive]);
        assert_eq!(forms[0].usage_note.as_deref(), Some("i genitiv betydning 2"));
        assert_eq!(forms[0].definition_numbers, vec![2]);
    }

    #[test]
    fn test_contextual_keyword_beats_suffix_shape() {
        // The context text says plural even though the suffix looks
        // like a neuter "-t" shape
        let contextual = vec![("i flertal".to_string(), "-t".to_string())];
        let forms = derive_forms("nogen", &[], &contextual, PartOfSpeech::Pronoun, None);
        assert_eq!(forms[0].relation_types, vec![RelationType::Plural]);
    }

    #[test]
    fn test_contextual_dedup_overlapping_buckets() {
        let contextual = vec![
            ("i flertal".to_string(), "-e".to_string()),
            ("i flertal".to_string(), "-e".to_string()),
        ];
        let forms = derive_forms("nogen", &[], &contextual, PartOfSpeech::Pronoun, None);
        assert_eq!(forms.len(), 1);
    }
}
