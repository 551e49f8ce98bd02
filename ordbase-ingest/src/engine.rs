//! Ingestion engine
//!
//! Orchestrates one entry's journey from raw payload to normalized
//! graph. Two phases:
//! - Phase A fetches enrichment data over the network with no open
//!   transaction: frequency ranks (cached per word+pos within the
//!   ingestion), audio mirroring (fan-out). Failures degrade to nulls
//!   or remote URLs.
//! - Phase B writes the whole graph in a single transaction under the
//!   configured timeout. Any write error rolls the entry back; nothing
//!   partial ever lands.
//!
//! Re-ingesting the same entry is a no-op by construction: every write
//! path is an upsert keyed on the row's natural identity.

use crate::adapters::RawEntry;
use crate::audio::{reconcile, select_pronunciations};
use crate::db::definitions::{link_definition, upsert_definition, upsert_example, NewDefinition};
use crate::db::relationships::{upsert_details_relationship, upsert_word_relationship};
use crate::db::word_details::{enrich_details, find_details_by_pos, upsert_details, NewWordDetails};
use crate::db::words::{upsert_word, NewWord};
use crate::error::IngestError;
use crate::services::{AudioStore, FrequencyClient, FrequencyData, TranslationClient, TranslationRequest};
use crate::types::{
    Endpoint, IngestReport, MainWordData, ProcessedWordData, SubWordData, SymbolicRelation,
};
use ordbase_common::config::IngestConfig;
use ordbase_common::{Language, PartOfSpeech, RelationLevel, RelationType};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// The ingestion engine with its optional enrichment collaborators
pub struct IngestEngine {
    db: SqlitePool,
    frequency: Option<FrequencyClient>,
    translation: Option<TranslationClient>,
    audio_store: Option<AudioStore>,
    transaction_timeout: Duration,
}

/// Everything Phase A fetched for one entry
#[derive(Debug, Default)]
struct Enrichment {
    main_frequency: FrequencyData,
    sub_frequency: HashMap<String, FrequencyData>,
    /// Eligible main-word pronunciation URLs, mirrored, in order
    main_audio: Vec<String>,
    sub_audio: HashMap<String, Vec<String>>,
}

/// Word text -> assigned row ids, built as Phase B progresses
#[derive(Debug, Default)]
struct ResolutionTable {
    word_ids: HashMap<String, Uuid>,
    details_ids: HashMap<String, Uuid>,
}

impl IngestEngine {
    /// Build the engine from config, constructing whichever
    /// collaborators are configured
    pub fn from_config(db: SqlitePool, config: &IngestConfig) -> Self {
        let frequency = config.frequency_service_url.as_ref().and_then(|url| {
            match FrequencyClient::new(url.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "Frequency client unavailable");
                    None
                }
            }
        });
        let translation = config.translation_service_url.as_ref().and_then(|url| {
            match TranslationClient::new(url.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "Translation client unavailable");
                    None
                }
            }
        });
        let audio_store = match AudioStore::new(config.audio_dir.clone()) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(error = %e, "Audio store unavailable, keeping remote URLs");
                None
            }
        };

        Self {
            db,
            frequency,
            translation,
            audio_store,
            transaction_timeout: Duration::from_secs(config.transaction_timeout_secs),
        }
    }

    /// Engine without collaborators, used by tests and offline runs
    pub fn bare(db: SqlitePool) -> Self {
        Self {
            db,
            frequency: None,
            translation: None,
            audio_store: None,
            transaction_timeout: Duration::from_secs(300),
        }
    }

    /// Ingest one raw entry into the normalized graph
    pub async fn ingest(&self, raw: &RawEntry) -> Result<IngestReport, IngestError> {
        let headword = raw.headword();
        if headword.is_empty() {
            return Err(IngestError::InvalidEntry {
                word: headword,
                reason: "empty headword".to_string(),
            });
        }

        let processed = raw.process();
        tracing::info!(
            word = %headword,
            language = %processed.word.language,
            sub_words = processed.sub_words.len(),
            "Ingesting entry"
        );

        // Phase A: network enrichment, no transaction held
        let enrichment = self.enrich(&processed).await;

        // Phase B: single transaction under timeout
        let seconds = self.transaction_timeout.as_secs();
        let written = tokio::time::timeout(
            self.transaction_timeout,
            self.persist(&processed, &enrichment),
        )
        .await;

        let mut report = match written {
            Ok(Ok(report)) => report,
            Ok(Err(ordbase_common::Error::Database(source))) => {
                return Err(IngestError::Persistence {
                    word: headword,
                    source,
                })
            }
            Ok(Err(other)) => return Err(IngestError::Common(other)),
            Err(_) => return Err(IngestError::Timeout {
                word: headword,
                seconds,
            }),
        };

        report.translated = self.translate(&processed, report.word_id).await;
        Ok(report)
    }

    async fn enrich(&self, processed: &ProcessedWordData) -> Enrichment {
        let main = &processed.word;
        let mut cache: HashMap<(String, Language, PartOfSpeech), FrequencyData> = HashMap::new();

        let main_frequency = self
            .lookup_frequency(&mut cache, &main.word, main.language, main.part_of_speech)
            .await;

        let mut sub_frequency = HashMap::new();
        for sub in &processed.sub_words {
            if let Some(pos) = sub.part_of_speech {
                let data = self
                    .lookup_frequency(&mut cache, &sub.word, sub.language, pos)
                    .await;
                sub_frequency.insert(sub.word.clone(), data);
            }
        }

        let main_selected: Vec<String> = select_pronunciations(&main.word, &main.audio)
            .iter()
            .map(|a| a.url.clone())
            .collect();
        let main_audio = self.mirror_urls(&main_selected, main.language).await;

        let mut sub_audio = HashMap::new();
        for sub in &processed.sub_words {
            if sub.audio.is_empty() {
                continue;
            }
            let selected: Vec<String> = select_pronunciations(&sub.word, &sub.audio)
                .iter()
                .map(|a| a.url.clone())
                .collect();
            if !selected.is_empty() {
                sub_audio.insert(sub.word.clone(), self.mirror_urls(&selected, sub.language).await);
            }
        }

        Enrichment {
            main_frequency,
            sub_frequency,
            main_audio,
            sub_audio,
        }
    }

    async fn lookup_frequency(
        &self,
        cache: &mut HashMap<(String, Language, PartOfSpeech), FrequencyData>,
        word: &str,
        language: Language,
        pos: PartOfSpeech,
    ) -> FrequencyData {
        let Some(client) = &self.frequency else {
            return FrequencyData::default();
        };
        let key = (word.to_string(), language, pos);
        if let Some(hit) = cache.get(&key) {
            return *hit;
        }
        let data = match client.lookup(word, language, pos).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "Frequency lookup failed");
                FrequencyData::default()
            }
        };
        cache.insert(key, data);
        data
    }

    async fn mirror_urls(&self, urls: &[String], language: Language) -> Vec<String> {
        match &self.audio_store {
            Some(store) => store
                .mirror_all(urls, language.code())
                .await
                .iter()
                .zip(urls)
                .map(|(outcome, url)| outcome.stored_url(url).to_string())
                .collect(),
            None => urls.to_vec(),
        }
    }

    /// Phase B: the whole graph in one transaction
    async fn persist(
        &self,
        processed: &ProcessedWordData,
        enrichment: &Enrichment,
    ) -> ordbase_common::Result<IngestReport> {
        let mut tx = self.db.begin().await?;
        let main = &processed.word;
        let language = main.language;

        // Step 1: main word
        let mut new_word = NewWord::new(&main.word, language);
        new_word.etymology = main.etymology.clone();
        new_word.frequency_rank = enrichment.main_frequency.general;
        new_word.source_id = main.source_id.clone();
        let word_id = upsert_word(&mut *tx, &new_word).await?;

        // Step 2: canonical sense for the entry's pos/variant
        let details_id = upsert_details(
            &mut *tx,
            &NewWordDetails {
                word_id,
                part_of_speech: main.part_of_speech.as_str().to_string(),
                variant: main.variant.clone(),
                phonetic: main.phonetic.clone(),
                gender: main.gender.map(|g| g.as_str().to_string()),
                is_plural: false,
                forms: main.forms.clone(),
                etymology: main.etymology.clone(),
                frequency_rank: enrichment.main_frequency.pos_specific,
                source: Some(main.source.clone()),
            },
        )
        .await?;

        let mut table = ResolutionTable::default();
        table.word_ids.insert(main.word.clone(), word_id);
        table.details_ids.insert(main.word.clone(), details_id);

        // Step 3: definitions and examples
        let (mut definitions, mut examples) = (0, 0);
        let written = write_definitions(
            &mut tx,
            details_id,
            &processed.definitions,
            language,
            &main.source,
        )
        .await?;
        definitions += written.0;
        examples += written.1;

        // Step 4: sub-words
        let mut sub_words = 0;
        for sub in &processed.sub_words {
            if sub.word == main.word {
                // Main-word protection: endpoints route to the already
                // upserted ids; no separate row, no enrichment pass
                tracing::debug!(word = %sub.word, "Sub-word text equals headword, routed to main");
                continue;
            }
            let mut new_sub = NewWord::new(&sub.word, sub.language);
            if sub.inherits_etymology {
                new_sub.etymology = main.etymology.clone();
            }
            new_sub.frequency_rank = enrichment
                .sub_frequency
                .get(&sub.word)
                .and_then(|f| f.general);
            let sub_word_id = upsert_word(&mut *tx, &new_sub).await?;
            table.word_ids.insert(sub.word.clone(), sub_word_id);
            sub_words += 1;

            if !sub.definitions.is_empty() {
                let sub_details_id =
                    ensure_sub_details(&mut tx, &mut table, sub, main, enrichment).await?;
                let written = write_definitions(
                    &mut tx,
                    sub_details_id,
                    &sub.definitions,
                    sub.language,
                    &main.source,
                )
                .await?;
                definitions += written.0;
                examples += written.1;
            }
        }

        // Steps 5-6: relationships, ordered by priority class so form
        // edges fix a sub-word's sense before semantic edges attach
        let mut edges: Vec<(&SubWordData, &SymbolicRelation)> = processed
            .sub_words
            .iter()
            .flat_map(|sub| sub.relations.iter().map(move |r| (sub, r)))
            .collect();
        edges.sort_by_key(|(_, r)| r.relation_type.priority());

        let mut relationships = 0;
        for (sub, relation) in edges {
            if write_relationship(&mut tx, &mut table, processed, sub, relation, enrichment)
                .await?
            {
                relationships += 1;
            }
        }

        // Audio reconciliation, inside the same transaction
        let mut audio_links = reconcile(
            &mut *tx,
            details_id,
            language.code(),
            &enrichment.main_audio,
            main.first_audio_is_primary,
        )
        .await?;
        for sub in &processed.sub_words {
            if sub.word == main.word {
                continue;
            }
            if let Some(urls) = enrichment.sub_audio.get(&sub.word) {
                let sub_details_id =
                    ensure_sub_details(&mut tx, &mut table, sub, main, enrichment).await?;
                audio_links +=
                    reconcile(&mut *tx, sub_details_id, sub.language.code(), urls, true).await?;
            }
        }

        tx.commit().await?;

        Ok(IngestReport {
            word_id,
            word_details_id: details_id,
            definitions,
            examples,
            sub_words,
            relationships,
            audio_links,
            translated: false,
        })
    }

    /// Send the persisted graph for translation; failures degrade
    async fn translate(&self, processed: &ProcessedWordData, word_id: Uuid) -> bool {
        let Some(client) = &self.translation else {
            return false;
        };
        let main = &processed.word;
        let request = TranslationRequest {
            word_id,
            word: main.word.clone(),
            phonetic: main.phonetic.clone(),
            definitions: processed
                .definitions
                .iter()
                .map(|d| d.text.clone())
                .collect(),
            stems: processed
                .sub_words
                .iter()
                .filter(|s| {
                    s.relations
                        .iter()
                        .any(|r| r.relation_type == RelationType::Stem)
                })
                .map(|s| s.word.clone())
                .collect(),
            related_words: processed
                .sub_words
                .iter()
                .map(|s| s.word.clone())
                .collect(),
        };
        match client.translate(&request).await {
            Ok(Some(translated)) => {
                tracing::info!(word = %translated.word, "Entry translated");
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(word = %main.word, error = %e, "Translation failed");
                false
            }
        }
    }
}

/// Single-token cross-reference stubs carry no defining content
fn is_cross_reference_stub(text: &str) -> bool {
    let t = text.trim().to_lowercase();
    if t.contains(char::is_whitespace) {
        return false;
    }
    matches!(t.trim_end_matches('.'), "se" | "jf" | "see")
}

async fn write_definitions(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    details_id: Uuid,
    definitions: &[crate::types::RawDefinition],
    language: Language,
    source: &str,
) -> ordbase_common::Result<(usize, usize)> {
    let (mut def_count, mut example_count) = (0, 0);
    for (index, def) in definitions.iter().enumerate() {
        if def.text.is_empty() || is_cross_reference_stub(&def.text) {
            tracing::debug!(definition = %def.text, "Skipping cross-reference stub");
            continue;
        }
        let definition_id = upsert_definition(
            &mut **tx,
            &NewDefinition {
                definition: def.text.clone(),
                language: language.code().to_string(),
                source: source.to_string(),
                subject_labels: def.subject_labels.clone(),
                usage_labels: def.usage_labels.clone(),
                grammar_note: def.grammar_note.clone(),
                is_short: def.is_short,
            },
        )
        .await?;
        link_definition(&mut **tx, details_id, definition_id, def.is_short || index == 0).await?;
        def_count += 1;

        for example in &def.examples {
            if example.text.is_empty() {
                continue;
            }
            upsert_example(
                &mut **tx,
                definition_id,
                &example.text,
                example.grammar_note.as_deref(),
                example.source_text.as_deref(),
            )
            .await?;
            example_count += 1;
        }
    }
    Ok((def_count, example_count))
}

/// Find or create the sense row a sub-word's details endpoints resolve
/// to. Found rows are enriched fill-only; the canonical main sense is
/// never touched here because the lookup table already maps the
/// headword text to it.
async fn ensure_sub_details(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    table: &mut ResolutionTable,
    sub: &SubWordData,
    main: &MainWordData,
    enrichment: &Enrichment,
) -> ordbase_common::Result<Uuid> {
    if let Some(id) = table.details_ids.get(&sub.word) {
        return Ok(*id);
    }
    let word_id = match table.word_ids.get(&sub.word) {
        Some(id) => *id,
        None => {
            let sub_word_id = upsert_word(&mut **tx, &NewWord::new(&sub.word, sub.language)).await?;
            table.word_ids.insert(sub.word.clone(), sub_word_id);
            sub_word_id
        }
    };

    let pos = sub.part_of_speech.unwrap_or(main.part_of_speech);
    let etymology = if sub.inherits_etymology {
        main.etymology.clone()
    } else {
        None
    };

    let details_id = match find_details_by_pos(&mut **tx, word_id, pos.as_str()).await? {
        Some(existing) => {
            enrich_details(
                &mut **tx,
                existing.id,
                sub.phonetic.as_deref(),
                sub.gender.map(|g| g.as_str()),
                None,
                etymology.as_deref(),
            )
            .await?;
            existing.id
        }
        None => {
            upsert_details(
                &mut **tx,
                &NewWordDetails {
                    word_id,
                    part_of_speech: pos.as_str().to_string(),
                    variant: String::new(),
                    phonetic: sub.phonetic.clone(),
                    gender: sub.gender.map(|g| g.as_str().to_string()),
                    is_plural: false,
                    forms: None,
                    etymology,
                    frequency_rank: enrichment
                        .sub_frequency
                        .get(&sub.word)
                        .and_then(|f| f.pos_specific),
                    source: Some(main.source.clone()),
                },
            )
            .await?
        }
    };
    table.details_ids.insert(sub.word.clone(), details_id);
    Ok(details_id)
}

/// Resolve one symbolic edge and upsert it. Returns false when the
/// edge was skipped (unresolvable endpoint or self-edge).
async fn write_relationship(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    table: &mut ResolutionTable,
    processed: &ProcessedWordData,
    sub: &SubWordData,
    relation: &SymbolicRelation,
    enrichment: &Enrichment,
) -> ordbase_common::Result<bool> {
    let main = &processed.word;
    match relation.relation_type.level() {
        RelationLevel::Word => {
            let from = resolve_word_endpoint(table, main, sub, &relation.from);
            let to = resolve_word_endpoint(table, main, sub, &relation.to);
            match (from, to) {
                (Some(from), Some(to)) if from != to => {
                    upsert_word_relationship(&mut **tx, from, to, relation.relation_type).await?;
                    Ok(true)
                }
                (Some(_), Some(_)) => Ok(false),
                _ => {
                    tracing::warn!(
                        word = %sub.word,
                        relation = %relation.relation_type,
                        "Unresolvable relationship endpoint, edge skipped"
                    );
                    Ok(false)
                }
            }
        }
        RelationLevel::Details => {
            let from =
                resolve_details_endpoint(tx, table, processed, sub, &relation.from, enrichment)
                    .await?;
            let to = resolve_details_endpoint(tx, table, processed, sub, &relation.to, enrichment)
                .await?;
            match (from, to) {
                (Some(from), Some(to)) if from != to => {
                    upsert_details_relationship(&mut **tx, from, to, relation.relation_type).await?;
                    Ok(true)
                }
                (Some(_), Some(_)) => Ok(false),
                _ => {
                    tracing::warn!(
                        word = %sub.word,
                        relation = %relation.relation_type,
                        "Unresolvable relationship endpoint, edge skipped"
                    );
                    Ok(false)
                }
            }
        }
    }
}

fn resolve_word_endpoint(
    table: &ResolutionTable,
    main: &MainWordData,
    sub: &SubWordData,
    endpoint: &Endpoint,
) -> Option<Uuid> {
    match endpoint {
        Endpoint::MainWord | Endpoint::MainWordDetails => table.word_ids.get(&main.word).copied(),
        Endpoint::SubWord | Endpoint::SubWordDetails => table.word_ids.get(&sub.word).copied(),
        Endpoint::Sibling(text) => table.word_ids.get(text).copied(),
    }
}

async fn resolve_details_endpoint(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    table: &mut ResolutionTable,
    processed: &ProcessedWordData,
    sub: &SubWordData,
    endpoint: &Endpoint,
    enrichment: &Enrichment,
) -> ordbase_common::Result<Option<Uuid>> {
    let main = &processed.word;
    match endpoint {
        Endpoint::MainWordDetails | Endpoint::MainWord => {
            Ok(table.details_ids.get(&main.word).copied())
        }
        Endpoint::SubWordDetails | Endpoint::SubWord => {
            Ok(Some(ensure_sub_details(tx, table, sub, main, enrichment).await?))
        }
        Endpoint::Sibling(text) => {
            let Some(sibling) = processed.sub_words.iter().find(|s| &s.word == text) else {
                return Ok(None);
            };
            Ok(Some(
                ensure_sub_details(tx, table, sibling, main, enrichment).await?,
            ))
        }
    }
}
