//! Tag vocabulary loading and compilation.
//!
//! Trigger phrases are compiled into one case-insensitive Aho-Corasick
//! automaton per tag at load time, so matching a query is a single linear
//! scan per tag with no allocation.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use serde::{Deserialize, Serialize};

use evidex_core::models::scenario::ClinicalDomain;
use evidex_core::models::tags::{TagKind, TagSet};

use crate::abbreviations::Abbreviations;
use crate::builtin;
use crate::error::TagError;

/// A tag as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub id: String,
    pub label: String,
    pub kind: TagKind,
    pub triggers: Vec<String>,
    #[serde(default)]
    pub domain: ClinicalDomain,
}

/// On-disk shape of a vocabulary override file.
#[derive(Debug, Deserialize)]
struct VocabularyFile {
    tags: Vec<TagDefinition>,
    #[serde(default)]
    abbreviations: BTreeMap<String, String>,
}

/// A tag definition with its compiled trigger matcher.
#[derive(Debug, Clone)]
pub struct CompiledTag {
    definition: TagDefinition,
    matcher: AhoCorasick,
}

impl CompiledTag {
    fn compile(definition: TagDefinition) -> Result<Self, TagError> {
        let triggers: Vec<&str> = definition
            .triggers
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if triggers.is_empty() {
            return Err(TagError::InvalidTag {
                id: definition.id.clone(),
                reason: "no trigger phrases".to_string(),
            });
        }
        let matcher = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostFirst)
            .build(&triggers)?;
        Ok(Self {
            definition,
            matcher,
        })
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn label(&self) -> &str {
        &self.definition.label
    }

    pub fn kind(&self) -> TagKind {
        self.definition.kind
    }

    pub fn domain(&self) -> ClinicalDomain {
        self.definition.domain
    }

    pub fn definition(&self) -> &TagDefinition {
        &self.definition
    }

    /// Byte offset of the earliest trigger occurrence in `text`.
    pub fn first_match(&self, text: &str) -> Option<usize> {
        self.matcher.find(text).map(|m| m.start())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// The full set of disease and decision tags plus the abbreviation table.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    diseases: Vec<CompiledTag>,
    decisions: Vec<CompiledTag>,
    abbreviations: Abbreviations,
}

impl TagVocabulary {
    pub fn new(
        definitions: Vec<TagDefinition>,
        abbreviations: Abbreviations,
    ) -> Result<Self, TagError> {
        if definitions.is_empty() {
            return Err(TagError::EmptyVocabulary);
        }

        let mut seen = HashSet::new();
        let mut diseases = Vec::new();
        let mut decisions = Vec::new();
        for definition in definitions {
            if definition.id.trim().is_empty() {
                return Err(TagError::InvalidTag {
                    id: definition.id,
                    reason: "empty id".to_string(),
                });
            }
            if !seen.insert(definition.id.clone()) {
                return Err(TagError::DuplicateTag(definition.id));
            }
            let compiled = CompiledTag::compile(definition)?;
            match compiled.kind() {
                TagKind::Disease => diseases.push(compiled),
                TagKind::Decision => decisions.push(compiled),
            }
        }

        Ok(Self {
            diseases,
            decisions,
            abbreviations,
        })
    }

    /// The curated vocabulary shipped with the crate.
    pub fn builtin() -> Result<Self, TagError> {
        Self::new(
            builtin::tag_definitions(),
            Abbreviations::new(builtin::abbreviation_table())?,
        )
    }

    /// Parse a vocabulary override:
    /// `{"tags": [{"id", "label", "kind", "triggers", "domain"?}], "abbreviations": {..}}`.
    pub fn from_json(json: &str) -> Result<Self, TagError> {
        let file: VocabularyFile = serde_json::from_str(json)?;
        Self::new(file.tags, Abbreviations::new(file.abbreviations)?)
    }

    pub fn diseases(&self) -> &[CompiledTag] {
        &self.diseases
    }

    pub fn decisions(&self) -> &[CompiledTag] {
        &self.decisions
    }

    pub fn len(&self) -> usize {
        self.diseases.len() + self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&CompiledTag> {
        self.diseases
            .iter()
            .chain(&self.decisions)
            .find(|t| t.id() == id)
    }

    /// Expand abbreviations so trigger phrases can match.
    pub fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.abbreviations.expand(text)
    }

    /// Whether tag `id` fires on already-expanded `text`. Unknown ids never match.
    pub fn tag_in(&self, id: &str, expanded: &str) -> bool {
        self.get(id).is_some_and(|t| t.is_match(expanded))
    }

    /// Whether any of `ids` fires on already-expanded `text`.
    pub fn any_tag_in(&self, ids: &[String], expanded: &str) -> bool {
        ids.iter().any(|id| self.tag_in(id, expanded))
    }

    /// True when any disease tag in `tags` belongs to the trauma domain.
    pub fn is_trauma(&self, tags: &TagSet) -> bool {
        tags.disease_tags().iter().any(|id| {
            self.get(id)
                .is_some_and(|t| t.domain() == ClinicalDomain::Trauma)
        })
    }
}
