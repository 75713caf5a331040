//! Concept vocabularies for relevance scoring.
//!
//! Broader than the tag vocabulary: these describe what a document is
//! about (diseases, biomarkers, interventions, outcomes) rather than which
//! curated scenario a query belongs to.

use std::collections::BTreeMap;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use serde::Serialize;

use evidex_tags::abbreviations::Abbreviations;
use evidex_tags::builtin::abbreviation_table;

use crate::error::EvidenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    Disease,
    Biomarker,
    Intervention,
    Outcome,
}

impl ConceptKind {
    pub const ALL: [ConceptKind; 4] = [
        ConceptKind::Disease,
        ConceptKind::Biomarker,
        ConceptKind::Intervention,
        ConceptKind::Outcome,
    ];

    /// Points for a concept found in the title or subject headings.
    pub fn title_points(self) -> u32 {
        match self {
            Self::Disease => 20,
            Self::Biomarker => 15,
            Self::Intervention => 10,
            Self::Outcome => 5,
        }
    }

    /// Points for a concept found only in the abstract.
    pub fn abstract_points(self) -> u32 {
        match self {
            Self::Disease => 10,
            Self::Biomarker => 7,
            Self::Intervention => 5,
            Self::Outcome => 2,
        }
    }

    /// Ceiling on the points one kind can contribute.
    pub fn cap(self) -> u32 {
        match self {
            Self::Disease => 40,
            Self::Biomarker => 30,
            Self::Intervention => 20,
            Self::Outcome => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Disease => "disease",
            Self::Biomarker => "biomarker",
            Self::Intervention => "intervention",
            Self::Outcome => "outcome",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Concept {
    id: String,
    kind: ConceptKind,
    matcher: AhoCorasick,
}

impl Concept {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ConceptKind {
        self.kind
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Concepts found in a query, grouped by kind.
#[derive(Debug, Clone, Default)]
pub struct QueryConcepts<'v> {
    by_kind: BTreeMap<ConceptKind, Vec<&'v Concept>>,
}

impl<'v> QueryConcepts<'v> {
    pub fn of_kind(&self, kind: ConceptKind) -> &[&'v Concept] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn ids(&self, kind: ConceptKind) -> Vec<&'v str> {
        self.of_kind(kind).iter().map(|c| c.id()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ConceptVocabulary {
    concepts: Vec<Concept>,
    abbreviations: Abbreviations,
}

type Row = (&'static str, &'static [&'static str]);

const DISEASES: &[Row] = &[
    ("atrial_fibrillation", &["atrial fibrillation", "atrial flutter", "afib"]),
    ("kidney", &["kidney", "renal", "dialysis", "nephropathy"]),
    ("heart_failure", &["heart failure", "ejection fraction", "cardiomyopathy"]),
    ("diabetes", &["diabetes", "diabetic"]),
    ("hypertension", &["hypertension", "high blood pressure"]),
    ("coronary", &["coronary", "myocardial infarction", "angina", "stemi"]),
    ("stroke", &["stroke", "cerebrovascular", "ischemic attack", "ischaemic attack"]),
    ("thromboembolism", &["thromboembolism", "thrombosis", "embolism"]),
    ("pneumonia", &["pneumonia", "respiratory tract infection"]),
    ("sepsis", &["sepsis", "septic"]),
    ("copd", &["obstructive pulmonary", "emphysema"]),
    ("asthma", &["asthma"]),
    ("pregnancy", &["pregnan", "obstetric", "postpartum", "gestation"]),
    ("fracture", &["fracture"]),
    ("hip", &["hip ", "femoral neck", "femur"]),
    ("trauma", &["trauma", "injur"]),
    ("liver", &["cirrhosis", "liver disease", "hepatic"]),
    ("osteoporosis", &["osteoporo", "osteopenia"]),
    ("cancer", &["cancer", "tumor", "tumour", "carcinoma", "malignan"]),
];

const BIOMARKERS: &[Row] = &[
    ("renal_function", &["egfr", "creatinine", "glomerular filtration"]),
    ("troponin", &["troponin"]),
    ("natriuretic_peptide", &["natriuretic peptide", "nt-probnp", "bnp"]),
    ("hba1c", &["hba1c", "glycated hemoglobin", "glycated haemoglobin"]),
    ("inr", &["international normalized ratio", "international normalised ratio", " inr"]),
    ("d_dimer", &["d-dimer", "d dimer"]),
    ("procalcitonin", &["procalcitonin"]),
    ("crp", &["c-reactive protein"]),
    ("cholesterol", &["ldl", "cholesterol"]),
    ("lactate", &["lactate"]),
    ("potassium", &["potassium", "hyperkalemia", "hyperkalaemia"]),
    ("bone_density", &["bone mineral density", "t-score"]),
];

const INTERVENTIONS: &[Row] = &[
    (
        "anticoagulant",
        &["anticoagula", "warfarin", "apixaban", "rivaroxaban", "edoxaban", "dabigatran", "heparin"],
    ),
    ("antiplatelet", &["antiplatelet", "aspirin", "clopidogrel", "ticagrelor", "prasugrel"]),
    ("sglt2_inhibitor", &["sglt2", "sglt-2", "empagliflozin", "dapagliflozin", "canagliflozin"]),
    ("glp1_agonist", &["glp-1", "semaglutide", "liraglutide", "dulaglutide"]),
    ("metformin", &["metformin"]),
    ("insulin", &["insulin"]),
    ("beta_blocker", &["beta blocker", "beta-blocker", "bisoprolol", "metoprolol", "carvedilol"]),
    ("raas_inhibitor", &["ace inhibitor", "angiotensin", "ramipril", "lisinopril", "losartan", "sacubitril"]),
    ("statin", &["statin"]),
    ("antibiotic", &["antibiotic", "antimicrobial", "amoxicillin", "ceftriaxone", "azithromycin", "doxycycline"]),
    ("surgery", &["surgery", "surgical", "arthroplasty", "fixation", "operative"]),
    ("rhythm_procedure", &["ablation", "cardioversion"]),
    ("antiarrhythmic", &["amiodarone", "antiarrhythmic"]),
    ("corticosteroid", &["corticosteroid", "prednisolone", "dexamethasone"]),
];

const OUTCOMES: &[Row] = &[
    ("mortality", &["mortality", "death", "survival"]),
    ("bleeding", &["bleeding", "hemorrhage", "haemorrhage"]),
    ("embolic_events", &["stroke prevention", "systemic embolism", "thromboembolic events"]),
    ("hospitalization", &["hospitalization", "hospitalisation", "readmission"]),
    ("cardiovascular_events", &["cardiovascular events", "major adverse"]),
    ("functional_outcome", &["functional outcome", "mobility", "quality of life"]),
    ("complications", &["complication", "adverse event"]),
];

impl ConceptVocabulary {
    pub fn builtin() -> Result<Self, EvidenceError> {
        let mut concepts = Vec::new();
        for (kind, rows) in [
            (ConceptKind::Disease, DISEASES),
            (ConceptKind::Biomarker, BIOMARKERS),
            (ConceptKind::Intervention, INTERVENTIONS),
            (ConceptKind::Outcome, OUTCOMES),
        ] {
            for (id, terms) in rows {
                concepts.push(Concept {
                    id: id.to_string(),
                    kind,
                    matcher: AhoCorasickBuilder::new()
                        .ascii_case_insensitive(true)
                        .build(terms.iter())?,
                });
            }
        }
        Ok(Self {
            concepts,
            abbreviations: Abbreviations::new(abbreviation_table())?,
        })
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn expand<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        self.abbreviations.expand(text)
    }

    /// Concepts mentioned in `query`.
    pub fn extract(&self, query: &str) -> QueryConcepts<'_> {
        let expanded = self.expand(query);
        let mut by_kind: BTreeMap<ConceptKind, Vec<&Concept>> = BTreeMap::new();
        for concept in &self.concepts {
            if concept.is_match(&expanded) {
                by_kind.entry(concept.kind).or_default().push(concept);
            }
        }
        QueryConcepts { by_kind }
    }
}
