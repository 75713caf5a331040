//! Built-in tag vocabulary, abbreviation table and scenario catalog.
//!
//! Hand-curated. Trigger phrases are matched as case-insensitive
//! substrings of the abbreviation-expanded query, so they are written as
//! long forms or distinctive stems ("anticoagula").

use std::collections::BTreeMap;

use evidex_core::models::scenario::{AnchorScenario, ClinicalDomain};
use evidex_core::models::tags::TagKind;

use crate::vocabulary::TagDefinition;

type Row = (&'static str, &'static str, &'static [&'static str]);

const DISEASES: &[Row] = &[
    ("af", "Atrial fibrillation", &["atrial fibrillation", "atrial flutter", "afib", "a-fib"]),
    (
        "ckd",
        "Chronic kidney disease",
        &[
            "chronic kidney disease",
            "kidney disease",
            "renal impairment",
            "renal insufficiency",
            "renal failure",
            "end-stage renal",
            "dialysis",
            "creatinine clearance",
            "egfr",
        ],
    ),
    (
        "heart_failure",
        "Heart failure",
        &["heart failure", "cardiac failure", "reduced ejection fraction", "preserved ejection fraction", "cardiomyopathy"],
    ),
    (
        "type2_diabetes",
        "Type 2 diabetes",
        &["type 2 diabetes", "type ii diabetes", "diabetes mellitus", "diabetic", "diabetes"],
    ),
    ("hypertension", "Hypertension", &["hypertension", "high blood pressure", "elevated blood pressure"]),
    (
        "copd",
        "Chronic obstructive pulmonary disease",
        &["chronic obstructive pulmonary disease", "emphysema", "chronic bronchitis"],
    ),
    ("asthma", "Asthma", &["asthma"]),
    ("pneumonia", "Pneumonia", &["pneumonia", "lower respiratory tract infection"]),
    ("sepsis", "Sepsis", &["sepsis", "septic shock", "bacteremia", "bacteraemia"]),
    (
        "vte",
        "Venous thromboembolism",
        &["venous thromboembolism", "deep vein thrombosis", "deep venous thrombosis", "pulmonary embolism"],
    ),
    (
        "acs",
        "Acute coronary syndrome",
        &["acute coronary syndrome", "myocardial infarction", "nstemi", "stemi", "unstable angina", "coronary artery disease"],
    ),
    ("stroke", "Stroke", &["stroke", "transient ischemic attack", "transient ischaemic attack", "cerebrovascular"]),
    ("pregnancy", "Pregnancy", &["pregnancy", "pregnant", "postpartum", "gestation"]),
    ("cirrhosis", "Cirrhosis", &["cirrhosis", "chronic liver disease"]),
    ("osteoporosis", "Osteoporosis", &["osteoporosis", "osteopenia", "bone mineral density"]),
    (
        "hip_fracture",
        "Hip fracture",
        &["hip fracture", "femoral neck fracture", "neck of femur", "intertrochanteric", "proximal femur fracture"],
    ),
    ("fracture", "Fracture", &["fracture", "broken bone"]),
    ("trauma", "Trauma", &["trauma", "dislocation", "sprain"]),
];

/// Disease tags whose queries fall under the trauma/orthopaedic rules.
const TRAUMA_DISEASES: &[&str] = &["hip_fracture", "fracture", "trauma"];

const DECISIONS: &[Row] = &[
    (
        "anticoagulation",
        "Anticoagulation",
        &[
            "anticoagula",
            "direct oral anticoagulant",
            "warfarin",
            "apixaban",
            "rivaroxaban",
            "edoxaban",
            "dabigatran",
            "heparin",
            "enoxaparin",
            "blood thinner",
        ],
    ),
    (
        "antiplatelet",
        "Antiplatelet therapy",
        &["antiplatelet", "aspirin", "clopidogrel", "ticagrelor", "prasugrel"],
    ),
    ("dosing", "Dosing", &["dose", "dosing", "dosage", "titrat"]),
    (
        "treatment_choice",
        "Treatment choice",
        &["first-line", "first line", "treatment", "therapy", "management", "drug of choice", "initiat"],
    ),
    ("screening", "Screening", &["screening", "screen for"]),
    ("diagnosis", "Diagnosis", &["diagnosis", "diagnose", "diagnostic", "workup", "work-up"]),
    (
        "surgery_timing",
        "Timing of surgery",
        &[
            "timing of surgery",
            "time to surgery",
            "surgery within",
            "early surgery",
            "delay surgery",
            "delayed surgery",
            "surgical delay",
            "when to operate",
        ],
    ),
    ("imaging", "Imaging", &["imaging", "x-ray", "radiograph", "ct scan", "mri", "ultrasound"]),
    ("duration", "Duration of therapy", &["duration", "how long", "length of therapy", "extended therapy"]),
    ("rate_control", "Rate control", &["rate control", "beta blocker", "beta-blocker", "digoxin", "diltiazem"]),
    (
        "rhythm_control",
        "Rhythm control",
        &["rhythm control", "cardioversion", "ablation", "amiodarone", "antiarrhythmic"],
    ),
    (
        "glycemic_control",
        "Glycemic control",
        &["glycemic control", "glycaemic control", "hba1c", "glucose-lowering", "glucose lowering", "metformin", "insulin", "sglt2", "glp-1"],
    ),
    (
        "bp_target",
        "Blood pressure target",
        &["blood pressure target", "bp target", "target blood pressure", "systolic target", "intensive blood pressure"],
    ),
    (
        "antibiotic_choice",
        "Antibiotic choice",
        &["antibiotic", "antimicrobial", "amoxicillin", "ceftriaxone", "azithromycin", "doxycycline"],
    ),
];

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("AF", "atrial fibrillation"),
    ("ACS", "acute coronary syndrome"),
    ("BP", "blood pressure"),
    ("CAD", "coronary artery disease"),
    ("CAP", "community-acquired pneumonia"),
    ("CKD", "chronic kidney disease"),
    ("COPD", "chronic obstructive pulmonary disease"),
    ("DAPT", "dual antiplatelet therapy"),
    ("DM", "diabetes mellitus"),
    ("DOAC", "direct oral anticoagulant"),
    ("DVT", "deep vein thrombosis"),
    ("ESKD", "end-stage renal disease"),
    ("ESRD", "end-stage renal disease"),
    ("HF", "heart failure"),
    ("HFpEF", "heart failure with preserved ejection fraction"),
    ("HFrEF", "heart failure with reduced ejection fraction"),
    ("HTN", "hypertension"),
    ("LMWH", "low molecular weight heparin"),
    ("MI", "myocardial infarction"),
    ("NOAC", "non-vitamin K oral anticoagulant"),
    ("NOF", "neck of femur"),
    ("PE", "pulmonary embolism"),
    ("T2D", "type 2 diabetes"),
    ("T2DM", "type 2 diabetes"),
    ("TIA", "transient ischemic attack"),
    ("VTE", "venous thromboembolism"),
];

type ScenarioRow = (
    &'static str,
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    ClinicalDomain,
);

const SCENARIOS: &[ScenarioRow] = &[
    (
        "af_ckd_anticoagulation",
        "Anticoagulation in atrial fibrillation with chronic kidney disease",
        &["af", "ckd"],
        &["anticoagulation", "dosing"],
        ClinicalDomain::General,
    ),
    (
        "af_acs_antithrombotic",
        "Antithrombotic therapy in atrial fibrillation with acute coronary syndrome",
        &["af", "acs"],
        &["anticoagulation", "antiplatelet"],
        ClinicalDomain::General,
    ),
    (
        "hf_ckd_therapy",
        "Heart failure therapy in chronic kidney disease",
        &["heart_failure", "ckd"],
        &["treatment_choice", "dosing"],
        ClinicalDomain::General,
    ),
    (
        "diabetes_ckd_glycemic",
        "Glucose-lowering therapy in type 2 diabetes with chronic kidney disease",
        &["type2_diabetes", "ckd"],
        &["glycemic_control", "treatment_choice"],
        ClinicalDomain::General,
    ),
    (
        "vte_pregnancy_anticoagulation",
        "Anticoagulation for venous thromboembolism in pregnancy",
        &["vte", "pregnancy"],
        &["anticoagulation", "dosing"],
        ClinicalDomain::General,
    ),
    (
        "hip_fracture_anticoagulated_surgery",
        "Surgical timing for hip fracture in anticoagulated atrial fibrillation",
        &["hip_fracture", "af"],
        &["surgery_timing", "anticoagulation"],
        ClinicalDomain::Trauma,
    ),
    (
        "af_anticoagulation",
        "Stroke prevention anticoagulation in atrial fibrillation",
        &["af"],
        &["anticoagulation", "dosing"],
        ClinicalDomain::General,
    ),
    (
        "af_rate_rhythm",
        "Rate versus rhythm control in atrial fibrillation",
        &["af"],
        &["rate_control", "rhythm_control"],
        ClinicalDomain::General,
    ),
    (
        "hip_fracture_surgery_timing",
        "Timing of surgery for hip fracture",
        &["hip_fracture"],
        &["surgery_timing"],
        ClinicalDomain::Trauma,
    ),
    (
        "fracture_imaging",
        "Imaging work-up of suspected fracture",
        &["fracture"],
        &["imaging", "diagnosis"],
        ClinicalDomain::Trauma,
    ),
    (
        "vte_treatment",
        "Treatment and duration of anticoagulation for venous thromboembolism",
        &["vte"],
        &["anticoagulation", "duration"],
        ClinicalDomain::General,
    ),
    (
        "cap_antibiotics",
        "Empirical antibiotics for community-acquired pneumonia",
        &["pneumonia"],
        &["antibiotic_choice"],
        ClinicalDomain::General,
    ),
    (
        "hypertension_bp_target",
        "Blood pressure targets in hypertension",
        &["hypertension"],
        &["bp_target", "treatment_choice"],
        ClinicalDomain::General,
    ),
    (
        "diabetes_glycemic",
        "Glycemic control in type 2 diabetes",
        &["type2_diabetes"],
        &["glycemic_control"],
        ClinicalDomain::General,
    ),
];

pub fn tag_definitions() -> Vec<TagDefinition> {
    let build = |rows: &[Row], kind: TagKind| -> Vec<TagDefinition> {
        rows.iter()
            .map(|(id, label, triggers)| TagDefinition {
                id: id.to_string(),
                label: label.to_string(),
                kind,
                triggers: triggers.iter().map(|t| t.to_string()).collect(),
                domain: if TRAUMA_DISEASES.contains(id) {
                    ClinicalDomain::Trauma
                } else {
                    ClinicalDomain::General
                },
            })
            .collect()
    };
    let mut defs = build(DISEASES, TagKind::Disease);
    defs.extend(build(DECISIONS, TagKind::Decision));
    defs
}

pub fn abbreviation_table() -> BTreeMap<String, String> {
    ABBREVIATIONS
        .iter()
        .map(|(abbr, long)| (abbr.to_string(), long.to_string()))
        .collect()
}

pub fn scenarios() -> Vec<AnchorScenario> {
    SCENARIOS
        .iter()
        .map(|(id, name, diseases, decisions, domain)| AnchorScenario {
            id: id.to_string(),
            name: name.to_string(),
            disease_tags: diseases.iter().map(|d| d.to_string()).collect(),
            decision_tags: decisions.iter().map(|d| d.to_string()).collect(),
            domain: *domain,
        })
        .collect()
}
