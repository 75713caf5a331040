//! Clinical abbreviation expansion.
//!
//! Queries say "AF" and "CKD"; triggers are written as long forms. Each
//! abbreviation is expanded by inserting its long form right after it
//! ("AF" becomes "AF (atrial fibrillation)"), which keeps the relative
//! order of everything in the query and therefore the primary-tag order.
//!
//! Matching is case-insensitive on word boundaries. A few abbreviations are
//! also everyday words; those are left alone when the next word shows the
//! everyday sense ("pe class", "dose cap of").

use std::borrow::Cow;
use std::collections::BTreeMap;

use regex::{Captures, Regex};

use crate::error::TagError;

/// `(abbreviation, next word)` pairs where the abbreviation is not clinical.
const STOP_CONTEXTS: &[(&str, &str)] = &[
    ("pe", "class"),
    ("pe", "lesson"),
    ("pe", "lessons"),
    ("pe", "teacher"),
    ("pe", "kit"),
    ("cap", "of"),
    ("cap", "on"),
    ("cap", "at"),
    ("mi", "casa"),
];

#[derive(Debug, Clone)]
pub struct Abbreviations {
    /// Keyed by lowercase abbreviation.
    expansions: BTreeMap<String, String>,
    pattern: Option<Regex>,
}

impl Abbreviations {
    pub fn new(table: BTreeMap<String, String>) -> Result<Self, TagError> {
        let mut expansions = BTreeMap::new();
        for (abbr, long_form) in table {
            let abbr = abbr.trim().to_lowercase();
            let long_form = long_form.trim().to_string();
            if abbr.is_empty() || long_form.is_empty() {
                continue;
            }
            expansions.insert(abbr, long_form);
        }

        let pattern = build_pattern(expansions.keys())?;
        Ok(Self {
            expansions,
            pattern,
        })
    }

    pub fn empty() -> Self {
        Self {
            expansions: BTreeMap::new(),
            pattern: None,
        }
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }

    /// Expand every known abbreviation in `text`. Borrows when nothing matched.
    pub fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let Some(re) = &self.pattern else {
            return Cow::Borrowed(text);
        };
        if !re.is_match(text) {
            return Cow::Borrowed(text);
        }
        let replaced = re.replace_all(text, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let abbr = &text[whole.clone()];
            let key = abbr.to_lowercase();
            match self.expansions.get(&key) {
                Some(long_form) if !is_stop_context(&key, &text[whole.end..]) => {
                    format!("{abbr} ({long_form})")
                }
                _ => abbr.to_string(),
            }
        });
        Cow::Owned(replaced.into_owned())
    }
}

fn is_stop_context(abbr: &str, rest: &str) -> bool {
    let next: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    STOP_CONTEXTS
        .iter()
        .any(|(a, word)| *a == abbr && *word == next)
}

fn build_pattern<'k>(keys: impl Iterator<Item = &'k String>) -> Result<Option<Regex>, TagError> {
    let mut sorted: Vec<&String> = keys.collect();
    if sorted.is_empty() {
        return Ok(None);
    }
    // Longest first so "HFrEF" wins over a shorter prefix.
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = sorted
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Some(Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?))
}
