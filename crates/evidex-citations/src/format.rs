//! Reference formatting.
//!
//! One evidence item becomes one [`FormattedReference`]. The link is the
//! first available of pmid, pmcid, doi and a verified guideline URL; an
//! item with none of these cannot be referenced.

use std::sync::LazyLock;

use regex::Regex;

use evidex_core::category;
use evidex_core::links;
use evidex_core::models::evidence::{EvidenceItem, EvidenceKind};
use evidex_core::models::reference::{FormattedReference, QualityBadge};

use crate::error::CitationError;
use crate::journals::journal_badge;

const MAX_AUTHORS: usize = 3;
const ET_AL: &str = "et al.";

static REVIEW_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:systematic(?:ally)?\s+review|meta-?\s?analys[ei]s|umbrella\s+review|pooled\s+analysis)")
        .expect("review title pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    pub current_year: i16,
    /// Publication within this many years earns the recent badge.
    pub recent_years: i16,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            current_year: jiff::Zoned::now().year(),
            recent_years: 3,
        }
    }
}

/// Which link a reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    Pmid,
    Pmcid,
    Doi,
    GuidelineUrl,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceFormatter {
    config: FormatConfig,
}

impl ReferenceFormatter {
    pub fn new(config: FormatConfig) -> Result<Self, CitationError> {
        if config.recent_years < 0 {
            return Err(CitationError::InvalidConfig(format!(
                "recent_years must not be negative, got {}",
                config.recent_years
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> FormatConfig {
        self.config
    }

    /// Format `item`, found in `category`, as reference `number`.
    pub fn format(
        &self,
        number: usize,
        category: &str,
        item: &EvidenceItem,
    ) -> Result<FormattedReference, CitationError> {
        let (url, _) = resolve_link(category, item).ok_or_else(|| CitationError::NoUsableLink {
            title: item.title.clone(),
        })?;

        let journal_badge = item
            .journal
            .as_deref()
            .and_then(journal_badge)
            .map(str::to_string);

        let mut quality_badges = Vec::new();
        if is_guideline(category, item) {
            quality_badges.push(QualityBadge::Guideline);
        }
        if journal_badge.is_some() {
            quality_badges.push(QualityBadge::LeadingJournal);
        }
        if item
            .publication_year
            .is_some_and(|y| y >= self.config.current_year.saturating_sub(self.config.recent_years))
        {
            quality_badges.push(QualityBadge::Recent);
        }
        if REVIEW_TITLE.is_match(&item.title) {
            quality_badges.push(QualityBadge::SystematicReview);
        }

        Ok(FormattedReference {
            number,
            title: item.title.trim().to_string(),
            authors: display_authors(&item.authors),
            journal_badge,
            year: item.publication_year,
            url,
            quality_badges,
        })
    }
}

fn is_guideline(category: &str, item: &EvidenceItem) -> bool {
    item.kind == EvidenceKind::Guideline || category::is_guideline_source(category)
}

/// The URL a reference to `item` would use, with where it came from.
pub fn resolve_link(category: &str, item: &EvidenceItem) -> Option<(String, LinkSource)> {
    let ids = &item.identifiers;
    if let Some(pmid) = ids.pmid() {
        return Some((format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/"), LinkSource::Pmid));
    }
    if let Some(pmcid) = ids.pmcid() {
        let digits = pmcid.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        return Some((
            format!("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC{digits}/"),
            LinkSource::Pmcid,
        ));
    }
    if let Some(doi) = ids.doi() {
        return Some((format!("https://doi.org/{}", bare_doi(doi)), LinkSource::Doi));
    }
    ids.url()
        .filter(|url| is_guideline(category, item) && verified_url(url))
        .map(|url| (url.to_string(), LinkSource::GuidelineUrl))
}

/// An http(s) link that is not a search-engine results page.
pub fn verified_url(url: &str) -> bool {
    links::is_http_url(url) && !links::is_disallowed_url(url)
}

fn bare_doi(doi: &str) -> &str {
    ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "doi:"]
        .iter()
        .find_map(|prefix| doi.strip_prefix(prefix))
        .unwrap_or(doi)
        .trim()
}

fn display_authors(authors: &[String]) -> Vec<String> {
    let mut shown: Vec<String> = authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .take(MAX_AUTHORS + 1)
        .map(str::to_string)
        .collect();
    if shown.len() > MAX_AUTHORS {
        shown.truncate(MAX_AUTHORS);
        shown.push(ET_AL.to_string());
    }
    shown
}
