//! Leading-journal recognition.

/// `(normalised journal name, badge)`. Names match whole, so sister
/// titles ("BMJ Open", "Lancet Oncology") get no badge.
const LEADING_JOURNALS: &[(&str, &str)] = &[
    ("new england journal of medicine", "NEJM"),
    ("n engl j med", "NEJM"),
    ("nejm", "NEJM"),
    ("lancet", "Lancet"),
    ("jama", "JAMA"),
    ("journal of the american medical association", "JAMA"),
    ("bmj", "BMJ"),
    ("british medical journal", "BMJ"),
    ("annals of internal medicine", "Ann Intern Med"),
    ("ann intern med", "Ann Intern Med"),
    ("nature medicine", "Nat Med"),
    ("nat med", "Nat Med"),
    ("circulation", "Circulation"),
    ("european heart journal", "Eur Heart J"),
    ("eur heart j", "Eur Heart J"),
    ("journal of the american college of cardiology", "JACC"),
    ("j am coll cardiol", "JACC"),
    ("cochrane database of systematic reviews", "Cochrane"),
    ("cochrane database syst rev", "Cochrane"),
    ("kidney international", "Kidney Int"),
    ("kidney int", "Kidney Int"),
    ("diabetes care", "Diabetes Care"),
];

/// Lowercase, drop a trailing parenthetical and a leading "the", and turn
/// punctuation into single spaces: "The Lancet", "Lancet (London, England)"
/// and "LANCET" all become "lancet".
fn normalise(journal: &str) -> String {
    let journal = journal.split('(').next().unwrap_or_default().to_lowercase();
    let words: Vec<&str> = journal
        .split(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ':' | ';'))
        .filter(|w| !w.is_empty())
        .collect();
    let words = match words.split_first() {
        Some((&"the", rest)) => rest,
        _ => &words[..],
    };
    words.join(" ")
}

/// Short badge for a leading journal, matched case-insensitively on the
/// whole name.
pub fn journal_badge(journal: &str) -> Option<&'static str> {
    let name = normalise(journal);
    LEADING_JOURNALS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, badge)| *badge)
}
