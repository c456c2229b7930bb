//! Human-readable unique codes for professors and cubicles.
//!
//! Professors: the code is derived from the name and suffixed (`-1`, `-2`, ...)
//! on collision. Cubicles: the code is a composite of building, number and
//! floor, and a collision is an error rather than a suffix.

use unicode_normalization::UnicodeNormalization;

use crate::kernel::{BaseDocumentStore, Document, StoreResult};

/// Combining diacritical marks block (U+0300..U+036F)
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Derive a professor code from a name.
///
/// Upper-cases, strips diacritics, drops everything but `A-Z` and whitespace,
/// and joins the remaining words with `-`. `None` when nothing is left.
pub fn professor_code_base(name: &str) -> Option<String> {
    let letters: String = name
        .to_uppercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .filter(|c| c.is_ascii_uppercase() || c.is_whitespace())
        .collect();

    let code = letters.split_whitespace().collect::<Vec<_>>().join("-");
    (!code.is_empty()).then_some(code)
}

/// Composite cubicle code: `{building}-{number}-{floor}`, whitespace runs as `_`, upper-cased
pub fn cubicle_code(building: &str, number: &str, floor: &str) -> String {
    format!("{building}-{number}-{floor}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

/// `base` for attempt 0, `base-N` afterwards
pub fn suffixed(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

/// Claim the first free key among `base`, `base-1`, `base-2`, ...
///
/// Each probe is a conditional create, so concurrent callers never receive
/// the same key. `document_for` builds the document for a candidate key.
pub async fn claim_with_suffix<F>(
    store: &dyn BaseDocumentStore,
    collection: &str,
    base: &str,
    mut document_for: F,
) -> StoreResult<String>
where
    F: FnMut(&str) -> StoreResult<Document> + Send,
{
    let mut attempt = 0;
    loop {
        let candidate = suffixed(base, attempt);
        let document = document_for(&candidate)?;
        if store.create(collection, &candidate, document).await? {
            return Ok(candidate);
        }
        attempt += 1;
    }
}
