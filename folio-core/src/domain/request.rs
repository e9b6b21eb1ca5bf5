//! Report request domain type

use serde::Serialize;

/// Ordered, de-duplicated set of encounter identifiers to render into one report
///
/// Never empty. Serializes as a plain JSON array of strings, which is the body
/// the submit endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportRequest {
    encounter_ids: Vec<String>,
}

impl ReportRequest {
    /// Builds a request from raw encounter ids
    ///
    /// Ids are trimmed; blank ids and repeats are dropped while first-seen
    /// order is kept. Returns `None` when nothing usable remains.
    pub fn new<I, S>(ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut encounter_ids: Vec<String> = Vec::new();

        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() || encounter_ids.iter().any(|seen| seen == id) {
                continue;
            }
            encounter_ids.push(id.to_string());
        }

        if encounter_ids.is_empty() {
            None
        } else {
            Some(Self { encounter_ids })
        }
    }

    pub fn encounter_ids(&self) -> &[String] {
        &self.encounter_ids
    }

    pub fn len(&self) -> usize {
        self.encounter_ids.len()
    }

    /// Always false; kept alongside `len` for API symmetry
    pub fn is_empty(&self) -> bool {
        self.encounter_ids.is_empty()
    }
}
