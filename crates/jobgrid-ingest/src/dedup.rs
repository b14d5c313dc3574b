//! First-seen deduplication across the pages and titles of one
//! ingestion run.

use std::collections::HashSet;

use jobgrid_core::{RawJob, NOT_AVAILABLE};

/// Dedup key: the upstream id when stable, else title + company.
pub fn dedup_key(raw: &RawJob) -> String {
    let id = raw.id.trim();
    if !id.is_empty() && id != NOT_AVAILABLE {
        id.to_string()
    } else {
        format!("{}|{}", raw.title, raw.company)
    }
}

/// Keeps the first occurrence of each key; a record once kept is never
/// replaced by a later duplicate, whatever its field values.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the record is new and should be kept.
    pub fn keep(&mut self, raw: &RawJob) -> bool {
        self.seen.insert(dedup_key(raw))
    }

    /// Filter a batch, preserving first-seen order.
    pub fn retain(&mut self, jobs: Vec<RawJob>) -> Vec<RawJob> {
        jobs.into_iter().filter(|job| self.keep(job)).collect()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, title: &str, company: &str) -> RawJob {
        RawJob {
            id: id.into(),
            title: title.into(),
            company: company.into(),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_ids_collapse_to_first_seen() {
        let jobs = vec![
            job("1", "Engineer A", "Acme"),
            job("2", "Engineer B", "Acme"),
            job("3", "Engineer C", "Acme"),
            job("2", "Engineer B (repost)", "Acme"),
            job("4", "Engineer D", "Acme"),
        ];
        let kept = Deduplicator::new().retain(jobs);
        assert_eq!(kept.len(), 4);
        let titles: Vec<_> = kept.iter().map(|j| j.title.as_str()).collect();
        // First-seen order, and the repost never replaces the original.
        assert_eq!(titles, vec!["Engineer A", "Engineer B", "Engineer C", "Engineer D"]);
    }

    #[test]
    fn records_without_ids_key_on_title_and_company() {
        let jobs = vec![
            job("", "Platform Engineer", "Acme"),
            job("", "Platform Engineer", "Acme"),
            job("", "Platform Engineer", "Globex"),
            job("N/A", "Platform Engineer", "Acme"),
        ];
        let kept = Deduplicator::new().retain(jobs);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn state_carries_across_batches() {
        let mut dedup = Deduplicator::new();
        let first = dedup.retain(vec![job("7", "SRE", "Acme")]);
        assert_eq!(first.len(), 1);
        let second = dedup.retain(vec![job("7", "SRE", "Acme"), job("8", "SWE", "Acme")]);
        assert_eq!(second.len(), 1);
        assert_eq!(dedup.seen_count(), 2);
    }
}
