//! The eight job-board sources and the name-based registry.

mod adzuna;
mod arbeitnow;
mod jobicy;
mod muse;
mod remoteok;
mod remotive;
mod serpapi;
mod usajobs;

pub use adzuna::Adzuna;
pub use arbeitnow::Arbeitnow;
pub use jobicy::Jobicy;
pub use muse::TheMuse;
pub use remoteok::RemoteOk;
pub use remotive::Remotive;
pub use serpapi::SerpApi;
pub use usajobs::UsaJobs;

use serde_json::Value as JsonValue;

use crate::JobSource;

/// Pull a named array out of a response body; tolerates a missing or
/// non-array field by returning no records.
pub(crate) fn array_field(body: &JsonValue, key: &str) -> Vec<JsonValue> {
    body.get(key)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

/// Look up a source by label, case-insensitively.
pub fn source_by_name(name: &str) -> Option<Box<dyn JobSource>> {
    match name.to_lowercase().as_str() {
        "adzuna" => Some(Box::new(Adzuna)),
        "arbeitnow" => Some(Box::new(Arbeitnow)),
        "jobicy" => Some(Box::new(Jobicy)),
        "themuse" | "muse" | "the muse" => Some(Box::new(TheMuse)),
        "remoteok" => Some(Box::new(RemoteOk)),
        "remotive" => Some(Box::new(Remotive)),
        "serpapi" => Some(Box::new(SerpApi)),
        "usajobs" => Some(Box::new(UsaJobs)),
        _ => None,
    }
}

/// Every registered source, in a stable order.
pub fn all_sources() -> Vec<Box<dyn JobSource>> {
    vec![
        Box::new(Adzuna),
        Box::new(Arbeitnow),
        Box::new(Jobicy),
        Box::new(TheMuse),
        Box::new(RemoteOk),
        Box::new(Remotive),
        Box::new(SerpApi),
        Box::new(UsaJobs),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_all_labels() {
        for label in [
            "Adzuna",
            "Arbeitnow",
            "Jobicy",
            "TheMuse",
            "RemoteOK",
            "Remotive",
            "SerpAPI",
            "USAJobs",
        ] {
            let source = source_by_name(label);
            assert!(source.is_some(), "no source registered for {label}");
        }
        assert!(source_by_name("linkedin").is_none());
        assert_eq!(all_sources().len(), 8);
    }
}
