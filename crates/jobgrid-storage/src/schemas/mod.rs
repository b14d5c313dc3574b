//! Document schemas for the six collections. Each schema owns its
//! index definitions via [`crate::mongo::IntoIndexes`].

mod interaction;
mod job;
mod job_match;
mod saved_search;
mod user;
mod user_stats;

pub use interaction::InteractionDoc;
pub use job::JobDoc;
pub use job_match::{JobMatchDoc, MatchDetails};
pub use saved_search::SavedSearchDoc;
pub use user::{UserDoc, UserPreferences};
pub use user_stats::UserStatsDoc;
