pub mod interactions;
pub mod job_matches;
pub mod jobs;
pub mod saved_searches;
pub mod user_stats;
pub mod users;
