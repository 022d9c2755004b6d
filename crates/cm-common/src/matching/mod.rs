pub mod aggregate;
pub mod score;

pub use aggregate::{
    best_matches_for_recruiter, match_cv_with_job, rank_cvs_for_job, rank_jobs_for_seeker,
};
pub use score::{calculate_match, MatchResult};
