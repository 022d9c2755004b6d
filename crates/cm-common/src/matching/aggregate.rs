//! Collection-level match operations. These are pure functions over
//! snapshots the storage layer has already fetched; every sort uses
//! `Vec::sort_by`, which is stable, so equal scores keep their input order.

use crate::api::match_response::{BestMatch, CvBestMatch, CvMatch, JobMatch};
use crate::matching::score::{calculate_match, MatchResult};
use crate::{CvRecord, CvWithOwner, JobRecord, JobWithRecruiter};

/// One CV against one job.
pub fn match_cv_with_job(cv: &CvRecord, job: &JobRecord) -> MatchResult {
    calculate_match(&cv.extracted_skills, &job.required_skills)
}

/// Seeker view: every job in the system scored against the seeker's CV,
/// highest percentage first.
pub fn rank_jobs_for_seeker(cv: &CvRecord, jobs: Vec<JobWithRecruiter>) -> Vec<JobMatch> {
    let mut ranked: Vec<JobMatch> = jobs
        .into_iter()
        .map(|job| {
            let result = calculate_match(&cv.extracted_skills, &job.job.required_skills);
            JobMatch { job, result }
        })
        .collect();

    ranked.sort_by(|a, b| b.result.match_percentage.cmp(&a.result.match_percentage));
    ranked
}

/// Recruiter view: every stored CV scored against one job, highest
/// percentage first.
pub fn rank_cvs_for_job(job: &JobRecord, cvs: Vec<CvWithOwner>) -> Vec<CvMatch> {
    let mut ranked: Vec<CvMatch> = cvs
        .into_iter()
        .map(|entry| {
            let result = calculate_match(&entry.cv.extracted_skills, &job.required_skills);
            CvMatch::new(entry, result)
        })
        .collect();

    ranked.sort_by(|a, b| b.result.match_percentage.cmp(&a.result.match_percentage));
    ranked
}

/// Recruiter dashboard: for every stored CV, the best match among the
/// recruiter's own jobs. A recruiter without jobs gets an empty collection,
/// not an error. The best match is selected by strict `>` replacement, so on
/// a tie the job encountered first in enumeration order wins.
pub fn best_matches_for_recruiter(
    cvs: Vec<CvWithOwner>,
    recruiter_jobs: &[JobRecord],
) -> Vec<CvBestMatch> {
    if recruiter_jobs.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<CvBestMatch> = cvs
        .into_iter()
        .map(|entry| {
            let mut best = BestMatch::default();
            for job in recruiter_jobs {
                let result = calculate_match(&entry.cv.extracted_skills, &job.required_skills);
                if result.match_percentage > best.match_percentage {
                    best = BestMatch {
                        match_percentage: result.match_percentage,
                        job_id: job.id,
                        job_title: job.title.clone(),
                    };
                }
            }
            CvBestMatch::new(entry, best)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.best_match
            .match_percentage
            .cmp(&a.best_match.match_percentage)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{CvOwner, RecruiterInfo};

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn cv(id: i32, extracted: &[&str]) -> CvRecord {
        CvRecord {
            id,
            user_id: id,
            file_name: format!("cv-{id}.pdf"),
            file_path: format!("/uploads/cv-{id}.pdf"),
            extracted_skills: skills(extracted),
            education: "Not specified".into(),
            experience: "Not specified".into(),
            raw_text: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cv_with_owner(id: i32, extracted: &[&str]) -> CvWithOwner {
        CvWithOwner {
            cv: cv(id, extracted),
            owner: CvOwner {
                id,
                name: format!("user-{id}"),
                email: format!("user-{id}@example.com"),
            },
        }
    }

    fn job(id: i32, title: &str, required: &[&str]) -> JobRecord {
        JobRecord {
            id,
            recruiter_id: 99,
            title: title.to_string(),
            description: String::new(),
            required_skills: skills(required),
            experience: "2 years".into(),
            education: "degree".into(),
            created_at: Utc::now(),
        }
    }

    fn job_with_recruiter(id: i32, title: &str, required: &[&str]) -> JobWithRecruiter {
        JobWithRecruiter {
            job: job(id, title, required),
            recruiter: RecruiterInfo {
                id: 99,
                name: "recruiter".into(),
                company: "ACME".into(),
            },
        }
    }

    #[test]
    fn seeker_ranking_sorts_descending() {
        let seeker = cv(1, &["python", "docker"]);
        let jobs = vec![
            job_with_recruiter(1, "low", &["Go", "Rust"]),
            job_with_recruiter(2, "high", &["Python", "Docker"]),
            job_with_recruiter(3, "mid", &["Python", "Rust"]),
        ];

        let ranked = rank_jobs_for_seeker(&seeker, jobs);
        let ids: Vec<i32> = ranked.iter().map(|m| m.job.job.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(ranked[0].result.match_percentage, 100);
        assert_eq!(ranked[2].result.match_percentage, 0);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let seeker = cv(1, &["python"]);
        let jobs = vec![
            job_with_recruiter(10, "first", &["Python", "Go"]),
            job_with_recruiter(11, "second", &["Python", "Rust"]),
            job_with_recruiter(12, "third", &["Python"]),
        ];

        let ranked = rank_jobs_for_seeker(&seeker, jobs);
        let ids: Vec<i32> = ranked.iter().map(|m| m.job.job.id).collect();
        // 12 scores 100; 10 and 11 both score 50 and must keep input order.
        assert_eq!(ids, vec![12, 10, 11]);
    }

    #[test]
    fn recruiter_view_attaches_owner_metadata() {
        let target = job(7, "backend", &["Rust", "Postgresql"]);
        let cvs = vec![
            cv_with_owner(1, &["rust", "postgresql"]),
            cv_with_owner(2, &["html"]),
        ];

        let ranked = rank_cvs_for_job(&target, cvs);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].cv_id, 1);
        assert_eq!(ranked[0].user_email, "user-1@example.com");
        assert_eq!(ranked[0].result.match_percentage, 100);
        assert_eq!(ranked[1].result.missing_skills, skills(&["Rust", "Postgresql"]));
    }

    #[test]
    fn recruiter_without_jobs_gets_empty_dashboard() {
        let cvs = vec![cv_with_owner(1, &["python"]), cv_with_owner(2, &["go"])];
        assert!(best_matches_for_recruiter(cvs, &[]).is_empty());
    }

    #[test]
    fn best_match_prefers_first_job_on_tie() {
        let jobs = vec![
            job(1, "first", &["Python", "Go"]),
            job(2, "second", &["Python", "Rust"]),
        ];
        let cvs = vec![cv_with_owner(5, &["python"])];

        let ranked = best_matches_for_recruiter(cvs, &jobs);
        // Both jobs score 50; the strict > replacement keeps job 1.
        assert_eq!(ranked[0].best_match.job_id, 1);
        assert_eq!(ranked[0].best_match.job_title, "first");
        assert_eq!(ranked[0].best_match.match_percentage, 50);
    }

    #[test]
    fn zero_scores_leave_the_default_best_match() {
        let jobs = vec![job(1, "first", &["Cobol"])];
        let cvs = vec![cv_with_owner(5, &["python"])];

        let ranked = best_matches_for_recruiter(cvs, &jobs);
        assert_eq!(ranked[0].best_match, BestMatch::default());
    }

    #[test]
    fn dashboard_sorts_by_best_percentage() {
        let jobs = vec![
            job(1, "python shop", &["Python"]),
            job(2, "ops", &["Docker", "Kubernetes"]),
        ];
        let cvs = vec![
            cv_with_owner(1, &["docker"]),
            cv_with_owner(2, &["python"]),
            cv_with_owner(3, &[]),
        ];

        let ranked = best_matches_for_recruiter(cvs, &jobs);
        let ids: Vec<i32> = ranked.iter().map(|m| m.cv_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(ranked[0].best_match.match_percentage, 100);
        assert_eq!(ranked[1].best_match.match_percentage, 50);
        assert_eq!(ranked[2].best_match.match_percentage, 0);
    }
}
