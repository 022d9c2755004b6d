pub mod cvs;
pub mod jobs;
pub mod migrations;
pub mod pool;

// Keep re-exports unique so downstream crates see a single symbol per helper.
pub use cvs::{
    delete_cv, fetch_cv_by_user, fetch_cv_with_owner, list_cvs_with_owners, upsert_cv,
    CvStorageError, CvUpsert,
};
pub use jobs::{
    delete_job, fetch_job, fetch_job_with_recruiter, insert_job, list_jobs, list_recruiter_jobs,
    update_job, JobStorageError, JobUpdate, NewJob,
};
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool_from_url, create_pool_from_url_checked, DbPoolError, PgPool};
