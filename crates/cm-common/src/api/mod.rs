pub mod match_response;

pub use match_response::{BestMatch, CvBestMatch, CvMatch, JobMatch};
