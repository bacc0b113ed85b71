//! Domain model for recurring jobs.
//!
//! Jobs decide on their own whether they are due for a given date; category
//! membership is either declared on the job or inferred from its name by
//! [`CategoryKeywords`].

mod category;
mod error;
mod ids;
mod job;

pub use category::{CategoryKeywords, JobCategory};
pub use error::{JobDomainError, ParseJobCategoryError, ParseJobStatusError};
pub use ids::JobId;
pub use job::{Job, JobStatus, PersistedJobData};
