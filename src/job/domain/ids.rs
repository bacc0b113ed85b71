//! Identifier types for the job domain.

use crate::identifiers::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for a recurring job.
    JobId
}
