//! Repository status from Travis CI.

mod client;
mod lookup;

pub use client::{CiClient, Repo, TravisClient, TravisError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use lookup::{LookupNotFound, RepoLookup};

impl From<LookupNotFound> for crate::Error {
    fn from(_: LookupNotFound) -> Self {
        crate::Error::NotFound
    }
}
