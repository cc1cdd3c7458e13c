use std::cell::OnceCell;

use thiserror::Error;

use super::client::{CiClient, Repo};

/// The repository could not be fetched, for whatever reason.
///
/// Transport failures, bad statuses and decode errors all end up here; the
/// cause is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("repository not found")]
pub struct LookupNotFound;

/// Request-scoped, memoizing fetch of one repository.
///
/// The first call to [`repo`](Self::repo) hits the client; later calls replay
/// the stored outcome, success or failure. Create one per request.
pub struct RepoLookup<'a> {
    client: &'a dyn CiClient,
    slug: &'a str,
    outcome: OnceCell<Option<Repo>>,
}

impl<'a> RepoLookup<'a> {
    pub fn new(client: &'a dyn CiClient, slug: &'a str) -> Self {
        Self {
            client,
            slug,
            outcome: OnceCell::new(),
        }
    }

    pub fn repo(&self) -> Result<&Repo, LookupNotFound> {
        self.outcome
            .get_or_init(|| match self.client.repo(self.slug) {
                Ok(repo) => Some(repo),
                Err(error) => {
                    tracing::debug!(slug = self.slug, %error, "repository lookup failed");
                    None
                }
            })
            .as_ref()
            .ok_or(LookupNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::travis::client::TravisError;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl CiClient for Counting {
        fn repo(&self, slug: &str) -> Result<Repo, TravisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TravisError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }
            Ok(Repo {
                id: 1,
                slug: slug.to_string(),
                description: None,
                active: Some(true),
                github_language: None,
                last_build_id: None,
                last_build_number: None,
                last_build_state: None,
                last_build_duration: None,
                last_build_started_at: None,
                last_build_finished_at: None,
            })
        }
    }

    #[test]
    fn test_success_is_memoized() {
        let client = Counting::new(false);
        let lookup = RepoLookup::new(&client, "a/b");

        assert_eq!(lookup.repo().unwrap().slug, "a/b");
        assert_eq!(lookup.repo().unwrap().slug, "a/b");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_memoized_as_not_found() {
        let client = Counting::new(true);
        let lookup = RepoLookup::new(&client, "a/b");

        assert_eq!(lookup.repo(), Err(LookupNotFound));
        assert_eq!(lookup.repo(), Err(LookupNotFound));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_each_lookup_is_independent() {
        let client = Counting::new(false);
        RepoLookup::new(&client, "a/b").repo().unwrap();
        RepoLookup::new(&client, "a/b").repo().unwrap();
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }
}
