//! Page contexts for the home, repository and redirect views.
//!
//! Each view returns a serializable context for the template layer, or
//! [`Error::NotFound`].

use serde::Serialize;

use crate::context::{AppContext, ReducedSettings};
use crate::travis::{CiClient, Repo, RepoLookup};
use crate::Error;

/// Query parameter the home page form submits the repository slug under.
pub const REDIRECT_PARAM: &str = "repo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomePage {
    pub headline: &'static str,
    #[serde(rename = "REDIRECT_PARAM")]
    pub redirect_param: &'static str,
    pub settings: ReducedSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoPage {
    pub headline: String,
    pub repo_slug: String,
    pub repo: Repo,
    pub settings: ReducedSettings,
}

/// A temporary redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: String,
    pub permanent: bool,
}

pub fn home(ctx: &AppContext) -> HomePage {
    HomePage {
        headline: "Home",
        redirect_param: REDIRECT_PARAM,
        settings: ctx.reduced_settings(),
    }
}

/// Fetches `repo_slug` through `client`; any failure is [`Error::NotFound`].
pub fn repo_page(
    ctx: &AppContext,
    client: &dyn CiClient,
    repo_slug: &str,
) -> Result<RepoPage, Error> {
    let lookup = RepoLookup::new(client, repo_slug);
    let repo = lookup.repo()?.clone();

    Ok(RepoPage {
        headline: repo_slug.to_string(),
        repo_slug: repo_slug.to_string(),
        repo,
        settings: ctx.reduced_settings(),
    })
}

/// Turns the `repo` query value into a redirect to that repository's page.
pub fn redirect(repo_param: Option<&str>) -> Result<Redirect, Error> {
    let slug = repo_param.map(str::trim).ok_or(Error::NotFound)?;
    Ok(Redirect {
        location: repo_path(slug).ok_or(Error::NotFound)?,
        permanent: false,
    })
}

/// `/owner/name/` for a well-formed slug.
pub fn repo_path(slug: &str) -> Option<String> {
    let (owner, name) = slug.split_once('/')?;
    (is_slug_segment(owner) && is_slug_segment(name)).then(|| format!("/{owner}/{name}/"))
}

fn is_slug_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
