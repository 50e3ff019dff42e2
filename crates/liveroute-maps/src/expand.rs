//! Map link expansion.
//!
//! Shortened map links (`maps.app.goo.gl/...`) only reveal their coordinates
//! after redirects are followed. [`LinkExpander`] tries the cheap checks
//! first and falls back to the network:
//!
//! 1. `@lat,lng` in the link itself
//! 2. `@lat,lng` in the URL reached after following redirects
//! 3. a quoted `"lat","lng"` pair in the response body
//! 4. an `ll=lat,lng` query parameter in the final URL

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, redirect};
use tracing::debug;

use crate::Coordinates;
use crate::error::ExpandError;

static AT_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").expect("valid regex"));

static QUOTED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(-?\d{1,3}\.\d{4,})","(-?\d{1,3}\.\d{4,})""#).expect("valid regex")
});

static LL_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]ll=(-?\d+\.\d+),(-?\d+\.\d+)").expect("valid regex"));

fn first_pair(re: &Regex, haystack: &str) -> Option<Coordinates> {
    let caps = re.captures(haystack)?;
    let lat = caps.get(1)?.as_str().parse().ok()?;
    let lng = caps.get(2)?.as_str().parse().ok()?;
    Some(Coordinates::new(lat, lng))
}

/// `@lat,lng` anywhere in a URL.
pub fn coords_after_at(url: &str) -> Option<Coordinates> {
    first_pair(&AT_PAIR, url)
}

/// A quoted coordinate pair embedded in a page body.
pub fn coords_in_body(body: &str) -> Option<Coordinates> {
    first_pair(&QUOTED_PAIR, body)
}

/// An `ll=lat,lng` query parameter.
pub fn coords_in_ll_param(url: &str) -> Option<Coordinates> {
    first_pair(&LL_PARAM, url)
}

/// Settings for [`LinkExpander`].
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// Outcome of expanding a link.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    Found(Coordinates),
    /// Nothing matched; carries the URL the redirects ended on.
    NotFound { final_url: String },
}

/// Follows map links and extracts coordinates.
#[derive(Debug, Clone)]
pub struct LinkExpander {
    http: Client,
}

impl LinkExpander {
    pub fn new(options: ExpandOptions) -> Result<Self, ExpandError> {
        let http = Client::builder()
            .user_agent(options.user_agent)
            .timeout(options.timeout)
            .redirect(redirect::Policy::limited(options.max_redirects))
            .build()?;
        Ok(Self { http })
    }

    /// Resolve a link to coordinates.
    pub async fn expand(&self, url: &str) -> Result<Expansion, ExpandError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExpandError::InvalidInput("Missing url param".to_string()));
        }

        if let Some(coords) = coords_after_at(url) {
            debug!(%coords, "Coordinates found in link");
            return Ok(Expansion::Found(coords));
        }

        // Non-2xx pages still get scanned; some map hosts return the pair in
        // an error page.
        let response = self.http.get(url).send().await?;
        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!(%final_url, body_len = body.len(), "Followed link");

        let found = coords_after_at(&final_url)
            .or_else(|| coords_in_body(&body))
            .or_else(|| coords_in_ll_param(&final_url));

        Ok(match found {
            Some(coords) => Expansion::Found(coords),
            None => {
                debug!(%final_url, "No coordinates in expanded link");
                Expansion::NotFound { final_url }
            }
        })
    }
}
