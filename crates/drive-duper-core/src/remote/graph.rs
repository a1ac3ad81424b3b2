//! Microsoft Graph drive search.
//!
//! Uses the signed-in user's drive search endpoint
//! (`/me/drive/root/search(q='...')`). Only `name`, `id`, `size` and the `file`
//! facet (which carries `hashes`) are selected. Acquiring the bearer token is
//! outside this crate; it arrives ready-made through configuration.

use super::{RemoteHashes, RemoteItem, SearchBackend};
use crate::config::AppConfig;
use crate::error::Error;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::{debug, trace};

/// Everything except RFC 3986 unreserved characters is escaped.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SELECT_FIELDS: &str = "name,id,size,file";

pub struct GraphSearch {
    agent: ureq::Agent,
    api_base: String,
    access_token: String,
}

impl GraphSearch {
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let access_token = config
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingAccessToken)?
            .to_string();

        Ok(Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: config.graph_api_base.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Override the API base URL (for tests or national clouds).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn search_url(&self, file_name: &str) -> String {
        let encoded = utf8_percent_encode(file_name, QUERY_ENCODE_SET);
        format!(
            "{}/me/drive/root/search(q='{}')?select={}",
            self.api_base, encoded, SELECT_FIELDS
        )
    }

    fn fetch_page(&self, url: &str) -> Result<SearchPage, Error> {
        trace!("GET {}", url);
        let body = self
            .agent
            .get(url)
            .header("Authorization", &format!("Bearer {}", self.access_token))
            .header("Accept", "application/json")
            .call()?
            .body_mut()
            .read_to_string()?;

        parse_page(&body)
    }
}

impl SearchBackend for GraphSearch {
    fn search(&self, file_name: &str) -> Result<Vec<RemoteItem>, Error> {
        let items = collect_pages(self.search_url(file_name), |url| self.fetch_page(url))?;
        debug!("Search for '{}' returned {} item(s)", file_name, items.len());
        Ok(items)
    }
}

/// Fetch `first_url` and every `@odata.nextLink` after it, concatenating the
/// items in page order. A link that points back at the page just fetched ends
/// the walk.
fn collect_pages<F>(first_url: String, mut fetch: F) -> Result<Vec<RemoteItem>, Error>
where
    F: FnMut(&str) -> Result<SearchPage, Error>,
{
    let mut url = first_url;
    let mut items = Vec::new();

    loop {
        let page = fetch(&url)?;
        items.extend(page.value.into_iter().map(RemoteItem::from));

        match page.next_link {
            Some(next) if next != url => url = next,
            _ => break,
        }
    }

    Ok(items)
}

/// One page of a drive search response.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    value: Vec<DriveItem>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

impl SearchPage {
    pub fn into_items(self) -> Vec<RemoteItem> {
        self.value.into_iter().map(RemoteItem::from).collect()
    }

    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct DriveItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    id: String,
    size: Option<u64>,
    file: Option<FileFacet>,
}

#[derive(Debug, Deserialize)]
struct FileFacet {
    hashes: Option<FileHashes>,
}

#[derive(Debug, Deserialize)]
struct FileHashes {
    #[serde(rename = "sha256Hash")]
    sha256: Option<String>,
    #[serde(rename = "sha1Hash")]
    sha1: Option<String>,
}

impl From<DriveItem> for RemoteItem {
    fn from(item: DriveItem) -> Self {
        let hashes = item
            .file
            .and_then(|file| file.hashes)
            .map(|hashes| RemoteHashes {
                sha256: non_empty(hashes.sha256),
                sha1: non_empty(hashes.sha1),
            })
            .unwrap_or_default();

        RemoteItem {
            name: item.name,
            id: item.id,
            size: item.size,
            hashes,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn parse_page(body: &str) -> Result<SearchPage, Error> {
    Ok(serde_json::from_str(body)?)
}
