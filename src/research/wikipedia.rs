//! MediaWiki API client.
//!
//! All queries use `formatversion=2`, where `query.pages` is an array and booleans are real
//! JSON booleans.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::ResearchConfig;
use crate::foundation::error::{HerodoError, HerodoResult};
use crate::research::cache::ImageCache;
use crate::research::filter::ImageFilter;

/// `imageinfo` accepts at most this many titles per request.
const TITLES_PER_QUERY: usize = 50;

/// Title and plain-text intro of one article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub summary: String,
}

/// A file used on an article page, with the metadata the filter needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageCandidate {
    pub title: String,
    pub url: String,
    pub width: u32,
    pub mime: String,
}

/// Everything gathered for one topic.
#[derive(Clone, Debug)]
pub struct ResearchBundle {
    pub title: String,
    pub summary: String,
    /// Filtered image URLs in page order.
    pub image_urls: Vec<String>,
    /// Local copies of the URLs that downloaded and decoded.
    pub image_paths: Vec<PathBuf>,
}

/// Anything that can turn a topic into text plus local images.
pub trait ArticleSource: Send + Sync {
    fn research(&self, title: &str) -> HerodoResult<ResearchBundle>;
}

#[derive(Deserialize)]
struct Response<P> {
    query: Option<Query<P>>,
}

#[derive(Deserialize)]
struct Query<P> {
    #[serde(default = "Vec::new")]
    pages: Vec<P>,
}

#[derive(Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
    pageprops: Option<PageProps>,
}

#[derive(Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ImagesPage {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Deserialize)]
struct ImageRef {
    title: String,
}

#[derive(Deserialize)]
struct InfoPage {
    title: String,
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Deserialize)]
struct ImageInfo {
    #[serde(default)]
    url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    mime: String,
}

/// Blocking client for the MediaWiki action API.
#[derive(Clone, Debug)]
pub struct WikipediaClient {
    api_url: String,
    client: Client,
    filter: ImageFilter,
}

impl WikipediaClient {
    pub fn new(cfg: &ResearchConfig) -> HerodoResult<Self> {
        Ok(Self::with_client(cfg, build_client(cfg)?))
    }

    pub fn with_client(cfg: &ResearchConfig, client: Client) -> Self {
        Self {
            api_url: cfg.api_url.clone(),
            client,
            filter: ImageFilter::from_config(cfg),
        }
    }

    /// Resolved title and intro extract, following redirects.
    pub fn fetch_article(&self, title: &str) -> HerodoResult<Article> {
        let body = self.query(&[
            ("prop", "extracts|pageprops"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("ppprop", "disambiguation"),
            ("redirects", "1"),
            ("titles", title),
        ])?;
        let article = parse_article(&body, title)?;
        tracing::info!(title = %article.title, "fetched article");
        Ok(article)
    }

    /// Every file on the page, with URL, width and MIME type.
    pub fn image_candidates(&self, title: &str) -> HerodoResult<Vec<ImageCandidate>> {
        let body = self.query(&[
            ("prop", "images"),
            ("imlimit", "max"),
            ("redirects", "1"),
            ("titles", title),
        ])?;
        let file_titles = parse_image_titles(&body)?;
        if file_titles.is_empty() {
            tracing::warn!(title, "article has no images");
            return Ok(Vec::new());
        }

        let mut candidates = Vec::with_capacity(file_titles.len());
        for batch in file_titles.chunks(TITLES_PER_QUERY) {
            let joined = batch.join("|");
            let body = self.query(&[
                ("prop", "imageinfo"),
                ("iiprop", "url|size|mime"),
                ("titles", joined.as_str()),
            ])?;
            candidates.extend(parse_image_infos(&body, batch)?);
        }
        Ok(candidates)
    }

    /// Candidate URLs that pass the image filter, in page order.
    pub fn image_urls(&self, title: &str) -> HerodoResult<Vec<String>> {
        let candidates = self.image_candidates(title)?;
        let total = candidates.len();
        let urls: Vec<String> = candidates
            .into_iter()
            .filter(|c| {
                self.filter
                    .is_usable_image(&c.url, c.width, &c.mime, &c.title)
            })
            .map(|c| c.url)
            .collect();
        tracing::info!(valid = urls.len(), total, "filtered article images");
        Ok(urls)
    }

    fn query(&self, params: &[(&str, &str)]) -> HerodoResult<Vec<u8>> {
        let res = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .map_err(|e| HerodoError::research(format!("MediaWiki request failed: {e}")))?;
        if !res.status().is_success() {
            return Err(HerodoError::research(format!(
                "MediaWiki request failed with status {}",
                res.status()
            )));
        }
        let bytes = res
            .bytes()
            .map_err(|e| HerodoError::research(format!("read MediaWiki response: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Article lookup plus image download through an [`ImageCache`].
#[derive(Clone, Debug)]
pub struct WikipediaResearcher {
    client: WikipediaClient,
    cache: ImageCache,
}

impl WikipediaResearcher {
    pub fn new(cfg: &ResearchConfig) -> HerodoResult<Self> {
        let http = build_client(cfg)?;
        Ok(Self {
            client: WikipediaClient::with_client(cfg, http.clone()),
            cache: ImageCache::new(&cfg.cache_dir, http, cfg.download_timeout()),
        })
    }
}

impl ArticleSource for WikipediaResearcher {
    fn research(&self, title: &str) -> HerodoResult<ResearchBundle> {
        let article = self.client.fetch_article(title)?;
        // Image lookup problems leave the article usable; the caller decides what no images means.
        let image_urls = match self.client.image_urls(&article.title) {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!(title = %article.title, error = %e, "image lookup failed");
                Vec::new()
            }
        };
        let (image_paths, _failed) = self.cache.fetch_all(&image_urls);
        Ok(ResearchBundle {
            title: article.title,
            summary: article.summary,
            image_urls,
            image_paths,
        })
    }
}

fn build_client(cfg: &ResearchConfig) -> HerodoResult<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(cfg.api_timeout())
        .connect_timeout(Duration::from_secs(cfg.api_timeout_secs.max(1)))
        .build()
        .map_err(|e| HerodoError::research(format!("build HTTP client: {e}")))
}

pub(crate) fn parse_article(body: &[u8], requested: &str) -> HerodoResult<Article> {
    let res: Response<ExtractPage> = serde_json::from_slice(body)
        .map_err(|e| HerodoError::research(format!("parse MediaWiki response: {e}")))?;
    let page = res
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| HerodoError::research(format!("Wikipedia page '{requested}' not found")))?;

    if page.missing || page.invalid {
        return Err(HerodoError::research(format!(
            "Wikipedia page '{requested}' not found"
        )));
    }
    if page.pageprops.is_some_and(|p| p.disambiguation.is_some()) {
        return Err(HerodoError::research(format!(
            "'{requested}' is ambiguous; use a more specific title"
        )));
    }
    let summary = page.extract.unwrap_or_default().trim().to_string();
    if summary.is_empty() {
        return Err(HerodoError::research(format!(
            "Wikipedia page '{}' has no summary text",
            page.title
        )));
    }
    Ok(Article {
        title: page.title,
        summary,
    })
}

pub(crate) fn parse_image_titles(body: &[u8]) -> HerodoResult<Vec<String>> {
    let res: Response<ImagesPage> = serde_json::from_slice(body)
        .map_err(|e| HerodoError::research(format!("parse MediaWiki response: {e}")))?;
    Ok(res
        .query
        .and_then(|q| q.pages.into_iter().next())
        .filter(|p| !p.missing)
        .map(|p| p.images.into_iter().map(|i| i.title).collect())
        .unwrap_or_default())
}

/// Candidates from an `imageinfo` response, ordered like `requested`.
pub(crate) fn parse_image_infos(
    body: &[u8],
    requested: &[String],
) -> HerodoResult<Vec<ImageCandidate>> {
    let res: Response<InfoPage> = serde_json::from_slice(body)
        .map_err(|e| HerodoError::research(format!("parse MediaWiki response: {e}")))?;
    let order: HashMap<&str, usize> = requested
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let mut out: Vec<(usize, ImageCandidate)> = res
        .query
        .map(|q| q.pages)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|page| {
            let info = page.imageinfo.into_iter().next()?;
            let rank = order.get(page.title.as_str()).copied().unwrap_or(usize::MAX);
            Some((
                rank,
                ImageCandidate {
                    title: page.title,
                    url: info.url,
                    width: info.width,
                    mime: info.mime,
                },
            ))
        })
        .collect();
    out.sort_by_key(|(rank, _)| *rank);
    Ok(out.into_iter().map(|(_, c)| c).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/research/wikipedia.rs"]
mod tests;
