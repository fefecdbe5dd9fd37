//! Profile summary badge scraper
//!
//! Fetches the stats badge rendered by github-profile-summary-cards and pulls the numbers out
//! of its `<text>` nodes.
//!
//! The mapping is positional ([`CardLabel::at_node`]): if the badge layout changes, values
//! land under the wrong labels without any error. That coupling is accepted as an external
//! contract.

use crate::error::CoreError;
use crate::http::{build_client, transport_error};
use crate::models::{CardLabel, CardStats};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

/// Default badge URL; `{username}` is substituted
pub const DEFAULT_BADGE_URL: &str =
    "https://github-profile-summary-cards.vercel.app/api/cards/stats?username={username}";

/// SVG namespace the text nodes must be bound to
pub const SVG_NAMESPACE: &[u8] = b"http://www.w3.org/2000/svg";

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Expand the `{username}` placeholder of a badge URL template
pub fn badge_url(template: &str, username: &str) -> String {
    template.replace("{username}", username)
}

/// HTTP fetch + positional parse of the stats badge
pub struct CardScraper {
    client: Client,
}

impl CardScraper {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self::with_client(build_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and return the body. No retry.
    pub async fn fetch(&self, url: &str) -> Result<String, CoreError> {
        debug!(url, "Fetching badge SVG");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| transport_error(url, e))
    }

    pub fn parse(&self, content: &str) -> Result<CardStats, CoreError> {
        parse_card_svg(content)
    }

    /// Fetch and parse; failures are logged and yield `None`
    pub async fn scrape(&self, url: &str) -> Option<CardStats> {
        let content = match self.fetch(url).await {
            Ok(content) => content,
            Err(e) => {
                warn!(url, error = %e, "Error fetching SVG");
                return None;
            }
        };

        match self.parse(&content) {
            Ok(stats) => {
                debug!(values = stats.len(), "Parsed badge stats");
                Some(stats)
            }
            Err(e) => {
                warn!(url, error = %e, "Error parsing SVG");
                None
            }
        }
    }
}

/// Extract the labeled numbers from a badge document.
///
/// Text nodes 0..3 are skipped; each following node contributes the first run of decimal
/// digits in its text to the label at its position. Nodes without digits are skipped.
pub fn parse_card_svg(content: &str) -> Result<CardStats, CoreError> {
    let nodes = collect_text_nodes(content)?;

    let mut stats = CardStats::new();
    for (position, text) in nodes.iter().enumerate() {
        let Some(label) = CardLabel::at_node(position) else {
            continue;
        };
        if let Some(value) = first_number(text) {
            stats.insert(label, value);
        }
    }

    Ok(stats)
}

/// First run of ASCII digits in `text`, if it fits in a u64
fn first_number(text: &str) -> Option<u64> {
    DIGITS.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Leading character data of every `svg:text` element, in document order.
///
/// Only text before the element's first child counts, so `<text>12<tspan>k</tspan></text>`
/// yields `"12"`.
fn collect_text_nodes(content: &str) -> Result<Vec<String>, CoreError> {
    let mut reader = NsReader::from_str(content);
    let mut nodes: Vec<String> = Vec::new();
    // Node whose leading text is still being collected
    let mut collecting: Option<usize> = None;
    let mut depth: usize = 0;
    let mut saw_root = false;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) => {
                saw_root = true;
                depth += 1;
                collecting = None;
                if is_svg_text(&ns, e.local_name().as_ref()) {
                    nodes.push(String::new());
                    collecting = Some(nodes.len() - 1);
                }
            }
            Ok((ns, Event::Empty(e))) => {
                saw_root = true;
                collecting = None;
                if is_svg_text(&ns, e.local_name().as_ref()) {
                    nodes.push(String::new());
                }
            }
            Ok((_, Event::End(_))) => {
                collecting = None;
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CoreError::xml("unexpected closing tag"))?;
            }
            Ok((_, Event::Text(t))) => {
                if let Some(i) = collecting {
                    let text = t.unescape().map_err(CoreError::xml)?;
                    nodes[i].push_str(&text);
                }
            }
            Ok((_, Event::CData(c))) => {
                if let Some(i) = collecting {
                    nodes[i].push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(CoreError::xml(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )))
            }
        }
    }

    if !saw_root {
        return Err(CoreError::xml("document has no root element"));
    }
    if depth != 0 {
        return Err(CoreError::xml(format!("{} unclosed element(s)", depth)));
    }

    Ok(nodes.into_iter().map(|s| s.trim().to_string()).collect())
}

fn is_svg_text(ns: &ResolveResult<'_>, local_name: &[u8]) -> bool {
    local_name == b"text"
        && matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SVG_NAMESPACE)
}
