//! Resolve a free-text area or agency name to an agency URL.
//!
//! Matching is deterministic: queries and candidates are tokenised and compared
//! with Jaro-Winkler similarity, an identical token counting as a perfect match.
//! Candidates are the agency name plus the last path segment of its URL; the
//! shared host and path prefix carry no identity. The best candidate above
//! [`MATCH_THRESHOLD`] wins and ties go to the earlier entry in the upstream
//! list.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MATCH_THRESHOLD: f64 = 0.85;

const MIN_TOKEN_LEN: usize = 3;
const URL_KEYS: &[&str] = &["agency", "url", "uri", "serviceuri", "link", "id"];
// Words that say "transit" without saying which operator.
const QUERY_STOPWORDS: &[&str] = &[
    "tpl", "bus", "buses", "line", "lines", "linee", "agency", "agenzia", "the", "della",
    "del", "per", "and", "city", "transport", "trasporto", "pubblico", "public",
];

/// A transit operator as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub name: String,
    pub url: String,
}

/// Pull every agency record out of an upstream agency document.
///
/// The document shape is not fixed, so any object carrying an `http(s)` string
/// counts as an agency; its name is the first field whose key contains `name`,
/// falling back to the URL itself.
pub fn extract_agencies(doc: &Value) -> Vec<Agency> {
    let mut found = Vec::new();
    collect(doc, &mut found);
    found.into_iter().unique_by(|a| a.url.clone()).collect()
}

fn collect(value: &Value, out: &mut Vec<Agency>) {
    match value {
        Value::Array(items) => items.iter().for_each(|v| collect(v, out)),
        Value::Object(map) => match agency_from_object(map) {
            Some(agency) => out.push(agency),
            None => map.values().for_each(|v| collect(v, out)),
        },
        _ => {}
    }
}

fn agency_from_object(map: &Map<String, Value>) -> Option<Agency> {
    let url_value = |v: &Value| v.as_str().filter(|s| is_url(s)).map(str::to_string);

    let url = URL_KEYS
        .iter()
        .find_map(|key| {
            map.iter()
                .find(|(k, _)| k.to_lowercase() == *key)
                .and_then(|(_, v)| url_value(v))
        })
        .or_else(|| map.values().find_map(url_value))?;

    let name = map
        .iter()
        .find(|(k, v)| k.to_lowercase().contains("name") && v.is_string())
        .and_then(|(_, v)| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| url.clone());

    Some(Agency { name, url })
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .unique()
        .map(str::to_string)
        .collect()
}

fn query_tokens(query: &str) -> Vec<String> {
    tokens(query)
        .into_iter()
        .filter(|t| !QUERY_STOPWORDS.contains(&t.as_str()))
        .collect()
}

fn is_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

fn url_tail(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}

fn candidate_tokens(agency: &Agency) -> Vec<String> {
    let name = if is_url(&agency.name) {
        url_tail(&agency.name)
    } else {
        agency.name.as_str()
    };
    tokens(&format!("{} {}", name, url_tail(&agency.url)))
}

/// Similarity in `[0, 1]` between a query and an agency.
pub fn score(query: &str, agency: &Agency) -> f64 {
    let query_tokens = query_tokens(query);
    if query_tokens.is_empty() {
        return 0.0;
    }

    let candidate_tokens = candidate_tokens(agency);

    let total: f64 = query_tokens
        .iter()
        .map(|qt| {
            candidate_tokens
                .iter()
                .map(|ct| {
                    if ct == qt {
                        1.0
                    } else {
                        strsim::jaro_winkler(qt, ct)
                    }
                })
                .fold(0.0, f64::max)
        })
        .sum();

    total / query_tokens.len() as f64
}

/// Pick the agency best matching `area` or `agency_name`.
///
/// A URL given as `agency_name` must be listed verbatim; an unlisted URL is
/// never fuzzy-matched.
pub fn resolve<'a>(
    agencies: &'a [Agency],
    area: Option<&str>,
    agency_name: Option<&str>,
) -> Option<&'a Agency> {
    let area = area.map(str::trim).filter(|s| !s.is_empty());
    let agency_name = agency_name.map(str::trim).filter(|s| !s.is_empty());

    if let Some(name) = agency_name.filter(|n| is_url(n)) {
        return agencies.iter().find(|a| a.url == name);
    }

    let mut best: Option<(&Agency, f64)> = None;
    for agency in agencies {
        let s = [area, agency_name]
            .into_iter()
            .flatten()
            .map(|q| score(q, agency))
            .fold(0.0, f64::max);

        if s >= MATCH_THRESHOLD && best.map_or(true, |(_, b)| s > b) {
            best = Some((agency, s));
        }
    }

    best.map(|(agency, _)| agency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_drop_short_fragments() {
        assert_eq!(tokens("TPL di Firenze"), vec!["tpl", "firenze"]);
    }

    #[test]
    fn query_tokens_drop_generic_transit_words() {
        assert_eq!(query_tokens("Linee bus TPL di Firenze"), vec!["firenze"]);
    }

    #[test]
    fn candidates_skip_url_boilerplate() {
        let agency = Agency {
            name: "CTT Nord".to_string(),
            url: "http://www.disit.org/km4city/resource/Bus_CTT_Nord".to_string(),
        };
        assert_eq!(candidate_tokens(&agency), vec!["ctt", "nord", "bus"]);
    }

    #[test]
    fn empty_query_scores_zero() {
        let agency = Agency {
            name: "Ataf".to_string(),
            url: "http://example.org/Ataf".to_string(),
        };
        assert_eq!(score("  ", &agency), 0.0);
    }
}
