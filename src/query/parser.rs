//! Query-string parser for filters
//!
//! Extracts raw filter triples from the bracketed grammar
//! `filter[<field-or-alias>]` / `filter[<field-or-alias>][<operator>]`.
//!
//! This is a pure lexical pass: no validation or alias resolution happens
//! here, and keys that do not match the grammar are inert rather than an
//! error. Use [`validator`](crate::query::validator) to resolve the output
//! against an allow-list.

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::OnceLock;

use crate::query::params::RawFilter;

/// Matches `filter[field]` and `filter[field][operator]`
fn filter_key_regex() -> &'static Regex {
    static FILTER_KEY: OnceLock<Regex> = OnceLock::new();
    FILTER_KEY
        .get_or_init(|| Regex::new(r"^filter\[([^\]]+)\](?:\[([^\]]+)\])?$").unwrap())
}

/// Split a raw query string into decoded key/value pairs.
///
/// Applies `+`-as-space and percent-decoding to both keys and values, so
/// `filter%5Bname%5D=John+Doe` becomes `("filter[name]", "John Doe")`.
/// Multiplicity and order of repeated keys are preserved.
pub fn parse_query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Extract raw filters from decoded key/value pairs.
///
/// Multiple occurrences of the same `(field-or-alias, operator)` pair
/// accumulate into one [`RawFilter`] in encounter order. Keys not matching
/// the filter grammar produce nothing.
pub fn parse_filter_pairs(pairs: &[(String, String)]) -> Vec<RawFilter> {
    let mut groups: IndexMap<(String, Option<String>), Vec<String>> = IndexMap::new();

    for (key, value) in pairs {
        let Some(caps) = filter_key_regex().captures(key) else {
            continue;
        };
        let alias_or_field = caps[1].to_string();
        let operator = caps.get(2).map(|m| m.as_str().to_string());
        groups
            .entry((alias_or_field, operator))
            .or_default()
            .push(value.clone());
    }

    groups
        .into_iter()
        .map(|((alias_or_field, operator), values)| RawFilter {
            alias_or_field,
            operator,
            values,
        })
        .collect()
}

/// Parse filters straight from a raw query string
pub fn parse_filters(query: &str) -> Vec<RawFilter> {
    parse_filter_pairs(&parse_query_pairs(query))
}
