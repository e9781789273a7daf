use regex::Regex;
use std::sync::LazyLock;

use crate::elements::ParsedFilename;
use crate::error::ParseError;

// ── Regex patterns (compiled once) ──────────────────────────────

static RE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[A-Za-z0-9]{2,4}$").unwrap());

static RE_GROUP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.+)$").unwrap());

static RE_TRAILING_META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:\[[^\]]*\]|\([^)]*\))\s*$").unwrap());

static RE_EPISODE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s+(?:([Ss]\d{1,2})[Ee](\d{2,4})|(\d{2,4})(?:[vV]\d+)?)$").unwrap()
});

static RE_EPISODE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\d{2,4}(?:\s*~\s*|-)\d{2,4}(?:\s|\[|\(|\.|$)").unwrap());

static RE_SEASON_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(S\d{1,2}|Season\s+\d{1,2}|\d{1,2}(?:st|nd|rd|th)\s+Season)$").unwrap()
});

/// Parse a release-group file name (no directory component).
///
/// Accepted shape: `[Group] Title [season] [-] NN[vM] [(meta)] [[meta]].ext`
/// where the episode token is 2–4 digits, optionally with a version suffix,
/// or an `SxxEyy` pair.
pub fn parse(file_name: &str) -> Result<ParsedFilename, ParseError> {
    let result = if is_batch(file_name) {
        Err(ParseError::BatchRelease)
    } else {
        try_parse(file_name).ok_or(ParseError::UnrecognizedFormat)
    };
    if let Err(e) = &result {
        tracing::debug!(file_name, error = %e, "file name did not parse");
    }
    result
}

fn try_parse(file_name: &str) -> Option<ParsedFilename> {
    let stem = RE_EXTENSION.replace(file_name.trim(), "");

    let caps = RE_GROUP_PREFIX.captures(&stem)?;
    let group = caps.get(1)?.as_str().trim().to_string();
    if group.is_empty() {
        return None;
    }

    let mut rest = caps.get(2)?.as_str().trim().to_string();
    while let Some(start) = RE_TRAILING_META.find(&rest).map(|m| m.start()) {
        if start == 0 {
            break;
        }
        rest.truncate(start);
    }

    let caps = RE_EPISODE_TOKEN.captures(&rest)?;
    let title = trim_separator(caps.get(1)?.as_str());

    let (mut season, padded) = match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(season), Some(episode), _) => {
            (Some(season.as_str().to_string()), episode.as_str().to_string())
        }
        (_, _, Some(episode)) => (None, episode.as_str().to_string()),
        _ => return None,
    };

    let mut title = title.to_string();
    if season.is_none() {
        let marker = RE_SEASON_MARKER
            .captures(&title)
            .and_then(|c| Some((c.get(0)?.start(), c.get(1)?.as_str().to_string())));
        if let Some((start, marker)) = marker {
            season = Some(marker);
            title.truncate(start);
        }
    }

    let title = trim_separator(&title).trim_start().to_string();
    if title.is_empty() || title.ends_with('~') {
        return None;
    }

    let episode_number = padded.parse().ok()?;

    Some(ParsedFilename {
        group,
        title,
        season,
        episode_number,
        padded_episode_number: padded,
    })
}

/// Drop a lone hyphen separator left at the end of a title.
fn trim_separator(title: &str) -> &str {
    let title = title.trim_end();
    title
        .strip_suffix('-')
        .map(str::trim_end)
        .unwrap_or(title)
}

/// Batch releases are an expected end-of-season state, not an unsupported name.
///
/// Checked before decoding, since a range such as `01 ~ 12` would otherwise
/// read as episode 12.
fn is_batch(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.contains("(batch)") || lower.contains("[batch]") || RE_EPISODE_RANGE.is_match(file_name)
}
