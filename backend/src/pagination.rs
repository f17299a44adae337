//! Page/limit parsing and response metadata.
//!
//! Parsing is total: anything that is not a usable number falls back to the
//! configured default, and out-of-range values are clamped. Rejecting a
//! malformed query shape happens earlier, at the HTTP extractor.

use serde::{Deserialize, Serialize};

/// Raw `page`/`limit` query parameters, exactly as they arrived.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    pub limit: u64,
    pub page: u64,
    pub max: u64,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            limit: 20,
            page: 1,
            max: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u64,
    pub skip: u64,
}

impl PageWindow {
    /// Index one past the last row this window can show.
    pub fn end(&self) -> u64 {
        self.skip.saturating_add(self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
    pub first_page: u64,
    pub first_page_url: Option<String>,
    pub last_page_url: Option<String>,
    pub next_page_url: Option<String>,
    pub previous_page_url: Option<String>,
}

pub fn parse(query: &PageQuery, defaults: PageDefaults) -> PageWindow {
    let max = defaults.max.max(1);
    let per_page = clamp_to(
        parse_int_or(query.limit.as_deref(), defaults.limit),
        1,
        max,
    );
    let page = clamp_to(
        parse_int_or(query.page.as_deref(), defaults.page),
        1,
        u64::MAX,
    );

    PageWindow {
        page,
        per_page,
        skip: (page - 1).saturating_mul(per_page),
    }
}

pub fn build_meta(total: u64, base_url: &str, current_page: u64, per_page: u64) -> PaginationMeta {
    let per_page = per_page.max(1);
    let first_page = 1;
    let last_page = total.div_ceil(per_page).max(1);

    let link = |page: Option<u64>| {
        page.filter(|page| *page >= 1)
            .map(|page| format!("{base_url}?page={page}&limit={per_page}"))
    };

    PaginationMeta {
        total,
        per_page,
        current_page,
        last_page,
        first_page,
        first_page_url: link(Some(first_page)),
        last_page_url: link(Some(last_page)),
        next_page_url: link((current_page < last_page).then(|| current_page + 1)),
        previous_page_url: link((current_page > first_page).then(|| current_page - 1)),
    }
}

/// Reads the leading integer of `raw` the way a lenient form parser does:
/// surrounding whitespace and trailing garbage are ignored, and a missing,
/// non-numeric or zero value yields `default`.
fn parse_int_or(raw: Option<&str>, default: u64) -> i128 {
    let Some(raw) = raw else {
        return default.into();
    };

    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i128 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i128::from(byte - b'0'));
    }

    match (seen_digit, value) {
        (false, _) | (true, 0) => default.into(),
        (true, value) if negative => -value,
        (true, value) => value,
    }
}

fn clamp_to(value: i128, min: u64, max: u64) -> u64 {
    let clamped = value.clamp(min.into(), max.into());
    u64::try_from(clamped).unwrap_or(max)
}
