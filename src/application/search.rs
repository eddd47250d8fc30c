//! Translation of raw search query parameters into a gift filter.

use serde::Deserialize;

use crate::application::repos::GiftQueryFilter;

/// Query string accepted by the search route. Values arrive untrimmed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub age_years: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPlan {
    Filter(GiftQueryFilter),
    /// The parameters can never match a gift.
    MatchNothing,
}

impl SearchParams {
    pub fn plan(&self) -> SearchPlan {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let max_age_years = match self.age_years.as_deref().filter(|v| !v.is_empty()) {
            Some(raw) => match leading_integer(raw) {
                Some(years) => Some(years as f64),
                None => return SearchPlan::MatchNothing,
            },
            None => None,
        };

        SearchPlan::Filter(GiftQueryFilter {
            name,
            category: non_empty(self.category.as_deref()),
            condition: non_empty(self.condition.as_deref()),
            max_age_years,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parse the leading base-10 integer of `raw`, skipping leading whitespace.
/// `"3.5"` yields 3 and `"7 years"` yields 7; no digits yields `None`.
/// Out-of-range values saturate at `i64::MAX` or `i64::MIN`.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let sign = if negative { -1 } else { 1 };
    let value = digits[..end].bytes().fold(0i64, |acc, digit| {
        acc.saturating_mul(10)
            .saturating_add(sign * i64::from(digit - b'0'))
    });
    Some(value)
}
