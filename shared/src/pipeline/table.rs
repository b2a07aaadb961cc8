use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::DatePolicy;
use crate::error::{Error, Result};
use crate::fetch::{IndexSeries, RawFlowTable};
use crate::pipeline::canon::{canonical_key, CATEGORIES, DATE_KEY};
use crate::pipeline::parse::{parse_day_first, parse_flow_amount};

/// An expected category that was actually found in the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMatch {
    pub key: &'static str,
    pub label: &'static str,
    /// Column position in the scraped table.
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    /// Daily flow in billions, aligned with `MergedSeries::categories`.
    pub daily: Vec<f64>,
    /// Running sum of `daily` across the date-sorted rows.
    pub cumulative: Vec<f64>,
    /// Index close at this date, forward-filled across gaps. Stays
    /// `None` only before the first known close.
    pub index_close: Option<f64>,
}

/// The analysis-ready table: windowed, date-ascending, cumulative flow
/// per matched category, index column joined and forward-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSeries {
    pub categories: Vec<CategoryMatch>,
    pub rows: Vec<MergedRow>,
}

impl MergedSeries {
    /// Latest cumulative value per expected category, in canonical
    /// order. Categories absent from the source table report 0.0, the
    /// same shape every consumer of the summary expects.
    pub fn summary(&self) -> Vec<(&'static str, f64)> {
        CATEGORIES
            .iter()
            .map(|(key, label)| {
                let value = self
                    .categories
                    .iter()
                    .position(|c| c.key == *key)
                    .and_then(|i| self.rows.last().map(|row| row.cumulative[i]))
                    .unwrap_or(0.0);
                (*label, value)
            })
            .collect()
    }
}

/// Runs the whole normalization and merge pipeline over one scrape:
/// canonicalize headers, validate the schema, window and sort by date,
/// parse each category cell to billions, prefix-sum per category, left
/// join the index series on date and forward-fill the gaps.
pub fn build_merged_series(
    raw: &RawFlowTable,
    index: &IndexSeries,
    start: NaiveDate,
    end: NaiveDate,
    policy: DatePolicy,
) -> Result<MergedSeries> {
    let keys: Vec<String> = raw.headers.iter().map(|h| canonical_key(h)).collect();

    let date_column = keys.iter().position(|k| k == DATE_KEY);
    let categories = match_categories(&keys);

    let date_column = match (date_column, categories.is_empty()) {
        (Some(col), false) => col,
        _ => {
            return Err(Error::Schema {
                expected: std::iter::once(DATE_KEY)
                    .chain(CATEGORIES.iter().map(|(key, _)| *key))
                    .map(String::from)
                    .collect(),
                found: keys,
            })
        }
    };
    if categories.len() < CATEGORIES.len() {
        let missing: Vec<&str> = CATEGORIES
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| !categories.iter().any(|c| c.key == *key))
            .collect();
        tracing::warn!(?missing, "flow table is missing expected categories");
    }

    // window filter, with the configured policy for bad dates
    let mut dated: Vec<(NaiveDate, &Vec<String>)> = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let token = row.get(date_column).map(String::as_str).unwrap_or("");
        match parse_day_first(token) {
            Some(date) if date >= start && date <= end => dated.push((date, row)),
            Some(_) => {}
            None => match policy {
                DatePolicy::Skip => {}
                DatePolicy::Warn => {
                    tracing::warn!(token, "dropping flow row with unparsable date")
                }
                DatePolicy::Error => {
                    return Err(Error::Date {
                        token: token.to_string(),
                    })
                }
            },
        }
    }
    dated.sort_by_key(|(date, _)| *date);
    if dated.is_empty() {
        return Err(Error::EmptyWindow);
    }

    // parse + prefix sum, then exact-date join
    let closes: BTreeMap<NaiveDate, f64> = index.iter().map(|p| (p.date, p.close)).collect();
    let mut running = vec![0.0; categories.len()];
    let mut rows = Vec::with_capacity(dated.len());
    for (date, cells) in dated {
        let mut daily = Vec::with_capacity(categories.len());
        for cat in &categories {
            let token = cells.get(cat.column).map(String::as_str).unwrap_or("");
            let value = parse_flow_amount(token).ok_or_else(|| Error::Number {
                column: cat.key.to_string(),
                token: token.to_string(),
            })?;
            daily.push(value);
        }
        for (sum, value) in running.iter_mut().zip(&daily) {
            *sum += value;
        }
        rows.push(MergedRow {
            date,
            daily,
            cumulative: running.clone(),
            index_close: closes.get(&date).copied(),
        });
    }

    forward_fill(&mut rows);

    Ok(MergedSeries { categories, rows })
}

fn match_categories(keys: &[String]) -> Vec<CategoryMatch> {
    CATEGORIES
        .iter()
        .filter_map(|&(key, label)| {
            keys.iter()
                .position(|k| k.contains(key))
                .map(|column| CategoryMatch { key, label, column })
        })
        .collect()
}

/// Each absent index value inherits the most recent prior close.
/// Leading absences stay absent; there is no backward fill.
fn forward_fill(rows: &mut [MergedRow]) {
    let mut last = None;
    for row in rows {
        match row.index_close {
            Some(close) => last = Some(close),
            None => row.index_close = last,
        }
    }
}
