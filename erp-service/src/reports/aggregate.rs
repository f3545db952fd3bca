//! Aggregation helpers shared by the report builders.

use crate::models::DateRange;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;

/// Number of entries kept by top-N rankings.
pub const TOP_N: usize = 5;

/// Sum of one group, in first-seen key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub value: Decimal,
}

/// Group total with its share of the overall total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub key: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

/// Keep records whose date falls inside `range`.
pub fn filter_by_date<'a, T, F>(records: &'a [T], range: &DateRange, date_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> chrono::NaiveDate,
{
    records.iter().filter(|r| range.contains(date_of(*r))).collect()
}

/// Sum `value_of` per `key_of`.
///
/// Groups appear in the order their key is first seen; the sums themselves do
/// not depend on input order.
pub fn grouped_sum<'a, T, K, V>(
    records: impl IntoIterator<Item = &'a T>,
    key_of: K,
    value_of: V,
) -> Vec<GroupTotal>
where
    T: 'a,
    K: Fn(&T) -> &str,
    V: Fn(&T) -> Decimal,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();

    for record in records {
        let key = key_of(record);
        let value = value_of(record);
        match index.get(key) {
            Some(&i) => groups[i].value += value,
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(GroupTotal {
                    key: key.to_string(),
                    value,
                });
            }
        }
    }

    groups
}

/// The `n` largest groups, descending. Ties keep their original order.
pub fn top_n(groups: &[GroupTotal], n: usize) -> Vec<GroupTotal> {
    let mut ranked = groups.to_vec();
    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    ranked.truncate(n);
    ranked
}

/// `part / total * 100`, rounded to two places. Zero when `total` is zero.
pub fn percentage_of(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `sum / count`, rounded to two places. Zero when `count` is zero.
pub fn average(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (sum / Decimal::from(count)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Attach percentages of `total` to each group.
pub fn with_percentages(groups: Vec<GroupTotal>, total: Decimal) -> Vec<Breakdown> {
    groups
        .into_iter()
        .map(|g| Breakdown {
            percentage: percentage_of(g.value, total),
            key: g.key,
            value: g.value,
        })
        .collect()
}

/// Grouped sums with percentages of their own grand total.
pub fn breakdown<'a, T, K, V>(
    records: impl IntoIterator<Item = &'a T>,
    key_of: K,
    value_of: V,
) -> Vec<Breakdown>
where
    T: 'a,
    K: Fn(&T) -> &str,
    V: Fn(&T) -> Decimal,
{
    let groups = grouped_sum(records, key_of, value_of);
    let total = groups.iter().map(|g| g.value).sum();
    with_percentages(groups, total)
}

pub fn count_where<'a, T: 'a>(
    records: impl IntoIterator<Item = &'a T>,
    predicate: impl Fn(&T) -> bool,
) -> usize {
    records.into_iter().filter(|r| predicate(*r)).count()
}

pub fn sum_of<'a, T: 'a>(
    records: impl IntoIterator<Item = &'a T>,
    value_of: impl Fn(&T) -> Decimal,
) -> Decimal {
    records.into_iter().map(value_of).sum()
}
