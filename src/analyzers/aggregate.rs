use crate::analyzers::types::{Period, PublisherAggregate, SalesRecord};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of publishers kept after ranking.
pub const TOP_N: usize = 10;

/// Ranks publishers by total global sales and keeps the top [`TOP_N`].
pub fn aggregate(records: &[SalesRecord]) -> Vec<PublisherAggregate> {
    aggregate_top(records, TOP_N)
}

/// Same as [`aggregate`] with a caller-chosen cutoff.
///
/// Unusable records are dropped, the rest are summed per publisher into the
/// pre/post 2000 buckets, ranked by total descending (ties by publisher name)
/// and truncated to `n`.
pub fn aggregate_top(records: &[SalesRecord], n: usize) -> Vec<PublisherAggregate> {
    let valid = filter_valid(records);
    let aggregates = group_and_sum(valid);
    let ranked = rank(aggregates);
    truncate(ranked, n)
}

/// Keeps only records with both a year and a sales figure.
pub fn filter_valid(records: &[SalesRecord]) -> impl Iterator<Item = (&str, Period, f64)> {
    records.iter().filter_map(|r| {
        r.usable()
            .map(|(period, sales)| (r.publisher.as_str(), period, sales))
    })
}

/// Sums sales per publisher into the matching period bucket.
pub fn group_and_sum<'a>(
    valid: impl Iterator<Item = (&'a str, Period, f64)>,
) -> Vec<PublisherAggregate> {
    let mut by_publisher: HashMap<&str, PublisherAggregate> = HashMap::new();

    for (publisher, period, sales) in valid {
        by_publisher
            .entry(publisher)
            .or_insert_with(|| PublisherAggregate::new(publisher))
            .add(period, sales);
    }

    by_publisher.into_values().collect()
}

/// Sorts by total sales descending, then publisher name ascending.
pub fn rank(mut aggregates: Vec<PublisherAggregate>) -> Vec<PublisherAggregate> {
    aggregates.sort_by(compare_ranked);
    aggregates
}

fn compare_ranked(a: &PublisherAggregate, b: &PublisherAggregate) -> Ordering {
    b.total_sales()
        .total_cmp(&a.total_sales())
        .then_with(|| a.publisher().cmp(b.publisher()))
}

pub fn truncate(mut ranked: Vec<PublisherAggregate>, n: usize) -> Vec<PublisherAggregate> {
    ranked.truncate(n);
    ranked
}
