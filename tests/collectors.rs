use ironstream::collectors::{Counting, FnCollector, GroupingBy, Joining, Summing, ToVec};
use ironstream::testing::*;
use ironstream::*;
use std::collections::BTreeSet;

#[test]
fn built_in_collectors() -> anyhow::Result<()> {
    assert_eq!(Stream::range(0, 4).collect(ToVec)?, vec![0, 1, 2, 3]);
    assert_eq!(Stream::range(0, 4).collect(Counting)?, 4);
    assert_eq!(Stream::range(0, 4).collect(Summing::new())?, 6);
    assert_eq!(Stream::<i32>::empty().collect(Summing::new())?, 0);
    Ok(())
}

#[test]
fn joining_strings() -> anyhow::Result<()> {
    let csv = Stream::of(["a", "b", "c"]).collect(Joining::new(","))?;
    assert_eq!(csv, "a,b,c");

    let owned = Stream::range(1, 4).map(|n| n.to_string()).collect(Joining::new(" + "))?;
    assert_eq!(owned, "1 + 2 + 3");

    assert_eq!(Stream::<String>::empty().collect(Joining::new(","))?, "");
    Ok(())
}

#[test]
fn grouping_by_key() -> anyhow::Result<()> {
    let groups = Stream::of(["apple", "avocado", "banana", "cherry", "blueberry"])
        .collect(GroupingBy::new(|s: &&str| s.chars().next()))?;

    assert_eq!(groups.len(), 3);
    assert_collections_equal(&groups[&Some('a')], &["apple", "avocado"]);
    assert_collections_equal(&groups[&Some('b')], &["banana", "blueberry"]);
    assert_collection_size(&groups[&Some('c')], 1);
    Ok(())
}

#[test]
fn fn_collector_into_a_set() -> anyhow::Result<()> {
    let set = Stream::of([3, 1, 3, 2]).collect(FnCollector::new(
        BTreeSet::new,
        |acc: &mut BTreeSet<i32>, x: i32| {
            acc.insert(x);
        },
        |acc: &mut BTreeSet<i32>, other: BTreeSet<i32>| acc.extend(other),
        |acc: BTreeSet<i32>| acc.into_iter().collect::<Vec<_>>(),
    ))?;

    assert_eq!(set, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn collect_with_closures() -> anyhow::Result<()> {
    let mut combiner_calls = 0;
    let out = Stream::of(["x", "y"]).collect_with(
        String::new,
        |acc, s| acc.push_str(s),
        |acc: &mut String, other: String| {
            combiner_calls += 1;
            acc.push_str(&other);
        },
    )?;

    assert_eq!(out, "xy");
    assert_eq!(combiner_calls, 0);
    Ok(())
}

#[test]
fn collectors_can_merge_partial_results() {
    let c = Joining::new("-");
    let mut left = Collector::<&str>::supplier(&c);
    c.accumulate(&mut left, "a");
    let mut right = Collector::<&str>::supplier(&c);
    c.accumulate(&mut right, "b");
    c.accumulate(&mut right, "c");

    Collector::<&str>::combine(&c, &mut left, right);
    assert_eq!(Collector::<&str>::finish(&c, left), "a-b-c");
}
