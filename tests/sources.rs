use ironstream::source::{ArraySource, Source};
use ironstream::testing::*;
use ironstream::*;


#[test]
fn range_half_open() -> anyhow::Result<()> {
    assert_eq!(Stream::range(0, 5).to_vec()?, vec![0, 1, 2, 3, 4]);
    assert_eq!(Stream::range(5, 0).to_vec()?, vec![5, 4, 3, 2, 1]);
    assert!(Stream::range(2, 2).to_vec()?.is_empty());
    assert_eq!(Stream::range(-2i64, 1).to_vec()?, vec![-2, -1, 0]);
    Ok(())
}

#[test]
fn range_closed_includes_the_bound() -> anyhow::Result<()> {
    assert_eq!(Stream::range_closed(1, 4).to_vec()?, vec![1, 2, 3, 4]);
    assert_eq!(Stream::range_closed(3, 3).to_vec()?, vec![3]);
    assert_eq!(Stream::range_closed(2, 0).to_vec()?, vec![2, 1, 0]);
    Ok(())
}

#[test]
fn range_closed_never_overshoots() -> anyhow::Result<()> {
    assert_eq!(Stream::range_closed_by(0, 5, 2).to_vec()?, vec![0, 2, 4]);
    assert_eq!(Stream::range_closed_by(0, 6, 2).to_vec()?, vec![0, 2, 4, 6]);
    assert_eq!(Stream::range_closed_by(10, 0, 4).to_vec()?, vec![10, 6, 2]);
    assert_all(&Stream::range_closed_by(0, 100, 7).to_vec()?, |x| *x <= 100);
    Ok(())
}

#[test]
fn range_step_sign_is_normalized() -> anyhow::Result<()> {
    assert_eq!(Stream::range_by(0, 10, -3).to_vec()?, vec![0, 3, 6, 9]);
    assert_eq!(Stream::range_by(10, 0, 3).to_vec()?, vec![10, 7, 4, 1]);
    assert_eq!(Stream::range_by(0i32, 10, i32::MIN).to_vec()?, vec![0]);
    assert_eq!(Stream::range_closed_by(-5i64, 5, i64::MIN).to_vec()?, vec![-5]);
    assert_eq!(Stream::range_by(0i8, -3, i8::MIN).to_vec()?, vec![0]);
    Ok(())
}

#[test]
fn range_zero_step_is_invalid() {
    assert_stream_error!(Stream::range_by(0, 10, 0).to_vec(), StreamError::InvalidRange);
    assert_stream_error!(Stream::range_closed_by(3, 3, 0).count(), StreamError::InvalidRange);
}

#[test]
fn range_stops_at_integer_limits() -> anyhow::Result<()> {
    let out = Stream::range_closed(i8::MAX - 2, i8::MAX).to_vec()?;
    assert_eq!(out, vec![125, 126, 127]);
    Ok(())
}

#[test]
fn float_ranges() -> anyhow::Result<()> {
    let out: Vec<f64> = Stream::range_by(0.0, 1.0, 0.25).to_vec()?;
    assert_eq!(out.len(), 4);
    assert_approx_eq!(out[3], 0.75);
    Ok(())
}

#[test]
fn concat_preserves_order() -> anyhow::Result<()> {
    let a = vec![1, 2, 3];
    let b = vec![4, 5];

    let out = Stream::concat(Stream::from_vec(a.clone()), Stream::from_vec(b.clone())).to_vec()?;

    let expected: Vec<i32> = a.into_iter().chain(b).collect();
    assert_collections_equal(&out, &expected);
    Ok(())
}

#[test]
fn concat_with_empty_sides() -> anyhow::Result<()> {
    assert_eq!(Stream::concat(Stream::empty(), Stream::of([1, 2])).to_vec()?, vec![1, 2]);
    assert_eq!(Stream::concat(Stream::of([1, 2]), Stream::empty()).to_vec()?, vec![1, 2]);
    assert!(Stream::<i32>::concat(Stream::empty(), Stream::empty()).to_vec()?.is_empty());
    Ok(())
}

#[test]
fn concat_keeps_each_sides_stages() -> anyhow::Result<()> {
    let evens = Stream::range(0, 10).filter(|x| x % 2 == 0);
    let tens = Stream::iterate(10, |x| x + 10).limit(2);

    let out = evens.chain(tens).map(|x| x + 1).to_vec()?;

    assert_eq!(out, vec![1, 3, 5, 7, 9, 11, 21]);
    Ok(())
}

#[test]
fn concat_with_infinite_first_side_is_lazy() -> anyhow::Result<()> {
    let out = Stream::generate(|| 'x').chain(Stream::of(['y'])).limit(3).to_vec()?;
    assert_eq!(out, vec!['x', 'x', 'x']);
    assert!(Stream::generate(|| 0).chain(Stream::empty()).pipeline().is_source_infinite());
    Ok(())
}

#[test]
fn concat_sees_stateful_stage_hidden_behind_a_later_limit() {
    let never_ends = Stream::iterate(0, |n| n + 1).sorted().limit(3);
    assert!(never_ends.pipeline().is_unbounded());

    let mut s = Stream::concat(never_ends, Stream::of([1]))
        .with_hazard_policy(HazardPolicy::Fail)
        .distinct();
    assert!(s.pipeline().is_source_infinite());
    assert_stream_error!(
        s.to_vec(),
        StreamError::UnboundedStatefulStage { index: 1, stage: "distinct" }
    );

    let bounded = Stream::iterate(0, |n| n + 1).limit(3).sorted();
    assert!(!bounded.pipeline().is_unbounded());
    assert!(!Stream::concat(bounded, Stream::of([1])).pipeline().is_source_infinite());
}

#[test]
fn from_iter_and_once() -> anyhow::Result<()> {
    assert_eq!(Stream::from_iter("abc".chars()).to_vec()?, vec!['a', 'b', 'c']);
    assert_eq!(Stream::once(42).to_vec()?, vec![42]);
    assert!(Stream::<()>::empty().to_vec()?.is_empty());
    Ok(())
}

#[test]
fn endless_iterators_count_as_infinite_sources() -> anyhow::Result<()> {
    assert!(Stream::from_iter(0u64..).pipeline().is_source_infinite());
    assert!(Stream::from_iter(std::iter::repeat('z')).pipeline().is_source_infinite());
    assert!(!Stream::from_iter(0u64..10).pipeline().is_source_infinite());

    let sorted = Stream::from_iter(0u64..).sorted();
    assert_eq!(
        sorted.pipeline().hazards(),
        vec![StreamError::UnboundedStatefulStage { index: 0, stage: "sorted" }]
    );

    let mut failing = Stream::from_iter(0u64..)
        .with_hazard_policy(HazardPolicy::Fail)
        .sorted();
    assert_stream_error!(
        failing.count(),
        StreamError::UnboundedStatefulStage { index: 0, stage: "sorted" }
    );

    let first = Stream::from_iter(0u64..).limit(3).sorted().to_vec()?;
    assert_eq!(first, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn generate_is_called_on_demand() -> anyhow::Result<()> {
    let calls = CallCounter::new();
    let out = Stream::generate(counting_supplier(&calls)).limit(4).to_vec()?;

    assert_eq!(out, vec![0, 1, 2, 3]);
    assert_eq!(calls.get(), 4);
    Ok(())
}

#[test]
fn iterate_yields_seed_first() -> anyhow::Result<()> {
    let out = Stream::iterate(String::from("a"), |s| format!("{s}b")).limit(3).to_vec()?;
    assert_eq!(out, vec!["a", "ab", "abb"]);
    Ok(())
}

/// Countdown source with a custom description.
struct Countdown(u32);

impl Source<u32> for Countdown {
    fn produce_next(&mut self) -> anyhow::Result<Option<u32>> {
        if self.0 == 0 {
            return Ok(None);
        }
        self.0 -= 1;
        Ok(Some(self.0 + 1))
    }

    fn describe(&self) -> String {
        format!("countdown({})", self.0)
    }
}

#[test]
fn custom_sources_plug_in() -> anyhow::Result<()> {
    let mut s = Stream::from_source(Countdown(3));
    assert_eq!(s.pipeline().source_description(), "countdown(3)");
    assert!(!s.pipeline().is_source_infinite());
    assert_eq!(s.to_vec()?, vec![3, 2, 1]);

    let mut arr = ArraySource::new(vec!["x", "y"]);
    assert_eq!(arr.produce_next()?, Some("x"));
    assert_eq!(Stream::from_source(arr).to_vec()?, vec!["y"]);
    Ok(())
}

#[test]
fn failing_source_aborts_terminal() {
    struct Broken;
    impl Source<i32> for Broken {
        fn produce_next(&mut self) -> anyhow::Result<Option<i32>> {
            anyhow::bail!("device unplugged")
        }
        fn describe(&self) -> String {
            "broken".into()
        }
    }

    let err = Stream::from_source(Broken).map(|x| x * 2).count().unwrap_err();
    assert_eq!(err.to_string(), "device unplugged");
}
