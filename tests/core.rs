use ironstream::testing::*;
use ironstream::*;


#[test]
fn map_matches_elementwise_application() -> anyhow::Result<()> {
    let input = vec![3, -1, 4, 1, -5, 9];
    let expected: Vec<i32> = input.iter().map(|x| x * x + 1).collect();

    let out = Stream::from_vec(input).map(|x| x * x + 1).to_vec()?;

    assert_collections_equal(&out, &expected);
    Ok(())
}

#[test]
fn filter_count_matches_predicate() -> anyhow::Result<()> {
    let words = vec!["alpha", "beta", "gamma", "delta", "pi"];
    let expected = words.iter().filter(|w| w.len() > 4).count();

    let n = Stream::from_vec(words).filter(|w| w.len() > 4).count()?;

    assert_eq!(n, expected);
    assert_eq!(n, 3);
    Ok(())
}

#[test]
fn map_filter_flat_map_chain() -> anyhow::Result<()> {
    let lines = vec![
        "The quick brown fox".to_string(),
        "jumps over the lazy dog".to_string(),
    ];

    let out = Stream::from_vec(lines)
        .flat_map(|s: String| {
            s.split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .filter(|w| w.len() >= 4)
        .to_vec()?;

    assert_collections_equal(
        &out,
        &[
            "quick".to_string(),
            "brown".to_string(),
            "jumps".to_string(),
            "over".to_string(),
            "lazy".to_string(),
        ],
    );
    Ok(())
}

#[test]
fn intermediate_operations_do_no_work() {
    let calls = CallCounter::new();
    let s = Stream::of([1, 2, 3])
        .map(counting_map(&calls, |x: i32| x * 2))
        .filter(counting_predicate(&calls, |x: &i32| *x > 0));

    assert_eq!(calls.get(), 0);
    assert!(!s.has_started());
    assert_eq!(s.pipeline().len(), 2);
}

#[test]
fn match_ops_on_empty_never_call_predicate() -> anyhow::Result<()> {
    let calls = CallCounter::new();

    let mut pred = counting_predicate(&calls, |_: &i32| true);
    assert!(Stream::<i32>::empty().all_match(&mut pred)?);
    assert!(!Stream::<i32>::empty().any_match(&mut pred)?);
    assert!(Stream::<i32>::empty().none_match(&mut pred)?);

    assert_eq!(calls.get(), 0);
    Ok(())
}

#[test]
fn match_ops_short_circuit() -> anyhow::Result<()> {
    let calls = CallCounter::new();

    let any = Stream::iterate(1, |n| n + 1)
        .peek({
            let calls = calls.clone();
            move |_| calls.hit()
        })
        .any_match(|n| *n == 4)?;
    assert!(any);
    assert_eq!(calls.get(), 4);

    assert!(!Stream::iterate(1, |n| n + 1).all_match(|n| *n < 10)?);
    assert!(!Stream::iterate(1, |n| n + 1).none_match(|n| *n % 7 == 0)?);
    Ok(())
}

#[test]
fn find_first_pulls_one_element() -> anyhow::Result<()> {
    let calls = CallCounter::new();
    let mut s = Stream::iterate(10, |n| n + 10).map(counting_map(&calls, |n: i32| n / 10));

    assert_eq!(s.find_first()?, Some(1));
    assert_eq!(calls.get(), 1);
    assert_eq!(s.find_any()?, Some(2));
    assert_eq!(calls.get(), 2);
    Ok(())
}

#[test]
fn find_on_empty_is_none() -> anyhow::Result<()> {
    assert_eq!(Stream::<u8>::empty().find_first()?, None);
    assert_eq!(Stream::<u8>::empty().find_any()?, None);
    Ok(())
}

#[test]
fn get_first_requires_an_element() -> anyhow::Result<()> {
    assert_eq!(Stream::once("only").get_first()?, "only");
    assert_stream_error!(Stream::<u8>::empty().get_first(), StreamError::EmptyAccess);
    Ok(())
}

#[test]
fn peek_sees_only_pulled_elements() -> anyhow::Result<()> {
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();

    let out = Stream::range(0, 100)
        .peek(move |x| sink.borrow_mut().push(*x))
        .limit(3)
        .to_vec()?;

    assert_eq!(out, vec![0, 1, 2]);
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    Ok(())
}

#[test]
fn skip_and_limit_compose() -> anyhow::Result<()> {
    assert_eq!(Stream::range(0, 10).skip(7).to_vec()?, vec![7, 8, 9]);
    assert!(Stream::range(0, 10).skip(20).to_vec()?.is_empty());
    assert_eq!(Stream::range(0, 10).skip(2).limit(3).to_vec()?, vec![2, 3, 4]);
    assert_eq!(Stream::range(0, 10).limit(3).skip(2).to_vec()?, vec![2]);
    Ok(())
}

#[test]
fn limit_zero_never_pulls_the_source() -> anyhow::Result<()> {
    let calls = CallCounter::new();
    let n = Stream::generate(counting_supplier(&calls)).limit(0).count()?;

    assert_eq!(n, 0);
    assert_eq!(calls.get(), 0);
    Ok(())
}

#[test]
fn flat_map_handles_empty_and_many() -> anyhow::Result<()> {
    let out = Stream::of([0usize, 3, 0, 1, 2])
        .flat_map(|n| vec![n; n])
        .to_vec()?;

    assert_eq!(out, vec![3, 3, 3, 1, 2, 2]);
    Ok(())
}

#[test]
fn flatten_nested_vectors() -> anyhow::Result<()> {
    let out = Stream::of([vec![1, 2], vec![], vec![3]]).flatten().to_vec()?;
    assert_eq!(out, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn flat_map_stream_with_infinite_children_is_lazy() -> anyhow::Result<()> {
    let out = Stream::of([7, 8])
        .flat_map_stream(|n| Stream::generate(move || n))
        .limit(3)
        .to_vec()?;

    assert_eq!(out, vec![7, 7, 7]);
    Ok(())
}

#[test]
fn flat_map_option_drops_none() -> anyhow::Result<()> {
    let out = Stream::of(["1", "two", "3"])
        .flat_map_option(|s| s.parse::<i32>().ok())
        .to_vec()?;

    assert_eq!(out, vec![1, 3]);
    Ok(())
}

#[test]
fn second_terminal_sees_only_the_remainder() -> anyhow::Result<()> {
    let mut s = Stream::of([1, 2, 3, 4]);
    assert!(!s.has_started());

    assert_eq!(s.find_first()?, Some(1));
    assert!(s.has_started());
    assert_eq!(s.to_vec()?, vec![2, 3, 4]);

    assert!(s.to_vec()?.is_empty());
    assert_eq!(s.count()?, 0);
    assert_eq!(s.reduce(|a, b| a + b)?, None);
    assert!(!s.pipeline().has_next());
    Ok(())
}

#[test]
fn into_iter_composes_with_std() -> anyhow::Result<()> {
    let mut squares = Vec::new();
    for x in Stream::range(1, 4).map(|x| x * x) {
        squares.push(x?);
    }
    assert_eq!(squares, vec![1, 4, 9]);

    let total: i64 = Stream::range(1i64, 5)
        .into_iter()
        .collect::<anyhow::Result<Vec<_>>>()?
        .into_iter()
        .sum();
    assert_eq!(total, 10);
    Ok(())
}
