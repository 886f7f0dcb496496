use anyhow::Result;
use ironbrc::combiners::{CombineFn, LiftableCombiner, MinMeanMax, StationStats};
use ironbrc::Error;

fn folded(values: &[f64]) -> StationStats {
    let mut s = StationStats::identity();
    for &v in values {
        s.fold(v);
    }
    s
}

#[test]
fn identity_is_empty() {
    let s = StationStats::identity();
    assert!(s.is_empty());
    assert_eq!(s.count(), 0);
    assert_eq!(s.min(), f64::INFINITY);
    assert_eq!(s.max(), f64::NEG_INFINITY);
    assert_eq!(s.sum(), 0.0);
    assert_eq!(StationStats::default(), s);
}

#[test]
fn fold_tracks_min_max_sum_count() -> Result<()> {
    let s = folded(&[3.0, 1.0, 2.0]);
    assert_eq!(s.min(), 1.0);
    assert_eq!(s.max(), 3.0);
    assert_eq!(s.sum(), 6.0);
    assert_eq!(s.count(), 3);
    assert_eq!(s.mean()?, 2.0);
    Ok(())
}

#[test]
fn single_value_accumulator() -> Result<()> {
    let s = StationStats::from_value(-7.5);
    assert_eq!(s, folded(&[-7.5]));
    assert_eq!(s.mean()?, -7.5);
    Ok(())
}

#[test]
fn mean_of_identity_fails() {
    assert!(matches!(
        StationStats::identity().mean(),
        Err(Error::EmptyAccumulator)
    ));
}

#[test]
fn identity_is_neutral_for_merge() {
    let s = folded(&[4.5, -1.0, 12.3]);

    let mut left = StationStats::identity();
    left.merge(s);
    assert_eq!(left, s);

    let mut right = s;
    right.merge(StationStats::identity());
    assert_eq!(right, s);
}

#[test]
fn merge_is_associative_and_commutative() {
    // Halves keep every sum exact, so equality is bitwise.
    let a = folded(&[1.5, -2.0]);
    let b = folded(&[10.0]);
    let c = folded(&[-0.5, 3.0, 7.5]);

    let mut ab_c = a;
    ab_c.merge(b);
    ab_c.merge(c);

    let mut bc = b;
    bc.merge(c);
    let mut a_bc = a;
    a_bc.merge(bc);

    let mut c_b_a = c;
    c_b_a.merge(b);
    c_b_a.merge(a);

    assert_eq!(ab_c, a_bc);
    assert_eq!(ab_c, c_b_a);
    assert_eq!(ab_c, folded(&[1.5, -2.0, 10.0, -0.5, 3.0, 7.5]));
}

#[test]
fn bulk_build_matches_fold() {
    for len in [0usize, 1, 7, 8, 9, 16, 23, 100] {
        // Multiples of 0.5 sum exactly in any order.
        let values: Vec<f64> = (0..len)
            .map(|i| ((i * 37 % 41) as f64 - 20.0) / 2.0)
            .collect();
        assert_eq!(
            StationStats::from_values(&values),
            folded(&values),
            "len {len}"
        );
        assert_eq!(MinMeanMax.build_from_group(&values), folded(&values));
    }
}

#[test]
fn combiner_finishes_rounded_summary() -> Result<()> {
    let comb = MinMeanMax;
    let mut acc = comb.create();
    for v in [12.0, 8.0] {
        comb.add_input(&mut acc, v);
    }
    let mut other = comb.create();
    comb.add_input(&mut other, 10.0);
    comb.merge(&mut acc, other);

    let summary = comb.finish(acc)?;
    assert_eq!(summary.min, 8.0);
    assert_eq!(summary.mean, 10.0);
    assert_eq!(summary.max, 12.0);
    assert_eq!(summary.to_string(), "8.0/10.0/12.0");
    Ok(())
}

#[test]
fn combiner_refuses_to_finish_identity() {
    assert!(matches!(
        MinMeanMax.finish(MinMeanMax.create()),
        Err(Error::EmptyAccumulator)
    ));
}
