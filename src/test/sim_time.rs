use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_nanos(1), SimTime(1));
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
}

#[test]
fn sim_time_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimTime::from_micros(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
}

#[test]
fn sim_time_as_secs_f64() {
    assert_eq!(SimTime::ZERO.as_secs_f64(), 0.0);
    assert_eq!(SimTime::from_secs(2).as_secs_f64(), 2.0);
    assert_eq!(SimTime::from_millis(1_500).as_secs_f64(), 1.5);
}

#[test]
fn sim_time_saturating_add_and_checked_sub() {
    let a = SimTime(10);
    let b = SimTime(3);
    assert_eq!(a.saturating_add(b), SimTime(13));
    assert_eq!(SimTime(u64::MAX).saturating_add(SimTime(1)), SimTime(u64::MAX));

    assert_eq!(a.checked_sub(b), Some(SimTime(7)));
    assert_eq!(b.checked_sub(a), None);
}
