use crate::queue::{MEAN_PACKET_SIZE, PiasThresholds, ThresholdError};

#[test]
fn classifier_walks_the_ladder_and_saturates() {
    let t = PiasThresholds::new(vec![100, 300, 600], 4).expect("valid ladder");
    assert_eq!(t.priority_of(50), 0);
    assert_eq!(t.priority_of(100), 0);
    assert_eq!(t.priority_of(150), 1);
    assert_eq!(t.priority_of(450), 2);
    assert_eq!(t.priority_of(700), 3);
}

#[test]
fn classifier_boundary_values_are_inclusive() {
    let t = PiasThresholds::new(vec![100, 300, 600], 4).expect("valid ladder");
    assert_eq!(t.priority_of(0), 0);
    assert_eq!(t.priority_of(300), 1);
    assert_eq!(t.priority_of(600), 2);
    assert_eq!(t.priority_of(601), 3);
    assert_eq!(t.priority_of(u64::MAX), 3);
}

#[test]
fn priority_number_limits_the_active_ladder() {
    // Three thresholds configured but only two classes active: the walk
    // uses the first rung only.
    let t = PiasThresholds::new(vec![100, 300, 600], 2).expect("valid ladder");
    assert_eq!(t.num_classes(), 2);
    assert_eq!(t.priority_of(50), 0);
    assert_eq!(t.priority_of(150), 1);
    assert_eq!(t.priority_of(10_000), 1);
}

#[test]
fn single_class_always_returns_zero() {
    let t = PiasThresholds::new(vec![], 1).expect("valid ladder");
    assert_eq!(t.priority_of(0), 0);
    assert_eq!(t.priority_of(u64::MAX), 0);
}

#[test]
fn default_ladder_matches_mean_packet_size_breakpoints() {
    let t = PiasThresholds::default();
    assert_eq!(t.num_classes(), 8);
    assert_eq!(t.priority_of(0), 0);
    assert_eq!(t.priority_of(750 * MEAN_PACKET_SIZE), 0);
    assert_eq!(t.priority_of(750 * MEAN_PACKET_SIZE + 1), 1);
    assert_eq!(t.priority_of(2325 * MEAN_PACKET_SIZE + 1), 7);
}

#[test]
fn construction_rejects_bad_ladders() {
    assert_eq!(
        PiasThresholds::new(vec![100, 100], 3),
        Err(ThresholdError::NotAscending { index: 1 })
    );
    assert_eq!(
        PiasThresholds::new(vec![100, 50], 3),
        Err(ThresholdError::NotAscending { index: 1 })
    );
    assert_eq!(
        PiasThresholds::new(vec![100], 4),
        Err(ThresholdError::Incomplete { got: 1, need: 3 })
    );
    assert_eq!(
        PiasThresholds::new(vec![100], 0),
        Err(ThresholdError::ZeroPriorityNumber)
    );
}

#[test]
fn serialization_is_a_whitespace_separated_ascending_list() {
    let t = PiasThresholds::new(vec![100, 300, 600], 4).expect("valid ladder");
    assert_eq!(t.to_string(), "100 300 600");

    let parsed: PiasThresholds = "100 300 600".parse().expect("parse ladder");
    assert_eq!(parsed, t);
}

#[test]
fn parsing_rejects_malformed_specifications() {
    assert_eq!(
        "".parse::<PiasThresholds>(),
        Err(ThresholdError::Empty)
    );
    assert_eq!(
        "100 abc".parse::<PiasThresholds>(),
        Err(ThresholdError::Parse {
            value: "abc".to_string()
        })
    );
    assert_eq!(
        "300 100".parse::<PiasThresholds>(),
        Err(ThresholdError::NotAscending { index: 1 })
    );
}

#[test]
fn display_round_trips_the_default_ladder() {
    let t = PiasThresholds::default();
    let parsed: PiasThresholds = t.to_string().parse().expect("parse default ladder");
    assert_eq!(parsed, t);
}
