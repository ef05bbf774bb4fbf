use crate::cc::{
    AckFlush, CcEvent, CongState, CongestionOps, Dctcp, NewReno, SocketState,
};
use crate::sim::SimTime;

const G: f64 = 1.0 / 16.0;
const MSS: u32 = 1460;

fn tcb(cwnd: u64, ssthresh: u64) -> SocketState {
    SocketState::new(cwnd, ssthresh, MSS)
}

#[test]
fn ce_edge_sets_demand_flag_without_pending_ack() {
    let mut cc = Dctcp::new(G);
    let mut t = tcb(10_000, 100_000);

    // No delayed ACK pending: the edge only raises the demand flag.
    assert_eq!(cc.cwnd_event(&mut t, CcEvent::EcnIsCe), None);
    assert!(t.demand_cwr);

    // Repeated CE is not an edge.
    assert_eq!(cc.cwnd_event(&mut t, CcEvent::EcnIsCe), None);
    assert!(t.demand_cwr);
}

#[test]
fn ce_edge_flushes_pending_delayed_ack() {
    let mut cc = Dctcp::new(G);
    let mut t = tcb(10_000, 100_000);

    assert_eq!(cc.cwnd_event(&mut t, CcEvent::DelayAckReserved), None);
    // No CE -> CE with an ACK held: flush it plain, before the CE data.
    assert_eq!(
        cc.cwnd_event(&mut t, CcEvent::EcnIsCe),
        Some(AckFlush::Plain)
    );
    assert!(t.demand_cwr);
}

#[test]
fn ce_clear_flushes_with_ece_and_drops_demand_flag() {
    let mut cc = Dctcp::new(G);
    let mut t = tcb(10_000, 100_000);

    assert_eq!(cc.cwnd_event(&mut t, CcEvent::EcnIsCe), None);
    assert_eq!(cc.cwnd_event(&mut t, CcEvent::DelayAckReserved), None);
    // CE -> No CE: the held ACK still covers CE data, so it carries ECE.
    assert_eq!(
        cc.cwnd_event(&mut t, CcEvent::EcnNoCe),
        Some(AckFlush::WithEce)
    );
    assert!(!t.demand_cwr);

    // Clearing again is not an edge.
    assert_eq!(cc.cwnd_event(&mut t, CcEvent::EcnNoCe), None);
}

#[test]
fn delayed_ack_reservation_toggles_have_no_other_side_effect() {
    let mut cc = Dctcp::new(G);
    let mut t = tcb(10_000, 100_000);

    assert_eq!(cc.cwnd_event(&mut t, CcEvent::DelayAckReserved), None);
    assert!(!t.demand_cwr);
    assert_eq!(cc.cwnd_event(&mut t, CcEvent::DelayAckNoReserved), None);
    assert!(!t.demand_cwr);

    // After cancellation a CE edge has nothing to flush.
    assert_eq!(cc.cwnd_event(&mut t, CcEvent::EcnIsCe), None);
}

#[test]
fn dctcp_holds_window_during_cwr() {
    let mut cc = Dctcp::new(G);
    let mut t = tcb(10_000, 100_000);

    t.cong_state = CongState::Cwr;
    cc.increase_window(&mut t, 2);
    assert_eq!(t.cwnd_bytes, 10_000);

    t.cong_state = CongState::Open;
    cc.increase_window(&mut t, 2);
    // Slow start below ssthresh: one MSS per acked segment.
    assert_eq!(t.cwnd_bytes, 10_000 + 2 * MSS as u64);
}

#[test]
fn dctcp_ss_thresh_scales_with_alpha() {
    let mut cc = Dctcp::new(G);
    let mut t = tcb(100_000, 1_000_000);

    // One fully-marked window: alpha = g.
    cc.pkts_acked(&mut t, 10, true, 20_000, 10_000, SimTime::ZERO);
    assert!((cc.alpha() - G).abs() < 1e-12);

    let expected = ((1.0 - cc.alpha() / 2.0) * 100_000.0) as u64;
    assert_eq!(cc.ss_thresh(&t, 10_000), expected.max(5_000));
}

#[test]
fn dctcp_ss_thresh_floors_at_half_inflight() {
    let cc = Dctcp::new(G);
    let t = tcb(1_000, 1_000_000);
    // Tiny window, large in-flight: the floor wins.
    assert_eq!(cc.ss_thresh(&t, 1_000_000), 500_000);
}

#[test]
fn recovery_ss_thresh_delegates_to_new_reno_baseline() {
    let mut cc = Dctcp::new(G);
    let mut t = tcb(100_000, 1_000_000);
    cc.pkts_acked(&mut t, 10, true, 20_000, 10_000, SimTime::ZERO);

    t.cong_state = CongState::Recovery;
    let reno = NewReno;
    assert_eq!(cc.ss_thresh(&t, 50_000), reno.ss_thresh(&t, 50_000));
    assert_eq!(cc.ss_thresh(&t, 50_000), 25_000);
    // The baseline floor of two segments.
    assert_eq!(reno.ss_thresh(&t, 100), 2 * MSS as u64);
}

#[test]
fn new_reno_congestion_avoidance_grows_sublinearly() {
    let mut cc = NewReno;
    let mut t = tcb(100_000, 10_000); // above ssthresh

    cc.increase_window(&mut t, 1);
    let inc = (MSS as u64 * MSS as u64) / 100_000;
    assert_eq!(t.cwnd_bytes, 100_000 + inc.max(1));
}
