use crate::net::{Ecn, NodeId, Packet, SocketTags, Transport};
use crate::queue::{
    DEFAULT_PKT_BYTES, FifoQueue, PacketQueue, PfabricQueue, PiasQueue, PiasThresholds,
    mem_from_pkt,
};

fn pkt(id: u64, size_bytes: u32, tags: SocketTags) -> Packet {
    Packet {
        id,
        flow_id: tags.flow.unwrap_or(0),
        size_bytes,
        route: vec![NodeId(0), NodeId(1)],
        hop: 0,
        ecn: Ecn::NotEct,
        tags,
        transport: Transport::None,
    }
}

fn data(id: u64, priority: u64, flow: u64) -> Packet {
    pkt(id, 100, SocketTags::tagged(priority, flow, 0))
}

fn control(id: u64) -> Packet {
    pkt(id, 40, SocketTags::default())
}

#[test]
fn fifo_queue_preserves_arrival_order_and_accounting() {
    let mut q = FifoQueue::new();
    q.enqueue(pkt(1, 60, SocketTags::default()));
    q.enqueue(pkt(2, 40, SocketTags::default()));
    assert_eq!(q.len(), 2);
    assert_eq!(q.bytes(), 100);

    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
    assert!(q.dequeue().is_none());
    assert_eq!(q.len(), 0);
    assert_eq!(q.bytes(), 0);
}

#[test]
fn pfabric_serves_lowest_priority_flow_first_then_flow_fifo() {
    let mut q = PfabricQueue::new();
    // Flow A priority 10 (3 packets), flow B priority 5 (2 packets),
    // arrival order A1,B1,A2,B2,A3.
    q.enqueue(data(1, 10, 1)); // A1
    q.enqueue(data(2, 5, 2)); // B1
    q.enqueue(data(3, 10, 1)); // A2
    q.enqueue(data(4, 5, 2)); // B2
    q.enqueue(data(5, 10, 1)); // A3

    let order: Vec<u64> = std::iter::from_fn(|| q.dequeue().map(|p| p.id)).collect();
    assert_eq!(order, vec![2, 4, 1, 3, 5]); // B1,B2,A1,A2,A3
    assert_eq!(q.bytes(), 0);
}

#[test]
fn pfabric_dequeues_oldest_segment_of_the_winning_flow() {
    let mut q = PfabricQueue::new();
    // Later segments of a flow carry smaller remaining-bytes priorities.
    q.enqueue(data(1, 100, 7));
    q.enqueue(data(2, 50, 7));

    // The newest segment wins the scan, but its flow's oldest goes first.
    assert_eq!(q.peek().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
}

#[test]
fn pfabric_control_packets_bypass_data_scheduling() {
    let mut q = PfabricQueue::new();
    q.enqueue(data(1, 5, 1));
    q.enqueue(data(2, 1, 2));
    q.enqueue(control(3));

    // The control packet was enqueued last but dequeues first.
    assert_eq!(q.dequeue().expect("pkt").id, 3);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
    assert_eq!(q.dequeue().expect("pkt").id, 1);
}

#[test]
fn pfabric_control_packets_are_fifo_among_themselves() {
    let mut q = PfabricQueue::new();
    q.enqueue(control(1));
    q.enqueue(data(2, 1, 1));
    q.enqueue(control(3));

    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 3);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
}

#[test]
fn pfabric_equal_priorities_break_ties_by_arrival_order() {
    let mut q = PfabricQueue::new();
    q.enqueue(data(1, 5, 1));
    q.enqueue(data(2, 5, 2));

    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
}

#[test]
fn pfabric_flow_grouping_includes_partially_tagged_segments() {
    let mut q = PfabricQueue::new();
    // Oldest segment of flow 7 lost its priority tag; it still belongs
    // to the flow, so it is served first once the flow wins the scan.
    q.enqueue(pkt(
        1,
        100,
        SocketTags {
            priority: None,
            flow: Some(7),
            tos: 0,
        },
    ));
    q.enqueue(data(2, 5, 7));

    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
}

#[test]
fn pfabric_drains_partially_tagged_packets_in_fifo_order() {
    let mut q = PfabricQueue::new();
    q.enqueue(pkt(
        1,
        100,
        SocketTags {
            priority: Some(9),
            flow: None,
            tos: 0,
        },
    ));
    q.enqueue(pkt(
        2,
        100,
        SocketTags {
            priority: None,
            flow: Some(3),
            tos: 0,
        },
    ));

    // Neither is control (one tag present) and neither is fully tagged:
    // the queue falls back to arrival order instead of stalling.
    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
    assert!(q.dequeue().is_none());
}

#[test]
fn pfabric_peek_is_idempotent_and_consistent_with_dequeue() {
    let mut q = PfabricQueue::new();
    q.enqueue(data(1, 10, 1));
    q.enqueue(data(2, 5, 2));

    let first = q.peek().expect("pkt").id;
    assert_eq!(q.peek().expect("pkt").id, first);
    assert_eq!(q.peek().expect("pkt").id, first);
    assert_eq!(q.len(), 2);
    assert_eq!(q.bytes(), 200);

    assert_eq!(q.dequeue().expect("pkt").id, first);
    assert_eq!(q.len(), 1);
}

#[test]
fn pfabric_conserves_items_across_interleaved_operations() {
    let mut q = PfabricQueue::new();
    let mut dequeued = 0usize;
    let mut enqueued = 0usize;

    for round in 0..10u64 {
        for i in 0..5u64 {
            let id = round * 10 + i;
            q.enqueue(data(id, (id % 7) + 1, id % 3));
            enqueued += 1;
        }
        for _ in 0..3 {
            if q.dequeue().is_some() {
                dequeued += 1;
            }
        }
    }
    while q.dequeue().is_some() {
        dequeued += 1;
    }

    assert_eq!(dequeued, enqueued);
    assert_eq!(q.len(), 0);
    assert_eq!(q.bytes(), 0);
}

#[test]
fn pias_queue_serves_bands_in_strict_priority_order() {
    let mut q = PiasQueue::new(4);
    q.enqueue(data(1, 2, 1)); // band 2
    q.enqueue(data(2, 0, 1)); // band 0
    q.enqueue(data(3, 3, 2)); // band 3
    q.enqueue(data(4, 0, 2)); // band 0

    let order: Vec<u64> = std::iter::from_fn(|| q.dequeue().map(|p| p.id)).collect();
    assert_eq!(order, vec![2, 4, 1, 3]);
}

#[test]
fn pias_queue_untagged_control_rides_the_top_band() {
    let mut q = PiasQueue::new(4);
    q.enqueue(data(1, 1, 1));
    q.enqueue(control(2));

    assert_eq!(q.dequeue().expect("pkt").id, 2);
    assert_eq!(q.dequeue().expect("pkt").id, 1);
}

#[test]
fn pias_queue_clamps_oversized_levels_to_lowest_band() {
    let mut q = PiasQueue::new(2);
    q.enqueue(data(1, 99, 1)); // clamped to band 1
    q.enqueue(data(2, 1, 2)); // band 1
    q.enqueue(data(3, 0, 3)); // band 0

    assert_eq!(q.dequeue().expect("pkt").id, 3);
    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
}

#[test]
fn pias_queue_peek_matches_dequeue_and_tracks_bytes() {
    let mut q = PiasQueue::new(PiasThresholds::default().num_classes());
    q.enqueue(data(1, 5, 1));
    q.enqueue(data(2, 0, 2));

    assert_eq!(q.peek().expect("pkt").id, 2);
    assert_eq!(q.peek().expect("pkt").id, 2);
    assert_eq!(q.bytes(), 200);
    assert_eq!(q.len(), 2);

    assert_eq!(q.dequeue().expect("pkt").id, 2);
    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert!(q.peek().is_none());
    assert_eq!(q.bytes(), 0);
}

#[test]
fn mem_from_pkt_multiplies_default_packet_bytes_and_saturates() {
    assert_eq!(mem_from_pkt(0), 0);
    assert_eq!(mem_from_pkt(2), DEFAULT_PKT_BYTES.saturating_mul(2));
    assert_eq!(mem_from_pkt(u64::MAX), u64::MAX);
}
