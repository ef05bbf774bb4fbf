use crate::net::{Ecn, NodeId, Packet, SocketTags, TcpSegment, Transport};

fn pkt(route: Vec<NodeId>) -> Packet {
    Packet {
        id: 1,
        flow_id: 10,
        size_bytes: 100,
        route,
        hop: 0,
        ecn: Ecn::NotEct,
        tags: SocketTags::default(),
        transport: Transport::None,
    }
}

#[test]
fn packet_route_walks_path() {
    let path = vec![NodeId(1), NodeId(2), NodeId(3)];
    let mut p = pkt(path);
    assert_eq!(p.src(), NodeId(1));
    assert_eq!(p.dst(), NodeId(3));
    assert_eq!(p.at(), NodeId(1));
    assert!(p.has_next());
    assert_eq!(p.next(), Some(NodeId(2)));

    p = p.advance();
    assert_eq!(p.at(), NodeId(2));
    assert_eq!(p.next(), Some(NodeId(3)));

    p = p.advance();
    assert_eq!(p.at(), NodeId(3));
    assert!(!p.has_next());
    assert_eq!(p.next(), None);
}

#[test]
fn packet_mark_ce_if_ect_only_marks_ect0() {
    let mut p = pkt(vec![NodeId(0), NodeId(1)]);

    p.ecn = Ecn::NotEct;
    assert!(!p.mark_ce_if_ect());
    assert_eq!(p.ecn, Ecn::NotEct);

    p.ecn = Ecn::Ect0;
    assert!(p.mark_ce_if_ect());
    assert_eq!(p.ecn, Ecn::Ce);

    p.ecn = Ecn::Ce;
    assert!(!p.mark_ce_if_ect());
    assert_eq!(p.ecn, Ecn::Ce);
}

#[test]
fn ecn_helpers_match_expected_states() {
    assert!(Ecn::Ect0.is_ect());
    assert!(!Ecn::NotEct.is_ect());
    assert!(!Ecn::Ce.is_ect());

    assert!(Ecn::Ce.is_ce());
    assert!(!Ecn::NotEct.is_ce());
    assert!(!Ecn::Ect0.is_ce());
}

#[test]
fn tags_control_requires_both_tags_absent() {
    assert!(SocketTags::default().is_control());

    let full = SocketTags::tagged(42, 7, 0);
    assert!(!full.is_control());
    assert_eq!(full.priority, Some(42));
    assert_eq!(full.flow, Some(7));

    // Exactly one tag present is not control traffic.
    let prio_only = SocketTags {
        priority: Some(1),
        flow: None,
        tos: 0,
    };
    assert!(!prio_only.is_control());

    let flow_only = SocketTags {
        priority: None,
        flow: Some(1),
        tos: 0,
    };
    assert!(!flow_only.is_control());
}

#[test]
fn packet_transport_defaults_to_none_and_is_mutable() {
    let mut p = pkt(vec![NodeId(0), NodeId(1)]);
    match p.transport {
        Transport::None => {}
        _ => panic!("expected Transport::None"),
    }

    p.transport = Transport::Tcp(TcpSegment::Ack {
        ack: 123,
        ece: true,
    });
    match p.transport {
        Transport::Tcp(TcpSegment::Ack { ack, ece }) => {
            assert_eq!(ack, 123);
            assert!(ece);
        }
        _ => panic!("expected Transport::Tcp Ack"),
    }
}
