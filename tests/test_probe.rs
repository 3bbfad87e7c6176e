use std::sync::Arc;

use net_probe_sim::DEFAULT_TOPOLOGY;
use net_probe_sim::domain::network::link::Link;
use net_probe_sim::domain::probe::jitter::{DEFAULT_JITTER_MAX_MS, DEFAULT_JITTER_MIN_MS, FixedJitter, UniformJitter};
use net_probe_sim::domain::probe::ping::{PingOptions, ping};
use net_probe_sim::domain::probe::report::{PingOutcome, TraceOutcome};
use net_probe_sim::domain::probe::traceroute::{TraceOptions, traceroute};
use net_probe_sim::domain::routing::routing_table::RoutingTables;
use net_probe_sim::domain::routing::session::{BuildMode, NetworkSession};
use net_probe_sim::domain::routing::shortest_path::PACKET_SIZE_BITS;
use net_probe_sim::domain::utils::id::VertexId;
use net_probe_sim::loader::parser::load_topology_str;
use net_probe_sim::terminal::pacer::RecordingPacer;
use net_probe_sim::terminal::{Flow, Terminal};

fn v(name: &str) -> VertexId {
    VertexId::new(name)
}

fn campus_tables() -> RoutingTables {
    RoutingTables::build(&load_topology_str(DEFAULT_TOPOLOGY).unwrap()).unwrap()
}

fn host_ms() -> f64 {
    Link::new(10_000.0, 1e8).unwrap().delay(PACKET_SIZE_BITS) * 1000.0
}

fn major_ms() -> f64 {
    Link::new(700_000.0, 5e8).unwrap().delay(PACKET_SIZE_BITS) * 1000.0
}

#[test]
fn test_ping_across_campus() {
    let tables = campus_tables();
    let report = ping(&tables, &v("H1"), &v("H55"), &mut FixedJitter(0.0), &PingOptions::default()).unwrap();

    let round_trip = 2.0 * (2.0 * host_ms() + 2.0 * major_ms());
    assert_eq!(report.outcome, PingOutcome::Completed);
    assert_eq!(report.received, 4);
    for time in &report.times_ms {
        assert!((time - round_trip).abs() < 1e-9);
    }
}

#[test]
fn test_ping_noise_stays_in_bounds() {
    let tables = campus_tables();
    let report = ping(&tables, &v("H1"), &v("H2"), &mut UniformJitter::seeded(42), &PingOptions::default()).unwrap();

    let round_trip = 4.0 * host_ms();
    for time in &report.times_ms {
        let noise = time - round_trip;
        assert!(noise >= DEFAULT_JITTER_MIN_MS - 1e-9 && noise <= DEFAULT_JITTER_MAX_MS + 1e-9, "noise {} out of range", noise);
    }
}

#[test]
fn test_traceroute_across_campus() {
    let tables = campus_tables();
    let report = traceroute(&tables, &v("H1"), &v("H55"), &mut FixedJitter(0.0), TraceOptions::default()).unwrap();

    assert_eq!(report.outcome, TraceOutcome::Completed);
    let reached: Vec<VertexId> = report.hops.iter().map(|hop| hop.reached.clone()).collect();
    assert_eq!(reached, ["E3", "A2", "CORE", "A1", "E1", "H55"].map(v).to_vec());

    let expected = [host_ms(), host_ms(), host_ms() + major_ms(), host_ms() + 2.0 * major_ms(), host_ms() + 2.0 * major_ms(), 2.0 * host_ms() + 2.0 * major_ms()];
    for (hop, one_way) in report.hops.iter().zip(expected) {
        for sample in &hop.samples_ms {
            assert!((sample - 2.0 * one_way).abs() < 1e-9, "hop {}: {} != {}", hop.hop, sample, 2.0 * one_way);
        }
    }
}

#[test]
fn test_probes_after_link_failure() {
    let session = NetworkSession::new(load_topology_str(DEFAULT_TOPOLOGY).unwrap(), BuildMode::Sequential).unwrap();
    session.rebuild(|graph| graph.unlink_vertices(&v("A2"), &v("CORE")).map(|_| ())).unwrap();
    let snapshot = session.snapshot();

    let ping_report = ping(snapshot.tables(), &v("H1"), &v("H55"), &mut FixedJitter(0.0), &PingOptions::default()).unwrap();
    assert_eq!(ping_report.received, 0);
    assert_eq!(ping_report.loss_percent(), 100.0);

    let trace = traceroute(snapshot.tables(), &v("H1"), &v("H55"), &mut FixedJitter(0.0), TraceOptions::default()).unwrap();
    assert!(matches!(trace.outcome, TraceOutcome::Unreachable(_)));
    assert!(trace.hops.is_empty());
}

#[test]
fn test_terminal_session() {
    let session = Arc::new(NetworkSession::new(load_topology_str(DEFAULT_TOPOLOGY).unwrap(), BuildMode::Parallel).unwrap());
    let pacer = RecordingPacer::default();
    let mut terminal = Terminal::new(session, v("H1"), Box::new(UniformJitter::seeded(7)), Box::new(pacer.clone()), Vec::new()).unwrap();

    for line in ["ping H2", "traceroute H55", "change to H55", "ping H1"] {
        assert_eq!(terminal.execute(line).unwrap(), Flow::Continue);
    }
    assert_eq!(terminal.prompt(), "root@H55:~$ ");
    assert_eq!(terminal.execute("exit").unwrap(), Flow::Exit);

    let output = String::from_utf8(terminal.output().clone()).unwrap();
    assert_eq!(output.matches("4 packets transmitted, 4 received, 0% packet loss").count(), 2);
    assert!(output.contains("Tracing route to H55 over a maximum of 30 hops:"));
    assert!(output.contains("Trace complete."));

    // Four replies per ping and one pause per traceroute hop.
    assert_eq!(pacer.recorded().len(), 4 + 6 + 4);
}
