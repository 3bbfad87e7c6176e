//! Text rendering of probe reports, in the style of the classic `ping` and `traceroute` tools.

use crate::domain::network::graph::Graph;
use crate::domain::probe::report::{HopReport, PingOutcome, PingReport, TraceOutcome};
use crate::domain::routing::shortest_path::PathResult;
use crate::domain::utils::id::VertexId;

const TTL: u32 = 64;

pub fn ping_header(report: &PingReport) -> String {
    format!("\nPING {} {} data bytes\n", report.destination, report.packet_size_bytes)
}

pub fn ping_reply(report: &PingReport, seq: usize, time_ms: f64) -> String {
    format!("{} bytes from {}: icmp_seq={} ttl={} time={:.2} ms", report.packet_size_bytes, report.destination, seq, TTL, time_ms)
}

/// Lines printed for trials that got no answer.
pub fn ping_failures(report: &PingReport) -> Vec<String> {
    match &report.outcome {
        PingOutcome::Unreachable(failure) => (1..=report.transmitted).map(|seq| format!("From {} icmp_seq={} Destination Host Unreachable", failure.from, seq)).collect(),
        _ => Vec::new(),
    }
}

pub fn ping_summary(report: &PingReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("--- {} ping statistics ---", report.destination),
        format!(
            "{} packets transmitted, {} received, {}% packet loss, time {:.2}ms",
            report.transmitted,
            report.received,
            report.loss_percent().round(),
            report.total_time_ms()
        ),
    ];

    if let Some(stats) = report.stats() {
        lines.push(format!("rtt min/avg/max/mdev = {:.2}/{:.2}/{:.2}/{:.2} ms", stats.min, stats.avg, stats.max, stats.mdev));
    }

    if report.outcome == PingOutcome::Cancelled {
        lines.push("Ping cancelled.".to_string());
    }

    lines.push(String::new());
    lines
}

pub fn trace_header(destination: &VertexId, max_hops: usize) -> String {
    format!("\nTracing route to {} over a maximum of {} hops:\n", destination, max_hops)
}

pub fn trace_hop(hop: &HopReport) -> String {
    let samples: Vec<String> = hop.samples_ms.iter().map(|sample| format!("{:>8.2} ms", sample)).collect();
    format!("{:>3} {}    {}", hop.hop, samples.join(" "), hop.reached)
}

pub fn trace_footer(outcome: &TraceOutcome) -> Vec<String> {
    let mut lines = Vec::new();

    match outcome {
        TraceOutcome::Completed => {}
        TraceOutcome::MaxHopsReached => lines.push("\nMax hops reached".to_string()),
        TraceOutcome::Unreachable(failure) => lines.push(format!("\n{} has no route to {}: destination unreachable", failure.from, failure.to)),
        TraceOutcome::Cancelled => lines.push("\nTrace cancelled".to_string()),
    }

    lines.push("\nTrace complete.\n".to_string());
    lines
}

pub fn route(source: &VertexId, destination: &VertexId, path: &PathResult) -> Vec<String> {
    if path.is_unreachable() {
        return vec![format!("No route from {} to {}.", source, destination)];
    }

    let mut lines = vec![format!("\nRoute from {} to {} ({} hops, {:.3} ms):", source, destination, path.hops.len() - 1, path.total_cost() * 1000.0)];
    for (index, hop) in path.hops.iter().enumerate() {
        lines.push(format!("{:>3}  {:<8} {:>10.3} ms", index, hop.vertex.as_str(), hop.cost * 1000.0));
    }
    lines.push(String::new());
    lines
}

pub fn graph(graph: &Graph) -> Vec<String> {
    let mut lines = vec![String::from("\nGraph Structure:")];

    for vertex in graph.vertices() {
        lines.push(format!("{} ->", vertex));

        for adjacency in graph.neighbors(vertex).unwrap_or_default() {
            lines.push(format!(
                "    - Connected to: {}, Distance: {}m, Rate: {}bps",
                adjacency.neighbor,
                adjacency.link.distance(),
                adjacency.link.transmission_rate()
            ));
        }
    }

    lines.push(String::new());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::probe::report::RouteFailure;

    fn report(times_ms: Vec<f64>, outcome: PingOutcome) -> PingReport {
        PingReport {
            source: VertexId::new("H1"),
            destination: VertexId::new("H2"),
            packet_size_bytes: 60,
            transmitted: 4,
            received: times_ms.len(),
            times_ms,
            outcome,
        }
    }

    #[test]
    fn test_ping_lines() {
        let report = report(vec![1.0, 2.0, 3.0, 2.0], PingOutcome::Completed);

        assert_eq!(ping_header(&report), "\nPING H2 60 data bytes\n");
        assert_eq!(ping_reply(&report, 1, 1.234), "60 bytes from H2: icmp_seq=1 ttl=64 time=1.23 ms");

        let summary = ping_summary(&report);
        assert!(summary.contains(&"4 packets transmitted, 4 received, 0% packet loss, time 8.00ms".to_string()));
        assert!(summary.contains(&"rtt min/avg/max/mdev = 1.00/2.00/3.00/0.71 ms".to_string()));
        assert!(ping_failures(&report).is_empty());
    }

    #[test]
    fn test_unreachable_ping_lines() {
        let report = report(vec![], PingOutcome::Unreachable(RouteFailure { from: VertexId::new("H1"), to: VertexId::new("H2") }));

        let failures = ping_failures(&report);
        assert_eq!(failures.len(), 4);
        assert_eq!(failures[0], "From H1 icmp_seq=1 Destination Host Unreachable");

        let summary = ping_summary(&report);
        assert!(summary.contains(&"4 packets transmitted, 0 received, 100% packet loss, time 0.00ms".to_string()));
        assert!(!summary.iter().any(|line| line.starts_with("rtt")));
    }

    #[test]
    fn test_trace_lines() {
        let hop = HopReport { hop: 3, samples_ms: vec![1.0, 1.25, 1.5], reached: VertexId::new("CORE") };
        assert_eq!(trace_hop(&hop), "  3     1.00 ms     1.25 ms     1.50 ms    CORE");

        assert_eq!(trace_footer(&TraceOutcome::Completed), vec!["\nTrace complete.\n".to_string()]);
        assert_eq!(trace_footer(&TraceOutcome::MaxHopsReached)[0], "\nMax hops reached");
    }
}
