//! Interactive front end: a shell prompt "logged in" on one vertex of the network.

pub mod command;
pub mod pacer;
pub mod render;

use crate::domain::network::link::Link;
use crate::domain::probe::jitter::JitterSource;
use crate::domain::probe::ping::{PingOptions, ping};
use crate::domain::probe::report::TraceOutcome;
use crate::domain::probe::traceroute::{TraceOptions, TraceWalk};
use crate::domain::routing::session::NetworkSession;
use crate::domain::utils::id::VertexId;
use crate::error::{Error, Result};
use command::{Command, USAGE};
use pacer::Pacer;
use std::io::Write;
use std::sync::Arc;

const UNKNOWN_DESTINATION: &str = "The provided destination does not exist in the network.";
const UNKNOWN_HOST: &str = "The provided host does not exist in the network.";
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Whether the read loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct Terminal<W: Write> {
    session: Arc<NetworkSession>,
    current: VertexId,
    jitter: Box<dyn JitterSource>,
    pacer: Box<dyn Pacer>,
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(session: Arc<NetworkSession>, start: VertexId, jitter: Box<dyn JitterSource>, pacer: Box<dyn Pacer>, out: W) -> Result<Self> {
        session.snapshot().graph().contains_or_err(&start)?;
        Ok(Self { session, current: start, jitter, pacer, out })
    }

    pub fn current(&self) -> &VertexId {
        &self.current
    }

    pub fn prompt(&self) -> String {
        format!("root@{}:~$ ", self.current)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Runs one input line. Only output failures are errors, everything else is reported to the
    /// user and the terminal keeps running.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.out, "{}", err)?;
                writeln!(self.out, "{}", USAGE)?;
                return Ok(Flow::Continue);
            }
        };

        log::debug!("{} executes {:?}", self.current, command);

        let result = match command {
            Command::Ping(destination) => self.run_ping(&destination),
            Command::Traceroute(destination) => self.run_traceroute(&destination),
            Command::Route(destination) => self.run_route(&destination),
            Command::Links => self.write_lines(render::graph(self.session.snapshot().graph())),
            Command::Link { a, b, distance, transmission_rate } => self.run_link(&a, &b, distance, transmission_rate),
            Command::Unlink { a, b } => self.run_unlink(&a, &b),
            Command::ChangeTo(host) => self.change_to(host),
            Command::Clear => {
                write!(self.out, "{}", CLEAR_SCREEN)?;
                Ok(())
            }
            Command::Help => self.write_lines(vec![USAGE.to_string()]),
            Command::Exit => return Ok(Flow::Exit),
            Command::Empty => Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(Error::IoError(err)) => return Err(Error::IoError(err)),
            Err(err) => {
                log::warn!("Command '{}' failed: {}", line.trim(), err);
                writeln!(self.out, "{}", err)?;
            }
        }

        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn write_lines(&mut self, lines: Vec<String>) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn destination_exists(&mut self, destination: &VertexId) -> Result<bool> {
        if self.session.snapshot().graph().contains(destination) {
            return Ok(true);
        }
        writeln!(self.out, "{}", UNKNOWN_DESTINATION)?;
        Ok(false)
    }

    fn run_ping(&mut self, destination: &VertexId) -> Result<()> {
        if !self.destination_exists(destination)? {
            return Ok(());
        }

        let topology = self.session.snapshot();
        let report = ping(topology.tables(), &self.current, destination, self.jitter.as_mut(), &PingOptions::default())?;

        writeln!(self.out, "{}", render::ping_header(&report))?;
        for (index, time_ms) in report.times_ms.iter().enumerate() {
            self.pacer.pause_ms(*time_ms);
            writeln!(self.out, "{}", render::ping_reply(&report, index + 1, *time_ms))?;
            self.out.flush()?;
        }

        self.write_lines(render::ping_failures(&report))?;
        self.write_lines(render::ping_summary(&report))
    }

    fn run_traceroute(&mut self, destination: &VertexId) -> Result<()> {
        if !self.destination_exists(destination)? {
            return Ok(());
        }

        let topology = self.session.snapshot();
        let mut walk = TraceWalk::new(topology.tables(), &self.current, destination, self.jitter.as_mut(), TraceOptions::default())?;

        writeln!(self.out, "{}", render::trace_header(destination, walk.max_hops()))?;
        for hop in walk.by_ref() {
            self.pacer.pause_ms(hop.samples_ms.iter().copied().fold(0.0, f64::max));
            writeln!(self.out, "{}", render::trace_hop(&hop))?;
            self.out.flush()?;
        }

        let outcome = walk.outcome().cloned().unwrap_or(TraceOutcome::Completed);

        self.write_lines(render::trace_footer(&outcome))
    }

    fn run_route(&mut self, destination: &VertexId) -> Result<()> {
        if !self.destination_exists(destination)? {
            return Ok(());
        }

        let path = self.session.snapshot().shortest_path(&self.current, destination)?;
        self.write_lines(render::route(&self.current, destination, &path))
    }

    fn run_link(&mut self, a: &VertexId, b: &VertexId, distance: f64, transmission_rate: f64) -> Result<()> {
        let link = Link::new(distance, transmission_rate)?;
        self.session.rebuild(|graph| {
            graph.add_vertex(a);
            graph.add_vertex(b);
            graph.link_vertices(a, b, link)
        })?;
        writeln!(self.out, "Linked {} and {}. Routing tables rebuilt.", a, b)?;
        Ok(())
    }

    fn run_unlink(&mut self, a: &VertexId, b: &VertexId) -> Result<()> {
        let mut removed = false;
        self.session.rebuild(|graph| {
            removed = graph.unlink_vertices(a, b)?;
            Ok(())
        })?;

        if removed {
            writeln!(self.out, "Unlinked {} and {}. Routing tables rebuilt.", a, b)?;
        } else {
            writeln!(self.out, "{} and {} are not linked.", a, b)?;
        }
        Ok(())
    }

    fn change_to(&mut self, host: VertexId) -> Result<()> {
        if !self.session.snapshot().graph().contains(&host) {
            writeln!(self.out, "{}", UNKNOWN_HOST)?;
            return Ok(());
        }

        log::info!("Terminal moved from {} to {}.", self.current, host);
        self.current = host;
        write!(self.out, "{}", CLEAR_SCREEN)?;
        Ok(())
    }
}
