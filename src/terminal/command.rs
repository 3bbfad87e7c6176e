use crate::domain::utils::id::VertexId;
use std::str::FromStr;
use thiserror::Error;

pub const USAGE: &str = r#"Try: "ping <destination>", "traceroute <destination>", "route <destination>", "links", "link <a> <b> <distance> <rate>", "unlink <a> <b>", "clear", "change to <new host>" or "exit""#;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ping(VertexId),
    Traceroute(VertexId),
    /// Shortest path with cumulative costs.
    Route(VertexId),
    /// Lists every vertex with its links.
    Links,
    /// Adds a link and rebuilds the routing tables.
    Link { a: VertexId, b: VertexId, distance: f64, transmission_rate: f64 },
    Unlink { a: VertexId, b: VertexId },
    ChangeTo(VertexId),
    Clear,
    Help,
    Exit,
    /// Blank input line.
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("The provided command is not recognized: {0}")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid {0}: {1}")]
    InvalidNumber(&'static str, String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();

        let target = |index: usize, name: &'static str| words.get(index).map(|word| VertexId::new(*word)).ok_or(CommandError::MissingArgument(name));

        let number = |index: usize, name: &'static str| -> Result<f64, CommandError> {
            let word = words.get(index).ok_or(CommandError::MissingArgument(name))?;
            word.parse::<f64>().map_err(|_| CommandError::InvalidNumber(name, word.to_string()))
        };

        match words.as_slice() {
            [] => Ok(Command::Empty),
            ["ping", ..] => Ok(Command::Ping(target(1, "destination")?)),
            ["traceroute", ..] => Ok(Command::Traceroute(target(1, "destination")?)),
            ["route", ..] => Ok(Command::Route(target(1, "destination")?)),
            ["links"] => Ok(Command::Links),
            ["link", ..] => Ok(Command::Link {
                a: target(1, "first vertex")?,
                b: target(2, "second vertex")?,
                distance: number(3, "distance")?,
                transmission_rate: number(4, "rate")?,
            }),
            ["unlink", ..] => Ok(Command::Unlink { a: target(1, "first vertex")?, b: target(2, "second vertex")? }),
            ["change", "to", ..] => Ok(Command::ChangeTo(target(2, "new host")?)),
            ["clear"] => Ok(Command::Clear),
            ["help"] => Ok(Command::Help),
            ["exit"] | ["quit"] => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("ping H2".parse::<Command>(), Ok(Command::Ping(VertexId::new("H2"))));
        assert_eq!("  traceroute   H5 ".parse::<Command>(), Ok(Command::Traceroute(VertexId::new("H5"))));
        assert_eq!("route CORE".parse::<Command>(), Ok(Command::Route(VertexId::new("CORE"))));
        assert_eq!("change to H10".parse::<Command>(), Ok(Command::ChangeTo(VertexId::new("H10"))));
        assert_eq!("links".parse::<Command>(), Ok(Command::Links));
        assert_eq!("clear".parse::<Command>(), Ok(Command::Clear));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Exit));
        assert_eq!(
            "link H1 H2 5 1e9".parse::<Command>(),
            Ok(Command::Link { a: VertexId::new("H1"), b: VertexId::new("H2"), distance: 5.0, transmission_rate: 1e9 })
        );
        assert_eq!("unlink E1 H1".parse::<Command>(), Ok(Command::Unlink { a: VertexId::new("E1"), b: VertexId::new("H1") }));
        assert_eq!("".parse::<Command>(), Ok(Command::Empty));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("ping".parse::<Command>(), Err(CommandError::MissingArgument("destination")));
        assert_eq!("change to".parse::<Command>(), Err(CommandError::MissingArgument("new host")));
        assert_eq!("change H1".parse::<Command>(), Err(CommandError::Unknown("change H1".to_string())));
        assert_eq!("link H1 H2 far 1e9".parse::<Command>(), Err(CommandError::InvalidNumber("distance", "far".to_string())));
        assert_eq!("unlink H1".parse::<Command>(), Err(CommandError::MissingArgument("second vertex")));
        assert_eq!("nslookup H1".parse::<Command>(), Err(CommandError::Unknown("nslookup H1".to_string())));
    }
}
