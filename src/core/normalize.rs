use std::fmt;
use std::str::FromStr;

/// Splits a multi-value cell on `;` and line breaks. Spaces are kept:
/// values such as service names may contain them.
pub fn split_multi_value(raw: &str) -> Vec<String> {
    raw.split(|c| c == ';' || c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
}

impl FromStr for Protocol {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "sctp" => Ok(Protocol::Sctp),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Sctp => "SCTP",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSpec {
    Single(u16),
    Range(u16, u16),
}

impl FromStr for PortSpec {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn port(s: &str) -> Option<u16> {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse::<u16>().ok().filter(|p| *p > 0)
        }

        match s.split_once('-') {
            Some((low, high)) => {
                let (low, high) = (port(low.trim()).ok_or(())?, port(high.trim()).ok_or(())?);
                if low <= high {
                    Ok(PortSpec::Range(low, high))
                } else {
                    Err(())
                }
            }
            None => port(s).map(PortSpec::Single).ok_or(()),
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Single(p) => write!(f, "{}", p),
            PortSpec::Range(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

/// Normalizes one service token to `PROTOCOL PORT`.
/// A bare port defaults to TCP; anything else is rejected.
pub fn normalize_service(token: &str) -> Option<String> {
    let parts: Vec<&str> = token.split_whitespace().collect();
    match parts.as_slice() {
        [port] => {
            let port: PortSpec = port.parse().ok()?;
            Some(format!("{} {}", Protocol::Tcp, port))
        }
        [protocol, port] => {
            let protocol: Protocol = protocol.parse().ok()?;
            let port: PortSpec = port.parse().ok()?;
            Some(format!("{} {}", protocol, port))
        }
        _ => None,
    }
}
