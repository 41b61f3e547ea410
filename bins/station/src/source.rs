use std::fs::File;
use std::io::{self, Read};
use std::net::TcpStream;
use std::time::Duration;

use anyhow::Context;

/// Upper bound on how long a blocked read delays noticing shutdown.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Where raw LTM bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Stdin,
    Tcp(String),
    Path(String),
}

impl SourceSpec {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s == "-" {
            SourceSpec::Stdin
        } else if let Some(addr) = s.strip_prefix("tcp://") {
            SourceSpec::Tcp(addr.to_string())
        } else {
            SourceSpec::Path(s.to_string())
        }
    }

    pub fn open(&self) -> anyhow::Result<Box<dyn Read + Send>> {
        Ok(match self {
            SourceSpec::Stdin => Box::new(io::stdin()),
            SourceSpec::Tcp(addr) => {
                let stream = TcpStream::connect(addr)
                    .with_context(|| format!("failed to connect to {addr}"))?;
                stream.set_read_timeout(Some(READ_TIMEOUT))?;
                Box::new(stream)
            }
            SourceSpec::Path(path) => {
                Box::new(File::open(path).with_context(|| format!("failed to open {path}"))?)
            }
        })
    }
}
