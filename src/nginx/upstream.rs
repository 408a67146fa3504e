//! Parsing and serialization of the nginx upstream block.
//!
//! Only one shape is understood: a block introduced by
//! `upstream <name> {` containing zero or more `server <host>:<port>;`
//! lines. The first closing brace ends the block; nested braces are not
//! supported.

use std::fmt;
use std::ops::Range;

use regex::Regex;

use crate::error::{Result, ScalerError};

/// A single `server host:port;` routing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEntry {
    pub host: String,
    pub port: u16,
}

impl UpstreamEntry {
    /// Parse a `host:port` address.
    pub fn parse(address: &str) -> Result<Self> {
        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| ScalerError::ConfigFormat(format!("invalid address: {address}")))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| ScalerError::ConfigFormat(format!("invalid port in: {address}")))?;
        if host.is_empty() {
            return Err(ScalerError::ConfigFormat(format!(
                "empty host in: {address}"
            )));
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for UpstreamEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The ordered entry list of one upstream block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBlock {
    name: String,
    entries: Vec<UpstreamEntry>,
}

impl UpstreamBlock {
    /// Locate and parse the named upstream block in `text`.
    ///
    /// Returns the block and the byte range it occupies, so a modified
    /// block can be spliced back without touching the rest of the file.
    pub fn parse(text: &str, name: &str) -> Result<(Self, Range<usize>)> {
        let header =
            Regex::new(&format!(r"upstream\s+{}\s*\{{", regex::escape(name))).expect("valid regex");

        let header_match = header.find(text).ok_or_else(|| {
            ScalerError::ConfigFormat(format!("upstream block `{name}` not found"))
        })?;

        let body_start = header_match.end();
        let close = text[body_start..].find('}').ok_or_else(|| {
            ScalerError::ConfigFormat(format!("upstream block `{name}` is not closed"))
        })?;
        let body = &text[body_start..body_start + close];

        let server_line = Regex::new(r"server\s+([A-Za-z0-9._-]+):([0-9]+)\s*;").expect("valid regex");
        let mut entries = Vec::new();
        for captures in server_line.captures_iter(body) {
            let port = captures[2].parse::<u16>().map_err(|_| {
                ScalerError::ConfigFormat(format!("port out of range in: {}", &captures[0]))
            })?;
            entries.push(UpstreamEntry {
                host: captures[1].to_string(),
                port,
            });
        }

        let block = Self {
            name: name.to_string(),
            entries,
        };
        Ok((block, header_match.start()..body_start + close + 1))
    }

    pub fn entries(&self) -> &[UpstreamEntry] {
        &self.entries
    }

    pub fn contains(&self, entry: &UpstreamEntry) -> bool {
        self.entries.contains(entry)
    }

    /// Append an entry. Returns false (unchanged) if already present.
    pub fn add(&mut self, entry: UpstreamEntry) -> bool {
        if self.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove an entry. Returns false (unchanged) if absent.
    pub fn remove(&mut self, entry: &UpstreamEntry) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e != entry);
        self.entries.len() != before
    }

    /// Render the block back into the fixed textual grammar.
    pub fn serialize(&self) -> String {
        let mut out = format!("upstream {} {{\n", self.name);
        for entry in &self.entries {
            out.push_str(&format!("    server {};\n", entry));
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = "\
events {}

http {
    upstream backend_servers {
        server backend-app-0:8001;
        server backend-app-1:8002;
    }

    server {
        listen 8080;
    }
}
";

    #[test]
    fn parses_entries_in_order() {
        let (block, _) = UpstreamBlock::parse(CONF, "backend_servers").unwrap();
        let addresses: Vec<String> = block.entries().iter().map(|e| e.to_string()).collect();
        assert_eq!(addresses, vec!["backend-app-0:8001", "backend-app-1:8002"]);
    }

    #[test]
    fn missing_block_is_a_format_error() {
        let result = UpstreamBlock::parse(CONF, "other_upstream");
        assert!(matches!(result, Err(ScalerError::ConfigFormat(_))));
    }

    #[test]
    fn unclosed_block_is_a_format_error() {
        let result = UpstreamBlock::parse("upstream backend_servers {\n server a:1;", "backend_servers");
        assert!(matches!(result, Err(ScalerError::ConfigFormat(_))));
    }

    #[test]
    fn first_closing_brace_ends_the_block() {
        // The `server {` section after the close must not leak entries in.
        let text = "upstream u {}\nserver other-host:9999;";
        let (block, span) = UpstreamBlock::parse(text, "u").unwrap();
        assert!(block.entries().is_empty());
        assert_eq!(&text[span], "upstream u {}");
    }

    #[test]
    fn round_trip_preserves_the_entry_set() {
        let (block, span) = UpstreamBlock::parse(CONF, "backend_servers").unwrap();
        let rendered = block.serialize();
        let (reparsed, _) = UpstreamBlock::parse(&rendered, "backend_servers").unwrap();
        assert_eq!(reparsed.entries(), block.entries());
        // The reported span covers exactly the original block.
        assert!(CONF[span].starts_with("upstream backend_servers {"));
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let (mut block, _) = UpstreamBlock::parse(CONF, "backend_servers").unwrap();
        let entry = UpstreamEntry::parse("backend-app-2:8003").unwrap();

        assert!(block.add(entry.clone()));
        assert!(!block.add(entry.clone()));
        assert_eq!(block.entries().len(), 3);

        assert!(block.remove(&entry));
        assert!(!block.remove(&entry));
        assert_eq!(block.entries().len(), 2);
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(UpstreamEntry::parse("no-port").is_err());
        assert!(UpstreamEntry::parse(":8001").is_err());
        assert!(UpstreamEntry::parse("host:99999").is_err());
    }
}
