//! Route table listing.

use std::io::Write;

use minha_api_core::RouteIndex;
use minha_api_server::config::ServerConfig;

use super::{CommandError, route_index};

/// Print the served route table to `out`.
pub fn list(config: &ServerConfig, out: &mut impl Write) -> Result<(), CommandError> {
    let index = route_index(config)?;
    write_table(&index, out)?;
    Ok(())
}

fn write_table(index: &RouteIndex, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{:<12} {:<20} {:<8} OPERATIONS", "PATTERN", "NAME", "KIND")?;
    for entry in index.entries() {
        let operations = entry
            .docs()
            .iter()
            .map(|doc| doc.method.as_str())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(
            out,
            "{:<12} {:<20} {:<8} {}",
            entry.pattern(),
            entry.name().map_or("-", |n| n.as_str()),
            entry.kind().as_str(),
            if operations.is_empty() { "-" } else { &operations },
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_prints_every_route_in_order() {
        let mut out = Vec::new();
        list(&ServerConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("PATTERN"));
        assert!(lines[1].starts_with("/admin/"));
        assert!(lines[1].contains("admin:index"));
        assert!(lines[2].contains("schema-swagger-ui"));
        assert!(lines[3].contains("schema-redoc"));
        assert!(lines[4].starts_with("/ "));
        assert!(lines[5].starts_with("/health"));
        assert!(lines[5].ends_with("GET"));
    }
}
