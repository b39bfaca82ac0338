//! Statement writers

use std::io::{self, Write};

use ottr_types::Statement;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One N-Triples line per statement
    #[default]
    NTriples,
    /// One JSON object per line
    Json,
}

pub fn write_statements<W: Write>(
    writer: &mut W,
    statements: &[Statement],
    format: OutputFormat,
) -> io::Result<()> {
    for statement in statements {
        match format {
            OutputFormat::NTriples => writeln!(writer, "{}", statement)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *writer, statement)?;
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ottr_types::{Iri, Literal};
    use pretty_assertions::assert_eq;

    fn statement() -> Statement {
        Statement::new(
            Iri::from_namespace("http://example.org#", "alice"),
            Iri::from_namespace("http://example.org#", "hasEmail"),
            Literal::string("a@example.org"),
        )
    }

    #[test]
    fn test_ntriples() {
        let mut out = Vec::new();
        write_statements(&mut out, &[statement()], OutputFormat::NTriples).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<http://example.org#alice> <http://example.org#hasEmail> \"a@example.org\" .\n"
        );
    }

    #[test]
    fn test_json_lines() {
        let mut out = Vec::new();
        write_statements(&mut out, &[statement(), statement()], OutputFormat::Json).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["subject"]["type"], "iri");
        assert_eq!(value["object"]["type"], "literal");
    }
}
