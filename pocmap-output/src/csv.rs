use std::fmt::Write;

use crate::REPORT_HEADERS;
use crate::traits::{OutputError, OutputFormatter};
use pocmap_types::Finding;

pub struct CsvFormatter;

impl OutputFormatter for CsvFormatter {
    fn format(&self, findings: &[Finding]) -> Result<Vec<u8>, OutputError> {
        let mut out = String::new();

        writeln!(out, "{}", REPORT_HEADERS.join(","))
            .map_err(|e| OutputError::FormatError(e.to_string()))?;

        for f in findings {
            writeln!(
                out,
                "{},{},{},{}",
                csv_escape(&f.url),
                csv_escape(&f.check_id),
                csv_escape(&f.template),
                csv_escape(&f.severity),
            )
            .map_err(|e| OutputError::FormatError(e.to_string()))?;
        }
        Ok(out.into_bytes())
    }
}

fn csv_escape(s: &str) -> String {
    let needs_quoting = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');
    let has_formula_prefix = matches!(s.as_bytes().first(), Some(b'=' | b'+' | b'-' | b'@' | b'\t' | b'\r'));

    if has_formula_prefix {
        // Prepend single-quote to neutralize formula interpretation in spreadsheets
        format!("\"'{}\"", s.replace('"', "\"\""))
    } else if needs_quoting {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_then_one_row_per_finding() {
        let findings = vec![
            Finding::new("http://a:80", "CVE-2021-1111", "high"),
            Finding::new("http://b:443", "CNVD-2020-1", ""),
        ];
        let out = String::from_utf8(CsvFormatter.format(&findings).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "URL,PoC,Template,Severity");
        assert_eq!(lines[1], "http://a:80,CVE-2021-1111,CVE-2021-1111,high");
        assert_eq!(lines[2], "http://b:443,CNVD-2020-1,CNVD-2020-1,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn escapes_commas_and_quotes() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn neutralizes_formula_prefix() {
        assert_eq!(csv_escape("=cmd()"), "\"'=cmd()\"");
        assert_eq!(csv_escape("plain"), "plain");
    }
}
