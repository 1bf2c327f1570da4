//! Output formatting: csv lines, JSON lines, table.
//!
//! `csv` and `json` write each record as soon as it arrives, so lines
//! printed before a failure stay printed. `table` needs every row first.

use std::io::Write;
use std::pin::pin;

use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};
use tracing::debug;

use cvcue_api::AccessPoint;

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct AccessPointRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP Address")]
    ip_address: String,
}

impl From<AccessPoint> for AccessPointRow {
    fn from(ap: AccessPoint) -> Self {
        Self {
            name: ap.name,
            ip_address: ap.ip_address,
        }
    }
}

/// `<name>,<ipAddress>` with no quoting or escaping.
///
/// Embedded commas are not escaped; names and addresses are assumed
/// comma-free.
pub fn csv_line(ap: &AccessPoint) -> String {
    format!("{},{}", ap.name, ap.ip_address)
}

/// Write one access point as a newline-terminated csv line.
pub fn emit(out: &mut impl Write, ap: &AccessPoint) -> std::io::Result<()> {
    writeln!(out, "{}", csv_line(ap))
}

/// Record sink for the chosen output format.
pub struct Printer<W: Write> {
    format: OutputFormat,
    out: W,
    rows: Vec<AccessPointRow>,
    count: usize,
}

impl<W: Write> Printer<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out,
            rows: Vec::new(),
            count: 0,
        }
    }

    /// Print (or, for tables, queue) a single access point.
    pub fn record(&mut self, ap: AccessPoint) -> Result<(), CliError> {
        self.count += 1;
        match self.format {
            OutputFormat::Csv => emit(&mut self.out, &ap)?,
            OutputFormat::Json => write_json_line(&mut self.out, &ap)?,
            OutputFormat::Table => self.rows.push(ap.into()),
        }
        Ok(())
    }

    /// Print every access point from `aps`, stopping at the first error.
    ///
    /// A closed stdout ends the walk early and is not an error.
    pub async fn drain<S>(&mut self, aps: S) -> Result<(), CliError>
    where
        S: Stream<Item = Result<AccessPoint, cvcue_api::Error>>,
    {
        let mut aps = pin!(aps);
        while let Some(ap) = aps.next().await {
            if let Err(err) = self.record(ap?) {
                if err.is_broken_pipe() {
                    debug!("stdout closed, stopping early");
                    return Ok(());
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Number of records seen so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flush pending output. Tables are rendered here.
    pub fn finish(mut self) -> Result<W, CliError> {
        if self.format == OutputFormat::Table && !self.rows.is_empty() {
            let table = Table::new(&self.rows).with(Style::rounded()).to_string();
            writeln!(self.out, "{table}")?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

fn write_json_line<T: Serialize>(out: &mut impl Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use cvcue_api::{HttpFailure, StatusCode};
    use futures_util::stream;

    use super::*;

    /// Stdout whose reader has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn ap(name: &str, ip: &str) -> AccessPoint {
        AccessPoint {
            name: name.into(),
            ip_address: ip.into(),
        }
    }

    fn render(format: OutputFormat, aps: Vec<AccessPoint>) -> String {
        let mut printer = Printer::new(format, Vec::new());
        for a in aps {
            printer.record(a).expect("in-memory write");
        }
        String::from_utf8(printer.finish().expect("in-memory flush")).expect("utf-8")
    }

    #[test]
    fn csv_line_is_name_comma_ip() {
        assert_eq!(csv_line(&ap("AP-1", "10.0.0.1")), "AP-1,10.0.0.1");
    }

    #[test]
    fn emit_terminates_line() {
        let mut out = Vec::new();
        emit(&mut out, &ap("AP-1", "10.0.0.1")).expect("in-memory write");
        assert_eq!(out, b"AP-1,10.0.0.1\n");
    }

    #[test]
    fn csv_has_no_header_and_keeps_order() {
        let text = render(
            OutputFormat::Csv,
            vec![ap("AP-2", "10.0.0.2"), ap("AP-1", "10.0.0.1")],
        );
        assert_eq!(text, "AP-2,10.0.0.2\nAP-1,10.0.0.1\n");
    }

    #[test]
    fn csv_does_not_escape_commas() {
        assert_eq!(csv_line(&ap("Lobby, East", "10.0.0.9")), "Lobby, East,10.0.0.9");
    }

    #[test]
    fn json_lines_use_api_field_names() {
        let text = render(OutputFormat::Json, vec![ap("AP-1", "10.0.0.1")]);
        assert_eq!(text, "{\"name\":\"AP-1\",\"ipAddress\":\"10.0.0.1\"}\n");
    }

    #[test]
    fn table_renders_headers_and_rows() {
        let text = render(OutputFormat::Table, vec![ap("AP-1", "10.0.0.1")]);
        assert!(text.contains("Name"));
        assert!(text.contains("IP Address"));
        assert!(text.contains("AP-1"));
        assert!(text.contains("10.0.0.1"));
    }

    #[test]
    fn empty_table_prints_nothing() {
        assert_eq!(render(OutputFormat::Table, Vec::new()), "");
    }

    #[test]
    fn count_tracks_records() {
        let mut printer = Printer::new(OutputFormat::Table, Vec::new());
        printer.record(ap("AP-1", "10.0.0.1")).expect("queued");
        printer.record(ap("AP-2", "10.0.0.2")).expect("queued");
        assert_eq!(printer.count(), 2);
    }

    #[tokio::test]
    async fn drain_stops_quietly_on_closed_stdout() {
        let aps = stream::iter(vec![
            Ok(ap("AP-1", "10.0.0.1")),
            Ok(ap("AP-2", "10.0.0.2")),
            Ok(ap("AP-3", "10.0.0.3")),
        ]);
        let mut printer = Printer::new(OutputFormat::Csv, ClosedPipe);

        printer.drain(aps).await.expect("broken pipe is not an error");

        assert_eq!(printer.count(), 1);
    }

    #[tokio::test]
    async fn drain_prints_until_first_error() {
        let url = url::Url::parse("https://cue.example.com/wifi/api/manageddevices/aps")
            .expect("valid URL");
        let aps = stream::iter(vec![
            Ok(ap("AP-1", "10.0.0.1")),
            Err(cvcue_api::Error::Retrieval {
                url,
                failure: HttpFailure::Status(StatusCode::INTERNAL_SERVER_ERROR),
            }),
        ]);
        let mut printer = Printer::new(OutputFormat::Csv, Vec::new());

        let err = printer.drain(aps).await.expect_err("retrieval failure");

        assert!(matches!(err, CliError::Retrieval(_)));
        let out = printer.finish().expect("in-memory flush");
        assert_eq!(out, b"AP-1,10.0.0.1\n");
    }
}
