use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::trace;

/// File extension of engine output documents.
pub const OUTPUT_EXTENSION: &str = "out";

const FREQUENCIES_MARKER: &str = "Frequencies";
const ERROR_TERMINATION_MARKER: &str = "Error termination";
/// Whitespace-separated token index of the first frequency value on a
/// `Frequencies -- v1 v2 v3` line.
const FREQUENCY_TOKEN: usize = 2;

/// Number of trailing lines searched for an error-termination marker by default.
pub const DEFAULT_ERROR_SCAN_WINDOW: usize = 8;

/// Fallback kind for an error termination whose line names no executable.
pub const UNKNOWN_ERROR_KIND: &str = "unknown";

/// The termination signal extracted from an output document.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The first frequency of the first `Frequencies` record.
    Frequency(f64),
    /// An error-termination marker and the link that raised it (e.g. `l502`).
    ErrorTermination { kind: String },
    /// Neither signal was found.
    Unrecognized,
}

/// Scans an output document for its termination signal.
///
/// The first `Frequencies` record wins. Only when the whole document holds no usable
/// frequency record are the last `error_scan_window` lines searched for an
/// error-termination marker.
pub fn scan_termination(
    reader: &mut impl BufRead,
    error_scan_window: usize,
) -> io::Result<Termination> {
    let mut tail: VecDeque<String> = VecDeque::new();

    for line in reader.lines() {
        let line = line?;
        if let Some(frequency) = parse_frequency_line(&line) {
            return Ok(Termination::Frequency(frequency));
        }
        if error_scan_window > 0 {
            if tail.len() == error_scan_window {
                tail.pop_front();
            }
            tail.push_back(line);
        }
    }

    Ok(tail
        .iter()
        .find(|line| line.trim_start().starts_with(ERROR_TERMINATION_MARKER))
        .map(|line| Termination::ErrorTermination {
            kind: error_kind(line).unwrap_or_else(|| UNKNOWN_ERROR_KIND.to_string()),
        })
        .unwrap_or(Termination::Unrecognized))
}

pub fn scan_termination_path(path: &Path, error_scan_window: usize) -> io::Result<Termination> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    scan_termination(&mut reader, error_scan_window)
}

fn parse_frequency_line(line: &str) -> Option<f64> {
    if !line.trim_start().starts_with(FREQUENCIES_MARKER) {
        return None;
    }
    let token = line.split_whitespace().nth(FREQUENCY_TOKEN)?;
    match token.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            trace!("Frequencies record without numeric value: {:?}", line);
            None
        }
    }
}

/// Extracts the failing link from an error-termination line.
///
/// The line is split on `/` and `.`; the kind is the segment right before the `exe`
/// extension of the link executable, so `.../g16/l502.exe at ...` yields `l502`.
pub fn error_kind(line: &str) -> Option<String> {
    let segments: Vec<&str> = line.split(['/', '.']).collect();
    let exe = segments
        .iter()
        .rposition(|segment| *segment == "exe" || segment.starts_with("exe "))?;
    let kind = segments.get(exe.checked_sub(1)?)?.trim();
    if kind.is_empty() {
        None
    } else {
        Some(kind.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan(text: &str) -> Termination {
        scan_termination(&mut Cursor::new(text), DEFAULT_ERROR_SCAN_WINDOW).unwrap()
    }

    #[test]
    fn positive_frequency_is_read_from_first_record() {
        let text = "\
 Harmonic frequencies (cm**-1)
                      1                      2                      3
                      A                      A                      A
 Frequencies --    124.331               180.2177               201.0054
 Red. masses --      3.2741                 1.0865                 4.1127
 Frequencies --    -50.0                 300.0                  400.0
 Normal termination of Gaussian 16 at Wed Dec 19 10:19:00 2018.
";
        assert_eq!(scan(text), Termination::Frequency(124.331));
    }

    #[test]
    fn negative_frequency_is_reported_with_sign() {
        let text = " Frequencies --    -37.2   12.0   15.5\n";
        assert_eq!(scan(text), Termination::Frequency(-37.2));
    }

    #[test]
    fn error_termination_near_end_yields_link_kind() {
        let text = "\
 SCF Done:  E(RPM7) =  -0.123456789     A.U. after   12 cycles
 Convergence failure -- run terminated.
 Error termination via Lnk1e in /opt/g16/l502.exe at Wed Dec 19 10:19:00 2018.
 Job cpu time:       0 days  0 hours  1 minutes 12.3 seconds.
 Elapsed time:       0 days  0 hours  0 minutes 18.9 seconds.
 File lengths (MBytes):  RWF=     17 Int=      0 D2E=      0 Chk=      2 Scr=      1
";
        assert_eq!(
            scan(text),
            Termination::ErrorTermination {
                kind: "l502".into()
            }
        );
    }

    #[test]
    fn error_marker_outside_window_is_ignored() {
        let mut text = String::from(" Error termination via Lnk1e in /opt/g16/l101.exe\n");
        for _ in 0..DEFAULT_ERROR_SCAN_WINDOW {
            text.push_str(" filler\n");
        }
        assert_eq!(scan(&text), Termination::Unrecognized);
    }

    #[test]
    fn huge_window_scans_short_documents() {
        let text = " Error termination via Lnk1e in /opt/g16/l502.exe\n";
        assert_eq!(
            scan_termination(&mut Cursor::new(text), usize::MAX).unwrap(),
            Termination::ErrorTermination {
                kind: "l502".into()
            }
        );
        assert_eq!(
            scan_termination(&mut Cursor::new(" Normal termination.\n"), usize::MAX / 16)
                .unwrap(),
            Termination::Unrecognized
        );
    }

    #[test]
    fn document_without_signal_is_unrecognized() {
        assert_eq!(scan(" Normal termination of Gaussian 16.\n"), Termination::Unrecognized);
        assert_eq!(scan(""), Termination::Unrecognized);
    }

    #[test]
    fn malformed_frequency_line_is_not_a_signal() {
        let text = " Frequencies --\n Frequencies --  abc\n";
        assert_eq!(scan(text), Termination::Unrecognized);
    }

    #[test]
    fn error_kind_handles_bare_and_dated_paths() {
        assert_eq!(
            error_kind(" Error termination via Lnk1e in /usr/g16/l502.exe").as_deref(),
            Some("l502")
        );
        assert_eq!(
            error_kind(" Error termination via Lnk1e in /apps/exec/g16/l9999.exe at Mon.")
                .as_deref(),
            Some("l9999")
        );
        assert_eq!(
            error_kind(" Error termination request processed by link 9999."),
            None
        );
    }

    #[test]
    fn error_without_executable_falls_back_to_unknown_kind() {
        let text = " Error termination request processed by link 9999.\n";
        assert_eq!(
            scan(text),
            Termination::ErrorTermination {
                kind: UNKNOWN_ERROR_KIND.into()
            }
        );
    }
}
