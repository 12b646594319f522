//! Subcommands and the output plumbing they share

pub mod batch;
pub mod collect;
pub mod lookup;

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use boxdline_core::{StreamHandle, is_shutdown_requested};
use boxdline_letterboxd::Film;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use indicatif::ProgressBar;
use serde::Serialize;

/// How often a quiet stream re-checks the shutdown flag
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Write one JSON document per line
pub fn write_json_line(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Print `films` to stdout as JSON lines
pub fn print_films(films: &[Film]) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for film in films {
        write_json_line(&mut out, film)?;
    }
    out.flush()?;
    Ok(())
}

/// Copy a stream to stdout as it arrives, then wait for its completion.
///
/// On shutdown the handle is dropped early, which stops the producers; the
/// summary then reports the stream as interrupted.
pub async fn drain<S>(mut stream: StreamHandle<Film, S>, pb: &ProgressBar) -> Result<S> {
    let stdout = std::io::stdout();
    loop {
        if is_shutdown_requested() {
            log::warn!("Shutdown requested, stopping stream");
            break;
        }
        match tokio::time::timeout(SHUTDOWN_POLL, stream.recv()).await {
            Ok(Some(film)) => {
                write_json_line(&mut stdout.lock(), &film)?;
                pb.inc(1);
            }
            Ok(None) => break,
            Err(_) => continue,
        }
    }
    stdout.lock().flush()?;
    Ok(stream.finish().await?)
}

/// Print a key-value summary table on stderr
pub fn print_summary(title: &str, rows: &[(&str, String)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(title).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compiles only while `drain` holds nothing `!Send` across an await
    fn drain_on_any_runtime<S: Send + 'static>(
        stream: StreamHandle<Film, S>,
        pb: &ProgressBar,
    ) -> impl std::future::Future<Output = Result<S>> + Send + '_ {
        drain(stream, pb)
    }

    #[test]
    fn drain_can_be_spawned() {
        let _ = drain_on_any_runtime::<()>;
    }

    #[test]
    fn json_lines() {
        let films = [
            Film {
                id: "1".into(),
                slug: "a".into(),
                ..Default::default()
            },
            Film {
                id: "2".into(),
                slug: "b".into(),
                ..Default::default()
            },
        ];
        let mut buf = Vec::new();
        for film in &films {
            write_json_line(&mut buf, film).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["slug"], "b");
    }
}
