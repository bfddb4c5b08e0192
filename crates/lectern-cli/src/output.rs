use std::io::Write;

use lectern_core::{Notice, RemoteFileRecord};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the outcome of an upload or delete.
pub fn print_notice(w: &mut dyn Write, notice: &Notice, color: ColorMode) -> std::io::Result<()> {
    if !color.enabled() {
        return writeln!(w, "{}", notice);
    }
    if notice.is_failure() {
        writeln!(w, "{}", notice.to_string().red().bold())
    } else {
        writeln!(w, "{}", notice.to_string().green())
    }
}

/// Print the uploaded-files table: id, date, name.
pub fn print_records(
    w: &mut dyn Write,
    records: &[&RemoteFileRecord],
    filter: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if records.is_empty() {
        if filter.is_empty() {
            writeln!(w, "No uploaded files.")?;
        } else {
            writeln!(w, "No uploaded files match \"{}\".", filter)?;
        }
        return Ok(());
    }

    let id_width = records
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(1);

    for record in records {
        let id = format!("{:>width$}", record.id, width = id_width);
        if color.enabled() {
            writeln!(
                w,
                "{}  {}  {}",
                id.dimmed(),
                record.upload_date().cyan(),
                record.file_name
            )?;
        } else {
            writeln!(w, "{}  {}  {}", id, record.upload_date(), record.file_name)?;
        }
    }

    if color.enabled() {
        writeln!(w, "{}", format!("{} file(s)", records.len()).dimmed())?;
    } else {
        writeln!(w, "{} file(s)", records.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> RemoteFileRecord {
        RemoteFileRecord {
            id,
            file_name: name.to_string(),
            uploaded_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    fn render(records: &[&RemoteFileRecord], filter: &str) -> String {
        let mut buf = Vec::new();
        print_records(&mut buf, records, filter, ColorMode(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn records_are_aligned_with_dates() {
        let a = record(7, "notes.pdf");
        let b = record(12, "lab.zip");
        let out = render(&[&a, &b], "");
        assert_eq!(
            out,
            " 7  2024-01-01  notes.pdf\n12  2024-01-01  lab.zip\n2 file(s)\n"
        );
    }

    #[test]
    fn empty_list_mentions_filter() {
        assert_eq!(render(&[], ""), "No uploaded files.\n");
        assert_eq!(render(&[], "exam"), "No uploaded files match \"exam\".\n");
    }

    #[test]
    fn plain_notice() {
        let mut buf = Vec::new();
        print_notice(&mut buf, &Notice::DeleteSucceeded { id: 3 }, ColorMode(false)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "File 3 deleted successfully\n");
    }
}
