//! Delivering ICS documents to a file or stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dzevents_core::IcsExport;

/// Where an exported document goes.
pub enum Destination {
    Directory(PathBuf),
    Stdout,
}

impl Destination {
    pub fn new(out: Option<PathBuf>, stdout: bool) -> Self {
        if stdout {
            Destination::Stdout
        } else {
            Destination::Directory(out.unwrap_or_else(|| PathBuf::from(".")))
        }
    }

    /// Write the document. Returns the file path when one was written.
    pub fn deliver(&self, export: &IcsExport) -> Result<Option<PathBuf>> {
        match self {
            Destination::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(export.body.as_bytes())?;
                stdout.flush()?;
                Ok(None)
            }
            Destination::Directory(dir) => write_file(dir, export).map(Some),
        }
    }
}

/// Write `export` into `dir` under its suggested filename.
pub fn write_file(dir: &Path, export: &IcsExport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create directory {}", dir.display()))?;

    let path = dir.join(&export.filename);
    std::fs::write(&path, &export.body)
        .with_context(|| format!("Could not write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export() -> IcsExport {
        IcsExport {
            filename: "event-1-launch.ics".to_string(),
            content_type: "text/calendar; charset=utf-8",
            body: "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n".to_string(),
        }
    }

    #[test]
    fn test_deliver_to_directory_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");

        let path = Destination::new(Some(target.clone()), false)
            .deliver(&export())
            .unwrap()
            .expect("should write a file");

        assert_eq!(path, target.join("event-1-launch.ics"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), export().body);
    }

    #[test]
    fn test_stdout_flag_wins() {
        assert!(matches!(Destination::new(None, true), Destination::Stdout));
        assert!(matches!(Destination::new(None, false), Destination::Directory(_)));
    }
}
