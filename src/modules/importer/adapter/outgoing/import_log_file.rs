use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::importer::application::ports::outgoing::{ImportLog, ImportLogError};

/// Plain-text error log, overwritten on every run.
pub struct ImportLogFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ImportLogFile {
    /// Truncates `path` and writes the run header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ImportLogError> {
        let path = path.as_ref().to_path_buf();
        let mut writer = BufWriter::new(File::create(&path)?);

        writeln!(
            writer,
            "Import Errors - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S %z")
        )?;
        writeln!(writer)?;

        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImportLog for ImportLogFile {
    fn write_line(&mut self, line: &str) -> Result<(), ImportLogError> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ImportLogError> {
        self.writer.flush()?;
        Ok(())
    }
}
