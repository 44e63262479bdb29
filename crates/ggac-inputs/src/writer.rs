use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info, warn};

use crate::error::InputFileError;
use crate::records::{Cascade, ParameterFile};

/// Outcome of writing the parameter files for one cascade.
#[derive(Debug, Default)]
pub struct WriteReport {
  pub written: Vec<PathBuf>,
  pub failures: Vec<InputFileError>,
}

impl WriteReport {
  /// True when every file was written.
  pub fn is_complete(&self) -> bool {
    self.failures.is_empty()
  }
}

/// Write the multipole, decay and evaporation files for `cascade` into `dir`.
///
/// Failures never abort the run: a missing directory or a failed write is
/// logged and recorded in the report, and the remaining files are still
/// attempted. Callers decide what an incomplete report means.
pub async fn write_input_files(dir: &Path, cascade: &Cascade) -> WriteReport {
  let mut report = WriteReport::default();

  if !fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) {
    warn!(dir = %dir.display(), "input directory does not exist, nothing written");
    report
      .failures
      .push(InputFileError::MissingDirectory(dir.to_path_buf()));
    return report;
  }

  let multipole = cascade.multipole();
  let decay = cascade.decay();
  let evaporation = cascade.evaporation();
  let files: [&(dyn ParameterFile + Sync); 3] = [&multipole, &decay, &evaporation];

  for file in files {
    let path = dir.join(file.file_name());
    match fs::write(&path, file.to_string()).await {
      Ok(()) => {
        info!(path = %path.display(), "wrote parameter file");
        report.written.push(path);
      }
      Err(source) => {
        error!(path = %path.display(), error = %source, "failed to write parameter file");
        report.failures.push(InputFileError::Write { path, source });
      }
    }
  }

  report
}
