//! Per-request temp storage.
//!
//! Every photo job gets its own directory under the work dir, named after a
//! fresh UUID v7 request id plus a random suffix. Two jobs can never touch the
//! same artifact path, and the directory is removed when the workspace is
//! dropped, whichever way the job ends.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

/// File name of the downloaded user photo inside a workspace.
const INPUT_FILE: &str = "input.jpg";

/// File name of the composited result inside a workspace.
const RESULT_FILE: &str = "result.png";

/// Scoped temp directory for one photo job.
#[derive(Debug)]
pub struct RequestWorkspace {
    request_id: Uuid,
    dir: TempDir,
}

impl RequestWorkspace {
    /// Create a fresh workspace under `work_dir`.
    pub fn create(work_dir: &Path) -> std::io::Result<Self> {
        let request_id = Uuid::now_v7();
        let dir = tempfile::Builder::new()
            .prefix(&format!("request-{request_id}-"))
            .tempdir_in(work_dir)?;

        Ok(Self { request_id, dir })
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the downloaded photo is written.
    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join(INPUT_FILE)
    }

    /// Where the composited result is written.
    pub fn result_path(&self) -> PathBuf {
        self.dir.path().join(RESULT_FILE)
    }

    /// Remove the directory now and report failures.
    ///
    /// Dropping the workspace also removes it, but silently.
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}
