use super::DocumentId;

pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Upload sub-state of one document: `idle -> uploading -> {success | error}`.
///
/// Every started or cleared upload bumps `attempt`; events carrying an older
/// attempt belong to a superseded upload and are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    files: Vec<String>,
    status: UploadStatus,
    progress: u8,
    error: Option<String>,
    attempt: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProgress {
    Advanced(u8),
    Finished { success: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadEvent {
    pub document: DocumentId,
    pub attempt: u64,
    pub progress: UploadProgress,
}

impl UploadState {
    /// Starts a fresh upload for `files`, discarding any earlier attempt.
    /// An empty selection resets to idle instead. Returns the new attempt number
    /// when an upload was started.
    pub fn select(&mut self, files: Vec<String>) -> Option<u64> {
        if files.is_empty() {
            self.reset();
            return None;
        }
        self.attempt += 1;
        self.files = files;
        self.status = UploadStatus::Uploading;
        self.progress = 0;
        self.error = None;
        Some(self.attempt)
    }

    pub fn reset(&mut self) {
        self.attempt += 1;
        self.files.clear();
        self.status = UploadStatus::Idle;
        self.progress = 0;
        self.error = None;
    }

    /// Applies a simulator event; returns false when the event was stale.
    pub fn apply(&mut self, attempt: u64, progress: UploadProgress) -> bool {
        if attempt != self.attempt || self.status != UploadStatus::Uploading {
            return false;
        }
        match progress {
            UploadProgress::Advanced(value) => {
                self.progress = value.min(100).max(self.progress);
            }
            UploadProgress::Finished { success: true } => {
                self.status = UploadStatus::Success;
                self.progress = 100;
            }
            UploadProgress::Finished { success: false } => {
                self.status = UploadStatus::Error;
                self.progress = 100;
                self.error = Some(UPLOAD_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Only the first attached file is reported on submission.
    pub fn first_file_name(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == UploadStatus::Uploading
    }
}
