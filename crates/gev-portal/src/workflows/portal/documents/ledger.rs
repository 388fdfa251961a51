use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::simulator::{UploadSimulation, UploadTask};
use super::upload::{UploadEvent, UploadProgress};
use super::{DocumentId, DocumentKind, DocumentUpload};
use crate::workflows::admissions::DocumentRecord;

/// The applicant's document list plus one upload task per uploading document.
///
/// Upload tasks report over a channel; events are folded into document state by
/// [`DocumentLedger::pump`] or [`DocumentLedger::next_event`]. Removing a
/// document or clearing its files drops its task, which cancels it.
#[derive(Debug)]
pub struct DocumentLedger {
    documents: Vec<DocumentUpload>,
    last_id: u64,
    simulation: UploadSimulation,
    tasks: HashMap<DocumentId, UploadTask>,
    events_tx: mpsc::UnboundedSender<UploadEvent>,
    events_rx: mpsc::UnboundedReceiver<UploadEvent>,
}

impl Default for DocumentLedger {
    fn default() -> Self {
        Self::new(UploadSimulation::default())
    }
}

impl DocumentLedger {
    pub fn new(simulation: UploadSimulation) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            documents: Vec::new(),
            last_id: 0,
            simulation,
            tasks: HashMap::new(),
            events_tx,
            events_rx,
        }
    }

    /// Adds an empty document row; ids come from `now` in millis, bumped past
    /// the previous id when two rows are added within the same millisecond.
    pub fn add(&mut self, now: DateTime<Utc>) -> DocumentId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;
        let id = DocumentId(id);
        self.documents.push(DocumentUpload::new(id));
        id
    }

    pub fn remove(&mut self, id: DocumentId) -> bool {
        self.tasks.remove(&id);
        let before = self.documents.len();
        self.documents.retain(|document| document.id != id);
        before != self.documents.len()
    }

    pub fn set_kind(&mut self, id: DocumentId, kind: DocumentKind) -> bool {
        match self.get_mut(id) {
            Some(document) => {
                document.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Updates the free-text subtype of an `Other` document.
    pub fn set_other_subtype(&mut self, id: DocumentId, subtype: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(DocumentUpload {
                kind: DocumentKind::Other(current),
                ..
            }) => {
                *current = subtype.into();
                true
            }
            _ => false,
        }
    }

    /// Starts (or restarts) the upload of `files`; an empty list clears the
    /// document back to idle. Must be called inside a tokio runtime.
    pub fn select_files(&mut self, id: DocumentId, files: Vec<String>) -> bool {
        let Some(document) = self.documents.iter_mut().find(|document| document.id == id) else {
            return false;
        };
        match document.upload.select(files) {
            Some(attempt) => {
                debug!(document = %id, attempt, "upload started");
                let task = self.simulation.spawn(id, attempt, self.events_tx.clone());
                self.tasks.insert(id, task);
            }
            None => {
                self.tasks.remove(&id);
            }
        }
        true
    }

    pub fn clear_files(&mut self, id: DocumentId) -> bool {
        self.select_files(id, Vec::new())
    }

    /// Applies every event already delivered; returns how many were current.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next upload event and applies it. Returns `None` when no
    /// upload is in flight.
    pub async fn next_event(&mut self) -> Option<UploadEvent> {
        if !self.has_in_flight() {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.apply(event);
        Some(event)
    }

    /// Drives every in-flight upload to its outcome.
    pub async fn settle(&mut self) {
        while self.next_event().await.is_some() {}
    }

    fn apply(&mut self, event: UploadEvent) -> bool {
        let Some(document) = self.get_mut(event.document) else {
            return false;
        };
        if !document.upload.apply(event.attempt, event.progress) {
            debug!(document = %event.document, attempt = event.attempt, "stale upload event ignored");
            return false;
        }
        if let UploadProgress::Finished { success } = event.progress {
            if success {
                info!(document = %event.document, "document uploaded");
            } else {
                warn!(document = %event.document, "document upload failed");
            }
            self.tasks.remove(&event.document);
        }
        true
    }

    pub fn documents(&self) -> &[DocumentUpload] {
        &self.documents
    }

    pub fn get(&self, id: DocumentId) -> Option<&DocumentUpload> {
        self.documents.iter().find(|document| document.id == id)
    }

    fn get_mut(&mut self, id: DocumentId) -> Option<&mut DocumentUpload> {
        self.documents.iter_mut().find(|document| document.id == id)
    }

    pub fn has_success(&self) -> bool {
        self.documents
            .iter()
            .any(|document| document.upload.is_success())
    }

    pub fn has_in_flight(&self) -> bool {
        self.documents
            .iter()
            .any(|document| document.upload.is_in_flight())
    }

    /// Documents whose declared `Other` type still lacks a subtype.
    pub fn incomplete_other(&self) -> impl Iterator<Item = &DocumentUpload> {
        self.documents
            .iter()
            .filter(|document| document.kind.is_incomplete_other())
    }

    pub fn records(&self) -> Vec<DocumentRecord> {
        self.documents.iter().map(DocumentUpload::record).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drops every document and cancels all uploads.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.documents.clear();
        while self.events_rx.try_recv().is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::portal::documents::UploadStatus;
    use std::time::Duration;

    fn fast(success_ratio: f64) -> DocumentLedger {
        DocumentLedger::new(UploadSimulation::new(
            Duration::from_millis(1),
            50,
            Duration::from_millis(1),
            success_ratio,
        ))
    }

    #[test]
    fn ids_increase_even_within_one_millisecond() {
        let mut ledger = DocumentLedger::default();
        let now = Utc::now();

        let first = ledger.add(now);
        let second = ledger.add(now);
        let third = ledger.add(now - chrono::Duration::seconds(5));

        assert!(first < second && second < third);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn other_subtype_only_applies_to_other_documents() {
        let mut ledger = DocumentLedger::default();
        let id = ledger.add(Utc::now());

        assert!(!ledger.set_other_subtype(id, "Portfolio"));
        ledger.set_kind(id, DocumentKind::Other(String::new()));
        assert_eq!(ledger.incomplete_other().count(), 1);
        assert!(ledger.set_other_subtype(id, "Portfolio"));
        assert_eq!(ledger.incomplete_other().count(), 0);
        assert_eq!(ledger.records()[0].document_type, "Other: Portfolio");
    }

    #[tokio::test]
    async fn successful_upload_is_recorded() {
        let mut ledger = fast(1.0);
        let id = ledger.add(Utc::now());
        ledger.set_kind(id, DocumentKind::Passport);

        assert!(ledger.select_files(id, vec!["passport.pdf".to_string()]));
        assert!(ledger.has_in_flight());
        ledger.settle().await;

        let document = ledger.get(id).expect("document present");
        assert_eq!(document.upload.status(), UploadStatus::Success);
        assert_eq!(document.upload.progress(), 100);
        assert!(ledger.has_success());
    }

    #[tokio::test]
    async fn failed_upload_does_not_count_as_success() {
        let mut ledger = fast(0.0);
        let id = ledger.add(Utc::now());

        ledger.select_files(id, vec!["cv.pdf".to_string()]);
        ledger.settle().await;

        let document = ledger.get(id).expect("document present");
        assert_eq!(document.upload.status(), UploadStatus::Error);
        assert_eq!(document.upload.error(), Some(crate::workflows::portal::documents::UPLOAD_FAILED_MESSAGE));
        assert!(!ledger.has_success());
    }

    #[tokio::test]
    async fn removing_a_document_cancels_its_upload() {
        let mut ledger = fast(1.0);
        let id = ledger.add(Utc::now());
        ledger.select_files(id, vec!["cv.pdf".to_string()]);

        assert!(ledger.remove(id));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(ledger.pump(), 0);
        assert!(ledger.is_empty());
        assert!(!ledger.has_in_flight());
    }

    #[tokio::test]
    async fn clearing_files_resets_to_idle_and_ignores_late_events() {
        let mut ledger = fast(1.0);
        let id = ledger.add(Utc::now());
        ledger.select_files(id, vec!["cv.pdf".to_string()]);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(ledger.clear_files(id));
        ledger.pump();

        let document = ledger.get(id).expect("document present");
        assert_eq!(document.upload.status(), UploadStatus::Idle);
        assert_eq!(document.upload.progress(), 0);
    }

    #[tokio::test]
    async fn reselecting_files_supersedes_the_running_upload() {
        let mut ledger = fast(1.0);
        let id = ledger.add(Utc::now());
        ledger.select_files(id, vec!["draft.pdf".to_string()]);
        ledger.select_files(id, vec!["final.pdf".to_string()]);
        ledger.settle().await;

        let document = ledger.get(id).expect("document present");
        assert!(document.upload.is_success());
        assert_eq!(document.upload.first_file_name(), Some("final.pdf"));
        assert_eq!(document.upload.attempt(), 2);
    }
}
