//! State of the upload screen: pending selection, metadata form, upload
//! status, and the browsable list of uploaded files.
//!
//! Everything here is synchronous. Network calls happen elsewhere (see
//! [`crate::session`] or a front end's backend task); their results are fed
//! back through `finish_upload`, `apply_refresh` and `finish_delete`.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{ApiError, Notice, PendingFile, RemoteFileRecord, UploadBatch};

/// How a freshly fetched list is ordered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordOrder {
    /// Sort by `uploaded_at`, newest first.
    #[default]
    NewestFirst,
    /// Reverse whatever order the server returned.
    ServerReversed,
}

impl RecordOrder {
    pub fn label(self) -> &'static str {
        match self {
            Self::NewestFirst => "newest-first",
            Self::ServerReversed => "server-reversed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "newest-first" | "newest" => Some(Self::NewestFirst),
            "server-reversed" | "reversed" => Some(Self::ServerReversed),
            _ => None,
        }
    }

    pub fn apply(self, mut records: Vec<RemoteFileRecord>) -> Vec<RemoteFileRecord> {
        match self {
            Self::ServerReversed => records.reverse(),
            Self::NewestFirst => {
                // Stable: equal or unparseable timestamps keep server order.
                records.sort_by(|a, b| {
                    match (parse_timestamp(&a.uploaded_at), parse_timestamp(&b.uploaded_at)) {
                        (Some(ta), Some(tb)) => tb.cmp(&ta),
                        (Some(_), None) => Ordering::Less,
                        (None, Some(_)) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    }
                });
            }
        }
        records
    }
}

/// Parse an RFC 3339 or naive ISO-8601 timestamp into UTC-naive time.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Indices of records whose display name contains `query`, case-insensitively.
pub fn filtered_indices(records: &[RemoteFileRecord], query: &str) -> Vec<usize> {
    let query_lower = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| query.is_empty() || r.file_name.to_lowercase().contains(&query_lower))
        .map(|(i, _)| i)
        .collect()
}

/// Screen-local state for one upload screen instance.
#[derive(Debug, Default)]
pub struct UploadScreen {
    pending: Vec<PendingFile>,
    course: String,
    subject: String,
    records: Vec<RemoteFileRecord>,
    search_query: String,
    /// Size of the batch in flight, if any.
    uploading: Option<usize>,
    order: RecordOrder,
    mounted: bool,
}

impl UploadScreen {
    pub fn new(order: RecordOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Returns `true` exactly once: the first time the screen becomes active.
    /// The caller performs the initial refresh when it does.
    pub fn mount(&mut self) -> bool {
        !std::mem::replace(&mut self.mounted, true)
    }

    pub fn order(&self) -> RecordOrder {
        self.order
    }

    // ── Selection ───────────────────────────────────────────────

    pub fn add_files(&mut self, files: impl IntoIterator<Item = PendingFile>) {
        self.pending.extend(files);
    }

    /// Remove the pending file at `index`. Out-of-range indices are ignored.
    pub fn remove_file(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.pending.len()).then(|| self.pending.remove(index))
    }

    pub fn pending(&self) -> &[PendingFile] {
        &self.pending
    }

    // ── Metadata ────────────────────────────────────────────────

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn set_course(&mut self, course: impl Into<String>) {
        self.course = course.into();
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    // ── Upload ──────────────────────────────────────────────────

    pub fn is_uploading(&self) -> bool {
        self.uploading.is_some()
    }

    /// Submit control is enabled iff there is something to send and no
    /// upload is already in flight.
    pub fn can_submit(&self) -> bool {
        !self.pending.is_empty() && self.uploading.is_none()
    }

    /// Enter the uploading state and snapshot the batch to send.
    /// Returns `None` (and changes nothing) when submission is disabled.
    pub fn begin_upload(&mut self) -> Option<UploadBatch> {
        if !self.can_submit() {
            return None;
        }
        self.uploading = Some(self.pending.len());
        Some(UploadBatch {
            files: self.pending.clone(),
            course: self.course.clone(),
            subject: self.subject.clone(),
        })
    }

    /// Apply the result of the upload request started by [`begin_upload`].
    ///
    /// On success the selection and both metadata fields are cleared; on
    /// failure they are left as they were so the user can retry.
    ///
    /// [`begin_upload`]: Self::begin_upload
    pub fn finish_upload(&mut self, result: Result<serde_json::Value, ApiError>) -> Notice {
        let sent = self.uploading.take();
        match result {
            Ok(body) => {
                let files = sent.unwrap_or(self.pending.len());
                tracing::info!(files, "upload succeeded");
                tracing::debug!(response = %body, "upload response");
                self.pending.clear();
                self.course.clear();
                self.subject.clear();
                Notice::UploadSucceeded { files }
            }
            Err(e) => {
                tracing::error!(error = %e, "error uploading files");
                Notice::UploadFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    // ── Browser ─────────────────────────────────────────────────

    /// Replace the stored list on success; keep the stale one on failure.
    pub fn apply_refresh(&mut self, result: Result<Vec<RemoteFileRecord>, ApiError>) {
        match result {
            Ok(records) => {
                self.records = self.order.apply(records);
            }
            Err(e) => {
                tracing::warn!(error = %e, "error fetching uploaded files");
            }
        }
    }

    /// Apply the result of a delete request. The stored list is never
    /// touched here; a successful notice asks for a refresh instead.
    pub fn finish_delete(&mut self, id: u64, result: Result<(), ApiError>) -> Notice {
        match result {
            Ok(()) => {
                tracing::info!(id, "file deleted");
                Notice::DeleteSucceeded { id }
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error deleting file");
                Notice::DeleteFailed {
                    id,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn records(&self) -> &[RemoteFileRecord] {
        &self.records
    }

    pub fn filter(&self) -> &str {
        &self.search_query
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
    }

    /// Stored records matching the search filter, in stored order.
    pub fn filtered_records(&self) -> Vec<&RemoteFileRecord> {
        filtered_indices(&self.records, &self.search_query)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PendingFile {
        PendingFile::from_bytes(name, name.as_bytes().to_vec())
    }

    fn record(id: u64, name: &str, uploaded_at: &str) -> RemoteFileRecord {
        RemoteFileRecord {
            id,
            file_name: name.to_string(),
            uploaded_at: uploaded_at.to_string(),
        }
    }

    fn names(screen: &UploadScreen) -> Vec<&str> {
        screen.pending().iter().map(|f| f.name.as_str()).collect()
    }

    // ── Selection ───────────────────────────────────────────────

    #[test]
    fn add_files_appends_in_order_and_keeps_duplicates() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a.pdf"), file("b.pdf")]);
        screen.add_files([file("a.pdf")]);
        assert_eq!(names(&screen), ["a.pdf", "b.pdf", "a.pdf"]);
    }

    #[test]
    fn remove_file_removes_exactly_that_position() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a"), file("b"), file("c"), file("d")]);
        let removed = screen.remove_file(1).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(names(&screen), ["a", "c", "d"]);
    }

    #[test]
    fn remove_file_out_of_range_is_noop() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a")]);
        assert!(screen.remove_file(5).is_none());
        assert_eq!(names(&screen), ["a"]);
    }

    #[test]
    fn pending_length_tracks_adds_minus_removes() {
        let mut screen = UploadScreen::default();
        let mut expected: Vec<String> = Vec::new();
        // Deterministic interleaving of adds and removals.
        for step in 0..40usize {
            if step % 3 == 2 && !expected.is_empty() {
                let idx = (step * 7) % expected.len();
                expected.remove(idx);
                screen.remove_file(idx);
            } else {
                let name = format!("f{step}");
                expected.push(name.clone());
                screen.add_files([file(&name)]);
            }
            assert_eq!(screen.pending().len(), expected.len());
            assert_eq!(names(&screen), expected);
        }
    }

    // ── Submit gating ───────────────────────────────────────────

    #[test]
    fn submit_disabled_when_nothing_pending() {
        let mut screen = UploadScreen::default();
        assert!(!screen.can_submit());
        assert!(screen.begin_upload().is_none());
        assert!(!screen.is_uploading());
    }

    #[test]
    fn submit_disabled_while_uploading() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a.pdf")]);
        assert!(screen.can_submit());
        assert!(screen.begin_upload().is_some());
        assert!(screen.is_uploading());
        assert!(!screen.can_submit());
        assert!(screen.begin_upload().is_none());
    }

    #[test]
    fn begin_upload_snapshots_files_and_metadata() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a.pdf"), file("b.pdf")]);
        screen.set_course("CS101");
        let batch = screen.begin_upload().unwrap();
        assert_eq!(batch.files.len(), 2);
        assert_eq!(batch.course, "CS101");
        assert_eq!(batch.subject, "");
    }

    #[test]
    fn successful_upload_clears_selection_and_metadata() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a.pdf"), file("b.pdf")]);
        screen.set_course("CS101");
        screen.set_subject("Algorithms");
        screen.begin_upload().unwrap();

        let notice = screen.finish_upload(Ok(serde_json::json!({"status": "ok"})));

        assert_eq!(notice, Notice::UploadSucceeded { files: 2 });
        assert!(notice.requests_refresh());
        assert!(screen.pending().is_empty());
        assert_eq!(screen.course(), "");
        assert_eq!(screen.subject(), "");
        assert!(!screen.is_uploading());
    }

    #[test]
    fn failed_upload_preserves_selection_and_metadata() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a.pdf"), file("b.pdf")]);
        screen.set_course("CS101");
        screen.set_subject("Algorithms");
        let before = screen.pending().to_vec();
        screen.begin_upload().unwrap();

        let notice = screen.finish_upload(Err(ApiError::Http {
            status: 500,
            message: "boom".into(),
        }));

        assert!(notice.is_failure());
        assert!(!notice.requests_refresh());
        assert_eq!(screen.pending(), before.as_slice());
        assert_eq!(screen.course(), "CS101");
        assert_eq!(screen.subject(), "Algorithms");
        assert!(!screen.is_uploading());
        assert!(screen.can_submit());
    }

    #[test]
    fn success_notice_counts_the_batch_that_was_sent() {
        let mut screen = UploadScreen::default();
        screen.add_files([file("a.pdf"), file("b.pdf")]);
        screen.begin_upload().unwrap();
        screen.remove_file(0);
        screen.add_files([file("c.pdf"), file("d.pdf")]);

        let notice = screen.finish_upload(Ok(serde_json::json!({})));

        assert_eq!(notice, Notice::UploadSucceeded { files: 2 });
    }

    // ── Browser ─────────────────────────────────────────────────

    #[test]
    fn mount_fires_once() {
        let mut screen = UploadScreen::default();
        assert!(screen.mount());
        assert!(!screen.mount());
        assert!(!screen.mount());
    }

    #[test]
    fn refresh_failure_keeps_stale_list() {
        let mut screen = UploadScreen::default();
        screen.apply_refresh(Ok(vec![record(1, "x", "2024-01-01T00:00:00")]));
        screen.apply_refresh(Err(ApiError::Connection("down".into())));
        assert_eq!(screen.records().len(), 1);
        assert_eq!(screen.records()[0].id, 1);
    }

    #[test]
    fn newest_first_sorts_by_timestamp() {
        let mut screen = UploadScreen::new(RecordOrder::NewestFirst);
        screen.apply_refresh(Ok(vec![
            record(1, "old", "2023-05-01T08:00:00"),
            record(2, "newest", "2024-06-01T08:00:00Z"),
            record(3, "middle", "2024-01-01T08:00:00.250"),
        ]));
        let ids: Vec<u64> = screen.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn newest_first_puts_unparseable_last_in_server_order() {
        let sorted = RecordOrder::NewestFirst.apply(vec![
            record(1, "a", "garbage"),
            record(2, "b", "2024-01-01T00:00:00"),
            record(3, "c", ""),
        ]);
        let ids: Vec<u64> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[test]
    fn server_reversed_reverses() {
        let sorted = RecordOrder::ServerReversed.apply(vec![
            record(1, "a", "2025-01-01T00:00:00"),
            record(2, "b", "2024-01-01T00:00:00"),
        ]);
        let ids: Vec<u64> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn record_order_names() {
        assert_eq!(
            RecordOrder::from_name("Newest-First"),
            Some(RecordOrder::NewestFirst)
        );
        assert_eq!(
            RecordOrder::from_name("server-reversed"),
            Some(RecordOrder::ServerReversed)
        );
        assert_eq!(RecordOrder::from_name("random"), None);
        assert_eq!(RecordOrder::ServerReversed.label(), "server-reversed");
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut screen = UploadScreen::new(RecordOrder::ServerReversed);
        screen.apply_refresh(Ok(vec![
            record(1, "Lecture-Notes.pdf", "2024-01-01T00:00:00"),
            record(2, "lab1.docx", "2024-01-02T00:00:00"),
            record(3, "NOTES-week2.pdf", "2024-01-03T00:00:00"),
        ]));
        screen.set_filter("notes");
        let ids: Vec<u64> = screen.filtered_records().iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 1]);
        // The stored list is not touched by filtering.
        assert_eq!(screen.records().len(), 3);
    }

    #[test]
    fn filtered_view_has_no_false_positives_or_negatives() {
        let records = vec![
            record(1, "Alpha.pdf", "t"),
            record(2, "beta.PDF", "t"),
            record(3, "Gamma notes", "t"),
            record(4, "ALPHABET", "t"),
            record(5, "", "t"),
            record(6, "Ärger.txt", "t"),
        ];
        for query in ["", "alpha", "PDF", "a", "notes ", "zzz", "ä", "ÄR"] {
            let view = filtered_indices(&records, query);
            let q = query.to_lowercase();
            for (i, r) in records.iter().enumerate() {
                let expected = r.file_name.to_lowercase().contains(&q);
                assert_eq!(view.contains(&i), expected, "query {query:?} record {i}");
            }
        }
    }

    #[test]
    fn empty_filter_shows_everything() {
        let mut screen = UploadScreen::default();
        screen.apply_refresh(Ok(vec![
            record(1, "a", "2024-01-01T00:00:00"),
            record(2, "b", "2024-01-02T00:00:00"),
        ]));
        assert_eq!(screen.filtered_records().len(), 2);
    }

    #[test]
    fn failed_delete_leaves_list_unchanged() {
        let mut screen = UploadScreen::default();
        screen.apply_refresh(Ok(vec![record(9, "a", "2024-01-01T00:00:00")]));
        let notice = screen.finish_delete(
            9,
            Err(ApiError::Http {
                status: 404,
                message: "gone".into(),
            }),
        );
        assert!(notice.is_failure());
        assert_eq!(screen.records().len(), 1);
    }

    #[test]
    fn successful_delete_requests_refresh_without_local_removal() {
        let mut screen = UploadScreen::default();
        screen.apply_refresh(Ok(vec![record(9, "a", "2024-01-01T00:00:00")]));
        let notice = screen.finish_delete(9, Ok(()));
        assert_eq!(notice, Notice::DeleteSucceeded { id: 9 });
        assert!(notice.requests_refresh());
        assert_eq!(screen.records().len(), 1);
    }
}
