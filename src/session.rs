// src/session.rs
//! The single "current sample" owned by the window, and the bookkeeping that
//! keeps one upload in flight at a time.

use crate::data_types::{Sample, TableData};

/// Identifies one upload; results carrying any other ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The sample replaced the previous one.
    Shown,
    /// The parse produced nothing to display; the previous sample is cleared.
    Empty,
    /// Not the upload in flight; ignored.
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    sample: Option<Sample>,
    table: Option<TableData>,
    pending: Option<UploadTicket>,
    issued: u64,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts an upload, or returns `None` while another is still running.
    pub fn begin_upload(&mut self) -> Option<UploadTicket> {
        if self.pending.is_some() {
            return None;
        }
        self.issued += 1;
        let ticket = UploadTicket(self.issued);
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Drops the in-flight upload, e.g. when the open dialog is cancelled.
    pub fn cancel_upload(&mut self, ticket: UploadTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    /// Replaces the current sample wholesale with the upload's result.
    pub fn finish_upload(&mut self, ticket: UploadTicket, sample: Sample) -> UploadOutcome {
        if self.pending != Some(ticket) {
            return UploadOutcome::Stale;
        }
        self.pending = None;

        let table = TableData::from_records(&sample.records);
        if table.is_empty() {
            self.sample = None;
            self.table = None;
            UploadOutcome::Empty
        } else {
            self.sample = Some(sample);
            self.table = Some(table);
            UploadOutcome::Shown
        }
    }

    pub fn sample(&self) -> Option<&Sample> {
        self.sample.as_ref()
    }

    pub fn table(&self) -> Option<&TableData> {
        self.table.as_ref()
    }
}
