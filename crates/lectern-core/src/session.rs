//! Sequential driver for the upload screen.
//!
//! A [`Session`] pairs an [`UploadScreen`] with a [`MaterialApi`] and runs each
//! action to completion before returning. State is only mutated after the
//! corresponding network call has resolved.

use crate::{MaterialApi, Notice, RecordOrder, UploadScreen};

pub struct Session<A> {
    api: A,
    screen: UploadScreen,
}

impl<A: MaterialApi> Session<A> {
    pub fn new(api: A, order: RecordOrder) -> Self {
        Self {
            api,
            screen: UploadScreen::new(order),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn screen(&self) -> &UploadScreen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut UploadScreen {
        &mut self.screen
    }

    /// Perform the initial load. Only the first call fetches anything.
    pub async fn mount(&mut self) {
        if self.screen.mount() {
            self.refresh().await;
        }
    }

    /// Re-read the authoritative list. Failures leave the old list in place.
    pub async fn refresh(&mut self) {
        let result = self.api.list_files().await;
        self.screen.apply_refresh(result);
    }

    /// Upload the pending batch. Returns `None` when submission is disabled.
    pub async fn submit(&mut self) -> Option<Notice> {
        let batch = self.screen.begin_upload()?;
        let result = self.api.upload(&batch).await;
        let notice = self.screen.finish_upload(result);
        if notice.requests_refresh() {
            self.refresh().await;
        }
        Some(notice)
    }

    /// Delete one record, refreshing the list if the server accepted it.
    pub async fn delete(&mut self, id: u64) -> Notice {
        let result = self.api.delete_file(id).await;
        let notice = self.screen.finish_delete(id, result);
        if notice.requests_refresh() {
            self.refresh().await;
        }
        notice
    }
}
