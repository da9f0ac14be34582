//! Submission flow: compose, then persist or log.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::composer::{compose, ComposeError};
use crate::model::{now_millis, LinkRequest, StoredLink};
use crate::storage::{ErrorStorage, LinkStorage, SlotStore};

/// Error-log message for failures outside composition itself.
pub const UNEXPECTED_FAILURE: &str = "Unexpected failure";

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct Generated {
    pub link: StoredLink,

    /// False when the link could not be written to the last-link slot
    pub persisted: bool,
}

/// Ties the composer to the two storage slots.
pub struct LinkService {
    links: LinkStorage,
    errors: ErrorStorage,
}

impl LinkService {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self {
            links: LinkStorage::new(store.clone()),
            errors: ErrorStorage::new(store),
        }
    }

    pub fn links(&self) -> &LinkStorage {
        &self.links
    }

    pub fn errors(&self) -> &ErrorStorage {
        &self.errors
    }

    /// Builds the tracked link for `request`
    ///
    /// On success the link replaces the last-link slot. On failure the
    /// error is appended to the error log and the last-link slot is left
    /// untouched. A failed save is logged as an unexpected failure but does
    /// not fail the submission.
    pub fn generate(&self, request: &LinkRequest) -> Result<Generated, ComposeError> {
        let url = match compose(&request.link, &request.params) {
            Ok(url) => url,
            Err(err) => {
                debug!(error = %err, "link composition failed");
                self.record(&err);
                return Err(err);
            }
        };

        match self.links.try_save(request, &url) {
            Ok(link) => {
                info!(url = %link.url, "link generated");
                Ok(Generated {
                    link,
                    persisted: true,
                })
            }
            Err(err) => {
                warn!(error = %err, "failed to save link to storage");
                self.errors.add(UNEXPECTED_FAILURE, Some(&err.to_string()));
                Ok(Generated {
                    link: StoredLink {
                        request: request.clone(),
                        url,
                        timestamp: now_millis(),
                    },
                    persisted: false,
                })
            }
        }
    }

    /// Appends `err` to the error log.
    pub fn record(&self, err: &ComposeError) {
        let context = err.context();
        self.errors.add(err.message(), Some(&context));
    }
}
