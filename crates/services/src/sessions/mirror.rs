use std::sync::Arc;

use eduhub_core::model::AttemptSnapshot;
use storage::LocalStore;
use tokio::sync::Mutex;

use crate::error::SessionError;

/// Storage key of the in-progress attempt.
pub const TAKE_TEST_FORM_KEY: &str = "take-test-form";

/// Durable copy of the in-progress attempt, so a reload can resume it.
///
/// Writes and clears are serialized; after [`AttemptMirror::clear`] saves are dropped until
/// [`AttemptMirror::reopen`].
#[derive(Clone)]
pub struct AttemptMirror {
    store: Arc<dyn LocalStore>,
    sealed: Arc<Mutex<bool>>,
}

impl AttemptMirror {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            sealed: Arc::new(Mutex::new(false)),
        }
    }

    /// Accept saves again; called when a new attempt starts.
    pub async fn reopen(&self) {
        *self.sealed.lock().await = false;
    }

    /// Overwrite the mirrored attempt. A no-op after [`AttemptMirror::clear`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Encoding` or `SessionError::Storage`.
    pub async fn save(&self, snapshot: &AttemptSnapshot) -> Result<(), SessionError> {
        let sealed = self.sealed.lock().await;
        if *sealed {
            tracing::debug!(test = %snapshot.test_id, "mirror sealed; dropping stale snapshot");
            return Ok(());
        }
        let encoded = serde_json::to_string(snapshot)?;
        self.store.set_item(TAKE_TEST_FORM_KEY, &encoded).await?;
        Ok(())
    }

    /// Read the mirrored attempt. A record that no longer decodes is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn load(&self) -> Result<Option<AttemptSnapshot>, SessionError> {
        let Some(raw) = self.store.get_item(TAKE_TEST_FORM_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable attempt mirror");
                self.store.remove_item(TAKE_TEST_FORM_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Remove the record and seal the mirror against later saves.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the record cannot be removed.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let mut sealed = self.sealed.lock().await;
        *sealed = true;
        self.store.remove_item(TAKE_TEST_FORM_KEY).await?;
        Ok(())
    }
}
