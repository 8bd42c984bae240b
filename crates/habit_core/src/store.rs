use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::document::PeriodDocument;
use crate::error::StoreError;
use crate::notifications::{Notice, Notifier};
use crate::period::{PeriodId, PeriodMode};
use crate::storage::StorageAdapter;

/// One JSON document per period under `{root}/months/` and `{root}/weeks/`.
///
/// The public [`read`](Self::read) and [`write`](Self::write) never fail:
/// errors are logged and reported through the notifier instead.
pub struct PeriodStore {
    root: PathBuf,
    adapter: Arc<dyn StorageAdapter>,
    notifier: Arc<dyn Notifier>,
}

impl PeriodStore {
    pub fn new(
        root: impl Into<PathBuf>,
        adapter: Arc<dyn StorageAdapter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            root: root.into(),
            adapter,
            notifier,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &PeriodId) -> PathBuf {
        self.root
            .join(id.mode().dir_name())
            .join(format!("{id}.json"))
    }

    /// Creates the root and the mode subdirectory when missing.
    pub fn ensure_directories(&self, mode: PeriodMode) -> Result<(), StoreError> {
        let sub = self.root.join(mode.dir_name());
        for dir in [self.root.as_path(), sub.as_path()] {
            let exists = self
                .adapter
                .exists(dir)
                .map_err(|err| StoreError::io(dir, err))?;
            if !exists {
                debug!(path = %dir.display(), "creating tracker directory");
                self.adapter
                    .mkdir(dir)
                    .map_err(|err| StoreError::io(dir, err))?;
            }
        }
        Ok(())
    }

    /// Loads a period, materializing an empty document on disk when the
    /// period has no file yet.
    #[instrument(skip(self), fields(period = %id))]
    pub fn try_read(&self, id: &PeriodId) -> Result<PeriodDocument, StoreError> {
        self.ensure_directories(id.mode())?;
        let path = self.path_for(id);
        let exists = self
            .adapter
            .exists(&path)
            .map_err(|err| StoreError::io(&path, err))?;
        if !exists {
            let doc = PeriodDocument::new();
            self.write_at(&path, &doc)?;
            info!(path = %path.display(), "materialized empty period document");
            return Ok(doc);
        }
        let raw = self
            .adapter
            .read(&path)
            .map_err(|err| StoreError::io(&path, err))?;
        PeriodDocument::from_json(&raw).map_err(|err| StoreError::json(&path, err))
    }

    /// Best-effort load. On failure the stored file is left untouched and a
    /// fresh, unsaved document is returned.
    pub fn read(&self, id: &PeriodId) -> PeriodDocument {
        match self.try_read(id) {
            Ok(doc) => doc,
            Err(err) => {
                error!(period = %id, %err, "failed to read tracker data");
                self.notifier
                    .notify(Notice::warning("failed to read tracker data"));
                PeriodDocument::new()
            }
        }
    }

    #[instrument(skip(self, doc), fields(period = %id))]
    pub fn try_write(&self, id: &PeriodId, doc: &PeriodDocument) -> Result<(), StoreError> {
        self.ensure_directories(id.mode())?;
        self.write_at(&self.path_for(id), doc)
    }

    /// Best-effort save. Returns `false` after logging and notifying on
    /// failure; the caller's in-memory state is kept as is.
    pub fn write(&self, id: &PeriodId, doc: &PeriodDocument) -> bool {
        match self.try_write(id, doc) {
            Ok(()) => true,
            Err(err) => {
                error!(period = %id, %err, "failed to save tracker data");
                self.notifier
                    .notify(Notice::warning("failed to save tracker data"));
                false
            }
        }
    }

    fn write_at(&self, path: &Path, doc: &PeriodDocument) -> Result<(), StoreError> {
        let text = doc
            .to_json_pretty()
            .map_err(|err| StoreError::json(path, err))?;
        self.adapter
            .write(path, &text)
            .map_err(|err| StoreError::io(path, err))
    }
}
