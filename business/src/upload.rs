//! The batch uploader.
//!
//! A file selection is partitioned into consecutive batches of
//! `ShellConfig::chunk_size`, preserving the user's order. Batches go out
//! strictly one at a time so the daemon never sees concurrent large
//! payloads; the files *within* a batch are read concurrently since those
//! are independent local reads. The first failed batch aborts the rest —
//! already-sent batches stay committed, there is no rollback — and both
//! settle paths finish with a gallery re-fetch.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;
use wallshell_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::encode::{EncodeError, PickedFile, encode_file};
use crate::gallery::load_gallery;
use crate::{ShellConfig, daemon};

/// The files the user just dropped or picked, in selection order.
/// Consumed by the next [`UploadImagesCommand`] run.
#[derive(Debug, Clone, Default)]
pub struct UploadSelection {
    pub files: Vec<PickedFile>,
}

impl State for UploadSelection {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    /// The selection was empty; no daemon call was made. Terminal, and the
    /// only place the "no files selected" notice originates.
    NoFilesSelected,
    Uploading {
        sent_batches: usize,
        total_batches: usize,
    },
    Completed {
        uploaded: usize,
    },
    /// Batch `batch` (1-indexed) failed. The `committed` batches before it
    /// were sent exactly once and remain on the daemon.
    Failed {
        batch: usize,
        committed: usize,
        error: String,
    },
}

impl UploadStatus {
    /// Terminal states: the operation has settled and the UI may release
    /// the overlay and surface a notice.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            Self::NoFilesSelected | Self::Completed { .. } | Self::Failed { .. }
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadCompute {
    pub status: UploadStatus,
}

impl State for UploadCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Encode and ship the current [`UploadSelection`].
#[derive(Debug, Default)]
pub struct UploadImagesCommand;

impl Command for UploadImagesCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let selection: UploadSelection = snap.state();
        let config: ShellConfig = snap.state();

        Box::pin(async move {
            if selection.files.is_empty() {
                updater.set(UploadCompute {
                    status: UploadStatus::NoFilesSelected,
                });
                return;
            }

            let total_batches = selection.files.len().div_ceil(config.chunk_size);
            updater.set(UploadCompute {
                status: UploadStatus::Uploading {
                    sent_batches: 0,
                    total_batches,
                },
            });

            let mut sent_batches = 0usize;
            let mut uploaded = 0usize;
            let mut failure: Option<(usize, String)> = None;

            for (index, batch) in selection.files.chunks(config.chunk_size).enumerate() {
                match encode_batch(batch.to_vec()).await {
                    Ok(records) => match daemon::upload_batch(&config, &records).await {
                        Ok(()) => {
                            sent_batches += 1;
                            uploaded += records.len();
                            updater.set(UploadCompute {
                                status: UploadStatus::Uploading {
                                    sent_batches,
                                    total_batches,
                                },
                            });
                        }
                        Err(err) => {
                            log::warn!(
                                target: "wallshell_business::upload",
                                "batch {}/{total_batches} failed, aborting the rest: {err}",
                                index + 1
                            );
                            failure = Some((index + 1, err.to_string()));
                            break;
                        }
                    },
                    Err(err) => {
                        log::warn!(
                            target: "wallshell_business::upload",
                            "encoding batch {}/{total_batches} failed: {err}",
                            index + 1
                        );
                        failure = Some((index + 1, err.to_string()));
                        break;
                    }
                }
            }

            // Whatever happened, re-sync so the gallery shows the subset
            // that actually landed.
            updater.set(load_gallery(&config).await);

            match failure {
                Some((batch, error)) => updater.set(UploadCompute {
                    status: UploadStatus::Failed {
                        batch,
                        committed: sent_batches,
                        error,
                    },
                }),
                None => updater.set(UploadCompute {
                    status: UploadStatus::Completed { uploaded },
                }),
            }
        })
    }
}

/// Read one batch's files concurrently, keeping selection order in the
/// result. One failed read fails the whole batch.
async fn encode_batch(files: Vec<PickedFile>) -> Result<Vec<daemon::UploadRecord>, EncodeError> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|file| tokio::spawn(encode_file(file)))
        .collect();

    let mut records = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(result) => records.push(result?),
            Err(err) => return Err(EncodeError::Task(err.to_string())),
        }
    }
    Ok(records)
}
