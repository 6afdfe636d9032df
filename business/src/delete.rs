//! The deletion coordinator.
//!
//! Single deletes reconcile the gallery optimistically: on daemon
//! confirmation the matching entry is dropped in place, no full re-sync.
//! Bulk delete clears every entry unconditionally on success, relying on
//! the daemon's clear being atomic.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;
use ustr::Ustr;
use wallshell_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::daemon::{self, DeleteOutcome};
use crate::gallery::{GalleryCompute, GalleryStatus};
use crate::ShellConfig;

/// Which image the next [`DeleteImageCommand`] run removes.
#[derive(Debug, Clone, Default)]
pub struct DeleteImageInput {
    pub name: Ustr,
}

impl State for DeleteImageInput {
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
pub enum DeleteStatus {
    #[default]
    Idle,
    Deleting,
    Deleted(Ustr),
    /// The daemon no longer has the file; the gallery is left untouched.
    NotFound(Ustr),
    Error {
        name: Ustr,
        error: String,
    },
}

impl DeleteStatus {
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            Self::Deleted(_) | Self::NotFound(_) | Self::Error { .. }
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteCompute {
    pub status: DeleteStatus,
}

impl State for DeleteCompute {
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

/// Delete the image named by [`DeleteImageInput`].
#[derive(Debug, Default)]
pub struct DeleteImageCommand;

impl Command for DeleteImageCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let input: DeleteImageInput = snap.state();
        let config: ShellConfig = snap.state();
        let gallery: GalleryCompute = snap.state();

        Box::pin(async move {
            updater.set(DeleteCompute {
                status: DeleteStatus::Deleting,
            });

            match daemon::delete_image(&config, input.name.as_str()).await {
                Ok(DeleteOutcome::Deleted) => {
                    // Optimistic removal: drop exactly the confirmed entry,
                    // leave every other entry untouched. The overlay gate
                    // guarantees no sync ran since the snapshot was taken.
                    if let GalleryStatus::Ready { entries } = gallery.status {
                        let remaining: Vec<_> = entries
                            .into_iter()
                            .filter(|entry| entry.name != input.name)
                            .collect();
                        updater.set(GalleryCompute {
                            status: GalleryStatus::Ready { entries: remaining },
                            last_synced: gallery.last_synced,
                        });
                    }
                    updater.set(DeleteCompute {
                        status: DeleteStatus::Deleted(input.name),
                    });
                }
                Ok(DeleteOutcome::NotFound) => {
                    updater.set(DeleteCompute {
                        status: DeleteStatus::NotFound(input.name),
                    });
                }
                Err(err) => {
                    log::warn!(
                        target: "wallshell_business::delete",
                        "delete of {} failed: {err}",
                        input.name
                    );
                    updater.set(DeleteCompute {
                        status: DeleteStatus::Error {
                            name: input.name,
                            error: err.to_string(),
                        },
                    });
                }
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteAllStatus {
    #[default]
    Idle,
    Clearing,
    Cleared,
    Error(String),
}

impl DeleteAllStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Cleared | Self::Error(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteAllCompute {
    pub status: DeleteAllStatus,
}

impl State for DeleteAllCompute {
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

/// Clear the daemon's whole image store, then the mirrored gallery.
#[derive(Debug, Default)]
pub struct DeleteAllImagesCommand;

impl Command for DeleteAllImagesCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let config: ShellConfig = snap.state();

        Box::pin(async move {
            updater.set(DeleteAllCompute {
                status: DeleteAllStatus::Clearing,
            });

            match daemon::delete_all_images(&config).await {
                Ok(()) => {
                    updater.set(GalleryCompute::ready(Vec::new()));
                    updater.set(DeleteAllCompute {
                        status: DeleteAllStatus::Cleared,
                    });
                }
                Err(err) => {
                    log::warn!(target: "wallshell_business::delete", "delete-all failed: {err}");
                    updater.set(DeleteAllCompute {
                        status: DeleteAllStatus::Error(err.to_string()),
                    });
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::gallery::GalleryEntry;
    use crate::test_utils::TestContext;

    fn seeded_gallery(names: &[&str]) -> GalleryCompute {
        GalleryCompute::ready(
            names
                .iter()
                .map(|name| GalleryEntry {
                    name: Ustr::from(name),
                    bytes: vec![1],
                })
                .collect(),
        )
    }

    fn gallery_names(test_ctx: &TestContext) -> Vec<Ustr> {
        test_ctx
            .ctx
            .state::<GalleryCompute>()
            .entries()
            .map(|entries| entries.iter().map(|entry| entry.name).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn confirmed_delete_removes_exactly_that_entry() {
        let mut test_ctx = TestContext::new().await;
        *test_ctx.ctx.state_mut::<GalleryCompute>() =
            seeded_gallery(&["a.png", "b.png", "c.png"]);
        test_ctx.mock_delete_structured("b.png", true).await;

        test_ctx.ctx.state_mut::<DeleteImageInput>().name = Ustr::from("b.png");
        test_ctx.ctx.enqueue_command::<DeleteImageCommand>();
        test_ctx.flush_and_wait().await;

        assert_eq!(
            test_ctx.ctx.state::<DeleteCompute>().status,
            DeleteStatus::Deleted(Ustr::from("b.png"))
        );
        assert_eq!(
            gallery_names(&test_ctx),
            vec![Ustr::from("a.png"), Ustr::from("c.png")]
        );
    }

    #[tokio::test]
    async fn not_found_leaves_the_gallery_alone() {
        let mut test_ctx = TestContext::new().await;
        *test_ctx.ctx.state_mut::<GalleryCompute>() = seeded_gallery(&["a.png", "b.png"]);
        Mock::given(method("DELETE"))
            .and(path("/api/images/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&test_ctx.server)
            .await;

        test_ctx.ctx.state_mut::<DeleteImageInput>().name = Ustr::from("gone.png");
        test_ctx.ctx.enqueue_command::<DeleteImageCommand>();
        test_ctx.flush_and_wait().await;

        assert_eq!(
            test_ctx.ctx.state::<DeleteCompute>().status,
            DeleteStatus::NotFound(Ustr::from("gone.png"))
        );
        assert_eq!(gallery_names(&test_ctx).len(), 2);
    }

    #[tokio::test]
    async fn structured_refusal_reads_as_not_found() {
        let mut test_ctx = TestContext::new().await;
        *test_ctx.ctx.state_mut::<GalleryCompute>() = seeded_gallery(&["a.png"]);
        test_ctx.mock_delete_structured("a.png", false).await;

        test_ctx.ctx.state_mut::<DeleteImageInput>().name = Ustr::from("a.png");
        test_ctx.ctx.enqueue_command::<DeleteImageCommand>();
        test_ctx.flush_and_wait().await;

        assert_eq!(
            test_ctx.ctx.state::<DeleteCompute>().status,
            DeleteStatus::NotFound(Ustr::from("a.png"))
        );
        assert_eq!(gallery_names(&test_ctx).len(), 1);
    }

    #[tokio::test]
    async fn legacy_text_response_still_confirms_deletion() {
        let mut test_ctx = TestContext::new().await;
        *test_ctx.ctx.state_mut::<GalleryCompute>() = seeded_gallery(&["old.png"]);
        Mock::given(method("DELETE"))
            .and(path("/api/images/old.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Successfully deleted file: \"old.png\""),
            )
            .mount(&test_ctx.server)
            .await;

        test_ctx.ctx.state_mut::<DeleteImageInput>().name = Ustr::from("old.png");
        test_ctx.ctx.enqueue_command::<DeleteImageCommand>();
        test_ctx.flush_and_wait().await;

        assert_eq!(
            test_ctx.ctx.state::<DeleteCompute>().status,
            DeleteStatus::Deleted(Ustr::from("old.png"))
        );
        assert!(gallery_names(&test_ctx).is_empty());
    }

    #[tokio::test]
    async fn transport_failure_keeps_the_entry() {
        let mut test_ctx = TestContext::new().await;
        *test_ctx.ctx.state_mut::<GalleryCompute>() = seeded_gallery(&["a.png"]);
        Mock::given(method("DELETE"))
            .and(path("/api/images/a.png"))
            .respond_with(ResponseTemplate::new(500).set_body_string("disk error"))
            .mount(&test_ctx.server)
            .await;

        test_ctx.ctx.state_mut::<DeleteImageInput>().name = Ustr::from("a.png");
        test_ctx.ctx.enqueue_command::<DeleteImageCommand>();
        test_ctx.flush_and_wait().await;

        assert!(matches!(
            &test_ctx.ctx.state::<DeleteCompute>().status,
            DeleteStatus::Error { name, error }
                if *name == Ustr::from("a.png") && error.contains("disk error")
        ));
        assert_eq!(gallery_names(&test_ctx).len(), 1);
    }

    #[tokio::test]
    async fn bulk_delete_clears_any_gallery_size() {
        for seed in [&[][..], &["a.png"][..], &["a.png", "b.png", "c.png"][..]] {
            let mut test_ctx = TestContext::new().await;
            *test_ctx.ctx.state_mut::<GalleryCompute>() = seeded_gallery(seed);
            Mock::given(method("DELETE"))
                .and(path("/api/images"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&test_ctx.server)
                .await;

            test_ctx.ctx.enqueue_command::<DeleteAllImagesCommand>();
            test_ctx.flush_and_wait().await;

            assert_eq!(
                test_ctx.ctx.state::<DeleteAllCompute>().status,
                DeleteAllStatus::Cleared
            );
            assert!(gallery_names(&test_ctx).is_empty());
        }
    }

    #[tokio::test]
    async fn failed_bulk_delete_keeps_the_gallery() {
        let mut test_ctx = TestContext::new().await;
        *test_ctx.ctx.state_mut::<GalleryCompute>() = seeded_gallery(&["a.png"]);
        Mock::given(method("DELETE"))
            .and(path("/api/images"))
            .respond_with(ResponseTemplate::new(500).set_body_string("nope"))
            .mount(&test_ctx.server)
            .await;

        test_ctx.ctx.enqueue_command::<DeleteAllImagesCommand>();
        test_ctx.flush_and_wait().await;

        assert!(matches!(
            &test_ctx.ctx.state::<DeleteAllCompute>().status,
            DeleteAllStatus::Error(msg) if msg.contains("nope")
        ));
        assert_eq!(gallery_names(&test_ctx).len(), 1);
    }
}
