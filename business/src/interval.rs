//! Rotation-interval management.
//!
//! The daemon is the source of truth: after every write the interval is
//! read back and the confirmed value is what the UI reports.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;
use wallshell_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::{ShellConfig, daemon};

/// Seconds requested by the form, consumed by [`ModifyIntervalCommand`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalInput {
    pub seconds: u64,
}

impl State for IntervalInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IntervalStatus {
    #[default]
    Idle,
    Loading,
    Saving,
    /// The daemon's current value, fetched when the form opens.
    Current(u64),
    /// Write confirmed: the value the daemon read back after the set call.
    Confirmed(u64),
    Error(String),
}

impl IntervalStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Error(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntervalCompute {
    pub status: IntervalStatus,
}

impl State for IntervalCompute {
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

/// Fetch the daemon's current interval (form prefill).
#[derive(Debug, Default)]
pub struct FetchIntervalCommand;

impl Command for FetchIntervalCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let config: ShellConfig = snap.state();
        Box::pin(async move {
            updater.set(IntervalCompute {
                status: IntervalStatus::Loading,
            });
            match daemon::get_change_interval(&config).await {
                Ok(seconds) => updater.set(IntervalCompute {
                    status: IntervalStatus::Current(seconds),
                }),
                Err(err) => {
                    // Prefill is best-effort; the form opens with an empty
                    // field and the user types a value.
                    log::debug!(
                        target: "wallshell_business::interval",
                        "interval prefill failed: {err}"
                    );
                    updater.set(IntervalCompute {
                        status: IntervalStatus::Idle,
                    });
                }
            }
        })
    }
}

/// Write [`IntervalInput`] to the daemon, then read the value back.
#[derive(Debug, Default)]
pub struct ModifyIntervalCommand;

impl Command for ModifyIntervalCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let input: IntervalInput = snap.state();
        let config: ShellConfig = snap.state();

        Box::pin(async move {
            if input.seconds == 0 {
                updater.set(IntervalCompute {
                    status: IntervalStatus::Error(
                        "the interval must be a positive number of seconds".to_owned(),
                    ),
                });
                return;
            }

            updater.set(IntervalCompute {
                status: IntervalStatus::Saving,
            });

            if let Err(err) = daemon::set_change_interval(&config, input.seconds).await {
                updater.set(IntervalCompute {
                    status: IntervalStatus::Error(err.to_string()),
                });
                return;
            }

            match daemon::get_change_interval(&config).await {
                Ok(confirmed) => updater.set(IntervalCompute {
                    status: IntervalStatus::Confirmed(confirmed),
                }),
                Err(err) => updater.set(IntervalCompute {
                    status: IntervalStatus::Error(err.to_string()),
                }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::test_utils::TestContext;

    #[tokio::test]
    async fn modify_reports_the_read_back_value() {
        let mut test_ctx = TestContext::new().await;
        Mock::given(method("PUT"))
            .and(path("/api/interval"))
            .and(body_json(serde_json::json!({"newChangeInterval": 90})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&test_ctx.server)
            .await;
        // The daemon clamps to 120: the confirmed value wins over the input.
        test_ctx.mock_interval(120).await;

        test_ctx.ctx.state_mut::<IntervalInput>().seconds = 90;
        test_ctx.ctx.enqueue_command::<ModifyIntervalCommand>();
        test_ctx.flush_and_wait().await;

        assert_eq!(
            test_ctx.ctx.state::<IntervalCompute>().status,
            IntervalStatus::Confirmed(120)
        );
    }

    #[tokio::test]
    async fn zero_seconds_never_reaches_the_daemon() {
        let mut test_ctx = TestContext::new().await;

        test_ctx.ctx.state_mut::<IntervalInput>().seconds = 0;
        test_ctx.ctx.enqueue_command::<ModifyIntervalCommand>();
        test_ctx.flush_and_wait().await;

        assert!(matches!(
            &test_ctx.ctx.state::<IntervalCompute>().status,
            IntervalStatus::Error(msg) if msg.contains("positive")
        ));
        assert!(test_ctx.received_requests().await.is_empty());
    }

    #[tokio::test]
    async fn fetch_prefills_the_current_value() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_interval(300).await;

        test_ctx.ctx.enqueue_command::<FetchIntervalCommand>();
        test_ctx.flush_and_wait().await;

        assert_eq!(
            test_ctx.ctx.state::<IntervalCompute>().status,
            IntervalStatus::Current(300)
        );
    }

    #[tokio::test]
    async fn failed_write_surfaces_the_error() {
        let mut test_ctx = TestContext::new().await;
        Mock::given(method("PUT"))
            .and(path("/api/interval"))
            .respond_with(ResponseTemplate::new(500).set_body_string("store locked"))
            .mount(&test_ctx.server)
            .await;

        test_ctx.ctx.state_mut::<IntervalInput>().seconds = 60;
        test_ctx.ctx.enqueue_command::<ModifyIntervalCommand>();
        test_ctx.flush_and_wait().await;

        assert!(matches!(
            &test_ctx.ctx.state::<IntervalCompute>().status,
            IntervalStatus::Error(msg) if msg.contains("store locked")
        ));
    }
}
