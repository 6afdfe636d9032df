use std::collections::VecDeque;

type Callback = Box<dyn FnOnce() + Send>;

/// One button on an alert dialog.
///
/// The callback runs exactly once when the button is activated; dismissing
/// the dialog (Escape, Space, backdrop click) never runs any callback.
pub struct AlertButton {
    pub label: String,
    pub primary: bool,
    on_activate: Option<Callback>,
}

impl AlertButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            primary: false,
            on_activate: None,
        }
    }

    pub fn primary(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            primary: true,
            on_activate: None,
        }
    }

    pub fn on_activate(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_activate = Some(Box::new(callback));
        self
    }
}

struct AlertBox {
    title: String,
    message: String,
    buttons: Vec<AlertButton>,
}

/// The alert dialog model: one visible dialog plus a queue of notices
/// waiting behind it.
///
/// Replaces blocking synchronous prompts: activating a button runs its
/// callback and closes the dialog, any other dismissal closes it without
/// running anything.
#[derive(Default)]
pub struct AlertDialogState {
    current: Option<AlertBox>,
    queue: VecDeque<AlertBox>,
}

impl AlertDialogState {
    /// Show a dialog, queueing it when one is already on screen.
    pub fn open(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        buttons: Vec<AlertButton>,
    ) {
        let alert = AlertBox {
            title: title.into(),
            message: message.into(),
            buttons,
        };
        if self.current.is_some() {
            self.queue.push_back(alert);
        } else {
            self.current = Some(alert);
        }
    }

    /// Plain notice with a single primary "Okay" button.
    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.open(title, message, vec![AlertButton::primary("Okay")]);
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.current.as_ref().map(|alert| alert.title.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|alert| alert.message.as_str())
    }

    pub fn buttons(&self) -> &[AlertButton] {
        self.current
            .as_ref()
            .map(|alert| alert.buttons.as_slice())
            .unwrap_or(&[])
    }

    /// Activate a button: run its callback (once), close the dialog, and
    /// surface the next queued notice if any.
    pub fn activate(&mut self, index: usize) {
        let Some(mut alert) = self.current.take() else {
            return;
        };
        if index >= alert.buttons.len() {
            log::warn!("alert button index {index} out of range, treating as dismissal");
        } else if let Some(callback) = alert.buttons[index].on_activate.take() {
            callback();
        }
        self.advance();
    }

    /// Close without running any callback (Escape, Space, backdrop click).
    pub fn dismiss(&mut self) {
        self.current = None;
        self.advance();
    }

    fn advance(&mut self) {
        if self.current.is_none() {
            self.current = self.queue.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_button(label: &str, hits: &Arc<AtomicUsize>) -> AlertButton {
        let hits = Arc::clone(hits);
        AlertButton::primary(label).on_activate(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn dismiss_never_runs_the_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut alerts = AlertDialogState::default();
        alerts.open("Notice", "message", vec![counting_button("Okay", &hits)]);

        alerts.dismiss();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!alerts.is_open());
    }

    #[test]
    fn activate_runs_the_callback_once_and_closes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut alerts = AlertDialogState::default();
        alerts.open("Notice", "message", vec![counting_button("Okay", &hits)]);

        alerts.activate(0);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!alerts.is_open());
        // A second activation has no dialog to act on.
        alerts.activate(0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn activate_out_of_range_behaves_like_dismissal() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut alerts = AlertDialogState::default();
        alerts.open("Notice", "message", vec![counting_button("Okay", &hits)]);

        alerts.activate(5);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!alerts.is_open());
    }

    #[test]
    fn buttons_without_callback_close_cleanly() {
        let mut alerts = AlertDialogState::default();
        alerts.info("Notice", "message");
        assert_eq!(alerts.buttons().len(), 1);
        assert_eq!(alerts.buttons()[0].label, "Okay");
        assert!(alerts.buttons()[0].primary);

        alerts.activate(0);
        assert!(!alerts.is_open());
    }

    #[test]
    fn queued_notices_surface_in_order() {
        let mut alerts = AlertDialogState::default();
        alerts.info("First", "a");
        alerts.info("Second", "b");

        assert_eq!(alerts.title(), Some("First"));
        alerts.dismiss();
        assert_eq!(alerts.title(), Some("Second"));
        alerts.dismiss();
        assert!(!alerts.is_open());
    }
}
