/// Which blocking overlay is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Busy spinner shown while a mutating operation is in flight.
    Busy,
    /// The rotation-interval form.
    Form,
}

/// Page-level input locks toggled by overlay transitions. The UI reads
/// these to suppress scrolling, text selection, and background input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLocks {
    pub no_scroll: bool,
    pub no_select: bool,
    pub busy: bool,
}

/// The blocking-overlay state machine.
///
/// At most one blocking overlay is active at a time. The busy overlay is the
/// cooperative mutex for mutating operations: callers must win
/// [`Self::try_show`] before starting one, and every operation pairs it with
/// [`Self::hide`] on success and failure alike, so the UI can never be left
/// permanently blocked. Escape and clicks do not dismiss a busy overlay;
/// only the alert dialog reacts to those.
#[derive(Debug, Default)]
pub struct OverlayState {
    active: Option<OverlayKind>,
    locks: ScreenLocks,
}

impl OverlayState {
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn active(&self) -> Option<OverlayKind> {
        self.active
    }

    pub fn locks(&self) -> ScreenLocks {
        self.locks
    }

    /// Enter the busy state. Returns `false` without side effects when any
    /// overlay is already active; the caller must not start its operation
    /// in that case.
    pub fn try_show(&mut self) -> bool {
        if self.active.is_some() {
            log::debug!(
                target: "wallshell_states::overlay",
                "busy overlay rejected, {:?} already active",
                self.active
            );
            return false;
        }
        self.active = Some(OverlayKind::Busy);
        self.locks = ScreenLocks {
            no_scroll: true,
            no_select: true,
            busy: true,
        };
        true
    }

    /// Leave the busy state unconditionally and restore every lock.
    /// Safe to call from failure paths; a no-op when not busy.
    pub fn hide(&mut self) {
        if self.active == Some(OverlayKind::Busy) {
            self.active = None;
        }
        if self.active.is_none() {
            self.locks = ScreenLocks::default();
        }
    }

    /// Open the interval form. Rejected unless idle.
    pub fn open_form(&mut self) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(OverlayKind::Form);
        self.locks = ScreenLocks {
            no_scroll: true,
            no_select: false,
            busy: false,
        };
        true
    }

    pub fn close_form(&mut self) {
        if self.active == Some(OverlayKind::Form) {
            self.active = None;
            self.locks = ScreenLocks::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_hide_pairing_restores_initial_flags() {
        let mut overlay = OverlayState::default();
        let initial = overlay.locks();

        assert!(overlay.try_show());
        overlay.hide();
        assert!(overlay.try_show());
        overlay.hide();

        assert_eq!(overlay.locks(), initial);
        assert!(overlay.is_idle());
    }

    #[test]
    fn busy_sets_every_lock() {
        let mut overlay = OverlayState::default();
        assert!(overlay.try_show());

        let locks = overlay.locks();
        assert!(locks.no_scroll);
        assert!(locks.no_select);
        assert!(locks.busy);
        assert_eq!(overlay.active(), Some(OverlayKind::Busy));
    }

    #[test]
    fn second_show_is_rejected_while_busy() {
        let mut overlay = OverlayState::default();
        assert!(overlay.try_show());
        assert!(!overlay.try_show());

        // The rejection must not have disturbed the active overlay.
        assert_eq!(overlay.active(), Some(OverlayKind::Busy));
    }

    #[test]
    fn hide_is_safe_when_idle() {
        let mut overlay = OverlayState::default();
        overlay.hide();
        assert!(overlay.is_idle());
        assert_eq!(overlay.locks(), ScreenLocks::default());
    }

    #[test]
    fn form_excludes_busy_and_vice_versa() {
        let mut overlay = OverlayState::default();
        assert!(overlay.open_form());
        assert!(!overlay.try_show());
        assert!(!overlay.open_form());

        overlay.close_form();
        assert!(overlay.try_show());
        assert!(!overlay.open_form());
    }

    #[test]
    fn hide_does_not_close_the_form() {
        let mut overlay = OverlayState::default();
        assert!(overlay.open_form());
        overlay.hide();
        assert_eq!(overlay.active(), Some(OverlayKind::Form));
    }
}
