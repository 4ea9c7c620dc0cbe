//! Responsive sidebar: docked beside the content on wide viewports, drawn as
//! an overlay on narrow ones.

/// Default breakpoint for the terminal front end, in columns
pub const DEFAULT_BREAKPOINT: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarMode {
    DockedOpen,
    DockedClosed,
    OverlayOpen,
    OverlayClosed,
}

impl SidebarMode {
    pub fn is_open(self) -> bool {
        matches!(self, SidebarMode::DockedOpen | SidebarMode::OverlayOpen)
    }

    pub fn is_overlay(self) -> bool {
        matches!(self, SidebarMode::OverlayOpen | SidebarMode::OverlayClosed)
    }
}

#[derive(Debug, Clone)]
pub struct SidebarController {
    open: bool,
    width: u16,
    breakpoint: u16,
}

impl SidebarController {
    /// Starts open, whatever the width.
    pub fn new(width: u16, breakpoint: u16) -> Self {
        Self {
            open: true,
            width,
            breakpoint,
        }
    }

    pub fn mode(&self) -> SidebarMode {
        match (self.is_docked(), self.open) {
            (true, true) => SidebarMode::DockedOpen,
            (true, false) => SidebarMode::DockedClosed,
            (false, true) => SidebarMode::OverlayOpen,
            (false, false) => SidebarMode::OverlayClosed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_docked(&self) -> bool {
        self.width >= self.breakpoint
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn breakpoint(&self) -> u16 {
        self.breakpoint
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Follow a navigation link. An overlay sidebar gets out of the way;
    /// a docked one stays.
    pub fn on_navigate(&mut self) {
        if !self.is_docked() {
            self.open = false;
        }
    }

    /// Record a new viewport width. Returns true when the sidebar was
    /// auto-closed because the viewport dropped below the breakpoint.
    ///
    /// Only the downward crossing closes it; widening never reopens.
    pub fn on_resize(&mut self, width: u16) -> bool {
        let crossed_down = self.width >= self.breakpoint && width < self.breakpoint;
        self.width = width;
        if crossed_down && self.open {
            self.open = false;
            tracing::debug!(width, breakpoint = self.breakpoint, "sidebar auto-closed");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_while_open_collapses_to_closed_overlay() {
        let mut sidebar = SidebarController::new(1024, 768);
        assert_eq!(sidebar.mode(), SidebarMode::DockedOpen);
        assert!(sidebar.on_resize(600));
        assert_eq!(sidebar.mode(), SidebarMode::OverlayClosed);
    }

    #[test]
    fn widening_does_not_reopen() {
        let mut sidebar = SidebarController::new(1024, 768);
        sidebar.on_resize(600);
        assert!(!sidebar.on_resize(1200));
        assert_eq!(sidebar.mode(), SidebarMode::DockedClosed);
    }

    #[test]
    fn manual_open_below_breakpoint_survives_narrow_resizes() {
        let mut sidebar = SidebarController::new(600, 768);
        sidebar.close();
        sidebar.toggle();
        assert_eq!(sidebar.mode(), SidebarMode::OverlayOpen);
        assert!(!sidebar.on_resize(500));
        assert_eq!(sidebar.mode(), SidebarMode::OverlayOpen);
    }

    #[test]
    fn closed_sidebar_crossing_down_stays_closed() {
        let mut sidebar = SidebarController::new(1024, 768);
        sidebar.toggle();
        assert!(!sidebar.on_resize(600));
        assert_eq!(sidebar.mode(), SidebarMode::OverlayClosed);
    }

    #[test]
    fn navigation_closes_only_the_overlay() {
        let mut docked = SidebarController::new(120, DEFAULT_BREAKPOINT);
        docked.on_navigate();
        assert!(docked.is_open());

        let mut overlay = SidebarController::new(80, DEFAULT_BREAKPOINT);
        overlay.on_navigate();
        assert_eq!(overlay.mode(), SidebarMode::OverlayClosed);
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let sidebar = SidebarController::new(768, 768);
        assert!(sidebar.is_docked());
        assert!(sidebar.mode().is_open());
        assert!(!sidebar.mode().is_overlay());
    }
}
