use crate::error::ClaudentError;
use crate::navigation::{Navigator, Route, Router, NAV_ITEMS};
use crate::patient::{self, PatientIndex, PatientRecord};
use crate::search::SearchController;
use crate::session::{AuthSession, LogoutFlow};
use crate::sidebar::{SidebarController, DEFAULT_BREAKPOINT};
use crate::tui::menu::{ActiveMenu, ConfirmAction, ConfirmDialog, InfoDialog};
use crate::tui::table::ScrollList;
use crate::tui::ui;
use chrono::{DateTime, Local};
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};
use ratatui::Terminal;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Messages from background threads
pub enum BgMessage {
    IndexLoaded(Vec<PatientRecord>),
    IndexError(ClaudentError),
}

/// Which region receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Sidebar,
    Content,
}

/// Screen regions from the last draw, used for mouse hit-testing
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    pub toggle: Rect,
    pub search: Rect,
    pub dropdown: Rect,
    pub dropdown_rows: Rect,
    pub logout: Rect,
    pub sidebar: Rect,
    pub nav_items: Vec<Rect>,
    pub content: Rect,
    pub patient_rows: Rect,
    pub dialog: Rect,
    pub dialog_confirm: Rect,
    pub dialog_cancel: Rect,
}

/// Startup options for the shell
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub patients_file: Option<PathBuf>,
    pub sidebar_breakpoint: u16,
    pub tick_rate: Duration,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            patients_file: None,
            sidebar_breakpoint: DEFAULT_BREAKPOINT,
            tick_rate: Duration::from_millis(50),
        }
    }
}

pub struct App {
    // Data
    pub index: PatientIndex,
    patients_file: Option<PathBuf>,

    // Sub-states
    pub search: SearchController,
    pub sidebar: SidebarController,
    pub router: Router,
    pub session: Box<dyn AuthSession>,
    pub logout: LogoutFlow,
    pub active_menu: ActiveMenu,
    pub focus: Focus,
    pub nav_list: ScrollList,
    pub patient_list: ScrollList,
    pub areas: HitAreas,

    // Status
    pub status_message: String,
    pub session_started: DateTime<Local>,
    pub is_reloading: bool,
    tick_rate: Duration,

    // Channel
    bg_receiver: Receiver<BgMessage>,
    bg_sender: Sender<BgMessage>,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(
        index: PatientIndex,
        session: Box<dyn AuthSession>,
        options: ShellOptions,
        width: u16,
    ) -> Self {
        let (bg_sender, bg_receiver) = unbounded();

        Self {
            index,
            patients_file: options.patients_file,
            search: SearchController::new(),
            sidebar: SidebarController::new(width, options.sidebar_breakpoint),
            router: Router::default(),
            session,
            logout: LogoutFlow::new(),
            active_menu: ActiveMenu::None,
            focus: Focus::Content,
            nav_list: ScrollList::default(),
            patient_list: ScrollList::default(),
            areas: HitAreas::default(),
            status_message: String::new(),
            session_started: Local::now(),
            is_reloading: false,
            tick_rate: options.tick_rate,
            bg_receiver,
            bg_sender,
            should_quit: false,
        }
    }

    /// Current patient list. Taken fresh for every event and every frame.
    pub fn patients(&self) -> Arc<Vec<PatientRecord>> {
        self.index.snapshot()
    }

    /// The loop ends on quit or once the session has been closed.
    pub fn is_finished(&self) -> bool {
        self.should_quit || *self.router.current() == Route::Login
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> crate::Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = self.tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(width, _) => self.handle_resize(width),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.process_messages();
                last_tick = Instant::now();
            }

            if self.is_finished() {
                return Ok(());
            }
        }
    }

    // --- Background index reload ---

    pub fn start_reload(&mut self) {
        if self.is_reloading {
            return;
        }
        let Some(path) = self.patients_file.clone() else {
            self.status_message = "Sin archivo de pacientes configurado".to_string();
            return;
        };

        self.is_reloading = true;
        self.status_message = "Recargando pacientes...".to_string();
        let tx = self.bg_sender.clone();

        thread::spawn(move || {
            let msg = match patient::load_index_file(&path) {
                Ok(records) => BgMessage::IndexLoaded(records),
                Err(e) => BgMessage::IndexError(e),
            };
            let _ = tx.send(msg);
        });
    }

    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.bg_receiver.try_recv() {
            match msg {
                BgMessage::IndexLoaded(records) => {
                    let count = records.len();
                    match self.index.replace(records) {
                        Ok(()) => {
                            self.patient_list.clamp(count);
                            self.status_message = format!("{} pacientes cargados", count);
                        }
                        Err(e) => self.report_index_error(e),
                    }
                }
                BgMessage::IndexError(e) => self.report_index_error(e),
            }
            self.is_reloading = false;
        }
    }

    fn report_index_error(&mut self, e: ClaudentError) {
        tracing::warn!(error = %e, recoverable = e.is_recoverable(), "patient index reload failed");
        self.status_message = format!("Error al recargar: {}", e);
    }

    // --- Navigation ---

    pub fn navigate(&mut self, route: Route) {
        if let Some(pos) = route
            .section()
            .and_then(|item| NAV_ITEMS.iter().position(|i| i == item))
        {
            self.nav_list.selected = pos;
        }
        self.router.navigate(route);
    }

    fn follow_nav_item(&mut self, position: usize) {
        if let Some(item) = NAV_ITEMS.get(position) {
            self.navigate(item.route());
            self.sidebar.on_navigate();
            if !self.sidebar.is_open() && self.focus == Focus::Sidebar {
                self.focus = Focus::Content;
            }
        }
    }

    fn open_selected_patient(&mut self) {
        let patients = self.patients();
        if let Some(patient) = patients.get(self.patient_list.selected) {
            self.navigate(Route::PatientDetail(patient.id.clone()));
        }
    }

    // --- Focus ---

    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
        self.search.focus();
    }

    fn set_focus(&mut self, focus: Focus) {
        if focus != Focus::Search {
            // leaving the search box counts as interacting outside it
            self.search.dismiss();
        }
        if focus == Focus::Search {
            self.focus_search();
        } else {
            self.focus = focus;
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = if self.sidebar.is_open() {
            vec![Focus::Search, Focus::Sidebar, Focus::Content]
        } else {
            vec![Focus::Search, Focus::Content]
        };
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.set_focus(order[next]);
    }

    // --- Logout ---

    pub fn request_logout(&mut self) {
        self.search.dismiss();
        self.logout.request();
        self.active_menu = ActiveMenu::Confirm(ConfirmDialog::logout());
    }

    fn resolve_confirm(&mut self, accepted: bool) {
        let action = match &self.active_menu {
            ActiveMenu::Confirm(dialog) => dialog.action,
            _ => return,
        };
        self.active_menu = ActiveMenu::None;
        match action {
            ConfirmAction::Logout if accepted => {
                self.logout.confirm(self.session.as_mut(), &mut self.router);
            }
            ConfirmAction::Logout => self.logout.cancel(),
        }
    }

    // --- Resize ---

    pub fn handle_resize(&mut self, width: u16) {
        if self.sidebar.on_resize(width) && self.focus == Focus::Sidebar {
            self.focus = Focus::Content;
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.active_menu.is_open() {
            self.handle_menu_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('b') if ctrl => {
                self.sidebar.toggle();
                if !self.sidebar.is_open() && self.focus == Focus::Sidebar {
                    self.focus = Focus::Content;
                }
                return;
            }
            KeyCode::Char('l') if ctrl => {
                self.request_logout();
                return;
            }
            KeyCode::Char('f') if ctrl => {
                self.focus_search();
                return;
            }
            KeyCode::Left if key.modifiers.contains(KeyModifiers::ALT) => {
                self.router.back();
                return;
            }
            KeyCode::F(1) => {
                self.search.dismiss();
                self.active_menu = ActiveMenu::Info(InfoDialog::help());
                return;
            }
            KeyCode::F(5) => {
                self.start_reload();
                return;
            }
            KeyCode::Tab => {
                self.cycle_focus(true);
                return;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Content => self.handle_content_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let ActiveMenu::Confirm(dialog) = &mut self.active_menu else {
            // info dialogs close on any key
            self.active_menu = ActiveMenu::None;
            return;
        };

        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                dialog.toggle_selection();
            }
            KeyCode::Enter => {
                let accepted = dialog.confirm_selected;
                self.resolve_confirm(accepted);
            }
            KeyCode::Char('s') | KeyCode::Char('y') => self.resolve_confirm(true),
            KeyCode::Char('n') | KeyCode::Esc => self.resolve_confirm(false),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let patients = self.patients();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert_char(c);
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            KeyCode::Down => {
                self.search.focus();
                self.search.highlight_next(&patients);
            }
            KeyCode::Up => self.search.highlight_prev(),
            KeyCode::Enter => {
                if let Some(route) = self.search.select_highlighted(&patients) {
                    self.navigate(route);
                }
            }
            KeyCode::Esc => {
                if self.search.is_visible() {
                    self.search.dismiss();
                } else {
                    self.focus = Focus::Content;
                }
            }
            _ => {}
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.nav_list.select_prev(),
            KeyCode::Down => self.nav_list.select_next(NAV_ITEMS.len()),
            KeyCode::Enter => self.follow_nav_item(self.nav_list.selected),
            KeyCode::Esc => {
                if self.sidebar.mode().is_overlay() {
                    self.sidebar.close();
                }
                self.focus = Focus::Content;
            }
            _ => {}
        }
    }

    fn handle_content_key(&mut self, key: KeyEvent) {
        let total = self.index.len();
        let on_list = *self.router.current() == Route::Patients;
        match key.code {
            KeyCode::Up if on_list => self.patient_list.select_prev(),
            KeyCode::Down if on_list => self.patient_list.select_next(total),
            KeyCode::PageUp if on_list => self.patient_list.page_up(),
            KeyCode::PageDown if on_list => self.patient_list.page_down(total),
            KeyCode::Home if on_list => self.patient_list.select_first(),
            KeyCode::End if on_list => self.patient_list.select_last(total),
            KeyCode::Enter if on_list => self.open_selected_patient(),
            KeyCode::Backspace => {
                self.router.back();
            }
            KeyCode::Esc => {
                if self.sidebar.mode() == crate::SidebarMode::OverlayOpen {
                    self.sidebar.close();
                }
            }
            KeyCode::Char('/') => self.focus_search(),

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focus_search();
                self.search.insert_char(c);
            }
            _ => {}
        }
    }

    // --- Mouse handling ---

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(pos),
            MouseEventKind::ScrollDown if self.areas.patient_rows.contains(pos) => {
                self.patient_list.select_next(self.index.len());
            }
            MouseEventKind::ScrollUp if self.areas.patient_rows.contains(pos) => {
                self.patient_list.select_prev();
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, pos: Position) {
        if matches!(self.active_menu, ActiveMenu::Info(_)) {
            self.active_menu = ActiveMenu::None;
            return;
        }
        if matches!(self.active_menu, ActiveMenu::Confirm(_)) {
            if self.areas.dialog_confirm.contains(pos) {
                self.resolve_confirm(true);
            } else if self.areas.dialog_cancel.contains(pos) || !self.areas.dialog.contains(pos) {
                self.resolve_confirm(false);
            }
            return;
        }

        // clicks inside the open dropdown are not outside interactions
        if self.search.is_visible() && self.areas.dropdown.contains(pos) {
            if self.areas.dropdown_rows.contains(pos) {
                let row = (pos.y - self.areas.dropdown_rows.y) as usize;
                let patients = self.patients();
                if let Some(route) = self.search.select_row(row, &patients) {
                    self.navigate(route);
                }
            }
            return;
        }

        if self.areas.search.contains(pos) {
            self.focus_search();
            return;
        }

        self.search.dismiss();

        if self.areas.toggle.contains(pos) {
            self.sidebar.toggle();
            return;
        }
        if self.areas.logout.contains(pos) {
            self.request_logout();
            return;
        }

        if self.sidebar.is_open() && self.areas.sidebar.contains(pos) {
            self.focus = Focus::Sidebar;
            if let Some(position) = self.areas.nav_items.iter().position(|r| r.contains(pos)) {
                self.nav_list.selected = position;
                self.follow_nav_item(position);
            }
            return;
        }

        if self.areas.content.contains(pos) {
            if self.sidebar.mode() == crate::SidebarMode::OverlayOpen {
                // backdrop
                self.sidebar.close();
                return;
            }
            self.focus = Focus::Content;
            if self.areas.patient_rows.contains(pos) {
                let row = (pos.y - self.areas.patient_rows.y) as usize;
                let selected = self.patient_list.scroll_offset + row;
                if selected < self.index.len() {
                    self.patient_list.selected = selected;
                    self.open_selected_patient();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CurrentUser, LocalSession};
    use crate::SidebarMode;

    fn app(width: u16) -> App {
        let index = PatientIndex::new(vec![
            PatientRecord::new("1", "Ana", "Lopez", Some("ALOP01")),
            PatientRecord::new("2", "Beto", "Cruz", None),
        ])
        .expect("valid index");
        let session = LocalSession::new(Some(CurrentUser::new("dra@claudent.mx")));
        App::new(index, Box::new(session), ShellOptions::default(), width)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_from_content_focuses_search() {
        let mut app = app(120);
        type_str(&mut app, "cruz");
        assert_eq!(app.focus, Focus::Search);
        assert_eq!(app.search.query(), "cruz");
        assert!(app.search.is_visible());
    }

    #[test]
    fn enter_selects_and_routes_to_detail() {
        let mut app = app(120);
        app.handle_key(key(KeyCode::Char('/')));
        type_str(&mut app, "lo");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.router.current(), &Route::PatientDetail("1".into()));
        assert_eq!(app.search.query(), "");
        assert!(!app.search.is_visible());
        assert_eq!(app.nav_list.selected, 1);
    }

    #[test]
    fn tab_away_dismisses_but_keeps_query() {
        let mut app = app(120);
        app.focus_search();
        type_str(&mut app, "an");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Sidebar);
        assert!(!app.search.is_visible());
        assert_eq!(app.search.query(), "an");
    }

    #[test]
    fn logout_dialog_cancel_and_confirm() {
        let mut app = app(120);
        app.handle_key(ctrl('l'));
        assert!(app.logout.is_pending());
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.logout.is_pending());
        assert!(app.session.current_user().is_some());

        app.handle_key(ctrl('l'));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.session.current_user().is_none());
        assert_eq!(app.router.current(), &Route::Login);
        assert!(app.is_finished());
    }

    #[test]
    fn enter_on_default_button_cancels() {
        let mut app = app(120);
        app.request_logout();
        app.handle_key(key(KeyCode::Enter));
        assert!(app.session.current_user().is_some());
        assert!(!app.is_finished());
    }

    #[test]
    fn resize_below_breakpoint_collapses_sidebar() {
        let mut app = app(120);
        app.focus = Focus::Sidebar;
        app.handle_resize(70);
        assert_eq!(app.sidebar.mode(), SidebarMode::OverlayClosed);
        assert_eq!(app.focus, Focus::Content);
    }

    #[test]
    fn overlay_nav_closes_sidebar() {
        let mut app = app(80);
        assert_eq!(app.sidebar.mode(), SidebarMode::OverlayOpen);
        app.focus = Focus::Sidebar;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.router.current(), &Route::Patients);
        assert_eq!(app.sidebar.mode(), SidebarMode::OverlayClosed);
        assert_eq!(app.focus, Focus::Content);
    }

    #[test]
    fn patient_list_enter_opens_detail() {
        let mut app = app(120);
        app.navigate(Route::Patients);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.router.current(), &Route::PatientDetail("2".into()));
        // list navigation does not touch recents
        assert!(app.search.recents().is_empty());
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.router.current(), &Route::Patients);
    }

    #[test]
    fn reload_messages_replace_the_index() {
        let mut app = app(120);
        app.patient_list.selected = 1;
        app.bg_sender
            .send(BgMessage::IndexLoaded(vec![PatientRecord::new("9", "Carla", "Diaz", None)]))
            .expect("send");
        app.process_messages();
        assert_eq!(app.index.len(), 1);
        assert_eq!(app.patient_list.selected, 0);

        app.bg_sender
            .send(BgMessage::IndexError(ClaudentError::DuplicatePatientId("9".into())))
            .expect("send");
        app.process_messages();
        assert_eq!(app.index.len(), 1);
        assert!(app.status_message.starts_with("Error al recargar"));
    }

    #[test]
    fn reload_without_file_reports_status() {
        let mut app = app(120);
        app.handle_key(key(KeyCode::F(5)));
        assert!(!app.is_reloading);
        assert_eq!(app.status_message, "Sin archivo de pacientes configurado");
    }
}
