use crate::navigation::{Route, NAV_ITEMS};
use crate::patient::{find_by_id, PatientRecord};
use crate::search::Dropdown;
use crate::sidebar::SidebarMode;
use crate::tui::app::{App, Focus, HitAreas};
use crate::tui::colors;
use crate::tui::menu::{ActiveMenu, ConfirmDialog, InfoDialog};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use unicode_width::UnicodeWidthStr;

pub const SEARCH_PLACEHOLDER: &str = "Buscar paciente (Nombre o CURP)...";
pub const NO_RESULTS: &str = "No se encontraron pacientes.";

const SEARCH_ICON: &str = " \u{1F50D} ";
const LOGO: &str = "\u{1F9B7} ClauDent";
const LOGOUT_LABEL: &str = " Salir ";
const SIDEBAR_WIDTH: u16 = 26;
const OVERLAY_WIDTH: u16 = 30;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.areas = HitAreas::default();

    // Same list for the whole frame even if a reload lands mid-draw
    let patients = app.patients();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Sidebar + content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_body(frame, app, &patients, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Popups last so they sit above everything
    draw_dropdown(frame, app, &patients, area);

    match &app.active_menu {
        ActiveMenu::None => {}
        ActiveMenu::Confirm(confirm) => draw_confirm_dialog(frame, confirm, &mut app.areas, area),
        ActiveMenu::Info(info) => draw_info_dialog(frame, info, &mut app.areas, area),
    }

    if !app.active_menu.is_open() && app.focus == Focus::Search {
        let search = app.areas.search;
        let typed = &app.search.query()[..app.search.cursor()];
        let offset = (SEARCH_ICON.width() + typed.width()) as u16;
        let cursor_x = (search.x + 1 + offset).min(search.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(cursor_x, search.y + 1));
    }
}

// --- Header ---

fn draw_header(frame: &mut Frame, app: &mut App, area: Rect) {
    frame.render_widget(
        Block::default().style(Style::default().bg(colors::CHROME_BG)),
        area,
    );

    let docked = app.sidebar.is_docked();
    let user_text = match app.session.current_user() {
        Some(user) if docked => format!(" {} \u{00B7} {} ", user.email, user.role),
        Some(_) => String::new(),
        None => " Sin sesión ".to_string(),
    };
    let logo_width = if docked { LOGO.width() as u16 + 2 } else { 0 };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(logo_width),
            Constraint::Min(12),
            Constraint::Length(user_text.width() as u16),
            Constraint::Length(LOGOUT_LABEL.width() as u16 + 2),
        ])
        .split(area);

    let middle = |r: Rect| Rect::new(r.x, r.y + r.height / 2, r.width, 1);

    let toggle = if app.sidebar.is_open() { " \u{2715} " } else { " \u{2630} " };
    frame.render_widget(
        Paragraph::new(toggle).style(
            Style::default()
                .fg(colors::TEXT)
                .bg(colors::CHROME_BG)
                .add_modifier(Modifier::BOLD),
        ),
        middle(cols[0]),
    );
    app.areas.toggle = cols[0];

    if docked {
        frame.render_widget(
            Paragraph::new(LOGO).style(
                Style::default()
                    .fg(colors::ACCENT)
                    .bg(colors::CHROME_BG)
                    .add_modifier(Modifier::BOLD),
            ),
            middle(cols[1]),
        );
    }

    draw_search_box(frame, app, cols[2]);

    frame.render_widget(
        Paragraph::new(user_text).style(Style::default().fg(colors::MUTED).bg(colors::CHROME_BG)),
        middle(cols[3]),
    );

    let logout = middle(cols[4]);
    let logout = Rect::new(logout.x + 1, logout.y, logout.width.saturating_sub(2), 1);
    frame.render_widget(
        Paragraph::new(LOGOUT_LABEL).style(
            Style::default()
                .fg(Color::White)
                .bg(colors::DANGER)
                .add_modifier(Modifier::BOLD),
        ),
        logout,
    );
    app.areas.logout = logout;
}

fn draw_search_box(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Search;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border_style(focused))
        .style(Style::default().bg(colors::CHROME_BG));

    let line = if app.search.query().is_empty() {
        Line::from(vec![
            Span::raw(SEARCH_ICON),
            Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(colors::MUTED)),
        ])
    } else {
        Line::from(vec![
            Span::raw(SEARCH_ICON),
            Span::styled(app.search.query().to_string(), Style::default().fg(colors::TEXT)),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
    app.areas.search = area;
}

// --- Search dropdown ---

fn dropdown_row(patient: &PatientRecord, icon: &str, highlighted: bool) -> Line<'static> {
    let curp = patient.identity_code.clone().unwrap_or_default();
    let muted = if highlighted {
        colors::row_style(true)
    } else {
        Style::default().fg(colors::MUTED)
    };
    Line::from(vec![
        Span::raw(format!(" {} ", icon)),
        Span::styled(patient.display_name(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(curp, muted),
    ])
    .style(colors::row_style(highlighted))
}

fn draw_dropdown(frame: &mut Frame, app: &mut App, patients: &[PatientRecord], area: Rect) {
    let dropdown = app.search.dropdown(patients);
    let rows = dropdown.entries();
    let highlighted = app.search.highlighted().min(rows.len().saturating_sub(1));
    let hint = |text: &str| Line::styled(format!(" {}", text), Style::default().fg(colors::MUTED));

    let (title, lines): (&str, Vec<Line>) = match &dropdown {
        Dropdown::Hidden => return,
        Dropdown::Recents(list) if list.is_empty() => {
            (" Recientes ", vec![hint("Sin pacientes recientes")])
        }
        Dropdown::Recents(list) => (
            " Recientes ",
            list.iter()
                .enumerate()
                .map(|(i, p)| dropdown_row(p, "\u{21BA}", i == highlighted))
                .collect(),
        ),
        Dropdown::Matches(list) => (
            " Pacientes ",
            list.iter()
                .enumerate()
                .map(|(i, p)| dropdown_row(p, "\u{263A}", i == highlighted))
                .collect(),
        ),
        Dropdown::Empty => (" Pacientes ", vec![hint(NO_RESULTS)]),
    };

    let search = app.areas.search;
    let x = search.x;
    let y = search.bottom();
    let width = search.width.max(40).min(area.right().saturating_sub(x));
    let height = (lines.len() as u16 + 2).min(area.bottom().saturating_sub(y));
    if height < 3 || width < 4 {
        return;
    }
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ACCENT))
        .title(title)
        .title_style(Style::default().fg(colors::MUTED).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(colors::CHROME_BG));
    let inner = block.inner(popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);

    app.areas.dropdown = popup;
    if !rows.is_empty() {
        let visible = (rows.len() as u16).min(inner.height);
        app.areas.dropdown_rows = Rect::new(inner.x, inner.y, inner.width, visible);
    }
}

// --- Body ---

fn draw_body(frame: &mut Frame, app: &mut App, patients: &[PatientRecord], area: Rect) {
    match app.sidebar.mode() {
        SidebarMode::DockedOpen => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
                .split(area);
            draw_sidebar(frame, app, cols[0], false);
            draw_content(frame, app, patients, cols[1]);
        }
        SidebarMode::OverlayOpen => {
            draw_content(frame, app, patients, area);
            // backdrop
            frame
                .buffer_mut()
                .set_style(area, Style::default().add_modifier(Modifier::DIM));
            let overlay = Rect::new(area.x, area.y, OVERLAY_WIDTH.min(area.width), area.height);
            frame.render_widget(Clear, overlay);
            draw_sidebar(frame, app, overlay, true);
        }
        SidebarMode::DockedClosed | SidebarMode::OverlayClosed => {
            draw_content(frame, app, patients, area);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, app: &mut App, area: Rect, overlay: bool) {
    let focused = app.focus == Focus::Sidebar;
    let mut block = Block::default()
        .borders(if overlay { Borders::ALL } else { Borders::RIGHT })
        .border_style(colors::border_style(focused))
        .style(Style::default().bg(colors::SIDEBAR_BG));
    if overlay {
        block = block.title(format!(" {} ", LOGO));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.areas.sidebar = area;

    let mut y = inner.y + 1;

    if overlay {
        if let Some(user) = app.session.current_user() {
            let badge = user.initial().map(|c| format!(" {} ", c)).unwrap_or_default();
            let card = vec![
                Line::from(vec![
                    Span::styled(
                        badge,
                        Style::default()
                            .fg(colors::SELECTION_FG)
                            .bg(colors::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(user.email.clone(), Style::default().fg(colors::TEXT)),
                ]),
                Line::styled(format!("    {}", user.role), Style::default().fg(colors::MUTED)),
            ];
            let card_area = Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 2);
            frame.render_widget(Paragraph::new(card), card_area.intersection(inner));
            y += 3;
        }
    }

    let active = app.router.current().section();
    for (i, item) in NAV_ITEMS.iter().enumerate() {
        if y >= inner.bottom() {
            break;
        }
        let is_active = active == Some(item);
        let is_cursor = focused && app.nav_list.selected == i;
        let row = Rect::new(inner.x, y, inner.width, 1);
        frame.render_widget(
            Paragraph::new(format!("  {}  {}", item.icon, item.label))
                .style(colors::nav_style(is_active, is_cursor, overlay)),
            row,
        );
        app.areas.nav_items.push(row);
        y += 1;
    }
}

fn draw_content(frame: &mut Frame, app: &mut App, patients: &[PatientRecord], area: Rect) {
    app.areas.content = area;
    let route = app.router.current().clone();
    let focused = app.focus == Focus::Content;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border_style(focused))
        .title(format!(" {} {} ", colors::route_icon(&route), route.title()))
        .title_style(Style::default().fg(colors::TEXT).add_modifier(Modifier::BOLD));

    match &route {
        Route::Dashboard => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            draw_dashboard(frame, app, patients, inner);
        }
        Route::Patients => draw_patient_table(frame, app, patients, block, area),
        Route::PatientDetail(id) => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            draw_patient_detail(frame, find_by_id(patients, id), inner);
        }
        Route::Services | Route::Quotes => {
            let text = format!(
                " El módulo {} no está disponible en la terminal.",
                route.title()
            );
            frame.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(colors::MUTED))
                    .wrap(Wrap { trim: false })
                    .block(block),
                area,
            );
        }
        Route::Login => {
            frame.render_widget(
                Paragraph::new(" Sesión cerrada.").style(Style::default().fg(colors::MUTED)).block(block),
                area,
            );
        }
    }
}

fn draw_dashboard(frame: &mut Frame, app: &App, patients: &[PatientRecord], area: Rect) {
    let mut lines = Vec::new();
    if let Some(user) = app.session.current_user() {
        lines.push(Line::styled(
            format!(" Hola, {}", user.email),
            Style::default().fg(colors::TEXT).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        format!(" {} pacientes en el índice", patients.len()),
        Style::default().fg(colors::TEXT),
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(" Recientes", Style::default().fg(colors::ACCENT)));
    if app.search.recents().is_empty() {
        lines.push(Line::styled("   (ninguno)", Style::default().fg(colors::MUTED)));
    } else {
        for patient in app.search.recents().list() {
            lines.push(Line::raw(format!("   \u{21BA} {}", patient.display_name())));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        " Escribe / para buscar un paciente.",
        Style::default().fg(colors::MUTED),
    ));
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_patient_table(
    frame: &mut Frame,
    app: &mut App,
    patients: &[PatientRecord],
    block: Block,
    area: Rect,
) {
    let block = block.title_bottom(format!(" {} ", patients.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if patients.is_empty() {
        frame.render_widget(
            Paragraph::new(" No hay pacientes cargados.").style(Style::default().fg(colors::MUTED)),
            inner,
        );
        return;
    }

    let total = patients.len();
    app.patient_list.visible_rows = inner.height.saturating_sub(1) as usize;
    app.patient_list.clamp(total);
    let range = app.patient_list.visible_range(total);
    let selected = app.patient_list.selected;
    let start = range.start;

    let rows = patients[range.clone()].iter().enumerate().map(|(i, p)| {
        let idx = start + i;
        let style = if idx == selected {
            colors::row_style(true)
        } else if idx % 2 == 1 {
            Style::default().fg(colors::TEXT).bg(colors::ROW_ALT_BG)
        } else {
            Style::default().fg(colors::TEXT)
        };
        Row::new(vec![
            Cell::from(p.given_names.clone()),
            Cell::from(p.family_names.clone()),
            Cell::from(p.identity_code.clone().unwrap_or_default()),
        ])
        .style(style)
    });

    let header = Row::new(["Nombre", "Apellidos", "CURP"]).style(
        Style::default()
            .fg(Color::White)
            .bg(colors::TABLE_HEADER_BG)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
    app.areas.patient_rows = Rect::new(inner.x, inner.y + 1, inner.width, range.len() as u16);
}

fn draw_patient_detail(frame: &mut Frame, patient: Option<&PatientRecord>, area: Rect) {
    let Some(patient) = patient else {
        frame.render_widget(
            Paragraph::new(" Paciente no encontrado").style(Style::default().fg(colors::DANGER)),
            area,
        );
        return;
    };

    let label = Style::default().fg(colors::MUTED);
    let value = Style::default().fg(colors::TEXT).add_modifier(Modifier::BOLD);
    let field = |name: &str, text: String, style: Style| {
        Line::from(vec![
            Span::styled(format!(" {:<12}", name), label),
            Span::styled(text, style),
        ])
    };

    let curp = match &patient.identity_code {
        Some(code) => field("CURP", code.clone(), value),
        None => field("CURP", "Sin CURP".to_string(), label),
    };
    let lines = vec![
        Line::styled(
            format!(" {}", patient.display_name()),
            Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        field("Nombre(s)", patient.given_names.clone(), value),
        field("Apellidos", patient.family_names.clone(), value),
        curp,
        field("Expediente", patient.id.clone(), value),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

// --- Status bar ---

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut left_text = format!(
        " {} | {} pacientes | sesión desde {}",
        app.router.current().path(),
        app.index.len(),
        app.session_started.format("%H:%M"),
    );
    if !app.status_message.is_empty() {
        left_text.push_str(" | ");
        left_text.push_str(&app.status_message);
    }

    let right_text = " F1:Ayuda  /:Buscar  Ctrl+B:Menú  Ctrl+L:Salir  Ctrl+Q:Cerrar ";

    // left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        left_text
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::STATUS_BG));

    frame.render_widget(status, area);
}

// --- Dialogs ---

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_confirm_dialog(frame: &mut Frame, confirm: &ConfirmDialog, areas: &mut HitAreas, area: Rect) {
    let width = 56.min(area.width.saturating_sub(2));
    let height = 8;
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::DANGER))
        .title(format!(" {} ", confirm.title))
        .title_style(Style::default().fg(colors::DANGER).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    areas.dialog = popup_area;

    let msg_area = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 3);
    frame.render_widget(
        Paragraph::new(confirm.message)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true }),
        msg_area.intersection(inner),
    );

    let danger_style = if confirm.confirm_selected {
        Style::default().fg(Color::White).bg(colors::DANGER).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::DANGER)
    };
    let cancel_style = if confirm.confirm_selected {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(colors::SELECTION_FG)
            .bg(colors::ACCENT)
            .add_modifier(Modifier::BOLD)
    };

    let cancel_text = format!(" {} ", confirm.cancel_label);
    let confirm_text = format!(" {} ", confirm.confirm_label);
    let cancel_w = cancel_text.width() as u16;
    let confirm_w = confirm_text.width() as u16;

    // right-aligned, confirm last
    let btn_y = inner.bottom().saturating_sub(1);
    let confirm_x = inner.right().saturating_sub(confirm_w + 1);
    let cancel_x = confirm_x.saturating_sub(cancel_w + 2);
    let confirm_btn = Rect::new(confirm_x, btn_y, confirm_w, 1).intersection(inner);
    let cancel_btn = Rect::new(cancel_x, btn_y, cancel_w, 1).intersection(inner);

    frame.render_widget(Paragraph::new(cancel_text).style(cancel_style), cancel_btn);
    frame.render_widget(Paragraph::new(confirm_text).style(danger_style), confirm_btn);
    areas.dialog_cancel = cancel_btn;
    areas.dialog_confirm = confirm_btn;
}

fn draw_info_dialog(frame: &mut Frame, info: &InfoDialog, areas: &mut HitAreas, area: Rect) {
    let max_line_len = info.lines.iter().map(|l| l.width()).max().unwrap_or(20);
    let width = ((max_line_len + 4) as u16).max(30).min(area.width.saturating_sub(4));
    let height = ((info.lines.len() + 3) as u16).min(area.height.saturating_sub(2));
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", info.title);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ACCENT))
        .title(title)
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    areas.dialog = popup_area;

    for (i, line) in info.lines.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let line_area = Rect::new(inner.x + 1, inner.y + i as u16, inner.width.saturating_sub(2), 1);
        frame.render_widget(
            Paragraph::new(line.as_str()).style(Style::default().fg(Color::White)),
            line_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        let clipped = centered_rect(40, 20, area);
        assert_eq!(clipped, Rect::new(0, 0, 20, 10));
    }
}
