use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::{App, Focus, InputMode};
use crate::theme::Theme;
use crate::view::{spinner_char, truncate};

const EDIT_CURSOR: &str = "\u{258F}";

/// Render the upload screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let pending_rows = (app.upload.pending().len() as u16).clamp(1, 6) + 2;
    let chunks = Layout::vertical([
        Constraint::Length(1),            // header
        Constraint::Length(pending_rows), // selected files
        Constraint::Length(3),            // course / subject
        Constraint::Length(3),            // upload button
        Constraint::Min(6),               // uploaded files
        Constraint::Length(1),            // footer
    ])
    .split(area);

    render_header(f, app, chunks[0]);
    render_selected(f, app, chunks[1]);

    let fields = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_field(f, app, Focus::Course, "Course", fields[0]);
    render_field(f, app, Focus::Subject, "Subject", fields[1]);

    render_button(f, app, chunks[3]);
    render_uploaded(f, app, chunks[4]);
    render_footer(f, app, chunks[5]);
}

fn pane_block<'a>(app: &App, pane: Focus, title: String) -> Block<'a> {
    let border_style = if app.focus == pane {
        app.theme.focused_border_style()
    } else {
        app.theme.border_style()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let header = Line::from(vec![
        Span::styled(" Lectern ", theme.header_style()),
        Span::styled(
            " Upload Files ",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.api_label.as_str(), Style::default().fg(theme.dim)),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn render_selected(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let pending = app.upload.pending();
    let block = pane_block(app, Focus::Selected, format!(" Selected Files ({}) ", pending.len()));

    if pending.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            " No files selected. Press a to add files.",
            Style::default().fg(theme.dim),
        )))
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = pending
        .iter()
        .map(|file| {
            ListItem::new(Line::from(vec![
                Span::styled("\u{1F4C4} ", Style::default().fg(theme.text)),
                Span::styled(truncate(&file.name, width), Style::default().fg(theme.text)),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(block);
    let mut state = ListState::default();
    if app.focus == Focus::Selected {
        list = list.highlight_style(theme.highlight_style());
        state.select(Some(app.selected_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Text shown inside a single-line input: value, edit cursor or placeholder.
fn field_line<'a>(value: &str, editing: bool, placeholder: &'a str, theme: &Theme) -> Line<'a> {
    if editing {
        Line::from(vec![
            Span::styled(value.to_string(), Style::default().fg(theme.text)),
            Span::styled(EDIT_CURSOR, Style::default().fg(theme.active)),
        ])
    } else if value.is_empty() {
        Line::from(Span::styled(placeholder, Style::default().fg(theme.dim)))
    } else {
        Line::from(Span::styled(value.to_string(), Style::default().fg(theme.text)))
    }
}

fn render_field(f: &mut Frame, app: &App, pane: Focus, label: &str, area: Rect) {
    let value = app.field_value(pane).unwrap_or_default();
    let line = field_line(value, app.is_editing(pane), "Enter to edit", &app.theme);
    let block = pane_block(app, pane, format!(" {label} "));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_button(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let (label, style) = if app.upload.is_uploading() {
        (
            format!("{} Uploading\u{2026}", spinner_char(app.tick)),
            Style::default()
                .fg(theme.spinner)
                .add_modifier(Modifier::BOLD),
        )
    } else if !app.upload.can_submit() {
        ("Upload Files".to_string(), Style::default().fg(theme.dim))
    } else if app.focus == Focus::UploadButton {
        (" Upload Files ".to_string(), theme.header_style())
    } else {
        (
            "Upload Files".to_string(),
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        )
    };

    let button = Paragraph::new(Line::from(Span::styled(label, style)))
        .alignment(Alignment::Center)
        .block(pane_block(app, Focus::UploadButton, String::new()));
    f.render_widget(button, area);
}

fn render_uploaded(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let shown = app.upload.filtered_records();
    let total = app.upload.records().len();

    let mut title = if app.upload.filter().is_empty() {
        format!(" Uploaded Files ({total}) ")
    } else {
        format!(" Uploaded Files ({}/{total}) ", shown.len())
    };
    if app.refreshes_in_flight > 0 {
        title.push_str(&format!("{} ", spinner_char(app.tick)));
    }
    let block = pane_block(app, Focus::Uploaded, title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);

    // Search bar
    let search_style = if app.focus == Focus::Search {
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let mut search = vec![Span::styled(" / ", search_style)];
    search.extend(
        field_line(
            app.upload.filter(),
            app.is_editing(Focus::Search),
            "Search uploaded files",
            theme,
        )
        .spans,
    );
    f.render_widget(Paragraph::new(Line::from(search)), rows[0]);

    if shown.is_empty() {
        let msg = if total == 0 {
            " No files uploaded yet."
        } else {
            " No files match the search."
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(theme.dim)))),
            rows[1],
        );
        return;
    }

    let name_width = (rows[1].width as usize).saturating_sub(30).max(10);
    let items: Vec<ListItem> = shown
        .iter()
        .map(|record| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<name_width$}", truncate(&record.file_name, name_width)),
                    Style::default().fg(theme.text),
                ),
                Span::styled("  Uploaded on: ", Style::default().fg(theme.dim)),
                Span::styled(record.upload_date(), Style::default().fg(theme.date)),
            ]))
        })
        .collect();

    let mut list = List::new(items);
    let mut state = ListState::default();
    if app.focus == Focus::Uploaded {
        list = list.highlight_style(theme.highlight_style());
        state.select(Some(app.uploaded_cursor));
    }
    f.render_stateful_widget(list, rows[1], &mut state);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.input_mode == InputMode::TextInput {
        " type to edit  Enter:done  Esc:cancel"
    } else {
        match app.focus {
            Focus::Selected => " a:add files  d:remove  Tab:next pane  u:upload  ?:help  q:quit",
            Focus::Course | Focus::Subject => " Enter:edit  Tab:next pane  u:upload  ?:help  q:quit",
            Focus::UploadButton => " Enter:upload  Tab:next pane  ?:help  q:quit",
            Focus::Search => " Enter or /:search  r:refresh  Tab:next pane  ?:help  q:quit",
            Focus::Uploaded => " j/k:navigate  d:delete  /:search  r:refresh  ?:help  q:quit",
        }
    };
    let footer = Line::from(Span::styled(text, app.theme.footer_style()));
    f.render_widget(Paragraph::new(footer), area);
}
