use lectern_core::Notice;
use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::theme::Theme;

/// Render an upload/delete outcome as a blocking popup.
pub fn render(f: &mut Frame, notice: &Notice, theme: &Theme) {
    let popup = centered_rect(60, 8, f.area());
    let accent = if notice.is_failure() {
        theme.failure
    } else {
        theme.success
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {notice}"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Enter",
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(": ok", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title(format!(" {} ", notice.title())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
