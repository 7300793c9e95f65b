//! Detail pane: the hover/tooltip surface for the entry under the cursor.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use trash_proto::TrashEntry;

use crate::icons::{IconKind, IconResolver};
use crate::theme::{C_FOLDER, C_MUTED, C_PRIMARY, C_SECONDARY};
use crate::timefmt::format_relative_time;
use crate::view_model::detail_lines;
use crate::widgets::pane_chrome::pane_chrome;

pub fn draw_details(
    frame: &mut Frame,
    area: Rect,
    entry: Option<&TrashEntry>,
    icons: &dyn IconResolver,
) {
    let block = pane_chrome(icons.icon(IconKind::Trash), "details", false, None);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(entry) = entry else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "  nothing selected",
                Style::default().fg(C_MUTED),
            )),
            inner,
        );
        return;
    };

    let kind = IconKind::for_entry(entry);
    let name_color = if entry.is_directory { C_FOLDER } else { C_PRIMARY };
    let mut lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(icons.icon(kind), Style::default().fg(name_color)),
            Span::raw(" "),
            Span::styled(
                entry.name.clone(),
                Style::default().fg(name_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];
    for text in detail_lines(entry) {
        lines.push(Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(C_SECONDARY),
        )));
    }
    let relative = format_relative_time(&entry.deletion_timestamp, Utc::now());
    if !relative.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" ({})", relative),
            Style::default().fg(C_MUTED),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
