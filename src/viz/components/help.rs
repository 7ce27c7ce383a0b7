use ratatui::{prelude::*, widgets::*};

use crate::viz::app::Tab;

fn key(key: &'static str, action: &'static str) -> Vec<Span<'static>> {
    vec![Span::from(key).light_cyan().bold(), Span::raw(action)]
}

/// Draw the key bindings for the dashboard and the current tab over `area`
pub fn render_help(area: Rect, buf: &mut Buffer, tab: Tab) {
    let lines = vec![
        key("  q  ", " : Leave the dashboard"),
        key("  h  ", " : Toggle help popup"),
        key(" Tab ", " : Switch tabs"),
    ];

    let additional_lines = match tab {
        Tab::Plots => vec![key("⬅ / ➡", " : Switch metrics")],
        Tab::Maze => vec![key("  p  ", " : Show or hide the latest path")],
        Tab::Logs => vec![
            key("  s  ", " : Toggles target selector widget hidden/visible"),
            key("  f  ", " : Toggle focus on the selected target only"),
            key("⬆ / ⬇", " : Switch log target"),
            key("⬅ / ➡", " : Reduce/increase shown log messages by one level"),
            key("- / +", " : Reduce/increase captured log messages by one level"),
            key("PgUp ", " : Enter page mode and scroll up in log history"),
            key("PgDn ", " : Only in page mode, scroll down in log history"),
            key(" Esc ", " : Exit page mode"),
        ],
    };

    let lines = [lines, additional_lines]
        .concat()
        .into_iter()
        .map(Line::from)
        .collect::<Vec<_>>();

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length((lines.len() + 4) as u16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(area.width.min(80)),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::proportional(1))
                .title("Help"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}
