use crate::ui::app::{App, FocusPanel};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, Wrap,
    },
    Frame,
};

// Brandbook colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C); // #1f2f3c
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0); // #c3d3e0 - selection background
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68); // #829a68 - picked elements
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C); // #9e683c - focus
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65); // #716565 - footer

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const PICKED_COLOR: Color = BRAND_GREEN;

const HELP: &str = " Space Pick | t Pick type | c Clear | r Refresh | [ ] Ratio | - + Rounding | y Copy | q Quit ";

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);

    if app.notification.is_some() {
        draw_notification(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " Sum Parameters | {} | {} of {} elements picked | ratio {} | rounding {} ",
        app.project.name,
        app.selection.len(),
        app.project.total_elements(),
        app.session.ratio(),
        app.session.rounding()
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(45), // Elements
        Constraint::Percentage(55), // Summaries
    ])
    .split(area);

    draw_elements(frame, chunks[0], app);
    draw_summaries(frame, chunks[1], app);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

/// First row to render so that `selected` stays visible.
fn scroll_offset(selected: usize, visible_rows: usize) -> usize {
    if visible_rows > 0 && selected >= visible_rows {
        selected - visible_rows + 1
    } else {
        0
    }
}

fn draw_scrollbar(frame: &mut Frame, area: Rect, len: usize, position: usize) {
    if area.height < 4 {
        return;
    }
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(len).position(position);

    let scrollbar_area = Rect {
        x: area.x + area.width - 1,
        y: area.y + 2,
        width: 1,
        height: area.height - 3,
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}

fn draw_elements(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Elements;
    let elements = &app.project.elements;

    // Subtract 3 for borders and header
    let visible_rows = (area.height as usize).saturating_sub(3);
    let offset = scroll_offset(app.selected_element, visible_rows);

    let header = Row::new(vec!["", "ID", "Entity", "Name", "Level"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = elements
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, element)| {
            let picked = app.selection.contains(element.id);
            let style = if i == app.selected_element && is_focused {
                SELECTED_STYLE
            } else if i == app.selected_element {
                Style::default().add_modifier(Modifier::BOLD)
            } else if picked {
                Style::default().fg(PICKED_COLOR)
            } else {
                Style::default()
            };

            Row::new(vec![
                if picked { "[x]" } else { "[ ]" }.to_string(),
                format!("#{}", element.id),
                element.entity_type.clone(),
                element.label(),
                app.project.storey_name(element),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ];

    let title = format!(" Elements ({}) ", elements.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(table, area);

    if elements.len() > visible_rows {
        draw_scrollbar(frame, area, elements.len(), app.selected_element);
    }
}

fn draw_summaries(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Summaries;
    let summaries = app.session.summaries();

    let visible_rows = (area.height as usize).saturating_sub(3);
    let offset = scroll_offset(app.selected_summary, visible_rows);

    let header = Row::new(vec!["Parameter", "Sum", "Unit", "Coefficient"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = summaries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, summary)| {
            let style = if i == app.selected_summary && is_focused {
                SELECTED_STYLE
            } else {
                Style::default()
            };

            Row::new(vec![
                summary.name.clone(),
                app.session.format_sum(summary),
                summary.unit_label.clone(),
                app.session.format_coefficient(summary),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(22),
        Constraint::Percentage(12),
        Constraint::Percentage(26),
    ];

    let title = if app.selection.is_empty() {
        " Common parameters (pick elements) ".to_string()
    } else {
        format!(" Common parameters ({}) ", summaries.len())
    };
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(table, area);

    if summaries.len() > visible_rows {
        draw_scrollbar(frame, area, summaries.len(), app.selected_summary);
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.status {
        Some(status) => Line::from(vec![
            Span::styled(format!(" {status} "), Style::default().fg(BRAND_ORANGE)),
            Span::styled("|", Style::default().fg(BRAND_MUTED)),
            Span::styled(HELP, Style::default().fg(BRAND_MUTED)),
        ]),
        None => Line::styled(HELP, Style::default().fg(BRAND_MUTED)),
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn draw_notification(frame: &mut Frame, app: &App) {
    let Some(notification) = &app.notification else {
        return;
    };

    let [area] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::vertical([Constraint::Length(9)])
        .flex(Flex::Center)
        .areas(area);

    let popup = Paragraph::new(format!("{}\n\nPress any key to continue.", notification.message))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(notification.title.as_str())
                .title_style(HEADER_STYLE)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BRAND_ORANGE)),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, IfcProject, Parameter, Selection};
    use crate::ui::App;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(7, 5), 3);
        assert_eq!(scroll_offset(3, 0), 0);
    }

    #[test]
    fn renders_summary_rows() {
        let mut project = IfcProject::new("Demo".into(), "IFC4".into(), "demo.ifc".into());
        project.set_elements(vec![
            Element::new(1, "IFCWALL").with_parameter(Parameter::double("Length", "500 mm")),
            Element::new(2, "IFCWALL").with_parameter(Parameter::double("Length", "300 mm")),
        ]);
        let app = App::new(project, Ok(None)).with_selection(Selection::from_ids([1, 2]));

        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|frame| draw_dashboard(frame, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("2 of 2 elements picked"));
        assert!(text.contains("Length"));
        assert!(text.contains("800.00"));
    }
}
