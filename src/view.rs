use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::navigator::{Navigator, SPINNER_FRAMES, Stage};

const FOOTER_HINT: &str = "↑/↓ navigate | type to filter | enter select | esc quit";

/// Everything the terminal shows for one navigator state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Error(String),
    Loading {
        spinner: &'static str,
        message: String,
    },
    Picker(PickerView),
    Done(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerView {
    pub header: &'static str,
    pub context: Option<String>,
    pub search: String,
    /// The visible window of the filtered list.
    pub rows: Vec<String>,
    /// Index into `rows` of the highlighted entry.
    pub selected: Option<usize>,
    pub footer: &'static str,
    pub preview: Option<PreviewPanel>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewPanel {
    Loading { spinner: &'static str },
    Tags(Vec<String>),
    NoTags,
    NothingSelected,
}

/// Visible slice `[start, end)` of a `len`-long list, centred on `cursor`
/// and shifted rather than padded at either end.
pub fn window_bounds(cursor: usize, len: usize, window: usize) -> (usize, usize) {
    let mut start = cursor.saturating_sub(window / 2);
    let mut end = start + window;
    if end > len {
        end = len;
        start = end.saturating_sub(window);
    }
    (start, end)
}

pub fn project(navigator: &Navigator, window: usize) -> Screen {
    if let Some(err) = navigator.error() {
        return Screen::Error(format!("Error: {err}"));
    }
    let spinner = SPINNER_FRAMES[navigator.spinner_frame() % SPINNER_FRAMES.len()];
    let selection = navigator.selection();
    if navigator.is_loading() {
        let next = match navigator.stage() {
            Stage::ProfileSelect => "regions",
            _ => "instances",
        };
        return Screen::Loading {
            spinner,
            message: format!("Loading {next}..."),
        };
    }

    let (header, context) = match navigator.stage() {
        Stage::ProfileSelect => ("Select AWS profile", None),
        Stage::RegionSelect => (
            "Select AWS region",
            Some(format!("Profile: {}", or_blank(&selection.profile))),
        ),
        Stage::InstanceSelect => (
            "Select EC2 instance",
            Some(format!(
                "Profile: {} | Region: {}",
                or_blank(&selection.profile),
                or_blank(&selection.region)
            )),
        ),
        Stage::Done => {
            return Screen::Done(vec![
                format!(
                    "Selected: Profile={}, Region={}, Instance={}",
                    or_blank(&selection.profile),
                    or_blank(&selection.region),
                    or_blank(&selection.instance)
                ),
                "Starting SSM session...".into(),
            ]);
        }
    };

    let filtered = navigator.filtered();
    let (start, end) = window_bounds(navigator.cursor(), filtered.len(), window);
    let selected = (!filtered.is_empty()).then(|| navigator.cursor() - start);

    let preview = (navigator.stage() == Stage::InstanceSelect).then(|| {
        let state = navigator.preview();
        if state.target_id.is_none() {
            PreviewPanel::NothingSelected
        } else if state.loading {
            PreviewPanel::Loading { spinner }
        } else if state.tags.is_empty() {
            PreviewPanel::NoTags
        } else {
            PreviewPanel::Tags(
                state
                    .tags
                    .iter()
                    .map(|tag| format!("{}: {}", tag.key, tag.value))
                    .collect(),
            )
        }
    });

    Screen::Picker(PickerView {
        header,
        context,
        search: format!("Search: {}", navigator.query()),
        rows: filtered[start..end].to_vec(),
        selected,
        footer: FOOTER_HINT,
        preview,
    })
}

fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

pub fn render(frame: &mut Frame, navigator: &Navigator, window: usize) {
    let area = frame.size();
    match project(navigator, window) {
        Screen::Error(message) => draw_error(frame, area, &message),
        Screen::Loading { spinner, message } => draw_loading(frame, area, spinner, &message),
        Screen::Picker(view) => draw_picker(frame, area, &view),
        Screen::Done(lines) => draw_done(frame, area, &lines),
    }
}

fn draw_error(frame: &mut Frame, area: Rect, message: &str) {
    let widget = Paragraph::new(Span::styled(
        message,
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))
    .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn draw_loading(frame: &mut Frame, area: Rect, spinner: &str, message: &str) {
    let line = Line::from(vec![
        Span::styled(
            spinner,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(message, Style::default().fg(Color::Yellow)),
    ]);
    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, centered_strip(area, 3));
}

fn draw_done(frame: &mut Frame, area: Rect, lines: &[String]) {
    let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Session Starting"),
        );
    frame.render_widget(widget, centered_strip(area, lines.len() as u16 + 2));
}

fn draw_picker(frame: &mut Frame, area: Rect, view: &PickerView) {
    let (list_area, preview_area) = if view.preview.is_some() {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (halves[0], Some(halves[1]))
    } else {
        (area, None)
    };

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        view.header,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(list_area);
    frame.render_widget(block, list_area);

    let mut info: Vec<Line> = Vec::new();
    if let Some(context) = &view.context {
        info.push(Line::styled(context.as_str(), Style::default().fg(Color::Yellow)));
    }
    info.push(Line::styled(view.search.as_str(), Style::default().fg(Color::Yellow)));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(info.len() as u16),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(info), rows[0]);

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .map(|row| ListItem::new(row.as_str()))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(view.selected);
    frame.render_stateful_widget(list, rows[1], &mut state);

    let footer = Paragraph::new(view.footer).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    );
    frame.render_widget(footer, rows[2]);

    if let (Some(panel), Some(area)) = (&view.preview, preview_area) {
        draw_preview(frame, area, panel);
    }
}

fn draw_preview(frame: &mut Frame, area: Rect, panel: &PreviewPanel) {
    let lines: Vec<Line> = match panel {
        PreviewPanel::Loading { spinner } => vec![Line::from(vec![
            Span::styled(*spinner, Style::default().fg(Color::Yellow)),
            Span::raw(" Loading tags..."),
        ])],
        PreviewPanel::Tags(tags) => tags.iter().map(|t| Line::from(t.as_str())).collect(),
        PreviewPanel::NoTags => vec![Line::from("No tags found.")],
        PreviewPanel::NothingSelected => vec![Line::from("No matching instances.")],
    };
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Instance Tags"));
    frame.render_widget(widget, area);
}

fn centered_strip(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        x: area.x,
        y: area.y + (area.height - height) / 2,
        width: area.width,
        height,
    }
}
