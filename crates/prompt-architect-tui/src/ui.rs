use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};

use prompt_architect_core::markdown::{self, Segment};
use prompt_architect_core::{Theme, CATEGORIES};

use crate::app::{App, FocusPane, InputMode};

const INPUT_ROWS: u16 = 5;

/// Colors for one theme
struct Palette {
    bg: Color,
    panel: Color,
    text: Color,
    muted: Color,
    accent: Color,
    highlight: Color,
    chip: Color,
    error: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::Rgb(0xF0, 0xF2, 0xF5),
                panel: Color::Rgb(0xF5, 0xEF, 0xE7),
                text: Color::Rgb(0x2A, 0x2F, 0x27),
                muted: Color::Rgb(0x5A, 0x63, 0x51),
                accent: Color::Rgb(0x0B, 0x62, 0x47),
                highlight: Color::Rgb(0xD7, 0xB8, 0x77),
                chip: Color::Rgb(0xE9, 0xDC, 0xC9),
                error: Color::Rgb(0xB9, 0x1C, 0x1C),
            },
            Theme::Dark => Self {
                bg: Color::Rgb(0x1A, 0x1D, 0x1A),
                panel: Color::Rgb(0x2A, 0x2F, 0x27),
                text: Color::Rgb(0xF5, 0xEF, 0xE7),
                muted: Color::Rgb(0xCF, 0xF5, 0xE7),
                accent: Color::Rgb(0x0B, 0x62, 0x47),
                highlight: Color::Rgb(0xD7, 0xB8, 0x77),
                chip: Color::Rgb(0x5A, 0x63, 0x51),
                error: Color::Rgb(0xFC, 0xA5, 0xA5),
            },
        }
    }

    fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.highlight)
        } else {
            Style::default().fg(self.muted)
        }
    }
}

/// Turn one line of segments into spans, bolding the strong runs
fn styled_line(segments: Vec<Segment<'_>>, palette: &Palette) -> Line<'static> {
    let spans: Vec<Span<'static>> = segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(text) => Span::raw(text.to_string()),
            Segment::Strong(text) => Span::styled(
                text.to_string(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
        })
        .collect();

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_theme(app.session.theme);

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.text)),
        area,
    );

    // Main layout: header, categories, input, result, footer
    let [header_area, categories_area, input_area, result_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(INPUT_ROWS + 2),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, &palette, frame, header_area);
    render_categories(app, &palette, frame, categories_area);
    render_input(app, &palette, frame, input_area);
    render_result(app, &palette, frame, result_area);
    render_footer(app, &palette, frame, footer_area);
}

fn render_header(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let theme_indicator = match app.session.theme {
        Theme::Light => " ☀ light ",
        Theme::Dark => " ☾ dark ",
    };

    let [title_area, theme_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(theme_indicator.chars().count() as u16),
    ])
    .areas(area);

    let title = Text::from(vec![
        Line::from(vec![
            Span::styled(" AI Prompt Architect ", Style::default().fg(palette.accent).bold()),
            Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(palette.muted),
            ),
            Span::styled(format!("  {}", app.model_name), Style::default().fg(palette.muted)),
        ]),
        Line::from(Span::styled(
            " Generate & Enhance Prompts for Any Task",
            Style::default().fg(palette.muted),
        )),
    ]);
    frame.render_widget(Paragraph::new(title), title_area);

    let theme = Paragraph::new(Span::styled(
        theme_indicator,
        Style::default().fg(palette.highlight),
    ));
    frame.render_widget(theme, theme_area);
}

fn render_categories(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Categories;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .title(" Select a Category ");

    let mut spans = Vec::new();
    for (i, category) in CATEGORIES.iter().enumerate() {
        let selected = app.session.selected_category == Some(category.id);
        let under_cursor = focused && app.category_cursor == i;

        let mut style = if selected {
            Style::default().bg(palette.accent).fg(Color::Rgb(0xF5, 0xEF, 0xE7)).bold()
        } else {
            Style::default().bg(palette.chip).fg(palette.text)
        };
        if under_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }

        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", i + 1, category.name), style));
    }

    let picker = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(picker, area);
}

fn render_input(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let focused = app.focus == FocusPane::Input;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused || editing))
        .style(Style::default().bg(palette.panel))
        .title(" Enter Your Keywords ");

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    if app.session.user_input.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            app.session.placeholder(),
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        ))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);

        if editing {
            frame.set_cursor_position((area.x + 1, area.y + 1));
        }
        return;
    }

    // Hard-wrap by character so the cursor position is easy to compute
    let chars: Vec<char> = app.session.user_input.chars().collect();
    let width = inner_width.max(1);
    let rows: Vec<Line> = chars
        .chunks(width)
        .map(|chunk| Line::from(chunk.iter().collect::<String>()))
        .collect();

    let cursor_row = app.input_cursor / width;
    let cursor_col = app.input_cursor % width;

    // Scroll so the cursor row stays visible
    let scroll = if inner_height == 0 {
        0
    } else {
        cursor_row.saturating_sub(inner_height - 1)
    };

    let text_style = if app.session.is_loading {
        Style::default().fg(palette.muted)
    } else {
        Style::default().fg(palette.text)
    };

    let input = Paragraph::new(rows)
        .style(text_style)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(input, area);

    // Show cursor when editing
    if editing {
        frame.set_cursor_position((
            area.x + 1 + cursor_col as u16,
            area.y + 1 + (cursor_row - scroll) as u16,
        ));
    }
}

fn render_result(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    app.result_area = Some(area);
    app.result_height = area.height.saturating_sub(2);

    let focused = app.focus == FocusPane::Result;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .style(Style::default().bg(palette.panel))
        .title(" Enhanced Prompt ");

    if !app.session.is_loading
        && app.session.error_message.is_none()
        && !app.session.generated_prompt.is_empty()
    {
        let copy_label = if app.copied() {
            Span::styled(" ✓ Copied! ", Style::default().bg(palette.accent).fg(Color::White).bold())
        } else {
            Span::styled(" c copy ", Style::default().fg(palette.muted))
        };
        block = block.title_top(Line::from(copy_label).right_aligned());
    }

    let (text, alignment) = if app.session.is_loading {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        (
            Text::from(Line::from(Span::styled(
                format!("Architecting your prompt{}", dots),
                Style::default().fg(palette.highlight).add_modifier(Modifier::ITALIC),
            ))),
            Alignment::Center,
        )
    } else if let Some(error) = &app.session.error_message {
        (
            Text::from(Span::styled(error.clone(), Style::default().fg(palette.error))),
            Alignment::Left,
        )
    } else if !app.session.generated_prompt.is_empty() {
        let lines: Vec<Line> = markdown::lines(&app.session.generated_prompt)
            .into_iter()
            .map(|segments| styled_line(segments, palette))
            .collect();
        (Text::from(lines), Alignment::Left)
    } else {
        (
            Text::from(Span::styled(
                "Your enhanced prompt will appear here.",
                Style::default().fg(palette.muted),
            )),
            Alignment::Center,
        )
    };

    let paragraph = Paragraph::new(text)
        .alignment(alignment)
        .wrap(Wrap { trim: false });

    // Count wrapped rows before the block is attached, so borders are not included
    let inner_width = area.width.saturating_sub(2).max(1);
    app.total_result_lines = paragraph.line_count(inner_width).min(u16::MAX as usize) as u16;

    let paragraph = paragraph.block(block).scroll((app.result_scroll, 0));
    frame.render_widget(paragraph, area);

    if app.total_result_lines > app.result_height {
        let mut scrollbar_state = ScrollbarState::new(
            app.total_result_lines.saturating_sub(app.result_height) as usize,
        )
        .position(app.result_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn render_footer(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(palette.accent).fg(Color::White),
        InputMode::Editing => Style::default().bg(palette.highlight).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let disabled_style = Style::default().bg(Color::Black).fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", label_style),
    ];

    if let Some(message) = &app.status_message {
        spans.push(Span::styled(format!(" {} ", message), Style::default().bg(Color::Black).fg(Color::Red)));
        frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)), area);
        return;
    }

    let generate_label = if app.session.is_loading { " generating... " } else { " enhance " };
    let generate_style = if app.session.can_generate() { label_style } else { disabled_style };
    let clear_style = if app.session.can_clear() { label_style } else { disabled_style };

    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(generate_label, generate_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ],
        InputMode::Normal => {
            let mut hints = match app.focus {
                FocusPane::Categories => vec![
                    Span::styled(" h/l ", key_style),
                    Span::styled(" move ", label_style),
                    Span::styled(" Enter ", key_style),
                    Span::styled(" toggle ", label_style),
                ],
                FocusPane::Input => vec![
                    Span::styled(" i ", key_style),
                    Span::styled(" edit ", label_style),
                ],
                FocusPane::Result => vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" scroll ", label_style),
                    Span::styled(" c ", key_style),
                    Span::styled(
                        " copy ",
                        if app.session.generated_prompt.is_empty() { disabled_style } else { label_style },
                    ),
                ],
            };
            hints.extend(vec![
                Span::styled(" 1-5 ", key_style),
                Span::styled(" category ", label_style),
                Span::styled(" g ", key_style),
                Span::styled(generate_label, generate_style),
                Span::styled(" x ", key_style),
                Span::styled(" clear ", clear_style),
                Span::styled(" t ", key_style),
                Span::styled(" theme ", label_style),
                Span::styled(" Tab ", key_style),
                Span::styled(" focus ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
            hints
        }
    };

    spans.extend(hints);
    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
