use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use prompt_architect_core::CATEGORIES;

use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick().await,
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Status messages last until the next key press
    app.status_message = None;

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn focus(app: &mut App, pane: FocusPane) {
    app.focus = pane;
    // Auto-enter editing mode when focusing input
    app.input_mode = if pane == FocusPane::Input && app.can_edit() {
        app.cursor_end();
        InputMode::Editing
    } else {
        InputMode::Normal
    };
}

fn generate(app: &mut App) {
    if app.start_generation() {
        app.input_mode = InputMode::Normal;
        app.focus = FocusPane::Result;
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab => focus(app, app.focus.next()),
        KeyCode::BackTab => focus(app, app.focus.prev()),

        // Direct category toggles
        KeyCode::Char(c @ '1'..='9') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(category) = CATEGORIES.get(idx) {
                app.toggle_category(category.id);
            }
        }

        KeyCode::Char('h') | KeyCode::Left if app.focus == FocusPane::Categories => {
            app.category_prev();
        }
        KeyCode::Char('l') | KeyCode::Right if app.focus == FocusPane::Categories => {
            app.category_next();
        }
        KeyCode::Enter | KeyCode::Char(' ') if app.focus == FocusPane::Categories => {
            app.toggle_category_at_cursor();
        }

        KeyCode::Char('i') | KeyCode::Char('/') => focus(app, FocusPane::Input),

        KeyCode::Char('g') | KeyCode::Enter => generate(app),
        KeyCode::Char('c') => {
            app.copy_result_with(copy_to_clipboard, Instant::now());
        }
        KeyCode::Char('x') => app.clear(),
        KeyCode::Char('t') => app.toggle_theme(),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => focus(app, app.focus.next()),
        KeyCode::BackTab => focus(app, app.focus.prev()),
        KeyCode::Enter => generate(app),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_result = app
        .result_area
        .is_some_and(|r| point_in_rect(mouse.column, mouse.row, r));
    if !in_result {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(),
        MouseEventKind::ScrollUp => app.scroll_up(),
        _ => {}
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use cli_clipboard::{ClipboardContext, ClipboardProvider};

    let mut ctx = ClipboardContext::new().map_err(|e| anyhow::anyhow!("{}", e))?;
    ctx.set_contents(text.to_owned())
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(())
}
