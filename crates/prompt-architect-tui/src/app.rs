use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use prompt_architect_core::{
    CategoryId, Config, CopyNotice, EnhanceError, Enhancer, Session, CATEGORIES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Categories,
    Input,
    Result,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::Categories => FocusPane::Input,
            FocusPane::Input => FocusPane::Result,
            FocusPane::Result => FocusPane::Categories,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusPane::Categories => FocusPane::Result,
            FocusPane::Input => FocusPane::Categories,
            FocusPane::Result => FocusPane::Input,
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,
    pub session: Session,

    // Category picker cursor (index into CATEGORIES)
    pub category_cursor: usize,

    // Keyword input cursor, in characters
    pub input_cursor: usize,

    // Result pane
    pub result_scroll: u16,
    pub result_height: u16,
    pub total_result_lines: u16,
    pub copy_notice: CopyNotice,

    // One-shot message in the footer (clipboard or config failures)
    pub status_message: Option<String>,

    // In-flight enhancement request
    pub generation_task: Option<JoinHandle<Result<String, EnhanceError>>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub result_area: Option<Rect>,

    pub model_name: String,
    pub config: Config,
    enhancer: Arc<dyn Enhancer>,
}

impl App {
    pub fn new(config: Config, enhancer: Arc<dyn Enhancer>, model_name: &str) -> Self {
        let session = Session::load(&config);

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: FocusPane::Input,
            session,

            category_cursor: 0,
            input_cursor: 0,

            result_scroll: 0,
            result_height: 0,
            total_result_lines: 0,
            copy_notice: CopyNotice::default(),

            status_message: None,
            generation_task: None,
            animation_frame: 0,
            result_area: None,

            model_name: model_name.to_string(),
            config,
            enhancer,
        }
    }

    // Category picker

    pub fn category_next(&mut self) {
        self.category_cursor = (self.category_cursor + 1) % CATEGORIES.len();
    }

    pub fn category_prev(&mut self) {
        self.category_cursor = (self.category_cursor + CATEGORIES.len() - 1) % CATEGORIES.len();
    }

    pub fn toggle_category_at_cursor(&mut self) {
        let id = CATEGORIES[self.category_cursor].id;
        self.toggle_category(id);
    }

    pub fn toggle_category(&mut self, id: CategoryId) {
        if let Some(idx) = CATEGORIES.iter().position(|c| c.id == id) {
            self.category_cursor = idx;
        }
        self.session.select_category(id);
        self.result_scroll = 0;
    }

    // Keyword editing; ignored while a request is in flight

    pub fn can_edit(&self) -> bool {
        !self.session.is_loading
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.can_edit() {
            return;
        }
        let byte_pos = char_to_byte_index(&self.session.user_input, self.input_cursor);
        self.session.user_input.insert(byte_pos, c);
        self.input_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if !self.can_edit() || self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let byte_pos = char_to_byte_index(&self.session.user_input, self.input_cursor);
        self.session.user_input.remove(byte_pos);
    }

    pub fn delete_at_cursor(&mut self) {
        if !self.can_edit() {
            return;
        }
        let char_count = self.session.user_input.chars().count();
        if self.input_cursor < char_count {
            let byte_pos = char_to_byte_index(&self.session.user_input, self.input_cursor);
            self.session.user_input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.session.user_input.chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.session.user_input.chars().count();
    }

    // Actions

    /// Validate the keywords and spawn the enhancement request.
    /// Returns true if a request was started.
    pub fn start_generation(&mut self) -> bool {
        let Some(request) = self.session.begin_generation() else {
            return false;
        };

        self.result_scroll = 0;
        self.animation_frame = 0;

        let enhancer = Arc::clone(&self.enhancer);
        self.generation_task = Some(tokio::spawn(async move {
            enhancer.enhance(request.category, &request.keywords).await
        }));
        true
    }

    /// Collect the request result once the background task has finished
    pub async fn poll_generation(&mut self) {
        let finished = self
            .generation_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.generation_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "enhancement task failed");
                    Err(EnhanceError::Unknown)
                }
            };
            self.session.finish_generation(outcome);
            self.result_scroll = 0;
        }
    }

    pub fn clear(&mut self) {
        if !self.session.can_clear() {
            return;
        }
        self.session.clear();
        self.input_cursor = 0;
        self.result_scroll = 0;
    }

    pub fn toggle_theme(&mut self) {
        match self.session.toggle_theme(&mut self.config) {
            Ok(theme) => info!(theme = theme.as_str(), "theme changed"),
            Err(e) => {
                warn!(error = %e, "could not save theme");
                self.status_message = Some(format!("Theme not saved: {}", e));
            }
        }
    }

    /// Copy the raw generated prompt using `write` and start the "Copied!" notice
    pub fn copy_result_with<F>(&mut self, write: F, now: Instant)
    where
        F: FnOnce(&str) -> Result<()>,
    {
        if self.session.generated_prompt.is_empty() {
            return;
        }
        match write(&self.session.generated_prompt) {
            Ok(()) => self.copy_notice.show(now),
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.status_message = Some(format!("Copy failed: {}", e));
            }
        }
    }

    pub fn copied(&self) -> bool {
        self.copy_notice.is_visible(Instant::now())
    }

    // Result scrolling

    pub fn scroll_down(&mut self) {
        let max_scroll = self.total_result_lines.saturating_sub(self.result_height);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Tick animation frame and timers (called by Tick event)
    pub async fn tick(&mut self) {
        if self.session.is_loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.copy_notice.expire(Instant::now());
        self.poll_generation().await;
    }
}
