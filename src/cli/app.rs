use super::ui;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dignitary_tracker::projection::status_counts;
use dignitary_tracker::{
    Action, RecordStore, SessionContext, Status, TrackedPerson, TrackerError, ViewMode,
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    style::{Color, Style},
    text::{Line, Span},
};
use std::{error::Error, io};
use tracing::debug;
use tui_textarea::TextArea;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
    InlineEdit,
    ConfirmDelete(Uuid),
}

pub struct App<'a> {
    pub store: RecordStore,
    pub session: SessionContext,
    /// Current projection of the store for the session filter.
    pub visible: Vec<TrackedPerson>,
    pub counts: [(Status, usize); 5],
    pub total: usize,
    pub selected: usize,
    pub mode: Mode,
    pub search: TextArea<'a>,
    pub remarks: TextArea<'a>,
    pub status_line: Line<'static>,
    pub exit: bool,
}

impl<'a> App<'a> {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            session: SessionContext::default(),
            visible: Vec::new(),
            counts: Status::ALL.map(|status| (status, 0)),
            total: 0,
            selected: 0,
            mode: Mode::Browse,
            search: Self::new_search(),
            remarks: Self::new_remarks(""),
            status_line: Line::from("Press '?' for keys."),
            exit: false,
        }
    }

    fn new_search() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Search dignitaries...");
        textarea.set_block(
            ratatui::widgets::Block::default()
                .borders(ratatui::widgets::Borders::ALL)
                .title(" Search (/) "),
        );
        textarea
    }

    fn new_remarks(initial: &str) -> TextArea<'static> {
        let mut textarea = TextArea::from(initial.lines().map(str::to_string).collect::<Vec<_>>());
        textarea.set_placeholder_text("Remarks");
        textarea.set_block(
            ratatui::widgets::Block::default()
                .borders(ratatui::widgets::Borders::ALL)
                .title(" Remarks "),
        );
        textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        textarea.move_cursor(tui_textarea::CursorMove::End);
        textarea
    }

    pub fn selected_record(&self) -> Option<&TrackedPerson> {
        self.visible.get(self.selected)
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.refresh().await;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        if let Err(err) = res {
            println!("{:?}", err);
        }

        Ok(())
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| ui::draw(f, self))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key).await;
                }
            }
            if self.exit {
                return Ok(());
            }
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key).await,
            Mode::Search => self.handle_search_key(key).await,
            Mode::InlineEdit => self.handle_inline_key(key).await,
            Mode::ConfirmDelete(id) => self.handle_confirm_key(key, id).await,
        }
    }

    async fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            KeyCode::Char('?') => {
                self.info("v view · r role · / search · e edit · s next status · d delete · q quit");
            }
            KeyCode::Char('v') => {
                self.update_session(SessionContext::toggle_view_mode);
                let label = match self.session.view_mode {
                    ViewMode::Tile => "tile",
                    ViewMode::List => "list",
                };
                self.info(format!("Switched to {label} view"));
            }
            KeyCode::Char('r') => {
                let role = self.session.role.toggled();
                self.update_session(|session| session.with_role(role));
                self.info(format!("Role: {}", role.label()));
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') if self.session.view_mode == ViewMode::Tile => {
                self.move_selection(1)
            }
            KeyCode::Left | KeyCode::Char('h') if self.session.view_mode == ViewMode::Tile => {
                self.move_selection(-1)
            }
            KeyCode::Char('e') | KeyCode::Enter => self.start_inline_edit(),
            KeyCode::Char('s') => self.advance_status().await,
            KeyCode::Char('d') => self.request_delete(),
            _ => {}
        }
    }

    async fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Esc => {
                self.search = Self::new_search();
                self.mode = Mode::Browse;
                self.apply_filter().await;
            }
            _ => {
                self.search.input(key);
                self.apply_filter().await;
            }
        }
    }

    async fn handle_inline_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.update_session(SessionContext::cancel_inline_edit);
                self.mode = Mode::Browse;
                self.info("Edit cancelled");
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_inline_edit().await;
            }
            KeyCode::Left | KeyCode::Right if key.modifiers.contains(KeyModifiers::ALT) => {
                let Some(draft) = self.session.inline_edit.as_ref() else {
                    return;
                };
                let status = if key.code == KeyCode::Right {
                    draft.status.next()
                } else {
                    draft.status.previous()
                };
                self.update_session(|session| session.set_draft_status(status));
            }
            _ => {
                self.remarks.input(key);
            }
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent, id: Uuid) {
        self.mode = Mode::Browse;
        if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.info("Delete cancelled");
            return;
        }
        match self.store.delete(id).await {
            Ok(()) => self.success("Entry deleted"),
            Err(err) => self.failure(&err),
        }
        self.refresh().await;
    }

    fn start_inline_edit(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            return;
        };
        let session = std::mem::take(&mut self.session);
        match session.clone().start_inline_edit(&record) {
            Ok(session) => {
                self.session = session;
                self.remarks = Self::new_remarks(record.remarks.as_deref().unwrap_or(""));
                self.mode = Mode::InlineEdit;
                self.info("Alt+←/→ status · type remarks · Ctrl+S save · Esc cancel");
            }
            Err(err) => {
                self.session = session;
                self.failure(&err);
            }
        }
    }

    async fn save_inline_edit(&mut self) {
        let remarks = self.remarks.lines().join("\n");
        let session = std::mem::take(&mut self.session).set_draft_remarks(remarks);
        let (session, saved) = session.save_inline_edit(&self.store).await;
        self.session = session;
        self.mode = Mode::Browse;
        match saved {
            Ok(record) => {
                self.success(format!("{} is now '{}'", record.name, record.status));
                self.refresh().await;
                self.select_id(record.id);
            }
            Err(err) => {
                self.failure(&err);
                self.refresh().await;
            }
        }
    }

    /// One-key progression: moves the selected record to the next status.
    async fn advance_status(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            return;
        };
        if let Err(err) = self.session.guard(Action::InlineEdit) {
            self.failure(&err);
            return;
        }
        let next = record.status.next();
        let session = std::mem::take(&mut self.session);
        let session = match session.clone().start_inline_edit(&record) {
            Ok(session) => session.set_draft_status(next),
            Err(err) => {
                self.session = session;
                self.failure(&err);
                return;
            }
        };
        let (session, saved) = session.save_inline_edit(&self.store).await;
        self.session = session;
        match saved {
            Ok(record) => {
                self.success(format!("{} is now '{}'", record.name, record.status));
                self.refresh().await;
                self.select_id(record.id);
            }
            Err(err) => self.failure(&err),
        }
    }

    fn request_delete(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        let (id, name) = (record.id, record.name.clone());
        if let Err(err) = self.session.guard(Action::Delete) {
            self.failure(&err);
            return;
        }
        self.mode = Mode::ConfirmDelete(id);
        self.status_line = Line::from(Span::styled(
            format!("Are you sure you want to delete {name}? (y/N)"),
            Style::default().fg(Color::Yellow),
        ));
    }

    async fn apply_filter(&mut self) {
        let filter = self.search.lines().join(" ");
        self.update_session(|session| session.with_filter(filter));
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        match self.store.list_all().await {
            Ok(records) => {
                self.total = records.len();
                self.counts = status_counts(&records);
                self.visible = self.session.visible(&records);
                if self.selected >= self.visible.len() {
                    self.selected = self.visible.len().saturating_sub(1);
                }
                debug!(visible = self.visible.len(), total = self.total, "board refreshed");
            }
            Err(err) => self.failure(&err),
        }
    }

    fn update_session(&mut self, change: impl FnOnce(SessionContext) -> SessionContext) {
        let session = std::mem::take(&mut self.session);
        self.session = change(session);
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    fn select_id(&mut self, id: Uuid) {
        if let Some(index) = self.visible.iter().position(|record| record.id == id) {
            self.selected = index;
        }
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status_line = Line::from(Span::raw(message.into()));
    }

    fn success(&mut self, message: impl Into<String>) {
        self.status_line = Line::from(Span::styled(
            message.into(),
            Style::default().fg(Color::Green),
        ));
    }

    fn failure(&mut self, err: &TrackerError) {
        self.status_line = Line::from(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dignitary_tracker::Role;
    use dignitary_tracker::seed::sample_dignitaries;
    use chrono::Utc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn seeded_app() -> App<'static> {
        let store = RecordStore::in_memory();
        store.seed(sample_dignitaries(Utc::now()).unwrap()).await.unwrap();
        let mut app = App::new(store);
        app.refresh().await;
        app
    }

    #[tokio::test]
    async fn board_starts_in_priority_order() {
        let app = seeded_app().await;
        let names: Vec<_> = app.visible.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["John Smith", "Jane Doe", "Maria Garcia"]);
    }

    #[tokio::test]
    async fn typing_in_search_filters_board() {
        let mut app = seeded_app().await;
        app.handle_key(press(KeyCode::Char('/'))).await;
        for c in "samp".chars() {
            app.handle_key(press(KeyCode::Char(c))).await;
        }
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.visible[0].name, "Maria Garcia");

        app.handle_key(press(KeyCode::Esc)).await;
        assert_eq!(app.visible.len(), 3);
    }

    #[tokio::test]
    async fn liaison_officer_cannot_open_delete_prompt() {
        let mut app = seeded_app().await;
        app.handle_key(press(KeyCode::Char('r'))).await;
        assert_eq!(app.session.role, Role::LiaisonOfficer);

        app.handle_key(press(KeyCode::Char('d'))).await;
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.total, 3);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_selected() {
        let mut app = seeded_app().await;
        app.handle_key(press(KeyCode::Char('d'))).await;
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(press(KeyCode::Char('y'))).await;
        assert_eq!(app.total, 2);
        assert!(app.visible.iter().all(|r| r.name != "John Smith"));
    }

    #[tokio::test]
    async fn next_status_key_moves_record_forward() {
        let mut app = seeded_app().await;
        // Maria Garcia, Not Started, sits last.
        app.selected = 2;
        app.handle_key(press(KeyCode::Char('s'))).await;

        let maria = app.visible.iter().find(|r| r.name == "Maria Garcia").unwrap();
        assert_eq!(maria.status, Status::Started);
        assert_eq!(app.session.editing(), None);
    }

    #[tokio::test]
    async fn inline_edit_saves_remarks() {
        let mut app = seeded_app().await;
        app.handle_key(press(KeyCode::Char('e'))).await;
        assert_eq!(app.mode, Mode::InlineEdit);

        app.remarks = App::new_remarks("At the porch");
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .await;

        assert_eq!(app.mode, Mode::Browse);
        let john = app.visible.iter().find(|r| r.name == "John Smith").unwrap();
        assert_eq!(john.remarks.as_deref(), Some("At the porch"));
    }
}
