use crate::clipboard::{Clipboard, Osc52Clipboard};
use crate::error::SettingsError;
use crate::model::{Element, IfcProject, Selection};
use crate::settings::{Settings, SettingsStore};
use crate::sum::{ParameterSummary, SumSession, MAX_ROUNDING, MIN_ROUNDING};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Elements,
    Summaries,
}

/// Modal message shown over the dashboard until a key is pressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

pub struct App {
    pub project: IfcProject,
    pub selection: Selection,
    pub session: SumSession,
    pub focus_panel: FocusPanel,
    pub selected_element: usize,
    pub selected_summary: usize,
    pub notification: Option<Notification>,
    pub status: Option<String>,
    pub should_quit: bool,
    clipboard: Box<dyn Clipboard>,
}

impl App {
    /// Starts with the settings loaded at startup. A settings error becomes a
    /// notification and the defaults are used.
    #[must_use]
    pub fn new(project: IfcProject, loaded: Result<Option<Settings>, SettingsError>) -> Self {
        let (settings, notification) = match loaded {
            Ok(settings) => (settings.unwrap_or_default(), None),
            Err(e) => {
                error!(error = %e, "could not load settings");
                let notification = Notification {
                    title: " Settings could not be loaded ".to_string(),
                    message: format!("{e}\n\nDefault settings are used for this session."),
                };
                (Settings::default(), Some(notification))
            }
        };

        Self {
            project,
            selection: Selection::new(),
            session: SumSession::new(settings),
            focus_panel: FocusPanel::Elements,
            selected_element: 0,
            selected_summary: 0,
            notification,
            status: None,
            should_quit: false,
            clipboard: Box::new(Osc52Clipboard::stdout()),
        }
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self.refresh();
        self
    }

    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Persists ratio and rounding; called once when the window closes.
    pub fn save_settings(&self, store: &SettingsStore) -> Result<(), SettingsError> {
        store.save(&self.session.settings())
    }

    fn draw(&self, frame: &mut Frame) {
        super::dashboard::draw_dashboard(frame, self);
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) {
        if self.notification.is_some() {
            self.notification = None;
            return;
        }
        self.status = None;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right | KeyCode::Char('h' | 'l') => {
                self.toggle_focus();
            }
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Char(' ') | KeyCode::Enter if self.focus_panel == FocusPanel::Elements => {
                self.toggle_current_element();
            }
            KeyCode::Char('t') => self.select_same_type(),
            KeyCode::Char('c') => self.clear_selection(),
            KeyCode::Char('r') => {
                self.refresh();
                self.status = Some("Refreshed".to_string());
            }
            KeyCode::Char('+' | '=') => {
                if !self.session.increment_rounding() {
                    self.status = Some(format!("Rounding is limited to {MAX_ROUNDING} digits"));
                }
            }
            KeyCode::Char('-') => {
                if !self.session.decrement_rounding() {
                    self.status = Some(format!("Rounding cannot go below {MIN_ROUNDING}"));
                }
            }
            KeyCode::Char(']') => {
                self.session.next_ratio();
            }
            KeyCode::Char('[') => {
                self.session.previous_ratio();
            }
            KeyCode::Char('y') => self.copy_coefficient(),
            _ => {}
        }
    }

    fn toggle_focus(&mut self) {
        self.focus_panel = match self.focus_panel {
            FocusPanel::Elements => FocusPanel::Summaries,
            FocusPanel::Summaries => FocusPanel::Elements,
        };
    }

    fn navigate_up(&mut self) {
        match self.focus_panel {
            FocusPanel::Elements => self.selected_element = self.selected_element.saturating_sub(1),
            FocusPanel::Summaries => self.selected_summary = self.selected_summary.saturating_sub(1),
        }
    }

    fn navigate_down(&mut self) {
        match self.focus_panel {
            FocusPanel::Elements => {
                if self.selected_element < self.project.elements.len().saturating_sub(1) {
                    self.selected_element += 1;
                }
            }
            FocusPanel::Summaries => {
                if self.selected_summary < self.session.summaries().len().saturating_sub(1) {
                    self.selected_summary += 1;
                }
            }
        }
    }

    fn toggle_current_element(&mut self) {
        if let Some(id) = self.current_element().map(|e| e.id) {
            self.selection.toggle(id);
            self.refresh();
        }
    }

    fn select_same_type(&mut self) {
        let Some(entity_type) = self.current_element().map(|e| e.entity_type.clone()) else {
            return;
        };
        self.selection
            .extend(self.project.ids_of_entity_type(&entity_type));
        self.refresh();
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        self.refresh();
    }

    /// Re-resolves and re-aggregates against the current selection.
    pub fn refresh(&mut self) {
        self.session.refresh_from(&self.selection.view(&self.project));
        self.selected_summary = self
            .selected_summary
            .min(self.session.summaries().len().saturating_sub(1));
    }

    fn copy_coefficient(&mut self) {
        let Some(summary) = self.current_summary() else {
            self.status = Some("Nothing to copy".to_string());
            return;
        };
        let text = self.session.format_coefficient(summary);
        let name = summary.name.clone();

        match self.clipboard.copy(&text) {
            Ok(()) => {
                info!(parameter = %name, value = %text, "copied to clipboard");
                self.status = Some(format!("Copied {name} = {text}"));
            }
            Err(e) => {
                error!(error = %e, "clipboard write failed");
                self.status = Some(format!("Copy failed: {e}"));
            }
        }
    }

    #[must_use]
    pub fn current_element(&self) -> Option<&Element> {
        self.project.elements.get(self.selected_element)
    }

    #[must_use]
    pub fn current_summary(&self) -> Option<&ParameterSummary> {
        self.session.summaries().get(self.selected_summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parameter;
    use pretty_assertions::assert_eq;
    use std::io;
    use std::rc::Rc;
    use std::cell::RefCell;

    #[derive(Clone, Default)]
    struct RecordingClipboard(Rc<RefCell<Vec<String>>>);

    impl Clipboard for RecordingClipboard {
        fn copy(&mut self, text: &str) -> io::Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn project() -> IfcProject {
        let mut project = IfcProject::new("P".into(), "IFC4".into(), "p.ifc".into());
        project.set_elements(vec![
            Element::new(1, "IFCWALL").with_parameter(Parameter::double("Length", "500 mm")),
            Element::new(2, "IFCDOOR").with_parameter(Parameter::double("Width", "900 mm")),
            Element::new(3, "IFCWALL").with_parameter(Parameter::double("Length", "300 mm")),
        ]);
        project
    }

    fn app() -> (App, RecordingClipboard) {
        let clipboard = RecordingClipboard::default();
        let app = App::new(project(), Ok(None)).with_clipboard(Box::new(clipboard.clone()));
        (app, clipboard)
    }

    fn summary_names(app: &App) -> Vec<String> {
        app.session.summaries().iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn toggling_elements_refreshes_summaries() {
        let (mut app, _) = app();
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(summary_names(&app), vec!["Length"]);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char(' '));
        assert!(app.session.summaries().is_empty());

        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.selection.ids(), &[1]);
        assert_eq!(summary_names(&app), vec!["Length"]);
    }

    #[test]
    fn select_same_type_and_clear() {
        let (mut app, _) = app();
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.selection.ids(), &[1, 3]);
        assert_eq!(app.session.summaries()[0].raw_sum, 800.0);

        app.handle_key(KeyCode::Char('c'));
        assert!(app.selection.is_empty());
        assert!(app.session.summaries().is_empty());
    }

    #[test]
    fn ratio_and_rounding_keys_update_session() {
        let (mut app, _) = app();
        app.handle_key(KeyCode::Char('t'));

        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.session.ratio(), 10.0);
        assert_eq!(app.session.summaries()[0].coefficient, 8000.0);

        for _ in 0..20 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.session.rounding(), 0);
        assert!(app.status.is_some());
    }

    #[test]
    fn copies_formatted_coefficient() {
        let (mut app, clipboard) = app();
        app.handle_key(KeyCode::Char('t'));
        app.handle_key(KeyCode::Char('['));
        app.handle_key(KeyCode::Char('y'));

        assert_eq!(clipboard.0.borrow().as_slice(), &["80.000".to_string()]);
    }

    #[test]
    fn settings_error_becomes_dismissable_notification() {
        let loaded = Err(SettingsError::NoConfigDir);
        let mut app = App::new(project(), loaded).with_clipboard(Box::new(RecordingClipboard::default()));
        assert!(app.notification.is_some());
        assert_eq!(app.session.settings(), Settings::default());

        app.handle_key(KeyCode::Char('q'));
        assert!(app.notification.is_none());
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
