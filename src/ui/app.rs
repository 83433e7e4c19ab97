use std::mem;

use crossterm::event::KeyCode;
use log::{debug, warn};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::db::LoadStatus;
use crate::error::InputError;
use crate::session::{
    confirms_reload, confirms_save, parse_delete_target, DeleteOutcome, MenuChoice, Session,
};

use super::forms::{CdField, CdForm, TextPrompt};
use super::helpers::{centered_rect, record_row, surface_error, COLUMN_WIDTHS};

const BANNER: &str = "The Magic CD Inventory";
/// Rows reserved for the banner at the top of the screen.
const BANNER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the menu column on the left.
const MENU_WIDTH: u16 = 34;
const MENU_PROMPT: &str = "Which operation would you like to perform? [L, A, I, D, S or X]";

/// What the keyboard is currently driving.
enum Mode {
    Normal,
    AddingCd(CdForm),
    DeletingCd(TextPrompt),
    ConfirmReload(TextPrompt),
    ConfirmSave(TextPrompt),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    session: Session,
    mode: Mode,
    status: Option<StatusMessage>,
    table: TableState,
}

impl App {
    /// Wrap a session. `startup` is the result of the initial load, if one
    /// was attempted, and becomes the first footer message.
    pub fn new(session: Session, startup: Option<LoadStatus>) -> Self {
        let mut app = Self {
            session,
            mode: Mode::Normal,
            status: None,
            table: TableState::default(),
        };
        match startup {
            Some(status) => app.report_load(status),
            None => app.set_status("Starting with an empty inventory.", StatusKind::Info),
        }
        app.ensure_selection_in_bounds();
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Feed one key press into the current mode. Returns `true` once the user
    /// asked to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingCd(form) => self.handle_add_cd(code, form),
            Mode::DeletingCd(prompt) => self.handle_delete_prompt(code, prompt),
            Mode::ConfirmReload(prompt) => self.handle_confirm_reload(code, prompt),
            Mode::ConfirmSave(prompt) => self.handle_confirm_save(code, prompt),
        };

        self.ensure_selection_in_bounds();
        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let choice = match code {
            KeyCode::Up => {
                self.move_selection(-1);
                return Mode::Normal;
            }
            KeyCode::Down => {
                self.move_selection(1);
                return Mode::Normal;
            }
            KeyCode::Char(ch) => MenuChoice::from_key(ch),
            _ => None,
        };

        let Some(choice) = choice else {
            debug!("ignoring key {code:?} outside the menu");
            self.set_status(MENU_PROMPT, StatusKind::Error);
            return Mode::Normal;
        };

        debug!("menu choice {choice:?}");
        self.clear_status();
        match choice {
            MenuChoice::Exit => {
                if self.session.has_unsaved_changes() {
                    warn!("exiting with unsaved changes");
                }
                *exit = true;
                Mode::Normal
            }
            MenuChoice::Load => Mode::ConfirmReload(TextPrompt::default()),
            MenuChoice::Add => Mode::AddingCd(CdForm::with_id(self.session.next_id().id)),
            MenuChoice::Display => {
                let count = self.session.records().len();
                self.set_status(
                    format!("The current inventory holds {count} CD(s)."),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            MenuChoice::Delete => Mode::DeletingCd(TextPrompt::default()),
            MenuChoice::Save => Mode::ConfirmSave(TextPrompt::default()),
        }
    }

    fn handle_add_cd(&mut self, code: KeyCode, mut form: CdForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("CD not added.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter if form.active == CdField::Title => form.toggle_field(),
            KeyCode::Enter => {
                let (record, anomaly) = self.session.add(&form.title, &form.artist);
                match anomaly {
                    Some(anomaly) => self.set_status(
                        format!("CD #{} added, but {anomaly}.", record.id),
                        StatusKind::Error,
                    ),
                    None => self.set_status(format!("CD {record} added."), StatusKind::Info),
                }
                self.select_last();
                return Mode::Normal;
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Mode::AddingCd(form)
    }

    fn handle_delete_prompt(&mut self, code: KeyCode, mut prompt: TextPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("No CD deleted.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter => {
                match parse_delete_target(&prompt.input) {
                    Ok(target) => match self.session.delete(target) {
                        DeleteOutcome::Deleted(_) => {
                            self.set_status(format!("CD #{target} deleted."), StatusKind::Info)
                        }
                        DeleteOutcome::NotFound(_) => {
                            self.set_status(format!("CD #{target} not found."), StatusKind::Error)
                        }
                    },
                    Err(InputError::OutOfRange(value)) => {
                        self.set_status(format!("CD #{value} not found."), StatusKind::Error)
                    }
                    Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                }
                Mode::Normal
            }
            KeyCode::Backspace => {
                prompt.backspace();
                Mode::DeletingCd(prompt)
            }
            KeyCode::Char(ch) => {
                prompt.push_char(ch);
                Mode::DeletingCd(prompt)
            }
            _ => Mode::DeletingCd(prompt),
        }
    }

    fn handle_confirm_reload(&mut self, code: KeyCode, mut prompt: TextPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelling... Inventory data NOT reloaded.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter => {
                if confirms_reload(&prompt.input) {
                    let status = self.session.load();
                    self.report_load(status);
                    self.table.select(None);
                } else {
                    self.set_status("Cancelling... Inventory data NOT reloaded.", StatusKind::Info);
                }
                Mode::Normal
            }
            KeyCode::Backspace => {
                prompt.backspace();
                Mode::ConfirmReload(prompt)
            }
            KeyCode::Char(ch) => {
                prompt.push_char(ch);
                Mode::ConfirmReload(prompt)
            }
            _ => Mode::ConfirmReload(prompt),
        }
    }

    fn handle_confirm_save(&mut self, code: KeyCode, mut prompt: TextPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("The inventory was NOT saved to file.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter => {
                if !confirms_save(&prompt.input) {
                    self.set_status("The inventory was NOT saved to file.", StatusKind::Info);
                    return Mode::Normal;
                }
                match self.session.save() {
                    Ok(count) => self.set_status(
                        format!(
                            "The inventory was saved to file ({count} CD(s) in {}).",
                            self.session.data_file().display()
                        ),
                        StatusKind::Info,
                    ),
                    Err(err) => self.set_status(
                        format!("File not saved: {}", surface_error(&err)),
                        StatusKind::Error,
                    ),
                }
                Mode::Normal
            }
            KeyCode::Backspace => {
                prompt.backspace();
                Mode::ConfirmSave(prompt)
            }
            KeyCode::Char(ch) => {
                prompt.push_char(ch);
                Mode::ConfirmSave(prompt)
            }
            _ => Mode::ConfirmSave(prompt),
        }
    }

    fn report_load(&mut self, status: LoadStatus) {
        match status {
            LoadStatus::Loaded(count) => self.set_status(
                format!(
                    "Inventory Loaded. {count} CD(s) read from {}.",
                    self.session.data_file().display()
                ),
                StatusKind::Info,
            ),
            LoadStatus::Missing => {
                self.set_status("File not found. Inventory is still empty.", StatusKind::Info)
            }
            LoadStatus::Unreadable(err) => self.set_status(
                format!(
                    "Could not read {}: {}. Inventory is still empty.",
                    self.session.data_file().display(),
                    surface_error(&err)
                ),
                StatusKind::Error,
            ),
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.session.records().len();
        if len == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0) as isize;
        let next = (current + offset).clamp(0, len as isize - 1);
        self.table.select(Some(next as usize));
    }

    fn select_last(&mut self) {
        let len = self.session.records().len();
        self.table.select(len.checked_sub(1));
    }

    fn ensure_selection_in_bounds(&mut self) {
        let len = self.session.records().len();
        match self.table.selected() {
            Some(_) if len == 0 => self.table.select(None),
            Some(selected) if selected >= len => self.table.select(Some(len - 1)),
            _ => {}
        }
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(BANNER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_banner(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_menu(frame, body[0]);
        self.draw_inventory(frame, body[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Normal => {}
            Mode::AddingCd(form) => draw_cd_form(frame, area, form),
            Mode::DeletingCd(prompt) => draw_prompt(
                frame,
                area,
                "Delete CD",
                "Which ID would you like to delete?",
                prompt,
            ),
            Mode::ConfirmReload(prompt) => draw_prompt(
                frame,
                area,
                "Load Inventory",
                "WARNING: all unsaved data will be lost. Type 'yes' to reload from file.",
                prompt,
            ),
            Mode::ConfirmSave(prompt) => draw_prompt(
                frame,
                area,
                "Save Inventory",
                "Save this inventory to file? [y/n]",
                prompt,
            ),
        }
    }

    fn draw_banner(&self, frame: &mut Frame, area: Rect) {
        let mut title = vec![Span::styled(
            BANNER,
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.session.has_unsaved_changes() {
            title.push(Span::styled(
                "  (unsaved changes)",
                Style::default().fg(Color::Yellow),
            ));
        }
        let banner = Paragraph::new(Line::from(title))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(banner, area);
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let lines: Vec<Line> = MenuChoice::ALL
            .iter()
            .map(|choice| {
                Line::from(vec![
                    Span::styled(format!("[{}]", choice.key()), key_style),
                    Span::raw(format!(" {}", choice.label())),
                ])
            })
            .collect();
        let menu = Paragraph::new(lines).block(Block::default().title(" MENU ").borders(Borders::ALL));
        frame.render_widget(menu, area);
    }

    fn draw_inventory(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" The Current Inventory ")
            .borders(Borders::ALL);

        if self.session.records().is_empty() {
            let message = Paragraph::new("No CDs yet. Press 'A' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(vec!["ID", "CD Title", "Artist"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let rows: Vec<Row> = self.session.records().iter().map(record_row).collect();
        let table = Table::new(rows, COLUMN_WIDTHS)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(table, area, &mut self.table);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = Line::from(Span::styled(
            format!("{} | {}", MENU_PROMPT, self.session.data_file().display()),
            Style::default().fg(Color::Gray),
        ));

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

fn draw_cd_form(frame: &mut Frame, area: Rect, form: &CdForm) {
    let popup_area = centered_rect(60, 40, area);
    frame.render_widget(Clear, popup_area);

    let title = format!("Add CD #{}", form.id);
    let block = Block::default().title(title).borders(Borders::ALL);
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let lines = vec![
        form.build_line("Title", CdField::Title),
        form.build_line("Artist", CdField::Artist),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to continue/save | Tab to switch | Esc to cancel",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

    let (prefix, row, field) = match form.active {
        CdField::Title => ("Title: ", 0, CdField::Title),
        CdField::Artist => ("Artist: ", 1, CdField::Artist),
    };
    frame.set_cursor_position((
        inner.x + prefix.len() as u16 + form.value_len(field) as u16,
        inner.y + row,
    ));
}

fn draw_prompt(frame: &mut Frame, area: Rect, title: &str, question: &str, prompt: &TextPrompt) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let lines = vec![
        Line::from(Span::raw(format!("> {}", prompt.input))),
        Line::from(""),
        Line::from(question.to_string()),
        Line::from(Span::styled(
            "Enter to confirm | Esc to cancel",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    frame.set_cursor_position((inner.x + 2 + prompt.len() as u16, inner.y));
}
