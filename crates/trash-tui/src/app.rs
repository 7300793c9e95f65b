//! App: the host shell. Owns the terminal, the event loop and every
//! component, and performs the side effects components ask for.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use chrono::Local;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use trash_proto::{config::Config, TrashClient};

use crate::{
    action::{Action, ApiRequest},
    app_state::AppState,
    commands::HostCommand,
    component::Component,
    components::{confirm_dialog::ConfirmDialog, help_overlay::HelpOverlay, trash_panel::TrashPanel},
    effects::{self, ApiOutcome},
    icons::resolver_for,
    periodic::{PeriodicTask, RefreshTick},
    theme::{C_BG, C_PRIMARY, C_SECONDARY, C_SEPARATOR},
    widgets::{
        command_input::{CommandInput, PromptAction},
        details::draw_details,
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// A spawned request finished.
    Api(ApiOutcome),
}

pub struct App {
    client: TrashClient,
    state: AppState,
    panel: TrashPanel,
    confirm: ConfirmDialog,
    help: HelpOverlay,
    prompt: CommandInput,
    toast: ToastManager,
    sidebar_width: u16,
    start_visible: bool,
    should_quit: bool,
    tick_rx: mpsc::Receiver<RefreshTick>,
    msg_tx: Option<mpsc::Sender<AppMessage>>,
    panel_area: Rect,
}

impl App {
    pub fn new(client: TrashClient, config: &Config) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel(4);
        let period = Duration::from_secs(config.panel.refresh_interval_secs.max(1));
        let timer = PeriodicTask::new(period, tick_tx, RefreshTick);

        Self {
            client,
            state: AppState::new(config.server.base_url.clone()),
            panel: TrashPanel::new(resolver_for(config.panel.icons), timer),
            confirm: ConfirmDialog::new(),
            help: HelpOverlay::new(),
            prompt: CommandInput::new("trash:refresh | trash:empty"),
            toast: ToastManager::new(),
            sidebar_width: config.panel.sidebar_width,
            start_visible: config.panel.start_visible,
            should_quit: false,
            tick_rx,
            msg_tx: None,
            panel_area: Rect::default(),
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.msg_tx = Some(tx.clone());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Register components with the shell ────────────────────────────────
        let mounted = self.panel.mount(&self.state);
        self.dispatch_all(mounted);
        if self.start_visible {
            let shown = self.set_panel_visible(true);
            self.dispatch_all(shown);
        }

        // Toast expiry check
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                Some(RefreshTick) = self.tick_rx.recv() => {
                    needs_redraw = self.on_refresh_tick();
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.panel.dispose();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("trashpanel exiting");

        Ok(())
    }

    /// Timer tick from the panel. A tick queued before a hide must not fetch.
    fn on_refresh_tick(&mut self) -> bool {
        if !self.state.panel_visible {
            debug!("refresh tick while hidden, ignored");
            return false;
        }
        debug!("refresh tick");
        self.dispatch_all(vec![Action::Refresh]);
        true
    }

    /// Returns true when the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                let actions = self.handle_key(key);
                self.dispatch_all(actions);
                true
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                let actions = self.handle_mouse(mouse);
                let redraw = !actions.is_empty() || !matches!(mouse.kind, MouseEventKind::Moved);
                self.dispatch_all(actions);
                redraw
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Api(outcome) => {
                self.state.in_flight = self.state.in_flight.saturating_sub(1);
                if matches!(outcome, ApiOutcome::Listed(Ok(_))) {
                    self.state.last_refresh = Some(Local::now());
                }
                let actions = self.panel.on_api_outcome(outcome);
                self.dispatch_all(actions);
                true
            }
        }
    }

    // ── Input routing ─────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Modal layers, topmost first.
        if self.confirm.is_open() {
            return self.confirm.handle_key(key, &self.state);
        }
        if self.help.is_visible() {
            return self.help.handle_key(key, &self.state);
        }
        if self.prompt.is_active() {
            return match self.prompt.handle_key(key) {
                PromptAction::Submitted(text) => run_prompt(&text),
                PromptAction::Cancelled | PromptAction::None => vec![],
            };
        }
        if self.state.panel_visible && self.panel.is_menu_open() {
            return self.panel.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('t') => return vec![Action::TogglePanel],
            KeyCode::Char(':') => return vec![Action::OpenCommandPrompt],
            _ => {}
        }

        if self.state.panel_visible {
            self.panel.handle_key(key, &self.state)
        } else {
            vec![]
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if self.confirm.is_open() {
            return self.confirm.handle_mouse(event, Rect::default(), &self.state);
        }
        if self.help.is_visible() {
            if let MouseEventKind::Down(MouseButton::Left) = event.kind {
                self.help.hide();
            }
            return vec![];
        }
        if self.state.panel_visible {
            return self.panel.handle_mouse(event, self.panel_area, &self.state);
        }
        vec![]
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    /// Run actions to completion, including the follow-ups they produce.
    fn dispatch_all(&mut self, actions: Vec<Action>) {
        let mut queue: VecDeque<Action> = actions.into();
        while let Some(action) = queue.pop_front() {
            debug!("apply_action: {:?}", action);
            queue.extend(self.apply_action(action));
        }
        self.sync_input_mode();
    }

    fn apply_action(&mut self, action: Action) -> Vec<Action> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                vec![]
            }
            Action::ToggleHelp => self.help.on_action(&action, &self.state),
            Action::TogglePanel => self.set_panel_visible(!self.state.panel_visible),
            Action::OpenCommandPrompt => {
                self.prompt.activate();
                vec![]
            }
            Action::RunCommand(cmd) => {
                info!("running command {}", cmd.id());
                vec![cmd.action()]
            }
            // No listing is fetched while the panel is hidden.
            Action::Refresh if !self.state.panel_visible => vec![Action::Notify(
                Severity::Info,
                "Trash panel is hidden; press t to show it".to_string(),
            )],
            Action::Refresh | Action::EmptyTrash => self.panel.on_action(&action, &self.state),
            Action::Confirm(_) => self.confirm.on_action(&action, &self.state),
            Action::Api(request) => {
                self.spawn_request(request);
                vec![]
            }
            Action::Notify(severity, message) => {
                self.toast.push(message, severity);
                vec![]
            }
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
                vec![]
            }
        }
    }

    fn set_panel_visible(&mut self, visible: bool) -> Vec<Action> {
        self.state.panel_visible = visible;
        self.panel.on_visibility_change(visible, &self.state)
    }

    fn spawn_request(&mut self, request: ApiRequest) {
        let Some(tx) = self.msg_tx.clone() else {
            warn!("dropping {:?}: event loop not running", request);
            return;
        };
        self.state.in_flight += 1;
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = effects::execute(&client, request).await;
            if tx.send(AppMessage::Api(outcome)).await.is_err() {
                debug!("event loop gone before request finished");
            }
        });
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.confirm.is_open() {
            InputMode::Confirm
        } else if self.prompt.is_active() {
            InputMode::Command
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        // ── Outer layout: title | body | statusbar ───────────────────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    " trashpanel ",
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ),
                Span::styled("│ ", Style::default().fg(C_SEPARATOR)),
                Span::styled(self.state.server_url.as_str(), Style::default().fg(C_SECONDARY)),
            ])),
            outer[0],
        );

        // ── Body: sidebar slot | details ─────────────────────────────────────
        let body = outer[1];
        let details_area = if self.state.panel_visible {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Length(self.sidebar_width.min(body.width)),
                    Constraint::Min(0),
                ])
                .split(body);
            let focused = !self.confirm.is_open() && !self.help.is_visible();
            self.panel.draw(frame, cols[0], focused, &self.state);
            self.panel_area = cols[0];
            cols[1]
        } else {
            self.panel_area = Rect::default();
            body
        };
        let cursor_entry = if self.state.panel_visible {
            self.panel.cursor_entry()
        } else {
            None
        };
        draw_details(frame, details_area, cursor_entry, self.panel.icons());

        // ── Status bar / command prompt ───────────────────────────────────────
        if self.prompt.is_active() {
            self.prompt.draw(frame, outer[2]);
        } else {
            status_bar::draw_keys_bar(
                frame,
                outer[2],
                self.state.input_mode,
                self.state.in_flight,
                self.state.last_refresh,
            );
        }

        // ── Overlays (on top of everything) ──────────────────────────────────
        self.help.draw(frame, area, false, &self.state);
        self.confirm.draw(frame, area, true, &self.state);
        self.toast.draw(frame, area);
    }
}

/// Turn submitted prompt text into actions.
fn run_prompt(text: &str) -> Vec<Action> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }
    match HostCommand::parse(text) {
        Some(cmd) => vec![Action::RunCommand(cmd)],
        None => vec![Action::Notify(
            Severity::Warning,
            format!("unknown command: {}", text),
        )],
    }
}
