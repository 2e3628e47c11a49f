//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks
//!   (terminal input, snapshot watcher).
//! - The event loop draws each frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; App broadcasts each Action to every
//!   component, then applies it at app level. Follow-up actions go back on the queue.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

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
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use chan_proto::channel::ChannelSnapshot;

use crate::{
    action::{Action, CloseOutcome},
    app_state::AppState,
    close_flow::ChannelCloser,
    component::Component,
    components::{channel_list::ChannelList, header::Header, help_overlay::HelpOverlay},
    theme::C_BG,
    watcher,
    widgets::{status_bar::draw_keys_bar, status_bar::InputMode, toast::ToastManager},
};

/// Upper bound on actions produced by one input event.
const MAX_CHAINED_ACTIONS: usize = 64;

/// Messages from background tasks.
#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    SnapshotLoaded(ChannelSnapshot),
    SnapshotError(String),
}

pub struct App {
    pub state: AppState,
    header: Header,
    pub channel_list: ChannelList,
    pub help_overlay: HelpOverlay,
    pub toast: ToastManager,
    closer: Box<dyn ChannelCloser + Send>,
    /// Debounce for snapshot reloads; `None` disables watching.
    reload_debounce: Option<Duration>,
    should_quit: bool,
}

impl App {
    pub fn new(
        state: AppState,
        closer: Box<dyn ChannelCloser + Send>,
        reload_debounce: Option<Duration>,
    ) -> Self {
        let mut channel_list = ChannelList::new();
        channel_list.sync_channels(&state);
        Self {
            state,
            header: Header::new(),
            channel_list,
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            closer,
            reload_debounce,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
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

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        // Polls with a timeout so the thread notices the loop has exited.
        tokio::task::spawn_blocking(move || {
            while !event_tx.is_closed() {
                match event::poll(Duration::from_millis(200)) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(_) => break,
                }
                match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        // ── Background task: snapshot watcher ─────────────────────────────────
        if let Some(debounce) = self.reload_debounce {
            watcher::spawn(self.state.snapshot_path.clone(), debounce, tx.clone());
        }

        // ── Periodic timers ───────────────────────────────────────────────────
        // Toast expiry
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Relative dates ("3 minutes ago")
        let mut clock = tokio::time::interval(Duration::from_secs(1));
        clock.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        let result = loop {
            if needs_redraw {
                if let Err(e) = terminal.draw(|f| self.draw(f)) {
                    break Err(e.into());
                }
            }

            if self.should_quit {
                break Ok(());
            }

            needs_redraw = tokio::select! {
                Some(msg) = rx.recv() => self.handle_message(msg),
                _ = ui_tick.tick() => self.toast.tick(),
                _ = clock.tick() => {
                    self.state.display.now = chrono::Utc::now();
                    self.channel_list.selection().open_index().is_some()
                }
            };
        };

        // ── Teardown ──────────────────────────────────────────────────────────
        drop(rx);
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("chandash exiting");

        result
    }

    // ── Message handler ───────────────────────────────────────────────────────

    /// Returns `true` if the message requires a redraw.
    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a);
                    }
                    self.state.input_mode = self.channel_list.input_mode();
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for a in actions {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => return false,
            },

            AppMessage::SnapshotLoaded(snapshot) => {
                info!("snapshot reloaded: {} channels", snapshot.len());
                self.toast
                    .info(format!("snapshot reloaded ({} channels)", snapshot.len()));
                self.state.snapshot = snapshot;
                self.state.snapshot_error = None;
                self.channel_list.sync_channels(&self.state);
                self.state.input_mode = self.channel_list.input_mode();
            }

            AppMessage::SnapshotError(err) => {
                self.toast.error(format!("snapshot reload failed: {}", err));
                self.state.snapshot_error = Some(err);
            }
        }
        true
    }

    // ── Input routing ─────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                _ => {}
            }
        }

        self.channel_list.handle_key(key, &self.state)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Action> {
        if self.help_overlay.visible {
            return match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => vec![Action::ToggleHelp],
                _ => vec![],
            };
        }
        self.channel_list.handle_mouse(mouse, &self.state)
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    /// Broadcast `action` to every component, apply it at app level, then
    /// process whatever follow-up actions came back.
    pub fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        let mut budget = MAX_CHAINED_ACTIONS;

        while let Some(action) = queue.pop_front() {
            if budget == 0 {
                warn!("dropping chained action {:?}", action);
                break;
            }
            budget -= 1;

            let s = &self.state;
            queue.extend(self.header.on_action(&action, s));
            queue.extend(self.channel_list.on_action(&action, s));
            queue.extend(self.help_overlay.on_action(&action, s));
            queue.extend(self.apply_action(action));
        }

        self.state.input_mode = self.channel_list.input_mode();
    }

    fn apply_action(&mut self, action: Action) -> Vec<Action> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }

            Action::SubmitClose(request) => {
                let outcome = match self.closer.close(&request) {
                    Ok(receipt) => {
                        info!(channel_id = %receipt.channel_id, "close accepted");
                        self.toast.success(receipt.message.clone());
                        CloseOutcome::Closed(receipt.message)
                    }
                    Err(e) => {
                        warn!(channel_id = %request.channel_id, "close failed: {}", e);
                        self.toast.error(format!("close failed: {}", e));
                        CloseOutcome::Failed(e.to_string())
                    }
                };
                return vec![Action::CloseFinished {
                    channel_id: request.channel_id,
                    outcome,
                }];
            }

            Action::Notify(message) => self.toast.info(message),

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        // Truncate for toast display
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
            }

            Action::ToggleCard(_)
            | Action::OpenCloseModal(_)
            | Action::DismissModal
            | Action::CloseFinished { .. }
            | Action::CursorUp(_)
            | Action::CursorDown(_)
            | Action::CursorFirst
            | Action::CursorLast
            | Action::OpenFilter
            | Action::CloseFilter
            | Action::CycleSort
            | Action::CycleSortReverse
            | Action::ToggleHelp
            | Action::Resize(_, _) => {}
        }
        vec![]
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let list_focused = !self.help_overlay.visible;
        self.header.draw(frame, rows[0], false, &self.state);
        self.channel_list
            .draw(frame, rows[1], list_focused, &self.state);
        draw_keys_bar(
            frame,
            rows[2],
            self.state.input_mode,
            self.state.capability.is_admin(),
        );

        self.channel_list.draw_modal(frame, area);
        self.help_overlay.draw(frame, area, true, &self.state);
        self.toast.draw(frame, area);
    }
}
