//! ChannelList component: the scrollable column of channel cards.
//!
//! Owns the single `Selection` of the dashboard. Cards ask for changes by
//! emitting `Action::ToggleCard`; only `on_action` moves the selection, and
//! every card it leaves is collapsed (which also drops its modal).

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use chan_proto::channel::ChannelRecord;
use chan_proto::ratio::percent;

use crate::{
    action::Action,
    app_state::AppState,
    close_flow::CloseChannelFlow,
    component::Component,
    components::{
        channel_card::{CardPhase, CardRender, ChannelCard, SUMMARY_ROWS},
        close_modal,
    },
    theme::{C_CLOSING, C_MUTED, C_SECONDARY},
    view,
    widgets::{
        filter_input::{FilterAction, FilterInput},
        modal::is_backdrop_click,
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        status_bar::InputMode,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    Alias,
    Capacity,
    Balancedness,
    Activity,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::Default => Self::Alias,
            Self::Alias => Self::Capacity,
            Self::Capacity => Self::Balancedness,
            Self::Balancedness => Self::Activity,
            Self::Activity => Self::Default,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Default => Self::Activity,
            Self::Alias => Self::Default,
            Self::Capacity => Self::Alias,
            Self::Balancedness => Self::Capacity,
            Self::Activity => Self::Balancedness,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Alias => "alias",
            Self::Capacity => "capacity",
            Self::Balancedness => "balance",
            Self::Activity => "activity",
        }
    }
}

/// Where one card landed in the rendered line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSpan {
    /// Index into the snapshot.
    pub index: usize,
    pub start: usize,
    pub len: usize,
    /// Row of the close button, relative to `start`.
    pub close_row: Option<usize>,
}

pub struct ChannelList {
    pub list: ScrollableList<ChannelRecord>,
    pub filter_input: FilterInput,
    pub sort_order: SortOrder,
    selection: crate::selection::Selection,
    /// Parallel to `list.items`.
    cards: Vec<ChannelCard>,
    /// First visible line of the card buffer.
    scroll: usize,
    spans: Vec<CardSpan>,
    body: Rect,
    modal_rect: Option<Rect>,
}

impl Default for ChannelList {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(|c: &ChannelRecord, q: &str| channel_matches(c, q)),
            filter_input: FilterInput::new("alias, public key, channel id…"),
            sort_order: SortOrder::Default,
            selection: crate::selection::Selection::NONE,
            cards: Vec::new(),
            scroll: 0,
            spans: Vec::new(),
            body: Rect::default(),
            modal_rect: None,
        }
    }

    /// Replace the channels from a (re)loaded snapshot. The open card and the
    /// cursor follow their channel id; a modal moves along with its card.
    pub fn sync_channels(&mut self, state: &AppState) {
        let open = self
            .selection
            .open_index()
            .and_then(|i| Some((self.list.items.get(i)?.id.clone(), self.cards.get(i)?.clone())));
        let cursor_id = self.list.selected_item().map(|c| c.id.clone());

        self.list.set_items(state.snapshot.channels.clone());
        self.cards = vec![ChannelCard::new(); self.list.total_len()];

        let reopened = open.and_then(|(id, card)| {
            let idx = state.snapshot.position_of(&id)?;
            self.cards[idx] = card;
            Some(idx)
        });
        self.selection.set(reopened);

        self.apply_sort();
        if let Some(pos) = cursor_id.and_then(|id| state.snapshot.position_of(&id)) {
            self.list.set_selected_by_original(pos);
        }
    }

    fn apply_sort(&mut self) {
        let current = self.list.selected_original_index();
        self.list.rebuild_filter();
        match self.sort_order {
            SortOrder::Default => {}
            SortOrder::Alias => self.list.sort_by(|a, b| {
                a.display_alias()
                    .to_lowercase()
                    .cmp(&b.display_alias().to_lowercase())
            }),
            SortOrder::Capacity => self.list.sort_by(|a, b| b.capacity.cmp(&a.capacity)),
            SortOrder::Balancedness => self.list.sort_by(|a, b| {
                percent(b.local_balance, b.remote_balance)
                    .total_cmp(&percent(a.local_balance, a.remote_balance))
            }),
            SortOrder::Activity => self.list.sort_by(|a, b| {
                percent(b.received, b.sent).total_cmp(&percent(a.received, a.sent))
            }),
        }
        if let Some(orig) = current {
            self.list.set_selected_by_original(orig);
        }
    }

    pub fn selection(&self) -> crate::selection::Selection {
        self.selection
    }

    pub fn phase_of(&self, index: usize) -> CardPhase {
        self.cards
            .get(index)
            .map(|c| c.phase(self.selection.is_open(index)))
            .unwrap_or(CardPhase::Collapsed)
    }

    /// The close flow of the open card, if its modal is showing.
    pub fn open_flow(&self) -> Option<&CloseChannelFlow> {
        let idx = self.selection.open_index()?;
        self.cards.get(idx)?.flow()
    }

    fn open_flow_mut(&mut self) -> Option<&mut CloseChannelFlow> {
        let idx = self.selection.open_index()?;
        self.cards.get_mut(idx)?.flow_mut()
    }

    pub fn modal_open(&self) -> bool {
        self.open_flow().is_some()
    }

    pub fn input_mode(&self) -> InputMode {
        if self.modal_open() {
            InputMode::Modal
        } else if self.filter_input.is_active() {
            InputMode::Filter
        } else {
            InputMode::Normal
        }
    }

    pub fn filter_query(&self) -> &str {
        self.list.filter.as_str()
    }

    pub fn card_spans(&self) -> &[CardSpan] {
        &self.spans
    }

    fn toggle(&mut self, index: usize) {
        if index >= self.cards.len() {
            return;
        }
        let change = self.selection.toggle(index);
        if let Some(card) = change.collapsed.and_then(|c| self.cards.get_mut(c)) {
            card.collapse();
        }
    }

    fn open_close_modal(&mut self, index: usize, state: &AppState) -> Vec<Action> {
        if !self.selection.is_open(index) {
            return vec![];
        }
        let Some(record) = self.list.items.get(index) else {
            return vec![];
        };
        if !self.list.filtered_indices.contains(&index) {
            return vec![Action::Notify(
                "the expanded channel is hidden by the filter".into(),
            )];
        }
        let panel = view::details(record, &state.display, state.capability);
        let Some(close) = panel.close_action else {
            return vec![Action::Notify("closing channels needs admin access".into())];
        };
        if let Some(card) = self.cards.get_mut(index) {
            card.open_modal(true, &close);
        }
        vec![]
    }

    /// Render every visible card into one line buffer.
    pub fn layout(&self, state: &AppState, width: u16) -> (Vec<Line<'static>>, Vec<CardSpan>) {
        let mut lines = Vec::new();
        let mut spans = Vec::with_capacity(self.list.len());
        for (pos, &idx) in self.list.filtered_indices.iter().enumerate() {
            if pos > 0 {
                lines.push(Line::default());
            }
            let out = CardRender {
                record: &self.list.items[idx],
                ctx: &state.display,
                capability: state.capability,
                expanded: self.selection.is_open(idx),
                is_cursor: pos == self.list.selected,
                width,
            }
            .lines();
            spans.push(CardSpan {
                index: idx,
                start: lines.len(),
                len: out.lines.len(),
                close_row: out.close_row,
            });
            lines.extend(out.lines);
        }
        (lines, spans)
    }

    /// Scroll so the cursor card is on screen, showing its top when it is
    /// taller than the viewport.
    fn ensure_visible(&mut self, height: usize) {
        let Some(span) = self.spans.get(self.list.selected) else {
            self.scroll = 0;
            return;
        };
        if span.start < self.scroll {
            self.scroll = span.start;
        } else if span.start + span.len > self.scroll + height {
            self.scroll = (span.start + span.len).saturating_sub(height).min(span.start);
        }
    }

    fn span_at(&self, col: u16, row: u16) -> Option<(CardSpan, usize)> {
        let b = self.body;
        if col < b.x || col >= b.x + b.width || row < b.y || row >= b.y + b.height {
            return None;
        }
        let line = self.scroll + (row - b.y) as usize;
        self.spans
            .iter()
            .find(|s| line >= s.start && line < s.start + s.len)
            .map(|s| (*s, line - s.start))
    }

    /// Draw the open card's modal over the whole screen.
    pub fn draw_modal(&mut self, frame: &mut Frame, screen: Rect) {
        self.modal_rect = self
            .open_flow()
            .map(|flow| close_modal::draw(frame, screen, flow));
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Up => return vec![Action::CursorUp(1)],
            KeyCode::Down => return vec![Action::CursorDown(1)],
            _ => {}
        }
        match self.filter_input.handle_key(key) {
            FilterAction::Changed(q) => {
                self.list.set_filter(&q);
                self.apply_sort();
                vec![]
            }
            FilterAction::Confirmed => vec![Action::CloseFilter],
            FilterAction::Cancelled => {
                self.list.set_filter("");
                self.apply_sort();
                vec![Action::CloseFilter]
            }
        }
    }
}

fn channel_matches(channel: &ChannelRecord, q: &str) -> bool {
    if q.trim().is_empty() {
        return true;
    }
    let text = channel.search_text();
    q.to_lowercase()
        .split_whitespace()
        .all(|term| text.contains(term))
}

impl Component for ChannelList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if let Some(flow) = self.open_flow_mut() {
            return close_modal::handle_key(flow, key);
        }

        if self.filter_input.is_active() {
            return self.handle_filter_key(key);
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => return vec![Action::CursorUp(step)],
            KeyCode::Down | KeyCode::Char('j') => return vec![Action::CursorDown(step)],
            KeyCode::PageUp => return vec![Action::CursorUp(10)],
            KeyCode::PageDown => return vec![Action::CursorDown(10)],
            KeyCode::Home | KeyCode::Char('g') => return vec![Action::CursorFirst],
            KeyCode::End | KeyCode::Char('G') => return vec![Action::CursorLast],

            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(idx) = self.list.selected_original_index() {
                    return vec![Action::ToggleCard(idx)];
                }
            }

            KeyCode::Char('x') => {
                return match self.selection.open_index() {
                    Some(idx) => vec![Action::OpenCloseModal(idx)],
                    None => vec![Action::Notify("expand a channel first".into())],
                };
            }

            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }
            KeyCode::Esc if !self.list.filter.is_empty() => {
                self.filter_input.clear();
                self.list.set_filter("");
                self.apply_sort();
            }

            KeyCode::Char('s') => return vec![Action::CycleSort],
            KeyCode::Char('S') => return vec![Action::CycleSortReverse],

            KeyCode::Char('y') => {
                if let Some(c) = self.list.selected_item() {
                    return vec![Action::CopyToClipboard(c.id.clone())];
                }
            }
            KeyCode::Char('Y') => {
                if let Some(c) = self.list.selected_item() {
                    return match state.display.links.transaction(&c.transaction_id) {
                        Some(link) => vec![Action::CopyToClipboard(link)],
                        None => vec![Action::Notify("no funding transaction".into())],
                    };
                }
            }

            _ => {}
        }

        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _state: &AppState) -> Vec<Action> {
        if self.modal_open() {
            let outside = self
                .modal_rect
                .map(|m| is_backdrop_click(m, event.column, event.row))
                .unwrap_or(false);
            if outside && event.kind == MouseEventKind::Down(MouseButton::Left) {
                return vec![Action::DismissModal];
            }
            return vec![];
        }

        match event.kind {
            MouseEventKind::ScrollUp => vec![Action::CursorUp(1)],
            MouseEventKind::ScrollDown => vec![Action::CursorDown(1)],
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((span, row)) = self.span_at(event.column, event.row) else {
                    return vec![];
                };
                self.list.set_selected_by_original(span.index);
                if row < SUMMARY_ROWS {
                    vec![Action::ToggleCard(span.index)]
                } else if span.close_row == Some(row) {
                    vec![Action::OpenCloseModal(span.index)]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::ToggleCard(idx) => {
                self.list.set_selected_by_original(*idx);
                self.toggle(*idx);
            }
            Action::OpenCloseModal(idx) => return self.open_close_modal(*idx, state),
            Action::DismissModal => {
                if let Some(card) = self
                    .selection
                    .open_index()
                    .and_then(|i| self.cards.get_mut(i))
                {
                    card.dismiss_modal();
                }
            }
            Action::CloseFinished {
                channel_id,
                outcome,
            } => {
                for card in &mut self.cards {
                    if card.finish_close(channel_id, outcome) {
                        break;
                    }
                }
            }
            Action::CursorUp(n) => self.list.select_up(*n),
            Action::CursorDown(n) => self.list.select_down(*n),
            Action::CursorFirst => self.list.select_first(),
            Action::CursorLast => self.list.select_last(),
            Action::CycleSort => {
                self.sort_order = self.sort_order.next();
                self.apply_sort();
            }
            Action::CycleSortReverse => {
                self.sort_order = self.sort_order.prev();
                self.apply_sort();
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let info = format!(
            "{}/{} · sort: {}",
            self.list.len(),
            self.list.total_len(),
            self.sort_order.label()
        );
        let badge = state.snapshot_error.as_ref().map(|_| Badge {
            text: "STALE",
            color: C_CLOSING,
        });
        let block = pane_chrome("Channels", Some(info), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let show_filter = self.filter_input.is_active() || !self.list.filter.is_empty();
        let (body, filter_area) = if show_filter && inner.height > 1 {
            (
                Rect {
                    height: inner.height - 1,
                    ..inner
                },
                Some(Rect {
                    y: inner.y + inner.height - 1,
                    height: 1,
                    ..inner
                }),
            )
        } else {
            (inner, None)
        };
        self.body = body;

        if self.list.is_empty() {
            self.spans.clear();
            self.scroll = 0;
            let message = if self.list.total_len() == 0 {
                format!(" no channels in {}", state.snapshot_path.display())
            } else {
                format!(" no channels match \"{}\"", self.list.filter)
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    message,
                    Style::default().fg(C_MUTED),
                ))),
                body,
            );
        } else {
            let (lines, spans) = self.layout(state, body.width);
            self.spans = spans;
            self.ensure_visible(body.height as usize);
            let scroll = u16::try_from(self.scroll).unwrap_or(u16::MAX);
            frame.render_widget(
                Paragraph::new(lines)
                    .style(Style::default().fg(C_SECONDARY))
                    .scroll((scroll, 0)),
                body,
            );
        }

        if let Some(fa) = filter_area {
            self.filter_input
                .draw(frame, fa, self.list.len(), self.list.total_len());
        }
    }
}
