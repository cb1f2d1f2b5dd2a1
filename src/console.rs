//! Interactive claim console using ratatui + crossterm.
//!
//! Shows one page of claims with accept/reject confirmation dialogs, a
//! requester detail dialog and a notice log. Gateway calls run on spawned
//! tasks and report back over a channel, so the screen keeps rendering while
//! a request is in flight.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use claimdesk::{
    resume_resolution, run_resolution, ClaimDeskHttpClient, ClaimList, ClaimPage, ClaimsRequest,
    FlowState, LoadStep, LookupOutcome, LookupTicket, Notice, NoticeLevel, Resolution,
    ResolutionError, ResolutionFlows, ResolutionPlan, StalledResolution, UserDetails, UserLookup,
    LOAD_ERROR_MESSAGE, LOOKUP_ERROR_MESSAGE,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::output::{format_timestamp, pagination_footer, user_fields};

/// Target render interval (10 FPS).
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Maximum notices retained in the log panel.
const MAX_NOTICES: usize = 200;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Gateway work requested by the console state.
#[derive(Debug)]
pub enum Action {
    Load {
        page: u32,
        epoch: u64,
        request: ClaimsRequest,
    },
    Resolve(ResolutionPlan),
    Resume(ResolutionPlan),
    FetchUser(LookupTicket),
}

/// Result of an [`Action`], delivered back to the event loop.
#[derive(Debug)]
pub enum TaskResult {
    Loaded {
        page: u32,
        epoch: u64,
        result: claimdesk::Result<ClaimPage>,
    },
    Resolved {
        plan: ResolutionPlan,
        result: Result<(), ResolutionError>,
    },
    /// Claim step retried for a stalled resolution; no dialog is involved.
    Resumed {
        plan: ResolutionPlan,
        result: Result<(), ResolutionError>,
    },
    UserFetched {
        ticket: LookupTicket,
        result: claimdesk::Result<UserDetails>,
    },
}

/// Everything the console renders from.
#[derive(Debug)]
pub struct ConsoleState {
    pub list: ClaimList,
    pub flows: ResolutionFlows,
    pub lookup: UserLookup,
    pub stalled: Vec<StalledResolution>,
    pub notices: VecDeque<Notice>,
    /// Bumped on every reload; loads from an older epoch are dropped.
    pub load_epoch: u64,
    /// Highlighted row on the current page.
    pub cursor: usize,
    pub quit: bool,
}

impl ConsoleState {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ClaimList::new(page_size),
            flows: ResolutionFlows::new(),
            lookup: UserLookup::new(),
            stalled: Vec::new(),
            notices: VecDeque::with_capacity(MAX_NOTICES),
            load_epoch: 0,
            cursor: 0,
            quit: false,
        }
    }

    /// Kick off the first page load.
    pub fn start(&mut self) -> Vec<Action> {
        self.load(1)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    fn load(&mut self, page: u32) -> Vec<Action> {
        match self.list.begin_load(page) {
            LoadStep::Fetch(request) => vec![Action::Load {
                page,
                epoch: self.load_epoch,
                request,
            }],
            LoadStep::Cached => {
                self.cursor = 0;
                vec![]
            }
            LoadStep::Busy => vec![],
        }
    }

    fn go_to_page(&mut self, page: u32) -> Vec<Action> {
        if !self.list.can_select(page) || !self.list.select_page(page) {
            return vec![];
        }
        self.load(page)
    }

    /// Drop the cache and any load in flight, then fetch page 1.
    fn reload(&mut self) -> Vec<Action> {
        self.load_epoch += 1;
        self.list.invalidate();
        self.load(1)
    }

    /// Resolution whose dialog is showing, if any.
    pub fn open_dialog(&self) -> Option<Resolution> {
        [Resolution::Accept, Resolution::Reject]
            .into_iter()
            .find(|r| self.flows.state(*r) != &FlowState::Idle)
    }

    /// Apply one key press.
    pub fn on_key(&mut self, code: KeyCode) -> Vec<Action> {
        if let Some(resolution) = self.open_dialog() {
            return self.on_dialog_key(resolution, code);
        }

        if self.lookup.is_open() {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('c')) {
                self.lookup.close();
            }
            return vec![];
        }

        let selected_id = self.list.claims().get(self.cursor).map(|c| c.id.clone());
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                vec![]
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.list.claims().len() {
                    self.cursor += 1;
                }
                vec![]
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
                let page = self.list.current_page().saturating_sub(1);
                self.go_to_page(page)
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
                let page = self.list.current_page() + 1;
                self.go_to_page(page)
            }
            KeyCode::Char('a') => {
                if let Some(id) = selected_id {
                    self.flows.request(Resolution::Accept, id);
                }
                vec![]
            }
            KeyCode::Char('r') => {
                if let Some(id) = selected_id {
                    self.flows.request(Resolution::Reject, id);
                }
                vec![]
            }
            KeyCode::Char('u') | KeyCode::Enter => {
                match self.list.claims().get(self.cursor) {
                    Some(claim) => {
                        let user = claim.user().clone();
                        vec![Action::FetchUser(self.lookup.begin(&user))]
                    }
                    None => vec![],
                }
            }
            KeyCode::Char('R') => self.reload(),
            KeyCode::Char('S') => {
                if self.stalled.is_empty() {
                    return vec![];
                }
                let stalled = self.stalled.remove(0);
                info!(claim_id = %stalled.plan.claim_id, "resuming stalled resolution");
                vec![Action::Resume(stalled.plan)]
            }
            _ => vec![],
        }
    }

    fn on_dialog_key(&mut self, resolution: Resolution, code: KeyCode) -> Vec<Action> {
        if self.flows.is_resolving(resolution) {
            return vec![];
        }
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                match self.flows.begin(resolution, self.list.claims()) {
                    Some(Ok(plan)) => vec![Action::Resolve(plan)],
                    Some(Err(e)) => {
                        warn!(error = %e, "resolution failed");
                        self.notify(Notice::error(resolution.failure_message()));
                        vec![]
                    }
                    None => vec![],
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.flows.cancel(resolution);
                vec![]
            }
            _ => vec![],
        }
    }

    /// Report a finished saga; success reloads, a partial failure is kept for resume.
    fn settle(
        &mut self,
        plan: ResolutionPlan,
        result: Result<(), ResolutionError>,
    ) -> Vec<Action> {
        let resolution = plan.resolution;
        match result {
            Ok(()) => {
                self.notify(Notice::success(resolution.success_message()));
                self.reload()
            }
            Err(e) => {
                if e.is_partial() {
                    warn!(claim_id = %plan.claim_id, error = %e, "venue updated but claim unresolved");
                    self.stalled.push(StalledResolution {
                        plan,
                        reason: e.failure.to_string(),
                    });
                } else {
                    warn!(error = %e, "resolution failed");
                }
                self.notify(Notice::error(resolution.failure_message()));
                vec![]
            }
        }
    }

    /// Apply the result of a finished task.
    pub fn on_task(&mut self, done: TaskResult) -> Vec<Action> {
        match done {
            TaskResult::Loaded {
                page,
                epoch,
                result,
            } => {
                if epoch != self.load_epoch {
                    debug!(page, epoch, "dropping load from before reload");
                    return vec![];
                }
                if self.list.finish_load(page, result).is_err() {
                    self.notify(Notice::error(LOAD_ERROR_MESSAGE));
                }
                self.cursor = 0;
                vec![]
            }
            TaskResult::Resolved { plan, result } => {
                let resolution = plan.resolution;
                if self.flows.state(resolution) == &FlowState::Resolving(plan.claim_id.clone()) {
                    self.flows.finish(resolution);
                }
                self.settle(plan, result)
            }
            TaskResult::Resumed { plan, result } => self.settle(plan, result),
            TaskResult::UserFetched { ticket, result } => {
                if self.lookup.finish(ticket, result) == LookupOutcome::Failed {
                    self.notify(Notice::error(LOOKUP_ERROR_MESSAGE));
                }
                vec![]
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Run the claim console until the operator quits or `cancel` fires.
pub async fn run_console(
    client: ClaimDeskHttpClient,
    page_size: usize,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    info!(api = %client.base_url(), "starting claim console");

    let (tx, mut rx) = mpsc::unbounded_channel::<TaskResult>();
    let mut state = ConsoleState::new(page_size);
    for action in state.start() {
        dispatch(&client, &tx, action);
    }

    // Set up terminal.
    enable_raw_mode().map_err(|_| CliError::Terminal("failed to enable raw mode".into()))?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .map_err(|_| CliError::Terminal("failed to enter alternate screen".into()))?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(|_| CliError::Terminal("failed to create terminal".into()))?;

    let mut render_interval = tokio::time::interval(RENDER_INTERVAL);

    // Main event loop.
    let result: Result<(), CliError> = loop {
        if state.quit {
            break Ok(());
        }

        tokio::select! {
            Some(done) = rx.recv() => {
                for action in state.on_task(done) {
                    dispatch(&client, &tx, action);
                }
            }

            // Render tick, also polls keyboard input.
            _ = render_interval.tick() => {
                while event::poll(Duration::ZERO).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if key.kind == KeyEventKind::Press {
                            for action in state.on_key(key.code) {
                                dispatch(&client, &tx, action);
                            }
                        }
                    }
                }

                if !state.quit {
                    if let Err(e) = terminal.draw(|frame| render_ui(frame, &state)) {
                        break Err(CliError::Io(e));
                    }
                }
            }

            _ = cancel.cancelled() => {
                break Ok(());
            }
        }
    };

    restore_terminal(&mut terminal);
    result
}

/// Run `action` on its own task and send the result back.
fn dispatch(client: &ClaimDeskHttpClient, tx: &mpsc::UnboundedSender<TaskResult>, action: Action) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let done = match action {
            Action::Load {
                page,
                epoch,
                request,
            } => TaskResult::Loaded {
                page,
                epoch,
                result: client.fetch_claims(request.variant(), &request).await,
            },
            Action::Resolve(plan) => {
                let result = run_resolution(&client, &plan).await;
                TaskResult::Resolved { plan, result }
            }
            Action::Resume(plan) => {
                let result = resume_resolution(&client, &plan).await;
                TaskResult::Resumed { plan, result }
            }
            Action::FetchUser(ticket) => {
                let result = client.fetch_user_details(ticket.user_doc_id()).await;
                TaskResult::UserFetched { ticket, result }
            }
        };
        // Receiver is gone only after the console exits.
        let _ = tx.send(done);
    });
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

/// Restore terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    let _ = terminal.show_cursor();
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

/// A `width` x `height` rect centred in `area`, clipped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ---------------------------------------------------------------------------
// UI rendering
// ---------------------------------------------------------------------------

/// Render the full TUI frame.
fn render_ui(frame: &mut Frame, state: &ConsoleState) {
    let area = frame.area();

    // Layout: header (3 rows), claims (rest), footer (1 row), log (8 rows).
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(8),
        ])
        .split(area);

    let header = Paragraph::new(
        " VENUE CLAIMS | j/k move  h/l page  a accept  r reject  u user  R refresh  q quit",
    )
    .style(Style::default().fg(Color::White).bg(Color::Blue).bold())
    .alignment(Alignment::Center);
    frame.render_widget(header, main_layout[0]);

    render_claims(frame, main_layout[1], state);
    render_footer(frame, main_layout[2], state);
    render_notices(frame, main_layout[3], &state.notices);

    if let Some(resolution) = state.open_dialog() {
        render_confirm_dialog(frame, area, resolution, state.flows.state(resolution));
    } else if state.lookup.is_open() {
        render_user_dialog(frame, area, &state.lookup);
    }
}

/// Render the claim list, or the spinner / error that replaces it.
fn render_claims(frame: &mut Frame, area: Rect, state: &ConsoleState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Claims ");

    let list = &state.list;
    if list.is_loading() && list.claims().is_empty() {
        let p = Paragraph::new(Line::styled(" Loading...", Style::default().fg(Color::Yellow)))
            .block(block);
        frame.render_widget(p, area);
        return;
    }
    if let Some(error) = list.error() {
        let p = Paragraph::new(Line::styled(format!(" {error}"), Style::default().fg(Color::Red)))
            .block(block);
        frame.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = list
        .claims()
        .iter()
        .map(|claim| {
            let venue = claim.venue();
            ListItem::new(vec![
                Line::from(Span::styled(venue.name.clone(), Style::default().bold())),
                Line::from(format!("  Description: {}", venue.description)),
                Line::from(format!("  Timestamp:   {}", format_timestamp(claim.r.timestamp))),
                Line::from(Span::styled(
                    format!("  User: {}  Claim: {}", claim.user().user_doc_id, claim.id),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if !list.claims().is_empty() {
        list_state.select(Some(state.cursor));
    }
    frame.render_stateful_widget(widget, area, &mut list_state);
}

/// Render the pagination line.
fn render_footer(frame: &mut Frame, area: Rect, state: &ConsoleState) {
    let mut spans = vec![Span::raw(format!(" {}", pagination_footer(&state.list)))];
    if state.list.is_loading() {
        spans.push(Span::styled("  loading", Style::default().fg(Color::Yellow)));
    }
    if !state.stalled.is_empty() {
        spans.push(Span::styled(
            format!("  {} stalled (S to resume)", state.stalled.len()),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the notice log, newest last.
fn render_notices(frame: &mut Frame, area: Rect, notices: &VecDeque<Notice>) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = notices
        .iter()
        .skip(notices.len().saturating_sub(visible))
        .map(|n| {
            let color = match n.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::styled(format!(" {}", n.message), Style::default().fg(color))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Notices ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render the accept or reject confirmation dialog.
fn render_confirm_dialog(frame: &mut Frame, area: Rect, resolution: Resolution, state: &FlowState) {
    let title = match resolution {
        Resolution::Accept => " Confirm Acceptance ",
        Resolution::Reject => " Confirm Rejection ",
    };
    let lines = match state {
        FlowState::Resolving(id) => vec![
            Line::from(format!(" Claim {id}")),
            Line::from(""),
            Line::styled(" Working...", Style::default().fg(Color::Yellow)),
        ],
        FlowState::Confirming(id) => vec![
            Line::from(format!(" Claim {id}")),
            Line::from(""),
            Line::from(format!(" {}", resolution.prompt())),
            Line::from(""),
            Line::styled(" [y] OK   [n] Cancel", Style::default().fg(Color::DarkGray)),
        ],
        FlowState::Idle => return,
    };

    let rect = centered_rect(56, 7, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// Render the requester detail dialog.
fn render_user_dialog(frame: &mut Frame, area: Rect, lookup: &UserLookup) {
    let mut lines = Vec::with_capacity(6);
    if let Some(details) = lookup.details() {
        for (label, value) in user_fields(details) {
            lines.push(Line::from(vec![
                Span::styled(format!(" {label}: "), Style::default().bold()),
                Span::raw(value.to_string()),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(" [Esc] Close", Style::default().fg(Color::DarkGray)));

    let rect = centered_rect(56, 8, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" User Details ");
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimdesk::{ClaimDeskError, Cursor, ResolutionFailure, SagaStage, UserRef};
    use serde_json::json;

    fn claim(id: &str) -> claimdesk::Claim {
        serde_json::from_value(json!({
            "id": id,
            "r": {
                "venue": {"name": format!("Venue {id}"), "description": "", "event_conf_req": 0},
                "user": {"user_doc_id": format!("user-{id}")},
                "timestamp": 1_700_000_000
            }
        }))
        .unwrap()
    }

    fn loaded(ids: &[&str], cursor: Option<&str>) -> ConsoleState {
        let mut state = ConsoleState::new(5);
        let actions = state.start();
        assert_eq!(actions.len(), 1);
        state.on_task(TaskResult::Loaded {
            page: 1,
            epoch: state.load_epoch,
            result: Ok(ClaimPage {
                rows: ids.iter().map(|id| claim(id)).collect(),
                cursor: cursor.and_then(|l| Cursor::from_response(Some(json!({ "l": l })))),
            }),
        });
        state
    }

    #[test]
    fn test_start_requests_first_page() {
        let mut state = ConsoleState::new(5);
        match state.start().as_slice() {
            [Action::Load { page: 1, request, .. }] => assert!(request.cursor.is_none()),
            other => panic!("unexpected actions {other:?}"),
        }
        assert!(state.list.is_loading());
    }

    #[test]
    fn test_paging_disabled_while_loading() {
        let mut state = ConsoleState::new(5);
        state.start();
        assert!(state.on_key(KeyCode::Right).is_empty());
        assert_eq!(state.list.current_page(), 1);
    }

    #[test]
    fn test_next_page_uses_cursor() {
        let mut state = loaded(&["a"], Some("tok1"));
        match state.on_key(KeyCode::Right).as_slice() {
            [Action::Load { page: 2, request, .. }] => assert!(request.cursor.is_some()),
            other => panic!("unexpected actions {other:?}"),
        }
        assert_eq!(state.list.current_page(), 2);
    }

    #[test]
    fn test_no_next_page_without_cursor() {
        let mut state = loaded(&["a"], None);
        assert!(state.on_key(KeyCode::Right).is_empty());
        assert_eq!(state.list.current_page(), 1);
    }

    #[test]
    fn test_accept_dialog_confirm() {
        let mut state = loaded(&["a", "b"], None);
        state.on_key(KeyCode::Down);
        assert!(state.on_key(KeyCode::Char('a')).is_empty());
        assert_eq!(state.open_dialog(), Some(Resolution::Accept));

        match state.on_key(KeyCode::Char('y')).as_slice() {
            [Action::Resolve(plan)] => {
                assert_eq!(plan.claim_id, "b");
                assert_eq!(plan.venue.event_conf_req, 1);
            }
            other => panic!("unexpected actions {other:?}"),
        }
        // Keys are ignored while resolving.
        assert!(state.on_key(KeyCode::Char('n')).is_empty());
        assert!(state.flows.is_resolving(Resolution::Accept));
    }

    #[test]
    fn test_reject_dialog_cancel() {
        let mut state = loaded(&["a"], None);
        state.on_key(KeyCode::Char('r'));
        assert_eq!(state.open_dialog(), Some(Resolution::Reject));
        assert!(state.on_key(KeyCode::Esc).is_empty());
        assert_eq!(state.open_dialog(), None);
        assert!(!state.quit);
    }

    #[test]
    fn test_successful_resolution_reloads_first_page() {
        let mut state = loaded(&["a"], None);
        state.on_key(KeyCode::Char('a'));
        let plan = match state.on_key(KeyCode::Enter).pop() {
            Some(Action::Resolve(plan)) => plan,
            other => panic!("unexpected action {other:?}"),
        };

        let actions = state.on_task(TaskResult::Resolved {
            plan,
            result: Ok(()),
        });
        assert!(matches!(actions.as_slice(), [Action::Load { page: 1, .. }]));
        assert_eq!(state.notices.back().unwrap(), &Notice::success("Claim accepted successfully"));
        assert_eq!(state.open_dialog(), None);
    }

    #[test]
    fn test_partial_failure_is_stalled_and_resumable() {
        let mut state = loaded(&["a"], None);
        state.on_key(KeyCode::Char('r'));
        let plan = match state.on_key(KeyCode::Char('y')).pop() {
            Some(Action::Resolve(plan)) => plan,
            other => panic!("unexpected action {other:?}"),
        };

        let err = ResolutionError {
            claim_id: plan.claim_id.clone(),
            resolution: Resolution::Reject,
            stage: SagaStage::ClaimPending,
            failure: ResolutionFailure::Remote(ClaimDeskError::Http {
                status: 500,
                message: String::new(),
            }),
        };
        let actions = state.on_task(TaskResult::Resolved {
            plan,
            result: Err(err),
        });
        assert!(actions.is_empty());
        assert_eq!(state.stalled.len(), 1);
        assert_eq!(state.notices.back().unwrap(), &Notice::error("Failed to reject claim"));

        match state.on_key(KeyCode::Char('S')).as_slice() {
            [Action::Resume(plan)] => assert_eq!(plan.claim_id, "a"),
            other => panic!("unexpected actions {other:?}"),
        }
        assert!(state.stalled.is_empty());
    }

    #[test]
    fn test_stale_user_result_after_close() {
        let mut state = loaded(&["a"], None);
        let ticket = match state.on_key(KeyCode::Char('u')).pop() {
            Some(Action::FetchUser(ticket)) => ticket,
            other => panic!("unexpected action {other:?}"),
        };
        assert_eq!(ticket.user(), &UserRef::new("user-a"));

        // Closed before the fetch lands.
        state.lookup.close();
        state.on_task(TaskResult::UserFetched {
            ticket,
            result: Ok(UserDetails::default()),
        });
        assert!(!state.lookup.is_open());
    }

    #[test]
    fn test_user_dialog_closes_on_esc() {
        let mut state = loaded(&["a"], None);
        let ticket = match state.on_key(KeyCode::Char('u')).pop() {
            Some(Action::FetchUser(ticket)) => ticket,
            other => panic!("unexpected action {other:?}"),
        };
        state.on_task(TaskResult::UserFetched {
            ticket,
            result: Ok(UserDetails::default()),
        });
        assert!(state.lookup.is_open());

        state.on_key(KeyCode::Esc);
        assert!(!state.lookup.is_open());
        assert!(!state.quit);
    }

    #[test]
    fn test_load_failure_shows_error() {
        let mut state = ConsoleState::new(5);
        state.start();
        state.on_task(TaskResult::Loaded {
            page: 1,
            epoch: state.load_epoch,
            result: Err(ClaimDeskError::MalformedResponse("rows is not a list".into())),
        });
        assert_eq!(state.list.error(), Some(claimdesk::LOAD_ERROR_MESSAGE));
    }

    #[test]
    fn test_centered_rect_clips() {
        let area = Rect::new(0, 0, 40, 5);
        let rect = centered_rect(56, 7, area);
        assert_eq!(rect, Rect::new(0, 0, 40, 5));

        let rect = centered_rect(20, 3, Rect::new(0, 0, 40, 11));
        assert_eq!(rect, Rect::new(10, 4, 20, 3));
    }

    fn page_of(ids: &[&str]) -> ClaimPage {
        ClaimPage {
            rows: ids.iter().map(|id| claim(id)).collect(),
            cursor: None,
        }
    }

    #[test]
    fn test_success_during_page_load_refetches_first_page() {
        let mut state = loaded(&["a"], Some("tok1"));
        let stale_epoch = match state.on_key(KeyCode::Right).pop() {
            Some(Action::Load { page: 2, epoch, .. }) => epoch,
            other => panic!("unexpected action {other:?}"),
        };

        state.on_key(KeyCode::Char('a'));
        let plan = match state.on_key(KeyCode::Char('y')).pop() {
            Some(Action::Resolve(plan)) => plan,
            other => panic!("unexpected action {other:?}"),
        };
        let actions = state.on_task(TaskResult::Resolved {
            plan,
            result: Ok(()),
        });
        let epoch = match actions.as_slice() {
            [Action::Load { page: 1, epoch, request }] => {
                assert!(request.cursor.is_none());
                *epoch
            }
            other => panic!("unexpected actions {other:?}"),
        };
        assert_ne!(epoch, stale_epoch);

        // The page-2 fetch from before the reload is dropped.
        state.on_task(TaskResult::Loaded {
            page: 2,
            epoch: stale_epoch,
            result: Ok(page_of(&["b"])),
        });
        assert_eq!(state.list.current_page(), 1);
        assert!(state.list.cache().is_empty());
        assert!(state.list.is_loading());

        state.on_task(TaskResult::Loaded {
            page: 1,
            epoch,
            result: Ok(page_of(&["c"])),
        });
        assert_eq!(state.list.claims()[0].id, "c");
        assert!(state.list.cache().contains(1));
        assert!(!state.list.cache().contains(2));
    }

    #[test]
    fn test_refresh_while_loading_restarts_from_first_page() {
        let mut state = loaded(&["a"], Some("tok1"));
        state.on_key(KeyCode::Right);
        match state.on_key(KeyCode::Char('R')).as_slice() {
            [Action::Load { page: 1, .. }] => {}
            other => panic!("unexpected actions {other:?}"),
        }
    }

    #[test]
    fn test_resume_result_leaves_open_flow_alone() {
        let mut state = loaded(&["a", "b"], None);
        state.on_key(KeyCode::Char('a'));
        let plan = match state.on_key(KeyCode::Char('y')).pop() {
            Some(Action::Resolve(plan)) => plan,
            other => panic!("unexpected action {other:?}"),
        };
        let err = ResolutionError {
            claim_id: plan.claim_id.clone(),
            resolution: Resolution::Accept,
            stage: SagaStage::ClaimPending,
            failure: ResolutionFailure::Remote(ClaimDeskError::Http {
                status: 502,
                message: String::new(),
            }),
        };
        state.on_task(TaskResult::Resolved {
            plan,
            result: Err(err),
        });

        let resume = match state.on_key(KeyCode::Char('S')).pop() {
            Some(Action::Resume(plan)) => plan,
            other => panic!("unexpected action {other:?}"),
        };

        // Accept claim b while the resume of a is still running.
        state.on_key(KeyCode::Down);
        state.on_key(KeyCode::Char('a'));
        assert!(matches!(
            state.on_key(KeyCode::Char('y')).as_slice(),
            [Action::Resolve(_)]
        ));

        state.on_task(TaskResult::Resumed {
            plan: resume,
            result: Ok(()),
        });
        assert_eq!(
            state.flows.state(Resolution::Accept),
            &FlowState::Resolving("b".to_string())
        );
        assert!(state.on_key(KeyCode::Char('y')).is_empty());
    }

    #[test]
    fn test_resolved_for_other_claim_keeps_flow() {
        let mut state = loaded(&["a", "b"], None);
        state.on_key(KeyCode::Down);
        state.on_key(KeyCode::Char('r'));
        state.on_key(KeyCode::Char('y'));

        let other = ResolutionPlan::new(&claim("a"), Resolution::Reject);
        state.on_task(TaskResult::Resolved {
            plan: other,
            result: Ok(()),
        });
        assert!(state.flows.is_resolving(Resolution::Reject));
    }

    #[test]
    fn test_load_failure_is_logged_as_notice() {
        let mut state = ConsoleState::new(5);
        state.start();
        state.on_task(TaskResult::Loaded {
            page: 1,
            epoch: state.load_epoch,
            result: Err(ClaimDeskError::Http {
                status: 500,
                message: String::new(),
            }),
        });
        assert_eq!(state.notices.back().unwrap(), &Notice::error(LOAD_ERROR_MESSAGE));
    }
}
