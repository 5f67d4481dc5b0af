//! Interactive newsletter browser for the `subscriptions` command.

pub mod events;
pub mod state;
pub mod ui;

use anyhow::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use crate::domain::Newsletter;
use crate::mail::SubscriptionOrchestrator;
use crate::terminal::state::AppState;

pub fn run_subscriptions(
    orchestrator: &SubscriptionOrchestrator<'_>,
    newsletters: Vec<Newsletter>,
) -> Result<()> {
    let mut state = AppState::new(newsletters);

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut state, orchestrator);
    ratatui::restore();

    result
}

fn run(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    orchestrator: &SubscriptionOrchestrator<'_>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, state))?;

        if state.pending.is_some() {
            state.run_pending(orchestrator);
            continue;
        }

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && events::handle_key(key, state)
        {
            return Ok(());
        }
    }
}
