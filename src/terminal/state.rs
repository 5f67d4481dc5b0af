use ratatui::widgets::ListState;

use crate::domain::{Newsletter, RunTally, UnsubscribeOutcome};
use crate::mail::SubscriptionOrchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,
    /// Waiting for `y`/`n` before resolving every newsletter.
    ConfirmAll,
}

/// Work queued by a key press, run after the next redraw so the status line
/// is visible while the network calls block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    ResolveSelected,
    ResolveAll,
}

pub struct AppState {
    pub newsletters: Vec<Newsletter>,
    pub list_state: ListState,
    /// Outcome per newsletter, same index as `newsletters`.
    pub outcomes: Vec<Option<UnsubscribeOutcome>>,
    pub tally: Option<(usize, usize)>,
    pub mode: Mode,
    pub pending: Option<Pending>,
    pub status: String,
}

impl AppState {
    pub fn new(newsletters: Vec<Newsletter>) -> Self {
        let mut list_state = ListState::default();
        if !newsletters.is_empty() {
            list_state.select(Some(0));
        }
        let status = if newsletters.is_empty() {
            "No newsletters found".to_string()
        } else {
            format!("{} newsletters", newsletters.len())
        };
        Self {
            outcomes: vec![None; newsletters.len()],
            newsletters,
            list_state,
            tally: None,
            mode: Mode::Browse,
            pending: None,
            status,
        }
    }

    pub fn selected(&self) -> Option<&Newsletter> {
        self.newsletters.get(self.list_state.selected()?)
    }

    pub fn selected_outcome(&self) -> Option<&UnsubscribeOutcome> {
        self.outcomes.get(self.list_state.selected()?)?.as_ref()
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.newsletters.is_empty() {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let len = self.newsletters.len() as i32;
        let next = (cur + delta).clamp(0, len - 1) as usize;
        self.list_state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        if !self.newsletters.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.newsletters.is_empty() {
            self.list_state.select(Some(self.newsletters.len() - 1));
        }
    }

    pub fn queue(&mut self, work: Pending) {
        self.status = match work {
            Pending::ResolveSelected => match self.selected() {
                Some(n) => format!("Resolving {n} ..."),
                None => return,
            },
            Pending::ResolveAll => format!("Resolving {} newsletters ...", self.newsletters.len()),
        };
        self.pending = Some(work);
    }

    pub fn run_pending(&mut self, orchestrator: &SubscriptionOrchestrator<'_>) {
        match self.pending.take() {
            Some(Pending::ResolveSelected) => self.resolve_selected(orchestrator),
            Some(Pending::ResolveAll) => self.resolve_all(orchestrator),
            None => {}
        }
    }

    fn resolve_selected(&mut self, orchestrator: &SubscriptionOrchestrator<'_>) {
        let Some(idx) = self.list_state.selected() else {
            return;
        };
        let Some(newsletter) = self.newsletters.get(idx) else {
            return;
        };
        let outcome = orchestrator.run_one(newsletter);
        self.status = format!("{newsletter}: {outcome}");
        self.outcomes[idx] = Some(outcome);
    }

    fn resolve_all(&mut self, orchestrator: &SubscriptionOrchestrator<'_>) {
        let RunTally {
            success,
            failed,
            results,
        } = orchestrator.run_all(&self.newsletters);
        for (slot, (_, outcome)) in self.outcomes.iter_mut().zip(results) {
            *slot = Some(outcome);
        }
        self.tally = Some((success, failed));
        self.status = format!("Links found: {success}  No usable link: {failed}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::scan;
    use crate::mail::testing::FakeGmail;

    fn gmail() -> FakeGmail {
        let mut gmail = FakeGmail::new(10);
        gmail.push("a1", "A <a@x.com>");
        gmail.push("a2", "A <a@x.com>");
        gmail.push("b1", "B <b@x.com>");
        gmail.set_unsubscribe("a1", "<http://a.example/u>");
        gmail.set_unsubscribe("b1", "<mailto:b@x.com>");
        gmail
    }

    #[test]
    fn selection_is_clamped() {
        let gmail = gmail();
        let newsletters = scan(&gmail, "me", "CATEGORY_PROMOTIONS").unwrap().newsletters;
        let mut state = AppState::new(newsletters);

        state.move_selection(-1);
        assert_eq!(state.list_state.selected(), Some(0));
        state.move_selection(5);
        assert_eq!(state.list_state.selected(), Some(1));
        assert_eq!(state.selected().unwrap().sender_email, "b@x.com");
    }

    #[test]
    fn resolve_selected_stores_outcome() {
        let gmail = gmail();
        let newsletters = scan(&gmail, "me", "CATEGORY_PROMOTIONS").unwrap().newsletters;
        let orchestrator = SubscriptionOrchestrator::new(&gmail, "me");
        let mut state = AppState::new(newsletters);

        state.queue(Pending::ResolveSelected);
        assert!(state.status.starts_with("Resolving"));
        state.run_pending(&orchestrator);

        assert_eq!(state.pending, None);
        assert_eq!(
            state.selected_outcome(),
            Some(&UnsubscribeOutcome::Resolved(vec!["http://a.example/u".to_string()]))
        );
        assert_eq!(state.outcomes[1], None);
    }

    #[test]
    fn resolve_all_fills_every_outcome() {
        let gmail = gmail();
        let newsletters = scan(&gmail, "me", "CATEGORY_PROMOTIONS").unwrap().newsletters;
        let orchestrator = SubscriptionOrchestrator::new(&gmail, "me");
        let mut state = AppState::new(newsletters);

        state.queue(Pending::ResolveAll);
        state.run_pending(&orchestrator);

        assert_eq!(state.tally, Some((1, 1)));
        assert_eq!(state.outcomes[1], Some(UnsubscribeOutcome::MailtoOnly));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut state = AppState::new(Vec::new());
        state.move_selection(1);
        assert_eq!(state.selected(), None);
        state.queue(Pending::ResolveSelected);
        assert_eq!(state.pending, None);
    }
}
