use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::domain::UnsubscribeOutcome;
use crate::terminal::state::{AppState, Mode};

pub fn render(f: &mut Frame, state: &AppState) {
    let [main, status, footer] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(main);

    // LEFT: newsletters, most frequent first
    let list_block = Block::default()
        .title(" Newsletters ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let items: Vec<ListItem> = state
        .newsletters
        .iter()
        .zip(&state.outcomes)
        .map(|(n, outcome)| {
            let marker = match outcome {
                Some(UnsubscribeOutcome::Resolved(_)) => {
                    Span::styled("✓ ", Style::default().fg(Color::Green))
                }
                Some(_) => Span::styled("✗ ", Style::default().fg(Color::Red)),
                None => Span::raw("  "),
            };
            let name = if n.display_name.is_empty() {
                n.sender_email.clone()
            } else {
                n.display_name.clone()
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(format!("{:>4} ", n.count), Style::default().fg(Color::Gray)),
                Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(list_block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(list, left, &mut state.list_state.clone());

    // RIGHT: details of the selected sender
    let detail_block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let p = Paragraph::new(detail_text(state))
        .block(detail_block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, right);

    let status_style = match state.mode {
        Mode::ConfirmAll => Style::default().fg(Color::Yellow),
        Mode::Browse => Style::default().fg(Color::Gray),
    };
    f.render_widget(Paragraph::new(state.status.as_str()).style(status_style), status);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("j/k", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" move  "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" find links  "),
        Span::styled("a", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" all  "),
        Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ]));
    f.render_widget(hint, footer);
}

fn detail_text(state: &AppState) -> Text<'static> {
    let Some(n) = state.selected() else {
        return Text::from("Nothing to show.");
    };

    let mut lines = vec![
        Line::from(Span::styled(
            n.display_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(n.sender_email.clone()),
        Line::from(format!("Messages: {}", n.count)),
        Line::from(""),
    ];

    match state.selected_outcome() {
        None => lines.push(Line::from("Press Enter to look up unsubscribe links.")),
        Some(UnsubscribeOutcome::Resolved(urls)) => {
            lines.push(Line::from("Unsubscribe links:"));
            for (i, url) in urls.iter().enumerate() {
                lines.push(Line::from(format!("{}. {url}", i + 1)));
            }
        }
        Some(UnsubscribeOutcome::MailtoOnly) => {
            lines.push(Line::from("Only email-based unsubscription is offered."));
            lines.push(Line::from(
                "Sending it needs mail-sending permission, which this tool does not request.",
            ));
        }
        Some(UnsubscribeOutcome::NotFound) => {
            lines.push(Line::from("No unsubscribe instructions found."));
        }
        Some(UnsubscribeOutcome::Error(e)) => {
            lines.push(Line::from(Span::styled(
                format!("Lookup failed: {e}"),
                Style::default().fg(Color::Red),
            )));
        }
    }

    if let Some((success, failed)) = state.tally {
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "All newsletters: {success} with links, {failed} without"
        )));
    }
    Text::from(lines)
}
