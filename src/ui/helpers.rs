use std::time::{Duration, Instant};

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Severity levels for toasts, banners and dialogs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub(crate) fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// A message that disappears on its own once `expires_at` has passed.
#[derive(Clone, Debug)]
pub(crate) struct TimedMessage {
    pub(crate) text: String,
    pub(crate) kind: StatusKind,
    pub(crate) expires_at: Instant,
}

impl TimedMessage {
    pub(crate) fn new<S: Into<String>>(text: S, kind: StatusKind, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            kind,
            expires_at: Instant::now() + ttl,
        }
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Drop `slot`'s message if it has expired. Returns whether it was cleared.
pub(crate) fn expire(slot: &mut Option<TimedMessage>, now: Instant) -> bool {
    if slot.as_ref().is_some_and(|message| message.is_expired(now)) {
        *slot = None;
        true
    } else {
        false
    }
}

/// Footer hint line built from `(key, label)` pairs.
pub(crate) fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (idx, (key, label)) in hints.iter().enumerate() {
        spans.push(Span::styled(format!("[{key}]"), key_style));
        let spacer = if idx + 1 == hints.len() { "" } else { "   " };
        spans.push(Span::raw(format!(" {label}{spacer}")));
    }
    Line::from(spans)
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_clears_only_stale_messages() {
        let mut slot = Some(TimedMessage::new(
            "saved",
            StatusKind::Info,
            Duration::from_secs(3),
        ));
        assert!(!expire(&mut slot, Instant::now()));
        assert!(slot.is_some());

        assert!(expire(&mut slot, Instant::now() + Duration::from_secs(4)));
        assert!(slot.is_none());
        assert!(!expire(&mut slot, Instant::now()));
    }

    #[test]
    fn hint_line_brackets_keys() {
        let line = hint_line(&[("q", "Quit"), ("Enter", "Open")]);
        let text: String = line.spans.iter().map(|span| span.content.to_string()).collect();
        assert_eq!(text, "[q] Quit   [Enter] Open");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}
