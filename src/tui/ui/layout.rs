use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The area inside a one-cell border.
pub(super) fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}

/// `n` equal columns across `area`.
pub(super) fn columns(area: Rect, n: usize) -> Vec<Rect> {
    let n = n.max(1) as u16;
    let width = area.width / n;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Length(width)).collect::<Vec<_>>())
        .split(area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_never_underflows() {
        let r = inner(Rect::new(0, 0, 1, 1));
        assert_eq!((r.width, r.height), (0, 0));
    }

    #[test]
    fn columns_split_evenly() {
        let cols = columns(Rect::new(0, 0, 40, 3), 4);
        assert_eq!(cols.len(), 4);
        assert!(cols.iter().all(|c| c.width == 10));
    }
}
