// ui/utils.rs

use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub fn center_rect(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

/// Number of terminal rows `text` takes once wrapped to `width` columns.
pub fn wrapped_height(text: &str, width: u16) -> usize {
    let width = usize::from(width.max(1));
    text.lines()
        .map(|line| textwrap::wrap(line, width).len().max(1))
        .sum::<usize>()
        .max(1)
}

/// Scroll offset that keeps the bottom of the content visible, moved up by `back` rows.
pub fn bottom_scroll(content_height: usize, visible_height: u16, back: u16) -> u16 {
    let overflow = content_height.saturating_sub(usize::from(visible_height));
    let overflow = u16::try_from(overflow).unwrap_or(u16::MAX);
    overflow.saturating_sub(back)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_height_counts_blank_lines_and_wraps() {
        assert_eq!(wrapped_height("one\n\ntwo", 20), 3);
        assert_eq!(wrapped_height("aaaa bbbb cccc", 9), 2);
        assert_eq!(wrapped_height("", 10), 1);
    }

    #[test]
    fn bottom_scroll_never_goes_negative() {
        assert_eq!(bottom_scroll(10, 20, 0), 0);
        assert_eq!(bottom_scroll(30, 20, 0), 10);
        assert_eq!(bottom_scroll(30, 20, 50), 0);
    }

    #[test]
    fn center_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = center_rect(outer, Constraint::Length(40), Constraint::Length(10));
        assert_eq!(inner, Rect::new(30, 15, 40, 10));
    }
}
