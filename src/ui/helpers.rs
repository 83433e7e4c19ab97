use std::error::Error;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Cell, Row};

use crate::models::Record;

/// Column widths of the inventory table, matching [`Record::table_row`].
pub(crate) const COLUMN_WIDTHS: [Constraint; 3] = [
    Constraint::Length(10),
    Constraint::Length(25),
    Constraint::Min(25),
];

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

/// Extract the innermost message from an error's source chain.
pub(crate) fn surface_error(err: &(dyn Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

pub(crate) fn record_row(record: &Record) -> Row<'static> {
    Row::new(vec![
        Cell::from(record.id.to_string()),
        Cell::from(record.title.clone()),
        Cell::from(record.artist.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use super::*;
    use crate::error::SnapshotError;

    #[test]
    fn surface_error_reports_innermost_cause() {
        let err = SnapshotError::Io {
            path: PathBuf::from("/nowhere/CDInventory.dat"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(surface_error(&err), "permission denied");
    }

    #[test]
    fn surface_error_without_source_uses_display() {
        let err = SnapshotError::Corrupt {
            path: PathBuf::from("x.dat"),
            reason: "duplicate CD id 2".to_string(),
        };
        assert_eq!(surface_error(&err), "snapshot x.dat is corrupt: duplicate CD id 2");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}
