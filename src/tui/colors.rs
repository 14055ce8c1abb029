//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Column and badge colors follow the web palette:
// blue for todo, amber for in-progress, green for done.

/// Used for the To Do column.
pub const COLUMN_TODO: Color = Color::Rgb(66, 133, 244);
/// Used for the In Progress column.
pub const COLUMN_IN_PROGRESS: Color = Color::Rgb(244, 180, 0);
/// Used for the Done column.
pub const COLUMN_DONE: Color = Color::Rgb(52, 168, 83);

/// High-priority badge.
pub const PRIORITY_HIGH: Color = Color::Rgb(219, 68, 55);
/// Medium-priority badge.
pub const PRIORITY_MEDIUM: Color = Color::Rgb(244, 180, 0);
/// Low-priority badge.
pub const PRIORITY_LOW: Color = Color::Rgb(52, 168, 83);

/// Overdue due-date marker.
pub const OVERDUE: Color = Color::Rgb(219, 68, 55);
