pub mod help;
pub mod log;
pub mod maze_view;
pub mod plot;

use crossterm::event::Event;
use ratatui::widgets::WidgetRef;

pub use self::log::Logs;
pub use maze_view::MazeView;
pub use plot::Plots;

/// A dashboard tab that can react to terminal events
pub trait Component: WidgetRef {
    /// **Returns** `true` if the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}
