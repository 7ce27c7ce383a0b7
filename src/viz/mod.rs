use std::{
    io,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use log::LevelFilter;

use crate::topology::Maze;

use self::app::App;

mod app;
mod components;
mod tui;
mod util;

pub use app::Update;

/// Install `tui-logger` as the log sink and start the dashboard on its own thread
///
/// `plots` names the metrics carried by [`Update::data`], in order. The dashboard keeps running
/// after the sender is dropped so the final results can be inspected; press `q` to leave.
///
/// **Returns** the dashboard thread and the channel used to feed it
pub fn init(
    maze: Maze,
    plots: Vec<&'static str>,
    episodes: u32,
) -> (JoinHandle<io::Result<()>>, Sender<Update>) {
    if tui_logger::init_logger(LevelFilter::Trace).is_ok() {
        tui_logger::set_default_level(LevelFilter::Debug);
    }

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || App::new(maze, plots, episodes).run(rx));

    (handle, tx)
}
