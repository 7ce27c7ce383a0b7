use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use crossterm::event::{self, Event, KeyCode};
use log::info;
use ratatui::{prelude::*, widgets::*};

use crate::topology::Maze;

use super::{
    components::{help::render_help, Component, Logs, MazeView, Plots},
    tui,
    util::event_keycode,
};

/// Dashboard tabs, in display order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Plots,
    Maze,
    Logs,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Plots, Tab::Maze, Tab::Logs];

    fn title(self) -> &'static str {
        match self {
            Tab::Plots => "Plots",
            Tab::Maze => "Maze",
            Tab::Logs => "Logs",
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Train,
    /// The trainer hung up; results stay on screen until quit
    Done,
    Quit,
}

/// Progress of one finished episode, sent by the training loop
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub episode: u32,
    /// Metric values, in the order of the plot names given to [`init`](super::init)
    pub data: Vec<f64>,
    /// Cells visited during the episode, if it should be drawn
    pub path: Option<Vec<usize>>,
}

/// The root TUI component which holds the dashboard state and runs the render loop
pub struct App {
    state: State,
    completed: u32,
    total_episodes: u32,
    tab: Tab,
    show_help: bool,
    plots: Plots,
    maze: MazeView,
    logs: Logs,
}

impl App {
    pub fn new(maze: Maze, plots: Vec<&'static str>, episodes: u32) -> Self {
        Self {
            state: State::default(),
            completed: 0,
            total_episodes: episodes,
            tab: Tab::default(),
            show_help: false,
            plots: Plots::new(plots, episodes),
            maze: MazeView::new(&maze),
            logs: Logs::default(),
        }
    }

    /// Initialize the terminal and run the main loop
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self, rx: Receiver<Update>) -> io::Result<()> {
        let mut terminal = tui::init()?;
        let mut dirty = true;

        while self.state != State::Quit {
            if self.state == State::Train {
                dirty |= self.drain(&rx);
            }

            if dirty {
                terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;
                dirty = false;
            }

            if event::poll(Duration::from_millis(16))? {
                let event = event::read()?;
                dirty |= self.handle_event(&event);
            }
        }

        tui::restore()
    }

    /// Apply every pending update
    ///
    /// **Returns** `true` if anything on screen changed
    fn drain(&mut self, rx: &Receiver<Update>) -> bool {
        let mut changed = false;
        loop {
            match rx.try_recv() {
                Ok(update) => {
                    self.apply(update);
                    changed = true;
                }
                Err(TryRecvError::Empty) => return changed,
                Err(TryRecvError::Disconnected) => {
                    info!("Training finished after {} episodes", self.completed);
                    self.state = State::Done;
                    return true;
                }
            }
        }
    }

    fn apply(&mut self, update: Update) {
        self.completed = self.completed.max(update.episode + 1);
        self.plots.update(&update);
        if let Some(path) = update.path {
            self.maze.set_path(update.episode, path);
        }
    }

    /// **Returns** `true` if the screen needs redrawing
    fn handle_event(&mut self, event: &Event) -> bool {
        match event_keycode(event) {
            Some(KeyCode::Char('q')) => self.state = State::Quit,
            Some(KeyCode::Char('h')) => self.show_help = !self.show_help,
            Some(KeyCode::Tab) => self.tab = self.tab.next(),
            _ => {
                return matches!(event, Event::Resize(..))
                    || self.current_mut().handle_ui_event(event);
            }
        }
        true
    }

    fn current_mut(&mut self) -> &mut dyn Component {
        match self.tab {
            Tab::Plots => &mut self.plots,
            Tab::Maze => &mut self.maze,
            Tab::Logs => &mut self.logs,
        }
    }

    fn progress(&self) -> f64 {
        if self.total_episodes == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total_episodes as f64).min(1.0)
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        // Menu
        Tabs::new(Tab::ALL.map(Tab::title))
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.tab as usize)
            .render(menu_area, buf);

        // Main
        match self.tab {
            Tab::Plots => self.plots.render_ref(main_area, buf),
            Tab::Maze => self.maze.render_ref(main_area, buf),
            Tab::Logs => self.logs.render_ref(main_area, buf),
        }

        // Progress
        let title = match self.state {
            State::Done => "Progress (done, h for help, q to quit)",
            _ => "Progress (h for help)",
        };
        Gauge::default()
            .block(Block::bordered().border_type(BorderType::Rounded).title(title))
            .gauge_style(Color::Cyan)
            .ratio(self.progress())
            .label(format!("{} / {}", self.completed, self.total_episodes))
            .render(progress_area, buf);

        if self.show_help {
            render_help(area, buf, self.tab);
        }
    }
}
