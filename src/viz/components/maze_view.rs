use crossterm::event::{Event, KeyCode};
use ratatui::{
    prelude::*,
    widgets::{
        canvas::{self, Canvas, Points},
        *,
    },
};

use crate::{
    topology::{Maze, Topology},
    viz::util::{event_keycode, flip_y},
};

use super::Component;

type Segment = ((f64, f64), (f64, f64));

/// Walls of the maze with the most recent path drawn over them
pub struct MazeView {
    size: usize,
    cells: Vec<(f64, f64)>,
    walls: Vec<Segment>,
    path: Vec<usize>,
    episode: Option<u32>,
    show_path: bool,
}

impl MazeView {
    pub fn new(maze: &Maze) -> Self {
        let size = maze.size();
        let cells = (0..maze.n_cells())
            .map(|cell| {
                let c = maze.coords(cell);
                (c.x as f64, flip_y(c.y as f64, size))
            })
            .collect();
        let walls = maze
            .walls()
            .map(|midpoint| wall_segment(midpoint.to_f64(), size))
            .collect();

        Self {
            size,
            cells,
            walls,
            path: Vec::new(),
            episode: None,
            show_path: true,
        }
    }

    pub fn set_path(&mut self, episode: u32, path: Vec<usize>) {
        self.episode = Some(episode);
        self.path = path;
    }

    fn path_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.path
            .windows(2)
            .filter_map(|w| Some((*self.cells.get(w[0])?, *self.cells.get(w[1])?)))
    }
}

/// The unit segment separating the two cells that share `midpoint`, in canvas coordinates
fn wall_segment((x, y): (f64, f64), size: usize) -> Segment {
    let y = flip_y(y, size);
    if x.fract() != 0.0 {
        ((x, y - 0.5), (x, y + 0.5))
    } else {
        ((x - 0.5, y), (x + 0.5, y))
    }
}

fn line(((x1, y1), (x2, y2)): Segment, color: Color) -> canvas::Line {
    canvas::Line {
        x1,
        y1,
        x2,
        y2,
        color,
    }
}

impl WidgetRef for MazeView {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let title = match self.episode {
            Some(episode) => format!(
                "Maze (episode {episode}, {} steps)",
                self.path.len().saturating_sub(1)
            ),
            None => String::from("Maze"),
        };
        let edge = self.size as f64 - 0.5;

        Canvas::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(title),
            )
            .marker(Marker::Braille)
            .x_bounds([-1.0, edge + 0.5])
            .y_bounds([-1.0, edge + 0.5])
            .paint(|ctx| {
                ctx.draw(&canvas::Rectangle {
                    x: -0.5,
                    y: -0.5,
                    width: self.size as f64,
                    height: self.size as f64,
                    color: Color::White,
                });
                for &wall in &self.walls {
                    ctx.draw(&line(wall, Color::White));
                }
                if !self.show_path {
                    return;
                }

                ctx.layer();
                for segment in self.path_segments() {
                    ctx.draw(&line(segment, Color::LightGreen));
                }
                let ends = [self.path.first(), self.path.last()]
                    .into_iter()
                    .flatten()
                    .filter_map(|&cell| self.cells.get(cell).copied())
                    .collect::<Vec<_>>();
                ctx.draw(&Points {
                    coords: &ends,
                    color: Color::LightRed,
                });
            })
            .render(area, buf);
    }
}

impl Component for MazeView {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match event_keycode(event) {
            Some(KeyCode::Char('p')) => {
                self.show_path = !self.show_path;
                true
            }
            _ => false,
        }
    }
}
