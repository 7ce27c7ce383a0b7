use std::collections::VecDeque;

use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use crate::viz::{util::event_keycode, Update};

use super::Component;

/// Episodes averaged by the trend line
const WINDOW: usize = 20;

/// Scatter plot of one metric against the episode index, with a moving average
pub struct Plot {
    title: &'static str,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    data: Vec<(f64, f64)>,
    trend: Vec<(f64, f64)>,
    window: VecDeque<f64>,
}

impl Plot {
    pub fn new(title: &'static str, episodes: u32) -> Self {
        Self {
            title,
            x_bounds: [0.0, episodes.max(1) as f64],
            y_bounds: [f64::MAX, f64::MIN],
            data: Vec::new(),
            trend: Vec::new(),
            window: VecDeque::with_capacity(WINDOW),
        }
    }

    pub fn update(&mut self, point: (f64, f64)) {
        let (x, y) = point;
        self.x_bounds[0] = self.x_bounds[0].min(x);
        self.x_bounds[1] = self.x_bounds[1].max(x);
        self.y_bounds[0] = self.y_bounds[0].min(y);
        self.y_bounds[1] = self.y_bounds[1].max(y);

        if self.window.len() == WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(y);
        let mean = self.window.iter().sum::<f64>() / self.window.len() as f64;

        self.data.push(point);
        self.trend.push((x, mean));
    }

    /// Latest moving average, if any point has been added
    pub fn trend(&self) -> Option<f64> {
        self.trend.last().map(|&(_, y)| y)
    }

    fn labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
        bounds.iter().map(|b| format!("{b:.2}").bold()).collect()
    }
}

impl Widget for &Plot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let raw = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .cyan()
            .data(&self.data);

        let trend = Dataset::default()
            .name(format!("mean of last {WINDOW}"))
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .light_yellow()
            .data(&self.trend);

        let y_bounds = if self.data.is_empty() {
            [0.0, 1.0]
        } else {
            self.y_bounds
        };

        let x_axis = Axis::default()
            .title("Episode")
            .dark_gray()
            .labels(Plot::labels(self.x_bounds))
            .bounds(self.x_bounds);

        let y_axis = Axis::default()
            .title(self.title)
            .dark_gray()
            .labels(Plot::labels(y_bounds))
            .bounds(y_bounds);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Plots")
            .padding(Padding::uniform(4));

        Chart::new(vec![raw, trend])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

/// One [`Plot`] per reported metric, one shown at a time
pub struct Plots {
    names: Vec<&'static str>,
    plots: Vec<Plot>,
    selected: usize,
}

impl Plots {
    pub fn new(names: Vec<&'static str>, episodes: u32) -> Self {
        let plots = names.iter().map(|&n| Plot::new(n, episodes)).collect();
        Self {
            names,
            plots,
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.plots.len()
    }

    pub fn next_plot(&mut self) {
        if !self.plots.is_empty() {
            self.selected = (self.selected + 1) % self.len();
        }
    }

    pub fn prev_plot(&mut self) {
        if !self.plots.is_empty() {
            let len = self.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn update(&mut self, update: &Update) {
        for (plot, &metric) in self.plots.iter_mut().zip(&update.data) {
            plot.update((update.episode as f64, metric));
        }
    }
}

impl WidgetRef for Plots {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let [tabs_area, plot_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

        let titles = self.names.iter().zip(&self.plots).map(|(name, plot)| match plot.trend() {
            Some(mean) => format!("{name} ({mean:.2})"),
            None => name.to_string(),
        });

        Tabs::new(titles)
            .white()
            .highlight_style(Style::default().light_green())
            .select(self.selected)
            .render(tabs_area, buf);

        if let Some(plot) = self.plots.get(self.selected) {
            plot.render(plot_area, buf);
        }
    }
}

impl Component for Plots {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match event_keycode(event) {
            Some(KeyCode::Left) => self.prev_plot(),
            Some(KeyCode::Right) => self.next_plot(),
            _ => return false,
        }
        true
    }
}
