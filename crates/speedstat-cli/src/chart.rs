//! Full-screen histogram viewer.

use std::io;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Text,
    widgets::{Axis, Block, Chart, Dataset, GraphType, LegendPosition, Widget},
};
use speedstat_stats::histogram::Histogram;

use crate::report::HistogramPlot;

/// Columns drawn per bin so bars fill their bin instead of being one cell wide.
const STRIPES_PER_BIN: u32 = 6;

/// Displays `plot` until the user presses `q` or `Esc`.
pub fn show(plot: &HistogramPlot) -> io::Result<()> {
    let mut viewer = ChartViewer {
        plot,
        show_highlight: true,
        should_exit: false,
    };
    ratatui::run(|terminal| viewer.run(terminal))
}

#[derive(Debug)]
struct ChartViewer<'a> {
    plot: &'a HistogramPlot,
    show_highlight: bool,
    should_exit: bool,
}

impl ChartViewer<'_> {
    fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.should_exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_event(&event::read()?);
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [chart_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        frame.render_widget(
            SpeedHistogram {
                plot: self.plot,
                show_highlight: self.show_highlight,
            },
            chart_area,
        );

        let highlight_status = if self.show_highlight { "on" } else { "off" };
        let help_text = Text::from(format!(
            "h: Toggle Highlight ({highlight_status}) | q/Esc: Quit"
        ))
        .style(Style::default().fg(Color::DarkGray))
        .centered();
        frame.render_widget(help_text, help_area);
    }

    fn handle_event(&mut self, event: &Event) {
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
                KeyCode::Char('h') => self.show_highlight = !self.show_highlight,
                _ => {}
            }
        }
    }
}

/// Bar points for `histogram`, several per bin so each bar has visible width.
fn bar_points(histogram: &Histogram) -> Vec<(f64, f64)> {
    histogram
        .bins
        .iter()
        .flat_map(|bin| {
            let width = bin.range.end - bin.range.start;
            #[expect(clippy::cast_precision_loss)]
            let height = bin.count as f64;
            (0..STRIPES_PER_BIN).map(move |stripe| {
                let offset = (f64::from(stripe) + 0.5) / f64::from(STRIPES_PER_BIN);
                (bin.range.start + width * offset, height)
            })
        })
        .filter(|&(_, height)| height > 0.0)
        .collect()
}

struct SpeedHistogram<'a> {
    plot: &'a HistogramPlot,
    show_highlight: bool,
}

impl Widget for SpeedHistogram<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let plot = self.plot;
        let all_data = bar_points(&plot.all);
        let highlighted_data = bar_points(&plot.highlighted);

        let x_bounds = [plot.edges.start(), plot.edges.end()];
        let y_max = (plot.all.max_count().max(1) as f64 * 1.1).ceil();
        let threshold_data = [(plot.threshold, 0.0), (plot.threshold, y_max)];

        let mut datasets = vec![
            Dataset::default()
                .name(plot.all_label.as_str())
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(Color::Blue))
                .data(&all_data),
        ];
        if self.show_highlight {
            datasets.push(
                Dataset::default()
                    .name(plot.highlighted_label.as_str())
                    .marker(Marker::HalfBlock)
                    .graph_type(GraphType::Bar)
                    .style(Style::default().fg(Color::Red))
                    .data(&highlighted_data),
            );
        }
        datasets.push(
            Dataset::default()
                .name(plot.threshold_label.as_str())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                )
                .data(&threshold_data),
        );

        let x_axis = Axis::default()
            .title("Speed (mph)")
            .bounds(x_bounds)
            .labels([
                format!("{:.1}", x_bounds[0]),
                format!("{:.1}", f64::midpoint(x_bounds[0], x_bounds[1])),
                format!("{:.1}", x_bounds[1]),
            ]);
        let y_axis = Axis::default()
            .title("Frequency")
            .bounds([0.0, y_max])
            .labels([
                "0".to_owned(),
                format!("{:.0}", y_max / 2.0),
                format!("{y_max:.0}"),
            ]);

        let chart = Chart::new(datasets)
            .block(Block::bordered().title("Vehicle Speed Distribution and Excessive Speeders"))
            .x_axis(x_axis)
            .y_axis(y_axis)
            .legend_position(Some(LegendPosition::TopRight))
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

        Widget::render(chart, area, buf);
    }
}
