use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::clock::Clock;
use crate::engine::LapRecord;
use crate::theme::Palette;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

const LEGEND: &str = "(space) start/stop  (r)eset  (l)ap  (t)heme  (q)uit";

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.theme.palette();
        let base = Style::default().fg(palette.foreground).bg(palette.background);
        let bold = base.add_modifier(Modifier::BOLD);
        let muted = base.fg(palette.muted);

        Block::default().style(base).render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1),
                Constraint::Length(1), // time
                Constraint::Length(1), // status
                Constraint::Length(1),
                Constraint::Length(1), // controls
                Constraint::Min(3),    // laps
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("lapwatch", bold),
            Span::styled("   ", base),
            Span::styled(format!("[{}]", self.theme.toggle_label()), muted),
        ]))
        .alignment(Alignment::Right);
        header.render(chunks[0], buf);

        let screen = self.screen();
        let time_style = if screen.is_pulsing() {
            bold.fg(palette.accent)
        } else {
            bold
        };
        let time = Paragraph::new(Line::from(vec![
            Span::styled(screen.time.main.clone(), time_style),
            Span::styled(".", muted),
            Span::styled(screen.time.fractional.clone(), muted),
        ]))
        .alignment(Alignment::Center);
        time.render(chunks[2], buf);

        let status = Paragraph::new(Span::styled(
            self.engine.status().to_string(),
            muted.add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        status.render(chunks[3], buf);

        let controls = self.engine.controls();
        let button = |label: &'static str, enabled: bool| {
            if enabled {
                Span::styled(
                    format!(" [{}] ", label),
                    base.fg(palette.accent).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" [{}] ", label), muted.add_modifier(Modifier::DIM))
            }
        };
        let controls_line = Paragraph::new(Line::from(vec![
            button("START", controls.start),
            button("STOP", controls.stop),
            button("RESET", true),
            button("LAP", controls.lap),
        ]))
        .alignment(Alignment::Center);
        controls_line.render(chunks[5], buf);

        let laps_area = chunks[6];
        // borders take two columns
        let row_width = laps_area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = screen
            .laps
            .iter()
            .map(|lap| ListItem::new(lap_line(lap, row_width, &palette)))
            .collect();

        let laps = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(muted)
                .title(format!("Laps ({})", screen.laps.len()))
                .style(base),
        );
        laps.render(laps_area, buf);

        let legend = Paragraph::new(Span::styled(LEGEND, muted.add_modifier(Modifier::ITALIC)))
            .alignment(Alignment::Center);
        legend.render(chunks[7], buf);
    }
}

/// `Lap N` on the left, the time flush right
fn lap_line(lap: &LapRecord, width: usize, palette: &Palette) -> Line<'static> {
    let label = format!("Lap {}", lap.index);
    let used = label.width() + lap.formatted_time.width();
    let gap = width.saturating_sub(used).max(1);

    Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(gap)),
        Span::styled(
            lap.formatted_time.clone(),
            Style::default().fg(palette.foreground),
        ),
    ])
}
