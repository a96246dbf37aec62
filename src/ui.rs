use crate::bracket::LiveValue;
use crate::session::{Change, ComparisonState};
use crate::view::ComparisonView;
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;

const ACCENT: Color = Color::Rgb(0x1E, 0x30, 0xD8);

/// Re-fetches the live value on demand (bound to `r`)
pub type Refresh = Box<dyn FnMut() -> Result<Option<LiveValue>>>;

pub struct App {
    pub state: ComparisonState,
    pub subject: String,
    pub subject_url: String,
    pub date: NaiveDate,
    pub vertical_strip: bool,
    pub status: String,
    refresh: Refresh,
}

impl App {
    pub fn new(
        state: ComparisonState,
        subject: &str,
        subject_url: &str,
        date: NaiveDate,
        refresh: Refresh,
    ) -> Self {
        Self {
            state,
            subject: subject.to_string(),
            subject_url: subject_url.to_string(),
            date,
            vertical_strip: false,
            status: String::from("Ready"),
            refresh,
        }
    }

    pub fn view(&self) -> Option<ComparisonView> {
        self.state.view(self.date, &self.subject, &self.subject_url)
    }

    pub fn toggle_orientation(&mut self) {
        self.vertical_strip = !self.vertical_strip;
    }

    pub fn refresh(&mut self) {
        self.status = match (self.refresh)() {
            Ok(live) => match self.state.set_live_value(live) {
                Change::Updated => String::from("Refreshed: comparison updated"),
                Change::Unchanged => String::from("Refreshed: no change"),
            },
            Err(e) => {
                log::error!("Refresh failed: {:#}", e);
                format!("Refresh failed: {}", e)
            }
        };
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') => app.refresh(),
                KeyCode::Char('o') => app.toggle_orientation(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Headline
            Constraint::Min(0),    // Featured entry + strip
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    match app.view() {
        Some(view) => {
            render_headline(f, chunks[0], &view);

            let body = if app.vertical_strip {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(0), Constraint::Length(24)])
                    .split(chunks[1])
            } else {
                Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(chunks[1])
            };
            render_featured(f, body[0], &view);
            render_strip(f, body[1], &view, app.vertical_strip);
        }
        None => render_empty(f, chunks[0].union(chunks[1])),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_headline(f: &mut Frame, area: Rect, view: &ComparisonView) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let accent = bold.fg(ACCENT);

    let text = vec![
        Line::from(vec![
            Span::styled("On ", bold),
            Span::styled(format!("{},", view.date), accent),
        ]),
        Line::from(vec![
            Span::styled(view.subject.clone(), bold.add_modifier(Modifier::UNDERLINED)),
            Span::styled(" market cap is ", bold),
            Span::styled(format!("${}", view.market_cap_display), accent),
        ]),
        Line::from(Span::styled(view.category_line(), bold)),
    ];

    let headline = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(headline, area);
}

fn render_featured(f: &mut Frame, area: Rect, view: &ComparisonView) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            view.label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            view.value_display.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            view.image_ref.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let featured = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Worth the same as "));

    f.render_widget(featured, area);
}

fn strip_span(label: &str, highlighted: bool) -> Span<'static> {
    if highlighted {
        Span::styled(
            format!("[{}]", label),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label.to_string(), Style::default().fg(Color::DarkGray))
    }
}

fn render_strip(f: &mut Frame, area: Rect, view: &ComparisonView, vertical: bool) {
    let items = view.strip_ordered(vertical);

    let text: Vec<Line> = if vertical {
        items
            .iter()
            .map(|item| Line::from(strip_span(&item.label, item.highlighted)))
            .collect()
    } else {
        let mut spans = vec![];
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  │  "));
            }
            spans.push(strip_span(&item.label, item.highlighted));
        }
        vec![Line::from(spans)]
    };

    let strip = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Nearby "));

    f.render_widget(strip, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let message = Paragraph::new("No comparison available (no market value or empty table)")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(message, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(format!(" {} ", app.status), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh | "),
        Span::styled("o", Style::default().fg(Color::Yellow)),
        Span::raw(" Layout | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
