//! Interactive terminal demo for the choicebox widgets.
//!
//! Tab cycles focus between a single-select combobox, a multi-select, a
//! server-backed combobox, and a date range picker. Ctrl+Q quits. Mouse
//! clicks exercise outside-click dismissal.

use std::fs::File;
use std::io::{Write, stdout};
use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use crossterm::cursor::MoveTo;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use futures::{FutureExt, StreamExt};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use choicebox::keybinds::convert_key_event;
use choicebox::prelude::*;

const DROPDOWN_ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    City,
    Tags,
    Remote,
    Period,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::City => Focus::Tags,
            Focus::Tags => Focus::Remote,
            Focus::Remote => Focus::Period,
            Focus::Period => Focus::City,
        }
    }
}

struct Demo {
    city: Combobox,
    tags: MultiCombobox,
    remote: RemoteCombobox,
    period: DateRangePicker,
    registry: DismissRegistry,
    guards: Vec<DismissGuard>,
    focus: Focus,
}

impl Demo {
    fn new() -> Self {
        let city = Combobox::with_choices(cities());
        city.set_label("Destination");
        city.set_placeholder("Pick a city");
        city.set_clearable(true);
        city.set_creatable(true);

        let tags = MultiCombobox::with_choices(tags());
        tags.set_label("Tags");
        tags.set_placeholder("Add tags");
        tags.set_max_selections(Some(3));

        let remote = RemoteCombobox::new(airport_loader())
            .with_defaults(airports_named("a"))
            .with_debounce(Duration::from_millis(300));
        remote.combobox().set_label("Airport (remote)");
        remote.combobox().set_placeholder("Type to search");

        let period = DateRangePicker::new();
        period.set_label("Period");
        period.set_presets(default_presets());

        let registry = DismissRegistry::new();
        let guards = vec![
            registry.subscribe(Box::new(city.clone())),
            registry.subscribe(Box::new(tags.clone())),
            registry.subscribe(Box::new(remote.combobox().clone())),
            registry.subscribe(Box::new(period.clone())),
        ];

        Self {
            city,
            tags,
            remote,
            period,
            registry,
            guards,
            focus: Focus::City,
        }
    }

    /// Route a key to the focused widget. Returns false on quit.
    fn handle_key(&mut self, combo: &KeyCombo) -> bool {
        if combo.modifiers.ctrl && combo.key == Key::Char('q') {
            return false;
        }

        let result = match self.focus {
            Focus::City => {
                let (result, events) = self.city.handle_key(combo);
                if let Some(change) = events.change {
                    info!("city changed: {:?}", change.value);
                }
                if let Some(request) = events.create {
                    self.resolve_create(request);
                }
                result
            }
            Focus::Tags => {
                let (result, events) = self.tags.handle_key(combo);
                if let Some(change) = events.change {
                    info!("tags changed: {:?}", change.values);
                }
                result
            }
            Focus::Remote => {
                let (result, events) = self.remote.handle_key(combo);
                if let Some(change) = events.change {
                    info!("airport changed: {:?}", change.value);
                }
                result
            }
            Focus::Period => {
                let (result, events) = self.period.handle_key(combo);
                if let Some(change) = events.change {
                    info!("period changed: {:?}..{:?}", change.start, change.end);
                }
                result
            }
        };

        if result == EventResult::Ignored && combo.key == Key::Tab {
            self.focus = self.focus.next();
        }
        true
    }

    /// Demo creation: anything but an empty name succeeds.
    fn resolve_create(&self, request: CreateRequest) {
        let name = request.text;
        if name.len() < 3 {
            self.city.create_failed("name too short");
            return;
        }
        let mut choices = cities();
        choices.push(Choice::new(name.to_lowercase(), name.clone()));
        self.city.set_choices(choices);
        self.city.create_succeeded();
        self.city.select(&name.to_lowercase());
        info!("created city {name:?}");
    }

    fn render(&self) -> std::io::Result<()> {
        let mut out = stdout();
        let (cols, _) = crossterm::terminal::size()?;
        let width = cols as usize;
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

        let mut row: u16 = 0;
        let mut put = |out: &mut std::io::Stdout, text: String| -> std::io::Result<u16> {
            queue!(out, MoveTo(0, row), Print(truncate_to(&text, width)))?;
            let at = row;
            row += 1;
            Ok(at)
        };

        put(&mut out, "choicebox demo - Tab to move, Ctrl+Q to quit".into())?;
        put(&mut out, String::new())?;

        // Single-select
        let marker = if self.focus == Focus::City { ">" } else { " " };
        let value = self
            .city
            .selected_label()
            .unwrap_or_else(|| self.city.placeholder());
        let top = put(&mut out, format!("{marker} Destination: [{value}]"))?;
        self.city
            .set_anchor_rect(Rect::new(0, top, cols, dropdown_height(self.city.is_open())));
        if self.city.is_open() {
            put(&mut out, format!("    search: {}", self.city.search_text()))?;
            if self.city.filtered_len() == 0 {
                put(&mut out, format!("    {}", self.city.empty_message()))?;
            }
            for (i, choice) in self
                .city
                .filtered_choices()
                .iter()
                .take(DROPDOWN_ROWS)
                .enumerate()
            {
                put(&mut out, dropdown_line(i, self.city.highlight(), choice))?;
            }
        }
        if let Some(error) = self.city.error() {
            put(&mut out, format!("    ! {error}"))?;
        }
        put(&mut out, String::new())?;

        // Multi-select
        let marker = if self.focus == Focus::Tags { ">" } else { " " };
        let chips: Vec<String> = self
            .tags
            .selected_choices()
            .iter()
            .map(|c| format!("[{} x]", c.label))
            .collect();
        let chips = if chips.is_empty() {
            self.tags.placeholder()
        } else {
            chips.join(" ")
        };
        let top = put(&mut out, format!("{marker} Tags: {chips}"))?;
        self.tags
            .set_anchor_rect(Rect::new(0, top, cols, dropdown_height(self.tags.is_open())));
        if self.tags.is_open() {
            put(&mut out, format!("    search: {}", self.tags.search_text()))?;
            for (i, choice) in self
                .tags
                .filtered_choices()
                .iter()
                .take(DROPDOWN_ROWS)
                .enumerate()
            {
                let mark = if self.tags.is_selected(&choice.value) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let cursor = if i == self.tags.highlight() { ">" } else { " " };
                put(&mut out, format!("   {cursor}{mark} {}", choice.label))?;
            }
        }
        put(&mut out, String::new())?;

        // Remote
        let marker = if self.focus == Focus::Remote { ">" } else { " " };
        let combobox = self.remote.combobox();
        let value = combobox
            .selected_label()
            .unwrap_or_else(|| combobox.placeholder());
        let status = if self.remote.is_loading() {
            " (loading…)"
        } else {
            ""
        };
        let top = put(&mut out, format!("{marker} Airport: [{value}]{status}"))?;
        combobox.set_anchor_rect(Rect::new(0, top, cols, dropdown_height(combobox.is_open())));
        if combobox.is_open() {
            put(&mut out, format!("    search: {}", combobox.search_text()))?;
            for (i, choice) in combobox
                .filtered_choices()
                .iter()
                .take(DROPDOWN_ROWS)
                .enumerate()
            {
                put(&mut out, dropdown_line(i, combobox.highlight(), choice))?;
            }
        }
        put(&mut out, String::new())?;

        // Date range
        let marker = if self.focus == Focus::Period { ">" } else { " " };
        let range = self.period.range();
        let shown = match (range.start, range.end) {
            (Some(start), Some(end)) => {
                format!("{} to {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
            }
            (Some(start), None) => format!("{} to ...", start.format("%d/%m/%Y")),
            _ => self.period.placeholder(),
        };
        let top = put(&mut out, format!("{marker} Period: [{shown}]"))?;
        let calendar_height = if self.period.is_open() { 10 } else { 1 };
        self.period
            .set_anchor_rect(Rect::new(0, top, cols, calendar_height));
        if self.period.is_open() {
            let (year, month) = self.period.view();
            put(
                &mut out,
                format!("    {:>12} {year}  (PgUp/PgDn)", month_name(month)),
            )?;
            put(&mut out, "     Su Mo Tu We Th Fr Sa".into())?;
            let grid = self.period.grid();
            for week in grid.chunks(7) {
                let mut line = String::from("    ");
                for day in week {
                    let cell = if Some(*day) == self.period.hovered() {
                        format!("[{:>2}]", day.day())
                    } else if self.period.in_preview(*day) {
                        format!("<{:>2}>", day.day())
                    } else if choicebox::daterange::calendar::in_view_month(*day, year, month) {
                        format!(" {:>2} ", day.day())
                    } else {
                        "  · ".to_string()
                    };
                    line.push_str(&cell);
                }
                put(&mut out, line)?;
            }
            let presets = self.period.preset_labels().join(" | ");
            put(&mut out, format!("    presets: {presets}"))?;
        }

        out.flush()
    }
}

fn dropdown_height(open: bool) -> u16 {
    if open { (DROPDOWN_ROWS + 2) as u16 } else { 1 }
}

fn dropdown_line(index: usize, highlight: usize, choice: &Choice) -> String {
    let cursor = if index == highlight { ">" } else { " " };
    let disabled = if choice.disabled { " (unavailable)" } else { "" };
    match &choice.description {
        Some(description) => format!("   {cursor} {} ({description}){disabled}", choice.label),
        None => format!("   {cursor} {}{disabled}", choice.label),
    }
}

fn month_name(month: u32) -> &'static str {
    [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ]
    .get(month as usize - 1)
    .copied()
    .unwrap_or("?")
}

fn truncate_to(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn cities() -> Vec<Choice> {
    vec![
        Choice::new("lisboa", "Lisboa").with_description("Portugal"),
        Choice::new("porto", "Porto").with_description("Portugal"),
        Choice::new("faro", "Faro").with_description("Portugal"),
        Choice::new("madrid", "Madrid").with_description("Spain"),
        Choice::new("paris", "Paris").with_description("France"),
        Choice::new("atlantis", "Atlantis").disabled(),
    ]
}

fn tags() -> Vec<Choice> {
    vec![
        Choice::new("beach", "Beach"),
        Choice::new("city-break", "City break"),
        Choice::new("family", "Family"),
        Choice::new("honeymoon", "Honeymoon"),
        Choice::new("ski", "Ski"),
    ]
}

fn airports_named(query: &str) -> Vec<Choice> {
    let needle = query.to_lowercase();
    [
        ("LIS", "Lisbon Humberto Delgado"),
        ("OPO", "Porto Francisco Sá Carneiro"),
        ("FAO", "Faro"),
        ("MAD", "Madrid Barajas"),
        ("CDG", "Paris Charles de Gaulle"),
        ("ORY", "Paris Orly"),
    ]
    .iter()
    .filter(|(code, name)| {
        code.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
    })
    .map(|(code, name)| Choice::new(*code, format!("{name} ({code})")))
    .collect()
}

/// Pretend backend: answers after a short delay.
fn airport_loader() -> Loader<()> {
    Arc::new(|query: String| {
        async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Ok(airports_named(&query))
        }
        .boxed()
    })
}

async fn run(demo: &mut Demo) -> std::io::Result<()> {
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(Duration::from_millis(100));
    demo.render()?;

    loop {
        tokio::select! {
            maybe_event = events.next().fuse() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                        if let Some(combo) = convert_key_event(key)
                            && !demo.handle_key(&combo)
                        {
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                            for id in demo.registry.pointer_down(mouse.column, mouse.row) {
                                info!("dismissed {id} by outside click");
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err),
                    None => return Ok(()),
                }
            }
            _ = redraw.tick() => {}
        }
        demo.render()?;
    }
}

#[tokio::main]
async fn main() {
    let log_file = File::create("choicebox-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    enable_raw_mode().expect("Failed to enable raw mode");
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)
        .expect("Failed to enter alternate screen");

    let mut demo = Demo::new();
    let result = run(&mut demo).await;
    demo.remote.shutdown();
    demo.guards.clear();

    execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)
        .expect("Failed to leave alternate screen");
    disable_raw_mode().expect("Failed to disable raw mode");

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }
}
