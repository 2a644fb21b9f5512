//! Terminal rendering of a page session
//!
//! Layout, top to bottom: hero, metric strip, highlight card, then the
//! navigator (or the about panel while it is closed) beside the timeline,
//! and a key-help footer. The project drawer overlays everything when open.
//! The ambient background is painted first as cell background colors.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::core::calendar::{format_duration, YearMonth};
use crate::core::types::TaxonomyLevel;
use crate::data::experience::ExperienceRecord;
use crate::data::profile::{HighlightTarget, Profile};
use crate::skills::display::{filter_chip_line, render_bar, result_summary};
use crate::ui::background::{BlobFrame, GrainTexture, Rgb, GRAIN_SEED};
use crate::ui::drawer::{Chip, ChipKind};
use crate::ui::input::KEY_HELP;
use crate::ui::navigation::NavLevel;
use crate::ui::state::{Focus, Session};
use crate::ui::timeline::TimelineEntry;

// === PALETTE ===

const INK: Color = Color::Rgb(41, 37, 36);
const MUTED: Color = Color::Rgb(120, 113, 108);
const ACCENT: Color = Color::Rgb(79, 111, 82);
const PAPER: Color = Color::Rgb(250, 250, 248);

const BAR_WIDTH: usize = 16;
const LABEL_WIDTH: usize = 28;

fn ink() -> Style {
    Style::default().fg(INK)
}

fn muted() -> Style {
    Style::default().fg(MUTED)
}

fn strong() -> Style {
    ink().add_modifier(Modifier::BOLD)
}

fn accent() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Clip to `width` characters with a trailing ellipsis
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn panel(title: String, focused: bool) -> Block<'static> {
    let border = if focused { ACCENT } else { MUTED };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Line::from(Span::styled(title, strong())))
}

// === BACKDROP ===

/// Pre-rasterized background colors, one per cell, row-major
struct Backdrop<'a> {
    cells: &'a [Rgb],
}

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        if width == 0 {
            return;
        }
        for (index, rgb) in self.cells.iter().enumerate() {
            let x = area.x + (index % width) as u16;
            let y = area.y + (index / width) as u16;
            if y >= area.bottom() {
                break;
            }
            buf.get_mut(x, y).set_bg(to_color(*rgb));
        }
    }
}

/// Draws sessions; keeps the grain texture between frames
#[derive(Debug, Default)]
pub struct Painter {
    grain: Option<GrainTexture>,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    fn backdrop(&mut self, blobs: &BlobFrame, width: u16, height: u16) -> Vec<Rgb> {
        let mut cells = blobs.rasterize(width, height);
        let stale = self.grain.as_ref().map_or(true, |grain| grain.size() != (width, height));
        if stale {
            self.grain = Some(GrainTexture::new(GRAIN_SEED, width, height));
        }
        if let Some(grain) = &self.grain {
            grain.apply(&mut cells);
        }
        cells
    }

    pub fn draw(&mut self, frame: &mut Frame, session: &Session) {
        let area = frame.size();
        let initial;
        let blobs = match session.background().current() {
            Some(blobs) => blobs,
            None => {
                initial = BlobFrame::initial();
                &initial
            }
        };
        let cells = self.backdrop(blobs, area.width, area.height);
        frame.render_widget(Backdrop { cells: &cells }, area);

        let profile = session.dataset().profile();
        let metrics_height = if profile.metrics.is_empty() { 0 } else { 1 };
        let highlights_height = if profile.highlights.is_empty() { 0 } else { 6 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(metrics_height),
                Constraint::Length(highlights_height),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        frame.render_widget(Paragraph::new(hero_lines(profile)), rows[0]);
        frame.render_widget(Paragraph::new(metric_line(profile)), rows[1]);
        if highlights_height > 0 {
            frame.render_widget(highlight_card(session), rows[2]);
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(rows[3]);
        frame.render_widget(navigator_panel(session), columns[0]);
        frame.render_widget(timeline_panel(session, columns[1].height), columns[1]);
        frame.render_widget(Paragraph::new(footer(session)), rows[4]);

        if session.drawer().is_open() {
            let overlay = centered(area, 80, 85);
            frame.render_widget(Clear, overlay);
            frame.render_widget(drawer_panel(session), overlay);
        }
    }
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    // u32 so wide terminals cannot overflow; the result never exceeds the input
    let scale = |length: u16, percent: u16| (u32::from(length) * u32::from(percent.min(100)) / 100) as u16;
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// === PAGE SECTIONS ===

fn hero_lines(profile: &Profile) -> Vec<Line<'static>> {
    let mut contacts: Vec<Span<'static>> = Vec::new();
    for (index, contact) in profile.contacts.iter().enumerate() {
        if index > 0 {
            contacts.push(Span::styled(" · ", muted()));
        }
        contacts.push(Span::styled(contact.label.clone(), Style::default().fg(ACCENT)));
    }
    if profile.assets.resume.is_some() {
        contacts.push(Span::styled("  ⟶ résumé", muted()));
    }
    vec![
        Line::from(Span::styled(profile.name.clone(), strong())),
        Line::from(Span::styled(profile.headline.clone(), ink())),
        Line::from(contacts),
    ]
}

fn metric_line(profile: &Profile) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, metric) in profile.metrics.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  │  ", muted()));
        }
        spans.push(Span::styled(metric.label.clone(), strong()));
        if let Some(note) = &metric.note {
            spans.push(Span::styled(format!(" ({note})"), muted()));
        }
    }
    Line::from(spans)
}

fn highlight_card(session: &Session) -> Paragraph<'static> {
    let carousel = session.carousel();
    let title = format!(" Highlights {}/{} ", carousel.index() + 1, carousel.len());
    let mut lines = Vec::new();
    if let Some(highlight) = session.dataset().profile().highlights.get(carousel.index()) {
        lines.push(Line::from(Span::styled(highlight.header.clone(), strong())));
        lines.push(Line::from(Span::styled(highlight.subheader.clone(), ink())));
        if let Some(proof) = &highlight.proof {
            lines.push(Line::from(Span::styled(proof.clone(), muted())));
        }
        let hint = match highlight.target() {
            Some(HighlightTarget::Role(_)) => "Enter: open this role",
            Some(HighlightTarget::Filter(_)) => "Enter: show matching experience",
            None => "",
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(ACCENT))));
    }
    Paragraph::new(lines)
        .block(panel(title, session.focus() == Focus::Highlights))
        .wrap(Wrap { trim: true })
}

fn about_panel(session: &Session, focused: bool) -> Paragraph<'static> {
    let profile = session.dataset().profile();
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled("Press f to filter by skill", Style::default().fg(ACCENT))),
        Line::default(),
    ];
    for paragraph in &profile.overview {
        lines.push(Line::from(Span::styled(paragraph.clone(), ink())));
        lines.push(Line::default());
    }
    if !profile.certifications.is_empty() {
        lines.push(Line::from(Span::styled("Certifications", strong())));
        for cert in &profile.certifications {
            lines.push(Line::from(vec![
                Span::styled(format!("• {}", cert.name), ink()),
                Span::styled(format!(" · {} {}", cert.issuer, cert.year), muted()),
            ]));
        }
    }
    Paragraph::new(lines)
        .block(panel(" About ".to_string(), focused))
        .wrap(Wrap { trim: true })
}

fn navigator_panel(session: &Session) -> Paragraph<'static> {
    let navigator = session.navigator();
    let focused = session.focus() == Focus::Navigator;
    if navigator.level() == NavLevel::Closed {
        return about_panel(session, focused);
    }

    let crumbs = navigator.breadcrumbs(session.dataset().taxonomy());
    let mut path = vec![Span::styled("All", muted())];
    for (index, crumb) in crumbs.iter().enumerate() {
        path.push(Span::styled(" › ", muted()));
        let label = if crumb.level == TaxonomyLevel::Tool {
            crumb.label.clone()
        } else {
            format!("{} {}", index + 1, crumb.label)
        };
        path.push(Span::styled(label, accent()));
    }
    let mut lines = vec![Line::from(path), Line::default()];

    let items = session.nav_items();
    if items.is_empty() {
        lines.push(Line::from(Span::styled("Nothing listed at this level", muted())));
    }
    for (index, item) in items.iter().enumerate() {
        let marker = if item.selected { "●" } else { " " };
        let mut style = if item.selected { accent() } else { ink() };
        if focused && index == session.nav_cursor() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {:<width$}", fit(&item.label, LABEL_WIDTH), width = LABEL_WIDTH), style),
            Span::styled(render_bar(item.fill, BAR_WIDTH), Style::default().fg(ACCENT)),
            Span::styled(format!(" {}", format_duration(item.total_months)), muted()),
        ]));
    }

    let selection = navigator.selection();
    if let Some(filtered) = &session.view().filtered {
        lines.push(Line::default());
        if selection.skill().is_some() {
            lines.push(Line::from(Span::styled(
                result_summary(filtered.matches.len(), selection.tool()),
                strong(),
            )));
        }
        let labels: Vec<&str> = crumbs
            .iter()
            .filter(|crumb| crumb.level != TaxonomyLevel::Tool)
            .map(|crumb| crumb.label.as_str())
            .collect();
        lines.push(Line::from(vec![
            Span::styled(filter_chip_line(&labels, selection.tool()), ink()),
            Span::styled("  (c clears)", muted()),
        ]));
    }

    Paragraph::new(lines)
        .block(panel(" Filter by skill ".to_string(), focused))
        .wrap(Wrap { trim: false })
}

fn timeline_panel(session: &Session, height: u16) -> Paragraph<'static> {
    let dataset = session.dataset();
    let today = session.today();
    let focused = session.focus() == Focus::Timeline;
    let entries: Vec<TimelineEntry> = session
        .visible()
        .iter()
        .filter_map(|id| dataset.experience(id))
        .map(|record| TimelineEntry::new(record, today))
        .collect();

    let title = if session.view().filter_set().is_some() {
        format!(" Experience ({} of {}) ", entries.len(), dataset.len())
    } else {
        " Experience ".to_string()
    };

    let mut lines: Vec<Line<'static>> = Vec::new();
    if entries.is_empty() {
        lines.push(Line::from(Span::styled("No experience matches this filter.", muted())));
    }
    for (index, entry) in entries.iter().enumerate() {
        let mut title_style = strong();
        if focused && index == session.timeline_cursor() {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(vec![
            Span::styled(entry.title.clone(), title_style),
            Span::styled(format!("  [{}]", entry.badge), Style::default().fg(ACCENT)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {} · {} · {} ({})", entry.org, entry.role, entry.period, entry.duration),
            muted(),
        )));
    }

    // two lines per entry; keep the cursor row inside the panel
    let inner = height.saturating_sub(2);
    let cursor_row = (session.timeline_cursor() as u16).saturating_mul(2);
    let offset = cursor_row.saturating_add(2).saturating_sub(inner);

    Paragraph::new(lines)
        .block(panel(title, focused))
        .scroll((offset, 0))
}

fn footer(session: &Session) -> Line<'static> {
    let mut spans = Vec::new();
    if !session.fragment().is_empty() {
        spans.push(Span::styled(format!("{}  ", session.fragment()), accent()));
    }
    spans.push(Span::styled(KEY_HELP, muted()));
    Line::from(spans)
}

// === DRAWER ===

fn drawer_panel(session: &Session) -> Paragraph<'static> {
    let dataset = session.dataset();
    let drawer = session.drawer();
    let lines = match drawer.record(dataset) {
        Some(record) => drawer_lines(record, &drawer.chips(dataset), drawer.chip_cursor, session.today()),
        None => Vec::new(),
    };
    Paragraph::new(lines)
        .block(panel(" Project ".to_string(), true).style(Style::default().bg(PAPER)))
        .wrap(Wrap { trim: false })
        .scroll((drawer.scroll, 0))
}

fn chip_span(chip: &Chip, focused: bool) -> Span<'static> {
    let (text, mut style) = match chip.kind {
        ChipKind::Skill => (format!("[{}]", chip.name), Style::default().fg(ACCENT)),
        ChipKind::Tool => (format!("⟨{}⟩", chip.name), muted()),
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    Span::styled(text, style)
}

fn drawer_lines(record: &ExperienceRecord, chips: &[Chip], chip_cursor: usize, today: YearMonth) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(record.title.clone(), strong())),
        Line::from(Span::styled(format!("{} · {}", record.org, record.role), ink())),
        Line::from(Span::styled(
            format!(
                "{} ({})",
                record.period_label(),
                format_duration(record.duration_months_at(today))
            ),
            muted(),
        )),
    ];

    let mut badges = vec![Span::styled(format!("[{}]", record.category.badge()), accent())];
    for tag in &record.tags {
        badges.push(Span::styled(format!(" #{tag}"), muted()));
    }
    lines.push(Line::from(badges));
    lines.push(Line::default());

    if let Some(metric) = &record.metric {
        let mut spans = vec![
            Span::styled(metric.value.clone(), accent()),
            Span::styled(format!(" {}", metric.label), ink()),
        ];
        if let Some(context) = &metric.context {
            spans.push(Span::styled(format!(" ({context})"), muted()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled(record.summary.clone(), ink())));
    lines.push(Line::default());

    // chips are numbered in the same order as Drawer::chips
    let mut chip_index = 0;
    for (theme, section) in record.sections.iter() {
        lines.push(Line::from(Span::styled(theme.title(), strong())));
        for item in &section.items {
            lines.push(Line::from(Span::styled(format!("  • {item}"), ink())));
        }
        let count = section.skills.len() + section.tools.len();
        let mut spans = vec![Span::raw("  ")];
        for chip in chips.iter().skip(chip_index).take(count) {
            spans.push(chip_span(chip, chip_index == chip_cursor));
            spans.push(Span::raw(" "));
            chip_index += 1;
        }
        if count > 0 {
            lines.push(Line::from(spans));
        }
        lines.push(Line::default());
    }

    if let Some(tradeoff) = &record.tradeoff {
        lines.push(Line::from(Span::styled("Tradeoff", strong())));
        lines.push(Line::from(Span::styled(
            format!("Chose {} instead of {}, because {}", tradeoff.chose, tradeoff.instead_of, tradeoff.because),
            ink(),
        )));
        lines.push(Line::default());
    }

    if let Some(learned) = &record.learned {
        lines.push(Line::from(Span::styled("What I learned", strong())));
        lines.push(Line::from(Span::styled(learned.clone(), ink())));
        lines.push(Line::default());
    }

    for link in &record.links {
        lines.push(Line::from(vec![
            Span::styled(format!("↗ {}", link.label), Style::default().fg(ACCENT)),
            Span::styled(format!("  {}", link.href), muted()),
        ]));
    }
    lines
}
