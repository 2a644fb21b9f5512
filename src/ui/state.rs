//! Page session state
//!
//! A `Session` is the single state container for one page: navigator, drawer,
//! fragment, carousel, background and cursors all live here and nowhere else.
//! Every action that changes the filter recomputes the aggregation view and
//! the visible timeline before returning, so a render never pairs a new
//! selection with a stale list.

use std::time::Duration;

use crate::core::calendar::YearMonth;
use crate::core::config::AppConfig;
use crate::core::types::{BranchId, ExperienceId, GroupId, SkillId, TaxonomyLevel};
use crate::data::loader::Dataset;
use crate::data::profile::HighlightTarget;
use crate::skills::aggregate::{AggregationView, Aggregator, LevelMeters};
use crate::skills::resolution::JumpTarget;
use crate::skills::selection::FilterSelection;
use crate::ui::background::AmbientBackground;
use crate::ui::drawer::{Drawer, DrawerEvent};
use crate::ui::fragment::Fragment;
use crate::ui::highlights::Carousel;
use crate::ui::navigation::{NavLevel, Navigator};
use crate::ui::timeline::timeline;

/// Which panel receives cursor keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Highlights,
    Navigator,
    Timeline,
    Drawer,
}

/// Everything a visitor can do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    CursorUp,
    CursorDown,
    ScrollUp,
    ScrollDown,
    /// Enter on the focused item
    Activate,
    /// Close the drawer, or step the navigator back
    Back,
    /// "Filter by skill": open the taxonomy browser
    OpenNavigator,
    ClearFilter,
    /// Jump back to a breadcrumb (1 = branch, 2 = group, 3 = skill)
    Breadcrumb(TaxonomyLevel),
    NextHighlight,
    PrevHighlight,
    SetFragment(Fragment),
}

/// One selectable row in the navigator panel
#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub level: TaxonomyLevel,
    pub id: String,
    pub label: String,
    pub total_months: u32,
    pub fill: f32,
    pub selected: bool,
}

pub struct Session<'a> {
    dataset: &'a Dataset,
    clock: fn() -> YearMonth,
    navigator: Navigator,
    drawer: Drawer,
    fragment: Fragment,
    carousel: Carousel,
    background: AmbientBackground,
    focus: Focus,
    nav_cursor: usize,
    timeline_cursor: usize,
    view: AggregationView,
    visible: Vec<ExperienceId>,
    should_quit: bool,
}

fn compute_view(dataset: &Dataset, today: YearMonth, selection: &FilterSelection) -> AggregationView {
    let aggregator = Aggregator::new(dataset, today);
    aggregator.view(selection).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "selection no longer resolves, showing unfiltered view");
        aggregator.overview()
    })
}

impl<'a> Session<'a> {
    pub fn new(dataset: &'a Dataset, config: &AppConfig) -> Self {
        Self::with_clock(dataset, config, YearMonth::today)
    }

    /// Session with an explicit "today" source
    pub fn with_clock(dataset: &'a Dataset, config: &AppConfig, clock: fn() -> YearMonth) -> Self {
        let interval = config
            .carousel_auto_advance()
            .then(|| Duration::from_millis(config.highlight_interval_ms));
        let navigator = Navigator::new();
        let view = compute_view(dataset, clock(), navigator.selection());
        let mut session = Self {
            dataset,
            clock,
            navigator,
            drawer: Drawer::new(),
            fragment: Fragment::empty(),
            carousel: Carousel::new(dataset.profile().highlights.len(), interval),
            background: AmbientBackground::new(config.reduced_motion),
            focus: Focus::Timeline,
            nav_cursor: 0,
            timeline_cursor: 0,
            view,
            visible: Vec::new(),
            should_quit: false,
        };
        session.refresh();
        session
    }

    // === ACCESSORS ===

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn today(&self) -> YearMonth {
        (self.clock)()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn background(&self) -> &AmbientBackground {
        &self.background
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn view(&self) -> &AggregationView {
        &self.view
    }

    /// Ids shown in the timeline, in display order
    pub fn visible(&self) -> &[ExperienceId] {
        &self.visible
    }

    pub fn timeline_cursor(&self) -> usize {
        self.timeline_cursor
    }

    pub fn nav_cursor(&self) -> usize {
        self.nav_cursor
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // === DERIVED ===

    /// Recompute aggregation and the visible timeline for the current selection
    pub fn refresh(&mut self) {
        let today = self.today();
        self.view = compute_view(self.dataset, today, self.navigator.selection());
        self.visible = timeline(self.dataset, self.view.filter_set(), today)
            .into_iter()
            .map(|record| record.id.clone())
            .collect();
        self.timeline_cursor = self.timeline_cursor.min(self.visible.len().saturating_sub(1));
        self.nav_cursor = self.nav_cursor.min(self.nav_items().len().saturating_sub(1));
    }

    fn current_row(&self) -> Option<&LevelMeters> {
        match self.navigator.level() {
            NavLevel::Closed => None,
            NavLevel::BranchList => Some(&self.view.branches),
            NavLevel::GroupList => self.view.groups.as_ref(),
            NavLevel::SkillList => self.view.skills.as_ref(),
            NavLevel::SkillDetail => self.view.tools.as_ref(),
        }
    }

    /// Rows of the navigator panel at the current level
    pub fn nav_items(&self) -> Vec<NavItem> {
        let Some(row) = self.current_row() else {
            return Vec::new();
        };
        row.meters
            .iter()
            .map(|meter| NavItem {
                level: row.level,
                id: meter.id.clone(),
                label: meter.label.clone(),
                total_months: meter.total_months,
                fill: meter.fill(),
                selected: meter.selected,
            })
            .collect()
    }

    // === ACTIONS ===

    /// Apply one action; the view is current when this returns
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::FocusNext => self.cycle_focus(true),
            Action::FocusPrev => self.cycle_focus(false),
            Action::CursorUp => self.move_cursor(-1),
            Action::CursorDown => self.move_cursor(1),
            Action::ScrollUp => self.drawer.scroll = self.drawer.scroll.saturating_sub(3),
            Action::ScrollDown => self.drawer.scroll = self.drawer.scroll.saturating_add(3),
            Action::Activate => self.activate(),
            Action::Back => self.back(),
            Action::OpenNavigator => {
                self.navigator.open();
                self.focus = Focus::Navigator;
                self.nav_cursor = 0;
            }
            Action::ClearFilter => {
                self.navigator.clear();
                self.nav_cursor = 0;
                if self.focus == Focus::Navigator {
                    self.focus = Focus::Timeline;
                }
                self.refresh();
            }
            Action::Breadcrumb(level) => {
                self.navigator.activate_breadcrumb(level);
                self.nav_cursor = 0;
                self.refresh();
            }
            Action::NextHighlight => self.carousel.next(),
            Action::PrevHighlight => self.carousel.prev(),
            Action::SetFragment(fragment) => self.set_fragment(fragment),
        }
    }

    /// Change the fragment and let the drawer follow it
    pub fn set_fragment(&mut self, fragment: Fragment) {
        self.fragment = fragment;
        match self.drawer.on_fragment_change(self.dataset, &self.fragment) {
            DrawerEvent::Opened(_) | DrawerEvent::Swapped { .. } => self.focus = Focus::Drawer,
            DrawerEvent::Closed => {
                if self.focus == Focus::Drawer {
                    self.focus = Focus::Timeline;
                }
            }
            DrawerEvent::Rejected(_) | DrawerEvent::Unchanged => {}
        }
    }

    pub fn open_experience(&mut self, id: ExperienceId) {
        self.set_fragment(Fragment::from(id));
    }

    fn cycle_focus(&mut self, forward: bool) {
        if self.drawer.is_open() {
            return;
        }
        let order = [Focus::Highlights, Focus::Navigator, Focus::Timeline];
        let position = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (position + 1) % order.len()
        } else {
            (position + order.len() - 1) % order.len()
        };
        self.focus = order[next];
        if self.focus == Focus::Navigator {
            self.navigator.open();
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let step = |cursor: usize, len: usize| -> usize {
            if len == 0 {
                return 0;
            }
            (cursor as i64 + delta as i64).clamp(0, len as i64 - 1) as usize
        };
        match self.focus {
            Focus::Highlights => {
                if delta > 0 {
                    self.carousel.next();
                } else {
                    self.carousel.prev();
                }
            }
            Focus::Navigator => self.nav_cursor = step(self.nav_cursor, self.nav_items().len()),
            Focus::Timeline => self.timeline_cursor = step(self.timeline_cursor, self.visible.len()),
            Focus::Drawer => {
                let chips = self.drawer.chips(self.dataset).len();
                self.drawer.chip_cursor = step(self.drawer.chip_cursor, chips);
            }
        }
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Highlights => self.activate_highlight(),
            Focus::Navigator => self.activate_nav_item(),
            Focus::Timeline => {
                if let Some(id) = self.visible.get(self.timeline_cursor).cloned() {
                    self.open_experience(id);
                }
            }
            Focus::Drawer => self.activate_chip(),
        }
    }

    fn activate_nav_item(&mut self) {
        let items = self.nav_items();
        let Some(item) = items.get(self.nav_cursor) else {
            return;
        };
        let taxonomy = self.dataset.taxonomy();
        let result = match item.level {
            TaxonomyLevel::Branch => self.navigator.select_branch(taxonomy, &BranchId::new(item.id.as_str())),
            TaxonomyLevel::Group => self.navigator.select_group(taxonomy, &GroupId::new(item.id.as_str())),
            TaxonomyLevel::Skill => self.navigator.select_skill(taxonomy, &SkillId::new(item.id.as_str())),
            TaxonomyLevel::Tool => self.navigator.toggle_tool(taxonomy, &item.id),
        };
        if result.is_ok() {
            if item.level != TaxonomyLevel::Tool {
                self.nav_cursor = 0;
            }
            self.refresh();
        }
    }

    fn activate_chip(&mut self) {
        let chips = self.drawer.chips(self.dataset);
        let Some(chip) = chips.get(self.drawer.chip_cursor) else {
            return;
        };
        if let Some(target) = self.drawer.chip_clicked(self.dataset, chip) {
            self.fragment.clear();
            self.jump(&target);
        }
    }

    fn activate_highlight(&mut self) {
        let dataset = self.dataset;
        let Some(highlight) = dataset.profile().highlights.get(self.carousel.index()) else {
            return;
        };
        match highlight.target() {
            Some(HighlightTarget::Role(id)) => self.open_experience(id.clone()),
            Some(HighlightTarget::Filter(location)) => self.jump(&JumpTarget::Skill(location.clone())),
            None => {}
        }
    }

    /// Hand a resolved location to the navigator and show the result
    pub fn jump(&mut self, target: &JumpTarget) {
        if self.navigator.jump_to(self.dataset.taxonomy(), target).is_ok() {
            self.nav_cursor = 0;
            self.timeline_cursor = 0;
            self.focus = Focus::Timeline;
            self.refresh();
        }
    }

    fn back(&mut self) {
        if self.drawer.is_open() {
            self.set_fragment(Fragment::empty());
            return;
        }
        if self.navigator.is_open() {
            self.navigator.step_back();
            self.nav_cursor = 0;
            if !self.navigator.is_open() && self.focus == Focus::Navigator {
                self.focus = Focus::Timeline;
            }
            self.refresh();
        }
    }

    // === FRAMES ===

    /// One animation frame: background and carousel timers
    ///
    /// Returns true when something visible changed.
    pub fn on_frame(&mut self, elapsed: Duration, dt: Duration) -> bool {
        let rendered = self.background.tick(elapsed.as_millis() as u64).is_some();
        let advanced = self.carousel.tick(dt);
        rendered || advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> YearMonth {
        YearMonth::new(2026, 10).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::bundled().unwrap()
    }

    #[test]
    fn test_initial_state() {
        let ds = dataset();
        let session = Session::with_clock(&ds, &AppConfig::default(), today);
        assert_eq!(session.navigator().level(), NavLevel::Closed);
        assert!(!session.drawer().is_open());
        assert_eq!(session.visible().len(), ds.len());
        assert_eq!(session.visible()[0].as_str(), "boring-business");
    }

    #[test]
    fn test_timeline_activate_opens_drawer() {
        let ds = dataset();
        let mut session = Session::with_clock(&ds, &AppConfig::default(), today);
        session.apply(Action::CursorDown);
        session.apply(Action::Activate);
        assert_eq!(session.focus(), Focus::Drawer);
        assert_eq!(session.fragment().to_string(), format!("#{}", session.visible()[1]));

        session.apply(Action::Back);
        assert!(!session.drawer().is_open());
        assert!(session.fragment().is_empty());
        assert_eq!(session.focus(), Focus::Timeline);
    }

    #[test]
    fn test_navigator_filters_timeline_synchronously() {
        let ds = dataset();
        let mut session = Session::with_clock(&ds, &AppConfig::default(), today);
        session.apply(Action::OpenNavigator);
        assert_eq!(session.nav_items().len(), 3);

        session.apply(Action::Activate);
        assert_eq!(session.navigator().level(), NavLevel::GroupList);
        assert_eq!(session.visible().len(), ds.len());

        session.apply(Action::Activate);
        assert_eq!(session.navigator().level(), NavLevel::SkillList);
        assert_eq!(session.visible().len(), ds.len());

        session.apply(Action::Activate);
        assert_eq!(session.navigator().level(), NavLevel::SkillDetail);
        let filtered = session.view().filter_set().unwrap().len();
        assert_eq!(session.visible().len(), filtered);

        session.apply(Action::ClearFilter);
        assert_eq!(session.navigator().level(), NavLevel::Closed);
        assert_eq!(session.visible().len(), ds.len());
    }

    #[test]
    fn test_filter_highlight_jumps_to_skill_detail() {
        let ds = dataset();
        let mut session = Session::with_clock(&ds, &AppConfig::default(), today);
        let filter_index = ds
            .profile()
            .highlights
            .iter()
            .position(|h| h.target_filter.is_some())
            .unwrap();
        session.apply(Action::FocusPrev);
        session.apply(Action::FocusPrev);
        assert_eq!(session.focus(), Focus::Highlights);
        for _ in 0..filter_index {
            session.apply(Action::NextHighlight);
        }
        session.apply(Action::Activate);
        assert_eq!(session.navigator().level(), NavLevel::SkillDetail);
        assert_eq!(
            session.navigator().selection().skill().map(|s| s.as_str()),
            Some("economic-incentive-design")
        );
        assert_eq!(session.focus(), Focus::Timeline);
        assert!(!session.visible().is_empty());
    }

    #[test]
    fn test_reduced_motion_session_renders_background_once() {
        let ds = dataset();
        let config = AppConfig {
            reduced_motion: true,
            ..AppConfig::default()
        };
        let mut session = Session::with_clock(&ds, &config, today);
        let dt = Duration::from_millis(50);
        assert!(session.on_frame(Duration::ZERO, dt));
        for frame in 1..100u64 {
            assert!(!session.on_frame(dt * frame as u32, dt));
        }
        assert_eq!(session.background().frames_rendered(), 1);
        assert!(!session.carousel().auto_advance());
    }
}
