//! Popup Timeline
//!
//! The lifecycle of the floating cycle popup:
//!
//! ```text
//! Hidden ──show──▶ Expanding ──next frame──▶ Expanded ──collapse timer──▶ Collapsing
//!    ▲                                          ▲                             │
//!    │                                          └──────── show (same key) ────┤
//!    └──────────────────────── hide timer / layer change ─────────────────────┘
//! ```
//!
//! Expanding only exists when animation is on: it holds the chips in their
//! collapsed pose for one frame so the fan-out is actually animated.
//!
//! Time is never read from a clock in here. Every entry point takes `now`,
//! and [`PopupTimeline::tick`] fires whichever timers are due.

use std::time::Duration;

use bevy::prelude::*;
use log::debug;

use crate::tools::{ToolDescriptor, DEFAULT_LAYER_ICON};

/// Animation timings shared by the scheduler and the chip presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupTiming {
    /// Duration of each chip's transform/opacity animation
    pub transform: Duration,
    /// Extra delay per chip while fanning out, left to right
    pub fan_stagger: Duration,
    /// Extra delay per chip while collapsing, right to left
    pub collapse_stagger: Duration,
    /// Slack after the hold so the last collapse frame renders before teardown
    pub render_buffer: Duration,
    /// Holds shorter than this are raised to it
    pub min_hold: Duration,
}

impl Default for PopupTiming {
    fn default() -> Self {
        Self {
            transform: Duration::from_millis(620),
            fan_stagger: Duration::from_millis(34),
            collapse_stagger: Duration::from_millis(26),
            render_buffer: Duration::from_millis(40),
            min_hold: Duration::from_millis(200),
        }
    }
}

/// When, relative to a show, the collapse starts and the popup goes away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseSchedule {
    pub collapse_at: Duration,
    pub hide_at: Duration,
}

impl PopupTiming {
    /// Worst-case time for the whole row to finish collapsing
    pub fn collapse_duration(&self, chip_count: usize) -> Duration {
        let trailing = chip_count.max(1) as u32 - 1;
        self.transform + self.collapse_stagger * trailing
    }

    /// Start the collapse so it ends at `hold`, then tear down after the buffer
    pub fn schedule(&self, hold: Duration, chip_count: usize) -> CollapseSchedule {
        let hold = hold.max(self.min_hold);
        CollapseSchedule {
            collapse_at: hold.saturating_sub(self.collapse_duration(chip_count)),
            hide_at: hold + self.render_buffer,
        }
    }

    /// Fan-out delay of chip `index`
    pub fn fan_delay(&self, index: usize) -> Duration {
        self.fan_stagger * index as u32
    }

    /// Collapse delay of chip `index`: the rightmost chip goes first
    pub fn collapse_delay(&self, index: usize, chip_count: usize) -> Duration {
        let from_right = chip_count.saturating_sub(index + 1);
        self.collapse_stagger * from_right as u32
    }
}

/// Popup settings resolved from the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupSettings {
    pub enabled: bool,
    pub hold: Duration,
    pub show_layer_icon: bool,
    pub animate: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PopupPhase {
    #[default]
    Hidden,
    Expanding,
    Expanded,
    Collapsing,
}

/// One tile in the popup row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupChip {
    /// Position in the row; drives both offset and stagger
    pub index: usize,
    pub title: String,
    pub icon: String,
    /// The leading chip that stands for the layer itself
    pub is_layer: bool,
}

/// What the cycle engine asks the popup to show
#[derive(Debug, Clone, Copy)]
pub struct PopupRequest<'a> {
    pub layer_id: &'a str,
    pub layer_icon: Option<&'a str>,
    pub tools: &'a [ToolDescriptor],
    /// Index into `tools`, not into the chip row
    pub active_index: usize,
}

/// The live popup and the two timers it owns
#[derive(Debug, Clone)]
pub struct PopupSession {
    key: String,
    build_id: u64,
    chips: Vec<PopupChip>,
    active_chip: usize,
    phase: PopupPhase,
    phase_started: Duration,
    anchor: Vec2,
    animate: bool,
    collapse_timer: Option<Duration>,
    hide_timer: Option<Duration>,
}

impl PopupSession {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Changes on every rebuild, so views know to respawn
    pub fn build_id(&self) -> u64 {
        self.build_id
    }

    pub fn chips(&self) -> &[PopupChip] {
        &self.chips
    }

    pub fn chip_count(&self) -> usize {
        self.chips.len()
    }

    pub fn active_chip_index(&self) -> usize {
        self.active_chip
    }

    pub fn phase(&self) -> PopupPhase {
        self.phase
    }

    /// When the current phase was entered
    pub fn phase_started(&self) -> Duration {
        self.phase_started
    }

    /// Screen position the row hangs above
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn is_animated(&self) -> bool {
        self.animate
    }

    /// Absolute time the collapse is due, if one is pending
    pub fn pending_collapse(&self) -> Option<Duration> {
        self.collapse_timer
    }

    /// Absolute time of teardown, if one is pending
    pub fn pending_hide(&self) -> Option<Duration> {
        self.hide_timer
    }

    pub fn cancel_pending(&mut self) {
        self.collapse_timer = None;
        self.hide_timer = None;
    }

    fn enter(&mut self, phase: PopupPhase, at: Duration) {
        debug!("popup {:?} -> {:?} at {:?}", self.phase, phase, at);
        self.phase = phase;
        self.phase_started = at;
    }
}

/// Owner of the single popup session
#[derive(Resource, Debug, Default)]
pub struct PopupTimeline {
    timing: PopupTiming,
    session: Option<PopupSession>,
    builds: u64,
}

impl PopupTimeline {
    pub fn new(timing: PopupTiming) -> Self {
        Self {
            timing,
            session: None,
            builds: 0,
        }
    }

    pub fn timing(&self) -> &PopupTiming {
        &self.timing
    }

    pub fn session(&self) -> Option<&PopupSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> PopupPhase {
        self.session
            .as_ref()
            .map_or(PopupPhase::Hidden, PopupSession::phase)
    }

    pub fn session_key(layer_id: &str, tool_count: usize, show_layer_icon: bool) -> String {
        format!("{layer_id}|{tool_count}|{show_layer_icon}")
    }

    /// Show the popup, or refresh the live one, and restart its timers.
    ///
    /// A live session with the same key only moves its highlight; one that
    /// is collapsing goes back to Expanded. Anything else rebuilds the row.
    pub fn show_or_update(
        &mut self,
        request: PopupRequest<'_>,
        settings: &PopupSettings,
        cursor: Vec2,
        now: Duration,
    ) {
        if !settings.enabled {
            return;
        }

        let key = Self::session_key(
            request.layer_id,
            request.tools.len(),
            settings.show_layer_icon,
        );
        let offset = usize::from(settings.show_layer_icon);
        let active_chip = request.active_index + offset;

        let reusable = self
            .session
            .as_ref()
            .is_some_and(|session| session.key == key);

        if reusable {
            if let Some(session) = self.session.as_mut() {
                session.active_chip = active_chip;
                if session.phase == PopupPhase::Collapsing {
                    session.enter(PopupPhase::Expanded, now);
                }
            }
        } else {
            self.hide_immediate();
            self.session = Some(self.build_session(
                key,
                &request,
                settings,
                active_chip,
                cursor,
                now,
            ));
        }

        let timing = self.timing;
        if let Some(session) = self.session.as_mut() {
            let schedule = timing.schedule(settings.hold, session.chip_count());
            session.cancel_pending();
            session.collapse_timer = Some(now + schedule.collapse_at);
            session.hide_timer = Some(now + schedule.hide_at);
        }
    }

    fn build_session(
        &mut self,
        key: String,
        request: &PopupRequest<'_>,
        settings: &PopupSettings,
        active_chip: usize,
        cursor: Vec2,
        now: Duration,
    ) -> PopupSession {
        let mut chips = Vec::with_capacity(request.tools.len() + 1);
        if settings.show_layer_icon {
            chips.push(PopupChip {
                index: 0,
                title: request.layer_id.to_string(),
                icon: request.layer_icon.unwrap_or(DEFAULT_LAYER_ICON).to_string(),
                is_layer: true,
            });
        }
        for tool in request.tools {
            chips.push(PopupChip {
                index: chips.len(),
                title: tool.display_label.clone(),
                icon: tool.icon_glyph.clone(),
                is_layer: false,
            });
        }

        self.builds += 1;
        let phase = if settings.animate {
            PopupPhase::Expanding
        } else {
            PopupPhase::Expanded
        };
        debug!("popup built: {key} with {} chips, {phase:?}", chips.len());

        PopupSession {
            key,
            build_id: self.builds,
            chips,
            active_chip,
            phase,
            phase_started: now,
            anchor: cursor,
            animate: settings.animate,
            collapse_timer: None,
            hide_timer: None,
        }
    }

    /// Advance the timeline to `now`, firing anything that is due
    pub fn tick(&mut self, now: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        // Fan out one frame after the build so the collapsed pose gets drawn
        if session.phase == PopupPhase::Expanding && now > session.phase_started {
            session.enter(PopupPhase::Expanded, now);
        }

        if let Some(due) = session.collapse_timer {
            if now >= due && session.phase == PopupPhase::Expanded {
                session.collapse_timer = None;
                session.enter(PopupPhase::Collapsing, due.max(session.phase_started));
            }
        }

        if session.hide_timer.is_some_and(|due| now >= due) {
            self.hide_immediate();
        }
    }

    /// Tear down the popup now, whatever state it is in
    pub fn hide_immediate(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel_pending();
            debug!("popup hidden: {}", session.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn tools(n: usize) -> Vec<ToolDescriptor> {
        (0..n)
            .map(|i| ToolDescriptor::new(format!("tool{i}"), format!("Tool {i}"), "*"))
            .collect()
    }

    fn settings() -> PopupSettings {
        PopupSettings {
            enabled: true,
            hold: ms(900),
            show_layer_icon: false,
            animate: true,
        }
    }

    fn show(timeline: &mut PopupTimeline, tools: &[ToolDescriptor], active: usize, now: Duration) {
        show_with(timeline, "walls", tools, active, &settings(), now);
    }

    fn show_with(
        timeline: &mut PopupTimeline,
        layer: &str,
        tools: &[ToolDescriptor],
        active: usize,
        settings: &PopupSettings,
        now: Duration,
    ) {
        let request = PopupRequest {
            layer_id: layer,
            layer_icon: None,
            tools,
            active_index: active,
        };
        timeline.show_or_update(request, settings, Vec2::new(100.0, 100.0), now);
    }

    #[test]
    fn schedule_finishes_collapse_at_hold() {
        let timing = PopupTiming::default();
        let schedule = timing.schedule(ms(900), 5);
        assert_eq!(schedule.collapse_at, ms(176));
        assert_eq!(schedule.hide_at, ms(940));
    }

    #[test]
    fn long_rows_collapse_immediately() {
        let timing = PopupTiming::default();
        // 620 + 19 * 26 = 1114 > 900
        assert_eq!(timing.schedule(ms(900), 20).collapse_at, Duration::ZERO);
    }

    #[test]
    fn short_holds_are_raised_to_minimum() {
        let timing = PopupTiming::default();
        assert_eq!(timing.schedule(ms(10), 1).hide_at, ms(240));
    }

    #[test]
    fn stagger_is_mirrored_between_fan_and_collapse() {
        let timing = PopupTiming::default();
        assert_eq!(timing.fan_delay(0), Duration::ZERO);
        assert_eq!(timing.fan_delay(4), ms(136));
        assert_eq!(timing.collapse_delay(4, 5), Duration::ZERO);
        assert_eq!(timing.collapse_delay(0, 5), ms(104));
    }

    #[test]
    fn first_show_expands_on_next_frame() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(5);
        show(&mut timeline, &tools, 2, ms(1000));
        assert_eq!(timeline.phase(), PopupPhase::Expanding);

        timeline.tick(ms(1000));
        assert_eq!(timeline.phase(), PopupPhase::Expanding);

        timeline.tick(ms(1016));
        assert_eq!(timeline.phase(), PopupPhase::Expanded);
    }

    #[test]
    fn unanimated_show_is_expanded_immediately() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(3);
        let settings = PopupSettings {
            animate: false,
            ..settings()
        };
        show_with(&mut timeline, "walls", &tools, 0, &settings, ms(0));
        assert_eq!(timeline.phase(), PopupPhase::Expanded);
    }

    #[test]
    fn full_lifecycle_runs_on_schedule() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(5);
        show(&mut timeline, &tools, 0, ms(0));
        timeline.tick(ms(16));

        timeline.tick(ms(175));
        assert_eq!(timeline.phase(), PopupPhase::Expanded);
        timeline.tick(ms(176));
        assert_eq!(timeline.phase(), PopupPhase::Collapsing);
        assert_eq!(timeline.session().unwrap().phase_started(), ms(176));

        timeline.tick(ms(939));
        assert_eq!(timeline.phase(), PopupPhase::Collapsing);
        timeline.tick(ms(940));
        assert_eq!(timeline.phase(), PopupPhase::Hidden);
        assert!(timeline.session().is_none());
    }

    #[test]
    fn same_key_updates_highlight_without_rebuild() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(4);
        show(&mut timeline, &tools, 0, ms(0));
        let build = timeline.session().unwrap().build_id();

        show(&mut timeline, &tools, 3, ms(100));
        let session = timeline.session().unwrap();
        assert_eq!(session.build_id(), build);
        assert_eq!(session.active_chip_index(), 3);
    }

    #[test]
    fn reshow_while_collapsing_re_expands_and_reschedules() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(5);
        show(&mut timeline, &tools, 0, ms(0));
        timeline.tick(ms(16));
        timeline.tick(ms(500));
        assert_eq!(timeline.phase(), PopupPhase::Collapsing);

        show(&mut timeline, &tools, 1, ms(600));
        let session = timeline.session().unwrap();
        assert_eq!(session.phase(), PopupPhase::Expanded);
        assert_eq!(session.pending_collapse(), Some(ms(776)));
        assert_eq!(session.pending_hide(), Some(ms(1540)));

        // The old teardown time passes without effect
        timeline.tick(ms(940));
        assert_eq!(timeline.phase(), PopupPhase::Collapsing);
        timeline.tick(ms(1540));
        assert_eq!(timeline.phase(), PopupPhase::Hidden);
    }

    #[test]
    fn different_key_rebuilds() {
        let mut timeline = PopupTimeline::default();
        let walls = tools(3);
        show(&mut timeline, &walls, 0, ms(0));
        let first = timeline.session().unwrap().build_id();

        let tokens = tools(2);
        show_with(&mut timeline, "tokens", &tokens, 1, &settings(), ms(50));
        let session = timeline.session().unwrap();
        assert_ne!(session.build_id(), first);
        assert_eq!(session.key(), "tokens|2|false");
        assert_eq!(session.phase(), PopupPhase::Expanding);
    }

    #[test]
    fn layer_chip_shifts_active_index() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(3);
        let settings = PopupSettings {
            show_layer_icon: true,
            ..settings()
        };
        show_with(&mut timeline, "walls", &tools, 1, &settings, ms(0));

        let session = timeline.session().unwrap();
        assert_eq!(session.chip_count(), 4);
        assert!(session.chips()[0].is_layer);
        assert_eq!(session.chips()[0].icon, DEFAULT_LAYER_ICON);
        assert_eq!(session.active_chip_index(), 2);
        assert_eq!(session.key(), "walls|3|true");
    }

    #[test]
    fn disabled_popup_is_a_no_op() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(3);
        let settings = PopupSettings {
            enabled: false,
            ..settings()
        };
        show_with(&mut timeline, "walls", &tools, 0, &settings, ms(0));
        assert!(timeline.session().is_none());
    }

    #[test]
    fn hide_immediate_clears_everything() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(3);
        show(&mut timeline, &tools, 0, ms(0));
        timeline.tick(ms(16));

        timeline.hide_immediate();
        assert_eq!(timeline.phase(), PopupPhase::Hidden);
        assert!(timeline.session().is_none());

        // Nothing left to fire
        timeline.tick(ms(10_000));
        assert!(timeline.session().is_none());
    }

    #[test]
    fn collapse_waits_for_fan_out_frame() {
        let mut timeline = PopupTimeline::default();
        let tools = tools(10);
        let settings = PopupSettings {
            hold: ms(200),
            ..settings()
        };
        show_with(&mut timeline, "walls", &tools, 0, &settings, ms(0));

        // collapse_at is zero, but the row hasn't fanned out yet
        timeline.tick(ms(0));
        assert_eq!(timeline.phase(), PopupPhase::Expanding);

        // Fan-out and the overdue collapse land on the same tick
        timeline.tick(ms(16));
        assert_eq!(timeline.phase(), PopupPhase::Collapsing);
        assert_eq!(timeline.session().unwrap().phase_started(), ms(16));
        assert_eq!(timeline.session().unwrap().pending_collapse(), None);
    }
}
