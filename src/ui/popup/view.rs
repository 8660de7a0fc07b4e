//! Cycle Popup UI
//!
//! Mirrors the [`PopupTimeline`] into Bevy UI nodes. The timeline decides
//! *when* things happen; this module decides *how they look*: one absolutely
//! positioned row hanging above the cursor, one node per chip, each chip
//! animated through its own [`ChipAnimation`].
//!
//! The view never changes the timeline. When the session goes away the row
//! is despawned; when the session is rebuilt the row is respawned.

use std::time::Duration;

use bevy::prelude::*;

use super::animation::{
    chip_pose, track_width, CubicBezier, Transition, ANCHOR_LIFT, CHIP_ICON_SIZE, CHIP_SIZE,
};
use super::timeline::{PopupPhase, PopupSession, PopupTimeline, PopupTiming};
use crate::ui::theme::*;

/// Root node of the popup row
#[derive(Component)]
pub struct PopupRoot;

/// A chip node in the popup row
#[derive(Component, Debug)]
pub struct PopupChipNode {
    pub index: usize,
}

/// The icon text inside a chip
#[derive(Component)]
pub struct PopupChipIcon {
    pub index: usize,
}

/// Per-chip animation state
#[derive(Component, Debug, Clone, Copy)]
pub struct ChipAnimation {
    pub spread: Transition,
    pub opacity: Transition,
    pub lift: Transition,
}

impl ChipAnimation {
    /// Starting state of a freshly spawned chip.
    ///
    /// Animated rows spawn collapsed and fan out on the next phase change.
    /// Unanimated rows are born in whatever pose their phase calls for.
    fn initial(session: &PopupSession, index: usize) -> Self {
        let spread = match session.phase() {
            PopupPhase::Expanded => 1.0,
            _ => 0.0,
        };
        let lift = if index == session.active_chip_index() {
            1.0
        } else {
            0.0
        };
        Self {
            spread: Transition::settled(spread),
            opacity: Transition::settled(spread),
            lift: Transition::settled(lift),
        }
    }
}

/// What the view last saw of the timeline
#[derive(Resource, Debug, Default)]
pub struct PopupViewState {
    build_id: Option<u64>,
    phase: PopupPhase,
    phase_started: Duration,
    active_chip: usize,
}

/// Keep the popup row in step with the timeline
pub fn sync_popup_view(
    mut commands: Commands,
    time: Res<Time>,
    timeline: Res<PopupTimeline>,
    mut view: ResMut<PopupViewState>,
    roots: Query<Entity, With<PopupRoot>>,
    mut chips: Query<(&PopupChipNode, &mut ChipAnimation)>,
) {
    let Some(session) = timeline.session() else {
        if view.build_id.take().is_some() {
            for root in &roots {
                commands.entity(root).despawn();
            }
            debug!("Popup row despawned");
        }
        return;
    };

    if view.build_id != Some(session.build_id()) {
        for root in &roots {
            commands.entity(root).despawn();
        }
        spawn_popup_row(&mut commands, session);
        *view = PopupViewState {
            build_id: Some(session.build_id()),
            phase: session.phase(),
            phase_started: session.phase_started(),
            active_chip: session.active_chip_index(),
        };
        return;
    }

    let now = time.elapsed();
    let timing = *timeline.timing();
    let phase_changed =
        view.phase != session.phase() || view.phase_started != session.phase_started();
    let active_changed = view.active_chip != session.active_chip_index();

    if !phase_changed && !active_changed {
        return;
    }

    for (chip, mut anim) in &mut chips {
        if phase_changed {
            retarget_phase(&mut anim, chip.index, session, &timing, now);
        }
        if active_changed {
            let lifted = chip.index == session.active_chip_index();
            retarget_lift(&mut anim, chip.index, lifted, session, &timing, now);
        }
    }

    view.phase = session.phase();
    view.phase_started = session.phase_started();
    view.active_chip = session.active_chip_index();
}

fn retarget_phase(
    anim: &mut ChipAnimation,
    index: usize,
    session: &PopupSession,
    timing: &PopupTiming,
    now: Duration,
) {
    let (target, delay) = match session.phase() {
        PopupPhase::Hidden | PopupPhase::Expanding => {
            anim.spread.snap(0.0);
            anim.opacity.snap(0.0);
            return;
        }
        PopupPhase::Expanded => (1.0, timing.fan_delay(index)),
        PopupPhase::Collapsing => (0.0, timing.collapse_delay(index, session.chip_count())),
    };

    if !session.is_animated() {
        anim.spread.snap(target);
        anim.opacity.snap(target);
        return;
    }

    let start = session.phase_started() + delay;
    anim.spread
        .retarget(target, now, start, timing.transform, &CubicBezier::FLOATY);
    anim.opacity
        .retarget(target, now, start, timing.transform, &CubicBezier::EASE);
}

fn retarget_lift(
    anim: &mut ChipAnimation,
    index: usize,
    lifted: bool,
    session: &PopupSession,
    timing: &PopupTiming,
    now: Duration,
) {
    let target = if lifted { 1.0 } else { 0.0 };
    if !session.is_animated() {
        anim.lift.snap(target);
        return;
    }
    let start = now + timing.fan_delay(index);
    anim.lift
        .retarget(target, now, start, timing.transform, &CubicBezier::FLOATY);
}

fn spawn_popup_row(commands: &mut Commands, session: &PopupSession) {
    let width = track_width(session.chip_count());
    let anchor = session.anchor();

    commands
        .spawn((
            PopupRoot,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(anchor.x - width * 0.5),
                top: Val::Px(anchor.y - ANCHOR_LIFT - CHIP_SIZE),
                width: Val::Px(width),
                height: Val::Px(CHIP_SIZE),
                ..default()
            },
            GlobalZIndex(POPUP_Z_INDEX),
        ))
        .with_children(|row| {
            for chip in session.chips() {
                row.spawn((
                    PopupChipNode { index: chip.index },
                    ChipAnimation::initial(session, chip.index),
                    Node {
                        position_type: PositionType::Absolute,
                        width: Val::Px(CHIP_SIZE),
                        height: Val::Px(CHIP_SIZE),
                        border: UiRect::all(Val::Px(POPUP_CHIP_BORDER_WIDTH)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(POPUP_CHIP_BACKGROUND_COLOR.with_alpha(0.0)),
                    BorderColor(POPUP_CHIP_BORDER_COLOR.with_alpha(0.0)),
                    BorderRadius::all(Val::Px(POPUP_CHIP_BORDER_RADIUS)),
                ))
                .with_children(|tile| {
                    tile.spawn((
                        PopupChipIcon { index: chip.index },
                        Text::new(chip.icon.clone()),
                        TextFont {
                            font_size: CHIP_ICON_SIZE,
                            ..default()
                        },
                        TextColor(POPUP_ICON_COLOR.with_alpha(0.0)),
                    ));
                });
            }
        });

    debug!(
        "Popup row spawned: {} chips at {:?}",
        session.chip_count(),
        anchor
    );
}

/// Colours and border of a chip at full opacity
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChipStyle {
    fill: Color,
    outline: Color,
    border_width: f32,
}

impl ChipStyle {
    /// The highlighted chip gets the orange, heavier border
    fn for_chip(is_active: bool) -> Self {
        if is_active {
            Self {
                fill: POPUP_ACTIVE_CHIP_BACKGROUND_COLOR,
                outline: POPUP_ACTIVE_CHIP_BORDER_COLOR,
                border_width: POPUP_ACTIVE_CHIP_BORDER_WIDTH,
            }
        } else {
            Self {
                fill: POPUP_CHIP_BACKGROUND_COLOR,
                outline: POPUP_CHIP_BORDER_COLOR,
                border_width: POPUP_CHIP_BORDER_WIDTH,
            }
        }
    }
}

/// Write each chip's current pose into its nodes
pub fn animate_popup_chips(
    time: Res<Time>,
    timeline: Res<PopupTimeline>,
    mut chips: Query<(
        &PopupChipNode,
        &ChipAnimation,
        &mut Node,
        &mut BackgroundColor,
        &mut BorderColor,
    )>,
    mut icons: Query<(&PopupChipIcon, &mut TextColor, &mut TextFont)>,
) {
    let Some(session) = timeline.session() else {
        return;
    };
    let now = time.elapsed();
    let timing = timeline.timing();
    let active = session.active_chip_index();

    let mut scales = vec![(0.0_f32, 0.0_f32); session.chip_count()];

    for (chip, anim, mut node, mut background, mut border) in &mut chips {
        let spread = anim.spread.value(now, timing.transform, &CubicBezier::FLOATY);
        let opacity = anim.opacity.value(now, timing.transform, &CubicBezier::EASE);
        let lift = anim.lift.value(now, timing.transform, &CubicBezier::FLOATY);
        let is_active = chip.index == active;

        let pose = chip_pose(chip.index, spread, opacity, lift, is_active);
        node.left = Val::Px(pose.offset.x);
        node.top = Val::Px(pose.offset.y);
        node.width = Val::Px(pose.size);
        node.height = Val::Px(pose.size);

        let style = ChipStyle::for_chip(is_active);
        let (fill, outline) = (style.fill, style.outline);
        let border_width = Val::Px(style.border_width);
        if node.border.left != border_width {
            node.border = UiRect::all(border_width);
        }
        background.0 = fill.with_alpha(fill.alpha() * pose.opacity);
        border.0 = outline.with_alpha(outline.alpha() * pose.opacity);

        if let Some(slot) = scales.get_mut(chip.index) {
            *slot = (pose.size / CHIP_SIZE, pose.opacity);
        }
    }

    for (icon, mut color, mut font) in &mut icons {
        let Some(&(scale, opacity)) = scales.get(icon.index) else {
            continue;
        };
        color.0 = POPUP_ICON_COLOR.with_alpha(opacity);
        let size = (CHIP_ICON_SIZE * scale).max(1.0);
        if (font.font_size - size).abs() > 0.1 {
            font.font_size = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_chip_has_the_heavier_highlighted_border() {
        let active = ChipStyle::for_chip(true);
        let idle = ChipStyle::for_chip(false);

        assert_eq!(active.border_width, 2.0);
        assert_eq!(idle.border_width, 1.0);
        assert_eq!(active.outline, POPUP_ACTIVE_CHIP_BORDER_COLOR);
        assert_ne!(active.outline, idle.outline);
    }
}
