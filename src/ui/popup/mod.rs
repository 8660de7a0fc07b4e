//! # Cycle Popup
//!
//! The floating row of tool icons shown above the cursor while cycling.
//!
//! - **`timeline.rs`**: the lifecycle state machine and its two timers
//! - **`animation.rs`**: easing, transitions and chip poses
//! - **`view.rs`**: the Bevy UI nodes that mirror the timeline

pub mod animation;
pub mod timeline;
pub mod view;

pub use timeline::{
    CollapseSchedule, PopupChip, PopupPhase, PopupRequest, PopupSession, PopupSettings,
    PopupTimeline, PopupTiming,
};
pub use view::{animate_popup_chips, sync_popup_view, PopupChipNode, PopupRoot, PopupViewState};

use bevy::prelude::*;

use crate::core::ToolCycleSystems;

/// Advance the popup timeline to the current frame time
pub fn tick_popup_timeline(time: Res<Time>, mut timeline: ResMut<PopupTimeline>) {
    if timeline.session().is_none() {
        return;
    }
    timeline.tick(time.elapsed());
}

/// Plugin that owns the popup timeline and its view
pub struct PopupPlugin;

impl Plugin for PopupPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PopupTimeline::new(PopupTiming::default()))
            .init_resource::<PopupViewState>()
            .add_systems(
                Update,
                (tick_popup_timeline, sync_popup_view, animate_popup_chips)
                    .chain()
                    .in_set(ToolCycleSystems::Popup),
            );
    }
}
