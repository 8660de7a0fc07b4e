//! The cursor resource and plugin.
//!
//! `CursorInfo` keeps the mouse position in window coordinates. The cycle
//! popup anchors to it, so the last known position is kept when the cursor
//! leaves the window. A system runs in `PreUpdate` so every hotkey handler
//! sees this frame's position.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct CursorPlugin;

impl Plugin for CursorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorInfo>()
            .add_systems(PreUpdate, update_cursor_info_system);
    }
}

/// A resource that holds the cursor's position in window space.
#[derive(Resource, Default, Debug)]
pub struct CursorInfo {
    /// Where the cursor is now, if it is over the window
    pub screen_position: Option<Vec2>,
    last_position: Vec2,
}

impl CursorInfo {
    /// Record a cursor sample; `None` means the cursor left the window
    pub fn record(&mut self, position: Option<Vec2>) {
        self.screen_position = position;
        if let Some(position) = position {
            self.last_position = position;
        }
    }

    /// The cursor position, or where it was last seen
    pub fn position(&self) -> Vec2 {
        self.screen_position.unwrap_or(self.last_position)
    }
}

fn update_cursor_info_system(
    mut cursor: ResMut<CursorInfo>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        cursor.record(None);
        return;
    };
    cursor.record(window.cursor_position());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_position_after_leaving() {
        let mut cursor = CursorInfo::default();
        assert_eq!(cursor.position(), Vec2::ZERO);

        cursor.record(Some(Vec2::new(120.0, 80.0)));
        cursor.record(None);
        assert_eq!(cursor.screen_position, None);
        assert_eq!(cursor.position(), Vec2::new(120.0, 80.0));
    }
}
