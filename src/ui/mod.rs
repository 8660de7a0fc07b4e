//! User interface modules for tool cycling

pub mod popup;
pub mod theme;
pub mod toolbar;

// Re-export commonly used items
pub use popup::PopupPlugin;
pub use toolbar::SceneToolbarPlugin;
