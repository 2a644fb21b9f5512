//! UI module - terminal page: background, highlights, navigator, timeline, drawer

pub mod background;
pub mod display;
pub mod drawer;
pub mod fragment;
pub mod highlights;
pub mod input;
pub mod navigation;
pub mod state;
pub mod terminal;
pub mod timeline;

pub use background::{AmbientBackground, BlobFrame};
pub use drawer::{Chip, ChipKind, Drawer, DrawerEvent};
pub use fragment::Fragment;
pub use highlights::Carousel;
pub use navigation::{Breadcrumb, NavLevel, Navigator};
pub use state::{Action, Focus, NavItem, Session};
pub use timeline::{timeline, timeline_entries, TimelineEntry};
