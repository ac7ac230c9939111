pub mod types;

pub use types::{AppEvent, ExplorerItem, MenuAction, PlatformCommand, PlatformEventHandler};
