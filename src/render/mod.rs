pub mod renderer;
pub mod terminal;

pub use renderer::{HudStatus, Renderer};
pub use terminal::TerminalContext;
