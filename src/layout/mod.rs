mod renderer;
mod theme;

pub use renderer::{ContentPage, PageRenderer};
pub use theme::ThemeSet;
