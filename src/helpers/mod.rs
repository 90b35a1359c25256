pub mod coin;
pub mod math;
pub mod sanitize;
pub mod time_window;

pub use time_window::MinuteWindow;
