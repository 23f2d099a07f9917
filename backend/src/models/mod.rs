pub mod grid;
pub mod schedule;
pub mod site;
pub mod target;
pub mod time;

pub use grid::*;
pub use schedule::*;
pub use site::*;
pub use target::*;
pub use time::*;
