mod ai;
mod board;
mod common;
mod config;
mod game;
mod logging;
mod placement;
mod player;
mod render;
mod ship;

pub use ai::*;
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use logging::init_logging;
pub use placement::*;
pub use player::*;
pub use render::*;
pub use ship::*;
