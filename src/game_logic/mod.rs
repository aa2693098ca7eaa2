pub mod collisions;
pub mod components;
pub mod constants;
pub mod lap_system;
pub mod physics;
pub mod ranking;
pub mod track;

pub use collisions::*;
pub use components::*;
pub use constants::*;
pub use lap_system::*;
pub use ranking::*;
pub use track::*;
