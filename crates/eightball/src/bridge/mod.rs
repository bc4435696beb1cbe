pub mod hud;
pub mod protocol;
