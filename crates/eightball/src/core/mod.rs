pub mod registry;
pub mod table;
pub mod time;

#[cfg(feature = "physics")]
pub mod physics;
#[cfg(feature = "physics")]
pub mod ghost;
