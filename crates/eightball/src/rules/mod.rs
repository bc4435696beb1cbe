pub mod camera;
pub mod rack;
pub mod shot;
pub mod turn;
