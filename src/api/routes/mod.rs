pub mod games;
pub mod live_game;
pub mod patterns;
pub mod status;
