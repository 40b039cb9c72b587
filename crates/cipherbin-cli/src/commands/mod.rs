pub mod admin;
pub mod maintenance;
pub mod misc;
pub mod pastes;
