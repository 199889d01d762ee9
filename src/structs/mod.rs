pub mod game;
pub mod view;
