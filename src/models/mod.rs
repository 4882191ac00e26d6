pub mod card;
pub mod player;
