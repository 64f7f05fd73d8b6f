pub mod action;
pub mod deck;
pub mod odds;
pub mod rank;
