pub mod add;
pub mod deck;
pub mod history;
pub mod list;
pub mod maintenance;
pub mod new;
pub mod reset;
pub mod simulate;
pub mod status;
pub mod study;
