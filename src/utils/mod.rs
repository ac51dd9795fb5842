pub mod split;
pub mod time;
