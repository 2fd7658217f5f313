pub mod cfg;
pub mod error;
pub mod humanize;
pub mod locale;
pub mod page;
pub mod refresh;
pub mod ticker;
pub mod time;
