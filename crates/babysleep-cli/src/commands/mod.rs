pub mod add;
pub mod common;
pub mod correct;
pub mod history;
pub mod model;
pub mod predict;
pub mod show;
pub mod sync;
pub mod train;
