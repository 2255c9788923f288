pub mod advanced;
pub mod clear;
pub mod create_heat;
pub mod dispatch;
pub mod generate;
pub mod import;
pub mod shared;
pub mod show;
pub mod update_heat;
