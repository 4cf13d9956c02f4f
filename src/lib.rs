pub mod bank;
pub mod cli;
pub mod demo;
pub mod grade;
pub mod model;
pub mod report;
pub mod session;
pub mod state;
pub mod timer;
pub mod tui;
pub mod ui;
