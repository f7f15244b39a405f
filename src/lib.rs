// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod document;
pub mod error;
pub mod markup;
pub mod poll;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod setup;
pub mod state;
pub mod ui;
pub mod util;
pub mod votes_panel;
