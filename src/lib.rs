pub mod app;
pub mod config;
pub mod onboarding;
pub mod service;
pub mod shared;
pub mod templates;
pub mod tui;
