//! `galxium`: a line-mode terminal console over the `chat_reveal` engine.
//!
//! The console prints the conversation transcript incrementally, drawing a
//! `▮` cursor behind the reply that is still being revealed, and exposes a few
//! slash commands (`/help`, `/status`, `/dump`, `/quit`).
//!
//! Configuration comes from the environment (see `chat_reveal::config`);
//! set `GALXIUM_SKIP_BOOT=1` to skip the boot sequence.

pub mod app;
pub mod boot;
pub mod commands;
pub mod header;
pub mod panels;
pub mod render;
pub mod style;
