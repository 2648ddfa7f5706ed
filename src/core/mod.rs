//! # Core Application Logic
//!
//! This module contains Courier's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Message (entity)     │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `Message` and `Sender`, the only domain entity
//! - [`state`]: `App`, `Page` and `Conversation`
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`config`]: layered configuration (file → env → CLI)

pub mod action;
pub mod config;
pub mod message;
pub mod state;
