//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: header line with model name and typing status
//! - `MessageBubble`: one chat message
//! - `LandingPage`: greeting before a chat is opened
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `MessageInput`: draft editor that emits `InputEvent::Submit`
//! - `MessageList`: scrollable conversation view with layout caching
//!
//! Components never touch `App` directly. The parent reads core state,
//! passes it down as props, and turns emitted events into `Action`s.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (header line)
//! ├── landing.rs        (landing page)
//! ├── message_bubble.rs (single message)
//! ├── message_list.rs   (scrollable message container)
//! └── message_input/    (draft editor + wrapping math)
//! ```

pub mod landing;
pub mod message_bubble;
pub mod message_input;
pub mod message_list;
pub mod title_bar;

pub use landing::LandingPage;
pub use message_bubble::MessageBubble;
pub use message_input::{InputEvent, MessageInput};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
