//! Application core: state, transitions and the pure models they drive.
//!
//!   key / result ──► App::update ──► [Command] ──► dispatcher ──► Msg ──┐
//!        ▲                                                             │
//!        └─────────────────────────── queue ◄──────────────────────────┘
pub mod diff_cache;
pub mod keys;
pub mod layout;
pub mod message;
pub mod selection;
pub mod state;
mod update;

pub use message::{Command, Msg};
pub use state::{App, AppState, CommitSubstate, HeadModifySubstate, Settings};
