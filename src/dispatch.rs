//! Command dispatcher: one tokio task per unit of work, one `Msg` per task.
//!
//! Tasks only read their inputs and the backend; results travel back through
//! the single queue the event loop drains. Completion order is whatever the
//! runtime produces.
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::app::diff_cache::load_preview;
use crate::app::{Command, Msg};
use crate::git::Backend;

pub struct Dispatcher<B: Backend> {
    backend: Arc<B>,
    tx: UnboundedSender<Msg>,
}

impl<B: Backend> Dispatcher<B> {
    pub fn new(backend: Arc<B>, tx: UnboundedSender<Msg>) -> Self {
        Self { backend, tx }
    }

    pub fn dispatch(&self, cmd: Command) {
        tracing::debug!(?cmd, "dispatch");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = execute(backend.as_ref(), cmd).await;
            // Receiver gone means the loop has exited.
            let _ = tx.send(msg);
        });
    }

    pub fn dispatch_all(&self, cmds: Vec<Command>) {
        for cmd in cmds {
            self.dispatch(cmd);
        }
    }
}

/// Run one unit of work to completion and wrap its outcome.
pub async fn execute<B: Backend>(backend: &B, cmd: Command) -> Msg {
    match cmd {
        Command::RefreshStatus(generation) => Msg::StatusLoaded {
            generation,
            result: backend.status().await,
        },
        Command::FetchDiff { path, category } => {
            let result = load_preview(backend, &path, category).await;
            Msg::DiffLoaded {
                path,
                category,
                result,
            }
        }
        Command::Stage(paths) => {
            let result = backend.stage(&paths).await;
            Msg::Staged { paths, result }
        }
        Command::Unstage(paths) => {
            let result = backend.unstage(&paths).await;
            Msg::Unstaged { paths, result }
        }
        Command::Commit { message, date } => {
            Msg::Committed(backend.commit(&message, &date).await)
        }
        Command::AmendMessage(message) => Msg::Amended(backend.amend_message(&message).await),
        Command::SoftReset => Msg::SoftResetDone(backend.soft_reset_head().await),
        Command::FetchHeadInfo(generation) => Msg::HeadInfoLoaded {
            generation,
            result: backend.head_info().await,
        },
        Command::ExpireStatus { token, after } => {
            tokio::time::sleep(after).await;
            Msg::StatusExpired(token)
        }
        Command::ExpireError { token, after } => {
            tokio::time::sleep(after).await;
            Msg::ErrorExpired(token)
        }
    }
}
