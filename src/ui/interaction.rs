//! User interaction seam
//!
//! Prompts must run on the thread that owns the terminal, while the checkout
//! workflow runs on a worker. [`ui_channel`] connects the two: the worker
//! holds an [`InteractionProxy`] and blocks on each call, the UI thread runs
//! [`UiHost::serve`] with the real [`Interaction`] implementation.
//!
//! When the host goes away every proxy call fails with
//! [`ScmError::CheckoutCancelled`], which the workflow treats as the user
//! backing out.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::config::ImportConfiguration;
use crate::domain::ProjectDescriptor;
use crate::error::{Result, ScmError};

/// Result of the interactive project selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Import these projects
    Proceed(Vec<ProjectDescriptor>),
    Cancelled,
}

/// Dialogs offered by the checkout workflow
pub trait Interaction: Send + Sync {
    /// Ask a yes/no question
    fn confirm(&self, title: &str, message: &str) -> Result<bool>;

    /// Let the user pick which discovered projects to import
    fn select_projects(
        &self,
        locations: &[PathBuf],
        projects: &[ProjectDescriptor],
        config: &ImportConfiguration,
    ) -> Result<Selection>;

    /// Hand a checkout that only carries alternate project configuration to
    /// the tool that understands it
    fn import_alternate(&self, location: &Path) -> Result<()>;
}

enum Request {
    Confirm {
        title: String,
        message: String,
        reply: Sender<Result<bool>>,
    },
    Select {
        locations: Vec<PathBuf>,
        projects: Vec<ProjectDescriptor>,
        config: ImportConfiguration,
        reply: Sender<Result<Selection>>,
    },
    ImportAlternate {
        location: PathBuf,
        reply: Sender<Result<()>>,
    },
}

/// Create a connected proxy and host pair
pub fn ui_channel() -> (InteractionProxy, UiHost) {
    let (sender, receiver) = mpsc::channel();
    (InteractionProxy { sender }, UiHost { receiver })
}

/// Worker-side handle forwarding every dialog to the UI thread
#[derive(Clone)]
pub struct InteractionProxy {
    sender: Sender<Request>,
}

impl InteractionProxy {
    fn call<T>(&self, build: impl FnOnce(Sender<Result<T>>) -> Request) -> Result<T> {
        let (reply, response) = mpsc::channel();
        self.sender
            .send(build(reply))
            .map_err(|_| ScmError::CheckoutCancelled)?;
        response.recv().map_err(|_| ScmError::CheckoutCancelled)?
    }
}

impl Interaction for InteractionProxy {
    fn confirm(&self, title: &str, message: &str) -> Result<bool> {
        self.call(|reply| Request::Confirm {
            title: title.to_string(),
            message: message.to_string(),
            reply,
        })
    }

    fn select_projects(
        &self,
        locations: &[PathBuf],
        projects: &[ProjectDescriptor],
        config: &ImportConfiguration,
    ) -> Result<Selection> {
        self.call(|reply| Request::Select {
            locations: locations.to_vec(),
            projects: projects.to_vec(),
            config: config.clone(),
            reply,
        })
    }

    fn import_alternate(&self, location: &Path) -> Result<()> {
        self.call(|reply| Request::ImportAlternate {
            location: location.to_path_buf(),
            reply,
        })
    }
}

/// UI-thread side of [`ui_channel`]
pub struct UiHost {
    receiver: Receiver<Request>,
}

impl UiHost {
    /// Answer requests until every proxy has been dropped
    ///
    /// Returns the number of requests served.
    pub fn serve(self, ui: &dyn Interaction) -> usize {
        let mut served = 0;

        for request in self.receiver {
            served += 1;
            // A worker that stopped waiting has nobody to reply to.
            match request {
                Request::Confirm {
                    title,
                    message,
                    reply,
                } => {
                    let _ = reply.send(ui.confirm(&title, &message));
                }
                Request::Select {
                    locations,
                    projects,
                    config,
                    reply,
                } => {
                    let _ = reply.send(ui.select_projects(&locations, &projects, &config));
                }
                Request::ImportAlternate { location, reply } => {
                    let _ = reply.send(ui.import_alternate(&location));
                }
            }
        }

        served
    }
}
