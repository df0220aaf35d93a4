use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatStateError {
    /// The handle's provider has been dropped, or the handle never had one.
    #[snafu(display("chat state must be used within a chat provider (at `{stage}`)"))]
    OutsideProvider { stage: &'static str },
    /// A subscriber tried to reach the store while a mutation was still notifying.
    #[snafu(display("chat store is already borrowed at `{stage}`"))]
    StoreBusy { stage: &'static str },
}

pub type ChatStateResult<T> = Result<T, ChatStateError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to load chat settings from {path:?} on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        path: PathBuf,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
}
