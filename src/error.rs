use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] crate::config::Error),

    #[error(transparent)]
    ClientError(#[from] crate::xfade_client::Error),

    #[error(transparent)]
    RenderError(#[from] crate::render::Error),

    #[error("{0} thread panicked")]
    ThreadPanic(&'static str),
}
