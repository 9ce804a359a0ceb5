use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop the command before or after the passes run.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("unable to load configuration")]
    Config,
    /// Both path lists are empty, so no pass can run.
    #[display("nothing to do: configure download_paths or library_paths")]
    NoPaths,
    #[display("unable to prepare the run")]
    Setup,
    #[display("unable to write output")]
    Output,
}
