use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create log file {}: {source}", path.display())]
    CreateLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to log file {}: {source}", path.display())]
    AppendLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid progress template: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}
