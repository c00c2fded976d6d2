#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("portal path does not end in `.uP`")]
    MissingSuffix,

    #[error("unknown portal path method `{0}`")]
    UnknownMethod(String),

    #[error("portal path is missing the {0} segment")]
    MissingSegment(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
