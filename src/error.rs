use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitcalError>;

#[derive(Error, Debug)]
pub enum GitcalError {
    #[error("Commit source error: {0}")]
    Source(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("unable to find commit data")]
    NoData,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Signature time error: {0}")]
    SignatureTime(#[from] Box<gix::date::parse::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::object::find::existing::with_conversion::Error> for GitcalError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GitcalError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GitcalError {
    fn from(err: gix::object::commit::Error) -> Self {
        GitcalError::Commit(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GitcalError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GitcalError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::date::parse::Error> for GitcalError {
    fn from(err: gix::date::parse::Error) -> Self {
        GitcalError::SignatureTime(Box::new(err))
    }
}
