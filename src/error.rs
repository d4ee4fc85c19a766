use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuarterError>;

#[derive(Error, Debug)]
pub enum QuarterError {
    #[error("Git open error: {0}")]
    Open(#[from] Box<gix::open::Error>),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Shallow file error: {0}")]
    Shallow(#[from] Box<gix::shallow::read::Error>),
}

// gix errors are large; keep the enum small by boxing them on conversion.
impl From<gix::open::Error> for QuarterError {
    fn from(err: gix::open::Error) -> Self {
        QuarterError::Open(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for QuarterError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        QuarterError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for QuarterError {
    fn from(err: gix::object::commit::Error) -> Self {
        QuarterError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for QuarterError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        QuarterError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for QuarterError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        QuarterError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for QuarterError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        QuarterError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for QuarterError {
    fn from(err: gix::objs::decode::Error) -> Self {
        QuarterError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for QuarterError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        QuarterError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::shallow::read::Error> for QuarterError {
    fn from(err: gix::shallow::read::Error) -> Self {
        QuarterError::Shallow(Box::new(err))
    }
}
