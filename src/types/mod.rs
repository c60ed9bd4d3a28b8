pub(crate) mod response;
pub mod user;
