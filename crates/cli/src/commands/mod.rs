pub(crate) mod chat;
pub(crate) mod query;
pub(crate) mod serve;
