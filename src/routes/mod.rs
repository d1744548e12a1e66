pub(crate) mod chat;
pub(crate) mod health;
pub(crate) mod mmi;
