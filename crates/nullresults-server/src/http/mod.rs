pub(crate) mod handlers;
