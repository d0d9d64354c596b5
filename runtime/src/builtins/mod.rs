pub(crate) mod proto;
