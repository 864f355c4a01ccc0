pub mod props;
pub(crate) mod validate;
