pub mod consts;
pub mod model;
pub mod runtime;
pub mod store;
pub mod stream;
