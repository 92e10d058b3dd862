pub mod catalog;
pub mod form;
pub mod model;
pub mod shell;
pub mod store;

pub use shell::App;
