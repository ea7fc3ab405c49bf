pub mod application;
pub mod form;
pub mod question;

pub use application::Application;
pub use form::{Form, Section};
pub use question::Question;
