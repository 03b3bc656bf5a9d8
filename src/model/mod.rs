pub mod form;
pub mod mongodb;
pub mod response;
pub mod survey;
