pub mod get_links;
pub mod move_doc;
pub mod refs;
pub mod resolve;
pub mod suggest;
