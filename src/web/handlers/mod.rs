//! HTML page handlers.

pub mod index;
mod redirect;
mod stats;

pub use index::{clear_handler, index_handler, shorten_form_handler};
pub use redirect::redirect_handler;
pub use stats::stats_page_handler;
