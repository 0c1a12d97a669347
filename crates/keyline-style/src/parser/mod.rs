//! Stylesheet reading: raw CSS text to host-shaped rule records.

mod css_parser;
mod shorthand;

pub use css_parser::parse_stylesheet;
