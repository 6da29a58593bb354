pub mod html_table;

pub use html_table::parse_html_table;
