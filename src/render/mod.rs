// Content rendering.
// Post bodies to HTML markup, and to styled terminal lines for the TUI.

pub mod html;
pub mod terminal;

pub use html::{escape_html, markdown_to_html, render, strip_html};
pub use terminal::to_lines;
