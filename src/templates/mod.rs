//! HTML templates and styling for the graph page.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants and theme definitions
//! - `components` - Shared HTML components (nav bar, base template, escaping)
//! - `graph_js` - D3 renderer script and its styles

mod styles;
mod components;
mod graph_js;

pub use styles::STYLE;
pub use components::{base_html, html_escape, nav_bar};
pub use graph_js::{graph_css, render_graph_js, GraphRendererConfig};
