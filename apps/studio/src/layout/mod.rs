// Layout: renderers produce a LayoutTree, the paginator turns it into
// positioned draw operations on A4 pages.
// Rendering is pure; pagination is CPU-bound and runs inside the export task.

pub mod classic;
pub mod corporate;
pub mod font_metrics;
pub mod mappers;
pub mod modern;
pub mod paginate;
pub mod selector;
pub mod tree;

// Re-export the public API consumed by the export adapter and the CLI.
pub use paginate::{paginate, DrawOp, Page, PagedDocument};
pub use selector::{render_current, select_renderer, select_renderer_by_name, LayoutRenderer, Renderer};
pub use tree::LayoutTree;
