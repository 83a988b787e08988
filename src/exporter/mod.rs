// Rendering adapters and the HTTP server around the PCIe readers

pub mod metrics;
pub mod server;
pub mod tree;

pub use metrics::{render_metrics, scrape_metrics, ScrapeCounters};
pub use server::{router, serve, AppState};
pub use tree::{render_tree, scrape_tree, TreeDocument};
