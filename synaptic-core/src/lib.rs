pub mod branch;
pub mod dates;
pub mod diagnostics;
pub mod errors;
pub mod fidelity;
pub mod graph;
pub mod layout;
pub mod merge;
pub mod palette;
pub mod template;

pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
pub use errors::{GraphError, LayoutError};
pub use graph::{Category, Edge, Graph, GraphMetadata, Node, TemplateType};
pub use layout::{layout_graph, LayoutConfig, LayoutEngine, MapType, PositionedGraph};
pub use merge::{merge_graphs, MergeOptions};
pub use template::{recommend, TemplateRecommendation};
