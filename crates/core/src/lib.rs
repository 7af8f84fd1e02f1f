#![forbid(unsafe_code)]

pub mod chart;
pub mod model;
pub mod session;

pub use chart::{Chart, ChartError, IngestReport, RemovedNode};
pub use model::{ChartEdge, ChartNode, ChartSnapshot, NodeData, Position};
pub use session::{EditorMode, EditorSession, SaveDecision, SessionError};
