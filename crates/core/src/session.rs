#![forbid(unsafe_code)]

//! Editor session state machine. One dialog (or none) is open at a time, and
//! every mutation names the state it is valid in, so a driver cannot reach a
//! state the UI could not. The session never touches storage; callers pass in
//! the store facts it needs (`name_taken`) and act on the returned decisions.

use std::fmt;

use crate::chart::{Chart, ChartError, IngestReport, RemovedNode};
use crate::model::{ChartEdge, ChartNode, NodeData, Position};

/// Which dialog the editor has open, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    /// The node edit dialog is open for this node.
    EditingNode { id: String },
    /// "Delete this node?" confirmation, reached from the edit dialog.
    ConfirmingDelete { id: String },
    /// The save dialog is open, waiting for a name.
    Saving,
    /// "Overwrite this chart?" confirmation, reached from the save dialog.
    ConfirmingOverwrite { name: String },
    /// The load dialog is open.
    Loading,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::Idle => "idle",
            EditorMode::EditingNode { .. } => "editing-node",
            EditorMode::ConfirmingDelete { .. } => "confirming-delete",
            EditorMode::Saving => "saving",
            EditorMode::ConfirmingOverwrite { .. } => "confirming-overwrite",
            EditorMode::Loading => "loading",
        }
    }
}

/// Outcome of submitting a name in the save dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveDecision {
    /// Blank name. Nothing happens and the dialog stays open.
    Rejected,
    /// Name already saved; the session is now waiting on an overwrite
    /// confirmation.
    NeedsConfirm,
    /// Save under this name. The dialog is closed.
    Proceed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    WrongMode {
        expected: &'static str,
        actual: &'static str,
    },
    UnknownNode(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::WrongMode { expected, actual } => {
                write!(f, "not available now: editor is {actual}, needs {expected}")
            }
            SessionError::UnknownNode(id) => write!(f, "no node with id '{id}'"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ChartError> for SessionError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::UnknownNode(id) => SessionError::UnknownNode(id),
        }
    }
}

#[derive(Debug)]
pub struct EditorSession {
    chart: Chart,
    mode: EditorMode,
}

impl EditorSession {
    pub fn new(chart: Chart) -> Self {
        Self {
            chart,
            mode: EditorMode::Idle,
        }
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn into_chart(self) -> Chart {
        self.chart
    }

    /// Closes whichever dialog is open. Confirmations fall back to the dialog
    /// they were raised from; everything else returns to idle.
    pub fn cancel(&mut self) {
        self.mode = match &self.mode {
            EditorMode::ConfirmingOverwrite { .. } => EditorMode::Saving,
            EditorMode::ConfirmingDelete { id } => EditorMode::EditingNode { id: id.clone() },
            _ => EditorMode::Idle,
        };
    }

    pub fn add_node(&mut self, data: NodeData, position: Position) -> Result<String, SessionError> {
        self.require_idle()?;
        Ok(self.chart.add_node(data, position))
    }

    pub fn connect(&mut self, source: &str, target: &str) -> Result<ChartEdge, SessionError> {
        self.require_idle()?;
        Ok(self.chart.connect(source, target)?)
    }

    /// Opens the edit dialog on a node.
    pub fn begin_edit(&mut self, id: &str) -> Result<(), SessionError> {
        self.require_idle()?;
        if !self.chart.has_node(id) {
            return Err(SessionError::UnknownNode(id.to_string()));
        }
        self.mode = EditorMode::EditingNode { id: id.to_string() };
        Ok(())
    }

    /// Submits the edit dialog, replacing the node's person payload.
    pub fn apply_edit(&mut self, data: NodeData) -> Result<(), SessionError> {
        let EditorMode::EditingNode { id } = &self.mode else {
            return Err(self.wrong_mode("editing-node"));
        };
        let id = id.clone();
        self.chart.update_node(&id, data)?;
        self.mode = EditorMode::Idle;
        Ok(())
    }

    /// Asks to delete the node currently being edited.
    pub fn request_delete(&mut self) -> Result<(), SessionError> {
        let EditorMode::EditingNode { id } = &self.mode else {
            return Err(self.wrong_mode("editing-node"));
        };
        self.mode = EditorMode::ConfirmingDelete { id: id.clone() };
        Ok(())
    }

    /// Confirms the pending delete. The node and its edges come back so the
    /// driver can report what went away.
    pub fn confirm_delete(&mut self) -> Result<RemovedNode, SessionError> {
        let EditorMode::ConfirmingDelete { id } = &self.mode else {
            return Err(self.wrong_mode("confirming-delete"));
        };
        let id = id.clone();
        let removed = self.chart.remove_node(&id)?;
        self.mode = EditorMode::Idle;
        Ok(removed)
    }

    /// Opens the save dialog.
    pub fn begin_save(&mut self) -> Result<(), SessionError> {
        self.require_idle()?;
        self.mode = EditorMode::Saving;
        Ok(())
    }

    /// Submits a name in the save dialog. `name_taken` is the store's answer
    /// for this exact name. On `Proceed` the caller performs the actual save.
    pub fn submit_save_name(
        &mut self,
        name: &str,
        name_taken: bool,
    ) -> Result<SaveDecision, SessionError> {
        if self.mode != EditorMode::Saving {
            return Err(self.wrong_mode("saving"));
        }
        if name.trim().is_empty() {
            return Ok(SaveDecision::Rejected);
        }
        if name_taken {
            self.mode = EditorMode::ConfirmingOverwrite {
                name: name.to_string(),
            };
            return Ok(SaveDecision::NeedsConfirm);
        }
        self.mode = EditorMode::Idle;
        Ok(SaveDecision::Proceed(name.to_string()))
    }

    /// Confirms the pending overwrite and returns the name to save under.
    pub fn confirm_overwrite(&mut self) -> Result<String, SessionError> {
        let EditorMode::ConfirmingOverwrite { name } = &self.mode else {
            return Err(self.wrong_mode("confirming-overwrite"));
        };
        let name = name.clone();
        self.mode = EditorMode::Idle;
        Ok(name)
    }

    /// Opens the load dialog.
    pub fn begin_load(&mut self) -> Result<(), SessionError> {
        self.require_idle()?;
        self.mode = EditorMode::Loading;
        Ok(())
    }

    /// Replaces the working chart with a loaded pair. The pair is sanitized on
    /// the way in; the report says what had to be dropped.
    pub fn finish_load(
        &mut self,
        nodes: Vec<ChartNode>,
        edges: Vec<ChartEdge>,
    ) -> Result<IngestReport, SessionError> {
        if self.mode != EditorMode::Loading {
            return Err(self.wrong_mode("loading"));
        }
        let (chart, report) = Chart::from_parts(nodes, edges);
        self.chart = chart;
        self.mode = EditorMode::Idle;
        Ok(report)
    }

    fn require_idle(&self) -> Result<(), SessionError> {
        if self.mode == EditorMode::Idle {
            Ok(())
        } else {
            Err(self.wrong_mode("idle"))
        }
    }

    fn wrong_mode(&self, expected: &'static str) -> SessionError {
        SessionError::WrongMode {
            expected,
            actual: self.mode.as_str(),
        }
    }
}
