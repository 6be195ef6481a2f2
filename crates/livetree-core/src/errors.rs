use livetree_core_types::{RequestId, TraceId};
use thiserror::Error;

use crate::model::NodeId;

/// Result type alias using LiveError
pub type Result<T> = std::result::Result<T, LiveError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// test assertions and log aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Update preconditions (caller-facing)
    NotANode,
    TypeMismatch,
    NotAContainer,
    NoTokenizer,

    // Tree mutation
    InvalidTreeOperation,
    CycleDetected,

    // Reconciliation (recovered internally by fallback replacement)
    ReconciliationFailure,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotANode => "ERR_NOT_A_NODE",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::NotAContainer => "ERR_NOT_A_CONTAINER",
            ExErrorKind::NoTokenizer => "ERR_NO_TOKENIZER",
            ExErrorKind::InvalidTreeOperation => "ERR_INVALID_TREE_OPERATION",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::ReconciliationFailure => "ERR_RECONCILIATION_FAILURE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether errors of this kind are reported to the caller of `update`
    ///
    /// Reconciliation failures never are: they trigger fallback replacement.
    pub fn is_caller_facing(&self) -> bool {
        !matches!(self, ExErrorKind::ReconciliationFailure)
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Built from [`LiveError`] or [`ReconcileFailure`] via `From`.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    node_id: Option<NodeId>,
    node_type: Option<String>,
    path: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            node_id: None,
            node_type: None,
            path: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the node the error is about
    pub fn with_node_id(mut self, id: NodeId) -> Self {
        self.node_id = Some(id);
        self
    }

    /// Add the type tag of the node the error is about
    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Add the edit-script path the error is about
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(node_id) = self.node_id {
            write!(f, " (node: {})", node_id)?;
        }
        if let Some(node_type) = &self.node_type {
            write!(f, " (type: {})", node_type)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for tree operations and the update entry point
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiveError {
    // ===== Update preconditions =====
    /// The id does not name a live node of this document
    #[error("`update` invoked on a non-node: {node_id} is not part of this document")]
    NotANode { node_id: NodeId },

    /// Supplied snapshot does not match the target node
    #[error("Incorrect snapshot applied to node of type `{expected}`: got `{found}`")]
    TypeMismatch { expected: String, found: String },

    /// Target is neither text-capable nor container-capable
    #[error("`update` invoked on non-parent {node_id} of type `{node_type}`")]
    NotAContainer { node_id: NodeId, node_type: String },

    /// Raw text supplied for a type the grammar cannot tokenize standalone
    #[error("`{node_type}` is not a valid context for updating from raw text")]
    NoTokenizer { node_type: String },

    // ===== Tree operations =====
    /// Text operation on a node without text capability
    #[error("Node {node_id} of type `{node_type}` does not hold text")]
    NotText { node_id: NodeId, node_type: String },

    /// Child operation on a node without container capability
    #[error("Node {node_id} of type `{node_type}` cannot hold children")]
    NotParent { node_id: NodeId, node_type: String },

    /// Child index past the end of a container
    #[error("Child index {index} out of range for node {node_id} with {len} children")]
    ChildIndexOutOfRange {
        node_id: NodeId,
        index: usize,
        len: usize,
    },

    /// Sibling operation on a node that has no parent
    #[error("Node {node_id} is detached")]
    Detached { node_id: NodeId },

    /// Attaching a node that already has a parent
    #[error("Node {node_id} is already attached to {parent_id}")]
    AlreadyAttached { node_id: NodeId, parent_id: NodeId },

    /// Attaching a node inside its own subtree
    #[error("Cycle detected: node {node_id} cannot be placed inside its own subtree")]
    CycleDetected { node_id: NodeId },

    // ===== Generic Errors =====
    /// Serialization error (snapshot or auxiliary data JSON)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LiveError {
    /// Whether this is one of the four `update` precondition violations
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            LiveError::NotANode { .. }
                | LiveError::TypeMismatch { .. }
                | LiveError::NotAContainer { .. }
                | LiveError::NoTokenizer { .. }
        )
    }
}

/// Internal inconsistency while applying an edit script
///
/// Returned by the edit applicator as an explicit result. The update operation
/// answers it with fallback replacement, so it never reaches the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileFailure {
    /// A change path does not address a node of the live tree
    #[error("Cannot resolve path {path}: {reason}")]
    Unresolved { path: String, reason: String },

    /// A change whose kind/terminal key the applicator does not interpret
    #[error("Unsupported change at path {path}")]
    UnsupportedChange { path: String },

    /// An edit whose new value has the wrong shape
    #[error("Edit at path {path} carries a non-string value")]
    InvalidValue { path: String },

    /// A type edit addressing the update root itself
    #[error("Cannot retype the update root")]
    RetypeRoot,

    /// Two deletions address the same node
    #[error("Node {node_id} staged for deletion twice")]
    DuplicateDeletion { node_id: NodeId },

    /// A tree operation rejected the mutation
    #[error("Tree operation failed: {0}")]
    Tree(#[from] LiveError),

    /// The script applied cleanly but the result differs from the target
    #[error("Applied edit script diverged from the requested content")]
    Diverged,
}

/// Conversion from LiveError to ExError
impl From<LiveError> for ExError {
    fn from(err: LiveError) -> Self {
        match err {
            LiveError::NotANode { node_id } => ExError::new(ExErrorKind::NotANode)
                .with_node_id(node_id)
                .with_message("Node is not part of this document"),

            LiveError::TypeMismatch { expected, found } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_node_type(expected)
                    .with_message(format!("Snapshot of type `{}` supplied", found))
            }

            LiveError::NotAContainer { node_id, node_type } => {
                ExError::new(ExErrorKind::NotAContainer)
                    .with_node_id(node_id)
                    .with_node_type(node_type)
                    .with_message("Node is neither text- nor container-capable")
            }

            LiveError::NoTokenizer { node_type } => ExError::new(ExErrorKind::NoTokenizer)
                .with_node_type(node_type)
                .with_message("Grammar has no entry point for this type"),

            LiveError::NotText { node_id, node_type } => {
                ExError::new(ExErrorKind::InvalidTreeOperation)
                    .with_node_id(node_id)
                    .with_node_type(node_type)
                    .with_message("Node does not hold text")
            }

            LiveError::NotParent { node_id, node_type } => {
                ExError::new(ExErrorKind::InvalidTreeOperation)
                    .with_node_id(node_id)
                    .with_node_type(node_type)
                    .with_message("Node cannot hold children")
            }

            LiveError::ChildIndexOutOfRange {
                node_id,
                index,
                len,
            } => ExError::new(ExErrorKind::InvalidTreeOperation)
                .with_node_id(node_id)
                .with_message(format!("Child index {} out of range ({} children)", index, len)),

            LiveError::Detached { node_id } => ExError::new(ExErrorKind::InvalidTreeOperation)
                .with_node_id(node_id)
                .with_message("Node has no parent"),

            LiveError::AlreadyAttached { node_id, parent_id } => {
                ExError::new(ExErrorKind::InvalidTreeOperation)
                    .with_node_id(node_id)
                    .with_message(format!("Node is already attached to {}", parent_id))
            }

            LiveError::CycleDetected { node_id } => ExError::new(ExErrorKind::CycleDetected)
                .with_node_id(node_id)
                .with_message("Node cannot be placed inside its own subtree"),

            LiveError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            LiveError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from ReconcileFailure to ExError
impl From<ReconcileFailure> for ExError {
    fn from(failure: ReconcileFailure) -> Self {
        let base = ExError::new(ExErrorKind::ReconciliationFailure).with_op("apply_edit_script");
        match failure {
            ReconcileFailure::Unresolved { path, reason } => base
                .with_path(path)
                .with_message(format!("Unresolved path: {}", reason)),

            ReconcileFailure::UnsupportedChange { path } => {
                base.with_path(path).with_message("Unsupported change")
            }

            ReconcileFailure::InvalidValue { path } => base
                .with_path(path)
                .with_message("Edit value is not a string"),

            ReconcileFailure::RetypeRoot => base.with_message("Type edit addresses the update root"),

            ReconcileFailure::DuplicateDeletion { node_id } => base
                .with_node_id(node_id)
                .with_message("Node staged for deletion twice"),

            ReconcileFailure::Tree(err) => {
                let message = err.to_string();
                base.with_source(err.into()).with_message(message)
            }

            ReconcileFailure::Diverged => {
                base.with_message("Result differs from the requested content")
            }
        }
    }
}

/// Conversion from serde_json::Error to LiveError
impl From<serde_json::Error> for LiveError {
    fn from(err: serde_json::Error) -> Self {
        LiveError::Serialization {
            message: err.to_string(),
        }
    }
}
