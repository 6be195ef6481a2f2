//! Canonical logging macros
//!
//! Every `update` emits one start event and exactly one of end or
//! end_error, all tagged with `op` and `event`. Field names come from
//! [`livetree_core_types::schema`].

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use livetree_core::{log_op_start, NodeId};
/// let target = NodeId::from_raw(3);
/// log_op_start!("update", node_id = %target);
/// log_op_start!("update", node_id = %target, node_type = "SentenceNode");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use livetree_core::{log_op_end, NodeId, UpdateOutcome};
/// let target = NodeId::from_raw(3);
/// let outcome = UpdateOutcome::Applied { changes: 2 };
/// log_op_end!("update", duration_ms = 3, node_id = %target, outcome = outcome.as_str());
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError).
///
/// # Example
///
/// ```
/// # use livetree_core::{log_op_error, errors::LiveError, NodeId};
/// let target = NodeId::from_raw(3);
/// let err = LiveError::NoTokenizer { node_type: "WordNode".to_string() };
/// log_op_error!("update", err, duration_ms = 1, node_id = %target);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*
        );
    }};
}
