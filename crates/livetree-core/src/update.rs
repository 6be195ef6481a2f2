//! The update operation
//!
//! Brings a live node's content in line with new text or a new snapshot,
//! touching as little of the subtree as possible:
//!
//! 1. Validate the target and the content.
//! 2. Text-capable target: set its text, done.
//! 3. Otherwise tokenize raw text with the grammar entry point matching the
//!    target's type, diff the current projection against the result, and
//!    replay the edit script in place.
//! 4. If replay fails or diverges, rebuild the target's children from the
//!    new snapshot. The caller never sees that failure.
//!
//! Nodes the edit script does not reach keep their identity and their
//! auxiliary data.

use std::time::Instant;

use livetree_core_types::schema::EVENT_FALLBACK;
use livetree_core_types::{RequestContext, Sensitive};

use crate::diff::{Differ, SequenceDiffer};
use crate::document::{Capability, LiveDocument};
use crate::errors::{ExError, LiveError, ReconcileFailure, Result};
use crate::grammar::{tokenizer_for, Grammar, LatinGrammar};
use crate::model::{NodeId, SnapshotTree};
use crate::reconcile::{reconcile, replace_children};
use crate::{log_op_end, log_op_error, log_op_start};

/// Operation name used in log events
pub const OP_UPDATE: &str = "update";

/// New content for a node: raw text or an already parsed snapshot
#[derive(Clone, PartialEq)]
pub enum Content {
    Text(String),
    Snapshot(SnapshotTree),
}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Text(text) => f.debug_tuple("Text").field(&Sensitive::new(text)).finish(),
            Content::Snapshot(snapshot) => f
                .debug_struct("Snapshot")
                .field("type", &snapshot.node_type())
                .field("nodes", &snapshot.node_count())
                .finish(),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<SnapshotTree> for Content {
    fn from(snapshot: SnapshotTree) -> Self {
        Content::Snapshot(snapshot)
    }
}

impl From<&SnapshotTree> for Content {
    fn from(snapshot: &SnapshotTree) -> Self {
        Content::Snapshot(snapshot.clone())
    }
}

/// How an update ended
///
/// Informational only: every variant means the target now holds the
/// requested content.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Text-capable target, text set directly
    TextSet,
    /// Content already matched, nothing touched
    NoOp,
    /// Edit script replayed in place
    Applied { changes: usize },
    /// Replay failed; children rebuilt from the snapshot
    Replaced { reason: ReconcileFailure },
}

impl UpdateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOutcome::TextSet => "text_set",
            UpdateOutcome::NoOp => "noop",
            UpdateOutcome::Applied { .. } => "applied",
            UpdateOutcome::Replaced { .. } => "replaced",
        }
    }

    /// Whether the tree was mutated
    pub fn mutated(&self) -> bool {
        !matches!(self, UpdateOutcome::NoOp)
    }
}

/// Update `target` so it holds `content`
///
/// # Errors
///
/// - `NotANode` - `target` is not a live node of `doc`
/// - `TypeMismatch` - the snapshot's type or shape does not fit `target`,
///   including a snapshot produced by `grammar` from raw text
/// - `NotAContainer` - `target` holds neither text nor children
/// - `NoTokenizer` - raw text for a type `grammar` cannot parse standalone
///
/// On error the document is untouched.
///
/// # Example
///
/// ```
/// use livetree_core::grammar::LatinGrammar;
/// use livetree_core::diff::SequenceDiffer;
/// use livetree_core::model::LiveTree;
/// use livetree_core::{update, LiveDocument, UpdateOutcome};
///
/// let snapshot = LatinGrammar::parse_sentence("Some English");
/// let (mut tree, sentence) = LiveTree::from_snapshot(&snapshot);
/// let first = tree.child_at(sentence, 0).unwrap();
///
/// let differ = SequenceDiffer::new();
/// let outcome = update(&mut tree, &LatinGrammar, &differ, sentence, "Some English words.").unwrap();
///
/// assert_eq!(outcome, UpdateOutcome::Applied { changes: 3 });
/// assert_eq!(tree.child_at(sentence, 0).unwrap(), first);
/// ```
pub fn update<D, G, F>(
    doc: &mut D,
    grammar: &G,
    differ: &F,
    target: NodeId,
    content: impl Into<Content>,
) -> Result<UpdateOutcome>
where
    D: LiveDocument + ?Sized,
    G: Grammar + ?Sized,
    F: Differ + ?Sized,
{
    run_update(doc, grammar, differ, target, content.into(), true)
}

fn run_update<D, G, F>(
    doc: &mut D,
    grammar: &G,
    differ: &F,
    target: NodeId,
    content: Content,
    verify: bool,
) -> Result<UpdateOutcome>
where
    D: LiveDocument + ?Sized,
    G: Grammar + ?Sized,
    F: Differ + ?Sized,
{
    log_op_start!(OP_UPDATE, node_id = %target, content = ?content);
    let start = Instant::now();

    let outcome = update_impl(doc, grammar, differ, target, content, verify).map_err(|e| {
        log_op_error!(
            OP_UPDATE,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            node_id = %target
        );
        e
    })?;

    log_op_end!(
        OP_UPDATE,
        duration_ms = start.elapsed().as_millis() as u64,
        node_id = %target,
        outcome = outcome.as_str()
    );

    Ok(outcome)
}

fn update_impl<D, G, F>(
    doc: &mut D,
    grammar: &G,
    differ: &F,
    target: NodeId,
    content: Content,
    verify: bool,
) -> Result<UpdateOutcome>
where
    D: LiveDocument + ?Sized,
    G: Grammar + ?Sized,
    F: Differ + ?Sized,
{
    if !doc.contains(target) {
        return Err(LiveError::NotANode { node_id: target });
    }
    let node_type = doc.node_type(target)?.to_string();

    if let Content::Snapshot(snapshot) = &content {
        check_type(&node_type, snapshot)?;
    }

    match doc.capability(target)? {
        Capability::Text => {
            let value = match &content {
                Content::Text(text) => text.as_str(),
                Content::Snapshot(snapshot) => snapshot
                    .value()
                    .ok_or_else(|| shape_mismatch(&node_type, "children"))?,
            };
            doc.set_text(target, value)?;
            return Ok(UpdateOutcome::TextSet);
        }
        Capability::Void => {
            return Err(LiveError::NotAContainer {
                node_id: target,
                node_type,
            });
        }
        Capability::Container => {}
    }

    let snapshot = match content {
        Content::Snapshot(snapshot) => snapshot,
        Content::Text(text) => {
            let tokenizer = tokenizer_for(grammar, &node_type).ok_or_else(|| {
                LiveError::NoTokenizer {
                    node_type: node_type.clone(),
                }
            })?;
            // Tokenizer output must fit `target` like any caller snapshot
            let parsed = tokenizer(&text);
            check_type(&node_type, &parsed)?;
            parsed
        }
    };
    if snapshot.is_text() {
        return Err(shape_mismatch(&node_type, "a value"));
    }

    let current = doc.value_of(target)?;
    let script = differ.diff(&current, &snapshot);

    let result = if script.is_empty() {
        if !verify || current == snapshot {
            return Ok(UpdateOutcome::NoOp);
        }
        Err(ReconcileFailure::Diverged)
    } else {
        reconcile(doc, target, &snapshot, &script, verify)
    };

    match result {
        Ok(stats) => Ok(UpdateOutcome::Applied {
            changes: stats.applied(),
        }),
        Err(failure) => {
            let ex_err: ExError = failure.clone().into();
            tracing::warn!(
                component = module_path!(),
                op = OP_UPDATE,
                event = EVENT_FALLBACK,
                node_id = %target,
                change_count = script.len(),
                err.kind = ?ex_err.kind(),
                err.code = ex_err.code(),
                reason = %failure,
            );
            replace_children(doc, target, &snapshot)?;
            Ok(UpdateOutcome::Replaced { reason: failure })
        }
    }
}

fn check_type(node_type: &str, snapshot: &SnapshotTree) -> Result<()> {
    if snapshot.node_type() == node_type {
        return Ok(());
    }
    Err(LiveError::TypeMismatch {
        expected: node_type.to_string(),
        found: snapshot.node_type().to_string(),
    })
}

fn shape_mismatch(node_type: &str, found: &str) -> LiveError {
    LiveError::TypeMismatch {
        expected: node_type.to_string(),
        found: format!("{} with {}", node_type, found),
    }
}

/// Update service owning a grammar and a differ
///
/// # Example
///
/// ```
/// use livetree_core::model::LiveTree;
/// use livetree_core::{LiveDocument, Reconciler};
///
/// let reconciler = Reconciler::new();
/// let mut tree = LiveTree::new();
/// let root = tree.create_parent("RootNode");
///
/// reconciler.update(&mut tree, root, "Some English words.").unwrap();
/// assert_eq!(tree.to_plain_string(root).unwrap(), "Some English words.");
/// ```
pub struct Reconciler {
    grammar: Box<dyn Grammar>,
    differ: Box<dyn Differ>,
    verify_after_apply: bool,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("verify_after_apply", &self.verify_after_apply)
            .finish_non_exhaustive()
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    /// Latin grammar, sequence differ, verification on
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ReconcilerBuilder {
        ReconcilerBuilder::default()
    }

    pub fn grammar(&self) -> &dyn Grammar {
        self.grammar.as_ref()
    }

    pub fn verify_after_apply(&self) -> bool {
        self.verify_after_apply
    }

    /// Update `target` so it holds `content`; see [`update`]
    pub fn update<D: LiveDocument + ?Sized>(
        &self,
        doc: &mut D,
        target: NodeId,
        content: impl Into<Content>,
    ) -> Result<UpdateOutcome> {
        run_update(
            doc,
            self.grammar.as_ref(),
            self.differ.as_ref(),
            target,
            content.into(),
            self.verify_after_apply,
        )
    }

    /// [`Reconciler::update`] inside a span carrying the request's correlation ids
    pub fn update_with_context<D: LiveDocument + ?Sized>(
        &self,
        doc: &mut D,
        target: NodeId,
        content: impl Into<Content>,
        ctx: &RequestContext,
    ) -> Result<UpdateOutcome> {
        let span = tracing::info_span!(
            "update",
            request_id = %ctx.request_id,
            trace_id = tracing::field::Empty,
        );
        if let Some(trace_id) = &ctx.trace_id {
            span.record("trace_id", trace_id.as_str());
        }
        let _guard = span.enter();

        self.update(doc, target, content)
    }
}

/// Builder for [`Reconciler`]
pub struct ReconcilerBuilder {
    grammar: Box<dyn Grammar>,
    differ: Box<dyn Differ>,
    verify_after_apply: bool,
}

impl Default for ReconcilerBuilder {
    fn default() -> Self {
        Self {
            grammar: Box::new(LatinGrammar),
            differ: Box::new(SequenceDiffer::default()),
            verify_after_apply: true,
        }
    }
}

impl ReconcilerBuilder {
    pub fn grammar(mut self, grammar: impl Grammar + 'static) -> Self {
        self.grammar = Box::new(grammar);
        self
    }

    pub fn differ(mut self, differ: impl Differ + 'static) -> Self {
        self.differ = Box::new(differ);
        self
    }

    /// Check the result of every replayed script against the target snapshot
    ///
    /// On by default. Turning it off saves one projection per update but
    /// lets a differ that breaks the index conventions corrupt the tree.
    pub fn verify_after_apply(mut self, verify: bool) -> Self {
        self.verify_after_apply = verify;
        self
    }

    pub fn build(self) -> Reconciler {
        Reconciler {
            grammar: self.grammar,
            differ: self.differ,
            verify_after_apply: self.verify_after_apply,
        }
    }
}
