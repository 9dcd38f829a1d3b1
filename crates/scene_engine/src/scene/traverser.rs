//! Depth-first scene graph traversal
//!
//! [`SceneGraphTraverser`] walks a graph from a root and reports every visit
//! to a [`SceneGraphObserver`] in pre-order. A node reached along more than
//! one path is reported on every visit; all visits after the first are
//! flagged as shared.
//!
//! The set of seen nodes lives on the traverser and survives between calls
//! until [`SceneGraphTraverser::reset`] is called, so a second walk over the
//! same graph reports every node as shared. Nodes are remembered per graph;
//! walking a different graph never reports its nodes as shared.
//!
//! The traverser is not re-entrant. An observer that calls back into the
//! traverser it is being driven by gets [`TraversalError::InUse`].

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;

use crate::foundation::error_reporter::{LogErrorReporter, ReporterHandle};
use super::node::{NodeId, NodeKind};
use super::scene_graph::{GraphId, SceneGraph};

/// Message sent to the error reporter when an observer fails
const TRAVERSAL_ERROR_MSG: &str = "Traversal error";

/// Error an observer may return from a visit
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Shared, externally-owned observer reference
pub type ObserverHandle = Rc<RefCell<dyn SceneGraphObserver>>;

/// Callback notified once per node visit
pub trait SceneGraphObserver {
    /// A node has been reached
    ///
    /// # Arguments
    /// * `graph` - The graph being walked
    /// * `parent` - Node the visit came from, or the explicit parent given
    ///   to the traversal for the root
    /// * `node` - Node being visited
    /// * `shared` - True if the node was seen before since the last reset
    /// * `depth` - Levels below the traversal root, which is depth 0
    ///
    /// Returning an error does not stop the walk; the error is reported as a
    /// warning and the node's children are still visited.
    fn observed_node(
        &mut self,
        graph: &SceneGraph,
        parent: Option<NodeId>,
        node: NodeId,
        shared: bool,
        depth: usize,
    ) -> Result<(), ObserverError>;
}

/// Traversal errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalError {
    /// A traversal is already running on this traverser
    #[error("Currently traversing")]
    InUse,
}

/// Clears the in-use flag when dropped, including during unwinding
struct InUseGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> InUseGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Result<Self, TraversalError> {
        if flag.replace(true) {
            return Err(TraversalError::InUse);
        }
        Ok(Self { flag })
    }
}

impl Drop for InUseGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Per-call counters, used for logging
#[derive(Debug, Default)]
struct TraversalStats {
    visits: usize,
    shared: usize,
    failures: usize,
}

/// Reusable depth-first walker over a [`SceneGraph`]
///
/// All methods take `&self` so that an observer holding a handle to the
/// traverser can reach it during a walk; the re-entrancy guard then rejects
/// the nested call. The type is `!Sync`.
pub struct SceneGraphTraverser {
    in_use: Cell<bool>,
    visited: RefCell<HashSet<(GraphId, NodeId)>>,
    observer: RefCell<Option<ObserverHandle>>,
    reporter: RefCell<Option<ReporterHandle>>,
    default_reporter: ReporterHandle,
}

impl Default for SceneGraphTraverser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneGraphTraverser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraphTraverser")
            .field("in_use", &self.in_use.get())
            .field("visited", &self.visited.borrow().len())
            .field("has_observer", &self.observer.borrow().is_some())
            .field("has_reporter", &self.reporter.borrow().is_some())
            .finish()
    }
}

impl SceneGraphTraverser {
    /// Create a traverser that falls back to logging for error reports
    pub fn new() -> Self {
        Self::with_default_reporter(LogErrorReporter::handle())
    }

    /// Create a traverser with an explicit fallback reporter
    ///
    /// The fallback is used whenever no reporter has been set, or after
    /// `set_error_reporter(None)`.
    pub fn with_default_reporter(default_reporter: ReporterHandle) -> Self {
        Self {
            in_use: Cell::new(false),
            visited: RefCell::new(HashSet::new()),
            observer: RefCell::new(None),
            reporter: RefCell::new(None),
            default_reporter,
        }
    }

    /// Replace the observer. `None` turns later traversals into no-ops.
    ///
    /// A walk already in progress keeps the observer it started with.
    pub fn set_observer(&self, observer: Option<ObserverHandle>) {
        *self.observer.borrow_mut() = observer;
    }

    /// Replace the error reporter. `None` restores the default reporter.
    pub fn set_error_reporter(&self, reporter: Option<ReporterHandle>) {
        *self.reporter.borrow_mut() = reporter;
    }

    /// Walk the graph from `root` with no explicit parent
    ///
    /// Equivalent to `traverse_graph_from(graph, None, root)`.
    pub fn traverse_graph(&self, graph: &SceneGraph, root: Option<NodeId>) -> Result<(), TraversalError> {
        self.traverse_graph_from(graph, None, root)
    }

    /// Walk the graph from `root`, reporting `parent` as the root's parent
    ///
    /// An explicit parent lets a walk be grafted onto a structure that lives
    /// elsewhere, for example a sub-scene loaded from a separate file.
    ///
    /// Returns immediately when `root` is `None` or stale, or when no
    /// observer is set.
    ///
    /// # Errors
    /// [`TraversalError::InUse`] if called while a walk is already running on
    /// this traverser. Nothing is visited in that case.
    pub fn traverse_graph_from(
        &self,
        graph: &SceneGraph,
        parent: Option<NodeId>,
        root: Option<NodeId>,
    ) -> Result<(), TraversalError> {
        let _guard = InUseGuard::acquire(&self.in_use)?;

        let Some(root) = root else {
            return Ok(());
        };
        let Some(observer) = self.observer.borrow().clone() else {
            return Ok(());
        };
        let reporter = self.reporter.borrow().clone()
            .unwrap_or_else(|| Rc::clone(&self.default_reporter));

        log::trace!("Starting traversal at {:?} (parent {:?})", root, parent);

        let mut stats = TraversalStats::default();
        let mut walk = Walk {
            graph,
            visited: &self.visited,
            observer: &observer,
            reporter: &reporter,
            stats: &mut stats,
        };
        walk.visit(parent, root, 0);

        log::debug!(
            "Traversal from {:?} finished: {} visits, {} shared, {} observer failures",
            root, stats.visits, stats.shared, stats.failures
        );
        Ok(())
    }

    /// Forget every node seen so far
    pub fn reset(&self) {
        self.visited.borrow_mut().clear();
    }

    /// Whether a walk is currently running
    pub fn is_in_use(&self) -> bool {
        self.in_use.get()
    }

    /// Number of distinct nodes seen since the last reset
    pub fn visited_count(&self) -> usize {
        self.visited.borrow().len()
    }
}

/// State of one running walk
struct Walk<'a> {
    graph: &'a SceneGraph,
    visited: &'a RefCell<HashSet<(GraphId, NodeId)>>,
    observer: &'a ObserverHandle,
    reporter: &'a ReporterHandle,
    stats: &'a mut TraversalStats,
}

impl Walk<'_> {
    fn visit(&mut self, parent: Option<NodeId>, id: NodeId, depth: usize) {
        let graph = self.graph;
        let Some(node) = graph.node(id) else {
            return;
        };

        let shared = !self.visited.borrow_mut().insert((graph.id(), id));
        self.stats.visits += 1;
        if shared {
            self.stats.shared += 1;
        }

        let result = self.observer.borrow_mut().observed_node(graph, parent, id, shared, depth);
        if let Err(err) = result {
            self.stats.failures += 1;
            let cause: &(dyn std::error::Error + 'static) = &*err;
            self.reporter.warning_report(TRAVERSAL_ERROR_MSG, Some(cause));
        }

        match node.kind() {
            NodeKind::Group(group) => {
                for &child in group.children() {
                    self.visit(Some(id), child, depth + 1);
                }
            }
            NodeKind::SimpleScene(scene) => {
                if let Some(root) = scene.root() {
                    self.visit(Some(id), root, depth + 1);
                }
            }
            NodeKind::Shared(shared_node) => {
                if let Some(child) = shared_node.child() {
                    self.visit(Some(id), child, depth + 1);
                }
            }
            NodeKind::Layer(_) | NodeKind::Custom(_) | NodeKind::Leaf => {}
        }
    }
}
