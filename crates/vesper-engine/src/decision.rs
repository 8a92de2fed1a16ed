//! Binary decision trees for non-player agents.
//!
//! A [`DecisionTree`] is a binary tree of [`DecisionNode`]s. Each node holds a
//! [`Decision`]: a predicate and an action, both plain function pointers.
//! Traversal starts at the root and evaluates the current node's predicate:
//! `true` descends right, `false` descends left. When the chosen child is
//! absent, traversal stops and that node's action runs exactly once.
//!
//! Decisions receive the agent they drive plus a borrowed [`AgentContext`]
//! describing the rest of the world. Nothing is cached between frames.
//!
//! # Example
//!
//! ```
//! use vesper_engine::decision::{Decision, DecisionNode, DecisionTree};
//!
//! fn yes(_: &vesper_engine::object::dynamic::DynamicObject, _: &vesper_engine::decision::AgentContext<'_>, _: f64) -> bool {
//!     true
//! }
//! fn nothing(_: &mut vesper_engine::object::dynamic::DynamicObject, _: &mut vesper_engine::decision::AgentContext<'_>, _: f64) {}
//!
//! let tree = DecisionTree::new(DecisionNode::branch(
//!     Decision::new("root", yes, nothing),
//!     Some(DecisionNode::leaf(Decision::new("left", yes, nothing))),
//!     None,
//! ));
//! assert_eq!(tree.root().map(|node| node.decision().name()), Some("root"));
//! ```

use std::fmt;

use rand_pcg::Pcg64;
use tracing::trace;

use crate::commands::FrameCommands;
use crate::config::EngineConfig;
use crate::id::IdAllocator;
use crate::object::dynamic::DynamicObject;
use crate::object::statics::StaticObject;
use crate::object::GameObject;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Read-only view of the level, lent to decisions for one traversal.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub player: &'a DynamicObject,
    pub statics: &'a [StaticObject],
    /// Level clock in seconds.
    pub time: f64,
    /// Whether the level runs a gravity engine (platformer, side-scroller).
    pub gravity: bool,
}

/// Everything a decision may consult or affect besides its own agent.
pub struct AgentContext<'a> {
    pub world: WorldView<'a>,
    pub commands: &'a mut FrameCommands,
    pub ids: &'a mut IdAllocator,
    /// The level's seeded generator. All agent randomness comes from here.
    pub rng: &'a mut Pcg64,
    pub config: &'a EngineConfig,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Predicate ("decide") called on the agent a tree is bound to.
pub type Predicate = fn(&DynamicObject, &AgentContext<'_>, f64) -> bool;

/// Action ("do_action") applied to the agent a tree is bound to.
pub type Action = fn(&mut DynamicObject, &mut AgentContext<'_>, f64);

/// A named predicate/action pair.
#[derive(Clone, Copy)]
pub struct Decision {
    name: &'static str,
    predicate: Predicate,
    action: Action,
}

impl Decision {
    pub const fn new(name: &'static str, predicate: Predicate, action: Action) -> Self {
        Self { name, predicate, action }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn decide(&self, agent: &DynamicObject, ctx: &AgentContext<'_>, dt: f64) -> bool {
        (self.predicate)(agent, ctx, dt)
    }

    pub fn do_action(&self, agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, dt: f64) {
        (self.action)(agent, ctx, dt)
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decision").field("name", &self.name).finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// DecisionNode
// ---------------------------------------------------------------------------

/// One node of a decision tree. Children are exclusively owned.
#[derive(Debug, Clone)]
pub struct DecisionNode {
    decision: Decision,
    /// Taken when the predicate is false.
    left: Option<Box<DecisionNode>>,
    /// Taken when the predicate is true.
    right: Option<Box<DecisionNode>>,
}

impl DecisionNode {
    pub fn leaf(decision: Decision) -> Self {
        Self {
            decision,
            left: None,
            right: None,
        }
    }

    pub fn branch(decision: Decision, if_false: Option<DecisionNode>, if_true: Option<DecisionNode>) -> Self {
        Self {
            decision,
            left: if_false.map(Box::new),
            right: if_true.map(Box::new),
        }
    }

    pub fn decision(&self) -> &Decision {
        &self.decision
    }

    pub fn left(&self) -> Option<&DecisionNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&DecisionNode> {
        self.right.as_deref()
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.left().map_or(0, DecisionNode::len) + self.right().map_or(0, DecisionNode::len)
    }
}

/// Walk from `node` to the decision whose chosen child is absent.
///
/// Returns `None` only when `node` itself is absent.
pub fn traverse<'t>(
    node: Option<&'t DecisionNode>,
    agent: &DynamicObject,
    ctx: &AgentContext<'_>,
    dt: f64,
) -> Option<&'t Decision> {
    let mut current = node?;
    loop {
        let next = if current.decision.decide(agent, ctx, dt) {
            current.right()
        } else {
            current.left()
        };
        match next {
            Some(child) => current = child,
            None => return Some(&current.decision),
        }
    }
}

// ---------------------------------------------------------------------------
// DecisionTree
// ---------------------------------------------------------------------------

/// A behavior policy owned by one agent.
#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    root: Option<DecisionNode>,
}

impl DecisionTree {
    pub fn new(root: DecisionNode) -> Self {
        Self { root: Some(root) }
    }

    /// A tree that never selects anything.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&DecisionNode> {
        self.root.as_ref()
    }

    pub fn set_root(&mut self, root: Option<DecisionNode>) {
        self.root = root;
    }

    /// The decision traversal would reach this frame, without acting on it.
    pub fn select(&self, agent: &DynamicObject, ctx: &AgentContext<'_>, dt: f64) -> Option<&Decision> {
        traverse(self.root(), agent, ctx, dt)
    }

    /// Traverse and run the selected action once. Returns its name.
    pub fn run(&self, agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, dt: f64) -> Option<&'static str> {
        let decision = *self.select(agent, ctx, dt)?;
        trace!(agent = %agent.id(), decision = decision.name(), "decision selected");
        decision.do_action(agent, ctx, dt);
        Some(decision.name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
