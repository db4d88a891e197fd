// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host fakes shared by the integration tests.
//!
//! - [`MockTree`]: an arena document with tags, rects, a per-node "content"
//!   byte, change listeners and an activation log.
//! - [`MockSnapshots`]: captures a node as a bitmap filled with its content
//!   byte; captures can be failed or held open per node.
//! - [`MockWorld`]: records every body and every call it receives.

#![allow(
    missing_docs,
    missing_debug_implementations,
    dead_code,
    reason = "Integration-test helper module; not every suite uses every helper."
)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::rc::Rc;

use futures::channel::oneshot;
use kurbo::{Point, Rect, Size, Vec2};
use peniko::{Blob, Color, ImageAlphaType, ImageData, ImageFormat};
use understory_physics_scene::{
    BodyDesc, BodyHandle, BodyMaterial, ChangeCause, ChangeListener, Kinematics, ListenerId,
    MissingHostContext, Normalization, ObservableTree, PhysicsOptions, PhysicsWorld, PointerEvent,
    PointerHandler, PointerKind, SnapshotError, SnapshotService, TreeView, Visual, WorldError,
};

pub(crate) type NodeId = usize;

struct Element {
    tag: &'static str,
    children: Vec<NodeId>,
    rect: Rect,
    content: u8,
}

struct Listener {
    id: ListenerId,
    node: NodeId,
    callback: Option<ChangeListener>,
}

/// Arena document. Node `0` is the root.
pub(crate) struct MockTree {
    nodes: RefCell<Vec<Element>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    activations: RefCell<Vec<NodeId>>,
    normalized: RefCell<Vec<NodeId>>,
    pub(crate) missing_context: Cell<bool>,
}

impl MockTree {
    pub(crate) fn new(root: Rect) -> Rc<Self> {
        Rc::new(Self {
            nodes: RefCell::new(vec![Element {
                tag: "body",
                children: Vec::new(),
                rect: root,
                content: 0,
            }]),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            activations: RefCell::new(Vec::new()),
            normalized: RefCell::new(Vec::new()),
            missing_context: Cell::new(false),
        })
    }

    pub(crate) fn add(&self, parent: NodeId, tag: &'static str, rect: Rect) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.len();
        nodes.push(Element {
            tag,
            children: Vec::new(),
            rect,
            content: 0,
        });
        nodes[parent].children.push(id);
        id
    }

    pub(crate) fn set_rect(&self, node: NodeId, rect: Rect) {
        self.nodes.borrow_mut()[node].rect = rect;
    }

    pub(crate) fn set_content(&self, node: NodeId, content: u8) {
        self.nodes.borrow_mut()[node].content = content;
    }

    pub(crate) fn content(&self, node: NodeId) -> u8 {
        self.nodes.borrow()[node].content
    }

    /// Fires every listener registered on `node`.
    pub(crate) fn emit(&self, node: NodeId, cause: ChangeCause) {
        let ids: Vec<ListenerId> = self
            .listeners
            .borrow()
            .iter()
            .filter(|listener| listener.node == node)
            .map(|listener| listener.id)
            .collect();
        for id in ids {
            let callback = self
                .listeners
                .borrow_mut()
                .iter_mut()
                .find(|listener| listener.id == id)
                .and_then(|listener| listener.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };
            callback(cause);
            if let Some(listener) = self
                .listeners
                .borrow_mut()
                .iter_mut()
                .find(|listener| listener.id == id)
            {
                listener.callback = Some(callback);
            }
        }
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn activations(&self) -> Vec<NodeId> {
        self.activations.borrow().clone()
    }

    pub(crate) fn normalized(&self) -> Vec<NodeId> {
        self.normalized.borrow().clone()
    }
}

impl TreeView for MockTree {
    type Node = NodeId;

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[*node].children.clone()
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.nodes.borrow()[*node].rect
    }

    fn matches_selector(&self, node: &NodeId, selector: &str) -> bool {
        self.nodes.borrow()[*node].tag == selector
    }
}

impl ObservableTree for MockTree {
    fn on_changed(&self, node: &NodeId, listener: ChangeListener) -> ListenerId {
        let id = ListenerId::from_raw(self.next_listener.get());
        self.next_listener.set(id.raw() + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            node: *node,
            callback: Some(listener),
        });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|listener| listener.id != id);
    }

    fn activate(&self, node: &NodeId) {
        self.activations.borrow_mut().push(*node);
    }

    fn apply_normalization(
        &self,
        nodes: &[NodeId],
        _normalization: &Normalization,
    ) -> Result<(), MissingHostContext> {
        if self.missing_context.get() {
            return Err(MissingHostContext::new("no document head"));
        }
        self.normalized.borrow_mut().extend_from_slice(nodes);
        Ok(())
    }
}

struct SnapshotState {
    tree: Rc<MockTree>,
    failing: RefCell<HashSet<NodeId>>,
    gates: RefCell<HashMap<NodeId, VecDeque<oneshot::Receiver<()>>>>,
    captures: RefCell<Vec<NodeId>>,
    active: Cell<usize>,
    max_active: Cell<usize>,
}

/// Rasterizer fake; clones share state.
#[derive(Clone)]
pub(crate) struct MockSnapshots {
    state: Rc<SnapshotState>,
}

impl MockSnapshots {
    pub(crate) fn new(tree: &Rc<MockTree>) -> Self {
        Self {
            state: Rc::new(SnapshotState {
                tree: Rc::clone(tree),
                failing: RefCell::new(HashSet::new()),
                gates: RefCell::new(HashMap::new()),
                captures: RefCell::new(Vec::new()),
                active: Cell::new(0),
                max_active: Cell::new(0),
            }),
        }
    }

    pub(crate) fn fail(&self, node: NodeId) {
        self.state.failing.borrow_mut().insert(node);
    }

    pub(crate) fn heal(&self, node: NodeId) {
        self.state.failing.borrow_mut().remove(&node);
    }

    /// Holds the next capture of `node` open until the returned sender fires
    /// (or is dropped).
    pub(crate) fn hold(&self, node: NodeId) -> oneshot::Sender<()> {
        let (open, gate) = oneshot::channel();
        self.state
            .gates
            .borrow_mut()
            .entry(node)
            .or_default()
            .push_back(gate);
        open
    }

    /// Nodes captured so far, in order of completion.
    pub(crate) fn captures(&self) -> Vec<NodeId> {
        self.state.captures.borrow().clone()
    }

    pub(crate) fn max_concurrent(&self) -> usize {
        self.state.max_active.get()
    }
}

impl SnapshotService<NodeId> for MockSnapshots {
    async fn capture(&self, node: &NodeId) -> Result<ImageData, SnapshotError> {
        let state = &self.state;
        let rect = state.tree.bounding_rect(node);
        let content = state.tree.content(*node);

        state.active.set(state.active.get() + 1);
        state
            .max_active
            .set(state.max_active.get().max(state.active.get()));
        let gate = state
            .gates
            .borrow_mut()
            .get_mut(node)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            // A dropped sender opens the gate too.
            let _ = gate.await;
        }
        state.active.set(state.active.get() - 1);

        if state.failing.borrow().contains(node) {
            return Err(SnapshotError::Failed(format!("node {node} is tainted")));
        }
        state.captures.borrow_mut().push(*node);
        Ok(bitmap(rect.size(), content))
    }
}

/// An RGBA bitmap of `size` filled with `fill`.
pub(crate) fn bitmap(size: Size, fill: u8) -> ImageData {
    let width = size.width.ceil() as u32;
    let height = size.height.ceil() as u32;
    ImageData {
        data: Blob::from(vec![fill; (width * height * 4) as usize]),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    }
}

#[derive(Clone, Debug)]
pub(crate) struct MockBody {
    pub(crate) is_static: bool,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) material: BodyMaterial,
    pub(crate) visual: Option<Visual>,
    pub(crate) velocity: Vec2,
    pub(crate) angle: f64,
    pub(crate) angular_velocity: f64,
}

impl MockBody {
    /// First byte of the body's texture, i.e. the content it was captured with.
    pub(crate) fn stamp(&self) -> Option<u8> {
        let visual = self.visual.as_ref()?;
        visual.image.data.data().first().copied()
    }
}

/// Calls a world received, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum WorldOp {
    Configure,
    CreateStatic(BodyHandle),
    Create(BodyHandle),
    Destroy(BodyHandle),
    SetVisual(BodyHandle),
    OnPointer,
    StartRunner,
    StartRender(Option<Color>),
    Stop,
}

#[derive(Default)]
pub(crate) struct MockWorld {
    pub(crate) bodies: BTreeMap<BodyHandle, MockBody>,
    pub(crate) ops: Vec<WorldOp>,
    pub(crate) options: Option<PhysicsOptions>,
    pub(crate) fail_configure: bool,
    pub(crate) under_pointer: Option<BodyHandle>,
    pub(crate) running: bool,
    pub(crate) rendering: bool,
    next_body: u64,
    handlers: Vec<PointerHandler>,
}

impl MockWorld {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_configure: true,
            ..Self::default()
        }
    }

    pub(crate) fn body(&self, body: BodyHandle) -> &MockBody {
        &self.bodies[&body]
    }

    pub(crate) fn body_mut(&mut self, body: BodyHandle) -> &mut MockBody {
        self.bodies.get_mut(&body).expect("live body")
    }

    pub(crate) fn dynamic_bodies(&self) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|(_, body)| !body.is_static)
            .map(|(handle, _)| *handle)
            .collect()
    }

    pub(crate) fn static_bodies(&self) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.is_static)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Dispatches one pointer event to every handler.
    pub(crate) fn pointer(&mut self, kind: PointerKind, position: Point) {
        let event = PointerEvent::from_world(self, kind, position);
        for handler in &mut self.handlers {
            handler(event);
        }
    }

    /// Presses on `body`, moves `moves` times, then releases.
    pub(crate) fn gesture(&mut self, body: Option<BodyHandle>, moves: u32) {
        self.under_pointer = body;
        let at = Point::new(10.0, 10.0);
        self.pointer(PointerKind::Down, at);
        for step in 0..moves {
            self.pointer(PointerKind::Move, at + Vec2::new(f64::from(step), 0.0));
        }
        self.pointer(PointerKind::Up, at);
        self.under_pointer = None;
    }

    fn mint(&mut self) -> BodyHandle {
        self.next_body += 1;
        BodyHandle::from_raw(self.next_body)
    }
}

impl PhysicsWorld for MockWorld {
    type Canvas = &'static str;

    fn configure(&mut self, options: &PhysicsOptions) -> Result<(), WorldError> {
        self.ops.push(WorldOp::Configure);
        if self.fail_configure {
            return Err(WorldError::Init("no rendering context".into()));
        }
        self.options = Some(*options);
        Ok(())
    }

    fn create_static_body(&mut self, rect: Rect) -> BodyHandle {
        let handle = self.mint();
        self.ops.push(WorldOp::CreateStatic(handle));
        self.bodies.insert(
            handle,
            MockBody {
                is_static: true,
                position: rect.center(),
                size: rect.size(),
                material: BodyMaterial::default(),
                visual: None,
                velocity: Vec2::ZERO,
                angle: 0.0,
                angular_velocity: 0.0,
            },
        );
        handle
    }

    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = self.mint();
        self.ops.push(WorldOp::Create(handle));
        self.bodies.insert(
            handle,
            MockBody {
                is_static: false,
                position: desc.position,
                size: desc.size,
                material: desc.material,
                visual: Some(desc.visual),
                velocity: Vec2::ZERO,
                angle: 0.0,
                angular_velocity: 0.0,
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        self.ops.push(WorldOp::Destroy(body));
        self.bodies.remove(&body);
    }

    fn kinematics(&self, body: BodyHandle) -> Option<Kinematics> {
        self.bodies.get(&body).map(|body| Kinematics {
            position: body.position,
            velocity: body.velocity,
            angle: body.angle,
            angular_velocity: body.angular_velocity,
        })
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.velocity = velocity;
        }
    }

    fn set_angle(&mut self, body: BodyHandle, angle: f64) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.angle = angle;
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f64) {
        if let Some(body) = self.bodies.get_mut(&body) {
            body.angular_velocity = angular_velocity;
        }
    }

    fn set_visual(&mut self, body: BodyHandle, visual: Visual) {
        self.ops.push(WorldOp::SetVisual(body));
        if let Some(body) = self.bodies.get_mut(&body) {
            body.visual = Some(visual);
        }
    }

    fn on_pointer(&mut self, handler: PointerHandler) {
        self.ops.push(WorldOp::OnPointer);
        self.handlers.push(handler);
    }

    fn body_under_pointer(&self) -> Option<BodyHandle> {
        self.under_pointer
    }

    fn start_runner(&mut self) {
        self.ops.push(WorldOp::StartRunner);
        self.running = true;
    }

    fn start_render(&mut self, background: Option<Color>) {
        self.ops.push(WorldOp::StartRender(background));
        self.rendering = true;
    }

    fn stop(&mut self) {
        self.ops.push(WorldOp::Stop);
        self.running = false;
        self.rendering = false;
    }

    fn canvas(&self) -> &'static str {
        "scene-canvas"
    }
}
