//! Gesture action engine.
//!
//! Turns per-frame finger state and landmark distances into at most one
//! pointer action per frame. Clicks arm a suppression window so a held pose
//! does not repeat-fire, and a closed fist takes one screenshot per closure.
//!
//! Frame evaluation order:
//! 1. Drag gate (pinky up): press/hold/release the left button
//! 2. Move: thumb tip close to the index PIP joint
//! 3. Dispatch table: left click, right click, scroll, screenshot, fist open
//! 4. Time-based resets, run on every frame including hand-less ones

use std::fmt;
use std::time::Instant;

use anyhow::Result;

use crate::output::{ActionSink, MouseButton};
use crate::tracking::landmarks::{INDEX_PIP, INDEX_TIP, MIDDLE_TIP, THUMB_TIP};
use crate::tracking::{classify, measure, pixel_distance, Finger, FingerState, LandmarkSnapshot};

use super::config::ControlConfig;
use super::pointer::{CursorState, PointerMapper};
use super::rules::{scroll_direction, select, Dispatch, ScrollDirection};
use super::timers::{RearmLatch, TimerId, Timers};

/// The action most recently performed, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionLabel {
    #[default]
    None,
    Move,
    LeftClick,
    RightClick,
    ScrollUp,
    ScrollDown,
    Drag,
    Screenshot,
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionLabel::None => write!(f, "None"),
            ActionLabel::Move => write!(f, "Move Pointer"),
            ActionLabel::LeftClick => write!(f, "Left Click"),
            ActionLabel::RightClick => write!(f, "Right Click"),
            ActionLabel::ScrollUp => write!(f, "Scroll Up"),
            ActionLabel::ScrollDown => write!(f, "Scroll Down"),
            ActionLabel::Drag => write!(f, "Drag and Drop"),
            ActionLabel::Screenshot => write!(f, "Screenshot"),
        }
    }
}

/// Something the engine asked the OS to do during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PointerMoved,
    DragStarted,
    DragEnded,
    Clicked(MouseButton),
    Scrolled(ScrollDirection),
    Screenshot,
}

/// Cross-frame gesture state.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionState {
    pub label: ActionLabel,
    /// Left button held down for a drag.
    pub dragging: bool,
    /// Click suppression and label decay.
    pub timers: Timers,
    /// Fires once per fist closure; re-armed when the fist opens.
    pub screenshot: RearmLatch,
}

impl ActionState {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            label: ActionLabel::None,
            dragging: false,
            timers: Timers::new(config.click_suppression(), config.label_decay()),
            screenshot: RearmLatch::default(),
        }
    }

    pub fn click_suppressed(&self) -> bool {
        self.timers.is_armed(TimerId::ClickSuppression)
    }
}

/// Everything that persists between frames, owned by the driving loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub action: ActionState,
    pub cursor: CursorState,
}

impl ControlState {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            action: ActionState::new(config),
            cursor: CursorState::default(),
        }
    }
}

/// Per-frame inputs derived from a landmark snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub fingers: Option<FingerState>,
    /// Thumb tip to index PIP distance, whole pixels
    pub thumb_index_pip: Option<u32>,
    /// Midpoint between thumb tip and index PIP, where a click lands in the frame
    pub click_anchor: Option<(i32, i32)>,
    /// Index tip to middle tip distance, whole pixels
    pub index_middle_tip: Option<u32>,
    /// Index fingertip position in the frame
    pub pointer: Option<(i32, i32)>,
    pub frame_size: (u32, u32),
}

impl FrameInput {
    pub fn from_snapshot(snapshot: &LandmarkSnapshot, frame_size: (u32, u32)) -> Self {
        let thumb_index = measure(snapshot, THUMB_TIP, INDEX_PIP);
        Self {
            fingers: classify(snapshot),
            thumb_index_pip: thumb_index.map(|s| s.length as u32),
            click_anchor: thumb_index.map(|s| s.midpoint),
            index_middle_tip: pixel_distance(snapshot, INDEX_TIP, MIDDLE_TIP),
            pointer: snapshot.get(INDEX_TIP).map(|p| (p.x, p.y)),
            frame_size,
        }
    }

    /// A frame without a detected hand.
    pub fn no_hand(frame_size: (u32, u32)) -> Self {
        Self {
            fingers: None,
            thumb_index_pip: None,
            click_anchor: None,
            index_middle_tip: None,
            pointer: None,
            frame_size,
        }
    }
}

/// Result of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Label after time-based resets
    pub label: ActionLabel,
    pub dragging: bool,
    pub events: Vec<Event>,
}

/// Per-frame scratch state.
struct FrameCtx<'a> {
    input: &'a FrameInput,
    fingers: FingerState,
    now: Instant,
    pointer_tracked: bool,
    events: Vec<Event>,
}

/// Logs a failed OS request. Sink failures never abort the frame.
fn request(what: &str, result: Result<()>) {
    if let Err(e) = result {
        crate::log(&format!("{} request failed: {:#}", what, e));
    }
}

/// Stateless gesture evaluator; all mutable state lives in [`ControlState`].
#[derive(Debug, Clone)]
pub struct GestureEngine {
    click_distance: u32,
    drag_distance: u32,
    scroll_lines: i32,
    mapper: PointerMapper,
}

impl GestureEngine {
    pub fn new(config: &ControlConfig, screen_width: u32, screen_height: u32) -> Self {
        Self {
            click_distance: config.click_distance,
            drag_distance: config.drag_distance,
            scroll_lines: config.scroll_lines,
            mapper: PointerMapper::new(screen_width, screen_height, config),
        }
    }

    /// Evaluates one frame and issues the resulting OS requests.
    pub fn step(
        &self,
        state: &mut ControlState,
        input: &FrameInput,
        now: Instant,
        sink: &mut dyn ActionSink,
    ) -> FrameReport {
        let mut events = Vec::new();

        if let (Some(fingers), Some(thumb_index), Some(index_middle)) =
            (input.fingers, input.thumb_index_pip, input.index_middle_tip)
        {
            let mut ctx = FrameCtx {
                input,
                fingers,
                now,
                pointer_tracked: false,
                events: Vec::new(),
            };
            if fingers.is_up(Finger::Pinky) {
                self.drag(state, &mut ctx, index_middle, sink);
            }
            self.act(state, &mut ctx, thumb_index, sink);
            events = ctx.events;
        }

        Self::settle(&mut state.action, now);

        FrameReport {
            label: state.action.label,
            dragging: state.action.dragging,
            events,
        }
    }

    /// Releases the drag button if it is held. Call before shutting down.
    pub fn release_held_buttons(&self, state: &mut ControlState, sink: &mut dyn ActionSink) {
        if state.action.dragging {
            request("Release left", sink.release(MouseButton::Left));
            state.action.dragging = false;
            crate::log("Drag released on shutdown");
        }
    }

    /// Press, hold and release of the left button while the pinky is up.
    fn drag(
        &self,
        state: &mut ControlState,
        ctx: &mut FrameCtx<'_>,
        index_middle: u32,
        sink: &mut dyn ActionSink,
    ) {
        if !state.action.dragging && index_middle < self.drag_distance {
            request("Press left", sink.press(MouseButton::Left));
            state.action.dragging = true;
            ctx.events.push(Event::DragStarted);
            crate::log("Drag started");
        }

        if state.action.dragging {
            self.track_pointer(state, ctx, sink);
            state.action.label = ActionLabel::Drag;

            if index_middle >= self.drag_distance {
                request("Release left", sink.release(MouseButton::Left));
                state.action.dragging = false;
                ctx.events.push(Event::DragEnded);
                crate::log("Drag ended");
            }
        }
    }

    /// Move mode, or the first matching dispatch rule.
    fn act(
        &self,
        state: &mut ControlState,
        ctx: &mut FrameCtx<'_>,
        thumb_index: u32,
        sink: &mut dyn ActionSink,
    ) {
        if state.action.click_suppressed() {
            return;
        }

        if thumb_index < self.click_distance {
            state.action.label = ActionLabel::Move;
            state.action.timers.arm(TimerId::LabelDecay, ctx.now);
            self.track_pointer(state, ctx, sink);
            return;
        }

        let Some(rule) = select(&ctx.fingers, &state.action.screenshot) else {
            return;
        };

        if matches!(rule.dispatch, Dispatch::LeftClick | Dispatch::RightClick | Dispatch::Screenshot) {
            match ctx.input.click_anchor {
                Some((x, y)) => crate::log(&format!(
                    "Gesture {} {} at ({}, {})",
                    rule.name, ctx.fingers, x, y
                )),
                None => crate::log(&format!("Gesture {} {}", rule.name, ctx.fingers)),
            }
        }

        match rule.dispatch {
            Dispatch::LeftClick => self.click(state, ctx, MouseButton::Left, sink),
            Dispatch::RightClick => self.click(state, ctx, MouseButton::Right, sink),
            Dispatch::Scroll => {
                state.action.label = match scroll_direction(&ctx.fingers) {
                    Some(direction) => {
                        let amount = match direction {
                            ScrollDirection::Up => self.scroll_lines,
                            ScrollDirection::Down => -self.scroll_lines,
                        };
                        request("Scroll", sink.scroll(amount));
                        ctx.events.push(Event::Scrolled(direction));
                        match direction {
                            ScrollDirection::Up => ActionLabel::ScrollUp,
                            ScrollDirection::Down => ActionLabel::ScrollDown,
                        }
                    }
                    None => ActionLabel::None,
                };
                state.action.timers.arm(TimerId::LabelDecay, ctx.now);
            }
            Dispatch::Screenshot => {
                match sink.screenshot() {
                    Ok(path) => crate::log(&format!("Screenshot saved: {}", path.display())),
                    Err(e) => crate::log(&format!("Screenshot failed: {:#}", e)),
                }
                state.action.screenshot.fire();
                state.action.label = ActionLabel::Screenshot;
                state.action.timers.arm(TimerId::LabelDecay, ctx.now);
                ctx.events.push(Event::Screenshot);
            }
            Dispatch::FistOpen => state.action.screenshot.release(),
        }
    }

    fn click(
        &self,
        state: &mut ControlState,
        ctx: &mut FrameCtx<'_>,
        button: MouseButton,
        sink: &mut dyn ActionSink,
    ) {
        request("Press", sink.press(button));
        request("Release", sink.release(button));

        state.action.label = match button {
            MouseButton::Left => ActionLabel::LeftClick,
            MouseButton::Right => ActionLabel::RightClick,
        };
        state.action.timers.arm(TimerId::ClickSuppression, ctx.now);
        state.action.timers.arm(TimerId::LabelDecay, ctx.now);
        ctx.events.push(Event::Clicked(button));
    }

    /// Runs the pointer mapper for the index fingertip, at most once per frame.
    ///
    /// The pointer only follows while the index finger is up.
    fn track_pointer(&self, state: &mut ControlState, ctx: &mut FrameCtx<'_>, sink: &mut dyn ActionSink) {
        if ctx.pointer_tracked || ctx.fingers.is_down(Finger::Index) {
            return;
        }
        let Some(point) = ctx.input.pointer else {
            return;
        };
        ctx.pointer_tracked = true;

        if let Some(target) = self.mapper.track(&mut state.cursor, point, ctx.input.frame_size) {
            request("Move", sink.move_pointer(target.x, target.y));
            ctx.events.push(Event::PointerMoved);
        }
    }

    /// Time-based resets, applied after every frame.
    fn settle(action: &mut ActionState, now: Instant) {
        action.screenshot.settle();

        if action.click_suppressed() && action.timers.expired(TimerId::ClickSuppression, now) {
            action.timers.disarm(TimerId::ClickSuppression);
        }

        if !action.dragging && action.timers.expired(TimerId::LabelDecay, now) {
            action.label = ActionLabel::None;
        }
    }
}
