//! Flat frame buffer shared with the host page.
//! Must stay in sync with the host's reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 8 floats]
//! [Camera: 8 floats]
//! [Balls:  max_balls × 4 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame so the host can
//! compute offsets without a separate handshake.

use bytemuck::{Pod, Zeroable};

use crate::api::types::{BallRole, GameEvent, Group};
use crate::core::registry::BallRegistry;
use crate::rules::camera::{CameraMode, CameraRig};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_BALLS: usize = 2;
pub const HEADER_BALL_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_CAMERA_MODE: usize = 6;
pub const HEADER_CUE_STICK_VISIBLE: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the camera section: position xyz, yaw, pitch, forward xyz.
pub const CAMERA_FLOATS: usize = 8;

/// Floats per ball: id, kind, x, z (wire format).
pub const BALL_FLOATS: usize = 4;

/// Floats per game event: kind, a, b, c (wire format).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

pub const DEFAULT_MAX_BALLS: usize = 16;
pub const DEFAULT_MAX_EVENTS: usize = 32;

/// Ball kind codes on the wire.
pub mod ball_kind {
    pub const CUE: f32 = 0.0;
    pub const GROUP1: f32 = 1.0;
    pub const GROUP2: f32 = 2.0;
    pub const EIGHT: f32 = 8.0;
}

/// One ball as the host sees it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub id: f32,
    pub kind: f32,
    pub x: f32,
    pub z: f32,
}

fn kind_code(role: BallRole) -> f32 {
    match role {
        BallRole::Cue => ball_kind::CUE,
        BallRole::Eight => ball_kind::EIGHT,
        BallRole::Object(Group::Group1) => ball_kind::GROUP1,
        BallRole::Object(Group::Group2) => ball_kind::GROUP2,
    }
}

/// Section sizes and offsets for a given capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_balls: usize,
    pub max_events: usize,

    pub camera_offset: usize,
    pub ball_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
}

impl ProtocolLayout {
    pub fn new(max_balls: usize, max_events: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let ball_data_offset = camera_offset + CAMERA_FLOATS;
        let event_data_offset = ball_data_offset + max_balls * BALL_FLOATS;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;
        Self {
            max_balls,
            max_events,
            camera_offset,
            ball_data_offset,
            event_data_offset,
            buffer_total_floats,
        }
    }
}

impl Default for ProtocolLayout {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BALLS, DEFAULT_MAX_EVENTS)
    }
}

/// The buffer itself, rewritten once per frame.
pub struct FrameBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
    frame: u32,
}

impl FrameBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let data = vec![0.0; layout.buffer_total_floats];
        Self {
            layout,
            data,
            frame: 0,
        }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pack the current table, camera and pending events.
    pub fn write(&mut self, balls: &BallRegistry, camera: &CameraRig, events: &[GameEvent]) {
        let layout = &self.layout;
        self.frame = self.frame.wrapping_add(1);

        let ball_count = balls.len().min(layout.max_balls);
        if balls.len() > layout.max_balls {
            log::warn!("{} balls exceed frame capacity {}", balls.len(), layout.max_balls);
        }
        let event_count = events.len().min(layout.max_events);
        if events.len() > layout.max_events {
            log::warn!(
                "Dropping {} events over frame capacity",
                events.len() - layout.max_events
            );
        }

        let header = &mut self.data[..HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = self.frame as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_BALLS] = layout.max_balls as f32;
        header[HEADER_BALL_COUNT] = ball_count as f32;
        header[HEADER_MAX_EVENTS] = layout.max_events as f32;
        header[HEADER_EVENT_COUNT] = event_count as f32;
        header[HEADER_CAMERA_MODE] = match camera.mode {
            CameraMode::CueStick => 0.0,
            CameraMode::Overhead => 1.0,
        };
        header[HEADER_CUE_STICK_VISIBLE] = if camera.cue_stick_visible { 1.0 } else { 0.0 };

        let forward = camera.forward();
        self.data[layout.camera_offset..layout.camera_offset + CAMERA_FLOATS].copy_from_slice(&[
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.yaw,
            camera.pitch,
            forward.x,
            forward.y,
            forward.z,
        ]);

        let instances: Vec<BallInstance> = balls
            .iter()
            .take(ball_count)
            .map(|ball| BallInstance {
                id: ball.id.0 as f32,
                kind: kind_code(ball.role),
                x: ball.pos.x,
                z: ball.pos.z,
            })
            .collect();
        let ball_start = layout.ball_data_offset;
        let ball_floats: &[f32] = bytemuck::cast_slice(&instances);
        self.data[ball_start..ball_start + ball_floats.len()].copy_from_slice(ball_floats);

        let event_start = layout.event_data_offset;
        let event_floats: &[f32] = bytemuck::cast_slice(&events[..event_count]);
        self.data[event_start..event_start + event_floats.len()].copy_from_slice(event_floats);
    }
}
