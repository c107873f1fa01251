use thiserror::Error;

/// Rejections raised where camera data enters the frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("camera {field} contains a non-finite component")]
    NonFinite { field: &'static str },
    #[error("camera {field} is not unit length (length {length})")]
    NotUnitLength { field: &'static str, length: f32 },
    #[error("camera {a} and {b} are not orthogonal (dot {dot})")]
    NotOrthogonal {
        a: &'static str,
        b: &'static str,
        dot: f32,
    },
    #[error("camera basis {{right, up, -look}} is left-handed")]
    LeftHanded,
    #[error("cannot derive a camera basis: {0}")]
    DegenerateBasis(&'static str),
    #[error("vertical field of view must lie in (0, pi), got {0}")]
    InvalidFov(f32),
    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
}

/// Disagreement between a host record and the WGSL layout rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{record}.{field} sits at byte {actual} but WGSL places it at {expected}")]
    OffsetMismatch {
        record: &'static str,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{record} is {actual} bytes but its WGSL struct is {expected}")]
    SizeMismatch {
        record: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{record}.{field} has array stride {stride}, uniform arrays need a multiple of 16")]
    ArrayStride {
        record: &'static str,
        field: &'static str,
        stride: usize,
    },
    #[error("{record}.{field} needs {required} bytes before the next member, has {actual}")]
    StructSpacing {
        record: &'static str,
        field: &'static str,
        required: usize,
        actual: usize,
    },
}

/// Failures while assembling or handing off a frame snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("light count {count} exceeds capacity {capacity}")]
    TooManyLights { count: usize, capacity: usize },
    #[error("frame slot {slot} is still in use by in-flight GPU work")]
    SlotInFlight { slot: usize },
    #[error("a frame ring needs at least one slot")]
    EmptyRing,
    #[error(transparent)]
    Camera(#[from] CameraError),
}
