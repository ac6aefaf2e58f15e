/// Artifact spin rate about the vertical axis (radians per second)
pub const ARTIFACT_ROTATION_RATE: f32 = 0.35;

/// Angular frequency of the vertical bob
pub const ARTIFACT_BOB_FREQUENCY: f32 = 0.7;

/// Amplitude of the vertical bob (world units)
pub const ARTIFACT_BOB_AMPLITUDE: f32 = 0.06;

/// Particle field orbit rate (radians per second)
pub const PARTICLE_ORBIT_RATE: f32 = 0.04;

/// Particle count in the full viewer
pub const VIEWER_PARTICLE_COUNT: usize = 200;

/// Particle count in thumbnail cards
pub const COMPACT_PARTICLE_COUNT: usize = 80;

/// Edge length of the cube particles are scattered in
pub const PARTICLE_SPREAD: f32 = 6.0;

pub const PARTICLE_SIZE: f32 = 0.012;
pub const PARTICLE_OPACITY: f32 = 0.35;

/// Backdrop star field (full viewer only)
pub const STAR_COUNT: usize = 400;
pub const STAR_RADIUS: f32 = 12.0;
pub const STAR_DEPTH: f32 = 6.0;
pub const STAR_SIZE_FACTOR: f32 = 2.0;

/// Camera placement
pub const VIEWER_CAMERA_DISTANCE: f32 = 3.2;
pub const COMPACT_CAMERA_DISTANCE: f32 = 2.8;
pub const CAMERA_FOV_DEGREES: f32 = 42.0;

/// Orbit zoom band in the full viewer
pub const ORBIT_MIN_DISTANCE: f32 = 1.5;
pub const ORBIT_MAX_DISTANCE: f32 = 6.0;

/// Wireframe overlay opacity in solid and hologram modes
pub const OVERLAY_OPACITY: f32 = 0.25;

/// Hologram scan-line cylinder
pub const SCANLINE_RADIUS: f32 = 1.4;
pub const SCANLINE_HEIGHT: f32 = 3.5;
pub const SCANLINE_RADIAL_SEGMENTS: u32 = 32;
pub const SCANLINE_HEIGHT_SEGMENTS: u32 = 60;
pub const SCANLINE_OPACITY: f32 = 0.04;

/// Conversion from scene light intensities to physical Bevy units
pub const DIRECTIONAL_LUX_PER_UNIT: f32 = 10_000.0;
pub const POINT_LUMENS_PER_UNIT: f32 = 100_000.0;
pub const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 500.0;
