/// Sandstone gold used for artifact fill, wireframes and particles
pub const GOLD: u32 = 0xc9a84c;

/// Dark bronze for the faint wireframe overlay in solid and hologram modes
pub const OVERLAY_BRONZE: u32 = 0x4a3a1c;

/// Warm ambient tint
pub const AMBIENT_WARM: u32 = 0xffd080;

/// Warm key light for solid and wireframe modes
pub const KEY_WARM: u32 = 0xffd700;

/// Cool violet rim light for solid and wireframe modes
pub const RIM_COOL: u32 = 0x8b5cf6;

/// Cyan key light in hologram mode, also the scan-line colour
pub const HOLOGRAM_CYAN: u32 = 0x00ffcc;

/// Deep blue rim light in hologram mode
pub const HOLOGRAM_BLUE: u32 = 0x0044ff;

/// Star field tint
pub const STAR_WHITE: u32 = 0xffffff;
