// src/constants.rs

use plotters::style::RGBColor;

// Probe topology: 5 height levels, each a 2x2 horizontal arrangement of probes.
pub const PROBE_COUNT: usize = 20;
pub const LEVELS: usize = 5;
pub const PROBES_PER_LEVEL: usize = 4;

// Lattice shape (x, level, z).
pub const LATTICE_DIM: [usize; 3] = [2, LEVELS, 2];

// Volume synthesis.
pub const DEFAULT_ZOOM_FACTOR: usize = 50;
pub const DEFAULT_ZOOM_ORDER: u8 = 2;
pub const DEFAULT_VOLUME_DIM: [usize; 3] = [250, 250, 250];
pub const INTENSITY_MAX: f64 = 255.0;

// Sentinel fault codes reported by the probes.
pub const PROBE_DISCONNECTED_CODE: f64 = -127.0; // DS18B20 not responding
pub const PROBE_POWER_ON_RESET_CODE: f64 = 85.0; // DS18B20 scratchpad default, conversion never ran
pub const SENTINEL_CODES: [f64; 2] = [PROBE_DISCONNECTED_CODE, PROBE_POWER_ON_RESET_CODE];
pub const SENTINEL_REPLACEMENT: f64 = 0.0;

// Log format.
pub const LOG_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
pub const LOG_FIELD_COUNT: usize = 6 + PROBE_COUNT;
pub const LOG_FILE_EXTENSION: &str = "log";
pub const TIMESTAMPED_FILE_PREFIX: &str = "c_";

// Extent discovery.
pub const EXTENT_PROGRESS_EVERY_ROWS: usize = 100;

// Animation.
pub const DEFAULT_FRAME_STEP: usize = 5;
pub const DEFAULT_ROTATE_EVERY_NTH_FRAME: usize = 4;
pub const DEFAULT_ROTATION_STEP_DEG: f64 = 1.0;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub const FULL_TURN_DEG: f64 = 360.0;

// Offscreen output.
pub const RENDER_FILE_PREFIX: &str = "render_";
pub const RENDER_FILE_EXTENSION: &str = "png";
pub const DEFAULT_PREVIEW_FILE: &str = "hivetemp_preview.png";

// Render canvas.
pub const RENDER_WIDTH: u32 = 800;
pub const RENDER_HEIGHT: u32 = 600;
pub const TEXT_PANEL_FRACTION: f64 = 0.3;
pub const DEFAULT_SAMPLE_DISTANCE: f64 = 1.0;
pub const EARLY_RAY_TERMINATION_ALPHA: f64 = 0.99;
pub const VIEW_FIT_MARGIN: f64 = 1.05;

// Overlay panel.
pub const OVERLAY_TEXT_X: i32 = 20;
pub const OVERLAY_TEXT_TOP: i32 = 40;
pub const OVERLAY_LINE_SPACING: i32 = 4;
pub const DEFAULT_OVERLAY_TITLE: &str = "Makerdev\nApicultural Telemetry";
pub const DEFAULT_HIVE_NAME: &str = "Janelia 1";

// Font sizes.
pub const FONT_SIZE_OVERLAY: i32 = 18;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// --- Colors ---
pub const COLOR_BACKGROUND: RGBColor = RGBColor(0, 0, 0);
pub const COLOR_TEXT_PANEL: RGBColor = RGBColor(26, 26, 26);
pub const COLOR_TEXT: RGBColor = RGBColor(204, 204, 204);
pub const COLOR_OUTLINE: RGBColor = RGBColor(255, 255, 255);

// Device link.
pub const LINK_PROMPT: &[u8] = b"> \r\n";
pub const DEFAULT_TELEMETRY_LOG: &str = "telemetry.log";
pub const EPOCH_LOG_DATETIME: &str = "1970/1/1,0:0:0";

// src/constants.rs
