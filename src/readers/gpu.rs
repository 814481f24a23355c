/// Full-scale GPU load: the driver reports tenths of a percent.
pub const GPU_LOAD_SCALE: u16 = 1000;

/// GPU load clamped into `0..=GPU_LOAD_SCALE`; unreadable reads as zero.
pub fn gpu_load(raw: Option<i64>) -> u16 {
    raw.unwrap_or(0).clamp(0, GPU_LOAD_SCALE as i64) as u16
}
