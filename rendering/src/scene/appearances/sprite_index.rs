use super::types::SpriteInfo;

/// Flat offset of the first layer of a sprite in `SpriteInfo::sprite_ids`.
///
/// `phase` wraps modulo the phase count. Negative pattern coordinates mean
/// "unset" and select the first pattern; they are never wrapped.
pub fn sprite_index(
    info: &SpriteInfo,
    phase: u32,
    pattern_x: i32,
    pattern_y: i32,
    pattern_z: i32,
) -> usize {
    let phase = phase as usize % info.phases as usize;
    let depth = info.pattern_depth as usize;
    let height = info.pattern_height as usize;
    let width = info.pattern_width as usize;

    let index = ((phase * depth + pattern_coordinate(pattern_z, depth)) * height
        + pattern_coordinate(pattern_y, height))
        * width
        + pattern_coordinate(pattern_x, width);

    index * info.layers as usize
}

/// Picks the explicit phase when given, the animator's cached phase otherwise.
pub fn effective_phase(phase: Option<u32>, cached_phase: u32) -> u32 {
    phase.unwrap_or(cached_phase)
}

fn pattern_coordinate(value: i32, dimension: usize) -> usize {
    if value >= 0 {
        value as usize % dimension
    } else {
        0
    }
}
