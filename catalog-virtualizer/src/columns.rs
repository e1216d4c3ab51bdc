/// Number of fixed-width cells (separated by `gap`) that fit in `container_width`.
///
/// `max(1, floor((container_width + gap) / (item_width + gap)))`. An unmeasured container
/// (`container_width == 0`) or a degenerate cell (`item_width + gap == 0`) yields `1`, never `0`.
pub fn compute_columns(container_width: u32, item_width: u32, gap: u32) -> usize {
    if container_width == 0 {
        return 1;
    }
    let cell = item_width as u64 + gap as u64;
    if cell == 0 {
        return 1;
    }
    let fit = (container_width as u64 + gap as u64) / cell;
    (fit as usize).max(1)
}
