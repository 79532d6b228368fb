//! Pure calculation functions for crop geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::TargetSize;

/// Largest window with the target's aspect ratio that fits inside `source`.
///
/// Computed in integer arithmetic so an exact fit (e.g. 2000x1000 at 2:1)
/// is never off by one from float rounding. Both sides are at least 1.
///
/// # Examples
/// ```
/// # use cropper::imaging::fit_aspect;
/// # use cropper::types::TargetSize;
/// let target = TargetSize::new(580, 434).unwrap();
/// // Wider than the target: full height, width scaled down
/// assert_eq!(fit_aspect((2000, 1000), target), (1336, 1000));
/// // Taller than the target: full width
/// assert_eq!(fit_aspect((580, 2000), target), (580, 434));
/// ```
pub fn fit_aspect(source: (u32, u32), target: TargetSize) -> (u32, u32) {
    let (src_w, src_h) = (source.0 as u64, source.1 as u64);
    let (tgt_w, tgt_h) = (target.width as u64, target.height as u64);

    let (w, h) = if src_w * tgt_h >= src_h * tgt_w {
        // Source is wider: height fills, width follows the target ratio
        let w = (src_h * tgt_w + tgt_h / 2) / tgt_h;
        (w.min(src_w), src_h)
    } else {
        // Source is taller: width fills
        let h = (src_w * tgt_h + tgt_w / 2) / tgt_w;
        (src_w, h.min(src_h))
    };

    (w.max(1) as u32, h.max(1) as u32)
}

/// Offset that centers a span of `inner` inside `outer`.
pub fn center_offset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}
