//! Area relabelling so the anchor room always lands in area 0.
//!
//! The relabelling is a cyclic shift, `(label - anchor_label + k) mod k`,
//! applied to every room. Groupings are untouched; only the numbering moves.

/// Shift `labels` so `labels[anchor]` becomes 0.
pub fn normalize_areas(labels: &[usize], anchor: usize, areas: usize) -> Vec<usize> {
    let offset = labels[anchor];
    labels
        .iter()
        .map(|&label| (label + areas - offset) % areas)
        .collect()
}
