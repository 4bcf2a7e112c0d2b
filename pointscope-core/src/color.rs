//! Color tables for object and label rendering

/// RGB color with components in [0, 1]
pub type Rgb = [f32; 3];

/// Palette used to assign each sample a distinct object color
const OBJECT_PALETTE: [Rgb; 10] = [
    [0.90, 0.10, 0.10],
    [0.10, 0.55, 0.90],
    [0.15, 0.75, 0.25],
    [0.95, 0.65, 0.10],
    [0.60, 0.25, 0.80],
    [0.10, 0.75, 0.75],
    [0.85, 0.35, 0.60],
    [0.55, 0.45, 0.20],
    [0.40, 0.40, 0.95],
    [0.50, 0.50, 0.50],
];

/// Palette used to color vertices by cluster label
const LABEL_PALETTE: [Rgb; 8] = [
    [0.95, 0.25, 0.25],
    [0.25, 0.60, 0.95],
    [0.30, 0.80, 0.30],
    [0.95, 0.80, 0.20],
    [0.70, 0.30, 0.85],
    [0.20, 0.80, 0.80],
    [0.95, 0.50, 0.20],
    [0.75, 0.75, 0.75],
];

/// Object color for a sample index, cycling through a fixed palette
pub fn object_color(sample_idx: usize) -> Rgb {
    OBJECT_PALETTE[sample_idx % OBJECT_PALETTE.len()]
}

/// Color for a cluster label, cycling through a fixed palette
pub fn label_color(label: u32) -> Rgb {
    LABEL_PALETTE[label as usize % LABEL_PALETTE.len()]
}

/// Color for the trajectory traced from one vertex
///
/// Keyed by the vertex index so every edge of one vertex's trajectory
/// shares a color, and different vertices get distinct colors.
pub fn trajectory_color(vertex_idx: usize) -> Rgb {
    OBJECT_PALETTE[vertex_idx % OBJECT_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_colors_cycle() {
        assert_eq!(object_color(0), object_color(OBJECT_PALETTE.len()));
        assert_ne!(object_color(0), object_color(1));
    }

    #[test]
    fn test_label_colors_stable() {
        assert_eq!(label_color(3), label_color(3));
        assert_eq!(label_color(1), label_color(1 + LABEL_PALETTE.len() as u32));
    }

    #[test]
    fn test_trajectory_colors_keyed_by_vertex() {
        assert_eq!(trajectory_color(2), trajectory_color(2));
        assert_ne!(trajectory_color(0), trajectory_color(1));
    }
}
