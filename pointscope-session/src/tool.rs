//! Interactive tool modes
//!
//! The closed tool-state set as a tagged variant. Switching modes replaces
//! the whole value, so no stale per-tool state survives a transition, and
//! capability accessors return `Option` instead of requiring downcasts.

/// Tag for the closed set of tool modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Empty,
    Select,
    ShowNormal,
}

/// The active interactive mode
#[derive(Debug, Clone)]
pub enum Tool {
    /// No tool interception; input falls through to camera navigation
    Empty,
    /// Vertex selection on one bound sample
    Select(SelectTool),
    /// Read-only normal overlay for one bound sample
    ShowNormal { sample_idx: usize },
}

impl Tool {
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Empty => ToolKind::Empty,
            Tool::Select(_) => ToolKind::Select,
            Tool::ShowNormal { .. } => ToolKind::ShowNormal,
        }
    }

    /// Sample index the tool operates on, if any
    pub fn sample_idx(&self) -> Option<usize> {
        match self {
            Tool::Empty => None,
            Tool::Select(select) => Some(select.sample_idx()),
            Tool::ShowNormal { sample_idx } => Some(*sample_idx),
        }
    }

    pub fn as_select(&self) -> Option<&SelectTool> {
        match self {
            Tool::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn as_select_mut(&mut self) -> Option<&mut SelectTool> {
        match self {
            Tool::Select(select) => Some(select),
            _ => None,
        }
    }
}

/// Vertex selection state for one sample
///
/// Picks accumulate uniquely across press/move/release sequences; release
/// finalizes the set for downstream consumers (deletion, trajectory
/// tracing). The set survives until it is consumed or cleared.
#[derive(Debug, Clone)]
pub struct SelectTool {
    sample_idx: usize,
    dragging: bool,
    picked: Vec<usize>,
}

impl SelectTool {
    pub fn new(sample_idx: usize) -> Self {
        Self {
            sample_idx,
            dragging: false,
            picked: Vec::new(),
        }
    }

    pub fn sample_idx(&self) -> usize {
        self.sample_idx
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Finalized and in-progress picks, in first-picked order
    pub fn picked(&self) -> &[usize] {
        &self.picked
    }

    pub fn begin_drag(&mut self, pick: Option<usize>) {
        self.dragging = true;
        self.push_pick(pick);
    }

    pub fn extend_drag(&mut self, pick: Option<usize>) {
        if self.dragging {
            self.push_pick(pick);
        }
    }

    pub fn end_drag(&mut self, pick: Option<usize>) {
        if self.dragging {
            self.push_pick(pick);
            self.dragging = false;
        }
    }

    /// Drop all accumulated picks, e.g. after the vertices were deleted
    pub fn clear_picks(&mut self) {
        self.picked.clear();
        self.dragging = false;
    }

    fn push_pick(&mut self, pick: Option<usize>) {
        if let Some(idx) = pick {
            if !self.picked.contains(&idx) {
                self.picked.push(idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_accumulate_uniquely() {
        let mut tool = SelectTool::new(0);
        tool.begin_drag(Some(3));
        tool.extend_drag(Some(5));
        tool.extend_drag(Some(3));
        tool.end_drag(Some(7));

        assert_eq!(tool.picked(), &[3, 5, 7]);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut tool = SelectTool::new(0);
        tool.extend_drag(Some(1));
        assert!(tool.picked().is_empty());
    }

    #[test]
    fn test_picks_survive_multiple_drags() {
        let mut tool = SelectTool::new(0);
        tool.begin_drag(Some(1));
        tool.end_drag(None);
        tool.begin_drag(Some(2));
        tool.end_drag(Some(2));
        assert_eq!(tool.picked(), &[1, 2]);
    }

    #[test]
    fn test_tool_accessors() {
        let tool = Tool::Select(SelectTool::new(4));
        assert_eq!(tool.kind(), ToolKind::Select);
        assert_eq!(tool.sample_idx(), Some(4));
        assert!(tool.as_select().is_some());

        let tool = Tool::Empty;
        assert_eq!(tool.sample_idx(), None);
        assert!(tool.as_select().is_none());
    }
}
