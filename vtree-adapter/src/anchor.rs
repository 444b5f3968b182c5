use vtree::{NodeId, TreeWindower, Viewport};

/// A scroll anchor that preserves the visual position of a node across tree edits.
///
/// Typical use cases:
/// - reordering or expanding rows above the viewport without the content jumping
/// - restoring a position after the tree was rebuilt around the same handles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowAnchor {
    pub node: NodeId,
    /// The distance from the node's row start to the viewport's scroll offset.
    pub offset_in_row: u64,
}

/// Captures an anchor for the row at the top of the viewport.
///
/// Returns `None` if the row height is zero or the offset is past the last row.
pub fn capture_first_visible_anchor<T, V: Viewport>(view: &TreeWindower<T, V>) -> Option<RowAnchor> {
    let row_height = view.row_height() as u64;
    if row_height == 0 {
        return None;
    }
    let offset = view.viewport().scroll_offset();
    let index = usize::try_from(offset / row_height).ok()?;
    if index >= view.row_count() {
        return None;
    }
    let node = view.tree().node_at_index(index + 1, true)?;
    Some(RowAnchor {
        node,
        offset_in_row: offset % row_height,
    })
}

/// Scrolls so that the anchored node sits where it was captured.
///
/// Returns `Ok(false)` when the node no longer occupies a row (removed, discarded or hidden
/// under a collapsed ancestor).
pub fn apply_anchor<T, V: Viewport>(
    view: &mut TreeWindower<T, V>,
    anchor: &RowAnchor,
) -> vtree::Result<bool> {
    let Some(position) = view.tree().index_of(anchor.node, true) else {
        return Ok(false);
    };
    let top = (position - 1) as u64 * view.row_height() as u64;
    view.scroll_to(top.saturating_add(anchor.offset_in_row))?;
    Ok(true)
}
