//! Pass 1: Single-Cell Table Flattening

use crate::dom::{ArenaDom, NodeId};

/// Replace every table whose body is exactly one row with exactly one cell
/// by the cell's content, at the table's position among its siblings.
///
/// Google Docs wraps "callout"-style content in single-cell tables; the
/// table adds nothing once the content is Markdown. Row and cell counting
/// looks through the `tbody` the HTML parser inserts. Tables with more
/// structure are left alone.
pub fn flatten_single_cell_tables(dom: &mut ArenaDom) {
    for table in dom.elements_by_tag(dom.document(), "table") {
        if !dom.is_attached(table) {
            continue;
        }
        let rows = dom.elements_by_tag(table, "tr");
        let [row] = rows[..] else { continue };
        let cells = dom.elements_by_tag(row, "td");
        let [cell] = cells[..] else { continue };

        let content: Vec<NodeId> = dom.children(cell).collect();
        for child in content {
            dom.insert_before(table, child);
        }
        dom.detach(table);
    }
}
