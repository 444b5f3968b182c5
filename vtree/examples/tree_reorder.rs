// Example: a small outline, expanded and reordered by drag and drop.
use vtree::{
    Affordance, ReorderController, RowSlot, SlotKind, TreeOptions, TreeWindower, Viewport,
};

#[derive(Default)]
struct Outline {
    offset: u64,
    lines: Vec<String>,
}

impl Viewport for Outline {
    type Row = String;

    fn extent(&self) -> u32 {
        300
    }

    fn scroll_offset(&self) -> u64 {
        self.offset
    }

    fn scroll_to(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn set_content_extent(&mut self, _extent: u64) {}

    fn create_row(&mut self, slot: RowSlot) -> String {
        match slot.kind {
            SlotKind::Row => " ".repeat((slot.indent / 25) as usize),
            SlotKind::FreeZone => String::from("~~"),
        }
    }

    fn attach_affordance(&mut self, row: &mut String, _affordance: Affordance, glyph: &str) {
        row.push_str(glyph);
        row.push(' ');
    }

    fn present(&mut self, rows: Vec<String>) {
        self.lines = rows;
    }

    fn discard_stale(&mut self) {}
}

fn print(view: &TreeWindower<&str, Outline>, title: &str) {
    println!("-- {title} ({} rows)", view.row_count());
    for line in &view.viewport().lines {
        println!("{line}");
    }
}

fn main() -> vtree::Result<()> {
    let mut view = TreeWindower::<&str, _>::new(Outline::default(), TreeOptions::new());
    view.set_renderer(|row, out| {
        out.push_str(row.payload);
        Ok(())
    })?;

    let root = view.tree().root();
    let (a, b, c, d) = view.batch_update(|v| -> vtree::Result<_> {
        let a = v.create("A");
        let b = v.create("B");
        let c = v.create("C");
        let d = v.create("D");
        v.append_child(root, a)?;
        v.append_child(root, b)?;
        v.append_child(b, c)?;
        v.append_child(b, d)?;
        Ok((a, b, c, d))
    })??;
    print(&view, "initial");

    view.set_expanded(b, true)?;
    print(&view, "B expanded");

    let mut reorder = ReorderController::<&str>::from_options(&TreeOptions::new())
        .with_drop_notifier(|_, p: vtree::Placement| {
            println!("moving {:?} under {:?} before {:?}", p.node, p.parent, p.reference);
        });
    reorder.drag_start(c);
    let placement = reorder.drop(&mut view, a, 29)?;
    println!("dropped: {placement:?}");
    print(&view, "C after A");

    reorder.drag_start(d);
    reorder.drop(&mut view, root, 0)?;
    print(&view, "D appended to root");
    Ok(())
}
