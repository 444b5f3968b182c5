// Example: a flat million-row list rendered into a text surface.
use vtree::{RowSlot, Viewport, Windower, WindowerOptions};

#[derive(Default)]
struct TextSurface {
    offset: u64,
    content: u64,
    lines: Vec<String>,
    stale: usize,
}

impl Viewport for TextSurface {
    type Row = String;

    fn extent(&self) -> u32 {
        240
    }

    fn scroll_offset(&self) -> u64 {
        self.offset
    }

    fn scroll_to(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn set_content_extent(&mut self, extent: u64) {
        self.content = extent;
    }

    fn create_row(&mut self, slot: RowSlot) -> String {
        format!("{:>8} ", slot.top)
    }

    fn present(&mut self, rows: Vec<String>) {
        self.stale += self.lines.len();
        self.lines = rows;
    }

    fn discard_stale(&mut self) {
        self.stale = 0;
    }
}

fn main() -> vtree::Result<()> {
    let mut w = Windower::flat(TextSurface::default(), 1_000_000, WindowerOptions::new());
    w.set_renderer(|index, row| {
        row.push_str(&format!("item #{index}"));
        Ok(())
    })?;
    w.refresh()?;
    println!("content extent={}", w.viewport().content);
    println!("state={:?}", w.state());

    let mut now_ms = 0;
    for offset in [100u64, 250, 400, 12_345] {
        now_ms += 16;
        w.viewport_mut().scroll_to(offset);
        w.on_scroll(now_ms)?;
        println!(
            "offset={offset} window={:?} rendered_at={:?}",
            w.window(),
            w.last_rendered_offset()
        );
    }

    println!("stale rows before cleanup={}", w.viewport().stale);
    w.tick(now_ms + 400);
    println!("stale rows after cleanup={}", w.viewport().stale);
    println!("first line: {:?}", w.viewport().lines.first());
    Ok(())
}
