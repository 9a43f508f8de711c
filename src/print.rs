use std::io::Write;

use crate::controller::{Advance, PageController};
use crate::error::Result;
use crate::render::render;

/// Page through the index, writing each posting as it resolves.
///
/// Stops when the index is exhausted or after `max_pages` pages. Returns the
/// number of postings written.
pub async fn run(
    controller: &PageController,
    max_pages: Option<usize>,
    out: &mut impl Write,
) -> Result<usize> {
    let mut written = 0;
    let mut pages = 0;

    while max_pages.map_or(true, |max| pages < max) {
        match controller.advance().await? {
            Advance::Loaded { .. } => {
                pages += 1;
                let snapshot = controller.snapshot();
                for item in &snapshot.items[written..] {
                    let record = render(item);
                    writeln!(out, "{}", record.title)?;
                    if let Some(link) = &record.link {
                        writeln!(out, "  {}", link)?;
                    }
                    writeln!(out, "  {}", record.metadata())?;
                    writeln!(out)?;
                }
                written = snapshot.items.len();
                out.flush()?;
            }
            Advance::Exhausted | Advance::Busy => break,
        }
    }

    Ok(written)
}
