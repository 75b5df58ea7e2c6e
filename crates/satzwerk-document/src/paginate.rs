// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paginator — assigns wrapped lines to fixed-size pages.
//
// A cursor walks down from the top margin. Before each line it checks whether
// the line's advance still fits above the bottom margin; if not, the current
// page is sealed and a fresh one opened. Body lines advance by the line height,
// paragraph gaps by half of it, and title lines by the title line height. The
// sum of advances on a page therefore never exceeds the usable height.

use std::sync::Arc;

use satzwerk_core::error::Result;
use satzwerk_core::{LayoutLine, LineRole, Page, PageGeometry, PlacedLine};
use tracing::{debug, instrument};

use crate::cancel::CancelFlag;
use crate::metrics::MetricsProvider;
use crate::wrap;

/// A run of lines that must start on a fresh page.
#[derive(Debug, Clone, Default)]
pub struct Section {
    /// Drawn at title size above the section's lines.
    pub heading: Option<String>,
    pub lines: Vec<LayoutLine>,
}

/// Whether the next line fits on the page being filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    WithinPage,
    PageFull,
}

/// Lays out lines onto pages of a fixed geometry.
pub struct Paginator {
    geometry: PageGeometry,
    metrics: Arc<dyn MetricsProvider>,
    cancel: CancelFlag,
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl Paginator {
    /// Fails with `InvalidGeometry` if no line could ever fit on a page.
    pub fn new(geometry: PageGeometry, metrics: Arc<dyn MetricsProvider>) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            metrics,
            cancel: CancelFlag::new(),
        })
    }

    /// Poll `cancel` each time a page is opened.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Paginate a flow of lines, with an optional title on the first page.
    ///
    /// Always returns at least one page, even for empty input.
    #[instrument(skip_all, fields(lines = lines.len(), titled = title.is_some()))]
    pub fn paginate(&self, title: Option<&str>, lines: &[LayoutLine]) -> Result<Vec<Page>> {
        let mut cursor = PageCursor::new(&self.geometry, &self.cancel)?;
        self.place_title(&mut cursor, title)?;
        for line in lines {
            cursor.place(line.clone(), body_role(line), self.advance_for(line))?;
        }
        let pages = cursor.finish();
        debug!(pages = pages.len(), "Pagination complete");
        Ok(pages)
    }

    /// Paginate sections, starting each one on a new page.
    #[instrument(skip_all, fields(sections = sections.len()))]
    pub fn paginate_sections(&self, sections: &[Section]) -> Result<Vec<Page>> {
        let mut cursor = PageCursor::new(&self.geometry, &self.cancel)?;
        for (position, section) in sections.iter().enumerate() {
            if position > 0 {
                cursor.start_section()?;
            }
            self.place_title(&mut cursor, section.heading.as_deref())?;
            for line in &section.lines {
                cursor.place(line.clone(), body_role(line), self.advance_for(line))?;
            }
        }
        let pages = cursor.finish();
        debug!(pages = pages.len(), "Section pagination complete");
        Ok(pages)
    }

    fn place_title(&self, cursor: &mut PageCursor<'_>, title: Option<&str>) -> Result<()> {
        let Some(title) = title.filter(|t| !t.trim().is_empty()) else {
            return Ok(());
        };
        let title_lines = wrap::wrap(
            title,
            self.geometry.content_width(),
            self.metrics.as_ref(),
            self.geometry.title_font_size,
        );
        for line in title_lines.into_iter().filter(|l| !l.is_blank()) {
            cursor.place(line, LineRole::Title, self.geometry.title_line_height)?;
        }
        Ok(())
    }

    fn advance_for(&self, line: &LayoutLine) -> f32 {
        if line.is_blank() {
            self.geometry.line_height / 2.0
        } else {
            self.geometry.line_height
        }
    }
}

fn body_role(line: &LayoutLine) -> LineRole {
    if line.is_blank() {
        LineRole::Gap
    } else {
        LineRole::Body
    }
}

/// Mutable page being filled plus the sealed pages behind it.
struct PageCursor<'a> {
    geometry: &'a PageGeometry,
    cancel: &'a CancelFlag,
    sealed: Vec<Page>,
    current: Vec<PlacedLine>,
    current_y: f32,
    /// The open page was started explicitly and is kept even if left empty.
    forced: bool,
}

impl<'a> PageCursor<'a> {
    fn new(geometry: &'a PageGeometry, cancel: &'a CancelFlag) -> Result<Self> {
        cancel.check()?;
        Ok(Self {
            geometry,
            cancel,
            sealed: Vec::new(),
            current: Vec::new(),
            current_y: geometry.height - geometry.margin_top,
            forced: false,
        })
    }

    fn state_for(&self, advance: f32) -> PageState {
        if self.current_y - advance < self.geometry.margin_bottom {
            PageState::PageFull
        } else {
            PageState::WithinPage
        }
    }

    fn place(&mut self, line: LayoutLine, role: LineRole, advance: f32) -> Result<()> {
        if self.state_for(advance) == PageState::PageFull {
            self.break_page()?;
        }
        // A gap at the top of a page would only push the text down.
        if role == LineRole::Gap && self.current.is_empty() && !self.sealed.is_empty() {
            return Ok(());
        }
        self.current.push(PlacedLine {
            line,
            x: self.geometry.margin_left,
            y: self.current_y,
            advance,
            role,
        });
        self.current_y -= advance;
        Ok(())
    }

    /// Seal the current page and open a new one.
    fn break_page(&mut self) -> Result<()> {
        self.cancel.check()?;
        let index = self.sealed.len();
        self.sealed.push(Page {
            index,
            lines: std::mem::take(&mut self.current),
        });
        self.current_y = self.geometry.height - self.geometry.margin_top;
        self.forced = false;
        Ok(())
    }

    fn start_section(&mut self) -> Result<()> {
        self.break_page()?;
        self.forced = true;
        Ok(())
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.sealed.is_empty() || self.forced {
            let index = self.sealed.len();
            self.sealed.push(Page {
                index,
                lines: self.current,
            });
        }
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedAdvanceMetrics;
    use satzwerk_core::error::ConvertError;

    /// 100pt tall page with 10pt margins: 80pt usable, 8 body lines of 10pt.
    fn small_geometry() -> PageGeometry {
        PageGeometry {
            width: 100.0,
            height: 100.0,
            margin_top: 10.0,
            margin_bottom: 10.0,
            margin_left: 10.0,
            margin_right: 10.0,
            font_size: 8.0,
            line_height: 10.0,
            title_font_size: 12.0,
            title_line_height: 20.0,
        }
    }

    fn paginator() -> Paginator {
        Paginator::new(small_geometry(), Arc::new(FixedAdvanceMetrics { advance: 1.0 })).unwrap()
    }

    fn body(count: usize) -> Vec<LayoutLine> {
        (0..count)
            .map(|i| LayoutLine::new(format!("line {i}"), 6.0))
            .collect()
    }

    #[test]
    fn lines_fill_pages_in_order() {
        let pages = paginator().paginate(None, &body(20)).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines.len(), 8);
        assert_eq!(pages[1].lines.len(), 8);
        assert_eq!(pages[2].lines.len(), 4);
        assert_eq!(pages[1].lines[0].line.text, "line 8");
        assert_eq!(pages.iter().map(|p| p.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn first_line_sits_at_top_margin_and_steps_down() {
        let pages = paginator().paginate(None, &body(2)).unwrap();
        assert_eq!(pages[0].lines[0].y, 90.0);
        assert_eq!(pages[0].lines[1].y, 80.0);
        assert_eq!(pages[0].lines[0].x, 10.0);
    }

    #[test]
    fn budget_is_never_exceeded() {
        let mut lines = Vec::new();
        for i in 0..57 {
            lines.push(LayoutLine::new(format!("l{i}"), 2.0));
            if i % 3 == 0 {
                lines.push(LayoutLine::blank());
            }
        }
        let pages = paginator().paginate(Some("A heading that wraps"), &lines).unwrap();
        let usable = small_geometry().usable_height();
        for page in &pages {
            assert!(page.consumed_height() <= usable + 1e-3, "page {} overflows", page.index);
        }
    }

    #[test]
    fn blank_lines_take_half_height() {
        let lines = vec![
            LayoutLine::new("a", 1.0),
            LayoutLine::blank(),
            LayoutLine::new("b", 1.0),
        ];
        let pages = paginator().paginate(None, &lines).unwrap();
        let placed = &pages[0].lines;
        assert_eq!(placed[1].role, LineRole::Gap);
        assert_eq!(placed[1].advance, 5.0);
        assert_eq!(placed[2].y, 75.0);
    }

    #[test]
    fn title_uses_larger_line_height_on_first_page_only() {
        let pages = paginator().paginate(Some("Title"), &body(10)).unwrap();
        assert_eq!(pages[0].lines[0].role, LineRole::Title);
        assert_eq!(pages[0].lines[0].advance, 20.0);
        // 80pt usable: 20pt title + 6 body lines.
        assert_eq!(pages[0].lines.len(), 7);
        assert!(pages[1].lines.iter().all(|l| l.role == LineRole::Body));
    }

    #[test]
    fn empty_input_yields_one_empty_page() {
        let pages = paginator().paginate(None, &[]).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn gap_is_not_carried_to_top_of_next_page() {
        let mut lines = body(8);
        lines.push(LayoutLine::blank());
        lines.push(LayoutLine::new("after", 5.0));
        let pages = paginator().paginate(None, &lines).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].lines[0].line.text, "after");
    }

    #[test]
    fn sections_start_new_pages() {
        let sections = vec![
            Section {
                heading: Some("Slide 1".into()),
                lines: body(2),
            },
            Section {
                heading: Some("Slide 2".into()),
                lines: body(1),
            },
            Section {
                heading: None,
                lines: Vec::new(),
            },
        ];
        let pages = paginator().paginate_sections(&sections).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].lines[0].line.text, "Slide 2");
        assert!(pages[2].is_empty());
    }

    #[test]
    fn identical_input_gives_identical_pages() {
        let lines = body(30);
        let first = paginator().paginate(Some("Same"), &lines).unwrap();
        let second = paginator().paginate(Some("Same"), &lines).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cancellation_stops_at_page_boundary() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = paginator().with_cancel(cancel).paginate(None, &body(3));
        assert!(matches!(result, Err(ConvertError::Cancelled)));
    }

    #[test]
    fn geometry_without_room_is_rejected() {
        let mut geometry = small_geometry();
        geometry.margin_top = 45.0;
        geometry.margin_bottom = 45.0;
        let result = Paginator::new(geometry, Arc::new(FixedAdvanceMetrics { advance: 1.0 }));
        assert!(matches!(result, Err(ConvertError::InvalidGeometry(_))));
    }
}
