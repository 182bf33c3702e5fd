//! Terminal reader page.
//!
//! The reader shows either a chapter or the chapter index and is the host
//! the engine runs against: it resolves locators to its page controls,
//! performs clicks and scrolls, toggles fullscreen and queues frames.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use unicode_width::UnicodeWidthChar;

use glidenav_core::{
    ElementId, ElementResolver, FrameScheduler, FullscreenController, LoopHandle, PageActions,
    ScrollTarget,
};

/// "Previous chapter" button
pub const PREV_BUTTON: ElementId = ElementId(1);
/// "Next chapter" button
pub const NEXT_BUTTON: ElementId = ElementId(2);
/// Link back to the chapter index
pub const INDEX_LINK: ElementId = ElementId(3);
/// Chapter body
pub const ARTICLE: ElementId = ElementId(4);

const LOCATORS: [(&str, ElementId); 4] = [
    ("button.prev", PREV_BUTTON),
    ("button.next", NEXT_BUTTON),
    ("a.index", INDEX_LINK),
    ("article", ARTICLE),
];

/// What the reader currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Index,
    Chapter(usize),
}

/// Chapter reader state
#[derive(Debug)]
pub struct Reader {
    chapters: Vec<PathBuf>,
    page: PageKind,
    /// Source lines of the current page
    lines: Vec<String>,
    /// Lines wrapped to the viewport width
    rows: Vec<String>,
    /// First wrapped row of each source line
    line_starts: Vec<usize>,
    /// Scroll offset in pixels
    offset: f64,
    line_height: f64,
    width: usize,
    viewport_rows: usize,
    fullscreen: bool,
    pending_frame: Option<LoopHandle>,
    frame_counter: u64,
}

impl Reader {
    /// Open a chapter file, or the index of a chapter directory.
    pub fn open(path: &Path, line_height: f64) -> Result<Self> {
        let (dir, selected) = if path.is_dir() {
            (path.to_path_buf(), None)
        } else if !path.is_file() {
            bail!("{} is neither a chapter file nor a directory", path.display());
        } else {
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            (dir, Some(path))
        };

        let chapters = list_chapters(&dir)?;
        if chapters.is_empty() {
            bail!("No chapters found in {}", dir.display());
        }

        let mut reader = Self {
            chapters,
            page: PageKind::Index,
            lines: Vec::new(),
            rows: Vec::new(),
            line_starts: Vec::new(),
            offset: 0.0,
            line_height,
            width: 80,
            viewport_rows: 24,
            fullscreen: false,
            pending_frame: None,
            frame_counter: 0,
        };

        let index = selected.and_then(|file| {
            let name = file.file_name()?;
            reader
                .chapters
                .iter()
                .position(|chapter| chapter.file_name() == Some(name))
        });
        match index {
            Some(index) => reader.show_chapter(index)?,
            None => reader.show_index(),
        }

        Ok(reader)
    }

    pub fn page(&self) -> PageKind {
        self.page
    }

    /// Page title for the header.
    pub fn title(&self) -> String {
        match self.page {
            PageKind::Index => format!("Chapters ({})", self.chapters.len()),
            PageKind::Chapter(index) => format!(
                "{} [{}/{}]",
                chapter_name(&self.chapters[index]),
                index + 1,
                self.chapters.len()
            ),
        }
    }

    /// Load chapter `index` and scroll to its top.
    pub fn show_chapter(&mut self, index: usize) -> Result<()> {
        let path = self
            .chapters
            .get(index)
            .with_context(|| format!("Chapter {} out of range", index + 1))?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chapter {}", path.display()))?;

        glidenav_logger::info(format!("Opened {}", path.display()));
        self.page = PageKind::Chapter(index);
        self.set_lines(content.lines().map(str::to_string).collect());
        Ok(())
    }

    /// Show the chapter list.
    pub fn show_index(&mut self) {
        let current = match self.page {
            PageKind::Chapter(index) => Some(index),
            PageKind::Index => None,
        };
        let lines = self
            .chapters
            .iter()
            .enumerate()
            .map(|(i, path)| format!("{:>4}. {}", i + 1, chapter_name(path)))
            .collect();

        self.page = PageKind::Index;
        self.set_lines(lines);
        if let Some(index) = current {
            self.scroll_to_line(index + 1);
        }
    }

    /// Open the chapter on the top visible row of the index.
    pub fn open_top_entry(&mut self) -> Result<()> {
        if self.page != PageKind::Index {
            return Ok(());
        }
        let row = self.top_row();
        let index = self
            .line_starts
            .iter()
            .rposition(|start| *start <= row)
            .unwrap_or(0);
        self.show_chapter(index)
    }

    /// Update the viewport size; rewraps when the width changed.
    pub fn set_viewport(&mut self, width: usize, rows: usize) {
        let width = width.max(1);
        if width != self.width {
            self.width = width;
            self.rewrap();
        }
        self.viewport_rows = rows;
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    /// Rows to draw for the current offset.
    pub fn visible_rows(&self) -> &[String] {
        let start = self.top_row().min(self.rows.len());
        let end = (start + self.viewport_rows).min(self.rows.len());
        &self.rows[start..end]
    }

    pub fn top_row(&self) -> usize {
        (self.offset / self.line_height).floor() as usize
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn max_offset(&self) -> f64 {
        self.rows.len().saturating_sub(self.viewport_rows) as f64 * self.line_height
    }

    /// Jump so that source line `line` (1-based) is at the top.
    pub fn scroll_to_line(&mut self, line: usize) {
        let row = self
            .line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(self.rows.len());
        self.offset = (row as f64 * self.line_height).clamp(0.0, self.max_offset());
    }

    /// Scroll by whole rows (keyboard fallback when no engine runs).
    pub fn scroll_rows(&mut self, rows: isize) {
        self.scroll_px(rows as f64 * self.line_height);
    }

    pub fn page_rows(&self) -> isize {
        self.viewport_rows.saturating_sub(1).max(1) as isize
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Hand the pending frame to the caller for delivery.
    pub fn take_due_frame(&mut self) -> Option<LoopHandle> {
        self.pending_frame.take()
    }

    fn scroll_px(&mut self, delta: f64) {
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
    }

    fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.offset = 0.0;
        self.rewrap();
    }

    fn rewrap(&mut self) {
        self.rows.clear();
        self.line_starts.clear();
        for line in &self.lines {
            self.line_starts.push(self.rows.len());
            self.rows.extend(wrap_line(line, self.width));
        }
    }

    fn has_element(&self, element: ElementId) -> bool {
        match (element, self.page) {
            (PREV_BUTTON, PageKind::Chapter(index)) => index > 0,
            (NEXT_BUTTON, PageKind::Chapter(index)) => index + 1 < self.chapters.len(),
            (INDEX_LINK, PageKind::Chapter(_)) => true,
            (ARTICLE, PageKind::Chapter(_)) => true,
            _ => false,
        }
    }
}

impl ElementResolver for Reader {
    fn resolve_element(&self, locator: &str) -> Option<ElementId> {
        LOCATORS
            .iter()
            .find(|(name, _)| *name == locator.trim())
            .map(|(_, element)| *element)
            .filter(|element| self.has_element(*element))
    }
}

impl PageActions for Reader {
    fn click(&mut self, element: ElementId) {
        let result = match (element, self.page) {
            (PREV_BUTTON, PageKind::Chapter(index)) if index > 0 => self.show_chapter(index - 1),
            (NEXT_BUTTON, PageKind::Chapter(index)) => self.show_chapter(index + 1),
            (INDEX_LINK, _) => {
                self.show_index();
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            glidenav_logger::error(format!("{:#}", err));
        }
    }

    fn scroll_by(&mut self, target: ScrollTarget, delta_y: f64) {
        // The article is the only scrollable element and shares the
        // viewport offset.
        match target {
            ScrollTarget::Viewport | ScrollTarget::Element(_) => self.scroll_px(delta_y),
        }
    }
}

impl FullscreenController for Reader {
    fn enter_fullscreen(&mut self) {
        self.fullscreen = true;
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }
}

impl FrameScheduler for Reader {
    fn request_frame(&mut self) -> LoopHandle {
        self.frame_counter += 1;
        let handle = LoopHandle(self.frame_counter);
        self.pending_frame = Some(handle);
        handle
    }
}

/// Regular, non-hidden files of `dir` in natural order.
pub fn list_chapters(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut chapters = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if path.is_file() && !hidden {
            chapters.push(path);
        }
    }

    chapters.sort_by(|a, b| natural_cmp(&chapter_name(a), &chapter_name(b)));
    Ok(chapters)
}

fn chapter_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compare names so that `ch2` sorts before `ch10`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_number(&mut a);
                let right = take_number(&mut b);
                let ordering = left
                    .trim_start_matches('0')
                    .len()
                    .cmp(&right.trim_start_matches('0').len())
                    .then_with(|| left.trim_start_matches('0').cmp(right.trim_start_matches('0')));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(ch) = chars.next_if(|ch| ch.is_ascii_digit()) {
        digits.push(ch);
    }
    digits
}

/// Wrap a line at word boundaries to `width` columns.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let word_width: usize = word.chars().map(|ch| ch.width().unwrap_or(0)).sum();

        if current_width + word_width > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width > width {
            // Hard-break words longer than a row
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        } else {
            current.push_str(word);
            current_width += word_width;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}
