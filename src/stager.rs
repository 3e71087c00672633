//! Single-slot file staging.
//!
//! The stager never holds the staged file itself. It turns drag/drop and
//! picker events into `StagerIntent`s, and the owning page decides what to
//! keep. The only state it owns is the transient drag-hover flag.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub name: String,
    pub size: u64,
    pub source: FileSource,
}

impl StagedFile {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self {
            name,
            size: meta.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: &str, bytes: Arc<[u8]>) -> Self {
        Self {
            name: name.to_string(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn size_label(&self) -> String {
        format_size(self.size)
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("csv") => "text/csv",
            Some("pdf") => "application/pdf",
            Some("txt") => "text/plain",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/octet-stream",
        }
    }
}

/// Kibibytes with one decimal place: 2048 -> "2.0 KB".
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Extension filter in the `.csv` / `.txt,.pdf,.docx` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    raw: String,
    extensions: Vec<String>,
}

impl AcceptFilter {
    pub fn parse(raw: &str) -> Self {
        let extensions = raw
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            raw: raw.to_string(),
            extensions,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Extensions without the leading dot, as native dialogs want them.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn matches(&self, file: &StagedFile) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        file.extension()
            .map(|ext| self.extensions.iter().any(|e| *e == ext))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StagerEvent {
    DragOver,
    DragLeave,
    Drop(Vec<StagedFile>),
    Picked(Vec<StagedFile>),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StagerIntent {
    Select(StagedFile),
    Clear,
}

#[derive(Debug, Clone, Default)]
pub struct FileStager {
    drag_active: bool,
}

impl FileStager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// `staged` is the parent's current file. Drag hover only lights the
    /// drop target while nothing is staged.
    pub fn handle(&mut self, staged: Option<&StagedFile>, event: StagerEvent) -> Option<StagerIntent> {
        match event {
            StagerEvent::DragOver => {
                self.drag_active = staged.is_none();
                None
            }
            StagerEvent::DragLeave => {
                self.drag_active = false;
                None
            }
            StagerEvent::Drop(files) | StagerEvent::Picked(files) => {
                self.drag_active = false;
                files.into_iter().next().map(StagerIntent::Select)
            }
            StagerEvent::Clear => staged.map(|_| StagerIntent::Clear),
        }
    }
}

/// Applies an intent to the slot a page owns. A selection replaces whatever
/// was staged before.
pub fn apply_intent(slot: &mut Option<StagedFile>, intent: StagerIntent) {
    match intent {
        StagerIntent::Select(file) => *slot = Some(file),
        StagerIntent::Clear => *slot = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn mem_file(name: &str, len: usize) -> StagedFile {
        StagedFile::from_bytes(name, Arc::from(vec![0u8; len]))
    }

    #[test]
    fn size_is_shown_in_kib_with_one_decimal() {
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(0), "0.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(mem_file("a.csv", 2048).size_label(), "2.0 KB");
    }

    #[test]
    fn drop_forwards_first_file_unmodified() {
        let mut stager = FileStager::new();
        let f = mem_file("marks.csv", 10);
        let g = mem_file("other.csv", 20);
        let intent = stager.handle(None, StagerEvent::Drop(vec![f.clone(), g]));
        assert_eq!(intent, Some(StagerIntent::Select(f)));
    }

    #[test]
    fn empty_drop_is_a_no_op_and_resets_active_flag() {
        let mut stager = FileStager::new();
        stager.handle(None, StagerEvent::DragOver);
        assert!(stager.is_drag_active());
        let intent = stager.handle(None, StagerEvent::Drop(Vec::new()));
        assert_eq!(intent, None);
        assert!(!stager.is_drag_active());
    }

    #[test]
    fn drag_leave_clears_active_flag() {
        let mut stager = FileStager::new();
        stager.handle(None, StagerEvent::DragOver);
        stager.handle(None, StagerEvent::DragLeave);
        assert!(!stager.is_drag_active());
    }

    #[test]
    fn drag_over_does_not_light_up_when_staged() {
        let mut stager = FileStager::new();
        let f = mem_file("marks.csv", 10);
        stager.handle(Some(&f), StagerEvent::DragOver);
        assert!(!stager.is_drag_active());
    }

    #[test]
    fn cancelled_picker_does_nothing() {
        let mut stager = FileStager::new();
        assert_eq!(stager.handle(None, StagerEvent::Picked(Vec::new())), None);
    }

    #[test]
    fn clear_returns_parent_to_empty() {
        let mut stager = FileStager::new();
        let mut slot = None;
        let f = mem_file("syllabus.pdf", 4096);
        if let Some(intent) = stager.handle(slot.as_ref(), StagerEvent::Picked(vec![f.clone()])) {
            apply_intent(&mut slot, intent);
        }
        assert_eq!(slot, Some(f));
        if let Some(intent) = stager.handle(slot.as_ref(), StagerEvent::Clear) {
            apply_intent(&mut slot, intent);
        }
        assert_eq!(slot, None);
        assert_eq!(stager.handle(slot.as_ref(), StagerEvent::Clear), None);
    }

    #[test]
    fn new_selection_replaces_the_slot() {
        let mut slot = Some(mem_file("old.csv", 1));
        let fresh = mem_file("new.csv", 2);
        apply_intent(&mut slot, StagerIntent::Select(fresh.clone()));
        assert_eq!(slot, Some(fresh));
    }

    #[test]
    fn accept_filter_parses_extension_lists() {
        let filter = AcceptFilter::parse(".txt, .PDF,.docx");
        assert_eq!(filter.extensions(), &["txt", "pdf", "docx"]);
        assert!(filter.matches(&mem_file("notes.Pdf", 1)));
        assert!(!filter.matches(&mem_file("marks.csv", 1)));
        assert!(!filter.matches(&mem_file("README", 1)));
        assert!(AcceptFilter::parse("").matches(&mem_file("anything.bin", 1)));
    }

    #[test]
    fn staged_file_from_path_reads_size_and_name() {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        tmp.write_all(&[b'x'; 3000]).unwrap();
        let staged = StagedFile::from_path(tmp.path()).unwrap();
        assert_eq!(staged.size, 3000);
        assert!(staged.name.ends_with(".csv"));
        assert_eq!(staged.mime(), "text/csv");
        assert_eq!(staged.size_label(), "2.9 KB");
    }
}
