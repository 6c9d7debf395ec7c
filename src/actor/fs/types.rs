use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }

    /// Map a notify event kind. Access events and metadata-only
    /// modifications (mtime/atime/chmod) are noise and map to `None`.
    fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Remove(_) => Some(Self::Removed),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(Self::Modified),
            _ => None,
        }
    }
}

/// One raw change, as delivered to the batch handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: ChangeKind,
    pub paths: Vec<PathBuf>,
}

impl WatchEvent {
    pub fn new(kind: ChangeKind, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            kind,
            paths: paths.into_iter().collect(),
        }
    }

    /// Convert a notify event, dropping noise and editor temp files.
    pub fn from_notify(event: &notify::Event) -> Option<Self> {
        let kind = ChangeKind::from_notify(&event.kind)?;
        let paths: Vec<_> = event
            .paths
            .iter()
            .filter(|p| !is_temp_file(p))
            .cloned()
            .collect();
        (!paths.is_empty()).then_some(Self { kind, paths })
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
}
