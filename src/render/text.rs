//! Font discovery and Parley text layout for the CPU surface.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{TickdownError, TickdownResult};
use crate::state::model::FontChoice;

/// Extra font directories, searched before the platform defaults (`PATH`-style list).
pub const FONT_DIR_ENV: &str = "TICKDOWN_FONT_DIR";

/// Families tried, in order, when the chosen typeface is not installed.
const FALLBACK_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
    "Roboto",
];

/// File-name fragments that mark a face we never pick for display text.
const REJECTED_STYLES: [&str; 7] = [
    "italic",
    "oblique",
    "condensed",
    "mono",
    "light",
    "thin",
    "serif",
];

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl TextBrush {
    pub(crate) fn new(color: Rgba8, alpha: f64) -> Self {
        let a = (f64::from(color.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a,
        }
    }
}

/// One registered face: the Parley family name plus the bytes `vello_cpu` draws glyphs from.
#[derive(Clone)]
pub(crate) struct Face {
    pub(crate) family: String,
    pub(crate) font: vello_cpu::peniko::FontData,
}

/// Font files found on disk, matched to families by file name.
#[derive(Clone, Debug, Default)]
pub(crate) struct FontBook {
    files: Vec<PathBuf>,
}

impl FontBook {
    #[cfg(test)]
    pub(crate) fn from_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Scan `dirs` recursively for `.ttf`, `.otf` and `.ttc` files.
    pub(crate) fn scan(dirs: &[PathBuf]) -> Self {
        let mut files = Vec::new();
        for dir in dirs {
            collect_font_files(dir, &mut files, 0);
        }
        files.sort();
        Self { files }
    }

    /// Process-wide scan of [`FONT_DIR_ENV`] plus the platform font directories.
    pub(crate) fn system() -> &'static FontBook {
        static BOOK: OnceLock<FontBook> = OnceLock::new();
        BOOK.get_or_init(|| {
            let book = Self::scan(&default_font_dirs());
            tracing::debug!(files = book.files.len(), "font scan finished");
            book
        })
    }

    /// Heaviest upright face whose file name starts with `family`.
    pub(crate) fn best_match(&self, family: &str) -> Option<&Path> {
        let key = normalize(family);
        self.files
            .iter()
            .filter_map(|path| {
                let stem = normalize(&path.file_stem()?.to_string_lossy());
                let rest = stem.strip_prefix(key.as_str())?;
                if REJECTED_STYLES.iter().any(|s| rest.contains(s)) {
                    return None;
                }
                Some((weight_rank(rest), stem.len(), path.as_path()))
            })
            .min_by_key(|(rank, len, _)| (*rank, *len))
            .map(|(_, _, path)| path)
    }
}

fn weight_rank(rest: &str) -> u8 {
    if rest.contains("black") || rest.contains("heavy") {
        0
    } else if rest.contains("extrabold") {
        1
    } else if rest.contains("bold") && !rest.contains("semibold") {
        2
    } else if rest.is_empty() || rest.contains("regular") || rest.contains("book") {
        3
    } else {
        4
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(extra) = std::env::var_os(FONT_DIR_ENV) {
        dirs.extend(std::env::split_paths(&extra));
    }
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join(".fonts"));
    }
    dirs.extend(
        [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts",
            "C:\\Windows\\Fonts",
        ]
        .map(PathBuf::from),
    );
    dirs
}

fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>, depth: usize) {
    if depth > 8 {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, out, depth + 1);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
        {
            out.push(path);
        }
    }
}

/// Stateful helper that resolves typefaces and builds Parley layouts.
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    book: Option<FontBook>,
    preferred: Vec<Face>,
    faces: HashMap<FontChoice, Option<Face>>,
    fallback: Option<Option<Face>>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            book: None,
            preferred: Vec::new(),
            faces: HashMap::new(),
            fallback: None,
        }
    }

    /// Search these files instead of the system scan.
    pub(crate) fn with_book(mut self, book: FontBook) -> Self {
        self.book = Some(book);
        self
    }

    /// Register raw font bytes; the first registered face becomes the fallback.
    pub(crate) fn register(&mut self, bytes: Vec<u8>) -> TickdownResult<String> {
        let face = self.register_face(bytes)?;
        let family = face.family.clone();
        self.preferred.push(face);
        self.fallback = None;
        self.faces.clear();
        Ok(family)
    }

    fn register_face(&mut self, bytes: Vec<u8>) -> TickdownResult<Face> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| TickdownError::validation("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TickdownError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(Face { family, font })
    }

    fn load(&mut self, family: &str) -> Option<Face> {
        let path = match &self.book {
            Some(book) => book.best_match(family)?.to_path_buf(),
            None => FontBook::system().best_match(family)?.to_path_buf(),
        };
        let loaded = std::fs::read(&path)
            .map_err(|e| TickdownError::validation(format!("read font '{}': {e}", path.display())))
            .and_then(|bytes| self.register_face(bytes));
        match loaded {
            Ok(face) => {
                tracing::debug!(family, file = %path.display(), "font loaded");
                Some(face)
            }
            Err(e) => {
                tracing::warn!(error = %e, "font skipped");
                None
            }
        }
    }

    fn fallback_face(&mut self) -> Option<Face> {
        if let Some(face) = &self.fallback {
            return face.clone();
        }
        let mut face = self.preferred.first().cloned();
        for family in FALLBACK_FAMILIES {
            if face.is_some() {
                break;
            }
            face = self.load(family);
        }
        if face.is_none() {
            tracing::warn!("no usable font found; text is not drawn");
        }
        self.fallback = Some(face.clone());
        face
    }

    /// The face for `choice`, or the fallback face when it is not installed.
    pub(crate) fn face(&mut self, choice: FontChoice) -> Option<Face> {
        if let Some(face) = self.faces.get(&choice) {
            return face.clone();
        }
        let face = self
            .preferred
            .iter()
            .find(|f| f.family == choice.family_name())
            .cloned()
            .or_else(|| self.load(choice.family_name()))
            .or_else(|| self.fallback_face());
        self.faces.insert(choice, face.clone());
        face
    }

    /// Lay out one unwrapped line of text.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        face: &Face,
        size_px: f32,
        letter_spacing_em: f32,
        brush: TextBrush,
    ) -> parley::Layout<TextBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(900.0),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            letter_spacing_em * size_px,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
