//! Font discovery and family resolution.
//!
//! [`FontLibrary`] owns a `fontdb` database that the caller populates up front (system fonts,
//! a custom fonts folder, raw bytes). Rendering only queries it; resolution never fails while
//! at least one face is loaded.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{PosterError, PosterResult};

/// Requested family → metric-compatible candidates tried in order.
const FAMILY_ALIASES: &[(&str, &[&str])] = &[
    (
        "arial",
        &["Arial", "Liberation Sans", "Arimo", "Helvetica", "DejaVu Sans"],
    ),
    (
        "helvetica",
        &["Helvetica", "Helvetica Neue", "Liberation Sans", "Arimo", "Arial"],
    ),
    (
        "times new roman",
        &["Times New Roman", "Liberation Serif", "Tinos", "Times", "DejaVu Serif"],
    ),
    (
        "georgia",
        &["Georgia", "Gelasio", "Liberation Serif", "DejaVu Serif"],
    ),
    ("verdana", &["Verdana", "DejaVu Sans", "Bitstream Vera Sans"]),
    (
        "courier new",
        &["Courier New", "Liberation Mono", "Cousine", "Courier", "DejaVu Sans Mono"],
    ),
    ("impact", &["Impact", "Anton", "Oswald", "League Gothic"]),
];

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// A resolved face: raw file bytes plus the face index inside them.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    pub family: String,
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

/// Shared, read-only font database with a custom-font index.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    db: Arc<fontdb::Database>,
    custom: Arc<HashMap<String, fontdb::ID>>,
}

impl FontLibrary {
    /// Library with no faces; text rendering will be skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Library seeded with the host's installed fonts.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            db: Arc::new(db),
            custom: Arc::default(),
        }
    }

    /// Shared handle to the underlying database, e.g. for SVG text.
    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Load every `.ttf`/`.otf`/`.ttc` in `dir`. Each face is indexed by file stem and by its
    /// family names so it wins over system faces of the same name.
    pub fn with_custom_dir(mut self, dir: impl AsRef<Path>) -> PosterResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            PosterError::validation(format!("failed to read fonts dir '{}': {e}", dir.display()))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| PosterError::validation(format!("fonts dir entry: {e}")))?
                .path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if is_font {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let bytes = std::fs::read(&path).map_err(|e| {
                PosterError::validation(format!("failed to read font '{}': {e}", path.display()))
            })?;
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_owned);
            let loaded = self.register(bytes, stem.as_deref());
            tracing::debug!(path = %path.display(), faces = loaded, "loaded custom font");
        }
        Ok(self)
    }

    /// Load a font from memory as a custom font.
    pub fn with_font_data(mut self, bytes: Vec<u8>) -> Self {
        self.register(bytes, None);
        self
    }

    fn register(&mut self, bytes: Vec<u8>, stem: Option<&str>) -> usize {
        let db = Arc::make_mut(&mut self.db);
        let ids = db.load_font_source(fontdb::Source::Binary(Arc::new(bytes)));
        let custom = Arc::make_mut(&mut self.custom);

        for (i, id) in ids.iter().enumerate() {
            if i == 0 {
                if let Some(stem) = stem {
                    custom.entry(stem.to_lowercase()).or_insert(*id);
                }
            }
            if let Some(face) = db.face(*id) {
                for (name, _) in &face.families {
                    custom.entry(name.to_lowercase()).or_insert(*id);
                }
            }
        }
        ids.len()
    }

    /// Resolve `family` at `weight`, falling back through aliases, the requested name, generic
    /// sans-serif and finally any loaded face. `None` only when the library is empty.
    pub fn resolve(&self, family: &str, weight: u16) -> Option<ResolvedFont> {
        let key = family.trim().to_lowercase();

        let id = self
            .custom
            .get(&key)
            .copied()
            .or_else(|| {
                FAMILY_ALIASES
                    .iter()
                    .find(|(name, _)| *name == key)
                    .and_then(|(_, candidates)| {
                        candidates
                            .iter()
                            .find_map(|c| self.query(fontdb::Family::Name(*c), weight))
                    })
            })
            .or_else(|| self.query(fontdb::Family::Name(family.trim()), weight))
            .or_else(|| {
                tracing::warn!(family, "font family not found; using sans-serif fallback");
                self.query(fontdb::Family::SansSerif, weight)
            })
            .or_else(|| self.db.faces().next().map(|f| f.id))?;

        self.load(id)
    }

    fn query(&self, family: fontdb::Family<'_>, weight: u16) -> Option<fontdb::ID> {
        self.db.query(&fontdb::Query {
            families: &[family],
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })
    }

    fn load(&self, id: fontdb::ID) -> Option<ResolvedFont> {
        let family = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(n, _)| n.clone()))
            .unwrap_or_default();
        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        Some(ResolvedFont {
            family,
            data: Arc::new(data),
            index,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
