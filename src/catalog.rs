//! Weapon catalog loading
//!
//! The catalog is either the table embedded in the binary, a single RON file,
//! or a directory holding `catalog.ron` plus extra preset lists.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::CatalogError;
use crate::models::{Catalog, MaterialVec, Preset};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.ron");
const BASE_FILE: &str = "catalog.ron";

/// On-disk shape of a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    materials: Vec<String>,
    pieces: Vec<String>,
    #[serde(default)]
    body_cost: MaterialVec,
    #[serde(default)]
    other_cost: MaterialVec,
    #[serde(default)]
    presets: Vec<Preset>,
}

impl Catalog {
    /// The default catalog shipped with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_ron(BUILTIN_CATALOG, "<builtin>")
    }

    /// Parse and validate a catalog from RON text
    pub fn from_ron(text: &str, origin: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = ron::de::from_str(text).map_err(|e| CatalogError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

        if file.materials.is_empty() {
            return Err(CatalogError::NoMaterials);
        }
        if file.pieces.is_empty() {
            return Err(CatalogError::NoPieces);
        }
        check_unique("material", &file.materials)?;
        check_unique("piece slot", &file.pieces)?;
        check_cost_table("body_cost", &file.body_cost, &file.materials)?;
        check_cost_table("other_cost", &file.other_cost, &file.materials)?;

        let mut catalog = Catalog {
            materials: file.materials,
            pieces: file.pieces,
            body_cost: file.body_cost,
            other_cost: file.other_cost,
            presets: IndexMap::new(),
        };
        catalog.add_presets(file.presets)?;

        debug!(
            "Parsed catalog {}: {} materials, {} piece slots, {} presets",
            origin,
            catalog.materials.len(),
            catalog.pieces.len(),
            catalog.presets.len()
        );
        Ok(catalog)
    }

    /// Load a catalog file, or a catalog directory with extra preset files
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.is_dir() {
            let catalog = Self::from_ron(&read(path)?, &path.display().to_string())?;
            info!("Loaded catalog from {}", path.display());
            return Ok(catalog);
        }

        let base = path.join(BASE_FILE);
        if !base.is_file() {
            return Err(CatalogError::MissingBase(path.to_path_buf()));
        }
        let mut catalog = Self::from_ron(&read(&base)?, &base.display().to_string())?;

        let extra_files = find_preset_files(path, &base);
        for file in &extra_files {
            let presets: Vec<Preset> =
                ron::de::from_str(&read(file)?).map_err(|e| CatalogError::Parse {
                    origin: file.display().to_string(),
                    message: e.to_string(),
                })?;
            debug!("  {}: {} presets", file.display(), presets.len());
            catalog.add_presets(presets)?;
        }

        info!(
            "Loaded catalog from {} ({} extra preset files, {} presets)",
            path.display(),
            extra_files.len(),
            catalog.presets.len()
        );
        Ok(catalog)
    }

    fn add_presets(&mut self, presets: Vec<Preset>) -> Result<(), CatalogError> {
        for preset in presets {
            if self.preset(&preset.name).is_some() {
                return Err(CatalogError::Duplicate {
                    kind: "preset",
                    name: preset.name,
                });
            }
            self.presets.insert(preset.name.clone(), preset);
        }
        Ok(())
    }

    /// Find a preset by name, ignoring case
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Resolve user-typed text to the catalog's spelling of a material
    pub fn material(&self, name: &str) -> Option<&str> {
        self.materials
            .iter()
            .find(|m| m.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    pub fn body_slot(&self) -> &str {
        &self.pieces[0]
    }

    /// Cost of one instance of the piece in `slot`; slot 0 is the body
    pub fn slot_cost(&self, slot: usize, material: &str) -> u64 {
        let table = if slot == 0 {
            &self.body_cost
        } else {
            &self.other_cost
        };
        table.get(material).copied().unwrap_or(0)
    }
}

fn read(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// All `*.ron` files below `dir` other than the base catalog, in path order
fn find_preset_files(dir: &Path, base: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().map_or(false, |ext| ext == "ron"))
        .filter(|p| p != base)
        .collect();
    files.sort();
    files
}

fn check_unique(kind: &'static str, names: &[String]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(CatalogError::Duplicate {
                kind,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

fn check_cost_table(
    table: &'static str,
    costs: &MaterialVec,
    materials: &[String],
) -> Result<(), CatalogError> {
    match costs.keys().find(|m| !materials.contains(m)) {
        Some(material) => Err(CatalogError::UnknownMaterial {
            table,
            material: material.clone(),
        }),
        None => Ok(()),
    }
}
