//! Family → genus reference table.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::errors::{BinomenError, Result};
use crate::reference::read_mapping_file;

const BUILTIN_FAMILIES: &[(&str, &[&str])] = &[
    ("Felidae", &["Felis", "Panthera", "Lynx", "Puma", "Acinonyx", "Leopardus"]),
    ("Sciuridae", &["Sciurus", "Marmota", "Tamias", "Spermophilus"]),
    ("Mustelidae", &["Mustela", "Lutra", "Meles", "Martes", "Enhydra"]),
    ("Accipitridae", &["Aquila", "Buteo", "Accipiter", "Haliaeetus", "Circus"]),
    ("Equidae", &["Equus"]),
    ("Viperidae", &["Vipera", "Crotalus", "Agkistrodon", "Bothrops"]),
    ("Chamaeleonidae", &["Chamaeleo", "Furcifer", "Brookesia", "Trioceros"]),
    ("Macropodidae", &["Macropus", "Wallabia", "Petrogale", "Dendrolagus"]),
    ("Strigidae", &["Strix", "Bubo", "Athene", "Otus", "Asio"]),
    ("Giraffidae", &["Giraffa", "Okapia"]),
    ("Castoridae", &["Castor"]),
    ("Passeridae", &["Passer", "Montifringilla"]),
    ("Talpidae", &["Talpa", "Scalopus", "Condylura", "Parascalops"]),
    ("Helicidae", &["Helix", "Cepaea", "Arianta"]),
    ("Vespertilionidae", &["Myotis", "Eptesicus", "Pipistrellus", "Plecotus", "Vespertilio"]),
    ("Ursidae", &["Ursus", "Ailuropoda", "Melursus", "Helarctos", "Tremarctos"]),
    ("Muridae", &["Mus", "Rattus", "Apodemus", "Microtus", "Peromyscus"]),
    ("Psittacidae", &["Psittacus", "Amazona", "Ara", "Cacatua", "Agapornis"]),
    ("Ranidae", &["Rana", "Lithobates", "Pelophylax", "Glandirana"]),
    ("Canidae", &["Canis", "Vulpes", "Lycaon", "Cuon", "Nyctereutes"]),
    ("Cyprinidae", &["Cyprinus", "Carassius", "Danio", "Puntius", "Barbus"]),
    ("Leporidae", &["Lepus", "Oryctolagus", "Sylvilagus", "Brachylagus"]),
    ("Elephantidae", &["Elephas", "Loxodonta"]),
    ("Erinaceidae", &["Erinaceus", "Atelerix", "Hemiechinus"]),
    ("Delphinidae", &["Delphinus", "Tursiops", "Orcinus", "Stenella"]),
    ("Testudinidae", &["Testudo", "Geochelone", "Gopherus", "Agrionemys"]),
    ("Lacertidae", &["Lacerta", "Podarcis", "Zootoca", "Darevskia"]),
];

static BUILTIN: Lazy<FamilyGenusTable> = Lazy::new(|| {
    FamilyGenusTable::from_entries(
        BUILTIN_FAMILIES
            .iter()
            .map(|(family, genera)| (*family, genera.iter().copied())),
    )
});

/// Immutable mapping from family name to its known genera.
///
/// Genus order is the canonical listing order and is reproduced verbatim in
/// diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyGenusTable {
    families: IndexMap<String, IndexSet<String>>,
}

impl FamilyGenusTable {
    /// Built-in reference table
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Build a table from (family, genera) pairs; repeated families merge.
    pub fn from_entries<F, G, I>(entries: impl IntoIterator<Item = (F, I)>) -> Self
    where
        F: Into<String>,
        G: Into<String>,
        I: IntoIterator<Item = G>,
    {
        let mut families: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for (family, genera) in entries {
            families
                .entry(family.into())
                .or_default()
                .extend(genera.into_iter().map(Into::into));
        }
        Self { families }
    }

    /// Load a table from a YAML or JSON mapping of family to genus list
    pub fn from_file(path: &Path) -> Result<Self> {
        let table: Self = read_mapping_file(path)?;
        if let Some((family, _)) = table.families.iter().find(|(_, g)| g.is_empty()) {
            return Err(BinomenError::validation_field(
                format!("family '{family}' lists no genera"),
                path.display().to_string(),
            ));
        }
        Ok(table)
    }

    /// Genera listed for `family`, or `None` when the family is unknown
    pub fn genera(&self, family: &str) -> Option<&IndexSet<String>> {
        self.families.get(family)
    }

    /// Whether `family` is present in the table
    pub fn contains_family(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// Families in canonical order
    pub fn families(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.families.iter().map(|(f, g)| (f.as_str(), g))
    }

    /// Number of families
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Whether the table has no families
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}
