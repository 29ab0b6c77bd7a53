use indexmap::IndexMap;
use serde::Deserialize;

/// Listing endpoint response
#[derive(Deserialize, Debug)]
pub struct Catalog {
    /// Entries in grid order
    pub results: Vec<CatalogEntry>,
}

/// One catalog entry; only the model reference is kept
#[derive(Deserialize, Debug)]
pub struct CatalogEntry {
    /// Vendor model reference, e.g. "m126610ln-0001"
    pub rmc: String,
}

/// Detail endpoint response
#[derive(Deserialize, Debug)]
pub struct ModelDetail {
    pub name: String,
    pub case: Labelled<CaseLabels>,
    pub movement: Labelled<MovementLabels>,
    pub bracelet: Labelled<BraceletLabels>,
    pub dial: Labelled<DialLabels>,
    pub editorial_mapping: EditorialMapping,
}

/// Every label group nests its display strings under `labels`
#[derive(Deserialize, Debug)]
pub struct Labelled<T> {
    pub labels: T,
}

#[derive(Deserialize, Debug)]
pub struct CaseLabels {
    pub title: String,
    pub bezel: String,
    pub oyster_architecture: String,
    pub diameter: String,
    pub material: String,
    pub winding_crown: String,
    pub crystal: String,
    pub water_resistance: String,
}

#[derive(Deserialize, Debug)]
pub struct MovementLabels {
    pub title: String,
    pub calibre: String,
    pub precision_static: String,
    pub functions: String,
    pub oscillator: String,
    pub winding: String,
    pub tdr_movement_autonomy: String,
    pub certification: String,
}

#[derive(Deserialize, Debug)]
pub struct BraceletLabels {
    pub title: String,
    pub material: String,
    pub clasp_type: String,
}

#[derive(Deserialize, Debug)]
pub struct DialLabels {
    pub title: String,
    pub details: String,
}

#[derive(Deserialize, Debug)]
pub struct EditorialMapping {
    pub cover: Cover,
    pub userguide: UserGuide,
}

#[derive(Deserialize, Debug)]
pub struct Cover {
    /// JSON array of images, serialized into a string
    pub lightbox_image_landscape_cl: String,
}

/// Element of the decoded lightbox array
#[derive(Deserialize, Debug)]
pub struct LightboxImage {
    pub src: String,
}

#[derive(Deserialize, Debug)]
pub struct UserGuide {
    pub path_cl: String,
}

/// Flattened specification of one model: column name to value, in column order.
///
/// Inserting an existing column replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSpec {
    fields: IndexMap<&'static str, String>,
}

impl ItemSpec {
    pub(crate) fn insert(&mut self, column: &'static str, value: impl Into<String>) {
        self.fields.insert(column, value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Model reference to its specification, in catalog order
#[derive(Debug, Default)]
pub struct ItemSpecTable {
    rows: IndexMap<String, ItemSpec>,
}

impl ItemSpecTable {
    /// Adds a row; a repeated reference overwrites the earlier row in place
    pub fn insert(&mut self, rmc: String, spec: ItemSpec) {
        self.rows.insert(rmc, spec);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &ItemSpec)> {
        self.rows.iter().map(|(rmc, spec)| (rmc.as_str(), spec))
    }

    /// Union of every row's columns, in first-seen order
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Vec::new();
        for spec in self.rows.values() {
            for column in spec.columns() {
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }
        columns
    }
}
