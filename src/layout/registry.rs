//! Field catalog, per-field box state and the registry that joins them

use std::collections::HashMap;

use super::error::LayoutError;
use super::find_similar;
use super::types::FieldBox;

/// A static descriptor for one placeable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Stable identifier, used as the join key in persisted layouts
    pub id: String,
    /// Display name shown in the field list
    pub label: String,
    /// Sample content drawn inside the box on screen; never persisted
    pub preview_text: String,
}

impl Field {
    pub fn new(id: impl Into<String>, label: impl Into<String>, preview_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            preview_text: preview_text.into(),
        }
    }
}

/// Index of a field inside its catalog.
///
/// Only a [`FieldCatalog`] hands these out, so a `FieldId` is always valid
/// for the catalog (and any [`Layout`]) it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The ordered, immutable list of fields known to the editor
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<Field>,
    by_id: HashMap<String, FieldId>,
}

impl FieldCatalog {
    /// Build a catalog, rejecting empty or duplicate ids
    pub fn new(fields: Vec<Field>) -> Result<Self, LayoutError> {
        if fields.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }

        let mut by_id = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if field.id.trim().is_empty() {
                return Err(LayoutError::EmptyFieldId { position });
            }
            if by_id.insert(field.id.clone(), FieldId(position)).is_some() {
                return Err(LayoutError::DuplicateField {
                    id: field.id.clone(),
                });
            }
        }

        Ok(Self { fields, by_id })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field behind an id handed out by this catalog
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    /// Look up a field by its exact id
    pub fn lookup(&self, id: &str) -> Option<FieldId> {
        self.by_id.get(id).copied()
    }

    /// Resolve a field by id, falling back to an exact label match
    pub fn resolve(&self, name: &str) -> Result<FieldId, LayoutError> {
        if let Some(id) = self.lookup(name) {
            return Ok(id);
        }
        if let Some(position) = self.fields.iter().position(|f| f.label == name) {
            return Ok(FieldId(position));
        }

        let known: Vec<&str> = self.fields.iter().map(|f| f.id.as_str()).collect();
        Err(LayoutError::unknown(name, find_similar(&known, name, 2)))
    }

    /// Fields in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &Field)> + '_ {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| (FieldId(i), field))
    }

    /// Field ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.id.as_str())
    }
}

/// The box state of every field in a catalog; the unit of persistence
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    boxes: Vec<Option<FieldBox>>,
}

impl Layout {
    /// A layout with every field unset
    pub fn unset(catalog: &FieldCatalog) -> Self {
        Self {
            boxes: vec![None; catalog.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Current box of a field, `None` when unset
    pub fn get(&self, id: FieldId) -> Option<FieldBox> {
        self.boxes.get(id.0).copied().flatten()
    }

    /// Overwrite a field's box
    pub fn set(&mut self, id: FieldId, rect: FieldBox) {
        if let Some(slot) = self.boxes.get_mut(id.0) {
            *slot = Some(rect);
        }
    }

    /// Number of fields with a box
    pub fn placed_count(&self) -> usize {
        self.boxes.iter().filter(|b| b.is_some()).count()
    }

    /// Box state per field, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, Option<FieldBox>)> + '_ {
        self.boxes.iter().enumerate().map(|(i, b)| (FieldId(i), *b))
    }
}

/// The catalog together with the live layout being edited
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    catalog: FieldCatalog,
    layout: Layout,
}

impl FieldRegistry {
    /// A registry with every field unset
    pub fn new(catalog: FieldCatalog) -> Self {
        let layout = Layout::unset(&catalog);
        Self { catalog, layout }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current box of a field
    pub fn box_of(&self, id: FieldId) -> Option<FieldBox> {
        self.layout.get(id)
    }

    /// Overwrite a field's box
    pub fn place(&mut self, id: FieldId, rect: FieldBox) {
        self.layout.set(id, rect);
    }

    /// Replace every box at once, as a layout load does.
    ///
    /// Returns `false` and leaves the registry untouched if the layout was
    /// built for a catalog of a different size.
    pub fn replace_layout(&mut self, layout: Layout) -> bool {
        if layout.len() != self.catalog.len() {
            return false;
        }
        self.layout = layout;
        true
    }

    /// Fields that currently have a box, in catalog order
    pub fn placed(&self) -> impl Iterator<Item = (FieldId, &Field, FieldBox)> + '_ {
        self.layout
            .iter()
            .filter_map(move |(id, rect)| rect.map(|r| (id, self.catalog.field(id), r)))
    }
}
