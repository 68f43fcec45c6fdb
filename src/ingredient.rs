use serde::Serialize;

/// A structured ingredient line, e.g. `100 grams tomatoes, diced`.
///
/// Unit and quantity are last-write-wins; names and notes keep every token in
/// the order the tagger emitted them.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Ingredient {
    unit: Option<String>,
    quantity: Option<String>,
    names: Vec<String>,
    notes: Vec<String>,
}

impl Ingredient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) -> &mut Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn set_quantity(&mut self, quantity: impl Into<String>) -> &mut Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn add_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.names.push(name.into());
        self
    }

    pub fn add_note(&mut self, note: impl Into<String>) -> &mut Self {
        self.notes.push(note.into());
        self
    }

    /// The unit, e.g. `gram`.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// The quantity as written, e.g. `1 1/2`.
    pub fn quantity(&self) -> Option<&str> {
        self.quantity.as_deref()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Name tokens joined with single spaces.
    pub fn name(&self) -> String {
        self.names.join(" ")
    }
}
