// SPDX-License-Identifier: MIT OR Apache-2.0
//! Game metadata: the catalog of items, machines and recipes a flow is built from.

use crate::item::ItemType;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One typed slot of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeItem {
    /// Item carried by the slot
    pub item: ItemType,
    /// Units consumed or produced per cycle
    pub quantity: u32,
}

impl RecipeItem {
    /// Create a recipe slot
    pub fn new(item: impl Into<ItemType>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

/// A recipe: ordered typed inputs and outputs run on a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name
    pub name: String,
    /// Machine the recipe runs on
    pub machine: String,
    /// Consumed items, in port order
    pub inputs: Vec<RecipeItem>,
    /// Produced items, in port order
    pub outputs: Vec<RecipeItem>,
}

impl Recipe {
    /// Create a recipe with no slots
    pub fn new(name: impl Into<String>, machine: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            machine: machine.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append an input slot
    pub fn with_input(mut self, item: impl Into<ItemType>, quantity: u32) -> Self {
        self.inputs.push(RecipeItem::new(item, quantity));
        self
    }

    /// Append an output slot
    pub fn with_output(mut self, item: impl Into<ItemType>, quantity: u32) -> Self {
        self.outputs.push(RecipeItem::new(item, quantity));
        self
    }

    fn slots(&self) -> impl Iterator<Item = &RecipeItem> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

/// A machine and how many input/output ports it offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Machine name
    pub name: String,
    /// Input port capacity
    pub inputs: usize,
    /// Output port capacity
    pub outputs: usize,
}

/// A transportable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item name, also its [`ItemType`]
    pub name: String,
    /// Maximum stack size
    pub stack_size: u32,
}

impl Item {
    /// The item type this item is carried as
    pub fn item_type(&self) -> ItemType {
        ItemType::new(self.name.clone())
    }
}

/// Problem found while validating metadata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// Two items share a name
    #[error("Duplicate item: {0}")]
    DuplicateItem(String),

    /// Two machines share a name
    #[error("Duplicate machine: {0}")]
    DuplicateMachine(String),

    /// Two recipes share a name
    #[error("Duplicate recipe: {0}")]
    DuplicateRecipe(String),

    /// Item declared with a zero stack size
    #[error("Item '{0}' has a zero stack size")]
    ZeroStackSize(String),

    /// Recipe uses an item missing from the catalog
    #[error("Recipe '{recipe}' uses unknown item '{item}'")]
    UnknownItem {
        /// Recipe name
        recipe: String,
        /// Missing item
        item: ItemType,
    },

    /// Recipe runs on a machine missing from the catalog
    #[error("Recipe '{recipe}' uses unknown machine '{machine}'")]
    UnknownMachine {
        /// Recipe name
        recipe: String,
        /// Missing machine
        machine: String,
    },

    /// Recipe slot with quantity zero
    #[error("Recipe '{recipe}' has a zero quantity for '{item}'")]
    ZeroQuantity {
        /// Recipe name
        recipe: String,
        /// Offending item
        item: ItemType,
    },

    /// Recipe needs more ports than its machine has
    #[error("Recipe '{recipe}' exceeds the port capacity of machine '{machine}'")]
    MachineCapacity {
        /// Recipe name
        recipe: String,
        /// Machine name
        machine: String,
    },

    /// Lookup of a recipe that does not exist
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),
}

/// Catalog of items, machines and recipes for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Game name
    pub name: String,
    /// Metadata version string
    pub version: String,
    /// Known machines
    pub machines: Vec<Machine>,
    /// Known items
    pub items: Vec<Item>,
    /// Known recipes
    pub recipes: Vec<Recipe>,
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            name: "New Game".to_string(),
            version: "1.0.0".to_string(),
            machines: Vec::new(),
            items: Vec::new(),
            recipes: Vec::new(),
        }
    }
}

impl GameMetadata {
    /// Look up an item by name
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Look up a machine by name
    pub fn machine(&self, name: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.name == name)
    }

    /// Look up a recipe by name
    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    /// Build a fixed node carrying a copy of the named recipe
    pub fn create_recipe_node(&self, name: &str) -> Result<Node, MetadataError> {
        self.recipe(name)
            .cloned()
            .map(Node::recipe)
            .ok_or_else(|| MetadataError::RecipeNotFound(name.to_string()))
    }

    /// Collect every consistency problem in the catalog
    pub fn validate(&self) -> Vec<MetadataError> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.name.as_str()) {
                errors.push(MetadataError::DuplicateItem(item.name.clone()));
            }
            if item.stack_size == 0 {
                errors.push(MetadataError::ZeroStackSize(item.name.clone()));
            }
        }

        let mut seen = HashSet::new();
        for machine in &self.machines {
            if !seen.insert(machine.name.as_str()) {
                errors.push(MetadataError::DuplicateMachine(machine.name.clone()));
            }
        }

        let mut seen = HashSet::new();
        for recipe in &self.recipes {
            if !seen.insert(recipe.name.as_str()) {
                errors.push(MetadataError::DuplicateRecipe(recipe.name.clone()));
            }

            match self.machine(&recipe.machine) {
                None => errors.push(MetadataError::UnknownMachine {
                    recipe: recipe.name.clone(),
                    machine: recipe.machine.clone(),
                }),
                Some(m) if recipe.inputs.len() > m.inputs || recipe.outputs.len() > m.outputs => {
                    errors.push(MetadataError::MachineCapacity {
                        recipe: recipe.name.clone(),
                        machine: m.name.clone(),
                    });
                }
                Some(_) => {}
            }

            for slot in recipe.slots() {
                if self.item(slot.item.name()).is_none() {
                    errors.push(MetadataError::UnknownItem {
                        recipe: recipe.name.clone(),
                        item: slot.item.clone(),
                    });
                }
                if slot.quantity == 0 {
                    errors.push(MetadataError::ZeroQuantity {
                        recipe: recipe.name.clone(),
                        item: slot.item.clone(),
                    });
                }
            }
        }

        errors
    }
}
