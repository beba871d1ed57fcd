//! Model-name lookup.
//!
//! Names live in three tables searched in a fixed priority order: vehicles,
//! then props, then pedestrians. The first table with a non-empty name for
//! the hash wins.

use engine_core::ModelHash;
use std::collections::HashMap;

/// Name shown when no table knows the hash.
pub const UNKNOWN_MODEL: &str = "Unknown";

/// Which table a model name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelClass {
    Vehicle,
    Prop,
    Ped,
}

/// Lookup order for [`ModelRegistry::resolve`].
const CLASS_PRIORITY: [ModelClass; 3] = [ModelClass::Vehicle, ModelClass::Prop, ModelClass::Ped];

const BUILTIN_VEHICLES: &[&str] = &[
    "adder", "zentorno", "sultan", "banshee", "buffalo", "comet2", "infernus", "bati", "police",
    "ambulance", "firetruk", "taxi", "bus", "phantom", "blista", "futo",
];

const BUILTIN_PROPS: &[&str] = &[
    "prop_bin_01a",
    "prop_roadcone02a",
    "prop_barrier_work05",
    "prop_cs_cardbox_01",
    "prop_fire_hydrant_1",
    "prop_bench_01a",
    "prop_streetlight_01",
];

const BUILTIN_PEDS: &[&str] = &[
    "mp_m_freemode_01",
    "mp_f_freemode_01",
    "a_m_m_business_01",
    "a_f_y_hipster_01",
    "s_m_y_cop_01",
    "s_m_m_paramedic_01",
    "player_zero",
];

/// Hash → name tables for vehicles, props and pedestrians.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    vehicles: HashMap<ModelHash, String>,
    props: HashMap<ModelHash, String>,
    peds: HashMap<ModelHash, String>,
}

impl ModelRegistry {
    /// Empty registry: every hash resolves to [`UNKNOWN_MODEL`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with a set of common model names.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.extend(ModelClass::Vehicle, BUILTIN_VEHICLES.iter().copied());
        registry.extend(ModelClass::Prop, BUILTIN_PROPS.iter().copied());
        registry.extend(ModelClass::Ped, BUILTIN_PEDS.iter().copied());
        registry
    }

    fn table(&self, class: ModelClass) -> &HashMap<ModelHash, String> {
        match class {
            ModelClass::Vehicle => &self.vehicles,
            ModelClass::Prop => &self.props,
            ModelClass::Ped => &self.peds,
        }
    }

    fn table_mut(&mut self, class: ModelClass) -> &mut HashMap<ModelHash, String> {
        match class {
            ModelClass::Vehicle => &mut self.vehicles,
            ModelClass::Prop => &mut self.props,
            ModelClass::Ped => &mut self.peds,
        }
    }

    /// Register a name under its joaat hash.
    pub fn insert(&mut self, class: ModelClass, name: &str) -> ModelHash {
        let hash = ModelHash::from_name(name);
        self.insert_hash(class, hash, name);
        hash
    }

    /// Register a name under an explicit hash.
    pub fn insert_hash(&mut self, class: ModelClass, hash: ModelHash, name: &str) {
        self.table_mut(class).insert(hash, name.to_string());
    }

    pub fn extend<'a>(&mut self, class: ModelClass, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.insert(class, name);
        }
    }

    /// First table with a non-empty name for `hash`, with that name.
    pub fn lookup(&self, hash: ModelHash) -> Option<(ModelClass, &str)> {
        CLASS_PRIORITY.iter().find_map(|&class| {
            self.table(class)
                .get(&hash)
                .map(String::as_str)
                .filter(|name| !name.is_empty())
                .map(|name| (class, name))
        })
    }

    /// Display name for `hash`; never empty.
    pub fn resolve(&self, hash: ModelHash) -> &str {
        self.lookup(hash).map_or(UNKNOWN_MODEL, |(_, name)| name)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len() + self.props.len() + self.peds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
