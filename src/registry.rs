//! Name-keyed collections and the user data registry
//!
//! User-supplied definitions of regions, calculations, variables and
//! projects are described by typed configuration structs. A
//! [`UserDataRegistry`] holds one validated collection per module, filled
//! either by [`UserDataRegistry::register`] or from JSON files in a user
//! directory via [`load_user_data`].

use crate::errors::{AtmosVertError, Result};
use crate::inherit::Node;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Anything that can be keyed by its name
pub trait Named {
    fn name(&self) -> Option<&str>;
}

impl Named for Node {
    fn name(&self) -> Option<&str> {
        Some(Node::name(self)).filter(|n| !n.is_empty())
    }
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

/// Map each object's name to the object.
///
/// When two objects share a name the later one wins.
///
/// # Errors
///
/// Returns [`AtmosVertError::MissingName`] for the first object without a
/// name.
pub fn dict_name_keys<T, I>(objs: I) -> Result<BTreeMap<String, T>>
where
    T: Named,
    I: IntoIterator<Item = T>,
{
    let mut keyed = BTreeMap::new();
    for (index, obj) in objs.into_iter().enumerate() {
        let name = obj
            .name()
            .ok_or(AtmosVertError::MissingName { index })?
            .to_string();
        keyed.insert(name, obj);
    }
    Ok(keyed)
}

/// The kinds of user data a registry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserModule {
    Regions,
    Calcs,
    Variables,
    Projects,
}

impl UserModule {
    pub const ALL: [Self; 4] = [Self::Regions, Self::Calcs, Self::Variables, Self::Projects];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regions => "regions",
            Self::Calcs => "calcs",
            Self::Variables => "variables",
            Self::Projects => "projects",
        }
    }

    /// File holding this module's data inside a user directory
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for UserModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserModule {
    type Err = AtmosVertError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AtmosVertError::UnknownModule {
                name: s.to_string(),
            })
    }
}

/// Geographic region used to mask or average fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    /// South and north edges (degrees)
    pub lat_bounds: [f64; 2],
    /// West and east edges (degrees)
    pub lon_bounds: [f64; 2],
    #[serde(default)]
    pub land_mask: bool,
}

/// Calculation combining one or more variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalcConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub function: String,
    pub variables: Vec<String>,
    /// Integrate the result vertically with `int_dp_g`
    #[serde(default)]
    pub vertical_integral: bool,
}

/// Physical variable as stored in model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub units: String,
    /// Defined on vertical levels
    #[serde(default)]
    pub def_vert: bool,
    /// Defined in time
    #[serde(default = "default_true")]
    pub def_time: bool,
}

/// Project grouping models and an output directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub direc_out: Option<PathBuf>,
    #[serde(default)]
    pub models: Vec<String>,
}

const fn default_true() -> bool {
    true
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> Option<&str> {
                self.name.as_deref().filter(|n| !n.is_empty())
            }
        })*
    };
}

impl_named!(RegionConfig, CalcConfig, VariableConfig, ProjectConfig);

/// Checks beyond what deserialization enforces
trait Validate {
    fn validate(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

impl Validate for RegionConfig {
    fn validate(&self, key: &str) -> Result<()> {
        let [south, north] = self.lat_bounds;
        let [west, east] = self.lon_bounds;
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) || south > north {
            return Err(AtmosVertError::InvalidConfig {
                message: format!("region '{key}' has invalid latitude bounds [{south}, {north}]"),
            });
        }
        if !(-360.0..=360.0).contains(&west) || !(-360.0..=360.0).contains(&east) {
            return Err(AtmosVertError::InvalidConfig {
                message: format!("region '{key}' has invalid longitude bounds [{west}, {east}]"),
            });
        }
        Ok(())
    }
}

impl Validate for CalcConfig {
    fn validate(&self, key: &str) -> Result<()> {
        if self.variables.is_empty() {
            return Err(AtmosVertError::InvalidConfig {
                message: format!("calculation '{key}' uses no variables"),
            });
        }
        Ok(())
    }
}

impl Validate for VariableConfig {}

impl Validate for ProjectConfig {}

fn parse_keyed<T>(json: &str) -> Result<BTreeMap<String, T>>
where
    T: Named + Validate + DeserializeOwned,
{
    let entries: Vec<T> = serde_json::from_str(json)?;
    let keyed = dict_name_keys(entries)?;
    for (key, entry) in &keyed {
        entry.validate(key)?;
    }
    Ok(keyed)
}

/// Validated contents of one user data module
#[derive(Debug, Clone, PartialEq)]
pub enum UserData {
    Regions(BTreeMap<String, RegionConfig>),
    Calcs(BTreeMap<String, CalcConfig>),
    Variables(BTreeMap<String, VariableConfig>),
    Projects(BTreeMap<String, ProjectConfig>),
}

impl UserData {
    /// Parse and validate a JSON list of entries for `module`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, unknown fields, unnamed entries
    /// or entries that fail validation.
    pub fn from_json_str(module: UserModule, json: &str) -> Result<Self> {
        Ok(match module {
            UserModule::Regions => Self::Regions(parse_keyed(json)?),
            UserModule::Calcs => Self::Calcs(parse_keyed(json)?),
            UserModule::Variables => Self::Variables(parse_keyed(json)?),
            UserModule::Projects => Self::Projects(parse_keyed(json)?),
        })
    }

    #[must_use]
    pub const fn module(&self) -> UserModule {
        match self {
            Self::Regions(_) => UserModule::Regions,
            Self::Calcs(_) => UserModule::Calcs,
            Self::Variables(_) => UserModule::Variables,
            Self::Projects(_) => UserModule::Projects,
        }
    }

    /// Entry names in sorted order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Regions(m) => m.keys().map(String::as_str).collect(),
            Self::Calcs(m) => m.keys().map(String::as_str).collect(),
            Self::Variables(m) => m.keys().map(String::as_str).collect(),
            Self::Projects(m) => m.keys().map(String::as_str).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load one module's user data from `<user_path>/<name>.json`.
///
/// `name` is one of `regions`, `calcs`, `variables` or `projects`.
///
/// # Errors
///
/// Returns an error for an unknown module name, an unreadable file, or data
/// that fails to parse or validate.
pub fn load_user_data(user_path: &Path, name: &str) -> Result<UserData> {
    let module: UserModule = name.parse()?;
    let path = user_path.join(module.file_name());
    debug!(path = %path.display(), %module, "loading user data");

    let json = fs::read_to_string(&path)?;
    UserData::from_json_str(module, &json)
}

/// User data collections keyed by module
#[derive(Debug, Clone, Default)]
pub struct UserDataRegistry {
    modules: HashMap<UserModule, UserData>,
}

impl UserDataRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every module file present in `user_path`; missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file fails to load.
    pub fn from_dir(user_path: &Path) -> Result<Self> {
        let mut registry = Self::new();
        for module in UserModule::ALL {
            if user_path.join(module.file_name()).is_file() {
                registry.register(load_user_data(user_path, module.as_str())?);
            }
        }
        Ok(registry)
    }

    /// Add a module's data, returning whatever it replaced.
    pub fn register(&mut self, data: UserData) -> Option<UserData> {
        debug!(module = %data.module(), entries = data.len(), "registering user data");
        self.modules.insert(data.module(), data)
    }

    #[must_use]
    pub fn get(&self, module: UserModule) -> Option<&UserData> {
        self.modules.get(&module)
    }

    #[must_use]
    pub fn region(&self, name: &str) -> Option<&RegionConfig> {
        match self.get(UserModule::Regions)? {
            UserData::Regions(regions) => regions.get(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn calc(&self, name: &str) -> Option<&CalcConfig> {
        match self.get(UserModule::Calcs)? {
            UserData::Calcs(calcs) => calcs.get(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&VariableConfig> {
        match self.get(UserModule::Variables)? {
            UserData::Variables(variables) => variables.get(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        match self.get(UserModule::Projects)? {
            UserData::Projects(projects) => projects.get(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
