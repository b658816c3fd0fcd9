use std::fs;
use std::path::Path;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swagen.yaml";

/// Generated `.ts` files import shared interfaces from here.
pub const INTERFACE_PATH: &str = "interface/index.ts";
pub const INTERFACE_IMPORT: &str = "./interface";

/// Shared JSDoc typedefs for `.js` output.
pub const TYPEDEF_PATH: &str = "typedef/index.js";

pub const DEFAULT_IMPORT_CODE: &str = "import axios from \"axios\";";

/// Target language of the generated request functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ts,
    #[default]
    Js,
}

impl Lang {
    pub fn extension(&self) -> &'static str {
        match self {
            Lang::Ts => "ts",
            Lang::Js => "js",
        }
    }

    /// Whether the target carries static types.
    pub fn is_typed(&self) -> bool {
        matches!(self, Lang::Ts)
    }
}

/// Merged generation settings, shared read-only by every pipeline stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: String,
    pub root: String,
    pub lang: Lang,
    /// Only emit the interface/typedef file.
    pub type_only: bool,
    pub filename: FilenameConfig,
    /// Emitted verbatim after the generated import line.
    pub custom_import_code: String,
    pub js_doc: bool,
    pub interface: bool,
    pub typedef: bool,
    pub recursive: bool,
    /// Stamp generated headers with the current date.
    pub timestamp: bool,
    /// Run prettier over the output directory after writing.
    pub format: bool,
    pub mock: MockOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "swagger.json".to_string(),
            root: "src/api".to_string(),
            lang: Lang::Js,
            type_only: false,
            filename: FilenameConfig::default(),
            custom_import_code: DEFAULT_IMPORT_CODE.to_string(),
            js_doc: true,
            interface: false,
            typedef: false,
            recursive: false,
            timestamp: false,
            format: false,
            mock: MockOptions::default(),
        }
    }
}

/// Values supplied on top of a config file, typically from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source: Option<String>,
    pub root: Option<String>,
    pub lang: Option<Lang>,
    pub type_only: Option<bool>,
    pub custom_import_code: Option<String>,
    pub mock_root: Option<String>,
}

impl Config {
    /// Layer overrides over this config, producing the final value.
    pub fn merge(self, overrides: ConfigOverrides) -> Config {
        let mut mock = self.mock;
        if let Some(root) = overrides.mock_root {
            mock.root = root;
        }
        Config {
            source: overrides.source.unwrap_or(self.source),
            root: overrides.root.unwrap_or(self.root),
            lang: overrides.lang.unwrap_or(self.lang),
            type_only: overrides.type_only.unwrap_or(self.type_only),
            custom_import_code: overrides
                .custom_import_code
                .unwrap_or(self.custom_import_code),
            mock,
            ..self
        }
    }

    /// File stem for a tag: explicit aliases win, then the case strategy.
    pub fn filename_for(&self, tag: &str) -> String {
        if let Some(alias) = self.filename.aliases.get(tag) {
            return alias.clone();
        }
        match self.filename.case {
            FileCase::Original => tag.to_string(),
            FileCase::Camel => tag.to_lower_camel_case(),
            FileCase::Pascal => tag.to_pascal_case(),
            FileCase::Snake => tag.to_snake_case(),
            FileCase::Kebab => tag.to_kebab_case(),
        }
    }

    /// Relative path of the per-tag request module.
    pub fn module_path(&self, tag: &str) -> String {
        format!("{}.{}", self.filename_for(tag), self.lang.extension())
    }
}

/// How tag names map to file names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilenameConfig {
    pub case: FileCase,
    /// Map from tag name to custom file stem.
    pub aliases: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCase {
    #[default]
    Original,
    Camel,
    Pascal,
    Snake,
    Kebab,
}

/// Mock handler generation options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MockOptions {
    pub root: String,
    /// Wrap every response as `{ code, msg, data }`.
    pub wrap: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            root: "mock".to_string(),
            wrap: false,
        }
    }
}

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swagen configuration
source: swagger.json
root: src/api
lang: js              # ts | js
type_only: false      # only emit interface/typedef declarations

filename:
  case: original      # original | camel | pascal | snake | kebab
  aliases: {}
    # pet-controller: pet

custom_import_code: 'import axios from "axios";'
js_doc: true
timestamp: false      # stamp file headers with the generation date
format: false         # run prettier on the output directory

mock:
  root: mock
  wrap: false         # wrap responses as { code, msg, data }
"#
}
