use crate::domain::model::Field;
use crate::utils::error::{FormatterError, Result};
use crate::utils::validation::{validate_non_empty_list, Validate};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KeywordList {
    One(String),
    Many(Vec<String>),
}

impl KeywordList {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeywordList::One(s) => vec![s],
            KeywordList::Many(v) => v,
        }
    }
}

/// On-disk layout. Short keys are the ones older config files use.
#[derive(Debug, Clone, Deserialize)]
struct RawKeywordConfig {
    #[serde(alias = "SRC")]
    source: KeywordList,
    #[serde(alias = "DST")]
    destination: KeywordList,
    #[serde(alias = "SRV")]
    service: KeywordList,
    #[serde(default, alias = "RM")]
    remove: Option<KeywordList>,
    #[serde(default, alias = "ADD")]
    add: Option<KeywordList>,
    #[serde(default, alias = "USG")]
    usage: Option<KeywordList>,
    #[serde(default, alias = "CMT")]
    comment: Option<KeywordList>,
    #[serde(default)]
    service_replace: BTreeMap<String, String>,
}

/// Header keywords per field, loaded once per run.
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    keywords: BTreeMap<Field, Vec<String>>,
    index: HashMap<String, Field>,
    /// (pattern, replacement) in key order
    service_replace: Vec<(String, String)>,
}

impl KeywordConfig {
    /// 依副檔名載入 JSON 或 TOML 設定檔
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FormatterError::ConfigError {
            message: format!("cannot read '{}': {}", path.display(), e),
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawKeywordConfig =
            serde_json::from_str(content).map_err(|e| FormatterError::ConfigError {
                message: format!("invalid JSON: {}", e),
            })?;
        Self::from_raw(raw)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawKeywordConfig =
            toml::from_str(content).map_err(|e| FormatterError::ConfigError {
                message: format!("invalid TOML: {}", e),
            })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawKeywordConfig) -> Result<Self> {
        let lists = [
            (Field::Source, Some(raw.source)),
            (Field::Destination, Some(raw.destination)),
            (Field::Service, Some(raw.service)),
            (Field::Remove, raw.remove),
            (Field::Add, raw.add),
            (Field::Usage, raw.usage),
            (Field::Comment, raw.comment),
        ];

        let mut keywords = BTreeMap::new();
        let mut index = HashMap::new();

        for (field, list) in lists {
            let values: Vec<String> = list
                .map(KeywordList::into_vec)
                .unwrap_or_default()
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();

            for keyword in &values {
                // 同一關鍵字不可同時指向兩個欄位
                if let Some(previous) = index.insert(keyword.to_lowercase(), field) {
                    if previous != field {
                        return Err(FormatterError::InvalidConfigValueError {
                            field: field.name().to_string(),
                            value: keyword.clone(),
                            reason: format!("keyword is already assigned to '{}'", previous),
                        });
                    }
                }
            }
            keywords.insert(field, values);
        }

        // 空字串樣式無意義，略過
        let service_replace = raw
            .service_replace
            .into_iter()
            .filter(|(from, _)| !from.is_empty())
            .collect();

        let config = Self {
            keywords,
            index,
            service_replace,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn keywords(&self, field: Field) -> &[String] {
        self.keywords.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Case-insensitive lookup of a header cell.
    pub fn field_for(&self, header: &str) -> Option<Field> {
        self.index.get(&header.trim().to_lowercase()).copied()
    }

    /// Applies `service_replace` to one service token.
    ///
    /// A pattern equal to the whole token (ignoring case and surrounding
    /// spaces) swaps the token for its replacement. Otherwise every pattern is
    /// replaced wherever it occurs in the token, e.g. `{"/": " "}` turns
    /// `TCP/22` into `TCP 22`.
    pub fn replace_service(&self, token: &str) -> String {
        let token = token.trim();
        let whole = token.to_lowercase();

        if let Some((_, to)) = self
            .service_replace
            .iter()
            .find(|(from, _)| from.trim().to_lowercase() == whole)
        {
            return to.trim().to_string();
        }

        self.service_replace
            .iter()
            .fold(token.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}

impl Validate for KeywordConfig {
    fn validate(&self) -> Result<()> {
        for field in Field::REQUIRED {
            validate_non_empty_list(field.name(), self.keywords(field))?;
        }
        Ok(())
    }
}
