use serde::Deserialize;

/// Database client settings. Connection coordinates and pool sizing are
/// consumed by the driver collaborator; the two `use_*` switches control the
/// rendering features of this crate.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,

    #[serde(default = "default_minconn")]
    pub minconn: u32,
    #[serde(default = "default_maxconn")]
    pub maxconn: u32,
    /// Seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// `tbl.obj_nm "File Name|파일명"` 형태의 이중 언어 별칭 사용 여부
    #[serde(default)]
    pub use_en_ko_column_alias: bool,

    /// `#if` / `#elif` / `#else` / `#endif` 전처리 사용 여부
    #[serde(default)]
    pub use_conditional: bool,
}

fn default_minconn() -> u32 {
    3
}

fn default_maxconn() -> u32 {
    6
}

fn default_connect_timeout() -> u64 {
    3
}

impl ClientSettings {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
