//! 抽出レコードの型定義
//!
//! バックエンドが返す1件の情報レコードと、その固定フィールド一覧。
//! - Field: 表示順に並んだ固定フィールド
//! - FieldValue: スカラー値（文字列 or 数値）
//! - Record: 1件のレコード（未知のキーもそのまま保持）
//! - ChosenFile: アップロード対象として選ばれたファイル

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// レコードの固定フィールド（表の列順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Heading,
    Summary,
    Formation,
    LowerFormationAor,
    Unit,
    Agency,
    Country,
    State,
    District,
    GeneralArea,
    Group,
    Coordinates,
    EngagementType,
    CadresMin,
    CadresMax,
    Leader,
    Weapons,
    Ammunition,
}

impl Field {
    /// 表示順の全フィールド
    pub const ALL: [Field; 19] = [
        Field::Date,
        Field::Heading,
        Field::Summary,
        Field::Formation,
        Field::LowerFormationAor,
        Field::Unit,
        Field::Agency,
        Field::Country,
        Field::State,
        Field::District,
        Field::GeneralArea,
        Field::Group,
        Field::Coordinates,
        Field::EngagementType,
        Field::CadresMin,
        Field::CadresMax,
        Field::Leader,
        Field::Weapons,
        Field::Ammunition,
    ];

    /// JSON上のキー
    pub fn key(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Heading => "heading",
            Field::Summary => "input_summary",
            Field::Formation => "fmn",
            Field::LowerFormationAor => "aor_lower_fmn",
            Field::Unit => "unit",
            Field::Agency => "agency",
            Field::Country => "country",
            Field::State => "state",
            Field::District => "district",
            Field::GeneralArea => "gen_area",
            Field::Group => "gp",
            Field::Coordinates => "coordinates",
            Field::EngagementType => "engagement_type_reasoned",
            Field::CadresMin => "cadres_min",
            Field::CadresMax => "cadres_max",
            Field::Leader => "leader",
            Field::Weapons => "weapons",
            Field::Ammunition => "ammunition",
        }
    }

    /// 列見出し
    pub fn label(self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::Heading => "Heading",
            Field::Summary => "Summary",
            Field::Formation => "FMN",
            Field::LowerFormationAor => "AOR Lower FMN",
            Field::Unit => "Unit",
            Field::Agency => "Agency",
            Field::Country => "Country",
            Field::State => "State",
            Field::District => "District",
            Field::GeneralArea => "General Area",
            Field::Group => "Group/Faction",
            Field::Coordinates => "Coordinates",
            Field::EngagementType => "Engagement Type",
            Field::CadresMin => "Cadres Min",
            Field::CadresMax => "Cadres Max",
            Field::Leader => "Leader",
            Field::Weapons => "Weapons",
            Field::Ammunition => "Ammunition",
        }
    }
}

/// フィールド値（文字列または数値）
///
/// 想定外の型（真偽値・配列など）は `Other` にそのまま保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

/// 抽出レコード
///
/// 値は `null` / 欠落のどちらも `None` として扱う。
/// 固定フィールド以外のキーは `extra` に残し、エクスポート時にそのまま返す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub date: Option<FieldValue>,
    #[serde(default)]
    pub heading: Option<FieldValue>,
    #[serde(default)]
    pub input_summary: Option<FieldValue>,
    #[serde(default)]
    pub fmn: Option<FieldValue>,
    #[serde(default)]
    pub aor_lower_fmn: Option<FieldValue>,
    #[serde(default)]
    pub unit: Option<FieldValue>,
    #[serde(default)]
    pub agency: Option<FieldValue>,
    #[serde(default)]
    pub country: Option<FieldValue>,
    #[serde(default)]
    pub state: Option<FieldValue>,
    #[serde(default)]
    pub district: Option<FieldValue>,
    #[serde(default)]
    pub gen_area: Option<FieldValue>,
    #[serde(default)]
    pub gp: Option<FieldValue>,
    #[serde(default)]
    pub coordinates: Option<FieldValue>,
    #[serde(default)]
    pub engagement_type_reasoned: Option<FieldValue>,
    #[serde(default)]
    pub cadres_min: Option<FieldValue>,
    #[serde(default)]
    pub cadres_max: Option<FieldValue>,
    #[serde(default)]
    pub leader: Option<FieldValue>,
    #[serde(default)]
    pub weapons: Option<FieldValue>,
    #[serde(default)]
    pub ammunition: Option<FieldValue>,

    /// 未知のキー
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Record {
    /// フィールド値を取得
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        let value = match field {
            Field::Date => &self.date,
            Field::Heading => &self.heading,
            Field::Summary => &self.input_summary,
            Field::Formation => &self.fmn,
            Field::LowerFormationAor => &self.aor_lower_fmn,
            Field::Unit => &self.unit,
            Field::Agency => &self.agency,
            Field::Country => &self.country,
            Field::State => &self.state,
            Field::District => &self.district,
            Field::GeneralArea => &self.gen_area,
            Field::Group => &self.gp,
            Field::Coordinates => &self.coordinates,
            Field::EngagementType => &self.engagement_type_reasoned,
            Field::CadresMin => &self.cadres_min,
            Field::CadresMax => &self.cadres_max,
            Field::Leader => &self.leader,
            Field::Weapons => &self.weapons,
            Field::Ammunition => &self.ammunition,
        };
        value.as_ref()
    }

    /// 値の文字列表現（欠落時は空文字）
    pub fn text(&self, field: Field) -> String {
        self.get(field).map(|v| v.to_string()).unwrap_or_default()
    }

    /// 表のセル表示（空なら "-"）
    pub fn display(&self, field: Field) -> String {
        let text = self.text(field);
        if text.is_empty() {
            "-".to_string()
        } else {
            text
        }
    }
}

/// アップロード対象のファイル
///
/// 選択時に中身をメモリへ読み込む。クローンはバイト列を共有する。
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl ChosenFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
