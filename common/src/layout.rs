//! 表の列幅レイアウト
//!
//! 表示中レコードの値の最大文字数から列ごとの幅クラスを決める。
//! Summary列は内容に関係なく最も広いクラス。

use crate::types::{Field, Record};

/// これを超えると Long
pub const LONG_THRESHOLD: usize = 100;
/// これを超えると Medium
pub const MEDIUM_THRESHOLD: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    Short,
    Medium,
    Long,
    Summary,
}

impl ColumnWidth {
    pub fn classify(field: Field, max_len: usize) -> Self {
        if field == Field::Summary {
            ColumnWidth::Summary
        } else if max_len > LONG_THRESHOLD {
            ColumnWidth::Long
        } else if max_len > MEDIUM_THRESHOLD {
            ColumnWidth::Medium
        } else {
            ColumnWidth::Short
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ColumnWidth::Short => "col-short",
            ColumnWidth::Medium => "col-medium",
            ColumnWidth::Long => "col-long",
            ColumnWidth::Summary => "col-summary",
        }
    }
}

/// 列定義（フィールドと幅クラス）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: Field,
    pub width: ColumnWidth,
}

/// フィールド値の最大文字数（欠落は0）
pub fn max_field_len(records: &[Record], field: Field) -> usize {
    records
        .iter()
        .map(|r| r.text(field).chars().count())
        .max()
        .unwrap_or(0)
}

/// 全列の幅クラスを表示順で算出
pub fn column_layout(records: &[Record]) -> Vec<Column> {
    Field::ALL
        .iter()
        .map(|&field| Column {
            field,
            width: ColumnWidth::classify(field, max_field_len(records, field)),
        })
        .collect()
}
