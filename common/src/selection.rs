//! 行選択モデル
//!
//! 現在表示中のレコード列に対する選択インデックス集合。
//! インデックスはレコード列が差し替わるまでの間だけ有効なので、
//! 差し替え時（`reconcile`）は必ず全解除する。

use crate::error::SelectionError;
use crate::types::Record;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// 現在のレコード数
    len: usize,
    selected: BTreeSet<usize>,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            selected: BTreeSet::new(),
        }
    }

    /// 1行の選択を反転
    pub fn toggle(&mut self, index: usize) -> Result<(), SelectionError> {
        if index >= self.len {
            return Err(SelectionError::OutOfRange { index, len: self.len });
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        Ok(())
    }

    /// 全選択済みなら全解除、そうでなければ全選択
    pub fn toggle_all(&mut self) {
        if self.selected.len() == self.len {
            self.selected.clear();
        } else {
            self.select_all();
        }
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.len).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// レコード列の差し替え。旧インデックスは別レコードを指しうるため再マップしない。
    pub fn reconcile(&mut self, len: usize) {
        self.len = len;
        self.selected.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// 対象レコード数
    pub fn record_count(&self) -> usize {
        self.len
    }

    pub fn is_all_selected(&self) -> bool {
        self.len > 0 && self.selected.len() == self.len
    }

    /// 選択インデックス（昇順）
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// 選択レコードをインデックス順に取り出す
    pub fn pick<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        self.indices().filter_map(|i| records.get(i)).collect()
    }
}
