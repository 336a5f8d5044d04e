//! アップロード→抽出→表示→エクスポートの状態機械
//!
//! 画面操作は `Intent` として `dispatch` に渡す。非同期の通信は `Command` として
//! 返し、呼び出し側が実行した結果を `complete` に戻す。
//! 各 `Command` は発行時の世代番号（`Ticket`）を持ち、リセット後に届いた
//! 古いレスポンスは適用しない。

use crate::error::{Error, ValidationError, TransportError};
use crate::selection::Selection;
use crate::transport::{ExportRequest, SavedExport, Transport};
use crate::types::{ChosenFile, Record};
use crate::wire::filename_base;
use tracing::{debug, info, warn};

/// ワークフローのフェーズ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// ファイル未選択
    #[default]
    Idle,
    /// ファイル選択済み（未送信）
    FileChosen,
    /// 抽出リクエスト送信中
    Processing,
    /// レコード取得済み（0件もありうる）
    Ready,
    /// エクスポート送信中（Readyのサブ状態）
    Exporting,
}

impl Phase {
    /// 通信中か
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Processing | Phase::Exporting)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::FileChosen => "file-chosen",
            Phase::Processing => "processing",
            Phase::Ready => "ready",
            Phase::Exporting => "exporting",
        }
    }
}

/// 画面からの操作
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ChooseFile(ChosenFile),
    /// 選択されたファイルを読み込めなかった
    FileUnreadable,
    Upload,
    ToggleRow(usize),
    ToggleAll,
    SelectAll,
    DeselectAll,
    Export,
    Reset,
}

/// 発行時の世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// 実行すべき非同期処理
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Extract { ticket: Ticket, file: ChosenFile },
    Export { ticket: Ticket, request: ExportRequest },
}

impl Command {
    pub fn ticket(&self) -> Ticket {
        match self {
            Command::Extract { ticket, .. } | Command::Export { ticket, .. } => *ticket,
        }
    }

    /// 通信クライアントで実行し、結果を `Completion` にまとめる
    pub async fn run<T: Transport>(self, transport: &T) -> Completion {
        match self {
            Command::Extract { ticket, file } => Completion::Extracted {
                ticket,
                result: transport.submit_for_extraction(&file).await,
            },
            Command::Export { ticket, request } => Completion::Exported {
                ticket,
                result: transport.submit_for_export(&request).await,
            },
        }
    }
}

/// 非同期処理の結果
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Extracted {
        ticket: Ticket,
        result: Result<Vec<Record>, TransportError>,
    },
    Exported {
        ticket: Ticket,
        result: Result<SavedExport, TransportError>,
    },
}

impl Completion {
    pub fn ticket(&self) -> Ticket {
        match self {
            Completion::Extracted { ticket, .. } | Completion::Exported { ticket, .. } => *ticket,
        }
    }
}

/// アップロードセッションの状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    phase: Phase,
    chosen_file: Option<ChosenFile>,
    status_message: Option<String>,
    records: Option<Vec<Record>>,
    selection: Selection,
    generation: u64,
    /// 表示中のレコード列の識別子。抽出成功で置き換わるたびに増える。
    records_id: u64,
    last_export: Option<SavedExport>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn chosen_file(&self) -> Option<&ChosenFile> {
        self.chosen_file.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// 抽出結果（未取得なら None）
    pub fn extracted(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }

    /// 表示中のレコード（未取得なら空）
    pub fn records(&self) -> &[Record] {
        self.records.as_deref().unwrap_or(&[])
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// リクエストの世代（リセット・アップロードで増える）
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn records_id(&self) -> u64 {
        self.records_id
    }

    /// 表の行キー（レコード列の識別子, 行番号）
    pub fn row_keys(&self) -> Vec<(u64, usize)> {
        (0..self.records().len()).map(|index| (self.records_id, index)).collect()
    }

    pub fn last_export(&self) -> Option<&SavedExport> {
        self.last_export.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn can_upload(&self) -> bool {
        !self.is_busy() && self.chosen_file.is_some()
    }

    pub fn can_export(&self) -> bool {
        self.phase == Phase::Ready && !self.records().is_empty()
    }

    /// 操作を適用し、必要なら非同期処理を返す
    pub fn dispatch(&mut self, intent: Intent) -> Option<Command> {
        match intent {
            Intent::ChooseFile(file) => {
                self.choose_file(file);
                None
            }
            Intent::FileUnreadable => {
                if self.is_busy() {
                    debug!(phase = self.phase.as_str(), "unreadable file ignored while busy");
                } else {
                    self.fail(ValidationError::UnreadableFile.into());
                }
                None
            }
            Intent::Upload => self.upload(),
            Intent::ToggleRow(index) => {
                self.update_selection("toggle-row", |s| {
                    if let Err(e) = s.toggle(index) {
                        warn!("ignored row toggle: {}", e);
                    }
                });
                None
            }
            Intent::ToggleAll => {
                self.update_selection("toggle-all", Selection::toggle_all);
                None
            }
            Intent::SelectAll => {
                self.update_selection("select-all", Selection::select_all);
                None
            }
            Intent::DeselectAll => {
                self.update_selection("deselect-all", Selection::deselect_all);
                None
            }
            Intent::Export => self.export(),
            Intent::Reset => {
                self.reset();
                None
            }
        }
    }

    /// 非同期処理の結果を適用。古い世代の結果は捨てて false を返す。
    pub fn complete(&mut self, completion: Completion) -> bool {
        let ticket = completion.ticket();
        if ticket.generation() != self.generation {
            debug!(
                ticket = ticket.generation(),
                current = self.generation,
                "dropping stale completion"
            );
            return false;
        }

        match completion {
            Completion::Extracted { result, .. } => {
                if self.phase != Phase::Processing {
                    debug!(phase = self.phase.as_str(), "extraction result without pending upload");
                    return false;
                }
                match result {
                    Ok(records) => {
                        info!(count = records.len(), "extraction finished");
                        self.selection.reconcile(records.len());
                        self.records = Some(records);
                        self.records_id += 1;
                        self.status_message = None;
                        self.phase = Phase::Ready;
                    }
                    Err(e) => {
                        self.phase = Phase::FileChosen;
                        self.fail(Error::Extraction(e));
                    }
                }
            }
            Completion::Exported { result, .. } => {
                if self.phase != Phase::Exporting {
                    debug!(phase = self.phase.as_str(), "export result without pending export");
                    return false;
                }
                self.phase = Phase::Ready;
                match result {
                    Ok(saved) => {
                        info!(filename = %saved.filename, size = saved.size, "export saved");
                        self.selection.deselect_all();
                        self.last_export = Some(saved);
                    }
                    Err(e) => self.fail(Error::Export(e)),
                }
            }
        }
        true
    }

    fn choose_file(&mut self, file: ChosenFile) {
        if self.is_busy() {
            debug!(phase = self.phase.as_str(), "file choice refused while busy");
            return;
        }
        debug!(file = %file.name, size = file.size(), "file chosen");
        // 前回の表はアップロード成功まで残す
        self.chosen_file = Some(file);
        self.status_message = None;
        self.phase = Phase::FileChosen;
    }

    fn upload(&mut self) -> Option<Command> {
        if self.is_busy() {
            debug!(phase = self.phase.as_str(), "upload refused while busy");
            return None;
        }
        let Some(file) = self.chosen_file.clone() else {
            self.fail(ValidationError::NoFileChosen.into());
            return None;
        };
        if file.is_empty() {
            self.fail(ValidationError::EmptyFile.into());
            return None;
        }

        self.generation += 1;
        self.phase = Phase::Processing;
        self.status_message = None;
        self.last_export = None;
        info!(file = %file.name, size = file.size(), generation = self.generation, "submitting for extraction");

        Some(Command::Extract {
            ticket: Ticket(self.generation),
            file,
        })
    }

    fn export(&mut self) -> Option<Command> {
        if self.is_busy() {
            debug!(phase = self.phase.as_str(), "export refused while busy");
            return None;
        }
        if self.records().is_empty() {
            self.fail(ValidationError::NothingToExport.into());
            return None;
        }
        if self.phase != Phase::Ready {
            // 新しいファイルを選択中（前回の表は表示のみ）
            debug!(phase = self.phase.as_str(), "export refused outside ready");
            return None;
        }

        let records: Vec<Record> = if self.selection.is_empty() {
            self.records().to_vec()
        } else {
            self.selection.pick(self.records()).into_iter().cloned().collect()
        };
        let request = ExportRequest {
            records,
            suggested_filename_base: filename_base(self.chosen_file.as_ref().map(|f| f.name.as_str())),
        };

        self.phase = Phase::Exporting;
        self.status_message = None;
        self.last_export = None;
        info!(
            count = request.records.len(),
            base = %request.suggested_filename_base,
            "submitting for export"
        );

        Some(Command::Export {
            ticket: Ticket(self.generation),
            request,
        })
    }

    fn reset(&mut self) {
        debug!(phase = self.phase.as_str(), "reset");
        let generation = self.generation + 1;
        let records_id = self.records_id + 1;
        *self = Self {
            generation,
            records_id,
            ..Self::default()
        };
    }

    fn update_selection(&mut self, action: &str, apply: impl FnOnce(&mut Selection)) {
        // 新しいファイルを選択中の表は表示のみ
        if !self.can_export() {
            debug!(action, phase = self.phase.as_str(), "selection change refused");
            return;
        }
        apply(&mut self.selection);
    }

    fn fail(&mut self, error: Error) {
        warn!("{}", error);
        self.status_message = Some(error.user_message());
    }
}
