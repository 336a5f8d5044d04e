//! 通信クライアントを注入したワークフロー
//!
//! 操作を1つずつ最後まで実行する。ネイティブ版とテストで使う。
//! ブラウザ版は `Workflow` をシグナルに持ち、`Command` を `spawn_local` で実行する。

use crate::transport::Transport;
use crate::workflow::{Intent, Workflow};

pub struct Session<T> {
    transport: T,
    workflow: Workflow,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            workflow: Workflow::new(),
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 操作を適用し、通信が発生した場合は完了まで待って結果を反映する
    pub async fn dispatch(&mut self, intent: Intent) {
        if let Some(command) = self.workflow.dispatch(intent) {
            let completion = command.run(&self.transport).await;
            self.workflow.complete(completion);
        }
    }
}
