use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出開始通知の宛先（キューチャネル）
pub const QUEUE_EXCHANGE: &str = "notification.exchange";
pub const QUEUE_ROUTING_KEY: &str = "notification.routingkey";

/// 返却通知の宛先（ストリームチャネル）
pub const STREAM_TOPIC: &str = "loan-returned";

/// 通知レコード
///
/// 両チャネル共通のワイヤ形式。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub target_user: String,
    pub message: String,
}

/// 通知ディスパッチャポート
///
/// 独立した2つの配信チャネルをひとつのポートに束ねる。
/// イベント種別ごとのチャネル選択はワークフロー側で固定されており、
/// 呼び出しごとに設定可能ではない。どちらのチャネルも配信確認は待たない。
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// キューチャネルへ発行する
    ///
    /// 通知サービスによる準リアルタイム消費向けのfire-and-forget配信。
    async fn publish_queue(&self, notification: Notification) -> Result<()>;

    /// ストリームチャネルへ発行する
    ///
    /// 監査・分析系の下流コンシューマ向けの永続・順序付き発行。
    async fn publish_stream(&self, notification: Notification) -> Result<()>;
}
