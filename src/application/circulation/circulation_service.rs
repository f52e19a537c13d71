use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::domain::{self, CloseLoanError, commands::*, loan::Loan, value_objects::*};
use crate::ports::*;

use super::errors::{CirculationError, Result};

/// 外部サービス呼び出しの上限時間
///
/// カタログと通知はネットワーク越しの呼び出し。応答がない場合は
/// この時間で打ち切り、呼び出し中の操作を失敗させる。
const EXTERNAL_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// 書籍単位の排他制御
///
/// open_loanの在庫確認→貸出登録→在庫更新の間、同じ書籍への並行呼び出しを
/// 直列化する。両者が「貸出可能」を観測して二重貸出になるcheck-then-act
/// 競合をこのスコープ内で防ぐ。排他はプロセス内に閉じる：複数インスタンス
/// 構成ではカタログサービス側での直列化が別途必要になる。
pub struct BookLockRegistry {
    locks: Mutex<HashMap<BookId, Arc<Mutex<()>>>>,
}

impl BookLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// 書籍に対応するロックを取得する（なければ作成）
    async fn lock_for(&self, book_id: &BookId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(book_id.clone()).or_default().clone()
    }
}

impl Default for BookLockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
/// すべての協力者はプロセス起動時に明示的に構築・注入される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_repository: Arc<dyn LoanRepository>,
    pub catalog: Arc<dyn CatalogAvailability>,
    pub notifications: Arc<dyn NotificationDispatcher>,
    pub book_locks: Arc<BookLockRegistry>,
}

/// 外部サービス呼び出しをタイムアウト付きで実行するヘルパー関数
///
/// 呼び出し失敗とタイムアウトはどちらもExternalServiceFailureとして
/// 呼び出し元へ伝播する。
async fn call_external<T>(
    fut: impl Future<Output = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>>,
) -> Result<T> {
    match timeout(EXTERNAL_CALL_TIMEOUT, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(CirculationError::ExternalServiceFailure(e)),
        Err(elapsed) => Err(CirculationError::ExternalServiceFailure(Box::new(elapsed))),
    }
}

/// 通知発行をベストエフォートで実行するヘルパー関数
///
/// 確定済みの貸出状態変更を通知障害で巻き戻さないため、
/// 失敗はログに記録するだけで伝播させない。
async fn publish_best_effort(
    channel: &str,
    fut: impl Future<Output = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>>,
) {
    match timeout(EXTERNAL_CALL_TIMEOUT, fut).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Notification publish failed on {} channel: {}", channel, e),
        Err(_) => tracing::warn!("Notification publish timed out on {} channel", channel),
    }
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍がカタログ上で貸出可能であること
/// - 貸出期間は14日間
///
/// # 一貫性保証
///
/// 貸出レコードの保存とカタログの在庫更新はひとつの作業単位として意図されて
/// いるが、在庫更新は永続化ストアのトランザクション境界の外にある外部システム
/// を対象とする。保存成功後に在庫更新が失敗した場合、貸出台帳とカタログは
/// 手動で突き合わせるまで乖離する（補償処理は行わない）。
///
/// # 並行性
///
/// 同一書籍への並行呼び出しは書籍単位のロックで直列化され、
/// 1冊の書籍に2件のActiveな貸出が生まれることはない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 貸出コマンド
///
/// # 戻り値
/// 成功時は作成された貸出のID
pub async fn open_loan(deps: &ServiceDependencies, cmd: OpenLoan) -> Result<LoanId> {
    // 同一書籍のcheck-then-act競合を防ぐため、以降の手順を書籍単位で直列化
    let book_lock = deps.book_locks.lock_for(&cmd.book_id).await;
    let _guard = book_lock.lock().await;

    // 1. 書籍の貸出可能性確認（失敗・タイムアウトを貸出可能とはみなさない）
    let available = call_external(deps.catalog.is_available(&cmd.book_id)).await?;

    if !available {
        return Err(CirculationError::BookUnavailable(cmd.book_id));
    }

    // 2. ドメイン層の純粋関数で貸出を生成
    let loan = domain::loan::open_loan(cmd.user_id.clone(), cmd.book_id.clone(), cmd.loaned_at);
    let loan_id = loan.id.clone();

    // 3. 貸出レコードを保存
    deps.loan_repository
        .save(loan)
        .await
        .map_err(CirculationError::RepositoryError)?;

    // 4. カタログの在庫フラグを更新
    call_external(deps.catalog.set_availability(&cmd.book_id, false)).await?;

    // 5. キューチャネルへ貸出通知を発行（ベストエフォート）
    let notification = Notification {
        target_user: cmd.user_id.value().to_string(),
        message: format!("loan opened: {}", cmd.book_id),
    };
    publish_best_effort("queue", deps.notifications.publish_queue(notification)).await;

    Ok(loan_id)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 既に返却済みでないこと（返却済みへの再返却は拒否）
///
/// 在庫更新と通知発行の一貫性保証はopen_loanと同じ：保存後の在庫更新失敗は
/// 乖離として呼び出し元へ返り、通知障害は操作を失敗させない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 返却コマンド
pub async fn close_loan(deps: &ServiceDependencies, cmd: CloseLoan) -> Result<()> {
    // 1. 貸出レコードを取得
    let loan = deps
        .loan_repository
        .find_by_id(&cmd.loan_id)
        .await
        .map_err(CirculationError::RepositoryError)?
        .ok_or_else(|| CirculationError::LoanNotFound(cmd.loan_id.clone()))?;

    // 2. ドメイン層の純粋関数で返却へ遷移
    let returned = match domain::loan::close_loan(&loan) {
        Ok(returned) => returned,
        Err(CloseLoanError::AlreadyReturned) => {
            return Err(CirculationError::LoanAlreadyReturned(cmd.loan_id));
        }
    };

    // 3. 更新された貸出レコードを保存
    deps.loan_repository
        .save(returned)
        .await
        .map_err(CirculationError::RepositoryError)?;

    // 4. カタログの在庫フラグを戻す
    call_external(deps.catalog.set_availability(&loan.book_id, true)).await?;

    // 5. ストリームチャネルへ返却通知を発行（ベストエフォート）
    let notification = Notification {
        target_user: loan.user_id.value().to_string(),
        message: format!("loan closed: {}", loan.book_id),
    };
    publish_best_effort("stream", deps.notifications.publish_stream(notification)).await;

    Ok(())
}

/// すべての貸出を取得する
///
/// フィルタリング・ページングなしの全件取得。
/// 件数増加時のスケーラビリティは既知の制限。
pub async fn list_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loan_repository
        .find_all()
        .await
        .map_err(CirculationError::RepositoryError)
}
